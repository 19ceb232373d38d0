// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Syntax and sortedness checking of SMT-LIB scripts, theories and logics
//!
//! Sources are parsed into located ASTs ([untyped]), checked for syntax ([syntax]) and then for
//! sortedness ([checker]) against a symbol environment ([stack]) populated by the theories and
//! logics they load. Problems are collected in [diagnostics::Diagnostics] and rendered as a
//! report grouped by file.

mod allocator;
pub mod ast;
pub mod checker;
pub mod config;
pub mod diagnostics;
pub mod exec;
mod macros;
mod meta;
mod raw;
pub mod sorter;
pub mod stack;
pub mod statics;
pub mod symbols;
pub mod syntax;
pub mod traits;
pub mod untyped;
