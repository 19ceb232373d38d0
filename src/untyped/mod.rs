// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! This module implements untyped ASTs which maintain position information
//!
//! See [crate::ast] for the sorts of the symbol environment

mod build;
mod instance;
mod reader;

pub use build::{ParseError, ParseResult, UntypedAst};
pub use instance::*;
