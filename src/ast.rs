// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The public face of the two AST instantiations
//!
//! [u] holds the located trees the parser builds; the types re-exported at this level are the
//! interned sorts the symbol environment works with.

pub use crate::allocator::*;
pub use crate::meta::{Loc, Node, NodeRef, Span};
pub use crate::raw::alg;
pub use crate::raw::instance::*;
pub use crate::untyped as u;
pub use alg::{StrQuote, SymbolQuote};
