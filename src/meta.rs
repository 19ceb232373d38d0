// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// A struct that associate a piece of meta-data with a piece of data
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct WithMeta<A, B> {
    pub(crate) data: A,
    pub(crate) meta: B,
}

impl<A, B> WithMeta<A, B> {
    pub(crate) fn new(data: A, meta: B) -> Self {
        Self { data, meta }
    }
}

impl<A, B> Display for WithMeta<A, B>
where
    A: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.data, f)
    }
}

impl<A, B> Debug for WithMeta<A, B>
where
    A: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.data, f)
    }
}

/// A region of a source text
///
/// Rows and columns are 1-based; the end position is the last character of the region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {}:{}",
            self.start_row, self.start_col, self.end_row, self.end_col
        )
    }
}

/// The location of an AST node: the span and, when it was read from a file, the file name
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Loc {
    pub file: Option<Rc<str>>,
    pub span: Span,
}

impl Loc {
    pub fn new(file: Option<Rc<str>>, span: Span) -> Self {
        Self { file, span }
    }

    /// The file name, or an empty string for sources that were not read from a file
    pub fn file_name(&self) -> &str {
        self.file.as_deref().unwrap_or("")
    }
}

impl Display for Loc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            None => Display::fmt(&self.span, f),
            Some(file) => write!(f, "{}@{}", file, self.span),
        }
    }
}

/// A located AST node, seen only through its rendering and its location
///
/// This is what diagnostics and symbol declarations keep to point back into the sources.
pub trait Node: Display {
    fn loc(&self) -> &Loc;
}

impl<T: Display> Node for WithMeta<T, Loc> {
    #[inline]
    fn loc(&self) -> &Loc {
        &self.meta
    }
}

/// A shared handle to a located node
///
/// The AST never points back to symbols or diagnostics, so these handles cannot form cycles.
#[derive(Clone)]
pub struct NodeRef(pub(crate) Rc<dyn Node>);

impl NodeRef {
    pub fn loc(&self) -> &Loc {
        self.0.loc()
    }

    /// Whether both handles refer to the very same node
    pub fn same_node(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&*self.0, f)
    }
}

impl Debug for NodeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.0, self.0.loc())
    }
}
