// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! This module instantiates untyped AST

use crate::instantiate_sorts;
use crate::located_types;
use crate::meta::{Loc, NodeRef, WithMeta};
use crate::raw::alg;
use crate::traits::Contains;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// An untyped object is an object with associated location information
///
/// Equality and hashing only look at the data, so that two trees read from different places
/// compare equal when they have the same shape.
#[derive(Clone)]
pub struct Untyped<T>(Rc<WithMeta<T, Loc>>);

impl<T: PartialEq> PartialEq for Untyped<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.data == other.0.data
    }
}

impl<T: Eq> Eq for Untyped<T> {}

impl<T: Hash> Hash for Untyped<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.data.hash(state)
    }
}

impl<T> Display for Untyped<T>
where
    T: Display,
{
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.data.fmt(f)
    }
}

impl<T> Debug for Untyped<T>
where
    T: Debug,
{
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.data.fmt(f)
    }
}

impl<T> Deref for Untyped<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0.data
    }
}

impl<T> Contains for Untyped<T> {
    type T = T;

    #[inline]
    fn inner(&self) -> &Self::T {
        &self.0.data
    }
}

impl<T> Untyped<T> {
    pub(crate) fn wrap(t: T, loc: Loc) -> Self {
        Untyped(Rc::new(WithMeta::new(t, loc)))
    }

    #[inline]
    pub fn loc(&self) -> &Loc {
        &self.0.meta
    }
}

impl<T: Display + 'static> Untyped<T> {
    /// A handle to this very node, for diagnostics and symbol declarations
    pub fn node_ref(&self) -> NodeRef {
        NodeRef(self.0.clone())
    }
}

type P<T> = Untyped<T>;

instantiate_sorts!(P);

pub type QualifiedIdentifier = alg::QualifiedIdentifier<Str, Sort>;

pub type SExpr = alg::SExpr<Str>;

pub type AttributeValue = alg::AttributeValue<Str>;

pub type Attribute = alg::Attribute<Str>;

pub type SortedVar = alg::VarBinding<Str, Sort>;

pub type LetBinding = alg::VarBinding<Str, Term>;

pub type Pattern = alg::Pattern<Str, Sort>;

pub type PatternArm = alg::PatternArm<Str, Sort, Term>;

pub type ConstructorDec = alg::ConstructorDec<Str, Sort>;

pub type DatatypeDec = alg::DatatypeDec<Str, Sort>;

pub type SortDec = alg::SortDec<Str>;

pub type FunctionDec = alg::FunctionDec<Str, Sort>;

pub type FunctionDef = alg::FunctionDef<Str, Sort, Term>;

located_types!(Untyped;
    RTerm => Term: alg::Term<Str, Sort, Term>,
    RCommand => Command: alg::Command<Str, Sort, Term>,
    RScript => Script: alg::Script<Command>,
    RSortSymbolDec => SortSymbolDec: alg::SortSymbolDec<Str>,
    RFunSymbolDec => FunSymbolDec: alg::FunSymbolDec<Str, Sort>,
    RTheoryAttribute => TheoryAttribute: alg::TheoryAttribute<Str, SortSymbolDec, FunSymbolDec>,
    RLogicAttribute => LogicAttribute: alg::LogicAttribute<Str>,
    RTheory => Theory: alg::Theory<Str, TheoryAttribute>,
    RLogic => Logic: alg::Logic<Str, LogicAttribute>,
);

/// What a source file contains
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Root {
    Script(Script),
    Theory(Theory),
    Logic(Logic),
}

impl Root {
    pub fn node_ref(&self) -> NodeRef {
        match self {
            Root::Script(s) => s.node_ref(),
            Root::Theory(t) => t.node_ref(),
            Root::Logic(l) => l.node_ref(),
        }
    }

    pub fn loc(&self) -> &Loc {
        match self {
            Root::Script(s) => s.loc(),
            Root::Theory(t) => t.loc(),
            Root::Logic(l) => l.loc(),
        }
    }

    /// A short description of the root kind, for messages
    pub fn kind(&self) -> &'static str {
        match self {
            Root::Script(_) => "script",
            Root::Theory(_) => "theory",
            Root::Logic(_) => "logic",
        }
    }
}

impl Display for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Root::Script(s) => Display::fmt(s, f),
            Root::Theory(t) => Display::fmt(t, f),
            Root::Logic(l) => Display::fmt(l, f),
        }
    }
}
