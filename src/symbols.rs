// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Descriptors of declared symbols and the scope that holds them

use crate::ast::{u, NodeRef, Sort};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// A declared sort symbol, or a sort alias introduced by `define-sort`
#[derive(Debug, Clone)]
pub struct SortInfo {
    pub name: String,
    pub arity: usize,
    /// formal parameters of an alias
    pub params: Vec<String>,
    /// the expanded target of an alias
    pub definition: Option<Sort>,
    pub attributes: Vec<u::Attribute>,
    pub node: NodeRef,
}

impl SortInfo {
    pub fn new(name: String, arity: usize, node: NodeRef) -> Self {
        Self {
            name,
            arity,
            params: vec![],
            definition: None,
            attributes: vec![],
            node,
        }
    }

    pub fn alias(name: String, params: Vec<String>, definition: Sort, node: NodeRef) -> Self {
        Self {
            name,
            arity: params.len(),
            params,
            definition: Some(definition),
            attributes: vec![],
            node,
        }
    }
}

/// How a binary function extends to more arguments through associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// How a binary predicate extends to more arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Chainable,
    Pairwise,
}

/// A declared function symbol; constants are functions without arguments
#[derive(Debug, Clone)]
pub struct FunInfo {
    pub name: String,
    /// argument sorts
    pub args: Vec<Sort>,
    pub ret: Sort,
    /// sort parameters of a parametric declaration
    pub params: Vec<String>,
    /// the body of a defined function
    pub body: Option<u::Term>,
    pub attributes: Vec<u::Attribute>,
    pub assoc: Option<Assoc>,
    pub chain: Option<Chain>,
    pub node: NodeRef,
}

impl FunInfo {
    pub fn new(name: String, args: Vec<Sort>, ret: Sort, node: NodeRef) -> Self {
        Self {
            name,
            args,
            ret,
            params: vec![],
            body: None,
            attributes: vec![],
            assoc: None,
            chain: None,
            node,
        }
    }

    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: u::Term) -> Self {
        self.body = Some(body);
        self
    }

    /// The argument sorts followed by the return sort
    pub fn signature(&self) -> impl Iterator<Item = &Sort> {
        self.args.iter().chain(std::iter::once(&self.ret))
    }

    pub fn is_parametric(&self) -> bool {
        !self.params.is_empty()
    }

    /// Whether this function names a constant, i.e. it has no arguments and no parameters
    pub fn is_constant(&self) -> bool {
        self.args.is_empty() && self.params.is_empty()
    }
}

/// A variable bound by a function definition, a binder or a pattern
#[derive(Debug, Clone)]
pub struct VarInfo {
    pub name: String,
    pub sort: Sort,
    pub node: NodeRef,
}

impl VarInfo {
    pub fn new(name: String, sort: Sort, node: NodeRef) -> Self {
        Self { name, sort, node }
    }
}

/// Any symbol known to the environment
#[derive(Debug, Clone)]
pub enum SymbolInfo {
    Sort(Rc<SortInfo>),
    Fun(Rc<FunInfo>),
    Var(Rc<VarInfo>),
}

impl SymbolInfo {
    pub fn name(&self) -> &str {
        match self {
            SymbolInfo::Sort(s) => &s.name,
            SymbolInfo::Fun(f) => &f.name,
            SymbolInfo::Var(v) => &v.name,
        }
    }

    /// The declaration this symbol comes from
    pub fn node(&self) -> &NodeRef {
        match self {
            SymbolInfo::Sort(s) => &s.node,
            SymbolInfo::Fun(f) => &f.node,
            SymbolInfo::Var(v) => &v.node,
        }
    }
}

impl From<SortInfo> for SymbolInfo {
    fn from(value: SortInfo) -> Self {
        SymbolInfo::Sort(Rc::new(value))
    }
}

impl From<FunInfo> for SymbolInfo {
    fn from(value: FunInfo) -> Self {
        SymbolInfo::Fun(Rc::new(value))
    }
}

impl From<VarInfo> for SymbolInfo {
    fn from(value: VarInfo) -> Self {
        SymbolInfo::Var(Rc::new(value))
    }
}

impl Display for SymbolInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolInfo::Sort(s) => write!(f, "sort {}", s.name),
            SymbolInfo::Fun(fun) => {
                write!(f, "fun {} (", fun.name)?;
                for (i, s) in fun.args.iter().enumerate() {
                    if i != 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", s)?;
                }
                write!(f, ") {}", fun.ret)
            }
            SymbolInfo::Var(v) => write!(f, "var {} {}", v.name, v.sort),
        }
    }
}

/// One scope of the environment
///
/// Sorts and variables are unique by name; functions may be overloaded.
#[derive(Debug, Default)]
pub struct SymbolTable {
    sorts: HashMap<String, Rc<SortInfo>>,
    funs: HashMap<String, Vec<Rc<FunInfo>>>,
    vars: HashMap<String, Rc<VarInfo>>,
}

impl SymbolTable {
    pub fn get_sort_info(&self, name: &str) -> Option<&Rc<SortInfo>> {
        self.sorts.get(name)
    }

    /// All overloads of `name` in this scope, in declaration order
    pub fn get_fun_info(&self, name: &str) -> &[Rc<FunInfo>] {
        self.funs.get(name).map_or(&[], |v| v.as_slice())
    }

    pub fn get_var_info(&self, name: &str) -> Option<&Rc<VarInfo>> {
        self.vars.get(name)
    }

    /// Insert a sort; the existing one is returned, and nothing is inserted, if the name is taken.
    pub fn add_sort(&mut self, info: Rc<SortInfo>) -> Option<Rc<SortInfo>> {
        if let Some(prev) = self.sorts.get(&info.name) {
            return Some(prev.clone());
        }
        self.sorts.insert(info.name.clone(), info);
        None
    }

    /// Insert an overload; duplicate signatures are the caller's concern.
    pub fn add_fun(&mut self, info: Rc<FunInfo>) {
        self.funs.entry(info.name.clone()).or_default().push(info);
    }

    /// Insert a variable; the existing one is returned, and nothing is inserted, if the name is
    /// taken.
    pub fn add_var(&mut self, info: Rc<VarInfo>) -> Option<Rc<VarInfo>> {
        if let Some(prev) = self.vars.get(&info.name) {
            return Some(prev.clone());
        }
        self.vars.insert(info.name.clone(), info);
        None
    }

    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty() && self.funs.is_empty() && self.vars.is_empty()
    }
}
