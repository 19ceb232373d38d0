// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The scoped symbol environment
//!
//! The stack owns the [Arena] in which all sorts of the environment are interned. The bottom
//! scope is never popped.

use crate::ast::{u, Arena, HasArena, NodeRef, Sort, SortAllocator, SortSubst};
use crate::diagnostics::{msg, Diagnostics};
use crate::symbols::{FunInfo, SortInfo, SymbolInfo, SymbolTable, VarInfo};
use crate::traits::Allocatable;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

pub struct SymbolStack {
    arena: Arena,
    scopes: Vec<SymbolTable>,
}

impl HasArena for SymbolStack {
    fn arena(&mut self) -> &mut Arena {
        &mut self.arena
    }
}

impl Default for SymbolStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether two sorts are equal up to a consistent renaming between the parameters `pa` of the
/// first and `pb` of the second. `fwd` and `bwd` record the renaming built so far.
fn param_equal(
    pa: &[String],
    pb: &[String],
    a: &Sort,
    b: &Sort,
    fwd: &mut HashMap<String, String>,
    bwd: &mut HashMap<String, String>,
) -> bool {
    match (a.as_param(pa), b.as_param(pb)) {
        (Some(p), Some(q)) => match (fwd.get(p), bwd.get(q)) {
            (None, None) => {
                fwd.insert(p.clone(), q.clone());
                bwd.insert(q.clone(), p.clone());
                true
            }
            (Some(q2), Some(p2)) => q2 == q && p2 == p,
            _ => false,
        },
        (None, None) => {
            a.identifier() == b.identifier()
                && a.args().len() == b.args().len()
                && a
                    .args()
                    .iter()
                    .zip(b.args().iter())
                    .all(|(x, y)| param_equal(pa, pb, x, y, fwd, bwd))
        }
        _ => false,
    }
}

/// Whether two overloads have the same signature; parametric signatures are compared modulo
/// renaming of their own parameters.
pub fn same_signature(a: &FunInfo, b: &FunInfo) -> bool {
    if a.args.len() != b.args.len() || a.params.len() != b.params.len() {
        return false;
    }
    if a.params.is_empty() {
        return a.args == b.args && a.ret == b.ret;
    }
    let mut fwd = HashMap::new();
    let mut bwd = HashMap::new();
    a.signature()
        .zip(b.signature())
        .all(|(x, y)| param_equal(&a.params, &b.params, x, y, &mut fwd, &mut bwd))
}

impl SymbolStack {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            scopes: vec![SymbolTable::default()],
        }
    }

    /// The number of scopes, including the bottom one
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push(&mut self) {
        self.push_n(1)
    }

    pub fn push_n(&mut self, n: usize) {
        self.scopes
            .extend(std::iter::repeat_with(SymbolTable::default).take(n));
        debug!("pushed {} scope(s), depth {}", n, self.depth());
    }

    pub fn pop(&mut self) -> bool {
        self.pop_n(1)
    }

    /// Remove the `n` innermost scopes; nothing happens if that would remove the bottom one.
    pub fn pop_n(&mut self, n: usize) -> bool {
        if n >= self.scopes.len() {
            return false;
        }
        self.scopes.truncate(self.scopes.len() - n);
        debug!("popped {} scope(s), depth {}", n, self.depth());
        true
    }

    /// Drop every scope and every declaration; the interned sorts stay in the arena.
    pub fn reset(&mut self) {
        self.scopes = vec![SymbolTable::default()];
    }

    fn top_mut(&mut self) -> &mut SymbolTable {
        let n = self.scopes.len() - 1;
        &mut self.scopes[n]
    }

    pub fn get_sort_info(&self, name: &str) -> Option<Rc<SortInfo>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|t| t.get_sort_info(name))
            .cloned()
    }

    pub fn get_var_info(&self, name: &str) -> Option<Rc<VarInfo>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|t| t.get_var_info(name))
            .cloned()
    }

    /// All visible overloads of `name`, outermost first; identical signatures are listed once.
    pub fn get_fun_info(&self, name: &str) -> Vec<Rc<FunInfo>> {
        let mut ret: Vec<Rc<FunInfo>> = vec![];
        for f in self.scopes.iter().flat_map(|t| t.get_fun_info(name)) {
            if !ret.iter().any(|g| same_signature(f, g)) {
                ret.push(f.clone());
            }
        }
        ret
    }

    /// Find the declaration `info` would conflict with.
    ///
    /// Sorts conflict with any visible sort of the same name, variables only with a variable of
    /// the innermost scope, and functions with a visible overload of the same signature.
    pub fn find_duplicate(&self, info: &SymbolInfo) -> Option<SymbolInfo> {
        match info {
            SymbolInfo::Sort(s) => self.get_sort_info(&s.name).map(SymbolInfo::Sort),
            SymbolInfo::Var(v) => self
                .scopes
                .last()
                .and_then(|t| t.get_var_info(&v.name))
                .cloned()
                .map(SymbolInfo::Var),
            SymbolInfo::Fun(f) => self
                .scopes
                .iter()
                .flat_map(|t| t.get_fun_info(&f.name))
                .find(|g| same_signature(f, g))
                .cloned()
                .map(SymbolInfo::Fun),
        }
    }

    /// Add `info` to the innermost scope unless it conflicts; the conflicting declaration is
    /// returned in that case.
    pub fn try_add(&mut self, info: impl Into<SymbolInfo>) -> Option<SymbolInfo> {
        let info = info.into();
        if let Some(dup) = self.find_duplicate(&info) {
            return Some(dup);
        }
        let top = self.top_mut();
        match info {
            SymbolInfo::Sort(s) => {
                top.add_sort(s);
            }
            SymbolInfo::Fun(f) => top.add_fun(f),
            SymbolInfo::Var(v) => {
                top.add_var(v);
            }
        }
        None
    }

    /// Resolve aliases in a sort. Names in `params` are parameters of the enclosing declaration
    /// and are left alone, as are unknown names.
    pub fn expand_in(&mut self, sort: &Sort, params: &[String]) -> Sort {
        if sort.as_param(params).is_some() {
            return sort.clone();
        }
        let args: Vec<Sort> = sort
            .args()
            .iter()
            .map(|a| self.expand_in(a, params))
            .collect();
        if let Some(info) = self.get_sort_info(&sort.name()) {
            if let Some(def) = &info.definition {
                if info.params.len() == args.len() {
                    let subst: SortSubst = info.params.iter().cloned().zip(args).collect();
                    return self.replace(def, &subst);
                }
            }
        }
        self.arena.sort(sort.identifier().clone(), args)
    }

    pub fn expand(&mut self, sort: &Sort) -> Sort {
        self.expand_in(sort, &[])
    }

    /// Substitute the parameters mapped by `subst`; others stay as they are.
    pub fn replace(&mut self, sort: &Sort, subst: &SortSubst) -> Sort {
        if sort.is_atom() {
            return subst
                .get(sort.sort_name().as_str())
                .cloned()
                .unwrap_or_else(|| sort.clone());
        }
        let args = sort.args().iter().map(|a| self.replace(a, subst)).collect();
        self.arena.sort(sort.identifier().clone(), args)
    }

    /// Intern a located sort and expand its aliases
    pub fn resolve(&mut self, sort: &u::Sort, params: &[String]) -> Sort {
        let s = sort.allocate(self);
        self.expand_in(&s, params)
    }

    /// Check that every sort symbol in `sort` is known and applied to as many arguments as it
    /// takes. Names in `params` are exempt. Problems are reported against `node`.
    pub fn check_sort(
        &self,
        sort: &u::Sort,
        params: &[String],
        node: &NodeRef,
        diag: &mut Diagnostics,
    ) -> bool {
        let name = sort.identifier().to_string();
        let mut ok = true;
        if sort.args().is_empty() && params.contains(&name) {
            return true;
        }
        match self.get_sort_info(&name) {
            None => {
                diag.add(node, msg::sort_unknown(&name));
                ok = false;
            }
            Some(info) if info.arity != sort.args().len() => {
                diag.add_with(
                    node,
                    msg::sort_arity(&name, info.arity, sort.args().len()),
                    SymbolInfo::Sort(info),
                );
                ok = false;
            }
            Some(_) => {}
        }
        for arg in sort.args() {
            ok &= self.check_sort(arg, params, node, diag);
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ObjectAllocatorExt;
    use crate::untyped::UntypedAst;

    fn node() -> NodeRef {
        UntypedAst.parse_term_str("x").unwrap().node_ref()
    }

    fn sort(stack: &mut SymbolStack, s: &str) -> Sort {
        let s = UntypedAst.parse_sort_str(s).unwrap();
        stack.resolve(&s, &[])
    }

    fn declare_sort(stack: &mut SymbolStack, name: &str, arity: usize) -> Option<SymbolInfo> {
        stack.try_add(SortInfo::new(name.into(), arity, node()))
    }

    #[test]
    fn test_push_pop() {
        let mut stack = SymbolStack::new();
        assert_eq!(stack.depth(), 1);
        assert!(!stack.pop());
        stack.push_n(2);
        assert!(!stack.pop_n(3));
        assert_eq!(stack.depth(), 3);
        assert!(stack.pop_n(2));
        assert_eq!(stack.depth(), 1);

        // the bottom scope survives failed pops and resets, and takes declarations
        assert!(!stack.pop());
        stack.reset();
        assert_eq!(stack.depth(), 1);
        assert!(declare_sort(&mut stack, "S", 0).is_none());
        assert!(stack.get_sort_info("S").is_some());
    }

    #[test]
    fn test_sort_duplicates() {
        let mut stack = SymbolStack::new();
        assert!(declare_sort(&mut stack, "S", 0).is_none());
        stack.push();
        let dup = declare_sort(&mut stack, "S", 1).unwrap();
        assert_eq!(dup.name(), "S");
        stack.pop();
        assert!(stack.get_sort_info("S").is_some());
    }

    #[test]
    fn test_var_shadowing() {
        let mut stack = SymbolStack::new();
        let int: Sort = stack.simple_sort("Int");
        let boolean: Sort = stack.bool_sort();
        assert!(stack.try_add(VarInfo::new("x".into(), int.clone(), node())).is_none());
        assert!(stack.try_add(VarInfo::new("x".into(), int.clone(), node())).is_some());
        stack.push();
        assert!(stack.try_add(VarInfo::new("x".into(), boolean.clone(), node())).is_none());
        assert_eq!(stack.get_var_info("x").unwrap().sort, boolean);
        stack.pop();
        assert_eq!(stack.get_var_info("x").unwrap().sort, int);
    }

    #[test]
    fn test_overloads() {
        let mut stack = SymbolStack::new();
        let int: Sort = stack.simple_sort("Int");
        let real: Sort = stack.simple_sort("Real");
        let f1 = FunInfo::new("f".into(), vec![int.clone()], int.clone(), node());
        let f2 = FunInfo::new("f".into(), vec![real.clone()], real.clone(), node());
        assert!(stack.try_add(f1.clone()).is_none());
        assert!(stack.try_add(f2).is_none());
        stack.push();
        assert!(stack.try_add(f1.clone()).is_some());
        stack.try_add(FunInfo::new("f".into(), vec![int.clone()], real, node()));
        assert_eq!(stack.get_fun_info("f").len(), 3);
        stack.pop();
        assert_eq!(stack.get_fun_info("f").len(), 2);
    }

    #[test]
    fn test_parametric_duplicates() {
        let mut stack = SymbolStack::new();
        let boolean: Sort = stack.bool_sort();
        let x: Sort = stack.simple_sort("X");
        let y: Sort = stack.simple_sort("Y");
        let eq1 = FunInfo::new("=".into(), vec![x.clone(), x.clone()], boolean.clone(), node())
            .with_params(vec!["X".into()]);
        let eq2 = FunInfo::new("=".into(), vec![y.clone(), y.clone()], boolean.clone(), node())
            .with_params(vec!["Y".into()]);
        let eq3 = FunInfo::new("=".into(), vec![x.clone(), y.clone()], boolean.clone(), node())
            .with_params(vec!["X".into(), "Y".into()]);
        let eq4 = FunInfo::new("=".into(), vec![y, x], boolean, node())
            .with_params(vec!["X".into(), "Y".into()]);
        assert!(same_signature(&eq1, &eq2));
        assert!(!same_signature(&eq1, &eq3));
        assert!(same_signature(&eq3, &eq4));
        assert!(stack.try_add(eq1).is_none());
        assert!(stack.try_add(eq2).is_some());
        assert!(stack.try_add(eq3).is_none());
        assert!(stack.try_add(eq4).is_some());
    }

    #[test]
    fn test_expand_alias() {
        let mut stack = SymbolStack::new();
        declare_sort(&mut stack, "Int", 0);
        declare_sort(&mut stack, "Array", 2);
        let params = vec!["p".to_string()];
        let def = UntypedAst.parse_sort_str("(Array p p)").unwrap();
        let def = stack.resolve(&def, &params);
        stack.try_add(SortInfo::alias("Alias".into(), params, def, node()));
        let s = sort(&mut stack, "(Alias Int)");
        assert_eq!(s.to_string(), "(Array Int Int)");
        let expected = sort(&mut stack, "(Array Int Int)");
        assert_eq!(s, expected);
        let nested = sort(&mut stack, "(Array (Alias Int) Int)");
        assert_eq!(nested.to_string(), "(Array (Array Int Int) Int)");
    }

    #[test]
    fn test_replace() {
        let mut stack = SymbolStack::new();
        let s = sort(&mut stack, "(Array X (List Y))");
        let int = sort(&mut stack, "Int");
        let subst: SortSubst = [("X".to_string(), int)].into_iter().collect();
        let r = stack.replace(&s, &subst);
        assert_eq!(r.to_string(), "(Array Int (List Y))");
    }

    #[test]
    fn test_check_sort() {
        let mut stack = SymbolStack::new();
        declare_sort(&mut stack, "Int", 0);
        declare_sort(&mut stack, "Array", 2);
        let mut diag = Diagnostics::new();
        let n = node();
        let good = UntypedAst.parse_sort_str("(Array Int X)").unwrap();
        assert!(stack.check_sort(&good, &["X".to_string()], &n, &mut diag));
        assert!(diag.is_empty());
        let bad = UntypedAst.parse_sort_str("(Array Int Foo Int)").unwrap();
        assert!(!stack.check_sort(&bad, &[], &n, &mut diag));
        assert_eq!(
            diag.messages(),
            vec![
                "Sort 'Array' expects 2 argument(s), but got 3",
                "Unknown sort 'Foo'"
            ]
        );
    }
}
