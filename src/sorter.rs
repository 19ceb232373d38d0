// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Sort inference of terms
//!
//! [TermSorter::infer] computes the sort of a term in the current environment. Failures are
//! recorded in the diagnostic sink and yield `None`; the enclosing term then gives up without
//! reporting again.

use crate::ast::{
    alg, sort_unification, subst_missed_vars, u, NodeRef, Sort, SortSubst, SymbolQuote,
};
use crate::diagnostics::{msg, Diagnostics};
use crate::stack::SymbolStack;
use crate::statics::{META_DECIMAL, META_NUMERAL, META_STRING};
use crate::symbols::{Assoc, FunInfo, VarInfo};
use crate::traits::Repr;
use std::rc::Rc;

pub struct TermSorter<'a> {
    stack: &'a mut SymbolStack,
    diag: &'a mut Diagnostics,
}

fn names(sorts: &[Sort]) -> Vec<String> {
    sorts.iter().map(|s| s.to_string()).collect()
}

/// The argument sorts `info` takes when applied to `n` arguments, following its associativity
/// or chaining attribute.
fn effective_args(info: &FunInfo, n: usize) -> Vec<Sort> {
    if n < 2 || info.args.len() != 2 {
        return info.args.clone();
    }
    let (a, b) = (&info.args[0], &info.args[1]);
    match (info.assoc, info.chain) {
        (Some(Assoc::Left), _) => std::iter::once(a.clone())
            .chain(std::iter::repeat_n(b.clone(), n - 1))
            .collect(),
        (Some(Assoc::Right), _) => std::iter::repeat_n(a.clone(), n - 1)
            .chain(std::iter::once(b.clone()))
            .collect(),
        (None, Some(_)) => vec![a.clone(); n],
        (None, None) => info.args.clone(),
    }
}

impl<'a> TermSorter<'a> {
    pub fn new(stack: &'a mut SymbolStack, diag: &'a mut Diagnostics) -> Self {
        Self { stack, diag }
    }

    /// Compute the sort of a term
    pub fn infer(&mut self, term: &u::Term) -> Option<Sort> {
        let node = term.node_ref();
        match term.repr() {
            alg::Term::Constant(c) => self.infer_constant(&node, c),
            alg::Term::Identifier(qid) => match qid.ascription() {
                None => self.infer_symbol(&node, &qid.0),
                Some(s) => self.infer_ascribed_constant(&node, &qid.0, s),
            },
            alg::Term::App(qid, args) => self.infer_app(&node, qid, args),
            alg::Term::Let(bindings, body) => self.infer_let(bindings, body),
            alg::Term::Forall(vars, body) | alg::Term::Exists(vars, body) => {
                self.infer_quantified(&node, vars, body)
            }
            alg::Term::Matching(scrutinee, arms) => self.infer_match(&node, scrutinee, arms),
            alg::Term::Annotated(t, _) => self.infer(t),
        }
    }

    /// Literals take the sort declared for their kind: `NUMERAL`, `DECIMAL` and `STRING` for
    /// numerals, decimals and strings, and the literal itself for `#x` and `#b` literals.
    fn infer_constant(&mut self, node: &NodeRef, c: &u::Constant) -> Option<Sort> {
        let kind = match c {
            alg::Constant::Numeral(_) => META_NUMERAL.to_string(),
            alg::Constant::Decimal(_) => META_DECIMAL.to_string(),
            alg::Constant::String(_) => META_STRING.to_string(),
            alg::Constant::Binary(_) | alg::Constant::Hexadecimal(_) => c.to_string(),
        };
        let sorts: Vec<Sort> = self
            .stack
            .get_fun_info(&kind)
            .iter()
            .filter(|f| f.is_constant())
            .map(|f| f.ret.clone())
            .collect();
        match sorts.as_slice() {
            [s] => Some(s.clone()),
            [] => {
                self.diag.add(node, msg::literal_unknown_sort(&kind));
                None
            }
            _ => {
                self.diag
                    .add(node, msg::literal_multiple_sorts(&kind, &names(&sorts)));
                None
            }
        }
    }

    fn infer_symbol(&mut self, node: &NodeRef, id: &u::Identifier) -> Option<Sort> {
        let name = id.to_string();
        if !id.is_indexed() {
            if let Some(v) = self.stack.get_var_info(&name) {
                return Some(v.sort.clone());
            }
        }
        let sorts: Vec<Sort> = self
            .stack
            .get_fun_info(&name)
            .iter()
            .filter(|f| f.is_constant())
            .map(|f| f.ret.clone())
            .collect();
        match sorts.as_slice() {
            [s] => Some(s.clone()),
            [] => {
                self.diag.add(node, msg::const_unknown(&name));
                None
            }
            _ => {
                self.diag
                    .add(node, msg::const_multiple_sorts(&name, &names(&sorts)));
                None
            }
        }
    }

    /// `(as c S)`: the first nullary declaration of `c` whose return sort is, or can be
    /// instantiated to, `S`
    fn infer_ascribed_constant(
        &mut self,
        node: &NodeRef,
        id: &u::Identifier,
        ascription: &u::Sort,
    ) -> Option<Sort> {
        self.stack.check_sort(ascription, &[], node, self.diag);
        let expected = self.stack.resolve(ascription, &[]);
        let name = id.to_string();
        let mut candidates = vec![];
        for info in self.stack.get_fun_info(&name) {
            if !info.args.is_empty() {
                continue;
            }
            if !info.is_parametric() {
                if info.ret == expected {
                    return Some(expected);
                }
                candidates.push(info.ret.clone());
                continue;
            }
            let mut subst = SortSubst::new();
            if sort_unification(&info.params, &info.ret, &expected, &mut subst)
                && subst_missed_vars(&info.params, &subst).is_empty()
            {
                return Some(self.stack.replace(&info.ret, &subst));
            }
            candidates.push(info.ret.clone());
        }
        if candidates.is_empty() {
            self.diag.add(node, msg::const_unknown(&name));
        } else {
            self.diag.add(
                node,
                msg::const_wrong_sort(&name, &expected.to_string(), &names(&candidates)),
            );
        }
        None
    }

    /// Try to apply `info` to arguments of the given sorts; the (instantiated) return sort is
    /// returned on success. With an ascription, the return sort has to be the ascribed one.
    fn apply(
        &mut self,
        info: &Rc<FunInfo>,
        arg_sorts: &[Sort],
        expected: Option<&Sort>,
    ) -> Option<Sort> {
        let formal = effective_args(info, arg_sorts.len());
        if formal.len() != arg_sorts.len() {
            return None;
        }
        if !info.is_parametric() {
            let fits = formal.iter().zip(arg_sorts).all(|(a, b)| a == b);
            return match expected {
                Some(e) if fits && info.ret != *e => None,
                _ if fits => Some(info.ret.clone()),
                _ => None,
            };
        }
        let mut subst = SortSubst::new();
        let mut fits = formal
            .iter()
            .zip(arg_sorts)
            .all(|(a, b)| sort_unification(&info.params, a, b, &mut subst));
        if let Some(e) = expected {
            // parameters that only occur in the return sort are determined by the ascription
            fits = fits && sort_unification(&info.params, &info.ret, e, &mut subst);
        }
        if !fits || !subst_missed_vars(&info.params, &subst).is_empty() {
            return None;
        }
        let ret = self.stack.replace(&info.ret, &subst);
        match expected {
            Some(e) if ret != *e => None,
            _ => Some(ret),
        }
    }

    fn infer_app(
        &mut self,
        node: &NodeRef,
        qid: &u::QualifiedIdentifier,
        args: &[u::Term],
    ) -> Option<Sort> {
        let mut arg_sorts = Vec::with_capacity(args.len());
        let mut failed = false;
        for a in args {
            match self.infer(a) {
                Some(s) => arg_sorts.push(s),
                None => failed = true,
            }
        }
        if failed {
            return None;
        }

        let name = qid.0.to_string();
        let expected = match qid.ascription() {
            None => None,
            Some(s) => {
                self.stack.check_sort(s, &[], node, self.diag);
                Some(self.stack.resolve(s, &[]))
            }
        };

        let infos = self.stack.get_fun_info(&name);
        let mut rets = vec![];
        for info in &infos {
            if let Some(ret) = self.apply(info, &arg_sorts, expected.as_ref()) {
                if expected.is_some() {
                    // an ascribed application takes the first declaration that fits
                    return Some(ret);
                }
                rets.push(ret);
            }
        }

        let arg_names = names(&arg_sorts);
        match (rets.as_slice(), &expected) {
            ([ret], None) => Some(ret.clone()),
            ([], None) => {
                self.diag
                    .add(node, msg::fun_unknown_decl(&name, &arg_names, None));
                None
            }
            (_, None) => {
                self.diag.add(
                    node,
                    msg::fun_multiple_decls(&name, &arg_names, &names(&rets)),
                );
                None
            }
            (_, Some(e)) => {
                self.diag.add(
                    node,
                    msg::fun_unknown_decl(&name, &arg_names, Some(&e.to_string())),
                );
                None
            }
        }
    }

    /// All bindings are sorted before any of them is visible.
    fn infer_let(&mut self, bindings: &[u::LetBinding], body: &u::Term) -> Option<Sort> {
        let mut sorts = Vec::with_capacity(bindings.len());
        let mut failed = false;
        for b in bindings {
            match self.infer(&b.1) {
                Some(s) => sorts.push(s),
                None => failed = true,
            }
        }
        if failed {
            return None;
        }
        self.stack.push();
        for (b, s) in bindings.iter().zip(sorts) {
            self.stack
                .try_add(VarInfo::new(b.0.sym_quote(), s, b.0.node_ref()));
        }
        let ret = self.infer(body);
        self.stack.pop();
        ret
    }

    fn infer_quantified(
        &mut self,
        node: &NodeRef,
        vars: &[u::SortedVar],
        body: &u::Term,
    ) -> Option<Sort> {
        self.stack.push();
        for v in vars {
            self.stack.check_sort(&v.1, &[], node, self.diag);
            let sort = self.stack.resolve(&v.1, &[]);
            self.stack
                .try_add(VarInfo::new(v.0.sym_quote(), sort, v.0.node_ref()));
        }
        let ret = match self.infer(body) {
            Some(s) if s.is_bool() => Some(s),
            Some(s) => {
                self.diag.add(
                    node,
                    msg::quant_term_wrong_sort(&body.to_string(), &s.to_string()),
                );
                None
            }
            None => None,
        };
        self.stack.pop();
        ret
    }

    fn infer_match(
        &mut self,
        node: &NodeRef,
        scrutinee: &u::Term,
        arms: &[u::PatternArm],
    ) -> Option<Sort> {
        let sort = self.infer(scrutinee)?;
        let mut case_sorts = vec![];
        for (i, arm) in arms.iter().enumerate() {
            if let Some(s) = self.infer_arm(node, &sort, arm, i + 1 == arms.len()) {
                case_sorts.push(s);
            }
        }
        if case_sorts.len() != arms.len() {
            return None;
        }
        let first = case_sorts.first()?.clone();
        if case_sorts.iter().all(|s| *s == first) {
            Some(first)
        } else {
            self.diag.add(node, msg::cases_mismatch(&names(&case_sorts)));
            None
        }
    }

    /// Sort the body of one case; the constructor of the pattern is looked up among the
    /// functions returning the sort of the scrutinee. A bare symbol in the last case that names
    /// no constructor is a variable catching everything.
    fn infer_arm(
        &mut self,
        node: &NodeRef,
        sort: &Sort,
        arm: &u::PatternArm,
        last: bool,
    ) -> Option<Sort> {
        let no_binders: &[u::Str] = &[];
        let (ctor, qualifier, binders) = match &arm.pattern {
            alg::Pattern::Symbol(s) => (s, None, no_binders),
            alg::Pattern::Qualified(s, q) => (s, Some(q), no_binders),
            alg::Pattern::Applied {
                ctor,
                sort,
                arguments,
            } => (ctor, sort.as_ref(), arguments.as_slice()),
        };
        if let Some(q) = qualifier {
            let q = self.stack.resolve(q, &[]);
            if q != *sort {
                self.diag.add(
                    node,
                    msg::pattern_mismatch(&sort.to_string(), &arm.pattern.to_string()),
                );
                return None;
            }
        }

        let name = ctor.sym_quote();
        let mut matches = vec![];
        for info in self.stack.get_fun_info(&name) {
            if info.args.len() != binders.len() {
                continue;
            }
            let mut subst = SortSubst::new();
            if sort_unification(&info.params, &info.ret, sort, &mut subst)
                && subst_missed_vars(&info.params, &subst).is_empty()
            {
                matches.push((info, subst));
            }
        }

        match matches.as_slice() {
            [] if last && matches!(arm.pattern, alg::Pattern::Symbol(_)) => {
                self.stack.push();
                self.stack
                    .try_add(VarInfo::new(name, sort.clone(), ctor.node_ref()));
                let ret = self.infer(&arm.body);
                self.stack.pop();
                ret
            }
            [] => {
                self.diag.add(
                    node,
                    msg::constructor_unknown(&name, binders.len(), &sort.to_string()),
                );
                None
            }
            [(info, subst)] => {
                self.stack.push();
                for (b, a) in binders.iter().zip(info.args.iter()) {
                    let s = self.stack.replace(a, subst);
                    self.stack
                        .try_add(VarInfo::new(b.sym_quote(), s, b.node_ref()));
                }
                let ret = self.infer(&arm.body);
                self.stack.pop();
                ret
            }
            _ => {
                self.diag.add(
                    node,
                    msg::constructor_multiple(&name, binders.len(), &sort.to_string()),
                );
                None
            }
        }
    }

    /// Check that a term is a well-sorted formula. The messages for an ill-sorted and for a
    /// non-Boolean term are built by the caller.
    pub fn check_bool(
        &mut self,
        term: &u::Term,
        node: &NodeRef,
        not_well_sorted: impl FnOnce() -> String,
        not_bool: impl FnOnce(&str) -> String,
    ) -> bool {
        match self.infer(term) {
            Some(s) if s.is_bool() => true,
            Some(s) => {
                self.diag.add(node, not_bool(&s.to_string()));
                false
            }
            None => {
                self.diag.add(node, not_well_sorted());
                false
            }
        }
    }
}
