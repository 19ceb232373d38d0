// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The sortedness checker
//!
//! [SortednessChecker] walks scripts, theories and logics once, from left to right. Every
//! declaration is checked and entered into the symbol environment of the [Context]; every term is
//! sorted by a [TermSorter]. Problems are recorded and checking goes on with the next command.

mod loader;

use crate::ast::{
    alg, u, NodeRef, ObjectAllocatorExt, Sort, SortAllocator, StrAllocator, SymbolQuote,
};
use crate::config::Config;
use crate::diagnostics::{msg, Diagnostics};
use crate::sorter::TermSorter;
use crate::stack::SymbolStack;
use crate::statics::{KW_CHAINABLE, KW_LEFT_ASSOC, KW_PAIRWISE, KW_RIGHT_ASSOC, THEORY_CORE};
use crate::symbols::{Assoc, Chain, FunInfo, SortInfo, SymbolInfo, VarInfo};
use crate::traits::Repr;
use dashu::integer::UBig;
use num_traits::ToPrimitive;
use std::collections::HashSet;
use std::rc::Rc;

/// The environment a check runs in; nested loads of theories and logics share it.
pub struct Context {
    pub stack: SymbolStack,
    /// the logic set by `set-logic`
    pub logic: Option<String>,
    /// the theories loaded so far, in loading order
    pub theories: Vec<String>,
    /// whether the core theory was loaded implicitly
    pub core_loaded: bool,
    /// theories and logics whose loading is under way
    pub(crate) loading: HashSet<String>,
    pub config: Config,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            stack: SymbolStack::new(),
            logic: None,
            theories: vec![],
            core_loaded: false,
            loading: HashSet::new(),
            config,
        }
    }

    /// Forget every declaration and every loaded theory and logic
    pub fn reset(&mut self) {
        self.stack.reset();
        self.logic = None;
        self.theories.clear();
        self.core_loaded = false;
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn to_usize(n: &UBig) -> usize {
    n.to_usize().unwrap_or(usize::MAX)
}

/// The key of a symbol in the environment
fn key(s: &u::Str) -> String {
    s.sym_quote()
}

pub struct SortednessChecker<'a> {
    ctx: &'a mut Context,
    diag: &'a mut Diagnostics,
    core: bool,
}

impl<'a> SortednessChecker<'a> {
    pub fn new(ctx: &'a mut Context, diag: &'a mut Diagnostics) -> Self {
        let core = ctx.config.core_enabled;
        Self { ctx, diag, core }
    }

    /// Decide whether the core theory is loaded before checking; nested loads never load it.
    pub fn with_core(mut self, core: bool) -> Self {
        self.core = core;
        self
    }

    fn sorter(&mut self) -> TermSorter<'_> {
        TermSorter::new(&mut self.ctx.stack, self.diag)
    }

    fn check_sort(&mut self, sort: &u::Sort, params: &[String], node: &NodeRef) -> bool {
        self.ctx.stack.check_sort(sort, params, node, self.diag)
    }

    fn resolve(&mut self, sort: &u::Sort, params: &[String]) -> Sort {
        self.ctx.stack.resolve(sort, params)
    }

    fn try_add(
        &mut self,
        info: impl Into<SymbolInfo>,
        node: &NodeRef,
        message: impl FnOnce() -> String,
    ) {
        if let Some(dup) = self.ctx.stack.try_add(info) {
            self.diag.add_with(node, message(), dup);
        }
    }

    fn load_core(&mut self, node: &NodeRef) {
        if self.core && !self.ctx.core_loaded {
            self.ctx.core_loaded = true;
            self.load_theory(THEORY_CORE, node);
        }
    }

    /// Check a root; true if no message was recorded meanwhile.
    pub fn check(&mut self, root: &u::Root) -> bool {
        let before = self.diag.error_count();
        let is_core = matches!(root, u::Root::Theory(t) if t.name.as_str() == THEORY_CORE);
        if !is_core {
            self.load_core(&root.node_ref());
        }
        match root {
            u::Root::Script(s) => self.check_script(s),
            u::Root::Theory(t) => self.check_theory(t),
            u::Root::Logic(l) => self.check_logic(l),
        }
        self.diag.error_count() == before
    }

    pub fn check_script(&mut self, script: &u::Script) {
        for c in script.commands() {
            self.check_command(c);
        }
    }

    pub fn check_command(&mut self, command: &u::Command) {
        let node = command.node_ref();
        match command.repr() {
            alg::Command::Assert(t) => {
                self.sorter().check_bool(
                    t,
                    &node,
                    msg::assert_term_not_well_sorted,
                    msg::assert_term_not_bool,
                );
            }
            alg::Command::CheckSatAssuming(ts) => {
                for t in ts {
                    self.sorter()
                        .check_bool(t, &node, msg::term_not_well_sorted, msg::term_not_bool);
                }
            }
            alg::Command::DeclareConst(name, sort) => self.declare_fun(&node, name, &[], sort),
            alg::Command::DeclareFun(name, args, ret) => self.declare_fun(&node, name, args, ret),
            alg::Command::DeclareSort(name, arity) => {
                let info = SortInfo::new(key(name), to_usize(arity), node.clone());
                self.try_add(info, &node, || msg::sort_already_exists(&key(name)));
            }
            alg::Command::DeclareDatatype(name, dec) => {
                let sd = alg::SortDec {
                    name: name.clone(),
                    arity: UBig::from(dec.params.len()),
                };
                self.declare_datatypes(&node, &[sd], std::slice::from_ref(dec));
            }
            alg::Command::DeclareDatatypes(sorts, decs) => {
                self.declare_datatypes(&node, sorts, decs)
            }
            alg::Command::DefineConst(name, sort, body) => {
                let def = alg::FunctionDef {
                    name: name.clone(),
                    vars: vec![],
                    out_sort: sort.clone(),
                    body: body.clone(),
                };
                self.define_fun(&node, &def, false);
            }
            alg::Command::DefineFun(def) => self.define_fun(&node, def, false),
            alg::Command::DefineFunRec(def) => self.define_fun(&node, def, true),
            alg::Command::DefineFunsRec(decs, bodies) => self.define_funs_rec(&node, decs, bodies),
            alg::Command::DefineSort(name, params, sort) => {
                let params: Vec<String> = params.iter().map(key).collect();
                self.check_sort(sort, &params, &node);
                let def = self.resolve(sort, &params);
                let info = SortInfo::alias(key(name), params, def, node.clone());
                self.try_add(info, &node, || msg::sort_already_exists(&key(name)));
            }
            alg::Command::GetValue(ts) => {
                for t in ts {
                    if self.sorter().infer(t).is_none() {
                        self.diag.add(&node, msg::term_not_well_sorted());
                    }
                }
            }
            alg::Command::Pop(n) => {
                if !self.ctx.stack.pop_n(to_usize(n)) {
                    self.diag.add(&node, msg::stack_unpoppable(&n.to_string()));
                }
            }
            alg::Command::Push(n) => match n.to_usize() {
                Some(n) => self.ctx.stack.push_n(n),
                None => self.diag.add(&node, msg::stack_unpushable(&n.to_string())),
            },
            alg::Command::Reset => {
                self.ctx.reset();
                self.load_core(&node);
            }
            alg::Command::SetLogic(name) => {
                if let Some(current) = &self.ctx.logic {
                    let message = msg::logic_already_set(current);
                    self.diag.add(&node, message);
                } else {
                    let name = key(name);
                    self.ctx.logic = Some(name.clone());
                    self.load_logic(&name, &node);
                }
            }
            alg::Command::CheckSat
            | alg::Command::Echo(_)
            | alg::Command::Exit
            | alg::Command::GetAssertions
            | alg::Command::GetAssignment
            | alg::Command::GetInfo(_)
            | alg::Command::GetModel
            | alg::Command::GetOption(_)
            | alg::Command::GetProof
            | alg::Command::GetUnsatAssumptions
            | alg::Command::GetUnsatCore
            | alg::Command::ResetAssertions
            | alg::Command::SetInfo(_)
            | alg::Command::SetOption(_) => {}
        }
    }

    fn declare_fun(&mut self, node: &NodeRef, name: &u::Str, args: &[u::Sort], ret: &u::Sort) {
        for s in args.iter().chain(std::iter::once(ret)) {
            self.check_sort(s, &[], node);
        }
        let args = args.iter().map(|s| self.resolve(s, &[])).collect();
        let ret = self.resolve(ret, &[]);
        let info = FunInfo::new(key(name), args, ret, node.clone());
        self.try_add(info, node, || msg::fun_already_exists(&key(name)));
    }

    fn fun_info_of(
        &mut self,
        node: &NodeRef,
        name: &u::Str,
        vars: &[u::SortedVar],
        out: &u::Sort,
    ) -> FunInfo {
        for v in vars {
            self.check_sort(&v.1, &[], node);
        }
        self.check_sort(out, &[], node);
        let args = vars.iter().map(|v| self.resolve(&v.1, &[])).collect();
        let ret = self.resolve(out, &[]);
        FunInfo::new(key(name), args, ret, node.clone())
    }

    /// Sort the body of a function definition in a fresh scope with its variables bound
    fn check_body(
        &mut self,
        node: &NodeRef,
        info: &FunInfo,
        vars: &[u::SortedVar],
        body: &u::Term,
    ) {
        self.ctx.stack.push();
        for (v, s) in vars.iter().zip(info.args.iter()) {
            self.ctx
                .stack
                .try_add(VarInfo::new(key(&v.0), s.clone(), v.0.node_ref()));
        }
        match self.sorter().infer(body) {
            Some(s) if s == info.ret => {}
            Some(s) => self.diag.add(
                node,
                msg::fun_body_wrong_sort(&info.name, &info.ret.to_string(), &s.to_string()),
            ),
            None => self.diag.add(node, msg::fun_body_not_well_sorted(&info.name)),
        }
        self.ctx.stack.pop();
    }

    /// `define-fun` and `define-fun-rec`; only the latter sees itself in its body.
    fn define_fun(&mut self, node: &NodeRef, def: &u::FunctionDef, recursive: bool) {
        let info = self.fun_info_of(node, &def.name, &def.vars, &def.out_sort);
        let info = SymbolInfo::from(info.with_body(def.body.clone()));
        if let Some(dup) = self.ctx.stack.find_duplicate(&info) {
            self.diag
                .add_with(node, msg::fun_already_exists(info.name()), dup);
        }
        let SymbolInfo::Fun(fun) = &info else {
            return;
        };
        if recursive {
            self.ctx.stack.push();
            self.ctx.stack.try_add(info.clone());
        }
        self.check_body(node, fun, &def.vars, &def.body);
        if recursive {
            self.ctx.stack.pop();
        }
        self.ctx.stack.try_add(info);
    }

    fn define_funs_rec(&mut self, node: &NodeRef, decs: &[u::FunctionDec], bodies: &[u::Term]) {
        let mut infos = vec![];
        for (i, dec) in decs.iter().enumerate() {
            let mut info = self.fun_info_of(node, &dec.name, &dec.vars, &dec.out_sort);
            if let Some(body) = bodies.get(i) {
                info = info.with_body(body.clone());
            }
            let info = Rc::new(info);
            if let Some(dup) = self
                .ctx
                .stack
                .find_duplicate(&SymbolInfo::Fun(info.clone()))
            {
                self.diag
                    .add_with(node, msg::fun_already_exists(&info.name), dup);
            }
            infos.push(info);
        }
        self.ctx.stack.push();
        for info in &infos {
            self.ctx.stack.try_add(SymbolInfo::Fun(info.clone()));
        }
        for ((dec, body), info) in decs.iter().zip(bodies).zip(&infos) {
            self.check_body(node, info, &dec.vars, body);
        }
        self.ctx.stack.pop();
        for info in infos {
            self.ctx.stack.try_add(SymbolInfo::Fun(info));
        }
    }

    /// Declare the sorts first, so that the datatypes can refer to each other; then every
    /// constructor, selector and tester.
    fn declare_datatypes(
        &mut self,
        node: &NodeRef,
        sorts: &[u::SortDec],
        decs: &[u::DatatypeDec],
    ) {
        for sd in sorts {
            let info = SortInfo::new(key(&sd.name), to_usize(&sd.arity), node.clone());
            self.try_add(info, node, || msg::sort_already_exists(&key(&sd.name)));
        }
        for (sd, dec) in sorts.iter().zip(decs) {
            let params: Vec<String> = dec.params.iter().map(key).collect();
            let param_sorts = params
                .iter()
                .map(|p| {
                    let p = self.ctx.stack.allocate_str(p);
                    self.ctx.stack.sort0(p)
                })
                .collect();
            let name = self.ctx.stack.allocate_str(sd.name.as_str());
            let dt_sort = self.ctx.stack.sort_n(name, param_sorts);
            let boolean: Sort = self.ctx.stack.bool_sort();

            for ctor in &dec.constructors {
                let mut fields = vec![];
                for sel in &ctor.args {
                    self.check_sort(&sel.1, &params, node);
                    let field = self.resolve(&sel.1, &params);
                    let info =
                        FunInfo::new(key(&sel.0), vec![dt_sort.clone()], field.clone(), node.clone())
                            .with_params(params.clone());
                    self.try_add(info, node, || msg::fun_already_exists(&key(&sel.0)));
                    fields.push(field);
                }
                let name = key(&ctor.ctor);
                let info = FunInfo::new(name.clone(), fields, dt_sort.clone(), node.clone())
                    .with_params(params.clone());
                self.try_add(info, node, || msg::fun_already_exists(&name));
                let tester = format!("(_ is {})", name);
                let info = FunInfo::new(
                    tester.clone(),
                    vec![dt_sort.clone()],
                    boolean.clone(),
                    node.clone(),
                )
                .with_params(params.clone());
                self.try_add(info, node, || msg::fun_already_exists(&tester));
            }
        }
    }

    pub fn check_theory(&mut self, theory: &u::Theory) {
        for attr in &theory.attributes {
            match attr.repr() {
                alg::TheoryAttribute::Sorts(decs) => {
                    for d in decs {
                        let node = d.node_ref();
                        let name = d.identifier.to_string();
                        let mut info =
                            SortInfo::new(name.clone(), to_usize(&d.arity), node.clone());
                        info.attributes = d.attributes.clone();
                        self.try_add(info, &node, || msg::sort_already_exists(&name));
                    }
                }
                alg::TheoryAttribute::Funs(decs) => {
                    for d in decs {
                        self.check_fun_symbol_dec(d);
                    }
                }
                alg::TheoryAttribute::Other(_) => {}
            }
        }
    }

    fn check_fun_symbol_dec(&mut self, dec: &u::FunSymbolDec) {
        let node = dec.node_ref();
        match dec.repr() {
            alg::FunSymbolDec::SpecConst { constant, sort, .. } => {
                self.check_sort(sort, &[], &node);
                let name = constant.to_string();
                let ret = self.resolve(sort, &[]);
                let info = FunInfo::new(name.clone(), vec![], ret, node.clone());
                self.try_add(info, &node, || msg::spec_const_already_exists(&name));
            }
            alg::FunSymbolDec::MetaSpecConst { constant, sort, .. } => {
                self.check_sort(sort, &[], &node);
                let name = constant.name();
                let ret = self.resolve(sort, &[]);
                match self.ctx.stack.get_fun_info(name).into_iter().next() {
                    Some(prev) => self.diag.add_with(
                        &node,
                        msg::meta_spec_const_already_exists(name),
                        SymbolInfo::Fun(prev),
                    ),
                    None => {
                        self.ctx
                            .stack
                            .try_add(FunInfo::new(name.to_string(), vec![], ret, node.clone()));
                    }
                }
            }
            alg::FunSymbolDec::Simple {
                identifier,
                signature,
                attributes,
            } => self.declare_theory_fun(&node, identifier, &[], signature, attributes),
            alg::FunSymbolDec::Parametric {
                params,
                identifier,
                signature,
                attributes,
            } => {
                let params: Vec<String> = params.iter().map(key).collect();
                self.declare_theory_fun(&node, identifier, &params, signature, attributes)
            }
        }
    }

    fn declare_theory_fun(
        &mut self,
        node: &NodeRef,
        identifier: &u::Identifier,
        params: &[String],
        signature: &[u::Sort],
        attributes: &[u::Attribute],
    ) {
        for s in signature {
            self.check_sort(s, params, node);
        }
        let mut sorts: Vec<Sort> = signature.iter().map(|s| self.resolve(s, params)).collect();
        let Some(ret) = sorts.pop() else {
            return;
        };
        let name = identifier.to_string();
        let (assoc, chain) = self.operator_shape(node, &name, &sorts, &ret, attributes);
        let mut info =
            FunInfo::new(name.clone(), sorts, ret, node.clone()).with_params(params.to_vec());
        info.attributes = attributes.to_vec();
        info.assoc = assoc;
        info.chain = chain;
        self.try_add(info, node, || msg::fun_already_exists(&name));
    }

    /// Validate the associativity and chaining attributes of a declaration; invalid ones are
    /// reported and dropped.
    fn operator_shape(
        &mut self,
        node: &NodeRef,
        name: &str,
        args: &[Sort],
        ret: &Sort,
        attributes: &[u::Attribute],
    ) -> (Option<Assoc>, Option<Chain>) {
        let has = |kw: &str| attributes.iter().any(|a| a.is(kw));
        let (left, right) = (has(KW_LEFT_ASSOC), has(KW_RIGHT_ASSOC));
        let (chainable, pairwise) = (has(KW_CHAINABLE), has(KW_PAIRWISE));

        let assoc = match (left, right) {
            (true, true) => {
                self.diag.add(node, msg::left_and_right_assoc(name));
                None
            }
            (true, false) if args.len() != 2 => {
                self.diag.add(node, msg::left_assoc_param_count(name));
                None
            }
            (true, false) if args[0] != *ret => {
                self.diag.add(node, msg::left_assoc_ret_sort(name));
                None
            }
            (true, false) => Some(Assoc::Left),
            (false, true) if args.len() != 2 => {
                self.diag.add(node, msg::right_assoc_param_count(name));
                None
            }
            (false, true) if args[1] != *ret => {
                self.diag.add(node, msg::right_assoc_ret_sort(name));
                None
            }
            (false, true) => Some(Assoc::Right),
            (false, false) => None,
        };

        let chain = match (chainable, pairwise) {
            (true, true) => {
                self.diag.add(node, msg::chainable_and_pairwise(name));
                None
            }
            (false, false) => None,
            (true, false) | (false, true) => {
                let (kind, what) = if chainable {
                    (Chain::Chainable, "chainable")
                } else {
                    (Chain::Pairwise, "pairwise")
                };
                if args.len() != 2 {
                    self.diag.add(node, msg::chain_param_count(what, name));
                    None
                } else {
                    let mut ok = true;
                    if args[0] != args[1] {
                        self.diag.add(node, msg::chain_param_sort(what, name));
                        ok = false;
                    }
                    if !ret.is_bool() {
                        self.diag.add(node, msg::chain_ret_sort(what, name));
                        ok = false;
                    }
                    ok.then_some(kind)
                }
            }
        };
        (assoc, chain)
    }

    pub fn check_logic(&mut self, logic: &u::Logic) {
        for attr in &logic.attributes {
            let alg::LogicAttribute::Theories(names) = attr.repr() else {
                continue;
            };
            let node = attr.node_ref();
            for name in names {
                let name = key(name);
                if self.ctx.theories.contains(&name) {
                    self.diag.add(&node, msg::theory_already_loaded(&name));
                } else if name == THEORY_CORE && self.ctx.core_loaded {
                    // the core theory was loaded implicitly
                    self.ctx.theories.push(name);
                } else {
                    self.ctx.theories.push(name.clone());
                    self.load_theory(&name, &node);
                }
            }
        }
    }
}
