// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The syntax checker
//!
//! The builder accepts every form that has the right shape; this pass rejects what the SMT-LIB
//! grammar rules out beyond shapes: bad characters in symbols, empty binder lists, unused or
//! applied sort parameters, mismatched declaration counts, and ill-typed option and attribute
//! values. Findings go to the same [Diagnostics] as those of the sortedness checker.

use crate::ast::{alg, u, NodeRef, SymbolQuote};
use crate::diagnostics::{msg, Diagnostics};
use crate::statics::{
    BOOLEAN_OPTIONS, KEYWORD_RE, KW_DEFINITION, KW_EXTENSIONS, KW_FUNS, KW_FUNS_DESC, KW_LANGUAGE,
    KW_NOTES, KW_SORTS, KW_SORTS_DESC, KW_THEORIES, KW_VALUES, NUMERAL_OPTIONS, STRING_OPTIONS,
};
use crate::traits::Repr;
use dashu::integer::UBig;
use std::collections::HashSet;

/// printable, white space or non-ASCII; never `\` nor `|`
fn valid_char(c: char) -> bool {
    let code = c as u32;
    ((32..=126).contains(&code) || 128 <= code || c.is_ascii_whitespace()) && c != '\\' && c != '|'
}

/// the symbols occurring more than once, each reported once
fn duplicates<'b>(names: impl IntoIterator<Item = &'b u::Str>) -> Vec<&'b u::Str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    names
        .into_iter()
        .filter(|n| !seen.insert(n.to_string()) && reported.insert(n.to_string()))
        .collect()
}

pub struct SyntaxChecker<'a> {
    diag: &'a mut Diagnostics,
}

impl<'a> SyntaxChecker<'a> {
    pub fn new(diag: &'a mut Diagnostics) -> Self {
        Self { diag }
    }

    /// Check a root; true if no message was recorded meanwhile.
    pub fn check(&mut self, root: &u::Root) -> bool {
        let before = self.diag.error_count();
        match root {
            u::Root::Script(s) => {
                for c in s.commands() {
                    self.check_command(c);
                }
            }
            u::Root::Theory(t) => self.check_theory(t),
            u::Root::Logic(l) => self.check_logic(l),
        }
        self.diag.error_count() == before
    }

    fn symbol(&mut self, s: &u::Str) {
        if s.contains(|c| !valid_char(c)) {
            self.diag.add(&s.node_ref(), msg::symbol_invalid(s.as_str()));
        }
    }

    fn keyword(&mut self, k: &u::Str) {
        if !KEYWORD_RE.is_match(k) {
            self.diag.add(&k.node_ref(), msg::keyword_invalid(k.as_str()));
        }
    }

    fn identifier(&mut self, id: &u::Identifier) {
        self.symbol(&id.symbol);
        for i in &id.indices {
            if let alg::Index::Symbol(s) = i {
                self.symbol(s);
            }
        }
    }

    fn sort(&mut self, s: &u::Sort) {
        self.identifier(s.identifier());
        for a in s.args() {
            self.sort(a);
        }
    }

    fn sexpr(&mut self, e: &u::SExpr) {
        match e {
            alg::SExpr::Constant(_) => {}
            alg::SExpr::Symbol(s) => self.symbol(s),
            alg::SExpr::Keyword(k) => self.keyword(k),
            alg::SExpr::List(es) => {
                for e in es {
                    self.sexpr(e);
                }
            }
        }
    }

    fn attribute(&mut self, a: &u::Attribute) {
        self.keyword(&a.keyword);
        match &a.value {
            Some(alg::AttributeValue::Symbol(s)) => self.symbol(s),
            Some(alg::AttributeValue::List(es)) => {
                for e in es {
                    self.sexpr(e);
                }
            }
            Some(alg::AttributeValue::Constant(_)) | None => {}
        }
    }

    fn no_duplicates<'b>(&mut self, node: &NodeRef, names: impl IntoIterator<Item = &'b u::Str>) {
        for d in duplicates(names) {
            self.diag.add(node, msg::binder_duplicated(&d.sym_quote()));
        }
    }

    /// Every sort parameter must occur in one of `sorts`, and never with arguments.
    fn sort_params<'b>(
        &mut self,
        node: &NodeRef,
        params: &[u::Str],
        sorts: impl IntoIterator<Item = &'b u::Sort>,
    ) {
        for d in duplicates(params) {
            self.diag.add(node, msg::sort_param_duplicated(&d.sym_quote()));
        }
        let mut used = HashSet::new();
        for s in sorts {
            self.param_occurrences(node, params, s, &mut used);
        }
        for p in params {
            if !used.contains(p.as_str()) {
                self.diag.add(node, msg::sort_param_unused(&p.sym_quote()));
            }
        }
    }

    fn param_occurrences(
        &mut self,
        node: &NodeRef,
        params: &[u::Str],
        sort: &u::Sort,
        used: &mut HashSet<String>,
    ) {
        let id = sort.identifier();
        if let Some(p) = params.iter().find(|p| p.as_str() == id.symbol.as_str()) {
            if !id.is_indexed() {
                used.insert(p.to_string());
                if !sort.args().is_empty() {
                    self.diag.add(node, msg::sort_param_applied(&p.sym_quote()));
                }
            }
        }
        for a in sort.args() {
            self.param_occurrences(node, params, a, used);
        }
    }

    fn sorted_vars(&mut self, vars: &[u::SortedVar]) {
        for v in vars {
            self.symbol(&v.0);
            self.sort(&v.1);
        }
    }

    fn datatype(&mut self, node: &NodeRef, dec: &u::DatatypeDec) {
        if dec.is_par && dec.params.is_empty() {
            self.diag.add(node, msg::sort_params_empty());
        }
        if dec.constructors.is_empty() {
            self.diag.add(node, msg::datatype_no_constructor());
        }
        for p in &dec.params {
            self.symbol(p);
        }
        for c in &dec.constructors {
            self.symbol(&c.ctor);
            self.sorted_vars(&c.args);
        }
        if dec.is_par {
            let sorts = dec
                .constructors
                .iter()
                .flat_map(|c| c.args.iter().map(|sel| &sel.1));
            self.sort_params(node, &dec.params, sorts);
        }
    }

    fn function_dec(&mut self, name: &u::Str, vars: &[u::SortedVar], out: &u::Sort) {
        self.symbol(name);
        self.sorted_vars(vars);
        self.sort(out);
    }

    fn check_option(&mut self, node: &NodeRef, a: &u::Attribute) {
        let key = a.keyword.as_str();
        let (ok, expected) = if STRING_OPTIONS.contains(&key) {
            (a.value.as_ref().is_some_and(|v| v.is_string()), "a string")
        } else if NUMERAL_OPTIONS.contains(&key) {
            (
                matches!(
                    a.value,
                    Some(alg::AttributeValue::Constant(alg::Constant::Numeral(_)))
                ),
                "a numeral",
            )
        } else if BOOLEAN_OPTIONS.contains(&key) {
            (
                matches!(&a.value, Some(alg::AttributeValue::Symbol(s)) if s.as_str() == "true" || s.as_str() == "false"),
                "'true' or 'false'",
            )
        } else {
            (true, "")
        };
        if !ok {
            self.diag.add(node, msg::option_value(key, expected));
        }
    }

    pub fn check_command(&mut self, command: &u::Command) {
        let node = command.node_ref();
        match command.repr() {
            alg::Command::Assert(t) => self.check_term(t),
            alg::Command::CheckSatAssuming(ts) => {
                for t in ts {
                    self.check_term(t);
                }
            }
            alg::Command::DeclareConst(name, sort) => {
                self.symbol(name);
                self.sort(sort);
            }
            alg::Command::DeclareDatatype(name, dec) => {
                self.symbol(name);
                self.datatype(&node, dec);
            }
            alg::Command::DeclareDatatypes(sorts, decs) => {
                if sorts.len() != decs.len() {
                    self.diag
                        .add(&node, msg::datatype_count(sorts.len(), decs.len()));
                }
                for (sd, dec) in sorts.iter().zip(decs) {
                    if sd.arity != UBig::from(dec.params.len()) {
                        let message = msg::datatype_arity(
                            &sd.name.sym_quote(),
                            &sd.arity.to_string(),
                            dec.params.len(),
                        );
                        self.diag.add(&node, message);
                    }
                }
                for sd in sorts {
                    self.symbol(&sd.name);
                }
                for dec in decs {
                    self.datatype(&node, dec);
                }
            }
            alg::Command::DeclareFun(name, args, ret) => {
                self.symbol(name);
                for s in args.iter().chain(std::iter::once(ret)) {
                    self.sort(s);
                }
            }
            alg::Command::DeclareSort(name, _) => self.symbol(name),
            alg::Command::DefineConst(name, sort, body) => {
                self.function_dec(name, &[], sort);
                self.check_term(body);
            }
            alg::Command::DefineFun(def) | alg::Command::DefineFunRec(def) => {
                self.function_dec(&def.name, &def.vars, &def.out_sort);
                self.check_term(&def.body);
            }
            alg::Command::DefineFunsRec(decs, bodies) => {
                if decs.is_empty() {
                    self.diag.add(&node, msg::funs_rec_empty());
                } else if decs.len() != bodies.len() {
                    self.diag
                        .add(&node, msg::funs_rec_count(decs.len(), bodies.len()));
                }
                for d in decs {
                    self.function_dec(&d.name, &d.vars, &d.out_sort);
                }
                for b in bodies {
                    self.check_term(b);
                }
            }
            alg::Command::DefineSort(name, params, sort) => {
                self.symbol(name);
                for p in params {
                    self.symbol(p);
                }
                self.sort(sort);
                self.sort_params(&node, params, std::iter::once(sort));
            }
            alg::Command::Echo(s) => {
                if s.is_empty() {
                    self.diag.add(&node, msg::echo_empty());
                }
            }
            alg::Command::GetInfo(k) | alg::Command::GetOption(k) => self.keyword(k),
            alg::Command::GetValue(ts) => {
                if ts.is_empty() {
                    self.diag.add(&node, msg::get_value_empty());
                }
                for t in ts {
                    self.check_term(t);
                }
            }
            alg::Command::SetInfo(a) => self.attribute(a),
            alg::Command::SetLogic(name) => self.symbol(name),
            alg::Command::SetOption(a) => {
                self.attribute(a);
                self.check_option(&node, a);
            }
            alg::Command::CheckSat
            | alg::Command::Exit
            | alg::Command::GetAssertions
            | alg::Command::GetAssignment
            | alg::Command::GetModel
            | alg::Command::GetProof
            | alg::Command::GetUnsatAssumptions
            | alg::Command::GetUnsatCore
            | alg::Command::Pop(_)
            | alg::Command::Push(_)
            | alg::Command::Reset
            | alg::Command::ResetAssertions => {}
        }
    }

    fn qual_identifier(&mut self, qid: &u::QualifiedIdentifier) {
        self.identifier(&qid.0);
        if let Some(s) = &qid.1 {
            self.sort(s);
        }
    }

    pub fn check_term(&mut self, term: &u::Term) {
        let node = term.node_ref();
        match term.repr() {
            alg::Term::Constant(_) => {}
            alg::Term::Identifier(qid) => self.qual_identifier(qid),
            alg::Term::App(qid, args) => {
                self.qual_identifier(qid);
                for a in args {
                    self.check_term(a);
                }
            }
            alg::Term::Let(bindings, body) => {
                if bindings.is_empty() {
                    self.diag.add(&node, msg::binders_empty("let"));
                }
                self.no_duplicates(&node, bindings.iter().map(|b| &b.0));
                for b in bindings {
                    self.symbol(&b.0);
                    self.check_term(&b.1);
                }
                self.check_term(body);
            }
            alg::Term::Forall(vars, body) | alg::Term::Exists(vars, body) => {
                if vars.is_empty() {
                    let q = if matches!(term.repr(), alg::Term::Forall(..)) {
                        "forall"
                    } else {
                        "exists"
                    };
                    self.diag.add(&node, msg::binders_empty(q));
                }
                self.no_duplicates(&node, vars.iter().map(|v| &v.0));
                self.sorted_vars(vars);
                self.check_term(body);
            }
            alg::Term::Matching(scrutinee, arms) => {
                if arms.is_empty() {
                    self.diag.add(&node, msg::match_no_case());
                }
                self.check_term(scrutinee);
                for arm in arms {
                    self.pattern(&node, &arm.pattern);
                    self.check_term(&arm.body);
                }
            }
            alg::Term::Annotated(t, attributes) => {
                if attributes.is_empty() {
                    self.diag.add(&node, msg::annotation_empty());
                }
                self.check_term(t);
                for a in attributes {
                    self.attribute(a);
                }
            }
        }
    }

    fn pattern(&mut self, node: &NodeRef, pattern: &u::Pattern) {
        match pattern {
            alg::Pattern::Symbol(s) => self.symbol(s),
            alg::Pattern::Qualified(s, sort) => {
                self.symbol(s);
                self.sort(sort);
            }
            alg::Pattern::Applied {
                ctor,
                sort,
                arguments,
            } => {
                self.symbol(ctor);
                if let Some(s) = sort {
                    self.sort(s);
                }
                if arguments.is_empty() {
                    self.diag
                        .add(node, msg::pattern_no_binder(&ctor.sym_quote()));
                }
                self.no_duplicates(node, arguments);
                for a in arguments {
                    self.symbol(a);
                }
            }
        }
    }

    /// `:sorts`, `:funs` and `:theories` only stay generic when their value has the wrong shape.
    fn structured_attribute(&mut self, node: &NodeRef, a: &u::Attribute, what: &str) {
        self.diag
            .add(node, msg::attribute_list(a.keyword.as_str(), what));
    }

    fn string_attribute(&mut self, node: &NodeRef, a: &u::Attribute) {
        if !a.value.as_ref().is_some_and(|v| v.is_string()) {
            self.diag.add(node, msg::attribute_string(a.keyword.as_str()));
        }
    }

    pub fn check_theory(&mut self, theory: &u::Theory) {
        self.symbol(&theory.name);
        if theory.attributes.is_empty() {
            self.diag.add(
                &theory.node_ref(),
                msg::theory_no_attributes(&theory.name.sym_quote()),
            );
        }
        for attr in &theory.attributes {
            let node = attr.node_ref();
            match attr.repr() {
                alg::TheoryAttribute::Sorts(decs) => {
                    for d in decs {
                        self.identifier(&d.identifier);
                        for a in &d.attributes {
                            self.attribute(a);
                        }
                    }
                }
                alg::TheoryAttribute::Funs(decs) => {
                    for d in decs {
                        self.fun_symbol_dec(d);
                    }
                }
                alg::TheoryAttribute::Other(a) => {
                    self.attribute(a);
                    let key = a.keyword.as_str();
                    if key == KW_SORTS {
                        self.structured_attribute(&node, a, "sort symbol declarations");
                    } else if key == KW_FUNS {
                        self.structured_attribute(&node, a, "function symbol declarations");
                    } else if [KW_SORTS_DESC, KW_FUNS_DESC, KW_DEFINITION, KW_VALUES, KW_NOTES]
                        .contains(&key)
                    {
                        self.string_attribute(&node, a);
                    }
                }
            }
        }
    }

    fn fun_symbol_dec(&mut self, dec: &u::FunSymbolDec) {
        let node = dec.node_ref();
        for a in dec.attributes() {
            self.attribute(a);
        }
        match dec.repr() {
            alg::FunSymbolDec::SpecConst { sort, .. }
            | alg::FunSymbolDec::MetaSpecConst { sort, .. } => self.sort(sort),
            alg::FunSymbolDec::Simple {
                identifier,
                signature,
                ..
            } => {
                self.identifier(identifier);
                for s in signature {
                    self.sort(s);
                }
            }
            alg::FunSymbolDec::Parametric {
                params,
                identifier,
                signature,
                ..
            } => {
                if params.is_empty() {
                    self.diag.add(&node, msg::sort_params_empty());
                }
                for p in params {
                    self.symbol(p);
                }
                self.identifier(identifier);
                for s in signature {
                    self.sort(s);
                }
                self.sort_params(&node, params, signature);
            }
        }
    }

    pub fn check_logic(&mut self, logic: &u::Logic) {
        self.symbol(&logic.name);
        if logic.attributes.is_empty() {
            self.diag.add(
                &logic.node_ref(),
                msg::logic_no_attributes(&logic.name.sym_quote()),
            );
        }
        for attr in &logic.attributes {
            let node = attr.node_ref();
            match attr.repr() {
                alg::LogicAttribute::Theories(names) => {
                    for n in names {
                        self.symbol(n);
                    }
                }
                alg::LogicAttribute::Other(a) => {
                    self.attribute(a);
                    let key = a.keyword.as_str();
                    if key == KW_THEORIES {
                        self.structured_attribute(&node, a, "theory names");
                    } else if [KW_LANGUAGE, KW_EXTENSIONS, KW_VALUES, KW_NOTES].contains(&key) {
                        self.string_attribute(&node, a);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::untyped::UntypedAst;

    fn messages(src: &str) -> Vec<String> {
        let root = UntypedAst.parse_str(src, None).unwrap();
        let mut diag = Diagnostics::new();
        let ok = SyntaxChecker::new(&mut diag).check(&root);
        assert_eq!(ok, diag.is_empty());
        diag.messages().into_iter().map(String::from).collect()
    }

    #[test]
    fn test_valid_char() {
        assert!(valid_char('a'));
        assert!(valid_char(' '));
        assert!(valid_char('λ'));
        assert!(!valid_char('\\'));
        assert!(!valid_char('|'));
        assert!(!valid_char('\u{7}'));
    }

    #[test]
    fn test_clean_script() {
        assert!(messages(
            r#"
(declare-datatypes ((List 1)) ((par (T) ((nil) (cons (head T) (tail (List T)))))))
(define-sort Pair (X Y) (Array X Y))
(assert (let ((x 1) (y 2)) (forall ((z Int)) (! (> z x y) :named foo))))
(set-option :print-success true)
(get-value (1))
"#
        )
        .is_empty());
    }

    #[test]
    fn test_sort_params() {
        assert_eq!(
            messages("(define-sort F (X Y) (Array X X))"),
            vec!["Unused sort parameter 'Y'"]
        );
        assert_eq!(
            messages("(define-sort F (X) (X Int))"),
            vec!["Sort parameter 'X' cannot be applied to arguments"]
        );
        assert_eq!(
            messages("(declare-datatype D (par (A B) ((mk (f A)))))"),
            vec!["Unused sort parameter 'B'"]
        );
    }

    #[test]
    fn test_binders() {
        assert_eq!(
            messages("(assert (let ((x 1) (x 2)) x))"),
            vec!["Duplicated bound symbol 'x'"]
        );
        assert_eq!(
            messages("(assert (exists () true))"),
            vec!["'exists' expects at least one binding"]
        );
        assert_eq!(
            messages("(assert (match x (((cons h h) h))))"),
            vec!["Duplicated bound symbol 'h'"]
        );
    }

    #[test]
    fn test_declaration_counts() {
        assert_eq!(
            messages("(declare-datatypes ((A 0) (B 0)) (((a))))"),
            vec!["2 sort(s) are declared, but 1 datatype(s) are defined"]
        );
        assert_eq!(
            messages("(declare-datatypes ((A 1)) (((a))))"),
            vec!["Sort 'A' is declared with arity 1, but its datatype has 0 parameter(s)"]
        );
    }

    #[test]
    fn test_options() {
        assert_eq!(
            messages("(set-option :random-seed true)\n(set-option :produce-models 1)"),
            vec![
                "Option ':random-seed' expects a numeral",
                "Option ':produce-models' expects 'true' or 'false'"
            ]
        );
    }

    #[test]
    fn test_theory_attributes() {
        assert_eq!(
            messages("(theory T :sorts () :notes 1)"),
            vec![
                "Attribute ':sorts' expects a non-empty list of sort symbol declarations",
                "Attribute ':notes' expects a string"
            ]
        );
        assert_eq!(
            messages("(theory T :funs ((par (A) (f Int Int))))"),
            vec!["Unused sort parameter 'A'"]
        );
    }
}
