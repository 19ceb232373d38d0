// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use smtlib_sortcheck::checker::{Context, SortednessChecker};
use smtlib_sortcheck::config::Config;
use smtlib_sortcheck::diagnostics::Diagnostics;
use smtlib_sortcheck::untyped::UntypedAst;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A directory holding both theories and logics, seeded with the core theory
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let core = Path::new(env!("CARGO_MANIFEST_DIR")).join("theories/Core.smt2");
        fs::copy(core, dir.path().join("Core.smt2")).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{}.smt2", name))
    }

    fn write(&self, name: &str, text: &str) -> &Self {
        fs::write(self.path(name), text).unwrap();
        self
    }

    fn context(&self) -> Context {
        Context::new(
            Config::default()
                .with_theories_dir(self.dir.path())
                .with_logics_dir(self.dir.path()),
        )
    }

    fn check_in(&self, ctx: &mut Context, src: &str, file: Option<&str>) -> Diagnostics {
        let mut diag = Diagnostics::new();
        let root = UntypedAst.parse_str(src, file).unwrap();
        SortednessChecker::new(ctx, &mut diag).check(&root);
        diag
    }

    fn messages(&self, src: &str) -> Vec<String> {
        let diag = self.check_in(&mut self.context(), src, None);
        diag.messages().into_iter().map(String::from).collect()
    }
}

#[test]
fn test_indexed_symbols_and_spec_constants() {
    let fx = Fixture::new();
    fx.write(
        "FixedBV",
        r#"
(theory FixedBV
 :sorts (((_ BitVec 8) 0) ((_ BitVec 4) 0) ((_ BitVec 1) 0))
 :funs ((#b0 (_ BitVec 1))
        (#b1 (_ BitVec 1))
        (#x0f (_ BitVec 8))
        ((_ extract 3 0) (_ BitVec 8) (_ BitVec 4))
        (bvadd (_ BitVec 8) (_ BitVec 8) (_ BitVec 8) :left-assoc)))
"#,
    )
    .write("FBV", "(logic FBV :theories (Core FixedBV))");

    let msgs = fx.messages(
        r#"
        (set-logic FBV)
        (declare-const v (_ BitVec 8))
        (assert (= ((_ extract 3 0) (bvadd v #x0f v)) ((_ extract 3 0) v)))
        (assert (distinct #b0 #b1))
        (assert (= #b10 #b1))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "No sort declared for literals of kind #b10",
            "Asserted term is not well-sorted",
        ]
    );
}

#[test]
fn test_operator_shapes() {
    let fx = Fixture::new();
    let mut ctx = fx.context();
    let diag = fx.check_in(
        &mut ctx,
        r#"
(theory Shapes
 :sorts ((U 0))
 :funs ((NUMERAL U)
        (NUMERAL U)
        (#b0 U)
        (#b0 U)
        (f U U U :left-assoc :right-assoc)
        (g U U U :chainable)
        (h U U Bool :chainable :pairwise)
        (k Bool U U :left-assoc)
        (m U U U U :left-assoc)))
"#,
        None,
    );
    assert_eq!(
        diag.messages(),
        vec![
            "A sort for NUMERAL literals was already declared",
            "Specification constant '#b0' already exists",
            "Function 'f' cannot be both left- and right-associative",
            "Function 'g' is chainable, but its return sort is not Bool",
            "Function 'h' cannot be both chainable and pairwise",
            "Function 'k' is left-associative, but its first argument sort differs from its return sort",
            "Function 'm' is left-associative, but it does not take exactly 2 arguments",
        ]
    );

    // the invalid attributes were dropped, so `f` only takes two arguments and `m` three
    let diag = fx.check_in(
        &mut ctx,
        r#"
        (declare-const a U)
        (assert (= (f a a) a))
        (assert (= (f a a a) a))
        (assert (= (m a a a) a))
        (assert (= (m a a a a) a))
    "#,
        None,
    );
    assert_eq!(
        diag.messages(),
        vec![
            "No declarations for function symbol 'f' with argument sorts (U, U, U)",
            "Asserted term is not well-sorted",
            "No declarations for function symbol 'm' with argument sorts (U, U, U, U)",
            "Asserted term is not well-sorted",
        ]
    );
}

#[test]
fn test_load_failures() {
    let fx = Fixture::new();
    fx.write("T", "(theory T :sorts ((U 0)))")
        .write("NotTheory", "(logic NotTheory :theories (Core))")
        .write("Garbled", "(theory Garbled :sorts ((U 0))")
        .write("Broken", "(theory Broken :funs ((par () (f Bool Bool))))")
        .write("Missing", "(logic Missing :theories (Core Nope))")
        .write("Wrong", "(logic Wrong :theories (NotTheory))")
        .write("Unparsable", "(logic Unparsable :theories (Garbled))")
        .write("Twice", "(logic Twice :theories (Core T T))")
        .write("Syntax", "(logic Syntax :theories (Broken))");

    assert_eq!(fx.messages("(set-logic Missing)"), vec!["Unknown theory 'Nope'"]);
    assert_eq!(
        fx.messages("(set-logic Wrong)"),
        vec!["Theory 'NotTheory' could not be loaded"]
    );
    assert_eq!(
        fx.messages("(set-logic Unparsable)"),
        vec!["Theory 'Garbled' could not be loaded"]
    );
    assert_eq!(
        fx.messages("(set-logic Twice)"),
        vec!["Theory 'T' was already loaded"]
    );
    assert_eq!(
        fx.messages("(set-logic Syntax)"),
        vec![
            "Empty sort parameter list",
            "Theory 'Broken' could not be loaded"
        ]
    );
}

#[test]
fn test_loaded_theories() {
    let fx = Fixture::new();
    fx.write("T", "(theory T :sorts ((U 0)))")
        .write("L", "(logic L :theories (Core T))");
    let mut ctx = fx.context();
    let diag = fx.check_in(&mut ctx, "(set-logic L)\n(declare-const u U)", None);
    assert!(diag.is_empty());
    assert_eq!(ctx.logic.as_deref(), Some("L"));
    assert_eq!(ctx.theories, vec!["Core", "T"]);
    assert!(ctx.core_loaded);
}

#[test]
fn test_report_across_files() {
    let fx = Fixture::new();
    fx.write("T", "(theory T :sorts ((U 0)))")
        .write("L", "(logic L :theories (Core T))");
    let diag = fx.check_in(
        &mut fx.context(),
        "(set-logic L)\n(declare-sort U 0)",
        Some("main.smt2"),
    );
    assert_eq!(
        diag.report(),
        format!(
            "--------------------\n\
             In file 'main.smt2':\n\
             --------------------\n\
             2:1 - 2:18   (declare-sort U 0)\n\
             \tSort symbol 'U' already exists.\n\
             \t\tPreviously, in file '{}'\n\
             \t\t1:19 - 1:23   (U 0)\n\
             \n\n",
            fx.path("T").display()
        )
    );
}
