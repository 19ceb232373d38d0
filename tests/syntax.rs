// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use smtlib_sortcheck::diagnostics::Diagnostics;
use smtlib_sortcheck::exec::{ExecError, Execution};
use smtlib_sortcheck::syntax::SyntaxChecker;
use smtlib_sortcheck::untyped::UntypedAst;

fn messages(src: &str) -> Vec<String> {
    let root = UntypedAst.parse_str(src, None).unwrap();
    let mut diag = Diagnostics::new();
    SyntaxChecker::new(&mut diag).check(&root);
    diag.messages().into_iter().map(String::from).collect()
}

#[test]
fn test_commands() {
    let msgs = messages(
        r#"
        (define-funs-rec () ())
        (define-funs-rec ((f () Bool) (g () Bool)) (true))
        (echo "")
        (get-value ())
        (set-option :regular-output-channel stdout)
        (set-option :verbosity 2)
        (set-option :my-own-option anything)
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "At least one function must be defined",
            "2 function(s) are declared, but 1 bodies are given",
            "'echo' expects a non-empty string",
            "'get-value' expects at least one term",
            "Option ':regular-output-channel' expects a string",
        ]
    );
}

#[test]
fn test_terms() {
    let msgs = messages(
        r#"
        (assert (match x ()))
        (assert (! true))
        (assert (forall ((x Int) (y Int) (x Bool)) true))
        (assert (match l (((cons h h) true))))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "'match' expects at least one case",
            "An annotated term expects at least one attribute",
            "Duplicated bound symbol 'x'",
            "Duplicated bound symbol 'h'",
        ]
    );
}

#[test]
fn test_datatypes() {
    let msgs = messages(
        r#"
        (declare-datatype E ())
        (declare-datatype P (par () ((mk (f Int)))))
        (declare-datatype Q (par (X) ((mk (f (X Int))))))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "A datatype needs at least one constructor",
            "Empty sort parameter list",
            "Sort parameter 'X' cannot be applied to arguments",
        ]
    );
}

#[test]
fn test_logic_attributes() {
    let msgs = messages(
        r#"
        (logic L
         :theories ()
         :language 42
         :extensions "none")
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "Attribute ':theories' expects a non-empty list of theory names",
            "Attribute ':language' expects a string",
        ]
    );
}

#[test]
fn test_pipeline_stops_at_syntax() {
    let exec = Execution::default();
    let Err(ExecError::Syntax(report)) =
        exec.check_str("(declare-const x Int)\n(assert (let () x))", None)
    else {
        panic!("expected a syntax failure");
    };
    assert_eq!(
        report,
        "2:9 - 2:18   (let () x)\n\t'let' expects at least one binding.\n\n\n"
    );
}

#[test]
fn test_rendering_reparses() {
    let script = UntypedAst
        .parse_script_str(
            r#"
        (set-logic ALL)
        (declare-datatypes ((List 1) (Pair 0))
          ((par (T) ((nil) (cons (head T) (tail (List T)))))
           ((mk (fst Int) (snd Bool)))))
        (declare-const |a b| (List Int))
        (define-fun s () String "say ""hi""")
        (assert (match |a b| ((nil true) ((cons h t) (= h 1)))))
        (assert (! (forall ((x Int)) (! (> x 0) :pattern ((f x)))) :named q))
        (assert (= #b0101 ((_ extract 3 0) #x0f)))
        (assert (let ((r 2.5) (z (as nil (List Int)))) (> r 0.125)))
        (push 1)
        (check-sat)
    "#,
        )
        .unwrap();
    let rendered = script.to_string();
    let reparsed = UntypedAst.parse_script_str(&rendered).unwrap();
    assert_eq!(reparsed, script);
    assert_eq!(reparsed.to_string(), rendered);
    assert!(rendered.contains(r#""say ""hi""""#));
    assert!(rendered.contains("|a b|"));
}
