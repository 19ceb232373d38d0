// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use smtlib_sortcheck::checker::{Context, SortednessChecker};
use smtlib_sortcheck::config::Config;
use smtlib_sortcheck::diagnostics::Diagnostics;
use smtlib_sortcheck::untyped::UntypedAst;
use std::path::Path;

fn context() -> Context {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    Context::new(
        Config::default()
            .with_theories_dir(dir.join("theories"))
            .with_logics_dir(dir.join("logics")),
    )
}

fn messages(src: &str) -> Vec<String> {
    let mut ctx = context();
    let mut diag = Diagnostics::new();
    let root = UntypedAst.parse_str(src, None).unwrap();
    let ok = SortednessChecker::new(&mut ctx, &mut diag).check(&root);
    assert_eq!(ok, diag.is_empty());
    diag.messages().into_iter().map(String::from).collect()
}

#[test]
fn test_well_sorted_script() {
    let msgs = messages(
        r#"
        (set-logic QF_LIA)
        (declare-const x Int)
        (declare-fun f (Int Int) Int)
        (assert (> (f x 1) (- x) 0))
        (assert (and (= x 1 2) (distinct x 3 4) (=> true false true)))
        (assert (let ((y (+ x 1)) (b true)) (xor b (< x y))))
        (declare-const p Bool)
        (assert (! (<= 0 x) :named nonneg))
        (check-sat-assuming (p (not p)))
        (get-value (x (f x x)))
        (check-sat)
        (exit)
    "#,
    );
    assert!(msgs.is_empty(), "{:?}", msgs);
}

#[test]
fn test_ill_sorted_assertions() {
    let msgs = messages(
        r#"
        (set-logic QF_LIA)
        (declare-const x Int)
        (assert (+ x 1))
        (assert (and x true))
        (assert z)
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "Asserted term has sort Int instead of Bool",
            "No declarations for function symbol 'and' with argument sorts (Int, Bool)",
            "Asserted term is not well-sorted",
            "Unknown constant or variable 'z'",
            "Asserted term is not well-sorted",
        ]
    );
}

#[test]
fn test_duplicate_declarations() {
    let msgs = messages(
        r#"
        (declare-sort S 0)
        (declare-sort S 1)
        (declare-fun g (S) Bool)
        (declare-fun g (S) Bool)
        (declare-fun g (S S) Bool)
        (declare-fun g (S) S)
        (declare-const c S)
        (assert (g c c))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "Sort symbol 'S' already exists",
            "Function symbol 'g' already exists with the same signature",
        ]
    );
}

#[test]
fn test_function_definitions() {
    let msgs = messages(
        r#"
        (set-logic QF_LIA)
        (define-fun inc ((n Int)) Int (+ n 1))
        (define-fun bad ((n Int)) Bool (+ n 1))
        (define-const k Int (inc 2))
        (define-fun-rec fact ((n Int)) Int (ite (<= n 0) 1 (* n (fact (- n 1)))))
        (define-fun loop ((n Int)) Int (loop n))
        (assert (= k (fact 3) (inc k)))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "The body of 'bad' has sort Int, but the declared sort is Bool",
            "No declarations for function symbol 'loop' with argument sorts (Int)",
            "The body of 'loop' is not well-sorted",
        ]
    );
}

#[test]
fn test_mutual_recursion() {
    let msgs = messages(
        r#"
        (set-logic QF_LIA)
        (define-funs-rec
          ((even ((n Int)) Bool) (odd ((n Int)) Bool))
          ((ite (= n 0) true (odd (- n 1)))
           (ite (= n 0) false (even (- n 1)))))
        (assert (even 4))
        (assert (odd n))
    "#,
    );
    // parameters do not leak out of the definitions
    assert_eq!(
        msgs,
        vec![
            "Unknown constant or variable 'n'",
            "Asserted term is not well-sorted"
        ]
    );
}

#[test]
fn test_datatypes() {
    let msgs = messages(
        r#"
        (set-logic QF_LIA)
        (declare-datatypes ((List 1)) ((par (T) ((nil) (cons (head T) (tail (List T)))))))
        (declare-const l (List Int))
        (assert (= (head l) 1))
        (assert ((_ is cons) l))
        (assert (= (tail l) (as nil (List Int))))
        (assert (match l ((nil false) ((cons h t) (> h 0)))))
        (assert (match l (((cons h t) (> h 0)) (other true))))
    "#,
    );
    assert!(msgs.is_empty(), "{:?}", msgs);
}

#[test]
fn test_match_errors() {
    let msgs = messages(
        r#"
        (declare-datatype Color ((red) (green)))
        (declare-const c Color)
        (assert (match c ((blue true) (red false))))
        (assert (match c ((red true) (green c))))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "No constructor 'blue' with 0 argument(s) for sort Color",
            "Asserted term is not well-sorted",
            "The cases of the match have different sorts: Bool, Color",
            "Asserted term is not well-sorted",
        ]
    );
}

#[test]
fn test_scopes() {
    let msgs = messages(
        r#"
        (push 1)
        (declare-const a Bool)
        (assert a)
        (pop 1)
        (assert a)
        (pop 1)
        (declare-const b Bool)
        (reset)
        (assert b)
        (assert true)
        (push 18446744073709551616)
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "Unknown constant or variable 'a'",
            "Asserted term is not well-sorted",
            "Cannot pop 1 level(s) from the stack",
            "Unknown constant or variable 'b'",
            "Asserted term is not well-sorted",
            "Cannot push 18446744073709551616 level(s) onto the stack",
        ]
    );
}

#[test]
fn test_sort_aliases() {
    let msgs = messages(
        r#"
        (set-logic QF_AUFLIA)
        (define-sort IntArray () (Array Int Int))
        (define-sort Map (K V) (Array K V))
        (declare-const a IntArray)
        (declare-const m (Map Int Int))
        (assert (= a m (store m 0 1)))
        (assert (= (select a 0) (select m 1)))
        (define-sort Bad () (Array Int))
        (declare-const u (Map Int))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "Sort 'Array' expects 2 argument(s), but got 1",
            "Sort 'Map' expects 2 argument(s), but got 1",
        ]
    );
}

#[test]
fn test_logic_twice() {
    let msgs = messages(
        r#"
        (set-logic QF_LIA)
        (set-logic QF_UF)
    "#,
    );
    assert_eq!(msgs, vec!["Logic already set to 'QF_LIA'"]);
    assert_eq!(messages("(set-logic NOPE)"), vec!["Unknown logic 'NOPE'"]);
}

#[test]
fn test_overloads_and_ascriptions() {
    let msgs = messages(
        r#"
        (set-logic AUFLIRA)
        (declare-fun f (Int) Int)
        (declare-fun f (Int) Real)
        (assert (= (f 1) 2))
        (assert (= ((as f Real) 1) 2.0))
        (assert (= ((as f Bool) 1) true))
        (assert (= (as f Int) 1))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "Multiple declarations for function symbol 'f' with argument sorts (Int); possible return sorts: Int, Real",
            "Asserted term is not well-sorted",
            "No declarations for function symbol 'f' with argument sorts (Int) and return sort Bool",
            "Asserted term is not well-sorted",
            "Unknown constant or variable 'f'",
            "Asserted term is not well-sorted",
        ]
    );
}

#[test]
fn test_quantifiers() {
    let msgs = messages(
        r#"
        (set-logic LIA)
        (assert (forall ((x Int) (y Int)) (=> (< x y) (exists ((z Int)) (< x z y)))))
        (assert (exists ((x Int)) (+ x 1)))
        (assert (forall ((x Unknown)) true))
        (assert (forall ((x Int)) (> x 0)))
        (assert (> x 0))
    "#,
    );
    assert_eq!(
        msgs,
        vec![
            "The quantified term '(+ x 1)' has sort Int instead of Bool",
            "Asserted term is not well-sorted",
            "Unknown sort 'Unknown'",
            "Unknown constant or variable 'x'",
            "Asserted term is not well-sorted",
        ]
    );
}

#[test]
fn test_without_core() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut ctx = Context::new(
        Config::default()
            .with_theories_dir(dir.join("theories"))
            .with_core(false),
    );
    let mut diag = Diagnostics::new();
    let root = UntypedAst.parse_str("(declare-const b Bool)", None).unwrap();
    assert!(!SortednessChecker::new(&mut ctx, &mut diag).check(&root));
    assert_eq!(diag.messages(), vec!["Unknown sort 'Bool'"]);
    assert!(!ctx.core_loaded);
}
