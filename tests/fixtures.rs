// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use smtlib_sortcheck::config::Config;
use smtlib_sortcheck::exec::Execution;
use std::fs;
use std::path::Path;

fn execution() -> Execution {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    Execution::new(
        Config::default()
            .with_theories_dir(dir.join("theories"))
            .with_logics_dir(dir.join("logics")),
    )
}

#[test]
fn test_bundled_theories_and_logics() {
    let exec = execution();
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for sub in ["theories", "logics"] {
        for entry in fs::read_dir(dir.join(sub)).unwrap() {
            let path = entry.unwrap().path();
            if let Err(e) = exec.check_file(&path) {
                panic!("{} does not check:\n{}", path.display(), e);
            }
        }
    }
}

#[test]
fn test_script_file() {
    let file = tempfile::Builder::new().suffix(".smt2").tempfile().unwrap();
    fs::write(
        file.path(),
        r#"
(set-logic QF_AUFLIA)
(declare-fun a () (Array Int Int))
(declare-fun i () Int)
(assert (let ((b (store a i 1))) (= (select b i) (+ (select a i) 1))))
(check-sat)
"#,
    )
    .unwrap();
    assert!(exec_ok(&execution(), file.path()));
}

fn exec_ok(exec: &Execution, path: &Path) -> bool {
    match exec.check_file(path) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("{}", e);
            false
        }
    }
}
