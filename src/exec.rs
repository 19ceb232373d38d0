// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The checking pipeline: parse, check the syntax, then check the sortedness
//!
//! Each run starts from a fresh [Context]; theories and logics are loaded as the input asks for
//! them. A failing stage stops the pipeline and carries the rendered report.

use crate::ast::u;
use crate::checker::{Context, SortednessChecker};
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::syntax::SyntaxChecker;
use crate::untyped::{ParseError, UntypedAst};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// the report of the syntax checker
    #[error("{0}")]
    Syntax(String),
    /// the report of the sortedness checker
    #[error("{0}")]
    Sortedness(String),
}

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Debug, Clone, Default)]
pub struct Execution {
    pub config: Config,
}

impl Execution {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn check_file(&self, path: &Path) -> ExecResult<()> {
        let root = UntypedAst.parse_file(path)?;
        self.check_root(&root)
    }

    /// Check a source text; `file` names it in the report.
    pub fn check_str(&self, text: &str, file: Option<&str>) -> ExecResult<()> {
        let root = UntypedAst.parse_str(text, file)?;
        self.check_root(&root)
    }

    pub fn check_root(&self, root: &u::Root) -> ExecResult<()> {
        let mut ctx = Context::new(self.config.clone());
        let mut diag = Diagnostics::new();
        if !SyntaxChecker::new(&mut diag).check(root) {
            return Err(ExecError::Syntax(diag.report()));
        }
        if !SortednessChecker::new(&mut ctx, &mut diag).check(root) {
            return Err(ExecError::Sortedness(diag.report()));
        }
        debug!("{} {} is well-sorted", root.kind(), root.loc().file_name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execution() -> Execution {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        Execution::new(
            Config::default()
                .with_theories_dir(dir.join("theories"))
                .with_logics_dir(dir.join("logics")),
        )
    }

    #[test]
    fn test_stages() {
        let exec = execution();
        assert!(exec
            .check_str("(declare-const x Bool)\n(assert (and x true))", None)
            .is_ok());
        assert!(matches!(
            exec.check_str("(assert", None),
            Err(ExecError::Parse(_))
        ));
        assert!(matches!(
            exec.check_str("(assert (let () true))", None),
            Err(ExecError::Syntax(_))
        ));
        let Err(ExecError::Sortedness(report)) = exec.check_str("(assert y)", Some("a.smt2"))
        else {
            panic!("expected a sortedness failure");
        };
        assert_eq!(
            report,
            "-----------------\nIn file 'a.smt2':\n-----------------\n\
             1:9 - 1:9   y\n\tUnknown constant or variable 'y'.\n\n\
             1:1 - 1:10   (assert y)\n\tAsserted term is not well-sorted.\n\n\n"
        );
    }
}
