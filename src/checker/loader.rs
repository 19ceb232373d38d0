// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Loading theories and logics from disk into the running context

use super::SortednessChecker;
use crate::ast::{u, NodeRef};
use crate::diagnostics::msg;
use crate::syntax::SyntaxChecker;
use crate::untyped::UntypedAst;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Theory,
    Logic,
}

impl Kind {
    fn tag(self) -> &'static str {
        match self {
            Kind::Theory => "theory",
            Kind::Logic => "logic",
        }
    }

    fn unknown(self, name: &str) -> String {
        match self {
            Kind::Theory => msg::theory_unknown(name),
            Kind::Logic => msg::logic_unknown(name),
        }
    }

    fn unloadable(self, name: &str) -> String {
        match self {
            Kind::Theory => msg::theory_unloadable(name),
            Kind::Logic => msg::logic_unloadable(name),
        }
    }

    fn already_loaded(self, name: &str) -> String {
        match self {
            Kind::Theory => msg::theory_already_loaded(name),
            Kind::Logic => msg::logic_already_loaded(name),
        }
    }

    fn accepts(self, root: &u::Root) -> bool {
        matches!(
            (self, root),
            (Kind::Theory, u::Root::Theory(_)) | (Kind::Logic, u::Root::Logic(_))
        )
    }
}

impl SortednessChecker<'_> {
    pub(crate) fn load_theory(&mut self, name: &str, node: &NodeRef) {
        let path = self.ctx.config.theory_path(name);
        self.load(Kind::Theory, name, path, node)
    }

    pub(crate) fn load_logic(&mut self, name: &str, node: &NodeRef) {
        let path = self.ctx.config.logic_path(name);
        self.load(Kind::Logic, name, path, node)
    }

    fn load(&mut self, kind: Kind, name: &str, path: PathBuf, node: &NodeRef) {
        let in_progress = format!("{}:{}", kind.tag(), name);
        if self.ctx.loading.contains(&in_progress) {
            self.diag.add(node, kind.already_loaded(name));
            return;
        }
        if !path.is_file() {
            warn!("{} {} not found at {}", kind.tag(), name, path.display());
            self.diag.add(node, kind.unknown(name));
            return;
        }
        let root = match UntypedAst.parse_file(&path) {
            Ok(root) if kind.accepts(&root) => root,
            Ok(root) => {
                warn!(
                    "{} is a {}, not a {}",
                    path.display(),
                    root.kind(),
                    kind.tag()
                );
                self.diag.add(node, kind.unloadable(name));
                return;
            }
            Err(e) => {
                warn!("cannot load {} {}: {}", kind.tag(), name, e);
                self.diag.add(node, kind.unloadable(name));
                return;
            }
        };

        self.ctx.loading.insert(in_progress.clone());
        if SyntaxChecker::new(self.diag).check(&root) {
            SortednessChecker::new(self.ctx, self.diag)
                .with_core(false)
                .check(&root);
        } else {
            self.diag.add(node, kind.unloadable(name));
        }
        self.ctx.loading.remove(&in_progress);
        info!("loaded {} {} from {}", kind.tag(), name, path.display());
    }
}
