// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Where theory and logic files are found, and whether the core theory is implicit

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub theories_dir: PathBuf,
    pub logics_dir: PathBuf,
    pub theory_ext: String,
    pub logic_ext: String,
    /// load the core theory before checking anything else
    pub core_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theories_dir: PathBuf::from("theories"),
            logics_dir: PathBuf::from("logics"),
            theory_ext: ".smt2".to_string(),
            logic_ext: ".smt2".to_string(),
            core_enabled: true,
        }
    }
}

impl Config {
    pub fn with_theories_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.theories_dir = dir.into();
        self
    }

    pub fn with_logics_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.logics_dir = dir.into();
        self
    }

    pub fn with_theory_ext(mut self, ext: impl Into<String>) -> Self {
        self.theory_ext = ext.into();
        self
    }

    pub fn with_logic_ext(mut self, ext: impl Into<String>) -> Self {
        self.logic_ext = ext.into();
        self
    }

    pub fn with_core(mut self, enabled: bool) -> Self {
        self.core_enabled = enabled;
        self
    }

    /// The file a theory is loaded from
    pub fn theory_path(&self, name: &str) -> PathBuf {
        self.theories_dir.join(format!("{}{}", name, self.theory_ext))
    }

    /// The file a logic is loaded from
    pub fn logic_path(&self, name: &str) -> PathBuf {
        self.logics_dir.join(format!("{}{}", name, self.logic_ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_paths() {
        let config = Config::default();
        assert_eq!(config.theory_path("Ints"), Path::new("theories/Ints.smt2"));
        let config = config
            .with_logics_dir("/opt/smt/logics")
            .with_logic_ext(".logic")
            .with_core(false);
        assert_eq!(
            config.logic_path("QF_LIA"),
            Path::new("/opt/smt/logics/QF_LIA.logic")
        );
        assert!(!config.core_enabled);
    }
}
