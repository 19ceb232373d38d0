// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! This module stores the static constants in the crate

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref SYMBOL_RE: Regex =
        Regex::new(r"^[A-Za-z~!@$%^&*_\-+=<>.?/]+[0-9A-Za-z~!@$%^&*_\-+=<>.?/]*$").unwrap();
    pub static ref KEYWORD_RE: Regex =
        Regex::new(r"^:[0-9A-Za-z~!@$%^&*_\-+=<>.?/]+$").unwrap();
}

/// Words that cannot be used as simple symbols; they are printed with `|...|` quotes.
pub static RESERVED_WORDS: &[&str] = &[
    "!",
    "_",
    "as",
    "BINARY",
    "DECIMAL",
    "exists",
    "forall",
    "HEXADECIMAL",
    "let",
    "match",
    "NUMERAL",
    "par",
    "STRING",
];

pub static BOOL: &str = "Bool";

// meta spec constants of theory declarations
pub static META_NUMERAL: &str = "NUMERAL";
pub static META_DECIMAL: &str = "DECIMAL";
pub static META_STRING: &str = "STRING";

/// The theory injected into every fresh environment when core support is enabled
pub static THEORY_CORE: &str = "Core";

// attributes of function symbol declarations
pub static KW_LEFT_ASSOC: &str = ":left-assoc";
pub static KW_RIGHT_ASSOC: &str = ":right-assoc";
pub static KW_CHAINABLE: &str = ":chainable";
pub static KW_PAIRWISE: &str = ":pairwise";

// attributes of theories and logics
pub static KW_SORTS: &str = ":sorts";
pub static KW_FUNS: &str = ":funs";
pub static KW_SORTS_DESC: &str = ":sorts-description";
pub static KW_FUNS_DESC: &str = ":funs-description";
pub static KW_DEFINITION: &str = ":definition";
pub static KW_VALUES: &str = ":values";
pub static KW_NOTES: &str = ":notes";
pub static KW_THEORIES: &str = ":theories";
pub static KW_LANGUAGE: &str = ":language";
pub static KW_EXTENSIONS: &str = ":extensions";

/// Predefined options whose value must be a string
pub static STRING_OPTIONS: &[&str] = &[":diagnostic-output-channel", ":regular-output-channel"];

/// Predefined options whose value must be a numeral
pub static NUMERAL_OPTIONS: &[&str] = &[":random-seed", ":verbosity", ":reproducible-resource-limit"];

/// Predefined options whose value must be `true` or `false`
pub static BOOLEAN_OPTIONS: &[&str] = &[
    ":expand-definitions",
    ":global-declarations",
    ":interactive-mode",
    ":print-success",
    ":produce-assertions",
    ":produce-assignments",
    ":produce-models",
    ":produce-proofs",
    ":produce-unsat-assumptions",
    ":produce-unsat-cores",
];
