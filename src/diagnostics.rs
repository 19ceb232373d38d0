// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The diagnostic sink shared by the checkers, and the report it renders
//!
//! Diagnostics are grouped by the file of the offending node. Several messages about the same
//! node are kept together, in the order they were recorded.

use crate::ast::NodeRef;
use crate::symbols::SymbolInfo;
use std::collections::BTreeMap;
use std::fmt::Write;

const MAX_NODE_TEXT: usize = 100;

/// One message, possibly pointing at an earlier conflicting declaration
#[derive(Debug, Clone)]
pub struct Error {
    pub message: String,
    pub previous: Option<SymbolInfo>,
}

/// The messages recorded against one node
#[derive(Debug, Clone)]
pub struct NodeError {
    pub node: NodeRef,
    pub errors: Vec<Error>,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    files: BTreeMap<String, Vec<NodeError>>,
}

fn truncate(text: &str, marker: &str) -> String {
    match text.char_indices().nth(MAX_NODE_TEXT) {
        None => text.to_string(),
        Some((i, _)) => format!("{}{}", &text[..i], marker),
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: &NodeRef, error: Error) {
        let entries = self
            .files
            .entry(node.loc().file_name().to_string())
            .or_default();
        match entries.iter_mut().find(|e| e.node.same_node(node)) {
            Some(e) => e.errors.push(error),
            None => entries.push(NodeError {
                node: node.clone(),
                errors: vec![error],
            }),
        }
    }

    /// Record a message against a node
    pub fn add(&mut self, node: &NodeRef, message: impl Into<String>) {
        self.push(
            node,
            Error {
                message: message.into(),
                previous: None,
            },
        )
    }

    /// Record a message against a node, pointing at a conflicting declaration
    pub fn add_with(&mut self, node: &NodeRef, message: impl Into<String>, previous: SymbolInfo) {
        self.push(
            node,
            Error {
                message: message.into(),
                previous: Some(previous),
            },
        )
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(|v| v.is_empty())
    }

    /// The number of nodes with at least one message
    pub fn len(&self) -> usize {
        self.files.values().map(|v| v.len()).sum()
    }

    /// The number of messages
    pub fn error_count(&self) -> usize {
        self.node_errors().map(|e| e.errors.len()).sum()
    }

    /// All node errors, file by file
    pub fn node_errors(&self) -> impl Iterator<Item = &NodeError> {
        self.files.values().flatten()
    }

    /// All messages, file by file, in recording order
    pub fn messages(&self) -> Vec<&str> {
        self.node_errors()
            .flat_map(|e| e.errors.iter().map(|x| x.message.as_str()))
            .collect()
    }

    /// Render the report: one section per file, headed by the file name; nodes without a file
    /// come first without a header.
    pub fn report(&self) -> String {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.write_report(&mut out);
        out
    }

    fn write_report(&self, out: &mut String) -> std::fmt::Result {
        for (file, entries) in &self.files {
            if entries.is_empty() {
                continue;
            }
            if !file.is_empty() {
                let line = "-".repeat(11 + file.chars().count());
                writeln!(out, "{}", line)?;
                writeln!(out, "In file '{}':", file)?;
                writeln!(out, "{}", line)?;
            }
            for entry in entries {
                writeln!(
                    out,
                    "{}   {}",
                    entry.node.loc().span,
                    truncate(&entry.node.to_string(), "[...]")
                )?;
                for (i, err) in entry.errors.iter().enumerate() {
                    if i != 0 && err.previous.is_some() {
                        writeln!(out)?;
                    }
                    writeln!(out, "\t{}.", err.message)?;
                    if let Some(prev) = &err.previous {
                        let node = prev.node();
                        writeln!(out, "\t\tPreviously, in file '{}'", node.loc().file_name())?;
                        writeln!(
                            out,
                            "\t\t{}   {}",
                            node.loc().span,
                            truncate(&node.to_string(), "")
                        )?;
                        if i + 1 != entry.errors.len() {
                            writeln!(out)?;
                        }
                    }
                }
                writeln!(out)?;
            }
        }
        writeln!(out)
    }
}

/// The messages of the sortedness checker
pub mod msg {
    use crate::statics::BOOL;

    fn list(items: &[String]) -> String {
        items.join(", ")
    }

    pub fn sort_unknown(name: &str) -> String {
        format!("Unknown sort '{}'", name)
    }

    pub fn sort_arity(name: &str, expected: usize, actual: usize) -> String {
        format!(
            "Sort '{}' expects {} argument(s), but got {}",
            name, expected, actual
        )
    }

    pub fn sort_already_exists(name: &str) -> String {
        format!("Sort symbol '{}' already exists", name)
    }

    pub fn fun_already_exists(name: &str) -> String {
        format!("Function symbol '{}' already exists with the same signature", name)
    }

    pub fn fun_unknown_decl(name: &str, args: &[String], ret: Option<&str>) -> String {
        match ret {
            None => format!(
                "No declarations for function symbol '{}' with argument sorts ({})",
                name,
                list(args)
            ),
            Some(r) => format!(
                "No declarations for function symbol '{}' with argument sorts ({}) and return sort {}",
                name,
                list(args),
                r
            ),
        }
    }

    pub fn fun_multiple_decls(name: &str, args: &[String], rets: &[String]) -> String {
        format!(
            "Multiple declarations for function symbol '{}' with argument sorts ({}); possible return sorts: {}",
            name,
            list(args),
            list(rets)
        )
    }

    pub fn constructor_unknown(name: &str, binders: usize, sort: &str) -> String {
        format!(
            "No constructor '{}' with {} argument(s) for sort {}",
            name, binders, sort
        )
    }

    pub fn constructor_multiple(name: &str, binders: usize, sort: &str) -> String {
        format!(
            "Multiple constructors '{}' with {} argument(s) for sort {}",
            name, binders, sort
        )
    }

    pub fn literal_unknown_sort(kind: &str) -> String {
        format!("No sort declared for literals of kind {}", kind)
    }

    pub fn literal_multiple_sorts(kind: &str, sorts: &[String]) -> String {
        format!(
            "Multiple sorts declared for literals of kind {}: {}",
            kind,
            list(sorts)
        )
    }

    pub fn const_unknown(name: &str) -> String {
        format!("Unknown constant or variable '{}'", name)
    }

    pub fn const_multiple_sorts(name: &str, sorts: &[String]) -> String {
        format!(
            "Constant '{}' has multiple possible sorts: {}",
            name,
            list(sorts)
        )
    }

    pub fn const_wrong_sort(name: &str, expected: &str, sorts: &[String]) -> String {
        format!(
            "Constant '{}' cannot have sort {}; possible sorts: {}",
            name,
            expected,
            list(sorts)
        )
    }

    pub fn fun_body_wrong_sort(name: &str, expected: &str, actual: &str) -> String {
        format!(
            "The body of '{}' has sort {}, but the declared sort is {}",
            name, actual, expected
        )
    }

    pub fn fun_body_not_well_sorted(name: &str) -> String {
        format!("The body of '{}' is not well-sorted", name)
    }

    pub fn quant_term_wrong_sort(term: &str, actual: &str) -> String {
        format!(
            "The quantified term '{}' has sort {} instead of {}",
            term, actual, BOOL
        )
    }

    pub fn pattern_mismatch(sort: &str, pattern: &str) -> String {
        format!("Pattern '{}' cannot match a term of sort {}", pattern, sort)
    }

    pub fn cases_mismatch(sorts: &[String]) -> String {
        format!("The cases of the match have different sorts: {}", list(sorts))
    }

    pub fn left_and_right_assoc(name: &str) -> String {
        format!(
            "Function '{}' cannot be both left- and right-associative",
            name
        )
    }

    pub fn left_assoc_param_count(name: &str) -> String {
        format!(
            "Function '{}' is left-associative, but it does not take exactly 2 arguments",
            name
        )
    }

    pub fn left_assoc_ret_sort(name: &str) -> String {
        format!(
            "Function '{}' is left-associative, but its first argument sort differs from its return sort",
            name
        )
    }

    pub fn right_assoc_param_count(name: &str) -> String {
        format!(
            "Function '{}' is right-associative, but it does not take exactly 2 arguments",
            name
        )
    }

    pub fn right_assoc_ret_sort(name: &str) -> String {
        format!(
            "Function '{}' is right-associative, but its second argument sort differs from its return sort",
            name
        )
    }

    pub fn chainable_and_pairwise(name: &str) -> String {
        format!("Function '{}' cannot be both chainable and pairwise", name)
    }

    pub fn chain_param_count(what: &str, name: &str) -> String {
        format!(
            "Function '{}' is {}, but it does not take exactly 2 arguments",
            name, what
        )
    }

    pub fn chain_param_sort(what: &str, name: &str) -> String {
        format!("Function '{}' is {}, but its argument sorts differ", name, what)
    }

    pub fn chain_ret_sort(what: &str, name: &str) -> String {
        format!(
            "Function '{}' is {}, but its return sort is not {}",
            name, what, BOOL
        )
    }

    pub fn spec_const_already_exists(name: &str) -> String {
        format!("Specification constant '{}' already exists", name)
    }

    pub fn meta_spec_const_already_exists(name: &str) -> String {
        format!("A sort for {} literals was already declared", name)
    }

    pub fn theory_unknown(name: &str) -> String {
        format!("Unknown theory '{}'", name)
    }

    pub fn theory_unloadable(name: &str) -> String {
        format!("Theory '{}' could not be loaded", name)
    }

    pub fn theory_already_loaded(name: &str) -> String {
        format!("Theory '{}' was already loaded", name)
    }

    pub fn logic_unknown(name: &str) -> String {
        format!("Unknown logic '{}'", name)
    }

    pub fn logic_unloadable(name: &str) -> String {
        format!("Logic '{}' could not be loaded", name)
    }

    pub fn logic_already_loaded(name: &str) -> String {
        format!("Logic '{}' is already being loaded", name)
    }

    pub fn logic_already_set(current: &str) -> String {
        format!("Logic already set to '{}'", current)
    }

    pub fn stack_unpoppable(levels: &str) -> String {
        format!("Cannot pop {} level(s) from the stack", levels)
    }

    pub fn stack_unpushable(levels: &str) -> String {
        format!("Cannot push {} level(s) onto the stack", levels)
    }

    pub fn symbol_invalid(name: &str) -> String {
        format!(
            "Symbol '{}' may only contain printable characters and white spaces, but not `\\` or `|`",
            name
        )
    }

    pub fn keyword_invalid(keyword: &str) -> String {
        format!("Invalid keyword '{}'", keyword)
    }

    pub fn binder_duplicated(name: &str) -> String {
        format!("Duplicated bound symbol '{}'", name)
    }

    pub fn sort_param_duplicated(name: &str) -> String {
        format!("Duplicated sort parameter '{}'", name)
    }

    pub fn sort_param_unused(name: &str) -> String {
        format!("Unused sort parameter '{}'", name)
    }

    pub fn sort_param_applied(name: &str) -> String {
        format!("Sort parameter '{}' cannot be applied to arguments", name)
    }

    pub fn sort_params_empty() -> String {
        "Empty sort parameter list".into()
    }

    pub fn datatype_no_constructor() -> String {
        "A datatype needs at least one constructor".into()
    }

    pub fn datatype_count(sorts: usize, datatypes: usize) -> String {
        format!(
            "{} sort(s) are declared, but {} datatype(s) are defined",
            sorts, datatypes
        )
    }

    pub fn datatype_arity(name: &str, arity: &str, params: usize) -> String {
        format!(
            "Sort '{}' is declared with arity {}, but its datatype has {} parameter(s)",
            name, arity, params
        )
    }

    pub fn funs_rec_empty() -> String {
        "At least one function must be defined".into()
    }

    pub fn funs_rec_count(decs: usize, bodies: usize) -> String {
        format!(
            "{} function(s) are declared, but {} bodies are given",
            decs, bodies
        )
    }

    pub fn echo_empty() -> String {
        "'echo' expects a non-empty string".into()
    }

    pub fn get_value_empty() -> String {
        "'get-value' expects at least one term".into()
    }

    pub fn option_value(option: &str, expected: &str) -> String {
        format!("Option '{}' expects {}", option, expected)
    }

    pub fn binders_empty(binder: &str) -> String {
        format!("'{}' expects at least one binding", binder)
    }

    pub fn match_no_case() -> String {
        "'match' expects at least one case".into()
    }

    pub fn annotation_empty() -> String {
        "An annotated term expects at least one attribute".into()
    }

    pub fn pattern_no_binder(ctor: &str) -> String {
        format!("Pattern of '{}' binds no symbol", ctor)
    }

    pub fn attribute_list(keyword: &str, what: &str) -> String {
        format!("Attribute '{}' expects a non-empty list of {}", keyword, what)
    }

    pub fn attribute_string(keyword: &str) -> String {
        format!("Attribute '{}' expects a string", keyword)
    }

    pub fn theory_no_attributes(name: &str) -> String {
        format!("Theory '{}' has no attributes", name)
    }

    pub fn logic_no_attributes(name: &str) -> String {
        format!("Logic '{}' has no attributes", name)
    }

    pub fn assert_term_not_well_sorted() -> String {
        "Asserted term is not well-sorted".to_string()
    }

    pub fn assert_term_not_bool(actual: &str) -> String {
        format!("Asserted term has sort {} instead of {}", actual, BOOL)
    }

    pub fn term_not_bool(actual: &str) -> String {
        format!("Term has sort {} instead of {}", actual, BOOL)
    }

    pub fn term_not_well_sorted() -> String {
        "Term is not well-sorted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::untyped::UntypedAst;

    #[test]
    fn test_truncate() {
        let short = "(f x)";
        assert_eq!(truncate(short, "[...]"), short);
        let long = "x".repeat(120);
        let t = truncate(&long, "[...]");
        assert_eq!(t.len(), 105);
        assert!(t.ends_with("x[...]"));
        assert_eq!(truncate(&long, "").len(), 100);
    }

    #[test]
    fn test_same_node_accumulates() {
        let script = UntypedAst
            .parse_script_str("(assert x)\n(assert y)")
            .unwrap();
        let first = script.commands()[0].node_ref();
        let second = script.commands()[1].node_ref();
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());
        diag.add(&first, "one");
        diag.add(&second, "two");
        diag.add(&first, "three");
        assert_eq!(diag.len(), 2);
        assert_eq!(diag.messages(), vec!["one", "three", "two"]);
        assert_eq!(
            diag.report(),
            "1:1 - 1:10   (assert x)\n\tone.\n\tthree.\n\n2:1 - 2:10   (assert y)\n\ttwo.\n\n\n"
        );
    }

    #[test]
    fn test_report_with_previous() {
        let script = UntypedAst
            .parse_script_str("(declare-sort S 0)\n(declare-sort S 0)")
            .unwrap();
        let first = script.commands()[0].node_ref();
        let second = script.commands()[1].node_ref();
        let prev = SymbolInfo::from(crate::symbols::SortInfo::new("S".into(), 0, first));
        let mut diag = Diagnostics::new();
        diag.add(&second, "first message");
        diag.add_with(&second, msg::sort_already_exists("S"), prev);
        assert_eq!(
            diag.report(),
            "2:1 - 2:18   (declare-sort S 0)\n\
             \tfirst message.\n\
             \n\
             \tSort symbol 'S' already exists.\n\
             \t\tPreviously, in file ''\n\
             \t\t1:1 - 1:18   (declare-sort S 0)\n\
             \n\n"
        );
    }
}
