// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! # Algebra of Abstract Syntax Trees (ASTs)
//!
//! This module models SMT-LIB ASTs as their respective (polynomial) algebras. Type variables
//! capture the critical subcomponents, so that they can be handled by special instantiations:
//! `Str` stands for symbols and strings, `So` for the recursive reference to sorts, and `T` for
//! the recursive reference to terms.
//!
//! Two instantiations exist. [crate::untyped] ties the knots with located, reference-counted
//! nodes, which is what the parser produces and the checkers read. `super::instance` ties the
//! sort knot with a hashconsing library; that is how the symbol environment represents sorts
//! after alias expansion.
//!
//! Every node renders back to SMT-LIB surface syntax through [Display].

use crate::statics::{BOOL, META_DECIMAL, META_NUMERAL, META_STRING, RESERVED_WORDS, SYMBOL_RE};
use crate::traits::Contains;
use dashu::float::DBig;
use dashu::integer::UBig;
use num_order::NumHash;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Write};
use std::hash::{Hash, Hasher};

/// Represent a literal constant in SMTLib
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant<Str> {
    /// numerals are non-negative
    Numeral(UBig),
    Decimal(DBig),
    /// escape "" has been handled
    String(Str),
    /// #b; the digits are kept verbatim, as their number determines the width
    Binary(String),
    /// #x; the digits are kept verbatim
    Hexadecimal(String),
}

// DBig, or FBig in general, does not implement [Hash], but only `NumHash`.
impl<Str> Hash for Constant<Str>
where
    Str: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Constant::Numeral(u) => {
                state.write_u8(0);
                u.hash(state);
            }
            Constant::Decimal(d) => {
                state.write_u8(1);
                d.num_hash(state);
            }
            Constant::String(s) => {
                state.write_u8(2);
                s.hash(state);
            }
            Constant::Binary(v) => {
                state.write_u8(3);
                v.hash(state);
            }
            Constant::Hexadecimal(v) => {
                state.write_u8(4);
                v.hash(state);
            }
        }
    }
}

/// Represent an index object that appear in an identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Index<Str> {
    Numeral(UBig),
    Symbol(Str),
}

/// Represent an identifier in SMTLib
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier<Str> {
    pub symbol: Str,
    pub indices: Vec<Index<Str>>,
}

impl<Str> Identifier<Str> {
    /// Return a simple identifier without indices
    pub fn simple(s: Str) -> Self {
        Self {
            symbol: s,
            indices: vec![],
        }
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}

/// Represent sorts in SMTLib
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort<Str, So>(pub Identifier<Str>, pub Vec<So>);

impl<Str, So> Sort<Str, So> {
    pub fn identifier(&self) -> &Identifier<Str> {
        &self.0
    }

    pub fn sort_name(&self) -> &Str {
        &self.0.symbol
    }

    pub fn args(&self) -> &[So] {
        &self.1
    }
}

impl<Str, So> Sort<Str, So>
where
    Str: Contains<T = String>,
{
    /// Check whether self is a nullary sort with the given name
    pub fn is_sort0(&self, name: &str) -> bool {
        self.0.symbol.inner() == name && self.0.indices.is_empty() && self.1.is_empty()
    }

    /// Check whether it's Bool
    pub fn is_bool(&self) -> bool {
        self.is_sort0(BOOL)
    }
}

/// Qualified identifier with an optional sort qualification, i.e. `(as f S)`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedIdentifier<Str, So>(pub Identifier<Str>, pub Option<So>);

impl<Str, So> From<Identifier<Str>> for QualifiedIdentifier<Str, So> {
    fn from(value: Identifier<Str>) -> Self {
        Self(value, None)
    }
}

impl<Str, So> QualifiedIdentifier<Str, So> {
    /// Return a simple qualified identifier without indices
    pub fn simple(s: Str) -> Self {
        Self(Identifier::simple(s), None)
    }

    /// Return the ascribed sort, if any
    pub fn ascription(&self) -> Option<&So> {
        self.1.as_ref()
    }
}

/// Bindings of a variable with a given piece of data: a sort for sorted variables and
/// selectors, or a term for `let`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarBinding<Str, T>(pub Str, pub T);

/// An s-expression, as found in attribute values
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SExpr<Str> {
    Constant(Constant<Str>),
    Symbol(Str),
    Keyword(Str),
    List(Vec<SExpr<Str>>),
}

/// The value of an attribute
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue<Str> {
    Constant(Constant<Str>),
    Symbol(Str),
    /// A parenthesized list of s-expressions
    List(Vec<SExpr<Str>>),
}

impl<Str> AttributeValue<Str> {
    pub fn is_string(&self) -> bool {
        matches!(self, AttributeValue::Constant(Constant::String(_)))
    }
}

/// Represent attributes in SMTLib
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute<Str> {
    /// The keyword, including the leading colon
    pub keyword: Str,
    pub value: Option<AttributeValue<Str>>,
}

impl<Str> Attribute<Str>
where
    Str: Contains<T = String>,
{
    /// Check whether the keyword is the given one
    pub fn is(&self, keyword: &str) -> bool {
        self.keyword.inner() == keyword
    }
}

/// Pattern representation in a match expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern<Str, So> {
    /// A bare symbol: either a nullary constructor or a variable
    Symbol(Str),
    /// A nullary constructor qualified by a sort, i.e. `(as C S)`
    Qualified(Str, So),
    /// A constructor applied to binders, i.e. `(C x y)` or `((as C S) x y)`
    Applied {
        ctor: Str,
        sort: Option<So>,
        arguments: Vec<Str>,
    },
}

impl<Str, So> Pattern<Str, So> {
    /// Return the constructor, or the variable, this pattern starts with
    pub fn head(&self) -> &Str {
        match self {
            Pattern::Symbol(s) | Pattern::Qualified(s, _) => s,
            Pattern::Applied { ctor, .. } => ctor,
        }
    }

    /// Return the symbols a pattern may bind
    pub fn variables(&self) -> Vec<&Str> {
        match self {
            Pattern::Symbol(s) => vec![s],
            Pattern::Qualified(_, _) => vec![],
            Pattern::Applied { arguments, .. } => arguments.iter().collect(),
        }
    }
}

/// An arm in a match expression; there is a pattern and a body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternArm<Str, So, T> {
    pub pattern: Pattern<Str, So>,
    pub body: T,
}

/// Represent terms in SMTLib
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term<Str, So, T> {
    /// A constant literal
    Constant(Constant<Str>),
    /// A variable or a constant, possibly qualified by `as`
    Identifier(QualifiedIdentifier<Str, So>),
    /// A function application
    App(QualifiedIdentifier<Str, So>, Vec<T>),
    /// A let-binding; bindings are parallel
    Let(Vec<VarBinding<Str, T>>, T),
    /// A universal quantifier
    Forall(Vec<VarBinding<Str, So>>, T),
    /// An existential quantifier
    Exists(Vec<VarBinding<Str, So>>, T),
    /// A match expression for a datatype
    Matching(T, Vec<PatternArm<Str, So, T>>),
    /// A term annotated with attributes
    Annotated(T, Vec<Attribute<Str>>),
}

impl<Str, So, T> From<Constant<Str>> for Term<Str, So, T> {
    fn from(value: Constant<Str>) -> Self {
        Term::Constant(value)
    }
}

/// The declaration of a constructor of a datatype; the bindings are its selectors
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructorDec<Str, So> {
    pub ctor: Str,
    pub args: Vec<VarBinding<Str, So>>,
}

/// The declaration of an individual datatype
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatatypeDec<Str, So> {
    /// sort parameters introduced by `par`
    ///
    /// an empty params means that the datatype is monomorphic, unless `par` was written with an
    /// empty list, which `is_par` records so that it can be reported.
    pub params: Vec<Str>,
    pub is_par: bool,
    pub constructors: Vec<ConstructorDec<Str, So>>,
}

/// A sort name with its arity, as in the first list of `declare-datatypes`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDec<Str> {
    pub name: Str,
    pub arity: UBig,
}

/// The signature of a function, as in the first list of `define-funs-rec`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDec<Str, So> {
    pub name: Str,
    pub vars: Vec<VarBinding<Str, So>>,
    pub out_sort: So,
}

/// The definition of a function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDef<Str, So, T> {
    /// Name of the function
    pub name: Str,
    /// Variables of the function
    pub vars: Vec<VarBinding<Str, So>>,
    /// The output sort of the function
    pub out_sort: So,
    /// The actual definition of the function
    pub body: T,
}

/// Represent all SMTLib commands
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command<Str, So, T> {
    Assert(T),
    CheckSat,
    CheckSatAssuming(Vec<T>),
    DeclareConst(Str, So),
    DeclareDatatype(Str, DatatypeDec<Str, So>),
    DeclareDatatypes(Vec<SortDec<Str>>, Vec<DatatypeDec<Str, So>>),
    DeclareFun(Str, Vec<So>, So),
    DeclareSort(Str, UBig),
    DefineConst(Str, So, T),
    DefineFun(FunctionDef<Str, So, T>),
    DefineFunRec(FunctionDef<Str, So, T>),
    DefineFunsRec(Vec<FunctionDec<Str, So>>, Vec<T>),
    DefineSort(Str, Vec<Str>, So),
    Echo(Str),
    Exit,
    GetAssertions,
    GetAssignment,
    GetInfo(Str),
    GetModel,
    GetOption(Str),
    GetProof,
    GetUnsatAssumptions,
    GetUnsatCore,
    GetValue(Vec<T>),
    Pop(UBig),
    Push(UBig),
    Reset,
    ResetAssertions,
    SetInfo(Attribute<Str>),
    SetLogic(Str),
    SetOption(Attribute<Str>),
}

/// A script is a sequence of commands
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script<C>(pub Vec<C>);

impl<C> Script<C> {
    pub fn commands(&self) -> &[C] {
        &self.0
    }
}

/// The placeholders a theory uses to give sorts to whole classes of literals
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaSpecConstant {
    Numeral,
    Decimal,
    String,
}

impl MetaSpecConstant {
    /// The name under which the declaration is kept in the symbol environment
    pub fn name(&self) -> &'static str {
        match self {
            MetaSpecConstant::Numeral => META_NUMERAL,
            MetaSpecConstant::Decimal => META_DECIMAL,
            MetaSpecConstant::String => META_STRING,
        }
    }
}

/// A sort symbol declaration in the `:sorts` attribute of a theory, e.g. `(Array 2)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSymbolDec<Str> {
    pub identifier: Identifier<Str>,
    pub arity: UBig,
    pub attributes: Vec<Attribute<Str>>,
}

/// A function symbol declaration in the `:funs` attribute of a theory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunSymbolDec<Str, So> {
    /// A literal with a fixed sort, e.g. `(#b0 (_ BitVec 1))`
    SpecConst {
        constant: Constant<Str>,
        sort: So,
        attributes: Vec<Attribute<Str>>,
    },
    /// A class of literals, e.g. `(NUMERAL Int)`
    MetaSpecConst {
        constant: MetaSpecConstant,
        sort: So,
        attributes: Vec<Attribute<Str>>,
    },
    /// e.g. `(and Bool Bool Bool :left-assoc)`
    Simple {
        identifier: Identifier<Str>,
        signature: Vec<So>,
        attributes: Vec<Attribute<Str>>,
    },
    /// e.g. `(par (A) (= A A Bool :chainable))`
    Parametric {
        params: Vec<Str>,
        identifier: Identifier<Str>,
        signature: Vec<So>,
        attributes: Vec<Attribute<Str>>,
    },
}

impl<Str, So> FunSymbolDec<Str, So> {
    pub fn attributes(&self) -> &[Attribute<Str>] {
        match self {
            FunSymbolDec::SpecConst { attributes, .. }
            | FunSymbolDec::MetaSpecConst { attributes, .. }
            | FunSymbolDec::Simple { attributes, .. }
            | FunSymbolDec::Parametric { attributes, .. } => attributes,
        }
    }
}

/// An attribute of a theory declaration; `:sorts` and `:funs` are structured
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TheoryAttribute<Str, SD, FD> {
    Sorts(Vec<SD>),
    Funs(Vec<FD>),
    Other(Attribute<Str>),
}

/// An attribute of a logic declaration; `:theories` is structured
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicAttribute<Str> {
    Theories(Vec<Str>),
    Other(Attribute<Str>),
}

/// A theory declaration, i.e. `(theory Ints :sorts (...) :funs (...) ...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Theory<Str, A> {
    pub name: Str,
    pub attributes: Vec<A>,
}

/// A logic declaration, i.e. `(logic QF_LIA :theories (Ints) ...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Logic<Str, A> {
    pub name: Str,
    pub attributes: Vec<A>,
}

/// Implement this trait to specify how to quote a string representation
///
/// c.f. [SymbolQuote]
pub trait StrQuote<T: Display> {
    fn quote(&self) -> T;
}

impl StrQuote<String> for String {
    fn quote(&self) -> String {
        format!("\"{}\"", self.replace("\"", "\"\""))
    }
}

impl<T> StrQuote<String> for T
where
    T: Contains<T = String>,
{
    fn quote(&self) -> String {
        self.inner().quote()
    }
}

/// Implement this trait to specify how to quote a *symbol* representation
///
/// c.f. [StrQuote]
pub trait SymbolQuote<T: Display> {
    fn sym_quote(&self) -> T;
}

impl SymbolQuote<String> for String {
    fn sym_quote(&self) -> String {
        if SYMBOL_RE.is_match(self) && !RESERVED_WORDS.contains(&self.as_str()) {
            // in this case, we have a simple symbol, so we just return the same string back
            self.clone()
        } else {
            // a valid symbol has no `|`, so we simply return a quoted symbol.
            format!("|{}|", self)
        }
    }
}

impl<T> SymbolQuote<String> for T
where
    T: Contains<T = String>,
{
    fn sym_quote(&self) -> String {
        self.inner().sym_quote()
    }
}

pub(crate) fn fmt_vec(f: &mut impl Write, v: &[impl Display]) -> std::fmt::Result {
    for (i, x) in v.iter().enumerate() {
        if i != 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", x)?;
    }
    Ok(())
}

pub(crate) fn fmt_vec_paren(f: &mut impl Write, v: &[impl Display]) -> std::fmt::Result {
    write!(f, "(")?;
    fmt_vec(f, v)?;
    write!(f, ")")
}

fn fmt_symbols<Str: SymbolQuote<String>>(f: &mut impl Write, v: &[Str]) -> std::fmt::Result {
    fmt_vec_paren(f, &v.iter().map(|s| s.sym_quote()).collect::<Vec<_>>())
}

/// print attributes, each preceded by a space
fn fmt_attributes(f: &mut impl Write, attrs: &[impl Display]) -> std::fmt::Result {
    for a in attrs {
        write!(f, " {}", a)?;
    }
    Ok(())
}

pub(crate) fn fmt_app(
    f: &mut impl Write,
    func: impl Display,
    args: &[impl Display],
) -> std::fmt::Result {
    write!(f, "({} ", func)?;
    fmt_vec(f, args)?;
    write!(f, ")")
}

pub(crate) fn fmt_binder(
    f: &mut impl Write,
    binder: &str,
    vs: &[impl Display],
    body: &impl Display,
) -> std::fmt::Result {
    write!(f, "({} ", binder)?;
    fmt_vec_paren(f, vs)?;
    write!(f, " {})", body)
}

impl<Str: StrQuote<String>> Display for Constant<Str> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Numeral(n) => write!(f, "{}", n),
            Constant::Decimal(r) => {
                if r.floor() == *r {
                    // need to hard code .0 if r doesn't have a decimal
                    write!(f, "{}.0", r.floor())
                } else {
                    write!(f, "{}", r)
                }
            }
            Constant::String(s) => write!(f, "{}", s.quote()),
            Constant::Binary(bs) => write!(f, "#b{}", bs),
            Constant::Hexadecimal(bs) => write!(f, "#x{}", bs),
        }
    }
}

impl<Str: SymbolQuote<String>> Display for Index<Str> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Index::Numeral(n) => write!(f, "{}", n),
            Index::Symbol(s) => write!(f, "{}", s.sym_quote()),
        }
    }
}

impl<Str: SymbolQuote<String>> Display for Identifier<Str> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.indices.is_empty() {
            write!(f, "{}", self.symbol.sym_quote())
        } else {
            write!(f, "(_ {} ", self.symbol.sym_quote())?;
            fmt_vec(f, &self.indices)?;
            write!(f, ")")
        }
    }
}

impl<Str, So> Display for Sort<Str, So>
where
    Str: SymbolQuote<String>,
    So: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.1.is_empty() {
            write!(f, "{}", self.0)
        } else {
            fmt_app(f, &self.0, &self.1)
        }
    }
}

impl<Str, So> Display for QualifiedIdentifier<Str, So>
where
    Str: SymbolQuote<String>,
    So: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.1 {
            None => write!(f, "{}", self.0),
            Some(s) => write!(f, "(as {} {})", self.0, s),
        }
    }
}

impl<Str, T> Display for VarBinding<Str, T>
where
    Str: SymbolQuote<String>,
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {})", self.0.sym_quote(), self.1)
    }
}

impl<Str> Display for SExpr<Str>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::Constant(c) => c.fmt(f),
            SExpr::Symbol(s) => s.sym_quote().fmt(f),
            SExpr::Keyword(k) => k.fmt(f),
            SExpr::List(es) => fmt_vec_paren(f, es),
        }
    }
}

impl<Str> Display for AttributeValue<Str>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Constant(c) => c.fmt(f),
            AttributeValue::Symbol(s) => s.sym_quote().fmt(f),
            AttributeValue::List(es) => fmt_vec_paren(f, es),
        }
    }
}

impl<Str> Display for Attribute<Str>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            None => self.keyword.fmt(f),
            Some(v) => write!(f, "{} {}", self.keyword, v),
        }
    }
}

impl<Str, So> Display for Pattern<Str, So>
where
    Str: SymbolQuote<String>,
    So: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Symbol(s) => s.sym_quote().fmt(f),
            Pattern::Qualified(s, so) => write!(f, "(as {} {})", s.sym_quote(), so),
            Pattern::Applied {
                ctor,
                sort,
                arguments,
            } => {
                "(".fmt(f)?;
                match sort {
                    None => ctor.sym_quote().fmt(f)?,
                    Some(so) => write!(f, "(as {} {})", ctor.sym_quote(), so)?,
                }
                for n in arguments {
                    write!(f, " {}", n.sym_quote())?;
                }
                ")".fmt(f)
            }
        }
    }
}

impl<Str, So, T> Display for PatternArm<Str, So, T>
where
    Str: SymbolQuote<String>,
    So: Display,
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {})", self.pattern, self.body)
    }
}

impl<Str, So, T> Display for Term<Str, So, T>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
    So: Display,
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Constant(c) => c.fmt(f),
            Term::Identifier(id) => id.fmt(f),
            Term::App(id, args) => fmt_app(f, id, args),
            Term::Let(vs, body) => fmt_binder(f, "let", vs, body),
            Term::Forall(vs, t) => fmt_binder(f, "forall", vs, t),
            Term::Exists(vs, t) => fmt_binder(f, "exists", vs, t),
            Term::Matching(t, cs) => {
                write!(f, "(match {} ", t)?;
                fmt_vec_paren(f, cs)?;
                write!(f, ")")
            }
            Term::Annotated(t, at) => {
                write!(f, "(! {}", t)?;
                fmt_attributes(f, at)?;
                write!(f, ")")
            }
        }
    }
}

impl<Str, So> Display for ConstructorDec<Str, So>
where
    Str: SymbolQuote<String>,
    So: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.args.is_empty() {
            write!(f, "({})", self.ctor.sym_quote())
        } else {
            fmt_app(f, self.ctor.sym_quote(), &self.args)
        }
    }
}

impl<Str, So> Display for DatatypeDec<Str, So>
where
    Str: SymbolQuote<String>,
    So: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_par {
            write!(f, "(par ")?;
            fmt_symbols(f, &self.params)?;
            write!(f, " ")?;
        }
        fmt_vec_paren(f, &self.constructors)?;
        if self.is_par { write!(f, ")") } else { Ok(()) }
    }
}

impl<Str> Display for SortDec<Str>
where
    Str: SymbolQuote<String>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {})", self.name.sym_quote(), self.arity)
    }
}

impl<Str, So> Display for FunctionDec<Str, So>
where
    Str: SymbolQuote<String>,
    So: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} ", self.name.sym_quote())?;
        fmt_vec_paren(f, &self.vars)?;
        write!(f, " {})", self.out_sort)
    }
}

impl<Str, So, T> Display for FunctionDef<Str, So, T>
where
    Str: SymbolQuote<String>,
    So: Display,
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.name.sym_quote())?;
        fmt_vec_paren(f, &self.vars)?;
        write!(f, " {} {}", self.out_sort, self.body)
    }
}

impl<Str, So, T> Display for Command<Str, So, T>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
    So: Display,
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Assert(t) => write!(f, "(assert {})", t),
            Command::CheckSat => write!(f, "(check-sat)"),
            Command::CheckSatAssuming(vs) => {
                write!(f, "(check-sat-assuming ")?;
                fmt_vec_paren(f, vs)?;
                write!(f, ")")
            }
            Command::DeclareConst(id, s) => {
                write!(f, "(declare-const {} {})", id.sym_quote(), s)
            }
            Command::DeclareDatatype(id, dec) => {
                write!(f, "(declare-datatype {} {})", id.sym_quote(), dec)
            }
            Command::DeclareDatatypes(sorts, decs) => {
                write!(f, "(declare-datatypes ")?;
                fmt_vec_paren(f, sorts)?;
                write!(f, " ")?;
                fmt_vec_paren(f, decs)?;
                write!(f, ")")
            }
            Command::DeclareFun(id, ss, s) => {
                write!(f, "(declare-fun {} ", id.sym_quote())?;
                fmt_vec_paren(f, ss)?;
                write!(f, " {})", s)
            }
            Command::DeclareSort(id, arity) => {
                write!(f, "(declare-sort {} {})", id.sym_quote(), arity)
            }
            Command::DefineConst(sym, sort, term) => {
                write!(f, "(define-const {} {} {})", sym.sym_quote(), sort, term)
            }
            Command::DefineFun(fd) => write!(f, "(define-fun {})", fd),
            Command::DefineFunRec(fd) => write!(f, "(define-fun-rec {})", fd),
            Command::DefineFunsRec(decs, bodies) => {
                write!(f, "(define-funs-rec ")?;
                fmt_vec_paren(f, decs)?;
                write!(f, " ")?;
                fmt_vec_paren(f, bodies)?;
                write!(f, ")")
            }
            Command::DefineSort(name, params, sort) => {
                write!(f, "(define-sort {} ", name.sym_quote())?;
                fmt_symbols(f, params)?;
                write!(f, " {})", sort)
            }
            Command::Echo(s) => write!(f, "(echo {})", s.quote()),
            Command::Exit => write!(f, "(exit)"),
            Command::GetAssertions => write!(f, "(get-assertions)"),
            Command::GetAssignment => write!(f, "(get-assignment)"),
            Command::GetInfo(kw) => write!(f, "(get-info {})", kw),
            Command::GetModel => write!(f, "(get-model)"),
            Command::GetOption(kw) => write!(f, "(get-option {})", kw),
            Command::GetProof => write!(f, "(get-proof)"),
            Command::GetUnsatAssumptions => write!(f, "(get-unsat-assumptions)"),
            Command::GetUnsatCore => write!(f, "(get-unsat-core)"),
            Command::GetValue(ts) => {
                write!(f, "(get-value ")?;
                fmt_vec_paren(f, ts)?;
                write!(f, ")")
            }
            Command::Pop(i) => write!(f, "(pop {})", i),
            Command::Push(i) => write!(f, "(push {})", i),
            Command::Reset => write!(f, "(reset)"),
            Command::ResetAssertions => write!(f, "(reset-assertions)"),
            Command::SetInfo(at) => write!(f, "(set-info {})", at),
            Command::SetLogic(l) => write!(f, "(set-logic {})", l.sym_quote()),
            Command::SetOption(op) => write!(f, "(set-option {})", op),
        }
    }
}

impl<C: Display> Display for Script<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            c.fmt(f)?;
        }
        Ok(())
    }
}

impl Display for MetaSpecConstant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.name().fmt(f)
    }
}

impl<Str> Display for SortSymbolDec<Str>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {}", self.identifier, self.arity)?;
        fmt_attributes(f, &self.attributes)?;
        write!(f, ")")
    }
}

impl<Str, So> Display for FunSymbolDec<Str, So>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
    So: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FunSymbolDec::SpecConst {
                constant,
                sort,
                attributes,
            } => {
                write!(f, "({} {}", constant, sort)?;
                fmt_attributes(f, attributes)?;
                write!(f, ")")
            }
            FunSymbolDec::MetaSpecConst {
                constant,
                sort,
                attributes,
            } => {
                write!(f, "({} {}", constant, sort)?;
                fmt_attributes(f, attributes)?;
                write!(f, ")")
            }
            FunSymbolDec::Simple {
                identifier,
                signature,
                attributes,
            } => {
                write!(f, "({} ", identifier)?;
                fmt_vec(f, signature)?;
                fmt_attributes(f, attributes)?;
                write!(f, ")")
            }
            FunSymbolDec::Parametric {
                params,
                identifier,
                signature,
                attributes,
            } => {
                write!(f, "(par ")?;
                fmt_symbols(f, params)?;
                write!(f, " ({} ", identifier)?;
                fmt_vec(f, signature)?;
                fmt_attributes(f, attributes)?;
                write!(f, "))")
            }
        }
    }
}

impl<Str, SD, FD> Display for TheoryAttribute<Str, SD, FD>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
    SD: Display,
    FD: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TheoryAttribute::Sorts(ds) => {
                write!(f, ":sorts ")?;
                fmt_vec_paren(f, ds)
            }
            TheoryAttribute::Funs(ds) => {
                write!(f, ":funs ")?;
                fmt_vec_paren(f, ds)
            }
            TheoryAttribute::Other(a) => a.fmt(f),
        }
    }
}

impl<Str> Display for LogicAttribute<Str>
where
    Str: Display + StrQuote<String> + SymbolQuote<String>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicAttribute::Theories(ts) => {
                write!(f, ":theories ")?;
                fmt_symbols(f, ts)
            }
            LogicAttribute::Other(a) => a.fmt(f),
        }
    }
}

impl<Str, A> Display for Theory<Str, A>
where
    Str: SymbolQuote<String>,
    A: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(theory {}", self.name.sym_quote())?;
        fmt_attributes(f, &self.attributes)?;
        write!(f, ")")
    }
}

impl<Str, A> Display for Logic<Str, A>
where
    Str: SymbolQuote<String>,
    A: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(logic {}", self.name.sym_quote())?;
        fmt_attributes(f, &self.attributes)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    type Pat = Pattern<String, String>;

    #[test]
    fn test_pattern() {
        assert_eq!(Pat::Symbol("x".into()).variables(), vec!["x"]);
        assert!(Pat::Qualified("nil".into(), "(List Int)".into())
            .variables()
            .is_empty());
        let applied = Pat::Applied {
            ctor: "cons".into(),
            sort: None,
            arguments: vec!["h".into(), "t".into()],
        };
        assert_eq!(applied.variables(), vec!["h", "t"]);
        assert_eq!(applied.head(), "cons");
        assert_eq!(applied.to_string(), "(cons h t)");
    }

    #[test]
    fn test_symbol_quote() {
        assert_eq!("foo".to_string().sym_quote(), "foo");
        assert_eq!("a b".to_string().sym_quote(), "|a b|");
        assert_eq!("match".to_string().sym_quote(), "|match|");
        assert_eq!("1x".to_string().sym_quote(), "|1x|");
    }

    #[test]
    fn test_constants() {
        let n: Constant<String> = Constant::Numeral(UBig::from(42u8));
        assert_eq!(n.to_string(), "42");
        let s: Constant<String> = Constant::String("say \"hi\"".into());
        assert_eq!(s.to_string(), "\"say \"\"hi\"\"\"");
        let b: Constant<String> = Constant::Binary("0101".into());
        assert_eq!(b.to_string(), "#b0101");
    }

    #[test]
    fn test_meta_spec_constant_dec() {
        let dec: FunSymbolDec<String, String> = FunSymbolDec::MetaSpecConst {
            constant: MetaSpecConstant::Numeral,
            sort: "Int".into(),
            attributes: vec![],
        };
        assert_eq!(dec.to_string(), "(NUMERAL Int)");
    }
}
