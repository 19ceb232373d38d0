// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Build located ASTs out of s-expressions

use super::instance::*;
use super::reader::{read, SExp, SExpKind, Token};
use crate::meta::{Loc, Span};
use crate::raw::alg;
use crate::statics::{META_DECIMAL, META_NUMERAL, META_STRING};
use dashu::integer::UBig;
use peg::str::LineCol;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// Why a source text could not be turned into an AST
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unbalanced or illegal text: {0}")]
    Reader(#[from] peg::error::ParseError<LineCol>),
    #[error("{loc}: {message}")]
    Malformed { loc: Loc, message: String },
    #[error("{0}: the input is not a script, a theory, nor a logic!")]
    UnexpectedRoot(Loc),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Convert byte offsets to 1-based rows and columns
struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let row = self.line_starts.partition_point(|&s| s <= offset);
        let start = self.line_starts[row - 1];
        let col = self.text.get(start..offset).map_or(0, |s| s.chars().count()) + 1;
        (row, col)
    }

    /// the span of the bytes `[start, end)`; the end position is the last character
    fn span(&self, start: usize, end: usize) -> Span {
        let (start_row, start_col) = self.position(start);
        let last = if end > start {
            self.text[..end]
                .char_indices()
                .next_back()
                .map_or(start, |(i, _)| i)
        } else {
            start
        };
        let (end_row, end_col) = self.position(last);
        Span {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }
}

struct Builder<'a> {
    file: Option<Rc<str>>,
    index: LineIndex<'a>,
}

fn wrap<T>(t: T, loc: Loc) -> Untyped<T> {
    Untyped::wrap(t, loc)
}

impl Builder<'_> {
    fn loc_range(&self, start: usize, end: usize) -> Loc {
        Loc::new(self.file.clone(), self.index.span(start, end))
    }

    fn loc(&self, e: &SExp) -> Loc {
        self.loc_range(e.start, e.end)
    }

    fn malformed<T>(&self, e: &SExp, message: String) -> ParseResult<T> {
        Err(ParseError::Malformed {
            loc: self.loc(e),
            message,
        })
    }

    fn text<'b>(&'b self, e: &SExp) -> &'b str {
        &self.index.text[e.start..e.end]
    }

    fn symbol(&self, e: &SExp) -> ParseResult<Str> {
        match e.symbol() {
            Some(s) => Ok(wrap(s.to_string(), self.loc(e))),
            None => self.malformed(e, format!("expected a symbol, but got {}!", self.text(e))),
        }
    }

    fn symbols(&self, e: &SExp) -> ParseResult<Vec<Str>> {
        self.list(e)?.iter().map(|s| self.symbol(s)).collect()
    }

    fn keyword(&self, e: &SExp) -> ParseResult<Str> {
        match e.keyword() {
            Some(k) => Ok(wrap(k.to_string(), self.loc(e))),
            None => self.malformed(e, format!("expected a keyword, but got {}!", self.text(e))),
        }
    }

    fn string(&self, e: &SExp) -> ParseResult<Str> {
        match &e.kind {
            SExpKind::Atom(Token::String(s)) => Ok(wrap(s.clone(), self.loc(e))),
            _ => self.malformed(e, format!("expected a string, but got {}!", self.text(e))),
        }
    }

    fn numeral(&self, e: &SExp) -> ParseResult<UBig> {
        match &e.kind {
            SExpKind::Atom(Token::Numeral(n)) => Ok(n.clone()),
            _ => self.malformed(e, format!("expected a numeral, but got {}!", self.text(e))),
        }
    }

    fn list<'b>(&self, e: &'b SExp) -> ParseResult<&'b [SExp]> {
        match e.list() {
            Some(l) => Ok(l),
            None => self.malformed(e, format!("expected a list, but got {}!", self.text(e))),
        }
    }

    /// a list of exactly `n` elements after the head symbol
    fn args<'b>(&self, e: &SExp, tail: &'b [SExp], n: usize, what: &str) -> ParseResult<&'b [SExp]> {
        if tail.len() == n {
            Ok(tail)
        } else {
            self.malformed(
                e,
                format!("{} expects {} argument(s), but got {}!", what, n, tail.len()),
            )
        }
    }

    fn constant(&self, e: &SExp) -> Option<Constant> {
        match &e.kind {
            SExpKind::Atom(Token::Numeral(n)) => Some(alg::Constant::Numeral(n.clone())),
            SExpKind::Atom(Token::Decimal(d)) => Some(alg::Constant::Decimal(d.clone())),
            SExpKind::Atom(Token::Hexadecimal(h)) => Some(alg::Constant::Hexadecimal(h.clone())),
            SExpKind::Atom(Token::Binary(b)) => Some(alg::Constant::Binary(b.clone())),
            SExpKind::Atom(Token::String(s)) => {
                Some(alg::Constant::String(wrap(s.clone(), self.loc(e))))
            }
            _ => None,
        }
    }

    fn index(&self, e: &SExp) -> ParseResult<Index> {
        match &e.kind {
            SExpKind::Atom(Token::Numeral(n)) => Ok(alg::Index::Numeral(n.clone())),
            SExpKind::Atom(Token::Symbol(_)) => Ok(alg::Index::Symbol(self.symbol(e)?)),
            _ => self.malformed(e, format!("invalid index {}!", self.text(e))),
        }
    }

    fn is_indexed(e: &SExp) -> bool {
        e.app().is_some_and(|(h, _)| h == "_")
    }

    fn identifier(&self, e: &SExp) -> ParseResult<Identifier> {
        if e.symbol().is_some() {
            return Ok(alg::Identifier::simple(self.symbol(e)?));
        }
        match e.app() {
            Some(("_", tail)) if tail.len() >= 2 => Ok(alg::Identifier {
                symbol: self.symbol(&tail[0])?,
                indices: tail[1..]
                    .iter()
                    .map(|i| self.index(i))
                    .collect::<ParseResult<_>>()?,
            }),
            _ => self.malformed(e, format!("invalid identifier {}!", self.text(e))),
        }
    }

    pub(super) fn sort(&self, e: &SExp) -> ParseResult<Sort> {
        let loc = self.loc(e);
        if e.symbol().is_some() || Self::is_indexed(e) {
            return Ok(wrap(alg::Sort(self.identifier(e)?, vec![]).into(), loc));
        }
        match e.list() {
            Some([head, args @ ..]) if !args.is_empty() => {
                let id = self.identifier(head)?;
                let args = args
                    .iter()
                    .map(|s| self.sort(s))
                    .collect::<ParseResult<_>>()?;
                Ok(wrap(alg::Sort(id, args).into(), loc))
            }
            _ => self.malformed(e, format!("invalid sort {}!", self.text(e))),
        }
    }

    fn sorts(&self, e: &SExp) -> ParseResult<Vec<Sort>> {
        self.list(e)?.iter().map(|s| self.sort(s)).collect()
    }

    fn qual_identifier(&self, e: &SExp) -> ParseResult<QualifiedIdentifier> {
        match e.app() {
            Some(("as", tail)) => {
                let tail = self.args(e, tail, 2, "as")?;
                Ok(alg::QualifiedIdentifier(
                    self.identifier(&tail[0])?,
                    Some(self.sort(&tail[1])?),
                ))
            }
            _ => Ok(self.identifier(e)?.into()),
        }
    }

    fn sorted_var(&self, e: &SExp) -> ParseResult<SortedVar> {
        match e.list() {
            Some([v, s]) => Ok(alg::VarBinding(self.symbol(v)?, self.sort(s)?)),
            _ => self.malformed(e, format!("invalid sorted variable {}!", self.text(e))),
        }
    }

    fn sorted_vars(&self, e: &SExp) -> ParseResult<Vec<SortedVar>> {
        self.list(e)?.iter().map(|v| self.sorted_var(v)).collect()
    }

    fn sexpr(&self, e: &SExp) -> ParseResult<SExpr> {
        if let Some(c) = self.constant(e) {
            return Ok(alg::SExpr::Constant(c));
        }
        match &e.kind {
            SExpKind::Atom(Token::Symbol(_)) => Ok(alg::SExpr::Symbol(self.symbol(e)?)),
            SExpKind::Atom(Token::Keyword(_)) => Ok(alg::SExpr::Keyword(self.keyword(e)?)),
            SExpKind::List(l) => Ok(alg::SExpr::List(
                l.iter().map(|x| self.sexpr(x)).collect::<ParseResult<_>>()?,
            )),
            SExpKind::Atom(_) => self.malformed(e, format!("invalid s-expression {}!", self.text(e))),
        }
    }

    fn attribute_value(&self, e: &SExp) -> ParseResult<AttributeValue> {
        if let Some(c) = self.constant(e) {
            return Ok(alg::AttributeValue::Constant(c));
        }
        match &e.kind {
            SExpKind::Atom(Token::Symbol(_)) => Ok(alg::AttributeValue::Symbol(self.symbol(e)?)),
            SExpKind::List(l) => Ok(alg::AttributeValue::List(
                l.iter().map(|x| self.sexpr(x)).collect::<ParseResult<_>>()?,
            )),
            SExpKind::Atom(_) => {
                self.malformed(e, format!("invalid attribute value {}!", self.text(e)))
            }
        }
    }

    /// Split a sequence of attributes `:kw [value] :kw [value] ...` into keyword/value groups
    fn attribute_groups<'b>(&self, es: &'b [SExp]) -> ParseResult<Vec<(&'b SExp, Option<&'b SExp>)>> {
        let mut groups = vec![];
        let mut i = 0;
        while i < es.len() {
            let kw = &es[i];
            if kw.keyword().is_none() {
                return self.malformed(kw, format!("expected a keyword, but got {}!", self.text(kw)));
            }
            match es.get(i + 1) {
                Some(v) if v.keyword().is_none() => {
                    groups.push((kw, Some(v)));
                    i += 2;
                }
                _ => {
                    groups.push((kw, None));
                    i += 1;
                }
            }
        }
        Ok(groups)
    }

    fn attribute(&self, kw: &SExp, value: Option<&SExp>) -> ParseResult<Attribute> {
        Ok(alg::Attribute {
            keyword: self.keyword(kw)?,
            value: value.map(|v| self.attribute_value(v)).transpose()?,
        })
    }

    fn attributes(&self, es: &[SExp]) -> ParseResult<Vec<Attribute>> {
        self.attribute_groups(es)?
            .into_iter()
            .map(|(kw, v)| self.attribute(kw, v))
            .collect()
    }

    fn single_attribute(&self, e: &SExp, es: &[SExp]) -> ParseResult<Attribute> {
        match self.attribute_groups(es)?.as_slice() {
            [(kw, v)] => self.attribute(kw, *v),
            _ => self.malformed(e, format!("expected exactly one attribute in {}!", self.text(e))),
        }
    }

    fn pattern(&self, e: &SExp) -> ParseResult<Pattern> {
        if e.symbol().is_some() {
            return Ok(alg::Pattern::Symbol(self.symbol(e)?));
        }
        if let Some(("as", tail)) = e.app() {
            let tail = self.args(e, tail, 2, "as")?;
            return Ok(alg::Pattern::Qualified(
                self.symbol(&tail[0])?,
                self.sort(&tail[1])?,
            ));
        }
        match e.list() {
            Some([head, args @ ..]) if !args.is_empty() => {
                let (ctor, sort) = match self.pattern(head)? {
                    alg::Pattern::Symbol(c) => (c, None),
                    alg::Pattern::Qualified(c, s) => (c, Some(s)),
                    alg::Pattern::Applied { .. } => {
                        return self.malformed(e, format!("invalid pattern {}!", self.text(e)));
                    }
                };
                let arguments = args
                    .iter()
                    .map(|a| self.symbol(a))
                    .collect::<ParseResult<_>>()?;
                Ok(alg::Pattern::Applied {
                    ctor,
                    sort,
                    arguments,
                })
            }
            _ => self.malformed(e, format!("invalid pattern {}!", self.text(e))),
        }
    }

    pub(super) fn term(&self, e: &SExp) -> ParseResult<Term> {
        let loc = self.loc(e);
        if let Some(c) = self.constant(e) {
            return Ok(wrap(alg::Term::Constant(c).into(), loc));
        }
        if e.symbol().is_some() {
            let id = alg::QualifiedIdentifier::simple(self.symbol(e)?);
            return Ok(wrap(alg::Term::Identifier(id).into(), loc));
        }
        let t = match e.app() {
            Some(("_", _)) | Some(("as", _)) => alg::Term::Identifier(self.qual_identifier(e)?),
            Some(("let", tail)) => {
                let tail = self.args(e, tail, 2, "let")?;
                let bindings = self
                    .list(&tail[0])?
                    .iter()
                    .map(|b| match b.list() {
                        Some([v, t]) => Ok(alg::VarBinding(self.symbol(v)?, self.term(t)?)),
                        _ => self.malformed(b, format!("invalid let binding {}!", self.text(b))),
                    })
                    .collect::<ParseResult<_>>()?;
                alg::Term::Let(bindings, self.term(&tail[1])?)
            }
            Some(("forall", tail)) => {
                let tail = self.args(e, tail, 2, "forall")?;
                alg::Term::Forall(self.sorted_vars(&tail[0])?, self.term(&tail[1])?)
            }
            Some(("exists", tail)) => {
                let tail = self.args(e, tail, 2, "exists")?;
                alg::Term::Exists(self.sorted_vars(&tail[0])?, self.term(&tail[1])?)
            }
            Some(("match", tail)) => {
                let tail = self.args(e, tail, 2, "match")?;
                let arms = self
                    .list(&tail[1])?
                    .iter()
                    .map(|c| match c.list() {
                        Some([p, t]) => Ok(alg::PatternArm {
                            pattern: self.pattern(p)?,
                            body: self.term(t)?,
                        }),
                        _ => self.malformed(c, format!("invalid match case {}!", self.text(c))),
                    })
                    .collect::<ParseResult<_>>()?;
                alg::Term::Matching(self.term(&tail[0])?, arms)
            }
            Some(("!", tail)) if !tail.is_empty() => {
                alg::Term::Annotated(self.term(&tail[0])?, self.attributes(&tail[1..])?)
            }
            _ => match e.list() {
                Some([head, args @ ..]) if !args.is_empty() => {
                    let f = self.qual_identifier(head)?;
                    let args = args
                        .iter()
                        .map(|a| self.term(a))
                        .collect::<ParseResult<_>>()?;
                    alg::Term::App(f, args)
                }
                _ => return self.malformed(e, format!("invalid term {}!", self.text(e))),
            },
        };
        Ok(wrap(t.into(), loc))
    }

    fn terms(&self, e: &SExp) -> ParseResult<Vec<Term>> {
        self.list(e)?.iter().map(|t| self.term(t)).collect()
    }

    fn constructor_dec(&self, e: &SExp) -> ParseResult<ConstructorDec> {
        match e.list() {
            Some([c, sels @ ..]) => Ok(alg::ConstructorDec {
                ctor: self.symbol(c)?,
                args: sels
                    .iter()
                    .map(|s| self.sorted_var(s))
                    .collect::<ParseResult<_>>()?,
            }),
            _ => self.malformed(e, format!("invalid constructor declaration {}!", self.text(e))),
        }
    }

    fn datatype_dec(&self, e: &SExp) -> ParseResult<DatatypeDec> {
        let (params, is_par, ctors) = match e.app() {
            Some(("par", tail)) => {
                let tail = self.args(e, tail, 2, "par")?;
                (self.symbols(&tail[0])?, true, self.list(&tail[1])?)
            }
            _ => (vec![], false, self.list(e)?),
        };
        Ok(alg::DatatypeDec {
            params,
            is_par,
            constructors: ctors
                .iter()
                .map(|c| self.constructor_dec(c))
                .collect::<ParseResult<_>>()?,
        })
    }

    fn function_def(&self, e: &SExp, tail: &[SExp], what: &str) -> ParseResult<FunctionDef> {
        let tail = self.args(e, tail, 4, what)?;
        Ok(alg::FunctionDef {
            name: self.symbol(&tail[0])?,
            vars: self.sorted_vars(&tail[1])?,
            out_sort: self.sort(&tail[2])?,
            body: self.term(&tail[3])?,
        })
    }

    fn function_dec(&self, e: &SExp) -> ParseResult<FunctionDec> {
        match e.list() {
            Some([name, vars, out]) => Ok(alg::FunctionDec {
                name: self.symbol(name)?,
                vars: self.sorted_vars(vars)?,
                out_sort: self.sort(out)?,
            }),
            _ => self.malformed(e, format!("invalid function declaration {}!", self.text(e))),
        }
    }

    fn level(&self, e: &SExp, tail: &[SExp], what: &str) -> ParseResult<UBig> {
        match tail {
            [] => Ok(UBig::ONE),
            [n] => self.numeral(n),
            _ => self.malformed(e, format!("{} expects at most 1 argument!", what)),
        }
    }

    pub(super) fn command(&self, e: &SExp) -> ParseResult<Command> {
        let Some((head, tail)) = e.app() else {
            return self.malformed(e, format!("expected a command, but got {}!", self.text(e)));
        };
        let nullary = |c: alg::Command<Str, Sort, Term>| -> ParseResult<_> {
            self.args(e, tail, 0, head)?;
            Ok(c)
        };
        let c = match head {
            "assert" => alg::Command::Assert(self.term(&self.args(e, tail, 1, head)?[0])?),
            "check-sat" => nullary(alg::Command::CheckSat)?,
            "check-sat-assuming" => {
                alg::Command::CheckSatAssuming(self.terms(&self.args(e, tail, 1, head)?[0])?)
            }
            "declare-const" => {
                let tail = self.args(e, tail, 2, head)?;
                alg::Command::DeclareConst(self.symbol(&tail[0])?, self.sort(&tail[1])?)
            }
            "declare-datatype" => {
                let tail = self.args(e, tail, 2, head)?;
                alg::Command::DeclareDatatype(self.symbol(&tail[0])?, self.datatype_dec(&tail[1])?)
            }
            "declare-datatypes" => {
                let tail = self.args(e, tail, 2, head)?;
                let sorts = self
                    .list(&tail[0])?
                    .iter()
                    .map(|s| match s.list() {
                        Some([n, a]) => Ok(alg::SortDec {
                            name: self.symbol(n)?,
                            arity: self.numeral(a)?,
                        }),
                        _ => self.malformed(s, format!("invalid sort declaration {}!", self.text(s))),
                    })
                    .collect::<ParseResult<_>>()?;
                let decs = self
                    .list(&tail[1])?
                    .iter()
                    .map(|d| self.datatype_dec(d))
                    .collect::<ParseResult<_>>()?;
                alg::Command::DeclareDatatypes(sorts, decs)
            }
            "declare-fun" => {
                let tail = self.args(e, tail, 3, head)?;
                alg::Command::DeclareFun(
                    self.symbol(&tail[0])?,
                    self.sorts(&tail[1])?,
                    self.sort(&tail[2])?,
                )
            }
            "declare-sort" => {
                let tail = self.args(e, tail, 2, head)?;
                alg::Command::DeclareSort(self.symbol(&tail[0])?, self.numeral(&tail[1])?)
            }
            "define-const" => {
                let tail = self.args(e, tail, 3, head)?;
                alg::Command::DefineConst(
                    self.symbol(&tail[0])?,
                    self.sort(&tail[1])?,
                    self.term(&tail[2])?,
                )
            }
            "define-fun" => alg::Command::DefineFun(self.function_def(e, tail, head)?),
            "define-fun-rec" => alg::Command::DefineFunRec(self.function_def(e, tail, head)?),
            "define-funs-rec" => {
                let tail = self.args(e, tail, 2, head)?;
                let decs = self
                    .list(&tail[0])?
                    .iter()
                    .map(|d| self.function_dec(d))
                    .collect::<ParseResult<_>>()?;
                alg::Command::DefineFunsRec(decs, self.terms(&tail[1])?)
            }
            "define-sort" => {
                let tail = self.args(e, tail, 3, head)?;
                alg::Command::DefineSort(
                    self.symbol(&tail[0])?,
                    self.symbols(&tail[1])?,
                    self.sort(&tail[2])?,
                )
            }
            "echo" => alg::Command::Echo(self.string(&self.args(e, tail, 1, head)?[0])?),
            "exit" => nullary(alg::Command::Exit)?,
            "get-assertions" => nullary(alg::Command::GetAssertions)?,
            "get-assignment" => nullary(alg::Command::GetAssignment)?,
            "get-info" => alg::Command::GetInfo(self.keyword(&self.args(e, tail, 1, head)?[0])?),
            "get-model" => nullary(alg::Command::GetModel)?,
            "get-option" => {
                alg::Command::GetOption(self.keyword(&self.args(e, tail, 1, head)?[0])?)
            }
            "get-proof" => nullary(alg::Command::GetProof)?,
            "get-unsat-assumptions" => nullary(alg::Command::GetUnsatAssumptions)?,
            "get-unsat-core" => nullary(alg::Command::GetUnsatCore)?,
            "get-value" => alg::Command::GetValue(self.terms(&self.args(e, tail, 1, head)?[0])?),
            "pop" => alg::Command::Pop(self.level(e, tail, head)?),
            "push" => alg::Command::Push(self.level(e, tail, head)?),
            "reset" => nullary(alg::Command::Reset)?,
            "reset-assertions" => nullary(alg::Command::ResetAssertions)?,
            "set-info" => alg::Command::SetInfo(self.single_attribute(e, tail)?),
            "set-logic" => alg::Command::SetLogic(self.symbol(&self.args(e, tail, 1, head)?[0])?),
            "set-option" => alg::Command::SetOption(self.single_attribute(e, tail)?),
            _ => return self.malformed(e, format!("unknown command {}!", head)),
        };
        Ok(wrap(c.into(), self.loc(e)))
    }

    fn sort_symbol_dec(&self, e: &SExp) -> ParseResult<SortSymbolDec> {
        match e.list() {
            Some([id, arity, attrs @ ..]) => Ok(wrap(
                alg::SortSymbolDec {
                    identifier: self.identifier(id)?,
                    arity: self.numeral(arity)?,
                    attributes: self.attributes(attrs)?,
                }
                .into(),
                self.loc(e),
            )),
            _ => self.malformed(e, format!("invalid sort symbol declaration {}!", self.text(e))),
        }
    }

    /// split `S1 ... Sn attr*` into sorts and attributes
    fn signature_and_attributes(&self, es: &[SExp]) -> ParseResult<(Vec<Sort>, Vec<Attribute>)> {
        let n = es.iter().position(|x| x.keyword().is_some()).unwrap_or(es.len());
        let sorts = es[..n]
            .iter()
            .map(|s| self.sort(s))
            .collect::<ParseResult<_>>()?;
        Ok((sorts, self.attributes(&es[n..])?))
    }

    fn fun_symbol_dec(&self, e: &SExp) -> ParseResult<FunSymbolDec> {
        let loc = self.loc(e);
        if let Some(("par", tail)) = e.app() {
            let tail = self.args(e, tail, 2, "par")?;
            let params = self.symbols(&tail[0])?;
            let Some([id, rest @ ..]) = tail[1].list() else {
                return self.malformed(e, format!("invalid function symbol declaration {}!", self.text(e)));
            };
            let (signature, attributes) = self.signature_and_attributes(rest)?;
            if signature.is_empty() {
                return self.malformed(e, format!("missing signature in {}!", self.text(e)));
            }
            let dec = alg::FunSymbolDec::Parametric {
                params,
                identifier: self.identifier(id)?,
                signature,
                attributes,
            };
            return Ok(wrap(dec.into(), loc));
        }
        let Some([head, rest @ ..]) = e.list() else {
            return self.malformed(e, format!("invalid function symbol declaration {}!", self.text(e)));
        };
        let (signature, attributes) = self.signature_and_attributes(rest)?;
        let meta = match head.symbol() {
            Some(s) if s == META_NUMERAL => Some(alg::MetaSpecConstant::Numeral),
            Some(s) if s == META_DECIMAL => Some(alg::MetaSpecConstant::Decimal),
            Some(s) if s == META_STRING => Some(alg::MetaSpecConstant::String),
            _ => None,
        };
        let constant = self.constant(head);
        let dec = match (meta, constant) {
            (Some(constant), _) if signature.len() == 1 => alg::FunSymbolDec::MetaSpecConst {
                constant,
                sort: signature[0].clone(),
                attributes,
            },
            (_, Some(constant)) if signature.len() == 1 => alg::FunSymbolDec::SpecConst {
                constant,
                sort: signature[0].clone(),
                attributes,
            },
            (None, None) if !signature.is_empty() => alg::FunSymbolDec::Simple {
                identifier: self.identifier(head)?,
                signature,
                attributes,
            },
            _ => {
                return self.malformed(e, format!("invalid function symbol declaration {}!", self.text(e)));
            }
        };
        Ok(wrap(dec.into(), loc))
    }

    fn theory_attribute(&self, kw: &SExp, value: Option<&SExp>) -> ParseResult<TheoryAttribute> {
        let loc = self.loc_range(kw.start, value.map_or(kw.end, |v| v.end));
        let structured = match (kw.keyword(), value.and_then(|v| v.list())) {
            (Some(":sorts"), Some(ds)) if !ds.is_empty() => ds
                .iter()
                .map(|d| self.sort_symbol_dec(d))
                .collect::<ParseResult<Vec<_>>>()
                .ok()
                .map(alg::TheoryAttribute::Sorts),
            (Some(":funs"), Some(ds)) if !ds.is_empty() => ds
                .iter()
                .map(|d| self.fun_symbol_dec(d))
                .collect::<ParseResult<Vec<_>>>()
                .ok()
                .map(alg::TheoryAttribute::Funs),
            _ => None,
        };
        let attr = match structured {
            Some(a) => a,
            None => alg::TheoryAttribute::Other(self.attribute(kw, value)?),
        };
        Ok(wrap(attr.into(), loc))
    }

    fn logic_attribute(&self, kw: &SExp, value: Option<&SExp>) -> ParseResult<LogicAttribute> {
        let loc = self.loc_range(kw.start, value.map_or(kw.end, |v| v.end));
        let structured = match (kw.keyword(), value) {
            (Some(":theories"), Some(v)) => match v.list() {
                Some(ts) if !ts.is_empty() => self.symbols(v).ok().map(alg::LogicAttribute::Theories),
                _ => None,
            },
            _ => None,
        };
        let attr = match structured {
            Some(a) => a,
            None => alg::LogicAttribute::Other(self.attribute(kw, value)?),
        };
        Ok(wrap(attr.into(), loc))
    }

    fn theory(&self, e: &SExp, tail: &[SExp]) -> ParseResult<Theory> {
        let Some((name, attrs)) = tail.split_first() else {
            return self.malformed(e, "missing theory name!".into());
        };
        let attributes = self
            .attribute_groups(attrs)?
            .into_iter()
            .map(|(kw, v)| self.theory_attribute(kw, v))
            .collect::<ParseResult<_>>()?;
        Ok(wrap(
            alg::Theory {
                name: self.symbol(name)?,
                attributes,
            }
            .into(),
            self.loc(e),
        ))
    }

    fn logic(&self, e: &SExp, tail: &[SExp]) -> ParseResult<Logic> {
        let Some((name, attrs)) = tail.split_first() else {
            return self.malformed(e, "missing logic name!".into());
        };
        let attributes = self
            .attribute_groups(attrs)?
            .into_iter()
            .map(|(kw, v)| self.logic_attribute(kw, v))
            .collect::<ParseResult<_>>()?;
        Ok(wrap(
            alg::Logic {
                name: self.symbol(name)?,
                attributes,
            }
            .into(),
            self.loc(e),
        ))
    }

    fn script(&self, es: &[SExp]) -> ParseResult<Script> {
        let commands = es
            .iter()
            .map(|c| self.command(c))
            .collect::<ParseResult<_>>()?;
        let start = es.first().map_or(0, |e| e.start);
        let end = es.last().map_or(0, |e| e.end);
        Ok(wrap(alg::Script(commands).into(), self.loc_range(start, end)))
    }

    fn root(&self, es: &[SExp]) -> ParseResult<Root> {
        match es.first().and_then(|e| e.app()) {
            Some(("theory", tail)) => {
                if let Some(extra) = es.get(1) {
                    return self.malformed(extra, "unexpected content after the theory declaration!".into());
                }
                Ok(Root::Theory(self.theory(&es[0], tail)?))
            }
            Some(("logic", tail)) => {
                if let Some(extra) = es.get(1) {
                    return self.malformed(extra, "unexpected content after the logic declaration!".into());
                }
                Ok(Root::Logic(self.logic(&es[0], tail)?))
            }
            Some(_) | None if es.iter().all(|e| e.list().is_some()) => {
                Ok(Root::Script(self.script(es)?))
            }
            _ => Err(ParseError::UnexpectedRoot(self.loc_range(0, self.index.text.len()))),
        }
    }
}

/// The parser of located ASTs
///
/// Sources read from strings have no file; [UntypedAst::parse_file] records the path in every
/// location it builds.
pub struct UntypedAst;

impl UntypedAst {
    fn with_builder<T>(
        &mut self,
        s: &str,
        file: Option<&str>,
        f: impl FnOnce(&Builder, &[SExp]) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let es = read(s)?;
        let builder = Builder {
            file: file.map(Rc::from),
            index: LineIndex::new(s),
        };
        f(&builder, &es)
    }

    fn single<T>(
        &mut self,
        s: &str,
        f: impl FnOnce(&Builder, &SExp) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.with_builder(s, None, |b, es| match es {
            [e] => f(b, e),
            _ => Err(ParseError::UnexpectedRoot(b.loc_range(0, s.len()))),
        })
    }

    /// Parse a script, a theory or a logic, deciding by the first form
    pub fn parse_str(&mut self, s: &str, file: Option<&str>) -> ParseResult<Root> {
        self.with_builder(s, file, |b, es| b.root(es))
    }

    pub fn parse_script_str(&mut self, s: &str) -> ParseResult<Script> {
        self.with_builder(s, None, |b, es| b.script(es))
    }

    pub fn parse_theory_str(&mut self, s: &str) -> ParseResult<Theory> {
        match self.parse_str(s, None)? {
            Root::Theory(t) => Ok(t),
            r => Err(ParseError::UnexpectedRoot(r.loc().clone())),
        }
    }

    pub fn parse_logic_str(&mut self, s: &str) -> ParseResult<Logic> {
        match self.parse_str(s, None)? {
            Root::Logic(l) => Ok(l),
            r => Err(ParseError::UnexpectedRoot(r.loc().clone())),
        }
    }

    pub fn parse_command_str(&mut self, s: &str) -> ParseResult<Command> {
        self.single(s, |b, e| b.command(e))
    }

    pub fn parse_term_str(&mut self, s: &str) -> ParseResult<Term> {
        self.single(s, |b, e| b.term(e))
    }

    pub fn parse_sort_str(&mut self, s: &str) -> ParseResult<Sort> {
        self.single(s, |b, e| b.sort(e))
    }

    /// Read and parse a file; the path as given becomes the file name of all locations
    pub fn parse_file(&mut self, path: &Path) -> ParseResult<Root> {
        let name = path.display().to_string();
        debug!("parsing {}", name);
        let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: name.clone(),
            source,
        })?;
        self.parse_str(&text, Some(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Repr;

    #[test]
    fn test_spans() {
        let script = UntypedAst
            .parse_script_str("(declare-const x Int)\n  (assert\n    (> x 0))")
            .unwrap();
        let cs = script.commands();
        assert_eq!(cs[0].loc().span.to_string(), "1:1 - 1:21");
        assert_eq!(cs[1].loc().span.to_string(), "2:3 - 3:12");
        assert_eq!(script.loc().span.to_string(), "1:1 - 3:12");
    }

    #[test]
    fn test_malformed() {
        let err = UntypedAst.parse_script_str("(assert)").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
        assert_eq!(
            err.to_string(),
            "1:1 - 1:8: assert expects 1 argument(s), but got 0!"
        );
        assert!(matches!(
            UntypedAst.parse_script_str("(frobnicate)"),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            UntypedAst.parse_script_str("(assert (f x)"),
            Err(ParseError::Reader(_))
        ));
    }

    #[test]
    fn test_roots() {
        let root = UntypedAst
            .parse_str("(theory T :sorts ((S 0)) :funs ((c S)))", None)
            .unwrap();
        assert_eq!(root.kind(), "theory");
        let root = UntypedAst
            .parse_str("(logic L :theories (T))", None)
            .unwrap();
        assert_eq!(root.kind(), "logic");
        let root = UntypedAst.parse_str("(check-sat)", None).unwrap();
        assert_eq!(root.kind(), "script");
        assert!(matches!(
            UntypedAst.parse_str("x", None),
            Err(ParseError::UnexpectedRoot(_))
        ));
    }

    #[test]
    fn test_theory_attributes() {
        let theory = UntypedAst
            .parse_theory_str(
                r#"(theory Ints
                     :sorts ((Int 0))
                     :funs ((NUMERAL Int) (- Int Int) (+ Int Int Int :left-assoc)
                            (par (A) (= A A Bool :chainable)))
                     :notes "integers")"#,
            )
            .unwrap();
        let kinds: Vec<_> = theory
            .attributes
            .iter()
            .map(|a| match a.repr() {
                alg::TheoryAttribute::Sorts(_) => "sorts",
                alg::TheoryAttribute::Funs(_) => "funs",
                alg::TheoryAttribute::Other(_) => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["sorts", "funs", "other"]);
        let alg::TheoryAttribute::Funs(funs) = theory.attributes[1].repr() else {
            panic!("funs expected")
        };
        assert!(matches!(
            funs[0].repr(),
            alg::FunSymbolDec::MetaSpecConst { .. }
        ));
        assert!(matches!(funs[3].repr(), alg::FunSymbolDec::Parametric { .. }));
        assert_eq!(funs[2].to_string(), "(+ Int Int Int :left-assoc)");
        assert_eq!(funs[3].to_string(), "(par (A) (= A A Bool :chainable))");
    }
}
