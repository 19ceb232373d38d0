// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The s-expression reader for SMT-LIB v2.6 lexical syntax
//!
//! The reader only knows about tokens and parentheses; [super::build] gives them meaning. Every
//! s-expression records the byte range it was read from.

use dashu::float::DBig;
use dashu::integer::UBig;
use peg::str::LineCol;
use std::str::FromStr;

/// A lexical token of SMT-LIB
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Numeral(UBig),
    Decimal(DBig),
    Hexadecimal(String),
    Binary(String),
    /// the content of a string literal, with `""` unescaped
    String(String),
    /// a simple symbol, or the content of a quoted symbol
    Symbol(String),
    /// a keyword, including the colon
    Keyword(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SExpKind {
    Atom(Token),
    List(Vec<SExp>),
}

/// An s-expression together with the byte range `[start, end)` of its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SExp {
    pub(crate) kind: SExpKind,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl SExp {
    pub(crate) fn list(&self) -> Option<&[SExp]> {
        match &self.kind {
            SExpKind::List(l) => Some(l),
            SExpKind::Atom(_) => None,
        }
    }

    pub(crate) fn symbol(&self) -> Option<&str> {
        match &self.kind {
            SExpKind::Atom(Token::Symbol(s)) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn keyword(&self) -> Option<&str> {
        match &self.kind {
            SExpKind::Atom(Token::Keyword(k)) => Some(k),
            _ => None,
        }
    }

    /// Return the head symbol and the tail if self is of the form `(head rest..)`.
    pub(crate) fn app(&self) -> Option<(&str, &[SExp])> {
        let l = self.list()?;
        let head = l.first()?.symbol()?;
        Some((head, &l[1..]))
    }
}

peg::parser! {
grammar reader() for str {
  rule whitespace() = [' ' | '\t' | '\n' | '\r']
  rule comment() = ";" [^'\n']*
  rule _ = quiet!{ (whitespace() / comment())* }

  rule symbol_char() = ['a'..='z' | 'A'..='Z' | '0'..='9' | '~' | '!' | '@' | '$' | '%' | '^'
                        | '&' | '*' | '_' | '-' | '+' | '=' | '<' | '>' | '.' | '?' | '/']
  rule digits() = ['0'..='9']+
  rule numeral_text() = "0" / ['1'..='9'] ['0'..='9']*

  rule numeral() -> Token
  = n:$(numeral_text()) !symbol_char() {? UBig::from_str(n).map(Token::Numeral).or(Err("numeral")) }

  rule decimal() -> Token
  = d:$(numeral_text() "." digits()) !symbol_char() {? DBig::from_str(d).map(Token::Decimal).or(Err("decimal")) }

  rule hexadecimal() -> Token
  = "#x" h:$(['0'..='9' | 'a'..='f' | 'A'..='F']+) { Token::Hexadecimal(h.to_string()) }

  rule binary() -> Token
  = "#b" b:$(['0' | '1']+) { Token::Binary(b.to_string()) }

  rule string() -> Token
  = "\"" s:$(([^'"'] / "\"\"")*) "\"" { Token::String(s.replace("\"\"", "\"")) }

  rule simple_symbol() -> Token
  = s:$(!['0'..='9'] symbol_char()+) { Token::Symbol(s.to_string()) }

  rule quoted_symbol() -> Token
  = "|" s:$([^'|']*) "|" { Token::Symbol(s.to_string()) }

  rule keyword() -> Token
  = k:$(":" symbol_char()+) { Token::Keyword(k.to_string()) }

  rule token() -> Token
  = quiet!{ decimal() / numeral() / hexadecimal() / binary() / string() / keyword()
            / quoted_symbol() / simple_symbol() } / expected!("token")

  rule list() -> SExpKind
  = "(" _ ss:(sexp() ** _) _ ")" { SExpKind::List(ss) }

  rule sexp() -> SExp
  = start:position!() kind:(t:token() { SExpKind::Atom(t) } / list()) end:position!() {
      SExp { kind, start, end }
  }

  /// Parse a sequence of s-expressions, separated by whitespace and comments.
  pub(super) rule sexps() -> Vec<SExp>
  = _ ss:(sexp() ** _) _ { ss }
}
}

/// Read all s-expressions of a source text
pub(crate) fn read(s: &str) -> Result<Vec<SExp>, peg::error::ParseError<LineCol>> {
    reader::sexps(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(s: &str) -> Token {
        let es = read(s).unwrap();
        assert_eq!(es.len(), 1);
        match &es[0].kind {
            SExpKind::Atom(t) => t.clone(),
            SExpKind::List(_) => panic!("not an atom: {}", s),
        }
    }

    #[test]
    fn test_atoms() {
        assert_eq!(atom("42"), Token::Numeral(UBig::from(42u8)));
        assert!(matches!(atom("4.25"), Token::Decimal(_)));
        assert_eq!(atom("#xA0"), Token::Hexadecimal("A0".into()));
        assert_eq!(atom("#b0110"), Token::Binary("0110".into()));
        assert_eq!(atom("\"a\"\"b\""), Token::String("a\"b".into()));
        assert_eq!(atom("|hello world|"), Token::Symbol("hello world".into()));
        assert_eq!(atom("bvadd"), Token::Symbol("bvadd".into()));
        assert_eq!(atom(":left-assoc"), Token::Keyword(":left-assoc".into()));
    }

    #[test]
    fn test_positions_and_comments() {
        let es = read("; a comment\n(assert (f x)) ; trailing\n(check-sat)").unwrap();
        assert_eq!(es.len(), 2);
        assert_eq!((es[0].start, es[0].end), (12, 26));
        let (head, tail) = es[0].app().unwrap();
        assert_eq!(head, "assert");
        assert_eq!(tail.len(), 1);
        assert_eq!(es[1].app().map(|(h, _)| h), Some("check-sat"));
    }

    #[test]
    fn test_unbalanced() {
        assert!(read("(assert (f x)").is_err());
        assert!(read("(assert x))").is_err());
        assert!(read("01").is_err());
    }
}
