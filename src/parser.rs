// rinha -- an interpreter for the Rinha language
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Recursive-descent parser. Precedence, lowest to highest:
//! `logical` (right-associative, shared by `==`, `!=`, `<`, `>`, `<=`,
//! `>=`, `&&`, `||`) > `arithmetic` (`+`, `-`, right-associative) >
//! `factor` (`*`, `/`, `%`, right-associative) > `apply` (calls chain) >
//! `primary` (literals, `if`, `fn`, tuples, grouping). `let` sits above all
//! of these: its `next` reparses the whole grammar, which is how a source
//! file's `let a = ..; let b = ..; body` chain is really one nested `Let`
//! whose innermost `next` is `body`.

use std::rc::Rc;

use crate::ast::{BinOp, FnDef, Literal, Term, TermKind, TermRef, TupleSide};
use crate::diagnostics::Diagnostics;
use crate::lexer::Token;
use crate::span::{LineMap, Span};

pub struct Parser<'a, 'd> {
    source: &'a str,
    tokens: Vec<(Span, Token)>,
    pos: usize,
    diagnostics: &'d mut Diagnostics,
    line_map: LineMap<'a>,
}

type PResult<T> = Result<T, ()>;

impl<'a, 'd> Parser<'a, 'd> {
    pub fn new(source: &'a str, tokens: Vec<(Span, Token)>, diagnostics: &'d mut Diagnostics) -> Self {
        let line_map = LineMap::new(source);
        Parser {
            source,
            tokens,
            pos: 0,
            diagnostics,
            line_map,
        }
    }

    pub fn parse_program(&mut self) -> PResult<TermRef> {
        let term = self.parse_term()?;
        if self.pos != self.tokens.len() {
            let span = self.current_span();
            self.diagnostics.error(
                self.line_map.offset_to_pos(span.begin),
                "Expected end of input.",
            );
            return Err(());
        }
        Ok(term)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(s, _)| *s)
            .unwrap_or_else(|| Span::new(self.source.len(), self.source.len()))
    }

    fn advance(&mut self) -> (Span, Token) {
        let item = self.tokens[self.pos].clone();
        self.pos += 1;
        item
    }

    fn error(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.diagnostics
            .error(self.line_map.offset_to_pos(span.begin), message.into());
    }

    fn expect(&mut self, token: &Token, what: &str) -> PResult<Span> {
        match self.current() {
            Some(t) if t == token => Ok(self.advance().0),
            _ => {
                self.error(format!("Expected {}.", what));
                Err(())
            }
        }
    }

    fn expect_ident(&mut self) -> PResult<(Span, Rc<str>)> {
        match self.current() {
            Some(Token::Ident(_)) => {
                let (span, token) = self.advance();
                match token {
                    Token::Ident(name) => Ok((span, name)),
                    _ => unreachable!(),
                }
            }
            _ => {
                self.error("Expected identifier.");
                Err(())
            }
        }
    }

    fn parse_block(&mut self) -> PResult<TermRef> {
        self.expect(&Token::LBrace, "'{'")?;
        let term = self.parse_term()?;
        self.expect(&Token::RBrace, "'}'")?;
        Ok(term)
    }

    pub fn parse_term(&mut self) -> PResult<TermRef> {
        match self.current() {
            Some(Token::Let) => self.parse_let(),
            Some(Token::If) => self.parse_if(),
            Some(Token::Fn) => self.parse_fn(),
            _ => self.parse_logical(),
        }
    }

    fn parse_let(&mut self) -> PResult<TermRef> {
        let begin = self.expect(&Token::Let, "'let'")?;
        let (_, name) = self.expect_ident()?;
        self.expect(&Token::Assign, "'='")?;
        let value = self.parse_term()?;
        self.expect(&Token::Semicolon, "';'")?;
        let next = self.parse_term()?;
        let end = next.span;
        Ok(Term::new(begin.to(end), TermKind::Let(name, value, next)))
    }

    fn parse_if(&mut self) -> PResult<TermRef> {
        let begin = self.expect(&Token::If, "'if'")?;
        self.expect(&Token::LParen, "'('")?;
        let cond = self.parse_term()?;
        self.expect(&Token::RParen, "')'")?;
        let then = self.parse_block()?;
        self.expect(&Token::Else, "'else'")?;
        let otherwise = self.parse_block()?;
        let end = otherwise.span;
        Ok(Term::new(begin.to(end), TermKind::If(cond, then, otherwise)))
    }

    fn parse_fn(&mut self) -> PResult<TermRef> {
        let begin = self.expect(&Token::Fn, "'fn'")?;
        self.expect(&Token::LParen, "'('")?;
        let mut parameters = Vec::new();
        if self.current() != Some(&Token::RParen) {
            loop {
                let (_, name) = self.expect_ident()?;
                parameters.push(name);
                if self.current() == Some(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "')'")?;
        self.expect(&Token::Arrow, "'=>'")?;
        let body = self.parse_term()?;
        let end = body.span;
        Ok(Term::new(
            begin.to(end),
            TermKind::Fn(Rc::new(FnDef { parameters, body })),
        ))
    }

    /// Right-associative, single precedence tier shared by every comparison
    /// and logical operator — the reference grammar's `logical -> arithmetic
    /// LogicalOp logical` rule, preserved so that `false && true || true`
    /// parses as `false && (true || true)`, not left-to-right.
    fn parse_logical(&mut self) -> PResult<TermRef> {
        let left = self.parse_arithmetic()?;
        let op = match self.current() {
            Some(Token::EqEq) => BinOp::Eq,
            Some(Token::NotEq) => BinOp::Neq,
            Some(Token::Lt) => BinOp::Lt,
            Some(Token::Gt) => BinOp::Gt,
            Some(Token::Lte) => BinOp::Lte,
            Some(Token::Gte) => BinOp::Gte,
            Some(Token::AndAnd) => BinOp::And,
            Some(Token::OrOr) => BinOp::Or,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_logical()?;
        let span = left.span.to(right.span);
        Ok(Term::new(span, TermKind::BinaryOp(op, left, right)))
    }

    fn parse_arithmetic(&mut self) -> PResult<TermRef> {
        let left = self.parse_factor()?;
        let op = match self.current() {
            Some(Token::Plus) => BinOp::Add,
            Some(Token::Minus) => BinOp::Sub,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_arithmetic()?;
        let span = left.span.to(right.span);
        Ok(Term::new(span, TermKind::BinaryOp(op, left, right)))
    }

    fn parse_factor(&mut self) -> PResult<TermRef> {
        let left = self.parse_apply()?;
        let op = match self.current() {
            Some(Token::Star) => BinOp::Mul,
            Some(Token::Slash) => BinOp::Div,
            Some(Token::Percent) => BinOp::Rem,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_factor()?;
        let span = left.span.to(right.span);
        Ok(Term::new(span, TermKind::BinaryOp(op, left, right)))
    }

    /// `print`/`first`/`second` are keyword call-forms taking exactly one
    /// parenthesised argument; a bare `callee(args, ...)` chains onto
    /// whatever came before, so `f(1)(2)` curries.
    fn parse_apply(&mut self) -> PResult<TermRef> {
        let mut term = match self.current() {
            Some(Token::Print) => self.parse_keyword_call(Token::Print, |arg, span| {
                Term::new(span, TermKind::Print(arg))
            })?,
            Some(Token::First) => self.parse_keyword_call(Token::First, |arg, span| {
                Term::new(span, TermKind::TupleIndex(arg, TupleSide::First))
            })?,
            Some(Token::Second) => self.parse_keyword_call(Token::Second, |arg, span| {
                Term::new(span, TermKind::TupleIndex(arg, TupleSide::Second))
            })?,
            _ => self.parse_primary()?,
        };

        while self.current() == Some(&Token::LParen) {
            self.advance();
            let mut args = Vec::new();
            if self.current() != Some(&Token::RParen) {
                loop {
                    args.push(self.parse_term()?);
                    if self.current() == Some(&Token::Comma) {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            let end = self.expect(&Token::RParen, "')'")?;
            let span = term.span.to(end);
            term = Term::new(span, TermKind::Call(term, args));
        }

        Ok(term)
    }

    fn parse_keyword_call(
        &mut self,
        keyword: Token,
        build: impl FnOnce(TermRef, Span) -> TermRef,
    ) -> PResult<TermRef> {
        let begin = self.expect(&keyword, "keyword")?;
        self.expect(&Token::LParen, "'('")?;
        let arg = self.parse_term()?;
        let end = self.expect(&Token::RParen, "')'")?;
        Ok(build(arg, begin.to(end)))
    }

    fn parse_primary(&mut self) -> PResult<TermRef> {
        match self.current() {
            Some(Token::True) => {
                let (span, _) = self.advance();
                Ok(Term::new(span, TermKind::Literal(Literal::Bool(true))))
            }
            Some(Token::False) => {
                let (span, _) = self.advance();
                Ok(Term::new(span, TermKind::Literal(Literal::Bool(false))))
            }
            Some(Token::Int(_)) => {
                let (span, token) = self.advance();
                match token {
                    Token::Int(i) => Ok(Term::new(span, TermKind::Literal(Literal::Int(i)))),
                    _ => unreachable!(),
                }
            }
            Some(Token::Str(_)) => {
                let (span, token) = self.advance();
                match token {
                    Token::Str(s) => Ok(Term::new(span, TermKind::Literal(Literal::Str(s)))),
                    _ => unreachable!(),
                }
            }
            Some(Token::Ident(_)) => {
                let (span, token) = self.advance();
                match token {
                    Token::Ident(name) => Ok(Term::new(span, TermKind::Var(name))),
                    _ => unreachable!(),
                }
            }
            Some(Token::LBrace) => self.parse_block(),
            Some(Token::LParen) => {
                let begin = self.expect(&Token::LParen, "'('")?;
                let first = self.parse_term()?;
                if self.current() == Some(&Token::Comma) {
                    self.advance();
                    let second = self.parse_term()?;
                    let end = self.expect(&Token::RParen, "')'")?;
                    Ok(Term::new(begin.to(end), TermKind::Tuple(first, second)))
                } else {
                    self.expect(&Token::RParen, "')'")?;
                    Ok(first)
                }
            }
            _ => {
                self.error("Expected an expression.");
                Err(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> Result<TermRef, ()> {
        let mut diagnostics = Diagnostics::new();
        let tokens = Lexer::new(src).tokenize(&mut diagnostics);
        Parser::new(src, tokens, &mut diagnostics).parse_program()
    }

    #[test]
    fn parses_literals() {
        assert!(matches!(
            parse("42").unwrap().kind,
            TermKind::Literal(Literal::Int(42))
        ));
    }

    #[test]
    fn logical_tier_is_right_associative() {
        // `false && true || true` must parse as `false && (true || true)`.
        let term = parse("false && true || true").unwrap();
        match &term.kind {
            TermKind::BinaryOp(BinOp::And, _, right) => {
                assert!(matches!(right.kind, TermKind::BinaryOp(BinOp::Or, _, _)));
            }
            other => panic!("expected And at the top, got {:?}", other),
        }
    }

    #[test]
    fn call_chains_curry() {
        let term = parse("f(1)(2)").unwrap();
        match &term.kind {
            TermKind::Call(inner, outer_args) => {
                assert_eq!(outer_args.len(), 1);
                assert!(matches!(inner.kind, TermKind::Call(_, _)));
            }
            other => panic!("expected nested Call, got {:?}", other),
        }
    }

    #[test]
    fn tuple_vs_grouping_paren() {
        assert!(matches!(parse("(1, 2)").unwrap().kind, TermKind::Tuple(_, _)));
        assert!(matches!(parse("(1)").unwrap().kind, TermKind::Literal(Literal::Int(1))));
    }

    #[test]
    fn let_next_consumes_the_rest_of_the_program() {
        let term = parse("let a = 1; let b = 2; a + b").unwrap();
        match &term.kind {
            TermKind::Let(name, _, next) => {
                assert_eq!(&**name, "a");
                assert!(matches!(next.kind, TermKind::Let(_, _, _)));
            }
            other => panic!("expected Let, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_call_is_a_diagnostic() {
        assert!(parse("f(1").is_err());
    }

    #[test]
    fn fn_body_need_not_be_braced() {
        let term = parse("fn(n) => n + 1").unwrap();
        match &term.kind {
            TermKind::Fn(def) => assert!(matches!(def.body.kind, TermKind::BinaryOp(BinOp::Add, _, _))),
            other => panic!("expected Fn, got {:?}", other),
        }
    }
}
