// rinha -- an interpreter for the Rinha language
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The immutable term tree produced by the parser.
//!
//! A `Term` is shared via `Rc` rather than borrowed: closures need to keep a
//! handle to their body alive independently of the scope that created them,
//! and an `Rc` clone is a cheap, lifetime-free stand-in for the "non-owning
//! handle into a tree someone else owns" relationship the node model
//! describes.

use std::rc::Rc;

use crate::span::Span;

pub type TermRef = Rc<Term>;

#[derive(Debug)]
pub struct Term {
    pub span: Span,
    pub kind: TermKind,
}

impl Term {
    pub fn new(span: Span, kind: TermKind) -> TermRef {
        Rc::new(Term { span, kind })
    }
}

/// A literal value as it appears in source. Distinct from [`crate::value::Value`]
/// because only these three variants can occur as parsed literals; tuples and
/// closures are always built up from sub-terms.
#[derive(Debug, Clone)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    Str(Rc<str>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

impl BinOp {
    /// The name used in `TypeMismatch` messages, one per operator so that
    /// distinct failures read distinctly (see `ops::binary_op`).
    pub fn name(self) -> &'static str {
        match self {
            BinOp::Add => "addition",
            BinOp::Sub => "subtraction",
            BinOp::Mul => "multiplication",
            BinOp::Div => "division",
            BinOp::Rem => "modulo",
            BinOp::Eq => "equality",
            BinOp::Neq => "inequality",
            BinOp::Lt => "less-than comparison",
            BinOp::Gt => "greater-than comparison",
            BinOp::Lte => "less-or-equal comparison",
            BinOp::Gte => "greater-or-equal comparison",
            BinOp::And => "logical and",
            BinOp::Or => "logical or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleSide {
    First,
    Second,
}

/// The parameter list and body of a `fn` literal. Kept behind its own `Rc` so
/// that a `Closure` value can hold one without cloning the parameter vector.
#[derive(Debug)]
pub struct FnDef {
    pub parameters: Vec<Rc<str>>,
    pub body: TermRef,
}

#[derive(Debug)]
pub enum TermKind {
    Literal(Literal),
    Tuple(TermRef, TermRef),
    Fn(Rc<FnDef>),
    Call(TermRef, Vec<TermRef>),
    BinaryOp(BinOp, TermRef, TermRef),
    If(TermRef, TermRef, TermRef),
    TupleIndex(TermRef, TupleSide),
    Var(Rc<str>),
    Let(Rc<str>, TermRef, TermRef),
    Print(TermRef),
}
