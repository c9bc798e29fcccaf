// rinha -- an interpreter for the Rinha language
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Strategy A: a direct recursive tree-walker. Each `Term` variant recurses
//! straight through host calls; deep recursion in the source program
//! consumes host stack. See `coroutine` for the heap-stacked alternative.

use std::rc::Rc;

use log::trace;

use crate::ast::{Literal, Term, TermKind, TupleSide};
use crate::compile::compile;
use crate::env::{Scope, ScopeRef};
use crate::error::EvalError;
use crate::ops::binary_op;
use crate::sink::OutputSink;
use crate::value::{Closure, Value};

/// Parses nothing, evaluates everything: runs `term` to completion in a
/// fresh root scope backed by `sink`.
pub fn run(term: &Term, sink: Rc<dyn OutputSink>) -> Result<Value, EvalError> {
    let root = Scope::new_root(sink);
    compile(term, &root)?;
    eval(term, &root)
}

pub fn eval(term: &Term, scope: &ScopeRef) -> Result<Value, EvalError> {
    match &term.kind {
        TermKind::Literal(lit) => Ok(match lit {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Int(*i),
            Literal::Str(s) => Value::Str(s.clone()),
        }),
        TermKind::Tuple(a, b) => {
            let va = eval(a, scope)?;
            let vb = eval(b, scope)?;
            Ok(Value::Tuple(Rc::new((va, vb))))
        }
        TermKind::Fn(def) => Ok(Value::Closure(Rc::new(Closure {
            def: def.clone(),
            scope: scope.clone(),
        }))),
        TermKind::Call(callee, args) => {
            let callee_value = eval(callee, scope)?;
            call(&callee_value, args, scope)
        }
        TermKind::BinaryOp(op, left, right) => {
            let lv = eval(left, scope)?;
            let rv = eval(right, scope)?;
            binary_op(*op, lv, rv)
        }
        TermKind::If(cond, then, otherwise) => {
            match eval(cond, scope)? {
                Value::Bool(true) => eval(then, scope),
                Value::Bool(false) => eval(otherwise, scope),
                other => Err(EvalError::type_mismatch(format!(
                    "Condition of `if` must be Bool, found {}.",
                    other.type_name()
                ))),
            }
        }
        TermKind::TupleIndex(arg, side) => match eval(arg, scope)? {
            Value::Tuple(t) => Ok(match side {
                TupleSide::First => t.0.clone(),
                TupleSide::Second => t.1.clone(),
            }),
            other => Err(EvalError::type_mismatch(format!(
                "first/second require a Tuple, found {}.",
                other.type_name()
            ))),
        },
        TermKind::Var(name) => scope.lookup(name),
        TermKind::Let(name, value, next) => {
            let v = eval(value, scope)?;
            scope.assign(name, v);
            eval(next, scope)
        }
        TermKind::Print(arg) => {
            let v = eval(arg, scope)?;
            scope.sink().print_line(&v.to_display_string());
            Ok(v)
        }
    }
}

/// Calls `callee` with `args` evaluated left-to-right in `caller_scope`.
fn call(
    callee: &Value,
    args: &[crate::ast::TermRef],
    caller_scope: &ScopeRef,
) -> Result<Value, EvalError> {
    let closure = match callee {
        Value::Closure(c) => c,
        other => return Err(EvalError::not_callable(other.type_name())),
    };
    if closure.def.parameters.len() != args.len() {
        return Err(EvalError::arity(closure.def.parameters.len(), args.len()));
    }

    trace!("entering closure with {} parameter(s)", args.len());
    let callee_scope = Scope::child(&closure.scope);
    for (param, arg) in closure.def.parameters.iter().zip(args) {
        callee_scope.declare(param.clone());
        let value = eval(arg, caller_scope)?;
        callee_scope.assign(param, value);
    }

    compile(&closure.def.body, &callee_scope)?;
    let result = eval(&closure.def.body, &callee_scope);
    trace!("leaving closure");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::sink::{CapturingSink, NullSink};

    fn run_source(src: &str) -> Result<Value, EvalError> {
        let mut diagnostics = crate::diagnostics::Diagnostics::new();
        let tokens = Lexer::new(src).tokenize(&mut diagnostics);
        let term = Parser::new(src, tokens, &mut diagnostics)
            .parse_program()
            .expect("source should parse");
        assert!(diagnostics.is_empty());
        run(&term, Rc::new(NullSink))
    }

    #[test]
    fn scenario_i_int_addition() {
        assert_eq!(run_source("1 + 2").unwrap(), Value::Int(3));
    }

    #[test]
    fn scenario_ii_int_str_concat() {
        assert_eq!(run_source("\"a\" + 1").unwrap(), Value::Str("a1".into()));
    }

    #[test]
    fn scenario_iii_if_else() {
        assert_eq!(
            run_source("if (false) { 1 } else { 2 }").unwrap(),
            Value::Int(2)
        );
    }

    #[test]
    fn scenario_iv_print_tuple() {
        let src = "print((1, \"one\"))";
        let mut diagnostics = crate::diagnostics::Diagnostics::new();
        let tokens = Lexer::new(src).tokenize(&mut diagnostics);
        let term = Parser::new(src, tokens, &mut diagnostics)
            .parse_program()
            .unwrap();
        let sink = Rc::new(CapturingSink::new());
        let result = run(&term, sink.clone()).unwrap();
        assert_eq!(
            result,
            Value::Tuple(Rc::new((Value::Int(1), Value::Str("one".into()))))
        );
        assert_eq!(sink.lines(), vec!["(1, one)".to_string()]);
    }

    #[test]
    fn scenario_v_recursive_factorial() {
        let src = "let fact = fn(n) => if (n <= 1) { 1 } else { n * fact(n - 1) }; fact(5)";
        assert_eq!(run_source(src).unwrap(), Value::Int(120));
    }

    #[test]
    fn scenario_vi_closure_observes_current_value_at_call_time() {
        let src = "let n = 1; let f = fn() => n; let n = 2; f()";
        assert_eq!(run_source(src).unwrap(), Value::Int(2));
    }

    #[test]
    fn closure_resolves_free_variables_against_its_capture_scope_not_the_caller() {
        // `getter` closes over the outer `x = 10`. It is then handed across a
        // call boundary into `runner`, whose own parameter is also named `x`
        // and shadows it with `999`. Calling `getter()` from inside
        // `runner`'s body must still see the captured `x`, not `runner`'s.
        let src = "\
            let x = 10; \
            let makeGetter = fn() => fn() => x; \
            let getter = makeGetter(); \
            let runner = fn(x) => getter(); \
            runner(999)";
        assert_eq!(run_source(src).unwrap(), Value::Int(10));
    }

    #[test]
    fn scenario_vii_let_x_equals_x_binds_outer_x() {
        assert_eq!(run_source("let n = 1; let n = n; n").unwrap(), Value::Int(1));
    }

    #[test]
    fn scenario_viii_no_short_circuit_precedence() {
        assert_eq!(
            run_source("false && true || true").unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        assert!(run_source("let f = fn(a, b) => a; f(1)").is_err());
    }

    #[test]
    fn calling_a_non_closure_is_not_callable() {
        assert!(run_source("let x = 1; x()").is_err());
    }

    #[test]
    fn unbound_name_is_an_error() {
        assert!(run_source("x").is_err());
    }
}
