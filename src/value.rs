// rinha -- an interpreter for the Rinha language
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The runtime value universe.

use std::rc::Rc;

use crate::ast::FnDef;
use crate::env::ScopeRef;

#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Str(Rc<str>),
    Tuple(Rc<(Value, Value)>),
    Closure(Rc<Closure>),
}

#[derive(Debug)]
pub struct Closure {
    pub def: Rc<FnDef>,
    pub scope: ScopeRef,
}

impl Value {
    /// The name used in `TypeMismatch` / diagnostic messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Str(_) => "Str",
            Value::Tuple(_) => "Tuple",
            Value::Closure(_) => "Fn",
        }
    }

    /// The printable form used by `print` and by `+` string concatenation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Tuple(t) => format!(
                "({}, {})",
                t.0.to_display_string(),
                t.1.to_display_string()
            ),
            Value::Closure(_) => "<#closure>".to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a.0 == b.0 && a.1 == b.1,
            (Value::Closure(a), Value::Closure(b)) => {
                Rc::ptr_eq(a, b) || (Rc::ptr_eq(&a.def, &b.def) && Rc::ptr_eq(&a.scope, &b.scope))
            }
            // Cross-variant comparisons are unequal, never an error (see ops::binary_op).
            _ => false,
        }
    }
}
