// rinha -- an interpreter for the Rinha language
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The operator runtime: a pure function from `(op, left, right)` to a
//! result value or a type error. See `ast::BinOp` for the operator set.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::ast::BinOp;
use crate::error::EvalError;
use crate::value::Value;

pub fn binary_op(op: BinOp, left: Value, right: Value) -> Result<Value, EvalError> {
    use BinOp::*;
    match op {
        Add => add(left, right),
        Sub => int_op(op, left, right, |a, b| a.wrapping_sub(b)),
        Mul => int_op(op, left, right, |a, b| a.wrapping_mul(b)),
        Div => int_op(op, left, right, |a, b| a / b),
        Rem => int_op(op, left, right, |a, b| a % b),
        Eq => Ok(Value::Bool(left == right)),
        Neq => Ok(Value::Bool(left != right)),
        Lt | Gt | Lte | Gte => order_op(op, left, right),
        And => bool_op(op, left, right, |a, b| a && b),
        Or => bool_op(op, left, right, |a, b| a || b),
    }
}

fn add(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        (Value::Int(_), Value::Int(_) | Value::Str(_))
        | (Value::Str(_), Value::Int(_) | Value::Str(_)) => Ok(Value::Str(Rc::from(format!(
            "{}{}",
            left.to_display_string(),
            right.to_display_string()
        )))),
        _ => Err(EvalError::type_mismatch(format!(
            "Invalid datatypes in {}: expected Int or Str, found {} and {}.",
            BinOp::Add.name(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn int_op(
    op: BinOp,
    left: Value,
    right: Value,
    f: impl FnOnce(i32, i32) -> i32,
) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(f(a, b))),
        (left, right) => Err(EvalError::type_mismatch(format!(
            "Invalid datatypes in {}: expected two Ints, found {} and {}.",
            op.name(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn bool_op(
    op: BinOp,
    left: Value,
    right: Value,
    f: impl FnOnce(bool, bool) -> bool,
) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(f(a, b))),
        (left, right) => Err(EvalError::type_mismatch(format!(
            "Invalid datatypes in {}: expected two Bools, found {} and {}.",
            op.name(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn partial_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => None,
    }
}

fn order_op(op: BinOp, left: Value, right: Value) -> Result<Value, EvalError> {
    let ordering = partial_cmp(&left, &right).ok_or_else(|| {
        EvalError::type_mismatch(format!(
            "Cannot compare values of different types: {} and {}.",
            left.type_name(),
            right.type_name()
        ))
    })?;
    let result = match op {
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Gt => ordering == Ordering::Greater,
        BinOp::Lte => ordering != Ordering::Greater,
        BinOp::Gte => ordering != Ordering::Less,
        _ => return Err(EvalError::internal("order_op called with non-ordering op")),
    };
    Ok(Value::Bool(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_ints() {
        let result = binary_op(BinOp::Add, Value::Int(1), Value::Int(2)).unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn add_int_and_str_concatenates() {
        let result = binary_op(BinOp::Add, Value::Str("a".into()), Value::Int(1)).unwrap();
        assert_eq!(result, Value::Str("a1".into()));
    }

    #[test]
    fn eq_never_errors_across_variants() {
        let result = binary_op(BinOp::Eq, Value::Int(1), Value::Bool(true)).unwrap();
        assert_eq!(result, Value::Bool(false));
        let result = binary_op(BinOp::Neq, Value::Int(1), Value::Bool(true)).unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[test]
    fn ordering_across_variants_is_type_mismatch() {
        assert!(binary_op(BinOp::Lt, Value::Int(1), Value::Str("a".into())).is_err());
    }

    #[test]
    fn ordering_tuples_is_type_mismatch() {
        let t = Value::Tuple(Rc::new((Value::Int(1), Value::Int(2))));
        assert!(binary_op(BinOp::Lt, t.clone(), t).is_err());
    }

    #[test]
    fn and_or_require_bools() {
        assert!(binary_op(BinOp::And, Value::Int(1), Value::Bool(true)).is_err());
        let result = binary_op(BinOp::Or, Value::Bool(false), Value::Bool(true)).unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[test]
    fn div_truncates_toward_zero() {
        let result = binary_op(BinOp::Div, Value::Int(-7), Value::Int(2)).unwrap();
        assert_eq!(result, Value::Int(-3));
    }
}
