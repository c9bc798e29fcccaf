//! The pre-execution "compile" pass: parameter-uniqueness checking and
//! declaration hoisting. Not code generation — it never touches a `Value`.

use std::collections::HashSet;

use crate::ast::{Term, TermKind};
use crate::env::ScopeRef;
use crate::error::EvalError;

/// Declares every `let`-bound name in `term`'s subtree into `scope`, and
/// checks every `fn` node's parameter list for duplicates. Does not recurse
/// into a `Fn`'s body: that is compiled lazily, at call time, against the
/// scope the call creates (see `interpreter::call`).
pub fn compile(term: &Term, scope: &ScopeRef) -> Result<(), EvalError> {
    match &term.kind {
        TermKind::Literal(_) | TermKind::Var(_) => Ok(()),
        TermKind::Tuple(a, b) => {
            compile(a, scope)?;
            compile(b, scope)
        }
        TermKind::Fn(def) => {
            let mut seen = HashSet::new();
            for param in &def.parameters {
                if !seen.insert(param.clone()) {
                    return Err(EvalError::duplicate_parameter(param.to_string()));
                }
            }
            Ok(())
        }
        TermKind::Call(callee, args) => {
            compile(callee, scope)?;
            for arg in args {
                compile(arg, scope)?;
            }
            Ok(())
        }
        TermKind::BinaryOp(_, left, right) => {
            compile(left, scope)?;
            compile(right, scope)
        }
        TermKind::If(cond, then, otherwise) => {
            compile(cond, scope)?;
            compile(then, scope)?;
            compile(otherwise, scope)
        }
        TermKind::TupleIndex(arg, _) => compile(arg, scope),
        TermKind::Let(name, value, next) => {
            scope.declare(name.clone());
            compile(value, scope)?;
            compile(next, scope)
        }
        TermKind::Print(arg) => compile(arg, scope),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FnDef, Literal, TermKind};
    use crate::sink::NullSink;
    use crate::span::Span;
    use std::rc::Rc;

    fn sp() -> Span {
        Span::new(0, 0)
    }

    #[test]
    fn hoists_let_name_before_recursing() {
        let root = crate::env::Scope::new_root(Rc::new(NullSink));
        let body = Term::new(sp(), TermKind::Literal(Literal::Int(1)));
        let term = Term::new(
            sp(),
            TermKind::Let(Rc::from("x"), body.clone(), body),
        );
        compile(&term, &root).unwrap();
        // declared but unset: lookup should fail because nothing ever assigned.
        assert!(root.lookup("x").is_err());
    }

    #[test]
    fn rejects_duplicate_parameters() {
        let root = crate::env::Scope::new_root(Rc::new(NullSink));
        let body = Term::new(sp(), TermKind::Literal(Literal::Int(1)));
        let def = FnDef {
            parameters: vec![Rc::from("a"), Rc::from("a")],
            body,
        };
        let term = Term::new(sp(), TermKind::Fn(Rc::new(def)));
        assert!(compile(&term, &root).is_err());
    }

    #[test]
    fn does_not_recurse_into_fn_body() {
        // A duplicate-param error *inside* an un-called fn's body must not
        // surface until that fn is actually called.
        let root = crate::env::Scope::new_root(Rc::new(NullSink));
        let inner_body = Term::new(sp(), TermKind::Literal(Literal::Int(1)));
        let inner_def = FnDef {
            parameters: vec![Rc::from("a"), Rc::from("a")],
            body: inner_body,
        };
        let inner_fn = Term::new(sp(), TermKind::Fn(Rc::new(inner_def)));
        let outer_def = FnDef {
            parameters: vec![],
            body: inner_fn,
        };
        let term = Term::new(sp(), TermKind::Fn(Rc::new(outer_def)));
        assert!(compile(&term, &root).is_ok());
    }
}
