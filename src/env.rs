// rinha -- an interpreter for the Rinha language
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The lexical scope chain.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EvalError;
use crate::sink::OutputSink;
use crate::value::Value;

pub type ScopeRef = Rc<Scope>;

/// A frame in the scope chain. `bindings` maps a name to `None` ("declared
/// but unset", the hoisting state) or `Some(value)`.
///
/// Every scope carries its own clone of the output sink handle rather than
/// looking it up through the root each time; it's an `Rc` clone, so this
/// costs nothing but a refcount bump and keeps lookups from needing a walk
/// to the outermost frame just to find the sink.
pub struct Scope {
    bindings: RefCell<HashMap<Rc<str>, Option<Value>>>,
    outer: Option<ScopeRef>,
    sink: Rc<dyn OutputSink>,
}

impl Scope {
    pub fn new_root(sink: Rc<dyn OutputSink>) -> ScopeRef {
        Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
            sink,
        })
    }

    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(Scope {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(parent.clone()),
            sink: parent.sink.clone(),
        })
    }

    pub fn sink(&self) -> &Rc<dyn OutputSink> {
        &self.sink
    }

    /// Declares `name` as "unset" in this scope. Idempotent: re-declaring an
    /// already-assigned name resets it to unset, matching the compile pass's
    /// hoisting semantics (§4.2/§4.3 of the design).
    pub fn declare(&self, name: Rc<str>) {
        self.bindings.borrow_mut().insert(name, None);
    }

    /// Writes into *this* scope's entry for `name`. Does not walk outward.
    pub fn assign(&self, name: &Rc<str>, value: Value) {
        self.bindings
            .borrow_mut()
            .insert(name.clone(), Some(value));
    }

    /// Walks outward from this scope, skipping entries that are declared but
    /// still unset, until it finds one holding a value.
    pub fn lookup(self: &ScopeRef, name: &str) -> Result<Value, EvalError> {
        let mut scope = self.clone();
        loop {
            if let Some(Some(value)) = scope.bindings.borrow().get(name) {
                return Ok(value.clone());
            }
            let outer = match &scope.outer {
                Some(outer) => outer.clone(),
                None => return Err(EvalError::unbound_name(name)),
            };
            scope = outer;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NullSink;

    #[test]
    fn hoisting_skips_unset_entries_in_favor_of_outer() {
        let root = Scope::new_root(Rc::new(NullSink));
        let name: Rc<str> = Rc::from("x");
        root.declare(name.clone());
        root.assign(&name, Value::Int(1));

        let inner = Scope::child(&root);
        inner.declare(name.clone());
        // `x` in `inner` is declared but unset: lookup should find the outer `x`.
        let found = inner.lookup("x").unwrap();
        assert_eq!(found, Value::Int(1));
    }

    #[test]
    fn unbound_name_errors() {
        let root = Scope::new_root(Rc::new(NullSink));
        assert!(root.lookup("nope").is_err());
    }
}
