//! Selects which evaluator (`interpreter` or `coroutine`) runs a program.
//! Configuration, not behaviour: both strategies must agree on every
//! observable result.

use std::env;
use std::rc::Rc;

use crate::ast::TermRef;
use crate::error::EvalError;
use crate::sink::OutputSink;
use crate::value::Value;

const ENV_VAR: &str = "RINHA_EXEC_STRATEGY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TreeWalker,
    Coroutine,
}

impl Strategy {
    /// Reads `RINHA_EXEC_STRATEGY`. Unset or `"tree-walker"` selects the
    /// direct walker; `"coroutine"` selects the heap-stacked one; any other
    /// value is a fatal configuration error (returned, not panicked).
    pub fn from_env() -> Result<Strategy, String> {
        match env::var(ENV_VAR) {
            Err(env::VarError::NotPresent) => Ok(Strategy::TreeWalker),
            Ok(ref s) if s == "tree-walker" => Ok(Strategy::TreeWalker),
            Ok(ref s) if s == "coroutine" => Ok(Strategy::Coroutine),
            Ok(other) => Err(format!(
                "Unknown execution strategy {:?} (expected \"tree-walker\" or \"coroutine\").",
                other
            )),
            Err(env::VarError::NotUnicode(_)) => {
                Err(format!("{} is not valid unicode.", ENV_VAR))
            }
        }
    }

    pub fn run(self, term: &TermRef, sink: Rc<dyn OutputSink>) -> Result<Value, EvalError> {
        match self {
            Strategy::TreeWalker => crate::interpreter::run(term, sink),
            Strategy::Coroutine => crate::coroutine::run(term, sink),
        }
    }
}
