//! Interpreter-level errors.
//!
//! Kept as a hand-rolled enum with a manual `Display` impl, in the style of
//! the core interpreter's own error type, rather than a `snafu` derive: the
//! shape is simple and the crate's `snafu` dependency is reserved for the
//! driver layer (file IO, environment configuration), which actually
//! benefits from generated `Display` impls and `From` conversions.
//!
//! Unlike parse diagnostics, these carry no source position: per the
//! design, line/column are available for parse errors only, and the
//! reference implementation's own uncaught-error path prints no location.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    DuplicateParameter { name: String },
    Arity { expected: usize, got: usize },
    NotCallable { type_name: &'static str },
    TypeMismatch { message: String },
    UnboundName { name: String },
    Internal { message: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalErrorKind::DuplicateParameter { name } => {
                write!(f, "Duplicate parameter name: {:?}.", name)
            }
            EvalErrorKind::Arity { expected, got } => write!(
                f,
                "Wrong number of arguments: expected {}, got {}.",
                expected, got
            ),
            EvalErrorKind::NotCallable { type_name } => {
                write!(f, "Value of type {} is not callable.", type_name)
            }
            EvalErrorKind::TypeMismatch { message } => write!(f, "{}", message),
            EvalErrorKind::UnboundName { name } => write!(f, "Unbound name: {:?}.", name),
            EvalErrorKind::Internal { message } => write!(f, "Internal error: {}.", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind }
    }

    pub fn duplicate_parameter(name: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::DuplicateParameter { name: name.into() })
    }

    pub fn arity(expected: usize, got: usize) -> Self {
        Self::new(EvalErrorKind::Arity { expected, got })
    }

    pub fn not_callable(type_name: &'static str) -> Self {
        Self::new(EvalErrorKind::NotCallable { type_name })
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::TypeMismatch {
            message: message.into(),
        })
    }

    pub fn unbound_name(name: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::UnboundName { name: name.into() })
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::Internal {
            message: message.into(),
        })
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for EvalError {}
