//! Error types.
//!
//! Failing to match is not an error: it simply produces no bindings. The types below are reserved
//! for malformed rules and guard expressions, which abort the current step.

use thiserror::Error;

use crate::ast::{Sym, Var};

/// A variable had to be replaced by its value, but the binding has no entry for it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("variable {var} is not bound")]
pub struct UnboundVariable {
    pub var: Var,
}

/// Errors raised while evaluating a guard expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error(transparent)]
    Unbound(#[from] UnboundVariable),

    #[error("`{op}` expects {expected} operands")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
    },

    #[error("arithmetic error in `{op}`")]
    Overflow { op: &'static str },
}

/// Errors raised while resolving rule conditions or applying a rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Unbound(#[from] UnboundVariable),

    #[error("guard failed: {0}")]
    Eval(EvalError),

    #[error("malformed form with head {head:?}: {reason}")]
    MalformedForm { head: Option<Sym>, reason: &'static str },

    #[error("strategy chose candidate {index} out of {candidates}")]
    InvalidChoice { index: usize, candidates: usize },
}

/// Unbound variables are reported the same way no matter where they are found.
impl From<EvalError> for ResolveError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::Unbound(unbound) => ResolveError::Unbound(unbound),
            other => ResolveError::Eval(other),
        }
    }
}

/// Errors raised while building a [`Domain`](crate::Domain) from names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("fact contains variable `{name}`")]
    VariableInFact { name: String },
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
