//! Errors produced by the libmathgen evaluator.

use crate::emit::UnsupportedForm;
use crate::math::DivisionByZero;

use core::fmt;

/// An error raised while evaluating an expression.
///
/// Every variant is fatal and surfaces immediately to the caller; none of
/// them participates in the generator's retry loop. (Only the *falsity* of a
/// condition directive is retryable, and that is an attempt outcome, not an
/// error.)
#[derive(PartialEq, Clone, Debug)]
pub enum EvalError {
    /// A variable reference with no binding in the environment.
    UnknownVariable {
        /// The unresolved name.
        name: String,
    },
    /// A call to a function not in the builtin table.
    UnknownFunction {
        /// The unresolved name.
        name: String,
    },
    /// Division or modulo by zero.
    DivisionByZero,
    /// A builtin called with the wrong number of arguments.
    Arity {
        /// The builtin that was called.
        function: &'static str,
        /// The argument count it accepts.
        expected: &'static str,
        /// The argument count it got.
        got: usize,
    },
    /// An operation applied to operands of the wrong type.
    TypeMismatch {
        /// What went wrong.
        reason: String,
    },
    /// A builtin called with arguments of the right type but unusable values.
    InvalidArguments {
        /// The builtin that was called.
        function: &'static str,
        /// What went wrong.
        reason: String,
    },
    /// A rendering form inapplicable to the value it was applied to.
    UnsupportedForm(UnsupportedForm),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EvalError::*;
        match self {
            UnknownVariable { name } => write!(f, r#"unknown variable "{}""#, name),
            UnknownFunction { name } => write!(f, r#"unknown function "{}""#, name),
            DivisionByZero => write!(f, "division by zero"),
            Arity {
                function,
                expected,
                got,
            } => write!(
                f,
                "{} expects {} argument(s), got {}",
                function, expected, got
            ),
            TypeMismatch { reason } => write!(f, "{}", reason),
            InvalidArguments { function, reason } => write!(f, "{}: {}", function, reason),
            UnsupportedForm(unsupported) => write!(f, "{}", unsupported),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<DivisionByZero> for EvalError {
    fn from(_: DivisionByZero) -> Self {
        EvalError::DivisionByZero
    }
}

impl From<UnsupportedForm> for EvalError {
    fn from(unsupported: UnsupportedForm) -> Self {
        EvalError::UnsupportedForm(unsupported)
    }
}
