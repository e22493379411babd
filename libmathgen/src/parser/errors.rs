//! Errors produced by the libmathgen parsers.

use core::fmt;

/// An error in a template program or expression's text. Parse errors are
/// fatal: they are reported once, at parse time, and never retried.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ParseError {
    /// A program line that does not begin with a recognized directive prefix.
    UnrecognizedDirective {
        /// The offending line.
        line: String,
    },
    /// A directive with a recognized prefix whose payload does not have the
    /// required shape.
    MalformedDirective {
        /// The offending line.
        line: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Expression text that does not parse.
    ExpressionSyntax {
        /// The offending expression text.
        text: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A template with an unterminated or malformed placeholder.
    MalformedTemplate {
        /// The offending template text.
        text: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseError::*;
        match self {
            UnrecognizedDirective { line } => write!(
                f,
                concat!(
                    r#"unrecognized directive "{}": every line must begin with "#,
                    r#""@var", "@condition", "@question", "@answer", or "@group""#
                ),
                line
            ),
            MalformedDirective { line, reason } => {
                write!(f, r#"malformed directive "{}": {}"#, line, reason)
            }
            ExpressionSyntax { text, reason } => {
                write!(f, r#"syntax error in "{}": {}"#, text, reason)
            }
            MalformedTemplate { text, reason } => {
                write!(f, r#"malformed template "{}": {}"#, text, reason)
            }
        }
    }
}

impl std::error::Error for ParseError {}
