//! Generated problem outputs and answer format tags.

use crate::evaluator::VarEnv;

use core::fmt;
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

/// The rendering category of a generated answer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AnswerFormat {
    /// Infer the category from the rendered answer text.
    Auto,
    /// A plain integer, like `$12$`.
    Number,
    /// A fixed-point decimal, like `$-3.50$`.
    Decimal,
    /// A currency amount. Never inferred; only declared by a template model.
    Money,
    /// A LaTeX fraction, like `$\frac{1}{2}$`.
    Fraction,
    /// A LaTeX mixed number, like `$1\frac{1}{2}$`.
    Mixed,
}

lazy_static! {
    static ref NUMBER_ANSWER: Regex = Regex::new(r"^\$-?\d+\$$").unwrap();
    static ref DECIMAL_ANSWER: Regex = Regex::new(r"^\$-?\d+\.\d+\$$").unwrap();
    static ref FRACTION_ANSWER: Regex = Regex::new(r"^\$-?\\frac\{\d+\}\{\d+\}\$$").unwrap();
    static ref MIXED_ANSWER: Regex = Regex::new(r"^\$-?\d+\\frac\{\d+\}\{\d+\}\$$").unwrap();
}

impl AnswerFormat {
    /// Infers the format category of a rendered answer by matching its text
    /// against the structural patterns for `number`, `decimal`, `fraction`,
    /// and `mixed`, in that order; the first match wins. Returns `None` when
    /// no pattern matches.
    pub fn detect(answer: &str) -> Option<AnswerFormat> {
        use AnswerFormat::*;
        if NUMBER_ANSWER.is_match(answer) {
            Some(Number)
        } else if DECIMAL_ANSWER.is_match(answer) {
            Some(Decimal)
        } else if FRACTION_ANSWER.is_match(answer) {
            Some(Fraction)
        } else if MIXED_ANSWER.is_match(answer) {
            Some(Mixed)
        } else {
            None
        }
    }
}

impl fmt::Display for AnswerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AnswerFormat::*;
        write!(
            f,
            "{}",
            match self {
                Auto => "auto",
                Number => "number",
                Decimal => "decimal",
                Money => "money",
                Fraction => "fraction",
                Mixed => "mixed",
            }
        )
    }
}

impl FromStr for AnswerFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use AnswerFormat::*;
        match s {
            "auto" => Ok(Auto),
            "number" => Ok(Number),
            "decimal" => Ok(Decimal),
            "money" => Ok(Money),
            "fraction" => Ok(Fraction),
            "mixed" => Ok(Mixed),
            _ => Err(()),
        }
    }
}

/// A generated problem. Immutable output of a successful generation attempt.
#[derive(Clone, PartialEq, Debug)]
pub struct Problem {
    /// The rendered question text.
    pub question: String,
    /// The rendered answer text.
    pub answer: String,
    /// The declared or inferred format of `answer`.
    pub format: AnswerFormat,
    /// Units display option, passed through untouched from the template
    /// model.
    pub units: Option<String>,
    /// Right-to-left display flag, passed through untouched from the template
    /// model.
    pub rtl: bool,
    /// The variable bindings of the generating attempt, in declaration order.
    pub vars: VarEnv,
}
