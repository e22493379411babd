//! libmathgen generates randomized, reproducible math problems from a small
//! line-oriented template language.
//!
//! A template program is a list of directives:
//!
//! ```text
//! @var a = rand(3, 10)
//! @var b = rand(3, 10)
//! @condition a < b
//! @question {a} + {b} = ?
//! @answer {a + b}
//! ```
//!
//! [ProblemGenerator] runs attempts over the program — binding variables,
//! checking conditions, rendering question/answer templates — until an
//! attempt is valid, driven entirely by a deterministic seed: the same base
//! seed always yields the same problems. All arithmetic is exact, carried by
//! the arbitrary-precision [Rational] type.

mod emit;
pub use emit::{EmitForm, UnsupportedForm, DEFAULT_DECIMAL_DIGITS};

mod evaluator;
pub use evaluator::{evaluate, EvalError, EvaluateError, RangeSeq, Value, VarEnv};

mod generate;
pub use generate::{GenerateError, GeneratorOptions, ProblemGenerator};

mod grammar;
pub use grammar::*;

mod math;
pub use math::{DivisionByZero, Rational};

mod parser;
pub use parser::{parse_expression, parse_program, ParseError};

mod problem;
pub use problem::{AnswerFormat, Problem};

mod rng;

pub mod scanner;
pub use scanner::scan;

mod utils;
