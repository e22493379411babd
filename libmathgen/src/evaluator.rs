//! Evaluation of mathgen expressions.
//!
//! The pipeline is scan → parse → [literal rewrite][rewrite] → tree walk.
//! Evaluation runs against three things: a read-only variable environment, the
//! [builtin function table][builtins], and a random generator derived
//! deterministically from the caller's seed — the same seed always produces
//! the same draws.

mod builtins;
mod errors;
mod rewrite;
mod types;

pub use errors::EvalError;
pub use types::{RangeSeq, Value, VarEnv};

pub(crate) use rewrite::rewrite_literals;

use crate::grammar::*;
use crate::math::Rational;
use crate::parser::{parse_expression, ParseError};
use crate::rng;

use core::convert::TryFrom;
use core::fmt;
use rand::rngs::StdRng;

/// An error from [evaluate]: the expression either failed to parse or failed
/// to evaluate.
#[derive(PartialEq, Clone, Debug)]
pub enum EvaluateError {
    /// The expression's text does not parse.
    Parse(ParseError),
    /// The expression parsed but did not evaluate.
    Eval(EvalError),
}

impl fmt::Display for EvaluateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluateError::Parse(err) => write!(f, "{}", err),
            EvaluateError::Eval(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EvaluateError {}

impl From<ParseError> for EvaluateError {
    fn from(err: ParseError) -> Self {
        EvaluateError::Parse(err)
    }
}

impl From<EvalError> for EvaluateError {
    fn from(err: EvalError) -> Self {
        EvaluateError::Eval(err)
    }
}

/// Evaluates an expression's text against a variable environment and a seed.
///
/// The result's shape mirrors the expression's: scalar expressions yield
/// [numbers](Value::Number), conditions yield [booleans](Value::Bool), and
/// comprehensions yield [sequences](Value::Seq).
pub fn evaluate(text: &str, vars: &VarEnv, seed: u64) -> Result<Value, EvaluateError> {
    let expr = rewrite_literals(parse_expression(text)?);
    Ok(evaluate_expr(&expr, vars, seed)?)
}

/// Evaluates an already-parsed (and literal-rewritten) expression.
pub fn evaluate_expr(expr: &Expr, vars: &VarEnv, seed: u64) -> Result<Value, EvalError> {
    Evaluator::new(vars, rng::derive(seed)).eval(expr)
}

struct Evaluator<'a> {
    vars: &'a VarEnv,
    /// Comprehension bindings, innermost last. Checked before `vars`.
    scopes: Vec<(String, Value)>,
    rng: StdRng,
}

impl<'a> Evaluator<'a> {
    fn new(vars: &'a VarEnv, rng: StdRng) -> Self {
        Self {
            vars,
            scopes: Vec::new(),
            rng,
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        use Expr::*;
        match expr {
            Number(..) => unreachable!("literals are rewritten before evaluation"),
            Const(konst) => Ok(Value::Number(konst.clone())),
            Bool(b) => Ok(Value::Bool(*b)),
            Var(name) => self.lookup(name),
            UnaryExpr(unary_expr) => self.eval_unary(unary_expr),
            BinaryExpr(binary_expr) => self.eval_binary(binary_expr),
            BoolExpr(bool_expr) => self.eval_bool(bool_expr),
            Comparison(comparison) => self.eval_comparison(comparison),
            Call(call) => self.eval_call(call),
            Comprehension(comprehension) => self.eval_comprehension(comprehension),
        }
    }

    fn lookup(&mut self, name: &str) -> Result<Value, EvalError> {
        if let Some((_, value)) = self.scopes.iter().rev().find(|(bound, _)| bound == name) {
            return Ok(value.clone());
        }
        match self.vars.get(name) {
            Some(value) => Ok(Value::Number(value.clone())),
            None => Err(EvalError::UnknownVariable {
                name: name.to_owned(),
            }),
        }
    }

    fn number(&mut self, expr: &Expr, context: &str) -> Result<Rational, EvalError> {
        match self.eval(expr)? {
            Value::Number(num) => Ok(num),
            other => Err(EvalError::TypeMismatch {
                reason: format!("{} must be a number, found {}", context, other.type_name()),
            }),
        }
    }

    fn boolean(&mut self, expr: &Expr, context: &str) -> Result<bool, EvalError> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::TypeMismatch {
                reason: format!("{} must be a boolean, found {}", context, other.type_name()),
            }),
        }
    }

    fn eval_unary(&mut self, unary_expr: &UnaryExpr) -> Result<Value, EvalError> {
        use UnaryOperator::*;
        match unary_expr.op {
            SignPositive => Ok(Value::Number(
                self.number(&unary_expr.rhs, "a signed operand")?,
            )),
            SignNegative => Ok(Value::Number(
                -&self.number(&unary_expr.rhs, "a signed operand")?,
            )),
            Not => Ok(Value::Bool(!self.boolean(&unary_expr.rhs, "a not operand")?)),
        }
    }

    fn eval_binary(&mut self, binary_expr: &BinaryExpr) -> Result<Value, EvalError> {
        use BinaryOperator::*;
        let lhs = self.number(&binary_expr.lhs, "an arithmetic operand")?;
        let rhs = self.number(&binary_expr.rhs, "an arithmetic operand")?;
        let result = match binary_expr.op {
            Plus => &lhs + &rhs,
            Minus => &lhs - &rhs,
            Mult => &lhs * &rhs,
            Div => lhs.div(&rhs)?,
            FloorDiv => lhs.floordiv(&rhs)?,
            Mod => lhs.rem(&rhs)?,
            Exp => {
                let exp = match rhs.to_i64().and_then(|exp| i32::try_from(exp).ok()) {
                    Some(exp) => exp,
                    None => {
                        return Err(EvalError::InvalidArguments {
                            function: "**",
                            reason: format!("exponent {} must be a small integer", rhs),
                        })
                    }
                };
                lhs.pow(exp)?
            }
        };
        Ok(Value::Number(result))
    }

    fn eval_bool(&mut self, bool_expr: &BoolExpr) -> Result<Value, EvalError> {
        let lhs = self.boolean(&bool_expr.lhs, "a boolean operand")?;
        // Short-circuit: the right operand is only evaluated when the left
        // does not decide the result.
        let result = match bool_expr.op {
            BoolOperator::And => lhs && self.boolean(&bool_expr.rhs, "a boolean operand")?,
            BoolOperator::Or => lhs || self.boolean(&bool_expr.rhs, "a boolean operand")?,
        };
        Ok(Value::Bool(result))
    }

    fn eval_comparison(&mut self, comparison: &Comparison) -> Result<Value, EvalError> {
        let mut prev = self.eval(&comparison.first)?;
        for (op, operand) in &comparison.rest {
            let next = self.eval(operand)?;
            if !compare(*op, &prev, &next)? {
                return Ok(Value::Bool(false));
            }
            prev = next;
        }
        Ok(Value::Bool(true))
    }

    fn eval_call(&mut self, call: &Call) -> Result<Value, EvalError> {
        let builtin = builtins::lookup(&call.name).ok_or_else(|| EvalError::UnknownFunction {
            name: call.name.clone(),
        })?;
        let args = call
            .args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;
        builtin(&mut self.rng, &args)
    }

    fn eval_comprehension(&mut self, comprehension: &Comprehension) -> Result<Value, EvalError> {
        let items = match self.eval(&comprehension.iterable)? {
            Value::Seq(items) => items,
            Value::Range(range) => range.iter().map(Value::Number).collect(),
            other => {
                return Err(EvalError::TypeMismatch {
                    reason: format!(
                        "a comprehension must iterate a sequence, found {}",
                        other.type_name()
                    ),
                })
            }
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            self.scopes.push((comprehension.binding.clone(), item));
            let keep = match &comprehension.filter {
                Some(filter) => self.boolean(filter, "a comprehension filter")?,
                None => true,
            };
            if keep {
                let element = self.eval(&comprehension.element)?;
                if !comprehension.set || !out.contains(&element) {
                    out.push(element);
                }
            }
            self.scopes.pop();
        }
        Ok(Value::Seq(out))
    }
}

fn compare(op: ComparisonOperator, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    use ComparisonOperator::*;
    match (lhs, rhs) {
        (Value::Number(lhs), Value::Number(rhs)) => Ok(match op {
            Lt => lhs < rhs,
            Le => lhs <= rhs,
            Gt => lhs > rhs,
            Ge => lhs >= rhs,
            Eq => lhs == rhs,
            Ne => lhs != rhs,
        }),
        (Value::Bool(lhs), Value::Bool(rhs)) => match op {
            Eq => Ok(lhs == rhs),
            Ne => Ok(lhs != rhs),
            _ => Err(EvalError::TypeMismatch {
                reason: "booleans only support == and != comparisons".to_owned(),
            }),
        },
        (lhs, rhs) => Err(EvalError::TypeMismatch {
            reason: format!("cannot compare {} to {}", lhs.type_name(), rhs.type_name()),
        }),
    }
}

#[cfg(test)]
mod tests {
    // Tests the evaluator's output against the display form of the resulting
    // value.
    macro_rules! evaluator_tests {
        ($($name:ident: $program:expr, $result:expr)*) => {
        $(
            #[test]
            fn $name() {
                use crate::evaluator::{evaluate, VarEnv};

                let value = evaluate($program, &VarEnv::new(), 7).expect($program);
                assert_eq!(value.to_string(), $result);
            }
        )*
        }
    }

    macro_rules! evaluator_error_tests {
        ($($name:ident: $program:expr, $err:pat)*) => {
        $(
            #[test]
            fn $name() {
                use crate::evaluator::{evaluate, EvalError::*, EvaluateError, VarEnv};

                match evaluate($program, &VarEnv::new(), 7) {
                    Err(EvaluateError::Eval($err)) => {}
                    other => panic!("expected an evaluation error, got {:?}", other),
                }
            }
        )*
        }
    }

    mod scalars {
        evaluator_tests! {
            int:                     "1",                   "1"
            negative:                "-3",                  "-3"
            addition:                "1 + 2",               "3"
            division_is_exact:       "1 / 2",               r"\frac{1}{2}"
            improper_division:       "7 / 3",               r"2\frac{1}{3}"
            decimals_are_exact:      "0.1 + 0.2",           r"\frac{3}{10}"
            subtraction:             "1 - 2",               "-1"
            multiplication:          "2 * 3",               "6"
            precedence:              "3 + 5 * 8",           "43"
            parens:                  "(3 + 5) * 8",         "64"
            exponent:                "2 ** 3",              "8"
            exponent_negative:       "2 ** -2",             r"\frac{1}{4}"
            floor_division:          "7 // 2",              "3"
            modulo:                  "8 % 3",               "2"
            modulo_negative:         "-7 % 3",              "2"
            fraction_arithmetic:     "1 / 2 + 1 / 3",       r"\frac{5}{6}"
        }
    }

    mod booleans {
        evaluator_tests! {
            comparison_true:         "2 < 3",               "true"
            comparison_false:        "3 < 2",               "false"
            comparison_chain:        "1 < 2 < 3",           "true"
            comparison_chain_false:  "1 < 3 < 2",           "false"
            equality:                "2 == 2",              "true"
            inequality:              "2 != 2",              "false"
            conjunction:             "true and false",      "false"
            disjunction:             "true or false",       "true"
            negation:                "not false",           "true"
            exact_equality:          "0.1 + 0.2 == 0.3",    "true"
            predicate:               "is_improper(7 / 3)",  "true"
        }
    }

    mod sequences {
        evaluator_tests! {
            range_expands:           "range(5)",            "[0, 1, 2, 3, 4]"
            range_descends:          "range(5, 2)",         "[5, 4, 3]"
            range_sign_mismatch:     "range(2, 8, -1)",     "[]"
            comprehension:           "[x * x for x in range(4)]", "[0, 1, 4, 9]"
            comprehension_filtered:  "[x for x in range(10) if x % 2 == 1]", "[1, 3, 5, 7, 9]"
            set_dedupes:             "{x % 3 for x in range(9)}", "[0, 1, 2]"
            nested_call:             "gcd(12, 18)",         "6"
        }
    }

    mod errors {
        evaluator_error_tests! {
            division_by_zero:        "1 / 0",               DivisionByZero
            modulo_by_zero:          "1 % 0",               DivisionByZero
            unknown_variable:        "a + 1",               UnknownVariable { .. }
            unknown_function:        "frobnicate(1)",       UnknownFunction { .. }
            missing_args:            "gcd()",               Arity { .. }
            mixed_operands:          "1 + true",            TypeMismatch { .. }
            compare_seq_to_number:   "range(3) == 3",       TypeMismatch { .. }
            iterate_scalar:          "[x for x in 3]",      TypeMismatch { .. }
            fractional_exponent:     "2 ** (1 / 2)",        InvalidArguments { .. }
        }

        #[test]
        fn syntax_errors_are_parse_errors() {
            use crate::evaluator::{evaluate, EvaluateError, VarEnv};

            assert!(matches!(
                evaluate("1 +", &VarEnv::new(), 7),
                Err(EvaluateError::Parse(..))
            ));
        }
    }

    mod environment {
        use crate::evaluator::{evaluate, Value, VarEnv};
        use crate::math::Rational;

        fn env(bindings: &[(&str, i64)]) -> VarEnv {
            let mut env = VarEnv::new();
            for (name, value) in bindings {
                env.set(*name, Rational::from_integer(*value));
            }
            env
        }

        #[test]
        fn variables_resolve() {
            let value = evaluate("a + b", &env(&[("a", 1), ("b", 2)]), 7).unwrap();
            assert_eq!(value, Value::Number(Rational::from_integer(3)));
        }

        #[test]
        fn comprehension_binding_shadows_variables() {
            let value = evaluate("[x for x in range(2)]", &env(&[("x", 9)]), 7).unwrap();
            assert_eq!(value.to_string(), "[0, 1]");
        }

        #[test]
        fn same_seed_same_draws() {
            let env = VarEnv::new();
            let a = evaluate("rand(1, 1000000)", &env, 20).unwrap();
            let b = evaluate("rand(1, 1000000)", &env, 20).unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn different_seeds_usually_differ() {
            let env = VarEnv::new();
            let reference = evaluate("rand(1, 1000000)", &env, 0).unwrap();
            let differs = (1..=8u64)
                .any(|seed| evaluate("rand(1, 1000000)", &env, seed).unwrap() != reference);
            assert!(differs);
        }
    }
}
