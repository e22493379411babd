//! The builtin function library callable from expressions.
//!
//! The table is closed: names resolve through a static match, so adding a
//! builtin is a compile-time change, not a runtime registration.

use super::errors::EvalError;
use super::types::{RangeSeq, Value};
use crate::math::{self, Rational};

use num_bigint::BigInt;
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::Rng;

pub(crate) type Builtin = fn(&mut StdRng, &[Value]) -> Result<Value, EvalError>;

/// Resolves a function name to its builtin implementation.
pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    Some(match name {
        "rand" => rand,
        "range" => range,
        "gcd" => gcd,
        "lcm" => lcm,
        "is_prime" => is_prime,
        "is_integer" => is_integer,
        "is_fraction" => is_fraction,
        "is_proper" => is_proper,
        "is_improper" => is_improper,
        "btwn" => btwn,
        "btwn_inclusive" => btwn_inclusive,
        _ => return None,
    })
}

fn number(function: &'static str, arg: &Value) -> Result<Rational, EvalError> {
    match arg {
        Value::Number(num) => Ok(num.clone()),
        other => Err(EvalError::TypeMismatch {
            reason: format!(
                "{} expects number arguments, found {}",
                function,
                other.type_name()
            ),
        }),
    }
}

fn numbers(function: &'static str, args: &[Value]) -> Result<Vec<Rational>, EvalError> {
    args.iter().map(|arg| number(function, arg)).collect()
}

fn arity(
    function: &'static str,
    expected: &'static str,
    args: &[Value],
    ok: bool,
) -> Result<(), EvalError> {
    if ok {
        Ok(())
    } else {
        Err(EvalError::Arity {
            function,
            expected,
            got: args.len(),
        })
    }
}

/// `rand(lo, hi, [den = 1])`: draws a uniformly random integer numerator in
/// `[lo·den, hi·den]` inclusive and returns it over `den`. Deterministic in
/// the evaluation's seed.
fn rand(rng: &mut StdRng, args: &[Value]) -> Result<Value, EvalError> {
    arity("rand", "2 to 3", args, args.len() == 2 || args.len() == 3)?;
    let args = numbers("rand", args)?;
    let den = match args.get(2) {
        Some(den) => den.clone(),
        None => Rational::one(),
    };
    if !den.is_integer() || den <= Rational::zero() {
        return Err(EvalError::InvalidArguments {
            function: "rand",
            reason: format!("denominator {} must be a positive integer", den),
        });
    }
    let lo = (&args[0] * &den).ceil();
    let hi = (&args[1] * &den).floor();
    let (lo, hi) = match (lo.to_i64(), hi.to_i64()) {
        (Some(lo), Some(hi)) if lo <= hi => (lo, hi),
        (Some(_), Some(_)) => {
            return Err(EvalError::InvalidArguments {
                function: "rand",
                reason: format!("empty range [{}, {}]", args[0], args[1]),
            })
        }
        _ => {
            return Err(EvalError::InvalidArguments {
                function: "rand",
                reason: format!("bounds [{}, {}] are too large", args[0], args[1]),
            })
        }
    };
    let numerator = rng.gen_range(lo..=hi);
    Ok(Value::Number(Rational::new(numerator, den.num().clone())?))
}

/// `range(stop)`, `range(start, stop)`, or `range(start, stop, step)`:
/// a lazy, finite, restartable counting sequence. See [RangeSeq].
fn range(_: &mut StdRng, args: &[Value]) -> Result<Value, EvalError> {
    arity("range", "1 to 3", args, !args.is_empty() && args.len() <= 3)?;
    let args = numbers("range", args)?;
    let (start, stop, step) = match args.len() {
        1 => (Rational::zero(), args[0].clone(), None),
        2 => (args[0].clone(), args[1].clone(), None),
        _ => (args[0].clone(), args[1].clone(), Some(args[2].clone())),
    };
    Ok(Value::Range(RangeSeq::new(start, stop, step)))
}

fn rational_gcd(a: &Rational, b: &Rational) -> Result<Rational, EvalError> {
    Ok(Rational::new(
        math::gcd(a.num(), b.num()),
        math::lcm(a.den(), b.den()),
    )?)
}

fn rational_lcm(a: &Rational, b: &Rational) -> Result<Rational, EvalError> {
    Ok(Rational::new(
        math::lcm(a.num(), b.num()),
        math::gcd(a.den(), b.den()),
    )?)
}

/// `gcd(*args)`: variadic GCD over rationals, reduced pairwise left to right.
fn gcd(_: &mut StdRng, args: &[Value]) -> Result<Value, EvalError> {
    arity("gcd", "at least 1", args, !args.is_empty())?;
    let args = numbers("gcd", args)?;
    let mut acc = args[0].clone();
    for arg in &args[1..] {
        acc = rational_gcd(&acc, arg)?;
    }
    Ok(Value::Number(acc))
}

/// `lcm(*args)`: variadic LCM over rationals, reduced pairwise left to right.
fn lcm(_: &mut StdRng, args: &[Value]) -> Result<Value, EvalError> {
    arity("lcm", "at least 1", args, !args.is_empty())?;
    let args = numbers("lcm", args)?;
    let mut acc = args[0].clone();
    for arg in &args[1..] {
        acc = rational_lcm(&acc, arg)?;
    }
    Ok(Value::Number(acc))
}

/// `is_prime(*args)`: true iff every argument is a positive integer prime.
/// Non-integer arguments are simply not prime, not an error.
fn is_prime(_: &mut StdRng, args: &[Value]) -> Result<Value, EvalError> {
    arity("is_prime", "at least 1", args, !args.is_empty())?;
    let args = numbers("is_prime", args)?;
    Ok(Value::Bool(args.iter().all(int_is_prime)))
}

// Trial division up to the value itself.
fn int_is_prime(n: &Rational) -> bool {
    if !n.is_integer() || n.num() <= &BigInt::one() {
        return false;
    }
    let n = n.num();
    let mut i = BigInt::from(2);
    while &i < n {
        if (n % &i).is_zero() {
            return false;
        }
        i += 1;
    }
    true
}

macro_rules! flag_builtins {
    ($($(#[doc = $doc:expr])+ $name:ident)*) => {$(
        $(#[doc = $doc])+
        fn $name(_: &mut StdRng, args: &[Value]) -> Result<Value, EvalError> {
            arity(stringify!($name), "at least 1", args, !args.is_empty())?;
            let args = numbers(stringify!($name), args)?;
            Ok(Value::Bool(args.iter().all(|arg| arg.$name())))
        }
    )*};
}

flag_builtins! {
    /// `is_integer(*args)`: true iff every argument is integral.
    is_integer
    /// `is_fraction(*args)`: true iff every argument is non-integral.
    is_fraction
    /// `is_proper(*args)`: true iff every argument is a proper fraction.
    is_proper
    /// `is_improper(*args)`: true iff every argument is an improper fraction.
    is_improper
}

/// `btwn(x, a, b)`: strict range membership, `a < x < b`.
fn btwn(_: &mut StdRng, args: &[Value]) -> Result<Value, EvalError> {
    arity("btwn", "exactly 3", args, args.len() == 3)?;
    let args = numbers("btwn", args)?;
    Ok(Value::Bool(args[1] < args[0] && args[0] < args[2]))
}

/// `btwn_inclusive(x, a, b)`: inclusive range membership, `a <= x <= b`.
fn btwn_inclusive(_: &mut StdRng, args: &[Value]) -> Result<Value, EvalError> {
    arity("btwn_inclusive", "exactly 3", args, args.len() == 3)?;
    let args = numbers("btwn_inclusive", args)?;
    Ok(Value::Bool(args[1] <= args[0] && args[0] <= args[2]))
}
