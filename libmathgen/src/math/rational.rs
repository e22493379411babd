use super::gcd;

use num_bigint::BigInt;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};

use core::cmp::Ordering;
use core::fmt;
use std::collections::HashSet;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Error produced when a zero denominator or a zero divisor is encountered.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct DivisionByZero;

impl fmt::Display for DivisionByZero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "division by zero")
    }
}

impl std::error::Error for DivisionByZero {}

/// An exact rational number, stored as an arbitrary-precision
/// numerator/denominator pair.
///
/// Invariants, upheld by every constructor and operation:
///
/// - the pair is always in lowest terms (`gcd(|num|, den) == 1`)
/// - the denominator is always positive; the sign lives on the numerator
///
/// `Rational` is an immutable value type: arithmetic never mutates an
/// operand, it always produces a new instance. All arithmetic is exact; no
/// operation goes through a floating-point intermediate.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    /// Creates a rational from a numerator/denominator pair, reducing it to
    /// lowest terms. A zero denominator fails with [DivisionByZero].
    pub fn new<N, D>(num: N, den: D) -> Result<Self, DivisionByZero>
    where
        N: Into<BigInt>,
        D: Into<BigInt>,
    {
        let den = den.into();
        if den.is_zero() {
            return Err(DivisionByZero);
        }
        Ok(Self::reduced(num.into(), den))
    }

    /// Creates an integral rational.
    pub fn from_integer<N: Into<BigInt>>(num: N) -> Self {
        Rational {
            num: num.into(),
            den: BigInt::one(),
        }
    }

    /// Parses a plain decimal literal like `"42"`, `"1.25"`, or `"-0.5"` into
    /// an exact value.
    pub fn from_decimal_str(s: &str) -> Result<Self, ParseRationalError> {
        let err = || ParseRationalError { text: s.to_owned() };
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, s),
        };
        let (int_part, frac_part) = match digits.find('.') {
            Some(dot) => (&digits[..dot], &digits[dot + 1..]),
            None => (digits, ""),
        };
        if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        if !frac_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let num = BigInt::from_str(&format!("{}{}", int_part, frac_part)).map_err(|_| err())?;
        let den = BigInt::from(10).pow(frac_part.len() as u32);
        Ok(Self::reduced(num * sign, den))
    }

    /// The reduction pass behind every constructor: sign to the numerator,
    /// then divide through by the GCD. `den` must be nonzero.
    fn reduced(mut num: BigInt, mut den: BigInt) -> Self {
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        let g = gcd(&num, &den);
        if !g.is_one() {
            num /= &g;
            den /= &g;
        }
        Rational { num, den }
    }

    /// The reduced numerator. Carries the sign of the value.
    pub fn num(&self) -> &BigInt {
        &self.num
    }

    /// The reduced denominator. Always positive.
    pub fn den(&self) -> &BigInt {
        &self.den
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    /// `true` iff the value is integral (denominator 1).
    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    /// `true` iff the value is not integral.
    pub fn is_fraction(&self) -> bool {
        !self.is_integer()
    }

    /// `true` iff the value is a fraction with |numerator| < denominator.
    pub fn is_proper(&self) -> bool {
        self.is_fraction() && self.num.abs() < self.den
    }

    /// `true` iff the value is a fraction that is not proper.
    pub fn is_improper(&self) -> bool {
        self.is_fraction() && !self.is_proper()
    }

    /// `true` iff the decimal expansion of the value repeats.
    ///
    /// Detected by simulating the long division of `|num| mod den` by `den`
    /// and watching for a remainder cycle: a remainder seen twice means the
    /// digit sequence from its first occurrence repeats forever, while a zero
    /// remainder means the expansion terminates.
    pub fn is_repeating_decimal(&self) -> bool {
        let mut rem = self.num.abs() % &self.den;
        let mut seen = HashSet::new();
        while !rem.is_zero() {
            if !seen.insert(rem.clone()) {
                return true;
            }
            rem = rem * 10 % &self.den;
        }
        false
    }

    /// Exact division. A zero divisor fails with [DivisionByZero].
    pub fn div(&self, other: &Rational) -> Result<Rational, DivisionByZero> {
        if other.num.is_zero() {
            return Err(DivisionByZero);
        }
        Ok(Self::reduced(
            &self.num * &other.den,
            &self.den * &other.num,
        ))
    }

    /// Floor division: `(self / other).floor()`.
    pub fn floordiv(&self, other: &Rational) -> Result<Rational, DivisionByZero> {
        Ok(self.div(other)?.floor())
    }

    /// Remainder with the divisor's sign: `self - other * (self / other).floor()`.
    pub fn rem(&self, other: &Rational) -> Result<Rational, DivisionByZero> {
        let q = self.floordiv(other)?;
        Ok(self - &(other * &q))
    }

    /// Floor quotient and remainder in one step.
    pub fn divmod(&self, other: &Rational) -> Result<(Rational, Rational), DivisionByZero> {
        let q = self.floordiv(other)?;
        let r = self - &(other * &q);
        Ok((q, r))
    }

    /// Raises the value to an integer power. A negative exponent inverts the
    /// base, so zero to a negative power fails with [DivisionByZero].
    pub fn pow(&self, exp: i32) -> Result<Rational, DivisionByZero> {
        if exp >= 0 {
            let e = exp as u32;
            Ok(Rational {
                num: (&self.num).pow(e),
                den: (&self.den).pow(e),
            })
        } else {
            if self.num.is_zero() {
                return Err(DivisionByZero);
            }
            let e = exp.unsigned_abs();
            Ok(Self::reduced((&self.den).pow(e), (&self.num).pow(e)))
        }
    }

    pub fn abs(&self) -> Rational {
        Rational {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    /// The largest integral value not greater than `self`.
    pub fn floor(&self) -> Rational {
        if self.is_integer() {
            return self.clone();
        }
        // BigInt division truncates toward zero; floor of a negative
        // non-integer is one below the truncation.
        let q = &self.num / &self.den;
        let q = if self.num.is_negative() { q - 1 } else { q };
        Self::from_integer(q)
    }

    /// The smallest integral value not less than `self`.
    pub fn ceil(&self) -> Rational {
        if self.is_integer() {
            return self.clone();
        }
        let q = &self.num / &self.den;
        let q = if self.num.is_negative() { q } else { q + 1 };
        Self::from_integer(q)
    }

    /// Rounds to the nearest integral value, ties to even.
    pub fn round(&self) -> Rational {
        let f = self.floor();
        let frac = self - &f;
        let twice = &frac + &frac;
        match twice.cmp(&Rational::one()) {
            Ordering::Less => f,
            Ordering::Greater => &f + &Rational::one(),
            Ordering::Equal => {
                if (&f.num % BigInt::from(2)).is_zero() {
                    f
                } else {
                    &f + &Rational::one()
                }
            }
        }
    }

    /// Truncates toward zero.
    pub fn trunc(&self) -> Rational {
        Self::from_integer(&self.num / &self.den)
    }

    /// The value as an `i64`, if it is integral and fits.
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.num.to_i64()
        } else {
            None
        }
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, other: &Rational) -> Rational {
        Rational::reduced(
            &self.num * &other.den + &other.num * &self.den,
            &self.den * &other.den,
        )
    }
}

impl Sub for &Rational {
    type Output = Rational;

    fn sub(self, other: &Rational) -> Rational {
        Rational::reduced(
            &self.num * &other.den - &other.num * &self.den,
            &self.den * &other.den,
        )
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, other: &Rational) -> Rational {
        Rational::reduced(&self.num * &other.num, &self.den * &other.den)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    // Cross-multiplication; both denominators are positive, so the direction
    // of the comparison is preserved.
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl fmt::Debug for Rational {
    /// The canonical debug form: `Rational(num)` for integral values,
    /// `Rational(num, den)` otherwise. Re-parses to an equal value via
    /// [FromStr].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den.is_one() {
            write!(f, "Rational({})", self.num)
        } else {
            write!(f, "Rational({}, {})", self.num, self.den)
        }
    }
}

/// Error produced when a string does not parse as a [Rational].
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ParseRationalError {
    /// The text that failed to parse.
    pub text: String,
}

impl fmt::Display for ParseRationalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#""{}" is not a valid rational"#, self.text)
    }
}

impl std::error::Error for ParseRationalError {}

impl FromStr for Rational {
    type Err = ParseRationalError;

    /// Parses the canonical debug form emitted by [fmt::Debug].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRationalError { text: s.to_owned() };
        let inner = s
            .trim()
            .strip_prefix("Rational(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let mut parts = inner.splitn(2, ',');
        let num = BigInt::from_str(parts.next().ok_or_else(err)?.trim()).map_err(|_| err())?;
        let den = match parts.next() {
            Some(den) => BigInt::from_str(den.trim()).map_err(|_| err())?,
            None => BigInt::one(),
        };
        Rational::new(num, den).map_err(|_| err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat(num: i64, den: i64) -> Rational {
        Rational::new(num, den).unwrap()
    }

    fn int(num: i64) -> Rational {
        Rational::from_integer(num)
    }

    #[test]
    fn reduction_invariant() {
        const CASES: [(i64, i64, i64, i64); 6] = [
            (6, 4, 3, 2),
            (-6, 4, -3, 2),
            (6, -4, -3, 2),
            (-6, -4, 3, 2),
            (0, 5, 0, 1),
            (8, 2, 4, 1),
        ];
        for (num, den, rnum, rden) in CASES.iter() {
            let r = rat(*num, *den);
            assert_eq!(r.num(), &BigInt::from(*rnum));
            assert_eq!(r.den(), &BigInt::from(*rden));
            assert!(gcd(r.num(), r.den()).is_one() || r.is_zero());
        }
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(Rational::new(1, 0), Err(DivisionByZero));
    }

    #[test]
    fn debug_repr_round_trips() {
        for r in &[int(0), int(-42), rat(7, 3), rat(-7, 3), rat(1, 2)] {
            let repr = format!("{:?}", r);
            assert_eq!(&repr.parse::<Rational>().unwrap(), r, "{}", repr);
        }
        assert_eq!(format!("{:?}", int(5)), "Rational(5)");
        assert_eq!(format!("{:?}", rat(-7, 3)), "Rational(-7, 3)");
    }

    #[test]
    fn decimal_literals() {
        assert_eq!(Rational::from_decimal_str("42").unwrap(), int(42));
        assert_eq!(Rational::from_decimal_str("1.25").unwrap(), rat(5, 4));
        assert_eq!(Rational::from_decimal_str("-0.5").unwrap(), rat(-1, 2));
        assert_eq!(Rational::from_decimal_str("5.").unwrap(), int(5));
        assert!(Rational::from_decimal_str("1.2.3").is_err());
        assert!(Rational::from_decimal_str("").is_err());
    }

    #[test]
    fn exact_arithmetic() {
        assert_eq!(&rat(1, 2) + &rat(1, 3), rat(5, 6));
        assert_eq!(&rat(1, 10) + &rat(2, 10), rat(3, 10)); // no float drift
        assert_eq!(&rat(1, 2) - &rat(1, 3), rat(1, 6));
        assert_eq!(&rat(2, 3) * &rat(3, 4), rat(1, 2));
        assert_eq!(rat(2, 3).div(&rat(4, 3)).unwrap(), rat(1, 2));
        assert_eq!(-&rat(1, 2), rat(-1, 2));
        assert_eq!(rat(1, 2).div(&Rational::zero()), Err(DivisionByZero));
    }

    #[test]
    fn floor_division_follows_divisor_sign() {
        assert_eq!(int(7).floordiv(&int(3)).unwrap(), int(2));
        assert_eq!(int(-7).floordiv(&int(3)).unwrap(), int(-3));
        assert_eq!(int(7).rem(&int(3)).unwrap(), int(1));
        assert_eq!(int(-7).rem(&int(3)).unwrap(), int(2));
        assert_eq!(int(7).rem(&int(-3)).unwrap(), int(-2));
        let (q, r) = int(-7).divmod(&int(3)).unwrap();
        assert_eq!((q, r), (int(-3), int(2)));
    }

    #[test]
    fn pow() {
        assert_eq!(rat(2, 3).pow(2).unwrap(), rat(4, 9));
        assert_eq!(rat(2, 3).pow(0).unwrap(), int(1));
        assert_eq!(rat(2, 3).pow(-1).unwrap(), rat(3, 2));
        assert_eq!(rat(-2, 3).pow(-2).unwrap(), rat(9, 4));
        assert_eq!(Rational::zero().pow(-1), Err(DivisionByZero));
    }

    #[test]
    fn rounding() {
        const CASES: [(i64, i64, i64, i64, i64, i64); 5] = [
            // (num, den, floor, ceil, round, trunc)
            (7, 2, 3, 4, 4, 3),
            (5, 2, 2, 3, 2, 2), // ties to even
            (-5, 2, -3, -2, -2, -2),
            (-7, 3, -3, -2, -2, -2),
            (4, 1, 4, 4, 4, 4),
        ];
        for (num, den, fl, ce, ro, tr) in CASES.iter() {
            let r = rat(*num, *den);
            assert_eq!(r.floor(), int(*fl), "floor {:?}", r);
            assert_eq!(r.ceil(), int(*ce), "ceil {:?}", r);
            assert_eq!(r.round(), int(*ro), "round {:?}", r);
            assert_eq!(r.trunc(), int(*tr), "trunc {:?}", r);
        }
    }

    #[test]
    fn classification() {
        assert!(int(4).is_integer());
        assert!(!int(4).is_fraction());
        assert!(rat(1, 3).is_proper());
        assert!(!rat(1, 3).is_improper());
        assert!(rat(7, 3).is_improper());
        assert!(rat(-7, 3).is_improper());
        assert!(!rat(8, 2).is_fraction()); // reduces to an integer
    }

    #[test]
    fn repeating_decimals() {
        assert!(rat(1, 3).is_repeating_decimal());
        assert!(rat(1, 6).is_repeating_decimal());
        assert!(rat(1, 7).is_repeating_decimal());
        assert!(!rat(1, 4).is_repeating_decimal());
        assert!(!rat(3, 8).is_repeating_decimal());
        assert!(!int(5).is_repeating_decimal());
    }

    #[test]
    fn total_ordering() {
        assert!(rat(1, 3) < rat(1, 2));
        assert!(rat(-1, 2) < rat(-1, 3));
        assert!(int(2) > rat(5, 3));
        assert_eq!(rat(2, 4), rat(1, 2));
    }
}
