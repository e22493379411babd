//! Emit strategies for exact rational values.
//!
//! Every form renders LaTeX-compatible math-mode text. Which forms apply to a
//! value depends on its classification; asking for an inapplicable form fails
//! with [UnsupportedForm].

use crate::math::Rational;

use core::fmt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::str::FromStr;

/// The number of digits [EmitForm::Decimal] renders when a placeholder does
/// not specify one.
pub const DEFAULT_DECIMAL_DIGITS: u32 = 3;

/// The form in which a [Rational] should be emitted.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EmitForm {
    /// The most natural form for the value: [integer](EmitForm::Integer) for
    /// integral values, [mixed](EmitForm::Mixed) for improper fractions, and
    /// [fraction](EmitForm::Fraction) otherwise.
    Auto,
    /// Plain signed integer, like `-3`. Only applicable to integral values.
    Integer,
    /// LaTeX fraction built from the absolute numerator and denominator, like
    /// `-\frac{1}{2}`.
    Fraction,
    /// LaTeX mixed number, like `2\frac{1}{3}`. Only applicable to improper
    /// values.
    Mixed,
    /// Fixed-point decimal computed by exact long division, like `0.333`.
    Decimal,
    /// Every form applicable to the value, comma-joined, with exact-duplicate
    /// strings suppressed in first-occurrence order.
    All,
}

impl fmt::Display for EmitForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EmitForm::*;
        write!(
            f,
            "{}",
            match self {
                Auto => "auto",
                Integer => "integer",
                Fraction => "fraction",
                Mixed => "mixed",
                Decimal => "decimal",
                All => "all",
            }
        )
    }
}

impl FromStr for EmitForm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use EmitForm::*;
        match s {
            "auto" => Ok(Auto),
            "integer" => Ok(Integer),
            "fraction" => Ok(Fraction),
            "mixed" => Ok(Mixed),
            "decimal" => Ok(Decimal),
            "all" => Ok(All),
            _ => Err(()),
        }
    }
}

/// Error produced when a value cannot be rendered in a requested form.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct UnsupportedForm {
    /// The requested form.
    pub form: EmitForm,
    /// The canonical debug text of the value that could not be rendered.
    pub value: String,
}

impl fmt::Display for UnsupportedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"cannot emit {} in "{}" form"#, self.value, self.form)
    }
}

impl std::error::Error for UnsupportedForm {}

impl Rational {
    /// Emits the value in the given [EmitForm].
    ///
    /// `decimal_digits` bounds the fractional digit count of
    /// [EmitForm::Decimal] and is ignored by every other form.
    pub fn emit(&self, form: EmitForm, decimal_digits: u32) -> Result<String, UnsupportedForm> {
        let unsupported = || UnsupportedForm {
            form,
            value: format!("{:?}", self),
        };
        match form {
            EmitForm::Auto => Ok(self.emit_auto()),
            EmitForm::Integer if self.is_integer() => Ok(self.emit_integer()),
            EmitForm::Fraction if self.is_fraction() => Ok(self.emit_fraction()),
            EmitForm::Mixed if self.is_improper() => Ok(self.emit_mixed()),
            EmitForm::Decimal => Ok(self.emit_decimal(decimal_digits)),
            EmitForm::All => {
                let mut outputs = Vec::with_capacity(2);
                if self.is_integer() {
                    outputs.push(self.emit_integer());
                }
                if self.is_fraction() {
                    outputs.push(self.emit_fraction());
                }
                if self.is_improper() {
                    outputs.push(self.emit_mixed());
                }
                let mut distinct: Vec<String> = Vec::with_capacity(outputs.len());
                for output in outputs {
                    if !distinct.contains(&output) {
                        distinct.push(output);
                    }
                }
                Ok(distinct.join(","))
            }
            _ => Err(unsupported()),
        }
    }

    fn emit_auto(&self) -> String {
        if self.is_integer() {
            self.emit_integer()
        } else if self.is_improper() {
            self.emit_mixed()
        } else {
            self.emit_fraction()
        }
    }

    fn emit_integer(&self) -> String {
        self.num().to_string()
    }

    fn emit_fraction(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(r"{}\frac{{{}}}{{{}}}", sign, self.num().abs(), self.den())
    }

    fn emit_mixed(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.num().abs();
        let whole = &num / self.den();
        let rem = &num % self.den();
        if rem.is_zero() {
            // Unreachable for reduced improper fractions, but the form is
            // defined anyway: the fraction term is omitted.
            return format!("{}{}", sign, whole);
        }
        format!(r"{}{}\frac{{{}}}{{{}}}", sign, whole, rem, self.den())
    }

    /// Fixed-point rendering by exact long division, rounding half-up on the
    /// digit beyond the requested precision with full carry propagation.
    /// Trailing fractional zeros (and a bare trailing point) are stripped;
    /// a value rounding to exactly zero renders as `"0"`.
    fn emit_decimal(&self, decimal_digits: u32) -> String {
        if self.is_zero() {
            return "0".to_owned();
        }
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.num().abs();
        let den = self.den().clone();

        if decimal_digits == 0 {
            let mut q = &num / &den;
            if (&num % &den) * 2 >= den {
                q += 1;
            }
            if q.is_zero() {
                return "0".to_owned();
            }
            return format!("{}{}", sign, q);
        }

        let whole = &num / &den;
        let mut rem = &num % &den;
        let mut int_digits: Vec<u8> = whole.to_string().bytes().map(|b| b - b'0').collect();
        let mut frac_digits: Vec<u8> = Vec::with_capacity(decimal_digits as usize);
        for _ in 0..decimal_digits {
            rem *= 10;
            frac_digits.push((&rem / &den).to_u8().unwrap());
            rem %= &den;
        }

        if &rem * 2 >= den {
            let mut carry = true;
            for digit in frac_digits.iter_mut().rev() {
                *digit += 1;
                if *digit == 10 {
                    *digit = 0;
                } else {
                    carry = false;
                    break;
                }
            }
            if carry {
                for digit in int_digits.iter_mut().rev() {
                    *digit += 1;
                    if *digit == 10 {
                        *digit = 0;
                    } else {
                        carry = false;
                        break;
                    }
                }
            }
            if carry {
                // The carry overflowed every digit; grow the integer part.
                int_digits.insert(0, 1);
            }
        }

        while frac_digits.last() == Some(&0) {
            frac_digits.pop();
        }

        let int_part: String = int_digits.iter().map(|d| (d + b'0') as char).collect();
        if frac_digits.is_empty() {
            if int_digits.iter().all(|d| *d == 0) {
                return "0".to_owned();
            }
            return format!("{}{}", sign, int_part);
        }
        let frac_part: String = frac_digits.iter().map(|d| (d + b'0') as char).collect();
        format!("{}{}.{}", sign, int_part, frac_part)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.emit_auto())
    }
}
