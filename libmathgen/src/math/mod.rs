//! The numeric kernel used by [evaluation][crate::evaluator] and
//! [rendering][crate::emit].
//!
//! This module is decoupled from the rest of `libmathgen` because:
//!
//! - `math`'s algorithms operate on raw integer pairs rather than the
//!   libmathgen [grammar][crate::grammar].
//! - `math` can be developed (and tested) independently of the template
//!   language.

mod gcd;
pub use gcd::*;

mod rational;
pub use rational::*;
