use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// Calculates the GCD for (u, v) ∈ (Z, Z).
///
/// The result is always non-negative; `gcd(0, 0)` is defined as `0`.
///
/// The [Euclidean GCD] algorithm is used as the underlying implementation,
/// operating on magnitudes so the signs of `u` and `v` are irrelevant.
///
/// [Euclidean GCD]: https://en.wikipedia.org/wiki/Euclidean_algorithm
pub fn gcd(u: &BigInt, v: &BigInt) -> BigInt {
    let mut u = u.abs();
    let mut v = v.abs();
    let mut t;
    while !v.is_zero() {
        t = v;
        v = &u % &t;
        u = t;
    }
    u
}

/// Calculates the LCM for (u, v) ∈ (Z, Z).
///
/// The result is always non-negative; if either argument is `0` the LCM is
/// defined as `0`.
pub fn lcm(u: &BigInt, v: &BigInt) -> BigInt {
    if u.is_zero() || v.is_zero() {
        return BigInt::zero();
    }
    (u / gcd(u, v) * v).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: [(i64, i64, i64); 7] = [
        (13, 13, 13),
        (37, 600, 1),
        (20, 100, 20),
        (624_129, 2_061_517, 18_913),
        (600, 37, 1),
        (-100, 20, 20),
        (2_061_517, -624_129, 18_913),
    ];

    #[test]
    fn test_gcd() {
        for (u, v, r) in CASES.iter() {
            assert_eq!(gcd(&BigInt::from(*u), &BigInt::from(*v)), BigInt::from(*r));
        }
    }

    #[test]
    fn test_lcm() {
        for (u, v, l) in &[(4, 6, 12), (3, 5, 15), (0, 5, 0), (-4, 6, 12)] {
            assert_eq!(lcm(&BigInt::from(*u), &BigInt::from(*v)), BigInt::from(*l));
        }
    }

    #[test]
    fn test_gcd_zero() {
        let zero = BigInt::from(0);
        assert_eq!(gcd(&zero, &zero), zero);
        assert_eq!(gcd(&BigInt::from(7), &zero), BigInt::from(7));
    }
}
