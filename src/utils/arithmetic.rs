// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains thin wrappers around the modular arithmetic of
//! `qfall-math` returning plain [`Z`] values, i.e. reduction, modular
//! inversion and modular exponentiation, and Paillier's `L` function.
//!
//! `gcd` and `lcm` are used directly through the [`Gcd`](qfall_math::traits::Gcd)
//! and [`Lcm`](qfall_math::traits::Lcm) traits of `qfall-math`.

use qfall_math::{error::MathError, integer::Z, integer_mod_q::Zq, traits::Pow};

/// Computes the least non-negative residue of `value` modulo `modulus`.
///
/// Parameters:
/// - `value`: specifies the integer to reduce
/// - `modulus`: specifies the modulus, which has to be larger than `1`
///
/// Returns `value mod modulus` in `[0, modulus)`.
///
/// # Examples
/// ```
/// use paillier_crypto::utils::arithmetic::reduce;
/// use qfall_math::integer::Z;
///
/// assert_eq!(Z::from(3), reduce(&Z::from(-7), &Z::from(10)));
/// ```
///
/// # Panics ...
/// - if `modulus <= 1`.
pub fn reduce(value: &Z, modulus: &Z) -> Z {
    Zq::from((value, modulus)).get_value()
}

/// Computes the inverse of `value` modulo `modulus`.
///
/// Parameters:
/// - `value`: specifies the integer to invert
/// - `modulus`: specifies the modulus, which has to be larger than `1`
///
/// Returns the inverse in `[0, modulus)` or `None` if
/// `gcd(value, modulus) != 1`.
///
/// # Examples
/// ```
/// use paillier_crypto::utils::arithmetic::inverse_mod;
/// use qfall_math::integer::Z;
///
/// assert_eq!(Some(Z::from(4)), inverse_mod(&Z::from(3), &Z::from(11)));
/// assert_eq!(None, inverse_mod(&Z::from(4), &Z::from(12)));
/// ```
///
/// # Panics ...
/// - if `modulus <= 1`.
pub fn inverse_mod(value: &Z, modulus: &Z) -> Option<Z> {
    Zq::from((value, modulus))
        .inverse()
        .map(|inverse| inverse.get_value())
}

/// Computes `base^exponent mod modulus` for a non-negative `exponent`.
///
/// Parameters:
/// - `base`: specifies the base
/// - `exponent`: specifies the non-negative exponent
/// - `modulus`: specifies the modulus, which has to be larger than `1`
///
/// Returns `base^exponent mod modulus` in `[0, modulus)` or a [`MathError`]
/// if the exponentiation is not defined.
///
/// # Examples
/// ```
/// use paillier_crypto::utils::arithmetic::pow_mod;
/// use qfall_math::integer::Z;
///
/// let res = pow_mod(&Z::from(3), &Z::from(4), &Z::from(7)).unwrap();
/// assert_eq!(Z::from(4), res);
/// ```
///
/// # Errors and Failures
/// - Returns a [`MathError`] if the underlying exponentiation fails.
///
/// # Panics ...
/// - if `modulus <= 1`.
pub fn pow_mod(base: &Z, exponent: &Z, modulus: &Z) -> Result<Z, MathError> {
    let base = Zq::from((base, modulus));
    Ok(base.pow(exponent)?.get_value())
}

/// Paillier's `L` function, i.e. `L(x) = (x - 1) / n` with integer division.
///
/// # Examples
/// ```
/// use paillier_crypto::utils::arithmetic::l_function;
/// use qfall_math::integer::Z;
///
/// assert_eq!(Z::from(3), l_function(&Z::from(16), &Z::from(5)));
/// ```
pub fn l_function(x: &Z, n: &Z) -> Z {
    (x - Z::ONE).div_floor(n)
}


#[cfg(test)]
mod test_inverse_mod {
    use super::{inverse_mod, reduce};
    use qfall_math::integer::Z;

    /// Ensures that every unit modulo a prime is inverted correctly.
    #[test]
    fn all_units_mod_prime() {
        let modulus = Z::from(101);
        for i in 1..101 {
            let value = Z::from(i);
            let inverse = inverse_mod(&value, &modulus).unwrap();

            assert_eq!(Z::ONE, reduce(&(&value * &inverse), &modulus));
        }
    }

    /// Ensures that negative values are inverted via their residue.
    #[test]
    fn negative_value() {
        assert_eq!(Some(Z::from(7)), inverse_mod(&Z::from(-3), &Z::from(11)));
    }

    /// Ensures that values sharing a factor with the modulus have no inverse.
    #[test]
    fn non_invertible() {
        assert!(inverse_mod(&Z::ZERO, &Z::from(15)).is_none());
        assert!(inverse_mod(&Z::from(10), &Z::from(15)).is_none());
        assert!(inverse_mod(&Z::from(100), &Z::from(1000)).is_none());
    }
}
