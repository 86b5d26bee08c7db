// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the ciphertexts of the Paillier scheme and
//! the homomorphic operations on them, i.e. addition of two ciphertexts
//! and multiplication of a ciphertext with a known scalar.

use super::PublicKey;
use crate::{
    error::PaillierError,
    utils::{
        arithmetic::{inverse_mod, pow_mod, reduce},
        fixed_point::integral_f64_to_z,
    },
};
use qfall_math::{integer::Z, traits::Pow};
use std::fmt;

/// A plaintext scalar a [`Ciphertext`] can be multiplied with.
///
/// `Integer` scales the plaintext by an arbitrary (possibly negative) integer.
/// `Fraction` scales a fixed-point plaintext by a value with at most
/// `precision` decimal digits, where `precision` is the one of the ciphertext.
///
/// # Examples
/// ```
/// use paillier_crypto::construction::pk_encryption::Scalar;
/// use qfall_math::integer::Z;
///
/// assert_eq!(Scalar::Integer(Z::from(-2)), Scalar::from(-2));
/// assert_eq!(Scalar::Fraction(2.5), Scalar::from(2.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(Z),
    Fraction(f64),
}

macro_rules! scalar_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::Integer(Z::from(value))
                }
            }
        )*
    };
}

scalar_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, Z, &Z);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Fraction(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Fraction(value as f64)
    }
}

/// An encryption `c` in `[0, n^2)` under the Paillier public key with modulus `n`.
///
/// Attributes:
/// - `value`: the ciphertext `c`
/// - `n`: the modulus of the public key it was encrypted under
/// - `n_square`: equals `n^2`
/// - `precision`: the number of decimal digits of the fixed-point
///   encoding of the plaintext
///
/// A [`Ciphertext`] is only created by encryption or by combining
/// ciphertexts and never changes afterwards.
///
/// # Examples
/// ```
/// use paillier_crypto::construction::pk_encryption::{PKEncryption, Paillier};
/// use qfall_math::integer::Z;
/// let paillier = Paillier::new(64).unwrap();
/// let (pk, sk) = paillier.gen().unwrap();
///
/// let cipher_1 = paillier.enc(&pk, 120).unwrap();
/// let cipher_2 = paillier.enc(&pk, 30).unwrap();
///
/// let sum = cipher_1.add(&cipher_2).unwrap();
/// let product = sum.scalar_multiply(2).unwrap();
///
/// assert_eq!(Z::from(300), paillier.dec(&sk, &pk, &product).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ciphertext {
    value: Z,
    n: Z,
    n_square: Z,
    precision: u32,
}

impl Ciphertext {
    pub(crate) fn new(value: Z, pk: &PublicKey, precision: u32) -> Self {
        Self {
            value,
            n: pk.get_n().clone(),
            n_square: pk.get_n_square().clone(),
            precision,
        }
    }

    /// Returns the ciphertext value `c` in `[0, n^2)`.
    pub fn get_value(&self) -> &Z {
        &self.value
    }

    /// Returns the modulus `n` of the public key this ciphertext belongs to.
    pub fn get_n(&self) -> &Z {
        &self.n
    }

    /// Returns the number of decimal digits of the fixed-point encoding.
    pub fn get_precision(&self) -> u32 {
        self.precision
    }

    fn with_value(&self, value: Z) -> Self {
        Self {
            value,
            n: self.n.clone(),
            n_square: self.n_square.clone(),
            precision: self.precision,
        }
    }

    /// Homomorphically adds two ciphertexts by computing `c_1 * c_2 mod n^2`,
    /// i.e. `Dec(c_1.add(c_2)) = Dec(c_1) + Dec(c_2) mod n`.
    ///
    /// Parameters:
    /// - `other`: specifies the second summand
    ///
    /// Returns the encrypted sum or a [`PaillierError`] if the ciphertexts
    /// are not compatible.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{PKEncryption, Paillier};
    /// use qfall_math::integer::Z;
    /// let paillier = Paillier::new(64).unwrap();
    /// let (pk, sk) = paillier.gen().unwrap();
    /// let cipher = paillier.enc(&pk, 120).unwrap();
    ///
    /// let sum = cipher.add(&cipher).unwrap();
    ///
    /// assert_eq!(Z::from(240), paillier.dec(&sk, &pk, &sum).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`ModulusMismatch`](PaillierError::ModulusMismatch) if the ciphertexts
    /// were encrypted under different public keys.
    /// - Returns a [`PaillierError`] of type
    /// [`PrecisionMismatch`](PaillierError::PrecisionMismatch) if the
    /// ciphertexts have different fixed-point precisions.
    pub fn add(&self, other: &Ciphertext) -> Result<Ciphertext, PaillierError> {
        if self.n != other.n {
            return Err(PaillierError::ModulusMismatch(String::from(
                "the ciphertexts were encrypted under different public keys",
            )));
        }
        if self.precision != other.precision {
            return Err(PaillierError::PrecisionMismatch {
                left: self.precision,
                right: other.precision,
            });
        }

        let value = reduce(&(&self.value * &other.value), &self.n_square);
        Ok(self.with_value(value))
    }

    /// Homomorphically multiplies the plaintext with a known scalar.
    ///
    /// - For [`Scalar::Integer`] `k` this computes `c^k mod n^2`, where
    ///   a negative `k` is handled as the inverse of `c^|k| mod n^2`.
    /// - For [`Scalar::Fraction`] `f` this computes
    ///   `(c^num)^(scale^(-1) mod n) mod n^2` for `scale = 10^precision` and
    ///   `num = f * scale`, i.e. the fixed-point plaintext is scaled by `f`
    ///   and keeps its precision.
    ///
    /// Parameters:
    /// - `scalar`: specifies the value the plaintext is multiplied with
    ///
    /// Returns the encrypted product or a [`PaillierError`] if the scalar
    /// can not be applied.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{PKEncryption, Paillier};
    /// use qfall_math::integer::Z;
    /// let paillier = Paillier::new(64).unwrap();
    /// let (pk, sk) = paillier.gen().unwrap();
    ///
    /// // 10.00 with two decimal digits
    /// let cipher = paillier.enc_with_precision(&pk, 1000, 2).unwrap();
    ///
    /// let product = cipher.scalar_multiply(2.5).unwrap();
    ///
    /// assert_eq!(Z::from(2500), paillier.dec(&sk, &pk, &product).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidOperand`](PaillierError::InvalidOperand) if a fraction is not
    /// finite or has more than `precision` decimal digits.
    /// - Returns a [`PaillierError`] of type
    /// [`NonInvertibleScale`](PaillierError::NonInvertibleScale) if
    /// `gcd(10^precision, n) != 1`.
    pub fn scalar_multiply(&self, scalar: impl Into<Scalar>) -> Result<Ciphertext, PaillierError> {
        let value = match scalar.into() {
            Scalar::Integer(k) => self.pow_signed(&k)?,
            Scalar::Fraction(f) => {
                let numerator = fraction_numerator(f, self.precision)?;

                let scale = Z::from(10).pow(self.precision)?;
                let scale_inverse = inverse_mod(&scale, &self.n)
                    .ok_or(PaillierError::NonInvertibleScale(self.precision))?;

                let scaled = self.pow_signed(&numerator)?;
                pow_mod(&scaled, &scale_inverse, &self.n_square)?
            }
        };

        Ok(self.with_value(value))
    }

    /// Multiplies the fixed-point plaintext with the fixed-point scalar
    /// `numerator / 10^precision` without dividing by `10^precision` afterwards.
    /// Hence, the result is exact and carries twice the precision.
    ///
    /// Parameters:
    /// - `numerator`: specifies the scalar encoded with the precision of this ciphertext
    ///
    /// Returns the encrypted product with precision `2 * precision`
    /// or a [`PaillierError`] if the exponentiation fails.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{PKEncryption, Paillier};
    /// use qfall_math::integer::Z;
    /// let paillier = Paillier::new(64).unwrap();
    /// let (pk, sk) = paillier.gen().unwrap();
    ///
    /// // 0.25 with two decimal digits
    /// let cipher = paillier.enc_with_precision(&pk, 25, 2).unwrap();
    ///
    /// // 0.25 * 0.25 = 0.0625 with four decimal digits
    /// let product = cipher.scalar_multiply_widening(25).unwrap();
    ///
    /// assert_eq!(4, product.get_precision());
    /// assert_eq!(Z::from(625), paillier.dec(&sk, &pk, &product).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidOperand`](PaillierError::InvalidOperand) if a negative
    /// `numerator` is applied to a ciphertext that is not invertible.
    pub fn scalar_multiply_widening(
        &self,
        numerator: impl Into<Z>,
    ) -> Result<Ciphertext, PaillierError> {
        let value = self.pow_signed(&numerator.into())?;

        let mut product = self.with_value(value);
        product.precision = 2 * self.precision;
        Ok(product)
    }

    /// Appends `digits` decimal digits to the fixed-point plaintext by
    /// multiplying it with `10^digits`, i.e. the encoded value stays the same.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{PKEncryption, Paillier};
    /// use qfall_math::integer::Z;
    /// let paillier = Paillier::new(64).unwrap();
    /// let (pk, sk) = paillier.gen().unwrap();
    /// let cipher = paillier.enc_with_precision(&pk, 125, 2).unwrap();
    ///
    /// let raised = cipher.raise_precision(2).unwrap();
    ///
    /// assert_eq!(4, raised.get_precision());
    /// assert_eq!(Z::from(12500), paillier.dec(&sk, &pk, &raised).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type [`Math`](PaillierError::Math)
    /// if the exponentiation fails.
    pub fn raise_precision(&self, digits: u32) -> Result<Ciphertext, PaillierError> {
        let scale = Z::from(10).pow(digits)?;
        let value = pow_mod(&self.value, &scale, &self.n_square)?;

        let mut raised = self.with_value(value);
        raised.precision = self.precision + digits;
        Ok(raised)
    }

    /// Computes `c^exponent mod n^2` for a possibly negative `exponent`.
    fn pow_signed(&self, exponent: &Z) -> Result<Z, PaillierError> {
        if exponent >= &Z::ZERO {
            return Ok(pow_mod(&self.value, exponent, &self.n_square)?);
        }

        let magnitude = Z::ZERO - exponent;
        let power = pow_mod(&self.value, &magnitude, &self.n_square)?;
        inverse_mod(&power, &self.n_square).ok_or_else(|| {
            PaillierError::InvalidOperand(String::from(
                "the ciphertext is not invertible modulo n^2",
            ))
        })
    }
}

/// Computes `round(fraction * 10^precision)` if it is an integer up to
/// floating point inaccuracy.
fn fraction_numerator(fraction: f64, precision: u32) -> Result<Z, PaillierError> {
    let scaled = fraction * 10f64.powi(precision as i32);
    let rounded = scaled.round();

    let numerator = if (scaled - rounded).abs() > 1e-9 * rounded.abs().max(1.0) {
        None
    } else {
        integral_f64_to_z(rounded)
    };

    numerator.ok_or_else(|| {
        PaillierError::InvalidOperand(format!(
            "{fraction} is not representable with {precision} decimal digits"
        ))
    })
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}



#[cfg(test)]
mod test_add {
    use crate::{
        construction::pk_encryption::{PKEncryption, Paillier},
        error::PaillierError,
    };
    use qfall_math::integer::Z;

    /// Checks the additive homomorphism for several pairs of messages.
    #[test]
    fn homomorphism() {
        let paillier = Paillier::new(64).unwrap();
        let (pk, sk) = paillier.gen().unwrap();

        for (m_1, m_2) in [(0, 0), (120, 120), (1, 99999), (123456789, 987654321)] {
            let cipher_1 = paillier.enc(&pk, m_1).unwrap();
            let cipher_2 = paillier.enc(&pk, m_2).unwrap();

            let sum = cipher_1.add(&cipher_2).unwrap();

            assert_eq!(Z::from(m_1 + m_2), paillier.dec(&sk, &pk, &sum).unwrap());
        }
    }

    /// Checks that the sum is reduced modulo `n`.
    #[test]
    fn wraps_around_n() {
        let paillier = Paillier::with_primes(1009, 1013).unwrap();
        let (pk, sk) = paillier.gen().unwrap();
        let n_minus_one = pk.get_n() - Z::ONE;

        let cipher_1 = paillier.enc(&pk, &n_minus_one).unwrap();
        let cipher_2 = paillier.enc(&pk, 5).unwrap();
        let sum = cipher_1.add(&cipher_2).unwrap();

        assert_eq!(Z::from(4), paillier.dec(&sk, &pk, &sum).unwrap());
    }

    /// Checks that the operands are left unchanged.
    #[test]
    fn immutable_operands() {
        let paillier = Paillier::new(64).unwrap();
        let (pk, _) = paillier.gen().unwrap();
        let cipher_1 = paillier.enc(&pk, 1).unwrap();
        let cipher_2 = paillier.enc(&pk, 2).unwrap();
        let copy_1 = cipher_1.clone();
        let copy_2 = cipher_2.clone();

        let _ = cipher_1.add(&cipher_2).unwrap();

        assert_eq!(copy_1, cipher_1);
        assert_eq!(copy_2, cipher_2);
    }

    /// Ensures that ciphertexts of different key pairs can not be added.
    #[test]
    fn modulus_mismatch() {
        let paillier = Paillier::new(64).unwrap();
        let (pk_1, _) = paillier.gen().unwrap();
        let (pk_2, _) = paillier.gen().unwrap();

        let cipher_1 = paillier.enc(&pk_1, 1).unwrap();
        let cipher_2 = paillier.enc(&pk_2, 1).unwrap();

        assert!(matches!(
            cipher_1.add(&cipher_2),
            Err(PaillierError::ModulusMismatch(_))
        ));
    }

    /// Ensures that ciphertexts with different precisions can not be added.
    #[test]
    fn precision_mismatch() {
        let paillier = Paillier::new(64).unwrap();
        let (pk, _) = paillier.gen().unwrap();

        let cipher_1 = paillier.enc_with_precision(&pk, 100, 2).unwrap();
        let cipher_2 = paillier.enc_with_precision(&pk, 1000, 3).unwrap();

        assert!(matches!(
            cipher_1.add(&cipher_2),
            Err(PaillierError::PrecisionMismatch { left: 2, right: 3 })
        ));
    }
}


#[cfg(test)]
mod test_scalar_multiply_widening {
    use crate::construction::pk_encryption::{PKEncryption, Paillier};
    use qfall_math::integer::Z;

    /// Checks products of fixed-point values that are not divisible by the scale.
    #[test]
    fn exact_products() {
        let paillier = Paillier::new(64).unwrap();
        let (pk, sk) = paillier.gen().unwrap();
        let n = pk.get_n().clone();

        // 0.25, 0.33 and -0.07 with two decimal digits
        let cipher = paillier.enc_with_precision(&pk, 25, 2).unwrap();
        let negative = paillier.enc_with_precision(&pk, &n - Z::from(7), 2).unwrap();

        let product_1 = cipher.scalar_multiply_widening(33).unwrap();
        let product_2 = cipher.scalar_multiply_widening(-50).unwrap();
        let product_3 = negative.scalar_multiply_widening(-33).unwrap();

        assert_eq!(4, product_1.get_precision());
        assert_eq!(Z::from(825), paillier.dec(&sk, &pk, &product_1).unwrap());
        assert_eq!(&n - Z::from(1250), paillier.dec(&sk, &pk, &product_2).unwrap());
        assert_eq!(Z::from(231), paillier.dec(&sk, &pk, &product_3).unwrap());
    }

    /// Ensures that integer ciphertexts keep precision `0`.
    #[test]
    fn integer_precision() {
        let paillier = Paillier::new(64).unwrap();
        let (pk, sk) = paillier.gen().unwrap();
        let cipher = paillier.enc(&pk, 6).unwrap();

        let product = cipher.scalar_multiply_widening(7).unwrap();

        assert_eq!(0, product.get_precision());
        assert_eq!(Z::from(42), paillier.dec(&sk, &pk, &product).unwrap());
    }
}

#[cfg(test)]
mod test_raise_precision {
    use crate::{
        construction::pk_encryption::{PKEncryption, Paillier},
        error::PaillierError,
    };
    use qfall_math::integer::Z;

    /// Checks that the encoded value is kept while the precision grows.
    #[test]
    fn keeps_value() {
        let paillier = Paillier::new(64).unwrap();
        let (pk, sk) = paillier.gen().unwrap();
        let n = pk.get_n().clone();
        let cipher = paillier.enc_with_precision(&pk, &n - Z::from(6), 2).unwrap();

        let raised = cipher.raise_precision(3).unwrap();
        let unchanged = cipher.raise_precision(0).unwrap();

        assert_eq!(5, raised.get_precision());
        assert_eq!(&n - Z::from(6000), paillier.dec(&sk, &pk, &raised).unwrap());
        assert_eq!(cipher, unchanged);
    }

    /// Ensures that raised ciphertexts can be added to products of the same precision.
    #[test]
    fn combines_with_products() {
        let paillier = Paillier::new(64).unwrap();
        let (pk, sk) = paillier.gen().unwrap();
        let cipher = paillier.enc_with_precision(&pk, 15, 1).unwrap();

        let sum = cipher
            .raise_precision(1)
            .unwrap()
            .add(&cipher.scalar_multiply_widening(15).unwrap())
            .unwrap();

        // 1.5 + 1.5 * 1.5 = 3.75
        assert_eq!(Z::from(375), paillier.dec(&sk, &pk, &sum).unwrap());
        assert!(matches!(
            sum.add(&cipher),
            Err(PaillierError::PrecisionMismatch { left: 2, right: 1 })
        ));
    }
}
