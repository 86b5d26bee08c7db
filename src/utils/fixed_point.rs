// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the fixed-point codec, which maps signed and
//! fractional values into the unsigned plaintext domain `[0, n)` of the
//! Paillier scheme and back.
//!
//! A value `x` is scaled by `10^precision` and truncated toward zero.
//! A negative result `-v` is represented by its wraparound `n - v`.
//! Decoding interprets every raw value above the threshold
//! `n * negative_threshold / 4` as negative.

use crate::error::PaillierError;
use qfall_math::{integer::Z, traits::Pow};
use std::str::FromStr;

/// This struct stores everything needed to encode values for
/// and decode values from the plaintext domain `[0, n)`.
///
/// Attributes:
/// - `n`: specifies the plaintext modulus
/// - `precision`: specifies the number of decimal digits kept after the decimal point
/// - `scale`: equals `10^precision`
/// - `threshold`: every raw value larger than `threshold` is decoded as negative
///
/// # Examples
/// ```
/// use paillier_crypto::utils::fixed_point::FixedPointCodec;
/// use qfall_math::integer::Z;
///
/// let codec = FixedPointCodec::new(&Z::from(1_000_000), 2, 2).unwrap();
///
/// let raw = codec.encode(-1.5).unwrap();
/// assert_eq!(Z::from(999_850), raw);
/// assert_eq!(-1.5, codec.decode(&raw).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPointCodec {
    n: Z,
    precision: u32,
    scale: Z,
    threshold: Z,
}

impl FixedPointCodec {
    /// Instantiates a [`FixedPointCodec`] for the plaintext modulus `n`.
    ///
    /// Parameters:
    /// - `n`: specifies the plaintext modulus
    /// - `precision`: specifies the number of decimal digits
    /// - `negative_threshold`: specifies in quarters of `n` above which
    ///   raw values are interpreted as negative, e.g. `2` means `n/2`
    ///
    /// Returns a [`FixedPointCodec`] or a [`PaillierError`] if the parameters
    /// are not suitable.
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidParameter`](PaillierError::InvalidParameter)
    /// if `negative_threshold` is not in `1..=3` or `n <= 1`.
    pub fn new(n: &Z, precision: u32, negative_threshold: u32) -> Result<Self, PaillierError> {
        if !(1..=3).contains(&negative_threshold) {
            return Err(PaillierError::InvalidParameter(format!(
                "the negative threshold has to be in 1..=3 quarters of n, but is {negative_threshold}"
            )));
        }
        if n <= &Z::ONE {
            return Err(PaillierError::InvalidParameter(format!(
                "the plaintext modulus has to be larger than 1, but is {n}"
            )));
        }

        let scale = Z::from(10).pow(precision)?;
        let threshold = (n * Z::from(negative_threshold)).div_floor(&Z::from(4));

        Ok(Self {
            n: n.clone(),
            precision,
            scale,
            threshold,
        })
    }

    /// Returns the number of decimal digits of this codec.
    pub fn get_precision(&self) -> u32 {
        self.precision
    }

    /// Returns the scale `10^precision` of this codec.
    pub fn get_scale(&self) -> &Z {
        &self.scale
    }

    /// Returns the threshold above which raw values are decoded as negative.
    pub fn get_threshold(&self) -> &Z {
        &self.threshold
    }

    /// Maps a signed integer into `[0, n)`, i.e. a negative `-v` is
    /// mapped to `n - v`.
    ///
    /// Returns the wrapped value or a [`PaillierError`] if `|value| >= n`.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::utils::fixed_point::FixedPointCodec;
    /// use qfall_math::integer::Z;
    ///
    /// let codec = FixedPointCodec::new(&Z::from(100), 0, 2).unwrap();
    ///
    /// assert_eq!(Z::from(97), codec.wrap_signed(&Z::from(-3)).unwrap());
    /// assert_eq!(Z::from(3), codec.wrap_signed(&Z::from(3)).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`DomainViolation`](PaillierError::DomainViolation) if `|value| >= n`.
    pub fn wrap_signed(&self, value: &Z) -> Result<Z, PaillierError> {
        let wrapped = if value < &Z::ZERO {
            &self.n + value
        } else {
            value.clone()
        };

        let in_domain = if value < &Z::ZERO {
            wrapped > Z::ZERO
        } else {
            wrapped < self.n
        };
        if !in_domain {
            return Err(PaillierError::DomainViolation(format!(
                "the magnitude of {value} is not smaller than n"
            )));
        }
        Ok(wrapped)
    }

    /// Maps a raw plaintext in `[0, n)` back to a signed integer by
    /// interpreting every value above the threshold as negative.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::utils::fixed_point::FixedPointCodec;
    /// use qfall_math::integer::Z;
    ///
    /// let codec = FixedPointCodec::new(&Z::from(100), 0, 2).unwrap();
    ///
    /// assert_eq!(Z::from(-3), codec.unwrap_signed(&Z::from(97)));
    /// assert_eq!(Z::from(50), codec.unwrap_signed(&Z::from(50)));
    /// ```
    pub fn unwrap_signed(&self, raw: &Z) -> Z {
        if raw > &self.threshold {
            raw - &self.n
        } else {
            raw.clone()
        }
    }

    /// Scales `value` by `10^precision` and truncates it toward zero
    /// without wrapping negative results.
    ///
    /// Parameters:
    /// - `value`: specifies the value to encode
    ///
    /// Returns the signed encoding with magnitude smaller than `n` or a
    /// [`PaillierError`] if `value` can not be represented.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::utils::fixed_point::FixedPointCodec;
    /// use qfall_math::integer::Z;
    ///
    /// let codec = FixedPointCodec::new(&Z::from(1_000_000), 2, 2).unwrap();
    ///
    /// assert_eq!(Z::from(-150), codec.encode_signed(-1.5).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`DomainViolation`](PaillierError::DomainViolation) if `value` is not
    /// finite or its scaled magnitude is not smaller than `n`.
    pub fn encode_signed(&self, value: f64) -> Result<Z, PaillierError> {
        let scaled = (value * 10f64.powi(self.precision as i32)).trunc();
        let encoded = integral_f64_to_z(scaled).ok_or_else(|| {
            PaillierError::DomainViolation(format!(
                "{value} can not be scaled by 10^{} into an integer",
                self.precision
            ))
        })?;

        if encoded >= self.n || &encoded + &self.n <= Z::ZERO {
            return Err(PaillierError::DomainViolation(format!(
                "the magnitude of {value} * 10^{} is not smaller than n",
                self.precision
            )));
        }
        Ok(encoded)
    }

    /// Encodes `value` into the plaintext domain by computing
    /// `truncate(value * 10^precision)` and wrapping negative results.
    ///
    /// Parameters:
    /// - `value`: specifies the value to encode
    ///
    /// Returns the encoding in `[0, n)` or a [`PaillierError`] if `value`
    /// can not be represented.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::utils::fixed_point::FixedPointCodec;
    /// use qfall_math::integer::Z;
    ///
    /// let codec = FixedPointCodec::new(&Z::from(1_000_000), 3, 2).unwrap();
    ///
    /// assert_eq!(Z::from(2_125), codec.encode(2.125).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`DomainViolation`](PaillierError::DomainViolation) if `value` is not
    /// finite or its scaled magnitude is not smaller than `n`.
    pub fn encode(&self, value: f64) -> Result<Z, PaillierError> {
        self.wrap_signed(&self.encode_signed(value)?)
    }

    /// Decodes a raw plaintext by unwrapping negative values and dividing
    /// by `10^precision`.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::utils::fixed_point::FixedPointCodec;
    /// use qfall_math::integer::Z;
    ///
    /// let codec = FixedPointCodec::new(&Z::from(1_000_000), 2, 2).unwrap();
    ///
    /// assert_eq!(-4.99, codec.decode(&Z::from(999_501)).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidOperand`](PaillierError::InvalidOperand) if the unwrapped
    /// integer exceeds the range of [`f64`].
    pub fn decode(&self, raw: &Z) -> Result<f64, PaillierError> {
        self.decode_with_precision(raw, self.precision)
    }

    /// Decodes a raw plaintext that carries `precision` instead of the
    /// precision of this codec, e.g. the product of two encodings, which
    /// carries twice the precision.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::utils::fixed_point::FixedPointCodec;
    /// use qfall_math::integer::Z;
    ///
    /// let codec = FixedPointCodec::new(&Z::from(1_000_000), 1, 2).unwrap();
    ///
    /// // 2.5 * 1.5 = 25 * 15 / 10^2
    /// assert_eq!(3.75, codec.decode_with_precision(&Z::from(375), 2).unwrap());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidOperand`](PaillierError::InvalidOperand) if the unwrapped
    /// integer exceeds the range of [`f64`].
    pub fn decode_with_precision(&self, raw: &Z, precision: u32) -> Result<f64, PaillierError> {
        let value = z_to_f64(&self.unwrap_signed(raw))?;
        let scale = z_to_f64(&Z::from(10).pow(precision)?)?;

        Ok(value / scale)
    }
}

/// Converts a finite [`f64`] without fractional part into the [`Z`] of
/// the same value, which is exact as its decimal expansion is.
/// Returns `None` for non-finite or fractional values.
pub(crate) fn integral_f64_to_z(value: f64) -> Option<Z> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value == 0.0 {
        return Some(Z::ZERO);
    }
    Z::from_str(&format!("{value:.0}")).ok()
}

/// Converts an integer into the closest [`f64`] via its decimal representation.
fn z_to_f64(value: &Z) -> Result<f64, PaillierError> {
    let converted = value
        .to_string()
        .parse::<f64>()
        .map_err(|e| PaillierError::InvalidOperand(format!("{value} is no valid f64: {e}")))?;

    if !converted.is_finite() {
        return Err(PaillierError::InvalidOperand(format!(
            "{value} exceeds the range of f64"
        )));
    }
    Ok(converted)
}

#[cfg(test)]
mod test_new {
    use super::FixedPointCodec;
    use qfall_math::integer::Z;

    /// Ensures that the threshold is computed in quarters of `n`.
    #[test]
    fn threshold() {
        let n = Z::from(1000);

        assert_eq!(
            &Z::from(250),
            FixedPointCodec::new(&n, 0, 1).unwrap().get_threshold()
        );
        assert_eq!(
            &Z::from(500),
            FixedPointCodec::new(&n, 0, 2).unwrap().get_threshold()
        );
        assert_eq!(
            &Z::from(750),
            FixedPointCodec::new(&n, 0, 3).unwrap().get_threshold()
        );
    }

    /// Ensures that the scale equals `10^precision`.
    #[test]
    fn scale() {
        let codec = FixedPointCodec::new(&Z::from(1000), 4, 2).unwrap();

        assert_eq!(&Z::from(10_000), codec.get_scale());
        assert_eq!(4, codec.get_precision());
    }

    /// Ensures that invalid thresholds and moduli are rejected.
    #[test]
    fn invalid_parameters() {
        assert!(FixedPointCodec::new(&Z::from(1000), 2, 0).is_err());
        assert!(FixedPointCodec::new(&Z::from(1000), 2, 4).is_err());
        assert!(FixedPointCodec::new(&Z::ONE, 2, 2).is_err());
    }
}

#[cfg(test)]
mod test_encode_decode {
    use super::FixedPointCodec;
    use qfall_math::{integer::Z, traits::Pow};

    fn codec(precision: u32) -> FixedPointCodec {
        FixedPointCodec::new(&Z::from(u64::MAX), precision, 2).unwrap()
    }

    /// Ensures that encoding truncates toward zero.
    #[test]
    fn truncation() {
        let codec = codec(1);

        assert_eq!(Z::from(12), codec.encode(1.29).unwrap());
        assert_eq!(Z::from(u64::MAX) - Z::from(12), codec.encode(-1.29).unwrap());
    }

    /// Checks that values with at most `precision` digits are decoded to
    /// themselves.
    #[test]
    fn round_trip() {
        let codec = codec(2);
        let values = [0.0, 1.0, -1.0, 120.5, -125.25, 0.75, -0.5, 1e10, -1e10];

        for value in values {
            let raw = codec.encode(value).unwrap();
            assert_eq!(value, codec.decode(&raw).unwrap());
        }
    }

    /// Checks the round trip for values that are not exactly representable
    /// as [`f64`], e.g. `120.23`.
    #[test]
    fn round_trip_inexact() {
        let codec = codec(2);
        let values = [120.23, -125.22, 0.01, -0.07];

        for value in values {
            let raw = codec.encode(value).unwrap();
            let decoded = codec.decode(&raw).unwrap();
            assert!((value - decoded).abs() <= 0.011);
        }
    }

    /// Ensures that non-finite values and values exceeding `n` are rejected.
    #[test]
    fn out_of_domain() {
        let small = FixedPointCodec::new(&Z::from(1000), 1, 2).unwrap();

        assert!(small.encode(f64::NAN).is_err());
        assert!(small.encode(f64::INFINITY).is_err());
        assert!(small.encode(100.0).is_err());
        assert!(small.encode(-100.0).is_err());
        assert!(small.encode(99.9).is_ok());
        assert!(codec(0).encode(1e300).is_err());
    }

    /// Checks values whose scaled magnitude exceeds the range of [`i64`].
    #[test]
    fn beyond_i64() {
        let n = Z::from(10).pow(40).unwrap();
        let codec = FixedPointCodec::new(&n, 4, 2).unwrap();

        for value in [1e15, -1e15, 2f64.powi(80), -3.0 * 2f64.powi(90)] {
            let raw = codec.encode(value).unwrap();
            assert_eq!(value, codec.decode(&raw).unwrap());
        }
        assert_eq!(
            Z::from(10).pow(19).unwrap(),
            codec.encode_signed(1e15).unwrap()
        );
    }

    /// Ensures that decoded values beyond the range of [`f64`] are rejected
    /// instead of being mapped to infinity.
    #[test]
    fn beyond_f64() {
        let n = Z::from(10).pow(400).unwrap();
        let codec = FixedPointCodec::new(&n, 0, 2).unwrap();
        let huge = Z::from(10).pow(320).unwrap();

        assert!(codec.decode(&huge).is_err());
        assert!(codec.decode(&(&n - &huge)).is_err());
    }

    /// Checks decoding of products of two encodings at twice the precision.
    #[test]
    fn decode_with_precision() {
        let codec = FixedPointCodec::new(&Z::from(1_000_000), 2, 2).unwrap();

        assert_eq!(0.0625, codec.decode_with_precision(&Z::from(625), 4).unwrap());
        assert_eq!(-0.5, codec.decode_with_precision(&Z::from(995_000), 4).unwrap());
    }

    /// Ensures that raw values above the threshold are decoded as negative.
    #[test]
    fn threshold_boundary() {
        let codec = FixedPointCodec::new(&Z::from(1000), 0, 2).unwrap();

        assert_eq!(500.0, codec.decode(&Z::from(500)).unwrap());
        assert_eq!(-499.0, codec.decode(&Z::from(501)).unwrap());
    }
}

#[cfg(test)]
mod test_integral_f64_to_z {
    use super::integral_f64_to_z;
    use qfall_math::{integer::Z, traits::Pow};

    /// Ensures that integral values are converted exactly.
    #[test]
    fn exact_conversion() {
        assert_eq!(Some(Z::ZERO), integral_f64_to_z(-0.0));
        assert_eq!(Some(Z::from(-42)), integral_f64_to_z(-42.0));
        assert_eq!(Some(Z::from(10).pow(22).unwrap()), integral_f64_to_z(1e22));
        assert_eq!(
            Some(Z::from(2).pow(100).unwrap()),
            integral_f64_to_z(2f64.powi(100))
        );
    }

    /// Ensures that fractional and non-finite values are rejected.
    #[test]
    fn invalid_values() {
        assert!(integral_f64_to_z(0.5).is_none());
        assert!(integral_f64_to_z(f64::NAN).is_none());
        assert!(integral_f64_to_z(f64::NEG_INFINITY).is_none());
    }
}
