// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains functions to sample primes of a fixed bit length.

use crate::error::PaillierError;
use qfall_math::{integer::Z, traits::Pow};

/// Samples a prime uniformly at random from `[2^(bit_length - 1), 2^bit_length)`,
/// i.e. a prime with exactly `bit_length` bits.
///
/// Parameters:
/// - `bit_length`: specifies the number of bits of the sampled prime
///
/// Returns a prime with `bit_length` bits or a [`PaillierError`] if
/// `bit_length < 2`.
///
/// # Examples
/// ```
/// use paillier_crypto::sample::prime::sample_prime_with_bit_length;
///
/// let p = sample_prime_with_bit_length(64).unwrap();
///
/// assert!(p.is_prime());
/// assert_eq!(64, p.bits());
/// ```
///
/// # Errors and Failures
/// - Returns a [`PaillierError`] of type
/// [`InvalidParameter`](PaillierError::InvalidParameter) if `bit_length < 2`.
/// - Returns a [`PaillierError`] of type [`Math`](PaillierError::Math)
/// if the interval does not contain a prime.
pub fn sample_prime_with_bit_length(bit_length: u32) -> Result<Z, PaillierError> {
    if bit_length < 2 {
        return Err(PaillierError::InvalidParameter(format!(
            "primes need at least 2 bits, but {bit_length} were requested"
        )));
    }

    let lower_bound = Z::from(2).pow(bit_length - 1)?;
    let upper_bound = Z::from(2).pow(bit_length)?;

    Ok(Z::sample_prime_uniform(&lower_bound, &upper_bound)?)
}

/// Samples a prime with `bit_length` bits that differs from `other`.
///
/// Parameters:
/// - `bit_length`: specifies the number of bits of the sampled prime
/// - `other`: specifies the prime the output has to differ from
///
/// Returns a prime with `bit_length` bits unequal to `other` or a
/// [`PaillierError`] if `bit_length < 2`.
///
/// # Examples
/// ```
/// use paillier_crypto::sample::prime::sample_prime_distinct_from;
/// use qfall_math::integer::Z;
///
/// let q = sample_prime_distinct_from(2, &Z::from(3)).unwrap();
///
/// assert_eq!(Z::from(2), q);
/// ```
///
/// # Errors and Failures
/// - Returns a [`PaillierError`] of type
/// [`InvalidParameter`](PaillierError::InvalidParameter) if `bit_length < 2`.
pub fn sample_prime_distinct_from(bit_length: u32, other: &Z) -> Result<Z, PaillierError> {
    let mut prime = sample_prime_with_bit_length(bit_length)?;
    while &prime == other {
        tracing::warn!(bit_length, "sampled prime collided, resampling");
        prime = sample_prime_with_bit_length(bit_length)?;
    }
    Ok(prime)
}


#[cfg(test)]
mod test_sample_prime_distinct_from {
    use super::sample_prime_distinct_from;
    use qfall_math::integer::Z;

    /// Ensures that the only other 2-bit prime is returned.
    #[test]
    fn two_bit_primes() {
        for _ in 0..10 {
            assert_eq!(Z::from(3), sample_prime_distinct_from(2, &Z::from(2)).unwrap());
        }
    }
}
