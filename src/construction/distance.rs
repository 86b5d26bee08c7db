// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains protocols computing the encrypted squared euclidean
//! distance `Σ (p1_i - p2_i)^2 = Σ p1_i^2 + Σ p2_i^2 - 2 Σ p1_i p2_i`
//! between two vectors using only the additive homomorphism.
//!
//! The one-sided variant models two parties: the owner of `p2` sends
//! `Enc(Σ p2_i^2)` and `Enc(p2_i)` for every `i` and the holder of the
//! plaintext `p1` computes an encryption of the distance without learning `p2`.
//!
//! All terms are computed on the fixed-point encodings `p_i * 10^precision`.
//! Products of two encodings carry `2 * precision` digits, hence the distance
//! is returned with precision `2 * precision`.

use crate::{
    construction::pk_encryption::{AdditiveEncryptor, Ciphertext},
    error::PaillierError,
};
use qfall_math::integer::Z;

/// Computes an encryption of the squared euclidean distance between `p1`
/// and `p2`, where both vectors are given in plaintext.
///
/// Parameters:
/// - `encryptor`: specifies the key pair and encoding to use
/// - `p1`: specifies the first vector
/// - `p2`: specifies the second vector
///
/// Returns an encryption of `Σ (p1_i - p2_i)^2` with twice the precision
/// of `encryptor` or a [`PaillierError`] if the vectors differ in length
/// or any encryption fails.
///
/// # Examples
/// ```
/// use paillier_crypto::construction::{
///     distance::squared_euclidean,
///     pk_encryption::{Paillier, PaillierEncryptor},
/// };
/// use qfall_math::integer::Z;
///
/// let encryptor = PaillierEncryptor::new(Paillier::default()).unwrap();
/// let p1 = [Z::from(17), Z::from(20)];
/// let p2 = [Z::from(30), Z::from(23)];
///
/// let distance = squared_euclidean(&encryptor, &p1, &p2).unwrap();
///
/// assert_eq!(Z::from(178), encryptor.decrypt(&distance).unwrap());
/// ```
///
/// # Errors and Failures
/// - Returns a [`PaillierError`] of type
/// [`InvalidOperand`](PaillierError::InvalidOperand) if `p1` and `p2`
/// differ in length.
/// - Returns a [`PaillierError`] of type
/// [`DomainViolation`](PaillierError::DomainViolation) if an entry or an
/// intermediate sum can not be encoded.
pub fn squared_euclidean<E: AdditiveEncryptor>(
    encryptor: &E,
    p1: &[E::Plaintext],
    p2: &[E::Plaintext],
) -> Result<Ciphertext, PaillierError> {
    check_lengths(p1.len(), p2.len())?;
    let precision = encryptor.get_precision();

    let p2_encoded = encode_all(encryptor, p2)?;
    let p2_square_sum = encryptor.encrypt_encoded(&square_sum(&p2_encoded), 2 * precision)?;
    let p2_encrypted = p2_encoded
        .iter()
        .map(|p2_i| encryptor.encrypt_encoded(p2_i, precision))
        .collect::<Result<Vec<Ciphertext>, PaillierError>>()?;

    squared_euclidean_one_side(encryptor, p1, &p2_square_sum, &p2_encrypted)
}

/// Computes an encryption of the squared euclidean distance between the
/// plaintext vector `p1` and a vector `p2`, of which only encryptions are known.
///
/// Parameters:
/// - `encryptor`: specifies the key pair and encoding to use
/// - `p1`: specifies the plaintext vector
/// - `p2_square_sum`: specifies an encryption of `Σ p2_i^2`, either with the
///   precision of `encryptor` or with twice of it
/// - `p2_encrypted`: specifies the encryptions of each `p2_i` with the
///   precision of `encryptor`
///
/// Returns an encryption of `Σ (p1_i - p2_i)^2` with twice the precision
/// of `encryptor` or a [`PaillierError`] if the lengths differ or any
/// homomorphic operation fails.
///
/// An encryption of `Σ p2_i^2` with the precision of `encryptor` was
/// truncated to that precision, which carries over to the result.
///
/// # Examples
/// ```
/// use paillier_crypto::construction::{
///     distance::squared_euclidean_one_side,
///     pk_encryption::{Paillier, PaillierEncryptor},
/// };
/// use qfall_math::integer::Z;
///
/// let encryptor = PaillierEncryptor::new(Paillier::default()).unwrap();
/// let p1 = [Z::from(17), Z::from(20)];
/// let p2_square_sum = encryptor.encrypt(30 * 30 + 23 * 23).unwrap();
/// let p2_encrypted = [encryptor.encrypt(30).unwrap(), encryptor.encrypt(23).unwrap()];
///
/// let distance =
///     squared_euclidean_one_side(&encryptor, &p1, &p2_square_sum, &p2_encrypted).unwrap();
///
/// assert_eq!(Z::from(178), encryptor.decrypt(&distance).unwrap());
/// ```
///
/// # Errors and Failures
/// - Returns a [`PaillierError`] of type
/// [`InvalidOperand`](PaillierError::InvalidOperand) if `p1` and
/// `p2_encrypted` differ in length.
/// - Returns a [`PaillierError`] of type
/// [`ModulusMismatch`](PaillierError::ModulusMismatch) if any ciphertext
/// was encrypted under another public key.
/// - Returns a [`PaillierError`] of type
/// [`PrecisionMismatch`](PaillierError::PrecisionMismatch) if any ciphertext
/// carries another precision than described above.
pub fn squared_euclidean_one_side<E: AdditiveEncryptor>(
    encryptor: &E,
    p1: &[E::Plaintext],
    p2_square_sum: &Ciphertext,
    p2_encrypted: &[Ciphertext],
) -> Result<Ciphertext, PaillierError> {
    check_lengths(p1.len(), p2_encrypted.len())?;
    let precision = encryptor.get_precision();
    tracing::debug!(
        dimension = p1.len(),
        precision,
        "computing encrypted squared euclidean distance"
    );

    let p1_encoded = encode_all(encryptor, p1)?;
    let mut result = encryptor
        .encrypt_encoded(&square_sum(&p1_encoded), 2 * precision)?
        .add(&widen(p2_square_sum, precision)?)?;
    for (p1_i, p2_i) in p1_encoded.iter().zip(p2_encrypted) {
        let factor = Z::from(-2) * p1_i;
        result = result.add(&p2_i.scalar_multiply_widening(factor)?)?;
    }

    Ok(result)
}

fn encode_all<E: AdditiveEncryptor>(
    encryptor: &E,
    vector: &[E::Plaintext],
) -> Result<Vec<Z>, PaillierError> {
    vector.iter().map(|v_i| encryptor.encode(v_i)).collect()
}

/// Returns `Σ v_i^2`, which is `0` for an empty slice.
fn square_sum(vector: &[Z]) -> Z {
    vector.iter().fold(Z::ZERO, |sum, v_i| sum + v_i * v_i)
}

/// Brings an encryption of `Σ p2_i^2` to precision `2 * precision`.
fn widen(cipher: &Ciphertext, precision: u32) -> Result<Ciphertext, PaillierError> {
    if cipher.get_precision() == 2 * precision {
        Ok(cipher.clone())
    } else if cipher.get_precision() == precision {
        cipher.raise_precision(precision)
    } else {
        Err(PaillierError::PrecisionMismatch {
            left: cipher.get_precision(),
            right: 2 * precision,
        })
    }
}

fn check_lengths(left: usize, right: usize) -> Result<(), PaillierError> {
    if left != right {
        return Err(PaillierError::InvalidOperand(format!(
            "the vectors have different lengths {left} and {right}"
        )));
    }
    Ok(())
}
