// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains encryptors, which own a Paillier key pair and
//! encrypt and decrypt either plain integers or fixed-point values.

use super::{Ciphertext, Paillier, PublicKey, SecretKey};
use crate::{
    construction::pk_encryption::{AdditiveEncryptor, PKEncryption},
    error::PaillierError,
    utils::fixed_point::FixedPointCodec,
};
use qfall_math::integer::Z;
use std::fmt;

/// The number of decimal digits used by [`PaillierEncryptorFixedPoint`] by default.
pub const DEFAULT_PRECISION: u32 = 4;

/// The threshold in quarters of `n` above which decrypted values are negative,
/// i.e. `2` interprets every value above `n/2` as negative.
pub const DEFAULT_NEGATIVE_THRESHOLD: u32 = 2;

/// An encryptor owning a Paillier key pair that encrypts integers in `[0, n)`.
///
/// Attributes:
/// - `scheme`: the public parameters the key pair was generated with
/// - `pk`: the public key
/// - `sk`: the secret key
///
/// # Examples
/// ```
/// use paillier_crypto::construction::pk_encryption::{Paillier, PaillierEncryptor};
/// use qfall_math::integer::Z;
///
/// let encryptor = PaillierEncryptor::new(Paillier::default()).unwrap();
///
/// let cipher_1 = encryptor.encrypt(120).unwrap();
/// let cipher_2 = encryptor.encrypt(120).unwrap();
/// let sum = cipher_1.add(&cipher_2).unwrap();
///
/// assert_eq!(Z::from(240), encryptor.decrypt(&sum).unwrap());
/// ```
#[derive(Clone)]
pub struct PaillierEncryptor {
    scheme: Paillier,
    pk: PublicKey,
    sk: SecretKey,
}

impl PaillierEncryptor {
    /// Generates a fresh key pair according to `scheme` and stores it.
    ///
    /// Parameters:
    /// - `scheme`: specifies the public parameters for key generation
    ///
    /// Returns a [`PaillierEncryptor`] or a [`PaillierError`] if key
    /// generation failed.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{Paillier, PaillierEncryptor};
    ///
    /// let encryptor = PaillierEncryptor::new(Paillier::with_primes(1009, 1013).unwrap()).unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`KeyGenerationExhausted`](PaillierError::KeyGenerationExhausted) if
    /// no suitable generator was found.
    pub fn new(scheme: Paillier) -> Result<Self, PaillierError> {
        let (pk, sk) = scheme.gen()?;
        Ok(Self { scheme, pk, sk })
    }

    /// Returns the public parameters the key pair was generated with.
    pub fn get_scheme(&self) -> &Paillier {
        &self.scheme
    }

    /// Returns the public key of this encryptor.
    pub fn get_public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// Encrypts `message` in `[0, n)` with precision `0`.
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`DomainViolation`](PaillierError::DomainViolation) if `message` is not in `[0, n)`.
    pub fn encrypt(&self, message: impl Into<Z>) -> Result<Ciphertext, PaillierError> {
        self.scheme.enc(&self.pk, message)
    }

    /// Encrypts `message` in `[0, n)` and tags it with `precision`.
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`DomainViolation`](PaillierError::DomainViolation) if `message` is not in `[0, n)`.
    pub fn encrypt_with_precision(
        &self,
        message: impl Into<Z>,
        precision: u32,
    ) -> Result<Ciphertext, PaillierError> {
        self.scheme.enc_with_precision(&self.pk, message, precision)
    }

    /// Decrypts `cipher` to its plaintext in `[0, n)`.
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`ModulusMismatch`](PaillierError::ModulusMismatch) if `cipher` was
    /// encrypted under another public key.
    pub fn decrypt(&self, cipher: &Ciphertext) -> Result<Z, PaillierError> {
        self.scheme.dec(&self.sk, &self.pk, cipher)
    }
}

impl fmt::Debug for PaillierEncryptor {
    /// Prints the public key only, as the scheme may hold the factorization of `n`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaillierEncryptor")
            .field("pk", &self.pk)
            .finish_non_exhaustive()
    }
}

impl AdditiveEncryptor for PaillierEncryptor {
    type Plaintext = Z;

    fn encrypt(&self, message: Z) -> Result<Ciphertext, PaillierError> {
        PaillierEncryptor::encrypt(self, message)
    }

    fn decrypt(&self, cipher: &Ciphertext) -> Result<Z, PaillierError> {
        PaillierEncryptor::decrypt(self, cipher)
    }

    fn get_public_key(&self) -> &PublicKey {
        &self.pk
    }

    fn get_precision(&self) -> u32 {
        0
    }

    fn encode(&self, message: &Z) -> Result<Z, PaillierError> {
        Ok(message.clone())
    }

    fn encrypt_encoded(&self, encoded: &Z, precision: u32) -> Result<Ciphertext, PaillierError> {
        let wrapped = if encoded < &Z::ZERO {
            self.pk.get_n() + encoded
        } else {
            encoded.clone()
        };
        self.encrypt_with_precision(wrapped, precision)
    }
}

/// An encryptor owning a Paillier key pair that encrypts signed and
/// fractional values using a [`FixedPointCodec`].
///
/// Values are scaled by `10^precision` and truncated, negative values
/// wrap around `n`. All ciphertexts are tagged with the precision.
/// Decryption accepts the precision of the codec and twice of it, which
/// products of two encodings carry, and rejects any other tag.
///
/// # Examples
/// ```
/// use paillier_crypto::construction::pk_encryption::{Paillier, PaillierEncryptorFixedPoint};
///
/// let encryptor = PaillierEncryptorFixedPoint::with_precision(Paillier::default(), 2).unwrap();
///
/// let cipher_1 = encryptor.encrypt(-125.25).unwrap();
/// let cipher_2 = encryptor.encrypt(120.5).unwrap();
/// let sum = cipher_1.add(&cipher_2).unwrap();
///
/// assert_eq!(-4.75, encryptor.decrypt(&sum).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct PaillierEncryptorFixedPoint {
    encryptor: PaillierEncryptor,
    codec: FixedPointCodec,
}

impl PaillierEncryptorFixedPoint {
    /// Generates a fresh key pair according to `scheme` and sets up
    /// the fixed-point encoding.
    ///
    /// Parameters:
    /// - `scheme`: specifies the public parameters for key generation
    /// - `precision`: specifies the number of decimal digits
    /// - `negative_threshold`: specifies in quarters of `n` above which
    ///   decrypted values are negative
    ///
    /// Returns a [`PaillierEncryptorFixedPoint`] or a [`PaillierError`] if
    /// key generation failed or the parameters are invalid.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{
    ///     Paillier, PaillierEncryptorFixedPoint, DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_PRECISION,
    /// };
    ///
    /// let encryptor = PaillierEncryptorFixedPoint::new(
    ///     Paillier::new(128).unwrap(),
    ///     DEFAULT_PRECISION,
    ///     DEFAULT_NEGATIVE_THRESHOLD,
    /// )
    /// .unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidParameter`](PaillierError::InvalidParameter) if
    /// `negative_threshold` is not in `1..=3`.
    /// - Returns a [`PaillierError`] of type
    /// [`KeyGenerationExhausted`](PaillierError::KeyGenerationExhausted) if
    /// no suitable generator was found.
    pub fn new(
        scheme: Paillier,
        precision: u32,
        negative_threshold: u32,
    ) -> Result<Self, PaillierError> {
        let encryptor = PaillierEncryptor::new(scheme)?;
        let codec = FixedPointCodec::new(
            encryptor.get_public_key().get_n(),
            precision,
            negative_threshold,
        )?;

        Ok(Self { encryptor, codec })
    }

    /// Same as [`PaillierEncryptorFixedPoint::new`] with the
    /// [`DEFAULT_NEGATIVE_THRESHOLD`].
    pub fn with_precision(scheme: Paillier, precision: u32) -> Result<Self, PaillierError> {
        Self::new(scheme, precision, DEFAULT_NEGATIVE_THRESHOLD)
    }

    /// Returns the codec used to encode plaintexts.
    pub fn get_codec(&self) -> &FixedPointCodec {
        &self.codec
    }

    /// Returns the public key of this encryptor.
    pub fn get_public_key(&self) -> &PublicKey {
        self.encryptor.get_public_key()
    }

    /// Encodes `value` and encrypts it tagged with the precision of the codec.
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`DomainViolation`](PaillierError::DomainViolation) if `value` can
    /// not be encoded into `[0, n)`.
    pub fn encrypt(&self, value: f64) -> Result<Ciphertext, PaillierError> {
        let raw = self.codec.encode(value)?;
        self.encryptor
            .encrypt_with_precision(raw, self.codec.get_precision())
    }

    /// Decrypts `cipher` and decodes the result according to its precision tag.
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`PrecisionMismatch`](PaillierError::PrecisionMismatch) if `cipher`
    /// is neither tagged with the precision of the codec nor with twice of it.
    /// - Returns a [`PaillierError`] of type
    /// [`ModulusMismatch`](PaillierError::ModulusMismatch) if `cipher` was
    /// encrypted under another public key.
    pub fn decrypt(&self, cipher: &Ciphertext) -> Result<f64, PaillierError> {
        let precision = self.codec.get_precision();
        if cipher.get_precision() != precision && cipher.get_precision() != 2 * precision {
            return Err(PaillierError::PrecisionMismatch {
                left: cipher.get_precision(),
                right: precision,
            });
        }

        let raw = self.encryptor.decrypt(cipher)?;
        self.codec.decode_with_precision(&raw, cipher.get_precision())
    }
}

impl AdditiveEncryptor for PaillierEncryptorFixedPoint {
    type Plaintext = f64;

    fn encrypt(&self, message: f64) -> Result<Ciphertext, PaillierError> {
        PaillierEncryptorFixedPoint::encrypt(self, message)
    }

    fn decrypt(&self, cipher: &Ciphertext) -> Result<f64, PaillierError> {
        PaillierEncryptorFixedPoint::decrypt(self, cipher)
    }

    fn get_public_key(&self) -> &PublicKey {
        self.encryptor.get_public_key()
    }

    fn get_precision(&self) -> u32 {
        self.codec.get_precision()
    }

    fn encode(&self, message: &f64) -> Result<Z, PaillierError> {
        self.codec.encode_signed(*message)
    }

    fn encrypt_encoded(&self, encoded: &Z, precision: u32) -> Result<Ciphertext, PaillierError> {
        let wrapped = self.codec.wrap_signed(encoded)?;
        self.encryptor.encrypt_with_precision(wrapped, precision)
    }
}

#[cfg(test)]
mod test_paillier_encryptor {
    use super::PaillierEncryptor;
    use crate::{
        construction::pk_encryption::{AdditiveEncryptor, Paillier},
        error::PaillierError,
    };
    use qfall_math::integer::Z;

    /// Checks encryption, addition and decryption of `120 + 120`.
    #[test]
    fn int_addition() {
        let encryptor = PaillierEncryptor::new(Paillier::default()).unwrap();

        let cipher_1 = encryptor.encrypt(120).unwrap();
        let cipher_2 = encryptor.encrypt(120).unwrap();
        let cipher_3 = cipher_1.add(&cipher_2).unwrap();

        assert_eq!(Z::from(120), encryptor.decrypt(&cipher_1).unwrap());
        assert_eq!(Z::from(120), encryptor.decrypt(&cipher_2).unwrap());
        assert_eq!(Z::from(240), encryptor.decrypt(&cipher_3).unwrap());
    }

    /// Checks that `10 * 2` decrypts to `20`.
    #[test]
    fn int_multiplication() {
        let encryptor = PaillierEncryptor::new(Paillier::default()).unwrap();

        let cipher = encryptor.encrypt(10).unwrap();

        assert_eq!(
            Z::from(20),
            encryptor.decrypt(&cipher.scalar_multiply(2).unwrap()).unwrap()
        );
    }

    /// Ensures that ciphertexts of two encryptors can not be combined.
    #[test]
    fn independent_key_pairs() {
        let encryptor_1 = PaillierEncryptor::new(Paillier::new(64).unwrap()).unwrap();
        let encryptor_2 = PaillierEncryptor::new(Paillier::new(64).unwrap()).unwrap();
        assert_ne!(
            encryptor_1.get_public_key().get_n(),
            encryptor_2.get_public_key().get_n()
        );

        let cipher_1 = encryptor_1.encrypt(1).unwrap();
        let cipher_2 = encryptor_2.encrypt(1).unwrap();

        assert!(matches!(
            cipher_1.add(&cipher_2),
            Err(PaillierError::ModulusMismatch(_))
        ));
        assert!(matches!(
            encryptor_1.decrypt(&cipher_2),
            Err(PaillierError::ModulusMismatch(_))
        ));
    }

    /// Ensures that the debug output contains neither the secret key nor the primes.
    #[test]
    fn debug_omits_secret_key() {
        let encryptor = PaillierEncryptor::new(Paillier::with_primes(1009, 1013).unwrap()).unwrap();

        let debug = format!("{encryptor:?}");

        assert!(debug.contains("PaillierEncryptor"));
        assert!(debug.contains("n_square"));
        assert!(!debug.contains("sk"));
        assert!(!debug.contains("lambda"));
        assert!(!debug.contains("1009"));
        assert!(!debug.contains("1013"));
    }

    /// Ensures that negative encoded values wrap around `n`.
    #[test]
    fn encrypt_encoded_negative() {
        let encryptor = PaillierEncryptor::new(Paillier::with_primes(1009, 1013).unwrap()).unwrap();
        let n = encryptor.get_public_key().get_n().clone();

        let cipher = AdditiveEncryptor::encrypt_encoded(&encryptor, &Z::from(-5), 0).unwrap();

        assert_eq!(&n - Z::from(5), encryptor.decrypt(&cipher).unwrap());
        assert!(matches!(
            AdditiveEncryptor::encrypt_encoded(&encryptor, &(Z::MINUS_ONE - &n), 0),
            Err(PaillierError::DomainViolation(_))
        ));
    }

    /// Checks that the stored scheme is the one the keys were generated with.
    #[test]
    fn scheme_kept() {
        let scheme = Paillier::with_primes(1009, 1013).unwrap();
        let encryptor = PaillierEncryptor::new(scheme.clone()).unwrap();

        assert_eq!(&scheme, encryptor.get_scheme());
        assert_eq!(&Z::from(1009 * 1013), encryptor.get_public_key().get_n());
    }
}
