// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module provides the traits a struct should implement if it is an
//! instance of a public key encryption scheme or an encryptor owning
//! a key pair of an additively homomorphic scheme. Furthermore, it contains
//! the Paillier cryptosystem implementing these traits.
//!
//! The main references are listed in the following:
//! - \[1\] Paillier, Pascal (1999).
//! Public-key cryptosystems based on composite degree residuosity classes.
//! In: Advances in Cryptology - EUROCRYPT '99, Springer.
//! <https://doi.org/10.1007/3-540-48910-X_16>
//! - \[2\] Katz, Jonathan and Lindell, Yehuda (2014).
//! Introduction to Modern Cryptography, Second Edition.
//! Chapter 13.2, CRC Press.

mod paillier;

pub use paillier::{
    Ciphertext, Paillier, PaillierEncryptor, PaillierEncryptorFixedPoint, PublicKey, Scalar,
    SecretKey, DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_PRECISION,
};

use crate::error::PaillierError;
use qfall_math::integer::Z;

/// This trait should be implemented by every public key encryption scheme.
/// It captures the essential functionalities each scheme has to support.
///
/// Note: The gen does not take in the parameter `1^n`, as this is a public parameter,
/// which shall be defined by the struct implementing this trait.
pub trait PKEncryption {
    /// The type of the public key.
    type PublicKey;
    /// The type of the secret key.
    type SecretKey;
    /// The type of a ciphertext.
    type Cipher;
    /// The type of error returned if an operation fails.
    type Error;

    /// Generates a public key and a secret key from the attributes the
    /// struct has, which implements this trait.
    fn gen(&self) -> Result<(Self::PublicKey, Self::SecretKey), Self::Error>;

    /// Encrypts `message` under the public key `pk`.
    fn enc(&self, pk: &Self::PublicKey, message: impl Into<Z>) -> Result<Self::Cipher, Self::Error>;

    /// Decrypts `cipher` using the secret key `sk` and the matching public key `pk`.
    fn dec(
        &self,
        sk: &Self::SecretKey,
        pk: &Self::PublicKey,
        cipher: &Self::Cipher,
    ) -> Result<Z, Self::Error>;
}

/// This trait should be implemented by every struct owning a key pair of
/// the Paillier scheme together with a fixed-point encoding of its plaintexts,
/// i.e. a plaintext `x` is represented by the signed integer `x * 10^precision`.
/// Integer plaintexts use precision `0`.
///
/// Protocols only built on encryption and the homomorphic operations of
/// [`Ciphertext`] should be generic over this trait. They never get access
/// to the secret key except through [`AdditiveEncryptor::decrypt`].
pub trait AdditiveEncryptor {
    /// The type of plaintexts before encoding into `[0, n)`.
    type Plaintext;

    /// Encodes and encrypts `message`.
    fn encrypt(&self, message: Self::Plaintext) -> Result<Ciphertext, PaillierError>;

    /// Decrypts and decodes `cipher`.
    fn decrypt(&self, cipher: &Ciphertext) -> Result<Self::Plaintext, PaillierError>;

    /// Returns the public key all ciphertexts are encrypted under.
    fn get_public_key(&self) -> &PublicKey;

    /// Returns the number of decimal digits plaintexts are encoded with.
    fn get_precision(&self) -> u32;

    /// Encodes `message` as the signed integer `message * 10^precision`.
    fn encode(&self, message: &Self::Plaintext) -> Result<Z, PaillierError>;

    /// Encrypts the signed integer `encoded`, which carries `precision`
    /// decimal digits, by wrapping negative values around `n`.
    fn encrypt_encoded(&self, encoded: &Z, precision: u32) -> Result<Ciphertext, PaillierError>;
}
