// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains an implementation of the IND-CPA secure
//! public key Paillier encryption scheme, which is additively homomorphic.
//!
//! The main references are listed in the following:
//! - \[1\] Paillier, Pascal (1999).
//! Public-key cryptosystems based on composite degree residuosity classes.
//! In: Advances in Cryptology - EUROCRYPT '99, Springer.
//! <https://doi.org/10.1007/3-540-48910-X_16>

mod ciphertext;
mod encryptor;

pub use ciphertext::{Ciphertext, Scalar};
pub use encryptor::{
    PaillierEncryptor, PaillierEncryptorFixedPoint, DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_PRECISION,
};

use super::PKEncryption;
use crate::{
    error::PaillierError,
    sample::prime::{sample_prime_distinct_from, sample_prime_with_bit_length},
    utils::arithmetic::{inverse_mod, l_function, pow_mod, reduce},
};
use qfall_math::{
    integer::Z,
    traits::{Gcd, Lcm},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// The public key `(n, g)` of the Paillier scheme.
///
/// `n` defines the plaintext domain `[0, n)` and
/// `n^2` the ciphertext domain `[0, n^2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKey {
    n: Z,
    g: Z,
    n_square: Z,
}

impl PublicKey {
    fn new(n: Z, g: Z) -> Self {
        let n_square = &n * &n;
        Self { n, g, n_square }
    }

    /// Returns the modulus `n = p * q`.
    pub fn get_n(&self) -> &Z {
        &self.n
    }

    /// Returns the generator `g`.
    pub fn get_g(&self) -> &Z {
        &self.g
    }

    /// Returns `n^2`, the modulus of the ciphertext domain.
    pub fn get_n_square(&self) -> &Z {
        &self.n_square
    }
}

/// The secret key `(lambda, mu)` of the Paillier scheme, where
/// `lambda = lcm(p - 1, q - 1)` and `mu = L(g^lambda mod n^2)^(-1) mod n`.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretKey {
    lambda: Z,
    mu: Z,
}

impl SecretKey {
    /// Returns `lambda = lcm(p - 1, q - 1)`.
    pub fn get_lambda(&self) -> &Z {
        &self.lambda
    }

    /// Returns `mu = L(g^lambda mod n^2)^(-1) mod n`.
    pub fn get_mu(&self) -> &Z {
        &self.mu
    }
}

/// This struct manages and stores the public parameters of a [`Paillier`]
/// public key encryption instance.
///
/// Attributes:
/// - `bit_length`: specifies the number of bits of each of the primes `p` and `q`
/// - `p`: optionally fixes the first prime instead of sampling it
/// - `q`: optionally fixes the second prime instead of sampling it
///
/// Fixed primes are the factorization of `n` and thus never serialized.
/// - `max_generator_attempts`: specifies how many candidates for `g` are
///   tested during key generation before giving up
///
/// # Examples
/// ```
/// use paillier_crypto::construction::pk_encryption::{Paillier, PKEncryption};
/// use qfall_math::integer::Z;
/// // setup public parameters and key pair
/// let paillier = Paillier::new(128).unwrap();
/// let (pk, sk) = paillier.gen().unwrap();
///
/// // encrypt a message in [0, n)
/// let msg = Z::from(42);
/// let cipher = paillier.enc(&pk, &msg).unwrap();
///
/// // decrypt
/// let m = paillier.dec(&sk, &pk, &cipher).unwrap();
///
/// assert_eq!(msg, m);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paillier {
    bit_length: u32,
    #[serde(skip)]
    p: Option<Z>,
    #[serde(skip)]
    q: Option<Z>,
    max_generator_attempts: u32,
}

impl Paillier {
    /// The number of candidates for `g` tested by default during key generation.
    pub const DEFAULT_MAX_GENERATOR_ATTEMPTS: u32 = 1024;

    /// Instantiates a [`Paillier`] PK encryption instance,
    /// which samples primes `p` and `q` with `bit_length` bits each.
    ///
    /// Parameters:
    /// - `bit_length`: specifies the number of bits of `p` and `q`
    ///
    /// Returns a [`Paillier`] instance or a [`PaillierError`]
    /// if `bit_length < 8`.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::Paillier;
    ///
    /// let paillier = Paillier::new(512).unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidParameter`](PaillierError::InvalidParameter) if `bit_length < 8`.
    pub fn new(bit_length: u32) -> Result<Self, PaillierError> {
        if bit_length < 8 {
            return Err(PaillierError::InvalidParameter(format!(
                "the primes need at least 8 bits, but {bit_length} were requested"
            )));
        }

        Ok(Self {
            bit_length,
            p: None,
            q: None,
            max_generator_attempts: Self::DEFAULT_MAX_GENERATOR_ATTEMPTS,
        })
    }

    /// Instantiates a [`Paillier`] PK encryption instance with fixed primes
    /// `p` and `q`. If `p == q`, key generation replaces `q` by a fresh
    /// odd prime of the same bit length.
    ///
    /// **WARNING:** The primes are not checked for security, i.e. fixing
    /// small or publicly known primes yields an insecure instance.
    ///
    /// Parameters:
    /// - `p`: specifies the first prime
    /// - `q`: specifies the second prime
    ///
    /// Returns a [`Paillier`] instance or a [`PaillierError`] if one of the
    /// given values is not an odd prime.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::Paillier;
    ///
    /// let paillier = Paillier::with_primes(1009, 1013).unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidParameter`](PaillierError::InvalidParameter) if `p` or `q`
    /// is not an odd prime.
    pub fn with_primes(p: impl Into<Z>, q: impl Into<Z>) -> Result<Self, PaillierError> {
        let p = check_odd_prime(p.into())?;

        Self {
            bit_length: p.bits() as u32,
            p: Some(p),
            q: None,
            max_generator_attempts: Self::DEFAULT_MAX_GENERATOR_ATTEMPTS,
        }
        .with_q(q)
    }

    /// Fixes the prime `p`, while `q` is still sampled with
    /// `bit_length` bits unless it is fixed as well.
    ///
    /// **WARNING:** The prime is not checked for security.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::Paillier;
    ///
    /// let paillier = Paillier::new(64).unwrap().with_p(1009).unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidParameter`](PaillierError::InvalidParameter) if `p`
    /// is not an odd prime.
    pub fn with_p(mut self, p: impl Into<Z>) -> Result<Self, PaillierError> {
        self.p = Some(check_odd_prime(p.into())?);
        Ok(self)
    }

    /// Fixes the prime `q`, while `p` is still sampled with
    /// `bit_length` bits unless it is fixed as well.
    ///
    /// **WARNING:** The prime is not checked for security.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::Paillier;
    ///
    /// let paillier = Paillier::new(64).unwrap().with_q(1013).unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidParameter`](PaillierError::InvalidParameter) if `q`
    /// is not an odd prime.
    pub fn with_q(mut self, q: impl Into<Z>) -> Result<Self, PaillierError> {
        self.q = Some(check_odd_prime(q.into())?);
        Ok(self)
    }

    /// Sets the number of candidates for `g` that key generation tests
    /// before returning [`KeyGenerationExhausted`](PaillierError::KeyGenerationExhausted).
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::Paillier;
    ///
    /// let paillier = Paillier::default().with_max_generator_attempts(16).unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`InvalidParameter`](PaillierError::InvalidParameter) if `attempts == 0`.
    pub fn with_max_generator_attempts(mut self, attempts: u32) -> Result<Self, PaillierError> {
        if attempts == 0 {
            return Err(PaillierError::InvalidParameter(String::from(
                "at least one generator candidate has to be tested",
            )));
        }
        self.max_generator_attempts = attempts;
        Ok(self)
    }

    /// This function instantiates a 128-bit secure [`Paillier`] scheme,
    /// i.e. one with a 3072-bit modulus `n`.
    pub fn secure128() -> Self {
        Self {
            bit_length: 1536,
            p: None,
            q: None,
            max_generator_attempts: Self::DEFAULT_MAX_GENERATOR_ATTEMPTS,
        }
    }

    /// Returns the number of bits of each prime `p` and `q`.
    pub fn get_bit_length(&self) -> u32 {
        self.bit_length
    }

    /// Returns the number of candidates for `g` tested during key generation.
    pub fn get_max_generator_attempts(&self) -> u32 {
        self.max_generator_attempts
    }

    /// Returns the primes `(p, q)` used for key generation.
    fn primes(&self) -> Result<(Z, Z), PaillierError> {
        // primes with at least 3 bits are odd
        let bit_length = self.bit_length.max(3);

        let p = match &self.p {
            Some(p) => p.clone(),
            None => match &self.q {
                Some(q) => sample_prime_distinct_from(bit_length, q)?,
                None => sample_prime_with_bit_length(bit_length)?,
            },
        };
        let q = match &self.q {
            Some(q) if q != &p => q.clone(),
            Some(_) => {
                warn!("the fixed primes p and q are equal, resampling q");
                sample_prime_distinct_from(bit_length, &p)?
            }
            None => sample_prime_distinct_from(bit_length, &p)?,
        };
        Ok((p, q))
    }

    /// Generates an encryption of `message` under `pk` tagged with the
    /// fixed-point `precision` its plaintext was encoded with.
    /// It follows these steps:
    /// - r <- [1, n-1] with gcd(r, n) = 1
    /// - c = g^m * r^n mod n^2
    ///
    /// Parameters:
    /// - `pk`: specifies the public key `pk = (n, g)`
    /// - `message`: specifies the message in `[0, n)`
    /// - `precision`: specifies the number of decimal digits of the encoding
    ///
    /// Returns a [`Ciphertext`] or a [`PaillierError`] if the message is
    /// not in `[0, n)`.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{Paillier, PKEncryption};
    /// let paillier = Paillier::new(64).unwrap();
    /// let (pk, sk) = paillier.gen().unwrap();
    ///
    /// let cipher = paillier.enc_with_precision(&pk, 12023, 2).unwrap();
    ///
    /// assert_eq!(2, cipher.get_precision());
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`DomainViolation`](PaillierError::DomainViolation) if `message < 0` or `message >= n`.
    pub fn enc_with_precision(
        &self,
        pk: &PublicKey,
        message: impl Into<Z>,
        precision: u32,
    ) -> Result<Ciphertext, PaillierError> {
        let message: Z = message.into();
        if message < Z::ZERO || message >= pk.n {
            return Err(PaillierError::DomainViolation(format!(
                "{message} is not in [0, n) for n = {}",
                pk.n
            )));
        }

        // r <- [1, n-1] with gcd(r, n) = 1
        let mut r = Z::sample_uniform(1, &pk.n)?;
        while r.gcd(&pk.n) != Z::ONE {
            r = Z::sample_uniform(1, &pk.n)?;
        }

        // c = g^m * r^n mod n^2
        let g_m = pow_mod(&pk.g, &message, &pk.n_square)?;
        let r_n = pow_mod(&r, &pk.n, &pk.n_square)?;
        let c = reduce(&(g_m * r_n), &pk.n_square);

        Ok(Ciphertext::new(c, pk, precision))
    }
}

/// Returns `prime` if it is an odd prime.
fn check_odd_prime(prime: Z) -> Result<Z, PaillierError> {
    if prime <= Z::from(2) || !prime.is_prime() {
        return Err(PaillierError::InvalidParameter(format!(
            "{prime} is not an odd prime"
        )));
    }
    Ok(prime)
}

impl Default for Paillier {
    /// Initializes a [`Paillier`] struct sampling 512-bit primes,
    /// i.e. with a 1024-bit modulus `n`.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::Paillier;
    ///
    /// let paillier = Paillier::default();
    /// ```
    fn default() -> Self {
        Self {
            bit_length: 512,
            p: None,
            q: None,
            max_generator_attempts: Self::DEFAULT_MAX_GENERATOR_ATTEMPTS,
        }
    }
}

impl PKEncryption for Paillier {
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type Cipher = Ciphertext;
    type Error = PaillierError;

    /// Generates a (pk, sk) pair for the Paillier public key encryption scheme
    /// by following these steps:
    /// - p, q <- primes with `bit_length` bits and p != q
    /// - n = p * q, lambda = lcm(p - 1, q - 1)
    /// - g <- [1, n^2 - 1]
    /// - while gcd(g, n) != 1 or L(g^lambda mod n^2) is not invertible mod n:
    ///   g = g + 1 (wrapping to 1 at n^2)
    /// - mu = L(g^lambda mod n^2)^(-1) mod n
    ///
    /// Then, `pk = (n, g)` and `sk = (lambda, mu)` is output.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{PKEncryption, Paillier};
    /// let paillier = Paillier::new(64).unwrap();
    ///
    /// let (pk, sk) = paillier.gen().unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`KeyGenerationExhausted`](PaillierError::KeyGenerationExhausted) if
    /// none of the tested candidates for `g` is suitable.
    fn gen(&self) -> Result<(Self::PublicKey, Self::SecretKey), Self::Error> {
        debug!(bit_length = self.bit_length, "generating Paillier key pair");
        let (p, q) = self.primes()?;

        let n = &p * &q;
        let n_square = &n * &n;
        let lambda = (&p - Z::ONE).lcm(&q - Z::ONE);

        // g <- [1, n^2 - 1]
        let mut g = Z::sample_uniform(1, &n_square)?;

        for attempt in 0..self.max_generator_attempts {
            // g has to be a unit mod n^2, otherwise L is not well-defined
            if g.gcd(&n) == Z::ONE {
                let l = l_function(&pow_mod(&g, &lambda, &n_square)?, &n);

                if let Some(mu) = inverse_mod(&l, &n) {
                    debug!(attempt, "found generator for Paillier key pair");
                    return Ok((PublicKey::new(n, g), SecretKey { lambda, mu }));
                }
            }

            trace!(attempt, "generator candidate is not suitable, incrementing g");
            g = g + Z::ONE;
            if g == n_square {
                g = Z::ONE;
            }
        }

        Err(PaillierError::KeyGenerationExhausted(
            self.max_generator_attempts,
        ))
    }

    /// Generates an encryption of `message` for the provided public key,
    /// see [`Paillier::enc_with_precision`], with precision `0`.
    ///
    /// Parameters:
    /// - `pk`: specifies the public key `pk = (n, g)`
    /// - `message`: specifies the message in `[0, n)`
    ///
    /// Returns a [`Ciphertext`] or a [`PaillierError`] if the message is
    /// not in `[0, n)`.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{PKEncryption, Paillier};
    /// let paillier = Paillier::new(64).unwrap();
    /// let (pk, sk) = paillier.gen().unwrap();
    ///
    /// let cipher = paillier.enc(&pk, 120).unwrap();
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`DomainViolation`](PaillierError::DomainViolation) if `message < 0` or `message >= n`.
    fn enc(&self, pk: &Self::PublicKey, message: impl Into<Z>) -> Result<Self::Cipher, Self::Error> {
        self.enc_with_precision(pk, message, 0)
    }

    /// Decrypts the provided `cipher` using the secret key `sk` by computing
    /// `m = L(c^lambda mod n^2) * mu mod n`.
    ///
    /// Parameters:
    /// - `sk`: specifies the secret key `sk = (lambda, mu)`
    /// - `pk`: specifies the public key `pk = (n, g)` matching `sk`
    /// - `cipher`: specifies the ciphertext `c`
    ///
    /// Returns the decryption of `cipher` as a [`Z`] instance in `[0, n)`.
    ///
    /// # Examples
    /// ```
    /// use paillier_crypto::construction::pk_encryption::{PKEncryption, Paillier};
    /// use qfall_math::integer::Z;
    /// let paillier = Paillier::new(64).unwrap();
    /// let (pk, sk) = paillier.gen().unwrap();
    /// let cipher = paillier.enc(&pk, 120).unwrap();
    ///
    /// let m = paillier.dec(&sk, &pk, &cipher).unwrap();
    ///
    /// assert_eq!(Z::from(120), m);
    /// ```
    ///
    /// # Errors and Failures
    /// - Returns a [`PaillierError`] of type
    /// [`ModulusMismatch`](PaillierError::ModulusMismatch) if `cipher` was
    /// not encrypted under `pk`.
    fn dec(
        &self,
        sk: &Self::SecretKey,
        pk: &Self::PublicKey,
        cipher: &Self::Cipher,
    ) -> Result<Z, Self::Error> {
        if cipher.get_n() != &pk.n {
            return Err(PaillierError::ModulusMismatch(String::from(
                "the ciphertext was not encrypted under the given public key",
            )));
        }

        let c_lambda = pow_mod(cipher.get_value(), &sk.lambda, &pk.n_square)?;
        Ok(reduce(&(l_function(&c_lambda, &pk.n) * &sk.mu), &pk.n))
    }
}
