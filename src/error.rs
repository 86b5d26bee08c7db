// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains the error type returned by all fallible operations
//! of this crate.

use qfall_math::error::MathError;
use thiserror::Error;

/// [`PaillierError`] defines all errors that can occur while generating keys,
/// encrypting, decrypting or computing on ciphertexts.
///
/// None of these errors leaves partial state behind. They describe usage or
/// configuration errors and are not meant to be retried.
///
/// Possible entries:
/// - `InvalidOperand` is returned if a scalar or vector argument can not be
///   used for the requested operation
/// - `DomainViolation` is returned if a plaintext is not contained in `[0, n)`
///   or can not be encoded into it
/// - `ModulusMismatch` is returned if ciphertexts or keys stemming from
///   different key pairs are combined
/// - `PrecisionMismatch` is returned if ciphertexts with different
///   fixed-point precisions are combined or decrypted
/// - `KeyGenerationExhausted` is returned if no generator with an invertible
///   `L(g^lambda mod n^2)` was found within the configured number of attempts
/// - `NonInvertibleScale` is returned if `10^precision` is not invertible mod `n`
/// - `InvalidParameter` is returned if the public parameters of a scheme or
///   codec are not suitable
/// - `Math` wraps errors of the underlying arithmetic library
///
/// # Examples
/// ```
/// use paillier_crypto::error::PaillierError;
///
/// let error = PaillierError::InvalidOperand(String::from("NaN"));
/// assert_eq!("invalid operand: NaN", error.to_string());
/// ```
#[derive(Error, Debug)]
pub enum PaillierError {
    #[error("invalid operand: {0}")]
    InvalidOperand(String),
    #[error("the message is out of the plaintext domain: {0}")]
    DomainViolation(String),
    #[error("the moduli of the given operands do not match: {0}")]
    ModulusMismatch(String),
    #[error("the fixed-point precisions {left} and {right} do not match")]
    PrecisionMismatch { left: u32, right: u32 },
    #[error("no invertible generator was found within {0} attempts")]
    KeyGenerationExhausted(u32),
    #[error("10^{0} is not invertible modulo n")]
    NonInvertibleScale(u32),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Math(#[from] MathError),
}
