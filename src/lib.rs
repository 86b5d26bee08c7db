// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This crate provides the Paillier cryptosystem, an additively homomorphic
//! public key encryption scheme, together with a fixed-point encoding of
//! signed and fractional values and protocols built on the homomorphism,
//! such as the encrypted squared euclidean distance.
//!
//! Ciphertexts can be added and multiplied by integer or fractional scalars
//! without access to the secret key.

pub mod construction;
pub mod error;
pub mod sample;
pub mod utils;
