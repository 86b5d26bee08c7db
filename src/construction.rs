// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains cryptographic constructions.
//! A construction is build the same way:
//!
//! 1. A trait that combines the common feature, e.g.
//! [`public key encryption`](pk_encryption::PKEncryption).
//! 2. Explicit implementations of the trait, e.g.
//! [`Paillier`](pk_encryption::Paillier).
//!
//! Protocols such as [`distance`] are generic over the
//! [`AdditiveEncryptor`](pk_encryption::AdditiveEncryptor) trait.

pub mod distance;
pub mod pk_encryption;
