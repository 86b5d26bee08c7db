// Copyright © 2024 The paillier-crypto developers
//
// This file is part of paillier-crypto.
//
// paillier-crypto is free software: you can redistribute it and/or modify it under
// the terms of the Mozilla Public License Version 2.0 as published by the
// Mozilla Foundation. See <https://mozilla.org/en-US/MPL/2.0/>.

//! This module contains common functions that are used by sub functions.
//!
//! This includes modular arithmetic on integers and the fixed-point codec.

pub mod arithmetic;
pub mod fixed_point;
