// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Deterministic mapping of `(value, hash_index)` pairs onto the unit interval.
//!
//! Each hash index selects an independent-looking hash function: the value and
//! the index are encoded big-endian into a 16-byte key, the key is digested with
//! SHA-256, and the leading 64 bits of the digest are scaled into `[0, 1)`.
//! The mapping is stable across processes and platforms.

use byteorder::BigEndian;
use byteorder::ByteOrder;
use sha2::Digest;
use sha2::Sha256;

const KEY_LEN: usize = 16;

/// Largest `f64` strictly below `1.0`.
const UNIT_UPPER: f64 = 1.0 - f64::EPSILON / 2.0;

/// Map `value` under hash function `hash_index` to a pseudo-random real in `[0, 1)`.
///
/// # Examples
///
/// ```
/// # use minhash::hash::hash_to_unit;
/// let x = hash_to_unit(42, 0);
/// assert!((0.0..1.0).contains(&x));
/// assert_eq!(x, hash_to_unit(42, 0));
/// assert_ne!(x, hash_to_unit(42, 1));
/// ```
pub fn hash_to_unit(value: i64, hash_index: u64) -> f64 {
    let mut key = [0u8; KEY_LEN];
    BigEndian::write_i64(&mut key[..8], value);
    BigEndian::write_u64(&mut key[8..], hash_index);

    let digest = Sha256::digest(key);
    let prefix = BigEndian::read_u64(&digest[..8]);

    // prefixes within 2^10 of u64::MAX round up to exactly 1.0 in f64
    let unit = prefix as f64 / u64::MAX as f64;
    unit.min(UNIT_UPPER)
}
