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

//! MinHash sketch: one running minimum per hash function.

use crate::estimator::Aggregation;
use crate::hash::hash_to_unit;

/// Value of a slot that has not observed anything yet.
pub const EMPTY_SLOT: f64 = 1.0;

/// A MinHash sketch over 64-bit integers.
///
/// Slot `i` holds the minimum of `hash_to_unit(v, i)` over every value `v`
/// seen so far, starting from [`EMPTY_SLOT`]. Slots only ever move down.
#[derive(Debug, Clone, PartialEq)]
pub struct MinHashSketch {
    slots: Vec<f64>,
}

impl MinHashSketch {
    /// Create a sketch with `num_hashes` independent slots.
    ///
    /// # Panics
    ///
    /// Panics if `num_hashes` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minhash::sketch::MinHashSketch;
    /// let sketch = MinHashSketch::new(16);
    /// assert_eq!(sketch.num_hashes(), 16);
    /// assert!(sketch.is_empty());
    /// ```
    pub fn new(num_hashes: usize) -> Self {
        assert!(num_hashes > 0, "num_hashes must be at least 1");
        Self {
            slots: vec![EMPTY_SLOT; num_hashes],
        }
    }

    /// Update every slot with `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minhash::sketch::MinHashSketch;
    /// let mut sketch = MinHashSketch::new(4);
    /// sketch.update(7);
    /// assert!(sketch.slots().iter().all(|&m| m < 1.0));
    /// ```
    pub fn update(&mut self, value: i64) {
        for (hash_index, slot) in self.slots.iter_mut().enumerate() {
            let mapped = hash_to_unit(value, hash_index as u64);
            *slot = slot.min(mapped);
        }
    }

    /// Return the current slot minima, indexed by hash index.
    pub fn slots(&self) -> &[f64] {
        &self.slots
    }

    /// Return the number of slots.
    pub fn num_hashes(&self) -> usize {
        self.slots.len()
    }

    /// Check if no value has been observed.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|&m| m == EMPTY_SLOT)
    }

    /// Return the cardinality estimate under the given aggregation.
    pub fn estimate(&self, aggregation: Aggregation) -> f64 {
        aggregation.estimate(&self.slots)
    }

    /// Reset the sketch to empty state
    pub fn reset(&mut self) {
        self.slots.fill(EMPTY_SLOT);
    }
}
