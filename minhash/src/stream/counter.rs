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

//! Ground-truth distinct counting for validating estimates.

use std::collections::HashSet;

/// Counts distinct values alongside the sketch.
///
/// The count is reported in snapshots next to the estimates and plays no part
/// in the estimation itself.
pub trait DistinctCounter {
    /// Record one stream element.
    fn observe(&mut self, value: i64);

    /// Return the number of distinct values recorded so far.
    fn count(&self) -> u64;
}

/// Exact distinct counter backed by a hash set.
#[derive(Debug, Clone, Default)]
pub struct ExactCounter {
    seen: HashSet<i64>,
}

impl ExactCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DistinctCounter for ExactCounter {
    fn observe(&mut self, value: i64) {
        self.seen.insert(value);
    }

    fn count(&self) -> u64 {
        self.seen.len() as u64
    }
}

/// Counter for runs without ground truth; always reports 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCounter;

impl DistinctCounter for NoCounter {
    fn observe(&mut self, _value: i64) {}

    fn count(&self) -> u64 {
        0
    }
}
