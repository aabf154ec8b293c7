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

use std::fmt;

/// Whether a snapshot was taken mid-stream or after the stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// Emitted every `print_every` elements.
    Progress,
    /// Emitted exactly once, after the last element.
    Final,
}

/// Point-in-time estimates of a stream run.
///
/// Estimates keep full precision; the [`Display`](fmt::Display) rendering
/// rounds them to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateSnapshot {
    /// Kind of this snapshot.
    pub kind: SnapshotKind,
    /// Number of stream elements consumed so far.
    pub processed: u64,
    /// Mean-of-slots estimate.
    pub mean_estimate: f64,
    /// Median-of-means estimate.
    pub median_estimate: f64,
    /// Exact number of distinct values seen so far.
    pub exact_uniques: u64,
}

impl EstimateSnapshot {
    /// Check if this is the terminal snapshot of a run.
    pub fn is_final(&self) -> bool {
        self.kind == SnapshotKind::Final
    }
}

/// Renders one line, without the trailing newline.
///
/// # Examples
///
/// ```
/// # use minhash::stream::{EstimateSnapshot, SnapshotKind};
/// let snapshot = EstimateSnapshot {
///     kind: SnapshotKind::Progress,
///     processed: 1000,
///     mean_estimate: 987.654,
///     median_estimate: 1001.0,
///     exact_uniques: 990,
/// };
/// assert_eq!(
///     snapshot.to_string(),
///     "Processed 1000 numbers: avg=987.65, median=1001.00, uniques=990"
/// );
/// ```
impl fmt::Display for EstimateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SnapshotKind::Progress => write!(
                f,
                "Processed {} numbers: avg={:.2}, median={:.2}, uniques={}",
                self.processed, self.mean_estimate, self.median_estimate, self.exact_uniques
            ),
            SnapshotKind::Final => write!(
                f,
                "Final after {} numbers: avg={:.2}, median={:.2}, total uniques={}",
                self.processed, self.mean_estimate, self.median_estimate, self.exact_uniques
            ),
        }
    }
}
