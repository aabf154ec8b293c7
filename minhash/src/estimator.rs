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

//! Cardinality estimators over MinHash slot minima.
//!
//! The expected minimum of `n` uniform samples from `[0, 1]` is `1 / (n + 1)`,
//! so a single slot holding minimum `m` estimates `ceil(1/m - 1)` distinct
//! values. Two aggregations combine the per-slot estimates:
//!
//! - [`mean_estimate`]: arithmetic mean over all slots
//! - [`median_of_means`]: mean within consecutive groups of slots, then the
//!   median of those group means
//!
//! All functions here are pure; they never touch the sketch that produced the
//! slots.

/// How slot estimates are combined into one cardinality estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Arithmetic mean of all per-slot estimates.
    Mean,
    /// Median of the means of consecutive groups of `group_size` slots.
    ///
    /// A `group_size` of 0, or one not smaller than the slot count, falls back
    /// to [`Aggregation::Mean`].
    MedianOfMeans { group_size: usize },
}

impl Aggregation {
    /// Estimate the cardinality from the given slot minima.
    pub fn estimate(&self, slots: &[f64]) -> f64 {
        match *self {
            Aggregation::Mean => mean_estimate(slots),
            Aggregation::MedianOfMeans { group_size } => median_of_means(slots, group_size),
        }
    }
}

/// Invert a single slot minimum into a cardinality estimate.
///
/// An empty slot (`m == 1.0`) estimates 0. A minimum of exactly 0 yields
/// positive infinity.
///
/// # Examples
///
/// ```
/// # use minhash::estimator::per_slot_estimate;
/// assert_eq!(per_slot_estimate(1.0), 0.0);
/// assert_eq!(per_slot_estimate(0.25), 3.0);
/// assert_eq!(per_slot_estimate(0.3), 3.0);
/// ```
#[inline]
pub fn per_slot_estimate(m: f64) -> f64 {
    (1.0 / m - 1.0).ceil()
}

/// Arithmetic mean of the per-slot estimates.
///
/// Returns NaN for an empty slice.
pub fn mean_estimate(slots: &[f64]) -> f64 {
    let sum: f64 = slots.iter().map(|&m| per_slot_estimate(m)).sum();
    sum / slots.len() as f64
}

/// Mean per-slot estimate of each consecutive group of `group_size` slots.
///
/// The last group holds the remainder when `group_size` does not divide the
/// slot count; no slot is dropped and no group is padded.
///
/// # Panics
///
/// Panics if `group_size` is 0.
pub fn group_means(slots: &[f64], group_size: usize) -> Vec<f64> {
    assert!(group_size > 0, "group_size must be at least 1");
    slots.chunks(group_size).map(mean_estimate).collect()
}

/// Median of `values`, averaging the two middle values for even lengths.
///
/// Returns NaN for an empty slice.
///
/// # Examples
///
/// ```
/// # use minhash::estimator::median;
/// assert_eq!(median(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), 3.5);
/// assert_eq!(median(&[5.0, 1.0, 4.0, 2.0, 3.0]), 3.0);
/// ```
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Median-of-means estimate over the slot minima.
///
/// Falls back to [`mean_estimate`] when `group_size` is 0 or not smaller than
/// the number of slots, since grouping would then be trivial.
///
/// # Examples
///
/// ```
/// # use minhash::estimator::{mean_estimate, median_of_means};
/// // per-slot estimates: 1, 3, 9, 1
/// let slots = [0.5, 0.25, 0.1, 0.5];
/// assert_eq!(median_of_means(&slots, 1), 2.0);
/// assert_eq!(median_of_means(&slots, 0), mean_estimate(&slots));
/// assert_eq!(median_of_means(&slots, 4), mean_estimate(&slots));
/// ```
pub fn median_of_means(slots: &[f64], group_size: usize) -> f64 {
    if group_size == 0 || group_size >= slots.len() {
        return mean_estimate(slots);
    }
    median(&group_means(slots, group_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_slot_estimate_rounds_up() {
        assert_eq!(per_slot_estimate(0.5), 1.0);
        assert_eq!(per_slot_estimate(0.2), 4.0);
        assert_eq!(per_slot_estimate(0.15), 6.0);
        assert_eq!(per_slot_estimate(0.0), f64::INFINITY);
    }

    #[test]
    fn test_remainder_group() {
        // per-slot estimates: 1, 1, 1, 3, 3, 4, 9
        let slots = [0.5, 0.5, 0.5, 0.25, 0.25, 0.2, 0.1];
        let means = group_means(&slots, 3);
        assert_eq!(means.len(), 3);
        assert_eq!(means[0], 1.0);
        assert_eq!(means[1], 10.0 / 3.0);
        assert_eq!(means[2], 9.0);
        assert_eq!(median_of_means(&slots, 3), 10.0 / 3.0);
    }

    #[test]
    fn test_near_total_grouping() {
        // group_size == len - 1 leaves a trailing group of one slot
        let slots = [0.5, 0.5, 0.5, 0.1];
        let means = group_means(&slots, 3);
        assert_eq!(means, vec![1.0, 9.0]);
        assert_eq!(median_of_means(&slots, 3), 5.0);
    }

    #[test]
    fn test_aggregation_dispatch() {
        let slots = [0.5, 0.25, 0.1, 0.5, 0.2];
        assert_eq!(Aggregation::Mean.estimate(&slots), mean_estimate(&slots));
        assert_eq!(
            Aggregation::MedianOfMeans { group_size: 2 }.estimate(&slots),
            median_of_means(&slots, 2)
        );
    }

    #[test]
    fn test_median_of_empty() {
        assert!(median(&[]).is_nan());
    }
}
