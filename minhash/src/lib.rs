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

//! # MinHash cardinality estimation
//!
//! Estimates the number of distinct values in a stream of 64-bit integers
//! without storing the values themselves.
//!
//! A [`MinHashSketch`](sketch::MinHashSketch) keeps, for each of `num_hashes`
//! hash functions, the smallest hash seen so far in `[0, 1)`. Since the
//! expected minimum of `n` uniform values is `1 / (n + 1)`, every slot yields an
//! estimate of `n`; the [`estimator`] module combines them by plain mean or by
//! median-of-means. The [`stream`] module drives a sketch over a stream and
//! reports snapshots of both estimates next to an exact count, and
//! [`experiment`] runs several sketch sizes over the same stream.
//!
//! ```rust
//! use minhash::estimator::Aggregation;
//! use minhash::sketch::MinHashSketch;
//!
//! let mut sketch = MinHashSketch::new(256);
//! for i in 0..10_000i64 {
//!     sketch.update(i % 1000);
//! }
//! let estimate = sketch.estimate(Aggregation::MedianOfMeans { group_size: 16 });
//! assert!(estimate > 500.0 && estimate < 10_000.0);
//! ```

pub mod error;
pub mod estimator;
pub mod experiment;
pub mod hash;
pub mod sketch;
pub mod stream;
