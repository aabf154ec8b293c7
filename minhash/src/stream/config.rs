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

use crate::error::Error;
use crate::estimator::Aggregation;

/// Parameters of a single stream run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    num_hashes: usize,
    print_every: usize,
    group_size: usize,
}

impl StreamConfig {
    /// Create a new builder for StreamConfig
    ///
    /// # Examples
    ///
    /// ```
    /// # use minhash::stream::StreamConfig;
    /// let config = StreamConfig::builder()
    ///     .num_hashes(50)
    ///     .print_every(1000)
    ///     .group_size(5)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.num_hashes(), 50);
    /// ```
    pub fn builder() -> StreamConfigBuilder {
        StreamConfigBuilder::default()
    }

    /// Number of independent hash slots in the sketch.
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Interval, in elements, between progress snapshots.
    pub fn print_every(&self) -> usize {
        self.print_every
    }

    /// Group size of the median-of-means estimator; 0 disables grouping.
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub(crate) fn median_aggregation(&self) -> Aggregation {
        Aggregation::MedianOfMeans {
            group_size: self.group_size,
        }
    }
}

/// Builder for StreamConfig
///
/// Every parameter must be set explicitly; there are no defaults.
#[derive(Debug, Clone, Default)]
pub struct StreamConfigBuilder {
    num_hashes: Option<usize>,
    print_every: Option<usize>,
    group_size: Option<usize>,
}

impl StreamConfigBuilder {
    /// Set the number of hash slots. Must be at least 1.
    pub fn num_hashes(mut self, num_hashes: usize) -> Self {
        self.num_hashes = Some(num_hashes);
        self
    }

    /// Set the progress snapshot interval. Must be at least 1.
    pub fn print_every(mut self, print_every: usize) -> Self {
        self.print_every = Some(print_every);
        self
    }

    /// Set the median-of-means group size.
    pub fn group_size(mut self, group_size: usize) -> Self {
        self.group_size = Some(group_size);
        self
    }

    /// Build the StreamConfig
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if a parameter is missing, or if `num_hashes` or `print_every` is 0.
    pub fn build(self) -> Result<StreamConfig, Error> {
        let num_hashes = self
            .num_hashes
            .ok_or_else(|| Error::config_invalid("num_hashes is required"))?;
        let print_every = self
            .print_every
            .ok_or_else(|| Error::config_invalid("print_every is required"))?;
        let group_size = self
            .group_size
            .ok_or_else(|| Error::config_invalid("group_size is required"))?;

        if num_hashes == 0 {
            return Err(Error::config_invalid("num_hashes must be at least 1")
                .with_context("num_hashes", num_hashes));
        }
        if print_every == 0 {
            return Err(Error::config_invalid("print_every must be at least 1")
                .with_context("print_every", print_every));
        }

        Ok(StreamConfig {
            num_hashes,
            print_every,
            group_size,
        })
    }
}
