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

use std::path::Path;

use crate::error::Error;
use crate::estimator::Aggregation;
use crate::sketch::MinHashSketch;
use crate::stream::DistinctCounter;
use crate::stream::EstimateSnapshot;
use crate::stream::ExactCounter;
use crate::stream::FileSink;
use crate::stream::SnapshotKind;
use crate::stream::SnapshotSink;
use crate::stream::StreamConfig;

/// Feeds a stream of integers through a [`MinHashSketch`] and reports
/// estimates at a fixed interval.
///
/// A processor owns its sketch for the whole run. Sinks only observe
/// snapshots; a failing sink aborts the run but never alters the sketch.
#[derive(Debug, Clone)]
pub struct StreamProcessor<C = ExactCounter> {
    config: StreamConfig,
    sketch: MinHashSketch,
    counter: C,
    processed: u64,
}

impl StreamProcessor<ExactCounter> {
    /// Create a processor that tracks exact distinct counts as ground truth.
    pub fn new(config: StreamConfig) -> Self {
        Self::with_counter(config, ExactCounter::new())
    }
}

impl<C: DistinctCounter> StreamProcessor<C> {
    /// Create a processor with a custom distinct counter.
    pub fn with_counter(config: StreamConfig, counter: C) -> Self {
        Self {
            sketch: MinHashSketch::new(config.num_hashes()),
            config,
            counter,
            processed: 0,
        }
    }

    /// Return the sketch.
    pub fn sketch(&self) -> &MinHashSketch {
        &self.sketch
    }

    /// Return the number of elements consumed so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Consume one element.
    ///
    /// Returns a progress snapshot when the element completes a
    /// `print_every` interval.
    pub fn update(&mut self, value: i64) -> Option<EstimateSnapshot> {
        self.counter.observe(value);
        self.sketch.update(value);
        self.processed += 1;

        if self.processed % self.config.print_every() as u64 == 0 {
            Some(self.snapshot(SnapshotKind::Progress))
        } else {
            None
        }
    }

    /// Compute both estimates from the current sketch state.
    pub fn snapshot(&self, kind: SnapshotKind) -> EstimateSnapshot {
        EstimateSnapshot {
            kind,
            processed: self.processed,
            mean_estimate: self.sketch.estimate(Aggregation::Mean),
            median_estimate: self.sketch.estimate(self.config.median_aggregation()),
            exact_uniques: self.counter.count(),
        }
    }

    /// Consume the whole stream, emitting progress snapshots and one final
    /// snapshot to `sink`, then finish the sink.
    ///
    /// # Errors
    ///
    /// Returns the first sink error. Processing stops there; the final
    /// snapshot is not emitted, the sink is not finished, and
    /// [`abort`](SnapshotSink::abort) is called on it instead.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minhash::stream::{MemorySink, StreamConfig, StreamProcessor};
    /// let config = StreamConfig::builder()
    ///     .num_hashes(8)
    ///     .print_every(2)
    ///     .group_size(4)
    ///     .build()
    ///     .unwrap();
    /// let mut processor = StreamProcessor::new(config);
    /// let mut sink = MemorySink::new();
    /// let last = processor.process([7, 7, 3, 9, 3], &mut sink).unwrap();
    /// assert_eq!(last.exact_uniques, 3);
    /// assert_eq!(sink.snapshots().len(), 3);
    /// ```
    pub fn process<I, S>(&mut self, stream: I, mut sink: S) -> Result<EstimateSnapshot, Error>
    where
        I: IntoIterator<Item = i64>,
        S: SnapshotSink,
    {
        tracing::info!(
            num_hashes = self.config.num_hashes(),
            print_every = self.config.print_every(),
            group_size = self.config.group_size(),
            "stream run started"
        );

        let last = match self.run(stream, &mut sink) {
            Ok(last) => last,
            Err(err) => {
                sink.abort();
                return Err(err);
            }
        };

        tracing::info!(
            num_hashes = self.config.num_hashes(),
            processed = last.processed,
            mean = last.mean_estimate,
            median = last.median_estimate,
            uniques = last.exact_uniques,
            "stream run finished"
        );
        Ok(last)
    }

    fn run<I, S>(&mut self, stream: I, sink: &mut S) -> Result<EstimateSnapshot, Error>
    where
        I: IntoIterator<Item = i64>,
        S: SnapshotSink,
    {
        for value in stream {
            if let Some(snapshot) = self.update(value) {
                tracing::debug!(
                    processed = snapshot.processed,
                    mean = snapshot.mean_estimate,
                    median = snapshot.median_estimate,
                    uniques = snapshot.exact_uniques,
                    "progress snapshot"
                );
                sink.emit(&snapshot)?;
            }
        }

        let last = self.snapshot(SnapshotKind::Final);
        sink.emit(&last)?;
        sink.finish()?;
        Ok(last)
    }
}

/// Run `stream` through a fresh processor, publishing snapshot lines at `path`.
///
/// The output file is opened before the stream is touched; if that fails the
/// stream is left unconsumed. See [`FileSink`] for how incomplete output is
/// handled.
pub fn process_to_file<I>(
    config: StreamConfig,
    stream: I,
    path: impl AsRef<Path>,
) -> Result<EstimateSnapshot, Error>
where
    I: IntoIterator<Item = i64>,
{
    let sink = FileSink::create(path)?;
    StreamProcessor::new(config).process(stream, sink)
}
