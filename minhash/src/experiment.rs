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

//! Running several configurations over one shared stream.
//!
//! Every run gets its own [`StreamProcessor`] and its own sink; the stream is
//! only read. Runs are therefore independent and can execute on separate
//! threads without locking.

use std::panic;
use std::thread;

use crate::error::Error;
use crate::stream::EstimateSnapshot;
use crate::stream::SnapshotSink;
use crate::stream::StreamConfig;
use crate::stream::StreamProcessor;

/// Result of one run within an experiment.
#[derive(Debug)]
pub struct RunOutcome {
    /// Configuration of the run.
    pub config: StreamConfig,
    /// Final snapshot, or the error that aborted the run.
    pub result: Result<EstimateSnapshot, Error>,
}

/// Run each configuration in order on the calling thread.
///
/// `make_sink` is called once per run, before the run reads the stream. A
/// failing run does not stop the remaining ones.
pub fn run_sequential<S, F>(
    stream: &[i64],
    configs: &[StreamConfig],
    mut make_sink: F,
) -> Vec<RunOutcome>
where
    S: SnapshotSink,
    F: FnMut(&StreamConfig) -> Result<S, Error>,
{
    configs
        .iter()
        .map(|config| RunOutcome {
            config: *config,
            result: run_one(stream, config, &mut make_sink),
        })
        .collect()
}

/// Run every configuration on its own scoped thread.
///
/// Outcomes are returned in the order of `configs`. Sinks are created on the
/// thread that uses them.
///
/// # Panics
///
/// Propagates a panic raised by any run.
pub fn run_parallel<S, F>(
    stream: &[i64],
    configs: &[StreamConfig],
    make_sink: F,
) -> Vec<RunOutcome>
where
    S: SnapshotSink,
    F: Fn(&StreamConfig) -> Result<S, Error> + Sync,
{
    let make_sink = &make_sink;
    thread::scope(|s| {
        let handles: Vec<_> = configs
            .iter()
            .map(|config| {
                s.spawn(move || RunOutcome {
                    config: *config,
                    result: run_one(stream, config, make_sink),
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
            .collect()
    })
}

fn run_one<S, F>(
    stream: &[i64],
    config: &StreamConfig,
    make_sink: F,
) -> Result<EstimateSnapshot, Error>
where
    S: SnapshotSink,
    F: FnOnce(&StreamConfig) -> Result<S, Error>,
{
    let sink = make_sink(config).inspect_err(|err| {
        tracing::warn!(num_hashes = config.num_hashes(), error = %err, "run skipped");
    })?;
    StreamProcessor::new(*config)
        .process(stream.iter().copied(), sink)
        .inspect_err(|err| {
            tracing::warn!(num_hashes = config.num_hashes(), error = %err, "run aborted");
        })
}
