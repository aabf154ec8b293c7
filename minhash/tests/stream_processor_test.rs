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


use std::cell::Cell;
use std::io;
use std::io::Write;

use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::ge;
use googletest::prelude::near;
use minhash::estimator::Aggregation;
use minhash::error::Error;
use minhash::error::ErrorKind;
use minhash::stream::EstimateSnapshot;
use minhash::stream::MemorySink;
use minhash::stream::SnapshotKind;
use minhash::stream::SnapshotSink;
use minhash::stream::StreamConfig;
use minhash::stream::StreamProcessor;
use minhash::stream::TeeSink;
use minhash::stream::WriterSink;

fn config(num_hashes: usize, print_every: usize, group_size: usize) -> StreamConfig {
    StreamConfig::builder()
        .num_hashes(num_hashes)
        .print_every(print_every)
        .group_size(group_size)
        .build()
        .unwrap()
}

/// Accepts `limit` snapshots, then fails every write.
struct FailAfter {
    limit: usize,
    accepted: Vec<EstimateSnapshot>,
    finished: bool,
    aborted: bool,
}

impl FailAfter {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            accepted: vec![],
            finished: false,
            aborted: false,
        }
    }
}

impl SnapshotSink for FailAfter {
    fn emit(&mut self, snapshot: &EstimateSnapshot) -> Result<(), Error> {
        if self.accepted.len() == self.limit {
            return Err(Error::new(ErrorKind::SinkWrite, "sink is full"));
        }
        self.accepted.push(*snapshot);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

/// Buffers writes and records whether they were flushed.
#[derive(Default)]
struct RecordingWriter {
    pending: Vec<u8>,
    flushed: Vec<u8>,
}

impl Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushed.append(&mut self.pending);
        Ok(())
    }
}

#[test]
fn test_small_stream_scenario() {
    let mut processor = StreamProcessor::new(config(1, 5, 0));
    let mut sink = MemorySink::new();
    let last = processor.process([7, 7, 3, 9, 3], &mut sink).unwrap();

    assert_eq!(last.kind, SnapshotKind::Final);
    assert_eq!(last.processed, 5);
    assert_eq!(last.exact_uniques, 3);
    // a single slot is noisy; for these values it lands on 8
    assert_that!(last.mean_estimate, eq(8.0));
    assert_that!(last.median_estimate, eq(8.0));

    // the fifth element aligns with print_every, and the final record follows
    let snapshots = sink.snapshots();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].kind, SnapshotKind::Progress);
    assert_eq!(snapshots[0].processed, 5);
    assert_eq!(snapshots[1], last);
}

#[test]
fn test_small_stream_many_slots() {
    let mut processor = StreamProcessor::new(config(500, 5, 10));
    let last = processor.process([7, 7, 3, 9, 3], MemorySink::new()).unwrap();
    assert_eq!(last.exact_uniques, 3);

    // the median slot lands close to the true count
    let median_slot = processor
        .sketch()
        .estimate(Aggregation::MedianOfMeans { group_size: 1 });
    assert_that!(median_slot, near(3.0, 1.0));

    // group means inherit the heavy upper tail of 1/m, and the plain mean
    // even more so
    assert_that!(last.median_estimate, ge(3.0));
    assert!(last.median_estimate < 20.0, "median={}", last.median_estimate);
    assert_that!(last.mean_estimate, ge(last.median_estimate));
}

#[test]
fn test_snapshot_count() {
    for (len, print_every) in [(0, 3), (1, 3), (9, 3), (10, 3), (10, 1), (100, 7), (5, 10)] {
        let mut processor = StreamProcessor::new(config(2, print_every, 0));
        let mut sink = MemorySink::new();
        processor.process(0..len as i64, &mut sink).unwrap();

        let snapshots = sink.snapshots();
        let progress: Vec<_> = snapshots.iter().filter(|s| !s.is_final()).collect();
        let finals = snapshots.iter().filter(|s| s.is_final()).count();
        assert_eq!(progress.len(), len / print_every, "len={len} print_every={print_every}");
        assert_eq!(finals, 1);
        assert!(snapshots.last().unwrap().is_final());
        for (i, snapshot) in progress.iter().enumerate() {
            assert_eq!(snapshot.processed, ((i + 1) * print_every) as u64);
        }
        assert!(sink.is_finished());
    }
}

#[test]
fn test_exact_uniques_track_stream() {
    let stream: Vec<i64> = (0..1000).map(|i| i % 300).collect();
    let mut processor = StreamProcessor::new(config(5, 100, 2));
    let mut sink = MemorySink::new();
    processor.process(stream, &mut sink).unwrap();

    let uniques: Vec<u64> = sink.snapshots().iter().map(|s| s.exact_uniques).collect();
    assert_eq!(uniques, vec![100, 200, 300, 300, 300, 300, 300, 300, 300, 300, 300]);
}

#[test]
fn test_sink_failure_aborts_run() {
    let consumed = Cell::new(0);
    let stream = (0..100i64).inspect(|_| consumed.set(consumed.get() + 1));

    let mut processor = StreamProcessor::new(config(3, 10, 0));
    let mut sink = FailAfter::new(2);
    let err = processor.process(stream, &mut sink).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SinkWrite);
    assert_eq!(sink.accepted.len(), 2);
    assert!(!sink.finished);
    assert!(sink.aborted);
    assert_eq!(consumed.get(), 30);
    assert_eq!(processor.processed(), 30);
}

#[test]
fn test_final_write_failure_is_reported() {
    let mut processor = StreamProcessor::new(config(3, 10, 0));
    let mut sink = FailAfter::new(2);
    let err = processor.process(0..25i64, &mut sink).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SinkWrite);
    assert_eq!(processor.processed(), 25);
    assert!(!sink.finished);
    assert!(sink.aborted);
}

#[test]
fn test_successful_run_is_not_aborted() {
    let mut processor = StreamProcessor::new(config(3, 10, 0));
    let mut sink = FailAfter::new(10);
    processor.process(0..25i64, &mut sink).unwrap();
    assert!(sink.finished);
    assert!(!sink.aborted);
}

#[test]
fn test_failed_run_flushes_writer() {
    let mut writer = RecordingWriter::default();
    let mut processor = StreamProcessor::new(config(2, 5, 0));
    let sink = TeeSink::new(WriterSink::new(&mut writer), FailAfter::new(1));
    let err = processor.process(0..20i64, sink).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SinkWrite);
    assert!(writer.pending.is_empty());
    // the writer saw the accepted snapshot and the one the second sink refused
    let text = String::from_utf8(writer.flushed).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.starts_with("Processed 5 numbers: "));
}

#[test]
fn test_sketch_independent_of_sink() {
    let mut healthy = StreamProcessor::new(config(6, 10, 2));
    healthy.process(0..30i64, MemorySink::new()).unwrap();

    let mut failing = StreamProcessor::new(config(6, 10, 2));
    let _ = failing.process(0..30i64, FailAfter::new(0));
    // the failing run stopped at the first snapshot; finish the same elements
    for value in 10..30 {
        failing.update(value);
    }

    assert_eq!(healthy.sketch(), failing.sketch());
}

#[test]
fn test_rendered_output() {
    let mut out = Vec::new();
    let mut processor = StreamProcessor::new(config(1, 5, 0));
    processor
        .process([7, 7, 3, 9, 3], WriterSink::new(&mut out))
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Processed 5 numbers: avg=8.00, median=8.00, uniques=3\n\
         Final after 5 numbers: avg=8.00, median=8.00, total uniques=3\n"
    );
}
