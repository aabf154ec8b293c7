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

//! Destinations for estimate snapshots.
//!
//! A sink receives every snapshot of a run in order, then exactly one
//! [`finish`](SnapshotSink::finish) call after the final snapshot. A run that
//! fails calls [`abort`](SnapshotSink::abort) instead of `finish`. Failures are
//! reported as [`ErrorKind::SinkWrite`](crate::error::ErrorKind::SinkWrite) and
//! are never retried here.

use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::stream::EstimateSnapshot;

const PARTIAL_SUFFIX: &str = ".partial";

/// Consumer of the snapshots produced by a stream run.
pub trait SnapshotSink {
    /// Accept one snapshot.
    fn emit(&mut self, snapshot: &EstimateSnapshot) -> Result<(), Error>;

    /// Flush and close the sink after the final snapshot.
    fn finish(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Flush and close the sink after a failed run.
    ///
    /// The run already reports its own error, so failures here are only
    /// logged.
    fn abort(&mut self) {}
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for &mut S {
    fn emit(&mut self, snapshot: &EstimateSnapshot) -> Result<(), Error> {
        (**self).emit(snapshot)
    }

    fn finish(&mut self) -> Result<(), Error> {
        (**self).finish()
    }

    fn abort(&mut self) {
        (**self).abort()
    }
}

/// Keeps every snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    snapshots: Vec<EstimateSnapshot>,
    finished: bool,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the snapshots received so far.
    pub fn snapshots(&self) -> &[EstimateSnapshot] {
        &self.snapshots
    }

    /// Check if `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl SnapshotSink for MemorySink {
    fn emit(&mut self, snapshot: &EstimateSnapshot) -> Result<(), Error> {
        self.snapshots.push(*snapshot);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.finished = true;
        Ok(())
    }
}

/// Writes each snapshot as one text line to any [`Write`].
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Create a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SnapshotSink for WriterSink<W> {
    fn emit(&mut self, snapshot: &EstimateSnapshot) -> Result<(), Error> {
        writeln!(self.writer, "{snapshot}").map_err(|err| write_error(err, snapshot))
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.writer.flush().map_err(|err| {
            Error::sink_write("failed to flush snapshot writer").set_source(err)
        })
    }

    fn abort(&mut self) {
        if let Err(err) = self.writer.flush() {
            tracing::warn!(error = %err, "failed to flush snapshot writer");
        }
    }
}

/// Sends every snapshot to two sinks, `first` then `second`.
#[derive(Debug)]
pub struct TeeSink<A, B> {
    first: A,
    second: B,
}

impl<A: SnapshotSink, B: SnapshotSink> TeeSink<A, B> {
    /// Create a sink forwarding to `first` and `second`.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Return both inner sinks.
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: SnapshotSink, B: SnapshotSink> SnapshotSink for TeeSink<A, B> {
    fn emit(&mut self, snapshot: &EstimateSnapshot) -> Result<(), Error> {
        self.first.emit(snapshot)?;
        self.second.emit(snapshot)
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.first.finish()?;
        self.second.finish()
    }

    fn abort(&mut self) {
        self.first.abort();
        self.second.abort();
    }
}

/// Writes snapshot lines to a file that only appears once the run completes.
///
/// Lines go to `<path>.partial`. [`finish`](SnapshotSink::finish) flushes,
/// syncs and renames it to `path`. If the sink is dropped before a successful
/// `finish` (for example because the run aborted), the partial file is
/// removed. Output left at `path` by an earlier run is removed when the sink
/// is created, so a file at `path` always holds this run, complete.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    partial_path: PathBuf,
    writer: Option<BufWriter<File>>,
    committed: bool,
}

impl FileSink {
    /// Open a sink that will publish its output at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SinkUnavailable`] if the partial file cannot be
    /// created or an existing file at `path` cannot be removed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let partial_path = partial_path_of(&path);
        let file = File::create(&partial_path).map_err(|err| {
            Error::new(ErrorKind::SinkUnavailable, "failed to create output file")
                .with_context("path", partial_path.display())
                .set_source(err)
        })?;

        let sink = Self {
            path,
            partial_path,
            writer: Some(BufWriter::new(file)),
            committed: false,
        };

        // dropping the sink on error also removes the partial file
        match fs::remove_file(&sink.path) {
            Ok(()) => tracing::debug!(path = %sink.path.display(), "removed previous output"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(
                    Error::new(ErrorKind::SinkUnavailable, "failed to remove previous output")
                        .with_context("path", sink.path.display())
                        .set_source(err),
                );
            }
        }
        Ok(sink)
    }

    /// Return the path the output is published at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the path written to until the run completes.
    pub fn partial_path(&self) -> &Path {
        &self.partial_path
    }

    fn commit(&mut self) -> io::Result<()> {
        let Some(writer) = self.writer.take() else {
            if self.committed {
                return Ok(());
            }
            return Err(io::Error::other("output was discarded"));
        };
        let file = writer.into_inner().map_err(|err| err.into_error())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&self.partial_path, &self.path)?;
        self.committed = true;
        Ok(())
    }

    fn discard(&mut self) {
        if self.committed {
            return;
        }
        drop(self.writer.take());
        match fs::remove_file(&self.partial_path) {
            Ok(()) => tracing::warn!(
                path = %self.partial_path.display(),
                "discarded incomplete output"
            ),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(
                path = %self.partial_path.display(),
                error = %err,
                "failed to remove incomplete output"
            ),
        }
    }
}

impl SnapshotSink for FileSink {
    fn emit(&mut self, snapshot: &EstimateSnapshot) -> Result<(), Error> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            Error::sink_write("output file is already closed")
                .with_context("path", self.path.display())
        })?;
        writeln!(writer, "{snapshot}").map_err(|err| {
            write_error(err, snapshot).with_context("path", self.partial_path.display())
        })
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.commit().map_err(|err| {
            Error::sink_write("failed to commit output file")
                .with_context("path", self.path.display())
                .set_source(err)
        })
    }

    fn abort(&mut self) {
        self.discard();
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        self.discard();
    }
}

fn partial_path_of(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

fn write_error(err: io::Error, snapshot: &EstimateSnapshot) -> Error {
    Error::sink_write("failed to write snapshot")
        .with_context("processed", snapshot.processed)
        .set_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SnapshotKind;

    fn snapshot(kind: SnapshotKind, processed: u64) -> EstimateSnapshot {
        EstimateSnapshot {
            kind,
            processed,
            mean_estimate: 2.5,
            median_estimate: 3.0,
            exact_uniques: 2,
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path_of(Path::new("out/run_5.txt")),
            PathBuf::from("out/run_5.txt.partial")
        );
    }

    #[test]
    fn test_writer_sink_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit(&snapshot(SnapshotKind::Progress, 2)).unwrap();
        sink.emit(&snapshot(SnapshotKind::Final, 3)).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "Processed 2 numbers: avg=2.50, median=3.00, uniques=2\n\
             Final after 3 numbers: avg=2.50, median=3.00, total uniques=2\n"
        );
    }

    #[test]
    fn test_writer_sink_failure() {
        let mut sink = WriterSink::new(FailingWriter);
        let err = sink.emit(&snapshot(SnapshotKind::Progress, 7)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SinkWrite);
        assert!(err.to_string().contains("processed: 7"));
    }

    #[test]
    fn test_tee_sink() {
        let mut tee = TeeSink::new(MemorySink::new(), MemorySink::new());
        tee.emit(&snapshot(SnapshotKind::Final, 1)).unwrap();
        tee.finish().unwrap();
        let (a, b) = tee.into_inner();
        assert_eq!(a.snapshots(), b.snapshots());
        assert!(a.is_finished() && b.is_finished());
    }
}
