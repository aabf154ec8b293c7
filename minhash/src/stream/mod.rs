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

//! Stream processing: drives a sketch over an integer stream and reports
//! periodic estimates.
//!
//! # Usage
//!
//! ```rust
//! use minhash::stream::StreamConfig;
//! use minhash::stream::StreamProcessor;
//! use minhash::stream::WriterSink;
//!
//! let config = StreamConfig::builder()
//!     .num_hashes(50)
//!     .print_every(500)
//!     .group_size(5)
//!     .build()
//!     .unwrap();
//!
//! let mut out = Vec::new();
//! let stream = (0..1000i64).map(|i| i % 300);
//! let last = StreamProcessor::new(config)
//!     .process(stream, WriterSink::new(&mut out))
//!     .unwrap();
//!
//! assert_eq!(last.exact_uniques, 300);
//! let text = String::from_utf8(out).unwrap();
//! assert_eq!(text.lines().count(), 3);
//! assert!(text.starts_with("Processed 500 numbers: "));
//! assert!(text.lines().last().unwrap().starts_with("Final after 1000 numbers: "));
//! ```

mod config;
mod counter;
mod processor;
mod sink;
mod snapshot;

pub use self::config::StreamConfig;
pub use self::config::StreamConfigBuilder;
pub use self::counter::DistinctCounter;
pub use self::counter::ExactCounter;
pub use self::counter::NoCounter;
pub use self::processor::StreamProcessor;
pub use self::processor::process_to_file;
pub use self::sink::FileSink;
pub use self::sink::MemorySink;
pub use self::sink::SnapshotSink;
pub use self::sink::TeeSink;
pub use self::sink::WriterSink;
pub use self::snapshot::EstimateSnapshot;
pub use self::snapshot::SnapshotKind;
