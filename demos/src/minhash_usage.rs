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

//! Example demonstrating MinHash sketch usage

use minhash::estimator::Aggregation;
use minhash::estimator::per_slot_estimate;
use minhash::sketch::MinHashSketch;
use minhash::stream::StreamConfig;
use minhash::stream::StreamProcessor;
use minhash::stream::WriterSink;

fn main() {
    println!("=== MinHash Sketch Example ===\n");

    // Example 1: Basic usage
    println!("1. Basic MinHash Sketch Usage:");
    let mut sketch = MinHashSketch::new(100);
    for i in 0..5000 {
        sketch.update(i % 1000);
    }
    let robust = Aggregation::MedianOfMeans { group_size: 10 };
    println!("   Actual distinct: 1000");
    println!("   Mean estimate: {:.2}", sketch.estimate(Aggregation::Mean));
    println!("   Median-of-means estimate: {:.2}", sketch.estimate(robust));
    println!(
        "   First slot: min={:.6}, estimate={}",
        sketch.slots()[0],
        per_slot_estimate(sketch.slots()[0])
    );
    println!();

    // Example 2: Duplicates leave the sketch unchanged
    println!("2. Re-adding the same values:");
    let before = sketch.clone();
    for i in 0..1000 {
        sketch.update(i);
    }
    println!("   Sketch unchanged: {}", before == sketch);
    println!();

    // Example 3: Streaming with periodic snapshots
    println!("3. Stream processing:");
    let config = StreamConfig::builder()
        .num_hashes(50)
        .print_every(2500)
        .group_size(5)
        .build()
        .unwrap();
    let stream = (0..10_000i64).map(|i| (i * 7919) % 3000);
    let mut processor = StreamProcessor::new(config);
    processor
        .process(stream, WriterSink::new(std::io::stdout()))
        .unwrap();
}
