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

//! Runs MinHash sketches of several sizes over one shared random stream.
//!
//! Every sketch size writes its snapshots to
//! `<output-dir>/estimate_sharedstream_<H>_hashes.txt`. Sequential runs also
//! echo each line to stdout.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::bail;
use clap::Parser;
use minhash::experiment::RunOutcome;
use minhash::experiment::run_parallel;
use minhash::experiment::run_sequential;
use minhash::stream::FileSink;
use minhash::stream::StreamConfig;
use minhash::stream::TeeSink;
use minhash::stream::WriterSink;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Estimate stream cardinality with MinHash sketches of several sizes")]
struct Args {
    /// Number of integers in the generated stream.
    #[arg(long, default_value_t = 10_000_000)]
    total: usize,

    /// Emit a progress snapshot every this many integers.
    #[arg(long, default_value_t = 1000)]
    print_every: usize,

    /// Group size of the median-of-means estimator; 0 disables grouping.
    #[arg(long, default_value_t = 5)]
    group_size: usize,

    /// Comma-separated sketch sizes to run.
    #[arg(long, value_delimiter = ',', default_values_t = [1, 5, 50, 500, 5000])]
    hashes: Vec<usize>,

    /// Directory receiving one output file per sketch size.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Seed for the stream generator; random when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Run all sketch sizes concurrently, without echoing to stdout.
    #[arg(long)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let stream = generate_stream(args.total, args.seed);
    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("failed to create output directory {}", args.output_dir.display())
    })?;

    let configs = args
        .hashes
        .iter()
        .map(|&num_hashes| {
            StreamConfig::builder()
                .num_hashes(num_hashes)
                .print_every(args.print_every)
                .group_size(args.group_size)
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let outcomes = if args.parallel {
        run_parallel(&stream, &configs, |config| {
            FileSink::create(output_path(&args.output_dir, config))
        })
    } else {
        run_sequential(&stream, &configs, |config| {
            println!(
                "\nRunning with H={}, T={}, total={}...",
                config.num_hashes(),
                config.group_size(),
                stream.len()
            );
            let file = FileSink::create(output_path(&args.output_dir, config))?;
            Ok(TeeSink::new(WriterSink::new(io::stdout()), file))
        })
    };

    report(&outcomes, args.parallel)
}

fn generate_stream(total: usize, seed: Option<u64>) -> Vec<i64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    // half as many possible values as draws, so duplicates are common
    let upper = (total as i64 / 2).max(1);
    tracing::info!(total, upper, ?seed, "generating stream");
    (0..total).map(|_| rng.random_range(0..upper)).collect()
}

fn output_path(dir: &Path, config: &StreamConfig) -> PathBuf {
    dir.join(format!(
        "estimate_sharedstream_{}_hashes.txt",
        config.num_hashes()
    ))
}

fn report(outcomes: &[RunOutcome], print_finals: bool) -> anyhow::Result<()> {
    let mut failed = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(last) if print_finals => println!("H={}: {last}", outcome.config.num_hashes()),
            Ok(_) => {}
            Err(err) => {
                failed += 1;
                eprintln!("H={}: {err}", outcome.config.num_hashes());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} runs failed", outcomes.len());
    }
    Ok(())
}
