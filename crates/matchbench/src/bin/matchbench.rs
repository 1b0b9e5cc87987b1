//! The matchbench command line.
//!
//! ```text
//! matchbench -d patterns.dict [-d more.dict] -s stream.bin [-s more.bin] -o report.txt [-v]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use matchbench::{render, Algorithm, Bench, Dictionary, RunSummary};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "matchbench",
    about = "Benchmark streaming multi-pattern matchers against an Aho-Corasick oracle",
    version
)]
struct Cli {
    /// Dictionary file of patterns, one per line (repeatable).
    #[arg(short = 'd', long = "dictionary", value_name = "PATH", required = true)]
    dictionaries: Vec<PathBuf>,

    /// Stream file to scan (repeatable).
    #[arg(short = 's', long = "stream", value_name = "PATH", required = true)]
    streams: Vec<PathBuf>,

    /// Where to write the report.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: PathBuf,

    /// Print progress and statistics to stderr.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut dictionaries = Vec::with_capacity(cli.dictionaries.len());
    let mut dropped_lines = 0;
    for (index, path) in cli.dictionaries.iter().enumerate() {
        let dictionary = Dictionary::load(path, index as u32)
            .with_context(|| format!("loading dictionary {}", path.display()))?;
        if cli.verbose {
            eprintln!(
                "[INFO] Loaded {} pattern(s) from {} ({} line(s) dropped)",
                dictionary.patterns.len(),
                path.display(),
                dictionary.dropped
            );
        }
        if dictionary.dropped > 0 {
            eprintln!(
                "[WARN] {}: {} malformed or empty line(s) dropped",
                path.display(),
                dictionary.dropped
            );
        }
        dropped_lines += dictionary.dropped;
        dictionaries.push(dictionary);
    }

    let build_start = Instant::now();
    let mut bench =
        Bench::build(&dictionaries, &Algorithm::ALL, None).context("compiling engines")?;
    if cli.verbose {
        eprintln!(
            "[INFO] Compiled {} engine(s) over {} distinct pattern(s) in {:.2?}",
            Algorithm::ALL.len(),
            bench.distinct_patterns(),
            build_start.elapsed()
        );
    }

    let reports = bench.run(&cli.streams).context("running streams")?;
    for report in &reports {
        if report.collisions > 0 {
            eprintln!(
                "[WARN] {}: {} fingerprint collision(s) detected",
                report.algorithm, report.collisions
            );
        }
        if cli.verbose {
            eprintln!(
                "[INFO] {}: {:.4}% exact over {} byte(s), {:.2} MB/s",
                report.algorithm,
                report.rate.accuracy() * 100.0,
                report.bytes,
                report.throughput_mb_per_sec()
            );
        }
    }

    let summary = RunSummary {
        distinct_patterns: bench.distinct_patterns(),
        dropped_lines,
        dictionary_files: cli.dictionaries.len(),
        stream_files: cli.streams.len(),
    };
    std::fs::write(&cli.output, render(&summary, &reports))
        .with_context(|| format!("writing report to {}", cli.output.display()))?;
    if cli.verbose {
        eprintln!("[INFO] Report written to {}", cli.output.display());
    }
    Ok(())
}
