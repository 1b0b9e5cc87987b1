//! Building the engines and driving the streams.
//!
//! [`Bench::build`] grows the patterns tree from the loaded dictionaries
//! and, during tree compaction, feeds every distinct pattern to every
//! engine; the engines never see the dictionary any other way, so their
//! ids are tree handles by construction. [`Bench::run`] then pumps each
//! stream through every engine under test, with the reference oracle
//! running over the same bytes, and classifies every per-byte answer.
//!
//! Only the engine-under-test loop is timed; the oracle pass and the
//! classification run outside the measured window, against buffered
//! per-byte results, so the reported time is the engine's own.

use crate::dictionary::Dictionary;
use crate::error::{HarnessError, Result};
use crate::registry::Algorithm;
use matchbench_core::{Matcher, PatternId, Verdict};
use matchbench_tree::{PatternsTree, PatternsTreeBuilder};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Streams are read and scored in chunks of this many bytes.
pub const STREAM_CHUNK_SIZE: usize = 100 * 1024;

/// Per-byte verdict counters for one engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuccessRate {
    /// Engine returned exactly the oracle's answer.
    pub success: u64,
    /// Engine returned a proper suffix of the oracle's pattern.
    pub partial: u64,
    /// Engine missed a match the oracle found.
    pub false_neg: u64,
    /// Engine reported a pattern that does not end there.
    pub false_pos: u64,
}

impl SuccessRate {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Success => self.success += 1,
            Verdict::Partial => self.partial += 1,
            Verdict::FalseNegative => self.false_neg += 1,
            Verdict::FalsePositive => self.false_pos += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.partial + self.false_neg + self.false_pos
    }

    /// Fraction of positions answered exactly right.
    pub fn accuracy(&self) -> f64 {
        if self.total() == 0 {
            1.0
        } else {
            self.success as f64 / self.total() as f64
        }
    }
}

/// Classify an engine's per-byte answer against the oracle's.
pub fn classify(tree: &PatternsTree, algo: PatternId, real: PatternId) -> Verdict {
    if algo == real {
        Verdict::Success
    } else if tree.is_suffix(algo, real) {
        Verdict::Partial
    } else if algo.is_none() {
        Verdict::FalseNegative
    } else {
        Verdict::FalsePositive
    }
}

/// Measurements for one engine across all streams.
#[derive(Debug)]
pub struct InstanceReport {
    pub algorithm: &'static str,
    pub rate: SuccessRate,
    pub total_mem: usize,
    pub bytes: u64,
    /// Time spent inside the engine's `read_byte` loop only.
    pub elapsed: Duration,
    pub collisions: u64,
}

impl InstanceReport {
    pub fn throughput_mb_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes as f64 / 1_000_000.0 / secs
        } else {
            0.0
        }
    }
}

struct Instance {
    algorithm: Algorithm,
    matcher: Box<dyn Matcher>,
}

/// A compiled benchmark: the patterns tree, the oracle, and the engines
/// under test.
pub struct Bench {
    tree: PatternsTree,
    reference: Box<dyn Matcher>,
    instances: Vec<Instance>,
    distinct_patterns: usize,
}

impl std::fmt::Debug for Bench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bench")
            .field("distinct_patterns", &self.distinct_patterns)
            .finish_non_exhaustive()
    }
}

impl Bench {
    /// Build the tree from the loaded dictionaries and compile one engine
    /// per requested algorithm, plus the reference oracle.
    pub fn build(
        dictionaries: &[Dictionary],
        algorithms: &[Algorithm],
        seed: Option<u64>,
    ) -> Result<Bench> {
        let mut builder = PatternsTreeBuilder::new();
        for dictionary in dictionaries {
            for pattern in &dictionary.patterns {
                builder.insert(&pattern.bytes, pattern.source);
            }
        }
        if builder.distinct_patterns() == 0 {
            return Err(HarnessError::EmptyDictionary);
        }
        let distinct_patterns = builder.distinct_patterns();

        // The oracle rides along at index 0 so a single compaction walk
        // registers the dictionary with everything.
        let mut engines: Vec<Box<dyn Matcher>> = Vec::with_capacity(algorithms.len() + 1);
        engines.push(Algorithm::REFERENCE.create(seed));
        for algorithm in algorithms {
            engines.push(algorithm.create(seed));
        }
        let tree = builder.compile(|bytes, id| {
            for engine in engines.iter_mut() {
                engine.add_pattern(bytes, id);
            }
        });
        for engine in engines.iter_mut() {
            engine.compile();
        }

        let reference = engines.remove(0);
        let instances = algorithms
            .iter()
            .zip(engines)
            .map(|(&algorithm, matcher)| Instance { algorithm, matcher })
            .collect();
        Ok(Bench {
            tree,
            reference,
            instances,
            distinct_patterns,
        })
    }

    pub fn tree(&self) -> &PatternsTree {
        &self.tree
    }

    pub fn distinct_patterns(&self) -> usize {
        self.distinct_patterns
    }

    /// Run every engine under test over every stream, in order, and
    /// collect one report per engine. Engines and the oracle are reset
    /// before the first byte of each stream.
    pub fn run(&mut self, streams: &[PathBuf]) -> Result<Vec<InstanceReport>> {
        let mut reports = Vec::with_capacity(self.instances.len());
        for index in 0..self.instances.len() {
            reports.push(self.run_instance(index, streams)?);
        }
        Ok(reports)
    }

    fn run_instance(&mut self, index: usize, streams: &[PathBuf]) -> Result<InstanceReport> {
        let instance = &mut self.instances[index];
        let reference = &mut self.reference;
        let tree = &self.tree;

        let mut rate = SuccessRate::default();
        let mut elapsed = Duration::ZERO;
        let mut bytes = 0u64;
        let mut chunk = vec![0u8; STREAM_CHUNK_SIZE];
        let mut algo_results = vec![PatternId::NONE; STREAM_CHUNK_SIZE];
        let mut real_results = vec![PatternId::NONE; STREAM_CHUNK_SIZE];

        for path in streams {
            instance.matcher.reset();
            reference.reset();
            let mut file = File::open(path).map_err(|source| HarnessError::Io {
                path: path.clone(),
                source,
            })?;
            loop {
                let len = file.read(&mut chunk).map_err(|source| HarnessError::Io {
                    path: path.clone(),
                    source,
                })?;
                if len == 0 {
                    break;
                }
                bytes += len as u64;

                let started = Instant::now();
                for (slot, &byte) in algo_results.iter_mut().zip(&chunk[..len]) {
                    *slot = instance.matcher.read_byte(byte);
                }
                elapsed += started.elapsed();

                for (slot, &byte) in real_results.iter_mut().zip(&chunk[..len]) {
                    *slot = reference.read_byte(byte);
                }
                for i in 0..len {
                    rate.record(classify(tree, algo_results[i], real_results[i]));
                }
            }
        }

        Ok(InstanceReport {
            algorithm: instance.algorithm.name(),
            rate,
            total_mem: instance.matcher.total_mem(),
            bytes,
            elapsed,
            collisions: instance.matcher.collisions(),
        })
    }
}
