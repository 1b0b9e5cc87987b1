//! matchbench - a benchmarking harness for streaming multi-pattern
//! dictionary matching.
//!
//! Given a dictionary of byte patterns and a set of byte streams, the
//! harness builds the patterns tree, registers every pattern with each
//! matching engine, then pumps the streams one byte at a time through the
//! engines while a deterministic Aho-Corasick oracle runs alongside. Every
//! per-byte answer is classified against the oracle's (exact, shorter
//! suffix, false negative, false positive) and the per-engine accuracy,
//! timing, and memory figures end up in a report.
//!
//! # Example
//!
//! ```no_run
//! use matchbench::{Algorithm, Bench, Dictionary};
//!
//! let dict = Dictionary::load("threats.dict".as_ref(), 0)?;
//! let mut bench = Bench::build(&[dict], &Algorithm::ALL, Some(42))?;
//! let reports = bench.run(&["traffic.bin".into()])?;
//! for report in &reports {
//!     println!("{}: {} exact", report.algorithm, report.rate.success);
//! }
//! # Ok::<(), matchbench::HarnessError>(())
//! ```

pub mod dictionary;
pub mod error;
pub mod harness;
pub mod registry;
pub mod report;

pub use dictionary::{decode_pattern, Dictionary};
pub use error::HarnessError;
pub use harness::{classify, Bench, InstanceReport, SuccessRate, STREAM_CHUNK_SIZE};
pub use registry::Algorithm;
pub use report::{render, RunSummary};

pub use matchbench_core::{Matcher, PatternId, Verdict};
pub use matchbench_tree::{PatternRef, PatternsTree, PatternsTreeBuilder};
