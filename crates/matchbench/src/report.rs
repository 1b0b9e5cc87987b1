//! Rendering the run's measurements into the output report.

use crate::harness::InstanceReport;
use std::fmt::Write;

/// Context for the report header.
pub struct RunSummary {
    pub distinct_patterns: usize,
    pub dropped_lines: usize,
    pub dictionary_files: usize,
    pub stream_files: usize,
}

/// Render the full report as text.
pub fn render(summary: &RunSummary, reports: &[InstanceReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "matchbench report");
    let _ = writeln!(out, "=================");
    let _ = writeln!(
        out,
        "dictionary: {} distinct patterns from {} file(s), {} line(s) dropped",
        summary.distinct_patterns, summary.dictionary_files, summary.dropped_lines
    );
    let _ = writeln!(out, "streams: {} file(s)", summary.stream_files);

    for report in reports {
        let _ = writeln!(out);
        let _ = writeln!(out, "algorithm: {}", report.algorithm);
        let _ = writeln!(out, "  memory: {} bytes", report.total_mem);
        let _ = writeln!(
            out,
            "  success: {}  partial: {}  false-neg: {}  false-pos: {}",
            report.rate.success, report.rate.partial, report.rate.false_neg, report.rate.false_pos
        );
        let _ = writeln!(out, "  accuracy: {:.4}%", report.rate.accuracy() * 100.0);
        let _ = writeln!(
            out,
            "  processed: {} bytes in {:.3}s ({:.2} MB/s)",
            report.bytes,
            report.elapsed.as_secs_f64(),
            report.throughput_mb_per_sec()
        );
        let _ = writeln!(out, "  fingerprint collisions: {}", report.collisions);
    }
    out
}
