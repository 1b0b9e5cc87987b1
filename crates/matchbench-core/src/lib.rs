//! Shared vocabulary for the matchbench workspace.
//!
//! This crate defines the two things every engine and the harness must agree
//! on: the opaque [`PatternId`] handle that identifies a dictionary pattern,
//! and the [`Matcher`] contract that every streaming engine implements.
//!
//! It is deliberately dependency-free so that engine crates and the harness
//! can share it without pulling in each other.

use std::fmt;

/// Opaque handle identifying a dictionary pattern.
///
/// Handles are arena indices into the patterns tree, so they are cheap to
/// copy, compare, and hash, and they stay valid for as long as the tree that
/// produced them. The distinguished [`PatternId::NONE`] value means "no
/// pattern matched here".
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternId(u32);

impl PatternId {
    /// Sentinel for "no pattern".
    pub const NONE: PatternId = PatternId(u32::MAX);

    /// Construct a handle from an arena index.
    ///
    /// Only the patterns tree builder should mint new ids; everything else
    /// just passes them around.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize);
        PatternId(index as u32)
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Arena index of this handle. Must not be called on [`PatternId::NONE`].
    #[inline]
    pub fn index(self) -> usize {
        debug_assert!(!self.is_none());
        self.0 as usize
    }
}

impl fmt::Debug for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "PatternId(NONE)")
        } else {
            write!(f, "PatternId({})", self.0)
        }
    }
}

/// The contract every streaming multi-pattern engine satisfies.
///
/// Lifecycle: construct, feed every dictionary pattern through
/// [`Matcher::add_pattern`], then [`Matcher::compile`] exactly once. After
/// compilation the only permitted mutations are the per-byte rolling state
/// updated by [`Matcher::read_byte`] and a full rewind via
/// [`Matcher::reset`].
///
/// Calling `add_pattern` after `compile`, or `read_byte` before it, is a
/// programming bug and panics.
pub trait Matcher {
    /// Register one dictionary pattern under the given id.
    ///
    /// `pattern` may contain any byte value, including zero. Must be called
    /// before [`Matcher::compile`].
    fn add_pattern(&mut self, pattern: &[u8], id: PatternId);

    /// Freeze the engine. No patterns may be added afterwards.
    fn compile(&mut self);

    /// Consume one stream byte and report the longest pattern whose last
    /// byte ends at the current position, or [`PatternId::NONE`].
    fn read_byte(&mut self, byte: u8) -> PatternId;

    /// Rewind the streaming state to the beginning of a stream, keeping the
    /// compiled structures.
    fn reset(&mut self);

    /// Static memory footprint of the compiled engine, in bytes.
    fn total_mem(&self) -> usize;

    /// Fingerprint collisions detected so far. Engines with no
    /// probabilistic structure report zero; the harness surfaces nonzero
    /// counts as diagnostics.
    fn collisions(&self) -> u64 {
        0
    }
}

/// Per-byte accuracy classification of an engine's answer against the
/// reference oracle's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Engine returned exactly the oracle's pattern (possibly both "none").
    Success,
    /// Engine returned a proper suffix of the oracle's pattern: a real
    /// match, just not the longest one.
    Partial,
    /// Engine reported no match where the oracle found one.
    FalseNegative,
    /// Engine reported a pattern that does not end here.
    FalsePositive,
}
