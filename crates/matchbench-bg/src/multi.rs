//! Multi-pattern wrapper over per-pattern Breslauer-Galil engines.
//!
//! Patterns are independent in this scheme, so the wrapper simply owns one
//! [`BgMatcher`] per dictionary pattern, fans every stream byte out to all
//! of them, and reports the id of the longest pattern that matched on that
//! byte. Ties are impossible: two distinct patterns of equal length cannot
//! both end at the same position.

use crate::{BgMatcher, DEFAULT_PRIME};
use matchbench_core::{Matcher, PatternId};
use rand::rngs::StdRng;
use rand::SeedableRng;

struct Engine {
    bg: BgMatcher,
    id: PatternId,
}

/// Multi-pattern Breslauer-Galil matcher implementing the harness
/// [`Matcher`] contract.
pub struct MultiBg {
    prime: u64,
    rng: StdRng,
    engines: Vec<Engine>,
    compiled: bool,
}

impl MultiBg {
    /// Engine over the default field, with fingerprint bases drawn from an
    /// entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_rng(DEFAULT_PRIME, StdRng::from_entropy())
    }

    /// Deterministic engine for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(DEFAULT_PRIME, StdRng::seed_from_u64(seed))
    }

    /// Full control over field size and base generation.
    pub fn with_rng(prime: u64, rng: StdRng) -> Self {
        MultiBg {
            prime,
            rng,
            engines: Vec::new(),
            compiled: false,
        }
    }

    /// Number of registered patterns.
    pub fn pattern_count(&self) -> usize {
        self.engines.len()
    }
}

impl Default for MultiBg {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for MultiBg {
    fn add_pattern(&mut self, pattern: &[u8], id: PatternId) {
        assert!(!self.compiled, "add_pattern after compile");
        // Each pattern compiles independently, so the engine is built right
        // here rather than deferred to compile().
        let bg = BgMatcher::new(pattern, self.prime, &mut self.rng);
        self.engines.push(Engine { bg, id });
    }

    fn compile(&mut self) {
        assert!(!self.compiled, "compile called twice");
        self.engines.shrink_to_fit();
        self.compiled = true;
    }

    fn read_byte(&mut self, byte: u8) -> PatternId {
        debug_assert!(self.compiled, "read_byte before compile");
        let mut longest = 0;
        let mut longest_id = PatternId::NONE;
        for engine in &mut self.engines {
            if engine.bg.read_byte(byte) && engine.bg.pattern_len() > longest {
                longest = engine.bg.pattern_len();
                longest_id = engine.id;
            }
        }
        longest_id
    }

    fn reset(&mut self) {
        for engine in &mut self.engines {
            engine.bg.reset();
        }
    }

    fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>()
            + self
                .engines
                .iter()
                .map(|e| e.bg.total_mem() + std::mem::size_of::<PatternId>())
                .sum::<usize>()
    }

    fn collisions(&self) -> u64 {
        self.engines.iter().map(|e| e.bg.collisions()).sum()
    }
}
