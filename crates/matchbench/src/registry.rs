//! The algorithm registry.
//!
//! A closed table of the matching engines the harness knows how to drive.
//! Populated once, at compile time; there is no runtime registration.

use matchbench_ac::{AcMatcher, CompactAcMatcher};
use matchbench_bg::MultiBg;
use matchbench_core::Matcher;

/// Every matching engine the harness can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Multi-pattern real-time Breslauer-Galil.
    Bg,
    /// Dense Aho-Corasick (256-way state tables).
    Ac,
    /// Low-memory Aho-Corasick (sorted edge lists + suffix links).
    LowMemAc,
}

impl Algorithm {
    /// All registered engines, in report order.
    pub const ALL: [Algorithm; 3] = [Algorithm::Bg, Algorithm::Ac, Algorithm::LowMemAc];

    /// The engine trusted as the accuracy oracle.
    pub const REFERENCE: Algorithm = Algorithm::Ac;

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bg => "bg",
            Algorithm::Ac => "aho-corasick",
            Algorithm::LowMemAc => "low-memory-aho-corasick",
        }
    }

    /// Instantiate an empty engine. `seed` fixes the fingerprint bases of
    /// probabilistic engines so runs are reproducible; deterministic
    /// engines ignore it.
    pub fn create(self, seed: Option<u64>) -> Box<dyn Matcher> {
        match self {
            Algorithm::Bg => Box::new(match seed {
                Some(seed) => MultiBg::with_seed(seed),
                None => MultiBg::new(),
            }),
            Algorithm::Ac => Box::new(AcMatcher::new()),
            Algorithm::LowMemAc => Box::new(CompactAcMatcher::new()),
        }
    }
}
