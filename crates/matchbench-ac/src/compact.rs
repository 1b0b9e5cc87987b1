//! Low-memory Aho-Corasick.
//!
//! Same two-phase construction as the dense engine, but compiled states
//! store their outgoing edges as a shared sorted edge array sliced per
//! state instead of a 256-entry table. Transitions binary-search the
//! state's slice. Each state additionally carries a `suffix_link`: the
//! nearest state along the failure chain (itself included) that has a
//! pattern id, so `read_byte` answers in one indirection instead of
//! walking outputs at query time.
//!
//! Memory: O(total edges) against the dense engine's
//! O(states * 256); on a real dictionary that is roughly two orders of
//! magnitude, which is the whole point of this variant.

use crate::AcBuilder;
use matchbench_core::{Matcher, PatternId};
use std::collections::VecDeque;

/// No-state sentinel inside the flattened arrays.
const NO_STATE: u32 = u32::MAX;

/// Sparse Aho-Corasick with per-state edge slices and suffix links.
pub struct CompactAcMatcher {
    builder: Option<AcBuilder>,
    /// `edge_start[s]..edge_start[s + 1]` indexes this state's slice of
    /// `edge_bytes` / `edge_targets`.
    edge_start: Vec<u32>,
    edge_bytes: Vec<u8>,
    edge_targets: Vec<u32>,
    failure: Vec<u32>,
    /// Nearest pattern-bearing state along the failure chain, or
    /// `NO_STATE`.
    suffix_link: Vec<u32>,
    ids: Vec<PatternId>,
    current_state: u32,
}

impl CompactAcMatcher {
    pub fn new() -> Self {
        CompactAcMatcher {
            builder: Some(AcBuilder::new()),
            edge_start: Vec::new(),
            edge_bytes: Vec::new(),
            edge_targets: Vec::new(),
            failure: Vec::new(),
            suffix_link: Vec::new(),
            ids: Vec::new(),
            current_state: 0,
        }
    }

    pub fn state_count(&self) -> usize {
        self.failure.len()
    }

    /// Child of `state` for `byte`, if any.
    #[inline]
    fn child(&self, state: u32, byte: u8) -> Option<u32> {
        let lo = self.edge_start[state as usize] as usize;
        let hi = self.edge_start[state as usize + 1] as usize;
        let slice = &self.edge_bytes[lo..hi];
        slice
            .binary_search(&byte)
            .ok()
            .map(|i| self.edge_targets[lo + i])
    }
}

impl Default for CompactAcMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher for CompactAcMatcher {
    fn add_pattern(&mut self, pattern: &[u8], id: PatternId) {
        self.builder
            .as_mut()
            .expect("add_pattern after compile")
            .add_pattern(pattern, id);
    }

    fn compile(&mut self) {
        let builder = self.builder.take().expect("compile called twice");
        let flat = builder.flatten();
        let n = flat.len();

        let mut edge_start = Vec::with_capacity(n + 1);
        let mut edge_bytes = Vec::new();
        let mut edge_targets = Vec::new();
        let mut ids = Vec::with_capacity(n);
        for (id, edges) in &flat {
            edge_start.push(edge_bytes.len() as u32);
            for &(byte, target) in edges {
                edge_bytes.push(byte);
                edge_targets.push(target);
            }
            ids.push(*id);
        }
        edge_start.push(edge_bytes.len() as u32);

        self.edge_start = edge_start;
        self.edge_bytes = edge_bytes;
        self.edge_targets = edge_targets;
        self.ids = ids;

        // Failure and suffix links, breadth-first. A state's suffix link is
        // itself when a pattern ends there, otherwise its failure state's
        // link; the failure state is shallower, so its link is final first.
        let mut failure = vec![0u32; n];
        let mut suffix_link = vec![NO_STATE; n];
        let mut queue = VecDeque::new();
        let root_lo = self.edge_start[0] as usize;
        let root_hi = self.edge_start[1] as usize;
        for i in root_lo..root_hi {
            let child = self.edge_targets[i];
            failure[child as usize] = 0;
            suffix_link[child as usize] = if self.ids[child as usize].is_none() {
                NO_STATE
            } else {
                child
            };
            queue.push_back(child);
        }
        while let Some(state) = queue.pop_front() {
            let lo = self.edge_start[state as usize] as usize;
            let hi = self.edge_start[state as usize + 1] as usize;
            for i in lo..hi {
                let byte = self.edge_bytes[i];
                let child = self.edge_targets[i];
                queue.push_back(child);
                let mut fs = failure[state as usize];
                let target = loop {
                    if let Some(next) = self.child(fs, byte) {
                        break next;
                    }
                    if fs == 0 {
                        break 0;
                    }
                    fs = failure[fs as usize];
                };
                failure[child as usize] = target;
                suffix_link[child as usize] = if self.ids[child as usize].is_none() {
                    suffix_link[target as usize]
                } else {
                    child
                };
            }
        }
        self.failure = failure;
        self.suffix_link = suffix_link;
        self.current_state = 0;
    }

    fn read_byte(&mut self, byte: u8) -> PatternId {
        debug_assert!(self.builder.is_none(), "read_byte before compile");
        let mut state = self.current_state;
        loop {
            if let Some(child) = self.child(state, byte) {
                self.current_state = child;
                break;
            }
            if state == 0 {
                self.current_state = 0;
                break;
            }
            state = self.failure[state as usize];
        }
        let link = self.suffix_link[self.current_state as usize];
        if link == NO_STATE {
            PatternId::NONE
        } else {
            self.ids[link as usize]
        }
    }

    fn reset(&mut self) {
        self.current_state = 0;
    }

    fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.edge_start.capacity() * std::mem::size_of::<u32>()
            + self.edge_bytes.capacity()
            + self.edge_targets.capacity() * std::mem::size_of::<u32>()
            + self.failure.capacity() * std::mem::size_of::<u32>()
            + self.suffix_link.capacity() * std::mem::size_of::<u32>()
            + self.ids.capacity() * std::mem::size_of::<PatternId>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{compiled, drive, naive_longest};
    use crate::AcMatcher;

    fn check(patterns: &[&[u8]], text: &[u8]) {
        let mut ac = compiled(CompactAcMatcher::new(), patterns);
        assert_eq!(drive(&mut ac, text), naive_longest(patterns, text));
    }

    #[test]
    fn classic_dictionary() {
        check(&[b"he", b"she", b"his", b"hers"], b"ushers");
        check(&[b"he", b"she", b"his", b"hers"], b"hishehershe");
    }

    #[test]
    fn suffix_link_surfaces_buried_patterns() {
        check(&[b"ab", b"xabc"], b"xabc");
        check(&[b"ab", b"xabc"], b"xabxabcab");
    }

    #[test]
    fn suffix_chain_dictionary() {
        check(&[b"fg", b"efg", b"afg", b"cdefg", b"abcdefg"], b"xabcdefg");
        check(&[b"fg", b"efg", b"afg", b"cdefg", b"abcdefg"], b"zzfg");
    }

    #[test]
    fn overlapping_and_periodic() {
        check(&[b"ab", b"abab"], b"ababab");
        check(&[b"aaaaa"], b"aaaaaaa");
    }

    #[test]
    fn zero_and_high_bytes() {
        let p1: &[u8] = &[0, 0xFF, 0];
        let p2: &[u8] = &[0xFF, 0];
        let text: &[u8] = &[0, 0, 0xFF, 0, 0xFF, 0xFF, 0];
        check(&[p1, p2], text);
    }

    #[test]
    fn agrees_with_dense_engine() {
        let patterns: &[&[u8]] = &[b"stream", b"eam", b"match", b"a", b"tch"];
        let text = b"a stream of matches to match and mismatch";
        let mut dense = compiled(AcMatcher::new(), patterns);
        let mut sparse = compiled(CompactAcMatcher::new(), patterns);
        assert_eq!(drive(&mut dense, text), drive(&mut sparse, text));
    }

    #[test]
    fn uses_far_less_memory_than_dense() {
        let patterns: Vec<Vec<u8>> = (0..100u32)
            .map(|i| format!("pattern-number-{i}").into_bytes())
            .collect();
        let refs: Vec<&[u8]> = patterns.iter().map(|p| p.as_slice()).collect();
        let dense = compiled(AcMatcher::new(), &refs);
        let sparse = compiled(CompactAcMatcher::new(), &refs);
        assert!(sparse.total_mem() * 10 < dense.total_mem());
    }

    #[test]
    fn reset_returns_to_root() {
        let mut ac = compiled(CompactAcMatcher::new(), &[b"abc"]);
        drive(&mut ac, b"ab");
        ac.reset();
        assert_eq!(drive(&mut ac, b"abc"), vec![None, None, Some(0)]);
    }

    #[test]
    #[should_panic(expected = "add_pattern after compile")]
    fn add_after_compile_panics() {
        let mut ac = compiled(CompactAcMatcher::new(), &[b"abc"]);
        ac.add_pattern(b"late", PatternId::from_index(5));
    }
}
