//! Aho-Corasick engines: the harness reference oracle.
//!
//! Construction runs in two phases. Patterns first go into a trie whose
//! nodes keep a per-state transition map; `compile` then flattens the trie
//! into a contiguous state array in depth-first order (children of a state
//! sit together, which is kind to the cache) and wires failure links by
//! breadth-first traversal: the failure of the state reached by `c` from
//! `x` is found by walking `x`'s failure chain to the first state with a
//! `c`-child.
//!
//! Every state also carries an *output* id: its own pattern id if one ends
//! there, otherwise the output of its failure state. The state reached
//! after any stream byte represents the longest stream suffix that is a
//! path in the trie, so its output is exactly the longest dictionary
//! pattern ending at that byte; that is what makes this engine usable as
//! the known-correct oracle.
//!
//! Two variants share the builder: [`AcMatcher`] stores a dense 256-way
//! child table per state and answers transitions in O(1);
//! [`CompactAcMatcher`] (in [`compact`]) stores sorted edge lists and a
//! suffix link, trading transition time for an order of magnitude less
//! memory on large dictionaries.

mod compact;

pub use compact::CompactAcMatcher;

use matchbench_core::{Matcher, PatternId};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Trie state used during construction.
struct BuilderState {
    transitions: FxHashMap<u8, u32>,
    id: PatternId,
}

impl BuilderState {
    fn new() -> Self {
        BuilderState {
            transitions: FxHashMap::default(),
            id: PatternId::NONE,
        }
    }
}

/// The shared construction trie.
pub(crate) struct AcBuilder {
    states: Vec<BuilderState>,
}

impl AcBuilder {
    pub(crate) fn new() -> Self {
        AcBuilder {
            states: vec![BuilderState::new()],
        }
    }

    pub(crate) fn add_pattern(&mut self, pattern: &[u8], id: PatternId) {
        assert!(!pattern.is_empty(), "empty pattern");
        let mut current = 0u32;
        for &byte in pattern {
            current = match self.states[current as usize].transitions.get(&byte) {
                Some(&next) => next,
                None => {
                    let next = self.states.len() as u32;
                    self.states.push(BuilderState::new());
                    self.states[current as usize].transitions.insert(byte, next);
                    next
                }
            };
        }
        self.states[current as usize].id = id;
    }

    /// Flatten the trie into depth-first preorder.
    ///
    /// Returns, per flattened state: its pattern id and its sorted outgoing
    /// edges (already renumbered).
    pub(crate) fn flatten(&self) -> Vec<(PatternId, Vec<(u8, u32)>)> {
        let n = self.states.len();
        let mut order = vec![0u32; n]; // builder index -> flattened index
        let mut visit = Vec::with_capacity(n); // builder indices, preorder
        let mut stack: Vec<u32> = vec![0];
        while let Some(builder_index) = stack.pop() {
            order[builder_index as usize] = visit.len() as u32;
            visit.push(builder_index);
            let mut bytes: Vec<u8> = self.states[builder_index as usize]
                .transitions
                .keys()
                .copied()
                .collect();
            bytes.sort_unstable();
            // Push in reverse so the smallest byte is flattened first.
            for &byte in bytes.iter().rev() {
                stack.push(self.states[builder_index as usize].transitions[&byte]);
            }
        }
        visit
            .iter()
            .map(|&builder_index| {
                let state = &self.states[builder_index as usize];
                let mut edges: Vec<(u8, u32)> = state
                    .transitions
                    .iter()
                    .map(|(&byte, &target)| (byte, order[target as usize]))
                    .collect();
                edges.sort_by_key(|(byte, _)| *byte);
                (state.id, edges)
            })
            .collect()
    }
}

/// Dense Aho-Corasick: one 256-entry child table per state.
///
/// Transition target 0 means "no child"; the root can never be a child,
/// so the encoding is unambiguous.
pub struct AcMatcher {
    builder: Option<AcBuilder>,
    /// Flat `state_count * 256` child table.
    children: Vec<u32>,
    failure: Vec<u32>,
    output: Vec<PatternId>,
    current_state: u32,
}

impl AcMatcher {
    pub fn new() -> Self {
        AcMatcher {
            builder: Some(AcBuilder::new()),
            children: Vec::new(),
            failure: Vec::new(),
            output: Vec::new(),
            current_state: 0,
        }
    }

    pub fn state_count(&self) -> usize {
        self.failure.len()
    }
}

impl Default for AcMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire failure links breadth-first over a dense child table, and fold
/// each state's output through its failure state.
fn dense_failure_links(children: &[u32], failure: &mut [u32], output: &mut [PatternId]) {
    let mut queue = VecDeque::new();
    for byte in 0..256 {
        let child = children[byte];
        if child != 0 {
            failure[child as usize] = 0;
            queue.push_back(child);
        }
    }
    while let Some(state) = queue.pop_front() {
        // A failure state sits at strictly smaller depth, so its output is
        // final by the time its dependents leave the queue.
        if output[state as usize].is_none() {
            output[state as usize] = output[failure[state as usize] as usize];
        }
        let base = state as usize * 256;
        for byte in 0..256 {
            let child = children[base + byte];
            if child == 0 {
                continue;
            }
            queue.push_back(child);
            let mut fs = failure[state as usize];
            loop {
                let candidate = children[fs as usize * 256 + byte];
                if candidate != 0 && candidate != child {
                    failure[child as usize] = candidate;
                    break;
                }
                if fs == 0 {
                    failure[child as usize] = 0;
                    break;
                }
                fs = failure[fs as usize];
            }
        }
    }
}

impl Matcher for AcMatcher {
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
        let mut children = vec![0u32; n * 256];
        let mut output = Vec::with_capacity(n);
        for (state, (id, edges)) in flat.iter().enumerate() {
            for &(byte, target) in edges {
                children[state * 256 + byte as usize] = target;
            }
            output.push(*id);
        }
        let mut failure = vec![0u32; n];
        dense_failure_links(&children, &mut failure, &mut output);
        self.children = children;
        self.failure = failure;
        self.output = output;
        self.current_state = 0;
    }

    fn read_byte(&mut self, byte: u8) -> PatternId {
        debug_assert!(self.builder.is_none(), "read_byte before compile");
        let mut state = self.current_state;
        loop {
            let child = self.children[state as usize * 256 + byte as usize];
            if child != 0 {
                self.current_state = child;
                break;
            }
            if state == 0 {
                self.current_state = 0;
                break;
            }
            state = self.failure[state as usize];
        }
        self.output[self.current_state as usize]
    }

    fn reset(&mut self) {
        self.current_state = 0;
    }

    fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.children.capacity() * std::mem::size_of::<u32>()
            + self.failure.capacity() * std::mem::size_of::<u32>()
            + self.output.capacity() * std::mem::size_of::<PatternId>()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use matchbench_core::{Matcher, PatternId};

    /// Longest pattern ending at each text position, by brute force.
    pub(crate) fn naive_longest(patterns: &[&[u8]], text: &[u8]) -> Vec<Option<usize>> {
        (0..text.len())
            .map(|end| {
                patterns
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| {
                        p.len() <= end + 1 && &text[end + 1 - p.len()..=end] == **p
                    })
                    .max_by_key(|(_, p)| p.len())
                    .map(|(i, _)| i)
            })
            .collect()
    }

    pub(crate) fn drive(matcher: &mut dyn Matcher, text: &[u8]) -> Vec<Option<usize>> {
        text.iter()
            .map(|&b| {
                let id = matcher.read_byte(b);
                if id.is_none() {
                    None
                } else {
                    Some(id.index())
                }
            })
            .collect()
    }

    pub(crate) fn compiled<M: Matcher>(mut matcher: M, patterns: &[&[u8]]) -> M {
        for (i, pattern) in patterns.iter().enumerate() {
            matcher.add_pattern(pattern, PatternId::from_index(i));
        }
        matcher.compile();
        matcher
    }
}
