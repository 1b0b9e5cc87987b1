//! The patterns tree: a reverse-suffix tree over the dictionary.
//!
//! A node's pattern is the longest proper suffix, within the dictionary, of
//! each of its children's patterns; the root carries the empty pattern.
//! Matchers hand out [`PatternId`] node handles as their answers, and the
//! harness uses the parent chain to decide whether one reported pattern is
//! a suffix of another.
//!
//! Construction runs in two phases, like the engines' own build/compile
//! split:
//!
//! 1. A *full* tree is grown by insertion. Edges own the byte-string
//!    difference between child and parent, so inserting a pattern either
//!    descends along an edge whose label is a suffix of what remains,
//!    splits the edges it is a suffix of, or hangs a fresh edge off the
//!    current node.
//! 2. `compile` walks the full tree depth-first, reconstructing each node's
//!    complete pattern right-to-left in a shared scratch buffer, and hands
//!    every `(pattern bytes, node handle)` pair to the caller. This is the
//!    single point where every engine learns the dictionary. The edge
//!    labels are dropped on the way; the compiled tree keeps only parent
//!    pointers, child lists, and per-node source metadata.

use matchbench_core::PatternId;

/// Where a pattern came from: dictionary file index and 1-based line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRef {
    pub file: u32,
    pub line: u32,
}

struct BuildEdge {
    /// Byte-string difference: child pattern = label ++ parent pattern.
    label: Vec<u8>,
    child: usize,
}

struct BuildNode {
    source: Option<PatternRef>,
    edges: Vec<BuildEdge>,
}

/// True iff `suffix` is a proper suffix of `of`.
fn is_proper_suffix(suffix: &[u8], of: &[u8]) -> bool {
    of.len() > suffix.len() && &of[of.len() - suffix.len()..] == suffix
}

/// Phase-one builder: the full tree with edge labels.
pub struct PatternsTreeBuilder {
    nodes: Vec<BuildNode>,
    max_pattern_len: usize,
    distinct: usize,
}

impl PatternsTreeBuilder {
    pub fn new() -> Self {
        PatternsTreeBuilder {
            nodes: vec![BuildNode {
                source: None,
                edges: Vec::new(),
            }],
            max_pattern_len: 0,
            distinct: 0,
        }
    }

    /// Number of distinct patterns inserted so far.
    pub fn distinct_patterns(&self) -> usize {
        self.distinct
    }

    /// Insert one decoded pattern. Duplicates are collapsed onto the first
    /// occurrence's metadata.
    pub fn insert(&mut self, pattern: &[u8], source: PatternRef) {
        assert!(!pattern.is_empty(), "empty pattern");
        self.max_pattern_len = self.max_pattern_len.max(pattern.len());
        self.insert_at(0, pattern, source);
    }

    /// Insert the remaining prefix-difference `rest` below `node`.
    ///
    /// `rest` is what is left of the pattern after stripping `node`'s own
    /// pattern off its end; it is never empty.
    fn insert_at(&mut self, node: usize, rest: &[u8], source: PatternRef) {
        // Descend if an edge's label matches or suffixes what remains.
        for i in 0..self.nodes[node].edges.len() {
            let label = &self.nodes[node].edges[i].label;
            if label.as_slice() == rest {
                // Same pattern seen before; first source wins.
                return;
            }
            if is_proper_suffix(label, rest) {
                let child = self.nodes[node].edges[i].child;
                let shorter = &rest[..rest.len() - label.len()];
                return self.insert_at(child, shorter, source);
            }
        }

        // Otherwise the pattern becomes a node here. Any sibling edge that
        // `rest` suffixes is re-hung below the new node with its label cut
        // down to the difference.
        let new_node = self.nodes.len();
        self.nodes.push(BuildNode {
            source: Some(source),
            edges: Vec::new(),
        });
        self.distinct += 1;

        let mut moved = Vec::new();
        let edges = &mut self.nodes[node].edges;
        let mut i = 0;
        while i < edges.len() {
            if is_proper_suffix(rest, &edges[i].label) {
                let mut edge = edges.swap_remove(i);
                edge.label.truncate(edge.label.len() - rest.len());
                moved.push(edge);
            } else {
                i += 1;
            }
        }
        edges.push(BuildEdge {
            label: rest.to_vec(),
            child: new_node,
        });
        self.nodes[new_node].edges = moved;
    }

    /// Phase two: walk the full tree, reporting every `(pattern, handle)`
    /// pair to `add_pattern`, and compact into the parent-pointer tree.
    ///
    /// The callback is invoked exactly once per distinct pattern; engines
    /// register their dictionaries through it.
    pub fn compile<F>(self, mut add_pattern: F) -> PatternsTree
    where
        F: FnMut(&[u8], PatternId),
    {
        let mut nodes: Vec<TreeNode> = self
            .nodes
            .iter()
            .map(|n| TreeNode {
                parent: PatternId::NONE,
                source: n.source,
                children: Vec::new(),
            })
            .collect();

        // Pattern bytes are rebuilt right-to-left along the path: a node's
        // pattern occupies buffer[pos..], and each child writes its label
        // immediately to the left. Labels must be written when a node is
        // visited, not when its parent is, or a sibling's subtree would
        // clobber them.
        let mut buffer = vec![0u8; self.max_pattern_len];
        let mut stack: Vec<(usize, usize, usize, Vec<u8>)> = Vec::new(); // (node, parent, parent_pos, label)
        let mut build_nodes = self.nodes;
        for edge in std::mem::take(&mut build_nodes[0].edges) {
            stack.push((edge.child, 0, self.max_pattern_len, edge.label));
        }
        while let Some((node, parent, parent_pos, label)) = stack.pop() {
            let pos = parent_pos - label.len();
            buffer[pos..parent_pos].copy_from_slice(&label);
            let id = PatternId::from_index(node);
            add_pattern(&buffer[pos..], id);
            nodes[node].parent = PatternId::from_index(parent);
            nodes[parent].children.push(id);
            for edge in std::mem::take(&mut build_nodes[node].edges) {
                stack.push((edge.child, node, pos, edge.label));
            }
        }

        PatternsTree { nodes }
    }
}

impl Default for PatternsTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct TreeNode {
    parent: PatternId,
    source: Option<PatternRef>,
    children: Vec<PatternId>,
}

/// The compiled patterns tree: parent pointers, child lists, and source
/// metadata. Immutable after build; handles stay valid for its lifetime.
pub struct PatternsTree {
    nodes: Vec<TreeNode>,
}

impl PatternsTree {
    /// Handle of the root (the empty pattern). Never returned by matchers.
    pub fn root(&self) -> PatternId {
        PatternId::from_index(0)
    }

    /// Total nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True iff `a`'s pattern is a proper suffix of `b`'s pattern, decided
    /// by walking parent pointers up from `b`. O(depth).
    pub fn is_suffix(&self, a: PatternId, b: PatternId) -> bool {
        if a.is_none() || b.is_none() {
            return false;
        }
        let mut current = self.nodes[b.index()].parent;
        while !current.is_none() {
            if current == a {
                return true;
            }
            current = self.nodes[current.index()].parent;
        }
        false
    }

    /// Longest proper dictionary-suffix of `id`'s pattern, or `NONE` for
    /// children of the root.
    pub fn parent(&self, id: PatternId) -> PatternId {
        let parent = self.nodes[id.index()].parent;
        if parent == self.root() {
            PatternId::NONE
        } else {
            parent
        }
    }

    /// Source `(file, line)` of the pattern, if the handle names a real
    /// pattern (the root has none).
    pub fn source(&self, id: PatternId) -> Option<PatternRef> {
        self.nodes[id.index()].source
    }

    pub fn children(&self, id: PatternId) -> &[PatternId] {
        &self.nodes[id.index()].children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn reference(file: u32, line: u32) -> PatternRef {
        PatternRef { file, line }
    }

    /// Build a tree and capture what the compile callback reports.
    fn build(patterns: &[&[u8]]) -> (PatternsTree, Vec<(Vec<u8>, PatternId)>) {
        let mut builder = PatternsTreeBuilder::new();
        for (i, pattern) in patterns.iter().enumerate() {
            builder.insert(pattern, reference(0, i as u32 + 1));
        }
        let mut reported = Vec::new();
        let tree = builder.compile(|bytes, id| reported.push((bytes.to_vec(), id)));
        (tree, reported)
    }

    fn id_of<'a>(reported: &'a [(Vec<u8>, PatternId)], pattern: &[u8]) -> PatternId {
        reported
            .iter()
            .find(|(bytes, _)| bytes == pattern)
            .map(|(_, id)| *id)
            .expect("pattern not reported")
    }

    #[test]
    fn round_trip_reports_each_distinct_pattern_once() {
        let patterns: &[&[u8]] = &[b"fg", b"efg", b"afg", b"cdefg", b"abcdefg", b"fg"];
        let (_, reported) = build(patterns);
        let set: BTreeSet<Vec<u8>> = reported.iter().map(|(b, _)| b.clone()).collect();
        assert_eq!(reported.len(), 5, "duplicate must not be re-reported");
        let expect: BTreeSet<Vec<u8>> = patterns[..5].iter().map(|p| p.to_vec()).collect();
        assert_eq!(set, expect);
    }

    #[test]
    fn suffix_chain_becomes_a_path() {
        let (tree, reported) = build(&[b"fg", b"efg", b"cdefg", b"abcdefg", b"afg"]);
        let fg = id_of(&reported, b"fg");
        let efg = id_of(&reported, b"efg");
        let cdefg = id_of(&reported, b"cdefg");
        let abcdefg = id_of(&reported, b"abcdefg");
        let afg = id_of(&reported, b"afg");

        assert!(tree.is_suffix(fg, efg));
        assert!(tree.is_suffix(fg, abcdefg));
        assert!(tree.is_suffix(efg, cdefg));
        assert!(tree.is_suffix(cdefg, abcdefg));
        assert!(tree.is_suffix(fg, afg));

        assert!(!tree.is_suffix(efg, afg));
        assert!(!tree.is_suffix(afg, abcdefg));
        assert!(!tree.is_suffix(abcdefg, fg));

        assert_eq!(tree.parent(abcdefg), cdefg);
        assert_eq!(tree.parent(fg), PatternId::NONE);
    }

    #[test]
    fn is_suffix_is_irreflexive() {
        let (tree, reported) = build(&[b"abc", b"bc"]);
        let abc = id_of(&reported, b"abc");
        assert!(!tree.is_suffix(abc, abc));
        assert!(!tree.is_suffix(PatternId::NONE, abc));
        assert!(!tree.is_suffix(abc, PatternId::NONE));
    }

    #[test]
    fn insertion_order_does_not_change_relations() {
        let forward: &[&[u8]] = &[b"fg", b"efg", b"cdefg", b"abcdefg"];
        let backward: &[&[u8]] = &[b"abcdefg", b"cdefg", b"efg", b"fg"];
        for order in [forward, backward] {
            let (tree, reported) = build(order);
            let fg = id_of(&reported, b"fg");
            let efg = id_of(&reported, b"efg");
            let abcdefg = id_of(&reported, b"abcdefg");
            assert!(tree.is_suffix(fg, efg), "order {:?}", order);
            assert!(tree.is_suffix(efg, abcdefg));
            assert!(!tree.is_suffix(abcdefg, fg));
        }
    }

    #[test]
    fn split_rehangs_all_matching_children() {
        // Inserting "c" after "abc" and "xbc" must not disturb them, then
        // "bc" splits both edges at once.
        let (tree, reported) = build(&[b"abc", b"xbc", b"bc"]);
        let abc = id_of(&reported, b"abc");
        let xbc = id_of(&reported, b"xbc");
        let bc = id_of(&reported, b"bc");
        assert!(tree.is_suffix(bc, abc));
        assert!(tree.is_suffix(bc, xbc));
        assert_eq!(tree.parent(abc), bc);
        assert_eq!(tree.parent(xbc), bc);
        assert_eq!(tree.parent(bc), PatternId::NONE);
    }

    #[test]
    fn unrelated_patterns_are_siblings_of_the_root() {
        let (tree, reported) = build(&[b"abc", b"def"]);
        let abc = id_of(&reported, b"abc");
        let def = id_of(&reported, b"def");
        assert!(!tree.is_suffix(abc, def));
        assert!(!tree.is_suffix(def, abc));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn zero_byte_patterns_round_trip() {
        let p1: &[u8] = &[0, 1, 0];
        let p2: &[u8] = &[1, 0];
        let (tree, reported) = build(&[p1, p2]);
        let long = id_of(&reported, p1);
        let short = id_of(&reported, p2);
        assert!(tree.is_suffix(short, long));
    }

    #[test]
    fn first_source_wins_for_duplicates() {
        let mut builder = PatternsTreeBuilder::new();
        builder.insert(b"abc", reference(0, 1));
        builder.insert(b"abc", reference(3, 9));
        let mut reported = Vec::new();
        let tree = builder.compile(|bytes, id| reported.push((bytes.to_vec(), id)));
        let id = id_of(&reported, b"abc");
        assert_eq!(tree.source(id), Some(reference(0, 1)));
    }

    #[test]
    fn source_metadata_survives_compaction() {
        let mut builder = PatternsTreeBuilder::new();
        builder.insert(b"needle", reference(2, 41));
        let mut reported = Vec::new();
        let tree = builder.compile(|bytes, id| reported.push((bytes.to_vec(), id)));
        let id = id_of(&reported, b"needle");
        assert_eq!(tree.source(id), Some(reference(2, 41)));
        assert_eq!(tree.source(tree.root()), None);
    }
}
