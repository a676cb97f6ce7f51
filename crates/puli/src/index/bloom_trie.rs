//! Subset-minimality index: a trie over sorted id sets with bloom summaries.
//!
//! A stored set S dominates a candidate D when S ⊆ D. Sets are inserted as
//! paths of their sorted ids, so a query walks the trie and the candidate in
//! lock step: an edge labelled `e` can only be followed if `e` occurs in the
//! rest of the candidate.
//!
//! Two summaries per node cut the walk short:
//! - `mask`, the AND of the 64-bit fingerprints of every set stored below the
//!   node. Each such set carries all bits of `mask`, so if `mask` has a bit the
//!   candidate's fingerprint lacks, no set below can be a subset.
//! - `min_rest`, the fewest ids any set below the node still needs. If the
//!   candidate has fewer ids left, the subtree is skipped.

use crate::stats::IndexStats;

const ROOT: usize = 0;

/// Bit of an id in a 64-bit set fingerprint
#[inline]
fn bit(id: u32) -> u64 {
    1u64 << (id.wrapping_mul(0x9E37_79B9) >> 26)
}

/// Fingerprint of a set: the OR of the bits of its ids
#[inline]
pub fn fingerprint(ids: &[u32]) -> u64 {
    ids.iter().fold(0, |acc, &id| acc | bit(id))
}

#[derive(Debug, Clone)]
struct TrieNode {
    /// `(element, node)` pairs sorted by element
    children: Vec<(u32, u32)>,
    /// A stored set ends at this node
    terminal: bool,
    /// AND of the fingerprints of the sets stored in this subtree
    mask: u64,
    /// Fewest ids a set stored in this subtree has below this node
    min_rest: u32,
}

impl TrieNode {
    fn new(mask: u64, min_rest: u32) -> Self {
        TrieNode {
            children: Vec::new(),
            terminal: false,
            mask,
            min_rest,
        }
    }
}

/// Index of sets supporting insertion and "is the candidate dominated" queries.
///
/// Sets are given as strictly increasing `u32` slices (see
/// [`IdMap::get_sorted_ids`](super::IdMap::get_sorted_ids)).
#[derive(Debug, Clone)]
pub struct BloomTrie {
    nodes: Vec<TrieNode>,
    /// Number of distinct stored sets
    len: usize,
    stats: IndexStats,
}

impl Default for BloomTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl BloomTrie {
    pub fn new() -> Self {
        BloomTrie {
            nodes: vec![TrieNode::new(!0, u32::MAX)],
            len: 0,
            stats: IndexStats::default(),
        }
    }

    /// Number of distinct sets stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = IndexStats::default();
    }

    /// Remove every stored set. Counters are kept.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT] = TrieNode::new(!0, u32::MAX);
        self.len = 0;
    }

    /// Store `set`. Inserting a set twice has no effect.
    pub fn insert(&mut self, set: &[u32]) {
        debug_assert!(set.windows(2).all(|w| w[0] < w[1]), "set must be sorted");
        self.stats.insertions += 1;
        let fp = fingerprint(set);
        let mut node = ROOT;
        for (depth, &element) in set.iter().enumerate() {
            let current = &mut self.nodes[node];
            current.mask &= fp;
            current.min_rest = current.min_rest.min((set.len() - depth) as u32);
            node = match current.children.binary_search_by_key(&element, |&(e, _)| e) {
                Ok(pos) => current.children[pos].1 as usize,
                Err(pos) => {
                    let child = self.nodes.len() as u32;
                    self.nodes[node].children.insert(pos, (element, child));
                    self.nodes.push(TrieNode::new(fp, u32::MAX));
                    child as usize
                }
            };
        }
        let last = &mut self.nodes[node];
        last.mask &= fp;
        last.min_rest = 0;
        if !last.terminal {
            last.terminal = true;
            self.len += 1;
        }
    }

    /// True iff no stored set is a subset of `candidate` (a stored set equal
    /// to `candidate` counts as a subset).
    pub fn is_minimal(&mut self, candidate: &[u32]) -> bool {
        debug_assert!(
            candidate.windows(2).all(|w| w[0] < w[1]),
            "candidate must be sorted"
        );
        self.stats.queries += 1;
        let dominated = self.find_subset(candidate);
        if dominated {
            self.stats.rejected += 1;
        }
        !dominated
    }

    /// Store `set` if it is minimal; returns whether it was.
    pub fn insert_if_minimal(&mut self, set: &[u32]) -> bool {
        if self.is_minimal(set) {
            self.insert(set);
            true
        } else {
            false
        }
    }

    fn find_subset(&mut self, candidate: &[u32]) -> bool {
        let cand_fp = fingerprint(candidate);
        // (node, position in candidate after the node's element)
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((node, start)) = stack.pop() {
            self.stats.nodes_visited += 1;
            let current = &self.nodes[node];
            if current.terminal {
                return true;
            }
            if current.mask & !cand_fp != 0 || current.min_rest as usize > candidate.len() - start {
                self.stats.filter_skips += 1;
                continue;
            }
            // Merge children with the rest of the candidate
            let mut pos = start;
            for &(element, child) in &current.children {
                while pos < candidate.len() && candidate[pos] < element {
                    pos += 1;
                }
                if pos == candidate.len() {
                    break;
                }
                if candidate[pos] == element {
                    stack.push((child as usize, pos + 1));
                }
            }
        }
        false
    }
}
