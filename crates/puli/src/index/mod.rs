//! Interning and subset-minimality indexing.
//!
//! - `IdMap`: dense ids for conclusions, axioms and inferences
//! - `sorted_ids`: set algebra over sorted id arrays, plus the `SortedIdSet` view
//! - `BloomTrie`: "is this set dominated by a stored one" queries

mod bloom_trie;
mod id_map;
pub mod sorted_ids;

#[cfg(test)]
mod proptest_tests;

pub use bloom_trie::{fingerprint, BloomTrie};
pub use id_map::{AxiomId, ConclusionId, IdMap, InferenceId};
pub use sorted_ids::SortedIdSet;
