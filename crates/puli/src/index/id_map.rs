//! Dense integer identifiers for conclusions, axioms and inferences
//!
//! Every value handed to an engine is interned once into an `IdMap`, after
//! which all set operations run over sorted `u32` arrays:
//! - O(1) comparison and hashing (u32 vs. caller-defined `Hash`/`Eq`)
//! - compact sorted arrays for subset tests by merging
//! - `Copy` ids, no clones of caller values in the hot loops
//!
//! Each engine owns its maps; ids are never shared across engine instances.

use std::collections::HashMap;
use std::hash::Hash;

/// Id of an interned conclusion.
pub type ConclusionId = u32;

/// Id of an interned axiom.
pub type AxiomId = u32;

/// Id of an interned inference.
pub type InferenceId = u32;

/// Arena assigning dense ids to values in order of first sight.
#[derive(Debug, Clone)]
pub struct IdMap<E> {
    /// Interned values, indexed by id
    elements: Vec<E>,
    /// Lookup table from value to id
    lookup: HashMap<E, u32>,
}

impl<E> Default for IdMap<E> {
    fn default() -> Self {
        IdMap {
            elements: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

impl<E: Clone + Eq + Hash> IdMap<E> {
    /// Create a new empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a value, returning its id (get-or-create)
    pub fn get_id(&mut self, element: &E) -> u32 {
        if let Some(&id) = self.lookup.get(element) {
            return id;
        }
        let id = self.elements.len() as u32;
        self.elements.push(element.clone());
        self.lookup.insert(element.clone(), id);
        id
    }

    /// Id of an already-interned value (None if never seen)
    pub fn lookup(&self, element: &E) -> Option<u32> {
        self.lookup.get(element).copied()
    }

    /// Intern every value of `elements` and return the ids sorted and deduplicated.
    pub fn get_sorted_ids<'e, I>(&mut self, elements: I) -> Box<[u32]>
    where
        I: IntoIterator<Item = &'e E>,
        E: 'e,
    {
        let mut ids: Vec<u32> = elements.into_iter().map(|e| self.get_id(e)).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_boxed_slice()
    }
}

impl<E> IdMap<E> {
    /// Resolve an id to its value.
    ///
    /// Panics if `id` was not produced by this map.
    pub fn element(&self, id: u32) -> &E {
        &self.elements[id as usize]
    }

    /// Number of interned values
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Forget every value; ids handed out before are invalid afterwards.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.lookup.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_in_order_of_first_sight() {
        let mut ids = IdMap::new();
        assert_eq!(ids.get_id(&"b"), 0);
        assert_eq!(ids.get_id(&"a"), 1);
        assert_eq!(ids.get_id(&"b"), 0);
        assert_eq!(ids.len(), 2);
        assert_eq!(*ids.element(1), "a");
        assert_eq!(ids.lookup(&"c"), None);
    }

    #[test]
    fn test_sorted_ids_dedup() {
        let mut ids = IdMap::new();
        ids.get_id(&"z");
        let sorted = ids.get_sorted_ids(["y", "z", "y", "x"].iter());
        assert_eq!(&*sorted, &[0, 1, 2]);
    }

    #[test]
    fn test_clear() {
        let mut ids = IdMap::new();
        ids.get_id(&7);
        ids.clear();
        assert!(ids.is_empty());
        assert_eq!(ids.get_id(&8), 0);
    }
}
