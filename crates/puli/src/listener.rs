//! Receivers of enumerated justifications and repairs
//!
//! A listener is called synchronously, once per distinct minimal set, in
//! priority order. The set is borrowed from the engine; listeners keep what
//! they need with [`SortedIdSet::to_vec`].

use crate::index::SortedIdSet;
use indexmap::IndexSet;
use serde::Serialize;
use std::hash::Hash;

pub trait MinimalSubsetListener<A> {
    fn new_minimal_subset(&mut self, set: SortedIdSet<'_, A>);
}

impl<A, F> MinimalSubsetListener<A> for F
where
    F: FnMut(SortedIdSet<'_, A>),
{
    fn new_minimal_subset(&mut self, set: SortedIdSet<'_, A>) {
        self(set)
    }
}

// =============================================================================
// Collectors
// =============================================================================

/// Listener keeping every reported set, in reporting order.
#[derive(Debug, Clone, Serialize)]
pub struct JustificationCollector<A> {
    sets: Vec<Vec<A>>,
}

impl<A> Default for JustificationCollector<A> {
    fn default() -> Self {
        JustificationCollector { sets: Vec::new() }
    }
}

impl<A> JustificationCollector<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sets(&self) -> &[Vec<A>] {
        &self.sets
    }

    pub fn into_sets(self) -> Vec<Vec<A>> {
        self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl<A: Clone> MinimalSubsetListener<A> for JustificationCollector<A> {
    fn new_minimal_subset(&mut self, set: SortedIdSet<'_, A>) {
        self.sets.push(set.to_vec());
    }
}

/// Collects the justifications and repairs of one goal, and the axioms
/// occurring in any of them.
#[derive(Debug, Clone, Serialize)]
pub struct AxiomPinpointingCollector<A: Hash + Eq> {
    justifications: Vec<Vec<A>>,
    repairs: Vec<Vec<A>>,
    essential_axioms: IndexSet<A>,
}

impl<A: Hash + Eq> Default for AxiomPinpointingCollector<A> {
    fn default() -> Self {
        AxiomPinpointingCollector {
            justifications: Vec::new(),
            repairs: Vec::new(),
            essential_axioms: IndexSet::new(),
        }
    }
}

impl<A: Clone + Hash + Eq> AxiomPinpointingCollector<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener adding to the justifications
    pub fn justifications_listener(&mut self) -> CollectInto<'_, A> {
        CollectInto {
            collector: self,
            repairs: false,
        }
    }

    /// Listener adding to the repairs
    pub fn repairs_listener(&mut self) -> CollectInto<'_, A> {
        CollectInto {
            collector: self,
            repairs: true,
        }
    }

    pub fn justifications(&self) -> &[Vec<A>] {
        &self.justifications
    }

    pub fn repairs(&self) -> &[Vec<A>] {
        &self.repairs
    }

    /// Axioms in some justification or repair, in order of first report
    pub fn essential_axioms(&self) -> &IndexSet<A> {
        &self.essential_axioms
    }

    pub fn to_json(&self) -> serde_json::Result<String>
    where
        A: Serialize,
    {
        serde_json::to_string(self)
    }
}

/// See [`AxiomPinpointingCollector::justifications_listener`]
#[derive(Debug)]
pub struct CollectInto<'c, A: Hash + Eq> {
    collector: &'c mut AxiomPinpointingCollector<A>,
    repairs: bool,
}

impl<A: Clone + Hash + Eq> MinimalSubsetListener<A> for CollectInto<'_, A> {
    fn new_minimal_subset(&mut self, set: SortedIdSet<'_, A>) {
        let axioms = set.to_vec();
        self.collector.essential_axioms.extend(axioms.iter().cloned());
        if self.repairs {
            self.collector.repairs.push(axioms);
        } else {
            self.collector.justifications.push(axioms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IdMap;

    #[test]
    fn test_closure_listener() {
        let mut map = IdMap::new();
        let ids = map.get_sorted_ids([1, 2].iter());
        let mut seen = 0;
        let mut listener = |set: SortedIdSet<'_, i32>| seen += set.len();
        listener.new_minimal_subset(SortedIdSet::new(&ids, &map));
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_pinpointing_collector_json() {
        let mut map = IdMap::new();
        let j = map.get_sorted_ids(["a", "b"].iter());
        let r = map.get_sorted_ids(["b", "c"].iter());
        let mut collector = AxiomPinpointingCollector::new();
        collector
            .justifications_listener()
            .new_minimal_subset(SortedIdSet::new(&j, &map));
        collector
            .repairs_listener()
            .new_minimal_subset(SortedIdSet::new(&r, &map));
        assert_eq!(collector.justifications(), &[vec!["a", "b"]]);
        assert_eq!(collector.repairs(), &[vec!["b", "c"]]);
        assert_eq!(collector.essential_axioms().len(), 3);
        let json: serde_json::Value =
            serde_json::from_str(&collector.to_json().unwrap()).unwrap();
        assert_eq!(json["essential_axioms"], serde_json::json!(["a", "b", "c"]));
    }
}
