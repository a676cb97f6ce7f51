//! Ordering of results
//!
//! Engines report results in ascending order of the priority a
//! [`PriorityComparator`] assigns to candidate sets. The priority must be
//! monotone under strict inclusion: if S ⊊ T then `priority(S) < priority(T)`.
//! Otherwise a non-minimal set may be reported before the set that dominates
//! it; this is not checked.

use crate::index::SortedIdSet;

pub trait PriorityComparator<A> {
    type Priority: Ord + Clone;

    fn priority(&self, set: SortedIdSet<'_, A>) -> Self::Priority;
}

impl<A, P: PriorityComparator<A> + ?Sized> PriorityComparator<A> for &P {
    type Priority = P::Priority;

    fn priority(&self, set: SortedIdSet<'_, A>) -> Self::Priority {
        (**self).priority(set)
    }
}

/// Smaller sets first
#[derive(Debug, Clone, Copy, Default)]
pub struct Cardinality;

impl<A> PriorityComparator<A> for Cardinality {
    type Priority = usize;

    fn priority(&self, set: SortedIdSet<'_, A>) -> usize {
        set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IdMap;

    #[test]
    fn test_cardinality() {
        let mut map = IdMap::new();
        let ids = map.get_sorted_ids(["x", "y"].iter());
        assert_eq!(Cardinality.priority(SortedIdSet::new(&ids, &map)), 2);
        assert_eq!(Cardinality.priority(SortedIdSet::new(&[], &map)), 0);
    }
}
