//! Set algebra over strictly increasing `u32` arrays.

use super::id_map::IdMap;
use std::fmt;

/// Whether `sorted` contains `id`.
#[inline]
pub fn contains(sorted: &[u32], id: u32) -> bool {
    sorted.binary_search(&id).is_ok()
}

/// Whether every element of `subset` occurs in `superset`, by merging.
pub fn contains_all(superset: &[u32], subset: &[u32]) -> bool {
    if subset.len() > superset.len() {
        return false;
    }
    let mut i = 0;
    for &id in subset {
        loop {
            match superset.get(i) {
                None => return false,
                Some(&s) if s < id => i += 1,
                Some(&s) if s == id => {
                    i += 1;
                    break;
                }
                Some(_) => return false,
            }
        }
    }
    true
}

/// Sorted union of two sorted arrays.
pub fn union(first: &[u32], second: &[u32]) -> Box<[u32]> {
    if first.is_empty() || first == second {
        return second.into();
    }
    if second.is_empty() {
        return first.into();
    }
    let mut result = Vec::with_capacity(first.len() + second.len());
    let (mut i, mut j) = (0, 0);
    while i < first.len() && j < second.len() {
        let (a, b) = (first[i], second[j]);
        if a < b {
            result.push(a);
            i += 1;
        } else if b < a {
            result.push(b);
            j += 1;
        } else {
            result.push(a);
            i += 1;
            j += 1;
        }
    }
    result.extend_from_slice(&first[i..]);
    result.extend_from_slice(&second[j..]);
    result.into_boxed_slice()
}

/// Number of elements of `first ∪ second`, without allocating.
pub fn union_len(first: &[u32], second: &[u32]) -> usize {
    let (mut i, mut j, mut len) = (0, 0, 0);
    while i < first.len() && j < second.len() {
        let (a, b) = (first[i], second[j]);
        if a <= b {
            i += 1;
        }
        if b <= a {
            j += 1;
        }
        len += 1;
    }
    len + (first.len() - i) + (second.len() - j)
}

/// Sorted copy of `sorted` without `id`.
pub fn without(sorted: &[u32], id: u32) -> Box<[u32]> {
    sorted.iter().copied().filter(|&s| s != id).collect()
}

/// Sorted copy of `sorted` with `id` inserted.
pub fn with(sorted: &[u32], id: u32) -> Box<[u32]> {
    match sorted.binary_search(&id) {
        Ok(_) => sorted.into(),
        Err(pos) => {
            let mut result = Vec::with_capacity(sorted.len() + 1);
            result.extend_from_slice(&sorted[..pos]);
            result.push(id);
            result.extend_from_slice(&sorted[pos..]);
            result.into_boxed_slice()
        }
    }
}

/// Whether the two sorted arrays share an element.
pub fn intersects(first: &[u32], second: &[u32]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < first.len() && j < second.len() {
        match first[i].cmp(&second[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}

// =============================================================================
// Borrowed view
// =============================================================================

/// A set of caller values, borrowed from an engine as sorted ids plus the
/// arena that resolves them.
///
/// Handed to listeners so that reporting a result does not clone it; call
/// [`SortedIdSet::to_vec`] to keep a copy.
#[derive(Clone, Copy)]
pub struct SortedIdSet<'a, E> {
    ids: &'a [u32],
    map: &'a IdMap<E>,
}

impl<'a, E> SortedIdSet<'a, E> {
    pub fn new(ids: &'a [u32], map: &'a IdMap<E>) -> Self {
        SortedIdSet { ids, map }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The underlying sorted ids
    pub fn ids(&self) -> &'a [u32] {
        self.ids
    }

    /// Values in id order
    pub fn iter(&self) -> impl Iterator<Item = &'a E> + 'a {
        let map = self.map;
        self.ids.iter().map(move |&id| map.element(id))
    }

    pub fn to_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, E: Clone + Eq + std::hash::Hash> SortedIdSet<'a, E> {
    pub fn contains(&self, element: &E) -> bool {
        self.map
            .lookup(element)
            .map_or(false, |id| contains(self.ids, id))
    }
}

impl<E: fmt::Debug> fmt::Debug for SortedIdSet<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
