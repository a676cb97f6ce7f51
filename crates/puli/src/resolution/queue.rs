//! Pending work of the resolution loop.
//!
//! Resolvents are queued unmaterialized: only the two parents are kept, and
//! premises and justification are computed when the resolvent is dequeued.

use super::DerivedInference;
use crate::index::sorted_ids;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub(crate) enum QueueElement {
    Derived {
        inference: Arc<DerivedInference>,
        /// Already retained as minimal for its conclusion
        checked_minimal: bool,
    },
    /// Resolvent of `first` (conclusion selected) and `second` (premise selected)
    Resolvent {
        first: Arc<DerivedInference>,
        second: Arc<DerivedInference>,
    },
}

impl QueueElement {
    fn premise_count(&self) -> usize {
        match self {
            QueueElement::Derived { inference, .. } => inference.premises().len(),
            QueueElement::Resolvent { first, second } => {
                sorted_ids::union_len(first.premises(), second.premises()) - 1
            }
        }
    }

    /// A resolvent of two non-tautologies is a tautology iff the premises of
    /// `first` contain the conclusion of `second`.
    pub(crate) fn is_tautology(&self) -> bool {
        match self {
            QueueElement::Derived { inference, .. } => inference.is_tautology(),
            QueueElement::Resolvent { first, second } => {
                sorted_ids::contains(first.premises(), second.conclusion())
            }
        }
    }

    /// The derived inference this element stands for, and whether it is
    /// known minimal
    pub(crate) fn materialize(self) -> (Arc<DerivedInference>, bool) {
        match self {
            QueueElement::Derived {
                inference,
                checked_minimal,
            } => (inference, checked_minimal),
            QueueElement::Resolvent { first, second } => {
                (Arc::new(DerivedInference::resolve(&first, &second)), false)
            }
        }
    }
}

struct QueueEntry<P> {
    priority: P,
    premise_count: usize,
    seq: u64,
    element: QueueElement,
}

impl<P: Ord> QueueEntry<P> {
    fn key(&self) -> (&P, usize, u64) {
        (&self.priority, self.premise_count, self.seq)
    }
}

impl<P: Ord> PartialEq for QueueEntry<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<P: Ord> Eq for QueueEntry<P> {}

impl<P: Ord> PartialOrd for QueueEntry<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Ord> Ord for QueueEntry<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other.key().cmp(&self.key())
    }
}

/// Min-queue on (priority, premise count, insertion order).
pub(crate) struct InferenceQueue<P> {
    heap: BinaryHeap<QueueEntry<P>>,
    next_seq: u64,
}

impl<P: Ord> InferenceQueue<P> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        InferenceQueue {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub(crate) fn push(&mut self, priority: P, element: QueueElement) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueueEntry {
            priority,
            premise_count: element.premise_count(),
            seq,
            element,
        });
    }

    pub(crate) fn pop(&mut self) -> Option<QueueElement> {
        self.heap.pop().map(|entry| entry.element)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Remaining elements, in no particular order
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = QueueElement> + '_ {
        self.heap.drain().map(|entry| entry.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived(conclusion: u32, premises: &[u32]) -> QueueElement {
        QueueElement::Derived {
            inference: Arc::new(DerivedInference::new(
                conclusion,
                premises.into(),
                Box::new([]),
            )),
            checked_minimal: false,
        }
    }

    fn conclusion_of(element: QueueElement) -> u32 {
        element.materialize().0.conclusion()
    }

    #[test]
    fn test_order_priority_then_premises_then_age() {
        let mut queue = InferenceQueue::with_capacity(4);
        queue.push(2, derived(0, &[]));
        queue.push(1, derived(1, &[5, 6]));
        queue.push(1, derived(2, &[5]));
        queue.push(1, derived(3, &[7]));
        assert_eq!(queue.len(), 4);
        let order: Vec<u32> = std::iter::from_fn(|| queue.pop()).map(conclusion_of).collect();
        assert_eq!(order, vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_resolvent_is_materialized_lazily() {
        let first = Arc::new(DerivedInference::new(1, Box::new([2]), Box::new([0])));
        let second = Arc::new(DerivedInference::new(0, Box::new([1, 3]), Box::new([1])));
        let element = QueueElement::Resolvent {
            first: Arc::clone(&first),
            second: Arc::clone(&second),
        };
        assert_eq!(element.premise_count(), 2);
        assert!(!element.is_tautology());
        let (resolvent, checked) = element.materialize();
        assert!(!checked);
        assert_eq!(resolvent.premises(), &[2, 3]);
        assert_eq!(resolvent.justification(), &[0, 1]);

        // 1 -| [0]  resolved into  0 -| [1]  would derive 0 from 0
        let looping = QueueElement::Resolvent {
            first: Arc::new(DerivedInference::new(1, Box::new([0]), Box::new([]))),
            second: Arc::new(DerivedInference::new(0, Box::new([1]), Box::new([]))),
        };
        assert!(looping.is_tautology());
    }
}
