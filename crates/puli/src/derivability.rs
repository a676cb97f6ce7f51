//! Incremental derivability under blocking
//!
//! A conclusion is derivable if some inference for it has all premises
//! derivable. Blocked conclusions are treated as underivable: they are never
//! reported derivable and never satisfy a premise.
//!
//! The checker works like unit propagation with watched literals:
//! - an inference that cannot fire yet watches its first premise that is not
//!   derivable, and is re-examined only when that premise becomes derivable
//! - newly derivable conclusions are propagated before any new inference is
//!   pulled from the inference set
//! - inferences that fired are recorded against their conclusion and every
//!   premise, so that blocking a conclusion retracts exactly what depended on it
//!
//! Inferences are pulled lazily, one at a time, only for conclusions that
//! some query needs.

use crate::index::{ConclusionId, IdMap, InferenceId};
use crate::inference::{Inference, InferenceSet};
use indexmap::IndexSet;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::trace;

// =============================================================================
// Traits
// =============================================================================

pub trait DerivabilityChecker<C> {
    /// Whether `conclusion` is derivable with the inferences of the checker
    fn is_derivable(&mut self, conclusion: &C) -> bool;
}

/// A derivability checker whose answers ignore a mutable set of blocked
/// conclusions.
pub trait BlockingDerivabilityChecker<C>: DerivabilityChecker<C> {
    fn blocked_conclusions(&self) -> Vec<&C>;

    /// Block `conclusion`; false if it was blocked already
    fn block(&mut self, conclusion: &C) -> bool;

    /// Unblock `conclusion`; false if it was not blocked
    fn unblock(&mut self, conclusion: &C) -> bool;
}

/// Where a conclusion stands in the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConclusionState {
    /// No query has reached the conclusion yet
    Untouched,
    /// Reached by a query, not (yet) derivable
    Pending,
    Derivable,
    Blocked,
}

// =============================================================================
// Checker state
// =============================================================================

#[derive(Debug, Default)]
struct ConclusionNode {
    derivable: bool,
    blocked: bool,
    /// Derivability of this conclusion was requested at some point
    goal: bool,
    /// (inference, premise position) pairs waiting for this conclusion
    watched: Vec<(InferenceId, usize)>,
    /// Fired inferences deriving this conclusion
    fired_by_conclusion: Vec<InferenceId>,
    /// Fired inferences having this conclusion as a premise
    fired_by_premise: IndexSet<InferenceId>,
    /// Inferences for this conclusion neither watching nor fired;
    /// `None` until first pulled from the inference set
    remaining: Option<VecDeque<InferenceId>>,
}

impl ConclusionNode {
    fn usable(&self) -> bool {
        self.derivable && !self.blocked
    }
}

#[derive(Debug)]
struct InferenceEntry<C> {
    inference: Arc<Inference<C>>,
    conclusion: ConclusionId,
    /// Premise ids in the order of the inference
    premises: Box<[ConclusionId]>,
}

/// Derivability checker over an [`InferenceSet`].
///
/// Results of earlier queries are kept, so a sequence of queries with
/// interleaved `block`/`unblock` calls only redoes the affected work.
pub struct InferenceDerivabilityChecker<C, S> {
    inference_set: S,
    conclusions: IdMap<C>,
    nodes: Vec<ConclusionNode>,
    inferences: Vec<InferenceEntry<C>>,
    /// Goals to expand; never blocked when expanded
    to_check: VecDeque<ConclusionId>,
    /// Derivable, unblocked conclusions whose watchers must be re-examined
    to_propagate: VecDeque<ConclusionId>,
    to_set_unknown: VecDeque<ConclusionId>,
}

impl<C, S> InferenceDerivabilityChecker<C, S>
where
    C: Clone + Eq + Hash + Debug,
    S: InferenceSet<C>,
{
    pub fn new(inference_set: S) -> Self {
        InferenceDerivabilityChecker {
            inference_set,
            conclusions: IdMap::new(),
            nodes: Vec::new(),
            inferences: Vec::new(),
            to_check: VecDeque::with_capacity(128),
            to_propagate: VecDeque::new(),
            to_set_unknown: VecDeque::with_capacity(128),
        }
    }

    pub fn inference_set(&self) -> &S {
        &self.inference_set
    }

    /// Conclusions some inference is waiting for.
    ///
    /// Contains every conclusion found not derivable and at least one premise
    /// of each inference for such a conclusion. It may also contain premises
    /// of unused inferences of derivable conclusions; mostly useful for
    /// debugging.
    pub fn non_derivable_conclusions(&self) -> Vec<&C> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.watched.is_empty())
            .map(|(id, _)| self.conclusions.element(id as ConclusionId))
            .collect()
    }

    /// Conclusions currently known derivable (blocked ones excluded)
    pub fn derivable_conclusions(&self) -> Vec<&C> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.usable())
            .map(|(id, _)| self.conclusions.element(id as ConclusionId))
            .collect()
    }

    pub fn conclusion_state(&self, conclusion: &C) -> ConclusionState {
        let Some(id) = self.conclusions.lookup(conclusion) else {
            return ConclusionState::Untouched;
        };
        let node = &self.nodes[id as usize];
        if node.blocked {
            ConclusionState::Blocked
        } else if node.derivable {
            ConclusionState::Derivable
        } else if node.goal {
            ConclusionState::Pending
        } else {
            ConclusionState::Untouched
        }
    }

    fn conclusion_id(&mut self, conclusion: &C) -> ConclusionId {
        let id = self.conclusions.get_id(conclusion);
        if id as usize == self.nodes.len() {
            self.nodes.push(ConclusionNode::default());
        }
        id
    }

    fn node(&mut self, id: ConclusionId) -> &mut ConclusionNode {
        &mut self.nodes[id as usize]
    }

    fn to_check(&mut self, id: ConclusionId) {
        let node = self.node(id);
        if node.blocked || node.goal {
            return;
        }
        node.goal = true;
        trace!("{:?}: new goal", self.conclusions.element(id));
        self.to_check.push_front(id);
    }

    fn derivable(&mut self, id: ConclusionId) {
        let node = self.node(id);
        if node.derivable {
            return;
        }
        node.derivable = true;
        let blocked = node.blocked;
        trace!("{:?}: derived", self.conclusions.element(id));
        if !blocked {
            self.to_propagate.push_back(id);
        }
    }

    fn process(&mut self) {
        loop {
            // propagating derivable conclusions has the highest priority
            if let Some(id) = self.to_propagate.pop_front() {
                let watched = std::mem::take(&mut self.node(id).watched);
                for (inf, pos) in watched {
                    self.check(pos, inf);
                }
                continue;
            }
            // expanding inferences if there is nothing to propagate
            let Some(&id) = self.to_check.front() else {
                return;
            };
            let node = &self.nodes[id as usize];
            if node.derivable || node.blocked {
                self.to_check.pop_front();
                continue;
            }
            match self.next_remaining(id) {
                Some(inf) => {
                    trace!("{}: expanding", self.inferences[inf as usize].inference);
                    self.check(0, inf);
                }
                None => {
                    self.to_check.pop_front();
                }
            }
        }
    }

    /// Next untried inference for `id`, pulling from the inference set on first use
    fn next_remaining(&mut self, id: ConclusionId) -> Option<InferenceId> {
        if self.nodes[id as usize].remaining.is_none() {
            let fetched = self
                .inference_set
                .inferences(self.conclusions.element(id))
                .into_owned();
            let mut remaining = VecDeque::with_capacity(fetched.len());
            for inference in fetched {
                let conclusion = self.conclusion_id(&inference.conclusion);
                let premises = inference
                    .premises
                    .iter()
                    .map(|p| self.conclusion_id(p))
                    .collect();
                remaining.push_back(self.inferences.len() as InferenceId);
                self.inferences.push(InferenceEntry {
                    inference,
                    conclusion,
                    premises,
                });
            }
            self.node(id).remaining = Some(remaining);
        }
        self.node(id).remaining.as_mut().and_then(VecDeque::pop_front)
    }

    /// Scan premises circularly from `pos`; fire if all are usable, otherwise
    /// watch the first one that is not.
    fn check(&mut self, mut pos: usize, inf: InferenceId) {
        let premise_count = self.inferences[inf as usize].premises.len();
        for _ in 0..premise_count {
            let premise = self.inferences[inf as usize].premises[pos];
            if !self.nodes[premise as usize].usable() {
                self.add_watch(premise, pos, inf);
                return;
            }
            pos += 1;
            if pos == premise_count {
                pos = 0;
            }
        }
        self.fire(inf);
    }

    fn fire(&mut self, inf: InferenceId) {
        let entry = &self.inferences[inf as usize];
        trace!("{}: fire", entry.inference);
        let conclusion = entry.conclusion;
        for &premise in entry.premises.iter() {
            self.nodes[premise as usize].fired_by_premise.insert(inf);
        }
        self.derivable(conclusion);
        self.node(conclusion).fired_by_conclusion.push(inf);
    }

    fn add_watch(&mut self, premise: ConclusionId, pos: usize, inf: InferenceId) {
        trace!(
            "{}: watching position {}",
            self.inferences[inf as usize].inference,
            pos
        );
        self.node(premise).watched.push((inf, pos));
        self.to_check(premise);
    }

    /// Retract `id` and, transitively, every conclusion derived through it
    fn set_unknown(&mut self, id: ConclusionId) {
        self.to_set_unknown.push_back(id);
        while let Some(id) = self.to_set_unknown.pop_front() {
            let node = self.node(id);
            if !node.derivable {
                continue;
            }
            node.derivable = false;
            let blocked = node.blocked;
            let fired = std::mem::take(&mut node.fired_by_conclusion);
            trace!("{:?}: unknown goal", self.conclusions.element(id));
            if !blocked {
                self.to_check.push_back(id);
            }
            for &inf in &fired {
                for &premise in self.inferences[inf as usize].premises.iter() {
                    self.nodes[premise as usize].fired_by_premise.swap_remove(&inf);
                }
            }
            if let Some(remaining) = self.nodes[id as usize].remaining.as_mut() {
                remaining.extend(fired);
            }
            let dependents: Vec<ConclusionId> = self.nodes[id as usize]
                .fired_by_premise
                .iter()
                .map(|&inf| self.inferences[inf as usize].conclusion)
                .collect();
            self.to_set_unknown.extend(dependents);
        }
    }
}

impl<C, S> DerivabilityChecker<C> for InferenceDerivabilityChecker<C, S>
where
    C: Clone + Eq + Hash + Debug,
    S: InferenceSet<C>,
{
    fn is_derivable(&mut self, conclusion: &C) -> bool {
        trace!("{:?}: checking derivability", conclusion);
        let id = self.conclusion_id(conclusion);
        self.to_check(id);
        self.process();
        let derivable = self.nodes[id as usize].usable();
        trace!("{:?}: derivable: {}", conclusion, derivable);
        derivable
    }
}

impl<C, S> BlockingDerivabilityChecker<C> for InferenceDerivabilityChecker<C, S>
where
    C: Clone + Eq + Hash + Debug,
    S: InferenceSet<C>,
{
    fn blocked_conclusions(&self) -> Vec<&C> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.blocked)
            .map(|(id, _)| self.conclusions.element(id as ConclusionId))
            .collect()
    }

    fn block(&mut self, conclusion: &C) -> bool {
        let id = self.conclusion_id(conclusion);
        if self.nodes[id as usize].blocked {
            return false;
        }
        self.node(id).blocked = true;
        trace!("{:?}: blocked", conclusion);
        self.set_unknown(id);
        self.process();
        true
    }

    fn unblock(&mut self, conclusion: &C) -> bool {
        let Some(id) = self.conclusions.lookup(conclusion) else {
            return false;
        };
        let node = self.node(id);
        if !node.blocked {
            return false;
        }
        node.blocked = false;
        trace!("{:?}: unblocked", conclusion);
        // a conclusion watched while blocked never became a goal
        let node = &mut self.nodes[id as usize];
        if node.derivable {
            self.to_propagate.push_back(id);
        } else if node.goal || !node.watched.is_empty() {
            node.goal = true;
            self.to_check.push_front(id);
        }
        self.process();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::BaseInferenceSet;

    type Rules<'r> = &'r [(&'static str, &'r [&'static str])];

    fn set(inferences: Rules<'_>) -> BaseInferenceSet<&'static str> {
        let mut set = BaseInferenceSet::new();
        for (i, (conclusion, premises)) in inferences.iter().enumerate() {
            set.add(Inference::new(format!("r{}", i), *conclusion, premises.to_vec()));
        }
        set
    }

    #[test]
    fn test_simple_chain() {
        let set = set(&[("A", &["B"]), ("B", &["C"]), ("C", &[])]);
        let mut checker = InferenceDerivabilityChecker::new(&set);
        assert!(checker.is_derivable(&"A"));
        assert_eq!(checker.conclusion_state(&"C"), ConclusionState::Derivable);
        assert_eq!(checker.conclusion_state(&"Z"), ConclusionState::Untouched);
    }

    #[test]
    fn test_cycle_without_base_is_not_derivable() {
        let set = set(&[("A", &["B"]), ("B", &["A"]), ("A", &["C"])]);
        let mut checker = InferenceDerivabilityChecker::new(&set);
        assert!(!checker.is_derivable(&"A"));
        assert_eq!(checker.conclusion_state(&"B"), ConclusionState::Pending);
        let waiting = checker.non_derivable_conclusions();
        assert!(waiting.contains(&&"C"));
    }

    #[test]
    fn test_block_retracts_and_unblock_restores() {
        let set = set(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &[]),
            ("D", &[]),
        ]);
        let mut checker = InferenceDerivabilityChecker::new(&set);
        assert!(checker.is_derivable(&"A"));
        assert!(checker.block(&"D"));
        assert!(!checker.block(&"D"));
        assert!(!checker.is_derivable(&"A"));
        assert!(!checker.is_derivable(&"B"));
        assert!(checker.is_derivable(&"C"));
        assert_eq!(checker.blocked_conclusions(), vec![&"D"]);
        assert_eq!(checker.conclusion_state(&"D"), ConclusionState::Blocked);
        assert!(checker.unblock(&"D"));
        assert!(!checker.unblock(&"D"));
        assert!(checker.is_derivable(&"A"));
    }

    #[test]
    fn test_alternative_support_survives_blocking() {
        let set = set(&[("A", &["B"]), ("A", &["C"]), ("B", &[]), ("C", &[])]);
        let mut checker = InferenceDerivabilityChecker::new(&set);
        assert!(checker.is_derivable(&"A"));
        checker.block(&"B");
        assert!(checker.is_derivable(&"A"));
        checker.block(&"C");
        assert!(!checker.is_derivable(&"A"));
        checker.unblock(&"B");
        assert!(checker.is_derivable(&"A"));
    }

    #[test]
    fn test_blocked_goal_is_not_derivable() {
        let set = set(&[("A", &[])]);
        let mut checker = InferenceDerivabilityChecker::new(&set);
        checker.block(&"A");
        assert!(!checker.is_derivable(&"A"));
        checker.unblock(&"A");
        assert!(checker.is_derivable(&"A"));
    }

    #[test]
    fn test_blocked_conclusion_does_not_satisfy_premises() {
        // B becomes derivable only while blocked; A must wait for the unblock
        let set = set(&[("A", &["B"]), ("B", &["C"]), ("C", &[])]);
        let mut checker = InferenceDerivabilityChecker::new(&set);
        checker.block(&"B");
        assert!(!checker.is_derivable(&"A"));
        assert!(checker.is_derivable(&"C"));
        checker.unblock(&"B");
        assert!(checker.is_derivable(&"A"));
    }

    #[test]
    fn test_unknown_conclusion_has_no_inferences() {
        let set = set(&[]);
        let mut checker = InferenceDerivabilityChecker::new(&set);
        assert!(!checker.is_derivable(&"A"));
        assert!(!checker.unblock(&"A"));
    }

    #[test]
    fn test_repeated_premise() {
        let set = set(&[("A", &["B", "B"]), ("B", &[])]);
        let mut checker = InferenceDerivabilityChecker::new(&set);
        assert!(checker.is_derivable(&"A"));
        checker.block(&"B");
        assert!(!checker.is_derivable(&"A"));
        checker.unblock(&"B");
        assert!(checker.is_derivable(&"A"));
    }
}
