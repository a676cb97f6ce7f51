//! Essential conclusions and goal-directed pruning of inference sets
//!
//! A conclusion is essential for a goal if every derivation of the goal goes
//! through it: blocking it makes the goal underivable. Essential conclusions
//! are found with one block / query / unblock round per reachable conclusion
//! on a single incremental checker.

use crate::derivability::{
    BlockingDerivabilityChecker, DerivabilityChecker, InferenceDerivabilityChecker,
};
use crate::inference::{AddAssertedInferences, Inference, InferenceSet};
use indexmap::IndexSet;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Breadth-first traversal of the inferences reachable from `goal` through
/// premises. Each inference is passed to `producer` once per visit of its
/// conclusion; returns the visited conclusions in visiting order.
pub fn unfold_recursively<C, S, F>(
    inference_set: &S,
    goal: &C,
    mut producer: F,
) -> IndexSet<C>
where
    C: Clone + Eq + Hash,
    S: InferenceSet<C> + ?Sized,
    F: FnMut(&Arc<Inference<C>>),
{
    let mut result = IndexSet::new();
    let mut to_expand = VecDeque::new();
    result.insert(goal.clone());
    to_expand.push_back(goal.clone());
    while let Some(next) = to_expand.pop_front() {
        for inference in inference_set.inferences(&next).iter() {
            producer(inference);
            for premise in &inference.premises {
                if result.insert(premise.clone()) {
                    to_expand.push_back(premise.clone());
                }
            }
        }
    }
    result
}

/// Conclusions reachable from `goal` without which `goal` is not derivable.
///
/// If `goal` is not derivable, blocking changes nothing and every reachable
/// conclusion is reported, `goal` included.
pub fn essential_conclusions<C, S>(inference_set: &S, goal: &C) -> IndexSet<C>
where
    C: Clone + Eq + Hash + Debug,
    S: InferenceSet<C> + ?Sized,
{
    let mut result = IndexSet::new();
    let mut checker = InferenceDerivabilityChecker::new(inference_set);
    for candidate in unfold_recursively(inference_set, goal, |_| {}) {
        checker.block(&candidate);
        if !checker.is_derivable(goal) {
            result.insert(candidate.clone());
        }
        checker.unblock(&candidate);
    }
    debug!("{:?}: {} essential conclusions", goal, result.len());
    result
}

// =============================================================================
// Inference expander
// =============================================================================

/// Forward chaining from a set of conclusions taken as derivable.
///
/// Runs over the inferences reachable from a goal and reports, for every
/// conclusion that becomes derivable, the first inference deriving it.
pub struct InferenceExpander<C, F> {
    derivable: HashSet<C>,
    /// premise -> (inference, position) pairs waiting for it
    watched: HashMap<C, Vec<(Arc<Inference<C>>, usize)>>,
    newly_derived: VecDeque<C>,
    producer: F,
}

impl<C, F> InferenceExpander<C, F>
where
    C: Clone + Eq + Hash,
    F: FnMut(&Arc<Inference<C>>),
{
    /// Expand `derivable` over the unfolding of `goal`; returns the final
    /// derivable set.
    pub fn expand<S>(
        derivable: HashSet<C>,
        inference_set: &S,
        goal: &C,
        producer: F,
    ) -> HashSet<C>
    where
        S: InferenceSet<C> + ?Sized,
    {
        let mut expander = InferenceExpander {
            derivable,
            watched: HashMap::new(),
            newly_derived: VecDeque::new(),
            producer,
        };
        unfold_recursively(inference_set, goal, |inference| expander.produce(inference));
        expander.derivable
    }

    fn produce(&mut self, inference: &Arc<Inference<C>>) {
        self.advance(inference, 0);
        self.propagate();
    }

    /// Watch the first premise from `pos` on that is not derivable, or
    /// derive the conclusion if there is none.
    fn advance(&mut self, inference: &Arc<Inference<C>>, mut pos: usize) {
        while let Some(premise) = inference.premises.get(pos) {
            if !self.derivable.contains(premise) {
                self.watched
                    .entry(premise.clone())
                    .or_default()
                    .push((Arc::clone(inference), pos));
                return;
            }
            pos += 1;
        }
        if self.derivable.insert(inference.conclusion.clone()) {
            (self.producer)(inference);
            self.newly_derived.push_back(inference.conclusion.clone());
        }
    }

    fn propagate(&mut self) {
        while let Some(next) = self.newly_derived.pop_front() {
            let Some(watching) = self.watched.remove(&next) else {
                continue;
            };
            for (inference, pos) in watching {
                self.advance(&inference, pos + 1);
            }
        }
    }
}

// =============================================================================
// Pruned inference set
// =============================================================================

/// Inference set restricted to what matters for deriving a goal from a set
/// of asserted conclusions.
///
/// Conclusions that become derivable by forward chaining from the essential
/// conclusions of the goal (computed with `asserted` taken as given) keep a
/// single inference; all other conclusions keep the inferences of the
/// delegate.
pub struct PrunedInferenceSet<C, S> {
    delegate: S,
    expanded: HashMap<C, Vec<Arc<Inference<C>>>>,
}

impl<C, S> PrunedInferenceSet<C, S>
where
    C: Clone + Eq + Hash + Debug,
    S: InferenceSet<C>,
{
    pub fn new(delegate: S, goal: &C, asserted: impl IntoIterator<Item = C>) -> Self {
        let extended = AddAssertedInferences::new(&delegate, asserted);
        let essential: HashSet<C> = essential_conclusions(&extended, goal)
            .into_iter()
            .collect();
        let mut expanded = HashMap::new();
        InferenceExpander::expand(essential, &delegate, goal, |inference: &Arc<Inference<C>>| {
            expanded.insert(inference.conclusion.clone(), vec![Arc::clone(inference)]);
        });
        debug!("{:?}: {} conclusions pruned to one inference", goal, expanded.len());
        PrunedInferenceSet { delegate, expanded }
    }
}

impl<C, S> InferenceSet<C> for PrunedInferenceSet<C, S>
where
    C: Eq + Hash,
    S: InferenceSet<C>,
{
    fn inferences(&self, conclusion: &C) -> Cow<'_, [Arc<Inference<C>>]> {
        match self.expanded.get(conclusion) {
            Some(single) => Cow::Borrowed(single.as_slice()),
            None => self.delegate.inferences(conclusion),
        }
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
    fn test_unfold_visits_reachable_once() {
        let set = set(&[("A", &["B", "C"]), ("B", &["C"]), ("C", &["A"]), ("D", &[])]);
        let mut produced = 0;
        let reached = unfold_recursively(&set, &"A", |_| produced += 1);
        assert_eq!(reached.into_iter().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(produced, 3);
    }

    #[test]
    fn test_essential_conclusions_of_diamond() {
        // A <- B, A <- C, B <- D, C <- D, D
        let set = set(&[
            ("A", &["B"]),
            ("A", &["C"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &[]),
        ]);
        let essential = essential_conclusions(&set, &"A");
        let mut essential: Vec<_> = essential.into_iter().collect();
        essential.sort();
        assert_eq!(essential, vec!["A", "D"]);
    }

    #[test]
    fn test_essential_conclusions_of_underivable_goal() {
        let set = set(&[("A", &["B"]), ("B", &["C"]), ("D", &[])]);
        let essential: Vec<_> = essential_conclusions(&set, &"A").into_iter().collect();
        assert_eq!(essential, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_pruning_keeps_underivable_goal_untouched() {
        // E and F are derivable, B is not
        let set = set(&[
            ("A", &["B", "E"]),
            ("A", &["B", "F"]),
            ("E", &[]),
            ("E", &["F"]),
            ("F", &[]),
        ]);
        let pruned = PrunedInferenceSet::new(&set, &"A", Vec::new());
        for conclusion in ["A", "B", "E", "F"] {
            assert_eq!(
                pruned.inferences(&conclusion).len(),
                set.inferences(&conclusion).len(),
                "{}",
                conclusion
            );
        }
    }

    #[test]
    fn test_expander_reports_first_inference() {
        let set = set(&[("A", &["B", "C"]), ("A", &["B"]), ("B", &["C"])]);
        let mut produced = Vec::new();
        let derivable = InferenceExpander::expand(
            ["C"].into_iter().collect(),
            &set,
            &"A",
            |inference: &Arc<Inference<&str>>| produced.push(inference.name.clone()),
        );
        assert!(derivable.contains("A"));
        assert!(derivable.contains("B"));
        assert_eq!(produced.len(), 2);
        assert!(produced.contains(&"r2".to_string()));
    }

    #[test]
    fn test_pruned_set_keeps_single_inference() {
        // with B asserted, A and B are essential; C follows from B and keeps
        // only the inference using B
        let set = set(&[("A", &["B"]), ("A", &["C"]), ("C", &["B"]), ("C", &["D"])]);
        let pruned = PrunedInferenceSet::new(&set, &"A", ["B"]);
        assert_eq!(pruned.inferences(&"A").len(), 2);
        let for_c = pruned.inferences(&"C");
        assert_eq!(for_c.len(), 1);
        assert_eq!(for_c[0].premises, vec!["B"]);
        assert!(pruned.inferences(&"B").is_empty());
        let asserted = AddAssertedInferences::new(&pruned, ["B"]);
        let mut checker = InferenceDerivabilityChecker::new(&asserted);
        assert!(checker.is_derivable(&"A"));
    }
}
