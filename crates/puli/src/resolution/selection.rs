//! Resolving-atom selection
//!
//! Every derived inference taking part in resolution has exactly one atom
//! selected: either its conclusion or one of its premises. Two inferences are
//! resolved only when one selects as conclusion the atom the other selects as
//! premise. Any choice keeps the enumeration complete, except that the goal
//! may be selected as conclusion only by premise-less inferences.
//!
//! Strategies:
//! - Bottom-up: always a premise with the fewest inferences
//! - Top-down: a premise only for inferences deriving the goal
//! - Threshold: bottom-up while the fewest inference count stays within a bound

use super::DerivedInference;
use crate::index::ConclusionId;
use std::collections::HashMap;

/// What a selection may consult about the current enumeration.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    goal: ConclusionId,
    inference_counts: &'a HashMap<ConclusionId, usize>,
}

impl<'a> SelectionContext<'a> {
    pub(crate) fn new(
        goal: ConclusionId,
        inference_counts: &'a HashMap<ConclusionId, usize>,
    ) -> Self {
        SelectionContext {
            goal,
            inference_counts,
        }
    }

    pub fn goal(&self) -> ConclusionId {
        self.goal
    }

    /// Number of source inferences deriving `conclusion`
    pub fn inference_count(&self, conclusion: ConclusionId) -> usize {
        self.inference_counts.get(&conclusion).copied().unwrap_or(0)
    }

    /// Premise with the fewest inferences (the first one on ties), with that count
    pub fn fewest_inferences_premise(
        &self,
        inference: &DerivedInference,
    ) -> Option<(ConclusionId, usize)> {
        let mut best: Option<(ConclusionId, usize)> = None;
        for &premise in inference.premises() {
            let count = self.inference_count(premise);
            if best.map_or(true, |(_, min)| count < min) {
                best = Some((premise, count));
            }
        }
        best
    }
}

/// Trait for resolving-atom selection strategies
pub trait Selection {
    /// `None` selects the conclusion, `Some(p)` selects premise `p`.
    ///
    /// Returning `None` for an inference deriving the goal with premises
    /// left, or a conclusion that is not a premise, aborts the enumeration.
    fn resolving_atom(
        &self,
        inference: &DerivedInference,
        context: &SelectionContext<'_>,
    ) -> Option<ConclusionId>;

    /// Get the name of this selection strategy
    fn name(&self) -> &str;
}

/// Always select a premise with the fewest inferences; the conclusion only
/// when there are no premises.
#[derive(Debug, Clone, Copy, Default)]
pub struct BottomUpSelection;

impl Selection for BottomUpSelection {
    fn resolving_atom(
        &self,
        inference: &DerivedInference,
        context: &SelectionContext<'_>,
    ) -> Option<ConclusionId> {
        context.fewest_inferences_premise(inference).map(|(premise, _)| premise)
    }

    fn name(&self) -> &str {
        "bottom_up"
    }
}

/// Select the conclusion, except for inferences deriving the goal, which
/// select a premise with the fewest inferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopDownSelection;

impl Selection for TopDownSelection {
    fn resolving_atom(
        &self,
        inference: &DerivedInference,
        context: &SelectionContext<'_>,
    ) -> Option<ConclusionId> {
        if inference.conclusion() != context.goal() {
            return None;
        }
        context.fewest_inferences_premise(inference).map(|(premise, _)| premise)
    }

    fn name(&self) -> &str {
        "top_down"
    }
}

/// Bottom-up, but select the conclusion of a non-goal inference once every
/// premise has more than `threshold` inferences.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdSelection {
    threshold: usize,
}

impl ThresholdSelection {
    pub fn new(threshold: usize) -> Self {
        ThresholdSelection { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Default for ThresholdSelection {
    fn default() -> Self {
        ThresholdSelection::new(2)
    }
}

impl Selection for ThresholdSelection {
    fn resolving_atom(
        &self,
        inference: &DerivedInference,
        context: &SelectionContext<'_>,
    ) -> Option<ConclusionId> {
        match context.fewest_inferences_premise(inference) {
            Some((_, count))
                if count > self.threshold && inference.conclusion() != context.goal() =>
            {
                None
            }
            Some((premise, _)) => Some(premise),
            None => None,
        }
    }

    fn name(&self) -> &str {
        "threshold"
    }
}
