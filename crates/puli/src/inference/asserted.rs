//! Asserted conclusions
//!
//! Treating a set of conclusions as given is modelled by one extra
//! premise-less inference per asserted conclusion, justified by the
//! conclusion itself. Pinpointing over such a set yields minimal subsets of
//! the asserted conclusions.

use super::{Inference, InferenceJustifier, InferenceSet};
use std::borrow::Cow;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Name carried by the inferences added for asserted conclusions
pub const ASSERTED_INFERENCE_NAME: &str = "Asserted";

/// Inference set extending a delegate with an asserted-conclusion inference
/// for every conclusion in `asserted`.
#[derive(Debug, Clone)]
pub struct AddAssertedInferences<S, C> {
    delegate: S,
    asserted: HashSet<C>,
}

impl<S, C: Eq + Hash> AddAssertedInferences<S, C> {
    pub fn new(delegate: S, asserted: impl IntoIterator<Item = C>) -> Self {
        AddAssertedInferences {
            delegate,
            asserted: asserted.into_iter().collect(),
        }
    }

    pub fn asserted(&self) -> &HashSet<C> {
        &self.asserted
    }
}

impl<S, C> InferenceSet<C> for AddAssertedInferences<S, C>
where
    S: InferenceSet<C>,
    C: Clone + Eq + Hash,
{
    fn inferences(&self, conclusion: &C) -> Cow<'_, [Arc<Inference<C>>]> {
        let result = self.delegate.inferences(conclusion);
        if !self.asserted.contains(conclusion) {
            return result;
        }
        let mut extended = result.into_owned();
        extended.push(Arc::new(Inference::asserted(conclusion.clone())));
        Cow::Owned(extended)
    }
}

/// Justifies asserted-conclusion inferences by their conclusion and every
/// other inference by the empty set.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertedConclusionJustifier;

impl<C: Clone> InferenceJustifier<C, C> for AssertedConclusionJustifier {
    fn justification(&self, inference: &Inference<C>) -> Cow<'_, [C]> {
        if inference.name == ASSERTED_INFERENCE_NAME && inference.premises.is_empty() {
            Cow::Owned(vec![inference.conclusion.clone()])
        } else {
            Cow::Borrowed(&[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::BaseInferenceSet;

    #[test]
    fn test_asserted_inference_added() {
        let mut base = BaseInferenceSet::new();
        base.add(Inference::new("r", "A", vec!["B"]));
        let set = AddAssertedInferences::new(&base, ["B"]);
        assert_eq!(set.inferences(&"A").len(), 1);
        let for_b = set.inferences(&"B");
        assert_eq!(for_b.len(), 1);
        assert_eq!(*for_b[0], Inference::asserted("B"));
    }

    #[test]
    fn test_asserted_justifier() {
        let justifier = AssertedConclusionJustifier;
        assert_eq!(&*justifier.justification(&Inference::asserted("B")), &["B"]);
        assert!(justifier
            .justification(&Inference::new("r", "A", vec!["B"]))
            .is_empty());
    }
}
