//! Inference graphs: the data the engines consume
//!
//! An [`InferenceSet`] answers "which inferences produce this conclusion", and
//! an [`InferenceJustifier`] maps an inference to the axioms it rests on. Both
//! are pure lookups supplied by the caller; conclusions and axioms are opaque
//! values compared with their own `Eq`/`Hash`.

mod asserted;
mod builder;
mod justifier;

pub use asserted::{AddAssertedInferences, AssertedConclusionJustifier, ASSERTED_INFERENCE_NAME};
pub use builder::InferenceSetBuilder;
pub use justifier::{InferenceJustifier, MapJustifier};

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

// =============================================================================
// Inference
// =============================================================================

/// One rule instance: a conclusion produced from an ordered list of premises.
///
/// The name is a diagnostic label, but it takes part in equality so that two
/// rules with the same shape (and different justifications) stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Inference<C> {
    pub name: String,
    pub conclusion: C,
    pub premises: Vec<C>,
}

impl<C> Inference<C> {
    pub fn new(name: impl Into<String>, conclusion: C, premises: Vec<C>) -> Self {
        Inference {
            name: name.into(),
            conclusion,
            premises,
        }
    }

    /// Premise-less inference stating that `conclusion` holds outright
    pub fn asserted(conclusion: C) -> Self {
        Inference::new(ASSERTED_INFERENCE_NAME, conclusion, Vec::new())
    }
}

impl<C: fmt::Debug> fmt::Display for Inference<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -| {:?} by {}", self.conclusion, self.premises, self.name)
    }
}

// =============================================================================
// Inference sets
// =============================================================================

/// Lookup from a conclusion to the inferences producing it.
///
/// Must return the same inferences for the same conclusion for the lifetime
/// of any engine built over it. An unknown conclusion has no inferences.
pub trait InferenceSet<C> {
    fn inferences(&self, conclusion: &C) -> Cow<'_, [Arc<Inference<C>>]>;
}

impl<C, S: InferenceSet<C> + ?Sized> InferenceSet<C> for &S {
    fn inferences(&self, conclusion: &C) -> Cow<'_, [Arc<Inference<C>>]> {
        (**self).inferences(conclusion)
    }
}

impl<C, S: InferenceSet<C> + ?Sized> InferenceSet<C> for Arc<S> {
    fn inferences(&self, conclusion: &C) -> Cow<'_, [Arc<Inference<C>>]> {
        (**self).inferences(conclusion)
    }
}

/// Inference set with no inferences at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyInferenceSet;

impl<C> InferenceSet<C> for EmptyInferenceSet {
    fn inferences(&self, _conclusion: &C) -> Cow<'_, [Arc<Inference<C>>]> {
        Cow::Borrowed(&[])
    }
}

pub fn empty_inference_set() -> EmptyInferenceSet {
    EmptyInferenceSet
}

/// Inference set backed by a map, filled with [`BaseInferenceSet::add`].
#[derive(Debug, Clone)]
pub struct BaseInferenceSet<C> {
    by_conclusion: HashMap<C, Vec<Arc<Inference<C>>>>,
}

impl<C> Default for BaseInferenceSet<C> {
    fn default() -> Self {
        BaseInferenceSet {
            by_conclusion: HashMap::new(),
        }
    }
}

impl<C: Clone + Eq + Hash> BaseInferenceSet<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inference; adding an equal inference twice keeps one copy.
    pub fn add(&mut self, inference: Inference<C>) -> Arc<Inference<C>> {
        let list = self
            .by_conclusion
            .entry(inference.conclusion.clone())
            .or_default();
        if let Some(existing) = list.iter().find(|i| ***i == inference) {
            return Arc::clone(existing);
        }
        let inference = Arc::new(inference);
        list.push(Arc::clone(&inference));
        inference
    }

    /// Total number of inferences
    pub fn len(&self) -> usize {
        self.by_conclusion.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_conclusion.is_empty()
    }

    /// Every inference, grouped by conclusion
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Inference<C>>> {
        self.by_conclusion.values().flatten()
    }
}

impl<C: Eq + Hash> InferenceSet<C> for BaseInferenceSet<C> {
    fn inferences(&self, conclusion: &C) -> Cow<'_, [Arc<Inference<C>>]> {
        match self.by_conclusion.get(conclusion) {
            Some(list) => Cow::Borrowed(list.as_slice()),
            None => Cow::Borrowed(&[]),
        }
    }
}
