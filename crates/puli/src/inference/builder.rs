//! Fluent construction of an inference set together with its justifier.

use super::{BaseInferenceSet, Inference, MapJustifier};
use std::hash::Hash;
use std::sync::Arc;

/// Builds a [`BaseInferenceSet`] and a matching [`MapJustifier`].
///
/// ```
/// use puli::inference::{InferenceSet, InferenceSetBuilder};
///
/// let mut builder = InferenceSetBuilder::new();
/// builder.inference("A").premise("B").axiom(1).add();
/// builder.inference("B").axiom(2).add();
/// let (set, _justifier) = builder.build();
/// assert_eq!(set.inferences(&"A").len(), 1);
/// ```
#[derive(Debug)]
pub struct InferenceSetBuilder<C, A> {
    set: BaseInferenceSet<C>,
    justifier: MapJustifier<C, A>,
    count: usize,
}

impl<C: Clone + Eq + Hash, A> Default for InferenceSetBuilder<C, A> {
    fn default() -> Self {
        InferenceSetBuilder {
            set: BaseInferenceSet::new(),
            justifier: MapJustifier::new(),
            count: 0,
        }
    }
}

impl<C: Clone + Eq + Hash, A> InferenceSetBuilder<C, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an inference deriving `conclusion`
    pub fn inference(&mut self, conclusion: C) -> InferenceBuilder<'_, C, A> {
        InferenceBuilder {
            builder: self,
            name: None,
            conclusion,
            premises: Vec::new(),
            axioms: Vec::new(),
        }
    }

    pub fn build(self) -> (BaseInferenceSet<C>, MapJustifier<C, A>) {
        (self.set, self.justifier)
    }
}

/// One inference under construction; finished by [`InferenceBuilder::add`].
#[derive(Debug)]
pub struct InferenceBuilder<'b, C, A> {
    builder: &'b mut InferenceSetBuilder<C, A>,
    name: Option<String>,
    conclusion: C,
    premises: Vec<C>,
    axioms: Vec<A>,
}

impl<C: Clone + Eq + Hash, A> InferenceBuilder<'_, C, A> {
    /// Label of the inference; defaults to `inf<N>`, unique per builder
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn premise(mut self, premise: C) -> Self {
        self.premises.push(premise);
        self
    }

    pub fn axiom(mut self, axiom: A) -> Self {
        self.axioms.push(axiom);
        self
    }

    pub fn add(self) -> Arc<Inference<C>> {
        let builder = self.builder;
        let name = self
            .name
            .unwrap_or_else(|| format!("inf{}", builder.count));
        builder.count += 1;
        let inference = Inference::new(name, self.conclusion, self.premises);
        builder.justifier.insert(inference.clone(), self.axioms);
        builder.set.add(inference)
    }
}
