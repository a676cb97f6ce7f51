//! Axiom justifiers

use super::Inference;
use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::Hash;

/// Maps an inference to the axioms justifying it.
///
/// Must be a pure function of the inference. Purely structural inferences
/// have an empty justification; duplicates in the returned slice are ignored.
pub trait InferenceJustifier<C, A: Clone> {
    fn justification(&self, inference: &Inference<C>) -> Cow<'_, [A]>;
}

impl<C, A: Clone, J: InferenceJustifier<C, A> + ?Sized> InferenceJustifier<C, A> for &J {
    fn justification(&self, inference: &Inference<C>) -> Cow<'_, [A]> {
        (**self).justification(inference)
    }
}

/// Justifier backed by a map, with a fallback for unmapped inferences.
#[derive(Debug, Clone)]
pub struct MapJustifier<C, A> {
    justifications: HashMap<Inference<C>, Vec<A>>,
    default: Vec<A>,
}

impl<C, A> Default for MapJustifier<C, A> {
    fn default() -> Self {
        MapJustifier {
            justifications: HashMap::new(),
            default: Vec::new(),
        }
    }
}

impl<C: Eq + Hash, A> MapJustifier<C, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Justifier returning `default` for every inference not explicitly mapped
    pub fn with_default(default: Vec<A>) -> Self {
        MapJustifier {
            justifications: HashMap::new(),
            default,
        }
    }

    pub fn insert(&mut self, inference: Inference<C>, justification: Vec<A>) {
        self.justifications.insert(inference, justification);
    }
}

impl<C: Eq + Hash, A: Clone> InferenceJustifier<C, A> for MapJustifier<C, A> {
    fn justification(&self, inference: &Inference<C>) -> Cow<'_, [A]> {
        Cow::Borrowed(
            self.justifications
                .get(inference)
                .map_or(self.default.as_slice(), Vec::as_slice),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_justifier_default() {
        let mut justifier = MapJustifier::with_default(vec![0]);
        let inf = Inference::new("r", "A", vec!["B"]);
        justifier.insert(inf.clone(), vec![1, 2]);
        assert_eq!(&*justifier.justification(&inf), &[1, 2]);
        let other = Inference::new("s", "A", vec![]);
        assert_eq!(&*justifier.justification(&other), &[0]);
    }
}
