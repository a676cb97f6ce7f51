//! Derived inferences: conclusion, premise set and accumulated justification.

use crate::index::sorted_ids;
use crate::index::{AxiomId, ConclusionId, IdMap};
use std::fmt;

/// An inference over interned ids, obtained from a source inference or by
/// resolving two derived inferences.
///
/// Premises and justification are strictly increasing id arrays.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivedInference {
    conclusion: ConclusionId,
    premises: Box<[ConclusionId]>,
    justification: Box<[AxiomId]>,
}

impl DerivedInference {
    pub(crate) fn new(
        conclusion: ConclusionId,
        premises: Box<[ConclusionId]>,
        justification: Box<[AxiomId]>,
    ) -> Self {
        DerivedInference {
            conclusion,
            premises,
            justification,
        }
    }

    pub fn conclusion(&self) -> ConclusionId {
        self.conclusion
    }

    pub fn premises(&self) -> &[ConclusionId] {
        &self.premises
    }

    pub fn justification(&self) -> &[AxiomId] {
        &self.justification
    }

    /// The conclusion is among the premises
    pub fn is_tautology(&self) -> bool {
        sorted_ids::contains(&self.premises, self.conclusion)
    }

    /// Minimality key: premises and axioms mapped into one id space
    /// (premise `p` to `2p`, axiom `a` to `2a + 1`), still sorted.
    pub(crate) fn minimality_key(&self) -> Vec<u32> {
        let mut key = Vec::with_capacity(self.premises.len() + self.justification.len());
        let (mut i, mut j) = (0, 0);
        while i < self.premises.len() || j < self.justification.len() {
            let p = self.premises.get(i).map(|&p| 2 * p);
            let a = self.justification.get(j).map(|&a| 2 * a + 1);
            match (p, a) {
                (Some(p), Some(a)) if p < a => {
                    key.push(p);
                    i += 1;
                }
                (Some(p), None) => {
                    key.push(p);
                    i += 1;
                }
                (_, Some(a)) => {
                    key.push(a);
                    j += 1;
                }
                (None, None) => break,
            }
        }
        key
    }

    /// Resolve `first` (whose conclusion is a premise of `second`) with
    /// `second`: the result derives `second`'s conclusion.
    pub(crate) fn resolve(first: &DerivedInference, second: &DerivedInference) -> Self {
        let premises = if second.premises.len() == 1 {
            first.premises.clone()
        } else {
            sorted_ids::union(
                &first.premises,
                &sorted_ids::without(&second.premises, first.conclusion),
            )
        };
        DerivedInference {
            conclusion: second.conclusion,
            premises,
            justification: sorted_ids::union(&first.justification, &second.justification),
        }
    }

    /// Render with caller values instead of ids
    pub fn display<'a, C: fmt::Debug, A: fmt::Debug>(
        &'a self,
        conclusions: &'a IdMap<C>,
        axioms: &'a IdMap<A>,
    ) -> impl fmt::Display + 'a {
        DisplayWith {
            inference: self,
            conclusions,
            axioms,
        }
    }
}

impl fmt::Display for DerivedInference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -| {:?}: {:?}",
            self.conclusion, self.premises, self.justification
        )
    }
}

struct DisplayWith<'a, C, A> {
    inference: &'a DerivedInference,
    conclusions: &'a IdMap<C>,
    axioms: &'a IdMap<A>,
}

impl<C: fmt::Debug, A: fmt::Debug> fmt::Display for DisplayWith<'_, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let premises: Vec<&C> = self
            .inference
            .premises
            .iter()
            .map(|&p| self.conclusions.element(p))
            .collect();
        let justification: Vec<&A> = self
            .inference
            .justification
            .iter()
            .map(|&a| self.axioms.element(a))
            .collect();
        write!(
            f,
            "{:?} -| {:?}: {:?}",
            self.conclusions.element(self.inference.conclusion),
            premises,
            justification
        )
    }
}
