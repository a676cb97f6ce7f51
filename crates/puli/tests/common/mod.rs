//! Fixtures and brute-force oracles shared by the integration tests

#![allow(dead_code)]

use proptest::prelude::*;
use puli::{BaseInferenceSet, InferenceSetBuilder, MapJustifier};
use std::collections::{BTreeSet, HashSet};

pub type AxiomSet = BTreeSet<u32>;

/// One inference of a fixture
#[derive(Debug, Clone)]
pub struct Rule {
    pub conclusion: String,
    pub premises: Vec<String>,
    pub axioms: Vec<u32>,
}

/// Inference graph over string conclusions and integer axioms
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub rules: Vec<Rule>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, conclusion: &str, premises: &[&str], axioms: &[u32]) -> Self {
        self.rules.push(Rule {
            conclusion: conclusion.to_string(),
            premises: premises.iter().map(|p| p.to_string()).collect(),
            axioms: axioms.to_vec(),
        });
        self
    }

    pub fn build(&self) -> (BaseInferenceSet<String>, MapJustifier<String, u32>) {
        let mut builder = InferenceSetBuilder::new();
        for rule in &self.rules {
            let mut inference = builder.inference(rule.conclusion.clone());
            for premise in &rule.premises {
                inference = inference.premise(premise.clone());
            }
            for &axiom in &rule.axioms {
                inference = inference.axiom(axiom);
            }
            inference.add();
        }
        builder.build()
    }

    /// Every axiom used by some rule
    pub fn axioms(&self) -> AxiomSet {
        self.rules.iter().flat_map(|r| r.axioms.iter().copied()).collect()
    }

    /// Every conclusion or premise mentioned by some rule
    pub fn conclusions(&self) -> BTreeSet<String> {
        self.rules
            .iter()
            .flat_map(|r| std::iter::once(&r.conclusion).chain(&r.premises))
            .cloned()
            .collect()
    }

    /// `goal` and every conclusion reachable from it through premises
    pub fn reachable(&self, goal: &str) -> BTreeSet<String> {
        let mut reached: BTreeSet<String> = [goal.to_string()].into_iter().collect();
        let mut to_expand = vec![goal.to_string()];
        while let Some(next) = to_expand.pop() {
            for rule in self.rules.iter().filter(|r| r.conclusion == next) {
                for premise in &rule.premises {
                    if reached.insert(premise.clone()) {
                        to_expand.push(premise.clone());
                    }
                }
            }
        }
        reached
    }

    /// Forward chaining with the rules whose axioms are all in `axioms`,
    /// never deriving a conclusion in `blocked`
    pub fn derivable_with(
        &self,
        goal: &str,
        axioms: &AxiomSet,
        blocked: &HashSet<String>,
    ) -> bool {
        let mut derived: HashSet<&str> = HashSet::new();
        loop {
            let mut changed = false;
            for rule in &self.rules {
                if derived.contains(rule.conclusion.as_str())
                    || blocked.contains(&rule.conclusion)
                    || !rule.axioms.iter().all(|a| axioms.contains(a))
                    || !rule.premises.iter().all(|p| derived.contains(p.as_str()))
                {
                    continue;
                }
                derived.insert(rule.conclusion.as_str());
                changed = true;
            }
            if !changed {
                return derived.contains(goal);
            }
        }
    }

    pub fn derivable(&self, goal: &str) -> bool {
        self.derivable_with(goal, &self.axioms(), &HashSet::new())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Goal "A" over a graph with the cycles B -> C -> D -> B and A -> C -> B
pub fn complex_cycle() -> Fixture {
    Fixture::new()
        .rule("A", &["B"], &[1])
        .rule("A", &["C"], &[2])
        .rule("B", &["C"], &[3])
        .rule("C", &["D"], &[4])
        .rule("D", &["B"], &[5])
        .rule("D", &[], &[6, 7])
        .rule("A", &["E"], &[8])
        .rule("E", &[], &[1, 9])
        .rule("B", &[], &[8, 9])
}

pub fn complex_cycle_justifications() -> Vec<AxiomSet> {
    sets(&[&[1, 8, 9], &[1, 3, 4, 6, 7], &[2, 4, 6, 7], &[2, 4, 5, 8, 9]])
}

/// Goal "A" reached along two branches meeting at the axiom-free "E"
pub fn race() -> Fixture {
    Fixture::new()
        .rule("A", &["B"], &[])
        .rule("A", &["C"], &[])
        .rule("C", &["D"], &[])
        .rule("D", &["E"], &[1])
        .rule("B", &["E"], &[2])
        .rule("E", &[], &[])
}

/// Chain c0 <- c1 <- ... <- c{levels}, two alternative inferences per link:
/// 2^levels justifications of the goal `c{levels}`
pub fn exponential(levels: u32) -> Fixture {
    let mut fixture = Fixture::new().rule("c0", &[], &[]);
    for i in 0..levels {
        let conclusion = format!("c{}", i + 1);
        let premise = format!("c{}", i);
        fixture = fixture
            .rule(&conclusion, &[premise.as_str()], &[2 * i])
            .rule(&conclusion, &[premise.as_str()], &[2 * i + 1]);
    }
    fixture
}

// =============================================================================
// Oracles
// =============================================================================

pub fn sets(sets: &[&[u32]]) -> Vec<AxiomSet> {
    normalize(sets.iter().map(|s| s.to_vec()).collect())
}

/// Reported sets as sorted axiom sets, in sorted order
pub fn normalize(sets: Vec<Vec<u32>>) -> Vec<AxiomSet> {
    let mut result: Vec<AxiomSet> = sets.into_iter().map(|s| s.into_iter().collect()).collect();
    result.sort();
    result
}

/// Keep the sets of `candidates` with no proper subset among them
fn minimal(mut candidates: Vec<AxiomSet>) -> Vec<AxiomSet> {
    candidates.sort_by_key(|s| s.len());
    let mut result: Vec<AxiomSet> = Vec::new();
    for candidate in candidates {
        if !result.iter().any(|kept| kept.is_subset(&candidate)) {
            result.push(candidate);
        }
    }
    result.sort();
    result
}

fn subsets(universe: &AxiomSet) -> impl Iterator<Item = AxiomSet> + '_ {
    let elements: Vec<u32> = universe.iter().copied().collect();
    (0u64..1 << elements.len()).map(move |mask| {
        elements
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &a)| a)
            .collect()
    })
}

/// Minimal axiom sets deriving `goal`, by trying every subset
pub fn brute_force_justifications(fixture: &Fixture, goal: &str) -> Vec<AxiomSet> {
    let universe = fixture.axioms();
    let none = HashSet::new();
    minimal(
        subsets(&universe)
            .filter(|s| fixture.derivable_with(goal, s, &none))
            .collect(),
    )
}

/// Minimal sets meeting every set of `family`
pub fn minimal_hitting_sets(family: &[AxiomSet]) -> Vec<AxiomSet> {
    let universe: AxiomSet = family.iter().flatten().copied().collect();
    minimal(
        subsets(&universe)
            .filter(|s| family.iter().all(|f| !f.is_disjoint(s)))
            .collect(),
    )
}

// =============================================================================
// Random graphs
// =============================================================================

fn arb_rule() -> impl Strategy<Value = Rule> {
    (
        0..5usize,
        proptest::collection::btree_set(0..5usize, 0..=2),
        proptest::collection::btree_set(0..6u32, 0..=2),
    )
        .prop_map(|(conclusion, premises, axioms)| Rule {
            conclusion: format!("c{}", conclusion),
            premises: premises.into_iter().map(|p| format!("c{}", p)).collect(),
            axioms: axioms.into_iter().collect(),
        })
}

/// Small random graph over conclusions c0..c4 and axioms 0..5; goal is "c0"
pub fn arb_fixture() -> impl Strategy<Value = Fixture> {
    proptest::collection::vec(arb_rule(), 1..9).prop_map(|rules| Fixture { rules })
}
