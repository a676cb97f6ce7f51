//! Justification enumeration by resolution over derived inferences
//!
//! Every source inference reachable from the goal becomes a derived
//! inference `conclusion -| premises : justification`. Resolving
//! `X = c -| P : J` with `Y = d -| Q : K` where `c ∈ Q` yields
//! `d -| P ∪ (Q \ {c}) : J ∪ K`; repeated resolution eliminates premises
//! until the goal is derived from none, at which point the justification
//! is a candidate result.
//!
//! The loop follows the given-clause scheme: the queue is ordered by the
//! priority of the justification, so candidates reach the goal smallest
//! first and a candidate that is not minimal is always detected against the
//! results reported before it. Two minimality filters keep the search small:
//! - a derived inference dominated by another one with the same conclusion
//!   (premises and justification both included) is dropped
//! - a derived inference whose justification includes a reported
//!   justification is parked; parked inferences are replayed by the next
//!   enumeration on the same engine
//!
//! Redundant resolutions are avoided with a selection function: each derived
//! inference selects one atom (its conclusion or a premise), and two
//! inferences are resolved only on an atom selected by both.

mod derived;
mod queue;
mod selection;

pub use derived::DerivedInference;
pub use selection::{
    BottomUpSelection, Selection, SelectionContext, ThresholdSelection, TopDownSelection,
};

use crate::config::ResolutionConfig;
use crate::error::{PinpointError, Result};
use crate::index::sorted_ids::{self, SortedIdSet};
use crate::index::{BloomTrie, ConclusionId, IdMap};
use crate::inference::{Inference, InferenceJustifier, InferenceSet};
use crate::listener::MinimalSubsetListener;
use crate::monitor::{InterruptMonitor, NeverInterrupted};
use crate::priority::{Cardinality, PriorityComparator};
use crate::stats::ResolutionStats;
use queue::{InferenceQueue, QueueElement};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Enumerates the justifications of goals over one inference set.
///
/// The engine keeps what it learned between calls of
/// [`enumerate`](Self::enumerate): conclusions already unfolded, minimal
/// derived inferences per conclusion, the selected-atom indices and parked
/// inferences. Later goals over the same inference set start from there.
///
/// After an error the engine state is unspecified; discard it.
pub struct ResolutionJustificationComputation<C, A, S, J> {
    inference_set: S,
    justifier: J,
    selection: Box<dyn Selection>,
    monitor: Box<dyn InterruptMonitor>,
    config: ResolutionConfig,
    conclusions: IdMap<C>,
    axioms: IdMap<A>,
    /// Conclusions whose inferences were converted to derived inferences
    initialized: HashSet<ConclusionId>,
    /// Number of source inferences per initialized conclusion
    inference_counts: HashMap<ConclusionId, usize>,
    /// Minimal derived inferences per conclusion
    minimal_inferences: HashMap<ConclusionId, BloomTrie>,
    /// Inferences resolving on their conclusion, by that conclusion
    by_selected_conclusion: HashMap<ConclusionId, Vec<Arc<DerivedInference>>>,
    /// Inferences resolving on a premise, by that premise
    by_selected_premise: HashMap<ConclusionId, Vec<Arc<DerivedInference>>>,
    /// Parked queue elements, resolvents left unmaterialized
    blocked: VecDeque<QueueElement>,
    stats: ResolutionStats,
}

impl<C, A, S, J> ResolutionJustificationComputation<C, A, S, J>
where
    C: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    S: InferenceSet<C>,
    J: InferenceJustifier<C, A>,
{
    pub fn new(inference_set: S, justifier: J) -> Self {
        Self::with_config(inference_set, justifier, ResolutionConfig::default())
    }

    pub fn with_config(inference_set: S, justifier: J, config: ResolutionConfig) -> Self {
        ResolutionJustificationComputation {
            inference_set,
            justifier,
            selection: config.selection.create(),
            monitor: Box::new(NeverInterrupted),
            config,
            conclusions: IdMap::new(),
            axioms: IdMap::new(),
            initialized: HashSet::new(),
            inference_counts: HashMap::new(),
            minimal_inferences: HashMap::new(),
            by_selected_conclusion: HashMap::new(),
            by_selected_premise: HashMap::new(),
            blocked: VecDeque::new(),
            stats: ResolutionStats::default(),
        }
    }

    /// Replace the selection strategy of the configuration
    pub fn with_selection(mut self, selection: Box<dyn Selection>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_monitor(mut self, monitor: impl InterruptMonitor + 'static) -> Self {
        self.monitor = Box::new(monitor);
        self
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    pub fn selection(&self) -> &dyn Selection {
        self.selection.as_ref()
    }

    /// Counters since creation or the last [`reset_stats`](Self::reset_stats),
    /// including those of the per-conclusion minimality indices
    pub fn stats(&self) -> ResolutionStats {
        let mut stats = self.stats.clone();
        for trie in self.minimal_inferences.values() {
            stats.minimality_index.absorb(trie.stats());
        }
        stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ResolutionStats::default();
        for trie in self.minimal_inferences.values_mut() {
            trie.reset_stats();
        }
    }

    /// Report every justification of `goal` to `listener`, smallest first.
    pub fn enumerate<L>(&mut self, goal: &C, listener: &mut L) -> Result<()>
    where
        L: MinimalSubsetListener<A> + ?Sized,
    {
        self.enumerate_by(goal, &Cardinality, listener)
    }

    /// Report every justification of `goal` to `listener`, in ascending
    /// order of `priority`.
    pub fn enumerate_by<P, L>(&mut self, goal: &C, priority: &P, listener: &mut L) -> Result<()>
    where
        P: PriorityComparator<A>,
        L: MinimalSubsetListener<A> + ?Sized,
    {
        let start = Instant::now();
        let goal_id = self.conclusions.get_id(goal);
        debug!(
            "{:?}: enumerating justifications, {} selection",
            goal,
            self.selection.name()
        );
        let mut queue = InferenceQueue::with_capacity(self.config.initial_queue_capacity);
        let mut justifications = BloomTrie::new();

        self.initialize(goal_id, priority, &mut queue);
        self.unblock_inferences(priority, &mut queue);
        self.change_selection(goal_id, priority, &mut queue);
        let result = self.process(goal_id, priority, &mut queue, &mut justifications, listener);

        self.stats.minimality_index.absorb(justifications.stats());
        self.stats.enumeration_time += start.elapsed();
        debug!(
            "{:?}: {} justifications, {} inferences produced, {} minimal",
            goal,
            justifications.len(),
            self.stats.produced_inferences,
            self.stats.minimal_inferences
        );
        result
    }

    /// Convert the inferences reachable from `goal` that were not seen before
    fn initialize<P: PriorityComparator<A>>(
        &mut self,
        goal: ConclusionId,
        priority: &P,
        queue: &mut InferenceQueue<P::Priority>,
    ) {
        let mut to_initialize = VecDeque::new();
        if self.initialized.insert(goal) {
            to_initialize.push_back(goal);
        }
        while let Some(next) = to_initialize.pop_front() {
            let inferences = self
                .inference_set
                .inferences(self.conclusions.element(next))
                .into_owned();
            self.inference_counts.insert(next, inferences.len());
            for inference in inferences {
                let derived = self.derive(&inference);
                let element = QueueElement::Derived {
                    inference: Arc::new(derived),
                    checked_minimal: false,
                };
                produce(&mut self.stats, &self.axioms, queue, priority, element);
                for premise in &inference.premises {
                    let id = self.conclusions.get_id(premise);
                    if self.initialized.insert(id) {
                        to_initialize.push_back(id);
                    }
                }
            }
        }
    }

    fn derive(&mut self, inference: &Inference<C>) -> DerivedInference {
        let conclusion = self.conclusions.get_id(&inference.conclusion);
        let premises = self.conclusions.get_sorted_ids(inference.premises.iter());
        let justification = self
            .axioms
            .get_sorted_ids(self.justifier.justification(inference).iter());
        DerivedInference::new(conclusion, premises, justification)
    }

    /// Requeue inferences parked by earlier enumerations
    fn unblock_inferences<P: PriorityComparator<A>>(
        &mut self,
        priority: &P,
        queue: &mut InferenceQueue<P::Priority>,
    ) {
        while let Some(element) = self.blocked.pop_front() {
            produce(&mut self.stats, &self.axioms, queue, priority, element);
        }
    }

    /// Inferences that selected the new goal as their conclusion must select again
    fn change_selection<P: PriorityComparator<A>>(
        &mut self,
        goal: ConclusionId,
        priority: &P,
        queue: &mut InferenceQueue<P::Priority>,
    ) {
        for inference in self.by_selected_conclusion.remove(&goal).unwrap_or_default() {
            let element = QueueElement::Derived {
                inference,
                checked_minimal: true,
            };
            produce(&mut self.stats, &self.axioms, queue, priority, element);
        }
    }

    fn block(&mut self, inference: Arc<DerivedInference>, checked_minimal: bool) {
        trace!(
            "{}: blocked",
            inference.display(&self.conclusions, &self.axioms)
        );
        self.stats.blocked_inferences += 1;
        self.blocked.push_back(QueueElement::Derived {
            inference,
            checked_minimal,
        });
    }

    fn process<P, L>(
        &mut self,
        goal: ConclusionId,
        priority: &P,
        queue: &mut InferenceQueue<P::Priority>,
        justifications: &mut BloomTrie,
        listener: &mut L,
    ) -> Result<()>
    where
        P: PriorityComparator<A>,
        L: MinimalSubsetListener<A> + ?Sized,
    {
        loop {
            if self.monitor.is_interrupted() {
                self.park(queue);
                return Ok(());
            }
            let Some(element) = queue.pop() else {
                return Ok(());
            };
            let (inference, checked_minimal) = element.materialize();
            if !justifications.is_minimal(inference.justification()) {
                self.block(inference, checked_minimal);
                continue;
            }
            if inference.premises().is_empty() && inference.conclusion() == goal {
                justifications.insert(inference.justification());
                self.stats.justifications += 1;
                let justification = SortedIdSet::new(inference.justification(), &self.axioms);
                debug!("new justification: {:?}", justification);
                listener.new_minimal_subset(justification);
                self.block(inference, checked_minimal);
                continue;
            }
            if !checked_minimal {
                let minimal = self
                    .minimal_inferences
                    .entry(inference.conclusion())
                    .or_default()
                    .insert_if_minimal(&inference.minimality_key());
                if !minimal {
                    trace!(
                        "{}: not minimal",
                        inference.display(&self.conclusions, &self.axioms)
                    );
                    continue;
                }
                self.stats.minimal_inferences += 1;
            }
            self.select_and_resolve(goal, inference, priority, queue)?;
        }
    }

    fn select_and_resolve<P: PriorityComparator<A>>(
        &mut self,
        goal: ConclusionId,
        inference: Arc<DerivedInference>,
        priority: &P,
        queue: &mut InferenceQueue<P::Priority>,
    ) -> Result<()> {
        let context = SelectionContext::new(goal, &self.inference_counts);
        match self.selection.resolving_atom(&inference, &context) {
            None => {
                // resolve on the conclusion
                let selected = inference.conclusion();
                if selected == goal {
                    return Err(PinpointError::GoalSelected {
                        inference: inference
                            .display(&self.conclusions, &self.axioms)
                            .to_string(),
                    });
                }
                if let Some(others) = self.by_selected_premise.get(&selected) {
                    for other in others {
                        let element = QueueElement::Resolvent {
                            first: Arc::clone(&inference),
                            second: Arc::clone(other),
                        };
                        produce(&mut self.stats, &self.axioms, queue, priority, element);
                    }
                }
                self.by_selected_conclusion
                    .entry(selected)
                    .or_default()
                    .push(inference);
            }
            Some(selected) => {
                // resolve on the selected premise
                if !sorted_ids::contains(inference.premises(), selected) {
                    return Err(PinpointError::InvalidSelection {
                        selection: self.selection.name().to_string(),
                        premise: if (selected as usize) < self.conclusions.len() {
                            format!("{:?}", self.conclusions.element(selected))
                        } else {
                            format!("#{}", selected)
                        },
                        inference: inference
                            .display(&self.conclusions, &self.axioms)
                            .to_string(),
                    });
                }
                if let Some(others) = self.by_selected_conclusion.get(&selected) {
                    for other in others {
                        let element = QueueElement::Resolvent {
                            first: Arc::clone(other),
                            second: Arc::clone(&inference),
                        };
                        produce(&mut self.stats, &self.axioms, queue, priority, element);
                    }
                }
                self.by_selected_premise
                    .entry(selected)
                    .or_default()
                    .push(inference);
            }
        }
        Ok(())
    }

    /// Keep unprocessed work for the next enumeration after an interrupt
    fn park<P: Ord>(&mut self, queue: &mut InferenceQueue<P>) {
        debug!("interrupted, parking {} queued inferences", queue.len());
        self.blocked.extend(queue.drain());
    }
}

/// Queue `element` unless it is a tautology
fn produce<A, P: PriorityComparator<A>>(
    stats: &mut ResolutionStats,
    axioms: &IdMap<A>,
    queue: &mut InferenceQueue<P::Priority>,
    priority: &P,
    element: QueueElement,
) {
    if element.is_tautology() {
        return;
    }
    stats.produced_inferences += 1;
    let rank = match &element {
        QueueElement::Derived { inference, .. } => {
            priority.priority(SortedIdSet::new(inference.justification(), axioms))
        }
        QueueElement::Resolvent { first, second } => {
            let justification = sorted_ids::union(first.justification(), second.justification());
            priority.priority(SortedIdSet::new(&justification, axioms))
        }
    };
    queue.push(rank, element);
}
