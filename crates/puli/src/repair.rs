//! Repair enumeration by job splitting
//!
//! A repair is a minimal set of axioms whose removal makes the goal
//! underivable. The search starts from a job that must break every inference
//! of the goal. A job is split on one inference still to break:
//! - break one of its premises: the premise joins the broken conclusions and
//!   its own inferences join the frontier
//! - remove one of its axioms: the axiom joins the repair and every frontier
//!   inference using it is broken
//!
//! A job with an empty frontier carries a repair. Jobs are taken in ascending
//! priority of their repair, so a job whose repair includes a reported one is
//! dropped, and a job including (repair and frontier) an earlier one is
//! redundant.

use crate::index::sorted_ids::{self, SortedIdSet};
use crate::index::{BloomTrie, ConclusionId, IdMap, InferenceId};
use crate::inference::{Inference, InferenceJustifier, InferenceSet};
use crate::listener::MinimalSubsetListener;
use crate::monitor::{InterruptMonitor, NeverInterrupted};
use crate::priority::{Cardinality, PriorityComparator};
use crate::stats::RepairStats;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Source inference over ids
#[derive(Debug)]
struct InternedInference {
    premises: Box<[ConclusionId]>,
    justification: Box<[u32]>,
}

impl InternedInference {
    fn size(&self) -> usize {
        self.premises.len() + self.justification.len()
    }
}

// =============================================================================
// Jobs
// =============================================================================

#[derive(Debug)]
struct Job<P> {
    /// Axioms removed so far
    repair: Box<[u32]>,
    /// Inferences not yet broken, sorted
    to_break: Box<[InferenceId]>,
    /// Conclusions not derivable without `repair` and `to_break`
    broken: Box<[ConclusionId]>,
    priority: P,
    seq: u64,
}

impl<P> Job<P> {
    /// Axiom `a` maps to `2a`, inference `i` to `2i + 1`, so that a job
    /// includes another iff its key is a superset of the other's.
    fn minimality_key(&self) -> Vec<u32> {
        let mut key = Vec::with_capacity(self.repair.len() + self.to_break.len());
        let mut axioms = self.repair.iter().map(|&a| 2 * a).peekable();
        let mut inferences = self.to_break.iter().map(|&i| 2 * i + 1).peekable();
        loop {
            let next = match (axioms.peek(), inferences.peek()) {
                (Some(&a), Some(&i)) if a < i => axioms.next(),
                (Some(_), Some(_)) => inferences.next(),
                (Some(_), None) => axioms.next(),
                (None, Some(_)) => inferences.next(),
                (None, None) => break,
            };
            key.extend(next);
        }
        key
    }
}

impl<P: Ord> Job<P> {
    fn key(&self) -> (&P, usize, u64) {
        (&self.priority, self.to_break.len(), self.seq)
    }
}

impl<P: Ord> PartialEq for Job<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<P: Ord> Eq for Job<P> {}

impl<P: Ord> PartialOrd for Job<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Ord> Ord for Job<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior
        other.key().cmp(&self.key())
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Enumerates the repairs of goals over one inference set.
///
/// Interned conclusions, axioms and inferences are kept between calls; the
/// minimality indices are rebuilt for each goal.
pub struct TopDownRepairComputation<C, A, S, J> {
    inference_set: S,
    justifier: J,
    monitor: Box<dyn InterruptMonitor>,
    conclusions: IdMap<C>,
    axioms: IdMap<A>,
    inferences: IdMap<Arc<Inference<C>>>,
    /// Indexed by inference id
    interned: Vec<InternedInference>,
    /// Inference ids per conclusion, filled on first use
    by_conclusion: HashMap<ConclusionId, Box<[InferenceId]>>,
    next_seq: u64,
    stats: RepairStats,
}

impl<C, A, S, J> TopDownRepairComputation<C, A, S, J>
where
    C: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    S: InferenceSet<C>,
    J: InferenceJustifier<C, A>,
{
    pub fn new(inference_set: S, justifier: J) -> Self {
        TopDownRepairComputation {
            inference_set,
            justifier,
            monitor: Box::new(NeverInterrupted),
            conclusions: IdMap::new(),
            axioms: IdMap::new(),
            inferences: IdMap::new(),
            interned: Vec::new(),
            by_conclusion: HashMap::new(),
            next_seq: 0,
            stats: RepairStats::default(),
        }
    }

    pub fn with_monitor(mut self, monitor: impl InterruptMonitor + 'static) -> Self {
        self.monitor = Box::new(monitor);
        self
    }

    pub fn stats(&self) -> RepairStats {
        self.stats.clone()
    }

    pub fn reset_stats(&mut self) {
        self.stats = RepairStats::default();
    }

    /// Report every repair of `goal` to `listener`, smallest first.
    pub fn enumerate<L>(&mut self, goal: &C, listener: &mut L)
    where
        L: MinimalSubsetListener<A> + ?Sized,
    {
        self.enumerate_by(goal, &Cardinality, listener)
    }

    /// Report every repair of `goal` to `listener`, in ascending order of
    /// `priority`.
    pub fn enumerate_by<P, L>(&mut self, goal: &C, priority: &P, listener: &mut L)
    where
        P: PriorityComparator<A>,
        L: MinimalSubsetListener<A> + ?Sized,
    {
        let start = Instant::now();
        let goal_id = self.conclusions.get_id(goal);
        debug!("{:?}: enumerating repairs", goal);
        let mut jobs = BinaryHeap::new();
        let mut minimal_repairs = BloomTrie::new();
        let mut minimal_jobs = BloomTrie::new();

        let root = Job {
            repair: Box::default(),
            to_break: Box::default(),
            broken: Box::default(),
            priority: priority.priority(SortedIdSet::new(&[], &self.axioms)),
            seq: 0,
        };
        let first = self.do_break(&root, goal_id);
        self.produce(&mut jobs, first);

        loop {
            if self.monitor.is_interrupted() {
                debug!("interrupted, dropping {} jobs", jobs.len());
                break;
            }
            let Some(job) = jobs.pop() else {
                break;
            };
            if !minimal_repairs.is_minimal(&job.repair) {
                continue;
            }
            if !minimal_jobs.insert_if_minimal(&job.minimality_key()) {
                trace!("job {:?} / {:?}: not minimal", job.repair, job.to_break);
                continue;
            }
            self.stats.minimal_jobs += 1;
            let Some(next) = self.choose_to_break(&job.to_break) else {
                minimal_repairs.insert(&job.repair);
                self.stats.repairs += 1;
                let repair = SortedIdSet::new(&job.repair, &self.axioms);
                debug!("new repair: {:?}", repair);
                listener.new_minimal_subset(repair);
                continue;
            };
            let premises = self.interned[next as usize].premises.clone();
            for &premise in premises.iter() {
                let split = self.do_break(&job, premise);
                self.produce(&mut jobs, split);
            }
            let justification = self.interned[next as usize].justification.clone();
            for &axiom in justification.iter() {
                let split = self.remove_axiom(&job, axiom, priority);
                self.produce(&mut jobs, split);
            }
        }

        self.stats.minimality_index.absorb(minimal_repairs.stats());
        self.stats.minimality_index.absorb(minimal_jobs.stats());
        self.stats.enumeration_time += start.elapsed();
        debug!(
            "{:?}: {} repairs, {} jobs produced, {} minimal",
            goal,
            minimal_repairs.len(),
            self.stats.produced_jobs,
            self.stats.minimal_jobs
        );
    }

    fn produce<P: Ord>(&mut self, jobs: &mut BinaryHeap<Job<P>>, mut job: Job<P>) {
        self.stats.produced_jobs += 1;
        self.next_seq += 1;
        job.seq = self.next_seq;
        jobs.push(job);
    }

    /// The frontier inference with the fewest premises and axioms, the first
    /// one on ties
    fn choose_to_break(&self, to_break: &[InferenceId]) -> Option<InferenceId> {
        let mut best: Option<(InferenceId, usize)> = None;
        for &id in to_break {
            let size = self.interned[id as usize].size();
            if best.map_or(true, |(_, min)| size < min) {
                best = Some((id, size));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Split that makes `conclusion` underivable
    fn do_break<P: Clone>(&mut self, job: &Job<P>, conclusion: ConclusionId) -> Job<P> {
        let broken = sorted_ids::with(&job.broken, conclusion);
        let mut to_break: Vec<InferenceId> = job
            .to_break
            .iter()
            .copied()
            .filter(|&id| !sorted_ids::contains(&self.interned[id as usize].premises, conclusion))
            .collect();
        for &id in self.inferences_of(conclusion).iter() {
            let inference = &self.interned[id as usize];
            if sorted_ids::intersects(&inference.premises, &broken)
                || sorted_ids::intersects(&inference.justification, &job.repair)
            {
                continue;
            }
            to_break.push(id);
        }
        to_break.sort_unstable();
        to_break.dedup();
        Job {
            repair: job.repair.clone(),
            to_break: to_break.into_boxed_slice(),
            broken,
            priority: job.priority.clone(),
            seq: 0,
        }
    }

    /// Split that removes `axiom`
    fn remove_axiom<P: PriorityComparator<A>>(
        &self,
        job: &Job<P::Priority>,
        axiom: u32,
        priority: &P,
    ) -> Job<P::Priority> {
        let repair = sorted_ids::with(&job.repair, axiom);
        let to_break: Box<[InferenceId]> = job
            .to_break
            .iter()
            .copied()
            .filter(|&id| {
                !sorted_ids::contains(&self.interned[id as usize].justification, axiom)
            })
            .collect();
        let priority = priority.priority(SortedIdSet::new(&repair, &self.axioms));
        Job {
            repair,
            to_break,
            broken: job.broken.clone(),
            priority,
            seq: 0,
        }
    }

    /// Ids of the inferences of `conclusion`, interning them on first use
    fn inferences_of(&mut self, conclusion: ConclusionId) -> Box<[InferenceId]> {
        if let Some(ids) = self.by_conclusion.get(&conclusion) {
            return ids.clone();
        }
        let inferences = self
            .inference_set
            .inferences(self.conclusions.element(conclusion))
            .into_owned();
        let mut ids = Vec::with_capacity(inferences.len());
        for inference in inferences {
            let id = self.inferences.get_id(&inference);
            if id as usize == self.interned.len() {
                let premises = self.conclusions.get_sorted_ids(inference.premises.iter());
                let justification = self
                    .axioms
                    .get_sorted_ids(self.justifier.justification(&inference).iter());
                self.interned.push(InternedInference {
                    premises,
                    justification,
                });
            }
            ids.push(id);
        }
        let ids = ids.into_boxed_slice();
        self.by_conclusion.insert(conclusion, ids.clone());
        ids
    }
}
