//! Puli: axiom pinpointing over inference graphs
//!
//! Given inferences (a conclusion, premises and justifying axioms each), this
//! library decides derivability of conclusions under blocking, enumerates the
//! minimal axiom sets deriving a goal (justifications) and the minimal axiom
//! sets whose removal makes it underivable (repairs).

pub mod config;
pub mod derivability;
pub mod error;
pub mod index;
pub mod inference;
pub mod listener;
pub mod monitor;
pub mod priority;
pub mod pruning;
pub mod repair;
pub mod resolution;
pub mod stats;

// Re-export the inference graph boundary
pub use inference::{
    empty_inference_set, AddAssertedInferences, AssertedConclusionJustifier, BaseInferenceSet,
    Inference, InferenceJustifier, InferenceSet, InferenceSetBuilder, MapJustifier,
};

pub use derivability::{
    BlockingDerivabilityChecker, ConclusionState, DerivabilityChecker,
    InferenceDerivabilityChecker,
};

pub use pruning::{
    essential_conclusions, unfold_recursively, InferenceExpander, PrunedInferenceSet,
};

// Re-export enumeration engines
pub use repair::TopDownRepairComputation;
pub use resolution::{
    BottomUpSelection, DerivedInference, ResolutionJustificationComputation, Selection,
    SelectionContext, ThresholdSelection, TopDownSelection,
};

pub use config::{ResolutionConfig, SelectionStrategy};
pub use error::{PinpointError, Result};
pub use index::{BloomTrie, IdMap, SortedIdSet};
pub use listener::{AxiomPinpointingCollector, JustificationCollector, MinimalSubsetListener};
pub use monitor::{InterruptMonitor, NeverInterrupted};
pub use priority::{Cardinality, PriorityComparator};
pub use stats::{IndexStats, RepairStats, ResolutionStats};
