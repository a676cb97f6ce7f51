//! Engine configuration types.

use crate::resolution::{BottomUpSelection, Selection, ThresholdSelection, TopDownSelection};
use serde::{Deserialize, Serialize};

/// Configuration for the resolution enumerator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    pub selection: SelectionStrategy,
    /// Initial capacity of the priority queue of pending inferences
    pub initial_queue_capacity: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        ResolutionConfig {
            selection: SelectionStrategy::default(),
            initial_queue_capacity: 256,
        }
    }
}

/// Built-in resolving-atom selection strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Select a premise with the fewest inferences whenever there is one
    BottomUp,
    /// Select premises only of inferences deriving the goal
    TopDown,
    /// Bottom-up while the fewest inference count is at most the threshold
    Threshold(usize),
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        SelectionStrategy::Threshold(2)
    }
}

impl SelectionStrategy {
    pub fn create(self) -> Box<dyn Selection> {
        match self {
            SelectionStrategy::BottomUp => Box::new(BottomUpSelection),
            SelectionStrategy::TopDown => Box::new(TopDownSelection),
            SelectionStrategy::Threshold(threshold) => Box::new(ThresholdSelection::new(threshold)),
        }
    }
}
