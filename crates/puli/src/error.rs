//! Error types for puli

use thiserror::Error;

/// Fatal conditions raised by the enumeration engines.
///
/// Both variants point at a bug in a custom `Selection`: the enumeration
/// stops immediately instead of silently producing wrong results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PinpointError {
    #[error("Goal selected as resolving atom while premises remain: {inference}")]
    GoalSelected { inference: String },

    #[error("Selection {selection} chose {premise}, which is not a premise of {inference}")]
    InvalidSelection {
        selection: String,
        premise: String,
        inference: String,
    },
}

pub type Result<T> = std::result::Result<T, PinpointError>;
