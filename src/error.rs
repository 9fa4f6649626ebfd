// src/error.rs
//
// Crate error type. Configuration and environment-contract violations are
// reported explicitly instead of letting them propagate as non-finite
// value functions.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HorizonError {
    /// Engine configuration rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A state admits no action at all. Every Bellman backup routed through
    /// such a state would be poisoned by `-inf`, so training refuses to run.
    #[error("state {state} has no admissible actions")]
    NoAdmissibleActions { state: usize },

    /// The environment reported an admissible action outside its own
    /// declared action range.
    #[error("state {state}: admissible action {action} is outside 0..{num_actions}")]
    AdmissibleActionOutOfRange {
        state: usize,
        action: usize,
        num_actions: usize,
    },
}
