//! Error types for the decision pipeline.
//!
//! Malformed model output is never an error here: it is repaired by the
//! normalizer and coercer. Only provider failures and decisions that cannot
//! be produced at all surface to callers.

/// Failures reported by a [`crate::pipeline::DecisionProvider`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Network or transport failure.
    #[error("provider transport failed: {0}")]
    Transport(String),

    /// The provider answered but refused or could not honor the request
    /// (schema unsupported, content filtered, ...).
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    #[error("provider timed out")]
    Timeout,
}

/// A decision that breaks the output invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected exactly 2 bundles, found {0}")]
    BundleCount(usize),

    #[error("bundle {0:?} has no actions")]
    EmptyBundle(String),

    #[error("bundle {bundle:?} holds an invalid action: {reason}")]
    InvalidAction { bundle: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Both the structured attempt and the raw-text retry failed.
    #[error("no decision could be produced: {reason} (first attempt: {first_attempt})")]
    Terminal {
        first_attempt: String,
        reason: String,
    },

    /// The task's constraints exclude even the fallback action, so an emptied
    /// bundle cannot be refilled.
    #[error("constraints leave no admissible fallback action: {0}")]
    UnsatisfiableConstraints(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
