//! Turning model output into well-formed decisions.

pub mod action;
pub mod bundle;
pub mod loose_json;
pub mod probe;

pub use action::{ActionRejection, normalize_action, normalize_action_with_reason};
pub use bundle::{INTENT_SUMMARY_MAX_CHARS, normalize_decision};
pub use loose_json::recover_object;
