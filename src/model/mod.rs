#[macro_use]
mod macros;

pub mod action;
pub mod decision;
pub mod fields;

pub use action::{Action, ActionCategory, ActionKind, RelationDelta};
pub use decision::{
    ALTERNATIVE_LABEL, ActionBundle, DecisionParseOutput, Diagnostic, DiagnosticStage,
    FALLBACK_DURATION_WEEKS, PRIMARY_LABEL, fallback_action,
};
pub use fields::{FieldKind, canonical_fields, field_kind};
