pub mod coerce;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod policy;
pub mod scenario;
pub mod seed;
pub mod synth;
pub mod task;

pub use coerce::coerce;
pub use config::{GameOptions, PipelineConfig};
pub use error::{PipelineError, ProviderError, ValidationError};
pub use model::{
    Action, ActionBundle, ActionKind, DecisionParseOutput, Diagnostic, DiagnosticStage,
};
pub use parse::{normalize_action, normalize_decision, recover_object};
pub use pipeline::{DecisionPipeline, DecisionProvider, ProviderRequest};
pub use policy::ActionPolicy;
pub use scenario::Scenario;
pub use synth::{SynthesizedDecision, synthesize};
pub use task::{ChatMessage, TaskConstraints, TaskContext};
