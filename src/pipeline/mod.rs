//! The decision pipeline: provider request, structured attempt, raw-text
//! retry, then normalization, coercion and validation.

pub mod prompt;
pub mod provider;

pub use prompt::{PromptInputs, SCHEMA_NAME, build_request, decision_schema, fallback_request};
pub use provider::{DecisionProvider, ProviderRequest};

use serde_json::Value;

use crate::coerce::coerce;
use crate::config::{GameOptions, PipelineConfig};
use crate::error::PipelineError;
use crate::model::DecisionParseOutput;
use crate::parse::{normalize_decision, recover_object};
use crate::policy::ActionPolicy;
use crate::scenario::Scenario;
use crate::task::TaskContext;

/// Turns a task into a validated decision using a [`DecisionProvider`].
///
/// Holds only borrowed, read-only state; one pipeline can serve many
/// concurrent tasks against the same scenario.
pub struct DecisionPipeline<'a> {
    scenario: &'a Scenario,
    options: GameOptions,
    config: PipelineConfig,
}

impl<'a> DecisionPipeline<'a> {
    pub fn new(scenario: &'a Scenario, options: GameOptions) -> Self {
        Self {
            scenario,
            options,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn parse<P>(
        &self,
        task: &TaskContext,
        player_text: &str,
        provider: &P,
    ) -> Result<DecisionParseOutput, PipelineError>
    where
        P: DecisionProvider + ?Sized,
    {
        let policy = ActionPolicy::new(&task.constraints, &self.options);
        let inputs = PromptInputs {
            task,
            scenario: self.scenario,
            policy: &policy,
            player_text,
            config: &self.config,
        };

        let first_attempt = match provider.parse_structured(&build_request(&inputs)).await {
            Ok(raw) if raw.is_object() => match self.finish(&raw, task, player_text) {
                Ok(decision) => return Ok(decision),
                Err(e) => e.to_string(),
            },
            Ok(other) => format!("structured output was not an object: {}", json_kind(&other)),
            Err(e) => e.to_string(),
        };
        tracing::warn!(
            "task {}: structured attempt failed ({first_attempt}), retrying with raw completion",
            task.task_id
        );

        let terminal = |reason: String| PipelineError::Terminal {
            first_attempt: first_attempt.clone(),
            reason,
        };
        let text = provider
            .complete_raw(&fallback_request(&inputs))
            .await
            .map_err(|e| terminal(e.to_string()))?;
        let raw = recover_object(&text)
            .ok_or_else(|| terminal("no JSON object in raw completion".to_string()))?;
        tracing::debug!("task {}: recovered JSON from raw completion", task.task_id);

        match self.finish(&raw, task, player_text) {
            Ok(decision) => Ok(decision),
            // Constraint failures are about the task, not the attempt.
            Err(e @ PipelineError::UnsatisfiableConstraints(_)) => Err(e),
            Err(e) => Err(terminal(e.to_string())),
        }
    }

    /// Normalize, coerce and validate one candidate.
    fn finish(
        &self,
        raw: &Value,
        task: &TaskContext,
        player_text: &str,
    ) -> Result<DecisionParseOutput, PipelineError> {
        let normalized = normalize_decision(raw, task, player_text);
        let decision = coerce(normalized, self.scenario, task, &self.options)?;
        decision.validate()?;
        Ok(decision)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
