use serde::{Deserialize, Serialize};

use super::action::{Action, CreateCommitteeParams};
use crate::error::ValidationError;

pub const PRIMARY_LABEL: &str = "A";
pub const ALTERNATIVE_LABEL: &str = "B: Alternative";
pub const FALLBACK_DURATION_WEEKS: u32 = 4;
/// Characters of the prompt quoted in a fallback committee's name.
const FALLBACK_NAME_CHARS: usize = 60;

/// One coherent course of action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBundle {
    pub label: String,
    pub actions: Vec<Action>,
    #[serde(default)]
    pub tradeoffs: Vec<String>,
}

impl ActionBundle {
    pub fn new(label: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            label: label.into(),
            actions,
            tradeoffs: Vec::new(),
        }
    }

    /// A bundle holding only the fallback committee for `prompt`.
    pub fn fallback(label: impl Into<String>, prompt: &str) -> Self {
        Self::new(label, vec![fallback_action(prompt)])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStage {
    Normalize,
    Coerce,
}

/// Record of an action that was dropped or rewritten on the way through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub bundle: String,
    pub stage: DiagnosticStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    pub reason: String,
}

/// Two alternative bundles for one task: "A" is the faithful reading of the
/// player's intent, "B" the conservative alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionParseOutput {
    pub task_id: String,
    pub intent_summary: String,
    pub proposed_bundles: Vec<ActionBundle>,
    #[serde(default)]
    pub clarifying_questions: Vec<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl DecisionParseOutput {
    /// Check the output invariants: exactly two bundles, none empty, every
    /// action valid for its kind.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.proposed_bundles.len() != 2 {
            return Err(ValidationError::BundleCount(self.proposed_bundles.len()));
        }
        for bundle in &self.proposed_bundles {
            if bundle.actions.is_empty() {
                return Err(ValidationError::EmptyBundle(bundle.label.clone()));
            }
            for action in &bundle.actions {
                action
                    .validate()
                    .map_err(|reason| ValidationError::InvalidAction {
                        bundle: bundle.label.clone(),
                        reason,
                    })?;
            }
        }
        Ok(())
    }

    /// All actions across both bundles, in order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.proposed_bundles.iter().flat_map(|b| b.actions.iter())
    }
}

/// The action that fills a bundle nothing else survived in: a committee
/// charged with the task's prompt, no budget, four weeks.
pub fn fallback_action(prompt: &str) -> Action {
    let prompt = prompt.trim();
    let (name, mandate) = if prompt.is_empty() {
        (
            "Committee on the matter at hand".to_string(),
            "Review the matter at hand and report back".to_string(),
        )
    } else {
        let excerpt: String = prompt.chars().take(FALLBACK_NAME_CHARS).collect();
        let ellipsis = if prompt.chars().count() > FALLBACK_NAME_CHARS {
            "..."
        } else {
            ""
        };
        (format!("Committee on {excerpt}{ellipsis}"), prompt.to_string())
    };
    Action::CreateCommittee(CreateCommitteeParams {
        name,
        mandate,
        budget: 0.0,
        duration_weeks: FALLBACK_DURATION_WEEKS,
        office_id: None,
        chair_character_id: None,
    })
}
