use serde::{Deserialize, Serialize};

/// Caller-declared limits on which actions a decision may contain.
///
/// Entries are action type names as the caller wrote them; they are parsed
/// loosely when a [`crate::policy::ActionPolicy`] is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConstraints {
    pub allowed_action_types: Vec<String>,
    pub suggested_action_types: Vec<String>,
    pub forbidden_action_types: Vec<String>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn is_player(&self) -> bool {
        matches!(self.role.as_str(), "player" | "user")
    }
}

/// The task a decision is being produced for. Read-only to this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskContext {
    pub task_id: String,
    pub prompt: String,
    pub constraints: TaskConstraints,
    pub history: Vec<ChatMessage>,
    /// Scenario source passages relevant to the prompt.
    pub source_excerpts: Vec<String>,
}

impl TaskContext {
    pub fn new(task_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_constraints(mut self, constraints: TaskConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// The most recent player message: `player_text` when it is not blank,
    /// otherwise the last player entry in the history.
    pub fn last_player_message<'a>(&'a self, player_text: &'a str) -> Option<&'a str> {
        if !player_text.trim().is_empty() {
            return Some(player_text.trim());
        }
        self.history
            .iter()
            .rev()
            .find(|m| m.is_player() && !m.content.trim().is_empty())
            .map(|m| m.content.trim())
    }
}
