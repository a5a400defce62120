use serde::{Deserialize, Serialize};

/// Per-game policy toggles, as the game settings store them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameOptions {
    /// Mark surviving freeform effects as conservative (`limit_deltas: true`).
    pub limit_freeform_deltas: bool,
    /// Drop freeform effects entirely.
    pub strict_actions_only: bool,
}

/// Limits on how much context goes into a provider request.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_excerpts: usize,
    pub max_excerpt_chars: usize,
    /// Per entity type, in the id catalog embedded in the prompt.
    pub max_catalog_entries: usize,
}

impl PipelineConfig {
    pub fn new(max_excerpts: usize, max_excerpt_chars: usize, max_catalog_entries: usize) -> Self {
        Self {
            max_excerpts,
            max_excerpt_chars,
            max_catalog_entries,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(6, 1200, 40)
    }
}
