//! Provider request construction.

use serde_json::{Value, json};

use super::provider::ProviderRequest;
use crate::config::PipelineConfig;
use crate::model::action::{
    BudgetCategory, EspionageOperation, MessageTone, ProjectType, TreatyType, UnitType,
};
use crate::model::{ActionKind, canonical_fields};
use crate::policy::ActionPolicy;
use crate::scenario::{Scenario, ScenarioEntity};
use crate::task::TaskContext;

pub const SCHEMA_NAME: &str = "decision_parse_output";

const SYSTEM_PREAMBLE: &str = "You are the chancery of a realm in a grand-strategy game. \
Turn the ruler's instruction into exactly two alternative bundles of concrete actions. \
Bundle \"A\" is the faithful reading of the instruction; bundle \"B: Alternative\" is a \
more conservative course. Use only the listed action types and only the listed entity ids.";

const RAW_JSON_INSTRUCTION: &str = "Return ONLY a raw JSON object with the keys \
intent_summary, proposed_bundles, clarifying_questions and assumptions. \
Each bundle is {\"label\", \"actions\": [{\"type\", \"params\"}], \"tradeoffs\"}. \
No markdown, no code fences, no commentary.";

/// Everything a request is built from.
pub struct PromptInputs<'a> {
    pub task: &'a TaskContext,
    pub scenario: &'a Scenario,
    pub policy: &'a ActionPolicy,
    pub player_text: &'a str,
    pub config: &'a PipelineConfig,
}

/// The structured-output request: full context plus the decision schema.
pub fn build_request(inputs: &PromptInputs<'_>) -> ProviderRequest {
    ProviderRequest {
        system: SYSTEM_PREAMBLE.to_string(),
        prompt: render_prompt(inputs),
        schema: Some(decision_schema(inputs.policy)),
        schema_name: SCHEMA_NAME.to_string(),
    }
}

/// The raw-completion retry: same context, no schema, an explicit
/// JSON-only instruction.
pub fn fallback_request(inputs: &PromptInputs<'_>) -> ProviderRequest {
    ProviderRequest {
        system: format!("{SYSTEM_PREAMBLE}\n\n{RAW_JSON_INSTRUCTION}"),
        prompt: format!("{}\n\n{RAW_JSON_INSTRUCTION}", render_prompt(inputs)),
        schema: None,
        schema_name: SCHEMA_NAME.to_string(),
    }
}

/// JSON schema for a decision whose action types are limited to what the
/// policy permits.
pub fn decision_schema(policy: &ActionPolicy) -> Value {
    let mut kinds: Vec<&str> = policy
        .permitted_kinds()
        .into_iter()
        .map(|k| k.as_str())
        .collect();
    // An allow-list of unrecognized names still admits the backfill committee.
    if kinds.is_empty() && !policy.is_forbidden(ActionKind::CreateCommittee) {
        kinds.push(ActionKind::CreateCommittee.as_str());
    }
    let strings = json!({"type": "array", "items": {"type": "string"}});
    json!({
        "type": "object",
        "required": ["intent_summary", "proposed_bundles"],
        "properties": {
            "intent_summary": {"type": "string"},
            "proposed_bundles": {
                "type": "array",
                "minItems": 2,
                "maxItems": 2,
                "items": {
                    "type": "object",
                    "required": ["label", "actions"],
                    "properties": {
                        "label": {"type": "string"},
                        "actions": {
                            "type": "array",
                            "minItems": 1,
                            "items": {
                                "type": "object",
                                "required": ["type", "params"],
                                "properties": {
                                    "type": {"type": "string", "enum": kinds},
                                    "params": {"type": "object"},
                                },
                            },
                        },
                        "tradeoffs": strings,
                    },
                },
            },
            "clarifying_questions": strings,
            "assumptions": strings,
        },
    })
}

fn render_prompt(inputs: &PromptInputs<'_>) -> String {
    let PromptInputs {
        task,
        scenario,
        policy,
        player_text,
        config,
    } = inputs;
    let mut lines = vec![format!("Task: {}", task.prompt.trim())];

    if let Some(message) = task.last_player_message(player_text) {
        lines.push(format!("Ruler's instruction: {message}"));
    }

    let allowed = policy.allowed();
    if !allowed.is_empty() {
        lines.push(format!("Allowed action types: {}", join_kinds(&allowed)));
    }
    if !policy.suggested().is_empty() {
        lines.push(format!("Suggested action types: {}", join_kinds(policy.suggested())));
    }
    let forbidden = policy.forbidden();
    if !forbidden.is_empty() {
        lines.push(format!("Forbidden action types: {}", join_kinds(&forbidden)));
    }
    if !task.constraints.notes.is_empty() {
        lines.push("Notes:".to_string());
        lines.extend(task.constraints.notes.iter().map(|n| format!("- {n}")));
    }

    lines.push(String::new());
    lines.push("Action catalog:".to_string());
    for kind in policy.permitted_kinds() {
        lines.push(catalog_line(kind));
    }

    lines.push(String::new());
    lines.push("Known entities (name: id):".to_string());
    let limit = config.max_catalog_entries;
    render_entities(&mut lines, "Nations", &scenario.nations, limit, |e| {
        (e.id == scenario.player_nation_id).then_some("your realm")
    });
    render_entities(&mut lines, "Provinces", &scenario.provinces, limit, |e| {
        (e.id == scenario.home_province_id).then_some("home")
    });
    render_entities(&mut lines, "Offices", &scenario.offices, limit, |e| {
        (e.id == scenario.home_office_id).then_some("your office")
    });
    render_entities(&mut lines, "Characters", &scenario.characters, limit, |_| None);

    let excerpts: Vec<&String> = task
        .source_excerpts
        .iter()
        .filter(|e| !e.trim().is_empty())
        .take(config.max_excerpts)
        .collect();
    if !excerpts.is_empty() {
        lines.push(String::new());
        lines.push("Source excerpts:".to_string());
        for (i, excerpt) in excerpts.into_iter().enumerate() {
            let text: String = excerpt.trim().chars().take(config.max_excerpt_chars).collect();
            lines.push(format!("[{}] {text}", i + 1));
        }
    }

    lines.join("\n")
}

fn join_kinds(kinds: &[ActionKind]) -> String {
    kinds.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
}

/// `send_envoy(target_nation_id, message_tone: friendly|neutral|..., ...)`
fn catalog_line(kind: ActionKind) -> String {
    let fields: Vec<String> = canonical_fields(kind)
        .iter()
        .filter(|f| **f != "limit_deltas")
        .map(|f| match choice_values(f) {
            Some(values) => format!("{f}: {}", values.join("|")),
            None => f.to_string(),
        })
        .collect();
    format!("- {kind}({})", fields.join(", "))
}

fn choice_values(field: &str) -> Option<Vec<&'static str>> {
    fn names<T: Copy>(all: &[T], as_str: fn(&T) -> &'static str) -> Vec<&'static str> {
        all.iter().map(as_str).collect()
    }
    let values = match field {
        "message_tone" => names(MessageTone::ALL, MessageTone::as_str),
        "treaty_type" => names(TreatyType::ALL, TreatyType::as_str),
        "category" => names(BudgetCategory::ALL, BudgetCategory::as_str),
        "unit_type" => names(UnitType::ALL, UnitType::as_str),
        "project_type" => names(ProjectType::ALL, ProjectType::as_str),
        "operation" => names(EspionageOperation::ALL, EspionageOperation::as_str),
        _ => return None,
    };
    Some(values)
}

fn render_entities(
    lines: &mut Vec<String>,
    heading: &str,
    entities: &[ScenarioEntity],
    limit: usize,
    tag: impl Fn(&ScenarioEntity) -> Option<&'static str>,
) {
    if entities.is_empty() {
        return;
    }
    lines.push(format!("{heading}:"));
    for entity in entities.iter().take(limit) {
        let name = if entity.name.is_empty() { "(unnamed)" } else { entity.name.as_str() };
        match tag(entity) {
            Some(tag) => lines.push(format!("- {name}: {} ({tag})", entity.id)),
            None => lines.push(format!("- {name}: {}", entity.id)),
        }
    }
    if entities.len() > limit {
        lines.push(format!("- ... {} more", entities.len() - limit));
    }
}
