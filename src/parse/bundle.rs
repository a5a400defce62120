//! Bundle structural normalization.
//!
//! Reconciles whatever bundle layout the model produced into exactly two
//! non-empty [`ActionBundle`]s. Shape problems are repaired, never reported
//! as errors; dropped actions are recorded as diagnostics.

use serde_json::{Map, Value};

use super::action::normalize_action_with_reason;
use super::probe::Probe;
use crate::model::{
    ALTERNATIVE_LABEL, ActionBundle, DecisionParseOutput, Diagnostic, DiagnosticStage,
    PRIMARY_LABEL, fallback_action,
};
use crate::task::TaskContext;

/// Longest intent summary derived from the player's text.
pub const INTENT_SUMMARY_MAX_CHARS: usize = 200;

const BUNDLES: Probe = Probe::new(
    "bundle list",
    &["proposed_bundles", "proposedBundles", "bundles", "options"],
);
const PAIRS: &[(&str, &str)] = &[
    ("bundle_a", "bundle_b"),
    ("bundleA", "bundleB"),
    ("bundle_A", "bundle_B"),
    ("option_a", "option_b"),
    ("A", "B"),
];
const LABEL: Probe = Probe::new("label", &["label", "name", "title"]);
const ACTIONS: Probe = Probe::new("action list", &["actions", "action_list", "steps", "commands"]);
const TRADEOFFS: Probe = Probe::new("tradeoffs", &["tradeoffs", "trade_offs", "risks"]);
const INTENT: Probe = Probe::new(
    "intent summary",
    &["intent_summary", "intentSummary", "summary", "intent"],
);
const QUESTIONS: Probe = Probe::new("clarifying questions", &["clarifying_questions", "questions"]);
const ASSUMPTIONS: Probe = Probe::new("assumptions", &["assumptions"]);

/// Normalize a raw candidate decision. Total: any JSON value produces a
/// decision with exactly two non-empty bundles.
pub fn normalize_decision(raw: &Value, task: &TaskContext, player_text: &str) -> DecisionParseOutput {
    let empty = Map::new();
    let root = raw.as_object().unwrap_or(&empty);

    let mut diagnostics = Vec::new();
    let mut bundles: Vec<ActionBundle> = candidate_bundles(raw)
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| {
            normalize_bundle(candidate, default_label(position), &task.prompt, &mut diagnostics)
        })
        .collect();

    match bundles.len() {
        0 => {
            tracing::debug!("task {}: no bundles in candidate, using fallbacks", task.task_id);
            bundles.push(ActionBundle::fallback(PRIMARY_LABEL, &task.prompt));
            bundles.push(ActionBundle::fallback(ALTERNATIVE_LABEL, &task.prompt));
        }
        1 => {
            let mut alternative = bundles[0].clone();
            alternative.label = ALTERNATIVE_LABEL.to_string();
            bundles.push(alternative);
        }
        2 => {}
        n => {
            tracing::debug!("task {}: keeping 2 of {n} bundles", task.task_id);
            bundles.truncate(2);
        }
    }

    DecisionParseOutput {
        task_id: task.task_id.clone(),
        intent_summary: INTENT
            .find_str(root)
            .map(str::to_string)
            .unwrap_or_else(|| default_intent(task, player_text)),
        proposed_bundles: bundles,
        clarifying_questions: QUESTIONS.find_strings(root),
        assumptions: ASSUMPTIONS.find_strings(root),
        diagnostics,
    }
}

fn default_label(position: usize) -> &'static str {
    if position == 0 {
        PRIMARY_LABEL
    } else {
        ALTERNATIVE_LABEL
    }
}

/// Candidate bundles in order: a top-level array, a bundle list, a lettered
/// pair, or the root itself when it carries an action list.
fn candidate_bundles(raw: &Value) -> Vec<&Value> {
    let obj = match raw {
        Value::Array(items) => return items.iter().collect(),
        Value::Object(obj) => obj,
        _ => return Vec::new(),
    };

    if let Some((_, list)) = BUNDLES.find_where(obj, Value::is_array) {
        return list.as_array().map(|items| items.iter().collect()).unwrap_or_default();
    }

    for (a, b) in PAIRS {
        let pair: Vec<&Value> = [obj.get(*a), obj.get(*b)]
            .into_iter()
            .flatten()
            .filter(|v| !v.is_null())
            .collect();
        if !pair.is_empty() {
            return pair;
        }
    }

    if ACTIONS.find(obj).is_some() {
        return vec![raw];
    }
    Vec::new()
}

fn normalize_bundle(
    candidate: &Value,
    default: &str,
    prompt: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> ActionBundle {
    let empty = Map::new();
    let (obj, raw_actions): (&Map<String, Value>, Vec<&Value>) = match candidate {
        // A bare list of actions.
        Value::Array(items) => (&empty, items.iter().collect()),
        Value::Object(obj) => (obj, action_candidates(obj)),
        _ => (&empty, Vec::new()),
    };
    let label = LABEL.find_str(obj).unwrap_or(default).to_string();

    let mut actions = Vec::new();
    for raw in raw_actions {
        match normalize_action_with_reason(raw) {
            Ok(action) => actions.push(action),
            Err(rejection) => {
                tracing::debug!("bundle {label:?}: dropped action: {}", rejection.reason);
                diagnostics.push(Diagnostic {
                    bundle: label.clone(),
                    stage: DiagnosticStage::Normalize,
                    action_type: rejection.action_type.map(|k| k.to_string()),
                    reason: rejection.reason,
                });
            }
        }
    }
    if actions.is_empty() {
        actions.push(fallback_action(prompt));
    }

    ActionBundle {
        label,
        actions,
        tradeoffs: TRADEOFFS.find_strings(obj),
    }
}

fn action_candidates(obj: &Map<String, Value>) -> Vec<&Value> {
    match ACTIONS.find(obj).map(|(_, v)| v) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) if single.is_object() => vec![single],
        _ => Vec::new(),
    }
}

fn default_intent(task: &TaskContext, player_text: &str) -> String {
    let source = task
        .last_player_message(player_text)
        .unwrap_or_else(|| task.prompt.trim());
    source.chars().take(INTENT_SUMMARY_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, ActionKind};
    use serde_json::json;

    fn task() -> TaskContext {
        TaskContext::new("t1", "Secure the northern border")
    }

    fn envoy(tone: &str) -> Value {
        json!({"type": "send_envoy", "target_nation_id": "n2", "tone": tone})
    }

    #[test]
    fn lettered_pair_becomes_two_bundles() {
        let raw = json!({
            "bundle_a": {"label": "Talk", "actions": [envoy("firm")]},
            "bundle_b": {"label": "Wait", "actions": [{"type": "fortify_province", "province_id": "p1", "budget": 50}]},
        });
        let out = normalize_decision(&raw, &task(), "");
        assert_eq!(out.proposed_bundles.len(), 2);
        assert_eq!(out.proposed_bundles[0].label, "Talk");
        assert_eq!(out.proposed_bundles[1].label, "Wait");
        assert_eq!(out.proposed_bundles[1].actions[0].kind(), ActionKind::FortifyProvince);
        assert!(out.validate().is_ok());
    }

    #[test]
    fn single_bundle_is_duplicated_as_alternative() {
        let raw = json!({"bundles": [{"actions": [envoy("firm")]}]});
        let out = normalize_decision(&raw, &task(), "");
        assert_eq!(out.proposed_bundles[0].label, PRIMARY_LABEL);
        assert_eq!(out.proposed_bundles[1].label, ALTERNATIVE_LABEL);
        assert_eq!(out.proposed_bundles[0].actions, out.proposed_bundles[1].actions);
        let params = out.proposed_bundles[0].actions[0].params_value();
        assert_eq!(params["message_tone"], "firm");
    }

    #[test]
    fn empty_candidate_yields_two_fallbacks() {
        let out = normalize_decision(&json!({}), &task(), "");
        assert_eq!(out.proposed_bundles.len(), 2);
        for bundle in &out.proposed_bundles {
            assert_eq!(bundle.actions.len(), 1);
            let Action::CreateCommittee(p) = &bundle.actions[0] else {
                panic!("expected fallback committee");
            };
            assert_eq!(p.mandate, "Secure the northern border");
        }
        assert!(out.validate().is_ok());
    }

    #[test]
    fn non_object_candidates_still_produce_two_bundles() {
        for raw in [json!(null), json!("text"), json!(42), json!([])] {
            let out = normalize_decision(&raw, &task(), "");
            assert!(out.validate().is_ok(), "{raw}");
        }
    }

    #[test]
    fn extra_bundles_are_truncated() {
        let raw = json!([
            {"label": "one", "actions": [envoy("firm")]},
            {"label": "two", "actions": [envoy("friendly")]},
            {"label": "three", "actions": [envoy("hostile")]},
        ]);
        let out = normalize_decision(&raw, &task(), "");
        let labels: Vec<_> = out.proposed_bundles.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["one", "two"]);
    }

    #[test]
    fn invalid_actions_are_dropped_and_recorded() {
        let raw = json!({"proposed_bundles": [
            {"label": "A", "actions": [
                {"type": "teleport_army"},
                {"type": "declare_war"},
                envoy("firm"),
            ]},
            {"label": "B", "actions": [{"type": "nonsense"}]},
        ]});
        let out = normalize_decision(&raw, &task(), "");
        assert_eq!(out.proposed_bundles[0].actions.len(), 1);
        assert_eq!(out.proposed_bundles[1].actions[0].kind(), ActionKind::CreateCommittee);
        assert_eq!(out.diagnostics.len(), 3);
        assert_eq!(out.diagnostics[1].action_type.as_deref(), Some("declare_war"));
        assert!(out.diagnostics.iter().all(|d| d.stage == DiagnosticStage::Normalize));
    }

    #[test]
    fn alternate_spellings_for_lists_and_metadata() {
        let raw = json!({
            "intentSummary": "Open talks",
            "questions": "Which envoy?",
            "options": [
                {"title": "Envoy", "steps": envoy("friendly"), "risks": ["snub"]},
                {"name": "Tax", "commands": [{"action": "adjust tax rate", "rate": 0.1}]},
            ],
        });
        let out = normalize_decision(&raw, &task(), "");
        assert_eq!(out.intent_summary, "Open talks");
        assert_eq!(out.clarifying_questions, vec!["Which envoy?"]);
        assert_eq!(out.proposed_bundles[0].label, "Envoy");
        assert_eq!(out.proposed_bundles[0].tradeoffs, vec!["snub"]);
        assert_eq!(out.proposed_bundles[1].actions[0].kind(), ActionKind::AdjustTaxRate);
    }

    #[test]
    fn intent_defaults_to_player_text_then_prompt() {
        let out = normalize_decision(&json!({}), &task(), "send a firm envoy");
        assert_eq!(out.intent_summary, "send a firm envoy");

        let out = normalize_decision(&json!({}), &task(), "");
        assert_eq!(out.intent_summary, "Secure the northern border");

        let long = "y".repeat(INTENT_SUMMARY_MAX_CHARS + 50);
        let out = normalize_decision(&json!({}), &task(), &long);
        assert_eq!(out.intent_summary.chars().count(), INTENT_SUMMARY_MAX_CHARS);
    }

    #[test]
    fn task_id_comes_from_the_task() {
        let raw = json!({"task_id": "other", "actions": [envoy("firm")]});
        let out = normalize_decision(&raw, &task(), "");
        assert_eq!(out.task_id, "t1");
        assert_eq!(out.proposed_bundles[0].actions[0].kind(), ActionKind::SendEnvoy);
    }
}
