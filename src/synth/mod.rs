//! Deterministic decision synthesis.
//!
//! Produces a decision without any model: action kinds and parameters are
//! drawn from a stream seeded by `(seed, turn_index, task_id)`, so the same
//! triple always yields the same decision. The result is validated but not
//! coerced; callers coerce it like any other decision.

mod params;
pub mod tables;

use crate::config::GameOptions;
use crate::model::{
    ALTERNATIVE_LABEL, Action, ActionBundle, ActionKind, DecisionParseOutput, PRIMARY_LABEL,
    fallback_action,
};
use crate::policy::ActionPolicy;
use crate::scenario::Scenario;
use crate::seed::SeededStream;
use crate::task::TaskContext;

pub use params::draw_action;
use tables::{ALLOWED_WEIGHT, DEFAULT_POOL, DEFAULT_WEIGHT, SUGGESTED_WEIGHT};

const SYNTHESIZED_ASSUMPTION: &str =
    "No generated proposal was available; actions were drawn deterministically.";

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedDecision {
    pub decision: DecisionParseOutput,
    /// The primary and alternative actions, in bundle order.
    pub chosen_actions: Vec<Action>,
}

pub fn synthesize(
    task: &TaskContext,
    scenario: &Scenario,
    seed: u64,
    turn_index: u64,
) -> SynthesizedDecision {
    let mut stream = SeededStream::for_task(seed, turn_index, &task.task_id);
    let policy = ActionPolicy::new(&task.constraints, &GameOptions::default());
    let pool = candidate_pool(&policy);

    let primary_kind = stream.pick_weighted(&pool).copied();
    let rest: Vec<(ActionKind, u32)> = pool
        .iter()
        .copied()
        .filter(|(kind, _)| Some(*kind) != primary_kind)
        .collect();
    let secondary_kind = stream.pick_weighted(&rest).copied().or(primary_kind);

    let primary = build(primary_kind, &pool, &policy, task, scenario, &mut stream);
    let secondary = build(secondary_kind, &pool, &policy, task, scenario, &mut stream);

    let decision = DecisionParseOutput {
        task_id: task.task_id.clone(),
        intent_summary: intent(task),
        proposed_bundles: vec![
            ActionBundle::new(PRIMARY_LABEL, vec![primary.clone()]),
            ActionBundle::new(ALTERNATIVE_LABEL, vec![secondary.clone()]),
        ],
        clarifying_questions: Vec::new(),
        assumptions: vec![SYNTHESIZED_ASSUMPTION.to_string()],
        diagnostics: Vec::new(),
    };

    SynthesizedDecision {
        decision,
        chosen_actions: vec![primary, secondary],
    }
}

/// Suggested, then allowed, then the default list; first tier wins on
/// duplicates, and anything the policy rejects is removed.
fn candidate_pool(policy: &ActionPolicy) -> Vec<(ActionKind, u32)> {
    let tiers = [
        (policy.suggested().to_vec(), SUGGESTED_WEIGHT),
        (policy.allowed(), ALLOWED_WEIGHT),
        (DEFAULT_POOL.to_vec(), DEFAULT_WEIGHT),
    ];
    let mut pool: Vec<(ActionKind, u32)> = Vec::new();
    for (kinds, weight) in tiers {
        for kind in kinds {
            if !pool.iter().any(|(k, _)| *k == kind) {
                pool.push((kind, weight));
            }
        }
    }
    pool.retain(|(kind, _)| policy.permits(*kind));
    pool
}

/// Draw `kind`, then every other pool kind in pool order, until one fits the
/// scenario. The fallback committee is the last resort.
fn build(
    kind: Option<ActionKind>,
    pool: &[(ActionKind, u32)],
    policy: &ActionPolicy,
    task: &TaskContext,
    scenario: &Scenario,
    stream: &mut SeededStream,
) -> Action {
    let others = pool.iter().map(|(k, _)| *k).filter(|k| Some(*k) != kind);
    for candidate in kind.into_iter().chain(others) {
        match draw_action(candidate, scenario, &task.prompt, stream) {
            Ok(action) => return action,
            Err(reason) => {
                tracing::debug!("task {}: cannot synthesize {candidate}: {reason}", task.task_id);
            }
        }
    }
    if policy.is_forbidden(ActionKind::CreateCommittee) {
        tracing::warn!(
            "task {}: no admissible action fits the scenario and the fallback committee is forbidden",
            task.task_id
        );
    }
    fallback_action(&task.prompt)
}

fn intent(task: &TaskContext) -> String {
    let prompt = task.prompt.trim();
    if prompt.is_empty() {
        "Routine governance".to_string()
    } else {
        format!("Respond to: {prompt}")
    }
}
