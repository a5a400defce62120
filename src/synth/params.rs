//! Parameter drawing for synthesized actions.
//!
//! Every value comes from the task's stream; nothing is fixed except the
//! ranges in [`super::tables`]. Built parameters pass through
//! [`Action::from_parts`] like any parsed action.

use std::fmt::Display;

use serde_json::{Map, Value, json};

use super::tables::*;
use crate::model::Action;
use crate::model::ActionKind;
use crate::model::action::{
    BudgetCategory, EspionageOperation, MessageTone, ProjectType, TreatyType, UnitType,
};
use crate::scenario::{Scenario, ScenarioEntity};
use crate::seed::SeededStream;

const MANDATE_EXCERPT_CHARS: usize = 40;
const DEFAULT_MANDATE: &str = "Advise the crown on the affairs of the realm";

/// Draw a complete, validated action of `kind`. Fails when the scenario
/// lacks the entities the kind needs to reference.
pub fn draw_action(
    kind: ActionKind,
    scenario: &Scenario,
    prompt: &str,
    stream: &mut SeededStream,
) -> Result<Action, String> {
    let params = match draw_params(kind, scenario, prompt, stream)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Action::from_parts(kind, params)
}

fn draw_params(
    kind: ActionKind,
    scenario: &Scenario,
    prompt: &str,
    s: &mut SeededStream,
) -> Result<Value, String> {
    let params = match kind {
        ActionKind::SendEnvoy => json!({
            "target_nation_id": foreign_nation(scenario, s)?,
            "message_tone": choice(s, MessageTone::ALL),
            "message": text(s, ENVOY_MESSAGES),
        }),
        ActionKind::ProposeTreaty => json!({
            "target_nation_id": foreign_nation(scenario, s)?,
            "treaty_type": choice(s, TreatyType::ALL),
        }),
        ActionKind::DeclareWar => json!({
            "target_nation_id": foreign_nation(scenario, s)?,
        }),
        ActionKind::SueForPeace => json!({
            "target_nation_id": foreign_nation(scenario, s)?,
        }),
        ActionKind::ImposeSanctions => json!({
            "target_nation_id": foreign_nation(scenario, s)?,
            "severity": rate(s, (0.1, 0.9)),
            "rationale": text(s, RATIONALES),
        }),
        ActionKind::BrokerAgreement => {
            let (acting, target) = distinct_pair(&foreign_entities(scenario), s)
                .ok_or("brokering needs two foreign nations")?;
            json!({
                "acting_nation_id": acting,
                "target_nation_id": target,
                "terms": text(s, RATIONALES),
            })
        }
        ActionKind::AdjustTaxRate => json!({
            "new_tax_rate": rate(s, TAX_RATE),
            "rationale": text(s, RATIONALES),
        }),
        ActionKind::AllocateBudget => json!({
            "category": choice(s, BudgetCategory::ALL),
            "amount": budget(s, LARGE_BUDGET),
            "rationale": text(s, RATIONALES),
        }),
        ActionKind::IssueBonds => json!({
            "amount": budget(s, LARGE_BUDGET),
            "interest_rate": rate(s, INTEREST_RATE),
            "term_years": s.range_u32(BOND_YEARS.0, BOND_YEARS.1),
        }),
        ActionKind::SetTariff => json!({
            "tariff_rate": rate(s, TARIFF_RATE),
            "target_nation_id": foreign_nation(scenario, s).ok(),
        }),
        ActionKind::MobilizeForces => json!({
            "province_id": province(scenario, s)?,
            "troops": s.range_u32(TROOPS.0, TROOPS.1),
            "readiness": rate(s, (0.3, 1.0)),
        }),
        ActionKind::MoveTroops => {
            let (from, to) =
                distinct_pair(&scenario.provinces, s).ok_or("moving troops needs two provinces")?;
            json!({
                "from_province_id": from,
                "to_province_id": to,
                "troops": s.range_u32(TROOPS.0, TROOPS.1),
            })
        }
        ActionKind::FortifyProvince => json!({
            "province_id": province(scenario, s)?,
            "budget": budget(s, SMALL_BUDGET),
        }),
        ActionKind::LaunchOffensive => json!({
            "target_nation_id": foreign_nation(scenario, s)?,
            "target_province_id": province(scenario, s)?,
            "troops": s.range_u32(TROOPS.0, TROOPS.1),
        }),
        ActionKind::RecruitUnits => json!({
            "province_id": province(scenario, s)?,
            "unit_type": choice(s, UnitType::ALL),
            "count": s.range_u32(UNIT_COUNT.0, UNIT_COUNT.1),
            "budget": budget(s, SMALL_BUDGET),
        }),
        ActionKind::BuildInfrastructure => json!({
            "province_id": province(scenario, s)?,
            "project_type": choice(s, ProjectType::ALL),
            "budget": budget(s, LARGE_BUDGET),
            "duration_weeks": s.range_u32(PROJECT_WEEKS.0, PROJECT_WEEKS.1),
        }),
        ActionKind::EnactPolicy => json!({
            "policy_name": text(s, POLICY_NAMES),
            "description": mandate(prompt),
            "budget": budget(s, SMALL_BUDGET),
        }),
        ActionKind::HoldFestival => json!({
            "province_id": province(scenario, s)?,
            "budget": budget(s, SMALL_BUDGET),
        }),
        ActionKind::SuppressUnrest => json!({
            "province_id": province(scenario, s)?,
            "force_level": rate(s, (0.1, 0.8)),
        }),
        ActionKind::IssueDecree => json!({
            "title": text(s, DECREE_TITLES),
            "text": mandate(prompt),
        }),
        ActionKind::ConductEspionage => json!({
            "target_nation_id": foreign_nation(scenario, s)?,
            "operation": choice(s, EspionageOperation::ALL),
            "budget": budget(s, SMALL_BUDGET),
        }),
        ActionKind::CounterIntelligence => json!({
            "budget": budget(s, SMALL_BUDGET),
            "province_id": province(scenario, s).ok(),
        }),
        ActionKind::SurveilCharacter => json!({
            "character_id": entity(&scenario.characters, s, "character")?,
            "budget": budget(s, SMALL_BUDGET),
        }),
        ActionKind::CreateCommittee => {
            let office = if s.chance(0.5) {
                entity(&scenario.offices, s, "office").ok()
            } else {
                None
            };
            let chair = office.as_deref().and_then(|o| scenario.appointee(o));
            json!({
                "name": format!("{} on {}", text(s, COMMITTEE_SUBJECTS), excerpt(prompt)),
                "mandate": mandate(prompt),
                "budget": budget(s, SMALL_BUDGET),
                "duration_weeks": s.range_u32(COMMITTEE_WEEKS.0, COMMITTEE_WEEKS.1),
                "office_id": office,
                "chair_character_id": chair,
            })
        }
        ActionKind::AppointOfficial => json!({
            "office_id": entity(&scenario.offices, s, "office")?,
            "character_id": entity(&scenario.characters, s, "character")?,
        }),
        ActionKind::DismissOfficial => {
            let office = entity(&scenario.offices, s, "office")?;
            let holder = scenario.appointee(&office);
            json!({ "office_id": office, "character_id": holder })
        }
        ActionKind::FreeformEffect => {
            let relation = foreign_nation(scenario, s).ok().filter(|_| s.chance(0.5));
            let relation_deltas: Vec<Value> = relation
                .into_iter()
                .map(|nation| {
                    let delta = s.range_f64(-RELATION_SHIFT, RELATION_SHIFT).round();
                    json!({"nation_id": nation, "delta": delta})
                })
                .collect();
            json!({
                "description": text(s, FREEFORM_EVENTS),
                "stability_delta": rate(s, (-EFFECT_DELTA, EFFECT_DELTA)),
                "legitimacy_delta": rate(s, (-EFFECT_DELTA, EFFECT_DELTA)),
                "relation_deltas": relation_deltas,
            })
        }
    };
    Ok(params)
}

fn budget(s: &mut SeededStream, (low, high): (f64, f64)) -> f64 {
    s.range_f64(low, high).round()
}

/// A fraction rounded to hundredths.
fn rate(s: &mut SeededStream, (low, high): (f64, f64)) -> f64 {
    (s.range_f64(low, high) * 100.0).round() / 100.0
}

fn text(s: &mut SeededStream, items: &[&str]) -> String {
    s.pick(items).map(|t| t.to_string()).unwrap_or_default()
}

fn choice<T: Display>(s: &mut SeededStream, all: &[T]) -> String {
    s.pick(all).map(T::to_string).unwrap_or_default()
}

fn entity(list: &[ScenarioEntity], s: &mut SeededStream, what: &str) -> Result<String, String> {
    s.pick(list)
        .map(|e| e.id.clone())
        .ok_or_else(|| format!("scenario has no {what}"))
}

fn province(scenario: &Scenario, s: &mut SeededStream) -> Result<String, String> {
    entity(&scenario.provinces, s, "province")
}

fn foreign_entities(scenario: &Scenario) -> Vec<ScenarioEntity> {
    scenario.foreign_nations().cloned().collect()
}

fn foreign_nation(scenario: &Scenario, s: &mut SeededStream) -> Result<String, String> {
    entity(&foreign_entities(scenario), s, "foreign nation")
}

/// Two different entities, or `None` when fewer than two exist.
fn distinct_pair(list: &[ScenarioEntity], s: &mut SeededStream) -> Option<(String, String)> {
    if list.len() < 2 {
        return None;
    }
    let first = s.range_u32(0, list.len() as u32 - 1) as usize;
    let offset = s.range_u32(1, list.len() as u32 - 1) as usize;
    let second = (first + offset) % list.len();
    Some((list[first].id.clone(), list[second].id.clone()))
}

fn excerpt(prompt: &str) -> String {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return "the affairs of the realm".to_string();
    }
    prompt.chars().take(MANDATE_EXCERPT_CHARS).collect()
}

fn mandate(prompt: &str) -> String {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        DEFAULT_MANDATE.to_string()
    } else {
        prompt.to_string()
    }
}
