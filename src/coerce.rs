//! Scenario referential coercion.
//!
//! Filters a normalized decision against the task's policy and rewrites every
//! identifier so the simulation only ever sees entities that exist. Dropped
//! and rewritten actions are recorded as [`Diagnostic`]s.

use crate::config::GameOptions;
use crate::error::PipelineError;
use crate::model::{
    Action, ActionKind, DecisionParseOutput, Diagnostic, DiagnosticStage, fallback_action,
};
use crate::policy::{ActionPolicy, Rejection};
use crate::scenario::Scenario;
use crate::task::TaskContext;

/// Which entity set an identifier field must belong to.
#[derive(Debug, Clone, Copy)]
enum Target<'o> {
    /// Any known nation other than the player's.
    ForeignNation,
    Nation,
    Province,
    Office,
    /// Falls back to whoever holds `office`, then to the first character.
    Character { office: Option<&'o str> },
}

/// Collects the rewrites made to one action.
struct Repairer<'a> {
    scenario: &'a Scenario,
    rewrites: Vec<String>,
}

impl<'a> Repairer<'a> {
    fn new(scenario: &'a Scenario) -> Self {
        Self {
            scenario,
            rewrites: Vec::new(),
        }
    }

    fn is_valid(&self, target: Target<'_>, id: &str) -> bool {
        let s = self.scenario;
        match target {
            Target::ForeignNation => s.is_foreign_nation(id),
            Target::Nation => s.has_nation(id),
            Target::Province => s.has_province(id),
            Target::Office => s.has_office(id),
            Target::Character { .. } => s.has_character(id),
        }
    }

    fn fallback(&self, target: Target<'_>) -> Option<&'a str> {
        let s: &'a Scenario = self.scenario;
        match target {
            Target::ForeignNation | Target::Nation => s.first_foreign_nation(),
            Target::Province => s.fallback_province(),
            Target::Office => s.fallback_office(),
            Target::Character { office } => office
                .and_then(|o| s.appointee(o))
                .or_else(|| s.first_character()),
        }
    }

    /// A required reference: repaired, or the action cannot stand.
    fn required(&mut self, field: &str, target: Target<'_>, value: &mut String) -> Result<(), String> {
        if self.is_valid(target, value) {
            return Ok(());
        }
        let replacement = self
            .fallback(target)
            .ok_or_else(|| format!("{field}: {value:?} is unknown and the scenario has no replacement"))?;
        self.rewrite(field, value, replacement);
        Ok(())
    }

    /// An optional reference: repaired when possible, otherwise cleared.
    fn optional(&mut self, field: &str, target: Target<'_>, value: &mut Option<String>) {
        let Some(current) = value.as_mut() else {
            return;
        };
        if self.is_valid(target, current) {
            return;
        }
        match self.fallback(target) {
            Some(replacement) => self.rewrite(field, current, replacement),
            None => {
                self.rewrites.push(format!("{field}: cleared unknown {current:?}"));
                *value = None;
            }
        }
    }

    /// Fill an empty character slot with the holder of a valid office.
    fn fill_appointee(&mut self, field: &str, office: Option<&str>, value: &mut Option<String>) {
        if value.is_some() {
            return;
        }
        let holder = office
            .filter(|o| self.scenario.has_office(o))
            .and_then(|o| self.scenario.appointee(o));
        if let Some(holder) = holder {
            self.rewrites.push(format!("{field}: filled with office holder {holder:?}"));
            *value = Some(holder.to_string());
        }
    }

    fn rewrite(&mut self, field: &str, value: &mut String, replacement: &str) {
        self.rewrites
            .push(format!("{field}: {value:?} replaced with {replacement:?}"));
        *value = replacement.to_string();
    }
}

/// Apply policy and referential repair to every bundle.
///
/// Fails only when a bundle is left empty and the task explicitly forbids
/// the fallback committee.
pub fn coerce(
    mut decision: DecisionParseOutput,
    scenario: &Scenario,
    task: &TaskContext,
    options: &GameOptions,
) -> Result<DecisionParseOutput, PipelineError> {
    let policy = ActionPolicy::new(&task.constraints, options);
    let mut diagnostics = Vec::new();

    for bundle in decision.proposed_bundles.iter_mut() {
        let candidates = std::mem::take(&mut bundle.actions);
        for action in candidates {
            let kind = action.kind();
            let (kept, notes) = match coerce_action(action, &policy, scenario, options) {
                Ok((action, rewrites)) => (Some(action), rewrites),
                Err(reason) => {
                    tracing::debug!("bundle {:?}: dropped {kind}: {reason}", bundle.label);
                    (None, vec![format!("dropped: {reason}")])
                }
            };
            diagnostics.extend(notes.into_iter().map(|reason| Diagnostic {
                bundle: bundle.label.clone(),
                stage: DiagnosticStage::Coerce,
                action_type: Some(kind.to_string()),
                reason,
            }));
            bundle.actions.extend(kept);
        }

        // The allow-list never blocks the backfill; only an explicit
        // forbidden entry does.
        if bundle.actions.is_empty() {
            if policy.is_forbidden(ActionKind::CreateCommittee) {
                return Err(PipelineError::UnsatisfiableConstraints(format!(
                    "bundle {:?} is empty and create_committee is {}",
                    bundle.label,
                    Rejection::Forbidden.as_str()
                )));
            }
            bundle.actions.push(fallback_action(&task.prompt));
        }
    }

    decision.diagnostics.extend(diagnostics);
    Ok(decision)
}

fn coerce_action(
    mut action: Action,
    policy: &ActionPolicy,
    scenario: &Scenario,
    options: &GameOptions,
) -> Result<(Action, Vec<String>), String> {
    policy
        .check(action.kind())
        .map_err(|rejection| rejection.as_str().to_string())?;

    let mut repairer = Repairer::new(scenario);
    repair_references(&mut action, &mut repairer)?;

    if options.limit_freeform_deltas {
        if let Action::FreeformEffect(p) = &mut action {
            p.limit_deltas = Some(true);
        }
    }

    action.validate()?;
    Ok((action, repairer.rewrites))
}

fn repair_references(action: &mut Action, r: &mut Repairer<'_>) -> Result<(), String> {
    use Target::*;

    match action {
        Action::SendEnvoy(p) => r.required("target_nation_id", ForeignNation, &mut p.target_nation_id),
        Action::ProposeTreaty(p) => {
            r.required("target_nation_id", ForeignNation, &mut p.target_nation_id)
        }
        Action::DeclareWar(p) => r.required("target_nation_id", ForeignNation, &mut p.target_nation_id),
        Action::SueForPeace(p) => {
            r.required("target_nation_id", ForeignNation, &mut p.target_nation_id)
        }
        Action::ImposeSanctions(p) => {
            r.required("target_nation_id", ForeignNation, &mut p.target_nation_id)
        }
        Action::BrokerAgreement(p) => {
            r.required("acting_nation_id", Nation, &mut p.acting_nation_id)?;
            r.required("target_nation_id", ForeignNation, &mut p.target_nation_id)
        }
        Action::SetTariff(p) => {
            r.optional("target_nation_id", ForeignNation, &mut p.target_nation_id);
            Ok(())
        }
        Action::MobilizeForces(p) => r.required("province_id", Province, &mut p.province_id),
        Action::MoveTroops(p) => {
            r.required("from_province_id", Province, &mut p.from_province_id)?;
            r.required("to_province_id", Province, &mut p.to_province_id)
        }
        Action::FortifyProvince(p) => r.required("province_id", Province, &mut p.province_id),
        Action::LaunchOffensive(p) => {
            r.required("target_nation_id", ForeignNation, &mut p.target_nation_id)?;
            r.required("target_province_id", Province, &mut p.target_province_id)
        }
        Action::RecruitUnits(p) => r.required("province_id", Province, &mut p.province_id),
        Action::BuildInfrastructure(p) => r.required("province_id", Province, &mut p.province_id),
        Action::HoldFestival(p) => r.required("province_id", Province, &mut p.province_id),
        Action::SuppressUnrest(p) => r.required("province_id", Province, &mut p.province_id),
        Action::ConductEspionage(p) => {
            r.required("target_nation_id", ForeignNation, &mut p.target_nation_id)
        }
        Action::CounterIntelligence(p) => {
            r.optional("province_id", Province, &mut p.province_id);
            Ok(())
        }
        Action::SurveilCharacter(p) => {
            r.required("character_id", Character { office: None }, &mut p.character_id)
        }
        Action::CreateCommittee(p) => {
            r.optional("office_id", Office, &mut p.office_id);
            let office = p.office_id.as_deref();
            r.optional("chair_character_id", Character { office }, &mut p.chair_character_id);
            r.fill_appointee("chair_character_id", office, &mut p.chair_character_id);
            Ok(())
        }
        Action::AppointOfficial(p) => {
            r.required("office_id", Office, &mut p.office_id)?;
            let office = Some(p.office_id.as_str());
            r.required("character_id", Character { office }, &mut p.character_id)
        }
        Action::DismissOfficial(p) => {
            r.required("office_id", Office, &mut p.office_id)?;
            let office = Some(p.office_id.as_str());
            r.optional("character_id", Character { office }, &mut p.character_id);
            r.fill_appointee("character_id", office, &mut p.character_id);
            Ok(())
        }
        Action::FreeformEffect(p) => {
            p.relation_deltas.retain_mut(|delta| {
                r.required("relation_deltas.nation_id", ForeignNation, &mut delta.nation_id)
                    .is_ok()
            });
            Ok(())
        }
        Action::AdjustTaxRate(_)
        | Action::AllocateBudget(_)
        | Action::IssueBonds(_)
        | Action::EnactPolicy(_)
        | Action::IssueDecree(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action::{
        CreateCommitteeParams, DismissOfficialParams, FreeformEffectParams, HoldFestivalParams,
        MessageTone, SendEnvoyParams, SurveilCharacterParams,
    };
    use crate::model::{ALTERNATIVE_LABEL, ActionBundle, PRIMARY_LABEL, RelationDelta};
    use crate::scenario::RealmIds;
    use crate::task::TaskConstraints;

    struct World {
        scenario: Scenario,
        realm: RealmIds,
        rival: String,
        general: String,
    }

    fn world() -> World {
        let mut scenario = Scenario::new();
        let realm = scenario.add_player_realm("Aldoria", "Crown Vale", "Chancellor", "Queen Maren");
        let rival = scenario.add_nation("Vessmark");
        scenario.add_nation("Ostrel");
        scenario.add_province("Northern Marches");
        let marshal = scenario.add_office("Marshal");
        let general = scenario.add_character("General Hask");
        scenario.appoint(&marshal, &general);
        World {
            scenario,
            realm,
            rival,
            general,
        }
    }

    fn envoy(target: &str) -> Action {
        Action::SendEnvoy(SendEnvoyParams {
            target_nation_id: target.to_string(),
            message_tone: MessageTone::Firm,
            message: None,
            offer: None,
        })
    }

    fn festival(province: &str) -> Action {
        Action::HoldFestival(HoldFestivalParams {
            province_id: province.to_string(),
            budget: 100.0,
        })
    }

    fn freeform(deltas: Vec<RelationDelta>) -> Action {
        Action::FreeformEffect(FreeformEffectParams {
            description: "Royal wedding".to_string(),
            stability_delta: Some(0.2),
            legitimacy_delta: None,
            treasury_delta: None,
            relation_deltas: deltas,
            limit_deltas: None,
        })
    }

    fn decision(a: Vec<Action>, b: Vec<Action>) -> DecisionParseOutput {
        DecisionParseOutput {
            task_id: "t1".to_string(),
            intent_summary: "test".to_string(),
            proposed_bundles: vec![
                ActionBundle::new(PRIMARY_LABEL, a),
                ActionBundle::new(ALTERNATIVE_LABEL, b),
            ],
            clarifying_questions: Vec::new(),
            assumptions: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn task() -> TaskContext {
        TaskContext::new("t1", "Deal with Vessmark")
    }

    fn forbid(kinds: &[&str]) -> TaskContext {
        task().with_constraints(TaskConstraints {
            forbidden_action_types: kinds.iter().map(|k| k.to_string()).collect(),
            ..TaskConstraints::default()
        })
    }

    #[test]
    fn envoy_to_self_is_redirected_abroad() {
        let w = world();
        let out = coerce(
            decision(vec![envoy(&w.realm.nation)], vec![envoy(&w.rival)]),
            &w.scenario,
            &task(),
            &GameOptions::default(),
        )
        .unwrap();
        let Action::SendEnvoy(p) = &out.proposed_bundles[0].actions[0] else {
            panic!("wrong kind")
        };
        assert_ne!(p.target_nation_id, w.realm.nation);
        assert_eq!(p.target_nation_id, w.rival);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].stage, DiagnosticStage::Coerce);
    }

    #[test]
    fn unknown_province_goes_home() {
        let w = world();
        let out = coerce(
            decision(vec![festival("nowhere")], vec![festival("nowhere")]),
            &w.scenario,
            &task(),
            &GameOptions::default(),
        )
        .unwrap();
        for action in out.actions() {
            let Action::HoldFestival(p) = action else { panic!("wrong kind") };
            assert_eq!(p.province_id, w.realm.province);
        }
    }

    #[test]
    fn forbidden_actions_are_dropped_and_bundle_refilled() {
        let w = world();
        let out = coerce(
            decision(vec![envoy(&w.rival)], vec![festival(&w.realm.province)]),
            &w.scenario,
            &forbid(&["send_envoy"]),
            &GameOptions::default(),
        )
        .unwrap();
        assert_eq!(out.proposed_bundles[0].actions, vec![fallback_action("Deal with Vessmark")]);
        assert_eq!(out.proposed_bundles[1].actions[0].kind(), ActionKind::HoldFestival);
        assert!(out.diagnostics[0].reason.contains("forbidden"));
    }

    #[test]
    fn allow_list_filters_everything_else() {
        let w = world();
        let t = task().with_constraints(TaskConstraints {
            allowed_action_types: vec!["hold_festival".to_string()],
            ..TaskConstraints::default()
        });
        let out = coerce(
            decision(vec![envoy(&w.rival), festival("x")], vec![envoy(&w.rival)]),
            &w.scenario,
            &t,
            &GameOptions::default(),
        )
        .unwrap();
        assert_eq!(out.proposed_bundles[0].actions.len(), 1);
        assert_eq!(out.proposed_bundles[0].actions[0].kind(), ActionKind::HoldFestival);
        // The committee backfills B even though the allow-list omits it.
        assert_eq!(out.proposed_bundles[1].actions, vec![fallback_action("Deal with Vessmark")]);
        assert!(out.validate().is_ok());
    }

    #[test]
    fn empty_candidate_under_allow_list_gets_two_committees() {
        let w = world();
        let t = task().with_constraints(TaskConstraints {
            allowed_action_types: vec!["send_envoy".to_string()],
            ..TaskConstraints::default()
        });
        let out = coerce(decision(Vec::new(), Vec::new()), &w.scenario, &t, &GameOptions::default())
            .unwrap();
        for bundle in &out.proposed_bundles {
            assert_eq!(bundle.actions, vec![fallback_action("Deal with Vessmark")]);
        }
    }

    #[test]
    fn unknown_allowed_names_still_filter() {
        let w = world();
        let t = task().with_constraints(TaskConstraints {
            allowed_action_types: vec!["teleport_army".to_string()],
            ..TaskConstraints::default()
        });
        let out = coerce(
            decision(vec![envoy(&w.rival)], vec![festival(&w.realm.province)]),
            &w.scenario,
            &t,
            &GameOptions::default(),
        )
        .unwrap();
        assert!(out.actions().all(|a| a.kind() == ActionKind::CreateCommittee));
        assert_eq!(out.diagnostics.len(), 2);
    }

    #[test]
    fn strict_mode_drops_freeform_and_limit_mode_tags_it() {
        let w = world();
        let strict = GameOptions {
            strict_actions_only: true,
            ..GameOptions::default()
        };
        let out = coerce(
            decision(vec![freeform(Vec::new())], vec![envoy(&w.rival)]),
            &w.scenario,
            &task(),
            &strict,
        )
        .unwrap();
        assert!(out.actions().all(|a| a.kind() != ActionKind::FreeformEffect));

        let limited = GameOptions {
            limit_freeform_deltas: true,
            ..GameOptions::default()
        };
        let out = coerce(
            decision(vec![freeform(Vec::new())], vec![envoy(&w.rival)]),
            &w.scenario,
            &task(),
            &limited,
        )
        .unwrap();
        let Action::FreeformEffect(p) = &out.proposed_bundles[0].actions[0] else {
            panic!("wrong kind")
        };
        assert_eq!(p.limit_deltas, Some(true));
    }

    #[test]
    fn relation_deltas_point_at_foreign_nations() {
        let w = world();
        let deltas = vec![
            RelationDelta {
                nation_id: w.realm.nation.clone(),
                delta: 5.0,
            },
            RelationDelta {
                nation_id: w.rival.clone(),
                delta: -3.0,
            },
        ];
        let out = coerce(
            decision(vec![freeform(deltas)], vec![envoy(&w.rival)]),
            &w.scenario,
            &task(),
            &GameOptions::default(),
        )
        .unwrap();
        let Action::FreeformEffect(p) = &out.proposed_bundles[0].actions[0] else {
            panic!("wrong kind")
        };
        assert!(p.relation_deltas.iter().all(|d| w.scenario.is_foreign_nation(&d.nation_id)));
    }

    #[test]
    fn office_holder_fills_character_fields() {
        let w = world();
        let dismiss = Action::DismissOfficial(DismissOfficialParams {
            office_id: "no such office".to_string(),
            character_id: None,
        });
        let committee = Action::CreateCommittee(CreateCommitteeParams {
            name: "Border commission".to_string(),
            mandate: "Survey the border".to_string(),
            budget: 10.0,
            duration_weeks: 6,
            office_id: Some(w.realm.office.clone()),
            chair_character_id: Some("stranger".to_string()),
        });
        let out = coerce(
            decision(vec![dismiss], vec![committee]),
            &w.scenario,
            &task(),
            &GameOptions::default(),
        )
        .unwrap();
        let Action::DismissOfficial(p) = &out.proposed_bundles[0].actions[0] else {
            panic!("wrong kind")
        };
        assert_eq!(p.office_id, w.realm.office);
        assert_eq!(p.character_id.as_deref(), Some(w.realm.ruler.as_str()));

        let Action::CreateCommittee(p) = &out.proposed_bundles[1].actions[0] else {
            panic!("wrong kind")
        };
        assert_eq!(p.chair_character_id.as_deref(), Some(w.realm.ruler.as_str()));
    }

    #[test]
    fn unknown_character_without_office_uses_first_character() {
        let w = world();
        let surveil = Action::SurveilCharacter(SurveilCharacterParams {
            character_id: "ghost".to_string(),
            budget: None,
        });
        let out = coerce(
            decision(vec![surveil.clone()], vec![surveil]),
            &w.scenario,
            &task(),
            &GameOptions::default(),
        )
        .unwrap();
        let Action::SurveilCharacter(p) = &out.proposed_bundles[0].actions[0] else {
            panic!("wrong kind")
        };
        assert_eq!(p.character_id, w.realm.ruler);
        assert_ne!(p.character_id, w.general);
    }

    #[test]
    fn unrepairable_reference_drops_the_action() {
        let mut lonely = Scenario::new();
        lonely.add_player_realm("Aldoria", "Crown Vale", "Chancellor", "Queen Maren");
        let out = coerce(
            decision(vec![envoy("anyone")], vec![festival("x")]),
            &lonely,
            &task(),
            &GameOptions::default(),
        )
        .unwrap();
        assert_eq!(out.proposed_bundles[0].actions[0].kind(), ActionKind::CreateCommittee);
        assert!(out.diagnostics.iter().any(|d| d.reason.starts_with("dropped")));
    }

    #[test]
    fn forbidding_the_fallback_is_unsatisfiable() {
        let w = world();
        let err = coerce(
            decision(vec![envoy(&w.rival)], vec![envoy(&w.rival)]),
            &w.scenario,
            &forbid(&["send_envoy", "create_committee"]),
            &GameOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::UnsatisfiableConstraints(_)));
    }
}
