//! The closed action catalog.
//!
//! Every action the simulation engine can apply is one variant of [`Action`],
//! carrying a fixed parameter record. Actions serialize adjacently tagged:
//! `{"type": "adjust_tax_rate", "params": {"new_tax_rate": 0.2}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Longest duration any timed action may request (ten years of weeks).
pub const MAX_DURATION_WEEKS: u32 = 520;
/// Bounds for a single relation delta entry.
pub const MAX_RELATION_DELTA: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ActionKind {
    SendEnvoy,
    ProposeTreaty,
    DeclareWar,
    SueForPeace,
    ImposeSanctions,
    BrokerAgreement,
    AdjustTaxRate,
    AllocateBudget,
    IssueBonds,
    SetTariff,
    MobilizeForces,
    MoveTroops,
    FortifyProvince,
    LaunchOffensive,
    RecruitUnits,
    BuildInfrastructure,
    EnactPolicy,
    HoldFestival,
    SuppressUnrest,
    IssueDecree,
    ConductEspionage,
    CounterIntelligence,
    SurveilCharacter,
    CreateCommittee,
    AppointOfficial,
    DismissOfficial,
    FreeformEffect,
}

string_enum!(ActionKind {
    SendEnvoy => "send_envoy",
    ProposeTreaty => "propose_treaty",
    DeclareWar => "declare_war",
    SueForPeace => "sue_for_peace",
    ImposeSanctions => "impose_sanctions",
    BrokerAgreement => "broker_agreement",
    AdjustTaxRate => "adjust_tax_rate",
    AllocateBudget => "allocate_budget",
    IssueBonds => "issue_bonds",
    SetTariff => "set_tariff",
    MobilizeForces => "mobilize_forces",
    MoveTroops => "move_troops",
    FortifyProvince => "fortify_province",
    LaunchOffensive => "launch_offensive",
    RecruitUnits => "recruit_units",
    BuildInfrastructure => "build_infrastructure",
    EnactPolicy => "enact_policy",
    HoldFestival => "hold_festival",
    SuppressUnrest => "suppress_unrest",
    IssueDecree => "issue_decree",
    ConductEspionage => "conduct_espionage",
    CounterIntelligence => "counter_intelligence",
    SurveilCharacter => "surveil_character",
    CreateCommittee => "create_committee",
    AppointOfficial => "appoint_official",
    DismissOfficial => "dismiss_official",
    FreeformEffect => "freeform_effect",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ActionCategory {
    Diplomatic,
    Fiscal,
    Military,
    Internal,
    Intelligence,
    Administrative,
    Generic,
}

string_enum!(ActionCategory {
    Diplomatic => "diplomatic",
    Fiscal => "fiscal",
    Military => "military",
    Internal => "internal",
    Intelligence => "intelligence",
    Administrative => "administrative",
    Generic => "generic",
});

impl ActionKind {
    pub fn category(self) -> ActionCategory {
        use ActionKind::*;
        match self {
            SendEnvoy | ProposeTreaty | DeclareWar | SueForPeace | ImposeSanctions
            | BrokerAgreement => ActionCategory::Diplomatic,
            AdjustTaxRate | AllocateBudget | IssueBonds | SetTariff => ActionCategory::Fiscal,
            MobilizeForces | MoveTroops | FortifyProvince | LaunchOffensive | RecruitUnits => {
                ActionCategory::Military
            }
            BuildInfrastructure | EnactPolicy | HoldFestival | SuppressUnrest | IssueDecree => {
                ActionCategory::Internal
            }
            ConductEspionage | CounterIntelligence | SurveilCharacter => {
                ActionCategory::Intelligence
            }
            CreateCommittee | AppointOfficial | DismissOfficial => ActionCategory::Administrative,
            FreeformEffect => ActionCategory::Generic,
        }
    }

    /// Parse a tag the way generated text tends to spell it:
    /// `"Send Envoy"`, `"send-envoy"` and `" SEND_ENVOY "` all resolve.
    pub fn from_loose(raw: &str) -> Option<Self> {
        normalize_token(raw).parse().ok()
    }
}

/// Lowercase, trim, and join words with `_`.
pub fn normalize_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

// -- Closed vocabularies used by parameters --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MessageTone {
    Friendly,
    Neutral,
    Firm,
    Hostile,
    Conciliatory,
}

string_enum!(MessageTone {
    Friendly => "friendly",
    Neutral => "neutral",
    Firm => "firm",
    Hostile => "hostile",
    Conciliatory => "conciliatory",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TreatyType {
    Trade,
    NonAggression,
    Alliance,
    DefensivePact,
    Vassalage,
}

string_enum!(TreatyType {
    Trade => "trade",
    NonAggression => "non_aggression",
    Alliance => "alliance",
    DefensivePact => "defensive_pact",
    Vassalage => "vassalage",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BudgetCategory {
    Military,
    Infrastructure,
    Education,
    Health,
    Administration,
    Intelligence,
}

string_enum!(BudgetCategory {
    Military => "military",
    Infrastructure => "infrastructure",
    Education => "education",
    Health => "health",
    Administration => "administration",
    Intelligence => "intelligence",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum UnitType {
    Infantry,
    Cavalry,
    Artillery,
    Naval,
}

string_enum!(UnitType {
    Infantry => "infantry",
    Cavalry => "cavalry",
    Artillery => "artillery",
    Naval => "naval",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ProjectType {
    Road,
    Port,
    Fortress,
    Granary,
    School,
    Hospital,
}

string_enum!(ProjectType {
    Road => "road",
    Port => "port",
    Fortress => "fortress",
    Granary => "granary",
    School => "school",
    Hospital => "hospital",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EspionageOperation {
    GatherIntel,
    Sabotage,
    InciteUnrest,
    StealTechnology,
}

string_enum!(EspionageOperation {
    GatherIntel => "gather_intel",
    Sabotage => "sabotage",
    InciteUnrest => "incite_unrest",
    StealTechnology => "steal_technology",
});

// -- Parameter records --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendEnvoyParams {
    pub target_nation_id: String,
    pub message_tone: MessageTone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposeTreatyParams {
    pub target_nation_id: String,
    pub treaty_type: TreatyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclareWarParams {
    pub target_nation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casus_belli: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SueForPeaceParams {
    pub target_nation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concessions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImposeSanctionsParams {
    pub target_nation_id: String,
    pub severity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Mediate between two other nations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerAgreementParams {
    pub acting_nation_id: String,
    pub target_nation_id: String,
    pub terms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdjustTaxRateParams {
    pub new_tax_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllocateBudgetParams {
    pub category: BudgetCategory,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueBondsParams {
    pub amount: f64,
    pub interest_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetTariffParams {
    pub tariff_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_nation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MobilizeForcesParams {
    pub province_id: String,
    pub troops: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveTroopsParams {
    pub from_province_id: String,
    pub to_province_id: String,
    pub troops: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FortifyProvinceParams {
    pub province_id: String,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchOffensiveParams {
    pub target_nation_id: String,
    pub target_province_id: String,
    pub troops: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecruitUnitsParams {
    pub province_id: String,
    pub unit_type: UnitType,
    pub count: u32,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildInfrastructureParams {
    pub province_id: String,
    pub project_type: ProjectType,
    pub budget: f64,
    pub duration_weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnactPolicyParams {
    pub policy_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoldFestivalParams {
    pub province_id: String,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuppressUnrestParams {
    pub province_id: String,
    pub force_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueDecreeParams {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConductEspionageParams {
    pub target_nation_id: String,
    pub operation: EspionageOperation,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterIntelligenceParams {
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveilCharacterParams {
    pub character_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommitteeParams {
    pub name: String,
    pub mandate: String,
    pub budget: f64,
    pub duration_weeks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chair_character_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppointOfficialParams {
    pub office_id: String,
    pub character_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DismissOfficialParams {
    pub office_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationDelta {
    pub nation_id: String,
    pub delta: f64,
}

/// Escape hatch for effects the catalog does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FreeformEffectParams {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legitimacy_delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasury_delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relation_deltas: Vec<RelationDelta>,
    /// Set by the coercer when the game asks for conservative freeform effects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_deltas: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum Action {
    SendEnvoy(SendEnvoyParams),
    ProposeTreaty(ProposeTreatyParams),
    DeclareWar(DeclareWarParams),
    SueForPeace(SueForPeaceParams),
    ImposeSanctions(ImposeSanctionsParams),
    BrokerAgreement(BrokerAgreementParams),
    AdjustTaxRate(AdjustTaxRateParams),
    AllocateBudget(AllocateBudgetParams),
    IssueBonds(IssueBondsParams),
    SetTariff(SetTariffParams),
    MobilizeForces(MobilizeForcesParams),
    MoveTroops(MoveTroopsParams),
    FortifyProvince(FortifyProvinceParams),
    LaunchOffensive(LaunchOffensiveParams),
    RecruitUnits(RecruitUnitsParams),
    BuildInfrastructure(BuildInfrastructureParams),
    EnactPolicy(EnactPolicyParams),
    HoldFestival(HoldFestivalParams),
    SuppressUnrest(SuppressUnrestParams),
    IssueDecree(IssueDecreeParams),
    ConductEspionage(ConductEspionageParams),
    CounterIntelligence(CounterIntelligenceParams),
    SurveilCharacter(SurveilCharacterParams),
    CreateCommittee(CreateCommitteeParams),
    AppointOfficial(AppointOfficialParams),
    DismissOfficial(DismissOfficialParams),
    FreeformEffect(FreeformEffectParams),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::SendEnvoy(_) => ActionKind::SendEnvoy,
            Action::ProposeTreaty(_) => ActionKind::ProposeTreaty,
            Action::DeclareWar(_) => ActionKind::DeclareWar,
            Action::SueForPeace(_) => ActionKind::SueForPeace,
            Action::ImposeSanctions(_) => ActionKind::ImposeSanctions,
            Action::BrokerAgreement(_) => ActionKind::BrokerAgreement,
            Action::AdjustTaxRate(_) => ActionKind::AdjustTaxRate,
            Action::AllocateBudget(_) => ActionKind::AllocateBudget,
            Action::IssueBonds(_) => ActionKind::IssueBonds,
            Action::SetTariff(_) => ActionKind::SetTariff,
            Action::MobilizeForces(_) => ActionKind::MobilizeForces,
            Action::MoveTroops(_) => ActionKind::MoveTroops,
            Action::FortifyProvince(_) => ActionKind::FortifyProvince,
            Action::LaunchOffensive(_) => ActionKind::LaunchOffensive,
            Action::RecruitUnits(_) => ActionKind::RecruitUnits,
            Action::BuildInfrastructure(_) => ActionKind::BuildInfrastructure,
            Action::EnactPolicy(_) => ActionKind::EnactPolicy,
            Action::HoldFestival(_) => ActionKind::HoldFestival,
            Action::SuppressUnrest(_) => ActionKind::SuppressUnrest,
            Action::IssueDecree(_) => ActionKind::IssueDecree,
            Action::ConductEspionage(_) => ActionKind::ConductEspionage,
            Action::CounterIntelligence(_) => ActionKind::CounterIntelligence,
            Action::SurveilCharacter(_) => ActionKind::SurveilCharacter,
            Action::CreateCommittee(_) => ActionKind::CreateCommittee,
            Action::AppointOfficial(_) => ActionKind::AppointOfficial,
            Action::DismissOfficial(_) => ActionKind::DismissOfficial,
            Action::FreeformEffect(_) => ActionKind::FreeformEffect,
        }
    }

    /// Build a validated action from a tag and an already-shaped parameter map.
    ///
    /// This is the single gate every action passes through, whether it came
    /// from generated text or from the synthesizer.
    pub fn from_parts(kind: ActionKind, params: Map<String, Value>) -> Result<Action, String> {
        let tagged = serde_json::json!({
            "type": kind.as_str(),
            "params": Value::Object(params),
        });
        let action: Action =
            serde_json::from_value(tagged).map_err(|e| format!("{kind}: {e}"))?;
        action.validate()?;
        Ok(action)
    }

    /// The parameter record as a JSON object.
    pub fn params_value(&self) -> Value {
        serde_json::to_value(self)
            .ok()
            .and_then(|mut v| v.get_mut("params").map(Value::take))
            .unwrap_or(Value::Null)
    }

    /// Range and content checks the type system cannot express.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Action::SendEnvoy(p) => {
                id("target_nation_id", &p.target_nation_id)?;
                opt_text("message", &p.message)?;
                opt_text("offer", &p.offer)
            }
            Action::ProposeTreaty(p) => {
                id("target_nation_id", &p.target_nation_id)?;
                opt_text("terms", &p.terms)
            }
            Action::DeclareWar(p) => {
                id("target_nation_id", &p.target_nation_id)?;
                opt_text("casus_belli", &p.casus_belli)
            }
            Action::SueForPeace(p) => {
                id("target_nation_id", &p.target_nation_id)?;
                opt_text("concessions", &p.concessions)
            }
            Action::ImposeSanctions(p) => {
                id("target_nation_id", &p.target_nation_id)?;
                unit("severity", p.severity)?;
                opt_text("rationale", &p.rationale)
            }
            Action::BrokerAgreement(p) => {
                id("acting_nation_id", &p.acting_nation_id)?;
                id("target_nation_id", &p.target_nation_id)?;
                text("terms", &p.terms)
            }
            Action::AdjustTaxRate(p) => {
                unit("new_tax_rate", p.new_tax_rate)?;
                opt_text("rationale", &p.rationale)
            }
            Action::AllocateBudget(p) => {
                non_negative("amount", p.amount)?;
                opt_text("rationale", &p.rationale)
            }
            Action::IssueBonds(p) => {
                positive("amount", p.amount)?;
                unit("interest_rate", p.interest_rate)?;
                match p.term_years {
                    Some(years) if !(1..=100).contains(&years) => {
                        Err(format!("term_years out of range: {years}"))
                    }
                    _ => Ok(()),
                }
            }
            Action::SetTariff(p) => {
                unit("tariff_rate", p.tariff_rate)?;
                opt_id("target_nation_id", &p.target_nation_id)?;
                opt_text("rationale", &p.rationale)
            }
            Action::MobilizeForces(p) => {
                id("province_id", &p.province_id)?;
                count("troops", p.troops)?;
                p.readiness.map_or(Ok(()), |r| unit("readiness", r))
            }
            Action::MoveTroops(p) => {
                id("from_province_id", &p.from_province_id)?;
                id("to_province_id", &p.to_province_id)?;
                count("troops", p.troops)
            }
            Action::FortifyProvince(p) => {
                id("province_id", &p.province_id)?;
                non_negative("budget", p.budget)
            }
            Action::LaunchOffensive(p) => {
                id("target_nation_id", &p.target_nation_id)?;
                id("target_province_id", &p.target_province_id)?;
                count("troops", p.troops)
            }
            Action::RecruitUnits(p) => {
                id("province_id", &p.province_id)?;
                count("count", p.count)?;
                non_negative("budget", p.budget)
            }
            Action::BuildInfrastructure(p) => {
                id("province_id", &p.province_id)?;
                non_negative("budget", p.budget)?;
                weeks("duration_weeks", p.duration_weeks)
            }
            Action::EnactPolicy(p) => {
                text("policy_name", &p.policy_name)?;
                text("description", &p.description)?;
                p.budget.map_or(Ok(()), |b| non_negative("budget", b))
            }
            Action::HoldFestival(p) => {
                id("province_id", &p.province_id)?;
                non_negative("budget", p.budget)
            }
            Action::SuppressUnrest(p) => {
                id("province_id", &p.province_id)?;
                unit("force_level", p.force_level)
            }
            Action::IssueDecree(p) => {
                text("title", &p.title)?;
                text("text", &p.text)
            }
            Action::ConductEspionage(p) => {
                id("target_nation_id", &p.target_nation_id)?;
                non_negative("budget", p.budget)
            }
            Action::CounterIntelligence(p) => {
                non_negative("budget", p.budget)?;
                opt_id("province_id", &p.province_id)
            }
            Action::SurveilCharacter(p) => {
                id("character_id", &p.character_id)?;
                p.budget.map_or(Ok(()), |b| non_negative("budget", b))
            }
            Action::CreateCommittee(p) => {
                text("name", &p.name)?;
                text("mandate", &p.mandate)?;
                non_negative("budget", p.budget)?;
                weeks("duration_weeks", p.duration_weeks)?;
                opt_id("office_id", &p.office_id)?;
                opt_id("chair_character_id", &p.chair_character_id)
            }
            Action::AppointOfficial(p) => {
                id("office_id", &p.office_id)?;
                id("character_id", &p.character_id)
            }
            Action::DismissOfficial(p) => {
                id("office_id", &p.office_id)?;
                opt_id("character_id", &p.character_id)
            }
            Action::FreeformEffect(p) => {
                text("description", &p.description)?;
                for (field, value) in [
                    ("stability_delta", p.stability_delta),
                    ("legitimacy_delta", p.legitimacy_delta),
                ] {
                    if let Some(v) = value {
                        within(field, v, -1.0, 1.0)?;
                    }
                }
                if let Some(v) = p.treasury_delta {
                    finite("treasury_delta", v)?;
                }
                for entry in &p.relation_deltas {
                    id("relation_deltas.nation_id", &entry.nation_id)?;
                    within(
                        "relation_deltas.delta",
                        entry.delta,
                        -MAX_RELATION_DELTA,
                        MAX_RELATION_DELTA,
                    )?;
                }
                Ok(())
            }
        }
    }
}

fn text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

fn opt_text(field: &str, value: &Option<String>) -> Result<(), String> {
    value.as_deref().map_or(Ok(()), |v| text(field, v))
}

fn id(field: &str, value: &str) -> Result<(), String> {
    text(field, value)
}

fn opt_id(field: &str, value: &Option<String>) -> Result<(), String> {
    opt_text(field, value)
}

fn finite(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{field} must be finite"));
    }
    Ok(())
}

fn within(field: &str, value: f64, low: f64, high: f64) -> Result<(), String> {
    finite(field, value)?;
    if value < low || value > high {
        return Err(format!("{field} out of range [{low}, {high}]: {value}"));
    }
    Ok(())
}

fn unit(field: &str, value: f64) -> Result<(), String> {
    within(field, value, 0.0, 1.0)
}

fn non_negative(field: &str, value: f64) -> Result<(), String> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(format!("{field} must not be negative: {value}"));
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), String> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(format!("{field} must be positive: {value}"));
    }
    Ok(())
}

fn count(field: &str, value: u32) -> Result<(), String> {
    if value == 0 {
        return Err(format!("{field} must be at least 1"));
    }
    Ok(())
}

fn weeks(field: &str, value: u32) -> Result<(), String> {
    if value == 0 || value > MAX_DURATION_WEEKS {
        return Err(format!(
            "{field} out of range [1, {MAX_DURATION_WEEKS}]: {value}"
        ));
    }
    Ok(())
}
