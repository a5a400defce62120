//! Canonical parameter names per action kind, and what each name means.
//!
//! The normalizer uses this table to decide which fields survive, how string
//! values are reshaped, and which values are region keys to stabilize.

use super::action::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Integer,
    /// Closed lowercase vocabulary (tones, treaty types, ...).
    Choice,
    Flag,
    NationRef,
    RegionRef,
    OfficeRef,
    CharacterRef,
    RelationDeltas,
}

impl FieldKind {
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            FieldKind::NationRef
                | FieldKind::RegionRef
                | FieldKind::OfficeRef
                | FieldKind::CharacterRef
        )
    }
}

/// Semantic kind of a canonical field name. `None` for names no action uses.
pub fn field_kind(name: &str) -> Option<FieldKind> {
    let kind = match name {
        "target_nation_id" | "acting_nation_id" => FieldKind::NationRef,
        "province_id" | "from_province_id" | "to_province_id" | "target_province_id" => {
            FieldKind::RegionRef
        }
        "office_id" => FieldKind::OfficeRef,
        "character_id" | "chair_character_id" => FieldKind::CharacterRef,
        "relation_deltas" => FieldKind::RelationDeltas,
        "message_tone" | "treaty_type" | "category" | "unit_type" | "project_type"
        | "operation" => FieldKind::Choice,
        "new_tax_rate" | "severity" | "amount" | "interest_rate" | "tariff_rate" | "readiness"
        | "budget" | "force_level" | "stability_delta" | "legitimacy_delta"
        | "treasury_delta" => FieldKind::Number,
        "troops" | "count" | "duration_weeks" | "term_years" => FieldKind::Integer,
        "limit_deltas" => FieldKind::Flag,
        "message" | "offer" | "terms" | "casus_belli" | "concessions" | "rationale"
        | "policy_name" | "description" | "title" | "text" | "name" | "mandate" => {
            FieldKind::Text
        }
        _ => return None,
    };
    Some(kind)
}

/// The allow-list of parameter names for one kind.
pub fn canonical_fields(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::SendEnvoy => &["target_nation_id", "message_tone", "message", "offer"],
        ActionKind::ProposeTreaty => &["target_nation_id", "treaty_type", "terms"],
        ActionKind::DeclareWar => &["target_nation_id", "casus_belli"],
        ActionKind::SueForPeace => &["target_nation_id", "concessions"],
        ActionKind::ImposeSanctions => &["target_nation_id", "severity", "rationale"],
        ActionKind::BrokerAgreement => &["acting_nation_id", "target_nation_id", "terms"],
        ActionKind::AdjustTaxRate => &["new_tax_rate", "rationale"],
        ActionKind::AllocateBudget => &["category", "amount", "rationale"],
        ActionKind::IssueBonds => &["amount", "interest_rate", "term_years"],
        ActionKind::SetTariff => &["tariff_rate", "target_nation_id", "rationale"],
        ActionKind::MobilizeForces => &["province_id", "troops", "readiness"],
        ActionKind::MoveTroops => &["from_province_id", "to_province_id", "troops"],
        ActionKind::FortifyProvince => &["province_id", "budget"],
        ActionKind::LaunchOffensive => &["target_nation_id", "target_province_id", "troops"],
        ActionKind::RecruitUnits => &["province_id", "unit_type", "count", "budget"],
        ActionKind::BuildInfrastructure => {
            &["province_id", "project_type", "budget", "duration_weeks"]
        }
        ActionKind::EnactPolicy => &["policy_name", "description", "budget"],
        ActionKind::HoldFestival => &["province_id", "budget"],
        ActionKind::SuppressUnrest => &["province_id", "force_level"],
        ActionKind::IssueDecree => &["title", "text"],
        ActionKind::ConductEspionage => &["target_nation_id", "operation", "budget"],
        ActionKind::CounterIntelligence => &["budget", "province_id"],
        ActionKind::SurveilCharacter => &["character_id", "budget"],
        ActionKind::CreateCommittee => &[
            "name",
            "mandate",
            "budget",
            "duration_weeks",
            "office_id",
            "chair_character_id",
        ],
        ActionKind::AppointOfficial => &["office_id", "character_id"],
        ActionKind::DismissOfficial => &["office_id", "character_id"],
        ActionKind::FreeformEffect => &[
            "description",
            "stability_delta",
            "legitimacy_delta",
            "treasury_delta",
            "relation_deltas",
            "limit_deltas",
        ],
    }
}

pub fn permits(kind: ActionKind, field: &str) -> bool {
    canonical_fields(kind).contains(&field)
}
