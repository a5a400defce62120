use crate::model::ActionKind;

pub const SUGGESTED_WEIGHT: u32 = 3;
pub const ALLOWED_WEIGHT: u32 = 2;
pub const DEFAULT_WEIGHT: u32 = 1;

/// Kinds any realm can reasonably take on any turn.
pub const DEFAULT_POOL: &[ActionKind] = &[
    ActionKind::CreateCommittee,
    ActionKind::AllocateBudget,
    ActionKind::AdjustTaxRate,
    ActionKind::SendEnvoy,
    ActionKind::BuildInfrastructure,
    ActionKind::HoldFestival,
    ActionKind::FortifyProvince,
    ActionKind::CounterIntelligence,
    ActionKind::EnactPolicy,
];

/// Inclusive ranges for drawn amounts, in treasury units.
pub const SMALL_BUDGET: (f64, f64) = (50.0, 400.0);
pub const LARGE_BUDGET: (f64, f64) = (200.0, 2000.0);
pub const TAX_RATE: (f64, f64) = (0.05, 0.35);
pub const TARIFF_RATE: (f64, f64) = (0.02, 0.25);
pub const INTEREST_RATE: (f64, f64) = (0.02, 0.12);
pub const TROOPS: (u32, u32) = (200, 5000);
pub const UNIT_COUNT: (u32, u32) = (1, 20);
pub const PROJECT_WEEKS: (u32, u32) = (4, 52);
pub const COMMITTEE_WEEKS: (u32, u32) = (2, 12);
pub const BOND_YEARS: (u32, u32) = (2, 30);
/// Stability and legitimacy shifts stay small.
pub const EFFECT_DELTA: f64 = 0.1;
pub const RELATION_SHIFT: f64 = 15.0;

pub const COMMITTEE_SUBJECTS: &[&str] = &[
    "Royal Commission",
    "Council of Inquiry",
    "Select Committee",
    "Standing Board",
    "Privy Working Group",
];

pub const POLICY_NAMES: &[&str] = &[
    "Grain Reserve Act",
    "Frontier Settlement Charter",
    "Guild Reform",
    "Road Toll Relief",
    "Civic Militia Ordinance",
    "Scholars' Stipend",
];

pub const DECREE_TITLES: &[&str] = &[
    "Proclamation of Order",
    "Edict of Clemency",
    "Decree on Public Works",
    "Writ of Levy",
];

pub const ENVOY_MESSAGES: &[&str] = &[
    "The crown seeks assurances of continued goodwill.",
    "We request talks on the matters between our realms.",
    "Our patience is not without limit.",
    "Let old grievances be set aside.",
];

pub const FREEFORM_EVENTS: &[&str] = &[
    "A royal progress through the provinces",
    "A public audience with petitioners",
    "A day of thanksgiving at the capital",
    "An amnesty for minor offenders",
];

pub const RATIONALES: &[&str] = &[
    "To steady the realm's finances",
    "In answer to the council's counsel",
    "To meet the present need",
    "As a measured first step",
];
