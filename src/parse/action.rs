//! Action field normalization.
//!
//! Turns one loosely shaped action object into a validated [`Action`]:
//! find the tag, find the parameters (explicit, wrapped, or flat), rename
//! aliased fields, reshape values, drop everything the kind does not own, and
//! validate. Never fails loudly; an action that cannot be salvaged is
//! rejected with a reason.

use serde_json::{Map, Value, json};

use super::probe::Probe;
use crate::id;
use crate::model::action::normalize_token;
use crate::model::fields::{self, FieldKind, field_kind};
use crate::model::{Action, ActionKind};

const TAG: Probe = Probe::new(
    "action type",
    &["type", "action_type", "actionType", "action", "kind"],
);

const PARAMS: Probe = Probe::new("params", &["params", "parameters", "arguments"]);

const WRAPPER: Probe = Probe::new(
    "wrapper",
    &["force", "project", "committee", "details", "payload", "spec", "data"],
);

const REF_INNER: Probe = Probe::new("reference", &["id", "key", "name"]);
const RELATION_NATION: Probe = Probe::new(
    "relation nation",
    &["nation_id", "nation", "target_nation_id", "target", "country"],
);
const RELATION_DELTA: Probe = Probe::new("relation delta", &["delta", "change", "value", "amount"]);

/// Fractions in [0, 1]; whole percentages up to 100 are rescaled.
const RATE_FIELDS: &[&str] = &["new_tax_rate", "tariff_rate", "interest_rate"];

/// Alternate spellings per canonical field, tried in order. An alias only
/// applies when the kind owns the canonical field and it is not already set.
const ALIASES: &[(&str, &[&str])] = &[
    ("message_tone", &["tone", "message_style", "attitude"]),
    (
        "target_nation_id",
        &["target_nation", "target", "nation_id", "nation", "target_country", "country", "recipient"],
    ),
    (
        "acting_nation_id",
        &["acting_nation", "actor_nation_id", "actor_nation", "initiator_nation_id"],
    ),
    ("to_province_id", &["destination", "to", "to_province", "destination_province_id"]),
    ("from_province_id", &["origin", "from", "from_province", "source_province_id"]),
    ("province_id", &["province", "region", "location", "region_id", "province_name"]),
    ("target_province_id", &["target_province", "target_region", "objective"]),
    ("new_tax_rate", &["tax_rate", "rate", "new_rate"]),
    ("tariff_rate", &["tariff", "rate"]),
    ("interest_rate", &["interest", "coupon"]),
    ("rationale", &["reason", "justification", "why"]),
    ("budget", &["cost", "funding", "funds", "spend"]),
    ("amount", &["sum", "funds", "value"]),
    ("duration_weeks", &["duration", "weeks", "duration_in_weeks"]),
    ("term_years", &["term", "maturity_years", "years"]),
    ("troops", &["troop_count", "soldiers", "size", "force_size", "units"]),
    ("count", &["number", "quantity", "unit_count"]),
    ("unit_type", &["unit", "units_type"]),
    ("readiness", &["alert_level"]),
    ("severity", &["intensity", "level"]),
    ("force_level", &["force", "intensity"]),
    ("treaty_type", &["treaty", "agreement_type"]),
    ("category", &["sector", "budget_category", "area"]),
    ("project_type", &["project", "infrastructure_type", "building"]),
    ("operation", &["operation_type", "mission", "op"]),
    ("chair_character_id", &["chair", "chair_id", "chairperson", "chair_character"]),
    (
        "character_id",
        &["character", "person", "official", "official_id", "target_character_id", "appointee"],
    ),
    ("office_id", &["office", "position", "post"]),
    ("name", &["committee_name", "title"]),
    ("mandate", &["purpose", "goal", "scope", "objective"]),
    ("policy_name", &["policy", "name"]),
    ("description", &["effect", "summary", "desc"]),
    ("title", &["decree_title", "heading"]),
    ("text", &["body", "decree_text", "decree", "content"]),
    ("message", &["note", "content"]),
    ("offer", &["proposal"]),
    ("terms", &["conditions", "proposal"]),
    ("casus_belli", &["cause", "pretext", "justification"]),
    ("concessions", &["offer", "concession"]),
    ("stability_delta", &["stability"]),
    ("legitimacy_delta", &["legitimacy"]),
    ("treasury_delta", &["treasury", "gold"]),
    ("relation_deltas", &["relations", "relation_changes", "diplomatic_deltas"]),
];

/// Why an action did not survive normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRejection {
    pub action_type: Option<ActionKind>,
    pub reason: String,
}

impl ActionRejection {
    fn untyped(reason: impl Into<String>) -> Self {
        Self {
            action_type: None,
            reason: reason.into(),
        }
    }
}

/// Normalize one candidate action; `None` when it cannot be salvaged.
pub fn normalize_action(raw: &Value) -> Option<Action> {
    normalize_action_with_reason(raw).ok()
}

pub fn normalize_action_with_reason(raw: &Value) -> Result<Action, ActionRejection> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ActionRejection::untyped("action is not an object"))?;
    let (tag_key, kind) =
        extract_kind(obj).ok_or_else(|| ActionRejection::untyped(describe_missing_tag(obj)))?;

    let mut params = extract_params(obj, tag_key);
    apply_aliases(kind, &mut params);
    shape_values(&mut params);
    params.retain(|key, _| fields::permits(kind, key));

    Action::from_parts(kind, params).map_err(|reason| ActionRejection {
        action_type: Some(kind),
        reason,
    })
}

/// The first tag key whose value names a catalog kind.
fn extract_kind(obj: &Map<String, Value>) -> Option<(&'static str, ActionKind)> {
    TAG.keys.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .and_then(ActionKind::from_loose)
            .map(|kind| (*key, kind))
    })
}

fn describe_missing_tag(obj: &Map<String, Value>) -> String {
    match TAG.find_str(obj) {
        Some(tag) => format!("unknown action type {tag:?}"),
        None => "no action type".to_string(),
    }
}

/// Explicit params, else the first wrapper object, then the remaining
/// top-level fields without overwriting what the wrapper supplied.
fn extract_params(obj: &Map<String, Value>, tag_key: &str) -> Map<String, Value> {
    let chosen = PARAMS.find_object(obj).or_else(|| WRAPPER.find_object(obj));
    let (wrapper_key, mut params) = match chosen {
        Some((key, inner)) => (Some(key), inner.clone()),
        None => (None, Map::new()),
    };
    for (key, value) in obj {
        if key == tag_key || wrapper_key == Some(key.as_str()) {
            continue;
        }
        params.entry(key.clone()).or_insert_with(|| value.clone());
    }
    params
}

fn apply_aliases(kind: ActionKind, params: &mut Map<String, Value>) {
    for (canonical, aliases) in ALIASES {
        if !fields::permits(kind, canonical) || is_set(params.get(*canonical)) {
            continue;
        }
        let accepts_objects = field_kind(canonical)
            .is_some_and(|k| k.is_reference() || k == FieldKind::RelationDeltas);
        let found = aliases.iter().find_map(|alias| {
            params
                .get(*alias)
                .filter(|v| is_set(Some(v)) && (accepts_objects || !v.is_object()))
                .cloned()
        });
        if let Some(value) = found {
            params.insert(canonical.to_string(), value);
        }
    }
}

fn is_set(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

fn shape_values(params: &mut Map<String, Value>) {
    params.retain(|_, v| !v.is_null());
    for (key, value) in params.iter_mut() {
        if let Some(kind) = field_kind(key) {
            shape_value(kind, value);
        }
        if RATE_FIELDS.contains(&key.as_str()) {
            rate_from_percent(value);
        }
    }
}

/// `"rate": 25` means 25%, not 2500%.
fn rate_from_percent(value: &mut Value) {
    if let Some(n) = value.as_f64().filter(|n| *n > 1.0 && *n <= 100.0) {
        *value = json!(n / 100.0);
    }
}

fn shape_value(kind: FieldKind, value: &mut Value) {
    match kind {
        FieldKind::Text => match value {
            Value::String(s) => *s = s.trim().to_string(),
            Value::Number(n) => *value = Value::String(n.to_string()),
            _ => {}
        },
        FieldKind::Number => coerce_number(value),
        FieldKind::Integer => coerce_integer(value),
        FieldKind::Choice => {
            if let Value::String(s) = value {
                *s = normalize_token(s);
            }
        }
        FieldKind::Flag => coerce_flag(value),
        FieldKind::NationRef | FieldKind::OfficeRef | FieldKind::CharacterRef => {
            coerce_ref(value);
        }
        FieldKind::RegionRef => {
            coerce_ref(value);
            if let Value::String(s) = value {
                if !s.is_empty() && !id::is_canonical_id(s) {
                    *s = id::stabilize(s);
                }
            }
        }
        FieldKind::RelationDeltas => shape_relation_deltas(value),
    }
}

/// `"1,200"` -> 1200, `"25%"` -> 0.25. Anything unparseable is left alone
/// for validation to reject.
fn coerce_number(value: &mut Value) {
    let Value::String(s) = value else {
        return;
    };
    let trimmed = s.trim();
    let (digits, scale) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim(), 0.01),
        None => (trimmed, 1.0),
    };
    let cleaned: String = digits.chars().filter(|c| *c != ',' && *c != '_').collect();
    let scaled = cleaned.parse::<f64>().ok().map(|n| n * scale);
    if let Some(num) = scaled.and_then(serde_json::Number::from_f64) {
        *value = Value::Number(num);
    }
}

/// Whole numbers for count-like fields; fractional values round to nearest.
fn coerce_integer(value: &mut Value) {
    coerce_number(value);
    if value.as_u64().is_some() {
        return;
    }
    if let Some(f) = value.as_f64().filter(|f| f.is_finite() && *f >= 0.0) {
        *value = json!(f.round() as u64);
    }
}

fn coerce_flag(value: &mut Value) {
    let flag = match value {
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" => false,
            _ => return,
        },
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => return,
    };
    *value = Value::Bool(flag);
}

/// Identifiers arrive as strings, numbers, or `{"id": ...}` objects.
fn coerce_ref(value: &mut Value) {
    let replacement = match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        Value::Number(n) => Value::String(n.to_string()),
        Value::Object(obj) => match REF_INNER.find_str(obj) {
            Some(inner) => Value::String(inner.to_string()),
            None => return,
        },
        _ => return,
    };
    *value = replacement;
}

/// Accepts a list of entries, a single entry, or a `{nation: delta}` map.
fn shape_relation_deltas(value: &mut Value) {
    let entries: Vec<Value> = match value {
        Value::Array(items) => items.iter().filter_map(relation_entry).collect(),
        Value::Object(obj) if RELATION_NATION.find(obj).is_some() => {
            relation_entry(value).into_iter().collect()
        }
        Value::Object(obj) => obj
            .iter()
            .filter_map(|(nation, delta)| {
                let mut delta = delta.clone();
                coerce_number(&mut delta);
                delta
                    .is_number()
                    .then(|| json!({"nation_id": nation.trim(), "delta": delta}))
            })
            .collect(),
        _ => return,
    };
    *value = Value::Array(entries);
}

fn relation_entry(item: &Value) -> Option<Value> {
    let obj = item.as_object()?;
    let mut nation = RELATION_NATION.find(obj)?.1.clone();
    coerce_ref(&mut nation);
    let mut delta = RELATION_DELTA.find(obj)?.1.clone();
    coerce_number(&mut delta);
    (nation.is_string() && delta.is_number()).then(|| json!({"nation_id": nation, "delta": delta}))
}
