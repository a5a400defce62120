#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;
use statecraft_decisions::model::{FieldKind, field_kind};
use statecraft_decisions::{
    Action, DecisionParseOutput, DecisionProvider, ProviderError, ProviderRequest, Scenario,
    TaskContext,
};

pub struct TestWorld {
    pub scenario: Scenario,
    pub player: String,
    pub home_province: String,
    pub home_office: String,
    pub ruler: String,
    pub rival: String,
    pub second_rival: String,
    pub marches: String,
    pub marshal: String,
    pub general: String,
}

pub fn build_test_world() -> TestWorld {
    let mut scenario = Scenario::new();

    // Player realm plus 2 rivals, 3 provinces, 2 offices, 3 characters
    let realm = scenario.add_player_realm("Aldoria", "Crown Vale", "Chancellor", "Queen Maren");
    let rival = scenario.add_nation("Vessmark");
    let second_rival = scenario.add_nation("Ostrel");
    let marches = scenario.add_province("Northern Marches");
    scenario.add_province("Saltmarsh");
    let marshal = scenario.add_office("Marshal");
    let general = scenario.add_character("General Hask");
    scenario.add_character("Lady Ise");
    scenario.appoint(&marshal, &general);

    TestWorld {
        scenario,
        player: realm.nation,
        home_province: realm.province,
        home_office: realm.office,
        ruler: realm.ruler,
        rival,
        second_rival,
        marches,
        marshal,
        general,
    }
}

pub fn task(prompt: &str) -> TaskContext {
    TaskContext::new("t1", prompt)
}

/// Every identifier in `action` with the kind of entity it must name.
pub fn references(action: &Action) -> Vec<(String, FieldKind, String)> {
    let mut refs = Vec::new();
    let Value::Object(params) = action.params_value() else {
        return refs;
    };
    for (field, value) in &params {
        match field_kind(field) {
            Some(FieldKind::RelationDeltas) => {
                for entry in value.as_array().into_iter().flatten() {
                    if let Some(nation) = entry["nation_id"].as_str() {
                        refs.push((field.clone(), FieldKind::NationRef, nation.to_string()));
                    }
                }
            }
            Some(kind) if kind.is_reference() => {
                if let Some(id) = value.as_str() {
                    refs.push((field.clone(), kind, id.to_string()));
                }
            }
            _ => {}
        }
    }
    refs
}

/// Panic unless every reference in the decision names an existing entity,
/// and every nation other than a broker's acting nation is foreign.
pub fn assert_references_valid(scenario: &Scenario, decision: &DecisionParseOutput) {
    for action in decision.actions() {
        for (field, kind, id) in references(action) {
            let ok = match kind {
                FieldKind::NationRef if field == "acting_nation_id" => scenario.has_nation(&id),
                FieldKind::NationRef => scenario.is_foreign_nation(&id),
                FieldKind::RegionRef => scenario.has_province(&id),
                FieldKind::OfficeRef => scenario.has_office(&id),
                FieldKind::CharacterRef => scenario.has_character(&id),
                _ => true,
            };
            assert!(ok, "{} has invalid {field}: {id}", action.kind());
        }
    }
}

/// Provider double that replays canned answers and records what it was asked.
pub struct ScriptedProvider {
    structured: Result<Value, ProviderError>,
    raw: Result<String, ProviderError>,
    pub structured_calls: AtomicUsize,
    pub raw_calls: AtomicUsize,
    pub requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(structured: Result<Value, ProviderError>, raw: Result<String, ProviderError>) -> Self {
        Self {
            structured,
            raw,
            structured_calls: AtomicUsize::new(0),
            raw_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Structured output succeeds with `value`; the raw tier is never expected.
    pub fn structured(value: Value) -> Self {
        Self::new(Ok(value), Err(ProviderError::Rejected("unexpected raw call".to_string())))
    }

    /// Structured output fails; the raw tier answers with `text`.
    pub fn raw_only(text: &str) -> Self {
        Self::new(
            Err(ProviderError::Rejected("schema unsupported".to_string())),
            Ok(text.to_string()),
        )
    }

    pub fn calls(&self) -> (usize, usize) {
        (
            self.structured_calls.load(Ordering::SeqCst),
            self.raw_calls.load(Ordering::SeqCst),
        )
    }

    fn record(&self, request: &ProviderRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

#[async_trait::async_trait]
impl DecisionProvider for ScriptedProvider {
    async fn parse_structured(&self, request: &ProviderRequest) -> Result<Value, ProviderError> {
        self.structured_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request);
        self.structured.clone()
    }

    async fn complete_raw(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        self.raw_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request);
        self.raw.clone()
    }
}
