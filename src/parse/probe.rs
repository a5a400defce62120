//! Ordered candidate-key probes.
//!
//! Generated JSON names the same concept many ways (`bundles`,
//! `proposed_bundles`, `proposedBundles`...). Each concept gets one [`Probe`]
//! listing its spellings in priority order; the first key holding a usable
//! value wins.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
pub struct Probe {
    pub concept: &'static str,
    pub keys: &'static [&'static str],
}

impl Probe {
    pub const fn new(concept: &'static str, keys: &'static [&'static str]) -> Self {
        Self { concept, keys }
    }

    /// First non-null value, with the key it was found under.
    pub fn find<'v>(&self, obj: &'v Map<String, Value>) -> Option<(&'static str, &'v Value)> {
        self.find_where(obj, |v| !v.is_null())
    }

    /// First value accepted by `accept`, with the key it was found under.
    pub fn find_where<'v>(
        &self,
        obj: &'v Map<String, Value>,
        accept: impl Fn(&Value) -> bool,
    ) -> Option<(&'static str, &'v Value)> {
        self.keys
            .iter()
            .find_map(|key| obj.get(*key).filter(|v| accept(v)).map(|v| (*key, v)))
    }

    /// First non-blank string, trimmed.
    pub fn find_str<'v>(&self, obj: &'v Map<String, Value>) -> Option<&'v str> {
        self.find_where(obj, |v| v.as_str().is_some_and(|s| !s.trim().is_empty()))
            .and_then(|(_, v)| v.as_str())
            .map(str::trim)
    }

    pub fn find_object<'v>(
        &self,
        obj: &'v Map<String, Value>,
    ) -> Option<(&'static str, &'v Map<String, Value>)> {
        self.find_where(obj, Value::is_object)
            .and_then(|(k, v)| v.as_object().map(|o| (k, o)))
    }

    /// Strings under the first present key; a lone string counts as a
    /// one-element list.
    pub fn find_strings(&self, obj: &Map<String, Value>) -> Vec<String> {
        self.find(obj).map(|(_, v)| string_list(v)).unwrap_or_default()
    }
}

/// Collect non-blank strings from a string or an array of scalars.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => non_blank(s).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => non_blank(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
