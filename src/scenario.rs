//! The referential ground truth for one game: which nations, provinces,
//! offices and characters exist, who the player is, and who holds which office.
//!
//! Callers usually deserialize a [`Scenario`] from their game state. The
//! builder methods derive ids the same way the rest of the crate does, so a
//! province added as `"Northern Marches"` is addressable by the id the
//! normalizer computes for that name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{self, CHARACTER_NAMESPACE, NATION_NAMESPACE, OFFICE_NAMESPACE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioEntity {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Read-only view of the live world. Entity lists are ordered; "first" in
/// fallback rules means first in these lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub nations: Vec<ScenarioEntity>,
    pub provinces: Vec<ScenarioEntity>,
    pub offices: Vec<ScenarioEntity>,
    pub characters: Vec<ScenarioEntity>,
    pub player_nation_id: String,
    pub home_province_id: String,
    pub home_office_id: String,
    /// Office id to the id of the character currently holding it.
    pub appointments: BTreeMap<String, String>,
}

/// IDs returned by [`Scenario::add_player_realm`].
pub struct RealmIds {
    pub nation: String,
    pub province: String,
    pub office: String,
    pub ruler: String,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Building --

    pub fn add_nation(&mut self, name: &str) -> String {
        push_entity(&mut self.nations, id::stable_id(NATION_NAMESPACE, name), name)
    }

    /// Add a province keyed by its region name.
    pub fn add_province(&mut self, region_key: &str) -> String {
        push_entity(&mut self.provinces, id::stabilize(region_key), region_key)
    }

    pub fn add_office(&mut self, name: &str) -> String {
        push_entity(&mut self.offices, id::stable_id(OFFICE_NAMESPACE, name), name)
    }

    pub fn add_character(&mut self, name: &str) -> String {
        push_entity(
            &mut self.characters,
            id::stable_id(CHARACTER_NAMESPACE, name),
            name,
        )
    }

    pub fn appoint(&mut self, office_id: &str, character_id: &str) {
        self.appointments
            .insert(office_id.to_string(), character_id.to_string());
    }

    /// Add the player's nation with a home province, a home office, and a
    /// ruler appointed to it.
    pub fn add_player_realm(
        &mut self,
        nation: &str,
        province: &str,
        office: &str,
        ruler: &str,
    ) -> RealmIds {
        let ids = RealmIds {
            nation: self.add_nation(nation),
            province: self.add_province(province),
            office: self.add_office(office),
            ruler: self.add_character(ruler),
        };
        self.appoint(&ids.office, &ids.ruler);
        self.player_nation_id = ids.nation.clone();
        self.home_province_id = ids.province.clone();
        self.home_office_id = ids.office.clone();
        ids
    }

    // -- Membership --

    pub fn has_nation(&self, id: &str) -> bool {
        contains(&self.nations, id)
    }

    /// A known nation that is not the player's.
    pub fn is_foreign_nation(&self, id: &str) -> bool {
        id != self.player_nation_id && self.has_nation(id)
    }

    pub fn has_province(&self, id: &str) -> bool {
        contains(&self.provinces, id)
    }

    pub fn has_office(&self, id: &str) -> bool {
        contains(&self.offices, id)
    }

    pub fn has_character(&self, id: &str) -> bool {
        contains(&self.characters, id)
    }

    // -- Fallbacks --

    pub fn foreign_nations(&self) -> impl Iterator<Item = &ScenarioEntity> {
        self.nations
            .iter()
            .filter(move |n| n.id != self.player_nation_id)
    }

    pub fn first_foreign_nation(&self) -> Option<&str> {
        self.foreign_nations().next().map(|n| n.id.as_str())
    }

    /// The player's home province, or the first province when the home
    /// province is not part of the scenario.
    pub fn fallback_province(&self) -> Option<&str> {
        if self.has_province(&self.home_province_id) {
            return Some(self.home_province_id.as_str());
        }
        self.provinces.first().map(|p| p.id.as_str())
    }

    pub fn fallback_office(&self) -> Option<&str> {
        if self.has_office(&self.home_office_id) {
            return Some(self.home_office_id.as_str());
        }
        self.offices.first().map(|o| o.id.as_str())
    }

    /// The character holding `office_id`, if that character exists.
    pub fn appointee(&self, office_id: &str) -> Option<&str> {
        self.appointments
            .get(office_id)
            .map(String::as_str)
            .filter(|c| self.has_character(c))
    }

    pub fn first_character(&self) -> Option<&str> {
        self.characters.first().map(|c| c.id.as_str())
    }

    pub fn name_of<'a>(&'a self, id: &str) -> Option<&'a str> {
        [&self.nations, &self.provinces, &self.offices, &self.characters]
            .into_iter()
            .flat_map(|list| list.iter())
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }
}

fn contains(list: &[ScenarioEntity], id: &str) -> bool {
    !id.is_empty() && list.iter().any(|e| e.id == id)
}

fn push_entity(list: &mut Vec<ScenarioEntity>, id: String, name: &str) -> String {
    if !contains(list, &id) {
        list.push(ScenarioEntity {
            id: id.clone(),
            name: name.to_string(),
        });
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn realm() -> (Scenario, RealmIds) {
        let mut s = Scenario::new();
        let ids = s.add_player_realm("Aldoria", "Crown Vale", "Chancellor", "Queen Maren");
        (s, ids)
    }

    #[test]
    fn player_realm_sets_home_entities() {
        let (s, ids) = realm();
        assert_eq!(s.player_nation_id, ids.nation);
        assert_eq!(s.fallback_province(), Some(ids.province.as_str()));
        assert_eq!(s.fallback_office(), Some(ids.office.as_str()));
        assert_eq!(s.appointee(&ids.office), Some(ids.ruler.as_str()));
    }

    #[test]
    fn province_ids_follow_the_stabilizer() {
        let (s, ids) = realm();
        assert_eq!(ids.province, id::stabilize("crown vale"));
        assert!(s.has_province(&id::stabilize("CROWN VALE ")));
    }

    #[test]
    fn foreign_nations_exclude_the_player() {
        let (mut s, ids) = realm();
        assert_eq!(s.first_foreign_nation(), None);
        let rival = s.add_nation("Vessmark");
        assert_eq!(s.first_foreign_nation(), Some(rival.as_str()));
        assert!(s.is_foreign_nation(&rival));
        assert!(!s.is_foreign_nation(&ids.nation));
        assert!(s.has_nation(&ids.nation));
    }

    #[test]
    fn adding_twice_keeps_one_entry() {
        let mut s = Scenario::new();
        let a = s.add_nation("Vessmark");
        let b = s.add_nation("Vessmark");
        assert_eq!(a, b);
        assert_eq!(s.nations.len(), 1);
    }

    #[test]
    fn fallback_province_when_home_is_unknown() {
        let mut s = Scenario::new();
        let first = s.add_province("Saltmarsh");
        s.home_province_id = "missing".to_string();
        assert_eq!(s.fallback_province(), Some(first.as_str()));
    }

    #[test]
    fn appointee_must_exist() {
        let (mut s, ids) = realm();
        s.appoint(&ids.office, "ghost");
        assert_eq!(s.appointee(&ids.office), None);
    }

    #[test]
    fn empty_ids_are_never_members() {
        let s = Scenario::new();
        assert!(!s.has_nation(""));
        assert!(!s.is_foreign_nation(""));
    }

    #[test]
    fn names_resolve_across_entity_types() {
        let (s, ids) = realm();
        assert_eq!(s.name_of(&ids.ruler), Some("Queen Maren"));
        assert_eq!(s.name_of("nobody"), None);
    }
}
