//! Data models for the records the backend serves.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single Pokémon as the backend reports it.
///
/// Records are never mutated after they arrive; a new fetch replaces them
/// wholesale.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Pokemon {
    pub name: String,
    pub types: Vec<String>,
    /// Role groupings omit abilities entirely.
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
    /// Some forms have no default sprite upstream.
    #[serde(default)]
    pub sprite: Option<String>,
}

impl Pokemon {
    /// Type used when following a card through to its type page.
    pub fn primary_type(&self) -> Option<String> {
        self.types.first().map(|t| t.to_lowercase())
    }
}

/// Pokémon grouped by battle role, in the order the backend lists the roles.
pub type RoleGroups = IndexMap<String, Vec<Pokemon>>;

/// The randomizer's pool: Pokémon picked for the current time of day.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TimePeriodDataset {
    pub time_period: String,
    #[serde(default)]
    pub pokemon: Vec<Pokemon>,
}

impl Default for TimePeriodDataset {
    fn default() -> Self {
        Self {
            time_period: "day".to_string(),
            pokemon: Vec::new(),
        }
    }
}

/// Which of the gender page's two datasets is on screen.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Types,
    Roles,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Types => f.write_str("types"),
            Self::Roles => f.write_str("roles"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_entry_without_abilities_parses() {
        let json = r#"{"name":"snorlax","types":["normal"],"stats":{"hp":160},"sprite":null}"#;
        let pokemon: Pokemon = serde_json::from_str(json).unwrap();
        assert!(pokemon.abilities.is_empty());
        assert_eq!(pokemon.stats["hp"], 160);
        assert_eq!(pokemon.sprite, None);
    }

    #[test]
    fn test_role_groups_keep_backend_order() {
        let json = r#"{"Tank":[],"Attacker":[],"Support":[],"Speedster":[]}"#;
        let groups: RoleGroups = serde_json::from_str(json).unwrap();
        let order: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(order, ["Tank", "Attacker", "Support", "Speedster"]);
    }

    #[test]
    fn test_time_dataset_ignores_per_entry_time_period() {
        let json = r#"{
            "time_period": "night",
            "pokemon": [{"name":"gastly","types":["ghost","poison"],"abilities":["levitate"],
                         "stats":{},"sprite":"https://img/gastly.png","time_period":"night"}]
        }"#;
        let dataset: TimePeriodDataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.time_period, "night");
        assert_eq!(dataset.pokemon.len(), 1);
        assert_eq!(dataset.pokemon[0].primary_type().as_deref(), Some("ghost"));
    }

    #[test]
    fn test_view_mode_wire_names() {
        assert_eq!(serde_json::to_string(&ViewMode::Roles).unwrap(), r#""roles""#);
        let mode: ViewMode = serde_json::from_str(r#""types""#).unwrap();
        assert_eq!(mode, ViewMode::Types);
        assert_eq!(ViewMode::default(), ViewMode::Types);
    }
}
