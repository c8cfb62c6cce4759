//! Static settings catalog.
//!
//! The catalog holds every choice list the setup screen offers (starting
//! resources, population caps, civilizations, victory conditions, ...). It is
//! authored as RON, embedded in the crate and optionally overridden from disk.
//!
//! **Note:** Every [`Choices`] list must mark one entry as default. A list
//! without one is rejected while parsing, so attribute code can rely on
//! [`Choices::default_value`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attribute::RANDOM;
use crate::error::{Result, SetupError};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.ron");

/// One labelled option in a choice list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice<T> {
    /// Display name.
    pub name: String,
    /// Value written into the payload.
    pub value: T,
    /// Whether this entry is the list default.
    #[serde(default)]
    pub default: bool,
}

/// A non-empty choice list with a resolved default entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    try_from = "Vec<Choice<T>>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Choices<T> {
    entries: Vec<Choice<T>>,
    default_index: usize,
}

impl<T> TryFrom<Vec<Choice<T>>> for Choices<T> {
    type Error = String;

    fn try_from(entries: Vec<Choice<T>>) -> std::result::Result<Self, Self::Error> {
        let default_index = first_default(&entries)
            .ok_or_else(|| "choice list has no entry marked default".to_string())?;
        Ok(Self {
            entries,
            default_index,
        })
    }
}

impl<T> Choices<T> {
    /// The first entry marked default.
    #[must_use]
    pub fn default_entry(&self) -> &Choice<T> {
        &self.entries[self.default_index]
    }

    /// Value of the default entry.
    #[must_use]
    pub fn default_value(&self) -> &T {
        &self.default_entry().value
    }

    /// All entries in authored order.
    #[must_use]
    pub fn entries(&self) -> &[Choice<T>] {
        &self.entries
    }

    /// Iterate over the values in authored order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }
}

impl<T: PartialEq> Choices<T> {
    /// Whether `value` is one of the offered values.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.values().any(|candidate| candidate == value)
    }
}

/// Index of the first entry marked default.
pub fn first_default<T>(entries: &[Choice<T>]) -> Option<usize> {
    entries.iter().position(|entry| entry.default)
}

/// A biome the map generator can apply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BiomeEntry {
    /// Identifier, `<family>/<name>`.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A playable civilization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CivEntry {
    /// Civ code written into `PlayerData[i].Civ`.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Defaults applied to a fresh player slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerDefaults {
    /// Display name for the slot.
    pub name: String,
    /// AI bot for the slot, empty for a human seat.
    #[serde(default)]
    pub ai: String,
}

/// A victory condition and the trigger scripts it pulls in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VictoryConditionEntry {
    /// Identifier written into `VictoryConditions`.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Trigger scripts loaded while the condition is active.
    #[serde(default)]
    pub scripts: Vec<String>,
    /// Active in a fresh setup.
    #[serde(default)]
    pub default: bool,
    /// Conditions switched off when this one is switched on.
    #[serde(default)]
    pub disabled_when_checked: Vec<String>,
}

/// Every static choice the setup screen offers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SettingsCatalog {
    /// Maximum number of player slots.
    pub max_players: usize,
    /// Number of selectable teams; team indices are `-1..max_teams`.
    pub max_teams: i32,
    /// Default relic count for capture-the-relic.
    pub default_relic_count: u32,
    /// Maximum relic count.
    pub max_relic_count: u32,
    /// Biomes, in authored order.
    pub biomes: Vec<BiomeEntry>,
    /// Playable civilizations.
    pub civilizations: Vec<CivEntry>,
    /// Per-slot defaults, indexed by player.
    pub player_defaults: Vec<PlayerDefaults>,
    /// Available AI bots.
    pub ai_bots: Choices<String>,
    /// AI difficulty levels.
    pub ai_difficulties: Choices<u8>,
    /// AI behaviours, including the `"random"` sentinel.
    pub ai_behaviors: Choices<String>,
    /// Starting resource amounts.
    pub starting_resources: Choices<u32>,
    /// Population caps.
    pub population_caps: Choices<u32>,
    /// Ceasefire lengths in minutes.
    pub ceasefire: Choices<u32>,
    /// Simulation speed multipliers.
    pub game_speeds: Choices<f64>,
    /// Random map sizes in tiles.
    pub map_sizes: Choices<u32>,
    /// Trigger difficulty levels.
    pub trigger_difficulties: Choices<u32>,
    /// Durations (minutes) for wonder and relic victories.
    pub victory_durations: Choices<u32>,
    /// Victory conditions.
    pub victory_conditions: Vec<VictoryConditionEntry>,
}

impl SettingsCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_ron_str(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from RON text.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let catalog: Self = ron::from_str(ron)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Check invariants the attribute code relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_players == 0 {
            return Err(SetupError::InvalidCatalog("max_players must be at least 1".into()));
        }
        if self.max_teams < 1 {
            return Err(SetupError::InvalidCatalog("max_teams must be at least 1".into()));
        }
        if self.civilizations.is_empty() {
            return Err(SetupError::InvalidCatalog("no civilizations".into()));
        }
        if self.player_defaults.len() < self.max_players {
            return Err(SetupError::InvalidCatalog(format!(
                "{} player defaults for {} players",
                self.player_defaults.len(),
                self.max_players
            )));
        }
        if !self.ai_behaviors.values().any(|behavior| behavior != RANDOM) {
            return Err(SetupError::InvalidCatalog(
                "ai_behaviors needs an entry other than random".into(),
            ));
        }
        if self.default_relic_count == 0 || self.default_relic_count > self.max_relic_count {
            return Err(SetupError::InvalidCatalog(
                "default_relic_count outside 1..=max_relic_count".into(),
            ));
        }
        for condition in &self.victory_conditions {
            for other in &condition.disabled_when_checked {
                if self.victory_condition(other).is_none() {
                    return Err(SetupError::InvalidCatalog(format!(
                        "victory condition '{}' disables unknown '{other}'",
                        condition.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Look up a victory condition by name.
    #[must_use]
    pub fn victory_condition(&self, name: &str) -> Option<&VictoryConditionEntry> {
        self.victory_conditions
            .iter()
            .find(|condition| condition.name == name)
    }

    /// Whether `code` names a playable civilization.
    #[must_use]
    pub fn has_civ(&self, code: &str) -> bool {
        self.civilizations.iter().any(|civ| civ.code == code)
    }

    /// Biome ids matching a map's `SupportedBiomes` prefix.
    #[must_use]
    pub fn biomes_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.biomes
            .iter()
            .filter(|biome| biome.id.starts_with(prefix))
            .map(|biome| biome.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = SettingsCatalog::builtin().unwrap();
        assert_eq!(catalog.max_players, 8);
        assert_eq!(*catalog.starting_resources.default_value(), 300);
        assert_eq!(*catalog.population_caps.default_value(), 300);
        assert_eq!(*catalog.ceasefire.default_value(), 0);
        assert!((catalog.game_speeds.default_value() - 1.0).abs() < f64::EPSILON);
        assert!(catalog.ai_behaviors.contains(&"random".to_string()));
        assert!(catalog.victory_condition("conquest").is_some_and(|c| c.default));
        assert!(catalog.has_civ("athen"));
        assert!(!catalog.has_civ("random"));
    }

    #[test]
    fn test_biome_prefix_filter() {
        let catalog = SettingsCatalog::builtin().unwrap();
        let aegean = catalog.biomes_with_prefix("aegean/");
        assert!(!aegean.is_empty());
        assert!(aegean.iter().all(|id| id.starts_with("aegean/")));
        assert!(catalog.biomes_with_prefix("nowhere/").is_empty());
    }

    #[test]
    fn test_first_default_picks_first_marked() {
        let entries = vec![
            Choice { name: "a".into(), value: 1, default: false },
            Choice { name: "b".into(), value: 2, default: true },
            Choice { name: "c".into(), value: 3, default: true },
        ];
        assert_eq!(first_default(&entries), Some(1));
        let choices = Choices::try_from(entries).unwrap();
        assert_eq!(*choices.default_value(), 2);
    }

    #[test]
    fn test_choice_list_without_default_fails_fast() {
        let ron = r#"[(name: "Low", value: 100), (name: "High", value: 1000)]"#;
        let parsed: std::result::Result<Choices<u32>, _> = ron::from_str(ron);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_random_only_ai_behaviors_rejected() {
        let mut catalog = SettingsCatalog::builtin().unwrap();
        catalog.ai_behaviors = Choices::try_from(vec![Choice {
            name: "Random".into(),
            value: "random".to_string(),
            default: true,
        }])
        .unwrap();
        assert!(matches!(catalog.validate(), Err(SetupError::InvalidCatalog(_))));
    }

    #[test]
    fn test_unknown_exclusive_condition_rejected() {
        let mut catalog = SettingsCatalog::builtin().unwrap();
        catalog.victory_conditions[0]
            .disabled_when_checked
            .push("moon_landing".into());
        assert!(matches!(catalog.validate(), Err(SetupError::InvalidCatalog(_))));
    }
}
