//! Biome of a generated map.

use serde::Deserialize;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable, RANDOM};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Authored `SupportedBiomes`: a biome id prefix or an explicit id list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SupportedBiomes {
    Prefix(String),
    Ids(Vec<String>),
}

/// Biomes the selected map supports and the chosen one.
///
/// `available` is empty unless the map declares `SupportedBiomes`. A map that
/// does declare them starts on `"random"`.
#[derive(Debug, Default)]
pub struct Biome {
    observable: SettingsObservable,
    available: Vec<String>,
    biome: Option<String>,
}

impl Biome {
    /// Biome ids offered by the selected map.
    #[must_use]
    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Chosen biome id, `"random"`, or `None` if the map has no biomes.
    #[must_use]
    pub fn biome(&self) -> Option<&str> {
        self.biome.as_deref()
    }

    /// Choose a biome. Ids the map does not support become `"random"`.
    pub fn set_biome(settings: &mut MatchSettings, biome: Option<String>) {
        let this = &settings.biome;
        let biome = match biome {
            None => None,
            Some(_) if this.available.is_empty() => None,
            Some(id) if id == RANDOM || this.available.contains(&id) => Some(id),
            Some(id) => {
                tracing::debug!(biome = %id, "Biome not supported by the map, using random");
                Some(RANDOM.to_string())
            }
        };
        let old = std::mem::replace(&mut settings.biome.biome, biome);
        let changed = old != settings.biome.biome;
        settings.fire::<Self, _>("biome", &old, changed);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let available = match settings.map_setting::<SupportedBiomes>("SupportedBiomes") {
            Some(SupportedBiomes::Prefix(prefix)) => settings.catalog.biomes_with_prefix(&prefix),
            Some(SupportedBiomes::Ids(ids)) => ids,
            None => Vec::new(),
        };
        let old = std::mem::replace(&mut settings.biome.available, available);
        let changed = old != settings.biome.available;
        settings.fire::<Self, _>("available", &old, changed);
        let initial = (!settings.biome.available.is_empty()).then(|| RANDOM.to_string());
        Self::set_biome(settings, initial);
    }
}

impl Attribute for Biome {
    const NAME: &'static str = "biome";

    attribute_slot!(biome);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if let Some(biome) = &settings.biome.biome {
            payload.set_setting("Biome", biome.as_str());
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(biome) = payload.setting::<String>("Biome") {
            Self::set_biome(settings, Some(biome));
        }
    }

    fn pick_random_items(settings: &mut MatchSettings) -> bool {
        if settings.biome.biome.as_deref() != Some(RANDOM) {
            return false;
        }
        let available = settings.biome.available.clone();
        let Some(biome) = settings.choose(&available) else {
            return false;
        };
        Self::set_biome(settings, Some(biome));
        true
    }

    fn holds_random(settings: &MatchSettings) -> bool {
        settings.biome.biome.as_deref() == Some(RANDOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::{count_notification, notifications, settings};

    #[test]
    fn test_available_notifies_watchers_on_every_map_change() {
        let mut settings = settings();
        settings.watch::<Biome>(count_notification, &["available"], false);

        Map::select_map(&mut settings, "unknown");
        assert_eq!(notifications(), 1);
        Map::select_map(&mut settings, RANDOM);
        assert_eq!(notifications(), 2);
        assert!(settings.get::<Biome>().available().is_empty());
        Map::select_map(&mut settings, "aegean_sea");
        assert_eq!(notifications(), 3);
    }

    #[test]
    fn test_no_map_means_no_biomes() {
        let settings = settings();
        assert!(settings.get::<Biome>().available().is_empty());
        assert_eq!(settings.get::<Biome>().biome(), None);
    }

    #[test]
    fn test_prefix_populates_available_and_resolves() {
        let mut settings = settings();
        Map::select_map(&mut settings, "aegean_sea");
        let available = settings.get::<Biome>().available().to_vec();
        assert!(!available.is_empty());
        assert!(available.iter().all(|id| id.starts_with("aegean/")));
        assert_eq!(settings.get::<Biome>().biome(), Some(RANDOM));

        assert!(Biome::pick_random_items(&mut settings));
        let biome = settings.get::<Biome>().biome().unwrap().to_string();
        assert!(available.contains(&biome));
        assert!(!Biome::pick_random_items(&mut settings));
    }

    #[test]
    fn test_explicit_id_list_and_unsupported_choice() {
        let mut settings = settings();
        Map::select_map(&mut settings, "unknown");
        assert_eq!(
            settings.get::<Biome>().available(),
            ["generic/alpine", "generic/temperate"]
        );

        Biome::set_biome(&mut settings, Some("generic/temperate".into()));
        assert_eq!(settings.get::<Biome>().biome(), Some("generic/temperate"));
        Biome::set_biome(&mut settings, Some("fjord/winter".into()));
        assert_eq!(settings.get::<Biome>().biome(), Some(RANDOM));
    }
}
