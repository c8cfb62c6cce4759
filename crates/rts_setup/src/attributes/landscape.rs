//! Landscape variant of a generated map.
//!
//! Maps author landscapes as groups of items. The value is `"random"`
//! (any item), a group id (any item of that group) or an item id.

use serde::{Deserialize, Serialize};

use crate::attribute::{attribute_slot, Attribute, SettingsObservable, RANDOM};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::{AuthoredId, MatchSettings};

use super::Map;

/// One authored landscape group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapeGroup {
    /// Group id.
    #[serde(rename = "Id")]
    pub id: String,
    /// Landscapes of the group.
    #[serde(rename = "Items", default)]
    pub items: Vec<AuthoredId>,
}

/// Landscape selection.
#[derive(Debug, Default)]
pub struct Landscape {
    observable: SettingsObservable,
    groups: Vec<LandscapeGroup>,
    value: Option<String>,
}

impl Landscape {
    /// Groups offered by the selected map.
    #[must_use]
    pub fn groups(&self) -> &[LandscapeGroup] {
        &self.groups
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn group(&self, id: &str) -> Option<&LandscapeGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    fn is_item(&self, id: &str) -> bool {
        self.groups
            .iter()
            .flat_map(|group| &group.items)
            .any(|item| item.id == id)
    }

    /// Choose a landscape. Values the map does not offer become `"random"`.
    pub fn set_value(settings: &mut MatchSettings, value: Option<String>) {
        let this = &settings.landscape;
        let value = match value {
            _ if this.groups.is_empty() => None,
            None => None,
            Some(id) if id == RANDOM || this.group(&id).is_some() || this.is_item(&id) => Some(id),
            Some(id) => {
                tracing::debug!(landscape = %id, "Landscape not offered by the map, using random");
                Some(RANDOM.to_string())
            }
        };
        let old = std::mem::replace(&mut settings.landscape.value, value);
        let changed = old != settings.landscape.value;
        settings.fire::<Self, _>("value", &old, changed);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let groups = if settings.map.kind() == MapType::Random {
            settings
                .map_setting::<Vec<LandscapeGroup>>("Landscapes")
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let old = std::mem::replace(&mut settings.landscape.groups, groups);
        let changed = old != settings.landscape.groups;
        settings.fire::<Self, _>("groups", &old, changed);
        Self::set_value(settings, Some(RANDOM.to_string()));
    }
}

impl Attribute for Landscape {
    const NAME: &'static str = "landscape";

    attribute_slot!(landscape);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if let Some(value) = &settings.landscape.value {
            payload.set_setting("Landscape", value.as_str());
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(value) = payload.setting::<String>("Landscape") {
            Self::set_value(settings, Some(value));
        }
    }

    fn pick_random_items(settings: &mut MatchSettings) -> bool {
        if !Self::holds_random(settings) {
            return false;
        }
        let this = &settings.landscape;
        let items: Vec<String> = match this.value.as_deref() {
            Some(RANDOM) => this
                .groups
                .iter()
                .flat_map(|group| &group.items)
                .map(|item| item.id.clone())
                .collect(),
            Some(group) => this
                .group(group)
                .map(|group| group.items.iter().map(|item| item.id.clone()).collect())
                .unwrap_or_default(),
            None => Vec::new(),
        };
        let picked = settings.choose(&items);
        if picked.is_none() {
            tracing::debug!("Landscape group has no items");
        }
        let old = std::mem::replace(&mut settings.landscape.value, picked);
        let changed = old != settings.landscape.value;
        settings.fire::<Self, _>("value", &old, changed);
        true
    }

    fn holds_random(settings: &MatchSettings) -> bool {
        let this = &settings.landscape;
        this.value
            .as_deref()
            .is_some_and(|value| value == RANDOM || this.group(value).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::{count_notification, notifications, settings};

    #[test]
    fn test_groups_notify_watchers_on_every_map_change() {
        let mut settings = settings();
        settings.watch::<Landscape>(count_notification, &["groups"], false);

        Map::select_map(&mut settings, "aegean_sea");
        assert_eq!(notifications(), 1);
        assert!(settings.get::<Landscape>().groups().is_empty());

        Map::select_map(&mut settings, "unknown");
        assert_eq!(notifications(), 2);
        let ids: Vec<&str> = settings
            .get::<Landscape>()
            .groups()
            .iter()
            .map(|group| group.id.as_str())
            .collect();
        assert_eq!(ids, ["land", "naval"]);
    }

    #[test]
    fn test_group_value_resolves_within_group() {
        let mut settings = settings();
        Map::select_map(&mut settings, "unknown");
        assert_eq!(settings.get::<Landscape>().groups().len(), 2);
        assert_eq!(settings.get::<Landscape>().value(), Some(RANDOM));

        Landscape::set_value(&mut settings, Some("naval".into()));
        assert!(Landscape::holds_random(&settings));
        assert!(Landscape::pick_random_items(&mut settings));

        let value = settings.get::<Landscape>().value().unwrap();
        assert!(value == "archipelago" || value == "islands", "got {value}");
        assert!(!Landscape::holds_random(&settings));
    }

    #[test]
    fn test_maps_without_landscapes_hold_none() {
        let mut settings = settings();
        Map::select_map(&mut settings, "aegean_sea");
        assert_eq!(settings.get::<Landscape>().value(), None);
        assert!(!Landscape::pick_random_items(&mut settings));
    }
}
