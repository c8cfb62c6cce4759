//! Trigger scripts loaded into the match.
//!
//! The final list merges three sources: scripts set explicitly, scripts of
//! the active victory conditions and scripts authored by the map. Only the
//! explicit part is state; the other two are recomputed and merged while
//! finalizing the payload.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::{Map, VictoryConditions};

const KEY: &str = "TriggerScripts";

/// Trigger script sources.
#[derive(Debug, Default)]
pub struct TriggerScripts {
    observable: SettingsObservable,
    custom: Vec<String>,
    victory: Vec<String>,
    map: Vec<String>,
}

impl TriggerScripts {
    /// Scripts set explicitly.
    #[must_use]
    pub fn custom(&self) -> &[String] {
        &self.custom
    }

    /// Merged list in load order, without duplicates.
    #[must_use]
    pub fn merged(&self) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        for script in self.custom.iter().chain(&self.victory).chain(&self.map) {
            if !merged.contains(script) {
                merged.push(script.clone());
            }
        }
        merged
    }

    /// Replace the explicit scripts.
    pub fn set_custom(settings: &mut MatchSettings, custom: Vec<String>) {
        let old = std::mem::replace(&mut settings.trigger_scripts.custom, custom);
        let changed = old != settings.trigger_scripts.custom;
        settings.fire::<Self, _>("custom", &old, changed);
    }

    /// Scripts of the active victory conditions.
    #[must_use]
    pub fn victory(&self) -> &[String] {
        &self.victory
    }

    /// Scripts authored by the selected map.
    #[must_use]
    pub fn map(&self) -> &[String] {
        &self.map
    }

    fn on_victory_change(settings: &mut MatchSettings, _: &Change) {
        let scripts = VictoryConditions::scripts(settings);
        let old = std::mem::replace(&mut settings.trigger_scripts.victory, scripts);
        let changed = old != settings.trigger_scripts.victory;
        settings.fire::<Self, _>("victory", &old, changed);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let scripts = settings.map_setting::<Vec<String>>(KEY).unwrap_or_default();
        let old = std::mem::replace(&mut settings.trigger_scripts.map, scripts);
        let changed = old != settings.trigger_scripts.map;
        settings.fire::<Self, _>("map", &old, changed);
    }
}

impl Attribute for TriggerScripts {
    const NAME: &'static str = "triggerScripts";

    attribute_slot!(trigger_scripts);

    fn init(settings: &mut MatchSettings) {
        settings.trigger_scripts.victory = VictoryConditions::scripts(settings);
        settings.watch::<VictoryConditions>(Self::on_victory_change, &["active"], true);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.set_setting(KEY, settings.trigger_scripts.custom.clone());
    }

    fn on_finalize_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.set_setting(KEY, settings.trigger_scripts.merged());
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        let Some(scripts) = payload.setting::<Vec<String>>(KEY) else {
            return;
        };
        let this = &settings.trigger_scripts;
        let custom: Vec<String> = scripts
            .into_iter()
            .filter(|script| !this.victory.contains(script) && !this.map.contains(script))
            .collect();
        Self::set_custom(settings, custom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_cache::MapType;
    use crate::settings::testing::{count_notification, notifications, settings};

    #[test]
    fn test_map_scripts_notify_watchers() {
        let mut settings = settings();
        settings.watch::<TriggerScripts>(count_notification, &["map"], false);
        Map::select_type(&mut settings, MapType::Scenario);
        let before = notifications();

        Map::select_map(&mut settings, "twin_rivers");
        assert_eq!(notifications(), before + 1);
        assert_eq!(settings.get::<TriggerScripts>().map(), ["scenarios/twin_rivers.js"]);
    }

    #[test]
    fn test_victory_scripts_notify_watchers() {
        let mut settings = settings();
        settings.watch::<TriggerScripts>(count_notification, &["victory"], true);

        VictoryConditions::set_enabled(&mut settings, "wonder", true).unwrap();
        assert!(notifications() > 0);
        assert!(settings
            .get::<TriggerScripts>()
            .victory()
            .contains(&"scripts/WonderVictory.js".to_string()));
    }

    #[test]
    fn test_finalize_merges_sources() {
        let mut settings = settings();
        Map::select_type(&mut settings, MapType::Scenario);
        Map::select_map(&mut settings, "twin_rivers");
        TriggerScripts::set_custom(&mut settings, vec!["scripts/Custom.js".into()]);

        let payload = settings.serialize();
        let scripts = payload.setting::<Vec<String>>(KEY).unwrap();
        assert_eq!(scripts.first().map(String::as_str), Some("scripts/Custom.js"));
        assert!(scripts.contains(&"scripts/WonderVictory.js".to_string()));
        assert!(scripts.contains(&"scenarios/twin_rivers.js".to_string()));
        let helper = scripts.iter().filter(|s| *s == "scripts/TriggerHelper.js").count();
        assert_eq!(helper, 1);
    }

    #[test]
    fn test_reading_payload_subtracts_derived_scripts() {
        let mut settings = settings();
        TriggerScripts::set_custom(&mut settings, vec!["scripts/Custom.js".into()]);
        let payload = settings.serialize();

        TriggerScripts::set_custom(&mut settings, Vec::new());
        settings.deserialize(&payload);
        assert_eq!(settings.get::<TriggerScripts>().custom(), ["scripts/Custom.js"]);
    }
}
