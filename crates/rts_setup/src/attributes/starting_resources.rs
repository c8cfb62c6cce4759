//! Starting resources, with per-player amounts authored by scenarios.

use serde_json::Value;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::{Map, PlayerCount};

/// Match-wide starting resources and per-player overrides.
#[derive(Debug, Default)]
pub struct StartingResources {
    observable: SettingsObservable,
    value: u32,
    per_player: Vec<Option<u32>>,
}

impl StartingResources {
    /// Match-wide amount.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Effective amount of one player.
    #[must_use]
    pub fn player_resources(&self, player: usize) -> Option<u32> {
        self.per_player
            .get(player)
            .map(|amount| amount.unwrap_or(self.value))
    }

    /// Set the match-wide amount.
    pub fn set_value(settings: &mut MatchSettings, value: u32) {
        let old = std::mem::replace(&mut settings.starting_resources.value, value);
        settings.fire::<Self, _>("value", &old, old != value);
    }

    fn set_per_player(settings: &mut MatchSettings, per_player: Vec<Option<u32>>) {
        if per_player == settings.starting_resources.per_player {
            return;
        }
        let old = std::mem::replace(&mut settings.starting_resources.per_player, per_player);
        settings.trigger::<Self>("per_player", Value::from(old));
    }

    fn on_player_count_change(settings: &mut MatchSettings, _: &Change) {
        let mut per_player = settings.starting_resources.per_player.clone();
        per_player.resize(settings.players(), None);
        Self::set_per_player(settings, per_player);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if settings.map.kind() != MapType::Scenario {
            let cleared = vec![None; settings.players()];
            Self::set_per_player(settings, cleared);
            return;
        }
        let per_player = (0..settings.players())
            .map(|player| settings.map_player_setting::<u32>(player, "Resources"))
            .collect();
        Self::set_per_player(settings, per_player);
    }
}

impl Attribute for StartingResources {
    const NAME: &'static str = "startingResources";

    attribute_slot!(starting_resources);

    fn init(settings: &mut MatchSettings) {
        settings.starting_resources.value = *settings.catalog.starting_resources.default_value();
        settings.starting_resources.per_player = vec![None; settings.players()];
        settings.watch::<PlayerCount>(Self::on_player_count_change, &["nb_players"], true);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        let this = &settings.starting_resources;
        payload.set_setting("StartingResources", this.value);
        for (player, amount) in this.per_player.iter().enumerate() {
            payload.set_player_setting(player, "Resources", amount.unwrap_or(this.value));
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(value) = payload.setting::<u32>("StartingResources") {
            Self::set_value(settings, value);
        }
        let value = settings.starting_resources.value;
        let per_player = (0..settings.starting_resources.per_player.len())
            .map(|player| {
                payload
                    .player_setting::<u32>(player, "Resources")
                    .filter(|amount| *amount != value)
            })
            .collect();
        Self::set_per_player(settings, per_player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::settings;

    #[test]
    fn test_catalog_default_applies_to_every_player() {
        let settings = settings();
        let payload = settings.serialize();
        assert_eq!(payload.setting::<u32>("StartingResources"), Some(300));
        assert_eq!(payload.player_setting::<u32>(1, "Resources"), Some(300));
    }

    #[test]
    fn test_scenario_amounts_are_kept_per_player() {
        let mut settings = settings();
        Map::select_type(&mut settings, MapType::Scenario);
        Map::select_map(&mut settings, "twin_rivers");
        let resources = settings.get::<StartingResources>();
        assert_eq!(resources.player_resources(0), Some(1000));
        assert_eq!(resources.player_resources(3), Some(500));

        Map::select_type(&mut settings, MapType::Skirmish);
        Map::select_map(&mut settings, "skirmish_4v4");
        assert_eq!(settings.get::<StartingResources>().player_resources(0), Some(300));
    }
}
