//! Population cap, with per-player limits authored by scenarios.

use serde_json::Value;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::{Map, PlayerCount};

/// Match-wide population cap and per-player overrides.
#[derive(Debug, Default)]
pub struct PopulationCap {
    observable: SettingsObservable,
    value: u32,
    per_player: Vec<Option<u32>>,
}

impl PopulationCap {
    /// Match-wide cap.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Effective cap of one player.
    #[must_use]
    pub fn player_limit(&self, player: usize) -> Option<u32> {
        self.per_player
            .get(player)
            .map(|limit| limit.unwrap_or(self.value))
    }

    /// Set the match-wide cap. Scenario overrides are kept.
    pub fn set_value(settings: &mut MatchSettings, value: u32) {
        let old = std::mem::replace(&mut settings.population_cap.value, value);
        settings.fire::<Self, _>("value", &old, old != value);
    }

    fn set_per_player(settings: &mut MatchSettings, per_player: Vec<Option<u32>>) {
        if per_player == settings.population_cap.per_player {
            return;
        }
        let old = std::mem::replace(&mut settings.population_cap.per_player, per_player);
        settings.trigger::<Self>("per_player", Value::from(old));
    }

    fn on_player_count_change(settings: &mut MatchSettings, _: &Change) {
        let mut per_player = settings.population_cap.per_player.clone();
        per_player.resize(settings.players(), None);
        Self::set_per_player(settings, per_player);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let scenario = settings.map.kind() == MapType::Scenario;
        let per_player = (0..settings.players())
            .map(|player| {
                scenario
                    .then(|| settings.map_player_setting::<u32>(player, "PopulationLimit"))
                    .flatten()
            })
            .collect();
        Self::set_per_player(settings, per_player);
    }
}

impl Attribute for PopulationCap {
    const NAME: &'static str = "populationCap";

    attribute_slot!(population_cap);

    fn init(settings: &mut MatchSettings) {
        settings.population_cap.value = *settings.catalog.population_caps.default_value();
        settings.population_cap.per_player = vec![None; settings.players()];
        settings.watch::<PlayerCount>(Self::on_player_count_change, &["nb_players"], true);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        let this = &settings.population_cap;
        payload.set_setting("PopulationCap", this.value);
        for (player, limit) in this.per_player.iter().enumerate() {
            payload.set_player_setting(player, "PopulationLimit", limit.unwrap_or(this.value));
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(value) = payload.setting::<u32>("PopulationCap") {
            Self::set_value(settings, value);
        }
        let value = settings.population_cap.value;
        let per_player = (0..settings.population_cap.per_player.len())
            .map(|player| {
                payload
                    .player_setting::<u32>(player, "PopulationLimit")
                    .filter(|limit| *limit != value)
            })
            .collect();
        Self::set_per_player(settings, per_player);
    }
}
