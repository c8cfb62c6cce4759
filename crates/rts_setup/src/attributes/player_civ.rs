//! Per-player civilization.

use serde_json::Value;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable, RANDOM};
use crate::error::{Result, SetupError};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::{check_slot, Map, PlayerCount};

/// Civ code per slot, or `"random"`.
///
/// Scenario maps impose their authored civs and lock the slots. Skirmish maps
/// preset them but leave them editable.
#[derive(Debug, Default)]
pub struct PlayerCiv {
    observable: SettingsObservable,
    values: Vec<String>,
    locked: Vec<bool>,
}

impl PlayerCiv {
    /// Civ per player.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Lock flag per player.
    #[must_use]
    pub fn locked(&self) -> &[bool] {
        &self.locked
    }

    /// Set the civ of one player. Unknown civs become `"random"`.
    pub fn set_civ(settings: &mut MatchSettings, player: usize, civ: &str) -> Result<()> {
        check_slot(player, settings.player_civ.values.len())?;
        if settings.player_civ.locked[player] {
            return Err(SetupError::SlotLocked {
                attribute: Self::NAME,
                player,
            });
        }
        let civ = normalize(settings, civ);
        if settings.player_civ.values[player] != civ {
            let old = settings.player_civ.values.clone();
            settings.player_civ.values[player] = civ;
            settings.trigger::<Self>("values", Value::from(old));
        }
        Ok(())
    }

    fn on_player_count_change(settings: &mut MatchSettings, _: &Change) {
        let players = settings.players();
        let old = settings.player_civ.values.clone();
        let this = &mut settings.player_civ;
        this.values.resize(players, RANDOM.to_string());
        this.locked.resize(players, false);
        settings.trigger::<Self>("values", Value::from(old));
    }

    fn on_type_change(settings: &mut MatchSettings, change: &Change) {
        if change.old_as::<MapType>() == Some(MapType::Scenario) {
            let old = settings.player_civ.locked.clone();
            settings.player_civ.locked.fill(false);
            settings.trigger::<Self>("locked", Value::from(old));
        }
    }

    /// Apply the civs the map authors. On scenarios exactly the authored
    /// slots are locked.
    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let scenario = match settings.map.kind() {
            MapType::Random => return,
            MapType::Scenario => true,
            MapType::Skirmish => false,
        };
        let mut values = settings.player_civ.values.clone();
        let mut locked = vec![false; values.len()];
        for player in 0..values.len() {
            let Some(civ) = settings.map_player_setting::<String>(player, "Civ") else {
                continue;
            };
            values[player] = normalize(settings, &civ);
            locked[player] = scenario;
        }
        let old = std::mem::replace(&mut settings.player_civ.values, values);
        let changed = old != settings.player_civ.values;
        settings.fire::<Self, _>("values", &old, changed);
        let old = std::mem::replace(&mut settings.player_civ.locked, locked);
        let changed = old != settings.player_civ.locked;
        settings.fire::<Self, _>("locked", &old, changed);
    }
}

fn normalize(settings: &MatchSettings, civ: &str) -> String {
    if civ == RANDOM || settings.catalog.has_civ(civ) {
        civ.to_string()
    } else {
        tracing::warn!(civ, "Unknown civilization, using random");
        RANDOM.to_string()
    }
}

impl Attribute for PlayerCiv {
    const NAME: &'static str = "playerCiv";

    attribute_slot!(player_civ);

    fn init(settings: &mut MatchSettings) {
        let players = settings.players();
        settings.player_civ.values = vec![RANDOM.to_string(); players];
        settings.player_civ.locked = vec![false; players];
        settings.watch::<PlayerCount>(Self::on_player_count_change, &["nb_players"], true);
        settings.watch::<Map>(Self::on_type_change, &["type"], true);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        for (player, civ) in settings.player_civ.values.iter().enumerate() {
            payload.set_player_setting(player, "Civ", civ.as_str());
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        let old = settings.player_civ.values.clone();
        for player in 0..settings.player_civ.values.len() {
            if settings.player_civ.locked[player] {
                continue;
            }
            if let Some(civ) = payload.player_setting::<String>(player, "Civ") {
                settings.player_civ.values[player] = normalize(settings, &civ);
            }
        }
        if old != settings.player_civ.values {
            settings.trigger::<Self>("values", Value::from(old));
        }
    }

    fn pick_random_items(settings: &mut MatchSettings) -> bool {
        let codes: Vec<String> = settings
            .catalog
            .civilizations
            .iter()
            .map(|civ| civ.code.clone())
            .collect();
        let old = settings.player_civ.values.clone();
        let mut picked = false;
        for player in 0..old.len() {
            if old[player] != RANDOM {
                continue;
            }
            if let Some(civ) = settings.choose(&codes) {
                settings.player_civ.values[player] = civ;
                picked = true;
            }
        }
        if picked {
            settings.trigger::<Self>("values", Value::from(old));
        }
        picked
    }

    fn holds_random(settings: &MatchSettings) -> bool {
        settings.player_civ.values.iter().any(|civ| civ == RANDOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::settings;

    #[test]
    fn test_scenario_civs_are_locked() {
        let mut settings = settings();
        Map::select_type(&mut settings, MapType::Scenario);
        Map::select_map(&mut settings, "twin_rivers");

        let civs = settings.get::<PlayerCiv>();
        assert_eq!(civs.values(), ["rome", "rome", "cart", "cart"]);
        assert!(civs.locked().iter().all(|locked| *locked));
        assert!(PlayerCiv::set_civ(&mut settings, 2, "athen").is_err());
    }

    #[test]
    fn test_scenario_switch_locks_only_authored_civs() {
        let mut settings = settings();
        Map::select_type(&mut settings, MapType::Scenario);
        Map::select_map(&mut settings, "twin_rivers");
        Map::select_map(&mut settings, "border_watch");

        let civs = settings.get::<PlayerCiv>();
        assert_eq!(civs.values()[0], "brit");
        assert_eq!(civs.locked(), [true, false, false]);
        PlayerCiv::set_civ(&mut settings, 1, "athen").unwrap();
        assert!(PlayerCiv::set_civ(&mut settings, 0, "athen").is_err());
    }

    #[test]
    fn test_skirmish_civs_stay_editable() {
        let mut settings = settings();
        Map::select_type(&mut settings, MapType::Skirmish);
        Map::select_map(&mut settings, "skirmish_4v4");
        assert_eq!(settings.get::<PlayerCiv>().values()[0], "athen");

        PlayerCiv::set_civ(&mut settings, 0, "han").unwrap();
        assert_eq!(settings.get::<PlayerCiv>().values()[0], "han");
    }

    #[test]
    fn test_unknown_civ_becomes_random_and_resolves() {
        let mut settings = settings();
        PlayerCiv::set_civ(&mut settings, 0, "atlantis").unwrap();
        assert!(PlayerCiv::holds_random(&settings));

        assert!(PlayerCiv::pick_random_items(&mut settings));
        assert!(!PlayerCiv::holds_random(&settings));
        let catalog = settings.catalog().clone();
        assert!(settings.get::<PlayerCiv>().values().iter().all(|civ| catalog.has_civ(civ)));
        assert!(!PlayerCiv::pick_random_items(&mut settings));
    }
}
