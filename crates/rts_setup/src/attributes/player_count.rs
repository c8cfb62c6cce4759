//! Number of player slots.
//!
//! Random maps let the host choose the count. Scenario and skirmish maps
//! dictate it through the length of their authored `PlayerData`.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Player count applied when switching to random maps.
pub const DEFAULT_PLAYERS: usize = 2;

/// Number of player slots. Fires `nb_players`.
#[derive(Debug, Default)]
pub struct PlayerCount {
    observable: SettingsObservable,
    nb_players: usize,
}

impl PlayerCount {
    /// Current number of players.
    #[must_use]
    pub fn nb_players(&self) -> usize {
        self.nb_players
    }

    /// Set the number of players, clamped to `1..=max_players`.
    pub fn set_nb_players(settings: &mut MatchSettings, nb_players: usize) {
        let clamped = nb_players.clamp(1, settings.catalog.max_players);
        if clamped != nb_players {
            tracing::debug!(requested = nb_players, clamped, "Clamped player count");
        }
        let old = std::mem::replace(&mut settings.player_count.nb_players, clamped);
        settings.fire::<Self, _>("nb_players", &old, old != clamped);
    }

    fn on_type_change(settings: &mut MatchSettings, change: &Change) {
        // Re-entrant map updates may re-assign the same type.
        if settings.map.kind() == MapType::Random
            && change.old_as::<MapType>() != Some(MapType::Random)
        {
            Self::set_nb_players(settings, DEFAULT_PLAYERS);
        }
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if settings.map.kind() == MapType::Random {
            return;
        }
        if let Some(authored) = settings.map_player_count() {
            Self::set_nb_players(settings, authored);
        }
    }
}

impl Attribute for PlayerCount {
    const NAME: &'static str = "playerCount";

    attribute_slot!(player_count);

    fn init(settings: &mut MatchSettings) {
        settings.player_count.nb_players = DEFAULT_PLAYERS;
        settings.watch::<Map>(Self::on_type_change, &["type"], false);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.resize_player_data(settings.player_count.nb_players);
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(players) = payload.player_count() {
            Self::set_nb_players(settings, players);
        }
    }
}
