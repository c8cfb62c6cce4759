//! Per-player team assignment.
//!
//! `values` and `locked` hold one entry per player. Both vectors are mutated
//! in place, so every mutator triggers `values` / `locked` explicitly.

use serde_json::Value;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::error::{Result, SetupError};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::{check_slot, Map, PlayerCount};

/// Team index of a player without a team.
pub const NO_TEAM: i32 = -1;

/// Team and lock state per player slot.
#[derive(Debug, Default)]
pub struct PlayerTeam {
    observable: SettingsObservable,
    values: Vec<i32>,
    locked: Vec<bool>,
}

impl PlayerTeam {
    /// Team per player, [`NO_TEAM`] for none.
    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Lock flag per player; locked slots are imposed by the map.
    #[must_use]
    pub fn locked(&self) -> &[bool] {
        &self.locked
    }

    /// Team of one player.
    #[must_use]
    pub fn team(&self, player: usize) -> Option<i32> {
        self.values.get(player).copied()
    }

    /// Assign `player` to `team`.
    pub fn set_team(settings: &mut MatchSettings, player: usize, team: i32) -> Result<()> {
        check_slot(player, settings.player_team.values.len())?;
        if settings.player_team.locked[player] {
            return Err(SetupError::SlotLocked {
                attribute: Self::NAME,
                player,
            });
        }
        let max_teams = settings.catalog.max_teams;
        if !(NO_TEAM..max_teams).contains(&team) {
            return Err(SetupError::TeamOutOfRange { team, max_teams });
        }
        if settings.player_team.values[player] != team {
            let old = settings.player_team.values.clone();
            settings.player_team.values[player] = team;
            settings.trigger::<Self>("values", Value::from(old));
        }
        Ok(())
    }

    /// Grow with unlocked [`NO_TEAM`] slots or truncate from the tail.
    fn resize(settings: &mut MatchSettings) {
        let players = settings.players();
        let this = &mut settings.player_team;
        if this.values.len() == players && this.locked.len() == players {
            return;
        }
        let old_values = this.values.clone();
        let old_locked = this.locked.clone();
        this.values.resize(players, NO_TEAM);
        this.locked.resize(players, false);
        settings.trigger::<Self>("values", Value::from(old_values));
        settings.trigger::<Self>("locked", Value::from(old_locked));
    }

    fn on_player_count_change(settings: &mut MatchSettings, _: &Change) {
        Self::resize(settings);
    }

    fn on_type_change(settings: &mut MatchSettings, change: &Change) {
        if change.old_as::<MapType>() == Some(MapType::Scenario)
            && settings.player_team.locked.iter().any(|locked| *locked)
        {
            let old = std::mem::replace(
                &mut settings.player_team.locked,
                vec![false; settings.player_count.nb_players()],
            );
            settings.trigger::<Self>("locked", Value::from(old));
        }
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if settings.map.kind() != MapType::Scenario || settings.map_player_count().is_none() {
            return;
        }
        let authored: Vec<Option<i32>> = (0..settings.players())
            .map(|player| settings.map_player_setting::<i32>(player, "Team"))
            .collect();
        let teams: Vec<i32> = authored.iter().map(|team| team.unwrap_or(NO_TEAM)).collect();
        let locked: Vec<bool> = authored.iter().map(Option::is_some).collect();

        let old = std::mem::replace(&mut settings.player_team.values, teams);
        let changed = old != settings.player_team.values;
        settings.fire::<Self, _>("values", &old, changed);
        let old = std::mem::replace(&mut settings.player_team.locked, locked);
        let changed = old != settings.player_team.locked;
        settings.fire::<Self, _>("locked", &old, changed);
    }
}

impl Attribute for PlayerTeam {
    const NAME: &'static str = "playerTeam";

    attribute_slot!(player_team);

    fn init(settings: &mut MatchSettings) {
        let players = settings.players();
        settings.player_team.values = vec![NO_TEAM; players];
        settings.player_team.locked = vec![false; players];
        settings.watch::<PlayerCount>(Self::on_player_count_change, &["nb_players"], true);
        settings.watch::<Map>(Self::on_type_change, &["type"], true);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        for (player, team) in settings.player_team.values.iter().enumerate() {
            payload.set_player_setting(player, "Team", *team);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        let max_teams = settings.catalog.max_teams;
        let old = settings.player_team.values.clone();
        let this = &mut settings.player_team;
        for player in 0..this.values.len() {
            if this.locked[player] {
                continue;
            }
            match payload.player_setting::<i32>(player, "Team") {
                Some(team) if (NO_TEAM..max_teams).contains(&team) => this.values[player] = team,
                Some(team) => tracing::debug!(player, team, "Ignoring out of range team"),
                None => {}
            }
        }
        if old != this.values {
            settings.trigger::<Self>("values", Value::from(old));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::settings;

    #[test]
    fn test_grow_appends_unlocked_free_slots() {
        let mut settings = settings();
        PlayerTeam::set_team(&mut settings, 1, 0).unwrap();
        PlayerCount::set_nb_players(&mut settings, 4);

        let teams = settings.get::<PlayerTeam>();
        assert_eq!(teams.values(), [NO_TEAM, 0, NO_TEAM, NO_TEAM]);
        assert_eq!(teams.locked(), [false; 4]);
    }

    #[test]
    fn test_shrink_truncates_tail() {
        let mut settings = settings();
        PlayerCount::set_nb_players(&mut settings, 4);
        PlayerTeam::set_team(&mut settings, 0, 1).unwrap();
        PlayerTeam::set_team(&mut settings, 3, 2).unwrap();
        PlayerCount::set_nb_players(&mut settings, 2);

        assert_eq!(settings.get::<PlayerTeam>().values(), [1, NO_TEAM]);
    }

    #[test]
    fn test_scenario_teams_are_imposed_and_locked() {
        let mut settings = settings();
        Map::select_type(&mut settings, MapType::Scenario);
        Map::select_map(&mut settings, "twin_rivers");

        let teams = settings.get::<PlayerTeam>();
        assert_eq!(teams.values(), [0, 0, 1, 1]);
        assert_eq!(teams.locked(), [true; 4]);
        assert!(matches!(
            PlayerTeam::set_team(&mut settings, 0, 1),
            Err(SetupError::SlotLocked { player: 0, .. })
        ));

        Map::select_type(&mut settings, MapType::Skirmish);
        assert!(settings.get::<PlayerTeam>().locked().iter().all(|locked| !locked));
    }

    #[test]
    fn test_scenario_without_teams_leaves_slots_open() {
        let mut settings = settings();
        Map::select_type(&mut settings, MapType::Scenario);
        Map::select_map(&mut settings, "twin_rivers");
        Map::select_map(&mut settings, "border_watch");

        let teams = settings.get::<PlayerTeam>();
        assert_eq!(teams.values(), [NO_TEAM; 3]);
        assert_eq!(teams.locked(), [false; 3]);
        PlayerTeam::set_team(&mut settings, 2, 1).unwrap();
        assert_eq!(settings.get::<PlayerTeam>().team(2), Some(1));
    }

    #[test]
    fn test_set_team_validates_input() {
        let mut settings = settings();
        assert!(matches!(
            PlayerTeam::set_team(&mut settings, 5, 0),
            Err(SetupError::PlayerOutOfRange { player: 5, players: 2 })
        ));
        assert!(matches!(
            PlayerTeam::set_team(&mut settings, 0, 4),
            Err(SetupError::TeamOutOfRange { team: 4, .. })
        ));
        assert!(PlayerTeam::set_team(&mut settings, 0, NO_TEAM).is_ok());
    }
}
