//! Concrete settings attributes.
//!
//! Each module owns one slice of the match settings. Map-dependent attributes
//! watch [`Map`]; per-player attributes additionally watch [`PlayerCount`]
//! and keep one entry per slot.

mod biome;
mod ceasefire;
mod cheats;
mod circular_map;
mod daytime;
mod game_speed;
mod landscape;
mod locked_teams;
mod map;
mod map_exploration;
mod map_size;
mod nomad;
mod player_ai;
mod player_civ;
mod player_count;
mod player_team;
mod population_cap;
mod rating;
mod regicide_garrison;
mod relic;
mod sea_level_rise;
mod seeds;
mod starting_camera;
mod starting_resources;
mod team_placement;
mod trigger_difficulty;
mod trigger_scripts;
mod victory_conditions;
mod wonder;

pub use biome::Biome;
pub use ceasefire::Ceasefire;
pub use cheats::Cheats;
pub use circular_map::CircularMap;
pub use daytime::Daytime;
pub use game_speed::GameSpeed;
pub use landscape::{Landscape, LandscapeGroup};
pub use locked_teams::LockedTeams;
pub use map::Map;
pub use map_exploration::MapExploration;
pub use map_size::MapSize;
pub use nomad::Nomad;
pub use player_ai::{AiSettings, PlayerAi};
pub use player_civ::PlayerCiv;
pub use player_count::{PlayerCount, DEFAULT_PLAYERS};
pub use player_team::{PlayerTeam, NO_TEAM};
pub use population_cap::PopulationCap;
pub use rating::Rating;
pub use regicide_garrison::RegicideGarrison;
pub use relic::Relic;
pub use sea_level_rise::{SeaLevelRange, SeaLevelRise};
pub use seeds::Seeds;
pub use starting_camera::{Camera, CameraVector, StartingCamera};
pub use starting_resources::StartingResources;
pub use team_placement::TeamPlacement;
pub use trigger_difficulty::TriggerDifficulty;
pub use trigger_scripts::TriggerScripts;
pub use victory_conditions::VictoryConditions;
pub use wonder::Wonder;

use crate::error::{Result, SetupError};
use crate::registry::AttributeRegistry;

/// Every attribute in declared order.
#[must_use]
pub fn standard_registry() -> AttributeRegistry {
    AttributeRegistry::new()
        .register::<Map>()
        .register::<MapSize>()
        .register::<PlayerCount>()
        .register::<PlayerTeam>()
        .register::<PlayerCiv>()
        .register::<PlayerAi>()
        .register::<StartingCamera>()
        .register::<GameSpeed>()
        .register::<Biome>()
        .register::<Landscape>()
        .register::<Daytime>()
        .register::<SeaLevelRise>()
        .register::<TeamPlacement>()
        .register::<CircularMap>()
        .register::<Nomad>()
        .register::<MapExploration>()
        .register::<Ceasefire>()
        .register::<PopulationCap>()
        .register::<StartingResources>()
        .register::<VictoryConditions>()
        .register::<Wonder>()
        .register::<Relic>()
        .register::<RegicideGarrison>()
        .register::<Rating>()
        .register::<Cheats>()
        .register::<LockedTeams>()
        .register::<TriggerDifficulty>()
        .register::<TriggerScripts>()
        .register::<Seeds>()
}

/// Reject a per-player edit for a slot past the current player count.
pub(crate) fn check_slot(player: usize, players: usize) -> Result<()> {
    if player < players {
        Ok(())
    } else {
        Err(SetupError::PlayerOutOfRange { player, players })
    }
}
