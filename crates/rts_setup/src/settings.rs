//! The settings registry.
//!
//! [`MatchSettings`] owns one instance of every attribute, the static catalog,
//! the map cache and the session RNG. It drives the three cross-cutting
//! passes: initialization, payload (de)serialization and random resolution.
//!
//! # Random resolution
//!
//! Dependencies between attributes are registered at runtime through
//! watchers, so there is no static evaluation order. Resolution instead
//! relaxes locally: every pass asks each attribute, in declared order, to
//! resolve what it can. Resolving the map unlocks the biome options,
//! resolving the player count unlocks civ slots, and so on. The loop stops at
//! the first pass in which nothing was resolved. Exceeding
//! [`MAX_RESOLVE_PASSES`] means a watcher chain keeps reintroducing random
//! values and is reported as an error.

use std::fmt;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute::Attribute;
use crate::attributes::{
    self, Biome, Ceasefire, Cheats, CircularMap, Daytime, GameSpeed, Landscape, LockedTeams, Map,
    MapExploration, MapSize, Nomad, PlayerAi, PlayerCiv, PlayerCount, PlayerTeam, PopulationCap,
    Rating, RegicideGarrison, Relic, SeaLevelRise, Seeds, StartingCamera, StartingResources,
    TeamPlacement, TriggerDifficulty, TriggerScripts, VictoryConditions, Wonder,
};
use crate::catalog::SettingsCatalog;
use crate::error::{Result, SetupError};
use crate::map_cache::{MapCache, MapData, MapType};
use crate::observable::{self, Change, WatchFn};
use crate::payload::{InitAttributes, PLAYER_DATA_KEY};
use crate::registry::AttributeRegistry;
use crate::session::SessionConfig;

/// Upper bound on random resolution passes.
pub const MAX_RESOLVE_PASSES: u32 = 32;

/// The settings of one match setup session.
pub struct MatchSettings {
    pub(crate) map: Map,
    pub(crate) map_size: MapSize,
    pub(crate) player_count: PlayerCount,
    pub(crate) player_team: PlayerTeam,
    pub(crate) player_civ: PlayerCiv,
    pub(crate) player_ai: PlayerAi,
    pub(crate) starting_camera: StartingCamera,
    pub(crate) game_speed: GameSpeed,
    pub(crate) biome: Biome,
    pub(crate) landscape: Landscape,
    pub(crate) daytime: Daytime,
    pub(crate) sea_level_rise: SeaLevelRise,
    pub(crate) team_placement: TeamPlacement,
    pub(crate) circular_map: CircularMap,
    pub(crate) nomad: Nomad,
    pub(crate) map_exploration: MapExploration,
    pub(crate) ceasefire: Ceasefire,
    pub(crate) population_cap: PopulationCap,
    pub(crate) starting_resources: StartingResources,
    pub(crate) victory_conditions: VictoryConditions,
    pub(crate) wonder: Wonder,
    pub(crate) relic: Relic,
    pub(crate) regicide_garrison: RegicideGarrison,
    pub(crate) rating: Rating,
    pub(crate) cheats: Cheats,
    pub(crate) locked_teams: LockedTeams,
    pub(crate) trigger_difficulty: TriggerDifficulty,
    pub(crate) trigger_scripts: TriggerScripts,
    pub(crate) seeds: Seeds,

    pub(crate) catalog: SettingsCatalog,
    pub(crate) session: SessionConfig,
    pub(crate) rng: ChaCha8Rng,
    map_cache: Box<dyn MapCache>,
    registry: AttributeRegistry,
}

impl MatchSettings {
    /// Build and initialize every attribute for a new session.
    pub fn new(
        session: SessionConfig,
        catalog: SettingsCatalog,
        map_cache: impl MapCache + 'static,
    ) -> Result<Self> {
        catalog.validate()?;
        let rng = match session.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut settings = Self {
            map: Map::default(),
            map_size: MapSize::default(),
            player_count: PlayerCount::default(),
            player_team: PlayerTeam::default(),
            player_civ: PlayerCiv::default(),
            player_ai: PlayerAi::default(),
            starting_camera: StartingCamera::default(),
            game_speed: GameSpeed::default(),
            biome: Biome::default(),
            landscape: Landscape::default(),
            daytime: Daytime::default(),
            sea_level_rise: SeaLevelRise::default(),
            team_placement: TeamPlacement::default(),
            circular_map: CircularMap::default(),
            nomad: Nomad::default(),
            map_exploration: MapExploration::default(),
            ceasefire: Ceasefire::default(),
            population_cap: PopulationCap::default(),
            starting_resources: StartingResources::default(),
            victory_conditions: VictoryConditions::default(),
            wonder: Wonder::default(),
            relic: Relic::default(),
            regicide_garrison: RegicideGarrison::default(),
            rating: Rating::default(),
            cheats: Cheats::default(),
            locked_teams: LockedTeams::default(),
            trigger_difficulty: TriggerDifficulty::default(),
            trigger_scripts: TriggerScripts::default(),
            seeds: Seeds::default(),
            catalog,
            session,
            rng,
            map_cache: Box::new(map_cache),
            registry: attributes::standard_registry(),
        };
        settings.init_all();
        Ok(settings)
    }

    /// Run every attribute's `init` in declared order.
    fn init_all(&mut self) {
        for entry in self.registry.entries().to_vec() {
            (entry.init)(self);
        }
        tracing::debug!(attributes = self.registry.len(), "Match settings initialized");
    }

    /// Collapse all attribute state into a fresh payload.
    ///
    /// Every attribute writes its part in declared order, then every
    /// attribute may refine the result. Calling this twice without an
    /// intervening mutation yields equal payloads.
    #[must_use]
    pub fn serialize(&self) -> InitAttributes {
        let mut payload = InitAttributes::new();
        for entry in self.registry.entries() {
            (entry.to_init_attributes)(self, &mut payload);
        }
        for entry in self.registry.entries() {
            (entry.on_finalize_attributes)(self, &mut payload);
        }
        payload
    }

    /// Hydrate attribute state from a received or loaded payload.
    pub fn deserialize(&mut self, payload: &InitAttributes) {
        for entry in self.registry.entries().to_vec() {
            (entry.from_init_attributes)(self, payload);
        }
    }

    /// Resolve every random sentinel by repeated passes until none resolves
    /// anything. Returns the number of passes taken.
    pub fn resolve_randomness(&mut self) -> Result<u32> {
        let entries = self.registry.entries().to_vec();
        for pass in 1..=MAX_RESOLVE_PASSES {
            let mut picked = Vec::new();
            for entry in &entries {
                if (entry.pick_random_items)(self) {
                    picked.push(entry.name);
                }
            }
            tracing::debug!(pass, ?picked, "Random resolution pass");
            if picked.is_empty() {
                if let Some(attribute) = self.unresolved().first().copied() {
                    return Err(SetupError::UnresolvedRandom { attribute });
                }
                return Ok(pass);
            }
        }
        Err(SetupError::RandomnessDidNotConverge {
            passes: MAX_RESOLVE_PASSES,
        })
    }

    /// Names of the attributes still holding a random sentinel, in declared
    /// order.
    #[must_use]
    pub fn unresolved(&self) -> Vec<&'static str> {
        self.registry
            .entries()
            .iter()
            .filter(|entry| (entry.holds_random)(self))
            .map(|entry| entry.name)
            .collect()
    }

    /// Resolve randomness and produce the payload for the match launcher.
    pub fn prepare_launch(&mut self) -> Result<InitAttributes> {
        let passes = self.resolve_randomness()?;
        let payload = self.serialize();
        tracing::info!(
            passes,
            map = ?self.map.map(),
            players = self.player_count.nb_players(),
            "Launch payload prepared"
        );
        Ok(payload)
    }

    /// Read access to one attribute.
    #[must_use]
    pub fn get<A: Attribute>(&self) -> &A {
        A::slot(self)
    }

    /// The static settings catalog.
    #[must_use]
    pub fn catalog(&self) -> &SettingsCatalog {
        &self.catalog
    }

    /// The session configuration.
    #[must_use]
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// The declared attribute order.
    #[must_use]
    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    /// Register `callback` on properties of attribute `A`.
    pub fn watch<A: Attribute>(
        &mut self,
        callback: WatchFn<MatchSettings>,
        properties: &[&'static str],
        only_change: bool,
    ) {
        A::slot_mut(self)
            .observable_mut()
            .watch(callback, properties, only_change);
    }

    /// Fire every watcher of `A.property` as if it had changed.
    ///
    /// Needed after in-place mutation that bypasses a setter.
    pub fn trigger<A: Attribute>(&mut self, property: &'static str, old: Value) {
        self.dispatch::<A>(property, old, true);
    }

    /// Notify watchers of an assignment made by one of `A`'s setters.
    pub(crate) fn fire<A, T>(&mut self, property: &'static str, old: &T, changed: bool)
    where
        A: Attribute,
        T: Serialize + ?Sized,
    {
        if A::slot(self).observable().watcher_count(property) == 0 {
            return;
        }
        let old = serde_json::to_value(old).unwrap_or(Value::Null);
        self.dispatch::<A>(property, old, changed);
    }

    fn dispatch<A: Attribute>(&mut self, property: &'static str, old: Value, changed: bool) {
        let watchers = A::slot(self).observable().watchers(property, changed);
        if watchers.is_empty() {
            return;
        }
        tracing::trace!(
            attribute = A::NAME,
            property,
            changed,
            watchers = watchers.len(),
            "Dispatching watchers"
        );
        let change = Change {
            attribute: A::NAME,
            property,
            old,
        };
        observable::dispatch(self, &watchers, &change);
    }

    /// Look up authored metadata through the map cache.
    pub(crate) fn lookup_map(&self, kind: MapType, name: &str) -> Option<MapData> {
        self.map_cache.get_map_data(kind, name)
    }

    /// Typed read of the selected map's `settings.<key>`.
    ///
    /// `None` if no map is selected, the key is missing, or the value does
    /// not decode as `T`.
    #[must_use]
    pub fn map_setting<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.map.data()?.settings.get(key)?;
        decode_authored(key, value)
    }

    /// Typed read of the selected map's `settings.PlayerData[player].<key>`.
    #[must_use]
    pub fn map_player_setting<T: DeserializeOwned>(&self, player: usize, key: &str) -> Option<T> {
        let value = self
            .map
            .data()?
            .settings
            .get(PLAYER_DATA_KEY)?
            .get(player)?
            .get(key)?;
        decode_authored(key, value)
    }

    /// Number of authored `PlayerData` entries on the selected map.
    #[must_use]
    pub fn map_player_count(&self) -> Option<usize> {
        self.map
            .data()?
            .settings
            .get(PLAYER_DATA_KEY)?
            .as_array()
            .map(Vec::len)
    }

    /// Pick one of `options` with the session RNG.
    pub(crate) fn choose<T: Clone>(&mut self, options: &[T]) -> Option<T> {
        options.choose(&mut self.rng).cloned()
    }

    /// Current player count, used by every per-player attribute.
    pub(crate) fn players(&self) -> usize {
        self.player_count.nb_players()
    }
}

fn decode_authored<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!(key, error = %e, "Ignoring malformed map setting");
            None
        }
    }
}

impl fmt::Debug for MatchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchSettings")
            .field("session", &self.session)
            .field("map", &self.map)
            .field("player_count", &self.player_count)
            .field("attributes", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Map-authored id entry (`{ "Id": "..." }`), shared by several attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredId {
    /// Identifier.
    #[serde(rename = "Id")]
    pub id: String,
}


#[cfg(test)]
mod tests {
    use super::testing::settings;
    use super::*;

    #[test]
    fn test_registry_order_is_declared_order() {
        let settings = settings();
        let names: Vec<&str> = settings.registry().names().collect();
        assert_eq!(names.first(), Some(&"map"));
        assert_eq!(names.last(), Some(&"seeds"));
        assert_eq!(names.len(), 29);
        assert!(
            settings.registry().position("playerCount") < settings.registry().position("playerTeam")
        );
    }

    #[test]
    fn test_serialize_is_idempotent() {
        let mut settings = settings();
        Map::select_type(&mut settings, MapType::Skirmish);
        Map::select_map(&mut settings, "skirmish_4v4");
        assert_eq!(settings.serialize(), settings.serialize());
    }

    #[test]
    fn test_fresh_settings_resolve_within_few_passes() {
        let mut settings = settings();
        let passes = settings.resolve_randomness().unwrap();
        assert!(passes <= 10, "took {passes} passes");
        assert!(!PlayerCiv::holds_random(&settings));
        assert!(!Seeds::holds_random(&settings));
    }

    #[test]
    fn test_unresolvable_random_map_is_reported() {
        let mut settings = settings();
        Map::select_map(&mut settings, "random");
        let result = settings.resolve_randomness();
        assert!(matches!(
            result,
            Err(SetupError::UnresolvedRandom { attribute: "map" })
        ));
    }

    #[test]
    fn test_map_setting_reads_are_tolerant() {
        let mut settings = settings();
        assert_eq!(settings.map_setting::<String>("Script"), None);

        Map::select_map(&mut settings, "aegean_sea");
        assert_eq!(settings.map_setting::<String>("Script").as_deref(), Some("aegean_sea.js"));
        assert_eq!(settings.map_setting::<u32>("Script"), None);
        assert_eq!(settings.map_player_setting::<i32>(0, "Team"), None);
        assert_eq!(settings.map_player_count(), None);
    }
}
