//! Test fixtures and helpers.
//!
//! A small authored map set covering each map type, plus factories for
//! settings sessions built on top of it.
//!
//! | Map            | Type     | Players | Notes                                   |
//! |----------------|----------|---------|-----------------------------------------|
//! | `skirmish_4v4` | skirmish | 8       | preset civs, a starting camera          |
//! | `twin_rivers`  | scenario | 4       | teams `[0,0,1,1]`, AI, trigger levels   |
//! | `aegean_sea`   | random   | -       | `aegean/` biomes, sea level rise        |
//! | `mainland`     | random   | -       | biome list, landscapes                  |

use std::fs;
use std::path::Path;

use rts_setup::prelude::*;
use serde_json::{json, Value};

/// Authored test maps as `(type, name, settings)`.
#[must_use]
pub fn authored_maps() -> Vec<(MapType, &'static str, Value)> {
    vec![
        (
            MapType::Skirmish,
            "skirmish_4v4",
            json!({
                "PlayerData": [
                    { "Civ": "athen", "StartingCamera": { "Position": { "x": 10.0, "y": 5.0, "z": 10.0 } } },
                    { "Civ": "spart" }, { "Civ": "mace" }, { "Civ": "pers" },
                    { "Civ": "rome" }, { "Civ": "cart" }, { "Civ": "gaul" }, { "Civ": "brit" }
                ],
                "VictoryConditions": ["conquest"]
            }),
        ),
        (
            MapType::Scenario,
            "twin_rivers",
            json!({
                "PlayerData": [
                    { "Team": 0, "Civ": "rome", "AI": "", "Resources": 1000, "PopulationLimit": 200 },
                    { "Team": 0, "Civ": "rome", "AI": "petra", "Resources": 1000, "PopulationLimit": 200 },
                    { "Team": 1, "Civ": "cart", "AI": "petra", "Resources": 500 },
                    { "Team": 1, "Civ": "cart", "AI": "petra", "Resources": 500 }
                ],
                "RevealMap": false,
                "ExploreMap": true,
                "AllyView": true,
                "Ceasefire": 5,
                "LockTeams": true,
                "TriggerScripts": ["scenarios/twin_rivers.js"],
                "VictoryConditions": ["conquest", "wonder"],
                "SupportedTriggerDifficulties": { "Values": ["Easy", "Hard"], "Default": "Hard" }
            }),
        ),
        (
            MapType::Random,
            "aegean_sea",
            json!({
                "Script": "aegean_sea.js",
                "SupportedBiomes": "aegean/",
                "Daytime": [{ "Id": "dawn" }, { "Id": "day" }, { "Id": "night" }],
                "TeamPlacements": [{ "Id": "radial" }, { "Id": "line" }, { "Id": "stronghold" }],
                "SeaLevelRise": { "Min": 0, "Max": 60, "Default": 20 },
                "CircularMap": true
            }),
        ),
        (
            MapType::Random,
            "mainland",
            json!({
                "Script": "mainland.js",
                "SupportedBiomes": ["generic/alpine", "generic/temperate"],
                "TeamPlacements": [{ "Id": "radial" }, { "Id": "line" }],
                "Landscapes": [
                    { "Id": "land", "Items": [{ "Id": "continent" }, { "Id": "lake" }] },
                    { "Id": "naval", "Items": [{ "Id": "archipelago" }, { "Id": "islands" }] }
                ]
            }),
        ),
    ]
}

/// A map cache holding [`authored_maps`].
#[must_use]
pub fn map_cache() -> InMemoryMapCache {
    let mut cache = InMemoryMapCache::new();
    for (kind, name, settings) in authored_maps() {
        cache.insert(kind, name, settings);
    }
    cache
}

/// Write [`authored_maps`] as JSON headers under `root/<type dir>/<name>.json`,
/// the layout [`InMemoryMapCache::load_from_directory`] reads.
///
/// # Panics
///
/// Panics if the files cannot be written.
pub fn write_map_directory(root: &Path) {
    for (kind, name, settings) in authored_maps() {
        let dir = root.join(kind.directory());
        fs::create_dir_all(&dir).expect("create map directory");
        let header = json!({ "settings": settings });
        let contents = serde_json::to_string_pretty(&header).expect("encode map header");
        fs::write(dir.join(format!("{name}.json")), contents).expect("write map header");
    }
}

/// Settings for `session` over the fixture map cache and builtin catalog.
///
/// # Panics
///
/// Panics if the builtin catalog is invalid.
#[must_use]
pub fn settings_for(session: SessionConfig) -> MatchSettings {
    let catalog = SettingsCatalog::builtin().expect("builtin catalog");
    MatchSettings::new(session, catalog, map_cache()).expect("match settings")
}

/// A seeded single player session.
#[must_use]
pub fn singleplayer_settings(seed: u64) -> MatchSettings {
    settings_for(SessionConfig::singleplayer().with_seed(seed))
}

/// A seeded multiplayer host session listed in the lobby.
#[must_use]
pub fn lobby_settings(seed: u64) -> MatchSettings {
    settings_for(SessionConfig::multiplayer_host(true).with_seed(seed))
}

/// A seeded session on `name` of type `kind`.
///
/// Random maps get every fixture random map as their resolution pool.
#[must_use]
pub fn settings_on_map(seed: u64, kind: MapType, name: &str) -> MatchSettings {
    let mut settings = singleplayer_settings(seed);
    Map::select_type(&mut settings, kind);
    if kind == MapType::Random {
        Map::set_random_options(&mut settings, map_cache().map_names(MapType::Random));
    }
    Map::select_map(&mut settings, name);
    settings
}
