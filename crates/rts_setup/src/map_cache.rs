//! Authored map metadata.
//!
//! Attributes read map metadata synchronously through the [`MapCache`] trait.
//! Nothing here performs I/O at lookup time; [`InMemoryMapCache`] loads every
//! header up front.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SetupError};

/// The three kinds of map a match can be played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    /// Generated by a map script at launch.
    #[default]
    Random,
    /// Hand-authored with fixed players, teams and civs.
    Scenario,
    /// Hand-authored terrain with free player setup.
    Skirmish,
}

impl MapType {
    /// All map types in display order.
    pub const ALL: [MapType; 3] = [MapType::Random, MapType::Scenario, MapType::Skirmish];

    /// Payload spelling of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Scenario => "scenario",
            Self::Skirmish => "skirmish",
        }
    }

    /// Directory holding map headers of this type.
    #[must_use]
    pub const fn directory(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Scenario => "scenarios",
            Self::Skirmish => "skirmishes",
        }
    }
}

impl FromStr for MapType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown map type '{s}' (expected random, scenario or skirmish)"))
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authored metadata of one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// The map's `settings` block (`PlayerData`, `SupportedBiomes`, ...).
    #[serde(default)]
    pub settings: Value,
}

impl MapData {
    /// Wrap an authored settings block.
    #[must_use]
    pub fn new(settings: Value) -> Self {
        Self { settings }
    }
}

/// Read-only lookup of authored map metadata.
pub trait MapCache {
    /// Metadata for `name` of the given type, `None` if unknown.
    fn get_map_data(&self, kind: MapType, name: &str) -> Option<MapData>;
}

/// A [`MapCache`] backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMapCache {
    maps: HashMap<(MapType, String), MapData>,
}

impl InMemoryMapCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a map's authored `settings` block.
    pub fn insert(&mut self, kind: MapType, name: impl Into<String>, settings: Value) {
        self.maps.insert((kind, name.into()), MapData::new(settings));
    }

    /// Number of maps registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Sorted names of every map of `kind`.
    #[must_use]
    pub fn map_names(&self, kind: MapType) -> Vec<String> {
        let mut names: Vec<String> = self
            .maps
            .keys()
            .filter(|(map_kind, _)| *map_kind == kind)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// Load every `*.json` header under `root/{random,scenarios,skirmishes}`.
    ///
    /// The map name is the file stem. Missing type directories are skipped;
    /// a header that fails to parse is an error.
    pub fn load_from_directory(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(SetupError::MapLoad {
                path: root.display().to_string(),
                message: "not a directory".to_string(),
            });
        }

        let mut cache = Self::new();
        for kind in MapType::ALL {
            let dir = root.join(kind.directory());
            if !dir.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().map_or(true, |ext| ext != "json") {
                    continue;
                }
                let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };
                let contents = fs::read_to_string(&path)?;
                let data: MapData =
                    serde_json::from_str(&contents).map_err(|e| SetupError::MapLoad {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
                tracing::debug!(%kind, name, "Loaded map header");
                cache.maps.insert((kind, name.to_string()), data);
            }
        }
        Ok(cache)
    }
}

impl MapCache for InMemoryMapCache {
    fn get_map_data(&self, kind: MapType, name: &str) -> Option<MapData> {
        self.maps.get(&(kind, name.to_string())).cloned()
    }
}
