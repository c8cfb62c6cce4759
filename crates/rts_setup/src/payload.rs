//! The flat "init attributes" payload.
//!
//! This is the only externally visible form of a match setup. It is produced
//! by [`MatchSettings::serialize`](crate::settings::MatchSettings::serialize),
//! consumed by `deserialize`, shipped over the network as a full replace,
//! persisted to disk and handed to the match launcher.
//!
//! Shape:
//!
//! ```json
//! { "mapType": "random", "map": "...", "script": "...", "gameSpeed": 1.0,
//!   "settings": { "PlayerData": [{ "Team": -1, "Civ": "athen" }], "Seed": 7 } }
//! ```
//!
//! Readers never fail: any missing intermediate key or value of the wrong
//! type yields `None` and the caller applies its own default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SetupError};

/// Key of the nested settings object.
pub const SETTINGS_KEY: &str = "settings";

/// Key of the per-player array inside `settings`.
pub const PLAYER_DATA_KEY: &str = "PlayerData";

/// One step of a path into the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKey<'a> {
    /// Object member.
    Field(&'a str),
    /// Array element.
    Index(usize),
}

impl<'a> From<&'a str> for PathKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Field(name)
    }
}

impl From<usize> for PathKey<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// The serialized settings payload.
///
/// Object members are key-sorted, so encoding the same payload twice yields
/// byte-identical JSON.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(into = "Value")]
pub struct InitAttributes {
    top: Map<String, Value>,
    settings: Map<String, Value>,
}

impl InitAttributes {
    /// An empty payload with an empty `settings` object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. The root must be an object; a non-object
    /// `settings` member is discarded.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut top) = value else {
            return Err(SetupError::InvalidPayload(
                "root is not a JSON object".to_string(),
            ));
        };
        let settings = match top.remove(SETTINGS_KEY) {
            Some(Value::Object(settings)) => settings,
            Some(other) => {
                tracing::debug!(found = %other, "Ignoring non-object settings member");
                Map::new()
            }
            None => Map::new(),
        };
        Ok(Self { top, settings })
    }

    /// Parse a payload from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// The payload as a single JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut root = self.top.clone();
        root.insert(
            SETTINGS_KEY.to_string(),
            Value::Object(self.settings.clone()),
        );
        Value::Object(root)
    }

    /// Follow `path` from the root. A path that starts with `"settings"`
    /// descends into the settings object.
    #[must_use]
    pub fn get(&self, path: &[PathKey<'_>]) -> Option<&Value> {
        let (head, rest) = path.split_first()?;
        let PathKey::Field(name) = head else {
            return None;
        };
        if *name == SETTINGS_KEY {
            let (head, rest) = rest.split_first()?;
            let PathKey::Field(key) = head else {
                return None;
            };
            walk(self.settings.get(*key)?, rest)
        } else {
            walk(self.top.get(*name)?, rest)
        }
    }

    /// Typed read of a legacy value at `path`.
    ///
    /// Returns `None` when any step is missing, the value is `null`, or it
    /// does not decode as `T`.
    #[must_use]
    pub fn legacy<T: DeserializeOwned>(&self, path: &[PathKey<'_>]) -> Option<T> {
        let value = self.get(path)?;
        if value.is_null() {
            return None;
        }
        match T::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!(?path, error = %e, "Ignoring malformed legacy value");
                None
            }
        }
    }

    /// Typed read of a top-level member (`mapType`, `map`, ...).
    #[must_use]
    pub fn top<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.legacy(&[PathKey::Field(key)])
    }

    /// Typed read of `settings.<key>`.
    #[must_use]
    pub fn setting<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.legacy(&[SETTINGS_KEY.into(), key.into()])
    }

    /// Typed read of `settings.PlayerData[player].<key>`.
    #[must_use]
    pub fn player_setting<T: DeserializeOwned>(&self, player: usize, key: &str) -> Option<T> {
        self.legacy(&[
            SETTINGS_KEY.into(),
            PLAYER_DATA_KEY.into(),
            player.into(),
            key.into(),
        ])
    }

    /// Length of `settings.PlayerData`, if present.
    #[must_use]
    pub fn player_count(&self) -> Option<usize> {
        self.settings
            .get(PLAYER_DATA_KEY)
            .and_then(Value::as_array)
            .map(Vec::len)
    }

    /// Write a top-level member.
    pub fn set_top(&mut self, key: &str, value: impl Into<Value>) {
        self.top.insert(key.to_string(), value.into());
    }

    /// Write `settings.<key>`.
    pub fn set_setting(&mut self, key: &str, value: impl Into<Value>) {
        self.settings.insert(key.to_string(), value.into());
    }

    /// Grow or shrink `settings.PlayerData` to `players` entries, keeping
    /// existing entries and appending empty objects.
    pub fn resize_player_data(&mut self, players: usize) {
        let mut entries = match self.settings.remove(PLAYER_DATA_KEY) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        };
        entries.resize_with(players, || Value::Object(Map::new()));
        self.settings
            .insert(PLAYER_DATA_KEY.to_string(), Value::Array(entries));
    }

    /// Write `settings.PlayerData[player].<key>`.
    ///
    /// Slots that do not exist are left alone; the player count owns the
    /// length of the array.
    pub fn set_player_setting(&mut self, player: usize, key: &str, value: impl Into<Value>) {
        let slot = self
            .settings
            .get_mut(PLAYER_DATA_KEY)
            .and_then(Value::as_array_mut)
            .and_then(|entries| entries.get_mut(player))
            .and_then(Value::as_object_mut);
        match slot {
            Some(entry) => {
                entry.insert(key.to_string(), value.into());
            }
            None => tracing::debug!(player, key, "No PlayerData slot to write"),
        }
    }
}

impl From<InitAttributes> for Value {
    fn from(payload: InitAttributes) -> Self {
        let InitAttributes { mut top, settings } = payload;
        top.insert(SETTINGS_KEY.to_string(), Value::Object(settings));
        Value::Object(top)
    }
}

impl<'de> Deserialize<'de> for InitAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for InitAttributes {
    fn eq(&self, other: &Self) -> bool {
        maps_equal(&self.top, &other.top) && maps_equal(&self.settings, &other.settings)
    }
}

fn walk<'v>(mut value: &'v Value, path: &[PathKey<'_>]) -> Option<&'v Value> {
    for key in path {
        value = match key {
            PathKey::Field(name) => value.get(*name)?,
            PathKey::Index(index) => value.get(*index)?,
        };
    }
    Some(value)
}

/// Float equality that treats NaN as equal to itself.
#[must_use]
pub fn same_f64(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Deep structural equality of two payload values.
///
/// Numbers compare by value regardless of integer/float encoding, and NaN
/// is equal to NaN.
#[must_use]
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => same_f64(x, y),
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => maps_equal(x, y),
        _ => a == b,
    }
}

fn maps_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| deep_equal(value, other)))
}
