//! Payload validation utilities.

use std::path::Path;

use rts_setup::payload::deep_equal;
use rts_setup::prelude::*;
use serde_json::Value;

use crate::Result;

/// Outcome of replaying a payload through a fresh session.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTripReport {
    /// The payload as re-serialized by the session.
    pub restored: InitAttributes,
    /// Keys whose value changed, `settings.*` for nested ones. Empty when the
    /// round trip was lossless.
    pub changed_keys: Vec<String>,
}

impl RoundTripReport {
    /// Whether the payload survived unchanged.
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.changed_keys.is_empty()
    }
}

/// Read a payload from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON object.
pub fn load_payload(path: &Path) -> Result<InitAttributes> {
    let json = std::fs::read_to_string(path).map_err(SetupError::from)?;
    Ok(InitAttributes::from_json_str(&json)?)
}

/// Deserialize `payload` into a fresh session over `cache` and serialize it
/// again.
///
/// # Errors
///
/// Returns an error if the session cannot be built.
pub fn round_trip(
    payload: &InitAttributes,
    cache: InMemoryMapCache,
    catalog: SettingsCatalog,
) -> Result<RoundTripReport> {
    let mut settings = MatchSettings::new(SessionConfig::singleplayer(), catalog, cache)?;
    settings.deserialize(payload);
    let restored = settings.serialize();
    let changed_keys = changed_keys(&payload.to_value(), &restored.to_value());
    if !changed_keys.is_empty() {
        tracing::debug!(?changed_keys, "Payload changed during round trip");
    }
    Ok(RoundTripReport {
        restored,
        changed_keys,
    })
}

fn changed_keys(original: &Value, restored: &Value) -> Vec<String> {
    let (Some(original), Some(restored)) = (original.as_object(), restored.as_object()) else {
        return Vec::new();
    };
    let mut keys: Vec<&String> = original.keys().chain(restored.keys()).collect();
    keys.sort_unstable();
    keys.dedup();

    let mut changed = Vec::new();
    for key in keys {
        match (original.get(key), restored.get(key)) {
            (Some(a), Some(b)) if key == "settings" => {
                changed.extend(
                    changed_keys(a, b)
                        .into_iter()
                        .map(|nested| format!("settings.{nested}")),
                );
            }
            (Some(a), Some(b)) if deep_equal(a, b) => {}
            _ => changed.push(key.clone()),
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rts_test_utils::fixtures::{map_cache, settings_on_map};
    use serde_json::json;

    fn replay(payload: &InitAttributes) -> RoundTripReport {
        round_trip(payload, map_cache(), SettingsCatalog::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_engine_payload_is_lossless() {
        let mut settings = settings_on_map(5, MapType::Random, "aegean_sea");
        let payload = settings.prepare_launch().unwrap();
        let report = replay(&payload);
        assert!(report.is_lossless(), "{:?}", report.changed_keys);
        assert_eq!(report.restored, payload);
    }

    #[test]
    fn test_normalized_values_are_reported() {
        let mut payload = settings_on_map(5, MapType::Skirmish, "skirmish_4v4").serialize();
        payload.set_setting("Ceasefire", 7);
        payload.set_top("gameSpeed", 13.0);
        payload.set_setting("Unused", json!({ "x": 1 }));

        let report = replay(&payload);
        assert!(!report.is_lossless());
        assert!(report.changed_keys.contains(&"gameSpeed".to_string()));
        assert!(report.changed_keys.contains(&"settings.Unused".to_string()));
    }

    #[test]
    fn test_load_payload_rejects_non_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(load_payload(&path).is_err());

        std::fs::write(&path, r#"{ "mapType": "random", "settings": {} }"#).unwrap();
        let payload = load_payload(&path).unwrap();
        assert_eq!(payload.top::<String>("mapType").as_deref(), Some("random"));
    }
}
