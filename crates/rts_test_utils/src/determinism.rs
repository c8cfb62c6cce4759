//! Determinism testing utilities.
//!
//! Provides a harness for verifying that random resolution produces the
//! same launch payload given the same session seed.
//!
//! # Testing Strategy
//!
//! Every peer in a multiplayer match must launch from an identical payload.
//! Sources of divergence include:
//!
//! - **Unseeded randomness**: every random pick must draw from the session
//!   RNG, never from thread-local or system entropy.
//!
//! - **HashMap iteration order**: payload objects must serialize with
//!   sorted keys, and resolution must visit attributes in declared order.
//!
//! - **Watcher order**: watchers fire in registration order, so a setup
//!   sequence replayed on a fresh session reaches the same state.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rts_setup::prelude::{InitAttributes, MatchSettings};
use serde_json::Value;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical payloads.
    pub is_deterministic: bool,
    /// Payload hash from each run.
    pub hashes: Vec<u64>,
    /// Resolution passes taken by each run.
    pub passes: Vec<u32>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic session).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run launched with the same payload.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different payload hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Random resolution is non-deterministic!\n\
                 Runs: {}\n\
                 Passes: {:?}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.passes,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Build a session with `setup` several times, prepare each for launch and
/// compare the payloads.
///
/// # Panics
///
/// Panics if any run fails to resolve.
///
/// # Example
///
/// ```ignore
/// let result = verify_determinism(5, || fixtures::singleplayer_settings(42));
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<F>(runs: usize, setup: F) -> DeterminismResult
where
    F: Fn() -> MatchSettings,
{
    let mut hashes = Vec::with_capacity(runs);
    let mut passes = Vec::with_capacity(runs);

    for run in 0..runs {
        let mut settings = setup();
        let taken = settings
            .resolve_randomness()
            .unwrap_or_else(|e| panic!("run {run} failed to resolve: {e}"));
        hashes.push(payload_hash(&settings.serialize()));
        passes.push(taken);
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    tracing::debug!(runs, is_deterministic, "Determinism check finished");

    DeterminismResult {
        is_deterministic,
        hashes,
        passes,
    }
}

/// Hash of a payload's canonical JSON text.
#[must_use]
pub fn payload_hash(payload: &InitAttributes) -> u64 {
    compute_hash(&payload.to_value().to_string())
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Find the first path at which two payloads differ.
///
/// Useful for debugging a failed round trip or determinism check. Paths
/// are written `settings.PlayerData[2].Civ`. Objects are compared in key
/// order, so the result is stable.
///
/// # Returns
///
/// `None` if the payloads are structurally equal.
#[must_use]
pub fn find_first_difference(a: &InitAttributes, b: &InitAttributes) -> Option<String> {
    first_difference(&a.to_value(), &b.to_value(), String::new())
}

fn first_difference(a: &Value, b: &Value, path: String) -> Option<String> {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
            keys.sort_unstable();
            keys.dedup();
            keys.into_iter().find_map(|key| {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                match (a.get(key), b.get(key)) {
                    (Some(a), Some(b)) => first_difference(a, b, child),
                    _ => Some(child),
                }
            })
        }
        (Value::Array(a), Value::Array(b)) => {
            let shared = a
                .iter()
                .zip(b)
                .enumerate()
                .find_map(|(i, (a, b))| first_difference(a, b, format!("{path}[{i}]")));
            shared.or_else(|| (a.len() != b.len()).then(|| format!("{path}[{}]", a.len().min(b.len()))))
        }
        _ if rts_setup::payload::deep_equal(a, b) => None,
        _ => Some(path),
    }
}

/// Proptest strategies for match setup testing.
///
/// These strategies generate random but reproducible setup inputs for
/// property-based tests of the settings engine.
pub mod strategies {
    use proptest::prelude::*;
    use rts_setup::prelude::MapType;

    /// Any map type.
    pub fn arb_map_type() -> impl Strategy<Value = MapType> {
        prop_oneof![
            Just(MapType::Random),
            Just(MapType::Scenario),
            Just(MapType::Skirmish),
        ]
    }

    /// A fixture map together with its type, including the random sentinel.
    pub fn arb_fixture_map() -> impl Strategy<Value = (MapType, &'static str)> {
        prop_oneof![
            Just((MapType::Skirmish, "skirmish_4v4")),
            Just((MapType::Scenario, "twin_rivers")),
            Just((MapType::Random, "aegean_sea")),
            Just((MapType::Random, "mainland")),
            Just((MapType::Random, "random")),
        ]
    }

    /// A player count within the builtin catalog's limit.
    pub fn arb_player_count() -> impl Strategy<Value = usize> {
        1usize..=8
    }

    /// A sequence of player counts to resize through.
    pub fn arb_resize_sequence() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(arb_player_count(), 1..8)
    }

    /// A `(player, team)` edit; teams include the "no team" value.
    pub fn arb_team_edit() -> impl Strategy<Value = (usize, i32)> {
        (0usize..8, -1i32..4)
    }

    /// A session seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_same_seed_is_deterministic() {
        let result = verify_determinism(3, || fixtures::singleplayer_settings(42));
        result.assert_deterministic();
        assert_eq!(result.unique_hashes().len(), 1);
        assert_eq!(result.passes.len(), 3);
    }

    #[test]
    fn test_first_difference_names_the_path() {
        let a = InitAttributes::from_value(serde_json::json!({
            "settings": { "PlayerData": [{ "Civ": "athen" }, { "Civ": "rome" }] }
        }))
        .unwrap();
        let b = InitAttributes::from_value(serde_json::json!({
            "settings": { "PlayerData": [{ "Civ": "athen" }, { "Civ": "cart" }] }
        }))
        .unwrap();

        assert_eq!(find_first_difference(&a, &a), None);
        assert_eq!(
            find_first_difference(&a, &b).as_deref(),
            Some("settings.PlayerData[1].Civ")
        );
    }
}
