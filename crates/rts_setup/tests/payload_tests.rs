//! Payload behaviour: idempotent serialization, lossless round trips into a
//! fresh session, bounded random resolution and saved settings.

use rts_setup::persist::{load_for_session, save_for_session};
use rts_setup::prelude::*;
use rts_test_utils::determinism::{find_first_difference, verify_determinism};
use rts_test_utils::fixtures::{lobby_settings, settings_on_map, singleplayer_settings};
use serde_json::json;

/// Deserialize `payload` into a fresh session and serialize it again.
fn reserialize(payload: &InitAttributes, fresh: MatchSettings) -> InitAttributes {
    let mut fresh = fresh;
    fresh.deserialize(payload);
    fresh.serialize()
}

fn assert_round_trip(payload: &InitAttributes, fresh: MatchSettings) {
    let restored = reserialize(payload, fresh);
    assert!(
        restored == *payload,
        "round trip differs at {:?}",
        find_first_difference(payload, &restored)
    );
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_serialize_twice_is_identical() {
    for (kind, map) in [
        (MapType::Skirmish, "skirmish_4v4"),
        (MapType::Scenario, "twin_rivers"),
        (MapType::Random, "aegean_sea"),
    ] {
        let settings = settings_on_map(11, kind, map);
        let first = settings.serialize();
        let second = settings.serialize();
        assert_eq!(first, second, "{map}");
        assert_eq!(first.to_value().to_string(), second.to_value().to_string());
    }
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_edited_skirmish_round_trips() {
    let mut settings = settings_on_map(1, MapType::Skirmish, "skirmish_4v4");
    PlayerTeam::set_team(&mut settings, 0, 1).unwrap();
    PlayerTeam::set_team(&mut settings, 5, 3).unwrap();
    PlayerCiv::set_civ(&mut settings, 2, "han").unwrap();
    PlayerAi::set_ai(&mut settings, 3, None).unwrap();
    Ceasefire::set_minutes(&mut settings, 10);
    VictoryConditions::set_enabled(&mut settings, "wonder", true).unwrap();
    Wonder::set_duration(&mut settings, 15);
    TriggerScripts::set_custom(&mut settings, vec!["scripts/Custom.js".to_string()]);

    assert_round_trip(&settings.serialize(), singleplayer_settings(2));
}

#[test]
fn test_scenario_round_trips() {
    let settings = settings_on_map(1, MapType::Scenario, "twin_rivers");
    assert_round_trip(&settings.serialize(), singleplayer_settings(2));
}

#[test]
fn test_resolved_random_map_round_trips() {
    let mut settings = settings_on_map(1, MapType::Random, "mainland");
    PlayerCount::set_nb_players(&mut settings, 6);
    let payload = settings.prepare_launch().unwrap();
    assert!(payload.setting::<u32>("Seed").is_some());

    assert_round_trip(&payload, singleplayer_settings(99));
}

#[test]
fn test_lobby_opt_out_round_trips() {
    let mut settings = lobby_settings(1);
    Rating::set_enabled(&mut settings, false);
    let payload = settings.serialize();
    assert_eq!(payload.setting::<bool>("RatingEnabled"), Some(false));

    assert_round_trip(&payload, lobby_settings(2));
}

#[test]
fn test_malformed_payload_keeps_defaults() {
    let mut settings = singleplayer_settings(1);
    let defaults = settings.serialize();
    let payload = InitAttributes::from_value(json!({
        "mapType": 7,
        "gameSpeed": "fast",
        "settings": {
            "PlayerData": "nobody",
            "Ceasefire": "ten",
            "VictoryConditions": { "conquest": true }
        }
    }))
    .unwrap();

    settings.deserialize(&payload);
    assert_eq!(settings.serialize(), defaults);
}

#[test]
fn test_non_object_payload_is_rejected() {
    assert!(matches!(
        InitAttributes::from_value(json!([1, 2, 3])),
        Err(SetupError::InvalidPayload(_))
    ));
}

// =============================================================================
// Random resolution
// =============================================================================

#[test]
fn test_every_fixture_map_resolves_quickly() {
    for (kind, map) in [
        (MapType::Skirmish, "skirmish_4v4"),
        (MapType::Scenario, "twin_rivers"),
        (MapType::Random, "aegean_sea"),
        (MapType::Random, "mainland"),
        (MapType::Random, RANDOM),
    ] {
        let mut settings = settings_on_map(21, kind, map);
        let passes = settings.resolve_randomness().unwrap();
        assert!(passes <= 10, "{map} took {passes} passes");
        assert!(settings.unresolved().is_empty(), "{map}: {:?}", settings.unresolved());

        let mut value = settings.serialize().to_value();
        if let Some(top) = value.as_object_mut() {
            top.remove("mapType");
        }
        let text = value.to_string();
        assert!(!text.contains("\"random\""), "{map} still random: {text}");
    }
}

#[test]
fn test_resolution_is_deterministic_per_seed() {
    verify_determinism(4, || settings_on_map(77, MapType::Random, RANDOM)).assert_deterministic();
    verify_determinism(4, || settings_on_map(78, MapType::Skirmish, "skirmish_4v4"))
        .assert_deterministic();
}

#[test]
fn test_different_seeds_draw_different_seeds() {
    let mut a = singleplayer_settings(1);
    let mut b = singleplayer_settings(2);
    a.resolve_randomness().unwrap();
    b.resolve_randomness().unwrap();
    assert_ne!(a.get::<Seeds>().seed(), b.get::<Seeds>().seed());
}

// =============================================================================
// Saved settings
// =============================================================================

#[test]
fn test_saved_settings_restore_next_session() {
    let dir = tempfile::tempdir().unwrap();
    let mods = vec!["public".to_string()];
    let mut settings = settings_on_map(1, MapType::Skirmish, "skirmish_4v4");
    PlayerCiv::set_civ(&mut settings, 1, "kush").unwrap();

    let path = save_for_session(&settings, dir.path(), "0.27.0", &mods).unwrap();
    assert!(path.ends_with("matchsettings.json"));

    let payload = load_for_session(dir.path(), SessionKind::Singleplayer, "0.27.0", &mods)
        .unwrap()
        .unwrap();
    let mut next = singleplayer_settings(5);
    next.deserialize(&payload);
    assert_eq!(next.get::<PlayerCiv>().values()[1], "kush");
    assert_eq!(next.get::<Map>().map(), Some("skirmish_4v4"));

    let stale = load_for_session(dir.path(), SessionKind::Singleplayer, "0.28.0", &mods).unwrap();
    assert!(stale.is_none());
}
