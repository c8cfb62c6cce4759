//! Property-based tests for per-player slots and random resolution.

use proptest::prelude::*;
use rts_setup::prelude::*;
use rts_test_utils::determinism::{payload_hash, strategies::*};
use rts_test_utils::fixtures::{settings_on_map, singleplayer_settings};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Growing keeps existing slots and appends free unlocked ones; shrinking
    /// keeps the head.
    #[test]
    fn prop_team_resize_preserves_prefix(
        edits in prop::collection::vec(arb_team_edit(), 0..16),
        sizes in arb_resize_sequence(),
    ) {
        let mut settings = singleplayer_settings(0);
        PlayerCount::set_nb_players(&mut settings, 8);
        for (player, team) in edits {
            PlayerTeam::set_team(&mut settings, player, team).unwrap();
        }

        for size in sizes {
            let before_values = settings.get::<PlayerTeam>().values().to_vec();
            let before_locked = settings.get::<PlayerTeam>().locked().to_vec();
            PlayerCount::set_nb_players(&mut settings, size);

            let teams = settings.get::<PlayerTeam>();
            let kept = before_values.len().min(size);
            prop_assert_eq!(teams.values().len(), size);
            prop_assert_eq!(teams.locked().len(), size);
            prop_assert_eq!(&teams.values()[..kept], &before_values[..kept]);
            prop_assert_eq!(&teams.locked()[..kept], &before_locked[..kept]);
            prop_assert!(teams.values()[kept..].iter().all(|team| *team == NO_TEAM));
            prop_assert!(teams.locked()[kept..].iter().all(|locked| !locked));

            prop_assert_eq!(settings.get::<PlayerCiv>().values().len(), size);
            prop_assert_eq!(settings.get::<PlayerAi>().values().len(), size);
        }
    }

    /// Any player count on any fixture map resolves to a payload whose
    /// player array matches the count.
    #[test]
    fn prop_any_setup_resolves(
        (kind, map) in arb_fixture_map(),
        players in arb_player_count(),
        seed in arb_seed(),
    ) {
        let mut settings = settings_on_map(seed, kind, map);
        if kind == MapType::Random {
            PlayerCount::set_nb_players(&mut settings, players);
        }
        let payload = settings.prepare_launch().unwrap();

        prop_assert!(settings.unresolved().is_empty());
        prop_assert_eq!(
            payload.player_count(),
            Some(settings.get::<PlayerCount>().nb_players())
        );
    }

    /// The same seed and setup always launch with the same payload.
    #[test]
    fn prop_same_seed_same_payload(
        (kind, map) in arb_fixture_map(),
        seed in arb_seed(),
    ) {
        let mut a = settings_on_map(seed, kind, map);
        let mut b = settings_on_map(seed, kind, map);
        let a = a.prepare_launch().unwrap();
        let b = b.prepare_launch().unwrap();
        prop_assert_eq!(payload_hash(&a), payload_hash(&b));
    }

    /// Switching map type any number of times never leaves per-player
    /// vectors out of step with the player count.
    #[test]
    fn prop_type_switches_keep_slots_aligned(
        kinds in prop::collection::vec(arb_map_type(), 1..6),
    ) {
        let mut settings = singleplayer_settings(3);
        for kind in kinds {
            Map::select_type(&mut settings, kind);
            let name = match kind {
                MapType::Random => "aegean_sea",
                MapType::Scenario => "twin_rivers",
                MapType::Skirmish => "skirmish_4v4",
            };
            Map::select_map(&mut settings, name);

            let players = settings.get::<PlayerCount>().nb_players();
            prop_assert_eq!(settings.get::<PlayerTeam>().values().len(), players);
            prop_assert_eq!(settings.get::<PlayerCiv>().values().len(), players);
            prop_assert_eq!(settings.get::<StartingCamera>().values().len(), players);
            prop_assert_eq!(settings.serialize().player_count(), Some(players));
        }
    }
}
