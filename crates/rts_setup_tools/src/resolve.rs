//! Drive a setup session to its launch payload.

use rts_setup::prelude::*;

use crate::{Result, ToolError};

/// What to set up before resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// Map type.
    pub kind: MapType,
    /// Map name, or `"random"` to pick among every loaded random map.
    pub map: String,
    /// Session seed; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Player count, honoured on random maps only.
    pub players: Option<usize>,
}

/// Build a session over `cache`, apply `request` and prepare it for launch.
///
/// # Errors
///
/// Returns an error if the map is unknown, the random pool is empty or
/// resolution fails.
pub fn resolve_session(
    cache: InMemoryMapCache,
    catalog: SettingsCatalog,
    request: &ResolveRequest,
) -> Result<InitAttributes> {
    let pool = cache.map_names(MapType::Random);
    if request.kind == MapType::Random && request.map == RANDOM {
        if pool.is_empty() {
            return Err(ToolError::EmptyRandomPool);
        }
    } else if cache.get_map_data(request.kind, &request.map).is_none() {
        return Err(ToolError::UnknownMap {
            kind: request.kind,
            name: request.map.clone(),
        });
    }

    let session = SessionConfig {
        seed: request.seed,
        ..SessionConfig::singleplayer()
    };
    let mut settings = MatchSettings::new(session, catalog, cache)?;

    Map::select_type(&mut settings, request.kind);
    if request.kind == MapType::Random {
        Map::set_random_options(&mut settings, pool);
    }
    Map::select_map(&mut settings, &request.map);

    match request.players {
        Some(players) if request.kind == MapType::Random => {
            PlayerCount::set_nb_players(&mut settings, players);
        }
        Some(players) => {
            tracing::warn!(players, kind = %request.kind, "Player count is fixed by the map, ignoring");
        }
        None => {}
    }

    Ok(settings.prepare_launch()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rts_test_utils::fixtures::map_cache;

    fn request(kind: MapType, map: &str) -> ResolveRequest {
        ResolveRequest {
            kind,
            map: map.to_string(),
            seed: Some(42),
            players: None,
        }
    }

    fn resolve(request: &ResolveRequest) -> Result<InitAttributes> {
        resolve_session(map_cache(), SettingsCatalog::builtin().unwrap(), request)
    }

    #[test]
    fn test_resolves_random_pool() {
        let payload = resolve(&ResolveRequest {
            players: Some(4),
            ..request(MapType::Random, RANDOM)
        })
        .unwrap();

        assert_eq!(payload.player_count(), Some(4));
        assert!(payload.setting::<u32>("Seed").is_some());
        assert_ne!(payload.top::<String>("map").as_deref(), Some(RANDOM));
    }

    #[test]
    fn test_player_count_is_ignored_on_authored_maps() {
        let payload = resolve(&ResolveRequest {
            players: Some(2),
            ..request(MapType::Skirmish, "skirmish_4v4")
        })
        .unwrap();
        assert_eq!(payload.player_count(), Some(8));
    }

    #[test]
    fn test_same_seed_same_payload() {
        let a = resolve(&request(MapType::Random, "aegean_sea")).unwrap();
        let b = resolve(&request(MapType::Random, "aegean_sea")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_map_is_reported() {
        let result = resolve(&request(MapType::Scenario, "atlantis"));
        assert!(matches!(result, Err(ToolError::UnknownMap { .. })));

        let result = resolve(&request(MapType::Skirmish, RANDOM));
        assert!(matches!(result, Err(ToolError::UnknownMap { .. })));

        let result = resolve_session(
            InMemoryMapCache::new(),
            SettingsCatalog::builtin().unwrap(),
            &request(MapType::Random, RANDOM),
        );
        assert!(matches!(result, Err(ToolError::EmptyRandomPool)));
    }
}
