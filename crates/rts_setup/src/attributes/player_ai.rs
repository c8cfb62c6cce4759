//! Per-player AI seat configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable, RANDOM};
use crate::catalog::SettingsCatalog;
use crate::error::{Result, SetupError};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::{check_slot, Map, PlayerCount};

/// An AI seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    /// Bot name.
    pub bot: String,
    /// Difficulty level.
    pub difficulty: u8,
    /// Behaviour, possibly `"random"`.
    pub behavior: String,
}

impl AiSettings {
    /// A seat for `bot` with the catalog default difficulty and behaviour.
    #[must_use]
    pub fn with_defaults(catalog: &SettingsCatalog, bot: impl Into<String>) -> Self {
        Self {
            bot: bot.into(),
            difficulty: *catalog.ai_difficulties.default_value(),
            behavior: catalog.ai_behaviors.default_value().clone(),
        }
    }
}

/// AI seat per player; `None` is a human seat.
#[derive(Debug, Default)]
pub struct PlayerAi {
    observable: SettingsObservable,
    values: Vec<Option<AiSettings>>,
}

impl PlayerAi {
    /// AI per player.
    #[must_use]
    pub fn values(&self) -> &[Option<AiSettings>] {
        &self.values
    }

    /// Assign an AI to a slot, or `None` for a human. The bot must be one the
    /// catalog offers.
    pub fn set_ai(settings: &mut MatchSettings, player: usize, ai: Option<AiSettings>) -> Result<()> {
        check_slot(player, settings.player_ai.values.len())?;
        if let Some(ai) = &ai {
            if !settings.catalog.ai_bots.contains(&ai.bot) {
                return Err(SetupError::UnknownAiBot(ai.bot.clone()));
            }
        }
        if settings.player_ai.values[player] != ai {
            let old = snapshot(&settings.player_ai.values);
            settings.player_ai.values[player] = ai;
            settings.trigger::<Self>("values", old);
        }
        Ok(())
    }

    /// Seat read from a map or payload. Unknown bots fall back to the catalog
    /// default bot.
    fn authored_seat(catalog: &SettingsCatalog, bot: String) -> Option<AiSettings> {
        if bot.is_empty() {
            return None;
        }
        if catalog.ai_bots.contains(&bot) {
            return Some(AiSettings::with_defaults(catalog, bot));
        }
        let fallback = catalog.ai_bots.default_value().clone();
        tracing::warn!(bot = %bot, fallback = %fallback, "Unknown AI bot, using default");
        Some(AiSettings::with_defaults(catalog, fallback))
    }

    fn slot_default(catalog: &SettingsCatalog, player: usize) -> Option<AiSettings> {
        let defaults = catalog.player_defaults.get(player)?;
        if defaults.ai.is_empty() {
            None
        } else {
            Some(AiSettings::with_defaults(catalog, defaults.ai.as_str()))
        }
    }

    fn on_player_count_change(settings: &mut MatchSettings, _: &Change) {
        let players = settings.players();
        let old = snapshot(&settings.player_ai.values);
        let current = settings.player_ai.values.len();
        if players <= current {
            settings.player_ai.values.truncate(players);
        } else {
            for player in current..players {
                let ai = Self::slot_default(&settings.catalog, player);
                settings.player_ai.values.push(ai);
            }
        }
        settings.trigger::<Self>("values", old);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if settings.map.kind() != MapType::Scenario {
            return;
        }
        let old = snapshot(&settings.player_ai.values);
        for player in 0..settings.players() {
            let Some(bot) = settings.map_player_setting::<String>(player, "AI") else {
                continue;
            };
            let mut seat = Self::authored_seat(&settings.catalog, bot);
            if let Some(ai) = seat.as_mut() {
                if let Some(difficulty) = settings.map_player_setting::<u8>(player, "AIDiff") {
                    ai.difficulty = difficulty;
                }
                if let Some(behavior) = settings.map_player_setting::<String>(player, "AIBehavior") {
                    ai.behavior = behavior;
                }
            }
            settings.player_ai.values[player] = seat;
        }
        settings.trigger::<Self>("values", old);
    }
}

fn snapshot(values: &[Option<AiSettings>]) -> Value {
    serde_json::to_value(values).unwrap_or(Value::Null)
}

impl Attribute for PlayerAi {
    const NAME: &'static str = "playerAI";

    attribute_slot!(player_ai);

    fn init(settings: &mut MatchSettings) {
        let players = settings.players();
        settings.player_ai.values = (0..players)
            .map(|player| Self::slot_default(&settings.catalog, player))
            .collect();
        settings.watch::<PlayerCount>(Self::on_player_count_change, &["nb_players"], true);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        for (player, ai) in settings.player_ai.values.iter().enumerate() {
            match ai {
                Some(ai) => {
                    payload.set_player_setting(player, "AI", ai.bot.as_str());
                    payload.set_player_setting(player, "AIDiff", ai.difficulty);
                    payload.set_player_setting(player, "AIBehavior", ai.behavior.as_str());
                }
                None => payload.set_player_setting(player, "AI", ""),
            }
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        let old = snapshot(&settings.player_ai.values);
        for player in 0..settings.player_ai.values.len() {
            let Some(bot) = payload.player_setting::<String>(player, "AI") else {
                continue;
            };
            let mut seat = Self::authored_seat(&settings.catalog, bot);
            if let Some(ai) = seat.as_mut() {
                if let Some(difficulty) = payload.player_setting::<u8>(player, "AIDiff") {
                    ai.difficulty = difficulty;
                }
                if let Some(behavior) = payload.player_setting::<String>(player, "AIBehavior") {
                    ai.behavior = behavior;
                }
            }
            settings.player_ai.values[player] = seat;
        }
        settings.trigger::<Self>("values", old);
    }

    fn pick_random_items(settings: &mut MatchSettings) -> bool {
        let behaviors: Vec<String> = settings
            .catalog
            .ai_behaviors
            .values()
            .filter(|behavior| *behavior != RANDOM)
            .cloned()
            .collect();
        let old = snapshot(&settings.player_ai.values);
        let mut picked = false;
        for player in 0..settings.player_ai.values.len() {
            let holds_random = settings.player_ai.values[player]
                .as_ref()
                .is_some_and(|ai| ai.behavior == RANDOM);
            if !holds_random {
                continue;
            }
            let Some(behavior) = settings.choose(&behaviors) else {
                break;
            };
            if let Some(ai) = settings.player_ai.values[player].as_mut() {
                ai.behavior = behavior;
                picked = true;
            }
        }
        if picked {
            settings.trigger::<Self>("values", old);
        }
        picked
    }

    fn holds_random(settings: &MatchSettings) -> bool {
        settings
            .player_ai
            .values
            .iter()
            .flatten()
            .any(|ai| ai.behavior == RANDOM)
    }
}
