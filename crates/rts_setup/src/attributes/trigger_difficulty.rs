//! Difficulty passed to map trigger scripts.

use serde::Deserialize;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::catalog::Choice;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Authored `SupportedTriggerDifficulties`, by catalog display name.
#[derive(Debug, Deserialize)]
struct SupportedDifficulties {
    #[serde(rename = "Values")]
    values: Vec<String>,
    #[serde(rename = "Default")]
    default: Option<String>,
}

/// Trigger difficulty, only set on maps that declare supported levels.
#[derive(Debug, Default)]
pub struct TriggerDifficulty {
    observable: SettingsObservable,
    available: Vec<Choice<u32>>,
    value: Option<u32>,
}

impl TriggerDifficulty {
    /// Levels offered by the selected map.
    #[must_use]
    pub fn available(&self) -> &[Choice<u32>] {
        &self.available
    }

    /// Selected level.
    #[must_use]
    pub fn value(&self) -> Option<u32> {
        self.value
    }

    /// Choose a level; levels the map does not offer are ignored.
    pub fn set_value(settings: &mut MatchSettings, value: u32) {
        if !settings.trigger_difficulty.available.iter().any(|choice| choice.value == value) {
            tracing::debug!(value, "Trigger difficulty not offered by the map");
            return;
        }
        Self::assign(settings, Some(value));
    }

    fn assign(settings: &mut MatchSettings, value: Option<u32>) {
        let old = std::mem::replace(&mut settings.trigger_difficulty.value, value);
        settings.fire::<Self, _>("value", &old, old != value);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let supported = settings.map_setting::<SupportedDifficulties>("SupportedTriggerDifficulties");
        let Some(supported) = supported else {
            Self::set_available(settings, Vec::new());
            Self::assign(settings, None);
            return;
        };
        let available: Vec<Choice<u32>> = settings
            .catalog
            .trigger_difficulties
            .entries()
            .iter()
            .filter(|choice| supported.values.contains(&choice.name))
            .cloned()
            .collect();
        let value = supported
            .default
            .and_then(|name| available.iter().find(|choice| choice.name == name))
            .or_else(|| available.first())
            .map(|choice| choice.value);
        Self::set_available(settings, available);
        Self::assign(settings, value);
    }

    fn set_available(settings: &mut MatchSettings, available: Vec<Choice<u32>>) {
        let old = std::mem::replace(&mut settings.trigger_difficulty.available, available);
        let changed = old != settings.trigger_difficulty.available;
        settings.fire::<Self, _>("available", &old, changed);
    }
}

impl Attribute for TriggerDifficulty {
    const NAME: &'static str = "triggerDifficulty";

    attribute_slot!(trigger_difficulty);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if let Some(value) = settings.trigger_difficulty.value {
            payload.set_setting("TriggerDifficulty", value);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(value) = payload.setting::<u32>("TriggerDifficulty") {
            Self::set_value(settings, value);
        }
    }
}
