//! Wonder victory duration.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::VictoryConditions;

const CONDITION: &str = "wonder";

/// Minutes a wonder must stand; only used while wonder victory is active.
#[derive(Debug, Default)]
pub struct Wonder {
    observable: SettingsObservable,
    duration: u32,
}

impl Wonder {
    /// Duration in minutes.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Whether wonder victory is active.
    #[must_use]
    pub fn is_available(settings: &MatchSettings) -> bool {
        settings.victory_conditions.is_active(CONDITION)
    }

    /// Set the duration.
    pub fn set_duration(settings: &mut MatchSettings, duration: u32) {
        let old = std::mem::replace(&mut settings.wonder.duration, duration);
        settings.fire::<Self, _>("duration", &old, old != duration);
    }

    fn on_victory_change(settings: &mut MatchSettings, _: &Change) {
        if !Self::is_available(settings) {
            let duration = *settings.catalog.victory_durations.default_value();
            Self::set_duration(settings, duration);
        }
    }
}

impl Attribute for Wonder {
    const NAME: &'static str = "wonder";

    attribute_slot!(wonder);

    fn init(settings: &mut MatchSettings) {
        settings.wonder.duration = *settings.catalog.victory_durations.default_value();
        settings.watch::<VictoryConditions>(Self::on_victory_change, &["active"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if Self::is_available(settings) {
            payload.set_setting("WonderDuration", settings.wonder.duration);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(duration) = payload.setting::<u32>("WonderDuration") {
            Self::set_duration(settings, duration);
        }
    }
}
