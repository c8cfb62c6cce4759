//! Capture-the-relic options.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::VictoryConditions;

const CONDITION: &str = "capture_the_relic";

/// Relic count and hold duration, used while capture-the-relic is active.
#[derive(Debug, Default)]
pub struct Relic {
    observable: SettingsObservable,
    count: u32,
    duration: u32,
}

impl Relic {
    /// Number of relics on the map.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Minutes all relics must be held.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Whether capture-the-relic is active.
    #[must_use]
    pub fn is_available(settings: &MatchSettings) -> bool {
        settings.victory_conditions.is_active(CONDITION)
    }

    /// Set the relic count, clamped to `1..=max_relic_count`.
    pub fn set_count(settings: &mut MatchSettings, count: u32) {
        let count = count.clamp(1, settings.catalog.max_relic_count);
        let old = std::mem::replace(&mut settings.relic.count, count);
        settings.fire::<Self, _>("count", &old, old != count);
    }

    /// Set the hold duration.
    pub fn set_duration(settings: &mut MatchSettings, duration: u32) {
        let old = std::mem::replace(&mut settings.relic.duration, duration);
        settings.fire::<Self, _>("duration", &old, old != duration);
    }

    fn on_victory_change(settings: &mut MatchSettings, _: &Change) {
        if Self::is_available(settings) {
            return;
        }
        let count = settings.catalog.default_relic_count;
        let duration = *settings.catalog.victory_durations.default_value();
        Self::set_count(settings, count);
        Self::set_duration(settings, duration);
    }
}

impl Attribute for Relic {
    const NAME: &'static str = "relic";

    attribute_slot!(relic);

    fn init(settings: &mut MatchSettings) {
        settings.relic.count = settings.catalog.default_relic_count;
        settings.relic.duration = *settings.catalog.victory_durations.default_value();
        settings.watch::<VictoryConditions>(Self::on_victory_change, &["active"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if Self::is_available(settings) {
            payload.set_setting("RelicCount", settings.relic.count);
            payload.set_setting("RelicDuration", settings.relic.duration);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(count) = payload.setting::<u32>("RelicCount") {
            Self::set_count(settings, count);
        }
        if let Some(duration) = payload.setting::<u32>("RelicDuration") {
            Self::set_duration(settings, duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::settings;

    #[test]
    fn test_relic_keys_follow_victory_condition() {
        let mut settings = settings();
        assert_eq!(settings.serialize().setting::<u32>("RelicCount"), None);

        VictoryConditions::set_enabled(&mut settings, CONDITION, true).unwrap();
        Relic::set_count(&mut settings, 50);
        let payload = settings.serialize();
        assert_eq!(payload.setting::<u32>("RelicCount"), Some(8));
        assert_eq!(payload.setting::<u32>("RelicDuration"), Some(20));

        VictoryConditions::set_enabled(&mut settings, CONDITION, false).unwrap();
        assert_eq!(settings.get::<Relic>().count(), 2);
    }
}
