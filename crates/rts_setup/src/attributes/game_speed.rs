//! Simulation speed multiplier.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::payload::{same_f64, InitAttributes};
use crate::settings::MatchSettings;

/// Game speed, always one of the catalog speeds.
#[derive(Debug, Default)]
pub struct GameSpeed {
    observable: SettingsObservable,
    speed: f64,
}

impl GameSpeed {
    /// Current speed multiplier.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set the speed. A value the catalog does not offer falls back to the
    /// catalog default.
    pub fn set_speed(settings: &mut MatchSettings, speed: f64) {
        let offered = settings
            .catalog
            .game_speeds
            .values()
            .any(|candidate| same_f64(*candidate, speed));
        let speed = if offered {
            speed
        } else {
            tracing::debug!(speed, "Unsupported game speed, using default");
            *settings.catalog.game_speeds.default_value()
        };
        let old = std::mem::replace(&mut settings.game_speed.speed, speed);
        settings.fire::<Self, _>("speed", &old, !same_f64(old, speed));
    }
}

impl Attribute for GameSpeed {
    const NAME: &'static str = "gameSpeed";

    attribute_slot!(game_speed);

    fn init(settings: &mut MatchSettings) {
        settings.game_speed.speed = *settings.catalog.game_speeds.default_value();
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.set_top("gameSpeed", settings.game_speed.speed);
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(speed) = payload.top::<f64>("gameSpeed") {
            Self::set_speed(settings, speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::settings;

    #[test]
    fn test_unsupported_speed_falls_back_to_default() {
        let mut settings = settings();
        GameSpeed::set_speed(&mut settings, 1.5);
        assert!(same_f64(settings.get::<GameSpeed>().speed(), 1.5));

        GameSpeed::set_speed(&mut settings, 7.0);
        assert!(same_f64(settings.get::<GameSpeed>().speed(), 1.0));
    }
}
