//! Cheat commands.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Rating;

/// Cheats flag, forced off while the match is rated.
#[derive(Debug, Default)]
pub struct Cheats {
    observable: SettingsObservable,
    enabled: bool,
}

impl Cheats {
    /// Whether cheats are allowed.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Allow or forbid cheats; allowing is refused in rated matches.
    pub fn set_enabled(settings: &mut MatchSettings, enabled: bool) {
        let enabled = if enabled && settings.rating.enabled() {
            tracing::debug!("Cheats stay disabled in a rated match");
            false
        } else {
            enabled
        };
        let old = std::mem::replace(&mut settings.cheats.enabled, enabled);
        settings.fire::<Self, _>("enabled", &old, old != enabled);
    }

    fn on_rating_change(settings: &mut MatchSettings, _: &Change) {
        if settings.rating.enabled() {
            Self::set_enabled(settings, false);
        }
    }
}

impl Attribute for Cheats {
    const NAME: &'static str = "cheats";

    attribute_slot!(cheats);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Rating>(Self::on_rating_change, &["enabled"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.set_setting("CheatsEnabled", settings.cheats.enabled);
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(enabled) = payload.setting::<bool>("CheatsEnabled") {
            Self::set_enabled(settings, enabled);
        }
    }
}
