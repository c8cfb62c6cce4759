//! Rated lobby games.
//!
//! Rating is available for lobby-hosted 1v1 matches without cheats. When
//! availability flips, `enabled` follows it; in between the host may opt out.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::{Cheats, PlayerCount};

/// Rated-game availability and opt-in. Fires `available` and `enabled`.
#[derive(Debug, Default)]
pub struct Rating {
    observable: SettingsObservable,
    available: bool,
    enabled: bool,
}

impl Rating {
    /// Whether this match can be rated.
    #[must_use]
    pub fn available(&self) -> bool {
        self.available
    }

    /// Whether this match will be rated.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Opt in or out; opting in is ignored when rating is unavailable.
    pub fn set_enabled(settings: &mut MatchSettings, enabled: bool) {
        let enabled = enabled && settings.rating.available;
        let old = std::mem::replace(&mut settings.rating.enabled, enabled);
        settings.fire::<Self, _>("enabled", &old, old != enabled);
    }

    fn compute_available(settings: &MatchSettings) -> bool {
        settings.session.lobby && settings.players() == 2 && !settings.cheats.enabled()
    }

    fn on_dependency_change(settings: &mut MatchSettings, _: &Change) {
        let available = Self::compute_available(settings);
        let old = std::mem::replace(&mut settings.rating.available, available);
        if old == available {
            return;
        }
        settings.fire::<Self, _>("available", &old, true);
        Self::set_enabled(settings, available);
    }
}

impl Attribute for Rating {
    const NAME: &'static str = "rating";

    attribute_slot!(rating);

    fn init(settings: &mut MatchSettings) {
        let available = Self::compute_available(settings);
        settings.rating.available = available;
        settings.rating.enabled = available;
        settings.watch::<PlayerCount>(Self::on_dependency_change, &["nb_players"], true);
        settings.watch::<Cheats>(Self::on_dependency_change, &["enabled"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if settings.rating.available {
            payload.set_setting("RatingEnabled", settings.rating.enabled);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        let enabled = payload.setting::<bool>("RatingEnabled").unwrap_or(false);
        Self::set_enabled(settings, enabled);
    }
}
