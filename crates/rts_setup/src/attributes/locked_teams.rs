//! Whether teams are locked for the whole match.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::{Map, Rating};

/// Locked-teams flag, forced on while the match is rated.
#[derive(Debug, Default)]
pub struct LockedTeams {
    observable: SettingsObservable,
    enabled: bool,
}

impl LockedTeams {
    /// Whether diplomacy changes are disabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Lock or unlock teams; unlocking is refused in rated matches.
    pub fn set_enabled(settings: &mut MatchSettings, enabled: bool) {
        let enabled = enabled || settings.rating.enabled();
        let old = std::mem::replace(&mut settings.locked_teams.enabled, enabled);
        settings.fire::<Self, _>("enabled", &old, old != enabled);
    }

    fn on_rating_change(settings: &mut MatchSettings, _: &Change) {
        if settings.rating.enabled() {
            Self::set_enabled(settings, true);
        }
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if settings.map.kind() != MapType::Scenario {
            return;
        }
        if let Some(locked) = settings.map_setting::<bool>("LockTeams") {
            Self::set_enabled(settings, locked);
        }
    }
}

impl Attribute for LockedTeams {
    const NAME: &'static str = "lockedTeams";

    attribute_slot!(locked_teams);

    fn init(settings: &mut MatchSettings) {
        settings.locked_teams.enabled = settings.rating.enabled();
        settings.watch::<Rating>(Self::on_rating_change, &["enabled"], true);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.set_setting("LockTeams", settings.locked_teams.enabled);
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(enabled) = payload.setting::<bool>("LockTeams") {
            Self::set_enabled(settings, enabled);
        }
    }
}
