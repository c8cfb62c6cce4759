//! Nomad mode: players start without a civic centre.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Nomad flag, only available on random maps.
#[derive(Debug, Default)]
pub struct Nomad {
    observable: SettingsObservable,
    enabled: bool,
}

impl Nomad {
    /// Whether nomad mode is on.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the selected map type supports nomad mode.
    #[must_use]
    pub fn is_available(settings: &MatchSettings) -> bool {
        settings.map.kind() == MapType::Random
    }

    /// Toggle nomad mode; ignored outside random maps.
    pub fn set_enabled(settings: &mut MatchSettings, enabled: bool) {
        let enabled = enabled && Self::is_available(settings);
        let old = std::mem::replace(&mut settings.nomad.enabled, enabled);
        settings.fire::<Self, _>("enabled", &old, old != enabled);
    }

    fn on_type_change(settings: &mut MatchSettings, _: &Change) {
        if !Self::is_available(settings) {
            Self::set_enabled(settings, false);
        }
    }
}

impl Attribute for Nomad {
    const NAME: &'static str = "nomad";

    attribute_slot!(nomad);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_type_change, &["type"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if Self::is_available(settings) {
            payload.set_setting("Nomad", settings.nomad.enabled);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(enabled) = payload.setting::<bool>("Nomad") {
            Self::set_enabled(settings, enabled);
        }
    }
}
