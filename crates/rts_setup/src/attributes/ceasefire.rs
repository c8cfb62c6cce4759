//! Ceasefire length in minutes.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Minutes of ceasefire at match start.
#[derive(Debug, Default)]
pub struct Ceasefire {
    observable: SettingsObservable,
    minutes: u32,
}

impl Ceasefire {
    /// Current ceasefire length.
    #[must_use]
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Set the ceasefire length.
    pub fn set_minutes(settings: &mut MatchSettings, minutes: u32) {
        let old = std::mem::replace(&mut settings.ceasefire.minutes, minutes);
        settings.fire::<Self, _>("minutes", &old, old != minutes);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if settings.map.kind() != MapType::Scenario {
            return;
        }
        let minutes = settings
            .map_setting::<u32>("Ceasefire")
            .unwrap_or(*settings.catalog.ceasefire.default_value());
        Self::set_minutes(settings, minutes);
    }
}

impl Attribute for Ceasefire {
    const NAME: &'static str = "ceasefire";

    attribute_slot!(ceasefire);

    fn init(settings: &mut MatchSettings) {
        settings.ceasefire.minutes = *settings.catalog.ceasefire.default_value();
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.set_setting("Ceasefire", settings.ceasefire.minutes);
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(minutes) = payload.setting::<u32>("Ceasefire") {
            Self::set_minutes(settings, minutes);
        }
    }
}
