//! Whether the map is circular.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Circular map flag, taken from the map's authored `CircularMap`.
#[derive(Debug, Default)]
pub struct CircularMap {
    observable: SettingsObservable,
    value: bool,
}

impl CircularMap {
    /// Whether the map is circular.
    #[must_use]
    pub fn value(&self) -> bool {
        self.value
    }

    /// Set the flag.
    pub fn set_value(settings: &mut MatchSettings, value: bool) {
        let old = std::mem::replace(&mut settings.circular_map.value, value);
        settings.fire::<Self, _>("value", &old, old != value);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let value = settings.map_setting::<bool>("CircularMap").unwrap_or(false);
        Self::set_value(settings, value);
    }
}

impl Attribute for CircularMap {
    const NAME: &'static str = "circularMap";

    attribute_slot!(circular_map);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.set_setting("CircularMap", settings.circular_map.value);
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(value) = payload.setting::<bool>("CircularMap") {
            Self::set_value(settings, value);
        }
    }
}
