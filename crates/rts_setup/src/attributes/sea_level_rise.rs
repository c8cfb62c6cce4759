//! Minutes until the sea level starts rising, for maps that author it.

use serde::{Deserialize, Serialize};

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Authored `SeaLevelRise` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeaLevelRange {
    /// Lowest selectable value.
    #[serde(rename = "Min")]
    pub min: u32,
    /// Highest selectable value.
    #[serde(rename = "Max")]
    pub max: u32,
    /// Value applied on map selection.
    #[serde(rename = "Default")]
    pub default: u32,
}

/// Sea level rise time, clamped to the map's range.
#[derive(Debug, Default)]
pub struct SeaLevelRise {
    observable: SettingsObservable,
    range: Option<SeaLevelRange>,
    value: Option<u32>,
}

impl SeaLevelRise {
    /// Range authored by the selected map.
    #[must_use]
    pub fn range(&self) -> Option<SeaLevelRange> {
        self.range
    }

    /// Current value in minutes.
    #[must_use]
    pub fn value(&self) -> Option<u32> {
        self.value
    }

    /// Set the rise time, clamped to the map's range. Ignored when the map
    /// has no sea level rise.
    pub fn set_value(settings: &mut MatchSettings, minutes: u32) {
        let Some(range) = settings.sea_level_rise.range else {
            return;
        };
        let value = Some(minutes.clamp(range.min, range.max.max(range.min)));
        let old = std::mem::replace(&mut settings.sea_level_rise.value, value);
        settings.fire::<Self, _>("value", &old, old != value);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let range = if settings.map.kind() == MapType::Random {
            settings.map_setting::<SeaLevelRange>("SeaLevelRise")
        } else {
            None
        };
        let old = std::mem::replace(&mut settings.sea_level_rise.range, range);
        settings.fire::<Self, _>("range", &old, old != range);
        match range {
            Some(range) => Self::set_value(settings, range.default),
            None => {
                let old = settings.sea_level_rise.value.take();
                settings.fire::<Self, _>("value", &old, old.is_some());
            }
        }
    }
}

impl Attribute for SeaLevelRise {
    const NAME: &'static str = "seaLevelRise";

    attribute_slot!(sea_level_rise);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if let Some(value) = settings.sea_level_rise.value {
            payload.set_setting("SeaLevelRiseTime", value);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(value) = payload.setting::<u32>("SeaLevelRiseTime") {
            Self::set_value(settings, value);
        }
    }
}
