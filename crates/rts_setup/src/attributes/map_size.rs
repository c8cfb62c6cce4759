//! Random map size in tiles.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Tiles per side of a generated map. Only meaningful for random maps.
#[derive(Debug, Default)]
pub struct MapSize {
    observable: SettingsObservable,
    size: u32,
}

impl MapSize {
    /// Current size in tiles.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether the size applies to the selected map type.
    #[must_use]
    pub fn is_available(settings: &MatchSettings) -> bool {
        settings.map.kind() == MapType::Random
    }

    /// Pick a size; values the catalog does not offer fall back to its default.
    pub fn set_size(settings: &mut MatchSettings, size: u32) {
        let size = if settings.catalog.map_sizes.contains(&size) {
            size
        } else {
            tracing::debug!(size, "Unknown map size, using default");
            *settings.catalog.map_sizes.default_value()
        };
        let old = std::mem::replace(&mut settings.map_size.size, size);
        settings.fire::<Self, _>("size", &old, old != size);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if !Self::is_available(settings) {
            return;
        }
        let size = settings
            .map_setting::<u32>("Size")
            .unwrap_or(*settings.catalog.map_sizes.default_value());
        Self::set_size(settings, size);
    }
}

impl Attribute for MapSize {
    const NAME: &'static str = "mapSize";

    attribute_slot!(map_size);

    fn init(settings: &mut MatchSettings) {
        settings.map_size.size = *settings.catalog.map_sizes.default_value();
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if Self::is_available(settings) {
            payload.set_setting("Size", settings.map_size.size);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(size) = payload.setting::<u32>("Size") {
            Self::set_size(settings, size);
        }
    }
}
