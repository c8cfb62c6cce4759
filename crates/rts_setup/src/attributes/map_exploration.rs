//! Map visibility options.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Revealed / explored map and shared allied vision.
///
/// A revealed map is always explored: revealing sets `explored`, and
/// un-exploring clears `revealed`.
#[derive(Debug, Default)]
pub struct MapExploration {
    observable: SettingsObservable,
    revealed: bool,
    explored: bool,
    allied_view: bool,
}

impl MapExploration {
    /// Whole map visible from the start.
    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Terrain explored from the start.
    #[must_use]
    pub fn explored(&self) -> bool {
        self.explored
    }

    /// Allies share vision.
    #[must_use]
    pub fn allied_view(&self) -> bool {
        self.allied_view
    }

    /// Reveal or hide the map.
    pub fn set_revealed(settings: &mut MatchSettings, revealed: bool) {
        let old = std::mem::replace(&mut settings.map_exploration.revealed, revealed);
        settings.fire::<Self, _>("revealed", &old, old != revealed);
        if revealed {
            Self::set_explored(settings, true);
        }
    }

    /// Explore or unexplore the map.
    pub fn set_explored(settings: &mut MatchSettings, explored: bool) {
        let old = std::mem::replace(&mut settings.map_exploration.explored, explored);
        settings.fire::<Self, _>("explored", &old, old != explored);
        if !explored {
            Self::set_revealed(settings, false);
        }
    }

    /// Toggle allied vision.
    pub fn set_allied_view(settings: &mut MatchSettings, allied_view: bool) {
        let old = std::mem::replace(&mut settings.map_exploration.allied_view, allied_view);
        settings.fire::<Self, _>("allied_view", &old, old != allied_view);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if settings.map.kind() != MapType::Scenario {
            return;
        }
        let revealed = settings.map_setting::<bool>("RevealMap").unwrap_or(false);
        let explored = settings.map_setting::<bool>("ExploreMap").unwrap_or(false);
        let allied_view = settings.map_setting::<bool>("AllyView").unwrap_or(false);
        Self::set_explored(settings, explored || revealed);
        Self::set_revealed(settings, revealed);
        Self::set_allied_view(settings, allied_view);
    }
}

impl Attribute for MapExploration {
    const NAME: &'static str = "mapExploration";

    attribute_slot!(map_exploration);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        let this = &settings.map_exploration;
        payload.set_setting("RevealMap", this.revealed);
        payload.set_setting("ExploreMap", this.explored);
        payload.set_setting("AllyView", this.allied_view);
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(explored) = payload.setting::<bool>("ExploreMap") {
            Self::set_explored(settings, explored);
        }
        if let Some(revealed) = payload.setting::<bool>("RevealMap") {
            Self::set_revealed(settings, revealed);
        }
        if let Some(allied_view) = payload.setting::<bool>("AllyView") {
            Self::set_allied_view(settings, allied_view);
        }
    }
}
