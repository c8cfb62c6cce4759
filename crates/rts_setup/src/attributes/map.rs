//! The selected map.
//!
//! Map is the root dependency: most attributes watch its `type` and `map`
//! properties and re-read the authored metadata when they change.
//!
//! Properties fired: `type`, `map`, `random_options`.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable, RANDOM};
use crate::map_cache::{MapData, MapType};
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

/// Map type, map id and the authored metadata of the selection.
#[derive(Debug, Default)]
pub struct Map {
    observable: SettingsObservable,
    kind: MapType,
    map: Option<String>,
    data: Option<MapData>,
    script: Option<String>,
    random_options: Vec<String>,
}

impl Map {
    /// Selected map type.
    #[must_use]
    pub fn kind(&self) -> MapType {
        self.kind
    }

    /// Selected map id, `"random"`, or `None` if nothing is selected.
    #[must_use]
    pub fn map(&self) -> Option<&str> {
        self.map.as_deref()
    }

    /// Authored metadata of the selected map.
    #[must_use]
    pub fn data(&self) -> Option<&MapData> {
        self.data.as_ref()
    }

    /// Generator script, only set for random maps.
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Pool a random map selection is resolved from.
    #[must_use]
    pub fn random_options(&self) -> &[String] {
        &self.random_options
    }

    /// Switch map type. A different type clears the selected map.
    pub fn select_type(settings: &mut MatchSettings, kind: MapType) {
        let old = std::mem::replace(&mut settings.map.kind, kind);
        let changed = old != kind;
        settings.fire::<Self, _>("type", &old, changed);
        if changed {
            Self::assign(settings, None, None);
        }
    }

    /// Select a map of the current type, loading its metadata from the map
    /// cache. `"random"` selects nothing until resolution.
    pub fn select_map(settings: &mut MatchSettings, name: &str) {
        let data = if name == RANDOM {
            None
        } else {
            let data = settings.lookup_map(settings.map.kind, name);
            if data.is_none() {
                tracing::warn!(kind = %settings.map.kind, name, "Selected map is not in the map cache");
            }
            data
        };
        Self::assign(settings, Some(name.to_string()), data);
    }

    /// Set the pool of maps a random selection may resolve to.
    pub fn set_random_options(settings: &mut MatchSettings, options: Vec<String>) {
        let options: Vec<String> = options.into_iter().filter(|name| name != RANDOM).collect();
        let old = std::mem::replace(&mut settings.map.random_options, options);
        let changed = old != settings.map.random_options;
        settings.fire::<Self, _>("random_options", &old, changed);
    }

    fn assign(settings: &mut MatchSettings, map: Option<String>, data: Option<MapData>) {
        let this = &mut settings.map;
        this.script = match (this.kind, &data) {
            (MapType::Random, Some(data)) => data
                .settings
                .get("Script")
                .and_then(|script| script.as_str())
                .map(str::to_string),
            _ => None,
        };
        this.data = data;
        let old = std::mem::replace(&mut this.map, map);
        let changed = old != this.map;
        settings.fire::<Self, _>("map", &old, changed);
    }
}

impl Attribute for Map {
    const NAME: &'static str = "map";

    attribute_slot!(map);

    fn init(settings: &mut MatchSettings) {
        settings.map.kind = MapType::Random;
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        let this = &settings.map;
        payload.set_top("mapType", this.kind.as_str());
        if let Some(map) = &this.map {
            payload.set_top("map", map.as_str());
        }
        if let Some(script) = &this.script {
            payload.set_top("script", script.as_str());
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(kind) = payload.top::<MapType>("mapType") {
            Self::select_type(settings, kind);
        }
        if let Some(map) = payload.top::<String>("map") {
            if settings.map.map.as_deref() != Some(map.as_str()) {
                Self::select_map(settings, &map);
            }
        }
    }

    fn pick_random_items(settings: &mut MatchSettings) -> bool {
        if settings.map.map.as_deref() != Some(RANDOM) {
            return false;
        }
        let options = settings.map.random_options.clone();
        let Some(choice) = settings.choose(&options) else {
            tracing::warn!(kind = %settings.map.kind, "No maps to pick a random map from");
            return false;
        };
        tracing::debug!(map = %choice, "Resolved random map");
        Self::select_map(settings, &choice);
        true
    }

    fn holds_random(settings: &MatchSettings) -> bool {
        settings.map.map.as_deref() == Some(RANDOM)
    }
}
