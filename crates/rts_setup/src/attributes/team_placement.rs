//! Team placement scheme of a generated map.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable, RANDOM};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::{AuthoredId, MatchSettings};

use super::Map;

/// Placement scheme; a scheme the map does not offer is normalised to
/// `"random"` on the next map change.
#[derive(Debug, Default)]
pub struct TeamPlacement {
    observable: SettingsObservable,
    options: Vec<String>,
    value: Option<String>,
}

impl TeamPlacement {
    /// Schemes offered by the selected map.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Current scheme.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Choose a scheme.
    pub fn set_value(settings: &mut MatchSettings, value: Option<String>) {
        let old = std::mem::replace(&mut settings.team_placement.value, value);
        let changed = old != settings.team_placement.value;
        settings.fire::<Self, _>("value", &old, changed);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let options = if settings.map.kind() == MapType::Random {
            settings
                .map_setting::<Vec<AuthoredId>>("TeamPlacements")
                .unwrap_or_default()
                .into_iter()
                .map(|option| option.id)
                .collect()
        } else {
            Vec::new()
        };
        let old = std::mem::replace(&mut settings.team_placement.options, options);
        let changed = old != settings.team_placement.options;
        settings.fire::<Self, _>("options", &old, changed);

        let this = &settings.team_placement;
        let value = if this.options.is_empty() {
            None
        } else {
            match &this.value {
                Some(value) if value == RANDOM || this.options.contains(value) => Some(value.clone()),
                _ => Some(RANDOM.to_string()),
            }
        };
        Self::set_value(settings, value);
    }
}

impl Attribute for TeamPlacement {
    const NAME: &'static str = "teamPlacement";

    attribute_slot!(team_placement);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if let Some(value) = &settings.team_placement.value {
            payload.set_setting("TeamPlacement", value.as_str());
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(value) = payload.setting::<String>("TeamPlacement") {
            Self::set_value(settings, Some(value));
        }
    }

    fn pick_random_items(settings: &mut MatchSettings) -> bool {
        if !Self::holds_random(settings) {
            return false;
        }
        let options = settings.team_placement.options.clone();
        let Some(value) = settings.choose(&options) else {
            return false;
        };
        Self::set_value(settings, Some(value));
        true
    }

    fn holds_random(settings: &MatchSettings) -> bool {
        settings.team_placement.value.as_deref() == Some(RANDOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::{count_notification, notifications, settings};

    #[test]
    fn test_options_notify_watchers() {
        let mut settings = settings();
        settings.watch::<TeamPlacement>(count_notification, &["options"], false);

        Map::select_map(&mut settings, "aegean_sea");
        assert_eq!(notifications(), 1);
        assert_eq!(settings.get::<TeamPlacement>().options().len(), 3);

        Map::select_map(&mut settings, "unknown");
        assert_eq!(notifications(), 2);
        assert_eq!(settings.get::<TeamPlacement>().options(), ["radial"]);
    }

    #[test]
    fn test_unoffered_scheme_is_normalised_on_map_change() {
        let mut settings = settings();
        Map::select_map(&mut settings, "aegean_sea");
        assert_eq!(settings.get::<TeamPlacement>().value(), Some(RANDOM));
        TeamPlacement::set_value(&mut settings, Some("line".into()));

        Map::select_map(&mut settings, "unknown");
        assert_eq!(settings.get::<TeamPlacement>().value(), Some(RANDOM));

        TeamPlacement::set_value(&mut settings, Some("river".into()));
        assert_eq!(settings.get::<TeamPlacement>().value(), Some("river"));
        Map::select_map(&mut settings, "aegean_sea");
        assert_eq!(settings.get::<TeamPlacement>().value(), Some(RANDOM));
    }

    #[test]
    fn test_offered_scheme_survives_map_change() {
        let mut settings = settings();
        Map::select_map(&mut settings, "aegean_sea");
        TeamPlacement::set_value(&mut settings, Some("radial".into()));
        Map::select_map(&mut settings, "unknown");
        assert_eq!(settings.get::<TeamPlacement>().value(), Some("radial"));

        Map::select_type(&mut settings, MapType::Skirmish);
        assert_eq!(settings.get::<TeamPlacement>().value(), None);
    }
}
