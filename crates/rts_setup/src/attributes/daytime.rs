//! Time of day for generated maps that author `Daytime` options.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable, RANDOM};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::{AuthoredId, MatchSettings};

use super::Map;

/// Daytime selection; `None` when the map offers no options.
#[derive(Debug, Default)]
pub struct Daytime {
    observable: SettingsObservable,
    options: Vec<String>,
    value: Option<String>,
}

impl Daytime {
    /// Options offered by the selected map.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Choose a daytime. Unknown ids become `"random"`.
    pub fn set_value(settings: &mut MatchSettings, value: Option<String>) {
        let options = &settings.daytime.options;
        let value = match value {
            _ if options.is_empty() => None,
            Some(id) if id != RANDOM && !options.contains(&id) => Some(RANDOM.to_string()),
            value => value,
        };
        let old = std::mem::replace(&mut settings.daytime.value, value);
        let changed = old != settings.daytime.value;
        settings.fire::<Self, _>("value", &old, changed);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let options: Vec<String> = if settings.map.kind() == MapType::Random {
            settings
                .map_setting::<Vec<AuthoredId>>("Daytime")
                .unwrap_or_default()
                .into_iter()
                .map(|option| option.id)
                .collect()
        } else {
            Vec::new()
        };
        let old = std::mem::replace(&mut settings.daytime.options, options);
        let changed = old != settings.daytime.options;
        settings.fire::<Self, _>("options", &old, changed);
        Self::set_value(settings, Some(RANDOM.to_string()));
    }
}

impl Attribute for Daytime {
    const NAME: &'static str = "daytime";

    attribute_slot!(daytime);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if let Some(value) = &settings.daytime.value {
            payload.set_setting("Daytime", value.as_str());
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(value) = payload.setting::<String>("Daytime") {
            Self::set_value(settings, Some(value));
        }
    }

    fn pick_random_items(settings: &mut MatchSettings) -> bool {
        if !Self::holds_random(settings) {
            return false;
        }
        let options = settings.daytime.options.clone();
        let Some(value) = settings.choose(&options) else {
            return false;
        };
        Self::set_value(settings, Some(value));
        true
    }

    fn holds_random(settings: &MatchSettings) -> bool {
        settings.daytime.value.as_deref() == Some(RANDOM)
    }
}
