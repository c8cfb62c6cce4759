//! Whether the regicide hero may garrison.

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::VictoryConditions;

const CONDITION: &str = "regicide";

/// Hero garrison flag, used while regicide is active.
#[derive(Debug, Default)]
pub struct RegicideGarrison {
    observable: SettingsObservable,
    enabled: bool,
}

impl RegicideGarrison {
    /// Whether heroes may garrison.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether regicide is active.
    #[must_use]
    pub fn is_available(settings: &MatchSettings) -> bool {
        settings.victory_conditions.is_active(CONDITION)
    }

    /// Toggle hero garrisoning.
    pub fn set_enabled(settings: &mut MatchSettings, enabled: bool) {
        let old = std::mem::replace(&mut settings.regicide_garrison.enabled, enabled);
        settings.fire::<Self, _>("enabled", &old, old != enabled);
    }

    fn on_victory_change(settings: &mut MatchSettings, _: &Change) {
        if !Self::is_available(settings) {
            Self::set_enabled(settings, false);
        }
    }
}

impl Attribute for RegicideGarrison {
    const NAME: &'static str = "regicideGarrison";

    attribute_slot!(regicide_garrison);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<VictoryConditions>(Self::on_victory_change, &["active"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if Self::is_available(settings) {
            payload.set_setting("RegicideGarrison", settings.regicide_garrison.enabled);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(enabled) = payload.setting::<bool>("RegicideGarrison") {
            Self::set_enabled(settings, enabled);
        }
    }
}
