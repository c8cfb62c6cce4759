//! Active victory conditions.
//!
//! The active set is kept in catalog order. Enabling a condition disables
//! the conditions it lists as mutually exclusive. Fires `active`.

use serde_json::Value;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::error::{Result, SetupError};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// Set of active victory condition names.
#[derive(Debug, Default)]
pub struct VictoryConditions {
    observable: SettingsObservable,
    active: Vec<String>,
}

impl VictoryConditions {
    /// Active conditions in catalog order.
    #[must_use]
    pub fn active(&self) -> &[String] {
        &self.active
    }

    /// Whether `name` is active.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|active| active == name)
    }

    /// Trigger scripts required by the active conditions, deduplicated.
    #[must_use]
    pub fn scripts(settings: &MatchSettings) -> Vec<String> {
        let mut scripts: Vec<String> = Vec::new();
        for condition in &settings.catalog.victory_conditions {
            if !settings.victory_conditions.is_active(&condition.name) {
                continue;
            }
            for script in &condition.scripts {
                if !scripts.contains(script) {
                    scripts.push(script.clone());
                }
            }
        }
        scripts
    }

    /// Enable or disable one condition.
    pub fn set_enabled(settings: &mut MatchSettings, name: &str, enabled: bool) -> Result<()> {
        let Some(condition) = settings.catalog.victory_condition(name) else {
            return Err(SetupError::UnknownVictoryCondition(name.to_string()));
        };
        let excluded = condition.disabled_when_checked.clone();
        let mut active = settings.victory_conditions.active.clone();
        if enabled {
            active.retain(|other| !excluded.contains(other));
            if !active.iter().any(|other| other == name) {
                active.push(name.to_string());
            }
        } else {
            active.retain(|other| other != name);
        }
        Self::assign(settings, active);
        Ok(())
    }

    /// Replace the active set, dropping unknown names and restoring catalog
    /// order.
    fn assign(settings: &mut MatchSettings, requested: Vec<String>) {
        for name in &requested {
            if settings.catalog.victory_condition(name).is_none() {
                tracing::warn!(condition = %name, "Ignoring unknown victory condition");
            }
        }
        let active: Vec<String> = settings
            .catalog
            .victory_conditions
            .iter()
            .filter(|condition| requested.contains(&condition.name))
            .map(|condition| condition.name.clone())
            .collect();
        if active == settings.victory_conditions.active {
            return;
        }
        let old = std::mem::replace(&mut settings.victory_conditions.active, active);
        settings.trigger::<Self>("active", Value::from(old));
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        if let Some(authored) = settings.map_setting::<Vec<String>>("VictoryConditions") {
            Self::assign(settings, authored);
        }
    }
}

impl Attribute for VictoryConditions {
    const NAME: &'static str = "victoryConditions";

    attribute_slot!(victory_conditions);

    fn init(settings: &mut MatchSettings) {
        settings.victory_conditions.active = settings
            .catalog
            .victory_conditions
            .iter()
            .filter(|condition| condition.default)
            .map(|condition| condition.name.clone())
            .collect();
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        payload.set_setting("VictoryConditions", settings.victory_conditions.active.clone());
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        if let Some(active) = payload.setting::<Vec<String>>("VictoryConditions") {
            Self::assign(settings, active);
        }
    }
}
