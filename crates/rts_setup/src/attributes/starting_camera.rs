//! Per-player starting camera authored by hand-made maps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::map_cache::MapType;
use crate::observable::Change;
use crate::payload::{same_f64, InitAttributes};
use crate::settings::MatchSettings;

use super::{Map, PlayerCount};

/// A 3-component vector. NaN components compare equal to NaN.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CameraVector {
    /// X component.
    #[serde(default)]
    pub x: f64,
    /// Y component.
    #[serde(default)]
    pub y: f64,
    /// Z component.
    #[serde(default)]
    pub z: f64,
}

impl PartialEq for CameraVector {
    fn eq(&self, other: &Self) -> bool {
        same_f64(self.x, other.x) && same_f64(self.y, other.y) && same_f64(self.z, other.z)
    }
}

/// Authored camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera position.
    #[serde(rename = "Position")]
    pub position: CameraVector,
    /// Camera rotation, if authored.
    #[serde(rename = "Rotation", default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<CameraVector>,
}

/// Starting camera per player slot.
#[derive(Debug, Default)]
pub struct StartingCamera {
    observable: SettingsObservable,
    values: Vec<Option<Camera>>,
}

impl StartingCamera {
    /// Camera per player.
    #[must_use]
    pub fn values(&self) -> &[Option<Camera>] {
        &self.values
    }

    fn snapshot(&self) -> Value {
        serde_json::to_value(&self.values).unwrap_or(Value::Null)
    }

    fn on_player_count_change(settings: &mut MatchSettings, _: &Change) {
        let old = settings.starting_camera.snapshot();
        let players = settings.players();
        settings.starting_camera.values.resize(players, None);
        settings.trigger::<Self>("values", old);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        let cameras: Vec<Option<Camera>> = if settings.map.kind() == MapType::Random {
            vec![None; settings.players()]
        } else {
            (0..settings.players())
                .map(|player| settings.map_player_setting::<Camera>(player, "StartingCamera"))
                .collect()
        };
        let old = std::mem::replace(&mut settings.starting_camera.values, cameras);
        let changed = old != settings.starting_camera.values;
        settings.fire::<Self, _>("values", &old, changed);
    }
}

impl Attribute for StartingCamera {
    const NAME: &'static str = "startingCamera";

    attribute_slot!(starting_camera);

    fn init(settings: &mut MatchSettings) {
        settings.starting_camera.values = vec![None; settings.players()];
        settings.watch::<PlayerCount>(Self::on_player_count_change, &["nb_players"], true);
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        for (player, camera) in settings.starting_camera.values.iter().enumerate() {
            let Some(camera) = camera else {
                continue;
            };
            if let Ok(value) = serde_json::to_value(camera) {
                payload.set_player_setting(player, "StartingCamera", value);
            }
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        let old = settings.starting_camera.snapshot();
        let cameras: Vec<Option<Camera>> = (0..settings.starting_camera.values.len())
            .map(|player| payload.player_setting::<Camera>(player, "StartingCamera"))
            .collect();
        if cameras != settings.starting_camera.values {
            settings.starting_camera.values = cameras;
            settings.trigger::<Self>("values", old);
        }
    }
}
