//! Map generation and AI seeds.

use rand::Rng;

use crate::attribute::{attribute_slot, Attribute, SettingsObservable};
use crate::observable::Change;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

use super::Map;

/// `Seed` and `AISeed`; `None` is the unresolved sentinel.
#[derive(Debug, Default)]
pub struct Seeds {
    observable: SettingsObservable,
    seed: Option<u32>,
    ai_seed: Option<u32>,
}

impl Seeds {
    /// Map generation seed.
    #[must_use]
    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    /// AI seed.
    #[must_use]
    pub fn ai_seed(&self) -> Option<u32> {
        self.ai_seed
    }

    /// Set both seeds; `None` rerolls during resolution.
    pub fn set_seeds(settings: &mut MatchSettings, seed: Option<u32>, ai_seed: Option<u32>) {
        let old = std::mem::replace(&mut settings.seeds.seed, seed);
        settings.fire::<Self, _>("seed", &old, old != seed);
        let old = std::mem::replace(&mut settings.seeds.ai_seed, ai_seed);
        settings.fire::<Self, _>("ai_seed", &old, old != ai_seed);
    }

    fn on_map_change(settings: &mut MatchSettings, _: &Change) {
        Self::set_seeds(settings, None, None);
    }
}

impl Attribute for Seeds {
    const NAME: &'static str = "seeds";

    attribute_slot!(seeds);

    fn init(settings: &mut MatchSettings) {
        settings.watch::<Map>(Self::on_map_change, &["map"], true);
    }

    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes) {
        if let Some(seed) = settings.seeds.seed {
            payload.set_setting("Seed", seed);
        }
        if let Some(ai_seed) = settings.seeds.ai_seed {
            payload.set_setting("AISeed", ai_seed);
        }
    }

    fn from_init_attributes(settings: &mut MatchSettings, payload: &InitAttributes) {
        let seed = payload.setting::<u32>("Seed");
        let ai_seed = payload.setting::<u32>("AISeed");
        Self::set_seeds(settings, seed, ai_seed);
    }

    fn pick_random_items(settings: &mut MatchSettings) -> bool {
        if !Self::holds_random(settings) {
            return false;
        }
        let seed = settings.seeds.seed.unwrap_or_else(|| settings.rng.gen());
        let ai_seed = settings.seeds.ai_seed.unwrap_or_else(|| settings.rng.gen());
        Self::set_seeds(settings, Some(seed), Some(ai_seed));
        true
    }

    fn holds_random(settings: &MatchSettings) -> bool {
        settings.seeds.seed.is_none() || settings.seeds.ai_seed.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::testing::settings;

    #[test]
    fn test_seeds_are_drawn_and_rerolled_on_map_change() {
        let mut settings = settings();
        assert!(Seeds::holds_random(&settings));
        assert!(Seeds::pick_random_items(&mut settings));
        assert!(settings.get::<Seeds>().seed().is_some());
        assert!(!Seeds::pick_random_items(&mut settings));

        Map::select_map(&mut settings, "aegean_sea");
        assert_eq!(settings.get::<Seeds>().seed(), None);
        assert_eq!(settings.get::<Seeds>().ai_seed(), None);
    }

    #[test]
    fn test_same_session_seed_draws_same_values() {
        let mut a = settings();
        let mut b = settings();
        Seeds::pick_random_items(&mut a);
        Seeds::pick_random_items(&mut b);
        assert_eq!(a.get::<Seeds>().seed(), b.get::<Seeds>().seed());
        assert_eq!(a.get::<Seeds>().ai_seed(), b.get::<Seeds>().ai_seed());
    }
}
