//! The contract every settings attribute implements.
//!
//! An attribute is a slice of match settings (the map, the player count, the
//! biome, ...) held by value inside [`MatchSettings`]. It owns an
//! [`Observable`] that sibling attributes register watchers on, and it
//! exposes setters as associated functions taking the whole settings object,
//! so that firing watchers can reach every other attribute.
//!
//! All passes take the settings object rather than `self`: an attribute may
//! read any sibling while writing its own slice of the payload.

use crate::observable::Observable;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

/// Sentinel for a setting to be resolved by random resolution.
pub const RANDOM: &str = "random";

/// Watcher list type embedded in each attribute.
pub type SettingsObservable = Observable<MatchSettings>;

/// A reactive settings slice.
pub trait Attribute: Sized + 'static {
    /// Name used in logs and change notifications.
    const NAME: &'static str;

    /// This attribute inside `settings`.
    fn slot(settings: &MatchSettings) -> &Self;

    /// This attribute inside `settings`, mutably.
    #[doc(hidden)]
    fn slot_mut(settings: &mut MatchSettings) -> &mut Self;

    /// Watchers registered on this attribute.
    fn observable(&self) -> &SettingsObservable;

    /// Watchers registered on this attribute, mutably.
    #[doc(hidden)]
    fn observable_mut(&mut self) -> &mut SettingsObservable;

    /// Set defaults and register watchers on sibling attributes.
    ///
    /// Runs once, in declared order, before any watcher can fire. Defaults
    /// are written directly rather than through setters.
    fn init(settings: &mut MatchSettings);

    /// Write this attribute's state into `payload`.
    fn to_init_attributes(settings: &MatchSettings, payload: &mut InitAttributes);

    /// Read this attribute's state from a possibly partial `payload`.
    fn from_init_attributes(_settings: &mut MatchSettings, _payload: &InitAttributes) {}

    /// Refine `payload` after every attribute has written its own part.
    fn on_finalize_attributes(_settings: &MatchSettings, _payload: &mut InitAttributes) {}

    /// Replace a random sentinel with a concrete value when possible.
    ///
    /// Returns `true` if anything was resolved, which asks the registry for
    /// another pass.
    fn pick_random_items(_settings: &mut MatchSettings) -> bool {
        false
    }

    /// Whether a random sentinel is still held.
    fn holds_random(_settings: &MatchSettings) -> bool {
        false
    }
}

/// Implements the slot and observable accessors of [`Attribute`] for an
/// attribute stored in `MatchSettings::$field`.
macro_rules! attribute_slot {
    ($field:ident) => {
        fn slot(settings: &$crate::settings::MatchSettings) -> &Self {
            &settings.$field
        }

        fn slot_mut(settings: &mut $crate::settings::MatchSettings) -> &mut Self {
            &mut settings.$field
        }

        fn observable(&self) -> &$crate::attribute::SettingsObservable {
            &self.observable
        }

        fn observable_mut(&mut self) -> &mut $crate::attribute::SettingsObservable {
            &mut self.observable
        }
    };
}

pub(crate) use attribute_slot;
