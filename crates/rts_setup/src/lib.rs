//! # RTS Setup
//!
//! Reactive match-setup engine for the Post-Scarcity RTS lobby.
//!
//! Dozens of interdependent match settings (map, player count, teams, biome,
//! victory conditions, seeds, ...) observe one another, resolve `"random"`
//! choices to concrete values and collapse into a flat payload used for
//! network sync, persistence and match launch.
//!
//! Everything here is single-threaded and synchronous:
//! - Setters fire watcher chains before returning
//! - Map metadata is read from an in-memory cache, never loaded on demand
//! - Random choices come from a seeded RNG owned by the session
//!
//! ## Crate Structure
//!
//! - [`observable`] - Per-property watcher lists
//! - [`attribute`] - The contract every settings attribute implements
//! - [`attributes`] - The concrete attributes
//! - [`settings`] - The registry driving init, (de)serialization and resolution
//! - [`payload`] - The flat init-attributes payload
//! - [`catalog`] - Static choice lists loaded from RON
//! - [`map_cache`] - Authored map metadata
//! - [`persist`] - Saved settings between sessions

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod attribute;
pub mod attributes;
pub mod catalog;
pub mod error;
pub mod map_cache;
pub mod observable;
pub mod payload;
pub mod persist;
pub mod registry;
pub mod session;
pub mod settings;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::attribute::{Attribute, RANDOM};
    pub use crate::attributes::*;
    pub use crate::catalog::SettingsCatalog;
    pub use crate::error::{Result, SetupError};
    pub use crate::map_cache::{InMemoryMapCache, MapCache, MapData, MapType};
    pub use crate::observable::Change;
    pub use crate::payload::{deep_equal, InitAttributes};
    pub use crate::persist::PersistedSettings;
    pub use crate::session::{SessionConfig, SessionKind};
    pub use crate::settings::MatchSettings;
}
