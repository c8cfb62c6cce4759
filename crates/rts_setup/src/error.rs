//! Error types for the match-setup engine.

use thiserror::Error;

/// Result type alias using [`SetupError`].
pub type Result<T> = std::result::Result<T, SetupError>;

/// Top-level error type for all match-setup errors.
///
/// Missing or malformed legacy payload data is deliberately absent from this
/// list: attributes fall back to their own defaults instead.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The embedded or on-disk settings catalog failed to parse.
    #[error("Failed to parse settings catalog: {0}")]
    CatalogParse(#[from] ron::error::SpannedError),

    /// The settings catalog parsed but is unusable.
    #[error("Invalid settings catalog: {0}")]
    InvalidCatalog(String),

    /// Filesystem error while reading maps or persisted settings.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An authored map header could not be loaded into the map cache.
    #[error("Failed to load map '{path}': {message}")]
    MapLoad {
        /// Path to the map header.
        path: String,
        /// Error message.
        message: String,
    },

    /// A payload was structurally unusable (e.g. its root is not an object).
    #[error("Invalid init attributes: {0}")]
    InvalidPayload(String),

    /// A per-player setter was called for a slot that does not exist.
    #[error("Player {player} out of range (match has {players} players)")]
    PlayerOutOfRange {
        /// Zero-based player slot.
        player: usize,
        /// Current player count.
        players: usize,
    },

    /// A per-player value was edited while the slot is locked by the map.
    #[error("Player {player} {attribute} is locked by the selected map")]
    SlotLocked {
        /// Attribute that refused the edit.
        attribute: &'static str,
        /// Zero-based player slot.
        player: usize,
    },

    /// A team index outside `-1..max_teams`.
    #[error("Team {team} out of range (max {max_teams} teams)")]
    TeamOutOfRange {
        /// Requested team.
        team: i32,
        /// Number of selectable teams.
        max_teams: i32,
    },

    /// An AI bot name not present in the catalog.
    #[error("Unknown AI bot: {0}")]
    UnknownAiBot(String),

    /// A victory condition name not present in the catalog.
    #[error("Unknown victory condition: {0}")]
    UnknownVictoryCondition(String),

    /// Random resolution did not reach a fixed point within the pass cap.
    #[error("Random settings did not converge after {passes} passes")]
    RandomnessDidNotConverge {
        /// Number of passes attempted.
        passes: u32,
    },

    /// An attribute still holds a random sentinel after the fixed point.
    #[error("Attribute '{attribute}' still holds a random value after resolution")]
    UnresolvedRandom {
        /// Name of the offending attribute.
        attribute: &'static str,
    },

    /// Persisted settings were written by a different engine or mod set.
    #[error("Persisted settings mismatch: {0}")]
    PersistedMismatch(String),
}
