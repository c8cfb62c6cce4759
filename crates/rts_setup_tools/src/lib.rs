//! # RTS Setup Tools
//!
//! Headless front end for the match-setup engine:
//! - Resolve a setup session to its launch payload
//! - Validate that a saved or received payload round-trips losslessly

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod resolve;
pub mod validate;

use rts_setup::error::SetupError;
use rts_setup::map_cache::MapType;
use thiserror::Error;

/// Errors raised by the tools on top of engine errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Engine failure.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// The requested map is not in the loaded map directory.
    #[error("No {kind} map named '{name}' in the map directory")]
    UnknownMap {
        /// Requested type.
        kind: MapType,
        /// Requested name.
        name: String,
    },

    /// A random map was requested but no random maps were loaded.
    #[error("No random maps to choose from")]
    EmptyRandomPool,
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
