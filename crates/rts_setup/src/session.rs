//! Setup session configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How the setup screen was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionKind {
    /// Local single player setup.
    #[default]
    Singleplayer,
    /// Hosting a multiplayer match.
    MultiplayerHost,
    /// Rejoining a multiplayer setup; state arrives from the host.
    Rejoin,
}

impl SessionKind {
    /// Whether this session is part of a networked match.
    #[must_use]
    pub const fn is_networked(&self) -> bool {
        !matches!(self, Self::Singleplayer)
    }

    /// File name the persisted settings of this mode are stored under.
    #[must_use]
    pub const fn settings_file_name(&self) -> &'static str {
        match self {
            Self::Singleplayer => "matchsettings.json",
            Self::MultiplayerHost | Self::Rejoin => "matchsettings.mp.json",
        }
    }
}

/// Per-session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// How the setup screen was entered.
    pub kind: SessionKind,
    /// Whether the match is hosted through the multiplayer lobby.
    #[serde(default)]
    pub lobby: bool,
    /// Seed for resolving random settings; `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// A local single player session.
    #[must_use]
    pub fn singleplayer() -> Self {
        Self::default()
    }

    /// A multiplayer host session, optionally listed in the lobby.
    #[must_use]
    pub fn multiplayer_host(lobby: bool) -> Self {
        Self {
            kind: SessionKind::MultiplayerHost,
            lobby,
            seed: None,
        }
    }

    /// Use a fixed seed for random resolution.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Ok(ron::from_str(ron)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_per_mode() {
        assert_eq!(SessionKind::Singleplayer.settings_file_name(), "matchsettings.json");
        assert_eq!(SessionKind::Rejoin.settings_file_name(), "matchsettings.mp.json");
        assert!(SessionKind::MultiplayerHost.is_networked());
    }

    #[test]
    fn test_parse_from_ron() {
        let config = SessionConfig::from_ron_str("(kind: MultiplayerHost, lobby: true)").unwrap();
        assert_eq!(config.kind, SessionKind::MultiplayerHost);
        assert!(config.lobby);
        assert_eq!(config.seed, None);
    }
}
