//! Saved match settings.
//!
//! The last payload of each session kind is saved next to the user config
//! and offered again on the next session, but only when it was written by
//! the same engine version with the same mods enabled.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};
use crate::payload::InitAttributes;
use crate::session::SessionKind;
use crate::settings::MatchSettings;

/// Envelope format version for compatibility.
pub const PERSIST_VERSION: u32 = 1;

/// A payload tagged with the engine and mods that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    /// Envelope format version.
    pub version: u32,
    /// Engine version that wrote the payload.
    pub engine_version: String,
    /// Enabled mods, in load order.
    pub mods: Vec<String>,
    /// The saved payload.
    pub attributes: InitAttributes,
}

impl PersistedSettings {
    /// Wrap a payload.
    #[must_use]
    pub fn new(
        engine_version: impl Into<String>,
        mods: Vec<String>,
        attributes: InitAttributes,
    ) -> Self {
        Self {
            version: PERSIST_VERSION,
            engine_version: engine_version.into(),
            mods,
            attributes,
        }
    }

    /// Serialize the current settings into an envelope.
    #[must_use]
    pub fn capture(settings: &MatchSettings, engine_version: &str, mods: &[String]) -> Self {
        Self::new(engine_version, mods.to_vec(), settings.serialize())
    }

    /// Where settings of `kind` are stored under `dir`.
    #[must_use]
    pub fn path_for(dir: &Path, kind: SessionKind) -> PathBuf {
        dir.join(kind.settings_file_name())
    }

    /// Save as pretty JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load an envelope and check its format version.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or was written
    /// in another envelope format.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let persisted: Self = serde_json::from_str(&json)?;

        if persisted.version != PERSIST_VERSION {
            return Err(SetupError::PersistedMismatch(format!(
                "format version {} (expected {PERSIST_VERSION})",
                persisted.version
            )));
        }

        Ok(persisted)
    }

    /// Check the envelope was written by this engine and mod set.
    ///
    /// # Errors
    /// Returns [`SetupError::PersistedMismatch`] naming the first difference.
    pub fn check_compatible(&self, engine_version: &str, mods: &[String]) -> Result<()> {
        if self.engine_version != engine_version {
            return Err(SetupError::PersistedMismatch(format!(
                "engine version {} (running {engine_version})",
                self.engine_version
            )));
        }
        if self.mods != mods {
            return Err(SetupError::PersistedMismatch(format!(
                "mods {:?} (running {mods:?})",
                self.mods
            )));
        }
        Ok(())
    }
}

/// Save the current settings for the next session of the same kind.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn save_for_session(
    settings: &MatchSettings,
    dir: &Path,
    engine_version: &str,
    mods: &[String],
) -> Result<PathBuf> {
    let path = PersistedSettings::path_for(dir, settings.session().kind);
    PersistedSettings::capture(settings, engine_version, mods).save(&path)?;
    tracing::debug!(path = %path.display(), "Saved match settings");
    Ok(path)
}

/// Load the payload saved by a previous session of `kind`.
///
/// Returns `Ok(None)` when nothing is saved, when the saved settings were
/// written by another engine version or mod set, and for rejoining clients
/// (who receive their state from the host).
///
/// # Errors
/// Returns an error if a saved file exists but cannot be read or parsed.
pub fn load_for_session(
    dir: &Path,
    kind: SessionKind,
    engine_version: &str,
    mods: &[String],
) -> Result<Option<InitAttributes>> {
    if kind == SessionKind::Rejoin {
        return Ok(None);
    }
    let path = PersistedSettings::path_for(dir, kind);
    if !path.exists() {
        return Ok(None);
    }
    let persisted = match PersistedSettings::load(&path) {
        Ok(persisted) => persisted,
        Err(SetupError::PersistedMismatch(reason)) => {
            tracing::info!(path = %path.display(), %reason, "Discarding saved match settings");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    if let Err(reason) = persisted.check_compatible(engine_version, mods) {
        tracing::info!(path = %path.display(), %reason, "Discarding saved match settings");
        return Ok(None);
    }
    Ok(Some(persisted.attributes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> InitAttributes {
        InitAttributes::from_value(json!({
            "mapType": "skirmish",
            "map": "skirmish_4v4",
            "settings": { "Ceasefire": 5 }
        }))
        .unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = PersistedSettings::path_for(dir.path(), SessionKind::Singleplayer);
        let persisted = PersistedSettings::new("0.27.0", vec!["public".into()], payload());
        persisted.save(&path).unwrap();

        let loaded = PersistedSettings::load(&path).unwrap();
        assert_eq!(loaded, persisted);
        assert_eq!(loaded.version, PERSIST_VERSION);
    }

    #[test]
    fn test_mismatch_is_reported() {
        let mods = vec!["public".to_string()];
        let persisted = PersistedSettings::new("0.27.0", mods.clone(), payload());
        assert!(persisted.check_compatible("0.27.0", &mods).is_ok());
        assert!(matches!(
            persisted.check_compatible("0.28.0", &mods),
            Err(SetupError::PersistedMismatch(_))
        ));
        let more = vec!["public".to_string(), "extra".to_string()];
        assert!(matches!(
            persisted.check_compatible("0.27.0", &more),
            Err(SetupError::PersistedMismatch(_))
        ));
    }

    #[test]
    fn test_session_loader_skips_incompatible_files() {
        let dir = tempfile::tempdir().unwrap();
        let mods = vec!["public".to_string()];
        assert_eq!(
            load_for_session(dir.path(), SessionKind::MultiplayerHost, "0.27.0", &mods).unwrap(),
            None
        );

        PersistedSettings::new("0.27.0", mods.clone(), payload())
            .save(PersistedSettings::path_for(dir.path(), SessionKind::MultiplayerHost))
            .unwrap();
        let loaded = load_for_session(dir.path(), SessionKind::MultiplayerHost, "0.27.0", &mods);
        assert_eq!(loaded.unwrap(), Some(payload()));

        let other = load_for_session(dir.path(), SessionKind::MultiplayerHost, "0.28.0", &mods);
        assert_eq!(other.unwrap(), None);
        let rejoin = load_for_session(dir.path(), SessionKind::Rejoin, "0.27.0", &mods);
        assert_eq!(rejoin.unwrap(), None);
    }

    #[test]
    fn test_unknown_format_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matchsettings.json");
        std::fs::write(
            &path,
            r#"{ "version": 99, "engine_version": "x", "mods": [], "attributes": { "settings": {} } }"#,
        )
        .unwrap();
        assert!(matches!(
            PersistedSettings::load(&path),
            Err(SetupError::PersistedMismatch(_))
        ));
    }
}
