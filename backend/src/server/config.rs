//! Service configuration loaded from one JSON file.
//!
//! The file carries everything the service needs: the listening port, the
//! credential salt, the guest list with the menu vocabulary, the RSVP data
//! file location, and optional mail provider settings. The service cannot
//! start without it; a missing or malformed file is fatal by design.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Guest, MenuVocabulary};
use crate::outbound::notify::MailSettings;

fn default_port() -> u16 {
    8080
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_cookie_secure() -> bool {
    true
}

fn default_auth_burst() -> u32 {
    5
}

fn default_auth_replenish_secs() -> u64 {
    5
}

/// Errors that can occur when reading the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration at '{path}': {message}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The configuration JSON is malformed or missing required fields.
    #[error("invalid configuration JSON: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },
}

/// Everything loaded at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Port the HTTP server binds on.
    #[serde(default = "default_port")]
    pub server_port: u16,

    /// Server-held secret mixed into credential derivation. Rotating it
    /// invalidates every outstanding credential at once.
    pub salt: String,

    /// The allowed starter and main choices.
    pub menu_choices: MenuVocabulary,

    /// The guest list.
    pub guests: Vec<Guest>,

    /// Where accepted RSVPs are persisted.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Whether issued cookies carry the `Secure` attribute. Disable only
    /// for plain-HTTP local development.
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,

    /// Immediate authentication attempts allowed per client.
    #[serde(default = "default_auth_burst")]
    pub auth_burst: u32,

    /// Seconds until a spent authentication attempt is replenished.
    #[serde(default = "default_auth_replenish_secs")]
    pub auth_replenish_secs: u64,

    /// Mail provider settings; confirmations are logged and skipped when
    /// absent.
    #[serde(default)]
    pub mail: Option<MailSettings>,
}

impl AppConfig {
    /// Load and parse the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid configuration JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })
    }
}
