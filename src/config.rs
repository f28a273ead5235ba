// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controllee configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::about::AboutData;
use crate::error::ConfigError;

/// Session port used when the configuration does not name one.
pub const DEFAULT_SESSION_PORT: u16 = 900;

/// Configuration for a controllee application.
///
/// # Examples
///
/// ```
/// use cdm_controllee::config::ControlleeConfig;
///
/// let config = ControlleeConfig::from_json_str(r#"{
///     "session_port": 1001,
///     "about": {
///         "default_language": "en",
///         "device_id": "hood-7",
///         "app_name": {"en": "Hood"},
///         "manufacturer": {"en": "Acme"},
///         "model_number": "CH-2",
///         "description": {"en": "Cooker hood"},
///         "software_version": "0.3"
///     }
/// }"#).unwrap();
///
/// assert_eq!(config.session_port, 1001);
/// // AppId was not given, so one was generated
/// assert!(!config.about.app_id.is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlleeConfig {
    /// Port on which controllers join a session.
    #[serde(default = "default_session_port")]
    pub session_port: u16,
    /// Published metadata.
    pub about: AboutData,
}

fn default_session_port() -> u16 {
    DEFAULT_SESSION_PORT
}

impl ControlleeConfig {
    /// Creates a configuration with the default session port.
    #[must_use]
    pub fn new(about: AboutData) -> Self {
        Self {
            session_port: DEFAULT_SESSION_PORT,
            about,
        }
    }

    /// Sets the session port.
    #[must_use]
    pub fn with_session_port(mut self, port: u16) -> Self {
        self.session_port = port;
        self
    }

    /// Replaces the About metadata.
    #[must_use]
    pub fn with_about(mut self, about: AboutData) -> Self {
        self.about = about;
        self
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed JSON and
    /// `ConfigError::Invalid` if mandatory About fields are missing.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`from_json_str`](Self::from_json_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the configuration to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_port == 0 {
            return Err(ConfigError::Invalid("session_port must not be 0".to_string()));
        }
        self.about
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
