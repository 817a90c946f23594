// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-accessory configuration.
//!
//! A [`SwitchConfig`] maps one configuration block from the hub's accessory
//! config onto a switch: the display name (which doubles as the persistence
//! key), the two shell commands, and the command timeout.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for a single shell-command switch.
///
/// Deserializes from the hub's JSON config block, which uses camelCase keys:
///
/// ```json
/// { "name": "Lamp", "onCmd": "lamp-ctl on", "offCmd": "lamp-ctl off", "timeout": 10 }
/// ```
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use shellswitch::SwitchConfig;
///
/// let config = SwitchConfig::new("Lamp", "lamp-ctl on", "lamp-ctl off")
///     .with_timeout_secs(10);
///
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchConfig {
    /// Display name of the accessory; also the persistence key.
    pub name: String,
    /// Shell command executed on a transition to on.
    pub on_cmd: String,
    /// Shell command executed on a transition to off.
    pub off_cmd: String,
    /// Command timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout: u64,
}

impl SwitchConfig {
    /// Default command timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration with the default timeout.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        on_cmd: impl Into<String>,
        off_cmd: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            on_cmd: on_cmd.into(),
            off_cmd: off_cmd.into(),
            timeout: Self::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the command timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    /// Returns the command timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Returns the command mapped to the requested state.
    #[must_use]
    pub fn command_for(&self, on: bool) -> &str {
        if on { &self.on_cmd } else { &self.off_cmd }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyName`] if the name is empty and
    /// [`ConfigError::ZeroTimeout`] if the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    SwitchConfig::DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_uses_default_timeout() {
        let config = SwitchConfig::new("Lamp", "on.sh", "off.sh");
        assert_eq!(config.timeout, 30);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn timeout_override() {
        let config = SwitchConfig::new("Lamp", "on.sh", "off.sh").with_timeout_secs(5);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn command_selection() {
        let config = SwitchConfig::new("Lamp", "on.sh", "off.sh");
        assert_eq!(config.command_for(true), "on.sh");
        assert_eq!(config.command_for(false), "off.sh");
    }

    #[test]
    fn deserializes_camel_case_keys() {
        let json = r#"{
            "name": "Fan",
            "onCmd": "fan-ctl start",
            "offCmd": "fan-ctl stop",
            "timeout": 10
        }"#;

        let config: SwitchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "Fan");
        assert_eq!(config.on_cmd, "fan-ctl start");
        assert_eq!(config.off_cmd, "fan-ctl stop");
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn deserializes_with_default_timeout() {
        let json = r#"{ "name": "Fan", "onCmd": "a", "offCmd": "b" }"#;

        let config: SwitchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.timeout, SwitchConfig::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn validation_rejects_empty_name() {
        let config = SwitchConfig::new("", "on.sh", "off.sh");
        assert_eq!(config.validate(), Err(ConfigError::EmptyName));
    }

    #[test]
    fn validation_rejects_zero_timeout() {
        let config = SwitchConfig::new("Lamp", "on.sh", "off.sh").with_timeout_secs(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn validation_accepts_well_formed_config() {
        let config = SwitchConfig::new("Lamp", "on.sh", "off.sh");
        assert!(config.validate().is_ok());
    }
}
