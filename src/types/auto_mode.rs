// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Automatic mode flag shared by several level interfaces.

use std::fmt;

use crate::error::{Result, ValueError};
use crate::marshal::{Marshal, Unmarshal};

use super::{Signature, Value};

/// Automatic mode of a level-controlled feature (`y` on the bus).
///
/// Used by fan speed, moisture output and wind direction interfaces. A device
/// that cannot regulate a feature automatically reports
/// [`AutoMode::NotSupported`].
///
/// # Examples
///
/// ```
/// use cdm_controllee::types::AutoMode;
///
/// assert_eq!(AutoMode::from_u8(1).unwrap(), AutoMode::On);
/// assert_eq!(AutoMode::NotSupported.as_u8(), 0xFF);
/// assert!(AutoMode::from_u8(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AutoMode {
    /// Automatic mode is off.
    Off,
    /// Automatic mode is on.
    On,
    /// The feature has no automatic mode.
    #[default]
    NotSupported,
}

impl AutoMode {
    /// Decodes the bus representation.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownCode` for anything but 0, 1 and 0xFF.
    pub fn from_u8(code: u8) -> std::result::Result<Self, ValueError> {
        match code {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            0xFF => Ok(Self::NotSupported),
            other => Err(ValueError::UnknownCode {
                kind: "auto mode",
                code: i64::from(other),
            }),
        }
    }

    /// Returns the bus representation.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
            Self::NotSupported => 0xFF,
        }
    }

    /// Returns `true` unless the mode is [`AutoMode::NotSupported`].
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::NotSupported)
    }
}

impl fmt::Display for AutoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
            Self::NotSupported => write!(f, "not supported"),
        }
    }
}

impl Marshal for AutoMode {
    fn signature() -> Signature {
        u8::signature()
    }

    fn to_value(&self) -> Value {
        Value::Byte(self.as_u8())
    }
}

impl Unmarshal for AutoMode {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::from_u8(u8::from_value(value)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_codes() {
        for mode in [AutoMode::Off, AutoMode::On, AutoMode::NotSupported] {
            assert_eq!(AutoMode::from_u8(mode.as_u8()).unwrap(), mode);
        }
    }

    #[test]
    fn default_is_not_supported() {
        assert_eq!(AutoMode::default(), AutoMode::NotSupported);
        assert!(!AutoMode::default().is_supported());
    }

    #[test]
    fn unmarshal_rejects_unknown_code() {
        assert!(AutoMode::from_value(&Value::Byte(7)).is_err());
    }
}
