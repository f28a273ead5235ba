// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.FanSpeedLevel`
//!
//! Fan speed as a level in `0..=MaxFanSpeedLevel`, `0` meaning stopped,
//! with an optional automatic mode.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_auto_mode_write, check_range, unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{AutoMode, ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.FanSpeedLevel",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("FanSpeedLevel", "y"),
        PropertyDescriptor::read("MaxFanSpeedLevel", "y"),
        PropertyDescriptor::read_write("AutoMode", "y"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached fan speed state.
///
/// # Examples
///
/// ```
/// use cdm_controllee::interface::operation::FanSpeedLevelProperties;
/// use cdm_controllee::types::AutoMode;
///
/// let mut fan = FanSpeedLevelProperties::new(3, AutoMode::Off);
/// fan.set_fan_speed_level(2).unwrap();
/// assert!(fan.set_fan_speed_level(4).is_err());
/// assert_eq!(fan.fan_speed_level(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanSpeedLevelProperties {
    fan_speed_level: u8,
    max_fan_speed_level: u8,
    auto_mode: AutoMode,
}

impl FanSpeedLevelProperties {
    /// Creates a stopped fan.
    #[must_use]
    pub fn new(max_fan_speed_level: u8, auto_mode: AutoMode) -> Self {
        Self {
            fan_speed_level: 0,
            max_fan_speed_level,
            auto_mode,
        }
    }

    /// Returns the fan speed level.
    #[must_use]
    pub fn fan_speed_level(&self) -> u8 {
        self.fan_speed_level
    }

    /// Sets the fan speed level.
    ///
    /// # Errors
    ///
    /// Returns a value error above the maximum.
    pub fn set_fan_speed_level(&mut self, level: u8) -> std::result::Result<(), ValueError> {
        check_range(level, 0, self.max_fan_speed_level)?;
        self.fan_speed_level = level;
        Ok(())
    }

    /// Returns the highest level.
    #[must_use]
    pub fn max_fan_speed_level(&self) -> u8 {
        self.max_fan_speed_level
    }

    /// Sets the highest level.
    ///
    /// # Errors
    ///
    /// Returns a value error if the current level exceeds it.
    pub fn set_max_fan_speed_level(&mut self, max: u8) -> std::result::Result<(), ValueError> {
        check_range(self.fan_speed_level, 0, max)?;
        self.max_fan_speed_level = max;
        Ok(())
    }

    /// Returns the automatic mode.
    #[must_use]
    pub fn auto_mode(&self) -> AutoMode {
        self.auto_mode
    }

    /// Sets the automatic mode.
    pub fn set_auto_mode(&mut self, mode: AutoMode) {
        self.auto_mode = mode;
    }
}

/// Vendor callbacks for the fan speed level interface.
pub trait FanSpeedLevelListener: Send + Sync {
    /// Applies a new fan speed, already checked against the maximum.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_fan_speed_level(&self, _path: &ObjectPath, _level: u8) -> std::result::Result<(), CdmError> {
        Ok(())
    }

    /// Turns automatic speed control on or off.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_auto_mode(&self, _path: &ObjectPath, _mode: AutoMode) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.FanSpeedLevel`.
pub struct FanSpeedLevel {
    properties: FanSpeedLevelProperties,
    listener: Option<Arc<dyn FanSpeedLevelListener>>,
}

impl FanSpeedLevel {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: FanSpeedLevelProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn FanSpeedLevelListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &FanSpeedLevelProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut FanSpeedLevelProperties {
        &mut self.properties
    }
}

impl fmt::Debug for FanSpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanSpeedLevel")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for FanSpeedLevel {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::FanSpeedLevel
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "FanSpeedLevel" => Some(self.properties.fan_speed_level.to_value()),
            "MaxFanSpeedLevel" => Some(self.properties.max_fan_speed_level.to_value()),
            "AutoMode" => Some(self.properties.auto_mode.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        match name {
            "FanSpeedLevel" => {
                let level = u8::from_value(value)?;
                check_range(level, 0, self.properties.max_fan_speed_level)?;
                if let Some(listener) = &self.listener {
                    listener.on_set_fan_speed_level(path, level)?;
                }
                self.properties.fan_speed_level = level;
            }
            "AutoMode" => {
                let mode = AutoMode::from_value(value)?;
                check_auto_mode_write(self.properties.auto_mode, mode)?;
                if let Some(listener) = &self.listener {
                    listener.on_set_auto_mode(path, mode)?;
                }
                self.properties.auto_mode = mode;
            }
            _ => return Err(unknown_property(self.interface_type(), name)),
        }
        Ok(())
    }
}

impl Interface for FanSpeedLevel {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::FanSpeedLevel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn path() -> ObjectPath {
        ObjectPath::new("/Cdm/Fan").unwrap()
    }

    #[test]
    fn remote_level_bounded_by_max() {
        let mut handler = FanSpeedLevel::new(FanSpeedLevelProperties::new(3, AutoMode::Off));
        handler
            .set_property(&path(), "FanSpeedLevel", &Value::Byte(3))
            .unwrap();
        let err = handler
            .set_property(&path(), "FanSpeedLevel", &Value::Byte(4))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::OutOfRange { .. })));
        assert_eq!(handler.properties().fan_speed_level(), 3);
    }

    #[test]
    fn auto_mode_not_supported_is_refused() {
        let mut handler =
            FanSpeedLevel::new(FanSpeedLevelProperties::new(3, AutoMode::NotSupported));
        let err = handler
            .set_property(&path(), "AutoMode", &Value::Byte(1))
            .unwrap_err();
        assert!(matches!(err, Error::Cdm(CdmError::FeatureNotAvailable)));
        assert_eq!(handler.properties().auto_mode(), AutoMode::NotSupported);
    }

    #[test]
    fn auto_mode_unknown_code_is_rejected() {
        let mut handler = FanSpeedLevel::new(FanSpeedLevelProperties::new(3, AutoMode::Off));
        let err = handler
            .set_property(&path(), "AutoMode", &Value::Byte(7))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::UnknownCode { .. })));
    }
}
