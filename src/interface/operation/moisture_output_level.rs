// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.MoistureOutputLevel`
//!
//! Output intensity of a humidifier as a level in
//! `0..=MaxMoistureOutputLevel`.

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
    name: "org.alljoyn.SmartSpaces.Operation.MoistureOutputLevel",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("MoistureOutputLevel", "y"),
        PropertyDescriptor::read("MaxMoistureOutputLevel", "y"),
        PropertyDescriptor::read_write("AutoMode", "y"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached moisture output state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoistureOutputLevelProperties {
    level: u8,
    max_level: u8,
    auto_mode: AutoMode,
}

impl MoistureOutputLevelProperties {
    /// Creates the properties with the output at 0.
    #[must_use]
    pub fn new(max_level: u8, auto_mode: AutoMode) -> Self {
        Self {
            level: 0,
            max_level,
            auto_mode,
        }
    }

    /// Returns the output level.
    #[must_use]
    pub fn moisture_output_level(&self) -> u8 {
        self.level
    }

    /// Sets the output level.
    ///
    /// # Errors
    ///
    /// Returns a value error above the maximum.
    pub fn set_moisture_output_level(&mut self, level: u8) -> std::result::Result<(), ValueError> {
        check_range(level, 0, self.max_level)?;
        self.level = level;
        Ok(())
    }

    /// Returns the highest output level.
    #[must_use]
    pub fn max_moisture_output_level(&self) -> u8 {
        self.max_level
    }

    /// Sets the highest output level.
    ///
    /// # Errors
    ///
    /// Returns a value error if the current level exceeds it.
    pub fn set_max_moisture_output_level(&mut self, max: u8) -> std::result::Result<(), ValueError> {
        check_range(self.level, 0, max)?;
        self.max_level = max;
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

/// Vendor callbacks for the moisture output level interface.
pub trait MoistureOutputLevelListener: Send + Sync {
    /// Applies a new output level.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_moisture_output_level(&self, _path: &ObjectPath, _level: u8) -> std::result::Result<(), CdmError> {
        Ok(())
    }

    /// Turns automatic output control on or off.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_auto_mode(&self, _path: &ObjectPath, _mode: AutoMode) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.MoistureOutputLevel`.
pub struct MoistureOutputLevel {
    properties: MoistureOutputLevelProperties,
    listener: Option<Arc<dyn MoistureOutputLevelListener>>,
}

impl MoistureOutputLevel {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: MoistureOutputLevelProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn MoistureOutputLevelListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &MoistureOutputLevelProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut MoistureOutputLevelProperties {
        &mut self.properties
    }
}

impl fmt::Debug for MoistureOutputLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoistureOutputLevel")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for MoistureOutputLevel {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::MoistureOutputLevel
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "MoistureOutputLevel" => Some(self.properties.level.to_value()),
            "MaxMoistureOutputLevel" => Some(self.properties.max_level.to_value()),
            "AutoMode" => Some(self.properties.auto_mode.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        if name == "AutoMode" {
            let mode = AutoMode::from_value(value)?;
            check_auto_mode_write(self.properties.auto_mode, mode)?;
            if let Some(listener) = &self.listener {
                listener.on_set_auto_mode(path, mode)?;
            }
            self.properties.auto_mode = mode;
            return Ok(());
        }
        if name != "MoistureOutputLevel" {
            return Err(unknown_property(self.interface_type(), name));
        }
        let level = u8::from_value(value)?;
        check_range(level, 0, self.properties.max_level)?;
        if let Some(listener) = &self.listener {
            listener.on_set_moisture_output_level(path, level)?;
        }
        self.properties.level = level;
        Ok(())
    }
}

impl Interface for MoistureOutputLevel {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::MoistureOutputLevel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Nozzle(Mutex<Option<u8>>);

    impl MoistureOutputLevelListener for Nozzle {
        fn on_set_moisture_output_level(&self, _path: &ObjectPath, level: u8) -> std::result::Result<(), CdmError> {
            *self.0.lock().unwrap() = Some(level);
            Ok(())
        }
    }

    #[test]
    fn remote_level_reaches_listener() {
        let nozzle = Arc::new(Nozzle::default());
        let mut handler =
            MoistureOutputLevel::new(MoistureOutputLevelProperties::new(5, AutoMode::Off))
                .with_listener(nozzle.clone());
        handler
            .set_property(
                &ObjectPath::new("/Cdm/Humidifier").unwrap(),
                "MoistureOutputLevel",
                &Value::Byte(4),
            )
            .unwrap();
        assert_eq!(*nozzle.0.lock().unwrap(), Some(4));
        assert_eq!(handler.properties().moisture_output_level(), 4);
    }

    #[test]
    fn lowering_max_below_level_fails() {
        let mut props = MoistureOutputLevelProperties::new(5, AutoMode::Off);
        props.set_moisture_output_level(5).unwrap();
        assert!(props.set_max_moisture_output_level(4).is_err());
    }
}
