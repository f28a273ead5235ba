// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.TargetTemperatureLevel`
//!
//! A qualitative temperature setting (for instance "low", "medium", "high")
//! for appliances without a degree scale.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{LevelSelection, ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Environment.TargetTemperatureLevel",
    version: 1,
    properties: &[
        PropertyDescriptor::read("MaxLevel", "y"),
        PropertyDescriptor::read_write("TargetLevel", "y"),
        PropertyDescriptor::read("SelectableTemperatureLevels", "ay"),
    ],
    methods: &[],
    signals: &[],
};

/// Vendor callbacks for the target temperature level interface.
pub trait TargetTemperatureLevelListener: Send + Sync {
    /// Applies a new level, already checked against the maximum and the
    /// selectable list.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_target_level(&self, _path: &ObjectPath, _level: u8) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Environment.TargetTemperatureLevel`.
pub struct TargetTemperatureLevel {
    properties: LevelSelection,
    listener: Option<Arc<dyn TargetTemperatureLevelListener>>,
}

impl TargetTemperatureLevel {
    /// Creates the handler with the given initial levels.
    #[must_use]
    pub fn new(properties: LevelSelection) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn TargetTemperatureLevelListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached levels.
    #[must_use]
    pub fn properties(&self) -> &LevelSelection {
        &self.properties
    }

    /// Returns the cached levels for modification.
    pub fn properties_mut(&mut self) -> &mut LevelSelection {
        &mut self.properties
    }
}

impl fmt::Debug for TargetTemperatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetTemperatureLevel")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for TargetTemperatureLevel {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::TargetTemperatureLevel
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "MaxLevel" => Some(self.properties.max_level().to_value()),
            "TargetLevel" => Some(self.properties.target_level().to_value()),
            "SelectableTemperatureLevels" => {
                Some(self.properties.selectable_levels().to_vec().to_value())
            }
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        if name != "TargetLevel" {
            return Err(unknown_property(self.interface_type(), name));
        }
        let level = u8::from_value(value)?;
        self.properties.check_target(level)?;
        if let Some(listener) = &self.listener {
            listener.on_set_target_level(path, level)?;
        }
        self.properties.set_target_level(level)?;
        Ok(())
    }
}

impl Interface for TargetTemperatureLevel {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::TargetTemperatureLevel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::error::ValueError;

    fn path() -> ObjectPath {
        ObjectPath::new("/Cdm/Oven").unwrap()
    }

    #[test]
    fn remote_set_within_selectable_levels() {
        let mut handler = TargetTemperatureLevel::new(LevelSelection::new(4, 0, vec![0, 2, 4]).unwrap());
        handler
            .set_property(&path(), "TargetLevel", &Value::Byte(2))
            .unwrap();
        assert_eq!(handler.property("TargetLevel"), Some(Value::Byte(2)));
    }

    #[test]
    fn remote_set_outside_selectable_levels_fails() {
        let mut handler = TargetTemperatureLevel::new(LevelSelection::new(4, 0, vec![0, 2, 4]).unwrap());
        let err = handler
            .set_property(&path(), "TargetLevel", &Value::Byte(3))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::NotSupported { .. })));
        assert_eq!(handler.properties().target_level(), 0);
    }

    #[test]
    fn max_level_is_read_only() {
        let mut handler = TargetTemperatureLevel::new(LevelSelection::new(2, 0, Vec::new()).unwrap());
        let err = handler
            .set_property(&path(), "MaxLevel", &Value::Byte(3))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownProperty { .. }));
    }
}
