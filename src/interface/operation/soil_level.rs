// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.SoilLevel`
//!
//! How soiled the load of a washer or dishwasher is expected to be.

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
    name: "org.alljoyn.SmartSpaces.Operation.SoilLevel",
    version: 1,
    properties: &[
        PropertyDescriptor::read("MaxLevel", "y"),
        PropertyDescriptor::read_write("TargetLevel", "y"),
        PropertyDescriptor::read("SelectableLevels", "ay"),
    ],
    methods: &[],
    signals: &[],
};

/// Vendor callbacks for the soil level interface.
pub trait SoilLevelListener: Send + Sync {
    /// Applies a new soil level.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_target_level(&self, _path: &ObjectPath, _level: u8) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.SoilLevel`.
pub struct SoilLevel {
    properties: LevelSelection,
    listener: Option<Arc<dyn SoilLevelListener>>,
}

impl SoilLevel {
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
    pub fn with_listener(mut self, listener: Arc<dyn SoilLevelListener>) -> Self {
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

impl fmt::Debug for SoilLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoilLevel")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for SoilLevel {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::SoilLevel
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "MaxLevel" => Some(self.properties.max_level().to_value()),
            "TargetLevel" => Some(self.properties.target_level().to_value()),
            "SelectableLevels" => Some(self.properties.selectable_levels().to_vec().to_value()),
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

impl Interface for SoilLevel {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::SoilLevel;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DoorOpen;

    impl SoilLevelListener for DoorOpen {
        fn on_set_target_level(&self, _path: &ObjectPath, _level: u8) -> std::result::Result<(), CdmError> {
            Err(CdmError::NotAcceptableDueToInternalState)
        }
    }

    #[test]
    fn listener_refusal_keeps_level() {
        let mut handler = SoilLevel::new(LevelSelection::new(3, 1, Vec::new()).unwrap())
            .with_listener(Arc::new(DoorOpen));
        let err = handler
            .set_property(
                &ObjectPath::new("/Cdm/Washer").unwrap(),
                "TargetLevel",
                &Value::Byte(2),
            )
            .unwrap_err();
        assert_eq!(err.error_name(), "org.alljoyn.SmartSpaces.Error.NotAcceptableDueToInternalState");
        assert_eq!(handler.properties().target_level(), 1);
    }

    #[test]
    fn selectable_levels_are_exposed() {
        let handler = SoilLevel::new(LevelSelection::new(4, 0, vec![0, 2, 4]).unwrap());
        assert_eq!(
            handler.property("SelectableLevels"),
            Some(vec![0u8, 2, 4].to_value())
        );
    }
}
