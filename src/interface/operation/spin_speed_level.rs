// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.SpinSpeedLevel`
//!
//! Drum spin speed of a washer or dryer as a discrete level.

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
    name: "org.alljoyn.SmartSpaces.Operation.SpinSpeedLevel",
    version: 1,
    properties: &[
        PropertyDescriptor::read("MaxLevel", "y"),
        PropertyDescriptor::read_write("TargetLevel", "y"),
        PropertyDescriptor::read("SelectableLevels", "ay"),
    ],
    methods: &[],
    signals: &[],
};

/// Vendor callbacks for the spin speed level interface.
pub trait SpinSpeedLevelListener: Send + Sync {
    /// Applies a new spin speed level.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_target_level(&self, _path: &ObjectPath, _level: u8) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.SpinSpeedLevel`.
pub struct SpinSpeedLevel {
    properties: LevelSelection,
    listener: Option<Arc<dyn SpinSpeedLevelListener>>,
}

impl SpinSpeedLevel {
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
    pub fn with_listener(mut self, listener: Arc<dyn SpinSpeedLevelListener>) -> Self {
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

impl fmt::Debug for SpinSpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinSpeedLevel")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for SpinSpeedLevel {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::SpinSpeedLevel
    }

    fn property(&self, name: &str) -> Option<Value> {
        let levels = &self.properties;
        match name {
            "MaxLevel" => Some(levels.max_level().to_value()),
            "TargetLevel" => Some(levels.target_level().to_value()),
            "SelectableLevels" => Some(levels.selectable_levels().to_vec().to_value()),
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

impl Interface for SpinSpeedLevel {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::SpinSpeedLevel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn target_above_max_is_rejected() {
        let mut handler = SpinSpeedLevel::new(LevelSelection::new(5, 0, Vec::new()).unwrap());
        let path = ObjectPath::new("/Cdm/Washer").unwrap();
        handler
            .set_property(&path, "TargetLevel", &Value::Byte(5))
            .unwrap();
        let err = handler
            .set_property(&path, "TargetLevel", &Value::Byte(6))
            .unwrap_err();
        assert!(matches!(err, Error::Value(_)));
        assert_eq!(handler.property("TargetLevel"), Some(Value::Byte(5)));
    }

    struct Drum;

    impl SpinSpeedLevelListener for Drum {
        fn on_set_target_level(&self, _path: &ObjectPath, level: u8) -> std::result::Result<(), CdmError> {
            if level == 4 {
                Err(CdmError::NotAcceptableDueToInternalState)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn selectable_levels_and_listener_gate_target() {
        let mut handler = SpinSpeedLevel::new(LevelSelection::new(4, 0, vec![0, 2, 4]).unwrap())
            .with_listener(Arc::new(Drum));
        let path = ObjectPath::new("/Cdm/Washer").unwrap();

        handler
            .set_property(&path, "TargetLevel", &Value::Byte(2))
            .unwrap();

        let err = handler
            .set_property(&path, "TargetLevel", &Value::Byte(3))
            .unwrap_err();
        assert!(matches!(err, Error::Value(_)));

        let err = handler
            .set_property(&path, "TargetLevel", &Value::Byte(4))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Cdm(CdmError::NotAcceptableDueToInternalState)
        ));

        assert_eq!(handler.properties().target_level(), 2);
        assert_eq!(
            handler.property("SelectableLevels"),
            Some(vec![0u8, 2, 4].to_value())
        );
    }
}
