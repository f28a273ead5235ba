// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.CurrentHumidity`
//!
//! Reports relative humidity in percent.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_range,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

/// Highest relative humidity a sensor can report.
const MAX_HUMIDITY: u8 = 100;

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Environment.CurrentHumidity",
    version: 1,
    properties: &[
        PropertyDescriptor::read("CurrentValue", "y"),
        PropertyDescriptor::read("MaxValue", "y"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached state of a humidity sensor.
///
/// `current_value <= max_value <= 100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentHumidityProperties {
    current_value: u8,
    max_value: u8,
}

impl CurrentHumidityProperties {
    /// Creates the properties.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the invariants do not hold.
    pub fn new(current_value: u8, max_value: u8) -> std::result::Result<Self, ValueError> {
        check_range(max_value, 0, MAX_HUMIDITY)?;
        check_range(current_value, 0, max_value)?;
        Ok(Self {
            current_value,
            max_value,
        })
    }

    /// Returns the relative humidity.
    #[must_use]
    pub fn current_value(&self) -> u8 {
        self.current_value
    }

    /// Sets the relative humidity.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` above the maximum.
    pub fn set_current_value(&mut self, value: u8) -> std::result::Result<(), ValueError> {
        check_range(value, 0, self.max_value)?;
        self.current_value = value;
        Ok(())
    }

    /// Returns the highest value the sensor reports.
    #[must_use]
    pub fn max_value(&self) -> u8 {
        self.max_value
    }
}

impl Default for CurrentHumidityProperties {
    fn default() -> Self {
        Self {
            current_value: 0,
            max_value: MAX_HUMIDITY,
        }
    }
}

/// Vendor callbacks for the humidity interface.
pub trait CurrentHumidityListener: Send + Sync {
    /// Reads the live humidity. `Ok(None)` serves the cached value.
    ///
    /// # Errors
    ///
    /// Returns a device error if the sensor cannot be read.
    fn on_get_current_value(&self, _path: &ObjectPath) -> std::result::Result<Option<u8>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Environment.CurrentHumidity`.
pub struct CurrentHumidity {
    properties: CurrentHumidityProperties,
    listener: Option<Arc<dyn CurrentHumidityListener>>,
}

impl CurrentHumidity {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: CurrentHumidityProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn CurrentHumidityListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &CurrentHumidityProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut CurrentHumidityProperties {
        &mut self.properties
    }
}

impl fmt::Debug for CurrentHumidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentHumidity")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for CurrentHumidity {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::CurrentHumidity
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "CurrentValue" => Some(self.properties.current_value.to_value()),
            "MaxValue" => Some(self.properties.max_value.to_value()),
            _ => None,
        }
    }

    fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
        if name == "CurrentValue"
            && let Some(listener) = &self.listener
            && let Some(value) = listener.on_get_current_value(path)?
        {
            self.properties.set_current_value(value)?;
        }
        Ok(())
    }
}

impl Interface for CurrentHumidity {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::CurrentHumidity;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_value_capped_at_100() {
        assert!(CurrentHumidityProperties::new(40, 101).is_err());
        assert!(CurrentHumidityProperties::new(96, 95).is_err());
        assert!(CurrentHumidityProperties::new(40, 95).is_ok());
    }

    #[test]
    fn getter_returns_last_set_value() {
        let mut props = CurrentHumidityProperties::default();
        props.set_current_value(55).unwrap();
        assert_eq!(props.current_value(), 55);
        assert_eq!(
            CurrentHumidity::new(props).property("CurrentValue"),
            Some(Value::Byte(55))
        );
    }
}
