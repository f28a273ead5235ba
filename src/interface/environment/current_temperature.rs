// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.CurrentTemperature`
//!
//! Reports the measured temperature in degrees Celsius.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    InterfaceDescriptor, Interface, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_finite,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Environment.CurrentTemperature",
    version: 1,
    properties: &[
        PropertyDescriptor::read("CurrentValue", "d"),
        PropertyDescriptor::read("Precision", "d"),
        PropertyDescriptor::read("UpdateMinTime", "q"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached state of a current temperature sensor.
///
/// # Examples
///
/// ```
/// use cdm_controllee::interface::environment::CurrentTemperatureProperties;
///
/// let mut props = CurrentTemperatureProperties::new(21.5).unwrap();
/// props.set_current_value(22.0).unwrap();
/// assert_eq!(props.current_value(), 22.0);
///
/// assert!(props.set_current_value(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentTemperatureProperties {
    current_value: f64,
    precision: f64,
    update_min_time: u16,
}

impl CurrentTemperatureProperties {
    /// Creates the properties with a first reading.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFinite` if the reading is NaN or infinite.
    pub fn new(current_value: f64) -> std::result::Result<Self, ValueError> {
        check_finite(current_value)?;
        Ok(Self {
            current_value,
            ..Self::default()
        })
    }

    /// Returns the temperature in degrees Celsius.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Sets the temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFinite` if the value is NaN or infinite.
    pub fn set_current_value(&mut self, value: f64) -> std::result::Result<(), ValueError> {
        check_finite(value)?;
        self.current_value = value;
        Ok(())
    }

    /// Returns the smallest change the sensor reports.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Sets the smallest change the sensor reports.
    ///
    /// # Errors
    ///
    /// Returns a value error if the precision is negative or not finite.
    pub fn set_precision(&mut self, precision: f64) -> std::result::Result<(), ValueError> {
        crate::interface::check_range_f64(precision, 0.0, f64::MAX)?;
        self.precision = precision;
        Ok(())
    }

    /// Returns the minimum time between updates in milliseconds.
    #[must_use]
    pub fn update_min_time(&self) -> u16 {
        self.update_min_time
    }

    /// Sets the minimum time between updates in milliseconds.
    pub fn set_update_min_time(&mut self, millis: u16) {
        self.update_min_time = millis;
    }
}

impl Default for CurrentTemperatureProperties {
    fn default() -> Self {
        Self {
            current_value: 0.0,
            precision: 0.0,
            update_min_time: 0,
        }
    }
}

/// Vendor callbacks for the current temperature interface.
pub trait CurrentTemperatureListener: Send + Sync {
    /// Reads the live temperature.
    ///
    /// Returning `Ok(None)` serves the cached value.
    ///
    /// # Errors
    ///
    /// Returns a device error if the sensor cannot be read.
    fn on_get_current_value(&self, _path: &ObjectPath) -> std::result::Result<Option<f64>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Environment.CurrentTemperature`.
pub struct CurrentTemperature {
    properties: CurrentTemperatureProperties,
    listener: Option<Arc<dyn CurrentTemperatureListener>>,
}

impl CurrentTemperature {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: CurrentTemperatureProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn CurrentTemperatureListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &CurrentTemperatureProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut CurrentTemperatureProperties {
        &mut self.properties
    }
}

impl fmt::Debug for CurrentTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentTemperature")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for CurrentTemperature {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::CurrentTemperature
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "CurrentValue" => Some(self.properties.current_value.to_value()),
            "Precision" => Some(self.properties.precision.to_value()),
            "UpdateMinTime" => Some(self.properties.update_min_time.to_value()),
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

impl Interface for CurrentTemperature {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::CurrentTemperature;
}
