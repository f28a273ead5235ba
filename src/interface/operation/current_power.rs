// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.CurrentPower`
//!
//! Instantaneous power draw in watts.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_finite, check_range_f64,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.CurrentPower",
    version: 1,
    properties: &[
        PropertyDescriptor::read("CurrentPower", "d"),
        PropertyDescriptor::read("Precision", "d"),
        PropertyDescriptor::read("UpdateMinTime", "q"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached power reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurrentPowerProperties {
    current_power: f64,
    precision: f64,
    update_min_time: u16,
}

impl CurrentPowerProperties {
    /// Returns the power draw in watts.
    #[must_use]
    pub fn current_power(&self) -> f64 {
        self.current_power
    }

    /// Sets the power draw in watts.
    ///
    /// # Errors
    ///
    /// Returns a value error if the value is not finite.
    pub fn set_current_power(&mut self, watts: f64) -> std::result::Result<(), ValueError> {
        check_finite(watts)?;
        self.current_power = watts;
        Ok(())
    }

    /// Returns the reporting precision in watts.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Sets the reporting precision in watts.
    ///
    /// # Errors
    ///
    /// Returns a value error if the precision is negative or not finite.
    pub fn set_precision(&mut self, precision: f64) -> std::result::Result<(), ValueError> {
        check_range_f64(precision, 0.0, f64::MAX)?;
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

/// Vendor callbacks for the current power interface.
pub trait CurrentPowerListener: Send + Sync {
    /// Reads the live power draw; `Ok(None)` serves the cache.
    ///
    /// # Errors
    ///
    /// Returns a device error if the meter cannot be read.
    fn on_get_current_power(&self, _path: &ObjectPath) -> std::result::Result<Option<f64>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Operation.CurrentPower`.
pub struct CurrentPower {
    properties: CurrentPowerProperties,
    listener: Option<Arc<dyn CurrentPowerListener>>,
}

impl CurrentPower {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: CurrentPowerProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn CurrentPowerListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &CurrentPowerProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut CurrentPowerProperties {
        &mut self.properties
    }
}

impl fmt::Debug for CurrentPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentPower")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for CurrentPower {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::CurrentPower
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "CurrentPower" => Some(self.properties.current_power.to_value()),
            "Precision" => Some(self.properties.precision.to_value()),
            "UpdateMinTime" => Some(self.properties.update_min_time.to_value()),
            _ => None,
        }
    }

    fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
        if name == "CurrentPower"
            && let Some(listener) = &self.listener
            && let Some(watts) = listener.on_get_current_power(path)?
        {
            self.properties.set_current_power(watts)?;
        }
        Ok(())
    }
}

impl Interface for CurrentPower {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::CurrentPower;
}
