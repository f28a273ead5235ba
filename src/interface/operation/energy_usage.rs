// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.EnergyUsage`
//!
//! Cumulative energy consumption in kilowatt hours, resettable over the bus.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, MethodDescriptor,
    PropertyDescriptor, check_range_f64,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.EnergyUsage",
    version: 1,
    properties: &[
        PropertyDescriptor::read("CumulativeEnergy", "d"),
        PropertyDescriptor::read("Precision", "d"),
        PropertyDescriptor::read("UpdateMinTime", "q"),
    ],
    methods: &[MethodDescriptor {
        name: "ResetCumulativeEnergy",
        inputs: &[],
        outputs: &[],
    }],
    signals: &[],
};

/// Cached energy meter state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyUsageProperties {
    cumulative_energy: f64,
    precision: f64,
    update_min_time: u16,
}

impl EnergyUsageProperties {
    /// Returns the energy consumed since the last reset, in kWh.
    #[must_use]
    pub fn cumulative_energy(&self) -> f64 {
        self.cumulative_energy
    }

    /// Sets the consumed energy in kWh.
    ///
    /// # Errors
    ///
    /// Returns a value error for negative or non-finite values.
    pub fn set_cumulative_energy(&mut self, kwh: f64) -> std::result::Result<(), ValueError> {
        check_range_f64(kwh, 0.0, f64::MAX)?;
        self.cumulative_energy = kwh;
        Ok(())
    }

    /// Returns the reporting precision in kWh.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Sets the reporting precision in kWh.
    ///
    /// # Errors
    ///
    /// Returns a value error for negative or non-finite values.
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

/// Vendor callbacks for the energy usage interface.
pub trait EnergyUsageListener: Send + Sync {
    /// Reads the live meter value; `Ok(None)` serves the cache.
    ///
    /// # Errors
    ///
    /// Returns a device error if the meter cannot be read.
    fn on_get_cumulative_energy(&self, _path: &ObjectPath) -> std::result::Result<Option<f64>, CdmError> {
        Ok(None)
    }

    /// Resets the hardware meter. The cache is zeroed once this succeeds.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the reset.
    fn on_reset_cumulative_energy(&self, _path: &ObjectPath) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.EnergyUsage`.
pub struct EnergyUsage {
    properties: EnergyUsageProperties,
    listener: Option<Arc<dyn EnergyUsageListener>>,
}

impl EnergyUsage {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: EnergyUsageProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn EnergyUsageListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &EnergyUsageProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut EnergyUsageProperties {
        &mut self.properties
    }
}

impl fmt::Debug for EnergyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnergyUsage")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for EnergyUsage {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::EnergyUsage
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "CumulativeEnergy" => Some(self.properties.cumulative_energy.to_value()),
            "Precision" => Some(self.properties.precision.to_value()),
            "UpdateMinTime" => Some(self.properties.update_min_time.to_value()),
            _ => None,
        }
    }

    fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
        if name == "CumulativeEnergy"
            && let Some(listener) = &self.listener
            && let Some(kwh) = listener.on_get_cumulative_energy(path)?
        {
            self.properties.set_cumulative_energy(kwh)?;
        }
        Ok(())
    }

    fn call_method(&mut self, path: &ObjectPath, member: &str, _args: &[Value]) -> Result<Vec<Value>> {
        if member != "ResetCumulativeEnergy" {
            return Err(crate::Error::UnknownMember {
                interface: DESCRIPTOR.name.to_string(),
                member: member.to_string(),
            });
        }
        if let Some(listener) = &self.listener {
            listener.on_reset_cumulative_energy(path)?;
        }
        self.properties.cumulative_energy = 0.0;
        Ok(Vec::new())
    }
}

impl Interface for EnergyUsage {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::EnergyUsage;
}
