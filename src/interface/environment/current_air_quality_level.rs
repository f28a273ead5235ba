// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.CurrentAirQualityLevel`
//!
//! Reports air quality as a discrete level, `0` being the cleanest.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_range,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

use super::ContaminantType;

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Environment.CurrentAirQualityLevel",
    version: 1,
    properties: &[
        PropertyDescriptor::constant("ContaminantType", "y"),
        PropertyDescriptor::read("CurrentLevel", "y"),
        PropertyDescriptor::read("MaxLevel", "y"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached state of an air quality level sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAirQualityLevelProperties {
    contaminant_type: ContaminantType,
    current_level: u8,
    max_level: u8,
}

impl CurrentAirQualityLevelProperties {
    /// Creates the properties with the level at `0`.
    #[must_use]
    pub fn new(contaminant_type: ContaminantType, max_level: u8) -> Self {
        Self {
            contaminant_type,
            current_level: 0,
            max_level,
        }
    }

    /// Returns the measured contaminant.
    #[must_use]
    pub fn contaminant_type(&self) -> ContaminantType {
        self.contaminant_type
    }

    /// Returns the current level.
    #[must_use]
    pub fn current_level(&self) -> u8 {
        self.current_level
    }

    /// Sets the current level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the level exceeds the maximum.
    pub fn set_current_level(&mut self, level: u8) -> std::result::Result<(), ValueError> {
        check_range(level, 0, self.max_level)?;
        self.current_level = level;
        Ok(())
    }

    /// Returns the maximum level.
    #[must_use]
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Sets the maximum level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the current level would exceed it.
    pub fn set_max_level(&mut self, max_level: u8) -> std::result::Result<(), ValueError> {
        check_range(self.current_level, 0, max_level)?;
        self.max_level = max_level;
        Ok(())
    }
}

/// Vendor callbacks for the air quality level interface.
pub trait CurrentAirQualityLevelListener: Send + Sync {
    /// Reads the live level. `Ok(None)` serves the cached value.
    ///
    /// # Errors
    ///
    /// Returns a device error if the sensor cannot be read.
    fn on_get_current_level(&self, _path: &ObjectPath) -> std::result::Result<Option<u8>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Environment.CurrentAirQualityLevel`.
pub struct CurrentAirQualityLevel {
    properties: CurrentAirQualityLevelProperties,
    listener: Option<Arc<dyn CurrentAirQualityLevelListener>>,
}

impl CurrentAirQualityLevel {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: CurrentAirQualityLevelProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn CurrentAirQualityLevelListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &CurrentAirQualityLevelProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut CurrentAirQualityLevelProperties {
        &mut self.properties
    }
}

impl fmt::Debug for CurrentAirQualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentAirQualityLevel")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for CurrentAirQualityLevel {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::CurrentAirQualityLevel
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "ContaminantType" => Some(self.properties.contaminant_type.to_value()),
            "CurrentLevel" => Some(self.properties.current_level.to_value()),
            "MaxLevel" => Some(self.properties.max_level.to_value()),
            _ => None,
        }
    }

    fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
        if name == "CurrentLevel"
            && let Some(listener) = &self.listener
            && let Some(level) = listener.on_get_current_level(path)?
        {
            self.properties.set_current_level(level)?;
        }
        Ok(())
    }
}

impl Interface for CurrentAirQualityLevel {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::CurrentAirQualityLevel;
}
