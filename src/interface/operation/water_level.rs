// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.WaterLevel`

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_range,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.WaterLevel",
    version: 1,
    properties: &[
        PropertyDescriptor::read("SupplySource", "y"),
        PropertyDescriptor::read("CurrentLevel", "y"),
        PropertyDescriptor::read("MaxLevel", "y"),
    ],
    methods: &[],
    signals: &[],
};

code_enum! {
    /// Where the appliance draws its water from.
    #[derive(Default)]
    SupplySource: u8 (from_u8, as_u8), "supply source" {
        /// An internal tank.
        Tank = 0,
        /// A water pipe.
        Pipe = 1,
        /// Unknown or not reported.
        #[default]
        NotSupported = 0xFF,
    }
}

/// Cached water level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaterLevelProperties {
    supply_source: SupplySource,
    current_level: u8,
    max_level: u8,
}

impl WaterLevelProperties {
    /// Creates an empty level for the given source.
    #[must_use]
    pub fn new(supply_source: SupplySource, max_level: u8) -> Self {
        Self {
            supply_source,
            current_level: 0,
            max_level,
        }
    }

    /// Returns the supply source.
    #[must_use]
    pub fn supply_source(&self) -> SupplySource {
        self.supply_source
    }

    /// Sets the supply source.
    pub fn set_supply_source(&mut self, source: SupplySource) {
        self.supply_source = source;
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
    /// Returns a value error above the maximum.
    pub fn set_current_level(&mut self, level: u8) -> std::result::Result<(), ValueError> {
        check_range(level, 0, self.max_level)?;
        self.current_level = level;
        Ok(())
    }

    /// Returns the highest level.
    #[must_use]
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Sets the highest level.
    ///
    /// # Errors
    ///
    /// Returns a value error if the current level exceeds it.
    pub fn set_max_level(&mut self, max_level: u8) -> std::result::Result<(), ValueError> {
        check_range(self.current_level, 0, max_level)?;
        self.max_level = max_level;
        Ok(())
    }
}

/// Vendor callbacks for the water level interface.
pub trait WaterLevelListener: Send + Sync {
    /// Reads the live level; `Ok(None)` serves the cache.
    ///
    /// # Errors
    ///
    /// Returns a device error if the level cannot be read.
    fn on_get_current_level(&self, _path: &ObjectPath) -> std::result::Result<Option<u8>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Operation.WaterLevel`.
pub struct WaterLevel {
    properties: WaterLevelProperties,
    listener: Option<Arc<dyn WaterLevelListener>>,
}

impl WaterLevel {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: WaterLevelProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn WaterLevelListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &WaterLevelProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut WaterLevelProperties {
        &mut self.properties
    }
}

impl fmt::Debug for WaterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaterLevel")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for WaterLevel {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::WaterLevel
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "SupplySource" => Some(self.properties.supply_source.to_value()),
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

impl Interface for WaterLevel {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::WaterLevel;
}
