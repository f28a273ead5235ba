// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.ClimateControlMode`
//!
//! The operating mode of a thermostat or air conditioner, restricted to the
//! modes the device lists in `SupportedModes`.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_supported, unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.ClimateControlMode",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("Mode", "q"),
        PropertyDescriptor::read("SupportedModes", "aq"),
        PropertyDescriptor::read("OperationalState", "q"),
    ],
    methods: &[],
    signals: &[],
};

code_enum! {
    /// Climate control mode (`q` on the bus).
    #[derive(Default)]
    ClimateMode: u16 (from_u16, as_u16), "climate control mode" {
        /// Off.
        #[default]
        Off = 0,
        /// Heating.
        Heat = 1,
        /// Cooling.
        Cool = 2,
        /// Heat or cool as needed.
        Auto = 3,
        /// Auxiliary or emergency heat.
        AuxiliaryHeat = 4,
        /// Dehumidify.
        Dry = 5,
        /// Dehumidify without stopping.
        ContinuousDry = 6,
    }
}

code_enum! {
    /// What the climate system is doing right now (`q` on the bus).
    #[derive(Default)]
    ClimateOperationalState: u16 (from_u16, as_u16), "climate operational state" {
        /// Not conditioning.
        #[default]
        Idle = 0,
        /// Heating.
        Heating = 1,
        /// Cooling.
        Cooling = 2,
        /// Waiting to heat.
        PendingHeat = 3,
        /// Waiting to cool.
        PendingCool = 4,
        /// Running auxiliary heat.
        AuxiliaryHeat = 5,
    }
}

fn check_mode(mode: ClimateMode, supported: &[ClimateMode]) -> std::result::Result<(), ValueError> {
    let codes: Vec<u16> = supported.iter().map(ClimateMode::as_u16).collect();
    check_supported(mode.as_u16(), &codes)
}

/// Cached climate control state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClimateControlModeProperties {
    mode: ClimateMode,
    supported_modes: Vec<ClimateMode>,
    operational_state: ClimateOperationalState,
}

impl ClimateControlModeProperties {
    /// Creates the properties in `mode`.
    ///
    /// # Errors
    ///
    /// Returns a value error if `mode` is not in `supported_modes`.
    pub fn new(mode: ClimateMode, supported_modes: Vec<ClimateMode>) -> std::result::Result<Self, ValueError> {
        check_mode(mode, &supported_modes)?;
        Ok(Self {
            mode,
            supported_modes,
            operational_state: ClimateOperationalState::Idle,
        })
    }

    /// Returns the selected mode.
    #[must_use]
    pub fn mode(&self) -> ClimateMode {
        self.mode
    }

    /// Selects a mode.
    ///
    /// # Errors
    ///
    /// Returns a value error if the mode is not supported.
    pub fn set_mode(&mut self, mode: ClimateMode) -> std::result::Result<(), ValueError> {
        check_mode(mode, &self.supported_modes)?;
        self.mode = mode;
        Ok(())
    }

    /// Returns the supported modes.
    #[must_use]
    pub fn supported_modes(&self) -> &[ClimateMode] {
        &self.supported_modes
    }

    /// Replaces the supported modes.
    ///
    /// # Errors
    ///
    /// Returns a value error if the selected mode is not in the new list.
    pub fn set_supported_modes(&mut self, modes: Vec<ClimateMode>) -> std::result::Result<(), ValueError> {
        check_mode(self.mode, &modes)?;
        self.supported_modes = modes;
        Ok(())
    }

    /// Returns the operational state.
    #[must_use]
    pub fn operational_state(&self) -> ClimateOperationalState {
        self.operational_state
    }

    /// Sets the operational state.
    pub fn set_operational_state(&mut self, state: ClimateOperationalState) {
        self.operational_state = state;
    }
}

/// Vendor callbacks for the climate control mode interface.
pub trait ClimateControlModeListener: Send + Sync {
    /// Switches to a supported mode.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_mode(&self, _path: &ObjectPath, _mode: ClimateMode) -> std::result::Result<(), CdmError> {
        Ok(())
    }

    /// Reads the live operational state; `Ok(None)` serves the cache.
    ///
    /// # Errors
    ///
    /// Returns a device error if the state cannot be read.
    fn on_get_operational_state(
        &self,
        _path: &ObjectPath,
    ) -> std::result::Result<Option<ClimateOperationalState>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Operation.ClimateControlMode`.
pub struct ClimateControlMode {
    properties: ClimateControlModeProperties,
    listener: Option<Arc<dyn ClimateControlModeListener>>,
}

impl ClimateControlMode {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: ClimateControlModeProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn ClimateControlModeListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &ClimateControlModeProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut ClimateControlModeProperties {
        &mut self.properties
    }
}

impl fmt::Debug for ClimateControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClimateControlMode")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for ClimateControlMode {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::ClimateControlMode
    }

    fn property(&self, name: &str) -> Option<Value> {
        let props = &self.properties;
        match name {
            "Mode" => Some(props.mode.to_value()),
            "SupportedModes" => Some(props.supported_modes.to_value()),
            "OperationalState" => Some(props.operational_state.to_value()),
            _ => None,
        }
    }

    fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
        if name == "OperationalState"
            && let Some(listener) = &self.listener
            && let Some(state) = listener.on_get_operational_state(path)?
        {
            self.properties.operational_state = state;
        }
        Ok(())
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        if name != "Mode" {
            return Err(unknown_property(self.interface_type(), name));
        }
        let mode = ClimateMode::from_value(value)?;
        check_mode(mode, &self.properties.supported_modes)?;
        if let Some(listener) = &self.listener {
            listener.on_set_mode(path, mode)?;
        }
        self.properties.mode = mode;
        Ok(())
    }
}

impl Interface for ClimateControlMode {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::ClimateControlMode;
}
