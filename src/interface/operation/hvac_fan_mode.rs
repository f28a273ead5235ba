// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.HvacFanMode`

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
    name: "org.alljoyn.SmartSpaces.Operation.HvacFanMode",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("Mode", "q"),
        PropertyDescriptor::read("SupportedModes", "aq"),
    ],
    methods: &[],
    signals: &[],
};

code_enum! {
    /// HVAC fan mode (`q` on the bus).
    #[derive(Default)]
    FanMode: u16 (from_u16, as_u16), "fan mode" {
        /// Runs only while heating or cooling.
        #[default]
        Auto = 0,
        /// Runs periodically to circulate air.
        Circulation = 1,
        /// Runs all the time.
        Continuous = 2,
    }
}

/// Cached fan mode state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HvacFanModeProperties {
    mode: FanMode,
    supported_modes: Vec<FanMode>,
}

impl HvacFanModeProperties {
    /// Creates the properties in `mode`.
    ///
    /// # Errors
    ///
    /// Returns a value error if `mode` is not in `supported_modes`.
    pub fn new(mode: FanMode, supported_modes: Vec<FanMode>) -> std::result::Result<Self, ValueError> {
        check_mode(mode, &supported_modes)?;
        Ok(Self {
            mode,
            supported_modes,
        })
    }

    /// Returns the selected mode.
    #[must_use]
    pub fn mode(&self) -> FanMode {
        self.mode
    }

    /// Selects a mode.
    ///
    /// # Errors
    ///
    /// Returns a value error if the mode is not supported.
    pub fn set_mode(&mut self, mode: FanMode) -> std::result::Result<(), ValueError> {
        check_mode(mode, &self.supported_modes)?;
        self.mode = mode;
        Ok(())
    }

    /// Returns the supported modes.
    #[must_use]
    pub fn supported_modes(&self) -> &[FanMode] {
        &self.supported_modes
    }
}

fn check_mode(mode: FanMode, supported: &[FanMode]) -> std::result::Result<(), ValueError> {
    let codes: Vec<u16> = supported.iter().map(FanMode::as_u16).collect();
    check_supported(mode.as_u16(), &codes)
}

/// Vendor callbacks for the HVAC fan mode interface.
pub trait HvacFanModeListener: Send + Sync {
    /// Switches to a supported fan mode.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_mode(&self, _path: &ObjectPath, _mode: FanMode) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.HvacFanMode`.
pub struct HvacFanMode {
    properties: HvacFanModeProperties,
    listener: Option<Arc<dyn HvacFanModeListener>>,
}

impl HvacFanMode {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: HvacFanModeProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn HvacFanModeListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &HvacFanModeProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut HvacFanModeProperties {
        &mut self.properties
    }
}

impl fmt::Debug for HvacFanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HvacFanMode")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for HvacFanMode {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::HvacFanMode
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "Mode" => Some(self.properties.mode.to_value()),
            "SupportedModes" => Some(self.properties.supported_modes.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        if name != "Mode" {
            return Err(unknown_property(self.interface_type(), name));
        }
        let mode = FanMode::from_value(value)?;
        check_mode(mode, &self.properties.supported_modes)?;
        if let Some(listener) = &self.listener {
            listener.on_set_mode(path, mode)?;
        }
        self.properties.mode = mode;
        Ok(())
    }
}

impl Interface for HvacFanMode {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::HvacFanMode;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn only_supported_modes_are_selectable() {
        let path = ObjectPath::new("/Cdm/Thermostat").unwrap();
        let mut handler = HvacFanMode::new(
            HvacFanModeProperties::new(FanMode::Auto, vec![FanMode::Auto, FanMode::Continuous])
                .unwrap(),
        );
        handler
            .set_property(&path, "Mode", &Value::UInt16(2))
            .unwrap();
        assert_eq!(handler.properties().mode(), FanMode::Continuous);

        let err = handler
            .set_property(&path, "Mode", &Value::UInt16(1))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::NotSupported { .. })));

        let err = handler
            .set_property(&path, "Mode", &Value::UInt16(9))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::UnknownCode { .. })));
    }

    struct Blower;

    impl HvacFanModeListener for Blower {
        fn on_set_mode(&self, _path: &ObjectPath, mode: FanMode) -> std::result::Result<(), CdmError> {
            if mode == FanMode::Circulation {
                Err(CdmError::NotAcceptableDueToInternalState)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn listener_refusal_keeps_mode() {
        let path = ObjectPath::new("/Cdm/Thermostat").unwrap();
        let modes = vec![FanMode::Auto, FanMode::Circulation, FanMode::Continuous];
        let mut handler = HvacFanMode::new(HvacFanModeProperties::new(FanMode::Auto, modes).unwrap())
            .with_listener(Arc::new(Blower));

        let err = handler
            .set_property(&path, "Mode", &Value::UInt16(1))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Cdm(CdmError::NotAcceptableDueToInternalState)
        ));
        assert_eq!(handler.property("Mode"), Some(Value::UInt16(0)));
        assert_eq!(
            handler.property("SupportedModes").map(|v| v.signature().to_string()),
            Some("aq".to_string())
        );
    }

    #[test]
    fn local_mode_must_be_supported() {
        let mut props =
            HvacFanModeProperties::new(FanMode::Continuous, vec![FanMode::Continuous]).unwrap();
        assert!(props.set_mode(FanMode::Auto).is_err());
        assert!(HvacFanModeProperties::new(FanMode::Auto, vec![FanMode::Continuous]).is_err());
        assert_eq!(FanMode::from_u16(2).unwrap(), FanMode::Continuous);
        assert_eq!(props.mode().as_u16(), 2);
    }
}
