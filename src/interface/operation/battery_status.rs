// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.BatteryStatus`

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
    name: "org.alljoyn.SmartSpaces.Operation.BatteryStatus",
    version: 1,
    properties: &[
        PropertyDescriptor::read("CurrentValue", "y"),
        PropertyDescriptor::read("IsCharging", "b"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached battery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryStatusProperties {
    current_value: u8,
    is_charging: bool,
}

impl BatteryStatusProperties {
    /// Returns the charge in percent.
    #[must_use]
    pub fn current_value(&self) -> u8 {
        self.current_value
    }

    /// Sets the charge in percent.
    ///
    /// # Errors
    ///
    /// Returns a value error above 100.
    pub fn set_current_value(&mut self, percent: u8) -> std::result::Result<(), ValueError> {
        check_range(percent, 0, 100)?;
        self.current_value = percent;
        Ok(())
    }

    /// Returns whether the battery is charging.
    #[must_use]
    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    /// Sets whether the battery is charging.
    pub fn set_is_charging(&mut self, charging: bool) {
        self.is_charging = charging;
    }
}

/// Vendor callbacks for the battery status interface.
pub trait BatteryStatusListener: Send + Sync {
    /// Reads the live charge level; `Ok(None)` serves the cache.
    ///
    /// # Errors
    ///
    /// Returns a device error if the battery cannot be read.
    fn on_get_current_value(&self, _path: &ObjectPath) -> std::result::Result<Option<u8>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Operation.BatteryStatus`.
pub struct BatteryStatus {
    properties: BatteryStatusProperties,
    listener: Option<Arc<dyn BatteryStatusListener>>,
}

impl BatteryStatus {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: BatteryStatusProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn BatteryStatusListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &BatteryStatusProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut BatteryStatusProperties {
        &mut self.properties
    }
}

impl fmt::Debug for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatteryStatus")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for BatteryStatus {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::BatteryStatus
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "CurrentValue" => Some(self.properties.current_value.to_value()),
            "IsCharging" => Some(self.properties.is_charging.to_value()),
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

impl Interface for BatteryStatus {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::BatteryStatus;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Overcharged;

    impl BatteryStatusListener for Overcharged {
        fn on_get_current_value(&self, _path: &ObjectPath) -> std::result::Result<Option<u8>, CdmError> {
            Ok(Some(120))
        }
    }

    #[test]
    fn charge_is_capped_at_100() {
        let mut props = BatteryStatusProperties::default();
        props.set_current_value(100).unwrap();
        assert!(props.set_current_value(101).is_err());
        assert_eq!(props.current_value(), 100);
    }

    #[test]
    fn invalid_listener_value_is_rejected() {
        let path = ObjectPath::new("/Cdm/Robot").unwrap();
        let mut handler =
            BatteryStatus::new(BatteryStatusProperties::default()).with_listener(Arc::new(Overcharged));
        let err = handler.refresh(&path, "CurrentValue").unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::OutOfRange { .. })));
        assert_eq!(handler.property("CurrentValue"), Some(Value::Byte(0)));
    }
}
