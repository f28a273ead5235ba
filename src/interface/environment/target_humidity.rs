// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.TargetHumidity`
//!
//! The relative humidity set point of a humidifier or dehumidifier.
//!
//! A device either offers a continuous range (`MinValue`, `MaxValue`,
//! `StepValue`) or a fixed list in `SelectableHumidityLevels`. When the list
//! is non-empty it takes precedence over the range.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_range, check_supported, snap_to_step, unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Environment.TargetHumidity",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("TargetValue", "y"),
        PropertyDescriptor::read("MinValue", "y"),
        PropertyDescriptor::read("MaxValue", "y"),
        PropertyDescriptor::read("StepValue", "y"),
        PropertyDescriptor::read("SelectableHumidityLevels", "ay"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached state of a humidity set point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHumidityProperties {
    target_value: u8,
    min_value: u8,
    max_value: u8,
    step_value: u8,
    selectable_humidity_levels: Vec<u8>,
}

impl TargetHumidityProperties {
    /// Creates a continuous range set point with the target at `min_value`.
    ///
    /// # Errors
    ///
    /// Returns a value error if `min_value > max_value` or `max_value > 100`.
    pub fn with_range(min_value: u8, max_value: u8, step_value: u8) -> std::result::Result<Self, ValueError> {
        check_range(max_value, 0, 100)?;
        if min_value > max_value {
            return Err(ValueError::InvertedRange {
                min: f64::from(min_value),
                max: f64::from(max_value),
            });
        }
        Ok(Self {
            target_value: min_value,
            min_value,
            max_value,
            step_value,
            selectable_humidity_levels: Vec::new(),
        })
    }

    /// Creates a set point restricted to the given levels, targeting the
    /// first one.
    ///
    /// `MinValue` and `MaxValue` are derived from the list.
    ///
    /// # Errors
    ///
    /// Returns a value error if the list is empty or holds a value above 100.
    pub fn with_levels(mut levels: Vec<u8>) -> std::result::Result<Self, ValueError> {
        levels.sort_unstable();
        levels.dedup();
        let (Some(&min_value), Some(&max_value)) = (levels.first(), levels.last()) else {
            return Err(ValueError::Empty("SelectableHumidityLevels"));
        };
        check_range(max_value, 0, 100)?;
        Ok(Self {
            target_value: min_value,
            min_value,
            max_value,
            step_value: 0,
            selectable_humidity_levels: levels,
        })
    }

    /// Returns the humidity set point in percent.
    #[must_use]
    pub fn target_value(&self) -> u8 {
        self.target_value
    }

    /// Returns the value `value` would be stored as.
    ///
    /// # Errors
    ///
    /// Returns a value error if the value is outside the range or not one of
    /// the selectable levels.
    pub fn adjust_target(&self, value: u8) -> std::result::Result<u8, ValueError> {
        if !self.selectable_humidity_levels.is_empty() {
            check_supported(value, &self.selectable_humidity_levels)?;
            return Ok(value);
        }
        check_range(value, self.min_value, self.max_value)?;
        Ok(snap_to_step(value, self.min_value, self.max_value, self.step_value))
    }

    /// Sets the humidity set point.
    ///
    /// # Errors
    ///
    /// See [`adjust_target`](Self::adjust_target).
    pub fn set_target_value(&mut self, value: u8) -> std::result::Result<(), ValueError> {
        self.target_value = self.adjust_target(value)?;
        Ok(())
    }

    /// Returns the lowest set point.
    #[must_use]
    pub fn min_value(&self) -> u8 {
        self.min_value
    }

    /// Returns the highest set point.
    #[must_use]
    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Returns the step between set points.
    #[must_use]
    pub fn step_value(&self) -> u8 {
        self.step_value
    }

    /// Returns the selectable levels, empty for a continuous range.
    #[must_use]
    pub fn selectable_humidity_levels(&self) -> &[u8] {
        &self.selectable_humidity_levels
    }
}

/// Vendor callbacks for the target humidity interface.
pub trait TargetHumidityListener: Send + Sync {
    /// Applies a new set point, already validated.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_target_value(&self, _path: &ObjectPath, _value: u8) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Environment.TargetHumidity`.
pub struct TargetHumidity {
    properties: TargetHumidityProperties,
    listener: Option<Arc<dyn TargetHumidityListener>>,
}

impl TargetHumidity {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: TargetHumidityProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn TargetHumidityListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &TargetHumidityProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut TargetHumidityProperties {
        &mut self.properties
    }
}

impl fmt::Debug for TargetHumidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetHumidity")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for TargetHumidity {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::TargetHumidity
    }

    fn property(&self, name: &str) -> Option<Value> {
        let props = &self.properties;
        match name {
            "TargetValue" => Some(props.target_value.to_value()),
            "MinValue" => Some(props.min_value.to_value()),
            "MaxValue" => Some(props.max_value.to_value()),
            "StepValue" => Some(props.step_value.to_value()),
            "SelectableHumidityLevels" => Some(props.selectable_humidity_levels.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        if name != "TargetValue" {
            return Err(unknown_property(self.interface_type(), name));
        }
        let target = self.properties.adjust_target(u8::from_value(value)?)?;
        if let Some(listener) = &self.listener {
            listener.on_set_target_value(path, target)?;
        }
        self.properties.target_value = target;
        Ok(())
    }
}

impl Interface for TargetHumidity {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::TargetHumidity;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_mode_snaps_to_step() {
        let mut props = TargetHumidityProperties::with_range(30, 70, 5).unwrap();
        props.set_target_value(52).unwrap();
        assert_eq!(props.target_value(), 50);
        assert!(props.set_target_value(75).is_err());
        assert!(props.set_target_value(29).is_err());
    }

    #[test]
    fn level_mode_requires_listed_value() {
        let mut props = TargetHumidityProperties::with_levels(vec![60, 40, 50]).unwrap();
        assert_eq!(props.min_value(), 40);
        assert_eq!(props.max_value(), 60);
        assert_eq!(props.selectable_humidity_levels(), &[40, 50, 60]);
        props.set_target_value(50).unwrap();
        assert!(props.set_target_value(45).is_err());
        assert_eq!(props.target_value(), 50);
    }

    #[test]
    fn empty_level_list_is_rejected() {
        assert!(matches!(
            TargetHumidityProperties::with_levels(Vec::new()),
            Err(ValueError::Empty(_))
        ));
    }

    #[test]
    fn selectable_levels_marshal_as_byte_array() {
        let handler = TargetHumidity::new(TargetHumidityProperties::with_levels(vec![40]).unwrap());
        let value = handler.property("SelectableHumidityLevels").unwrap();
        assert_eq!(value.signature().as_str(), "ay");
    }

    #[test]
    fn remote_set_updates_cache() {
        let path = ObjectPath::new("/Cdm/Humidifier").unwrap();
        let mut handler =
            TargetHumidity::new(TargetHumidityProperties::with_range(20, 80, 1).unwrap());
        handler
            .set_property(&path, "TargetValue", &Value::Byte(45))
            .unwrap();
        assert_eq!(handler.properties().target_value(), 45);
    }
}
