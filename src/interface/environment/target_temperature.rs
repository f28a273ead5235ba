// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.TargetTemperature`
//!
//! The set point of a temperature regulated appliance, in degrees Celsius.
//!
//! Targets outside `[MinValue, MaxValue]` are rejected. Targets inside the
//! range snap to the nearest `MinValue + k * StepValue`.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_finite, check_range_f64, snap_to_step_f64, unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Environment.TargetTemperature",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("TargetValue", "d"),
        PropertyDescriptor::read("MinValue", "d"),
        PropertyDescriptor::read("MaxValue", "d"),
        PropertyDescriptor::read("StepValue", "d"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached state of a temperature set point.
///
/// # Examples
///
/// ```
/// use cdm_controllee::interface::environment::TargetTemperatureProperties;
///
/// let mut props = TargetTemperatureProperties::new(16.0, 30.0, 0.5).unwrap();
/// props.set_target_value(21.3).unwrap();
/// assert_eq!(props.target_value(), 21.5);
///
/// assert!(props.set_target_value(31.0).is_err());
/// assert_eq!(props.target_value(), 21.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TargetTemperatureProperties {
    target_value: f64,
    min_value: f64,
    max_value: f64,
    step_value: f64,
}

impl TargetTemperatureProperties {
    /// Creates the properties with the target at `min_value`.
    ///
    /// # Errors
    ///
    /// Returns a value error if the range is inverted, a bound is not finite,
    /// or the step is negative.
    pub fn new(min_value: f64, max_value: f64, step_value: f64) -> std::result::Result<Self, ValueError> {
        check_bounds(min_value, max_value)?;
        check_range_f64(step_value, 0.0, f64::MAX)?;
        Ok(Self {
            target_value: min_value,
            min_value,
            max_value,
            step_value,
        })
    }

    /// Returns the set point.
    #[must_use]
    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    /// Returns the value `value` would be stored as.
    ///
    /// # Errors
    ///
    /// Returns a value error if the value is outside `[min, max]`.
    pub fn adjust_target(&self, value: f64) -> std::result::Result<f64, ValueError> {
        check_range_f64(value, self.min_value, self.max_value)?;
        Ok(snap_to_step_f64(value, self.min_value, self.max_value, self.step_value))
    }

    /// Sets the set point, snapping it to the step grid.
    ///
    /// # Errors
    ///
    /// Returns a value error if the value is outside `[min, max]`.
    pub fn set_target_value(&mut self, value: f64) -> std::result::Result<(), ValueError> {
        self.target_value = self.adjust_target(value)?;
        Ok(())
    }

    /// Returns the lowest set point.
    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Returns the highest set point.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Changes the allowed range.
    ///
    /// # Errors
    ///
    /// Returns a value error if the range is inverted or excludes the current
    /// target.
    pub fn set_range(&mut self, min_value: f64, max_value: f64) -> std::result::Result<(), ValueError> {
        check_bounds(min_value, max_value)?;
        check_range_f64(self.target_value, min_value, max_value)?;
        self.min_value = min_value;
        self.max_value = max_value;
        Ok(())
    }

    /// Returns the step between set points (`0` for continuous).
    #[must_use]
    pub fn step_value(&self) -> f64 {
        self.step_value
    }

    /// Sets the step between set points.
    ///
    /// # Errors
    ///
    /// Returns a value error if the step is negative or not finite.
    pub fn set_step_value(&mut self, step: f64) -> std::result::Result<(), ValueError> {
        check_range_f64(step, 0.0, f64::MAX)?;
        self.step_value = step;
        Ok(())
    }
}

fn check_bounds(min: f64, max: f64) -> std::result::Result<(), ValueError> {
    check_finite(min)?;
    check_finite(max)?;
    if min > max {
        return Err(ValueError::InvertedRange { min, max });
    }
    Ok(())
}

/// Vendor callbacks for the target temperature interface.
pub trait TargetTemperatureListener: Send + Sync {
    /// Applies a new set point, already validated and snapped.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change; the cache is left as is.
    fn on_set_target_value(&self, _path: &ObjectPath, _value: f64) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Environment.TargetTemperature`.
pub struct TargetTemperature {
    properties: TargetTemperatureProperties,
    listener: Option<Arc<dyn TargetTemperatureListener>>,
}

impl TargetTemperature {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: TargetTemperatureProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn TargetTemperatureListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &TargetTemperatureProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut TargetTemperatureProperties {
        &mut self.properties
    }
}

impl fmt::Debug for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetTemperature")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for TargetTemperature {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::TargetTemperature
    }

    fn property(&self, name: &str) -> Option<Value> {
        let props = &self.properties;
        match name {
            "TargetValue" => Some(props.target_value.to_value()),
            "MinValue" => Some(props.min_value.to_value()),
            "MaxValue" => Some(props.max_value.to_value()),
            "StepValue" => Some(props.step_value.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        if name != "TargetValue" {
            return Err(unknown_property(self.interface_type(), name));
        }
        let target = self.properties.adjust_target(f64::from_value(value)?)?;
        if let Some(listener) = &self.listener {
            listener.on_set_target_value(path, target)?;
        }
        self.properties.target_value = target;
        Ok(())
    }
}

impl Interface for TargetTemperature {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::TargetTemperature;
}
