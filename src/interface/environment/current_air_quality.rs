// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.CurrentAirQuality`
//!
//! Reports the concentration of one contaminant, with the measurable range
//! of the sensor.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_range_f64,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Environment.CurrentAirQuality",
    version: 1,
    properties: &[
        PropertyDescriptor::constant("ContaminantType", "y"),
        PropertyDescriptor::read("CurrentValue", "d"),
        PropertyDescriptor::read("MinValue", "d"),
        PropertyDescriptor::read("MaxValue", "d"),
        PropertyDescriptor::read("Precision", "d"),
        PropertyDescriptor::read("UpdateMinTime", "q"),
    ],
    methods: &[],
    signals: &[],
};

code_enum! {
    /// The contaminant an air quality sensor measures.
    ContaminantType: u8 (from_u8, as_u8), "contaminant type" {
        /// Formaldehyde, in µg/m³.
        Ch2o = 0,
        /// Carbon dioxide, in ppm.
        Co2 = 1,
        /// Carbon monoxide, in ppm.
        Co = 2,
        /// Particles up to 2.5 µm, in µg/m³.
        Pm2_5 = 3,
        /// Particles up to 10 µm, in µg/m³.
        Pm10 = 4,
        /// Volatile organic compounds, in µg/m³.
        Voc = 5,
    }
}

impl fmt::Display for ContaminantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ch2o => "CH2O",
            Self::Co2 => "CO2",
            Self::Co => "CO",
            Self::Pm2_5 => "PM2.5",
            Self::Pm10 => "PM10",
            Self::Voc => "VOC",
        };
        f.write_str(name)
    }
}

/// Cached state of an air quality sensor.
///
/// The current value always lies within `[min_value, max_value]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentAirQualityProperties {
    contaminant_type: ContaminantType,
    current_value: f64,
    min_value: f64,
    max_value: f64,
    precision: f64,
    update_min_time: u16,
}

impl CurrentAirQualityProperties {
    /// Creates the properties for a sensor with the given measurable range.
    ///
    /// The current value starts at `min_value`.
    ///
    /// # Errors
    ///
    /// Returns a value error if the range is inverted or not finite.
    pub fn new(
        contaminant_type: ContaminantType,
        min_value: f64,
        max_value: f64,
    ) -> std::result::Result<Self, ValueError> {
        check_range(min_value, max_value)?;
        Ok(Self {
            contaminant_type,
            current_value: min_value,
            min_value,
            max_value,
            precision: 0.0,
            update_min_time: 0,
        })
    }

    /// Returns the measured contaminant.
    #[must_use]
    pub fn contaminant_type(&self) -> ContaminantType {
        self.contaminant_type
    }

    /// Returns the measured concentration.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Sets the measured concentration.
    ///
    /// # Errors
    ///
    /// Returns a value error if the value is outside the measurable range.
    pub fn set_current_value(&mut self, value: f64) -> std::result::Result<(), ValueError> {
        check_range_f64(value, self.min_value, self.max_value)?;
        self.current_value = value;
        Ok(())
    }

    /// Returns the lowest measurable value.
    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Returns the highest measurable value.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Changes the measurable range.
    ///
    /// # Errors
    ///
    /// Returns a value error if the range is inverted or excludes the current
    /// value.
    pub fn set_range(&mut self, min_value: f64, max_value: f64) -> std::result::Result<(), ValueError> {
        check_range(min_value, max_value)?;
        check_range_f64(self.current_value, min_value, max_value)?;
        self.min_value = min_value;
        self.max_value = max_value;
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

fn check_range(min: f64, max: f64) -> std::result::Result<(), ValueError> {
    crate::interface::check_finite(min)?;
    crate::interface::check_finite(max)?;
    if min > max {
        return Err(ValueError::InvertedRange { min, max });
    }
    Ok(())
}

/// Vendor callbacks for the air quality interface.
pub trait CurrentAirQualityListener: Send + Sync {
    /// Reads the live concentration. `Ok(None)` serves the cached value.
    ///
    /// # Errors
    ///
    /// Returns a device error if the sensor cannot be read.
    fn on_get_current_value(&self, _path: &ObjectPath) -> std::result::Result<Option<f64>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Environment.CurrentAirQuality`.
pub struct CurrentAirQuality {
    properties: CurrentAirQualityProperties,
    listener: Option<Arc<dyn CurrentAirQualityListener>>,
}

impl CurrentAirQuality {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: CurrentAirQualityProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn CurrentAirQualityListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &CurrentAirQualityProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut CurrentAirQualityProperties {
        &mut self.properties
    }
}

impl fmt::Debug for CurrentAirQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentAirQuality")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for CurrentAirQuality {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::CurrentAirQuality
    }

    fn property(&self, name: &str) -> Option<Value> {
        let props = &self.properties;
        match name {
            "ContaminantType" => Some(props.contaminant_type.to_value()),
            "CurrentValue" => Some(props.current_value.to_value()),
            "MinValue" => Some(props.min_value.to_value()),
            "MaxValue" => Some(props.max_value.to_value()),
            "Precision" => Some(props.precision.to_value()),
            "UpdateMinTime" => Some(props.update_min_time.to_value()),
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

impl Interface for CurrentAirQuality {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::CurrentAirQuality;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contaminant_codes() {
        for code in 0..=5 {
            assert_eq!(ContaminantType::from_u8(code).unwrap().as_u8(), code);
        }
        assert!(ContaminantType::from_u8(6).is_err());
        assert_eq!(ContaminantType::Pm2_5.to_string(), "PM2.5");
    }

    #[test]
    fn current_value_must_be_in_range() {
        let mut props = CurrentAirQualityProperties::new(ContaminantType::Co2, 400.0, 5000.0).unwrap();
        props.set_current_value(812.0).unwrap();
        assert_eq!(props.current_value(), 812.0);
        assert!(props.set_current_value(5000.5).is_err());
        assert_eq!(props.current_value(), 812.0);
    }

    #[test]
    fn range_change_keeps_current_value_inside() {
        let mut props = CurrentAirQualityProperties::new(ContaminantType::Voc, 0.0, 100.0).unwrap();
        props.set_current_value(50.0).unwrap();
        assert!(props.set_range(60.0, 100.0).is_err());
        assert!(matches!(
            props.set_range(10.0, 5.0),
            Err(ValueError::InvertedRange { .. })
        ));
        props.set_range(0.0, 60.0).unwrap();
        assert_eq!(props.max_value(), 60.0);
    }

    #[test]
    fn contaminant_type_marshals_as_byte() {
        let handler = CurrentAirQuality::new(
            CurrentAirQualityProperties::new(ContaminantType::Pm10, 0.0, 500.0).unwrap(),
        );
        assert_eq!(handler.property("ContaminantType"), Some(Value::Byte(4)));
        assert_eq!(handler.property("MinValue"), Some(Value::Double(0.0)));
    }
}
