// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.WindDirection`
//!
//! Louver position of an air conditioner or fan, on two independent axes.
//! Each axis has a direction in `0..=max` and an [`AutoMode`] for swinging.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_auto_mode_write, check_range, unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{AutoMode, ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Environment.WindDirection",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("HorizontalDirection", "q"),
        PropertyDescriptor::read("HorizontalMax", "q"),
        PropertyDescriptor::read_write("HorizontalAutoMode", "y"),
        PropertyDescriptor::read_write("VerticalDirection", "q"),
        PropertyDescriptor::read("VerticalMax", "q"),
        PropertyDescriptor::read_write("VerticalAutoMode", "y"),
    ],
    methods: &[],
    signals: &[],
};

/// One of the two louver axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Bottom to top.
    Vertical,
}

impl Axis {
    fn from_property(name: &str) -> Option<(Self, bool)> {
        match name {
            "HorizontalDirection" => Some((Self::Horizontal, false)),
            "HorizontalAutoMode" => Some((Self::Horizontal, true)),
            "VerticalDirection" => Some((Self::Vertical, false)),
            "VerticalAutoMode" => Some((Self::Vertical, true)),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Direction state of a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisDirection {
    direction: u16,
    max: u16,
    auto_mode: AutoMode,
}

impl AxisDirection {
    /// Creates an axis pointing at 0 with the given maximum.
    #[must_use]
    pub fn new(max: u16, auto_mode: AutoMode) -> Self {
        Self {
            direction: 0,
            max,
            auto_mode,
        }
    }

    /// Returns the direction.
    #[must_use]
    pub fn direction(&self) -> u16 {
        self.direction
    }

    /// Sets the direction.
    ///
    /// # Errors
    ///
    /// Returns a value error if `direction > max`.
    pub fn set_direction(&mut self, direction: u16) -> std::result::Result<(), ValueError> {
        check_range(direction, 0, self.max)?;
        self.direction = direction;
        Ok(())
    }

    /// Returns the highest direction.
    #[must_use]
    pub fn max(&self) -> u16 {
        self.max
    }

    /// Sets the highest direction.
    ///
    /// # Errors
    ///
    /// Returns a value error if the current direction exceeds it.
    pub fn set_max(&mut self, max: u16) -> std::result::Result<(), ValueError> {
        check_range(self.direction, 0, max)?;
        self.max = max;
        Ok(())
    }

    /// Returns the automatic swing mode.
    #[must_use]
    pub fn auto_mode(&self) -> AutoMode {
        self.auto_mode
    }

    /// Sets the automatic swing mode.
    pub fn set_auto_mode(&mut self, mode: AutoMode) {
        self.auto_mode = mode;
    }
}

/// Cached state of both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindDirectionProperties {
    horizontal: AxisDirection,
    vertical: AxisDirection,
}

impl WindDirectionProperties {
    /// Creates the properties from two axes.
    #[must_use]
    pub fn new(horizontal: AxisDirection, vertical: AxisDirection) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Returns one axis.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisDirection {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    /// Returns one axis for modification.
    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisDirection {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }
}

/// Vendor callbacks for the wind direction interface.
pub trait WindDirectionListener: Send + Sync {
    /// Moves the louver on `axis`, already checked against the maximum.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_direction(&self, _path: &ObjectPath, _axis: Axis, _direction: u16) -> std::result::Result<(), CdmError> {
        Ok(())
    }

    /// Turns automatic swing on or off for `axis`.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_auto_mode(&self, _path: &ObjectPath, _axis: Axis, _mode: AutoMode) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Environment.WindDirection`.
pub struct WindDirection {
    properties: WindDirectionProperties,
    listener: Option<Arc<dyn WindDirectionListener>>,
}

impl WindDirection {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: WindDirectionProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn WindDirectionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &WindDirectionProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut WindDirectionProperties {
        &mut self.properties
    }
}

impl fmt::Debug for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindDirection")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for WindDirection {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::WindDirection
    }

    fn property(&self, name: &str) -> Option<Value> {
        let h = &self.properties.horizontal;
        let v = &self.properties.vertical;
        match name {
            "HorizontalDirection" => Some(h.direction.to_value()),
            "HorizontalMax" => Some(h.max.to_value()),
            "HorizontalAutoMode" => Some(h.auto_mode.to_value()),
            "VerticalDirection" => Some(v.direction.to_value()),
            "VerticalMax" => Some(v.max.to_value()),
            "VerticalAutoMode" => Some(v.auto_mode.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        let Some((axis, is_auto_mode)) = Axis::from_property(name) else {
            return Err(unknown_property(self.interface_type(), name));
        };
        let state = *self.properties.axis(axis);
        if is_auto_mode {
            let mode = AutoMode::from_value(value)?;
            check_auto_mode_write(state.auto_mode, mode)?;
            if let Some(listener) = &self.listener {
                listener.on_set_auto_mode(path, axis, mode)?;
            }
            self.properties.axis_mut(axis).set_auto_mode(mode);
        } else {
            let direction = u16::from_value(value)?;
            check_range(direction, 0, state.max)?;
            if let Some(listener) = &self.listener {
                listener.on_set_direction(path, axis, direction)?;
            }
            self.properties.axis_mut(axis).set_direction(direction)?;
        }
        Ok(())
    }
}

impl Interface for WindDirection {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::WindDirection;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::Error;

    #[derive(Default)]
    struct Louver(Mutex<Vec<(Axis, u16)>>);

    impl WindDirectionListener for Louver {
        fn on_set_direction(&self, _path: &ObjectPath, axis: Axis, direction: u16) -> std::result::Result<(), CdmError> {
            self.0.lock().unwrap().push((axis, direction));
            Ok(())
        }
    }

    fn path() -> ObjectPath {
        ObjectPath::new("/Cdm/AirConditioner").unwrap()
    }

    fn props() -> WindDirectionProperties {
        WindDirectionProperties::new(
            AxisDirection::new(4, AutoMode::Off),
            AxisDirection::new(2, AutoMode::NotSupported),
        )
    }

    #[test]
    fn direction_is_bounded_by_max() {
        let mut axis = AxisDirection::new(3, AutoMode::Off);
        axis.set_direction(3).unwrap();
        assert!(axis.set_direction(4).is_err());
        assert!(axis.set_max(2).is_err());
        assert_eq!(axis.max(), 3);
    }

    #[test]
    fn remote_direction_reaches_listener_with_axis() {
        let louver = Arc::new(Louver::default());
        let mut handler = WindDirection::new(props()).with_listener(louver.clone());
        handler
            .set_property(&path(), "VerticalDirection", &Value::UInt16(2))
            .unwrap();
        assert_eq!(*louver.0.lock().unwrap(), vec![(Axis::Vertical, 2)]);
        assert_eq!(handler.property("VerticalDirection"), Some(Value::UInt16(2)));
        assert_eq!(handler.property("HorizontalDirection"), Some(Value::UInt16(0)));
    }

    #[test]
    fn remote_direction_above_max_fails() {
        let mut handler = WindDirection::new(props());
        let err = handler
            .set_property(&path(), "HorizontalDirection", &Value::UInt16(5))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::OutOfRange { .. })));
    }

    #[test]
    fn auto_mode_writes_follow_support() {
        let mut handler = WindDirection::new(props());
        handler
            .set_property(&path(), "HorizontalAutoMode", &Value::Byte(1))
            .unwrap();
        assert_eq!(
            handler.properties().axis(Axis::Horizontal).auto_mode(),
            AutoMode::On
        );

        let err = handler
            .set_property(&path(), "HorizontalAutoMode", &Value::Byte(0xFF))
            .unwrap_err();
        assert!(matches!(err, Error::Cdm(CdmError::InvalidValue)));

        let err = handler
            .set_property(&path(), "VerticalAutoMode", &Value::Byte(1))
            .unwrap_err();
        assert!(matches!(err, Error::Cdm(CdmError::FeatureNotAvailable)));
    }
}
