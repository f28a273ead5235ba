// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.HeatingZone`
//!
//! Heating levels of a cooktop's zones. Zone `i` reports
//! `HeatingLevels[i]` out of `MaxHeatingLevels[i]`.

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
    name: "org.alljoyn.SmartSpaces.Operation.HeatingZone",
    version: 1,
    properties: &[
        PropertyDescriptor::read("NumberOfHeatingZones", "y"),
        PropertyDescriptor::read("MaxHeatingLevels", "ay"),
        PropertyDescriptor::read("HeatingLevels", "ay"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached zone levels.
///
/// # Examples
///
/// ```
/// use cdm_controllee::interface::operation::HeatingZoneProperties;
///
/// let mut zones = HeatingZoneProperties::new(vec![9, 9, 6]).unwrap();
/// zones.set_heating_levels(vec![3, 0, 6]).unwrap();
/// assert_eq!(zones.number_of_heating_zones(), 3);
///
/// // Zone 2 tops out at 6
/// assert!(zones.set_heating_levels(vec![3, 0, 7]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeatingZoneProperties {
    max_heating_levels: Vec<u8>,
    heating_levels: Vec<u8>,
}

impl HeatingZoneProperties {
    /// Creates the zones with every level at 0.
    ///
    /// # Errors
    ///
    /// Returns a value error if there are more than 255 zones.
    pub fn new(max_heating_levels: Vec<u8>) -> std::result::Result<Self, ValueError> {
        zone_count(max_heating_levels.len())?;
        let heating_levels = vec![0; max_heating_levels.len()];
        Ok(Self {
            max_heating_levels,
            heating_levels,
        })
    }

    /// Returns the number of zones.
    #[must_use]
    pub fn number_of_heating_zones(&self) -> u8 {
        // Bounded by `new`
        u8::try_from(self.max_heating_levels.len()).unwrap_or(u8::MAX)
    }

    /// Returns each zone's highest level.
    #[must_use]
    pub fn max_heating_levels(&self) -> &[u8] {
        &self.max_heating_levels
    }

    /// Returns each zone's current level.
    #[must_use]
    pub fn heating_levels(&self) -> &[u8] {
        &self.heating_levels
    }

    /// Replaces every zone's level.
    ///
    /// # Errors
    ///
    /// Returns a value error if the length differs from the zone count or a
    /// level exceeds its zone's maximum.
    pub fn set_heating_levels(&mut self, levels: Vec<u8>) -> std::result::Result<(), ValueError> {
        check_levels(&self.max_heating_levels, &levels)?;
        self.heating_levels = levels;
        Ok(())
    }

    /// Sets one zone's level.
    ///
    /// # Errors
    ///
    /// Returns a value error if the zone does not exist or the level exceeds
    /// its maximum.
    pub fn set_heating_level(&mut self, zone: usize, level: u8) -> std::result::Result<(), ValueError> {
        let Some(&max) = self.max_heating_levels.get(zone) else {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: i64::from(self.number_of_heating_zones()) - 1,
                actual: i64::try_from(zone).unwrap_or(i64::MAX),
            });
        };
        check_range(level, 0, max)?;
        self.heating_levels[zone] = level;
        Ok(())
    }
}

fn zone_count(len: usize) -> std::result::Result<u8, ValueError> {
    u8::try_from(len).map_err(|_| ValueError::LengthMismatch {
        expected: usize::from(u8::MAX),
        actual: len,
    })
}

fn check_levels(max: &[u8], levels: &[u8]) -> std::result::Result<(), ValueError> {
    if max.len() != levels.len() {
        return Err(ValueError::LengthMismatch {
            expected: max.len(),
            actual: levels.len(),
        });
    }
    for (&level, &max) in levels.iter().zip(max) {
        check_range(level, 0, max)?;
    }
    Ok(())
}

/// Vendor callbacks for the heating zone interface.
pub trait HeatingZoneListener: Send + Sync {
    /// Reads the live zone levels; `Ok(None)` serves the cache.
    ///
    /// # Errors
    ///
    /// Returns a device error if the cooktop cannot be read.
    fn on_get_heating_levels(&self, _path: &ObjectPath) -> std::result::Result<Option<Vec<u8>>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Operation.HeatingZone`.
pub struct HeatingZone {
    properties: HeatingZoneProperties,
    listener: Option<Arc<dyn HeatingZoneListener>>,
}

impl HeatingZone {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: HeatingZoneProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn HeatingZoneListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &HeatingZoneProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut HeatingZoneProperties {
        &mut self.properties
    }
}

impl fmt::Debug for HeatingZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeatingZone")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for HeatingZone {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::HeatingZone
    }

    fn property(&self, name: &str) -> Option<Value> {
        let props = &self.properties;
        match name {
            "NumberOfHeatingZones" => Some(props.number_of_heating_zones().to_value()),
            "MaxHeatingLevels" => Some(props.max_heating_levels.to_value()),
            "HeatingLevels" => Some(props.heating_levels.to_value()),
            _ => None,
        }
    }

    fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
        if name == "HeatingLevels"
            && let Some(listener) = &self.listener
            && let Some(levels) = listener.on_get_heating_levels(path)?
        {
            self.properties.set_heating_levels(levels)?;
        }
        Ok(())
    }
}

impl Interface for HeatingZone {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::HeatingZone;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_count_must_match_zones() {
        let mut zones = HeatingZoneProperties::new(vec![9, 9]).unwrap();
        assert_eq!(
            zones.set_heating_levels(vec![1]),
            Err(ValueError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn single_zone_update() {
        let mut zones = HeatingZoneProperties::new(vec![9, 4]).unwrap();
        zones.set_heating_level(1, 4).unwrap();
        assert!(zones.set_heating_level(1, 5).is_err());
        assert!(zones.set_heating_level(2, 1).is_err());
        assert_eq!(zones.heating_levels(), &[0, 4]);
    }

    #[test]
    fn zone_count_is_derived() {
        let handler = HeatingZone::new(HeatingZoneProperties::new(vec![9, 9, 9, 9]).unwrap());
        assert_eq!(handler.property("NumberOfHeatingZones"), Some(Value::Byte(4)));
    }
}
