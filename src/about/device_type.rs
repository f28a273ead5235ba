// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device model appliance types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValueError};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{ObjectPath, Signature, Value};

/// The kind of appliance an object represents.
///
/// Announced in the `DeviceTypeDescription` About field as a `u` code.
///
/// # Examples
///
/// ```
/// use cdm_controllee::about::DeviceType;
///
/// assert_eq!(DeviceType::AirConditioner.code(), 4);
/// assert_eq!(DeviceType::from_code(14).unwrap(), DeviceType::DishWasher);
/// assert!(DeviceType::from_code(999).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Anything not listed below.
    Other,
    /// Refrigerator.
    Refrigerator,
    /// Freezer.
    Freezer,
    /// Ice maker.
    IceMaker,
    /// Air conditioner.
    AirConditioner,
    /// Thermostat.
    Thermostat,
    /// Humidifier.
    Humidifier,
    /// Dehumidifier.
    Dehumidifier,
    /// Air purifier.
    AirPurifier,
    /// Electric fan.
    ElectricFan,
    /// Air quality monitor.
    AirQualityMonitor,
    /// Clothes washer.
    ClothesWasher,
    /// Clothes dryer.
    ClothesDryer,
    /// Combined washer and dryer.
    ClothesWasherDryer,
    /// Dish washer.
    DishWasher,
    /// Robot cleaner.
    RobotCleaner,
    /// Oven.
    Oven,
    /// Cooker hood.
    CookerHood,
    /// Cooktop.
    Cooktop,
    /// Food probe.
    FoodProbe,
    /// Television.
    Television,
    /// Set-top box.
    SetTopBox,
}

impl DeviceType {
    const ALL: [Self; 22] = [
        Self::Other,
        Self::Refrigerator,
        Self::Freezer,
        Self::IceMaker,
        Self::AirConditioner,
        Self::Thermostat,
        Self::Humidifier,
        Self::Dehumidifier,
        Self::AirPurifier,
        Self::ElectricFan,
        Self::AirQualityMonitor,
        Self::ClothesWasher,
        Self::ClothesDryer,
        Self::ClothesWasherDryer,
        Self::DishWasher,
        Self::RobotCleaner,
        Self::Oven,
        Self::CookerHood,
        Self::Cooktop,
        Self::FoodProbe,
        Self::Television,
        Self::SetTopBox,
    ];

    /// Returns the numeric code.
    #[must_use]
    pub fn code(self) -> u32 {
        // Variants are declared in code order.
        self as u32
    }

    /// Looks up a device type by code.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownCode` for codes outside the table.
    pub fn from_code(code: u32) -> std::result::Result<Self, ValueError> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(ValueError::UnknownCode {
                kind: "device type",
                code: i64::from(code),
            })
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Marshal for DeviceType {
    fn signature() -> Signature {
        Signature::trusted("u")
    }

    fn to_value(&self) -> Value {
        Value::UInt32(self.code())
    }
}

impl Unmarshal for DeviceType {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::from_code(u32::from_value(value)?)?)
    }
}

/// One `DeviceTypeDescription` entry: which object implements which
/// appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTypeEntry {
    /// The appliance type.
    pub device_type: DeviceType,
    /// The object exposing it.
    pub object_path: ObjectPath,
}

impl DeviceTypeEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(device_type: DeviceType, object_path: ObjectPath) -> Self {
        Self {
            device_type,
            object_path,
        }
    }
}

impl Marshal for DeviceTypeEntry {
    fn signature() -> Signature {
        Signature::trusted("(uo)")
    }

    fn to_value(&self) -> Value {
        Value::Struct(vec![
            self.device_type.to_value(),
            self.object_path.to_value(),
        ])
    }
}

impl Unmarshal for DeviceTypeEntry {
    fn from_value(value: &Value) -> Result<Self> {
        let (device_type, object_path) = <(DeviceType, ObjectPath)>::from_value(value)?;
        Ok(Self::new(device_type, object_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_declaration_order() {
        assert_eq!(DeviceType::Other.code(), 0);
        assert_eq!(DeviceType::Oven.code(), 16);
        assert_eq!(DeviceType::SetTopBox.code(), 21);
        for code in 0..22 {
            assert_eq!(DeviceType::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn entry_marshals_as_struct() {
        let entry = DeviceTypeEntry::new(
            DeviceType::ClothesWasher,
            ObjectPath::new("/Cdm/Washer").unwrap(),
        );
        let value = entry.to_value();
        assert_eq!(value.signature().as_str(), "(uo)");
        assert_eq!(DeviceTypeEntry::from_value(&value).unwrap(), entry);
    }

    #[test]
    fn serde_uses_variant_names() {
        let json = serde_json::to_string(&DeviceType::ElectricFan).unwrap();
        assert_eq!(json, "\"ElectricFan\"");
    }
}
