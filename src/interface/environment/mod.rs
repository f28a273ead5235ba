// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Environment.*` interfaces.
//!
//! Sensors (current temperature, humidity, air quality) are read-only and
//! may consult their listener on every `Get`. Set points (target
//! temperature, humidity, level, wind direction) accept remote writes after
//! validation.

pub(crate) mod current_air_quality;
pub(crate) mod current_air_quality_level;
pub(crate) mod current_humidity;
pub(crate) mod current_temperature;
pub(crate) mod target_humidity;
pub(crate) mod target_temperature;
pub(crate) mod target_temperature_level;
pub(crate) mod wind_direction;

pub use current_air_quality::{
    ContaminantType, CurrentAirQuality, CurrentAirQualityListener, CurrentAirQualityProperties,
};
pub use current_air_quality_level::{
    CurrentAirQualityLevel, CurrentAirQualityLevelListener, CurrentAirQualityLevelProperties,
};
pub use current_humidity::{CurrentHumidity, CurrentHumidityListener, CurrentHumidityProperties};
pub use current_temperature::{
    CurrentTemperature, CurrentTemperatureListener, CurrentTemperatureProperties,
};
pub use target_humidity::{TargetHumidity, TargetHumidityListener, TargetHumidityProperties};
pub use target_temperature::{
    TargetTemperature, TargetTemperatureListener, TargetTemperatureProperties,
};
pub use target_temperature_level::{TargetTemperatureLevel, TargetTemperatureLevelListener};
pub use wind_direction::{
    Axis, AxisDirection, WindDirection, WindDirectionListener, WindDirectionProperties,
};
