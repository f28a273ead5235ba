// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.*` interfaces.
//!
//! Boolean status interfaces live in `flags`, writable boolean modes in
//! `switches` and argument-less commands in `controls`; the rest have a
//! module each.

pub(crate) mod alerts;
pub(crate) mod audio_video_input;
pub(crate) mod audio_volume;
pub(crate) mod battery_status;
pub(crate) mod channel;
pub(crate) mod climate_control_mode;
pub(crate) mod controls;
pub(crate) mod current_power;
pub(crate) mod cycle_control;
pub(crate) mod energy_usage;
pub(crate) mod fan_speed_level;
pub(crate) mod filter_status;
pub(crate) mod flags;
pub(crate) mod heating_zone;
pub(crate) mod hvac_fan_mode;
pub(crate) mod moisture_output_level;
pub(crate) mod plug_in_units;
pub(crate) mod soil_level;
pub(crate) mod spin_speed_level;
pub(crate) mod switches;
pub(crate) mod timer;
pub(crate) mod water_level;

pub use alerts::{Alert, Alerts, AlertsListener, AlertsProperties, Severity};
pub use audio_video_input::{
    AudioVideoInput, AudioVideoInputListener, AudioVideoInputProperties, InputSource,
    SignalPresence,
};
pub use audio_volume::{AudioVolume, AudioVolumeListener, AudioVolumeProperties};
pub use battery_status::{BatteryStatus, BatteryStatusListener, BatteryStatusProperties};
pub use channel::{Channel, ChannelInfo, ChannelListener, ChannelProperties};
pub use climate_control_mode::{
    ClimateControlMode, ClimateControlModeListener, ClimateControlModeProperties, ClimateMode,
    ClimateOperationalState,
};
pub use controls::{
    LockControl, LockControlListener, OffControl, OffControlListener, OnControl,
    OnControlListener,
};
pub use current_power::{CurrentPower, CurrentPowerListener, CurrentPowerProperties};
pub use cycle_control::{
    CycleCommand, CycleControl, CycleControlListener, CycleControlProperties, CycleState,
};
pub use energy_usage::{EnergyUsage, EnergyUsageListener, EnergyUsageProperties};
pub use fan_speed_level::{FanSpeedLevel, FanSpeedLevelListener, FanSpeedLevelProperties};
pub use filter_status::{
    FilterStatus, FilterStatusListener, FilterStatusProperties, ORDER_NOT_SUPPORTED,
};
pub use flags::{
    ClosedStatus, ClosedStatusListener, LockedStatus, LockedStatusListener, OnOffStatus,
    OnOffStatusListener, RemoteControllability, RemoteControllabilityListener, TriggerSensor,
    TriggerSensorListener,
};
pub use heating_zone::{HeatingZone, HeatingZoneListener, HeatingZoneProperties};
pub use hvac_fan_mode::{FanMode, HvacFanMode, HvacFanModeListener, HvacFanModeProperties};
pub use moisture_output_level::{
    MoistureOutputLevel, MoistureOutputLevelListener, MoistureOutputLevelProperties,
};
pub use plug_in_units::{PlugInUnit, PlugInUnits, PlugInUnitsListener};
pub use soil_level::{SoilLevel, SoilLevelListener};
pub use spin_speed_level::{SpinSpeedLevel, SpinSpeedLevelListener};
pub use switches::{
    AirRecirculationMode, AirRecirculationModeListener, RapidMode, RapidModeListener, RepeatMode,
    RepeatModeListener, ResourceSaving, ResourceSavingListener,
};
pub use timer::{Timer, TimerListener, TimerProperties};
pub use water_level::{SupplySource, WaterLevel, WaterLevelListener, WaterLevelProperties};
