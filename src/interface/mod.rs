// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device model interfaces.
//!
//! Every interface follows the same pattern:
//!
//! ```text
//! Listener (vendor trait object)
//!        ↕ on_get_* / on_set_* / method callbacks
//! Handler struct (implements InterfaceHandler)
//!        ↕ validated setters
//! Property struct (cached state)
//!        ↕ Marshal / Unmarshal
//! Value (message body)
//! ```
//!
//! The [`Controllee`](crate::Controllee) owns the handlers and routes
//! incoming calls to them by (object path, [`InterfaceType`]).
//!
//! # Interfaces
//!
//! | Group | Interfaces |
//! |-------|------------|
//! | [`environment`] | CurrentAirQuality, CurrentAirQualityLevel, CurrentHumidity, CurrentTemperature, TargetHumidity, TargetTemperature, TargetTemperatureLevel, WindDirection |
//! | [`operation`] | AirRecirculationMode, Alerts, AudioVideoInput, AudioVolume, BatteryStatus, Channel, ClimateControlMode, ClosedStatus, CurrentPower, CycleControl, EnergyUsage, FanSpeedLevel, FilterStatus, HeatingZone, HvacFanMode, LockControl, LockedStatus, MoistureOutputLevel, OffControl, OnControl, OnOffStatus, PlugInUnits, RapidMode, RemoteControllability, RepeatMode, ResourceSaving, SoilLevel, SpinSpeedLevel, Timer, TriggerSensor, WaterLevel |

/// Declares a CDM enumeration carried as an unsigned code on the bus.
///
/// Generates the enum, its `from_*`/`as_*` code conversions and the
/// `Marshal`/`Unmarshal` impls.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident: $repr:ident ($from:ident, $as:ident), $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Decodes the bus representation.
            ///
            /// # Errors
            ///
            /// Returns `ValueError::UnknownCode` for unknown codes.
            pub fn $from(code: $repr) -> std::result::Result<Self, $crate::error::ValueError> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    other => Err($crate::error::ValueError::UnknownCode {
                        kind: $kind,
                        code: i64::from(other),
                    }),
                }
            }

            /// Returns the bus representation.
            #[must_use]
            pub const fn $as(&self) -> $repr {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl $crate::marshal::Marshal for $name {
            fn signature() -> $crate::types::Signature {
                <$repr as $crate::marshal::Marshal>::signature()
            }

            fn to_value(&self) -> $crate::types::Value {
                $crate::marshal::Marshal::to_value(&self.$as())
            }
        }

        impl $crate::marshal::Unmarshal for $name {
            fn from_value(value: &$crate::types::Value) -> $crate::error::Result<Self> {
                let code = <$repr as $crate::marshal::Unmarshal>::from_value(value)?;
                Ok(Self::$from(code)?)
            }
        }
    };
}

mod descriptor;
pub mod environment;
pub mod operation;

use std::any::Any;
use std::fmt;

pub use descriptor::{
    Access, Arg, InterfaceDescriptor, MethodDescriptor, PropertyDescriptor, SignalDescriptor,
    VERSION_PROPERTY,
};

use crate::error::{CdmError, Error, Result, ValueError};
use crate::types::{AutoMode, ObjectPath, Value};

/// The interfaces this binding implements.
///
/// # Examples
///
/// ```
/// use cdm_controllee::interface::InterfaceType;
///
/// let ty = InterfaceType::from_name("org.alljoyn.SmartSpaces.Operation.FanSpeedLevel").unwrap();
/// assert_eq!(ty, InterfaceType::FanSpeedLevel);
/// assert!(ty.descriptor().property("MaxFanSpeedLevel").is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InterfaceType {
    /// `Environment.CurrentAirQuality`
    CurrentAirQuality,
    /// `Environment.CurrentAirQualityLevel`
    CurrentAirQualityLevel,
    /// `Environment.CurrentHumidity`
    CurrentHumidity,
    /// `Environment.CurrentTemperature`
    CurrentTemperature,
    /// `Environment.TargetHumidity`
    TargetHumidity,
    /// `Environment.TargetTemperature`
    TargetTemperature,
    /// `Environment.TargetTemperatureLevel`
    TargetTemperatureLevel,
    /// `Environment.WindDirection`
    WindDirection,
    /// `Operation.AirRecirculationMode`
    AirRecirculationMode,
    /// `Operation.Alerts`
    Alerts,
    /// `Operation.AudioVideoInput`
    AudioVideoInput,
    /// `Operation.AudioVolume`
    AudioVolume,
    /// `Operation.BatteryStatus`
    BatteryStatus,
    /// `Operation.Channel`
    Channel,
    /// `Operation.ClimateControlMode`
    ClimateControlMode,
    /// `Operation.ClosedStatus`
    ClosedStatus,
    /// `Operation.CurrentPower`
    CurrentPower,
    /// `Operation.CycleControl`
    CycleControl,
    /// `Operation.EnergyUsage`
    EnergyUsage,
    /// `Operation.FanSpeedLevel`
    FanSpeedLevel,
    /// `Operation.FilterStatus`
    FilterStatus,
    /// `Operation.HeatingZone`
    HeatingZone,
    /// `Operation.HvacFanMode`
    HvacFanMode,
    /// `Operation.LockControl`
    LockControl,
    /// `Operation.LockedStatus`
    LockedStatus,
    /// `Operation.MoistureOutputLevel`
    MoistureOutputLevel,
    /// `Operation.OffControl`
    OffControl,
    /// `Operation.OnControl`
    OnControl,
    /// `Operation.OnOffStatus`
    OnOffStatus,
    /// `Operation.PlugInUnits`
    PlugInUnits,
    /// `Operation.RapidMode`
    RapidMode,
    /// `Operation.RemoteControllability`
    RemoteControllability,
    /// `Operation.RepeatMode`
    RepeatMode,
    /// `Operation.ResourceSaving`
    ResourceSaving,
    /// `Operation.SoilLevel`
    SoilLevel,
    /// `Operation.SpinSpeedLevel`
    SpinSpeedLevel,
    /// `Operation.Timer`
    Timer,
    /// `Operation.TriggerSensor`
    TriggerSensor,
    /// `Operation.WaterLevel`
    WaterLevel,
}

impl InterfaceType {
    /// Every supported interface.
    pub const ALL: [Self; 39] = [
        Self::CurrentAirQuality,
        Self::CurrentAirQualityLevel,
        Self::CurrentHumidity,
        Self::CurrentTemperature,
        Self::TargetHumidity,
        Self::TargetTemperature,
        Self::TargetTemperatureLevel,
        Self::WindDirection,
        Self::AirRecirculationMode,
        Self::Alerts,
        Self::AudioVideoInput,
        Self::AudioVolume,
        Self::BatteryStatus,
        Self::Channel,
        Self::ClimateControlMode,
        Self::ClosedStatus,
        Self::CurrentPower,
        Self::CycleControl,
        Self::EnergyUsage,
        Self::FanSpeedLevel,
        Self::FilterStatus,
        Self::HeatingZone,
        Self::HvacFanMode,
        Self::LockControl,
        Self::LockedStatus,
        Self::MoistureOutputLevel,
        Self::OffControl,
        Self::OnControl,
        Self::OnOffStatus,
        Self::PlugInUnits,
        Self::RapidMode,
        Self::RemoteControllability,
        Self::RepeatMode,
        Self::ResourceSaving,
        Self::SoilLevel,
        Self::SpinSpeedLevel,
        Self::Timer,
        Self::TriggerSensor,
        Self::WaterLevel,
    ];

    /// Returns the static description of the interface.
    #[must_use]
    pub fn descriptor(self) -> &'static InterfaceDescriptor {
        use environment as env;
        use operation as op;

        match self {
            Self::CurrentAirQuality => &env::current_air_quality::DESCRIPTOR,
            Self::CurrentAirQualityLevel => &env::current_air_quality_level::DESCRIPTOR,
            Self::CurrentHumidity => &env::current_humidity::DESCRIPTOR,
            Self::CurrentTemperature => &env::current_temperature::DESCRIPTOR,
            Self::TargetHumidity => &env::target_humidity::DESCRIPTOR,
            Self::TargetTemperature => &env::target_temperature::DESCRIPTOR,
            Self::TargetTemperatureLevel => &env::target_temperature_level::DESCRIPTOR,
            Self::WindDirection => &env::wind_direction::DESCRIPTOR,
            Self::AirRecirculationMode => &op::switches::AIR_RECIRCULATION_MODE,
            Self::Alerts => &op::alerts::DESCRIPTOR,
            Self::AudioVideoInput => &op::audio_video_input::DESCRIPTOR,
            Self::AudioVolume => &op::audio_volume::DESCRIPTOR,
            Self::BatteryStatus => &op::battery_status::DESCRIPTOR,
            Self::Channel => &op::channel::DESCRIPTOR,
            Self::ClimateControlMode => &op::climate_control_mode::DESCRIPTOR,
            Self::ClosedStatus => &op::flags::CLOSED_STATUS,
            Self::CurrentPower => &op::current_power::DESCRIPTOR,
            Self::CycleControl => &op::cycle_control::DESCRIPTOR,
            Self::EnergyUsage => &op::energy_usage::DESCRIPTOR,
            Self::FanSpeedLevel => &op::fan_speed_level::DESCRIPTOR,
            Self::FilterStatus => &op::filter_status::DESCRIPTOR,
            Self::HeatingZone => &op::heating_zone::DESCRIPTOR,
            Self::HvacFanMode => &op::hvac_fan_mode::DESCRIPTOR,
            Self::LockControl => &op::controls::LOCK_CONTROL,
            Self::LockedStatus => &op::flags::LOCKED_STATUS,
            Self::MoistureOutputLevel => &op::moisture_output_level::DESCRIPTOR,
            Self::OffControl => &op::controls::OFF_CONTROL,
            Self::OnControl => &op::controls::ON_CONTROL,
            Self::OnOffStatus => &op::flags::ON_OFF_STATUS,
            Self::PlugInUnits => &op::plug_in_units::DESCRIPTOR,
            Self::RapidMode => &op::switches::RAPID_MODE,
            Self::RemoteControllability => &op::flags::REMOTE_CONTROLLABILITY,
            Self::RepeatMode => &op::switches::REPEAT_MODE,
            Self::ResourceSaving => &op::switches::RESOURCE_SAVING,
            Self::SoilLevel => &op::soil_level::DESCRIPTOR,
            Self::SpinSpeedLevel => &op::spin_speed_level::DESCRIPTOR,
            Self::Timer => &op::timer::DESCRIPTOR,
            Self::TriggerSensor => &op::flags::TRIGGER_SENSOR,
            Self::WaterLevel => &op::water_level::DESCRIPTOR,
        }
    }

    /// Returns the bus interface name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Looks up an interface by its bus name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A signal queued by a handler, sent once the call completes.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSignal {
    /// Signal name, as listed in the interface descriptor.
    pub member: &'static str,
    /// Signal arguments.
    pub args: Vec<Value>,
}

/// The object-safe part of an interface implementation.
///
/// The controllee checks member names, property access and argument
/// signatures against the [`InterfaceDescriptor`] before calling a handler,
/// so handlers only deal with the content of values.
pub trait InterfaceHandler: Any + Send {
    /// Returns which interface this handler implements.
    fn interface_type(&self) -> InterfaceType;

    /// Returns the cached value of a property, without calling the listener.
    ///
    /// `Version` is answered by the controllee and never reaches handlers.
    fn property(&self, name: &str) -> Option<Value>;

    /// Asks the listener for a fresh value of `name` and caches it.
    ///
    /// # Errors
    ///
    /// Returns the listener's error, or a value error if the listener
    /// reports a value that violates the interface invariants.
    fn refresh(&mut self, _path: &ObjectPath, _name: &str) -> Result<()> {
        Ok(())
    }

    /// Applies a bus-initiated property write.
    ///
    /// # Errors
    ///
    /// Returns a value error for rejected values, or the listener's error.
    fn set_property(&mut self, _path: &ObjectPath, name: &str, _value: &Value) -> Result<()> {
        Err(Error::PropertyReadOnly {
            interface: self.interface_type().name().to_string(),
            property: name.to_string(),
        })
    }

    /// Runs a bus-initiated method call and returns the reply values.
    ///
    /// # Errors
    ///
    /// Returns a value error for rejected arguments, or the listener's error.
    fn call_method(&mut self, _path: &ObjectPath, member: &str, _args: &[Value]) -> Result<Vec<Value>> {
        Err(Error::UnknownMember {
            interface: self.interface_type().name().to_string(),
            member: member.to_string(),
        })
    }

    /// Takes the signals queued since the last call.
    fn drain_signals(&mut self) -> Vec<PendingSignal> {
        Vec::new()
    }
}

/// An interface handler with a statically known type.
///
/// Enables typed access through
/// [`Controllee::read`](crate::Controllee::read) and
/// [`Controllee::update`](crate::Controllee::update).
pub trait Interface: InterfaceHandler + Sized {
    /// The interface this type implements.
    const INTERFACE_TYPE: InterfaceType;
}

/// Rejects NaN and infinite values.
pub(crate) fn check_finite(value: f64) -> std::result::Result<(), ValueError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValueError::NotFinite)
    }
}

/// Checks `min <= value <= max` for a double.
pub(crate) fn check_range_f64(value: f64, min: f64, max: f64) -> std::result::Result<(), ValueError> {
    check_finite(value)?;
    if value < min || value > max {
        return Err(ValueError::OutOfRangeF64 {
            min,
            max,
            actual: value,
        });
    }
    Ok(())
}

/// Checks `min <= value <= max` for an integer.
pub(crate) fn check_range<T>(value: T, min: T, max: T) -> std::result::Result<(), ValueError>
where
    T: Into<i64> + PartialOrd + Copy,
{
    if value < min || value > max {
        return Err(ValueError::OutOfRange {
            min: min.into(),
            max: max.into(),
            actual: value.into(),
        });
    }
    Ok(())
}

/// Checks that `value` is listed in `supported`, unless the list is empty.
pub(crate) fn check_selectable<T>(value: T, supported: &[T]) -> std::result::Result<(), ValueError>
where
    T: Into<i64> + PartialEq + Copy,
{
    if supported.is_empty() || supported.contains(&value) {
        return Ok(());
    }
    Err(ValueError::NotSupported {
        value: value.into(),
        supported: supported.iter().map(|v| (*v).into()).collect(),
    })
}

/// Checks that `value` is listed in `supported`; an empty list supports nothing.
pub(crate) fn check_supported<T>(value: T, supported: &[T]) -> std::result::Result<(), ValueError>
where
    T: Into<i64> + PartialEq + Copy,
{
    if supported.contains(&value) {
        return Ok(());
    }
    Err(ValueError::NotSupported {
        value: value.into(),
        supported: supported.iter().map(|v| (*v).into()).collect(),
    })
}

/// Snaps `value` to the nearest `min + k * step` that does not exceed `max`.
pub(crate) fn snap_to_step_f64(value: f64, min: f64, max: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    let snapped = min + ((value - min) / step).round() * step;
    if snapped > max { snapped - step } else { snapped }
}

/// Integer version of [`snap_to_step_f64`].
pub(crate) fn snap_to_step(value: u8, min: u8, max: u8, step: u8) -> u8 {
    if step <= 1 || value <= min {
        return value;
    }
    let offset = u16::from(value - min);
    let step = u16::from(step);
    let rounded = (offset + step / 2) / step * step;
    let snapped = u16::from(min) + rounded;
    let snapped = if snapped > u16::from(max) {
        snapped - step
    } else {
        snapped
    };
    // Never exceeds max, which is a u8
    u8::try_from(snapped).unwrap_or(max)
}

/// Validates a bus-initiated auto mode write against the current mode.
pub(crate) fn check_auto_mode_write(current: AutoMode, requested: AutoMode) -> Result<()> {
    if !requested.is_supported() {
        return Err(CdmError::InvalidValue.into());
    }
    if !current.is_supported() {
        return Err(CdmError::FeatureNotAvailable.into());
    }
    Ok(())
}

/// Error for a property name the handler does not know.
pub(crate) fn unknown_property(ty: InterfaceType, name: &str) -> Error {
    Error::UnknownProperty {
        interface: ty.name().to_string(),
        property: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::error::ValueError;
    use crate::marshal::{Marshal, Unmarshal};
    use crate::types::Signature;

    #[test]
    fn code_enums_marshal_by_declared_code() {
        use operation::{ClimateOperationalState, Severity, SupplySource};

        assert_eq!(SupplySource::NotSupported.to_value(), Value::Byte(0xFF));
        assert_eq!(
            SupplySource::from_value(&Value::Byte(0xFF)).unwrap(),
            SupplySource::NotSupported
        );
        assert!(matches!(
            SupplySource::from_u8(2),
            Err(ValueError::UnknownCode { kind: "supply source", code: 2 })
        ));

        assert_eq!(ClimateOperationalState::signature().as_str(), "q");
        assert_eq!(
            ClimateOperationalState::PendingCool.to_value(),
            Value::UInt16(4)
        );
        assert!(matches!(
            ClimateOperationalState::from_value(&Value::Byte(4)),
            Err(Error::Marshal(_))
        ));

        assert!(Severity::Warning < Severity::Fault);
        assert_eq!(Severity::from_u8(1).unwrap().as_u8(), 1);
    }

    #[test]
    fn names_round_trip() {
        for ty in InterfaceType::ALL {
            assert_eq!(InterfaceType::from_name(ty.name()), Some(ty));
        }
        assert!(InterfaceType::from_name("org.example.Nope").is_none());
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = InterfaceType::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), InterfaceType::ALL.len());
    }

    #[test]
    fn names_use_device_model_namespace() {
        for ty in InterfaceType::ALL {
            let name = ty.name();
            assert!(
                name.starts_with("org.alljoyn.SmartSpaces.Environment.")
                    || name.starts_with("org.alljoyn.SmartSpaces.Operation."),
                "{name}"
            );
            assert!(ty.descriptor().version >= 1, "{name}");
        }
    }

    #[test]
    fn descriptor_signatures_are_single_types() {
        for ty in InterfaceType::ALL {
            let desc = ty.descriptor();
            let args = desc
                .methods
                .iter()
                .flat_map(|m| m.inputs.iter().chain(m.outputs))
                .chain(desc.signals.iter().flat_map(|s| s.args));
            let signatures = desc
                .properties
                .iter()
                .map(|p| p.signature)
                .chain(args.map(|a| a.signature));
            for sig in signatures {
                let parsed = Signature::new(sig).unwrap();
                assert!(parsed.is_single_type(), "{}: {sig}", desc.name);
            }
        }
    }

    #[test]
    fn range_helpers() {
        assert!(check_range(5u8, 0, 10).is_ok());
        assert_eq!(
            check_range(11u8, 0, 10),
            Err(ValueError::OutOfRange {
                min: 0,
                max: 10,
                actual: 11
            })
        );
        assert!(check_range_f64(f64::NAN, 0.0, 1.0).is_err());
        assert!(check_selectable(3u8, &[]).is_ok());
        assert!(check_selectable(3u8, &[1, 2]).is_err());
        assert!(check_supported(3u16, &[]).is_err());
    }

    #[test]
    fn snapping_to_step() {
        assert_eq!(snap_to_step(37, 30, 70, 5), 35);
        assert_eq!(snap_to_step(38, 30, 70, 5), 40);
        assert_eq!(snap_to_step(70, 30, 70, 5), 70);
        assert_eq!(snap_to_step(69, 30, 68, 4), 66);
        assert_eq!(snap_to_step(50, 30, 70, 0), 50);
        assert!((snap_to_step_f64(21.3, 16.0, 30.0, 0.5) - 21.5).abs() < f64::EPSILON);
        assert!((snap_to_step_f64(29.9, 16.0, 29.8, 1.0) - 29.0).abs() < f64::EPSILON);
    }

    #[test]
    fn auto_mode_write_rules() {
        assert!(check_auto_mode_write(AutoMode::Off, AutoMode::On).is_ok());
        assert!(matches!(
            check_auto_mode_write(AutoMode::Off, AutoMode::NotSupported),
            Err(Error::Cdm(CdmError::InvalidValue))
        ));
        assert!(matches!(
            check_auto_mode_write(AutoMode::NotSupported, AutoMode::On),
            Err(Error::Cdm(CdmError::FeatureNotAvailable))
        ));
    }
}
