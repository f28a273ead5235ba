// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.Timer`
//!
//! Cycle timing in seconds relative to `ReferenceTimer`. Controllers set the
//! start and stop targets through methods; the remaining properties are
//! reported by the device.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Arg, Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, MethodDescriptor,
    PropertyDescriptor, check_range,
};
use crate::marshal::{Marshal, arg};
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.Timer",
    version: 1,
    properties: &[
        PropertyDescriptor::read("ReferenceTimer", "i"),
        PropertyDescriptor::read("TargetTimeToStart", "i"),
        PropertyDescriptor::read("TargetTimeToStop", "i"),
        PropertyDescriptor::read("EstimatedTimeToEnd", "i"),
        PropertyDescriptor::read("RunningTime", "i"),
        PropertyDescriptor::read("TargetDuration", "i"),
    ],
    methods: &[
        MethodDescriptor {
            name: "SetTargetTimeToStart",
            inputs: &[Arg::new("targetTimeToStart", "i")],
            outputs: &[],
        },
        MethodDescriptor {
            name: "SetTargetTimeToStop",
            inputs: &[Arg::new("targetTimeToStop", "i")],
            outputs: &[],
        },
    ],
    signals: &[],
};

/// Cached timer values, in seconds.
///
/// # Examples
///
/// ```
/// use cdm_controllee::interface::operation::TimerProperties;
///
/// let mut timer = TimerProperties::default();
/// timer.set_target_time_to_start(900).unwrap();
/// assert!(timer.set_target_time_to_stop(-1).is_err());
/// assert_eq!(timer.target_time_to_stop(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerProperties {
    reference_timer: i32,
    target_time_to_start: i32,
    target_time_to_stop: i32,
    estimated_time_to_end: i32,
    running_time: i32,
    target_duration: i32,
}

impl TimerProperties {
    /// Returns the current value of the device's reference clock.
    #[must_use]
    pub fn reference_timer(&self) -> i32 {
        self.reference_timer
    }

    /// Sets the reference clock.
    pub fn set_reference_timer(&mut self, seconds: i32) {
        self.reference_timer = seconds;
    }

    /// Returns when the cycle should start.
    #[must_use]
    pub fn target_time_to_start(&self) -> i32 {
        self.target_time_to_start
    }

    /// Sets when the cycle should start.
    ///
    /// # Errors
    ///
    /// Returns a value error for negative values.
    pub fn set_target_time_to_start(&mut self, seconds: i32) -> std::result::Result<(), ValueError> {
        check_target(seconds)?;
        self.target_time_to_start = seconds;
        Ok(())
    }

    /// Returns when the cycle should stop.
    #[must_use]
    pub fn target_time_to_stop(&self) -> i32 {
        self.target_time_to_stop
    }

    /// Sets when the cycle should stop.
    ///
    /// # Errors
    ///
    /// Returns a value error for negative values.
    pub fn set_target_time_to_stop(&mut self, seconds: i32) -> std::result::Result<(), ValueError> {
        check_target(seconds)?;
        self.target_time_to_stop = seconds;
        Ok(())
    }

    /// Returns the estimated time until the cycle ends.
    #[must_use]
    pub fn estimated_time_to_end(&self) -> i32 {
        self.estimated_time_to_end
    }

    /// Sets the estimated time until the cycle ends.
    pub fn set_estimated_time_to_end(&mut self, seconds: i32) {
        self.estimated_time_to_end = seconds;
    }

    /// Returns the time the cycle has been running.
    #[must_use]
    pub fn running_time(&self) -> i32 {
        self.running_time
    }

    /// Sets the time the cycle has been running.
    pub fn set_running_time(&mut self, seconds: i32) {
        self.running_time = seconds;
    }

    /// Returns the planned cycle duration.
    #[must_use]
    pub fn target_duration(&self) -> i32 {
        self.target_duration
    }

    /// Sets the planned cycle duration.
    pub fn set_target_duration(&mut self, seconds: i32) {
        self.target_duration = seconds;
    }
}

fn check_target(seconds: i32) -> std::result::Result<(), ValueError> {
    check_range(seconds, 0, i32::MAX)
}

/// Vendor callbacks for the timer interface.
pub trait TimerListener: Send + Sync {
    /// Schedules the cycle start; `seconds` is non-negative.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the schedule.
    fn on_set_target_time_to_start(&self, _path: &ObjectPath, _seconds: i32) -> std::result::Result<(), CdmError> {
        Ok(())
    }

    /// Schedules the cycle stop; `seconds` is non-negative.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the schedule.
    fn on_set_target_time_to_stop(&self, _path: &ObjectPath, _seconds: i32) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.Timer`.
pub struct Timer {
    properties: TimerProperties,
    listener: Option<Arc<dyn TimerListener>>,
}

impl Timer {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: TimerProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn TimerListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &TimerProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut TimerProperties {
        &mut self.properties
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for Timer {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::Timer
    }

    fn property(&self, name: &str) -> Option<Value> {
        let props = &self.properties;
        let seconds = match name {
            "ReferenceTimer" => props.reference_timer,
            "TargetTimeToStart" => props.target_time_to_start,
            "TargetTimeToStop" => props.target_time_to_stop,
            "EstimatedTimeToEnd" => props.estimated_time_to_end,
            "RunningTime" => props.running_time,
            "TargetDuration" => props.target_duration,
            _ => return None,
        };
        Some(seconds.to_value())
    }

    fn call_method(&mut self, path: &ObjectPath, member: &str, args: &[Value]) -> Result<Vec<Value>> {
        match member {
            "SetTargetTimeToStart" => {
                let seconds: i32 = arg(args, 0)?;
                check_target(seconds)?;
                if let Some(listener) = &self.listener {
                    listener.on_set_target_time_to_start(path, seconds)?;
                }
                self.properties.set_target_time_to_start(seconds)?;
            }
            "SetTargetTimeToStop" => {
                let seconds: i32 = arg(args, 0)?;
                check_target(seconds)?;
                if let Some(listener) = &self.listener {
                    listener.on_set_target_time_to_stop(path, seconds)?;
                }
                self.properties.set_target_time_to_stop(seconds)?;
            }
            _ => {
                return Err(crate::Error::UnknownMember {
                    interface: DESCRIPTOR.name.to_string(),
                    member: member.to_string(),
                });
            }
        }
        Ok(Vec::new())
    }
}

impl Interface for Timer {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::Timer;
}
