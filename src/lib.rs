// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `cdm_controllee` - Controllee-side binding for the Common Device Model.
//!
//! This library exposes home-appliance state (temperatures, fan speeds,
//! alerts, wash cycles, ...) over an AllJoyn-style message bus using the
//! standard Common Device Model interfaces.
//!
//! # Supported Features
//!
//! - **39 interfaces**: every `org.alljoyn.SmartSpaces.Environment.*` and
//!   `org.alljoyn.SmartSpaces.Operation.*` interface, each with a validated
//!   property struct and a listener trait
//! - **Dispatch**: property `Get`/`Set`/`GetAll`, interface methods and
//!   introspection, checked against static interface descriptors
//! - **Change notification**: `PropertiesChanged` and interface signals on
//!   every remote or local state change
//! - **About**: metadata, object description and the `Announce` signal
//!
//! # Architecture
//!
//! ```text
//! Bus stack ──MethodCall──► Controllee ──► InterfaceHandler ──► Listener
//!    ▲                          │               (cache)        (vendor code)
//!    └────MethodReply/Signal────┘
//! ```
//!
//! The message bus itself is external and represented by the
//! [`BusAttachment`](bus::BusAttachment) trait. [`LoopbackBus`](bus::LoopbackBus)
//! is an in-process implementation for tests and demos.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use cdm_controllee::Controllee;
//! use cdm_controllee::about::AboutData;
//! use cdm_controllee::bus::LoopbackBus;
//! use cdm_controllee::error::CdmError;
//! use cdm_controllee::interface::operation::{
//!     FanSpeedLevel, FanSpeedLevelListener, FanSpeedLevelProperties,
//! };
//! use cdm_controllee::message::{MethodCall, PROPERTIES_INTERFACE};
//! use cdm_controllee::types::{AutoMode, ObjectPath, Value};
//!
//! struct Motor;
//!
//! impl FanSpeedLevelListener for Motor {
//!     fn on_set_fan_speed_level(&self, _path: &ObjectPath, level: u8) -> Result<(), CdmError> {
//!         println!("Driving motor at level {level}");
//!         Ok(())
//!     }
//! }
//!
//! let bus = Arc::new(LoopbackBus::new(":1.10"));
//! let controllee = Controllee::new(bus.clone(), AboutData::new("en"));
//!
//! let path = ObjectPath::new("/Cdm/Fan").unwrap();
//! let fan = FanSpeedLevel::new(FanSpeedLevelProperties::new(5, AutoMode::Off))
//!     .with_listener(Arc::new(Motor));
//! controllee.add_interface(&path, fan).unwrap();
//!
//! // A controller writes the fan speed
//! let call = MethodCall::new(
//!     path,
//!     PROPERTIES_INTERFACE,
//!     "Set",
//!     vec![
//!         Value::String("org.alljoyn.SmartSpaces.Operation.FanSpeedLevel".into()),
//!         Value::String("FanSpeedLevel".into()),
//!         Value::variant(Value::Byte(3)),
//!     ],
//! );
//! let reply = controllee.handle_method_call(&call);
//! assert!(!reply.is_error());
//! assert_eq!(bus.sent_count(), 1);
//! ```

pub mod about;
pub mod bus;
pub mod config;
mod controllee;
pub mod error;
pub mod interface;
pub mod marshal;
pub mod message;
pub mod types;

pub use about::{AboutData, DeviceType};
pub use bus::{BusAttachment, LoopbackBus};
pub use config::ControlleeConfig;
pub use controllee::Controllee;
pub use error::{BusError, CdmError, ConfigError, Error, MarshalError, Result, ValueError};
pub use interface::{Interface, InterfaceHandler, InterfaceType};
pub use types::{AutoMode, ObjectPath, Signature, Value};
