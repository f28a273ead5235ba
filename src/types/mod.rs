// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the controllee binding.
//!
//! This module provides type-safe representations of the values that travel
//! in bus messages. Each constrained type checks its invariants at
//! construction time.
//!
//! # Types
//!
//! - [`ObjectPath`] - A validated object path (`/Cdm/AirConditioner`)
//! - [`Signature`] - A validated type signature (`a(yqb)`)
//! - [`Value`] - A dynamically typed message value
//! - [`AutoMode`] - Automatic mode flag shared by level interfaces
//! - [`LevelSelection`] - Target level with optional selectable values

mod auto_mode;
mod level;
mod object_path;
mod signature;
mod value;

pub use auto_mode::AutoMode;
pub use level::LevelSelection;
pub use object_path::ObjectPath;
pub use signature::Signature;
pub use value::Value;
