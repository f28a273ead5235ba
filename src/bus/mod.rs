// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bus attachment abstraction.
//!
//! The message bus (transport, sessions, security, wire encoding) lives
//! outside this crate. The controllee only needs to send signals, so the bus
//! is modelled as the [`BusAttachment`] trait. Method calls flow the other
//! way: the bus stack hands them to
//! [`Controllee::handle_method_call`](crate::Controllee::handle_method_call)
//! and sends back the returned reply.
//!
//! [`LoopbackBus`] is an in-process implementation that broadcasts every
//! signal to local subscribers.

mod loopback;

pub use loopback::LoopbackBus;

use crate::error::BusError;
use crate::message::Signal;

/// A connection to the message bus.
pub trait BusAttachment: Send + Sync {
    /// Returns the unique bus name of this attachment (e.g. `:1.42`).
    fn unique_name(&self) -> &str;

    /// Sends a signal.
    ///
    /// # Errors
    ///
    /// Returns `BusError` if the signal could not be handed to the bus.
    fn send_signal(&self, signal: Signal) -> Result<(), BusError>;
}
