// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process bus that broadcasts signals to local subscribers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::broadcast;

use crate::error::BusError;
use crate::message::Signal;

use super::BusAttachment;

/// Default channel capacity for the loopback bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A bus attachment that delivers signals to in-process subscribers.
///
/// Signals are broadcast over a tokio broadcast channel, so every subscriber
/// receives its own copy. A slow subscriber that lets the channel fill up
/// loses the oldest signals (`RecvError::Lagged`).
///
/// Sending with no subscribers succeeds; the signal is counted and dropped.
///
/// # Examples
///
/// ```
/// use cdm_controllee::bus::{BusAttachment, LoopbackBus};
/// use cdm_controllee::message::Signal;
/// use cdm_controllee::types::ObjectPath;
///
/// let bus = LoopbackBus::new(":1.1");
/// let mut rx = bus.subscribe();
///
/// let path = ObjectPath::new("/Cdm/Washer").unwrap();
/// bus.send_signal(Signal::new(path, "x.y", "EndOfCycle", Vec::new())).unwrap();
///
/// let signal = rx.try_recv().unwrap();
/// assert_eq!(signal.member, "EndOfCycle");
/// assert_eq!(bus.sent_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoopbackBus {
    unique_name: String,
    sender: broadcast::Sender<Signal>,
    connected: AtomicBool,
    sent: AtomicU64,
}

impl LoopbackBus {
    /// Creates a connected loopback bus with default capacity.
    #[must_use]
    pub fn new(unique_name: impl Into<String>) -> Self {
        Self::with_capacity(unique_name, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a connected loopback bus with the given channel capacity.
    #[must_use]
    pub fn with_capacity(unique_name: impl Into<String>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            unique_name: unique_name.into(),
            sender,
            connected: AtomicBool::new(true),
            sent: AtomicU64::new(0),
        }
    }

    /// Subscribes to signals sent after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Returns the number of signals accepted so far.
    #[must_use]
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Simulates losing or regaining the bus connection.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

impl BusAttachment for LoopbackBus {
    fn unique_name(&self) -> &str {
        &self.unique_name
    }

    fn send_signal(&self, signal: Signal) -> Result<(), BusError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(BusError::NotConnected);
        }
        tracing::trace!(
            path = %signal.path,
            interface = %signal.interface,
            member = %signal.member,
            "Loopback signal"
        );
        self.sent.fetch_add(1, Ordering::Relaxed);
        // No subscribers is not an error for a broadcast bus
        let _ = self.sender.send(signal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectPath;

    fn signal(member: &str) -> Signal {
        Signal::new(ObjectPath::new("/Cdm/Test").unwrap(), "x.y", member, Vec::new())
    }

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = LoopbackBus::new(":1.1");
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.unique_name(), ":1.1");
    }

    #[test]
    fn send_without_subscribers_succeeds() {
        let bus = LoopbackBus::new(":1.1");
        bus.send_signal(signal("A")).unwrap();
        assert_eq!(bus.sent_count(), 1);
    }

    #[test]
    fn disconnected_bus_rejects_signals() {
        let bus = LoopbackBus::new(":1.1");
        bus.set_connected(false);
        assert!(matches!(
            bus.send_signal(signal("A")),
            Err(BusError::NotConnected)
        ));
        assert_eq!(bus.sent_count(), 0);
    }

    #[tokio::test]
    async fn delivers_to_multiple_subscribers() {
        let bus = LoopbackBus::new(":1.1");
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.send_signal(signal("Changed")).unwrap();

        assert_eq!(rx1.recv().await.unwrap().member, "Changed");
        assert_eq!(rx2.recv().await.unwrap().member, "Changed");
    }

    #[test]
    fn drop_subscriber_decrements_count() {
        let bus = LoopbackBus::new(":1.1");
        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
