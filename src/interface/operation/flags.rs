// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only boolean status interfaces.
//!
//! Each interface carries a single `b` property that only the device can
//! change. The listener may supply a live value on `Get`.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

macro_rules! status_interface {
    (
        $(#[$doc:meta])*
        $handler:ident {
            listener: $listener:ident,
            descriptor: $descriptor:ident,
            bus_name: $bus_name:literal,
            property: $property:literal,
            get: $getter:ident,
            set: $setter:ident,
            on_get: $on_get:ident,
        }
    ) => {
        pub(crate) static $descriptor: InterfaceDescriptor = InterfaceDescriptor {
            name: $bus_name,
            version: 1,
            properties: &[PropertyDescriptor::read($property, "b")],
            methods: &[],
            signals: &[],
        };

        #[doc = concat!("Vendor callbacks for `", $bus_name, "`.")]
        pub trait $listener: Send + Sync {
            #[doc = concat!("Reads the live `", $property, "` value.")]
            ///
            /// Returning `Ok(None)` serves the cached value.
            ///
            /// # Errors
            ///
            /// Returns a device error if the state cannot be read.
            fn $on_get(&self, _path: &ObjectPath) -> std::result::Result<Option<bool>, CdmError> {
                Ok(None)
            }
        }

        $(#[$doc])*
        pub struct $handler {
            value: bool,
            listener: Option<Arc<dyn $listener>>,
        }

        impl $handler {
            /// Creates the handler with the given initial state.
            #[must_use]
            pub fn new(value: bool) -> Self {
                Self {
                    value,
                    listener: None,
                }
            }

            /// Sets the vendor listener.
            #[must_use]
            pub fn with_listener(mut self, listener: Arc<dyn $listener>) -> Self {
                self.listener = Some(listener);
                self
            }

            #[doc = concat!("Returns the cached `", $property, "` value.")]
            #[must_use]
            pub fn $getter(&self) -> bool {
                self.value
            }

            #[doc = concat!("Sets the cached `", $property, "` value.")]
            pub fn $setter(&mut self, value: bool) {
                self.value = value;
            }
        }

        impl fmt::Debug for $handler {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($handler))
                    .field($property, &self.value)
                    .field("has_listener", &self.listener.is_some())
                    .finish()
            }
        }

        impl InterfaceHandler for $handler {
            fn interface_type(&self) -> InterfaceType {
                InterfaceType::$handler
            }

            fn property(&self, name: &str) -> Option<Value> {
                (name == $property).then(|| self.value.to_value())
            }

            fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
                if name == $property
                    && let Some(listener) = &self.listener
                    && let Some(value) = listener.$on_get(path)?
                {
                    self.value = value;
                }
                Ok(())
            }
        }

        impl Interface for $handler {
            const INTERFACE_TYPE: InterfaceType = InterfaceType::$handler;
        }
    };
}

status_interface! {
    /// Handler for `Operation.ClosedStatus`: whether a door or lid is closed.
    ClosedStatus {
        listener: ClosedStatusListener,
        descriptor: CLOSED_STATUS,
        bus_name: "org.alljoyn.SmartSpaces.Operation.ClosedStatus",
        property: "IsClosed",
        get: is_closed,
        set: set_is_closed,
        on_get: on_get_is_closed,
    }
}

status_interface! {
    /// Handler for `Operation.LockedStatus`: whether a door is locked.
    LockedStatus {
        listener: LockedStatusListener,
        descriptor: LOCKED_STATUS,
        bus_name: "org.alljoyn.SmartSpaces.Operation.LockedStatus",
        property: "IsLocked",
        get: is_locked,
        set: set_is_locked,
        on_get: on_get_is_locked,
    }
}

status_interface! {
    /// Handler for `Operation.OnOffStatus`: whether the appliance is on.
    OnOffStatus {
        listener: OnOffStatusListener,
        descriptor: ON_OFF_STATUS,
        bus_name: "org.alljoyn.SmartSpaces.Operation.OnOffStatus",
        property: "IsOn",
        get: is_on,
        set: set_is_on,
        on_get: on_get_is_on,
    }
}

status_interface! {
    /// Handler for `Operation.RemoteControllability`.
    ///
    /// While `IsControllable` is `false` the controllee refuses remote
    /// property writes and method calls on the whole object.
    RemoteControllability {
        listener: RemoteControllabilityListener,
        descriptor: REMOTE_CONTROLLABILITY,
        bus_name: "org.alljoyn.SmartSpaces.Operation.RemoteControllability",
        property: "IsControllable",
        get: is_controllable,
        set: set_is_controllable,
        on_get: on_get_is_controllable,
    }
}

status_interface! {
    /// Handler for `Operation.TriggerSensor`: whether a sensor is triggered.
    TriggerSensor {
        listener: TriggerSensorListener,
        descriptor: TRIGGER_SENSOR,
        bus_name: "org.alljoyn.SmartSpaces.Operation.TriggerSensor",
        property: "CurrentlyTriggered",
        get: currently_triggered,
        set: set_currently_triggered,
        on_get: on_get_currently_triggered,
    }
}
