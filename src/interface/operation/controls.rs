// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Method-only control interfaces.
//!
//! These interfaces have no properties; each exposes one argument-less
//! method that the listener carries out. Without a listener, or when the
//! listener leaves the callback at its default, the call fails with
//! `FeatureNotAvailable`.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, MethodDescriptor,
};
use crate::types::{ObjectPath, Value};

macro_rules! control_interface {
    (
        $(#[$doc:meta])*
        $handler:ident {
            listener: $listener:ident,
            descriptor: $descriptor:ident,
            bus_name: $bus_name:literal,
            method: $method:literal,
            on_call: $on_call:ident,
        }
    ) => {
        pub(crate) static $descriptor: InterfaceDescriptor = InterfaceDescriptor {
            name: $bus_name,
            version: 1,
            properties: &[],
            methods: &[MethodDescriptor {
                name: $method,
                inputs: &[],
                outputs: &[],
            }],
            signals: &[],
        };

        #[doc = concat!("Vendor callbacks for `", $bus_name, "`.")]
        pub trait $listener: Send + Sync {
            #[doc = concat!("Carries out `", $method, "`.")]
            ///
            /// # Errors
            ///
            /// Returns a device error if the command cannot be executed.
            fn $on_call(&self, _path: &ObjectPath) -> std::result::Result<(), CdmError> {
                Err(CdmError::FeatureNotAvailable)
            }
        }

        $(#[$doc])*
        #[derive(Default)]
        pub struct $handler {
            listener: Option<Arc<dyn $listener>>,
        }

        impl $handler {
            /// Creates the handler without a listener.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Sets the vendor listener.
            #[must_use]
            pub fn with_listener(mut self, listener: Arc<dyn $listener>) -> Self {
                self.listener = Some(listener);
                self
            }
        }

        impl fmt::Debug for $handler {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($handler))
                    .field("has_listener", &self.listener.is_some())
                    .finish()
            }
        }

        impl InterfaceHandler for $handler {
            fn interface_type(&self) -> InterfaceType {
                InterfaceType::$handler
            }

            fn property(&self, _name: &str) -> Option<Value> {
                None
            }

            fn call_method(&mut self, path: &ObjectPath, member: &str, _args: &[Value]) -> Result<Vec<Value>> {
                if member != $method {
                    return Err(crate::Error::UnknownMember {
                        interface: $bus_name.to_string(),
                        member: member.to_string(),
                    });
                }
                let listener = self.listener.as_ref().ok_or(CdmError::FeatureNotAvailable)?;
                listener.$on_call(path)?;
                Ok(Vec::new())
            }
        }

        impl Interface for $handler {
            const INTERFACE_TYPE: InterfaceType = InterfaceType::$handler;
        }
    };
}

control_interface! {
    /// Handler for `Operation.OnControl`.
    OnControl {
        listener: OnControlListener,
        descriptor: ON_CONTROL,
        bus_name: "org.alljoyn.SmartSpaces.Operation.OnControl",
        method: "SwitchOn",
        on_call: on_switch_on,
    }
}

control_interface! {
    /// Handler for `Operation.OffControl`.
    OffControl {
        listener: OffControlListener,
        descriptor: OFF_CONTROL,
        bus_name: "org.alljoyn.SmartSpaces.Operation.OffControl",
        method: "SwitchOff",
        on_call: on_switch_off,
    }
}

control_interface! {
    /// Handler for `Operation.LockControl`.
    LockControl {
        listener: LockControlListener,
        descriptor: LOCK_CONTROL,
        bus_name: "org.alljoyn.SmartSpaces.Operation.LockControl",
        method: "Lock",
        on_call: on_lock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::Error;

    #[derive(Default)]
    struct Relay(AtomicUsize);

    impl OnControlListener for Relay {
        fn on_switch_on(&self, _path: &ObjectPath) -> std::result::Result<(), CdmError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Unwired;

    impl OffControlListener for Unwired {}

    fn path() -> ObjectPath {
        ObjectPath::new("/Cdm/Washer").unwrap()
    }

    #[test]
    fn call_reaches_listener() {
        let relay = Arc::new(Relay::default());
        let mut handler = OnControl::new().with_listener(relay.clone());
        let reply = handler.call_method(&path(), "SwitchOn", &[]).unwrap();
        assert!(reply.is_empty());
        assert_eq!(relay.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_listener_is_feature_not_available() {
        let mut handler = LockControl::new();
        let err = handler.call_method(&path(), "Lock", &[]).unwrap_err();
        assert!(matches!(err, Error::Cdm(CdmError::FeatureNotAvailable)));
    }

    #[test]
    fn default_callback_is_feature_not_available() {
        let mut handler = OffControl::new().with_listener(Arc::new(Unwired));
        let err = handler.call_method(&path(), "SwitchOff", &[]).unwrap_err();
        assert!(matches!(err, Error::Cdm(CdmError::FeatureNotAvailable)));
    }

    #[test]
    fn unknown_member_is_rejected() {
        let mut handler = OnControl::new();
        let err = handler.call_method(&path(), "SwitchOff", &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownMember { .. }));
    }
}
