// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writable boolean mode interfaces.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{ObjectPath, Value};

macro_rules! switch_interface {
    (
        $(#[$doc:meta])*
        $handler:ident {
            listener: $listener:ident,
            descriptor: $descriptor:ident,
            bus_name: $bus_name:literal,
            property: $property:literal,
            get: $getter:ident,
            set: $setter:ident,
            on_set: $on_set:ident,
        }
    ) => {
        pub(crate) static $descriptor: InterfaceDescriptor = InterfaceDescriptor {
            name: $bus_name,
            version: 1,
            properties: &[PropertyDescriptor::read_write($property, "b")],
            methods: &[],
            signals: &[],
        };

        #[doc = concat!("Vendor callbacks for `", $bus_name, "`.")]
        pub trait $listener: Send + Sync {
            #[doc = concat!("Applies a remote write of `", $property, "`.")]
            ///
            /// # Errors
            ///
            /// Returns a device error to refuse the change.
            fn $on_set(&self, _path: &ObjectPath, _value: bool) -> std::result::Result<(), CdmError> {
                Ok(())
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

            fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
                if name != $property {
                    return Err(unknown_property(self.interface_type(), name));
                }
                let value = bool::from_value(value)?;
                if let Some(listener) = &self.listener {
                    listener.$on_set(path, value)?;
                }
                self.value = value;
                Ok(())
            }
        }

        impl Interface for $handler {
            const INTERFACE_TYPE: InterfaceType = InterfaceType::$handler;
        }
    };
}

switch_interface! {
    /// Handler for `Operation.AirRecirculationMode`: recirculate cabin air
    /// instead of drawing outside air.
    AirRecirculationMode {
        listener: AirRecirculationModeListener,
        descriptor: AIR_RECIRCULATION_MODE,
        bus_name: "org.alljoyn.SmartSpaces.Operation.AirRecirculationMode",
        property: "IsRecirculating",
        get: is_recirculating,
        set: set_is_recirculating,
        on_set: on_set_is_recirculating,
    }
}

switch_interface! {
    /// Handler for `Operation.RapidMode`: a boosted, faster cycle.
    RapidMode {
        listener: RapidModeListener,
        descriptor: RAPID_MODE,
        bus_name: "org.alljoyn.SmartSpaces.Operation.RapidMode",
        property: "RapidMode",
        get: rapid_mode,
        set: set_rapid_mode,
        on_set: on_set_rapid_mode,
    }
}

switch_interface! {
    /// Handler for `Operation.RepeatMode`: repeat the current cycle.
    RepeatMode {
        listener: RepeatModeListener,
        descriptor: REPEAT_MODE,
        bus_name: "org.alljoyn.SmartSpaces.Operation.RepeatMode",
        property: "RepeatMode",
        get: repeat_mode,
        set: set_repeat_mode,
        on_set: on_set_repeat_mode,
    }
}

switch_interface! {
    /// Handler for `Operation.ResourceSaving`: an energy or water saving mode.
    ResourceSaving {
        listener: ResourceSavingListener,
        descriptor: RESOURCE_SAVING,
        bus_name: "org.alljoyn.SmartSpaces.Operation.ResourceSaving",
        property: "ResourceSavingMode",
        get: resource_saving_mode,
        set: set_resource_saving_mode,
        on_set: on_set_resource_saving_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::Error;

    #[derive(Default)]
    struct Flap(AtomicBool);

    impl AirRecirculationModeListener for Flap {
        fn on_set_is_recirculating(&self, _path: &ObjectPath, value: bool) -> std::result::Result<(), CdmError> {
            self.0.store(value, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Busy;

    impl RapidModeListener for Busy {
        fn on_set_rapid_mode(&self, _path: &ObjectPath, _value: bool) -> std::result::Result<(), CdmError> {
            Err(CdmError::NotAcceptableDueToInternalState)
        }
    }

    fn path() -> ObjectPath {
        ObjectPath::new("/Cdm/Car").unwrap()
    }

    #[test]
    fn remote_write_reaches_listener_and_cache() {
        let flap = Arc::new(Flap::default());
        let mut handler = AirRecirculationMode::new(false).with_listener(flap.clone());
        handler
            .set_property(&path(), "IsRecirculating", &Value::Boolean(true))
            .unwrap();
        assert!(flap.0.load(Ordering::SeqCst));
        assert!(handler.is_recirculating());
    }

    #[test]
    fn refused_write_keeps_cache() {
        let mut handler = RapidMode::new(false).with_listener(Arc::new(Busy));
        let err = handler
            .set_property(&path(), "RapidMode", &Value::Boolean(true))
            .unwrap_err();
        assert!(matches!(err, Error::Cdm(_)));
        assert!(!handler.rapid_mode());
    }

    #[test]
    fn wrong_signature_is_rejected() {
        let mut handler = RepeatMode::new(false);
        let err = handler
            .set_property(&path(), "RepeatMode", &Value::Byte(1))
            .unwrap_err();
        assert!(matches!(err, Error::Marshal(_)));
    }

    #[test]
    fn local_setter_updates_property() {
        let mut handler = ResourceSaving::new(false);
        handler.set_resource_saving_mode(true);
        assert_eq!(
            handler.property("ResourceSavingMode"),
            Some(Value::Boolean(true))
        );
    }
}
