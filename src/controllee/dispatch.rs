// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of incoming method calls.

use crate::about::{ABOUT_PATH, ABOUT_VERSION};
use crate::error::{CdmError, Error, MarshalError, Result};
use crate::interface::{InterfaceType, VERSION_PROPERTY};
use crate::marshal::{Marshal, arg};
use crate::message::{
    ABOUT_INTERFACE, INTROSPECTABLE_INTERFACE, MethodCall, MethodReply, PROPERTIES_INTERFACE,
};
use crate::types::{ObjectPath, Value};

use super::{Controllee, check_signature, collect_signals, snapshot};

impl Controllee {
    /// Handles a method call received from the bus and returns the reply.
    ///
    /// Routes `org.freedesktop.DBus.Properties` (`Get`, `Set`, `GetAll`),
    /// `org.freedesktop.DBus.Introspectable`, `org.alljoyn.About` and the
    /// methods of registered interfaces. Member names, property access and
    /// argument signatures are checked before a handler runs; any failure
    /// becomes an error reply.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use cdm_controllee::Controllee;
    /// use cdm_controllee::about::AboutData;
    /// use cdm_controllee::bus::LoopbackBus;
    /// use cdm_controllee::interface::operation::OnOffStatus;
    /// use cdm_controllee::message::{MethodCall, PROPERTIES_INTERFACE};
    /// use cdm_controllee::types::{ObjectPath, Value};
    ///
    /// let controllee = Controllee::new(Arc::new(LoopbackBus::new(":1.9")), AboutData::new("en"));
    /// let path = ObjectPath::new("/Cdm/Lamp").unwrap();
    /// controllee.add_interface(&path, OnOffStatus::new(true)).unwrap();
    ///
    /// let call = MethodCall::new(
    ///     path,
    ///     PROPERTIES_INTERFACE,
    ///     "Get",
    ///     vec![
    ///         Value::String("org.alljoyn.SmartSpaces.Operation.OnOffStatus".into()),
    ///         Value::String("IsOn".into()),
    ///     ],
    /// );
    /// let reply = controllee.handle_method_call(&call);
    /// assert_eq!(reply.values(), Some(&[Value::variant(Value::Boolean(true))][..]));
    /// ```
    #[must_use]
    pub fn handle_method_call(&self, call: &MethodCall) -> MethodReply {
        let result = match call.interface.as_str() {
            PROPERTIES_INTERFACE => self.handle_properties(call),
            INTROSPECTABLE_INTERFACE => self.handle_introspect(call),
            ABOUT_INTERFACE => self.handle_about(call),
            _ => self.handle_interface_method(call),
        };

        match result {
            Ok(values) => {
                tracing::debug!(
                    path = %call.path,
                    interface = %call.interface,
                    member = %call.member,
                    "Method call handled"
                );
                MethodReply::ok(call, values)
            }
            Err(e) => {
                tracing::debug!(
                    path = %call.path,
                    interface = %call.interface,
                    member = %call.member,
                    error = %e,
                    "Method call failed"
                );
                MethodReply::error(call, &e)
            }
        }
    }

    // ===== Properties =====

    fn handle_properties(&self, call: &MethodCall) -> Result<Vec<Value>> {
        match call.member.as_str() {
            "Get" => {
                check_signature("ss", &call.args)?;
                let interface: String = arg(&call.args, 0)?;
                let property: String = arg(&call.args, 1)?;
                let value = self.get_property(&call.path, &interface, &property)?;
                Ok(vec![Value::variant(value)])
            }
            "Set" => {
                check_signature("ssv", &call.args)?;
                let interface: String = arg(&call.args, 0)?;
                let property: String = arg(&call.args, 1)?;
                let value = call.args[2]
                    .variant_inner()
                    .ok_or_else(|| MarshalError::SignatureMismatch {
                        expected: "v".to_string(),
                        actual: call.args[2].signature().to_string(),
                    })?;
                self.set_property(&call.path, &interface, &property, value)?;
                Ok(Vec::new())
            }
            "GetAll" => {
                check_signature("s", &call.args)?;
                let interface: String = arg(&call.args, 0)?;
                Ok(vec![self.get_all_properties(&call.path, &interface)?])
            }
            member => Err(unknown_member(PROPERTIES_INTERFACE, member)),
        }
    }

    fn get_property(&self, path: &ObjectPath, interface: &str, property: &str) -> Result<Value> {
        if interface == ABOUT_INTERFACE {
            check_about_path(path)?;
            return if property == VERSION_PROPERTY {
                Ok(ABOUT_VERSION.to_value())
            } else {
                Err(unknown_property(interface, property))
            };
        }

        let ty = resolve(interface)?;
        let handler = self.handler(path, ty)?;
        let descriptor = ty.descriptor();
        if descriptor.property(property).is_none() {
            return Err(unknown_property(interface, property));
        }
        if property == VERSION_PROPERTY {
            return Ok(descriptor.version.to_value());
        }

        let (value, signals) = {
            let mut guard = handler.lock();
            let before = snapshot(&**guard);
            guard.refresh(path, property)?;
            let value = guard
                .property(property)
                .ok_or_else(|| unknown_property(interface, property))?;
            (value, collect_signals(path, &mut **guard, before))
        };
        self.send_signals(signals);
        tracing::trace!(%path, interface, property, "Property read");
        Ok(value)
    }

    fn set_property(
        &self,
        path: &ObjectPath,
        interface: &str,
        property: &str,
        value: &Value,
    ) -> Result<()> {
        if interface == ABOUT_INTERFACE {
            check_about_path(path)?;
            return Err(Error::PropertyReadOnly {
                interface: interface.to_string(),
                property: property.to_string(),
            });
        }

        let ty = resolve(interface)?;
        let handler = self.handler(path, ty)?;
        let descriptor = ty
            .descriptor()
            .property(property)
            .ok_or_else(|| unknown_property(interface, property))?;
        if !descriptor.is_writable() {
            return Err(Error::PropertyReadOnly {
                interface: interface.to_string(),
                property: property.to_string(),
            });
        }
        let actual = value.signature();
        if actual.as_str() != descriptor.signature {
            return Err(MarshalError::SignatureMismatch {
                expected: descriptor.signature.to_string(),
                actual: actual.to_string(),
            }
            .into());
        }
        self.check_controllable(path)?;

        let signals = {
            let mut guard = handler.lock();
            let before = snapshot(&**guard);
            guard.set_property(path, property, value)?;
            collect_signals(path, &mut **guard, before)
        };
        self.send_signals(signals);
        tracing::debug!(%path, interface, property, "Property set");
        Ok(())
    }

    /// Reads every property of an interface.
    ///
    /// A listener that fails to refresh one property does not fail the
    /// whole call; the cached value is returned for that property.
    fn get_all_properties(&self, path: &ObjectPath, interface: &str) -> Result<Value> {
        if interface == ABOUT_INTERFACE {
            check_about_path(path)?;
            return Ok(Value::string_variant_dict([(
                VERSION_PROPERTY,
                ABOUT_VERSION.to_value(),
            )]));
        }

        let ty = resolve(interface)?;
        let handler = self.handler(path, ty)?;
        let descriptor = ty.descriptor();

        let (entries, signals) = {
            let mut guard = handler.lock();
            let before = snapshot(&**guard);
            let mut entries = vec![(VERSION_PROPERTY, descriptor.version.to_value())];
            for property in descriptor.properties {
                if let Err(e) = guard.refresh(path, property.name) {
                    tracing::warn!(
                        %path,
                        interface,
                        property = property.name,
                        error = %e,
                        "Property refresh failed, using cached value"
                    );
                }
                if let Some(value) = guard.property(property.name) {
                    entries.push((property.name, value));
                }
            }
            (entries, collect_signals(path, &mut **guard, before))
        };
        self.send_signals(signals);
        Ok(Value::string_variant_dict(entries))
    }

    // ===== Introspection =====

    fn handle_introspect(&self, call: &MethodCall) -> Result<Vec<Value>> {
        if call.member != "Introspect" {
            return Err(unknown_member(INTROSPECTABLE_INTERFACE, &call.member));
        }
        check_signature("", &call.args)?;
        Ok(vec![Value::String(self.introspect(&call.path)?)])
    }

    // ===== About =====

    fn handle_about(&self, call: &MethodCall) -> Result<Vec<Value>> {
        check_about_path(&call.path)?;
        match call.member.as_str() {
            "GetAboutData" => {
                check_signature("s", &call.args)?;
                let language: String = arg(&call.args, 0)?;
                let dict = self.about.read().to_dict(&language)?;
                Ok(vec![dict])
            }
            "GetObjectDescription" => {
                check_signature("", &call.args)?;
                Ok(vec![self.object_description().to_value()])
            }
            member => Err(unknown_member(ABOUT_INTERFACE, member)),
        }
    }

    // ===== Interface Methods =====

    fn handle_interface_method(&self, call: &MethodCall) -> Result<Vec<Value>> {
        let ty = resolve(&call.interface)?;
        let handler = self.handler(&call.path, ty)?;
        let method = ty
            .descriptor()
            .method(&call.member)
            .ok_or_else(|| unknown_member(ty.name(), &call.member))?;
        check_signature(&method.input_signature(), &call.args)?;
        self.check_controllable(&call.path)?;

        let (values, signals) = {
            let mut guard = handler.lock();
            let before = snapshot(&**guard);
            let values = guard.call_method(&call.path, &call.member, &call.args)?;
            (values, collect_signals(&call.path, &mut **guard, before))
        };
        self.send_signals(signals);
        Ok(values)
    }

    /// Refuses remote changes while the object reports `IsControllable == false`.
    fn check_controllable(&self, path: &ObjectPath) -> Result<()> {
        let Ok(handler) = self.handler(path, InterfaceType::RemoteControllability) else {
            return Ok(());
        };
        let controllable = handler.lock().property("IsControllable");
        if controllable == Some(Value::Boolean(false)) {
            tracing::debug!(%path, "Remote control disabled");
            return Err(CdmError::RemoteControlDisabled.into());
        }
        Ok(())
    }
}

fn resolve(interface: &str) -> Result<InterfaceType> {
    InterfaceType::from_name(interface).ok_or_else(|| Error::UnknownInterface(interface.to_string()))
}

fn check_about_path(path: &ObjectPath) -> Result<()> {
    if path.as_str() == ABOUT_PATH {
        Ok(())
    } else {
        Err(Error::ObjectNotFound(path.to_string()))
    }
}

fn unknown_member(interface: &str, member: &str) -> Error {
    Error::UnknownMember {
        interface: interface.to_string(),
        member: member.to_string(),
    }
}

fn unknown_property(interface: &str, property: &str) -> Error {
    Error::UnknownProperty {
        interface: interface.to_string(),
        property: property.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::about::AboutData;
    use crate::bus::LoopbackBus;
    use crate::interface::environment::{
        CurrentTemperature, CurrentTemperatureListener, CurrentTemperatureProperties,
        TargetTemperature, TargetTemperatureListener, TargetTemperatureProperties,
    };
    use crate::interface::operation::{
        FanMode, FanSpeedLevel, FanSpeedLevelProperties, HvacFanMode, HvacFanModeProperties,
        OnControl, OnControlListener, RemoteControllability,
    };
    use crate::types::AutoMode;

    const TARGET_TEMPERATURE: &str = "org.alljoyn.SmartSpaces.Environment.TargetTemperature";
    const ON_CONTROL: &str = "org.alljoyn.SmartSpaces.Operation.OnControl";

    struct Heater;

    impl TargetTemperatureListener for Heater {}

    struct Switch;

    impl OnControlListener for Switch {
        fn on_switch_on(&self, _path: &ObjectPath) -> std::result::Result<(), CdmError> {
            Ok(())
        }
    }

    struct FaultySensor;

    impl CurrentTemperatureListener for FaultySensor {
        fn on_get_current_value(&self, _path: &ObjectPath) -> std::result::Result<Option<f64>, CdmError> {
            Err(CdmError::NotAcceptableDueToInternalState)
        }
    }

    fn ac_path() -> ObjectPath {
        ObjectPath::new("/Cdm/Ac").unwrap()
    }

    fn setup() -> (Arc<LoopbackBus>, Controllee) {
        let bus = Arc::new(LoopbackBus::new(":1.5"));
        let controllee = Controllee::new(bus.clone(), AboutData::new("en"));
        let properties = TargetTemperatureProperties::new(16.0, 30.0, 0.5).unwrap();
        controllee
            .add_interface(
                &ac_path(),
                TargetTemperature::new(properties).with_listener(Arc::new(Heater)),
            )
            .unwrap();
        controllee
            .add_interface(&ac_path(), OnControl::new().with_listener(Arc::new(Switch)))
            .unwrap();
        (bus, controllee)
    }

    fn call(interface: &str, member: &str, args: Vec<Value>) -> MethodCall {
        MethodCall::new(ac_path(), interface, member, args)
    }

    fn set(property: &str, value: Value) -> MethodCall {
        call(
            PROPERTIES_INTERFACE,
            "Set",
            vec![
                Value::String(TARGET_TEMPERATURE.into()),
                Value::String(property.into()),
                Value::variant(value),
            ],
        )
    }

    fn set_on(interface: &str, property: &str, value: Value) -> MethodCall {
        call(
            PROPERTIES_INTERFACE,
            "Set",
            vec![
                Value::String(interface.into()),
                Value::String(property.into()),
                Value::variant(value),
            ],
        )
    }

    fn get(property: &str) -> MethodCall {
        call(
            PROPERTIES_INTERFACE,
            "Get",
            vec![
                Value::String(TARGET_TEMPERATURE.into()),
                Value::String(property.into()),
            ],
        )
    }

    #[test]
    fn version_comes_from_descriptor() {
        let (_bus, controllee) = setup();
        let reply = controllee.handle_method_call(&get("Version"));
        assert_eq!(
            reply.values(),
            Some(&[Value::variant(Value::UInt16(1))][..])
        );
    }

    #[test]
    fn set_snaps_and_emits_once() {
        let (bus, controllee) = setup();
        let mut signals = bus.subscribe();

        let reply = controllee.handle_method_call(&set("TargetValue", Value::Double(21.3)));
        assert!(!reply.is_error());

        let signal = signals.try_recv().unwrap();
        assert_eq!(signal.changed_property("TargetValue"), Some(&Value::Double(21.5)));
        assert!(signals.try_recv().is_err());

        let reply = controllee.handle_method_call(&get("TargetValue"));
        assert_eq!(
            reply.values(),
            Some(&[Value::variant(Value::Double(21.5))][..])
        );
    }

    #[test]
    fn out_of_range_set_is_invalid_value() {
        let (bus, controllee) = setup();
        let reply = controllee.handle_method_call(&set("TargetValue", Value::Double(42.0)));
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.InvalidValue")
        );
        assert_eq!(bus.sent_count(), 0);
    }

    #[test]
    fn read_only_property_is_refused() {
        let (_bus, controllee) = setup();
        let reply = controllee.handle_method_call(&set("MaxValue", Value::Double(40.0)));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.PropertyReadOnly")
        );
    }

    #[test]
    fn wrong_value_type_is_invalid_args() {
        let (_bus, controllee) = setup();
        let reply = controllee.handle_method_call(&set("TargetValue", Value::Byte(20)));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.InvalidArgs")
        );
    }

    #[test]
    fn unknown_names_map_to_dbus_errors() {
        let (_bus, controllee) = setup();

        let reply = controllee.handle_method_call(&get("Bogus"));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.UnknownProperty")
        );

        let reply = controllee.handle_method_call(&call("org.example.Nope", "Do", Vec::new()));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.UnknownInterface")
        );

        let reply = controllee.handle_method_call(&call(ON_CONTROL, "SwitchOff", Vec::new()));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.UnknownMethod")
        );

        let elsewhere = MethodCall::new(
            ObjectPath::new("/Cdm/Other").unwrap(),
            ON_CONTROL,
            "SwitchOn",
            Vec::new(),
        );
        let reply = controllee.handle_method_call(&elsewhere);
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.UnknownObject")
        );
    }

    #[test]
    fn method_arguments_are_checked() {
        let (_bus, controllee) = setup();
        let reply =
            controllee.handle_method_call(&call(ON_CONTROL, "SwitchOn", vec![Value::Byte(1)]));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.InvalidArgs")
        );

        let reply = controllee.handle_method_call(&call(ON_CONTROL, "SwitchOn", Vec::new()));
        assert_eq!(reply.values(), Some(&[][..]));
    }

    #[test]
    fn get_all_lists_version_and_properties() {
        let (_bus, controllee) = setup();
        let reply = controllee.handle_method_call(&call(
            PROPERTIES_INTERFACE,
            "GetAll",
            vec![Value::String(TARGET_TEMPERATURE.into())],
        ));
        let dict = &reply.values().unwrap()[0];
        assert_eq!(dict.signature().as_str(), "a{sv}");
        assert_eq!(
            dict.dict_get("Version").map(Value::unwrap_variant),
            Some(&Value::UInt16(1))
        );
        assert!(dict.dict_get("MinValue").is_some());
        assert!(dict.dict_get("StepValue").is_some());
    }

    #[test]
    fn remote_control_gating() {
        let (_bus, controllee) = setup();
        controllee
            .add_interface(&ac_path(), RemoteControllability::new(false))
            .unwrap();

        let reply = controllee.handle_method_call(&set("TargetValue", Value::Double(20.0)));
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.RemoteControlDisabled")
        );
        let reply = controllee.handle_method_call(&call(ON_CONTROL, "SwitchOn", Vec::new()));
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.RemoteControlDisabled")
        );

        // Reads keep working
        assert!(!controllee.handle_method_call(&get("TargetValue")).is_error());

        controllee
            .update::<RemoteControllability, _>(&ac_path(), |rc| rc.set_is_controllable(true))
            .unwrap();
        let reply = controllee.handle_method_call(&set("TargetValue", Value::Double(20.0)));
        assert!(!reply.is_error());
    }

    #[test]
    fn about_calls_require_about_path() {
        let (_bus, controllee) = setup();
        let reply = controllee.handle_method_call(&call(
            ABOUT_INTERFACE,
            "GetObjectDescription",
            Vec::new(),
        ));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.UnknownObject")
        );

        let about_call = MethodCall::new(
            ObjectPath::new(ABOUT_PATH).unwrap(),
            ABOUT_INTERFACE,
            "GetObjectDescription",
            Vec::new(),
        );
        let reply = controllee.handle_method_call(&about_call);
        let description = &reply.values().unwrap()[0];
        assert_eq!(description.signature().as_str(), "a(oas)");
    }

    #[test]
    fn reply_echoes_serial_and_sender() {
        let (_bus, controllee) = setup();
        let call = get("TargetValue").with_serial(77).with_sender(":1.30");
        let reply = controllee.handle_method_call(&call);
        assert_eq!(reply.reply_serial, 77);
        assert_eq!(reply.destination.as_deref(), Some(":1.30"));
    }

    #[test]
    fn nested_variant_set_is_invalid_args() {
        let (bus, controllee) = setup();
        let reply = controllee.handle_method_call(&set(
            "TargetValue",
            Value::variant(Value::Double(21.0)),
        ));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.InvalidArgs")
        );
        assert_eq!(bus.sent_count(), 0);

        let reply = controllee.handle_method_call(&get("TargetValue"));
        assert_eq!(
            reply.values(),
            Some(&[Value::variant(Value::Double(16.0))][..])
        );
    }

    #[test]
    fn set_without_variant_is_invalid_args() {
        let (_bus, controllee) = setup();
        let reply = controllee.handle_method_call(&call(
            PROPERTIES_INTERFACE,
            "Set",
            vec![
                Value::String(TARGET_TEMPERATURE.into()),
                Value::String("TargetValue".into()),
                Value::Double(21.0),
            ],
        ));
        assert_eq!(
            reply.error_name(),
            Some("org.freedesktop.DBus.Error.InvalidArgs")
        );
    }

    #[test]
    fn get_all_serves_cache_when_refresh_fails() {
        let (_bus, controllee) = setup();
        controllee
            .add_interface(
                &ac_path(),
                CurrentTemperature::new(CurrentTemperatureProperties::new(23.5).unwrap())
                    .with_listener(Arc::new(FaultySensor)),
            )
            .unwrap();

        let reply = controllee.handle_method_call(&call(
            PROPERTIES_INTERFACE,
            "GetAll",
            vec![Value::String(
                "org.alljoyn.SmartSpaces.Environment.CurrentTemperature".into(),
            )],
        ));
        assert!(!reply.is_error());
        let dict = &reply.values().unwrap()[0];
        assert_eq!(
            dict.dict_get("CurrentValue").map(Value::unwrap_variant),
            Some(&Value::Double(23.5))
        );
        assert!(dict.dict_get("Precision").is_some());
    }

    #[test]
    fn auto_mode_write_checks_support() {
        const FAN: &str = "org.alljoyn.SmartSpaces.Operation.FanSpeedLevel";
        let (_bus, controllee) = setup();
        controllee
            .add_interface(
                &ac_path(),
                FanSpeedLevel::new(FanSpeedLevelProperties::new(3, AutoMode::NotSupported)),
            )
            .unwrap();

        let reply = controllee.handle_method_call(&set_on(FAN, "AutoMode", Value::Byte(1)));
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.FeatureNotAvailable")
        );

        let reply = controllee.handle_method_call(&set_on(FAN, "AutoMode", Value::Byte(0xFF)));
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.InvalidValue")
        );

        let reply = controllee.handle_method_call(&set_on(FAN, "FanSpeedLevel", Value::Byte(2)));
        assert!(!reply.is_error());
    }

    #[test]
    fn unsupported_mode_is_invalid_value() {
        const HVAC_FAN: &str = "org.alljoyn.SmartSpaces.Operation.HvacFanMode";
        let (bus, controllee) = setup();
        let properties =
            HvacFanModeProperties::new(FanMode::Auto, vec![FanMode::Auto, FanMode::Continuous])
                .unwrap();
        controllee
            .add_interface(&ac_path(), HvacFanMode::new(properties))
            .unwrap();

        let reply = controllee.handle_method_call(&set_on(HVAC_FAN, "Mode", Value::UInt16(1)));
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.InvalidValue")
        );
        assert_eq!(bus.sent_count(), 0);

        let reply = controllee.handle_method_call(&set_on(HVAC_FAN, "Mode", Value::UInt16(2)));
        assert!(!reply.is_error());
        let mode = controllee
            .read::<HvacFanMode, _>(&ac_path(), |h| h.properties().mode())
            .unwrap();
        assert_eq!(mode, FanMode::Continuous);
    }
}
