// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests driving a controllee over the loopback bus.

use std::sync::Arc;
use std::time::Duration;

use cdm_controllee::about::{AboutData, DeviceType};
use cdm_controllee::bus::LoopbackBus;
use cdm_controllee::config::ControlleeConfig;
use cdm_controllee::error::CdmError;
use cdm_controllee::marshal::Unmarshal;
use cdm_controllee::message::{
    ABOUT_INTERFACE, MethodCall, MethodReply, PROPERTIES_INTERFACE, Signal,
};
use cdm_controllee::types::{ObjectPath, Value};
use cdm_controllee::{Controllee, InterfaceType};
use tokio::sync::broadcast;
use tokio::time::timeout;

const INVALID_VALUE: &str = "org.alljoyn.SmartSpaces.Error.InvalidValue";

fn path(p: &str) -> ObjectPath {
    ObjectPath::new(p).unwrap()
}

fn setup() -> (Arc<LoopbackBus>, broadcast::Receiver<Signal>, Controllee) {
    let bus = Arc::new(LoopbackBus::new(":1.20"));
    let signals = bus.subscribe();
    let controllee = Controllee::new(bus.clone(), about());
    (bus, signals, controllee)
}

fn about() -> AboutData {
    AboutData::new("en")
        .with_device_id("appliance-01")
        .with_device_name("Utility room")
        .with_app_name("Appliance")
        .with_manufacturer("Acme")
        .with_model_number("X-1")
        .with_description("Test appliance")
        .with_software_version("1.0")
}

/// Waits for the next signal.
async fn next_signal(signals: &mut broadcast::Receiver<Signal>) -> Signal {
    timeout(Duration::from_millis(200), signals.recv())
        .await
        .expect("timed out waiting for a signal")
        .expect("bus closed")
}

fn invoke(
    controllee: &Controllee,
    object: &ObjectPath,
    ty: InterfaceType,
    member: &str,
    args: Vec<Value>,
) -> MethodReply {
    controllee.handle_method_call(&MethodCall::new(object.clone(), ty.name(), member, args))
}

// ============================================================================
// Cycle Control
// ============================================================================

mod cycle_control {
    use super::*;
    use cdm_controllee::interface::operation::{
        CycleCommand, CycleControl, CycleControlListener, CycleControlProperties, CycleState,
    };

    struct Washer;

    impl CycleControlListener for Washer {
        fn on_execute_operational_command(
            &self,
            _path: &ObjectPath,
            command: CycleCommand,
        ) -> Result<Option<CycleState>, CdmError> {
            match command {
                CycleCommand::Start => Ok(Some(CycleState::Working)),
                CycleCommand::Stop => Ok(Some(CycleState::Idle)),
                _ => Err(CdmError::NotAcceptableDueToInternalState),
            }
        }
    }

    fn washer(controllee: &Controllee) -> ObjectPath {
        let object = path("/Cdm/Washer");
        let properties = CycleControlProperties::new(
            CycleState::Idle,
            vec![CycleState::Idle, CycleState::Working, CycleState::EndOfCycle],
            vec![CycleCommand::Start, CycleCommand::Stop],
        )
        .unwrap();
        controllee
            .add_interface(&object, CycleControl::new(properties).with_listener(Arc::new(Washer)))
            .unwrap();
        object
    }

    #[tokio::test]
    async fn start_command_changes_state() {
        let (_bus, mut signals, controllee) = setup();
        let object = washer(&controllee);

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::CycleControl,
            "ExecuteOperationalCommand",
            vec![Value::Byte(0)],
        );
        assert!(!reply.is_error(), "{reply:?}");

        let signal = next_signal(&mut signals).await;
        assert_eq!(signal.path, object);
        assert_eq!(signal.changed_property("OperationalState"), Some(&Value::Byte(1)));
    }

    #[tokio::test]
    async fn unsupported_command_is_invalid() {
        let (bus, _signals, controllee) = setup();
        let object = washer(&controllee);

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::CycleControl,
            "ExecuteOperationalCommand",
            vec![Value::Byte(2)],
        );
        assert_eq!(reply.error_name(), Some(INVALID_VALUE));
        assert_eq!(bus.sent_count(), 0);
    }

    #[tokio::test]
    async fn end_of_cycle_is_signalled_once() {
        let (_bus, mut signals, controllee) = setup();
        let object = washer(&controllee);

        for _ in 0..2 {
            controllee
                .try_update::<CycleControl, _, _>(&object, |cycle| {
                    cycle
                        .properties_mut()
                        .set_operational_state(CycleState::EndOfCycle)
                })
                .unwrap();
        }

        let changed = next_signal(&mut signals).await;
        assert_eq!(changed.member, "PropertiesChanged");
        let end = next_signal(&mut signals).await;
        assert_eq!(end.member, "EndOfCycle");
        assert!(end.sessionless);
        assert!(signals.try_recv().is_err());
    }
}

// ============================================================================
// Alerts
// ============================================================================

mod alerts {
    use super::*;
    use cdm_controllee::interface::operation::{
        Alert, Alerts, AlertsListener, AlertsProperties, Severity,
    };

    struct Catalog;

    impl AlertsListener for Catalog {
        fn on_get_alert_codes_description(
            &self,
            _path: &ObjectPath,
            language: &str,
        ) -> Result<Vec<(u16, String)>, CdmError> {
            match language {
                "en" => Ok(vec![(0x10, "Door open".to_string())]),
                _ => Err(CdmError::LanguageNotSupported),
            }
        }
    }

    fn fridge(controllee: &Controllee) -> ObjectPath {
        let object = path("/Cdm/Fridge");
        controllee
            .add_interface(
                &object,
                Alerts::new(AlertsProperties::new(Vec::new())).with_listener(Arc::new(Catalog)),
            )
            .unwrap();
        object
    }

    #[tokio::test]
    async fn raise_then_acknowledge() {
        let (_bus, mut signals, controllee) = setup();
        let object = fridge(&controllee);

        controllee
            .update::<Alerts, _>(&object, |alerts| {
                alerts
                    .properties_mut()
                    .raise(Alert::new(Severity::Warning, 0x10, true));
                alerts
                    .properties_mut()
                    .raise(Alert::new(Severity::Fault, 0x20, false));
            })
            .unwrap();

        let raised = next_signal(&mut signals).await;
        let alerts = Vec::<Alert>::from_value(raised.changed_property("Alerts").unwrap()).unwrap();
        assert_eq!(alerts.len(), 2);

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::Alerts,
            "AcknowledgeAlert",
            vec![Value::UInt16(0x10)],
        );
        assert!(!reply.is_error());

        let acknowledged = next_signal(&mut signals).await;
        let alerts =
            Vec::<Alert>::from_value(acknowledged.changed_property("Alerts").unwrap()).unwrap();
        assert_eq!(alerts, vec![Alert::new(Severity::Fault, 0x20, false)]);

        // Faults that need no acknowledgement stay
        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::Alerts,
            "AcknowledgeAlert",
            vec![Value::UInt16(0x20)],
        );
        assert_eq!(reply.error_name(), Some(INVALID_VALUE));
    }

    #[tokio::test]
    async fn descriptions_follow_language() {
        let (_bus, _signals, controllee) = setup();
        let object = fridge(&controllee);

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::Alerts,
            "GetAlertCodesDescription",
            vec![Value::String("en".into())],
        );
        let values = reply.values().unwrap();
        assert_eq!(values[0].signature().as_str(), "a(qs)");

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::Alerts,
            "GetAlertCodesDescription",
            vec![Value::String("de".into())],
        );
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.LanguageNotSupported")
        );
    }
}

// ============================================================================
// Channel
// ============================================================================

mod channel {
    use super::*;
    use cdm_controllee::interface::operation::{
        Channel, ChannelInfo, ChannelListener, ChannelProperties,
    };

    struct Tuner;

    impl ChannelListener for Tuner {
        fn on_get_channel_list(
            &self,
            _path: &ObjectPath,
            start: u16,
            count: u16,
            _language: &str,
        ) -> Result<Vec<ChannelInfo>, CdmError> {
            Ok((start..start.saturating_add(count).min(3))
                .map(|n| ChannelInfo::new(n.to_string(), n.to_string(), format!("Station {n}")))
                .collect())
        }
    }

    fn tv(controllee: &Controllee) -> ObjectPath {
        let object = path("/Cdm/Tv");
        controllee
            .add_interface(
                &object,
                Channel::new(ChannelProperties::new("0", 3).unwrap()).with_listener(Arc::new(Tuner)),
            )
            .unwrap();
        object
    }

    fn channel_list(start: u16, count: u16) -> Vec<Value> {
        vec![
            Value::UInt16(start),
            Value::UInt16(count),
            Value::String("en".into()),
        ]
    }

    #[tokio::test]
    async fn list_is_paged_by_listener() {
        let (_bus, _signals, controllee) = setup();
        let object = tv(&controllee);

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::Channel,
            "GetChannelList",
            channel_list(1, 10),
        );
        let Value::Array { items, .. } = &reply.values().unwrap()[0] else {
            panic!("expected an array");
        };
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn start_past_end_is_invalid() {
        let (_bus, _signals, controllee) = setup();
        let object = tv(&controllee);

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::Channel,
            "GetChannelList",
            channel_list(3, 1),
        );
        assert_eq!(reply.error_name(), Some(INVALID_VALUE));
    }

    #[tokio::test]
    async fn list_change_is_signalled() {
        let (_bus, mut signals, controllee) = setup();
        let object = tv(&controllee);

        controllee
            .update::<Channel, _>(&object, |channel| {
                channel.properties_mut().set_total_number_of_channels(4);
                channel.channel_list_changed();
            })
            .unwrap();

        let changed = next_signal(&mut signals).await;
        assert_eq!(
            changed.changed_property("TotalNumberOfChannels"),
            Some(&Value::UInt16(4))
        );
        let list_changed = next_signal(&mut signals).await;
        assert_eq!(list_changed.member, "ChannelListChanged");
        assert!(!list_changed.sessionless);
    }
}

// ============================================================================
// Metering And Timers
// ============================================================================

mod metering {
    use super::*;
    use cdm_controllee::interface::environment::{
        CurrentTemperature, CurrentTemperatureListener, CurrentTemperatureProperties,
    };
    use cdm_controllee::interface::operation::{
        EnergyUsage, EnergyUsageProperties, Timer, TimerProperties,
    };

    struct Thermometer;

    impl CurrentTemperatureListener for Thermometer {
        fn on_get_current_value(&self, _path: &ObjectPath) -> Result<Option<f64>, CdmError> {
            Ok(Some(21.5))
        }
    }

    #[tokio::test]
    async fn reset_zeroes_cumulative_energy() {
        let (_bus, mut signals, controllee) = setup();
        let object = path("/Cdm/Plug");
        let mut properties = EnergyUsageProperties::default();
        properties.set_cumulative_energy(12.5).unwrap();
        controllee
            .add_interface(&object, EnergyUsage::new(properties))
            .unwrap();

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::EnergyUsage,
            "ResetCumulativeEnergy",
            Vec::new(),
        );
        assert!(!reply.is_error());

        let signal = next_signal(&mut signals).await;
        assert_eq!(
            signal.changed_property("CumulativeEnergy"),
            Some(&Value::Double(0.0))
        );
    }

    #[tokio::test]
    async fn negative_timer_target_is_invalid() {
        let (_bus, mut signals, controllee) = setup();
        let object = path("/Cdm/Oven");
        controllee
            .add_interface(&object, Timer::new(TimerProperties::default()))
            .unwrap();

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::Timer,
            "SetTargetTimeToStart",
            vec![Value::Int32(-5)],
        );
        assert_eq!(reply.error_name(), Some(INVALID_VALUE));

        let reply = invoke(
            &controllee,
            &object,
            InterfaceType::Timer,
            "SetTargetTimeToStart",
            vec![Value::Int32(600)],
        );
        assert!(!reply.is_error());
        let signal = next_signal(&mut signals).await;
        assert_eq!(
            signal.changed_property("TargetTimeToStart"),
            Some(&Value::Int32(600))
        );
    }

    #[tokio::test]
    async fn get_refreshes_from_listener() {
        let (_bus, mut signals, controllee) = setup();
        let object = path("/Cdm/Thermostat");
        controllee
            .add_interface(
                &object,
                CurrentTemperature::new(CurrentTemperatureProperties::default())
                    .with_listener(Arc::new(Thermometer)),
            )
            .unwrap();

        let reply = controllee.handle_method_call(&MethodCall::new(
            object.clone(),
            PROPERTIES_INTERFACE,
            "Get",
            vec![
                Value::String(InterfaceType::CurrentTemperature.name().into()),
                Value::String("CurrentValue".into()),
            ],
        ));
        assert_eq!(
            reply.values(),
            Some(&[Value::variant(Value::Double(21.5))][..])
        );

        // The fresh reading differs from the cache, so it is announced
        let signal = next_signal(&mut signals).await;
        assert_eq!(
            signal.changed_property("CurrentValue"),
            Some(&Value::Double(21.5))
        );
    }
}

// ============================================================================
// About
// ============================================================================

mod about {
    use super::*;
    use cdm_controllee::about::ABOUT_PATH;
    use cdm_controllee::interface::operation::OnOffStatus;

    #[tokio::test]
    async fn announce_lists_objects() {
        let (_bus, mut signals, controllee) = setup();
        let lamp = path("/Cdm/Lamp");
        controllee
            .add_interface(&lamp, OnOffStatus::new(false))
            .unwrap();

        controllee.announce().unwrap();

        let announce = next_signal(&mut signals).await;
        assert_eq!(announce.member, "Announce");
        assert_eq!(announce.interface, ABOUT_INTERFACE);
        assert!(announce.sessionless);
        assert_eq!(announce.signature().as_str(), "qqa(oas)a{sv}");
        assert_eq!(announce.args[1], Value::UInt16(controllee.session_port()));

        let Value::Array { items, .. } = &announce.args[2] else {
            panic!("object description is not an array");
        };
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn about_data_by_language() {
        let (_bus, _signals, controllee) = setup();
        let about_path = path(ABOUT_PATH);

        let reply = controllee.handle_method_call(&MethodCall::new(
            about_path.clone(),
            ABOUT_INTERFACE,
            "GetAboutData",
            vec![Value::String(String::new())],
        ));
        let dict = &reply.values().unwrap()[0];
        assert_eq!(
            dict.dict_get("DeviceId").map(Value::unwrap_variant),
            Some(&Value::String("appliance-01".into()))
        );

        let reply = controllee.handle_method_call(&MethodCall::new(
            about_path,
            ABOUT_INTERFACE,
            "GetAboutData",
            vec![Value::String("fr".into())],
        ));
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.LanguageNotSupported")
        );
    }

    #[tokio::test]
    async fn config_drives_announcement() {
        let bus = Arc::new(LoopbackBus::new(":1.21"));
        let mut signals = bus.subscribe();
        let config = ControlleeConfig::new(
            about().with_device_type(DeviceType::ClothesDryer, path("/Cdm/Dryer")),
        )
        .with_session_port(1234);
        let controllee = Controllee::from_config(bus.clone(), config);

        controllee.announce().unwrap();

        let announce = next_signal(&mut signals).await;
        assert_eq!(announce.args[1], Value::UInt16(1234));
        assert!(announce.args[3].dict_get("DeviceTypeDescription").is_some());
    }
}
