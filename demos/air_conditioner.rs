// SPDX-License-Identifier: MPL-2.0

//! Demo program: an air conditioner controllee on the loopback bus.
//!
//! Registers the interfaces of a split air conditioner, announces it, then
//! plays a few controller requests and prints the replies and the signals
//! the controllee emits.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example air_conditioner [-- <config.json>]
//! ```

use std::env;
use std::sync::{Arc, Weak};
use std::time::Duration;

use cdm_controllee::about::{AboutData, DeviceType};
use cdm_controllee::bus::LoopbackBus;
use cdm_controllee::config::ControlleeConfig;
use cdm_controllee::error::CdmError;
use cdm_controllee::interface::environment::{
    CurrentTemperature, CurrentTemperatureListener, CurrentTemperatureProperties,
    TargetTemperature, TargetTemperatureListener, TargetTemperatureProperties,
};
use cdm_controllee::interface::operation::{
    ClimateControlMode, ClimateControlModeListener, ClimateControlModeProperties, ClimateMode,
    FanSpeedLevel, FanSpeedLevelListener, FanSpeedLevelProperties, OffControl, OffControlListener,
    OnControl, OnControlListener, OnOffStatus, RemoteControllability,
};
use cdm_controllee::message::{MethodCall, PROPERTIES_INTERFACE};
use cdm_controllee::types::{AutoMode, ObjectPath, Value};
use cdm_controllee::{Controllee, InterfaceType};

/// The simulated appliance behind every listener.
struct Unit {
    controllee: Weak<Controllee>,
    path: ObjectPath,
}

impl Unit {
    fn power(&self, on: bool) -> Result<(), CdmError> {
        let controllee = self
            .controllee
            .upgrade()
            .ok_or(CdmError::NotAcceptableDueToInternalState)?;
        println!("  [unit] compressor {}", if on { "started" } else { "stopped" });
        controllee
            .update::<OnOffStatus, _>(&self.path, |status| status.set_is_on(on))
            .map_err(|_| CdmError::NotAcceptableDueToInternalState)
    }
}

impl OnControlListener for Unit {
    fn on_switch_on(&self, _path: &ObjectPath) -> Result<(), CdmError> {
        self.power(true)
    }
}

impl OffControlListener for Unit {
    fn on_switch_off(&self, _path: &ObjectPath) -> Result<(), CdmError> {
        self.power(false)
    }
}

impl TargetTemperatureListener for Unit {
    fn on_set_target_value(&self, _path: &ObjectPath, value: f64) -> Result<(), CdmError> {
        println!("  [unit] setpoint {value} C");
        Ok(())
    }
}

impl CurrentTemperatureListener for Unit {
    fn on_get_current_value(&self, _path: &ObjectPath) -> Result<Option<f64>, CdmError> {
        Ok(Some(26.5))
    }
}

impl FanSpeedLevelListener for Unit {
    fn on_set_fan_speed_level(&self, _path: &ObjectPath, level: u8) -> Result<(), CdmError> {
        println!("  [unit] fan level {level}");
        Ok(())
    }
}

impl ClimateControlModeListener for Unit {
    fn on_set_mode(&self, _path: &ObjectPath, mode: ClimateMode) -> Result<(), CdmError> {
        println!("  [unit] mode {mode:?}");
        Ok(())
    }
}

fn default_config(path: &ObjectPath) -> ControlleeConfig {
    let about = AboutData::new("en")
        .with_device_id("ac-demo-0001")
        .with_device_name("Living room AC")
        .with_app_name("Air Conditioner")
        .with_manufacturer("Acme Appliances")
        .with_model_number("AC-2000")
        .with_description("Split air conditioner demo")
        .with_software_version("1.0.0")
        .with_location("Living room")
        .with_device_type(DeviceType::AirConditioner, path.clone());
    ControlleeConfig::new(about)
}

fn set(path: &ObjectPath, interface: InterfaceType, property: &str, value: Value) -> MethodCall {
    MethodCall::new(
        path.clone(),
        PROPERTIES_INTERFACE,
        "Set",
        vec![
            Value::String(interface.name().into()),
            Value::String(property.into()),
            Value::variant(value),
        ],
    )
}

fn report(label: &str, controllee: &Controllee, call: &MethodCall) {
    let reply = controllee.handle_method_call(call);
    match reply.error_name() {
        Some(name) => println!("{label}: error {name}"),
        None => println!("{label}: ok {:?}", reply.values().unwrap_or_default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = ObjectPath::new("/Cdm/AirConditioner")?;
    let config = match env::args().nth(1) {
        Some(file) => ControlleeConfig::from_file(file)?,
        None => default_config(&path),
    };

    let bus = Arc::new(LoopbackBus::new(":1.100"));
    let mut signals = bus.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(signal) = signals.recv().await {
            println!(
                "  <signal> {} {}.{} {:?}",
                signal.path, signal.interface, signal.member, signal.args
            );
        }
    });

    let controllee = Arc::new(Controllee::from_config(bus.clone(), config));
    let unit = Arc::new(Unit {
        controllee: Arc::downgrade(&controllee),
        path: path.clone(),
    });

    controllee.add_interface(&path, OnOffStatus::new(false))?;
    controllee.add_interface(&path, RemoteControllability::new(true))?;
    controllee.add_interface(&path, OnControl::new().with_listener(unit.clone()))?;
    controllee.add_interface(&path, OffControl::new().with_listener(unit.clone()))?;
    controllee.add_interface(
        &path,
        CurrentTemperature::new(CurrentTemperatureProperties::new(27.0)?)
            .with_listener(unit.clone()),
    )?;
    controllee.add_interface(
        &path,
        TargetTemperature::new(TargetTemperatureProperties::new(16.0, 30.0, 0.5)?)
            .with_listener(unit.clone()),
    )?;
    controllee.add_interface(
        &path,
        FanSpeedLevel::new(FanSpeedLevelProperties::new(3, AutoMode::Off))
            .with_listener(unit.clone()),
    )?;
    controllee.add_interface(
        &path,
        ClimateControlMode::new(ClimateControlModeProperties::new(
            ClimateMode::Off,
            vec![ClimateMode::Off, ClimateMode::Cool, ClimateMode::Dry],
        )?)
        .with_listener(unit),
    )?;

    controllee.announce()?;

    let call = |member: &str, ty: InterfaceType| {
        MethodCall::new(path.clone(), ty.name(), member, Vec::new())
    };
    report("SwitchOn", &controllee, &call("SwitchOn", InterfaceType::OnControl));
    report(
        "Mode=Cool",
        &controllee,
        &set(&path, InterfaceType::ClimateControlMode, "Mode", Value::UInt16(2)),
    );
    report(
        "TargetValue=22.3",
        &controllee,
        &set(&path, InterfaceType::TargetTemperature, "TargetValue", Value::Double(22.3)),
    );
    report(
        "TargetValue=35",
        &controllee,
        &set(&path, InterfaceType::TargetTemperature, "TargetValue", Value::Double(35.0)),
    );
    report(
        "FanSpeedLevel=2",
        &controllee,
        &set(&path, InterfaceType::FanSpeedLevel, "FanSpeedLevel", Value::Byte(2)),
    );

    // The user locks the panel: remote writes are refused until unlocked
    controllee.update::<RemoteControllability, _>(&path, |rc| rc.set_is_controllable(false))?;
    report("SwitchOff (locked)", &controllee, &call("SwitchOff", InterfaceType::OffControl));
    controllee.update::<RemoteControllability, _>(&path, |rc| rc.set_is_controllable(true))?;
    report("SwitchOff", &controllee, &call("SwitchOff", InterfaceType::OffControl));

    tokio::time::sleep(Duration::from_millis(100)).await;
    printer.abort();
    Ok(())
}
