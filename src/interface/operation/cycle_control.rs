// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.CycleControl`
//!
//! Start, stop, pause and resume the program cycle of a washer, dryer,
//! dishwasher or oven. The `EndOfCycle` signal goes out each time the
//! operational state enters [`CycleState::EndOfCycle`], however the change
//! was made.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Arg, Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, MethodDescriptor,
    PendingSignal, PropertyDescriptor, SignalDescriptor, check_supported,
};
use crate::marshal::{Marshal, arg};
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.CycleControl",
    version: 1,
    properties: &[
        PropertyDescriptor::read("OperationalState", "y"),
        PropertyDescriptor::read("SupportedOperationalStates", "ay"),
        PropertyDescriptor::read("SupportedOperationalCommands", "ay"),
    ],
    methods: &[MethodDescriptor {
        name: "ExecuteOperationalCommand",
        inputs: &[Arg::new("command", "y")],
        outputs: &[],
    }],
    signals: &[SignalDescriptor {
        name: "EndOfCycle",
        args: &[],
        sessionless: true,
    }],
};

code_enum! {
    /// Operational state of a cycle (`y` on the bus).
    CycleState: u8 (from_u8, as_u8), "operational state" {
        /// Waiting for a program.
        Idle = 0,
        /// Running.
        Working = 1,
        /// Program chosen, waiting for start.
        ReadyToStart = 2,
        /// Waiting for a delayed start time.
        DelayedStart = 3,
        /// Paused.
        Paused = 4,
        /// Cycle finished.
        EndOfCycle = 5,
    }
}

code_enum! {
    /// Command accepted by `ExecuteOperationalCommand` (`y` on the bus).
    CycleCommand: u8 (from_u8, as_u8), "operational command" {
        /// Start the cycle.
        Start = 0,
        /// Stop the cycle.
        Stop = 1,
        /// Pause the cycle.
        Pause = 2,
        /// Resume a paused cycle.
        Resume = 3,
    }
}

/// Cached cycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleControlProperties {
    operational_state: CycleState,
    supported_operational_states: Vec<CycleState>,
    supported_operational_commands: Vec<CycleCommand>,
}

impl CycleControlProperties {
    /// Creates the properties in `state`.
    ///
    /// # Errors
    ///
    /// Returns a value error if `state` is not among `states`.
    pub fn new(
        state: CycleState,
        states: Vec<CycleState>,
        commands: Vec<CycleCommand>,
    ) -> std::result::Result<Self, ValueError> {
        check_state(state, &states)?;
        Ok(Self {
            operational_state: state,
            supported_operational_states: states,
            supported_operational_commands: commands,
        })
    }

    /// Returns the operational state.
    #[must_use]
    pub fn operational_state(&self) -> CycleState {
        self.operational_state
    }

    /// Sets the operational state.
    ///
    /// # Errors
    ///
    /// Returns a value error if the state is not supported.
    pub fn set_operational_state(&mut self, state: CycleState) -> std::result::Result<(), ValueError> {
        check_state(state, &self.supported_operational_states)?;
        self.operational_state = state;
        Ok(())
    }

    /// Returns the supported states.
    #[must_use]
    pub fn supported_operational_states(&self) -> &[CycleState] {
        &self.supported_operational_states
    }

    /// Returns the supported commands.
    #[must_use]
    pub fn supported_operational_commands(&self) -> &[CycleCommand] {
        &self.supported_operational_commands
    }

    /// Replaces the supported commands.
    pub fn set_supported_operational_commands(&mut self, commands: Vec<CycleCommand>) {
        self.supported_operational_commands = commands;
    }
}

fn check_state(state: CycleState, supported: &[CycleState]) -> std::result::Result<(), ValueError> {
    let codes: Vec<u8> = supported.iter().map(CycleState::as_u8).collect();
    check_supported(state.as_u8(), &codes)
}

/// Vendor callbacks for the cycle control interface.
pub trait CycleControlListener: Send + Sync {
    /// Executes a supported command and returns the resulting state, if it
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns `NotAcceptableDueToInternalState` when the command does not
    /// apply in the current state. The default returns
    /// `FeatureNotAvailable`.
    fn on_execute_operational_command(
        &self,
        _path: &ObjectPath,
        _command: CycleCommand,
    ) -> std::result::Result<Option<CycleState>, CdmError> {
        Err(CdmError::FeatureNotAvailable)
    }
}

/// Handler for `Operation.CycleControl`.
pub struct CycleControl {
    properties: CycleControlProperties,
    listener: Option<Arc<dyn CycleControlListener>>,
    reported_state: CycleState,
}

impl CycleControl {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: CycleControlProperties) -> Self {
        let reported_state = properties.operational_state;
        Self {
            properties,
            listener: None,
            reported_state,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn CycleControlListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &CycleControlProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut CycleControlProperties {
        &mut self.properties
    }

    fn execute(&mut self, path: &ObjectPath, command: CycleCommand) -> Result<Vec<Value>> {
        let codes: Vec<u8> = self
            .properties
            .supported_operational_commands
            .iter()
            .map(CycleCommand::as_u8)
            .collect();
        check_supported(command.as_u8(), &codes)?;
        let listener = self.listener.as_ref().ok_or(CdmError::FeatureNotAvailable)?;
        if let Some(state) = listener.on_execute_operational_command(path, command)? {
            self.properties.set_operational_state(state)?;
        }
        Ok(Vec::new())
    }
}

impl fmt::Debug for CycleControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleControl")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for CycleControl {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::CycleControl
    }

    fn property(&self, name: &str) -> Option<Value> {
        let props = &self.properties;
        match name {
            "OperationalState" => Some(props.operational_state.to_value()),
            "SupportedOperationalStates" => Some(props.supported_operational_states.to_value()),
            "SupportedOperationalCommands" => {
                Some(props.supported_operational_commands.to_value())
            }
            _ => None,
        }
    }

    fn call_method(&mut self, path: &ObjectPath, member: &str, args: &[Value]) -> Result<Vec<Value>> {
        if member == "ExecuteOperationalCommand" {
            return self.execute(path, arg(args, 0)?);
        }
        Err(crate::Error::UnknownMember {
            interface: DESCRIPTOR.name.to_string(),
            member: member.to_string(),
        })
    }

    fn drain_signals(&mut self) -> Vec<PendingSignal> {
        let state = self.properties.operational_state;
        let entered_end = state == CycleState::EndOfCycle && self.reported_state != state;
        self.reported_state = state;
        if entered_end {
            vec![PendingSignal {
                member: "EndOfCycle",
                args: Vec::new(),
            }]
        } else {
            Vec::new()
        }
    }
}

impl Interface for CycleControl {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::CycleControl;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Washer;

    impl CycleControlListener for Washer {
        fn on_execute_operational_command(
            &self,
            _path: &ObjectPath,
            command: CycleCommand,
        ) -> std::result::Result<Option<CycleState>, CdmError> {
            Ok(Some(match command {
                CycleCommand::Start | CycleCommand::Resume => CycleState::Working,
                CycleCommand::Pause => CycleState::Paused,
                CycleCommand::Stop => CycleState::EndOfCycle,
            }))
        }
    }

    fn path() -> ObjectPath {
        ObjectPath::new("/Cdm/Washer").unwrap()
    }

    fn handler() -> CycleControl {
        let props = CycleControlProperties::new(
            CycleState::Idle,
            vec![
                CycleState::Idle,
                CycleState::Working,
                CycleState::Paused,
                CycleState::EndOfCycle,
            ],
            vec![CycleCommand::Start, CycleCommand::Pause, CycleCommand::Stop],
        )
        .unwrap();
        CycleControl::new(props).with_listener(Arc::new(Washer))
    }

    fn execute(handler: &mut CycleControl, command: CycleCommand) -> Result<Vec<Value>> {
        handler.call_method(
            &path(),
            "ExecuteOperationalCommand",
            &[command.to_value()],
        )
    }

    #[test]
    fn supported_command_changes_state() {
        let mut handler = handler();
        execute(&mut handler, CycleCommand::Start).unwrap();
        assert_eq!(handler.properties().operational_state(), CycleState::Working);
        assert!(handler.drain_signals().is_empty());
    }

    #[test]
    fn unsupported_command_is_rejected() {
        let mut handler = handler();
        let err = execute(&mut handler, CycleCommand::Resume).unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::NotSupported { .. })));
        assert_eq!(err.error_name(), "org.alljoyn.SmartSpaces.Error.InvalidValue");
    }

    #[test]
    fn entering_end_of_cycle_queues_signal_once() {
        let mut handler = handler();
        execute(&mut handler, CycleCommand::Stop).unwrap();
        let signals = handler.drain_signals();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].member, "EndOfCycle");
        assert!(handler.drain_signals().is_empty());
    }

    #[test]
    fn local_state_change_also_signals() {
        let mut handler = handler();
        handler
            .properties_mut()
            .set_operational_state(CycleState::EndOfCycle)
            .unwrap();
        assert_eq!(handler.drain_signals().len(), 1);
    }

    #[test]
    fn unsupported_state_is_rejected() {
        let mut props = handler().properties().clone();
        assert!(props.set_operational_state(CycleState::DelayedStart).is_err());
    }
}
