// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bus message types exchanged with the controllee.
//!
//! The bus stack decodes incoming messages into a [`MethodCall`], the
//! controllee answers with a [`MethodReply`], and state changes leave as
//! [`Signal`]s. Byte-level encoding is the bus stack's concern.

use crate::error::Error;
use crate::types::{ObjectPath, Signature, Value};

/// Standard properties interface.
pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Standard introspection interface.
pub const INTROSPECTABLE_INTERFACE: &str = "org.freedesktop.DBus.Introspectable";

/// About interface used for announcement and device metadata.
pub const ABOUT_INTERFACE: &str = "org.alljoyn.About";

/// An incoming method call.
///
/// # Examples
///
/// ```
/// use cdm_controllee::message::{MethodCall, PROPERTIES_INTERFACE};
/// use cdm_controllee::types::{ObjectPath, Value};
///
/// let call = MethodCall::new(
///     ObjectPath::new("/Cdm/Fan").unwrap(),
///     PROPERTIES_INTERFACE,
///     "Get",
///     vec![
///         Value::String("org.alljoyn.SmartSpaces.Operation.FanSpeedLevel".into()),
///         Value::String("FanSpeedLevel".into()),
///     ],
/// );
/// assert_eq!(call.signature().as_str(), "ss");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Serial number assigned by the sender.
    pub serial: u32,
    /// Unique name of the caller, if known.
    pub sender: Option<String>,
    /// Target object.
    pub path: ObjectPath,
    /// Target interface name.
    pub interface: String,
    /// Method name.
    pub member: String,
    /// Method arguments.
    pub args: Vec<Value>,
}

impl MethodCall {
    /// Creates a method call with serial 0 and no sender.
    #[must_use]
    pub fn new(
        path: ObjectPath,
        interface: impl Into<String>,
        member: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            serial: 0,
            sender: None,
            path,
            interface: interface.into(),
            member: member.into(),
            args,
        }
    }

    /// Sets the serial number.
    #[must_use]
    pub fn with_serial(mut self, serial: u32) -> Self {
        self.serial = serial;
        self
    }

    /// Sets the sender name.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Returns the signature of the argument list.
    #[must_use]
    pub fn signature(&self) -> Signature {
        body_signature(&self.args)
    }
}

/// The error part of an error reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply {
    /// Bus error name, e.g. `org.alljoyn.SmartSpaces.Error.InvalidValue`.
    pub name: String,
    /// Human readable message.
    pub message: String,
}

/// The answer to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReply {
    /// Serial of the call this reply answers.
    pub reply_serial: u32,
    /// Destination of the reply (the caller).
    pub destination: Option<String>,
    /// Reply values or the error.
    pub body: Result<Vec<Value>, ErrorReply>,
}

impl MethodReply {
    /// Creates a successful reply to `call`.
    #[must_use]
    pub fn ok(call: &MethodCall, args: Vec<Value>) -> Self {
        Self {
            reply_serial: call.serial,
            destination: call.sender.clone(),
            body: Ok(args),
        }
    }

    /// Creates an error reply to `call`.
    #[must_use]
    pub fn error(call: &MethodCall, error: &Error) -> Self {
        Self {
            reply_serial: call.serial,
            destination: call.sender.clone(),
            body: Err(ErrorReply {
                name: error.error_name(),
                message: error.to_string(),
            }),
        }
    }

    /// Returns `true` if this is an error reply.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.body.is_err()
    }

    /// Returns the error name of an error reply.
    #[must_use]
    pub fn error_name(&self) -> Option<&str> {
        self.body.as_ref().err().map(|e| e.name.as_str())
    }

    /// Returns the reply values of a successful reply.
    #[must_use]
    pub fn values(&self) -> Option<&[Value]> {
        self.body.as_ref().ok().map(Vec::as_slice)
    }
}

/// An outgoing signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Emitting object.
    pub path: ObjectPath,
    /// Interface the signal belongs to.
    pub interface: String,
    /// Signal name.
    pub member: String,
    /// Signal arguments.
    pub args: Vec<Value>,
    /// Whether the signal is broadcast without a session.
    pub sessionless: bool,
}

impl Signal {
    /// Creates a session-bound signal.
    #[must_use]
    pub fn new(
        path: ObjectPath,
        interface: impl Into<String>,
        member: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            path,
            interface: interface.into(),
            member: member.into(),
            args,
            sessionless: false,
        }
    }

    /// Marks the signal as sessionless.
    #[must_use]
    pub fn sessionless(mut self) -> Self {
        self.sessionless = true;
        self
    }

    /// Builds a `PropertiesChanged(s a{sv} as)` signal.
    ///
    /// # Examples
    ///
    /// ```
    /// use cdm_controllee::message::Signal;
    /// use cdm_controllee::types::{ObjectPath, Value};
    ///
    /// let signal = Signal::properties_changed(
    ///     ObjectPath::new("/Cdm/Light").unwrap(),
    ///     "org.alljoyn.SmartSpaces.Operation.OnOffStatus",
    ///     vec![("IsOn".to_string(), Value::Boolean(true))],
    /// );
    /// assert_eq!(signal.member, "PropertiesChanged");
    /// assert_eq!(signal.signature().as_str(), "sa{sv}as");
    /// ```
    #[must_use]
    pub fn properties_changed(
        path: ObjectPath,
        interface: &str,
        changed: Vec<(String, Value)>,
    ) -> Self {
        let invalidated = Value::Array {
            element: Signature::trusted("s"),
            items: Vec::new(),
        };
        Self::new(
            path,
            PROPERTIES_INTERFACE,
            "PropertiesChanged",
            vec![
                Value::String(interface.to_string()),
                Value::string_variant_dict(changed),
                invalidated,
            ],
        )
    }

    /// Returns the signature of the argument list.
    #[must_use]
    pub fn signature(&self) -> Signature {
        body_signature(&self.args)
    }

    /// For a `PropertiesChanged` signal, returns the changed value of
    /// `property`.
    #[must_use]
    pub fn changed_property(&self, property: &str) -> Option<&Value> {
        if self.interface != PROPERTIES_INTERFACE || self.member != "PropertiesChanged" {
            return None;
        }
        self.args
            .get(1)
            .and_then(|dict| dict.dict_get(property))
            .map(Value::unwrap_variant)
    }
}

fn body_signature(args: &[Value]) -> Signature {
    let sig: String = args.iter().map(|a| a.signature().to_string()).collect();
    Signature::trusted(sig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CdmError;

    fn path() -> ObjectPath {
        ObjectPath::new("/Cdm/Test").unwrap()
    }

    #[test]
    fn reply_copies_serial_and_sender() {
        let call = MethodCall::new(path(), "x.y", "Z", Vec::new())
            .with_serial(42)
            .with_sender(":1.7");
        let reply = MethodReply::ok(&call, vec![Value::Byte(1)]);
        assert_eq!(reply.reply_serial, 42);
        assert_eq!(reply.destination.as_deref(), Some(":1.7"));
        assert_eq!(reply.values(), Some(&[Value::Byte(1)][..]));
        assert!(!reply.is_error());
    }

    #[test]
    fn error_reply_uses_error_name() {
        let call = MethodCall::new(path(), "x.y", "Z", Vec::new());
        let reply = MethodReply::error(&call, &CdmError::FeatureNotAvailable.into());
        assert!(reply.is_error());
        assert_eq!(
            reply.error_name(),
            Some("org.alljoyn.SmartSpaces.Error.FeatureNotAvailable")
        );
        assert!(reply.values().is_none());
    }

    #[test]
    fn changed_property_reads_back_value() {
        let signal = Signal::properties_changed(
            path(),
            "org.alljoyn.SmartSpaces.Operation.AudioVolume",
            vec![("Volume".to_string(), Value::Byte(12))],
        );
        assert_eq!(signal.changed_property("Volume"), Some(&Value::Byte(12)));
        assert_eq!(signal.changed_property("Mute"), None);
        assert!(!signal.sessionless);
    }

    #[test]
    fn changed_property_ignores_other_signals() {
        let signal = Signal::new(path(), "x.y", "EndOfCycle", Vec::new());
        assert!(signal.changed_property("Anything").is_none());
    }
}
