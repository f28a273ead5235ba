// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the controllee binding.
//!
//! This module provides the error hierarchy used across the crate: value
//! validation, message marshalling, application-level device errors reported
//! by listeners, bus delivery and configuration loading.
//!
//! Every error can be turned into a bus error name with
//! [`Error::error_name`], which is what the controllee puts in an error reply.

use thiserror::Error;

/// Error name prefix used by device-model application errors.
const CDM_ERROR_PREFIX: &str = "org.alljoyn.SmartSpaces.Error";

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A value did not pass validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A message body could not be marshalled or unmarshalled.
    #[error("marshal error: {0}")]
    Marshal(#[from] MarshalError),

    /// The device (through its listener) refused the request.
    #[error("device error: {0}")]
    Cdm(#[from] CdmError),

    /// The bus failed to deliver a message.
    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    /// The configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// No object is registered at the given path.
    #[error("no object at {0}")]
    ObjectNotFound(String),

    /// The object does not implement the requested interface.
    #[error("object {path} does not implement {interface}")]
    InterfaceNotFound {
        /// The object path that was searched.
        path: String,
        /// The interface name that was requested.
        interface: String,
    },

    /// The interface name is not one of the supported interfaces.
    #[error("unknown interface: {0}")]
    UnknownInterface(String),

    /// The interface has no property with this name.
    #[error("{interface} has no property {property}")]
    UnknownProperty {
        /// The interface name.
        interface: String,
        /// The property name.
        property: String,
    },

    /// The interface has no method or signal with this name.
    #[error("{interface} has no member {member}")]
    UnknownMember {
        /// The interface name.
        interface: String,
        /// The member name.
        member: String,
    },

    /// The property cannot be written over the bus.
    #[error("property {interface}.{property} is read-only")]
    PropertyReadOnly {
        /// The interface name.
        interface: String,
        /// The property name.
        property: String,
    },

    /// An interface of this type is already registered at the path.
    #[error("{interface} is already registered at {path}")]
    DuplicateInterface {
        /// The object path.
        path: String,
        /// The interface name.
        interface: String,
    },
}

impl Error {
    /// Returns the bus error name to use when replying with this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use cdm_controllee::error::{CdmError, Error};
    ///
    /// let err = Error::from(CdmError::RemoteControlDisabled);
    /// assert_eq!(
    ///     err.error_name(),
    ///     "org.alljoyn.SmartSpaces.Error.RemoteControlDisabled"
    /// );
    /// ```
    #[must_use]
    pub fn error_name(&self) -> String {
        match self {
            Self::Value(_) => CdmError::InvalidValue.error_name(),
            Self::Cdm(err) => err.error_name(),
            Self::Marshal(_) => "org.freedesktop.DBus.Error.InvalidArgs".to_string(),
            Self::ObjectNotFound(_) => "org.freedesktop.DBus.Error.UnknownObject".to_string(),
            Self::InterfaceNotFound { .. } | Self::UnknownInterface(_) => {
                "org.freedesktop.DBus.Error.UnknownInterface".to_string()
            }
            Self::UnknownProperty { .. } => {
                "org.freedesktop.DBus.Error.UnknownProperty".to_string()
            }
            Self::UnknownMember { .. } => "org.freedesktop.DBus.Error.UnknownMethod".to_string(),
            Self::PropertyReadOnly { .. } => {
                "org.freedesktop.DBus.Error.PropertyReadOnly".to_string()
            }
            Self::Bus(_) | Self::Config(_) | Self::DuplicateInterface { .. } => {
                "org.freedesktop.DBus.Error.Failed".to_string()
            }
        }
    }
}

/// Errors related to value validation and constraints.
///
/// These errors occur when a property setter or a constrained type receives
/// a value outside of what the interface allows.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// An integer value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A floating point value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRangeF64 {
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// A floating point value is NaN or infinite.
    #[error("value is not a finite number")]
    NotFinite,

    /// A minimum is greater than its maximum.
    #[error("minimum {min} is greater than maximum {max}")]
    InvertedRange {
        /// The minimum value.
        min: f64,
        /// The maximum value.
        max: f64,
    },

    /// The value is not one of the selectable or supported values.
    #[error("{value} is not one of the supported values {supported:?}")]
    NotSupported {
        /// The rejected value.
        value: i64,
        /// The values currently supported.
        supported: Vec<i64>,
    },

    /// An enumeration code is not known.
    #[error("unknown {kind} code {code}")]
    UnknownCode {
        /// The enumeration that was decoded.
        kind: &'static str,
        /// The raw code.
        code: i64,
    },

    /// Two related collections have different lengths.
    #[error("expected {expected} entries, got {actual}")]
    LengthMismatch {
        /// The expected number of entries.
        expected: usize,
        /// The number of entries provided.
        actual: usize,
    },

    /// An object path is malformed.
    #[error("invalid object path: {0:?}")]
    InvalidObjectPath(String),

    /// A type signature is malformed.
    #[error("invalid signature {signature:?}: {reason}")]
    InvalidSignature {
        /// The rejected signature.
        signature: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A required text field is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Errors raised while converting between typed values and message values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// A value has a different signature than expected.
    #[error("expected signature {expected:?}, got {actual:?}")]
    SignatureMismatch {
        /// The signature the schema requires.
        expected: String,
        /// The signature that was received.
        actual: String,
    },

    /// A message carries fewer arguments than required.
    #[error("missing argument {0}")]
    MissingArgument(usize),

    /// A struct value has the wrong number of fields.
    #[error("expected a struct with {expected} fields, got {actual}")]
    FieldCount {
        /// The expected number of fields.
        expected: usize,
        /// The number of fields received.
        actual: usize,
    },
}

/// Application errors defined by the device model.
///
/// Listeners return these to refuse a request; they travel back to the
/// remote caller as `org.alljoyn.SmartSpaces.Error.*` error replies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CdmError {
    /// The requested value is invalid.
    #[error("invalid value")]
    InvalidValue,

    /// The feature is not available on this device.
    #[error("feature not available")]
    FeatureNotAvailable,

    /// The requested language is not supported.
    #[error("language not supported")]
    LanguageNotSupported,

    /// The device cannot accept the request in its current state.
    #[error("not acceptable due to internal state")]
    NotAcceptableDueToInternalState,

    /// Remote control is disabled on the device.
    #[error("remote control disabled")]
    RemoteControlDisabled,
}

impl CdmError {
    /// Returns the bus error name for this error.
    #[must_use]
    pub fn error_name(&self) -> String {
        let suffix = match self {
            Self::InvalidValue => "InvalidValue",
            Self::FeatureNotAvailable => "FeatureNotAvailable",
            Self::LanguageNotSupported => "LanguageNotSupported",
            Self::NotAcceptableDueToInternalState => "NotAcceptableDueToInternalState",
            Self::RemoteControlDisabled => "RemoteControlDisabled",
        };
        format!("{CDM_ERROR_PREFIX}.{suffix}")
    }
}

/// Errors reported by a bus attachment.
#[derive(Debug, Error)]
pub enum BusError {
    /// The bus is not connected.
    #[error("bus is not connected")]
    NotConnected,

    /// The message could not be sent.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Errors related to loading a controllee configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is structurally valid but semantically wrong.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::NotFinite.into();
        assert!(matches!(err, Error::Value(ValueError::NotFinite)));
    }

    #[test]
    fn value_error_maps_to_invalid_value() {
        let err: Error = ValueError::Empty("DeviceName").into();
        assert_eq!(
            err.error_name(),
            "org.alljoyn.SmartSpaces.Error.InvalidValue"
        );
    }

    #[test]
    fn lookup_errors_map_to_dbus_names() {
        let err = Error::ObjectNotFound("/Cdm/Oven".to_string());
        assert_eq!(err.error_name(), "org.freedesktop.DBus.Error.UnknownObject");

        let err = Error::PropertyReadOnly {
            interface: "org.alljoyn.SmartSpaces.Operation.OnOffStatus".to_string(),
            property: "IsOn".to_string(),
        };
        assert_eq!(
            err.error_name(),
            "org.freedesktop.DBus.Error.PropertyReadOnly"
        );
    }

    #[test]
    fn marshal_error_display() {
        let err = MarshalError::SignatureMismatch {
            expected: "d".to_string(),
            actual: "s".to_string(),
        };
        assert_eq!(err.to_string(), "expected signature \"d\", got \"s\"");
    }

    #[test]
    fn cdm_error_names() {
        assert_eq!(
            CdmError::LanguageNotSupported.error_name(),
            "org.alljoyn.SmartSpaces.Error.LanguageNotSupported"
        );
        assert_eq!(
            CdmError::NotAcceptableDueToInternalState.error_name(),
            "org.alljoyn.SmartSpaces.Error.NotAcceptableDueToInternalState"
        );
    }
}
