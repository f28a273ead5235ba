// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.Alerts`
//!
//! The list of active warnings, alarms and faults. Alerts that need
//! acknowledgement stay listed until a controller acknowledges them; the
//! device removes the others itself through
//! [`AlertsProperties::remove_alert`].

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result};
use crate::interface::{
    Arg, Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, MethodDescriptor,
    PropertyDescriptor,
};
use crate::marshal::{Marshal, Unmarshal, arg};
use crate::types::{ObjectPath, Signature, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.Alerts",
    version: 1,
    properties: &[PropertyDescriptor::read("Alerts", "a(yqb)")],
    methods: &[
        MethodDescriptor {
            name: "GetAlertCodesDescription",
            inputs: &[Arg::new("languageTag", "s")],
            outputs: &[Arg::new("description", "a(qs)")],
        },
        MethodDescriptor {
            name: "AcknowledgeAlert",
            inputs: &[Arg::new("alertCode", "q")],
            outputs: &[],
        },
        MethodDescriptor {
            name: "AcknowledgeAllAlerts",
            inputs: &[],
            outputs: &[],
        },
    ],
    signals: &[],
};

code_enum! {
    /// How serious an alert is (`y` on the bus).
    #[derive(PartialOrd, Ord)]
    Severity: u8 (from_u8, as_u8), "alert severity" {
        /// Something needs attention soon.
        Warning = 0,
        /// Something needs attention now.
        Alarm = 1,
        /// The device cannot operate.
        Fault = 2,
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Alarm => write!(f, "alarm"),
            Self::Fault => write!(f, "fault"),
        }
    }
}

/// An active alert, marshalled as `(yqb)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    /// Severity.
    pub severity: Severity,
    /// Vendor alert code, described by `GetAlertCodesDescription`.
    pub code: u16,
    /// Whether a controller must acknowledge the alert to clear it.
    pub needs_acknowledgement: bool,
}

impl Alert {
    /// Creates an alert.
    #[must_use]
    pub fn new(severity: Severity, code: u16, needs_acknowledgement: bool) -> Self {
        Self {
            severity,
            code,
            needs_acknowledgement,
        }
    }
}

impl Marshal for Alert {
    fn signature() -> Signature {
        <(u8, u16, bool)>::signature()
    }

    fn to_value(&self) -> Value {
        (self.severity.as_u8(), self.code, self.needs_acknowledgement).to_value()
    }
}

impl Unmarshal for Alert {
    fn from_value(value: &Value) -> Result<Self> {
        let (severity, code, needs_acknowledgement) = <(u8, u16, bool)>::from_value(value)?;
        Ok(Self {
            severity: Severity::from_u8(severity)?,
            code,
            needs_acknowledgement,
        })
    }
}

/// Cached alert list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlertsProperties {
    alerts: Vec<Alert>,
}

impl AlertsProperties {
    /// Creates an alert list.
    #[must_use]
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    /// Returns the active alerts.
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Raises an alert, replacing any alert with the same code.
    pub fn raise(&mut self, alert: Alert) {
        match self.alerts.iter_mut().find(|a| a.code == alert.code) {
            Some(existing) => *existing = alert,
            None => self.alerts.push(alert),
        }
    }

    /// Removes the alert with `code`, returning it.
    pub fn remove_alert(&mut self, code: u16) -> Option<Alert> {
        let index = self.alerts.iter().position(|a| a.code == code)?;
        Some(self.alerts.remove(index))
    }

    /// Replaces the whole list.
    pub fn set_alerts(&mut self, alerts: Vec<Alert>) {
        self.alerts = alerts;
    }

    fn acknowledgeable(&self, code: u16) -> bool {
        self.alerts
            .iter()
            .any(|a| a.code == code && a.needs_acknowledgement)
    }
}

/// Vendor callbacks for the alerts interface.
pub trait AlertsListener: Send + Sync {
    /// Returns `(code, description)` pairs in the requested language.
    ///
    /// # Errors
    ///
    /// Returns `LanguageNotSupported` for unknown languages. The default
    /// returns `FeatureNotAvailable`.
    fn on_get_alert_codes_description(
        &self,
        _path: &ObjectPath,
        _language: &str,
    ) -> std::result::Result<Vec<(u16, String)>, CdmError> {
        Err(CdmError::FeatureNotAvailable)
    }

    /// Called before an acknowledgeable alert is removed.
    ///
    /// # Errors
    ///
    /// Returns a device error to keep the alert.
    fn on_acknowledge_alert(&self, _path: &ObjectPath, _code: u16) -> std::result::Result<(), CdmError> {
        Ok(())
    }

    /// Called before every acknowledgeable alert is removed.
    ///
    /// # Errors
    ///
    /// Returns a device error to keep the alerts.
    fn on_acknowledge_all_alerts(&self, _path: &ObjectPath) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.Alerts`.
pub struct Alerts {
    properties: AlertsProperties,
    listener: Option<Arc<dyn AlertsListener>>,
}

impl Alerts {
    /// Creates the handler with the given initial alerts.
    #[must_use]
    pub fn new(properties: AlertsProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn AlertsListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached alerts.
    #[must_use]
    pub fn properties(&self) -> &AlertsProperties {
        &self.properties
    }

    /// Returns the cached alerts for modification.
    pub fn properties_mut(&mut self) -> &mut AlertsProperties {
        &mut self.properties
    }

    fn describe(&self, path: &ObjectPath, language: &str) -> Result<Vec<Value>> {
        let listener = self.listener.as_ref().ok_or(CdmError::FeatureNotAvailable)?;
        let descriptions = listener.on_get_alert_codes_description(path, language)?;
        Ok(vec![descriptions.to_value()])
    }

    fn acknowledge(&mut self, path: &ObjectPath, code: u16) -> Result<Vec<Value>> {
        if !self.properties.acknowledgeable(code) {
            return Err(CdmError::InvalidValue.into());
        }
        if let Some(listener) = &self.listener {
            listener.on_acknowledge_alert(path, code)?;
        }
        self.properties.remove_alert(code);
        Ok(Vec::new())
    }

    fn acknowledge_all(&mut self, path: &ObjectPath) -> Result<Vec<Value>> {
        if let Some(listener) = &self.listener {
            listener.on_acknowledge_all_alerts(path)?;
        }
        self.properties.alerts.retain(|a| !a.needs_acknowledgement);
        Ok(Vec::new())
    }
}

impl fmt::Debug for Alerts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alerts")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for Alerts {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::Alerts
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "Alerts").then(|| self.properties.alerts.to_value())
    }

    fn call_method(&mut self, path: &ObjectPath, member: &str, args: &[Value]) -> Result<Vec<Value>> {
        match member {
            "GetAlertCodesDescription" => self.describe(path, &arg::<String>(args, 0)?),
            "AcknowledgeAlert" => self.acknowledge(path, arg(args, 0)?),
            "AcknowledgeAllAlerts" => self.acknowledge_all(path),
            _ => Err(crate::Error::UnknownMember {
                interface: DESCRIPTOR.name.to_string(),
                member: member.to_string(),
            }),
        }
    }
}

impl Interface for Alerts {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::Alerts;
}
