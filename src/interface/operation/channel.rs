// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.Channel`
//!
//! Channel selection of a TV or radio. The channel list itself lives with
//! the vendor and is paged out through `GetChannelList`.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Arg, Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, MethodDescriptor,
    PendingSignal, PropertyDescriptor, SignalDescriptor, unknown_property,
};
use crate::marshal::{Marshal, Unmarshal, arg};
use crate::types::{ObjectPath, Signature, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.Channel",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("ChannelId", "s"),
        PropertyDescriptor::read("TotalNumberOfChannels", "q"),
    ],
    methods: &[MethodDescriptor {
        name: "GetChannelList",
        inputs: &[
            Arg::new("startingRecord", "q"),
            Arg::new("numRecords", "q"),
            Arg::new("languageTag", "s"),
        ],
        outputs: &[Arg::new("listOfChannelInfoRecords", "a(sss)")],
    }],
    signals: &[SignalDescriptor {
        name: "ChannelListChanged",
        args: &[],
        sessionless: false,
    }],
};

/// One channel list entry, marshalled as `(sss)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Identifier used by `ChannelId`.
    pub channel_id: String,
    /// Number shown to users, for instance `"7-2"`.
    pub channel_number: String,
    /// Station name.
    pub channel_name: String,
}

impl ChannelInfo {
    /// Creates a channel entry.
    #[must_use]
    pub fn new(
        channel_id: impl Into<String>,
        channel_number: impl Into<String>,
        channel_name: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            channel_number: channel_number.into(),
            channel_name: channel_name.into(),
        }
    }
}

impl Marshal for ChannelInfo {
    fn signature() -> Signature {
        <(String, String, String)>::signature()
    }

    fn to_value(&self) -> Value {
        (
            self.channel_id.clone(),
            self.channel_number.clone(),
            self.channel_name.clone(),
        )
            .to_value()
    }
}

impl Unmarshal for ChannelInfo {
    fn from_value(value: &Value) -> Result<Self> {
        let (channel_id, channel_number, channel_name) =
            <(String, String, String)>::from_value(value)?;
        Ok(Self {
            channel_id,
            channel_number,
            channel_name,
        })
    }
}

/// Cached channel state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelProperties {
    channel_id: String,
    total_number_of_channels: u16,
}

impl ChannelProperties {
    /// Creates the properties.
    ///
    /// # Errors
    ///
    /// Returns a value error if `channel_id` is empty.
    pub fn new(channel_id: impl Into<String>, total_number_of_channels: u16) -> std::result::Result<Self, ValueError> {
        let channel_id = channel_id.into();
        check_channel_id(&channel_id)?;
        Ok(Self {
            channel_id,
            total_number_of_channels,
        })
    }

    /// Returns the current channel id.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Tunes to a channel.
    ///
    /// # Errors
    ///
    /// Returns a value error if the id is empty.
    pub fn set_channel_id(&mut self, channel_id: impl Into<String>) -> std::result::Result<(), ValueError> {
        let channel_id = channel_id.into();
        check_channel_id(&channel_id)?;
        self.channel_id = channel_id;
        Ok(())
    }

    /// Returns the number of channels in the list.
    #[must_use]
    pub fn total_number_of_channels(&self) -> u16 {
        self.total_number_of_channels
    }

    /// Sets the number of channels in the list.
    pub fn set_total_number_of_channels(&mut self, total: u16) {
        self.total_number_of_channels = total;
    }
}

fn check_channel_id(id: &str) -> std::result::Result<(), ValueError> {
    if id.is_empty() {
        return Err(ValueError::Empty("ChannelId"));
    }
    Ok(())
}

/// Vendor callbacks for the channel interface.
pub trait ChannelListener: Send + Sync {
    /// Tunes to `channel_id`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for unknown channels.
    fn on_set_channel_id(&self, _path: &ObjectPath, _channel_id: &str) -> std::result::Result<(), CdmError> {
        Ok(())
    }

    /// Returns up to `count` channels starting at record `start`.
    ///
    /// `start` is already checked against `TotalNumberOfChannels`.
    ///
    /// # Errors
    ///
    /// Returns `LanguageNotSupported` for unknown languages. The default
    /// returns `FeatureNotAvailable`.
    fn on_get_channel_list(
        &self,
        _path: &ObjectPath,
        _start: u16,
        _count: u16,
        _language: &str,
    ) -> std::result::Result<Vec<ChannelInfo>, CdmError> {
        Err(CdmError::FeatureNotAvailable)
    }
}

/// Handler for `Operation.Channel`.
pub struct Channel {
    properties: ChannelProperties,
    listener: Option<Arc<dyn ChannelListener>>,
    pending: Vec<PendingSignal>,
}

impl Channel {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: ChannelProperties) -> Self {
        Self {
            properties,
            listener: None,
            pending: Vec::new(),
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn ChannelListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &ChannelProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut ChannelProperties {
        &mut self.properties
    }

    /// Queues `ChannelListChanged`, sent when the current update completes.
    pub fn channel_list_changed(&mut self) {
        self.pending.push(PendingSignal {
            member: "ChannelListChanged",
            args: Vec::new(),
        });
    }

    fn channel_list(&self, path: &ObjectPath, args: &[Value]) -> Result<Vec<Value>> {
        let start: u16 = arg(args, 0)?;
        let count: u16 = arg(args, 1)?;
        let language: String = arg(args, 2)?;
        if start >= self.properties.total_number_of_channels {
            return Err(CdmError::InvalidValue.into());
        }
        let listener = self.listener.as_ref().ok_or(CdmError::FeatureNotAvailable)?;
        let records = listener.on_get_channel_list(path, start, count, &language)?;
        Ok(vec![records.to_value()])
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl InterfaceHandler for Channel {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::Channel
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "ChannelId" => Some(self.properties.channel_id.to_value()),
            "TotalNumberOfChannels" => Some(self.properties.total_number_of_channels.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        if name != "ChannelId" {
            return Err(unknown_property(self.interface_type(), name));
        }
        let channel_id = String::from_value(value)?;
        check_channel_id(&channel_id)?;
        if let Some(listener) = &self.listener {
            listener.on_set_channel_id(path, &channel_id)?;
        }
        self.properties.channel_id = channel_id;
        Ok(())
    }

    fn call_method(&mut self, path: &ObjectPath, member: &str, args: &[Value]) -> Result<Vec<Value>> {
        if member == "GetChannelList" {
            return self.channel_list(path, args);
        }
        Err(crate::Error::UnknownMember {
            interface: DESCRIPTOR.name.to_string(),
            member: member.to_string(),
        })
    }

    fn drain_signals(&mut self) -> Vec<PendingSignal> {
        std::mem::take(&mut self.pending)
    }
}

impl Interface for Channel {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::Channel;
}
