// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.AudioVideoInput`
//!
//! Selects the active input of a TV, receiver or set-top box among
//! the sources listed in `SupportedInputSources`.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_supported, unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{ObjectPath, Signature, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.AudioVideoInput",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("InputSourceId", "q"),
        PropertyDescriptor::read("SupportedInputSources", "a(qqyqs)"),
    ],
    methods: &[],
    signals: &[],
};

code_enum! {
    /// Whether a signal is detected on an input (`y` on the bus).
    #[derive(Default)]
    SignalPresence: u8 (from_u8, as_u8), "signal presence" {
        /// Detection not available.
        #[default]
        Unknown = 0,
        /// A signal is present.
        Present = 1,
        /// No signal.
        Absent = 2,
    }
}

/// An input source, marshalled as `(qqyqs)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    /// Identifier used by `InputSourceId`.
    pub id: u16,
    /// Source type code (tuner, HDMI, composite and so on).
    pub source_type: u16,
    /// Signal detection state.
    pub signal_presence: SignalPresence,
    /// Physical port number among ports of the same type.
    pub port_number: u16,
    /// Name shown to users.
    pub friendly_name: String,
}

impl InputSource {
    /// Creates an input source with unknown signal presence.
    #[must_use]
    pub fn new(id: u16, source_type: u16, port_number: u16, friendly_name: impl Into<String>) -> Self {
        Self {
            id,
            source_type,
            signal_presence: SignalPresence::Unknown,
            port_number,
            friendly_name: friendly_name.into(),
        }
    }
}

type InputSourceFields = (u16, u16, u8, u16, String);

impl Marshal for InputSource {
    fn signature() -> Signature {
        InputSourceFields::signature()
    }

    fn to_value(&self) -> Value {
        (
            self.id,
            self.source_type,
            self.signal_presence.as_u8(),
            self.port_number,
            self.friendly_name.clone(),
        )
            .to_value()
    }
}

impl Unmarshal for InputSource {
    fn from_value(value: &Value) -> Result<Self> {
        let (id, source_type, presence, port_number, friendly_name) =
            InputSourceFields::from_value(value)?;
        Ok(Self {
            id,
            source_type,
            signal_presence: SignalPresence::from_u8(presence)?,
            port_number,
            friendly_name,
        })
    }
}

/// Cached input selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioVideoInputProperties {
    input_source_id: u16,
    supported_input_sources: Vec<InputSource>,
}

impl AudioVideoInputProperties {
    /// Creates the properties with `input_source_id` selected.
    ///
    /// # Errors
    ///
    /// Returns a value error if no listed source has that id.
    pub fn new(input_source_id: u16, supported_input_sources: Vec<InputSource>) -> std::result::Result<Self, ValueError> {
        check_source(input_source_id, &supported_input_sources)?;
        Ok(Self {
            input_source_id,
            supported_input_sources,
        })
    }

    /// Returns the selected source id.
    #[must_use]
    pub fn input_source_id(&self) -> u16 {
        self.input_source_id
    }

    /// Selects a source.
    ///
    /// # Errors
    ///
    /// Returns a value error if no listed source has that id.
    pub fn set_input_source_id(&mut self, id: u16) -> std::result::Result<(), ValueError> {
        check_source(id, &self.supported_input_sources)?;
        self.input_source_id = id;
        Ok(())
    }

    /// Returns the supported sources.
    #[must_use]
    pub fn supported_input_sources(&self) -> &[InputSource] {
        &self.supported_input_sources
    }

    /// Replaces the supported sources.
    ///
    /// # Errors
    ///
    /// Returns a value error if the selected source is no longer listed.
    pub fn set_supported_input_sources(&mut self, sources: Vec<InputSource>) -> std::result::Result<(), ValueError> {
        check_source(self.input_source_id, &sources)?;
        self.supported_input_sources = sources;
        Ok(())
    }

    /// Updates the signal presence of one source.
    ///
    /// Returns `false` if no source has that id.
    pub fn set_signal_presence(&mut self, id: u16, presence: SignalPresence) -> bool {
        match self.supported_input_sources.iter_mut().find(|s| s.id == id) {
            Some(source) => {
                source.signal_presence = presence;
                true
            }
            None => false,
        }
    }
}

fn check_source(id: u16, sources: &[InputSource]) -> std::result::Result<(), ValueError> {
    let ids: Vec<u16> = sources.iter().map(|s| s.id).collect();
    check_supported(id, &ids)
}

/// Vendor callbacks for the audio/video input interface.
pub trait AudioVideoInputListener: Send + Sync {
    /// Switches to a listed input source.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_input_source_id(&self, _path: &ObjectPath, _id: u16) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.AudioVideoInput`.
pub struct AudioVideoInput {
    properties: AudioVideoInputProperties,
    listener: Option<Arc<dyn AudioVideoInputListener>>,
}

impl AudioVideoInput {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: AudioVideoInputProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn AudioVideoInputListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &AudioVideoInputProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut AudioVideoInputProperties {
        &mut self.properties
    }
}

impl fmt::Debug for AudioVideoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioVideoInput")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for AudioVideoInput {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::AudioVideoInput
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "InputSourceId" => Some(self.properties.input_source_id.to_value()),
            "SupportedInputSources" => Some(self.properties.supported_input_sources.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        if name != "InputSourceId" {
            return Err(unknown_property(self.interface_type(), name));
        }
        let id = u16::from_value(value)?;
        check_source(id, &self.properties.supported_input_sources)?;
        if let Some(listener) = &self.listener {
            listener.on_set_input_source_id(path, id)?;
        }
        self.properties.input_source_id = id;
        Ok(())
    }
}

impl Interface for AudioVideoInput {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::AudioVideoInput;
}
