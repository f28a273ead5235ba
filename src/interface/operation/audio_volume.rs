// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.AudioVolume`

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_range, unknown_property,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.AudioVolume",
    version: 1,
    properties: &[
        PropertyDescriptor::read_write("Volume", "y"),
        PropertyDescriptor::read("MaxVolume", "y"),
        PropertyDescriptor::read_write("Mute", "b"),
    ],
    methods: &[],
    signals: &[],
};

/// Cached volume state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioVolumeProperties {
    volume: u8,
    max_volume: u8,
    mute: bool,
}

impl AudioVolumeProperties {
    /// Creates an unmuted volume at 0.
    #[must_use]
    pub fn new(max_volume: u8) -> Self {
        Self {
            volume: 0,
            max_volume,
            mute: false,
        }
    }

    /// Returns the volume.
    #[must_use]
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Sets the volume.
    ///
    /// # Errors
    ///
    /// Returns a value error above the maximum.
    pub fn set_volume(&mut self, volume: u8) -> std::result::Result<(), ValueError> {
        check_range(volume, 0, self.max_volume)?;
        self.volume = volume;
        Ok(())
    }

    /// Returns the highest volume.
    #[must_use]
    pub fn max_volume(&self) -> u8 {
        self.max_volume
    }

    /// Sets the highest volume.
    ///
    /// # Errors
    ///
    /// Returns a value error if the current volume exceeds it.
    pub fn set_max_volume(&mut self, max: u8) -> std::result::Result<(), ValueError> {
        check_range(self.volume, 0, max)?;
        self.max_volume = max;
        Ok(())
    }

    /// Returns whether the output is muted.
    #[must_use]
    pub fn mute(&self) -> bool {
        self.mute
    }

    /// Mutes or unmutes the output.
    pub fn set_mute(&mut self, mute: bool) {
        self.mute = mute;
    }
}

/// Vendor callbacks for the audio volume interface.
pub trait AudioVolumeListener: Send + Sync {
    /// Applies a new volume.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_volume(&self, _path: &ObjectPath, _volume: u8) -> std::result::Result<(), CdmError> {
        Ok(())
    }

    /// Mutes or unmutes the output.
    ///
    /// # Errors
    ///
    /// Returns a device error to refuse the change.
    fn on_set_mute(&self, _path: &ObjectPath, _mute: bool) -> std::result::Result<(), CdmError> {
        Ok(())
    }
}

/// Handler for `Operation.AudioVolume`.
pub struct AudioVolume {
    properties: AudioVolumeProperties,
    listener: Option<Arc<dyn AudioVolumeListener>>,
}

impl AudioVolume {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: AudioVolumeProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn AudioVolumeListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &AudioVolumeProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut AudioVolumeProperties {
        &mut self.properties
    }
}

impl fmt::Debug for AudioVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioVolume")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for AudioVolume {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::AudioVolume
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "Volume" => Some(self.properties.volume.to_value()),
            "MaxVolume" => Some(self.properties.max_volume.to_value()),
            "Mute" => Some(self.properties.mute.to_value()),
            _ => None,
        }
    }

    fn set_property(&mut self, path: &ObjectPath, name: &str, value: &Value) -> Result<()> {
        match name {
            "Volume" => {
                let volume = u8::from_value(value)?;
                check_range(volume, 0, self.properties.max_volume)?;
                if let Some(listener) = &self.listener {
                    listener.on_set_volume(path, volume)?;
                }
                self.properties.volume = volume;
            }
            "Mute" => {
                let mute = bool::from_value(value)?;
                if let Some(listener) = &self.listener {
                    listener.on_set_mute(path, mute)?;
                }
                self.properties.mute = mute;
            }
            _ => return Err(unknown_property(self.interface_type(), name)),
        }
        Ok(())
    }
}

impl Interface for AudioVolume {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::AudioVolume;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> ObjectPath {
        ObjectPath::new("/Cdm/Tv").unwrap()
    }

    #[test]
    fn volume_and_mute_are_independent() {
        let mut handler = AudioVolume::new(AudioVolumeProperties::new(30));
        handler
            .set_property(&path(), "Volume", &Value::Byte(12))
            .unwrap();
        handler
            .set_property(&path(), "Mute", &Value::Boolean(true))
            .unwrap();
        assert_eq!(handler.properties().volume(), 12);
        assert!(handler.properties().mute());
    }

    #[test]
    fn volume_above_max_is_rejected() {
        let mut handler = AudioVolume::new(AudioVolumeProperties::new(30));
        assert!(
            handler
                .set_property(&path(), "Volume", &Value::Byte(31))
                .is_err()
        );
        assert_eq!(handler.property("Volume"), Some(Value::Byte(0)));
    }
}
