// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.PlugInUnits`
//!
//! The detachable units (for example a cooler drawer or an ice maker) an
//! appliance supports, and whether each one is currently plugged in.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
};
use crate::marshal::{Marshal, Unmarshal};
use crate::types::{ObjectPath, Signature, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.PlugInUnits",
    version: 1,
    properties: &[PropertyDescriptor::read("PlugInUnits", "a(oub)")],
    methods: &[],
    signals: &[],
};

/// A detachable unit, marshalled as `(oub)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlugInUnit {
    /// Object path under which the unit's own interfaces live.
    pub object_path: ObjectPath,
    /// Device type code of the unit.
    pub device_type: u32,
    /// Whether the unit is attached.
    pub plugged_in: bool,
}

impl PlugInUnit {
    /// Creates a unit description.
    #[must_use]
    pub fn new(object_path: ObjectPath, device_type: u32, plugged_in: bool) -> Self {
        Self {
            object_path,
            device_type,
            plugged_in,
        }
    }
}

impl Marshal for PlugInUnit {
    fn signature() -> Signature {
        <(ObjectPath, u32, bool)>::signature()
    }

    fn to_value(&self) -> Value {
        (self.object_path.clone(), self.device_type, self.plugged_in).to_value()
    }
}

impl Unmarshal for PlugInUnit {
    fn from_value(value: &Value) -> Result<Self> {
        let (object_path, device_type, plugged_in) = <(ObjectPath, u32, bool)>::from_value(value)?;
        Ok(Self {
            object_path,
            device_type,
            plugged_in,
        })
    }
}

/// Vendor callbacks for the plug-in units interface.
pub trait PlugInUnitsListener: Send + Sync {
    /// Reads the live unit list; `Ok(None)` serves the cache.
    ///
    /// # Errors
    ///
    /// Returns a device error if the units cannot be enumerated.
    fn on_get_plug_in_units(&self, _path: &ObjectPath) -> std::result::Result<Option<Vec<PlugInUnit>>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Operation.PlugInUnits`.
pub struct PlugInUnits {
    units: Vec<PlugInUnit>,
    listener: Option<Arc<dyn PlugInUnitsListener>>,
}

impl PlugInUnits {
    /// Creates the handler with the given units.
    #[must_use]
    pub fn new(units: Vec<PlugInUnit>) -> Self {
        Self {
            units,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn PlugInUnitsListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached units.
    #[must_use]
    pub fn units(&self) -> &[PlugInUnit] {
        &self.units
    }

    /// Replaces the cached units.
    pub fn set_units(&mut self, units: Vec<PlugInUnit>) {
        self.units = units;
    }

    /// Marks the unit at `path` as plugged in or out.
    ///
    /// Returns `false` if no unit has that path.
    pub fn set_plugged_in(&mut self, path: &ObjectPath, plugged_in: bool) -> bool {
        match self.units.iter_mut().find(|u| &u.object_path == path) {
            Some(unit) => {
                unit.plugged_in = plugged_in;
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for PlugInUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlugInUnits")
            .field("units", &self.units)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for PlugInUnits {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::PlugInUnits
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "PlugInUnits").then(|| self.units.to_value())
    }

    fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
        if name == "PlugInUnits"
            && let Some(listener) = &self.listener
            && let Some(units) = listener.on_get_plug_in_units(path)?
        {
            self.units = units;
        }
        Ok(())
    }
}

impl Interface for PlugInUnits {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::PlugInUnits;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawer() -> PlugInUnit {
        PlugInUnit::new(ObjectPath::new("/Cdm/Fridge/Drawer").unwrap(), 3, false)
    }

    #[test]
    fn units_marshal_as_struct_array() {
        let handler = PlugInUnits::new(vec![drawer()]);
        let value = handler.property("PlugInUnits").unwrap();
        assert_eq!(value.signature().as_str(), "a(oub)");
        let back = Vec::<PlugInUnit>::from_value(&value).unwrap();
        assert_eq!(back, vec![drawer()]);
    }

    #[test]
    fn plugging_a_known_unit() {
        let mut handler = PlugInUnits::new(vec![drawer()]);
        assert!(handler.set_plugged_in(&drawer().object_path, true));
        assert!(handler.units()[0].plugged_in);
        assert!(!handler.set_plugged_in(&ObjectPath::new("/Cdm/Other").unwrap(), true));
    }
}
