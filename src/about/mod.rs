// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! About metadata and announcement content.
//!
//! A controllee advertises itself with the sessionless
//! `org.alljoyn.About.Announce` signal, carrying the announced subset of its
//! [`AboutData`] and an [`ObjectDescription`] listing every object and the
//! interfaces it implements. Controllers can then fetch the full metadata
//! with `GetAboutData`.

mod data;
mod device_type;

use std::collections::{BTreeMap, BTreeSet};

pub use data::{AboutData, Localized};
pub use device_type::{DeviceType, DeviceTypeEntry};

use crate::marshal::Marshal;
use crate::types::{ObjectPath, Signature, Value};

/// Object path of the About object.
pub const ABOUT_PATH: &str = "/About";

/// Version of the `org.alljoyn.About` interface.
pub const ABOUT_VERSION: u16 = 1;

/// The objects of an application and the interfaces each implements.
///
/// Marshals as `a(oas)`, sorted by path then interface name.
///
/// # Examples
///
/// ```
/// use cdm_controllee::about::ObjectDescription;
/// use cdm_controllee::marshal::Marshal;
/// use cdm_controllee::types::ObjectPath;
///
/// let mut description = ObjectDescription::new();
/// let path = ObjectPath::new("/Cdm/Fan").unwrap();
/// description.add(&path, "org.alljoyn.SmartSpaces.Operation.OnOffStatus");
/// description.add(&path, "org.alljoyn.SmartSpaces.Operation.FanSpeedLevel");
///
/// assert_eq!(description.to_value().signature().as_str(), "a(oas)");
/// assert_eq!(description.interfaces(&path).count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectDescription {
    objects: BTreeMap<ObjectPath, BTreeSet<String>>,
}

impl ObjectDescription {
    /// Creates an empty description.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `path` implements `interface`.
    pub fn add(&mut self, path: &ObjectPath, interface: impl Into<String>) {
        self.objects
            .entry(path.clone())
            .or_default()
            .insert(interface.into());
    }

    /// Returns `true` if no object is described.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates over the described object paths.
    pub fn paths(&self) -> impl Iterator<Item = &ObjectPath> {
        self.objects.keys()
    }

    /// Iterates over the interfaces of `path`.
    pub fn interfaces(&self, path: &ObjectPath) -> impl Iterator<Item = &str> {
        self.objects
            .get(path)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }
}

impl Marshal for ObjectDescription {
    fn signature() -> Signature {
        Signature::trusted("a(oas)")
    }

    fn to_value(&self) -> Value {
        Value::Array {
            element: Signature::trusted("(oas)"),
            items: self
                .objects
                .iter()
                .map(|(path, names)| {
                    let names: Vec<String> = names.iter().cloned().collect();
                    Value::Struct(vec![path.to_value(), names.to_value()])
                })
                .collect(),
        }
    }
}
