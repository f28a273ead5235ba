// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bus object paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// A validated bus object path such as `/Cdm/AirConditioner`.
///
/// A path is either `/` or a sequence of `/`-prefixed segments made of ASCII
/// letters, digits and underscores. Empty segments and a trailing slash are
/// rejected.
///
/// # Examples
///
/// ```
/// use cdm_controllee::types::ObjectPath;
///
/// let path = ObjectPath::new("/Cdm/Oven").unwrap();
/// assert_eq!(path.as_str(), "/Cdm/Oven");
///
/// assert!(ObjectPath::new("Cdm/Oven").is_err());
/// assert!(ObjectPath::new("/Cdm/").is_err());
/// assert!(ObjectPath::new("/Cdm//Oven").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Creates a new object path.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidObjectPath` if the path is malformed.
    pub fn new(path: impl Into<String>) -> Result<Self, ValueError> {
        let path = path.into();
        if is_valid(&path) {
            Ok(Self(path))
        } else {
            Err(ValueError::InvalidObjectPath(path))
        }
    }

    /// Returns the root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a child path with the given segment appended.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidObjectPath` if the segment is not a valid
    /// path element.
    pub fn join(&self, segment: &str) -> Result<Self, ValueError> {
        if self.0 == "/" {
            Self::new(format!("/{segment}"))
        } else {
            Self::new(format!("{}/{segment}", self.0))
        }
    }
}

fn is_valid(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    rest.split('/').all(|segment| {
        !segment.is_empty()
            && segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectPath {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectPath {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ObjectPath {
    type Error = ValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectPath> for String {
    fn from(path: ObjectPath) -> Self {
        path.0
    }
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_valid() {
        assert_eq!(ObjectPath::new("/").unwrap(), ObjectPath::root());
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(ObjectPath::new("/Cdm/Air-Conditioner").is_err());
        assert!(ObjectPath::new("/Cdm/Air Conditioner").is_err());
        assert!(ObjectPath::new("").is_err());
    }

    #[test]
    fn join_appends_segment() {
        let root = ObjectPath::root();
        let cdm = root.join("Cdm").unwrap();
        assert_eq!(cdm.as_str(), "/Cdm");
        assert_eq!(cdm.join("Fan_1").unwrap().as_str(), "/Cdm/Fan_1");
        assert!(cdm.join("bad/segment/").is_err());
    }

    #[test]
    fn deserializes_with_validation() {
        let path: ObjectPath = serde_json::from_str("\"/Cdm/Washer\"").unwrap();
        assert_eq!(path.as_str(), "/Cdm/Washer");
        assert!(serde_json::from_str::<ObjectPath>("\"nope\"").is_err());
    }
}
