// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dynamically typed message values.

use crate::error::MarshalError;

use super::{ObjectPath, Signature};

/// A single message value.
///
/// This is the in-memory form of a message argument before the bus encodes
/// it. Arrays and dictionaries carry their element signatures so that empty
/// containers still have a well-defined type.
///
/// # Examples
///
/// ```
/// use cdm_controllee::types::{Signature, Value};
///
/// let levels = Value::array(
///     Signature::new("y").unwrap(),
///     vec![Value::Byte(1), Value::Byte(2)],
/// )
/// .unwrap();
/// assert_eq!(levels.signature().as_str(), "ay");
///
/// let empty = Value::array(Signature::new("(yqb)").unwrap(), Vec::new()).unwrap();
/// assert_eq!(empty.signature().as_str(), "a(yqb)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `y`
    Byte(u8),
    /// `b`
    Boolean(bool),
    /// `n`
    Int16(i16),
    /// `q`
    UInt16(u16),
    /// `i`
    Int32(i32),
    /// `u`
    UInt32(u32),
    /// `x`
    Int64(i64),
    /// `t`
    UInt64(u64),
    /// `d`
    Double(f64),
    /// `s`
    String(String),
    /// `o`
    ObjectPath(ObjectPath),
    /// `g`
    Signature(Signature),
    /// `v`
    Variant(Box<Value>),
    /// `aT`
    Array {
        /// Signature of every element.
        element: Signature,
        /// The elements.
        items: Vec<Value>,
    },
    /// `(...)`
    Struct(Vec<Value>),
    /// `a{KV}`
    Dict {
        /// Signature of every key.
        key: Signature,
        /// Signature of every value.
        value: Signature,
        /// The entries, in insertion order.
        entries: Vec<(Value, Value)>,
    },
}

impl Value {
    /// Returns the type signature of this value.
    #[must_use]
    pub fn signature(&self) -> Signature {
        let code = match self {
            Self::Byte(_) => "y",
            Self::Boolean(_) => "b",
            Self::Int16(_) => "n",
            Self::UInt16(_) => "q",
            Self::Int32(_) => "i",
            Self::UInt32(_) => "u",
            Self::Int64(_) => "x",
            Self::UInt64(_) => "t",
            Self::Double(_) => "d",
            Self::String(_) => "s",
            Self::ObjectPath(_) => "o",
            Self::Signature(_) => "g",
            Self::Variant(_) => "v",
            Self::Array { element, .. } => return Signature::trusted(format!("a{element}")),
            Self::Struct(fields) => {
                let inner: String = fields.iter().map(|f| f.signature().to_string()).collect();
                return Signature::trusted(format!("({inner})"));
            }
            Self::Dict { key, value, .. } => {
                return Signature::trusted(format!("a{{{key}{value}}}"));
            }
        };
        Signature::trusted(code)
    }

    /// Creates an array, checking that every item matches `element`.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::SignatureMismatch` for the first item whose
    /// signature differs from `element`.
    pub fn array(element: Signature, items: Vec<Value>) -> Result<Self, MarshalError> {
        for item in &items {
            let actual = item.signature();
            if actual != element {
                return Err(MarshalError::SignatureMismatch {
                    expected: element.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(Self::Array { element, items })
    }

    /// Wraps a value in a variant.
    #[must_use]
    pub fn variant(inner: Value) -> Self {
        Self::Variant(Box::new(inner))
    }

    /// Creates an `a{sv}` dictionary from named values.
    ///
    /// Each value is wrapped in a variant.
    #[must_use]
    pub fn string_variant_dict<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Dict {
            key: Signature::trusted("s"),
            value: Signature::trusted("v"),
            entries: entries
                .into_iter()
                .map(|(k, v)| (Self::String(k.into()), Self::variant(v)))
                .collect(),
        }
    }

    /// Returns the content of a variant, one level deep.
    #[must_use]
    pub fn variant_inner(&self) -> Option<&Value> {
        match self {
            Self::Variant(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns the content of a variant, or the value itself otherwise.
    ///
    /// Nested variants are unwrapped completely.
    #[must_use]
    pub fn unwrap_variant(&self) -> &Value {
        match self {
            Self::Variant(inner) => inner.unwrap_variant(),
            other => other,
        }
    }

    /// Looks up a string key in an `a{s...}` dictionary.
    #[must_use]
    pub fn dict_get(&self, name: &str) -> Option<&Value> {
        let Self::Dict { entries, .. } = self else {
            return None;
        };
        entries.iter().find_map(|(k, v)| match k {
            Self::String(key) if key == name => Some(v),
            _ => None,
        })
    }
}
