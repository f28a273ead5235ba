// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between typed Rust values and message [`Value`]s.
//!
//! [`Marshal`] turns a typed value into a [`Value`] and reports the static
//! signature of the type; [`Unmarshal`] does the reverse and checks that the
//! received value has the expected type.
//!
//! Tuples marshal as structs, so an alert record `(u8, u16, bool)` becomes a
//! `(yqb)` struct and `Vec<(u8, u16, bool)>` becomes `a(yqb)`.
//!
//! # Examples
//!
//! ```
//! use cdm_controllee::marshal::{Marshal, Unmarshal};
//!
//! let alerts: Vec<(u8, u16, bool)> = vec![(1, 0x8001, true)];
//! let value = alerts.to_value();
//! assert_eq!(value.signature().as_str(), "a(yqb)");
//!
//! let back = Vec::<(u8, u16, bool)>::from_value(&value).unwrap();
//! assert_eq!(back, alerts);
//! ```

use crate::error::{MarshalError, Result};
use crate::types::{ObjectPath, Signature, Value};

/// A type that can be converted into a message value.
pub trait Marshal {
    /// Returns the signature every value of this type has.
    fn signature() -> Signature;

    /// Converts the value into a message value.
    fn to_value(&self) -> Value;
}

/// A type that can be read back from a message value.
pub trait Unmarshal: Sized {
    /// Converts a message value into this type.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::SignatureMismatch` if the value has a different
    /// type, or a value error if the content is not a valid instance.
    fn from_value(value: &Value) -> Result<Self>;
}

/// Reads the method argument at `index`.
///
/// # Errors
///
/// Returns `MarshalError::MissingArgument` if there are too few arguments, or
/// the unmarshalling error of the argument itself.
pub fn arg<T: Unmarshal>(args: &[Value], index: usize) -> Result<T> {
    let value = args
        .get(index)
        .ok_or(MarshalError::MissingArgument(index))?;
    T::from_value(value)
}

/// Builds the error for a value that does not have the expected signature.
pub(crate) fn mismatch(expected: &Signature, actual: &Value) -> crate::Error {
    MarshalError::SignatureMismatch {
        expected: expected.to_string(),
        actual: actual.signature().to_string(),
    }
    .into()
}

macro_rules! basic_marshal {
    ($ty:ty, $variant:ident, $code:literal) => {
        impl Marshal for $ty {
            fn signature() -> Signature {
                Signature::trusted($code)
            }

            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }
        }

        impl Unmarshal for $ty {
            fn from_value(value: &Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(mismatch(&Self::signature(), other)),
                }
            }
        }
    };
}

basic_marshal!(u8, Byte, "y");
basic_marshal!(bool, Boolean, "b");
basic_marshal!(i16, Int16, "n");
basic_marshal!(u16, UInt16, "q");
basic_marshal!(i32, Int32, "i");
basic_marshal!(u32, UInt32, "u");
basic_marshal!(i64, Int64, "x");
basic_marshal!(u64, UInt64, "t");
basic_marshal!(f64, Double, "d");

impl Marshal for String {
    fn signature() -> Signature {
        Signature::trusted("s")
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Unmarshal for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch(&Self::signature(), other)),
        }
    }
}

impl Marshal for ObjectPath {
    fn signature() -> Signature {
        Signature::trusted("o")
    }

    fn to_value(&self) -> Value {
        Value::ObjectPath(self.clone())
    }
}

impl Unmarshal for ObjectPath {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::ObjectPath(path) => Ok(path.clone()),
            other => Err(mismatch(&Self::signature(), other)),
        }
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn signature() -> Signature {
        Signature::trusted(format!("a{}", T::signature()))
    }

    fn to_value(&self) -> Value {
        Value::Array {
            element: T::signature(),
            items: self.iter().map(Marshal::to_value).collect(),
        }
    }
}

impl<T: Marshal + Unmarshal> Unmarshal for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array { element, items } if *element == T::signature() => {
                items.iter().map(T::from_value).collect()
            }
            other => Err(mismatch(&Self::signature(), other)),
        }
    }
}

macro_rules! tuple_marshal {
    ($len:literal; $($name:ident : $idx:tt),+) => {
        impl<$($name: Marshal),+> Marshal for ($($name,)+) {
            fn signature() -> Signature {
                let mut sig = String::from("(");
                $(sig.push_str(<$name>::signature().as_str());)+
                sig.push(')');
                Signature::trusted(sig)
            }

            fn to_value(&self) -> Value {
                Value::Struct(vec![$(self.$idx.to_value()),+])
            }
        }

        impl<$($name: Marshal + Unmarshal),+> Unmarshal for ($($name,)+) {
            fn from_value(value: &Value) -> Result<Self> {
                let Value::Struct(fields) = value else {
                    return Err(mismatch(&Self::signature(), value));
                };
                if fields.len() != $len {
                    return Err(MarshalError::FieldCount {
                        expected: $len,
                        actual: fields.len(),
                    }
                    .into());
                }
                Ok(($(<$name>::from_value(&fields[$idx])?,)+))
            }
        }
    };
}

tuple_marshal!(2; A: 0, B: 1);
tuple_marshal!(3; A: 0, B: 1, C: 2);
tuple_marshal!(4; A: 0, B: 1, C: 2, D: 3);
tuple_marshal!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
