// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type signatures for message values.
//!
//! A signature is a string of type codes describing zero or more complete
//! types, the way the bus describes message bodies and property types:
//!
//! | Code | Type |
//! |------|------|
//! | `y` | byte |
//! | `b` | boolean |
//! | `n` / `q` | int16 / uint16 |
//! | `i` / `u` | int32 / uint32 |
//! | `x` / `t` | int64 / uint64 |
//! | `d` | double |
//! | `s` / `o` / `g` | string / object path / signature |
//! | `v` | variant |
//! | `aT` | array of `T` |
//! | `(...)` | struct |
//! | `a{KV}` | dictionary with basic key `K` |

use std::fmt;

use crate::error::ValueError;

/// Maximum signature length accepted by the bus.
const MAX_SIGNATURE_LEN: usize = 255;

/// Maximum container nesting depth.
const MAX_DEPTH: usize = 32;

/// A validated type signature.
///
/// # Examples
///
/// ```
/// use cdm_controllee::types::Signature;
///
/// let sig = Signature::new("a(yqb)").unwrap();
/// assert_eq!(sig.complete_types(), vec!["a(yqb)"]);
///
/// let args = Signature::new("qqs").unwrap();
/// assert_eq!(args.complete_types(), vec!["q", "q", "s"]);
///
/// assert!(Signature::new("a{vs}").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature(String);

impl Signature {
    /// Creates a validated signature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidSignature` if the string is not a sequence
    /// of complete types.
    pub fn new(signature: impl Into<String>) -> Result<Self, ValueError> {
        let signature = signature.into();
        if let Err(reason) = validate(signature.as_bytes()) {
            return Err(ValueError::InvalidSignature { signature, reason });
        }
        Ok(Self(signature))
    }

    /// Wraps a signature produced from already validated parts.
    pub(crate) fn trusted(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    /// Returns the signature as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the signature describes no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits the signature into its complete types.
    #[must_use]
    pub fn complete_types(&self) -> Vec<&str> {
        let bytes = self.0.as_bytes();
        let mut types = Vec::new();
        let mut start = 0;
        while start < bytes.len() {
            // Validated at construction, so the parse cannot fail here.
            let Ok(end) = complete_type_end(bytes, start, 0) else {
                break;
            };
            types.push(&self.0[start..end]);
            start = end;
        }
        types
    }

    /// Returns `true` if the signature is exactly one complete type.
    #[must_use]
    pub fn is_single_type(&self) -> bool {
        self.complete_types().len() == 1
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Signature {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Signature {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Returns `true` for the codes of basic (non-container) types.
pub(crate) fn is_basic(code: u8) -> bool {
    matches!(
        code,
        b'y' | b'b' | b'n' | b'q' | b'i' | b'u' | b'x' | b't' | b'd' | b's' | b'o' | b'g'
    )
}

fn validate(bytes: &[u8]) -> Result<(), &'static str> {
    if bytes.len() > MAX_SIGNATURE_LEN {
        return Err("signature too long");
    }
    let mut pos = 0;
    while pos < bytes.len() {
        pos = complete_type_end(bytes, pos, 0)?;
    }
    Ok(())
}

/// Returns the index just past the complete type starting at `start`.
fn complete_type_end(bytes: &[u8], start: usize, depth: usize) -> Result<usize, &'static str> {
    if depth > MAX_DEPTH {
        return Err("nesting too deep");
    }
    let Some(&code) = bytes.get(start) else {
        return Err("incomplete type");
    };
    match code {
        c if is_basic(c) => Ok(start + 1),
        b'v' => Ok(start + 1),
        b'a' => {
            if bytes.get(start + 1) == Some(&b'{') {
                dict_entry_end(bytes, start + 1, depth + 1)
            } else {
                complete_type_end(bytes, start + 1, depth + 1)
            }
        }
        b'(' => {
            let mut pos = start + 1;
            if bytes.get(pos) == Some(&b')') {
                return Err("empty struct");
            }
            loop {
                match bytes.get(pos) {
                    Some(b')') => return Ok(pos + 1),
                    Some(_) => pos = complete_type_end(bytes, pos, depth + 1)?,
                    None => return Err("unterminated struct"),
                }
            }
        }
        b'{' => Err("dictionary entry outside of an array"),
        b')' | b'}' => Err("unbalanced closing bracket"),
        _ => Err("unknown type code"),
    }
}

fn dict_entry_end(bytes: &[u8], start: usize, depth: usize) -> Result<usize, &'static str> {
    let Some(&key) = bytes.get(start + 1) else {
        return Err("unterminated dictionary entry");
    };
    if !is_basic(key) {
        return Err("dictionary key must be a basic type");
    }
    let value_end = complete_type_end(bytes, start + 2, depth + 1)?;
    match bytes.get(value_end) {
        Some(b'}') => Ok(value_end + 1),
        Some(_) => Err("dictionary entry must have exactly two types"),
        None => Err("unterminated dictionary entry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_basic_types() {
        for code in ["y", "b", "n", "q", "i", "u", "x", "t", "d", "s", "o", "g", "v"] {
            assert!(Signature::new(code).is_ok(), "{code} should be valid");
        }
    }

    #[test]
    fn accepts_containers() {
        for sig in ["ay", "aq", "a(yqb)", "a(sss)", "a{sv}", "a(oas)", "a(qqyqs)", "aay"] {
            assert!(Signature::new(sig).is_ok(), "{sig} should be valid");
        }
    }

    #[test]
    fn empty_signature_is_valid() {
        let sig = Signature::new("").unwrap();
        assert!(sig.is_empty());
        assert!(sig.complete_types().is_empty());
    }

    #[test]
    fn rejects_malformed() {
        for sig in ["a", "(", "()", "(y", "a{y}", "a{yyy}", "{sv}", "z", "y)", "a{vs}"] {
            assert!(Signature::new(sig).is_err(), "{sig} should be rejected");
        }
    }

    #[test]
    fn rejects_deep_nesting() {
        let sig = "a".repeat(40) + "y";
        assert!(Signature::new(sig).is_err());
    }

    #[test]
    fn splits_complete_types() {
        let sig = Signature::new("sa{sv}as").unwrap();
        assert_eq!(sig.complete_types(), vec!["s", "a{sv}", "as"]);
        assert!(!sig.is_single_type());
        assert!(Signature::new("a(yqb)").unwrap().is_single_type());
    }
}
