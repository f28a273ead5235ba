// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Discrete target levels with an optional list of selectable values.

use crate::error::ValueError;

/// A target level in `0..=max_level`, optionally restricted to a list.
///
/// Shared by the interfaces that expose `MaxLevel`, `TargetLevel` and a
/// selectable-levels array (soil level, spin speed, temperature level).
/// When the selectable list is empty every level up to the maximum is
/// allowed.
///
/// # Examples
///
/// ```
/// use cdm_controllee::types::LevelSelection;
///
/// let mut spin = LevelSelection::new(5, 2, vec![0, 2, 4]).unwrap();
/// spin.set_target_level(4).unwrap();
/// assert_eq!(spin.target_level(), 4);
///
/// // Not in the selectable list
/// assert!(spin.set_target_level(3).is_err());
/// // Above the maximum
/// assert!(spin.set_target_level(6).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelSelection {
    max_level: u8,
    target_level: u8,
    selectable_levels: Vec<u8>,
}

impl LevelSelection {
    /// Creates a level selection.
    ///
    /// # Errors
    ///
    /// Returns a value error if the target or any selectable level exceeds
    /// the maximum, or the target is not selectable.
    pub fn new(
        max_level: u8,
        target_level: u8,
        selectable_levels: Vec<u8>,
    ) -> Result<Self, ValueError> {
        check_levels(max_level, &selectable_levels)?;
        let selection = Self {
            max_level,
            target_level: 0,
            selectable_levels,
        };
        selection.check_target(target_level)?;
        Ok(Self {
            target_level,
            ..selection
        })
    }

    /// Returns the highest level.
    #[must_use]
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Returns the current target level.
    #[must_use]
    pub fn target_level(&self) -> u8 {
        self.target_level
    }

    /// Returns the selectable levels (empty when every level is allowed).
    #[must_use]
    pub fn selectable_levels(&self) -> &[u8] {
        &self.selectable_levels
    }

    /// Checks whether `level` would be accepted as a target.
    ///
    /// # Errors
    ///
    /// Returns a value error if the level exceeds the maximum or is not in
    /// the selectable list.
    pub fn check_target(&self, level: u8) -> Result<(), ValueError> {
        if level > self.max_level {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: i64::from(self.max_level),
                actual: i64::from(level),
            });
        }
        crate::interface::check_selectable(level, &self.selectable_levels)
    }

    /// Sets the target level.
    ///
    /// # Errors
    ///
    /// See [`check_target`](Self::check_target).
    pub fn set_target_level(&mut self, level: u8) -> Result<(), ValueError> {
        self.check_target(level)?;
        self.target_level = level;
        Ok(())
    }

    /// Sets the maximum level.
    ///
    /// # Errors
    ///
    /// Returns a value error if the current target or a selectable level
    /// would exceed the new maximum.
    pub fn set_max_level(&mut self, max_level: u8) -> Result<(), ValueError> {
        check_levels(max_level, &self.selectable_levels)?;
        if self.target_level > max_level {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: i64::from(max_level),
                actual: i64::from(self.target_level),
            });
        }
        self.max_level = max_level;
        Ok(())
    }

    /// Replaces the selectable levels.
    ///
    /// # Errors
    ///
    /// Returns a value error if a level exceeds the maximum or the current
    /// target is not in the new list.
    pub fn set_selectable_levels(&mut self, levels: Vec<u8>) -> Result<(), ValueError> {
        check_levels(self.max_level, &levels)?;
        crate::interface::check_selectable(self.target_level, &levels)?;
        self.selectable_levels = levels;
        Ok(())
    }
}

fn check_levels(max_level: u8, levels: &[u8]) -> Result<(), ValueError> {
    match levels.iter().find(|&&level| level > max_level) {
        Some(&level) => Err(ValueError::OutOfRange {
            min: 0,
            max: i64::from(max_level),
            actual: i64::from(level),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_allows_every_level() {
        let mut levels = LevelSelection::new(3, 0, Vec::new()).unwrap();
        for level in 0..=3 {
            levels.set_target_level(level).unwrap();
            assert_eq!(levels.target_level(), level);
        }
        assert!(levels.set_target_level(4).is_err());
    }

    #[test]
    fn new_rejects_unselectable_target() {
        assert!(LevelSelection::new(5, 1, vec![0, 2]).is_err());
        assert!(LevelSelection::new(5, 0, vec![0, 6]).is_err());
    }

    #[test]
    fn lowering_max_below_target_fails() {
        let mut levels = LevelSelection::new(5, 4, Vec::new()).unwrap();
        assert!(levels.set_max_level(3).is_err());
        assert_eq!(levels.max_level(), 5);
        levels.set_max_level(4).unwrap();
        assert_eq!(levels.max_level(), 4);
    }

    #[test]
    fn selectable_list_must_keep_target() {
        let mut levels = LevelSelection::new(5, 2, Vec::new()).unwrap();
        assert!(levels.set_selectable_levels(vec![1, 3]).is_err());
        levels.set_selectable_levels(vec![2, 3]).unwrap();
        assert_eq!(levels.selectable_levels(), &[2, 3]);
    }
}
