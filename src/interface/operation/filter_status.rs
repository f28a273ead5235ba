// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `org.alljoyn.SmartSpaces.Operation.FilterStatus`
//!
//! Lifetime and ordering details of a replaceable or cleanable filter.
//! `OrderPercentage` is the remaining life at which a replacement should be
//! ordered; [`ORDER_NOT_SUPPORTED`] means the filter cannot be ordered.

use std::fmt;
use std::sync::Arc;

use crate::error::{CdmError, Result, ValueError};
use crate::interface::{
    Interface, InterfaceDescriptor, InterfaceHandler, InterfaceType, PropertyDescriptor,
    check_range,
};
use crate::marshal::Marshal;
use crate::types::{ObjectPath, Value};

pub(crate) static DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor {
    name: "org.alljoyn.SmartSpaces.Operation.FilterStatus",
    version: 1,
    properties: &[
        PropertyDescriptor::constant("ExpectedLifeInDays", "q"),
        PropertyDescriptor::constant("IsCleanable", "b"),
        PropertyDescriptor::constant("OrderPercentage", "y"),
        PropertyDescriptor::constant("Manufacturer", "s"),
        PropertyDescriptor::constant("PartNumber", "s"),
        PropertyDescriptor::constant("Url", "s"),
        PropertyDescriptor::read("LifeRemaining", "y"),
    ],
    methods: &[],
    signals: &[],
};

/// `OrderPercentage` value for filters that cannot be ordered.
pub const ORDER_NOT_SUPPORTED: u8 = 0xFF;

/// Cached filter state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterStatusProperties {
    expected_life_in_days: u16,
    is_cleanable: bool,
    order_percentage: u8,
    manufacturer: String,
    part_number: String,
    url: String,
    life_remaining: u8,
}

impl FilterStatusProperties {
    /// Creates the properties for a new filter with full remaining life.
    #[must_use]
    pub fn new(expected_life_in_days: u16, is_cleanable: bool) -> Self {
        Self {
            expected_life_in_days,
            is_cleanable,
            order_percentage: ORDER_NOT_SUPPORTED,
            life_remaining: 100,
            ..Self::default()
        }
    }

    /// Returns the expected filter life in days.
    #[must_use]
    pub fn expected_life_in_days(&self) -> u16 {
        self.expected_life_in_days
    }

    /// Returns whether the filter can be cleaned instead of replaced.
    #[must_use]
    pub fn is_cleanable(&self) -> bool {
        self.is_cleanable
    }

    /// Returns the order threshold in percent.
    #[must_use]
    pub fn order_percentage(&self) -> u8 {
        self.order_percentage
    }

    /// Sets the order threshold in percent, or [`ORDER_NOT_SUPPORTED`].
    ///
    /// # Errors
    ///
    /// Returns a value error for values between 101 and 254.
    pub fn set_order_percentage(&mut self, percent: u8) -> std::result::Result<(), ValueError> {
        if percent != ORDER_NOT_SUPPORTED {
            check_range(percent, 0, 100)?;
        }
        self.order_percentage = percent;
        Ok(())
    }

    /// Returns the filter manufacturer.
    #[must_use]
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Returns the part number for reordering.
    #[must_use]
    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    /// Returns the ordering URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sets the ordering details.
    pub fn set_ordering(
        &mut self,
        manufacturer: impl Into<String>,
        part_number: impl Into<String>,
        url: impl Into<String>,
    ) {
        self.manufacturer = manufacturer.into();
        self.part_number = part_number.into();
        self.url = url.into();
    }

    /// Returns the remaining life in percent.
    #[must_use]
    pub fn life_remaining(&self) -> u8 {
        self.life_remaining
    }

    /// Sets the remaining life in percent.
    ///
    /// # Errors
    ///
    /// Returns a value error above 100.
    pub fn set_life_remaining(&mut self, percent: u8) -> std::result::Result<(), ValueError> {
        check_range(percent, 0, 100)?;
        self.life_remaining = percent;
        Ok(())
    }
}

/// Vendor callbacks for the filter status interface.
pub trait FilterStatusListener: Send + Sync {
    /// Reads the live remaining life; `Ok(None)` serves the cache.
    ///
    /// # Errors
    ///
    /// Returns a device error if the filter cannot be inspected.
    fn on_get_life_remaining(&self, _path: &ObjectPath) -> std::result::Result<Option<u8>, CdmError> {
        Ok(None)
    }
}

/// Handler for `Operation.FilterStatus`.
pub struct FilterStatus {
    properties: FilterStatusProperties,
    listener: Option<Arc<dyn FilterStatusListener>>,
}

impl FilterStatus {
    /// Creates the handler with the given initial properties.
    #[must_use]
    pub fn new(properties: FilterStatusProperties) -> Self {
        Self {
            properties,
            listener: None,
        }
    }

    /// Sets the vendor listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn FilterStatusListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Returns the cached properties.
    #[must_use]
    pub fn properties(&self) -> &FilterStatusProperties {
        &self.properties
    }

    /// Returns the cached properties for modification.
    pub fn properties_mut(&mut self) -> &mut FilterStatusProperties {
        &mut self.properties
    }
}

impl fmt::Debug for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStatus")
            .field("properties", &self.properties)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl InterfaceHandler for FilterStatus {
    fn interface_type(&self) -> InterfaceType {
        InterfaceType::FilterStatus
    }

    fn property(&self, name: &str) -> Option<Value> {
        let props = &self.properties;
        match name {
            "ExpectedLifeInDays" => Some(props.expected_life_in_days.to_value()),
            "IsCleanable" => Some(props.is_cleanable.to_value()),
            "OrderPercentage" => Some(props.order_percentage.to_value()),
            "Manufacturer" => Some(props.manufacturer.to_value()),
            "PartNumber" => Some(props.part_number.to_value()),
            "Url" => Some(props.url.to_value()),
            "LifeRemaining" => Some(props.life_remaining.to_value()),
            _ => None,
        }
    }

    fn refresh(&mut self, path: &ObjectPath, name: &str) -> Result<()> {
        if name == "LifeRemaining"
            && let Some(listener) = &self.listener
            && let Some(percent) = listener.on_get_life_remaining(path)?
        {
            self.properties.set_life_remaining(percent)?;
        }
        Ok(())
    }
}

impl Interface for FilterStatus {
    const INTERFACE_TYPE: InterfaceType = InterfaceType::FilterStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_filter_is_full_and_not_orderable() {
        let props = FilterStatusProperties::new(180, false);
        assert_eq!(props.life_remaining(), 100);
        assert_eq!(props.order_percentage(), ORDER_NOT_SUPPORTED);
    }

    #[test]
    fn order_percentage_accepts_sentinel_only_above_100() {
        let mut props = FilterStatusProperties::new(90, true);
        props.set_order_percentage(10).unwrap();
        assert!(props.set_order_percentage(150).is_err());
        props.set_order_percentage(ORDER_NOT_SUPPORTED).unwrap();
    }

    #[test]
    fn ordering_strings_are_served() {
        let mut props = FilterStatusProperties::new(90, false);
        props.set_ordering("Acme", "F-100", "https://acme.example/f100");
        let handler = FilterStatus::new(props);
        assert_eq!(
            handler.property("PartNumber"),
            Some(Value::String("F-100".to_string()))
        );
        assert!(!DESCRIPTOR.property("Url").unwrap().emits_changed);
    }
}
