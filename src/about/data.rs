// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! About metadata of a controllee application.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CdmError, ValueError};
use crate::marshal::Marshal;
use crate::types::Value;

use super::device_type::DeviceTypeEntry;

/// Text keyed by language tag (`"en"`, `"fr-CA"`).
pub type Localized = BTreeMap<String, String>;

/// Device and application metadata published through `org.alljoyn.About`.
///
/// Localized fields hold one entry per language; a field missing in the
/// requested language falls back to the default language.
///
/// A missing `app_id` is generated when deserializing.
///
/// # Examples
///
/// ```
/// use cdm_controllee::about::{AboutData, DeviceType};
/// use cdm_controllee::types::ObjectPath;
///
/// let about = AboutData::new("en")
///     .with_device_id("ac-0001")
///     .with_app_name("Cooling")
///     .with_manufacturer("Acme")
///     .with_model_number("AC-9")
///     .with_description("Split air conditioner")
///     .with_software_version("1.0.0")
///     .with_device_type(DeviceType::AirConditioner, ObjectPath::new("/Cdm/Ac").unwrap());
/// assert!(about.validate().is_ok());
///
/// let dict = about.to_dict("").unwrap();
/// assert!(dict.dict_get("AppName").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutData {
    /// Application identifier.
    pub app_id: Uuid,
    /// Language used when a request names none.
    pub default_language: String,
    /// Additional languages; the default language is always supported.
    pub supported_languages: Vec<String>,
    /// Device name chosen by the user or the manufacturer.
    pub device_name: Localized,
    /// Unique device identifier.
    pub device_id: String,
    /// Application name.
    pub app_name: Localized,
    /// Manufacturer name.
    pub manufacturer: Localized,
    /// Model number.
    pub model_number: String,
    /// Free-form description.
    pub description: Localized,
    /// Date of manufacture (`YYYY-MM-DD`).
    pub date_of_manufacture: Option<String>,
    /// Application software version.
    pub software_version: String,
    /// Hardware version.
    pub hardware_version: Option<String>,
    /// Support web site.
    pub support_url: Option<String>,
    /// Country where the device was made.
    pub country_of_production: Localized,
    /// Corporate brand name.
    pub corporate_brand: Localized,
    /// Product brand name.
    pub product_brand: Localized,
    /// Where the device is installed (`Kitchen`).
    pub location: Localized,
    /// Appliance types and the objects exposing them.
    pub device_types: Vec<DeviceTypeEntry>,
}

impl Default for AboutData {
    fn default() -> Self {
        Self {
            app_id: Uuid::new_v4(),
            default_language: String::new(),
            supported_languages: Vec::new(),
            device_name: Localized::new(),
            device_id: String::new(),
            app_name: Localized::new(),
            manufacturer: Localized::new(),
            model_number: String::new(),
            description: Localized::new(),
            date_of_manufacture: None,
            software_version: String::new(),
            hardware_version: None,
            support_url: None,
            country_of_production: Localized::new(),
            corporate_brand: Localized::new(),
            product_brand: Localized::new(),
            location: Localized::new(),
            device_types: Vec::new(),
        }
    }
}

impl AboutData {
    /// Creates metadata with a fresh `AppId` and the given default language.
    #[must_use]
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            ..Self::default()
        }
    }

    /// Sets the application identifier.
    #[must_use]
    pub fn with_app_id(mut self, app_id: Uuid) -> Self {
        self.app_id = app_id;
        self
    }

    /// Sets the device identifier.
    #[must_use]
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    /// Sets the device name in the default language.
    #[must_use]
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name
            .insert(self.default_language.clone(), name.into());
        self
    }

    /// Sets the application name in the default language.
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name
            .insert(self.default_language.clone(), name.into());
        self
    }

    /// Sets the manufacturer in the default language.
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer
            .insert(self.default_language.clone(), manufacturer.into());
        self
    }

    /// Sets the model number.
    #[must_use]
    pub fn with_model_number(mut self, model: impl Into<String>) -> Self {
        self.model_number = model.into();
        self
    }

    /// Sets the description in the default language.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description
            .insert(self.default_language.clone(), description.into());
        self
    }

    /// Sets the software version.
    #[must_use]
    pub fn with_software_version(mut self, version: impl Into<String>) -> Self {
        self.software_version = version.into();
        self
    }

    /// Sets the location in the default language.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location
            .insert(self.default_language.clone(), location.into());
        self
    }

    /// Adds a supported language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !self.supported_languages.contains(&language) {
            self.supported_languages.push(language);
        }
        self
    }

    /// Declares that `object_path` implements an appliance of `device_type`.
    #[must_use]
    pub fn with_device_type(
        mut self,
        device_type: super::DeviceType,
        object_path: crate::types::ObjectPath,
    ) -> Self {
        self.device_types
            .push(DeviceTypeEntry::new(device_type, object_path));
        self
    }

    /// Returns every supported language, default first.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        let mut languages = vec![self.default_language.clone()];
        for language in &self.supported_languages {
            if !languages.contains(language) {
                languages.push(language.clone());
            }
        }
        languages
    }

    /// Checks that the mandatory fields are present.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Empty` naming the first missing field.
    pub fn validate(&self) -> Result<(), ValueError> {
        if self.app_id.is_nil() {
            return Err(ValueError::Empty("AppId"));
        }
        if self.default_language.is_empty() {
            return Err(ValueError::Empty("DefaultLanguage"));
        }
        if self.device_id.is_empty() {
            return Err(ValueError::Empty("DeviceId"));
        }
        let localized = [
            ("AppName", &self.app_name),
            ("Manufacturer", &self.manufacturer),
            ("Description", &self.description),
        ];
        for (field, text) in localized {
            if text.get(&self.default_language).is_none_or(String::is_empty) {
                return Err(ValueError::Empty(field));
            }
        }
        if self.model_number.is_empty() {
            return Err(ValueError::Empty("ModelNumber"));
        }
        if self.software_version.is_empty() {
            return Err(ValueError::Empty("SoftwareVersion"));
        }
        Ok(())
    }

    /// Returns every field in `language` as an `a{sv}` dictionary.
    ///
    /// An empty language selects the default language.
    ///
    /// # Errors
    ///
    /// Returns `CdmError::LanguageNotSupported` for an unknown language.
    pub fn to_dict(&self, language: &str) -> Result<Value, CdmError> {
        let language = if language.is_empty() {
            self.default_language.as_str()
        } else {
            language
        };
        if !self.languages().iter().any(|l| l == language) {
            return Err(CdmError::LanguageNotSupported);
        }
        Ok(Value::string_variant_dict(self.fields(language, false)))
    }

    /// Returns the announced subset of the fields, in the default language.
    #[must_use]
    pub fn announced_dict(&self) -> Value {
        Value::string_variant_dict(self.fields(&self.default_language, true))
    }

    fn fields(&self, language: &str, announced_only: bool) -> Vec<(&'static str, Value)> {
        let mut fields = vec![
            ("AppId", self.app_id.as_bytes().to_vec().to_value()),
            ("DefaultLanguage", string(&self.default_language)),
        ];
        self.push_localized(&mut fields, "DeviceName", &self.device_name, language);
        fields.push(("DeviceId", string(&self.device_id)));
        self.push_localized(&mut fields, "AppName", &self.app_name, language);
        self.push_localized(&mut fields, "Manufacturer", &self.manufacturer, language);
        fields.push(("ModelNumber", string(&self.model_number)));

        if !announced_only {
            fields.push(("SupportedLanguages", self.languages().to_value()));
            self.push_localized(&mut fields, "Description", &self.description, language);
            if let Some(date) = &self.date_of_manufacture {
                fields.push(("DateOfManufacture", string(date)));
            }
            fields.push(("SoftwareVersion", string(&self.software_version)));
            fields.push(("AJSoftwareVersion", string(env!("CARGO_PKG_VERSION"))));
            if let Some(version) = &self.hardware_version {
                fields.push(("HardwareVersion", string(version)));
            }
            if let Some(url) = &self.support_url {
                fields.push(("SupportUrl", string(url)));
            }
            self.push_localized(
                &mut fields,
                "CountryOfProduction",
                &self.country_of_production,
                language,
            );
            self.push_localized(&mut fields, "CorporateBrand", &self.corporate_brand, language);
            self.push_localized(&mut fields, "ProductBrand", &self.product_brand, language);
        }

        self.push_localized(&mut fields, "Location", &self.location, language);
        if !self.device_types.is_empty() {
            fields.push(("DeviceTypeDescription", self.device_types.to_value()));
        }
        fields
    }

    fn push_localized(
        &self,
        fields: &mut Vec<(&'static str, Value)>,
        name: &'static str,
        text: &Localized,
        language: &str,
    ) {
        let value = text
            .get(language)
            .or_else(|| text.get(&self.default_language));
        if let Some(value) = value {
            fields.push((name, string(value)));
        }
    }
}

fn string(text: &str) -> Value {
    Value::String(text.to_string())
}
