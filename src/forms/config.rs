/// Validated form embed settings
///
/// Format checks only: nothing here asks the form provider whether the ids exist.

use crate::config::FormConfig;
use serde::Serialize;
use std::fmt;

pub const DEFAULT_REGION: &str = "na1";

/// Minimum length of a GUID-like form id
const MIN_FORM_ID_LEN: usize = 24;

/// Which embed setting failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfigKey {
    #[serde(rename = "portalId")]
    PortalId,
    #[serde(rename = "formId")]
    FormId,
    #[serde(rename = "region")]
    Region,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigKey::PortalId => "portalId",
            ConfigKey::FormId => "formId",
            ConfigKey::Region => "region",
        };
        f.write_str(name)
    }
}

/// Failures of the embed pipeline
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedError {
    #[error("invalid form embed setting: {0}")]
    InvalidConfig(ConfigKey),

    #[error("form script failed to load: {0}")]
    ScriptLoad(String),

    #[error("form target '{0}' is not on the page")]
    MissingTarget(String),

    #[error("form creation failed: {0}")]
    Create(String),
}

impl EmbedError {
    pub fn config_key(&self) -> Option<ConfigKey> {
        match self {
            EmbedError::InvalidConfig(key) => Some(*key),
            _ => None,
        }
    }
}

/// Trimmed, format-checked embed settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEmbedConfig {
    portal_id: String,
    form_id: String,
    region: String,
}

impl FormEmbedConfig {
    /// Trim all values, lower-case the region (empty means `na1`), then validate in order
    /// portal id, form id, region. The first failure is reported.
    pub fn new(portal_id: &str, form_id: &str, region: &str) -> Result<Self, EmbedError> {
        let portal_id = portal_id.trim().to_string();
        let form_id = form_id.trim().to_string();
        let region = match region {
            "" => DEFAULT_REGION.to_string(),
            r => r.trim().to_ascii_lowercase(),
        };

        if !is_valid_portal_id(&portal_id) {
            return Err(EmbedError::InvalidConfig(ConfigKey::PortalId));
        }
        if !is_valid_form_id(&form_id) {
            return Err(EmbedError::InvalidConfig(ConfigKey::FormId));
        }
        if !is_valid_region(&region) {
            return Err(EmbedError::InvalidConfig(ConfigKey::Region));
        }

        Ok(Self {
            portal_id,
            form_id,
            region,
        })
    }

    pub fn from_config(config: &FormConfig) -> Result<Self, EmbedError> {
        Self::new(&config.portal_id, &config.form_id, &config.region)
    }

    pub fn portal_id(&self) -> &str {
        &self.portal_id
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

fn is_valid_portal_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_form_id(value: &str) -> bool {
    value.len() >= MIN_FORM_ID_LEN && value.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn is_valid_region(value: &str) -> bool {
    value.len() >= 2 && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_ID: &str = "3f9a2c1e-8b7d-4e6f-a5c4-1b2d3e4f5a6b";

    #[test]
    fn values_are_trimmed_and_region_lowercased() {
        let config =
            FormEmbedConfig::new(" 4455667 ", &format!("  {}\n", FORM_ID), " EU1 ").unwrap();
        assert_eq!(config.portal_id(), "4455667");
        assert_eq!(config.form_id(), FORM_ID);
        assert_eq!(config.region(), "eu1");
    }

    #[test]
    fn empty_region_defaults_to_na1() {
        let config = FormEmbedConfig::new("4455667", FORM_ID, "").unwrap();
        assert_eq!(config.region(), DEFAULT_REGION);
    }

    #[test]
    fn whitespace_region_is_invalid() {
        assert_eq!(
            FormEmbedConfig::new("4455667", FORM_ID, "   ").unwrap_err(),
            EmbedError::InvalidConfig(ConfigKey::Region)
        );
    }

    #[test]
    fn portal_id_must_be_digits() {
        for bad in ["", "12a4", "-1", "12 34"] {
            assert_eq!(
                FormEmbedConfig::new(bad, FORM_ID, "na1").unwrap_err().config_key(),
                Some(ConfigKey::PortalId),
                "portal id {:?}",
                bad
            );
        }
    }

    #[test]
    fn form_id_must_be_long_hex() {
        for bad in ["", "3f9a2c1e", "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"] {
            assert_eq!(
                FormEmbedConfig::new("4455667", bad, "na1").unwrap_err(),
                EmbedError::InvalidConfig(ConfigKey::FormId)
            );
        }
        assert!(FormEmbedConfig::new("4455667", &FORM_ID.to_uppercase(), "na1").is_ok());
    }

    #[test]
    fn region_must_be_short_slug() {
        for bad in ["x", "na_1", "eu 1"] {
            assert_eq!(
                FormEmbedConfig::new("4455667", FORM_ID, bad).unwrap_err(),
                EmbedError::InvalidConfig(ConfigKey::Region)
            );
        }
    }

    #[test]
    fn portal_id_is_checked_first() {
        assert_eq!(
            FormEmbedConfig::new("abc", "bad", "x").unwrap_err().config_key(),
            Some(ConfigKey::PortalId)
        );
    }

    #[test]
    fn serializes_with_provider_field_names() {
        let config = FormEmbedConfig::new("4455667", FORM_ID, "na1").unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["portalId"], "4455667");
        assert_eq!(value["formId"], FORM_ID);
        assert_eq!(value["region"], "na1");
    }
}
