//! Typed model records, one per YAML file in the database.
//!
//! Every key except `SystemProductName` is optional at load time. Keys that
//! the emitters cannot do without are checked lazily through
//! [`ModelRecord::require`], which reports the record and key by name.

use serde::{Deserialize, Deserializer};

use crate::error::{ModelsError, Result};

/// A single hardware model line (e.g. `MacBookPro11,1`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ModelRecord {
    #[serde(rename = "SystemProductName", default, deserialize_with = "scalar::opt_string")]
    pub system_product_name: Option<String>,

    #[serde(rename = "BoardProduct", default)]
    pub board_product: Option<OneOrMany>,

    #[serde(rename = "BoardRevision", default)]
    pub board_revision: Option<u32>,

    /// Defaults to `[0]` when absent.
    #[serde(rename = "SmcRevision", default)]
    pub smc_revision: Option<Vec<u8>>,

    /// Defaults to `[0]` when absent.
    #[serde(rename = "SmcBranch", default)]
    pub smc_branch: Option<Vec<u8>>,

    /// Defaults to `[0]` when absent.
    #[serde(rename = "SmcPlatform", default)]
    pub smc_platform: Option<Vec<u8>>,

    #[serde(rename = "BIOSVersion", default, deserialize_with = "scalar::opt_string")]
    pub bios_version: Option<String>,

    #[serde(rename = "BIOSReleaseDate", default, deserialize_with = "scalar::opt_string")]
    pub bios_release_date: Option<String>,

    #[serde(rename = "SystemVersion", default, deserialize_with = "scalar::opt_string")]
    pub system_version: Option<String>,

    #[serde(rename = "SystemSKUNumber", default, deserialize_with = "scalar::opt_string")]
    pub system_sku_number: Option<String>,

    #[serde(rename = "SystemFamily", default, deserialize_with = "scalar::opt_string")]
    pub system_family: Option<String>,

    #[serde(rename = "BoardVersion", default, deserialize_with = "scalar::opt_string")]
    pub board_version: Option<String>,

    #[serde(rename = "BoardAssetTag", default, deserialize_with = "scalar::opt_string")]
    pub board_asset_tag: Option<String>,

    #[serde(rename = "BoardLocationInChassis", default, deserialize_with = "scalar::opt_string")]
    pub board_location_in_chassis: Option<String>,

    #[serde(rename = "ChassisAssetTag", default, deserialize_with = "scalar::opt_string")]
    pub chassis_asset_tag: Option<String>,

    #[serde(rename = "SmcGeneration", default)]
    pub smc_generation: Option<u32>,

    #[serde(rename = "BoardType", default)]
    pub board_type: Option<u32>,

    #[serde(rename = "ChassisType", default)]
    pub chassis_type: Option<u32>,

    #[serde(rename = "MemoryFormFactor", default)]
    pub memory_form_factor: Option<u32>,

    #[serde(rename = "PlatformFeature", default)]
    pub platform_feature: Option<u32>,

    #[serde(rename = "FirmwareFeatures", default)]
    pub firmware_features: Option<u64>,

    #[serde(rename = "FirmwareFeaturesMask", default)]
    pub firmware_features_mask: Option<u64>,

    #[serde(rename = "ExtendedFirmwareFeatures", default)]
    pub extended_firmware_features: Option<u64>,

    #[serde(rename = "ExtendedFirmwareFeaturesMask", default)]
    pub extended_firmware_features_mask: Option<u64>,

    /// Secure boot model identifier; emitted lower-cased.
    #[serde(rename = "AppleModelId", default, deserialize_with = "scalar::opt_string")]
    pub apple_model_id: Option<String>,

    #[serde(rename = "AppleModelCode", default, deserialize_with = "scalar::opt_string_list")]
    pub apple_model_code: Option<Vec<String>>,

    #[serde(rename = "AppleBoardCode", default, deserialize_with = "scalar::opt_string_list")]
    pub apple_board_code: Option<Vec<String>>,

    #[serde(rename = "AppleModelYear", default)]
    pub apple_model_year: Option<Vec<u32>>,

    /// Defaults to 0 when absent.
    #[serde(rename = "MacserialModelYear", default)]
    pub macserial_model_year: Option<u32>,

    #[serde(rename = "SystemSerialNumber", default, deserialize_with = "scalar::opt_string")]
    pub system_serial_number: Option<String>,

    /// `None` (or empty) means the model is still supported by the latest OS.
    #[serde(rename = "MaximumOSVersion", default, deserialize_with = "scalar::opt_string")]
    pub maximum_os_version: Option<String>,

    #[serde(rename = "Specifications", default)]
    pub specifications: Option<Specifications>,
}

/// Marketing details that do not end up in firmware tables.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Specifications {
    #[serde(rename = "CPU", default, deserialize_with = "scalar::opt_string_list")]
    pub cpu: Option<Vec<String>>,

    #[serde(rename = "SystemReportName", default, deserialize_with = "scalar::opt_string_list")]
    pub system_report_name: Option<Vec<String>>,
}

/// `BoardProduct` is either a single board id or a list of them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn as_slice(&self) -> &[String] {
        match self {
            OneOrMany::One(s) => std::slice::from_ref(s),
            OneOrMany::Many(v) => v,
        }
    }
}

/// Which code list of a record to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    ModelCode,
    BoardCode,
}

impl ProductField {
    /// YAML key of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductField::ModelCode => "AppleModelCode",
            ProductField::BoardCode => "AppleBoardCode",
        }
    }
}

impl ModelRecord {
    /// Display name. Always non-empty for records returned by the loader.
    pub fn name(&self) -> &str {
        self.system_product_name.as_deref().unwrap_or_default()
    }

    /// Borrow a field the emitters cannot do without.
    pub fn require<'a, T: ?Sized>(
        &self,
        field: &'static str,
        value: Option<&'a T>,
    ) -> Result<&'a T> {
        value.ok_or_else(|| ModelsError::MissingField {
            model: self.name().to_string(),
            field,
        })
    }

    /// Require a scalar string field.
    pub fn require_str<'a>(&self, field: &'static str, value: &'a Option<String>) -> Result<&'a str> {
        self.require(field, value.as_deref())
    }

    /// Require an integer field.
    pub fn require_u32(&self, field: &'static str, value: Option<u32>) -> Result<u32> {
        self.require(field, value.as_ref()).copied()
    }

    pub fn board_products(&self) -> &[String] {
        self.board_product
            .as_ref()
            .map(OneOrMany::as_slice)
            .unwrap_or_default()
    }

    pub fn codes(&self, field: ProductField) -> Option<&[String]> {
        match field {
            ProductField::ModelCode => self.apple_model_code.as_deref(),
            ProductField::BoardCode => self.apple_board_code.as_deref(),
        }
    }

    pub fn model_years(&self) -> &[u32] {
        self.apple_model_year.as_deref().unwrap_or_default()
    }

    /// Latest release year of the model line.
    pub fn max_model_year(&self) -> Result<u32> {
        let years = self.require("AppleModelYear", self.apple_model_year.as_deref())?;
        years.iter().copied().max().ok_or_else(|| ModelsError::MissingField {
            model: self.name().to_string(),
            field: "AppleModelYear",
        })
    }

    /// Extended features take precedence over the legacy 32-bit value.
    pub fn effective_firmware_features(&self) -> u64 {
        self.extended_firmware_features
            .or(self.firmware_features)
            .unwrap_or(0)
    }

    pub fn effective_firmware_features_mask(&self) -> u64 {
        self.extended_firmware_features_mask
            .or(self.firmware_features_mask)
            .unwrap_or(0)
    }

    /// Newest supported OS, or `latest` when the model is still supported.
    pub fn maximum_os_version_or_latest(&self) -> &str {
        match self.maximum_os_version.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => "latest",
        }
    }

    pub fn system_report_names(&self) -> &[String] {
        self.specifications
            .as_ref()
            .and_then(|s| s.system_report_name.as_deref())
            .unwrap_or_default()
    }

    /// Primary CPU description.
    pub fn primary_cpu(&self) -> Result<&str> {
        self.specifications
            .as_ref()
            .and_then(|s| s.cpu.as_deref())
            .and_then(|cpus| cpus.first())
            .map(String::as_str)
            .ok_or_else(|| ModelsError::MissingField {
                model: self.name().to_string(),
                field: "Specifications.CPU",
            })
    }
}

/// Lenient scalar decoding: YAML happily turns `1.0` or `1234` into numbers,
/// but the database treats those keys as text.
mod scalar {
    use std::fmt;

    use serde::de::{self, Visitor};

    use super::*;

    struct ScalarString(String);

    impl<'de> Deserialize<'de> for ScalarString {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
            struct ScalarVisitor;

            impl Visitor<'_> for ScalarVisitor {
                type Value = ScalarString;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a string, number or boolean")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                    Ok(ScalarString(v.to_string()))
                }

                fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
                    Ok(ScalarString(v))
                }

                fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
                    Ok(ScalarString(if v { "True" } else { "False" }.to_string()))
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                    Ok(ScalarString(v.to_string()))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                    Ok(ScalarString(v.to_string()))
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
                    // Debug keeps the fractional part: 1.0 stays "1.0".
                    Ok(ScalarString(format!("{v:?}")))
                }
            }

            deserializer.deserialize_any(ScalarVisitor)
        }
    }

    pub(super) fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<String>, D::Error> {
        Ok(Option::<ScalarString>::deserialize(deserializer)?.map(|s| s.0))
    }

    pub(super) fn opt_string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Vec<String>>, D::Error> {
        Ok(Option::<Vec<ScalarString>>::deserialize(deserializer)?
            .map(|v| v.into_iter().map(|s| s.0).collect()))
    }
}
