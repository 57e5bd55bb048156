//! Known-products registry: product code → `{name, status}`.
//!
//! The registry is maintained separately from the model database and is the
//! source of truth for which codes exist. It is stored as JSON, optionally
//! zlib-compressed (`.zjson`), or as YAML.

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelsError, Result};

/// Registry status of a product code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// The code is known and valid.
    Ok,
    /// The code is retired or was never valid.
    NotOk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub status: ProductStatus,
}

impl ProductEntry {
    pub fn is_valid(&self) -> bool {
        self.status == ProductStatus::Ok
    }
}

/// The registry, iterated in the order codes appear in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Products {
    entries: IndexMap<String, ProductEntry>,
}

impl Products {
    pub fn new(entries: IndexMap<String, ProductEntry>) -> Self {
        Self { entries }
    }

    /// Load the registry from `path`, picking the decoder by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| ModelsError::Registry(format!("cannot read {}: {}", path.display(), e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let products = match ext {
            "zjson" => {
                let mut json = Vec::new();
                ZlibDecoder::new(bytes.as_slice())
                    .read_to_end(&mut json)
                    .map_err(|e| {
                        ModelsError::Registry(format!("cannot inflate {}: {}", path.display(), e))
                    })?;
                Self::from_json(&json)?
            }
            "yaml" | "yml" => serde_yml::from_reader(bytes.as_slice())
                .map_err(|e| ModelsError::Registry(format!("{}: {}", path.display(), e)))?,
            _ => Self::from_json(&bytes)?,
        };

        debug!("Products: loaded {} codes from {:?}", products.len(), path);
        Ok(products)
    }

    pub fn from_json(json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).map_err(|e| ModelsError::Registry(e.to_string()))
    }

    pub fn get(&self, code: &str) -> Option<&ProductEntry> {
        self.entries.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ProductEntry)> for Products {
    fn from_iter<I: IntoIterator<Item = (String, ProductEntry)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
