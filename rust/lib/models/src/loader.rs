use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ModelsError, Result};
use crate::record::ModelRecord;

/// The loaded model database, sorted by display name.
///
/// Sorting is required both for deterministic output and for
/// [`Database::find`], which binary-searches the collection.
#[derive(Debug, Clone, Default)]
pub struct Database {
    records: Vec<ModelRecord>,
}

impl Database {
    /// Sort `records` by display name and reject duplicate names.
    pub fn new(mut records: Vec<ModelRecord>) -> Result<Self> {
        records.sort_by(|a, b| a.name().cmp(b.name()));
        for pair in records.windows(2) {
            if pair[0].name() == pair[1].name() {
                return Err(ModelsError::DuplicateModel(pair[0].name().to_string()));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ModelRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a model up by its display name.
    ///
    /// Library API for callers inspecting a single model. The generators
    /// only iterate the database.
    pub fn find(&self, name: &str) -> Option<&ModelRecord> {
        self.records
            .binary_search_by(|r| r.name().cmp(name))
            .ok()
            .map(|i| &self.records[i])
    }
}

impl<'a> IntoIterator for &'a Database {
    type Item = &'a ModelRecord;
    type IntoIter = std::slice::Iter<'a, ModelRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// DatabaseLoader walks a directory tree and parses every `*.yaml` file
/// into a [`ModelRecord`]:
///
/// ```text
/// DataBase/
/// ├── MacBookPro/MacBookPro11,1.yaml
/// ├── MacBookPro/MacBookPro11,2.yaml
/// └── iMac/iMac20,1.yaml
/// ```
///
/// Any parse failure is fatal. Files without a `SystemProductName` are
/// skipped with a warning.
pub struct DatabaseLoader;

impl DatabaseLoader {
    pub fn load(dir: &Path) -> Result<Database> {
        if !dir.is_dir() {
            return Err(ModelsError::DatabaseNotFound(dir.to_path_buf()));
        }

        let mut records = Vec::new();

        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| ModelsError::Io {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !Self::is_record(path) {
                continue;
            }

            if let Some(record) = Self::load_file(path)? {
                records.push(record);
            }
        }

        if records.is_empty() {
            return Err(ModelsError::EmptyDatabase(dir.to_path_buf()));
        }

        debug!("DatabaseLoader: loaded {} models from {:?}", records.len(), dir);
        Database::new(records)
    }

    /// Parse a single record file. Returns `None` for nameless records.
    pub fn load_file(path: &Path) -> Result<Option<ModelRecord>> {
        let content = fs::read_to_string(path).map_err(|e| ModelsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let record: ModelRecord =
            serde_yml::from_str(&content).map_err(|e| ModelsError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        // Empty and missing names are both skipped.
        if record.name().is_empty() {
            warn!("Missing SystemProductName in {:?}, skipping", path);
            return Ok(None);
        }

        Ok(Some(record))
    }

    fn is_record(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".yaml"))
    }
}
