//! Generators for the artifacts derived from the model database.
//!
//! Each generator renders one file into memory. Nothing touches the disk
//! until every generator has succeeded, see [`crate::pipeline`].

pub mod boards;
pub mod macinfo;
pub mod macserial;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ModelsError, Result};
use crate::loader::Database;
use crate::products::Products;

pub use boards::BoardsGenerator;
pub use macinfo::MacInfoGenerator;
pub use macserial::MacSerialGenerator;

/// Implemented once per output format.
pub trait Codegen {
    fn generate(&self, db: &Database, products: &Products) -> Result<GeneratedFile>;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    /// Write the file, creating missing parent directories.
    pub fn write(&self) -> Result<()> {
        let map_err = |path: &Path, e| ModelsError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| map_err(parent, e))?;
        }
        fs::write(&self.path, &self.content).map_err(|e| map_err(&self.path, e))
    }
}

/// Comma-separated decimal list, as used in C array initializers.
pub(crate) fn join_decimal<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
