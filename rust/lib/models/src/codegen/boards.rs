/// Recovery board list generator (`boards.json`).
///
/// Maps every board id of a model with a 12-character serial number to the
/// newest OS the model supports, or `latest`.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{ModelsError, Result};
use crate::loader::Database;
use crate::products::Products;

use super::{Codegen, GeneratedFile};

/// Serial numbers of this length use the newer format recovery understands.
const MLB_SERIAL_LEN: usize = 12;

pub struct BoardsGenerator {
    pub path: PathBuf,
}

impl BoardsGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Board id → maximum OS version. A later model overwrites an earlier one
/// but the key keeps its original position.
pub fn board_os_map(db: &Database) -> IndexMap<String, String> {
    let mut mlb = IndexMap::new();
    for info in db {
        let serial = info.system_serial_number.as_deref().unwrap_or_default();
        if serial.chars().count() != MLB_SERIAL_LEN {
            continue;
        }
        for board in info.board_products() {
            mlb.insert(board.clone(), info.maximum_os_version_or_latest().to_string());
        }
    }
    mlb
}

impl Codegen for BoardsGenerator {
    fn generate(&self, db: &Database, _products: &Products) -> Result<GeneratedFile> {
        let mlb = board_os_map(db);

        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
        mlb.serialize(&mut ser).map_err(|e| ModelsError::Write {
            path: self.path.clone(),
            source: e.into(),
        })?;

        // serde_json only ever writes valid UTF-8.
        let content = String::from_utf8_lossy(&buf).into_owned();
        Ok(GeneratedFile::new(self.path.clone(), content))
    }

    fn name(&self) -> &str {
        "boards"
    }
}
