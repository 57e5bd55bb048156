use std::path::PathBuf;

use crate::validate::FamilyFilter;

/// Generator configuration.
///
/// Every path is optional; unset paths resolve relative to `root`, which
/// defaults to the current directory. The defaults reproduce the layout of
/// the firmware tree when run from the model database directory.
#[derive(Debug, Clone, Default)]
pub struct GenConfig {
    /// Model database directory (the one holding `DataBase/`).
    pub root: Option<PathBuf>,

    /// Directory of YAML model records. Defaults to `{root}/DataBase`.
    pub database_dir: Option<PathBuf>,

    /// Products registry. Defaults to `{root}/DataBase/Products.zjson`.
    pub products_path: Option<PathBuf>,

    /// Defaults to `{root}/../Library/OcMacInfoLib/AutoGenerated.c`.
    pub macinfo_path: Option<PathBuf>,

    /// Defaults to `{root}/../Utilities/macserial/modelinfo_autogen.h`.
    pub macserial_path: Option<PathBuf>,

    /// Defaults to `{root}/../Utilities/macrecovery/boards.json`.
    pub boards_path: Option<PathBuf>,

    /// Oldest model year kept in the platform-info table.
    pub min_year: u32,

    pub family: FamilyFilter,

    /// Validate and render, but do not write anything.
    pub check_only: bool,
}

impl GenConfig {
    pub fn resolve_database_dir(&self) -> PathBuf {
        self.database_dir
            .clone()
            .unwrap_or_else(|| self.resolve_subpath("DataBase"))
    }

    pub fn resolve_products_path(&self) -> PathBuf {
        self.products_path
            .clone()
            .unwrap_or_else(|| self.resolve_subpath("DataBase/Products.zjson"))
    }

    pub fn resolve_macinfo_path(&self) -> PathBuf {
        self.macinfo_path
            .clone()
            .unwrap_or_else(|| self.resolve_subpath("../Library/OcMacInfoLib/AutoGenerated.c"))
    }

    pub fn resolve_macserial_path(&self) -> PathBuf {
        self.macserial_path
            .clone()
            .unwrap_or_else(|| self.resolve_subpath("../Utilities/macserial/modelinfo_autogen.h"))
    }

    pub fn resolve_boards_path(&self) -> PathBuf {
        self.boards_path
            .clone()
            .unwrap_or_else(|| self.resolve_subpath("../Utilities/macrecovery/boards.json"))
    }

    fn resolve_subpath(&self, name: &str) -> PathBuf {
        self.root
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
