//! `macmodels-gen` — regenerate the firmware tables from the model database.
//!
//! Usage:
//!   macmodels-gen                       # run from the model database directory
//!   macmodels-gen --root AppleModels --check
//!
//! Any load or validation failure exits with status 1 before a file is written.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use macmodels::{FamilyFilter, GenConfig};

/// Model database generator.
#[derive(Parser, Debug)]
#[command(name = "macmodels-gen", about = "Update autogenerated sources from the model database")]
struct Cli {
    /// Model database directory (default: current directory).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Directory of YAML model records (default: {root}/DataBase).
    #[arg(long)]
    database: Option<PathBuf>,

    /// Products registry, .zjson/.json/.yaml (default: {root}/DataBase/Products.zjson).
    #[arg(long)]
    products: Option<PathBuf>,

    /// Output path of the platform-info table.
    #[arg(long = "macinfo-out")]
    macinfo_out: Option<PathBuf>,

    /// Output path of the serial generator header.
    #[arg(long = "macserial-out")]
    macserial_out: Option<PathBuf>,

    /// Output path of the recovery board list.
    #[arg(long = "boards-out")]
    boards_out: Option<PathBuf>,

    /// Oldest model year to keep in the platform-info table.
    #[arg(long = "min-year", default_value_t = 0)]
    min_year: u32,

    /// Validate and render without writing any file.
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn into_config(self) -> GenConfig {
        GenConfig {
            root: self.root,
            database_dir: self.database,
            products_path: self.products,
            macinfo_path: self.macinfo_out,
            macserial_path: self.macserial_out,
            boards_path: self.boards_out,
            min_year: self.min_year,
            family: FamilyFilter::default(),
            check_only: self.check,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Cli::parse().into_config();
    let summary = macmodels::run(&config)?;

    if summary.written {
        info!("Generated {} files from {} models", summary.files.len(), summary.models);
    } else {
        info!("Check passed for {} models, nothing written", summary.models);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::parse_from([
            "macmodels-gen",
            "--root=/src/AppleModels",
            "--boards-out=/tmp/boards.json",
            "--min-year=2010",
            "--check",
        ]);
        let config = cli.into_config();
        assert_eq!(config.root, Some(PathBuf::from("/src/AppleModels")));
        assert_eq!(config.resolve_boards_path(), PathBuf::from("/tmp/boards.json"));
        assert_eq!(config.min_year, 2010);
        assert!(config.check_only);
    }

    #[test]
    fn defaults_target_firmware_tree() {
        let config = Cli::parse_from(["macmodels-gen"]).into_config();
        assert_eq!(
            config.resolve_macserial_path(),
            PathBuf::from("../Utilities/macserial/modelinfo_autogen.h")
        );
        assert!(!config.check_only);
    }
}
