//! One end-to-end run: load → validate → render everything → write.
//!
//! Rendering happens entirely in memory first, so a failing validation or a
//! record missing a required key leaves every output file untouched.

use tracing::info;

use crate::codegen::{BoardsGenerator, Codegen, GeneratedFile, MacInfoGenerator, MacSerialGenerator};
use crate::config::GenConfig;
use crate::error::Result;
use crate::loader::{Database, DatabaseLoader};
use crate::products::Products;
use crate::validate::{ValidationReport, validate_products};

#[derive(Debug)]
pub struct RunSummary {
    pub models: usize,
    pub report: ValidationReport,
    pub files: Vec<GeneratedFile>,
    /// False for check-only runs.
    pub written: bool,
}

/// The generators for every artifact, targeting the configured paths.
pub fn generators(config: &GenConfig) -> Vec<Box<dyn Codegen>> {
    vec![
        Box::new(MacInfoGenerator::new(config.resolve_macinfo_path(), config.min_year)),
        Box::new(MacSerialGenerator::new(config.resolve_macserial_path())),
        Box::new(BoardsGenerator::new(config.resolve_boards_path())),
    ]
}

/// Render every artifact into memory.
pub fn render(
    db: &Database,
    products: &Products,
    generators: &[Box<dyn Codegen>],
) -> Result<Vec<GeneratedFile>> {
    generators
        .iter()
        .map(|g| -> Result<GeneratedFile> {
            let file = g.generate(db, products)?;
            info!("Rendered {} ({} bytes)", g.name(), file.content.len());
            Ok(file)
        })
        .collect()
}

pub fn run(config: &GenConfig) -> Result<RunSummary> {
    let db_dir = config.resolve_database_dir();
    info!("Loading models from {}", db_dir.display());
    let db = DatabaseLoader::load(&db_dir)?;

    let products_path = config.resolve_products_path();
    info!("Loading products from {}", products_path.display());
    let products = Products::load(&products_path)?;

    let report = validate_products(&db, &products, &config.family)?;
    info!(
        "Validated {} models against {} products ({} unused product names)",
        db.len(),
        products.len(),
        report.omissions.len()
    );

    let files = render(&db, &products, &generators(config))?;

    if !config.check_only {
        for file in &files {
            file.write()?;
            info!("Wrote {}", file.path.display());
        }
    }

    Ok(RunSummary {
        models: db.len(),
        report,
        files,
        written: !config.check_only,
    })
}
