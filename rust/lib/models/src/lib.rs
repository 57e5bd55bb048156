//! Model database tooling: loads the YAML model records, cross-checks them
//! against the products registry and renders the derived firmware tables.

pub mod codegen;
pub mod collect;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod products;
pub mod record;
pub mod validate;

pub use codegen::{Codegen, GeneratedFile};
pub use collect::{CollectPolicy, gather_products};
pub use config::GenConfig;
pub use error::{ModelsError, Result};
pub use loader::{Database, DatabaseLoader};
pub use pipeline::{RunSummary, run};
pub use products::{ProductEntry, ProductStatus, Products};
pub use record::{ModelRecord, ProductField};
pub use validate::{FamilyFilter, ValidationReport, validate_products};
