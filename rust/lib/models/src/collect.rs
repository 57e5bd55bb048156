use std::collections::HashSet;

use tracing::{error, warn};

use crate::error::{ModelsError, Result};
use crate::loader::Database;
use crate::record::ProductField;

/// Codes that only mark an unknown product and are never collected.
const PLACEHOLDER_CODES: [&str; 2] = ["000", "0000"];

/// How the collector treats empty and shared codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectPolicy {
    pub allow_empty: bool,
    pub allow_shared: bool,
    /// Abort on a disallowed code instead of logging it.
    pub fatal: bool,
}

impl CollectPolicy {
    /// Used for `AppleModelCode`: every code must be present and unique.
    pub const STRICT: Self = Self {
        allow_empty: false,
        allow_shared: false,
        fatal: true,
    };

    /// Used for `AppleBoardCode`, where several models share a board.
    pub const LENIENT: Self = Self {
        allow_empty: true,
        allow_shared: true,
        fatal: false,
    };
}

impl Default for CollectPolicy {
    fn default() -> Self {
        Self::STRICT
    }
}

/// Gather the distinct codes of `field` across the database, in
/// record-then-list order. Empty and placeholder codes never make it into
/// the result.
pub fn gather_products(
    db: &Database,
    field: ProductField,
    policy: CollectPolicy,
) -> Result<Vec<String>> {
    let mut products = Vec::new();
    let mut seen = HashSet::new();

    for info in db {
        let Some(codes) = info.codes(field) else {
            continue;
        };

        for code in codes {
            if code.is_empty() {
                if !policy.allow_empty {
                    let err = ModelsError::EmptyCode {
                        model: info.name().to_string(),
                        field: field.as_str(),
                    };
                    if policy.fatal {
                        return Err(err);
                    }
                    error!("{}, skipping", err);
                }
                continue;
            }

            if PLACEHOLDER_CODES.contains(&code.as_str()) {
                warn!("{} contains zero {}, skipping", info.name(), field.as_str());
                continue;
            }

            if !seen.insert(code.as_str()) {
                if !policy.allow_shared {
                    let err = ModelsError::SharedCode {
                        model: info.name().to_string(),
                        field: field.as_str(),
                        code: code.clone(),
                    };
                    if policy.fatal {
                        return Err(err);
                    }
                    error!("{}", err);
                }
                continue;
            }

            products.push(code.clone());
        }
    }

    Ok(products)
}
