//! Cross-reference between the model database and the products registry.
//!
//! Forward direction: every `AppleModelCode` in the database must be a valid
//! registry code, otherwise the run aborts. Reverse direction: valid registry
//! codes for in-family products that no record references are reported as
//! omissions, together with the records they most likely belong to.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::collect::{CollectPolicy, gather_products};
use crate::error::{ModelsError, Result};
use crate::loader::Database;
use crate::products::Products;
use crate::record::ProductField;

/// Decides which registry names the database is expected to cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyFilter {
    /// A name must contain at least one of these.
    pub include: Vec<String>,
    /// A name containing any of these is out of scope.
    pub exclude: Vec<String>,
    /// Codes of this length or shorter are ignored.
    pub short_code_len: usize,
}

impl Default for FamilyFilter {
    fn default() -> Self {
        Self {
            include: vec!["Mac".into(), "Xserve".into()],
            exclude: vec!["M1".into()],
            short_code_len: 3,
        }
    }
}

impl FamilyFilter {
    pub fn matches(&self, name: &str) -> bool {
        self.include.iter().any(|m| name.contains(m.as_str()))
            && !self.exclude.iter().any(|m| name.contains(m.as_str()))
    }
}

/// A record that should probably list additional codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub model: String,
    pub codes: Vec<String>,
}

/// Advisory findings of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Codes referenced by the database, in collection order.
    pub used: Vec<String>,
    /// Registry name → codes the database does not reference.
    pub omissions: IndexMap<String, Vec<String>>,
    pub suggestions: Vec<Suggestion>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.omissions.is_empty()
    }
}

pub fn validate_products(
    db: &Database,
    products: &Products,
    filter: &FamilyFilter,
) -> Result<ValidationReport> {
    let used = gather_products(db, ProductField::ModelCode, CollectPolicy::STRICT)?;

    // Empty board codes are tolerated for now; this pass only logs.
    gather_products(db, ProductField::BoardCode, CollectPolicy::LENIENT)?;

    for code in &used {
        match products.get(code) {
            None => return Err(ModelsError::UnknownProduct(code.clone())),
            Some(entry) if !entry.is_valid() => {
                return Err(ModelsError::InvalidProduct(code.clone()));
            }
            Some(_) => {}
        }
    }

    let used_set: HashSet<&str> = used.iter().map(String::as_str).collect();
    let mut omissions: IndexMap<String, Vec<String>> = IndexMap::new();

    for (code, entry) in products.iter() {
        if !entry.is_valid() || !filter.matches(&entry.name) {
            continue;
        }
        if code.len() > filter.short_code_len && !used_set.contains(code) {
            warn!("Model {} ({}) is known but is not used in DataBase", code, entry.name);
            omissions
                .entry(entry.name.clone())
                .or_default()
                .push(code.to_string());
        }
    }

    let suggestions = suggest(db, &omissions);
    for s in &suggestions {
        info!("New AppleModelCode for {}:", s.model);
        for code in &s.codes {
            info!("  - \"{}\"", code);
        }
    }

    Ok(ValidationReport {
        used,
        omissions,
        suggestions,
    })
}

/// Attach omitted codes to records whose `SystemReportName` entries contain
/// the registry name. Names matching no record are dropped silently.
fn suggest(db: &Database, omissions: &IndexMap<String, Vec<String>>) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    for (name, codes) in omissions {
        for info in db {
            if info
                .system_report_names()
                .iter()
                .any(|report| report.contains(name.as_str()))
            {
                suggestions.push(Suggestion {
                    model: info.name().to_string(),
                    codes: codes.clone(),
                });
            }
        }
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::{ProductEntry, ProductStatus};
    use crate::record::{ModelRecord, Specifications};

    fn entry(name: &str, status: ProductStatus) -> ProductEntry {
        ProductEntry {
            name: name.into(),
            status,
        }
    }

    fn model(name: &str, codes: &[&str], report: &[&str]) -> ModelRecord {
        ModelRecord {
            system_product_name: Some(name.into()),
            apple_model_code: Some(codes.iter().map(|c| c.to_string()).collect()),
            specifications: Some(Specifications {
                cpu: None,
                system_report_name: Some(report.iter().map(|c| c.to_string()).collect()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn unused_registry_code_is_reported() {
        let products: Products = [("A1234".to_string(), entry("MacBook Pro", ProductStatus::Ok))]
            .into_iter()
            .collect();
        let db = Database::default();

        let report = validate_products(&db, &products, &FamilyFilter::default()).unwrap();
        assert_eq!(report.omissions.len(), 1);
        assert_eq!(report.omissions["MacBook Pro"], ["A1234"]);
        assert!(report.suggestions.is_empty());
        assert!(!report.is_clean());
    }

    #[test]
    fn unknown_code_is_fatal() {
        let db = Database::new(vec![model("MacBookPro11,1", &["FH00"], &[])]).unwrap();
        let err = validate_products(&db, &Products::default(), &FamilyFilter::default()).unwrap_err();
        assert!(matches!(err, ModelsError::UnknownProduct(code) if code == "FH00"));
    }

    #[test]
    fn retired_code_is_fatal() {
        let products: Products = [("FH00".to_string(), entry("MacBook Pro", ProductStatus::NotOk))]
            .into_iter()
            .collect();
        let db = Database::new(vec![model("MacBookPro11,1", &["FH00"], &[])]).unwrap();
        let err = validate_products(&db, &products, &FamilyFilter::default()).unwrap_err();
        assert!(matches!(err, ModelsError::InvalidProduct(_)));
    }

    #[test]
    fn out_of_family_and_short_codes_are_ignored() {
        let products: Products = [
            ("AB1".to_string(), entry("MacBook Air", ProductStatus::Ok)),
            ("Q6L4".to_string(), entry("iPhone 6", ProductStatus::Ok)),
            ("Q05P".to_string(), entry("MacBook Air (M1, 2020)", ProductStatus::Ok)),
            ("Q05R".to_string(), entry("Mac mini (Late 2014)", ProductStatus::NotOk)),
            ("G8WN".to_string(), entry("MacBook Air (13-inch, 2017)", ProductStatus::Ok)),
        ]
        .into_iter()
        .collect();
        let db = Database::new(vec![model("MacBookAir7,2", &["G8WN"], &[])]).unwrap();

        let report = validate_products(&db, &products, &FamilyFilter::default()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.used, ["G8WN"]);
    }

    #[test]
    fn short_code_len_is_an_inclusive_cutoff() {
        let products: Products = [
            ("XS1".to_string(), entry("Xserve", ProductStatus::Ok)),
            ("XS01".to_string(), entry("Xserve", ProductStatus::Ok)),
            ("XS001".to_string(), entry("Xserve", ProductStatus::Ok)),
        ]
        .into_iter()
        .collect();

        let report = validate_products(&Database::default(), &products, &FamilyFilter::default()).unwrap();
        assert_eq!(report.omissions["Xserve"], ["XS01", "XS001"]);

        let filter = FamilyFilter {
            short_code_len: 4,
            ..Default::default()
        };
        let report = validate_products(&Database::default(), &products, &filter).unwrap();
        assert_eq!(report.omissions["Xserve"], ["XS001"]);
    }

    #[test]
    fn omissions_follow_registry_order() {
        let products: Products = [
            ("G8WN".to_string(), entry("MacBook Air (13-inch, 2017)", ProductStatus::Ok)),
            ("F5YV".to_string(), entry("iMac (Retina 5K, 27-inch, Late 2014)", ProductStatus::Ok)),
            ("DHJF".to_string(), entry("MacBook Air (13-inch, 2017)", ProductStatus::Ok)),
        ]
        .into_iter()
        .collect();

        let report = validate_products(&Database::default(), &products, &FamilyFilter::default()).unwrap();
        let names: Vec<_> = report.omissions.keys().map(String::as_str).collect();
        assert_eq!(names, ["MacBook Air (13-inch, 2017)", "iMac (Retina 5K, 27-inch, Late 2014)"]);
        assert_eq!(report.omissions["MacBook Air (13-inch, 2017)"], ["G8WN", "DHJF"]);
    }

    #[test]
    fn omissions_are_grouped_and_suggested() {
        let products: Products = [
            ("FH00".to_string(), entry("MacBook Pro (Retina, 13-inch, Late 2013)", ProductStatus::Ok)),
            ("FGYY".to_string(), entry("MacBook Pro (Retina, 13-inch, Late 2013)", ProductStatus::Ok)),
            ("FH01".to_string(), entry("MacBook Pro (Retina, 13-inch, Late 2013)", ProductStatus::Ok)),
            ("XS01".to_string(), entry("Xserve (Early 2009)", ProductStatus::Ok)),
        ]
        .into_iter()
        .collect();
        let db = Database::new(vec![model(
            "MacBookPro11,1",
            &["FH00"],
            &["MacBook Pro (Retina, 13-inch, Late 2013)"],
        )])
        .unwrap();

        let report = validate_products(&db, &products, &FamilyFilter::default()).unwrap();
        assert_eq!(
            report.omissions["MacBook Pro (Retina, 13-inch, Late 2013)"],
            ["FGYY", "FH01"]
        );
        assert_eq!(report.omissions["Xserve (Early 2009)"], ["XS01"]);
        assert_eq!(
            report.suggestions,
            [Suggestion {
                model: "MacBookPro11,1".into(),
                codes: vec!["FGYY".into(), "FH01".into()],
            }]
        );
    }

    #[test]
    fn suggestion_uses_substring_match() {
        let products: Products = [("F5YV".to_string(), entry("iMac (Retina 5K", ProductStatus::Ok))]
            .into_iter()
            .collect();
        let db = Database::new(vec![model(
            "iMac15,1",
            &[],
            &["iMac (Retina 5K, 27-inch, Late 2014)"],
        )])
        .unwrap();

        let report = validate_products(&db, &products, &FamilyFilter::default()).unwrap();
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].model, "iMac15,1");
    }

    #[test]
    fn shared_model_code_is_fatal() {
        let products: Products = [("FH00".to_string(), entry("MacBook Pro", ProductStatus::Ok))]
            .into_iter()
            .collect();
        let db = Database::new(vec![
            model("MacBookPro11,1", &["FH00"], &[]),
            model("MacBookPro11,2", &["FH00"], &[]),
        ])
        .unwrap();
        assert!(matches!(
            validate_products(&db, &products, &FamilyFilter::default()),
            Err(ModelsError::SharedCode { .. })
        ));
    }
}
