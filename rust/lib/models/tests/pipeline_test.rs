/// Integration test for the full generator run

use std::fs;
use std::path::{Path, PathBuf};

use macmodels::*;

fn record(name: &str, codes: &[&str], serial: &str, board: &str, max_os: &str) -> String {
    format!(
        r#"SystemProductName: {name}
BoardProduct: {board}
BoardRevision: 0x0F
BIOSVersion: 429.0.0.0.0
BIOSReleaseDate: 03/18/2020
SystemVersion: '1.0'
SystemSKUNumber: ' '
SystemFamily: MacBook Pro
BoardVersion: 1.0
BoardAssetTag: Base Board Asset Tag#
BoardLocationInChassis: Part Component
ChassisAssetTag: MacBook-Aluminum
SmcGeneration: 0x02
BoardType: 0x0A
ChassisType: 0x09
MemoryFormFactor: 0x1A
FirmwareFeatures: 0xFC0FE137
FirmwareFeaturesMask: 0xFF1FFF3F
AppleModelCode: [{codes}]
AppleBoardCode: [FY1]
AppleModelYear: [2013, 2014]
SystemSerialNumber: {serial}
MaximumOSVersion: {max_os}
Specifications:
  CPU: [Intel Core i5-4258U @ 2.40 GHz]
  SystemReportName: ['{name} report']
"#,
        codes = codes.join(", ")
    )
}

struct Fixture {
    _dir: tempfile::TempDir,
    config: GenConfig,
    out: PathBuf,
}

impl Fixture {
    fn new(records: &[(&str, String)], products: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("AppleModels");
        let db = root.join("DataBase");
        fs::create_dir_all(&db).unwrap();
        for (file, body) in records {
            let path = db.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        fs::write(db.join("Products.json"), products).unwrap();

        let out = dir.path().join("out");
        let config = GenConfig {
            root: Some(root),
            products_path: Some(db.join("Products.json")),
            macinfo_path: Some(out.join("AutoGenerated.c")),
            macserial_path: Some(out.join("modelinfo_autogen.h")),
            boards_path: Some(out.join("boards.json")),
            ..Default::default()
        };

        Self {
            _dir: dir,
            config,
            out,
        }
    }

    fn outputs(&self) -> Vec<Vec<u8>> {
        ["AutoGenerated.c", "modelinfo_autogen.h", "boards.json"]
            .iter()
            .map(|f| fs::read(self.out.join(f)).unwrap())
            .collect()
    }

    fn nothing_written(&self) -> bool {
        !Path::new(&self.out).exists()
    }
}

const PRODUCTS: &str = r#"{
    "FGYY": {"name": "MacBook Pro (Retina, 13-inch, Late 2013)", "status": "ok"},
    "FH00": {"name": "MacBook Pro (Retina, 13-inch, Late 2013)", "status": "ok"},
    "G8WN": {"name": "MacBook Air (13-inch, 2017)", "status": "ok"},
    "Q05P": {"name": "MacBook Air (M1, 2020)", "status": "ok"},
    "DV33": {"name": "MacBook Pro (Retina, 13-inch, Mid 2014)", "status": "not_ok"}
}"#;

fn two_models() -> Vec<(&'static str, String)> {
    vec![
        (
            "MacBookPro/MacBookPro11,1.yaml",
            record("MacBookPro11,1", &["FGYY", "FH00"], "C02JB041DV33", "Mac-189A3D4F975D5FFC", "11.7.10"),
        ),
        (
            "MacBookAir/MacBookAir7,2.yaml",
            record("MacBookAir7,2", &["G8WN"], "C02Q1HACK1H2", "Mac-937CB26E2E02BB01", "null"),
        ),
    ]
}

#[test]
fn test_full_run_is_idempotent() {
    let fx = Fixture::new(&two_models(), PRODUCTS);

    let summary = run(&fx.config).unwrap();
    assert_eq!(summary.models, 2);
    assert!(summary.written);
    assert!(summary.report.is_clean());
    let first = fx.outputs();

    run(&fx.config).unwrap();
    assert_eq!(fx.outputs(), first);

    let boards = String::from_utf8(first[2].clone()).unwrap();
    assert_eq!(
        boards,
        "{\n \"Mac-937CB26E2E02BB01\": \"latest\",\n \"Mac-189A3D4F975D5FFC\": \"11.7.10\"\n}"
    );

    let header = String::from_utf8(first[1].clone()).unwrap();
    assert!(header.contains("  MacBookAir7_2, // Intel Core i5-4258U @ 2.40 GHz\n"));
    assert!(header.contains("#define APPLE_MODEL_CODE_MAX 2\n"));
    // The serial keeps its DV33 suffix, the retired registry code is dropped.
    assert!(header.contains("  { \"MacBookPro11,1\", \"C02JB041DV33\" },\n"));
    assert!(header.contains(" {\"FGYY\", \"MacBook Pro (Retina, 13-inch, Late 2013)\"},\n"));
    assert!(!header.contains("{\"DV33\","));
}

#[test]
fn test_unknown_product_writes_nothing() {
    let mut models = two_models();
    models.push((
        "iMac/iMac14,2.yaml",
        record("iMac14,2", &["FLHH"], "C02LR1HACKHG", "Mac-27ADBB7B4CEE8E61", "10.15.7"),
    ));
    let fx = Fixture::new(&models, PRODUCTS);

    let err = run(&fx.config).unwrap_err();
    assert!(matches!(err, ModelsError::UnknownProduct(ref code) if code == "FLHH"));
    assert!(fx.nothing_written());
}

#[test]
fn test_retired_product_writes_nothing() {
    let fx = Fixture::new(
        &[(
            "MacBookPro11,2.yaml",
            record("MacBookPro11,2", &["DV33"], "C02JB041DV33", "Mac-3CBD00234E554E41", "11.7.10"),
        )],
        PRODUCTS,
    );
    assert!(matches!(run(&fx.config), Err(ModelsError::InvalidProduct(_))));
    assert!(fx.nothing_written());
}

#[test]
fn test_shared_code_writes_nothing() {
    let mut models = two_models();
    models.push((
        "MacBookPro/MacBookPro11,2.yaml",
        record("MacBookPro11,2", &["FH00"], "C02JB041DV34", "Mac-3CBD00234E554E41", "11.7.10"),
    ));
    let fx = Fixture::new(&models, PRODUCTS);

    assert!(matches!(run(&fx.config), Err(ModelsError::SharedCode { .. })));
    assert!(fx.nothing_written());
}

#[test]
fn test_empty_database_fails_before_validation() {
    // The registry is unreadable; an empty database must fail first.
    let fx = Fixture::new(&[], "not json");
    assert!(matches!(run(&fx.config), Err(ModelsError::EmptyDatabase(_))));
    assert!(fx.nothing_written());
}

#[test]
fn test_missing_field_writes_nothing() {
    let broken = record("MacBookAir7,2", &["G8WN"], "C02Q1HACK1H2", "Mac-937CB26E2E02BB01", "null")
        .replace("BIOSVersion: 429.0.0.0.0\n", "");
    let fx = Fixture::new(&[("MacBookAir7,2.yaml", broken)], PRODUCTS);

    let err = run(&fx.config).unwrap_err();
    assert!(matches!(err, ModelsError::MissingField { field: "BIOSVersion", .. }));
    assert!(fx.nothing_written());
}

#[test]
fn test_check_only_renders_without_writing() {
    let mut fx = Fixture::new(&two_models(), PRODUCTS);
    fx.config.check_only = true;

    let summary = run(&fx.config).unwrap();
    assert!(!summary.written);
    assert_eq!(summary.files.len(), 3);
    assert!(fx.nothing_written());
}

#[test]
fn test_unused_products_are_reported() {
    let fx = Fixture::new(&two_models()[..1], PRODUCTS);

    let summary = run(&fx.config).unwrap();
    assert_eq!(summary.report.omissions.len(), 1);
    assert_eq!(summary.report.omissions["MacBook Air (13-inch, 2017)"], ["G8WN"]);
    assert!(summary.report.suggestions.is_empty());
}
