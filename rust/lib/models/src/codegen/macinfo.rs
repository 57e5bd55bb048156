/// Platform-info table generator (`AutoGenerated.c`).
///
/// Emits one `MAC_INFO_INTERNAL_ENTRY` per model released in or after
/// `min_year`, in database order.

use std::path::PathBuf;

use crate::error::Result;
use crate::loader::Database;
use crate::products::Products;
use crate::record::ModelRecord;

use super::{Codegen, GeneratedFile, join_decimal};

pub struct MacInfoGenerator {
    pub path: PathBuf,
    pub min_year: u32,
}

impl MacInfoGenerator {
    pub fn new(path: impl Into<PathBuf>, min_year: u32) -> Self {
        Self {
            path: path.into(),
            min_year,
        }
    }
}

impl Codegen for MacInfoGenerator {
    fn generate(&self, db: &Database, _products: &Products) -> Result<GeneratedFile> {
        let mut code = String::new();

        code.push_str("// DO NOT EDIT! This is an autogenerated file.\n");
        code.push_str("#include \"MacInfoInternal.h\"\n");
        code.push_str("CONST MAC_INFO_INTERNAL_ENTRY gMacInfoModels[] = {\n");

        for info in db {
            if info.max_model_year()? < self.min_year {
                continue;
            }
            code.push_str(&generate_entry(info)?);
        }

        code.push_str("};\n");
        code.push_str("CONST UINTN gMacInfoModelCount = ARRAY_SIZE (gMacInfoModels);\n");
        code.push_str("CONST UINTN gMacInfoDefaultModel = 0;\n");

        Ok(GeneratedFile::new(self.path.clone(), code))
    }

    fn name(&self) -> &str {
        "macinfo"
    }
}

fn generate_entry(info: &ModelRecord) -> Result<String> {
    let board_product = info
        .require("BoardProduct", info.board_products().first())?;

    let board_revision = info
        .board_revision
        .map(|v| format!("0x{:X}", v))
        .unwrap_or_else(|| "MAC_INFO_BOARD_REVISION_MISSING".to_string());

    let platform_feature = info
        .platform_feature
        .map(|v| format!("0x{:X}", v))
        .unwrap_or_else(|| "MAC_INFO_PLATFORM_FEATURE_MISSING".to_string());

    let secure_boot_model = match info.apple_model_id.as_deref() {
        Some(id) if !id.is_empty() => format!("\"{}\"", id.to_lowercase()),
        _ => "NULL".to_string(),
    };

    let smc = |v: &Option<Vec<u8>>| join_decimal(v.as_deref().unwrap_or(&[0]));

    let mut e = String::new();
    e.push_str(" {\n");
    e.push_str(&format!("  .SystemProductName = \"{}\",\n", info.name()));
    e.push_str(&format!("  .BoardProduct = \"{}\",\n", board_product));
    e.push_str(&format!("  .BoardRevision = {},\n", board_revision));
    e.push_str(&format!("  .SmcRevision = {{{}}},\n", smc(&info.smc_revision)));
    e.push_str(&format!("  .SmcBranch = {{{}}},\n", smc(&info.smc_branch)));
    e.push_str(&format!("  .SmcPlatform = {{{}}},\n", smc(&info.smc_platform)));
    e.push_str(&format!(
        "  .BIOSVersion = \"{}\",\n",
        info.require_str("BIOSVersion", &info.bios_version)?
    ));
    e.push_str(&format!(
        "  .BIOSReleaseDate = \"{}\",\n",
        info.require_str("BIOSReleaseDate", &info.bios_release_date)?
    ));
    e.push_str(&format!(
        "  .SystemVersion = \"{}\",\n",
        info.require_str("SystemVersion", &info.system_version)?
    ));
    e.push_str(&format!(
        "  .SystemSKUNumber = \"{}\",\n",
        info.require_str("SystemSKUNumber", &info.system_sku_number)?
    ));
    e.push_str(&format!(
        "  .SystemFamily = \"{}\",\n",
        info.require_str("SystemFamily", &info.system_family)?
    ));
    e.push_str(&format!(
        "  .BoardVersion = \"{}\",\n",
        info.require_str("BoardVersion", &info.board_version)?
    ));
    e.push_str(&format!(
        "  .BoardAssetTag = \"{}\",\n",
        info.require_str("BoardAssetTag", &info.board_asset_tag)?
    ));
    e.push_str(&format!(
        "  .BoardLocationInChassis = \"{}\",\n",
        info.require_str("BoardLocationInChassis", &info.board_location_in_chassis)?
    ));
    e.push_str(&format!(
        "  .SmcGeneration = 0x{:X},\n",
        info.require_u32("SmcGeneration", info.smc_generation)?
    ));
    e.push_str(&format!(
        "  .BoardType = 0x{:X},\n",
        info.require_u32("BoardType", info.board_type)?
    ));
    e.push_str(&format!(
        "  .ChassisType = 0x{:X},\n",
        info.require_u32("ChassisType", info.chassis_type)?
    ));
    e.push_str(&format!(
        "  .MemoryFormFactor = 0x{:X},\n",
        info.require_u32("MemoryFormFactor", info.memory_form_factor)?
    ));
    e.push_str(&format!("  .PlatformFeature = {},\n", platform_feature));
    e.push_str(&format!(
        "  .ChassisAssetTag = \"{}\",\n",
        info.require_str("ChassisAssetTag", &info.chassis_asset_tag)?
    ));
    e.push_str(&format!(
        "  .FirmwareFeatures = 0x{:X}ULL,\n",
        info.effective_firmware_features()
    ));
    e.push_str(&format!(
        "  .FirmwareFeaturesMask = 0x{:X}ULL,\n",
        info.effective_firmware_features_mask()
    ));
    e.push_str(&format!("  .SecureBootModel = {},\n", secure_boot_model));
    e.push_str(" },\n");

    Ok(e)
}
