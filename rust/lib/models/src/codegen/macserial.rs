/// Serial number generator header (`modelinfo_autogen.h`).
///
/// Every lookup table is indexed by the `AppleModel` enum, so all of them
/// follow database order. Row widths are padded to the widest model.

use std::path::PathBuf;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;

use crate::error::Result;
use crate::loader::Database;
use crate::products::Products;
use crate::record::ModelRecord;

use super::{Codegen, GeneratedFile, join_decimal};

pub struct MacSerialGenerator {
    pub path: PathBuf,
}

impl MacSerialGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Codegen for MacSerialGenerator {
    fn generate(&self, db: &Database, products: &Products) -> Result<GeneratedFile> {
        let mut h = String::new();

        h.push_str("#ifndef GENSERIAL_MODELINFO_AUTOGEN_H\n");
        h.push_str("#define GENSERIAL_MODELINFO_AUTOGEN_H\n\n");
        h.push_str("// DO NOT EDIT! This is an autogenerated file.\n\n");
        h.push_str("#include \"macserial.h\"\n\n");

        h.push_str("typedef enum {\n");
        for info in db {
            h.push_str(&format!(
                "  {}, // {}\n",
                info.name().replace(',', "_"),
                info.primary_cpu()?
            ));
        }
        h.push_str("} AppleModel;\n\n");
        h.push_str(&format!("#define APPLE_MODEL_MAX {}\n\n", db.len()));

        h.push_str("static PLATFORMDATA ApplePlatformData[] = {\n");
        for info in db {
            h.push_str(&format!(
                "  {{ \"{}\", \"{}\" }},\n",
                info.name(),
                info.require_str("SystemSerialNumber", &info.system_serial_number)?
            ));
        }
        h.push_str("};\n\n");

        let model_codes = rows(db, |info| {
            info.require("AppleModelCode", info.apple_model_code.as_deref())
        })?;
        push_string_table(&mut h, db, "APPLE_MODEL_CODE_MAX", "AppleModelCode", &model_codes);

        let board_codes = rows(db, |info| {
            info.require("AppleBoardCode", info.apple_board_code.as_deref())
        })?;
        push_string_table(&mut h, db, "APPLE_BOARD_CODE_MAX", "AppleBoardCode", &board_codes);

        let years = rows(db, |info| {
            info.require("AppleModelYear", info.apple_model_year.as_deref())
        })?;
        let width = years.iter().map(|y| y.len()).max().unwrap_or(0);
        h.push_str(&format!("#define APPLE_MODEL_YEAR_MAX {}\n", width));
        h.push_str("static uint32_t AppleModelYear[][APPLE_MODEL_YEAR_MAX] = {\n");
        for (info, row) in db.iter().zip(&years) {
            h.push_str(&format!("  /* {:<14} */ {{{}}},\n", info.name(), join_decimal(*row)));
        }
        h.push_str("};\n\n");

        h.push_str("static uint32_t ApplePreferredModelYear[] = {\n");
        for info in db {
            h.push_str(&format!(
                "  /* {:<14} */ {},\n",
                info.name(),
                info.macserial_model_year.unwrap_or(0)
            ));
        }
        h.push_str("};\n\n");

        h.push_str("static APPLE_MODEL_DESC AppleModelDesc[] = {\n");
        let mut models: Vec<_> = products.iter().filter(|(_, e)| e.is_valid()).collect();
        models.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        for (code, entry) in models {
            h.push_str(&format!(" {{\"{}\", \"{}\"}},\n", code, remove_accents(&entry.name)));
        }
        h.push_str("};\n\n");

        h.push_str("#endif // GENSERIAL_MODELINFO_AUTOGEN_H\n");

        Ok(GeneratedFile::new(self.path.clone(), h))
    }

    fn name(&self) -> &str {
        "macserial"
    }
}

fn rows<'a, T>(
    db: &'a Database,
    field: impl Fn(&'a ModelRecord) -> Result<&'a [T]>,
) -> Result<Vec<&'a [T]>> {
    db.iter().map(field).collect()
}

fn push_string_table(h: &mut String, db: &Database, max: &str, table: &str, rows: &[&[String]]) {
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    h.push_str(&format!("#define {} {}\n", max, width));
    h.push_str(&format!("static const char *{}[][{}] = {{\n", table, max));
    for (info, row) in db.iter().zip(rows) {
        h.push_str(&format!(
            "  /* {:<14} */ {{\"{}\"}},\n",
            info.name(),
            row.join("\", \"")
        ));
    }
    h.push_str("};\n\n");
}

/// Decompose and drop combining marks, so `é` becomes `e`.
pub fn remove_accents(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}
