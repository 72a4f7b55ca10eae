//! End-to-end tour of a SAR product naming convention.
//!
//! Defines a filename schema and a directory hierarchy for a fictitious
//! radar mission, builds and parses product names, then discovers a small
//! on-disk tree.
//!
//! Run with: `cargo run --example sar_naming`

use std::collections::HashMap;
use std::fs;

use chrono::NaiveDate;
use pathscheme::{
    FieldDefinition, FieldValue, FilenameSchema, NamingError, PathLevelSpec, SmartFilename,
    SmartPath, SmartTree, TimestampCodec,
};

fn product_schema() -> Result<FilenameSchema, NamingError> {
    Ok(FilenameSchema::new(vec![
        FieldDefinition::new("var_name").max_length(9),
        FieldDefinition::new("datetime_1")
            .max_length(15)
            .codec(TimestampCodec::new("%Y%m%dT%H%M%S")),
        FieldDefinition::new("band").max_length(2),
        FieldDefinition::new("tile_name").max_length(10),
        FieldDefinition::new("creator").optional(),
    ])?
    .with_extension(".tif"))
}

fn main() -> Result<(), NamingError> {
    // Build a product name from typed values.
    let schema = product_schema()?;
    let stamp = NaiveDate::from_ymd_opt(2021, 1, 28)
        .and_then(|d| d.and_hms_opt(18, 42, 53))
        .map(FieldValue::DateTime);

    let mut values = HashMap::new();
    values.insert("var_name".to_string(), FieldValue::from("SIG0"));
    if let Some(stamp) = stamp {
        values.insert("datetime_1".to_string(), stamp);
    }
    values.insert("band".to_string(), FieldValue::from("VH"));
    values.insert("tile_name".to_string(), FieldValue::from("E036N039T3"));

    let name = SmartFilename::new(schema.clone(), values)?;
    let rendered = name.render()?;
    println!("built:  {rendered}");

    // Parse it back; the timestamp comes out typed.
    let parsed = SmartFilename::from_filename(schema, &rendered)?;
    println!("stamp:  {:?}", parsed.datetime("datetime_1"));
    println!("band:   {:?}", parsed.get("band"));

    // Lay out a tiny archive and walk it.
    let root = std::env::temp_dir().join("pathscheme_demo");
    for tile in ["E036N039T3", "E048N012T6"] {
        let spec = PathLevelSpec::new(["root", "mode", "tile"])?
            .with_level("root", root.to_string_lossy())?
            .with_level("mode", "IWGRDH")?
            .with_level("tile", tile)?;
        let path = SmartPath::new(spec);
        path.materialize()?;
        fs::write(path.directory().join(&rendered), b"").map_err(|source| NamingError::Io {
            operation: "write",
            path: path.directory().join(&rendered),
            source,
        })?;
    }

    let mut tree = SmartTree::new(&root, ["mode", "tile"])?;
    tree.discover(None, Some(r"\.tif$"))?;
    println!(
        "tree:   {} dirs, {} files under {}",
        tree.count_dirs(),
        tree.count_files(),
        root.display()
    );
    for dir in tree.all_dirs() {
        println!("  {}", dir.display());
    }

    // Subset to one tile and re-root there.
    let subtree = tree.filter_unique_rebased("tile", "E048N012T6")?;
    println!("subtree root: {}", subtree.root().display());

    Ok(())
}
