use crate::error::Result;
use serde_json::json;
use std::fs;
use std::path::Path;

/// Dataset descriptor filename at the standardized root
pub const DESCRIPTOR_FILE: &str = "dataset_description.json";

/// Synthesizes the top-level dataset descriptor once
///
/// Downstream pipelines refuse a dataset root without this document. An
/// existing descriptor is left untouched.
pub fn ensure_dataset_description(root: &Path) -> Result<()> {
    let path = root.join(DESCRIPTOR_FILE);
    if path.exists() {
        return Ok(());
    }

    let doc = json!({
        "Name": "rawbids",
        "BIDSVersion": "1.4.0",
    });
    let mut pretty = serde_json::to_string_pretty(&doc)?;
    pretty.push('\n');
    fs::write(path, pretty)?;
    Ok(())
}
