use crate::error::{RawbidsError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Sidecar key linking a field map to the image it corrects
pub const INTENDED_FOR_KEY: &str = "IntendedFor";

/// Points a field-map sidecar at the image it was acquired to correct
///
/// Reads the sidecar as a JSON mapping, drops any stale link, sets the
/// link to `target` and rewrites the document with stable indentation.
/// The rewrite goes through a temp file in the same directory followed by
/// a rename, so a failure mid-write cannot leave a truncated sidecar.
pub fn set_intended_for(sidecar: &Path, target: &str) -> Result<()> {
    let text = fs::read_to_string(sidecar)?;
    let mut doc: Value = serde_json::from_str(&text)?;
    let map = doc
        .as_object_mut()
        .ok_or_else(|| RawbidsError::MalformedSidecar(sidecar.to_path_buf()))?;

    map.remove(INTENDED_FOR_KEY);
    map.insert(
        INTENDED_FOR_KEY.to_string(),
        Value::String(target.to_string()),
    );

    let mut pretty = serde_json::to_string_pretty(&doc)?;
    pretty.push('\n');

    let tmp = sidecar.with_extension("json.tmp");
    fs::write(&tmp, pretty)?;
    fs::rename(&tmp, sidecar)?;
    Ok(())
}
