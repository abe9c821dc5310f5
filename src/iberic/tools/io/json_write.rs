use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::iberic::tools::error::Result;

/// Serialises `value` as pretty JSON and writes it to `path` in one go,
/// creating the parent directory when needed. Nothing is written if
/// serialisation fails.
#[instrument(level = "debug", skip(value), fields(output = %path.display()))]
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json_string = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &json_string)?;
    debug!(bytes = json_string.len(), "wrote JSON artifact");
    Ok(())
}
