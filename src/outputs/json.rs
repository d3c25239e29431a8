//! JSON output of the scraped chapels.
//!
//! The file is a pretty-printed array (two-space indentation) in UTF-8 with
//! non-ASCII characters written as-is, so accented place names stay
//! readable. It is written even when nothing was scraped.

use crate::models::ChapelRecord;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `chapels` the way they are written to disk.
pub fn to_json(chapels: &[ChapelRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(chapels)
}

/// Write `chapels` to `path`, creating missing parent directories.
///
/// # Returns
///
/// `Ok(())` on success, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = chapels.len()))]
pub async fn write_chapels(chapels: &[ChapelRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = to_json(chapels)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!("Chapels saved");

    Ok(())
}
