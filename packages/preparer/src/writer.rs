//! Output files: `.prepared` texts and the consolidated metadata table.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{PreparerError, Result};
use crate::types::{AttributeSet, MetadataRecord};

/// Write a file atomically.
///
/// Writes to a hidden temp file next to the target, syncs it to disk, then
/// renames it over the target, so a crash never leaves a half-written file.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    if let Err(e) = write_and_replace(&temp_file, path, content) {
        // Leave nothing behind next to the target
        let _ = fs::remove_file(&temp_file);
        return Err(e.into());
    }
    debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

fn write_and_replace(temp_file: &Path, path: &Path, content: &[u8]) -> std::io::Result<()> {
    {
        let mut file = File::create(temp_file)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(temp_file, path)
}

/// Render the metadata table as CSV.
///
/// Header: the attribute set in first-seen order, then `pair_id` and
/// `filename`. One row per record, in the given order.
pub fn metadata_table(records: &[MetadataRecord], attributes: &AttributeSet) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(attributes.columns())?;
    for record in records {
        writer.write_record(record.row(attributes))?;
    }
    writer
        .into_inner()
        .map_err(|e| PreparerError::Io(e.into_error()))
}

/// Write the metadata table to `path`.
pub fn write_metadata(
    records: &[MetadataRecord],
    attributes: &AttributeSet,
    path: &Path,
) -> Result<()> {
    let table = metadata_table(records, attributes)?;
    write_atomic(path, &table)
}
