//! Directory-level processing.
//!
//! Every file is read in isolation: an unreadable or malformed extract is
//! recorded in the report and the batch moves on.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use crate::adapter::read_extract;
use crate::classification::ClassificationTables;
use crate::config::ExtractSettings;
use crate::error::{ExtractError, Result};
use crate::record::NormalizedRecord;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<NormalizedRecord>,
    /// Well-formed files of an unsupported schema.
    pub unsupported: Vec<PathBuf>,
    /// Files that could not be read or parsed, with the error message.
    pub failed: Vec<(PathBuf, String)>,
    /// Recognized files that carried no usable boundary.
    pub without_geometry: Vec<PathBuf>,
}

impl BatchReport {
    /// Number of files that produced a record.
    pub fn processed(&self) -> usize {
        self.records.len()
    }

    pub fn total(&self) -> usize {
        self.records.len() + self.unsupported.len() + self.failed.len()
    }
}

/// `*.xml` files directly inside `dir`, sorted by path.
///
/// # Errors
/// Returns `Io` when the directory cannot be listed.
pub fn xml_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| ExtractError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ExtractError::io(dir, e))?.path();
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Normalize one file; `Ok(None)` when its schema is not supported.
///
/// # Errors
/// Returns `Io` or `Xml` when the file cannot be read or parsed.
pub fn process_file(
    path: &Path,
    tables: &ClassificationTables,
    settings: &ExtractSettings,
) -> Result<Option<NormalizedRecord>> {
    read_extract(path, tables, settings)
}

/// Normalize every file, advancing `progress` once per file.
pub fn process_batch(
    files: &[PathBuf],
    tables: &ClassificationTables,
    settings: &ExtractSettings,
    progress: Option<&ProgressBar>,
) -> BatchReport {
    let mut report = BatchReport::default();

    for path in files {
        if let Some(pb) = progress {
            pb.set_message(
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        match process_file(path, tables, settings) {
            Ok(Some(record)) => {
                if !record.has_geometry() {
                    report.without_geometry.push(path.clone());
                }
                report.records.push(record);
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "unsupported schema");
                report.unsupported.push(path.clone());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to process extract");
                report.failed.push((path.clone(), e.to_string()));
            }
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    report
}
