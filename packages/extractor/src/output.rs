//! Record serialization for the command-line shell.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use clap::ValueEnum;

use crate::error::{ExtractError, Result};
use crate::record::NormalizedRecord;

/// Serialization format of normalized records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One YAML document holding a sequence of records.
    #[default]
    Yaml,
    /// One JSON object per line.
    Json,
}

/// Render records as a YAML sequence with a document start marker.
pub fn to_yaml(records: &[NormalizedRecord]) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(records)?;
    let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Render records as JSON lines.
pub fn to_json_lines(records: &[NormalizedRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn render(records: &[NormalizedRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => to_yaml(records),
        OutputFormat::Json => to_json_lines(records),
    }
}

/// Write rendered output to `path`.
///
/// Writes to a temp file next to the target, syncs it and renames it over
/// the target, so an interrupted run never leaves a truncated file.
pub fn save_output(content: &str, path: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ExtractError::InvalidInput(format!("not a file path: {}", path.display())))?;
    let temp_file = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    {
        let mut file = File::create(&temp_file).map_err(|e| ExtractError::io(&temp_file, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| ExtractError::io(&temp_file, e))?;
        file.sync_all().map_err(|e| ExtractError::io(&temp_file, e))?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path).map_err(|e| ExtractError::io(path, e))?;
    }

    fs::rename(&temp_file, path).map_err(|e| ExtractError::io(path, e))
}
