//! Command-line interface for the extractor.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::adapter::read_extract;
use crate::batch::{process_batch, xml_files, BatchReport};
use crate::classification::ClassificationTables;
use crate::config::ExtractSettings;
use crate::error::{ExtractError, Result};
use crate::output::{render, save_output, OutputFormat};

/// EGRN Extractor - Normalize Rosreestr XML extracts into flat records.
#[derive(Parser)]
#[command(name = "egrn-extractor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a single extract and print the record.
    Inspect {
        /// Extract XML file
        file: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Normalize every XML extract in a directory.
    Batch {
        /// Directory holding the extracts
        dir: PathBuf,

        #[command(flatten)]
        run: RunArgs,

        /// Write the records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Directory with the classification tables (region.csv, status.csv, ...)
    #[arg(short, long)]
    pub tables: Option<PathBuf>,

    /// Name the district administration as owner when no right is registered
    #[arg(long)]
    pub admin_fallback: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl RunArgs {
    fn settings(&self) -> ExtractSettings {
        ExtractSettings::new().with_admin_fallback(self.admin_fallback)
    }

    fn load_tables(&self) -> Result<ClassificationTables> {
        match &self.tables {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(ExtractError::InvalidInput(format!(
                        "Tables directory does not exist: {}",
                        dir.display()
                    )));
                }
                ClassificationTables::load_dir(dir)
            }
            None => {
                tracing::warn!("no classification tables given, codes are printed as-is");
                Ok(ClassificationTables::default())
            }
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file, run } => inspect_command(&file, &run),
        Commands::Batch { dir, run, output } => batch_command(&dir, &run, output.as_deref()),
    }
}

/// Execute the inspect command.
fn inspect_command(file: &Path, run: &RunArgs) -> Result<()> {
    let tables = run.load_tables()?;

    match read_extract(file, &tables, &run.settings())? {
        Some(record) => {
            print!("{}", render(std::slice::from_ref(&record), run.format)?);
            if !record.has_geometry() {
                eprintln!("{}", style("No boundary data in this extract").yellow());
            }
        }
        None => {
            eprintln!(
                "{} {}",
                style("Schema not recognized:").yellow().bold(),
                file.display()
            );
        }
    }

    Ok(())
}

/// Execute the batch command.
fn batch_command(dir: &Path, run: &RunArgs, output: Option<&Path>) -> Result<()> {
    if !dir.is_dir() {
        return Err(ExtractError::InvalidInput(format!(
            "Input path is not a directory: {}",
            dir.display()
        )));
    }

    let tables = run.load_tables()?;
    let files = xml_files(dir)?;

    eprintln!(
        "{} {} files in {}",
        style("Processing").bold(),
        style(files.len()).cyan(),
        style(dir.display()).green()
    );

    let pb = ProgressBar::new(files.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30}] {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let report = process_batch(&files, &tables, &run.settings(), Some(&pb));
    pb.finish_and_clear();

    let content = render(&report.records, run.format)?;
    match output {
        Some(path) => {
            save_output(&content, path)?;
            eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => print!("{content}"),
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &BatchReport) {
    eprintln!();
    eprintln!(
        "  Processed: {}",
        style(format!("{}/{}", report.processed(), report.total())).green()
    );

    if !report.unsupported.is_empty() {
        eprintln!(
            "  Unsupported: {}",
            style(report.unsupported.len()).yellow().bold()
        );
        for path in &report.unsupported {
            eprintln!("    {}", path.display());
        }
    }

    if !report.failed.is_empty() {
        eprintln!("  Failed: {}", style(report.failed.len()).red().bold());
        for (path, error) in &report.failed {
            eprintln!("    {}: {error}", path.display());
        }
    }

    if !report.without_geometry.is_empty() {
        eprintln!(
            "  Without boundary data: {}",
            style(report.without_geometry.len()).yellow()
        );
        for path in &report.without_geometry {
            eprintln!("    {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_inspect() {
        let cli = Cli::parse_from(["egrn-extractor", "inspect", "kvzu.xml"]);

        let Commands::Inspect { file, run } = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(file, PathBuf::from("kvzu.xml"));
        assert!(run.tables.is_none());
        assert!(!run.admin_fallback);
        assert_eq!(run.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_cli_parse_batch_with_options() {
        let cli = Cli::parse_from([
            "egrn-extractor",
            "batch",
            "extracts",
            "--tables",
            "tables",
            "--admin-fallback",
            "--format",
            "json",
            "--output",
            "records.jsonl",
        ]);

        let Commands::Batch { dir, run, output } = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(dir, PathBuf::from("extracts"));
        assert_eq!(run.tables, Some(PathBuf::from("tables")));
        assert!(run.admin_fallback);
        assert!(run.settings().admin_fallback);
        assert_eq!(run.format, OutputFormat::Json);
        assert_eq!(output, Some(PathBuf::from("records.jsonl")));
    }

    #[test]
    fn test_missing_tables_dir_is_rejected() {
        let run = RunArgs {
            tables: Some(PathBuf::from("/nonexistent/tables")),
            admin_fallback: false,
            format: OutputFormat::Yaml,
        };
        assert!(matches!(run.load_tables(), Err(ExtractError::InvalidInput(_))));
    }
}
