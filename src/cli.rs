//! Command-line interface for the converter.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{convert_section, convert_sections, BatchOptions};
use crate::config::{validate_date, validate_jurisdiction_id};
use crate::error::Result;
use crate::types::Section;
use crate::xml::LegalXmlFormat;

/// Statute XML converter - turn fetched statute sections into legal XML.
#[derive(Parser)]
#[command(name = "statute-xml")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Akoma Ntoso 3.0
    Akn,
    /// USLM 1.0
    Uslm,
}

impl From<OutputFormat> for LegalXmlFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Akn => Self::AkomaNtoso,
            OutputFormat::Uslm => Self::Uslm,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one section JSON file to XML.
    Convert {
        /// Path to a Section JSON file (fetcher output)
        input: PathBuf,

        /// Target schema
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Akn)]
        format: OutputFormat,

        /// Generation date in YYYY-MM-DD format (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Output directory (default: output/)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a batch: a JSON array file or a directory of JSON files.
    Batch {
        /// Path to a JSON array of Sections, or a directory of *.json files
        input: PathBuf,

        /// Target schema
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Akn)]
        format: OutputFormat,

        /// Generation date in YYYY-MM-DD format (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Output directory (default: output/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads (default: one per core)
        #[arg(short, long, default_value_t = 0)]
        workers: usize,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            format,
            date,
            output,
        } => convert_command(&input, format, date.as_deref(), output.as_deref()),
        Commands::Batch {
            input,
            format,
            date,
            output,
            workers,
        } => batch_command(&input, format, date.as_deref(), output.as_deref(), workers),
    }
}

fn effective_date(date: Option<&str>) -> Result<String> {
    let date = date
        .map(String::from)
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    validate_date(&date)?;
    Ok(date)
}

fn effective_output(output: Option<&Path>) -> PathBuf {
    output.map_or_else(|| PathBuf::from("output"), Path::to_path_buf)
}

fn convert_command(
    input: &Path,
    format: OutputFormat,
    date: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let date = effective_date(date)?;
    let section = load_section(input)?;

    println!(
        "{} {} {} § {}",
        style("Converting").bold(),
        style(&section.jurisdiction).cyan(),
        section.code,
        style(&section.section_number).green()
    );

    let options = BatchOptions::new(format.into(), date, effective_output(output));
    let path = convert_section(&section, &options)?;

    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        path.display()
    );
    Ok(())
}

fn batch_command(
    input: &Path,
    format: OutputFormat,
    date: Option<&str>,
    output: Option<&Path>,
    workers: usize,
) -> Result<()> {
    let date = effective_date(date)?;
    let sections = load_sections(input)?;

    println!(
        "{} {} sections",
        style("Converting").bold(),
        style(sections.len()).cyan()
    );

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Converting sections...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let options =
        BatchOptions::new(format.into(), date, effective_output(output)).with_workers(workers);
    let report = convert_sections(&sections, &options);

    pb.finish_and_clear();

    println!(
        "  {} {}",
        style("Converted:").green().bold(),
        report.converted
    );
    if report.failed > 0 {
        println!("  {} {}", style("Failed:").red().bold(), report.failed);
    }
    Ok(())
}

/// Load one Section from a JSON file, rejecting malformed jurisdiction ids.
fn load_section(path: &Path) -> Result<Section> {
    let content = fs::read_to_string(path)?;
    let section: Section = serde_json::from_str(&content)?;
    validate_jurisdiction_id(&section.jurisdiction)?;
    Ok(section)
}

/// Load a batch: either a JSON array file or a directory of `*.json` files.
fn load_sections(path: &Path) -> Result<Vec<Section>> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        let mut sections = Vec::with_capacity(files.len());
        for file in files {
            sections.push(load_section(&file)?);
        }
        return Ok(sections);
    }

    let content = fs::read_to_string(path)?;
    let sections: Vec<Section> = if content.trim_start().starts_with('[') {
        serde_json::from_str(&content)?
    } else {
        vec![serde_json::from_str(&content)?]
    };
    for section in &sections {
        validate_jurisdiction_id(&section.jurisdiction)?;
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from(["statute-xml", "convert", "section.json"]);

        let Commands::Convert {
            input,
            format,
            date,
            output,
        } = cli.command
        else {
            panic!("expected convert command");
        };
        assert_eq!(input, PathBuf::from("section.json"));
        assert_eq!(format, OutputFormat::Akn);
        assert!(date.is_none());
        assert!(output.is_none());
    }

    #[test]
    fn test_cli_parse_batch_with_options() {
        let cli = Cli::parse_from([
            "statute-xml",
            "batch",
            "sections/",
            "--format",
            "uslm",
            "--date",
            "2025-06-01",
            "--workers",
            "8",
        ]);

        let Commands::Batch {
            format,
            date,
            workers,
            ..
        } = cli.command
        else {
            panic!("expected batch command");
        };
        assert_eq!(format, OutputFormat::Uslm);
        assert_eq!(date.as_deref(), Some("2025-06-01"));
        assert_eq!(workers, 8);
    }

    #[test]
    fn test_load_sections_array_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(
            &path,
            r#"[{"jurisdiction":"us","code":"26","section_number":"61"},
               {"jurisdiction":"us-ca","code":"RTC","section_number":"17041"}]"#,
        )
        .unwrap();

        let sections = load_sections(&path).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].code, "RTC");
    }

    #[test]
    fn test_load_sections_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"jurisdiction":"us","code":"26","section_number":"62"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"jurisdiction":"us","code":"26","section_number":"61"}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sections = load_sections(dir.path()).unwrap();
        assert_eq!(sections.len(), 2);
        // Files load in sorted order.
        assert_eq!(sections[0].section_number, "61");
        assert_eq!(sections[1].section_number, "62");
    }

    #[test]
    fn test_load_section_rejects_malformed_jurisdiction_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("section.json");
        fs::write(
            &path,
            r#"{"jurisdiction":"California","code":"RTC","section_number":"17041"}"#,
        )
        .unwrap();

        assert!(load_section(&path).is_err());
        assert!(load_sections(&path).is_err());
    }

    #[test]
    fn test_effective_date_rejects_malformed() {
        assert!(effective_date(Some("June 1")).is_err());
        assert!(effective_date(Some("2025-06-01")).is_ok());
    }
}
