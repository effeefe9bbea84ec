//! Batch conversion of sections to XML files.
//!
//! Sections are independent, so the batch runs on a fixed-size worker pool
//! with no completion-order guarantee; per-file output stays deterministic
//! because the generation date is injected once for the whole batch. One
//! section's failure is counted and logged, never propagated to the rest.

use std::fs::{self, File};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use tracing::{info, warn};

use crate::citation::sanitize_id;
use crate::error::Result;
use crate::splitting::SplitEngine;
use crate::types::{Section, Statute};
use crate::xml::{serialize, LegalXmlFormat};

/// Options shared by every section in one batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Target schema.
    pub format: LegalXmlFormat,

    /// Generation date (YYYY-MM-DD) stamped into every document.
    pub generated_on: String,

    /// Worker threads; 0 means one per available core.
    pub workers: usize,

    /// Root of the output tree.
    pub output_dir: PathBuf,
}

impl BatchOptions {
    #[must_use]
    pub fn new(format: LegalXmlFormat, generated_on: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            format,
            generated_on: generated_on.into(),
            workers: 0,
            output_dir: output_dir.into(),
        }
    }

    /// Set the worker count explicitly.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        thread::available_parallelism().map_or(4, NonZeroUsize::get)
    }
}

/// Per-batch outcome counts.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Sections converted and written.
    pub converted: usize,

    /// Sections that failed; their files were never created.
    pub failed: usize,

    /// Paths written, sorted for stable reporting.
    pub outputs: Vec<PathBuf>,
}

/// Convert one section and write its XML file.
///
/// When the section carries flat text and no parsed subsections, the
/// splitter runs first; if it finds no structure either, the flat text is
/// rendered as paragraphs. The write is atomic (temp file, sync, rename),
/// so a failed conversion never leaves a partial file behind.
pub fn convert_section(section: &Section, options: &BatchOptions) -> Result<PathBuf> {
    let prepared = split_if_flat(section);
    let statute = Statute::from_section(&prepared)?;
    let xml = serialize(&statute, options.format, &options.generated_on);

    let path = output_path(&prepared, options);
    write_atomic(&path, &xml)?;
    Ok(path)
}

/// Convert a batch of sections on a worker pool.
pub fn convert_sections(sections: &[Section], options: &BatchOptions) -> BatchReport {
    let workers = options.effective_workers().min(sections.len().max(1));
    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next = &next;
            scope.spawn(move || loop {
                let index = next.fetch_add(1, Ordering::SeqCst);
                if index >= sections.len() {
                    break;
                }
                let section = &sections[index];
                let result = convert_section(section, options);
                let _ = tx.send((index, result));
            });
        }
    });
    drop(tx);

    let mut report = BatchReport::default();
    for (index, result) in rx {
        match result {
            Ok(path) => {
                report.converted += 1;
                report.outputs.push(path);
            }
            Err(err) => {
                let section = &sections[index];
                warn!(
                    jurisdiction = %section.jurisdiction,
                    section = %section.section_number,
                    error = %err,
                    "section conversion failed"
                );
                report.failed += 1;
            }
        }
    }
    report.outputs.sort();

    info!(
        converted = report.converted,
        failed = report.failed,
        "batch conversion finished"
    );
    report
}

/// Run the splitter on a section that arrived as flat text.
fn split_if_flat(section: &Section) -> Section {
    if !section.subsections.is_empty() || section.text.is_empty() {
        return section.clone();
    }
    let engine = SplitEngine::for_jurisdiction(&section.jurisdiction);
    let (lead, subsections) = engine.split(&section.text);
    if subsections.is_empty() {
        return section.clone();
    }
    let mut prepared = section.clone();
    prepared.text = lead;
    prepared.subsections = subsections;
    prepared
}

/// Output layout: `{output_dir}/{jurisdiction}/{code}/{section}.xml`.
fn output_path(section: &Section, options: &BatchOptions) -> PathBuf {
    options
        .output_dir
        .join(&section.jurisdiction)
        .join(sanitize_id(&section.code))
        .join(format!("{}.xml", sanitize_id(&section.section_number)))
}

/// Atomic write: temp file in the target directory, sync, rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out.xml".to_string());
    let temp_file = parent.join(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}
