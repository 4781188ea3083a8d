//! Reconciliation of report course offerings against the registrar.
//!
//! Survey identifiers are transcoded into registrar order ([`key`]), joined on
//! (course id, term) against the registrar file ([`merge`]), and rebuilt with
//! the registrar's CRN when a match exists.

pub mod key;
pub mod merge;

pub use key::{CourseKey, RegistrarEntry, parse_registrar_id, parse_survey_id};
pub use merge::{Registry, corrected_offering, reconcile_rows};

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::DuplicateKeyPolicy;
use crate::error::PipelineError;
use crate::output::{CsvReportSink, ReportSink, read_report};

pub const REGISTRAR_ID_COLUMN: &str = "Course Offering ID";

/// Loads the registrar CSV and indexes every parseable `Course Offering ID`.
#[tracing::instrument(skip(path, policy), fields(path = %path.display()))]
pub fn load_registry(path: &Path, policy: DuplicateKeyPolicy) -> Result<Registry> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let id_col = rdr
        .headers()?
        .iter()
        .position(|h| h.trim() == REGISTRAR_ID_COLUMN)
        .ok_or_else(|| PipelineError::MissingColumn {
            column: REGISTRAR_ID_COLUMN.to_string(),
            source_name: path.display().to_string(),
        })?;

    let mut entries = Vec::new();
    let mut unparsed = 0usize;

    for result in rdr.records() {
        let record = result?;
        match record.get(id_col).and_then(|id| parse_registrar_id(id.trim())) {
            Some(entry) => entries.push(entry),
            None => unparsed += 1,
        }
    }

    debug!(parsed = entries.len(), unparsed, "Registrar rows read");
    let registry = Registry::build(entries, policy)?;
    info!(offerings = registry.len(), "Registry loaded");
    Ok(registry)
}

/// `reports/uwide.csv` becomes `<output_dir>/uwide-final.csv`.
pub fn final_report_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    output_dir.join(format!("{stem}-final.csv"))
}

/// Reconciles prior reports and writes a corrected copy of each.
///
/// Every report is read and reconciled before the first output is written,
/// so a bad input leaves no partial results behind.
#[tracing::instrument(skip_all, fields(reports = inputs.len()))]
pub fn reconcile_reports(
    inputs: &[PathBuf],
    registry: &Registry,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut reconciled = Vec::with_capacity(inputs.len());

    for input in inputs {
        let rows = read_report(input)?;
        let total = rows.len();
        let (rows, matched) = reconcile_rows(rows, registry);
        info!(
            input = %input.display(),
            total,
            matched,
            unmatched = total - matched,
            "Report reconciled"
        );
        reconciled.push((final_report_path(input, output_dir), rows));
    }

    let mut written = Vec::with_capacity(reconciled.len());
    for (out, rows) in reconciled {
        CsvReportSink::new(&out).write(&rows)?;
        written.push(out);
    }

    Ok(written)
}
