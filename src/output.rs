//! Report persistence.
//!
//! [`ReportSink`] accepts a finished report; [`CsvReportSink`] writes it as a
//! CSV file. [`read_report`] loads a report written by an earlier run.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::ReportRow;

/// Destination for a final report.
pub trait ReportSink {
    fn write(&mut self, rows: &[ReportRow]) -> Result<()>;
}

/// Writes a report to a CSV file, replacing any existing file.
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    path: PathBuf,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvReportSink {
    fn write(&mut self, rows: &[ReportRow]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("cannot create {}", self.path.display()))?;
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

        // serialize() only emits the header alongside the first row.
        if rows.is_empty() {
            writer.write_record(ReportRow::HEADERS)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(path = %self.path.display(), rows = rows.len(), "Report written");
        Ok(())
    }
}

/// Reads a report CSV produced by [`CsvReportSink`].
pub fn read_report(path: &Path) -> Result<Vec<ReportRow>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: ReportRow =
            result.with_context(|| format!("malformed report row in {}", path.display()))?;
        rows.push(record);
    }

    debug!(path = %path.display(), rows = rows.len(), "Report loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(question: &str, statistics: &str, sum: Option<f64>) -> ReportRow {
        ReportRow {
            college: "College of Science".to_string(),
            department: "Chemistry".to_string(),
            term: "Fall Semester 2022".to_string(),
            course_offering: "2229_CHEM_100_01_1491".to_string(),
            course: String::new(),
            faculty: "Ada Lovelace".to_string(),
            num_enrolled: Some(3),
            num_responses: 2,
            return_percent: "66.67%".to_string(),
            question: question.to_string(),
            statistics: statistics.to_string(),
            sum,
        }
    }

    #[test]
    fn test_write_creates_parent_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transformation").join("uwide.csv");

        let mut sink = CsvReportSink::new(&path);
        sink.write(&[sample_row("Pace", "0.50,4,4.50", None)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "College,Department,Term,Course Offering,Course,Faculty,Num Enrolled,\
             Num Responses,Return Percent,Question,\"Std Dev, Median, Mean/ Feedback\",Sum"
        );
        assert!(lines.next().unwrap().ends_with("Pace,\"0.50,4,4.50\","));
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        CsvReportSink::new(&path).write(&[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "College,Department,Term,Course Offering,Course,Faculty,Num Enrolled,\
             Num Responses,Return Percent,Question,\"Std Dev, Median, Mean/ Feedback\",Sum"
        );
        assert!(lines.next().is_none());
        assert!(read_report(&path).unwrap().is_empty());
    }

    #[test]
    fn test_header_constant_matches_serialized_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.csv");
        CsvReportSink::new(&path)
            .write(&[sample_row("Pace", "0.00,4,4.00", None)])
            .unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, ReportRow::HEADERS);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let mut sink = CsvReportSink::new(&path);
        sink.write(&[sample_row("Pace", "0.50,4,4.50", None)]).unwrap();
        sink.write(&[sample_row("Pace", "0.50,4,4.50", None)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_read_back_written_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let rows = vec![
            sample_row("I enjoyed this course", "", Some(9.0)),
            sample_row("Comments", "Too fast | Great labs", None),
        ];

        CsvReportSink::new(&path).write(&rows).unwrap();
        let loaded = read_report(&path).unwrap();

        assert_eq!(loaded, rows);
    }
}
