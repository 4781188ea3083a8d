//! Turns the raw concatenated export into metadata-bearing survey records.

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::analyzers::classify::{clean_label, is_excluded_label};
use crate::analyzers::types::{Metadata, PreparedSurvey, SurveyRecord};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::parser::RawTable;
use crate::stats::{group_counts, parse_enrolled, return_percent};

static SEASON_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Spring|Summer|Fall|Winter)\s+(\d{4})$").expect("static regex")
});

/// Raw headers that feed [`Metadata`] and are never questions.
const METADATA_COLUMNS: &[&str] = &[
    "Subunit",
    "ID",
    "Participants",
    "Period",
    "Course",
    "College",
    "Department",
    "Term",
    "Course Offering",
    "Faculty",
    "Num Enrolled",
    "Num Responses",
    "Return Percent",
];

const NON_QUESTION_COLUMNS: &[&str] = &[
    "Form of Address",
    "Title",
    "First Name",
    "Last name",
    "Program of Study",
    "Location",
    "Course Type",
    "Secondary instructors",
    "Sheet",
    "timestamp",
    "Source of dataset",
];

/// `"Fall 2022"` becomes `"Fall Semester 2022"`; anything else is kept.
pub fn normalize_term(term: &str) -> String {
    SEASON_TERM.replace(term, "$1 Semester $2").into_owned()
}

struct Columns {
    subunit: usize,
    offering: usize,
    period: usize,
    enrolled: Option<usize>,
    course: Option<usize>,
    first_name: Option<usize>,
    last_name: Option<usize>,
}

impl Columns {
    fn locate(table: &RawTable) -> Result<Self, PipelineError> {
        let required = |name: &str| {
            table.column(name).ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_string(),
                source_name: "survey export".to_string(),
            })
        };

        Ok(Self {
            subunit: required("Subunit")?,
            offering: required("ID")?,
            period: required("Period")?,
            enrolled: table.column("Participants"),
            course: table.column("Course"),
            first_name: table.column("First Name"),
            last_name: table.column("Last name"),
        })
    }
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

/// Filters rows, derives metadata and selects the question columns.
#[tracing::instrument(skip_all, fields(rows = table.rows.len()))]
pub fn prepare_survey(table: &RawTable, config: &PipelineConfig) -> Result<PreparedSurvey> {
    let cols = Columns::locate(table)?;

    let kept: Vec<&Vec<String>> = table
        .rows
        .iter()
        .filter(|row| {
            let subunit = cell(row, Some(cols.subunit));
            config
                .subunit_prefix
                .as_deref()
                .is_none_or(|prefix| subunit.starts_with(prefix))
        })
        .filter(|row| {
            !cell(row, Some(cols.subunit)).to_lowercase().contains("test")
                && !cell(row, Some(cols.offering)).to_lowercase().contains("demo")
        })
        .collect();

    debug!(kept = kept.len(), dropped = table.rows.len() - kept.len(), "Rows filtered");

    let question_idx: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            let h = h.trim();
            !METADATA_COLUMNS.contains(&h)
                && !NON_QUESTION_COLUMNS.contains(&h)
                && !is_excluded_label(h)
        })
        .map(|(i, _)| i)
        .collect();

    let questions: Vec<String> = question_idx
        .iter()
        .map(|&i| clean_label(table.headers[i].trim()))
        .collect();

    let faculty: Vec<String> = kept
        .iter()
        .map(|row| {
            format!(
                "{} {}",
                cell(row, cols.first_name).trim(),
                cell(row, cols.last_name).trim()
            )
        })
        .collect();

    let terms: Vec<String> = kept
        .iter()
        .map(|row| normalize_term(cell(row, Some(cols.period))))
        .collect();

    let keys: Vec<(&str, &str, &str)> = kept
        .iter()
        .zip(terms.iter().zip(&faculty))
        .map(|(row, (term, fac))| {
            (term.as_str(), cell(row, Some(cols.offering)), fac.as_str())
        })
        .collect();
    let counts = group_counts(&keys);

    let records = kept
        .iter()
        .enumerate()
        .map(|(n, row)| {
            let subunit = cell(row, Some(cols.subunit));
            let department = subunit
                .split_whitespace()
                .last()
                .and_then(|code| config.department(code))
                .unwrap_or_default()
                .to_string();
            let num_enrolled = parse_enrolled(cell(row, cols.enrolled));

            SurveyRecord {
                meta: Metadata {
                    college: config.college.clone(),
                    department,
                    term: terms[n].clone(),
                    course_offering: cell(row, Some(cols.offering)).to_string(),
                    course: cell(row, cols.course).to_string(),
                    faculty: faculty[n].clone(),
                    num_enrolled,
                    num_responses: counts[n],
                    return_percent: return_percent(counts[n], num_enrolled),
                },
                responses: question_idx
                    .iter()
                    .map(|&i| {
                        let value = cell(row, Some(i));
                        (!value.is_empty()).then(|| value.to_string())
                    })
                    .collect(),
            }
        })
        .collect::<Vec<_>>();

    info!(
        records = records.len(),
        questions = questions.len(),
        "Survey prepared"
    );

    Ok(PreparedSurvey { questions, records })
}
