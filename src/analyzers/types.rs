//! Data types used by the aggregation pipeline.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Per-offering columns copied onto every long row and report row.
///
/// Field order is the report's sort order. Unknown enrollment sorts after
/// every known value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Metadata {
    pub college: String,
    pub department: String,
    pub term: String,
    pub course_offering: String,
    pub course: String,
    pub faculty: String,
    pub num_enrolled: Option<u32>,
    pub num_responses: usize,
    pub return_percent: String,
}

impl Ord for Metadata {
    fn cmp(&self, other: &Self) -> Ordering {
        let enrolled = |m: &Metadata| (m.num_enrolled.is_none(), m.num_enrolled);

        self.college
            .cmp(&other.college)
            .then_with(|| self.department.cmp(&other.department))
            .then_with(|| self.term.cmp(&other.term))
            .then_with(|| self.course_offering.cmp(&other.course_offering))
            .then_with(|| self.course.cmp(&other.course))
            .then_with(|| self.faculty.cmp(&other.faculty))
            .then_with(|| enrolled(self).cmp(&enrolled(other)))
            .then_with(|| self.num_responses.cmp(&other.num_responses))
            .then_with(|| self.return_percent.cmp(&other.return_percent))
    }
}

impl PartialOrd for Metadata {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One respondent's row after preparation. `responses` is parallel to
/// [`PreparedSurvey::questions`].
#[derive(Debug, Clone)]
pub struct SurveyRecord {
    pub meta: Metadata,
    pub responses: Vec<Option<String>>,
}

/// Wide table ready for reshaping: cleaned question labels plus records.
#[derive(Debug, Clone, Default)]
pub struct PreparedSurvey {
    pub questions: Vec<String>,
    pub records: Vec<SurveyRecord>,
}

/// One (record, question) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LongResponse<'a> {
    pub meta: &'a Metadata,
    pub question: &'a str,
    pub response: Option<&'a str>,
    pub numeric: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Scale,
    Binary,
}

/// Category-specific result for one (metadata, question) group.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Scale { std: f64, median: f64, mean: f64 },
    Binary { sum: f64 },
    Feedback(String),
}

impl Summary {
    /// Text for the statistics-or-feedback column; empty for binary rows.
    pub fn statistics_text(&self) -> String {
        match self {
            Summary::Scale { std, median, mean } => {
                format!("{:.2},{},{:.2}", std, median.trunc() as i64, mean)
            }
            Summary::Binary { .. } => String::new(),
            Summary::Feedback(text) => text.clone(),
        }
    }

    pub fn sum(&self) -> Option<f64> {
        match self {
            Summary::Binary { sum } => Some(*sum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub meta: Metadata,
    pub question: String,
    pub summary: Summary,
}

/// A report line as written to and read back from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "College")]
    pub college: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Term")]
    pub term: String,
    #[serde(rename = "Course Offering")]
    pub course_offering: String,
    #[serde(rename = "Course")]
    pub course: String,
    #[serde(rename = "Faculty")]
    pub faculty: String,
    #[serde(rename = "Num Enrolled")]
    pub num_enrolled: Option<u32>,
    #[serde(rename = "Num Responses")]
    pub num_responses: usize,
    #[serde(rename = "Return Percent")]
    pub return_percent: String,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Std Dev, Median, Mean/ Feedback")]
    pub statistics: String,
    #[serde(rename = "Sum")]
    pub sum: Option<f64>,
}

impl ReportRow {
    /// Column names in file order; must match the serde renames above.
    pub const HEADERS: [&'static str; 12] = [
        "College",
        "Department",
        "Term",
        "Course Offering",
        "Course",
        "Faculty",
        "Num Enrolled",
        "Num Responses",
        "Return Percent",
        "Question",
        "Std Dev, Median, Mean/ Feedback",
        "Sum",
    ];
}

impl From<AggregateRow> for ReportRow {
    fn from(row: AggregateRow) -> Self {
        let statistics = row.summary.statistics_text();
        let sum = row.summary.sum();
        let Metadata {
            college,
            department,
            term,
            course_offering,
            course,
            faculty,
            num_enrolled,
            num_responses,
            return_percent,
        } = row.meta;

        ReportRow {
            college,
            department,
            term,
            course_offering,
            course,
            faculty,
            num_enrolled,
            num_responses,
            return_percent,
            question: row.question,
            statistics,
            sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_text_truncates_median() {
        let summary = Summary::Scale {
            std: 0.5,
            median: 4.5,
            mean: 4.5,
        };
        assert_eq!(summary.statistics_text(), "0.50,4,4.50");
        assert_eq!(summary.sum(), None);
    }

    #[test]
    fn test_exactly_one_output_field_filled() {
        let binary = Summary::Binary { sum: 9.0 };
        assert_eq!(binary.statistics_text(), "");
        assert_eq!(binary.sum(), Some(9.0));

        let feedback = Summary::Feedback("Great | Too fast".to_string());
        assert_eq!(feedback.statistics_text(), "Great | Too fast");
        assert_eq!(feedback.sum(), None);
    }

    #[test]
    fn test_unknown_enrollment_sorts_last() {
        let with = |enrolled: Option<u32>| Metadata {
            term: "Fall Semester 2022".to_string(),
            num_enrolled: enrolled,
            ..Default::default()
        };

        let mut metas = vec![with(None), with(Some(30)), with(Some(4))];
        metas.sort();

        let order: Vec<Option<u32>> = metas.iter().map(|m| m.num_enrolled).collect();
        assert_eq!(order, vec![Some(4), Some(30), None]);
    }

    #[test]
    fn test_earlier_fields_outrank_enrollment() {
        let a = Metadata {
            term: "Fall".to_string(),
            num_enrolled: None,
            ..Default::default()
        };
        let b = Metadata {
            term: "Spring".to_string(),
            num_enrolled: Some(1),
            ..Default::default()
        };
        assert!(a < b);
    }

    #[test]
    fn test_report_row_from_aggregate() {
        let row = AggregateRow {
            meta: Metadata {
                course_offering: "2229_CHEM_100_01_1491".to_string(),
                num_responses: 2,
                ..Default::default()
            },
            question: "I enjoyed this course".to_string(),
            summary: Summary::Binary { sum: 9.0 },
        };

        let report: ReportRow = row.into();
        assert_eq!(report.course_offering, "2229_CHEM_100_01_1491");
        assert_eq!(report.num_responses, 2);
        assert_eq!(report.statistics, "");
        assert_eq!(report.sum, Some(9.0));
    }
}
