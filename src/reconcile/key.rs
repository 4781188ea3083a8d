//! Course offering identifiers.
//!
//! The registrar and the survey platform serialize the same offering in two
//! segment orders:
//!
//! | Source    | Layout                                                   |
//! |-----------|----------------------------------------------------------|
//! | Registrar | `subject_course_suffix_section_CRN_term[_...]`           |
//! | Survey    | `term_subject_course_section_suffix`                     |
//!
//! Both parse into [`CourseKey`], which compares in registrar order.

use std::fmt;

/// Canonical (course id, term) join key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseKey {
    pub subject: String,
    pub course_number: String,
    pub suffix: String,
    pub section: String,
    pub term: String,
}

impl CourseKey {
    /// Course id in registrar order, e.g. `CHEM_100_01_1`.
    pub fn course_id(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.subject, self.course_number, self.suffix, self.section
        )
    }

    /// Subject and course number only, e.g. `CHEM_100`. Not used for joining.
    pub fn simplified_id(&self) -> String {
        format!("{}_{}", self.subject, self.course_number)
    }

    /// Registrar-format identifier carrying `crn`.
    pub fn with_crn(&self, crn: &str) -> String {
        format!("{}_{}_{}", self.course_id(), crn, self.term)
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.course_id(), self.term)
    }
}

/// A parsed registrar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarEntry {
    pub key: CourseKey,
    pub crn: String,
}

/// Parses a registrar `Course Offering ID`. Needs at least six segments;
/// anything past the sixth is ignored.
pub fn parse_registrar_id(id: &str) -> Option<RegistrarEntry> {
    let parts: Vec<&str> = id.split('_').collect();
    if parts.len() < 6 {
        return None;
    }

    Some(RegistrarEntry {
        key: CourseKey {
            subject: parts[0].to_string(),
            course_number: parts[1].to_string(),
            suffix: parts[2].to_string(),
            section: parts[3].to_string(),
            term: parts[5].to_string(),
        },
        crn: normalize_crn(parts[4]),
    })
}

/// Transcodes a survey `Course Offering` into registrar order. Needs exactly
/// five segments.
pub fn parse_survey_id(id: &str) -> Option<CourseKey> {
    let parts: Vec<&str> = id.split('_').collect();
    let [term, subject, course_number, section, suffix] = parts.as_slice() else {
        return None;
    };

    Some(CourseKey {
        subject: subject.to_string(),
        course_number: course_number.to_string(),
        suffix: suffix.to_string(),
        section: section.to_string(),
        term: term.to_string(),
    })
}

/// Numeric CRNs are rendered without leading zeros; others are kept verbatim.
fn normalize_crn(raw: &str) -> String {
    raw.trim()
        .parse::<u64>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| raw.to_string())
}
