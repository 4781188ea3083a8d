use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::warn;

use super::key::{CourseKey, RegistrarEntry, parse_survey_id};
use crate::analyzers::types::ReportRow;
use crate::config::DuplicateKeyPolicy;
use crate::error::PipelineError;

/// Registrar CRNs indexed by (course id, term).
#[derive(Debug, Clone, Default)]
pub struct Registry {
    crns: HashMap<CourseKey, String>,
}

impl Registry {
    /// Indexes `entries`, resolving repeated keys with `policy`.
    pub fn build<I>(entries: I, policy: DuplicateKeyPolicy) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = RegistrarEntry>,
    {
        let mut crns = HashMap::new();
        let mut duplicates = 0usize;

        for entry in entries {
            match crns.entry(entry.key) {
                Entry::Vacant(slot) => {
                    slot.insert(entry.crn);
                }
                Entry::Occupied(slot) => match policy {
                    DuplicateKeyPolicy::First => duplicates += 1,
                    DuplicateKeyPolicy::Reject => {
                        return Err(PipelineError::DuplicateRegistrarKey {
                            key: slot.key().to_string(),
                        });
                    }
                },
            }
        }

        if duplicates > 0 {
            warn!(duplicates, "Registrar repeats offerings; keeping the first CRN for each");
        }

        Ok(Self { crns })
    }

    pub fn crn(&self, key: &CourseKey) -> Option<&str> {
        self.crns.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.crns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crns.is_empty()
    }
}

/// Registrar-format identifier for a survey `Course Offering`, or the
/// original text when it cannot be parsed or has no registrar match.
pub fn corrected_offering(offering: &str, registry: &Registry) -> String {
    parse_survey_id(offering)
        .and_then(|key| registry.crn(&key).map(|crn| key.with_crn(crn)))
        .unwrap_or_else(|| offering.to_string())
}

/// Rewrites the `Course Offering` of every row. Rows are neither added nor
/// dropped. Returns the rows and how many were matched.
pub fn reconcile_rows(rows: Vec<ReportRow>, registry: &Registry) -> (Vec<ReportRow>, usize) {
    let mut matched = 0;

    let rows = rows
        .into_iter()
        .map(|mut row| {
            let corrected = corrected_offering(&row.course_offering, registry);
            if corrected != row.course_offering {
                matched += 1;
                row.course_offering = corrected;
            }
            row
        })
        .collect();

    (rows, matched)
}
