//! Run configuration.
//!
//! Every field has a default matching the College of Science deployment, so a
//! config file only needs the keys it overrides:
//! ```json
//! {
//!   "college": "College of Engineering",
//!   "subunit_prefix": "ENGR ",
//!   "departments": { "CIVE": "Civil Engineering" },
//!   "classification": { "rules": [{ "prefix": "I", "category": "binary" }] },
//!   "duplicate_policy": "reject"
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::analyzers::classify::QuestionClassifier;

static DEFAULT_DEPARTMENTS: &[(&str, &str)] = &[
    ("ASTR", "Astronomy"),
    ("BIOL", "Biological Sciences"),
    ("BSTA", "Biostatistics"),
    ("CMGT", "Construction Management"),
    ("CMPE", "Computer Engineering"),
    ("CS", "Computer Science"),
    ("ENGR", "Engineering"),
    ("ENSC", "Environmental Science"),
    ("GEOL", "Geology"),
    ("INDE", "Industrial Engineering"),
    ("MATH", "Mathematics"),
    ("MUS", "Music"),
    ("NURS", "Nursing"),
    ("PH", "Public Health"),
    ("PHYS", "Physics"),
    ("PSYC", "Psychology"),
    ("SCI", "Science"),
    ("STAT", "Statistics"),
    ("CIVE", "Civil Engineering"),
    ("CHEM", "Chemistry"),
];

/// What to do when the registrar lists the same (course id, term) twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKeyPolicy {
    /// Keep the first registrar row in file order.
    #[default]
    First,
    /// Abort the reconciliation.
    Reject,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Department code (last token of the raw Subunit) to department name.
    pub departments: HashMap<String, String>,
    /// Replaces the College column on every row.
    pub college: String,
    /// Rows whose raw Subunit does not start with this are dropped. `None` keeps all.
    pub subunit_prefix: Option<String>,
    /// Substring an export's file name must contain.
    pub file_pattern: String,
    /// File names starting with this are skipped even when they match.
    pub excluded_file_prefix: String,
    pub classification: QuestionClassifier,
    pub duplicate_policy: DuplicateKeyPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            departments: DEFAULT_DEPARTMENTS
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
            college: "College of Science".to_string(),
            subunit_prefix: Some("CSCI ".to_string()),
            file_pattern: "StudentExperienceSurvey".to_string(),
            excluded_file_prefix: "sample_cos_report".to_string(),
            classification: QuestionClassifier::default(),
            duplicate_policy: DuplicateKeyPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Uses the file at `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Returns the department name for `code`, if one is configured.
    pub fn department(&self, code: &str) -> Option<&str> {
        self.departments.get(code).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::QuestionCategory;

    #[test]
    fn test_defaults_cover_original_departments() {
        let config = PipelineConfig::default();
        assert_eq!(config.department("CHEM"), Some("Chemistry"));
        assert_eq!(config.department("CS"), Some("Computer Science"));
        assert_eq!(config.department("XYZ"), None);
        assert_eq!(config.departments.len(), 20);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let json = r#"{ "college": "College of Engineering", "duplicate_policy": "reject" }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.college, "College of Engineering");
        assert_eq!(config.duplicate_policy, DuplicateKeyPolicy::Reject);
        assert_eq!(config.file_pattern, "StudentExperienceSurvey");
        assert_eq!(config.subunit_prefix.as_deref(), Some("CSCI "));
    }

    #[test]
    fn test_null_subunit_prefix_disables_filter() {
        let config: PipelineConfig = serde_json::from_str(r#"{ "subunit_prefix": null }"#).unwrap();
        assert!(config.subunit_prefix.is_none());
    }

    #[test]
    fn test_classification_rules_from_json() {
        let json = r#"{
            "classification": {
                "rules": [{ "prefix": "Did", "category": "binary" }],
                "default_category": "scale"
            }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.classification.category_of("Did you attend?"),
            QuestionCategory::Binary
        );
        assert_eq!(
            config.classification.category_of("I enjoyed this course"),
            QuestionCategory::Scale
        );
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "departments": { "CSCI": "Computer Science" } }"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.department("CSCI"), Some("Computer Science"));
        assert_eq!(config.department("CHEM"), None);
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = PipelineConfig::load_or_default(None).unwrap();
        assert_eq!(config.college, "College of Science");
    }
}
