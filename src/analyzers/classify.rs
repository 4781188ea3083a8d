//! Question label cleanup and Scale/Binary classification.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::analyzers::types::QuestionCategory;

static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("static regex"));

static EXCLUDED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:demo|test)\b").expect("static regex"));

/// Strips a leading `"<digits>. "` ordinal from a question header.
pub fn clean_label(raw: &str) -> String {
    ORDINAL_PREFIX.replace(raw, "").into_owned()
}

/// Columns mentioning the standalone word `demo` or `test` are dropped before
/// classification.
pub fn is_excluded_label(raw: &str) -> bool {
    EXCLUDED_WORD.is_match(raw)
}

/// Labels starting with `prefix` (after trimming) belong to `category`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassificationRule {
    pub prefix: String,
    pub category: QuestionCategory,
}

/// Ordered rule table; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuestionClassifier {
    pub rules: Vec<ClassificationRule>,
    pub default_category: QuestionCategory,
}

impl Default for QuestionClassifier {
    fn default() -> Self {
        Self {
            rules: vec![ClassificationRule {
                prefix: "I".to_string(),
                category: QuestionCategory::Binary,
            }],
            default_category: QuestionCategory::Scale,
        }
    }
}

/// Disjoint Scale and Binary label sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionSets {
    pub scale: HashSet<String>,
    pub binary: HashSet<String>,
}

impl QuestionSets {
    pub fn category_of(&self, question: &str) -> Option<QuestionCategory> {
        if self.scale.contains(question) {
            Some(QuestionCategory::Scale)
        } else if self.binary.contains(question) {
            Some(QuestionCategory::Binary)
        } else {
            None
        }
    }
}

impl QuestionClassifier {
    pub fn category_of(&self, label: &str) -> QuestionCategory {
        let label = label.trim();
        self.rules
            .iter()
            .find(|rule| label.starts_with(&rule.prefix))
            .map(|rule| rule.category)
            .unwrap_or(self.default_category)
    }

    /// Splits cleaned labels into Scale and Binary sets.
    pub fn partition<'a, I>(&self, labels: I) -> QuestionSets
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut sets = QuestionSets::default();
        for label in labels {
            match self.category_of(label) {
                QuestionCategory::Scale => sets.scale.insert(label.clone()),
                QuestionCategory::Binary => sets.binary.insert(label.clone()),
            };
        }
        sets
    }
}
