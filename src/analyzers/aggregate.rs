use crate::analyzers::classify::QuestionSets;
use crate::analyzers::types::{AggregateRow, LongResponse, Metadata, QuestionCategory, Summary};
use crate::analyzers::utility::{mean, median, stddev};
use std::collections::BTreeMap;

/// Placeholder the survey platform writes for image answers.
const IMAGE_PLACEHOLDER: &str = "[IMAGE]";

const FEEDBACK_SEPARATOR: &str = " | ";

type GroupKey<'a> = (&'a Metadata, &'a str);

fn numeric_groups<'a>(
    long: &[LongResponse<'a>],
    sets: &QuestionSets,
    category: QuestionCategory,
) -> BTreeMap<GroupKey<'a>, Vec<f64>> {
    let mut groups: BTreeMap<GroupKey<'a>, Vec<f64>> = BTreeMap::new();

    for row in long {
        let Some(value) = row.numeric else {
            continue;
        };
        if sets.category_of(row.question) != Some(category) {
            continue;
        }
        groups
            .entry((row.meta, row.question))
            .or_default()
            .push(value);
    }

    groups
}

fn into_rows(key: GroupKey<'_>, summary: Summary) -> AggregateRow {
    AggregateRow {
        meta: key.0.clone(),
        question: key.1.to_string(),
        summary,
    }
}

/// Std dev (population), median and mean of numeric answers to Scale questions.
pub fn aggregate_scale(long: &[LongResponse<'_>], sets: &QuestionSets) -> Vec<AggregateRow> {
    numeric_groups(long, sets, QuestionCategory::Scale)
        .into_iter()
        .map(|(key, values)| {
            let avg = mean(&values);
            let summary = Summary::Scale {
                std: stddev(&values, avg),
                median: median(&values),
                mean: avg,
            };
            into_rows(key, summary)
        })
        .collect()
}

/// Sum of numeric answers to Binary questions.
pub fn aggregate_binary(long: &[LongResponse<'_>], sets: &QuestionSets) -> Vec<AggregateRow> {
    numeric_groups(long, sets, QuestionCategory::Binary)
        .into_iter()
        .map(|(key, values)| {
            let sum = values.iter().sum();
            into_rows(key, Summary::Binary { sum })
        })
        .collect()
}

/// Distinct free-text answers, in first-seen order, for any question.
pub fn aggregate_feedback(long: &[LongResponse<'_>]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<GroupKey<'_>, Vec<&str>> = BTreeMap::new();

    for row in long {
        if row.numeric.is_some() {
            continue;
        }
        let Some(response) = row.response else {
            continue;
        };
        let trimmed = response.trim();
        if trimmed.is_empty() || trimmed == IMAGE_PLACEHOLDER {
            continue;
        }

        let texts = groups.entry((row.meta, row.question)).or_default();
        if !texts.contains(&response) {
            texts.push(response);
        }
    }

    groups
        .into_iter()
        .map(|(key, texts)| into_rows(key, Summary::Feedback(texts.join(FEEDBACK_SEPARATOR))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::classify::QuestionClassifier;

    fn meta(offering: &str) -> Metadata {
        Metadata {
            course_offering: offering.to_string(),
            ..Default::default()
        }
    }

    fn row<'a>(
        meta: &'a Metadata,
        question: &'a str,
        response: Option<&'a str>,
    ) -> LongResponse<'a> {
        LongResponse {
            meta,
            question,
            response,
            numeric: crate::parser::extract_numeric(response),
        }
    }

    fn sets(labels: &[&str]) -> QuestionSets {
        let labels: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        QuestionClassifier::default().partition(&labels)
    }

    #[test]
    fn test_scale_stats_per_group() {
        let a = meta("A");
        let b = meta("B");
        let long = vec![
            row(&a, "Pace", Some("2")),
            row(&a, "Pace", Some("4")),
            row(&a, "Pace", Some("5")),
            row(&a, "Pace", Some("4")),
            row(&b, "Pace", Some("3")),
            row(&b, "Pace", Some("n/a")),
        ];

        let rows = aggregate_scale(&long, &sets(&["Pace"]));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].meta.course_offering, "A");
        // mean 3.75, population variance 1.1875
        assert_eq!(rows[0].summary.statistics_text(), "1.09,4,3.75");
        assert_eq!(rows[1].summary.statistics_text(), "0.00,3,3.00");
    }

    #[test]
    fn test_scale_ignores_binary_questions() {
        let a = meta("A");
        let long = vec![row(&a, "I attended", Some("1"))];
        let sets = sets(&["I attended"]);

        assert!(aggregate_scale(&long, &sets).is_empty());
        assert_eq!(aggregate_binary(&long, &sets).len(), 1);
    }

    #[test]
    fn test_binary_sum() {
        let a = meta("A");
        let long = vec![
            row(&a, "I enjoyed this course", Some("5")),
            row(&a, "I enjoyed this course", Some("4")),
            row(&a, "I enjoyed this course", Some("Yes")),
        ];

        let rows = aggregate_binary(&long, &sets(&["I enjoyed this course"]));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary, Summary::Binary { sum: 9.0 });
    }

    #[test]
    fn test_feedback_filters_and_dedups() {
        let a = meta("A");
        let long = vec![
            row(&a, "Comments", Some("Too fast")),
            row(&a, "Comments", Some("[IMAGE]")),
            row(&a, "Comments", Some("  ")),
            row(&a, "Comments", None),
            row(&a, "Comments", Some("Great labs")),
            row(&a, "Comments", Some("Too fast")),
            row(&a, "Comments", Some("4")),
        ];

        let rows = aggregate_feedback(&long);

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].summary,
            Summary::Feedback("Too fast | Great labs".to_string())
        );
    }

    #[test]
    fn test_feedback_from_any_category() {
        let a = meta("A");
        let long = vec![
            row(&a, "I attended", Some("Sometimes")),
            row(&a, "Pace", Some("Fine")),
        ];

        let rows = aggregate_feedback(&long);
        assert_eq!(rows.len(), 2);
    }
}
