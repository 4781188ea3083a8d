use crate::analyzers::types::AggregateRow;

/// Concatenates the per-category tables and sorts by (metadata, question).
///
/// Rows are not deduplicated across categories; the Scale/Binary split is a
/// partition, so only feedback rows can share a key with a numeric row.
pub fn assemble_report(
    scale: Vec<AggregateRow>,
    binary: Vec<AggregateRow>,
    feedback: Vec<AggregateRow>,
) -> Vec<AggregateRow> {
    let mut rows = Vec::with_capacity(scale.len() + binary.len() + feedback.len());
    rows.extend(scale);
    rows.extend(binary);
    rows.extend(feedback);

    rows.sort_by(|a, b| (&a.meta, &a.question).cmp(&(&b.meta, &b.question)));
    rows
}
