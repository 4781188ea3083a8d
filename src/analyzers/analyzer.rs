use anyhow::Result;
use tracing::info;

use crate::analyzers::aggregate::{aggregate_binary, aggregate_feedback, aggregate_scale};
use crate::analyzers::prepare::prepare_survey;
use crate::analyzers::report::assemble_report;
use crate::analyzers::reshape::reshape;
use crate::analyzers::types::{PreparedSurvey, ReportRow};
use crate::config::PipelineConfig;
use crate::ingest::RecordSource;
use crate::output::ReportSink;
use crate::parser::RawTable;

/// Reshapes, classifies and aggregates a prepared survey into report rows.
pub fn summarize(survey: &PreparedSurvey, config: &PipelineConfig) -> Vec<ReportRow> {
    let sets = config.classification.partition(&survey.questions);
    let long = reshape(survey);

    let scale = aggregate_scale(&long, &sets);
    let binary = aggregate_binary(&long, &sets);
    let feedback = aggregate_feedback(&long);

    info!(
        long_rows = long.len(),
        scale_questions = sets.scale.len(),
        binary_questions = sets.binary.len(),
        scale_rows = scale.len(),
        binary_rows = binary.len(),
        feedback_rows = feedback.len(),
        "Responses aggregated"
    );

    assemble_report(scale, binary, feedback)
        .into_iter()
        .map(ReportRow::from)
        .collect()
}

/// Builds the report for an already loaded raw table.
pub fn build_report(table: &RawTable, config: &PipelineConfig) -> Result<Vec<ReportRow>> {
    let survey = prepare_survey(table, config)?;
    Ok(summarize(&survey, config))
}

/// Loads every export from `source`, aggregates, and hands the report to `sink`.
#[tracing::instrument(skip_all)]
pub fn analyze<S, K>(source: &S, sink: &mut K, config: &PipelineConfig) -> Result<usize>
where
    S: RecordSource + ?Sized,
    K: ReportSink + ?Sized,
{
    let table = source.load()?;
    let report = build_report(&table, config)?;
    sink.write(&report)?;
    Ok(report.len())
}
