use crate::analyzers::types::{LongResponse, PreparedSurvey};
use crate::parser::extract_numeric;

/// Unpivots the survey: one [`LongResponse`] per (record, question).
pub fn reshape(survey: &PreparedSurvey) -> Vec<LongResponse<'_>> {
    let mut long = Vec::with_capacity(survey.records.len() * survey.questions.len());

    for record in &survey.records {
        for (question, response) in survey.questions.iter().zip(&record.responses) {
            let response = response.as_deref();
            long.push(LongResponse {
                meta: &record.meta,
                question,
                response,
                numeric: extract_numeric(response),
            });
        }
    }

    long
}
