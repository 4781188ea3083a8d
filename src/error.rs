//! Fatal conditions raised by the pipeline.
//!
//! Per-row problems (bad identifiers, non-numeric cells) never surface here;
//! they degrade to `None` and flow through. These variants abort a run before
//! any report is written.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no survey exports in {dir} matching '{pattern}'")]
    NoInputFiles { dir: PathBuf, pattern: String },

    #[error("{path} is neither valid UTF-8 nor Windows-1252")]
    Undecodable { path: PathBuf },

    #[error("required column '{column}' missing from {source_name}")]
    MissingColumn {
        column: String,
        source_name: String,
    },

    #[error("registrar lists course offering '{key}' more than once")]
    DuplicateRegistrarKey { key: String },
}
