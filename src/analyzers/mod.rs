//! Survey reshaping and per-question aggregation.
//!
//! Raw exports are prepared into metadata-bearing records, unpivoted into one
//! row per (respondent, question), split into Scale and Binary questions by a
//! configurable rule table, aggregated per (offering, question), and assembled
//! into a single sorted report.

pub mod aggregate;
pub mod analyzer;
pub mod classify;
pub mod prepare;
pub mod report;
pub mod reshape;
pub mod types;
pub mod utility;
