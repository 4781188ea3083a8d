//! Survey export discovery and loading.
//!
//! [`RecordSource`] is the seam the pipeline reads raw tables through.
//! [`DirectorySource`] implements it over a directory of CSV exports.

mod decode;
mod directory;

pub use decode::decode_export;
pub use directory::DirectorySource;

use crate::parser::RawTable;
use anyhow::Result;

/// Produces the concatenated raw survey table for one run.
pub trait RecordSource {
    fn load(&self) -> Result<RawTable>;
}

/// Stacks tables by header name. Headers are trimmed; a column missing from
/// one table is empty for that table's rows.
pub fn concat_tables(tables: Vec<RawTable>) -> RawTable {
    let mut headers: Vec<String> = Vec::new();

    for table in &tables {
        for header in &table.headers {
            let header = header.trim();
            if !headers.iter().any(|h| h == header) {
                headers.push(header.to_string());
            }
        }
    }

    let mut rows = Vec::new();
    for table in tables {
        let positions: Vec<Option<usize>> = headers
            .iter()
            .map(|h| table.headers.iter().position(|t| t.trim() == h))
            .collect();

        for row in table.rows {
            rows.push(
                positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect(),
            );
        }
    }

    RawTable { headers, rows }
}
