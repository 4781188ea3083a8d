//! Cell- and table-level parsing of survey exports.

use anyhow::Result;

/// A delimited table exactly as the export presents it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of the first header equal to `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Parses decoded CSV text into a [`RawTable`].
///
/// Short rows are padded with empty cells so every row has one cell per header.
///
/// # Errors
///
/// Returns an error if the text is not well-formed CSV.
pub fn parse_table(text: &str) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Extracts the numeric value of a response cell.
///
/// Comma-separated answers (`"Agree,4"`) yield their last segment. Anything
/// unparseable, including an empty or missing cell, yields `None`.
pub fn extract_numeric(value: Option<&str>) -> Option<f64> {
    let value = value?;
    let candidate = match value.rsplit_once(',') {
        Some((_, last)) => last,
        None => value,
    };

    candidate
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
}
