use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{RecordSource, concat_tables, decode_export};
use crate::error::PipelineError;
use crate::parser::{RawTable, parse_table};

/// Reads every `.csv` export in a directory whose name contains `pattern`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    pattern: String,
    excluded_prefix: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, pattern: &str, excluded_prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            pattern: pattern.to_string(),
            excluded_prefix: excluded_prefix.to_string(),
        }
    }

    /// Matching export paths, sorted by name.
    pub fn export_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();

        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("cannot read input directory {}", self.dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type()?.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("csv")
            {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if name.contains(&self.pattern) && !name.starts_with(&self.excluded_prefix) {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}

impl RecordSource for DirectorySource {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display(), pattern = %self.pattern))]
    fn load(&self) -> Result<RawTable> {
        let paths = self.export_paths()?;
        if paths.is_empty() {
            return Err(PipelineError::NoInputFiles {
                dir: self.dir.clone(),
                pattern: self.pattern.clone(),
            }
            .into());
        }

        let mut tables = Vec::with_capacity(paths.len());
        for path in &paths {
            let table = read_export(path)?;
            debug!(path = %path.display(), rows = table.rows.len(), "Export loaded");
            tables.push(table);
        }

        let table = concat_tables(tables);
        info!(
            files = paths.len(),
            rows = table.rows.len(),
            columns = table.headers.len(),
            "Survey exports concatenated"
        );
        Ok(table)
    }
}

fn read_export(path: &Path) -> Result<RawTable> {
    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let text = decode_export(bytes, path)?;
    parse_table(&text).with_context(|| format!("malformed CSV in {}", path.display()))
}
