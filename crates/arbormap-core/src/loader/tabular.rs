//! CSV-backed data loader

use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::RawRow;
use crate::error::{ArborError, Result};
use crate::ports::DataLoader;

/// Loads rows from a CSV file whose first line names the fields
#[derive(Debug, Clone)]
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataLoader for CsvLoader {
    async fn load(&self) -> Result<Vec<RawRow>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| ArborError::DataLoad {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        parse_rows(bytes.as_slice())
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse CSV text into raw rows keyed by header name
///
/// Short rows are accepted; their missing fields are simply absent and the
/// usability check rejects them later.
pub fn parse_rows<R: Read>(input: R) -> Result<Vec<RawRow>> {
    let mut reader = ::csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(RawRow::from_pairs(headers.iter().zip(record.iter())));
    }

    tracing::debug!("Parsed {} CSV rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}
