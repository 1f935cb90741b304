use async_trait::async_trait;
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

use crate::loader::Loader;
use crate::utils::config::LoaderConfig;
use crate::utils::error::LoaderError;
use crate::utils::types::{Row, Table, Value};

/// CSV file loader with per-field numeric inference.
pub struct CsvLoader {
    config: LoaderConfig,
}

impl CsvLoader {
    /// Create a loader with default configuration (comma-delimited,
    /// first record is the header).
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Parse CSV text into rows, mapping each field to its header.
    fn parse_content(&self, content: &str) -> Result<Table, LoaderError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(self.config.has_headers)
            .delimiter(self.config.delimiter as u8)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = Row::new();
            for (header, field) in headers.iter().zip(record.iter()) {
                row.insert(header, infer_value(field));
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Loader for CsvLoader {
    async fn load(&self, path: &Path) -> Result<Table, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        self.parse_content(&content)
    }
}

/// A field that parses fully as a finite number becomes `Number`;
/// anything else, including the empty string, stays `Text`.
fn infer_value(field: &str) -> Value {
    if !field.is_empty() {
        if let Ok(number) = field.parse::<f64>() {
            if number.is_finite() {
                return Value::Number(number);
            }
        }
    }
    Value::Text(field.to_string())
}
