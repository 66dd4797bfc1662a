//! Configuration for the Importer

use serde::Deserialize;

/// Configuration for the Importer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// CSV field delimiter
    pub delimiter: char,

    /// Largest accepted file (bytes)
    pub max_file_size_bytes: u64,

    /// Largest accepted number of data rows
    pub max_rows: usize,

    /// Trim surrounding whitespace from every field
    pub trim_fields: bool,
}

impl ImportConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.delimiter.is_ascii() {
            return Err("delimiter must be an ASCII character".to_string());
        }
        if self.delimiter == '"' || self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(format!("delimiter {:?} is not allowed", self.delimiter));
        }
        if self.max_file_size_bytes == 0 {
            return Err("max_file_size_bytes must be greater than 0".to_string());
        }
        if self.max_rows == 0 {
            return Err("max_rows must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Delimiter as the byte the CSV reader expects
    pub(crate) fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}

impl Default for ImportConfig {
    /// Comma-separated, trimmed, 10 MiB upload limit
    fn default() -> Self {
        Self {
            delimiter: ',',
            max_file_size_bytes: 10 * 1024 * 1024,
            max_rows: 100_000,
            trim_fields: true,
        }
    }
}
