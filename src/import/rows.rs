// Pull-based CSV row reader.
//
// The header is checked against a column contract once; every following
// record is projected onto the contract's columns in contract order. Malformed
// records become `CsvRow::Invalid` so the caller can skip them, only a failure
// of the underlying byte stream ends the iteration with an error.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::import::ImportError;

/// One record projected onto a column contract
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: u64,
    values: Vec<String>,
}

impl RawRow {
    pub fn new(line: u64, values: Vec<String>) -> Self {
        Self { line, values }
    }

    /// Value of the contract column at `index`
    pub fn field(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    /// The key column (always first in a contract), or `line N` when empty
    pub fn id(&self) -> String {
        row_id(self.values.first().map(String::as_str), self.line)
    }
}

fn row_id(key: Option<&str>, line: u64) -> String {
    match key {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => format!("line {}", line),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsvRow {
    Parsed(RawRow),
    Invalid { id: String, detail: String },
}

pub struct CsvRows<R: Read> {
    reader: csv::Reader<R>,
    positions: Vec<usize>,
}

impl<R: Read> CsvRows<R> {
    /// Read the header and check that every contract column is present.
    ///
    /// Header names are matched exactly after trimming. Extra columns are
    /// ignored.
    pub fn new(input: R, columns: &[&str]) -> Result<Self, ImportError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) if e.is_io_error() => return Err(ImportError::Stream(e.to_string())),
            Err(e) => return Err(ImportError::InvalidHeader(e.to_string())),
        };

        let mut positions = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();
        for column in columns {
            match headers.iter().position(|h| h == *column) {
                Some(index) => positions.push(index),
                None => missing.push(column.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        Ok(Self { reader, positions })
    }

    fn project(&self, record: &StringRecord) -> CsvRow {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let values: Option<Vec<String>> = self
            .positions
            .iter()
            .map(|&i| record.get(i).map(str::to_string))
            .collect();

        match values {
            Some(values) => CsvRow::Parsed(RawRow::new(line, values)),
            None => CsvRow::Invalid {
                id: row_id(record.get(self.positions[0]), line),
                detail: format!(
                    "expected at least {} fields, found {}",
                    self.positions.iter().max().map_or(0, |m| m + 1),
                    record.len()
                ),
            },
        }
    }
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = Result<CsvRow, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(false) => None,
            Ok(true) => Some(Ok(self.project(&record))),
            Err(e) if e.is_io_error() => Some(Err(ImportError::Stream(e.to_string()))),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                Some(Ok(CsvRow::Invalid {
                    id: format!("line {}", line),
                    detail: e.to_string(),
                }))
            }
        }
    }
}
