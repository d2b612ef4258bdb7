//! Strict CSV parsing into an in-memory table.

use std::io::Read;

use crate::error::{Error, Result};

/// A fully-read CSV file: header row plus data records as raw strings.
///
/// Records are guaranteed rectangular — the reader rejects rows whose field
/// count differs from the header's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
  pub headers: Vec<String>,
  pub records: Vec<Vec<String>>,
}

impl CsvTable {
  /// Values of one column, in row order.
  pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
    self.records.iter().map(move |r| r[index].as_str())
  }
}

/// Read an entire CSV source into a [`CsvTable`].
///
/// The reader is strict: a record with more or fewer fields than the header
/// fails the whole parse with [`Error::Structural`] — partial input is never
/// handed downstream.
pub fn parse_reader<R: Read>(rdr: R) -> Result<CsvTable> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(false)
    .from_reader(rdr);

  let headers: Vec<String> = reader
    .headers()?
    .iter()
    .map(|h| h.trim().to_string())
    .collect();
  if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
    return Err(Error::EmptyInput);
  }

  let mut records = Vec::new();
  for record in reader.records() {
    let record = record?;
    records.push(record.iter().map(|f| f.to_string()).collect());
  }

  Ok(CsvTable { headers, records })
}
