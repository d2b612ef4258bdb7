//! Error type for `tally-csv`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed CSV structure — typically unequal column counts per record.
  /// Nothing is persisted when this is raised.
  #[error("malformed csv: {0}")]
  Structural(#[from] csv::Error),

  #[error("csv input contains no header row")]
  EmptyInput,

  /// A header collides with the reserved synthetic primary-key column.
  /// No auto-renaming is attempted.
  #[error("column {0:?} collides with the reserved id column")]
  ReservedColumn(String),

  /// Two headers sanitize to the same identifier.
  #[error("duplicate column name after sanitization: {0:?}")]
  DuplicateColumn(String),

  /// A name with no identifier characters left after the allow-list
  /// transform.
  #[error("{0:?} does not sanitize to a usable identifier")]
  InvalidIdentifier(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
