//! Error type for `tally-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport to the store failed or a statement could not be prepared —
  /// anything below the per-row level.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// DDL failure other than the benign already-exists case (which the
  /// conditional create absorbs).
  #[error("failed to materialize table {table:?}: {source}")]
  Materialization {
    table:  String,
    source: rusqlite::Error,
  },

  /// A row in an upsert batch failed. Rows applied before `index` stay
  /// committed; callers must tolerate partial success.
  #[error("row {index} failed to persist: {source}")]
  RowInsert {
    index:  usize,
    source: rusqlite::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
