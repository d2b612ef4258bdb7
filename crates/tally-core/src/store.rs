//! The `SurveyStore` trait.
//!
//! Implemented by storage backends (e.g. `tally-store-sqlite`). Higher layers
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  schema::TableSchema,
  value::{NewRow, RowSet},
};

/// Abstraction over a relational backend holding one table per survey.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SurveyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Ensure a table exists for `schema` — `CREATE TABLE IF NOT EXISTS`
  /// semantics. Never alters an existing table: re-materializing with a
  /// drifted schema is a no-op, and a concurrent duplicate create is
  /// tolerated.
  fn materialize<'a>(
    &'a self,
    schema: &'a TableSchema,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Persist `rows` into `table`, in source order, one logical unit.
  ///
  /// Rows without an id are plain inserts (the store assigns the id); rows
  /// with an id insert-or-replace on primary-key conflict. The batch is not
  /// atomic across rows: on the first per-row failure the call reports the
  /// failing row index and cause, and previously-applied rows stay
  /// committed. Returns the number of rows applied.
  fn upsert_rows<'a>(
    &'a self,
    table: &'a str,
    columns: &'a [String],
    rows: Vec<NewRow>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Read every row of `table` in id order. Returns `None` if no table with
  /// that name exists.
  fn fetch_rows<'a>(
    &'a self,
    table: &'a str,
  ) -> impl Future<Output = Result<Option<RowSet>, Self::Error>> + Send + 'a;

  /// Names of all survey tables, sorted.
  fn list_surveys(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;
}
