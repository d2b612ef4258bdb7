//! Schema building and identifier sanitization.

use tally_core::schema::{ColumnDef, ColumnType, ID_COLUMN, TableSchema};

use crate::{
  error::{Error, Result},
  parse::CsvTable,
};

/// Allow-list transform from an arbitrary name to a SQL-safe identifier:
/// lowercase, spaces to underscores, everything outside `[a-z0-9_]`
/// stripped. All dynamic identifiers (table and column names) pass through
/// here before any DDL or query touches them; values always go through
/// parameter binding instead.
pub fn sanitize_identifier(raw: &str) -> Result<String> {
  let ident: String = raw
    .trim()
    .to_lowercase()
    .chars()
    .map(|c| if c == ' ' { '_' } else { c })
    .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
    .collect();

  if ident.is_empty() || ident.chars().all(|c| c == '_') {
    return Err(Error::InvalidIdentifier(raw.to_string()));
  }
  Ok(ident)
}

/// Build the table schema for `table`, named `name`.
///
/// Columns keep first-seen header order and are all nullable; the synthetic
/// `id` primary key is implicit in [`TableSchema`] and added by the
/// materializer. A header that sanitizes to the reserved `id` name is
/// rejected, as is a duplicate sanitized header.
pub fn build_schema(
  name: &str,
  table: &CsvTable,
  types: &[ColumnType],
) -> Result<TableSchema> {
  let mut columns: Vec<ColumnDef> = Vec::with_capacity(table.headers.len());

  for (header, ty) in table.headers.iter().zip(types) {
    let column = sanitize_identifier(header)?;
    if column == ID_COLUMN {
      return Err(Error::ReservedColumn(header.clone()));
    }
    if columns.iter().any(|c| c.name == column) {
      return Err(Error::DuplicateColumn(column));
    }
    columns.push(ColumnDef { name: column, ty: *ty, nullable: true });
  }

  Ok(TableSchema { name: name.to_string(), columns })
}
