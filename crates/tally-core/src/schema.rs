//! Table schemas as plain data.
//!
//! A schema is an ordered list of typed column descriptors — never a
//! generated type. DDL generation and reshaping both consume this structure
//! generically through the closed [`ColumnType`] set.

use serde::{Deserialize, Serialize};

/// The column name reserved for the synthetic, store-assigned primary key.
pub const ID_COLUMN: &str = "id";

/// The closed set of semantic column types a survey column can carry.
///
/// Inference demotes along `Integer < Float < Boolean < Text`; `Text` is the
/// universal fallback and never fails. Dates and timestamps degrade to
/// `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
  Integer,
  Float,
  Boolean,
  #[serde(rename = "STRING")]
  Text,
}

impl ColumnType {
  /// The SQL type name used in DDL for this column type.
  pub fn sql_type(self) -> &'static str {
    match self {
      ColumnType::Integer => "INTEGER",
      ColumnType::Float   => "REAL",
      ColumnType::Boolean => "BOOLEAN",
      ColumnType::Text    => "TEXT",
    }
  }

  /// Inverse of [`sql_type`](Self::sql_type), for decoding a declared SQL
  /// type read back from the store. Unknown declarations degrade to `Text`.
  pub fn from_sql_type(decl: &str) -> Self {
    match decl.to_ascii_uppercase().as_str() {
      "INTEGER" => ColumnType::Integer,
      "REAL"    => ColumnType::Float,
      "BOOLEAN" => ColumnType::Boolean,
      _         => ColumnType::Text,
    }
  }
}

/// One column of a survey table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
  pub name:     String,
  pub ty:       ColumnType,
  pub nullable: bool,
}

/// A named table schema: data columns in first-seen header order.
///
/// The synthetic `id` primary key is implicit — it is added by the
/// materializer, never listed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
  pub name:    String,
  pub columns: Vec<ColumnDef>,
}

impl TableSchema {
  /// Data column names, in schema order.
  pub fn column_names(&self) -> Vec<String> {
    self.columns.iter().map(|c| c.name.clone()).collect()
  }
}
