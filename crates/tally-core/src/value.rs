//! Scalar values and row representations.

use serde::{Deserialize, Serialize};

/// A single cell value, typed per the owning column's inferred type.
///
/// Serializes untagged: `Null` → JSON null, numbers and booleans as
/// themselves, `Text` as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Null,
  Integer(i64),
  Float(f64),
  Boolean(bool),
  Text(String),
}

impl Value {
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }
}

/// A row bound for the store, values parallel to the schema's data columns.
///
/// `id: None` means "insert and let the store assign"; `id: Some(_)` means
/// insert-or-replace on primary-key conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRow {
  pub id:     Option<i64>,
  pub values: Vec<Value>,
}

/// A row read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
  pub id:     i64,
  pub values: Vec<Value>,
}

/// A row-major result set for one table: data column names (the synthetic
/// `id` excluded) plus rows in id order, values parallel to `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
  pub columns: Vec<String>,
  pub rows:    Vec<StoredRow>,
}
