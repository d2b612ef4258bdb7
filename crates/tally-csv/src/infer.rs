//! Per-column semantic type inference.
//!
//! A column's type is the narrowest candidate under which *all* present
//! values parse, checked in the order `Integer < Float < Boolean < Text`.
//! Any parse failure demotes to the next-wider candidate; `Text` never
//! fails. Empty and whitespace-only cells are null markers and never block a
//! narrower type. Locale-aware numerics and date/time detection are
//! deliberately absent — dates degrade to `Text`.

use tally_core::{schema::ColumnType, value::Value};

use crate::parse::CsvTable;

/// Infer one [`ColumnType`] per header column of `table`.
pub fn infer_types(table: &CsvTable) -> Vec<ColumnType> {
  (0..table.headers.len())
    .map(|col| infer_column(table.column(col)))
    .collect()
}

/// Infer the type of a single column from its raw values.
fn infer_column<'a>(values: impl Iterator<Item = &'a str>) -> ColumnType {
  let mut all_integer = true;
  let mut all_float   = true;
  let mut all_boolean = true;
  let mut seen_any    = false;

  for raw in values {
    let raw = raw.trim();
    if raw.is_empty() {
      continue;
    }
    seen_any = true;
    all_integer &= parses_integer(raw);
    all_float   &= parses_float(raw);
    all_boolean &= parses_boolean(raw);
    if !(all_integer || all_float || all_boolean) {
      return ColumnType::Text;
    }
  }

  // A column with no present values stays Text — there is nothing to
  // narrow on, and Text round-trips anything a later upload adds.
  if !seen_any {
    return ColumnType::Text;
  }

  if all_integer {
    ColumnType::Integer
  } else if all_float {
    ColumnType::Float
  } else if all_boolean {
    ColumnType::Boolean
  } else {
    ColumnType::Text
  }
}

fn parses_integer(raw: &str) -> bool {
  raw.parse::<i64>().is_ok()
}

fn parses_float(raw: &str) -> bool {
  raw.parse::<f64>().is_ok()
}

fn parses_boolean(raw: &str) -> bool {
  raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false")
}

/// Convert one raw cell into a [`Value`] under an inferred column type.
///
/// Inference guarantees every present value parses under its column's type;
/// the `Text` fallback below is a total-function safety net, not an expected
/// path.
pub fn parse_value(raw: &str, ty: ColumnType) -> Value {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Value::Null;
  }
  match ty {
    ColumnType::Integer => trimmed
      .parse::<i64>()
      .map(Value::Integer)
      .unwrap_or_else(|_| Value::Text(raw.to_string())),
    ColumnType::Float => trimmed
      .parse::<f64>()
      .map(Value::Float)
      .unwrap_or_else(|_| Value::Text(raw.to_string())),
    ColumnType::Boolean => {
      if trimmed.eq_ignore_ascii_case("true") {
        Value::Boolean(true)
      } else if trimmed.eq_ignore_ascii_case("false") {
        Value::Boolean(false)
      } else {
        Value::Text(raw.to_string())
      }
    }
    ColumnType::Text => Value::Text(raw.to_string()),
  }
}

/// Convert every record of `table` into typed values, one `Vec<Value>` per
/// row, parallel to `types` (which must match the header count).
pub fn typed_rows(table: &CsvTable, types: &[ColumnType]) -> Vec<Vec<Value>> {
  table
    .records
    .iter()
    .map(|record| {
      record
        .iter()
        .zip(types)
        .map(|(raw, ty)| parse_value(raw, *ty))
        .collect()
    })
    .collect()
}
