//! CSV parsing, type inference, and schema building for Tally.
//!
//! Pipeline:
//!   raw bytes
//!     └─ parse_reader()     → CsvTable (header + string records)
//!          └─ infer_types() → Vec<ColumnType>
//!               └─ build_schema() → TableSchema
//!                    └─ typed_rows() → Vec<Vec<Value>>
//!
//! Everything here is pure with respect to storage: the store crate consumes
//! the outputs, nothing in this crate touches a database.

pub mod error;
pub mod infer;
pub mod parse;
pub mod schema;

pub use error::{Error, Result};
pub use infer::{infer_types, typed_rows};
pub use parse::{CsvTable, parse_reader};
pub use schema::{build_schema, sanitize_identifier};
