//! SQLite backend for the Tally survey store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Tables are created per survey at
//! ingestion time; there is no fixed schema beyond the per-table synthetic
//! `id` primary key.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
