//! Core types and trait definitions for the Tally survey store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod reshape;
pub mod schema;
pub mod store;
pub mod survey;
pub mod value;

pub use error::{Error, Result};
