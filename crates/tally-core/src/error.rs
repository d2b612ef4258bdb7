//! Error types for `tally-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("question not found: {0}")]
  QuestionNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
