//! The question-centric read model.
//!
//! A survey is a derived, recomputed view over one stored table — nothing
//! here is persisted directly. Every read request rebuilds it fresh from the
//! store via [`reshape`](crate::reshape).

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One answer to one question: the owning row's id plus the cell content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
  pub id:      i64,
  pub content: Value,
}

/// One column reinterpreted as a titled group of responses, in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
  pub title:     String,
  pub responses: Vec<Response>,
}

/// The question-centric view of one ingested table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
  pub name:      String,
  pub questions: Vec<Question>,
}

impl Survey {
  /// Look up a question by title.
  pub fn question(&self, title: &str) -> Option<&Question> {
    self.questions.iter().find(|q| q.title == title)
  }
}
