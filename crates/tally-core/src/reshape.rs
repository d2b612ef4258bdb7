//! Row-major → question-centric reshaping.
//!
//! Pure functions of their inputs: no I/O, no hidden state. The HTTP layer
//! calls these on every read; there is no cached view to invalidate.

use crate::{
  error::{Error, Result},
  survey::{Question, Response, Survey},
  value::RowSet,
};

/// Pivot a row-major [`RowSet`] into a [`Survey`].
///
/// Question order follows the set's column order (first-seen header order);
/// each question's responses follow row order.
pub fn survey_view(name: &str, rows: &RowSet) -> Survey {
  let questions = rows
    .columns
    .iter()
    .enumerate()
    .map(|(col, title)| Question {
      title:     title.clone(),
      responses: column_responses(rows, col),
    })
    .collect();

  Survey { name: name.to_string(), questions }
}

/// Project a single column of a [`RowSet`] into a [`Question`].
///
/// Equivalent to computing [`survey_view`] and selecting one question, but
/// without materialising the rest.
pub fn question_view(title: &str, rows: &RowSet) -> Result<Question> {
  let col = rows
    .columns
    .iter()
    .position(|c| c == title)
    .ok_or_else(|| Error::QuestionNotFound(title.to_string()))?;

  Ok(Question {
    title:     title.to_string(),
    responses: column_responses(rows, col),
  })
}

fn column_responses(rows: &RowSet, col: usize) -> Vec<Response> {
  rows
    .rows
    .iter()
    .map(|row| Response {
      id:      row.id,
      content: row.values[col].clone(),
    })
    .collect()
}
