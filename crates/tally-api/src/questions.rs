//! Handler for `/questions/:question_id`.
//!
//! The survey scope is an explicit, required `?survey=` query parameter.
//! There is deliberately no server-side "current survey" context: every
//! request is self-contained, which removes the cross-request races a shared
//! selection would invite.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use tally_core::{reshape::question_view, store::SurveyStore, survey::Question};

use crate::{
  AppState,
  envelope::{Envelope, success},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct QuestionScope {
  pub survey: Option<String>,
}

/// `GET /questions/:question_id?survey=<survey_name>`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(question_id): Path<String>,
  Query(scope): Query<QuestionScope>,
) -> Result<Json<Envelope<Question>>, ApiError>
where
  S: SurveyStore + Clone + Send + Sync + 'static,
{
  let survey = scope.survey.ok_or_else(|| {
    ApiError::BadRequest("missing required query parameter: survey".to_string())
  })?;

  let rows = state
    .store
    .fetch_rows(&survey)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("survey {survey} not found")))?;

  let question = question_view(&question_id, &rows).map_err(|_| {
    ApiError::NotFound(format!(
      "question {question_id} not found in survey {survey}"
    ))
  })?;

  Ok(success(question))
}
