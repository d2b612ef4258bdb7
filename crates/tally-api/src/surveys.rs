//! Handlers for `/surveys` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/surveys` | Every ingested survey, question-centric |
//! | `GET`  | `/surveys/:survey_name` | Error envelope if name unknown |
//!
//! Views are recomputed from the store on every request — there is no cached
//! survey state to invalidate.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Serialize;
use tally_core::{reshape::survey_view, store::SurveyStore, survey::Survey};

use crate::{
  AppState,
  envelope::{Envelope, success},
  error::ApiError,
};

/// Payload of `GET /surveys`.
#[derive(Debug, Serialize)]
pub struct SurveyIndex {
  pub surveys: Vec<Survey>,
}

/// `GET /surveys`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Envelope<SurveyIndex>>, ApiError>
where
  S: SurveyStore + Clone + Send + Sync + 'static,
{
  let names = state.store.list_surveys().await.map_err(ApiError::store)?;

  let mut surveys = Vec::with_capacity(names.len());
  for name in names {
    // A table dropped between the listing and the read just falls out of
    // the result.
    if let Some(rows) = state.store.fetch_rows(&name).await.map_err(ApiError::store)? {
      surveys.push(survey_view(&name, &rows));
    }
  }

  Ok(success(SurveyIndex { surveys }))
}

/// `GET /surveys/:survey_name`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(survey_name): Path<String>,
) -> Result<Json<Envelope<Survey>>, ApiError>
where
  S: SurveyStore + Clone + Send + Sync + 'static,
{
  let rows = state
    .store
    .fetch_rows(&survey_name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("survey {survey_name} not found")))?;

  Ok(success(survey_view(&survey_name, &rows)))
}
