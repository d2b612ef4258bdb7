//! Handler for `POST /upload` — multipart CSV ingestion.

use std::path::Path;

use axum::{Json, extract::Multipart, extract::State};
use tally_core::{store::SurveyStore, survey::Survey};

use crate::{
  AppState,
  envelope::{Envelope, success},
  error::ApiError,
  ingest,
};

/// `POST /upload` (multipart)
///
/// Takes the first field that carries a filename, persists it under the
/// configured upload directory, and runs the ingestion orchestrator on the
/// stored file. Returns the resulting survey view.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  mut multipart: Multipart,
) -> Result<Json<Envelope<Survey>>, ApiError>
where
  S: SurveyStore + Clone + Send + Sync + 'static,
{
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
  {
    let Some(file_name) = field.file_name().map(ToString::to_string) else {
      continue;
    };
    let data = field
      .bytes()
      .await
      .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?;

    // Keep only the final component of the client-supplied name; directory
    // segments never reach the filesystem.
    let file_name = Path::new(&file_name)
      .file_name()
      .and_then(|n| n.to_str())
      .ok_or_else(|| ApiError::BadRequest("unusable filename".to_string()))?
      .to_string();

    std::fs::create_dir_all(&state.config.upload_dir)?;
    let dest = state.config.upload_dir.join(&file_name);
    std::fs::write(&dest, &data)?;
    tracing::info!(file = %dest.display(), bytes = data.len(), "stored uploaded csv");

    return Ok(success(ingest::ingest_file(state.store.as_ref(), &dest).await?));
  }

  Err(ApiError::BadRequest("multipart body contains no file field".to_string()))
}
