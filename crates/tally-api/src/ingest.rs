//! The ingestion orchestrator: CSV source → typed schema → materialized
//! table → upserted rows → survey view.
//!
//! Each step's error kind surfaces unchanged (CSV errors as themselves,
//! store errors boxed but intact); only the HTTP boundary renders them into
//! the response envelope.

use std::{io::Read, path::Path};

use tally_core::{
  reshape::survey_view,
  store::SurveyStore,
  survey::Survey,
  value::NewRow,
};
use tally_csv::{build_schema, infer_types, parse_reader, sanitize_identifier, typed_rows};

use crate::error::ApiError;

/// Derive the survey/table name from a source filename: strip the directory
/// and extension, then apply the identifier allow-list transform (lowercase,
/// spaces to underscores, alphanumeric + underscore only).
pub fn derive_survey_name(path: &Path) -> Result<String, ApiError> {
  let stem = path
    .file_stem()
    .and_then(|s| s.to_str())
    .ok_or_else(|| ApiError::BadRequest("missing or non-UTF-8 filename".to_string()))?;
  Ok(sanitize_identifier(stem)?)
}

/// Ingest a CSV source under an already-derived survey name.
///
/// Rows are keyed by 1-based source position, which equals the ids the store
/// assigns on first insert — so re-ingesting the identical file upserts the
/// same ids instead of appending duplicates.
pub async fn ingest_reader<S, R>(
  store: &S,
  name: &str,
  reader: R,
) -> Result<Survey, ApiError>
where
  S: SurveyStore,
  R: Read,
{
  let table = parse_reader(reader)?;
  let types = infer_types(&table);
  let schema = build_schema(name, &table, &types)?;
  let columns = schema.column_names();

  let rows: Vec<NewRow> = typed_rows(&table, &types)
    .into_iter()
    .enumerate()
    .map(|(i, values)| NewRow { id: Some(i as i64 + 1), values })
    .collect();
  let row_count = rows.len();

  store.materialize(&schema).await.map_err(ApiError::store)?;
  store
    .upsert_rows(&schema.name, &columns, rows)
    .await
    .map_err(ApiError::store)?;

  // Re-read everything for the table so the returned view reflects exactly
  // what the store now holds, not what this upload carried.
  let rowset = store
    .fetch_rows(&schema.name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("survey {name} not found")))?;

  tracing::info!(survey = name, rows = row_count, "ingested csv");
  Ok(survey_view(&schema.name, &rowset))
}

/// Ingest a CSV file from disk, deriving the survey name from its filename.
pub async fn ingest_file<S>(store: &S, path: &Path) -> Result<Survey, ApiError>
where
  S: SurveyStore,
{
  let name = derive_survey_name(path)?;
  let file = std::fs::File::open(path)?;
  ingest_reader(store, &name, std::io::BufReader::new(file)).await
}
