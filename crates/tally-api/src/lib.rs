//! JSON HTTP layer for Tally.
//!
//! Exposes an axum [`Router`] backed by any [`tally_core::store::SurveyStore`].
//! Every endpoint answers with the uniform `{status, data}` envelope; CORS is
//! permissive and transport concerns beyond that are the caller's
//! responsibility.

pub mod envelope;
pub mod error;
pub mod ingest;
pub mod questions;
pub mod surveys;
pub mod upload;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::store::SurveyStore;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TALLY_`-prefixed environment variables.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default = "default_upload_dir")]
  pub upload_dir: PathBuf,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8000
}

fn default_store_path() -> PathBuf {
  PathBuf::from("tally.db")
}

fn default_upload_dir() -> PathBuf {
  PathBuf::from("uploads")
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
      upload_dir: default_upload_dir(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: SurveyStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the survey API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: SurveyStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/surveys", get(surveys::list::<S>))
    .route("/surveys/{survey_name}", get(surveys::get_one::<S>))
    .route("/questions/{question_id}", get(questions::get_one::<S>))
    .route("/upload", post(upload::handler::<S>))
    .layer(
      CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::Value as Json;
  use tally_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  const BOUNDARY: &str = "tally-test-boundary";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let upload_dir =
      std::env::temp_dir().join(format!("tally-api-test-{}", std::process::id()));
    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        store_path: PathBuf::from(":memory:"),
        upload_dir,
      }),
    }
  }

  async fn get_json(state: AppState<SqliteStore>, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
      .method("GET")
      .uri(uri)
      .body(Body::empty())
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  fn multipart_body(file_name: &str, content: &str) -> Vec<u8> {
    format!(
      "--{BOUNDARY}\r\n\
       Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
       Content-Type: text/csv\r\n\r\n\
       {content}\r\n\
       --{BOUNDARY}--\r\n"
    )
    .into_bytes()
  }

  async fn upload(
    state: AppState<SqliteStore>,
    file_name: &str,
    content: &str,
  ) -> (StatusCode, Json) {
    let req = Request::builder()
      .method("POST")
      .uri("/upload")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(multipart_body(file_name, content)))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  // ── Reads on an empty store ─────────────────────────────────────────────────

  #[tokio::test]
  async fn surveys_list_starts_empty() {
    let state = make_state().await;
    let (status, body) = get_json(state, "/surveys").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["surveys"], serde_json::json!([]));
  }

  #[tokio::test]
  async fn unknown_survey_returns_error_envelope() {
    let state = make_state().await;
    let (status, body) = get_json(state, "/surveys/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["data"], "survey missing not found");
  }

  // ── Upload / round-trip ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn upload_returns_the_question_centric_view() {
    let state = make_state().await;
    let (status, body) =
      upload(state, "US Age Survey.csv", "age,city\n30,NYC\n25,LA\n").await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["status"], "success");

    let survey = &body["data"];
    assert_eq!(survey["name"], "us_age_survey");

    let questions = survey["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);

    assert_eq!(questions[0]["title"], "age");
    assert_eq!(
      questions[0]["responses"],
      serde_json::json!([
        { "id": 1, "content": 30 },
        { "id": 2, "content": 25 },
      ])
    );
    assert_eq!(questions[1]["title"], "city");
    assert_eq!(
      questions[1]["responses"],
      serde_json::json!([
        { "id": 1, "content": "NYC" },
        { "id": 2, "content": "LA" },
      ])
    );
  }

  #[tokio::test]
  async fn uploaded_survey_is_fetchable_by_name() {
    let state = make_state().await;
    upload(state.clone(), "pets.csv", "species,count\ncat,3\ndog,1\n").await;

    let (status, body) = get_json(state, "/surveys/pets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let titles: Vec<&str> = body["data"]["questions"]
      .as_array()
      .unwrap()
      .iter()
      .map(|q| q["title"].as_str().unwrap())
      .collect();
    assert_eq!(titles, vec!["species", "count"]);
  }

  #[tokio::test]
  async fn repeat_upload_does_not_duplicate_rows() {
    let state = make_state().await;
    let csv = "age,city\n30,NYC\n25,LA\n";
    upload(state.clone(), "repeat poll.csv", csv).await;
    let (_, body) = upload(state.clone(), "repeat poll.csv", csv).await;

    let responses = body["data"]["questions"][0]["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 2, "re-ingest must upsert, not append");
  }

  // ── Questions ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn question_is_resolved_against_an_explicit_survey() {
    let state = make_state().await;
    upload(state.clone(), "ratings.csv", "score\n4\n5\n").await;

    let (status, body) = get_json(state, "/questions/score?survey=ratings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["title"], "score");
    assert_eq!(
      body["data"]["responses"],
      serde_json::json!([
        { "id": 1, "content": 4 },
        { "id": 2, "content": 5 },
      ])
    );
  }

  #[tokio::test]
  async fn question_without_survey_scope_is_a_bad_request() {
    let state = make_state().await;
    let (status, body) = get_json(state, "/questions/score").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
  }

  #[tokio::test]
  async fn unknown_question_returns_error_envelope() {
    let state = make_state().await;
    upload(state.clone(), "known.csv", "score\n4\n").await;

    let (status, body) =
      get_json(state, "/questions/unknown_column?survey=known").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["data"], "question unknown_column not found in survey known");
  }

  // ── Rejected uploads ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn reserved_id_column_is_rejected() {
    let state = make_state().await;
    let (status, body) = upload(state, "bad.csv", "id,age\n1,30\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
  }

  #[tokio::test]
  async fn malformed_csv_is_rejected_and_nothing_is_listed() {
    let state = make_state().await;
    let (status, body) = upload(state.clone(), "broken.csv", "a,b\n1,2\n3\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (_, listing) = get_json(state, "/surveys").await;
    assert_eq!(listing["data"]["surveys"], serde_json::json!([]));
  }
}
