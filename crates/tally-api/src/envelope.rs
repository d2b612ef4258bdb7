//! The uniform `{status, data}` response envelope.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Wire envelope carried by every endpoint, success and failure alike.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub status: String,
  pub data:   T,
}

/// Wrap a payload in a success envelope.
pub fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
  Json(Envelope { status: "success".to_string(), data })
}
