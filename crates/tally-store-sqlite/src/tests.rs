//! Integration tests for `SqliteStore` against an in-memory database.

use tally_core::{
  schema::{ColumnDef, ColumnType, TableSchema},
  store::SurveyStore,
  value::{NewRow, Value},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn age_city_schema(name: &str) -> TableSchema {
  TableSchema {
    name:    name.to_string(),
    columns: vec![
      ColumnDef { name: "age".into(),  ty: ColumnType::Integer, nullable: true },
      ColumnDef { name: "city".into(), ty: ColumnType::Text,    nullable: true },
    ],
  }
}

fn keyed_row(id: i64, age: i64, city: &str) -> NewRow {
  NewRow {
    id:     Some(id),
    values: vec![Value::Integer(age), Value::Text(city.into())],
  }
}

// ─── Materialization ─────────────────────────────────────────────────────────

#[tokio::test]
async fn materialize_creates_an_empty_table() {
  let s = store().await;
  s.materialize(&age_city_schema("poll")).await.unwrap();

  let rows = s.fetch_rows("poll").await.unwrap().expect("table exists");
  assert_eq!(rows.columns, vec!["age", "city"]);
  assert!(rows.rows.is_empty());
}

#[tokio::test]
async fn materialize_is_idempotent_and_never_migrates() {
  let s = store().await;
  s.materialize(&age_city_schema("poll")).await.unwrap();
  s.upsert_rows("poll", &["age".into(), "city".into()], vec![keyed_row(1, 30, "NYC")])
    .await
    .unwrap();

  // Re-materializing — even with a drifted schema — leaves the existing
  // table and its rows untouched.
  let drifted = TableSchema {
    name:    "poll".into(),
    columns: vec![ColumnDef {
      name:     "score".into(),
      ty:       ColumnType::Float,
      nullable: true,
    }],
  };
  s.materialize(&drifted).await.unwrap();

  let rows = s.fetch_rows("poll").await.unwrap().unwrap();
  assert_eq!(rows.columns, vec!["age", "city"]);
  assert_eq!(rows.rows.len(), 1);
}

#[tokio::test]
async fn fetch_rows_for_missing_table_returns_none() {
  let s = store().await;
  assert!(s.fetch_rows("nope").await.unwrap().is_none());
}

// ─── Upserts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_without_id_lets_the_store_assign_sequential_ids() {
  let s = store().await;
  s.materialize(&age_city_schema("poll")).await.unwrap();

  let cols = vec!["age".to_string(), "city".to_string()];
  let rows = vec![
    NewRow { id: None, values: vec![Value::Integer(30), Value::Text("NYC".into())] },
    NewRow { id: None, values: vec![Value::Integer(25), Value::Text("LA".into())] },
  ];
  let applied = s.upsert_rows("poll", &cols, rows).await.unwrap();
  assert_eq!(applied, 2);

  let fetched = s.fetch_rows("poll").await.unwrap().unwrap();
  let ids: Vec<i64> = fetched.rows.iter().map(|r| r.id).collect();
  assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn keyed_upsert_is_idempotent() {
  let s = store().await;
  s.materialize(&age_city_schema("poll")).await.unwrap();
  let cols = vec!["age".to_string(), "city".to_string()];

  let batch = vec![keyed_row(1, 30, "NYC"), keyed_row(2, 25, "LA")];
  s.upsert_rows("poll", &cols, batch.clone()).await.unwrap();
  s.upsert_rows("poll", &cols, batch).await.unwrap();

  let fetched = s.fetch_rows("poll").await.unwrap().unwrap();
  assert_eq!(fetched.rows.len(), 2, "re-ingest must not duplicate rows");
}

#[tokio::test]
async fn keyed_upsert_overwrites_per_column() {
  let s = store().await;
  s.materialize(&age_city_schema("poll")).await.unwrap();
  let cols = vec!["age".to_string(), "city".to_string()];

  s.upsert_rows("poll", &cols, vec![keyed_row(1, 30, "NYC")]).await.unwrap();
  s.upsert_rows("poll", &cols, vec![keyed_row(1, 31, "SF")]).await.unwrap();

  let fetched = s.fetch_rows("poll").await.unwrap().unwrap();
  assert_eq!(fetched.rows.len(), 1);
  assert_eq!(fetched.rows[0].values[0], Value::Integer(31));
  assert_eq!(fetched.rows[0].values[1], Value::Text("SF".into()));
}

#[tokio::test]
async fn row_failure_reports_index_and_keeps_prior_rows() {
  let s = store().await;
  s.materialize(&age_city_schema("poll")).await.unwrap();
  let cols = vec!["age".to_string(), "city".to_string()];

  // Second row has the wrong arity, which fails at bind time.
  let batch = vec![
    keyed_row(1, 30, "NYC"),
    NewRow { id: Some(2), values: vec![Value::Integer(25)] },
  ];
  let err = s.upsert_rows("poll", &cols, batch).await.unwrap_err();
  match err {
    Error::RowInsert { index, .. } => assert_eq!(index, 1),
    other => panic!("expected RowInsert, got {other}"),
  }

  // The batch is not atomic: row 0 stayed committed.
  let fetched = s.fetch_rows("poll").await.unwrap().unwrap();
  assert_eq!(fetched.rows.len(), 1);
  assert_eq!(fetched.rows[0].id, 1);
}

#[tokio::test]
async fn empty_batch_is_a_noop() {
  let s = store().await;
  s.materialize(&age_city_schema("poll")).await.unwrap();
  let applied = s.upsert_rows("poll", &["age".into(), "city".into()], vec![]).await.unwrap();
  assert_eq!(applied, 0);
}

// ─── Value round-trips ───────────────────────────────────────────────────────

#[tokio::test]
async fn booleans_and_nulls_round_trip() {
  let s = store().await;
  let schema = TableSchema {
    name:    "flags".into(),
    columns: vec![
      ColumnDef { name: "subscribed".into(), ty: ColumnType::Boolean, nullable: true },
      ColumnDef { name: "score".into(),      ty: ColumnType::Float,   nullable: true },
    ],
  };
  s.materialize(&schema).await.unwrap();

  let cols = schema.column_names();
  let rows = vec![
    NewRow { id: Some(1), values: vec![Value::Boolean(true), Value::Float(0.5)] },
    NewRow { id: Some(2), values: vec![Value::Boolean(false), Value::Null] },
  ];
  s.upsert_rows("flags", &cols, rows).await.unwrap();

  let fetched = s.fetch_rows("flags").await.unwrap().unwrap();
  assert_eq!(fetched.rows[0].values, vec![Value::Boolean(true), Value::Float(0.5)]);
  assert_eq!(fetched.rows[1].values, vec![Value::Boolean(false), Value::Null]);
}

// ─── Enumeration ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_surveys_returns_sorted_table_names() {
  let s = store().await;
  assert!(s.list_surveys().await.unwrap().is_empty());

  s.materialize(&age_city_schema("zeta")).await.unwrap();
  s.materialize(&age_city_schema("alpha")).await.unwrap();

  assert_eq!(s.list_surveys().await.unwrap(), vec!["alpha", "zeta"]);
}
