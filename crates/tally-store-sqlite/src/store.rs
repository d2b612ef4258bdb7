//! [`SqliteStore`] — the SQLite implementation of [`SurveyStore`].

use std::path::Path;

use tally_core::{
  schema::{ColumnType, ID_COLUMN, TableSchema},
  store::SurveyStore,
  value::{NewRow, RowSet, StoredRow, Value},
};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally survey store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// funnel through one dedicated connection thread, which also makes the
/// create-if-absent race for a single table name benign.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SQL construction ────────────────────────────────────────────────────────
//
// Identifiers are sanitized through an allow-list upstream (tally-csv) and
// additionally double-quoted here; values are always bound as parameters.

fn quote_ident(name: &str) -> String {
  format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(schema: &TableSchema) -> String {
  let mut columns = vec![format!("{} INTEGER PRIMARY KEY", quote_ident(ID_COLUMN))];
  columns.extend(
    schema
      .columns
      .iter()
      .map(|c| format!("{} {}", quote_ident(&c.name), c.ty.sql_type())),
  );
  format!(
    "CREATE TABLE IF NOT EXISTS {} ({})",
    quote_ident(&schema.name),
    columns.join(", ")
  )
}

/// INSERT statement for one row shape. `with_id` prepends the primary key
/// and adds the upsert clause (last-write-wins per column).
fn insert_sql(table: &str, columns: &[String], with_id: bool) -> String {
  let table = quote_ident(table);
  let mut names: Vec<String> = Vec::with_capacity(columns.len() + 1);
  if with_id {
    names.push(quote_ident(ID_COLUMN));
  }
  names.extend(columns.iter().map(|c| quote_ident(c)));

  if names.is_empty() {
    return format!("INSERT INTO {table} DEFAULT VALUES");
  }

  let placeholders: Vec<String> =
    (1..=names.len()).map(|i| format!("?{i}")).collect();
  let mut sql = format!(
    "INSERT INTO {table} ({}) VALUES ({})",
    names.join(", "),
    placeholders.join(", ")
  );

  if with_id {
    if columns.is_empty() {
      sql.push_str(&format!(" ON CONFLICT({}) DO NOTHING", quote_ident(ID_COLUMN)));
    } else {
      let assignments: Vec<String> = columns
        .iter()
        .map(|c| format!("{0} = excluded.{0}", quote_ident(c)))
        .collect();
      sql.push_str(&format!(
        " ON CONFLICT({}) DO UPDATE SET {}",
        quote_ident(ID_COLUMN),
        assignments.join(", ")
      ));
    }
  }
  sql
}

// ─── Value encoding / decoding ───────────────────────────────────────────────

fn bind_value(value: &Value) -> rusqlite::types::Value {
  use rusqlite::types::Value as Sql;
  match value {
    Value::Null       => Sql::Null,
    Value::Integer(i) => Sql::Integer(*i),
    Value::Float(f)   => Sql::Real(*f),
    Value::Boolean(b) => Sql::Integer(i64::from(*b)),
    Value::Text(t)    => Sql::Text(t.clone()),
  }
}

/// Decode one stored cell under the column's declared type. Booleans come
/// back from SQLite as 0/1 integers and are re-tagged here.
fn decode_value(raw: rusqlite::types::ValueRef<'_>, ty: ColumnType) -> Value {
  use rusqlite::types::ValueRef;
  match raw {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => match ty {
      ColumnType::Boolean => Value::Boolean(i != 0),
      ColumnType::Float   => Value::Float(i as f64),
      _                   => Value::Integer(i),
    },
    ValueRef::Real(f) => Value::Float(f),
    ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    ValueRef::Blob(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
  }
}

fn exec_row(
  conn: &rusqlite::Connection,
  plain_sql: &str,
  keyed_sql: &str,
  row: &NewRow,
) -> rusqlite::Result<()> {
  let mut params: Vec<rusqlite::types::Value> =
    Vec::with_capacity(row.values.len() + 1);
  let sql = match row.id {
    Some(id) => {
      params.push(rusqlite::types::Value::Integer(id));
      keyed_sql
    }
    None => plain_sql,
  };
  params.extend(row.values.iter().map(bind_value));

  let mut stmt = conn.prepare_cached(sql)?;
  stmt.execute(rusqlite::params_from_iter(params))?;
  Ok(())
}

// ─── SurveyStore implementation ──────────────────────────────────────────────

impl SurveyStore for SqliteStore {
  type Error = Error;

  async fn materialize(&self, schema: &TableSchema) -> Result<()> {
    let ddl = create_table_sql(schema);
    let table = schema.name.clone();

    self
      .conn
      .call(move |conn| Ok(conn.execute_batch(&ddl)))
      .await?
      .map_err(|source| Error::Materialization { table, source })
  }

  async fn upsert_rows(
    &self,
    table: &str,
    columns: &[String],
    rows: Vec<NewRow>,
  ) -> Result<usize> {
    if rows.is_empty() {
      return Ok(0);
    }
    let plain_sql = insert_sql(table, columns, false);
    let keyed_sql = insert_sql(table, columns, true);

    let outcome: std::result::Result<usize, (usize, rusqlite::Error)> = self
      .conn
      .call(move |conn| {
        let mut applied = 0usize;
        // Source order, one statement per row, autocommit: rows applied
        // before a failure stay committed.
        for (index, row) in rows.iter().enumerate() {
          if let Err(source) = exec_row(conn, &plain_sql, &keyed_sql, row) {
            return Ok(Err((index, source)));
          }
          applied += 1;
        }
        Ok(Ok(applied))
      })
      .await?;

    outcome.map_err(|(index, source)| Error::RowInsert { index, source })
  }

  async fn fetch_rows(&self, table: &str) -> Result<Option<RowSet>> {
    let table = table.to_string();

    let rowset = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT name, type FROM pragma_table_info(?1)")?;
        let table_info: Vec<(String, String)> = stmt
          .query_map(rusqlite::params![table], |r| {
            Ok((r.get(0)?, r.get(1)?))
          })?
          .collect::<rusqlite::Result<_>>()?;

        if table_info.is_empty() {
          return Ok(None);
        }

        let data_columns: Vec<(String, ColumnType)> = table_info
          .into_iter()
          .filter(|(name, _)| name != ID_COLUMN)
          .map(|(name, decl)| {
            let ty = ColumnType::from_sql_type(&decl);
            (name, ty)
          })
          .collect();

        let mut select_list = vec![quote_ident(ID_COLUMN)];
        select_list.extend(data_columns.iter().map(|(n, _)| quote_ident(n)));
        let select = format!(
          "SELECT {} FROM {} ORDER BY {}",
          select_list.join(", "),
          quote_ident(&table),
          quote_ident(ID_COLUMN)
        );

        let mut stmt = conn.prepare(&select)?;
        let mut fetched = stmt.query([])?;
        let mut rows = Vec::new();
        while let Some(r) = fetched.next()? {
          let id: i64 = r.get(0)?;
          let mut values = Vec::with_capacity(data_columns.len());
          for (i, (_, ty)) in data_columns.iter().enumerate() {
            values.push(decode_value(r.get_ref(i + 1)?, *ty));
          }
          rows.push(StoredRow { id, values });
        }

        Ok(Some(RowSet {
          columns: data_columns.into_iter().map(|(n, _)| n).collect(),
          rows,
        }))
      })
      .await?;

    Ok(rowset)
  }

  async fn list_surveys(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name FROM sqlite_master
           WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
           ORDER BY name",
        )?;
        let names: Vec<String> = stmt
          .query_map([], |r| r.get(0))?
          .collect::<rusqlite::Result<_>>()?;
        Ok(names)
      })
      .await?;
    Ok(names)
  }
}
