//! SQLite implementation of `IndexStore`
//!
//! The partition is read in index order straight from SQL, one row past the
//! limit. The filter runs in process through the shared window evaluator, so
//! limit and cursor behave exactly as they do for the in-memory store.

use crate::errors::{from_rusqlite, Result};
use portal_core::errors::{ExError, ExErrorKind};
use portal_core::index::{evaluate_window, validate_query, IndexKey, IndexQuery, QueryOutput};
use portal_core::{IndexSpec, IndexStore, Item};
use rusqlite::{params, Connection};

pub struct SqliteIndexStore<'c> {
    conn: &'c Connection,
    table: String,
    spec: IndexSpec,
}

impl<'c> SqliteIndexStore<'c> {
    /// `table` is the logical table name callers address queries to
    pub fn new(conn: &'c Connection, table: impl Into<String>, spec: IndexSpec) -> Self {
        Self {
            conn,
            table: table.into(),
            spec,
        }
    }
}

impl IndexStore for SqliteIndexStore<'_> {
    fn query(&self, query: &IndexQuery) -> Result<QueryOutput> {
        validate_query(&self.table, &self.spec, query)?;

        let (cmp, direction) = if query.scan_forward {
            (">", "ASC")
        } else {
            ("<", "DESC")
        };
        let sql = format!(
            "SELECT id, partition_value, sort_value, item FROM works
             WHERE partition_value = ?1
               AND sort_value IS NOT NULL
               AND (?2 IS NULL OR (sort_value, id) {cmp} (?2, ?3))
             ORDER BY sort_value {direction}, id {direction}
             LIMIT ?4"
        );

        let (start_sort, start_id) = match &query.exclusive_start_key {
            Some(key) => (Some(key.sort_value.as_str()), Some(key.id.as_str())),
            None => (None, None),
        };
        let fetch = i64::from(query.limit) + 1;

        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let raw: Vec<(IndexKey, String)> = stmt
            .query_map(
                params![query.partition_value, start_sort, start_id, fetch],
                |row| {
                    Ok((
                        IndexKey {
                            id: row.get(0)?,
                            partition_value: row.get(1)?,
                            sort_value: row.get(2)?,
                        },
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        let rows = raw
            .into_iter()
            .map(|(key, json)| decode_item(&key, &json).map(|item| (key, item)))
            .collect::<Result<Vec<_>>>()?;

        Ok(evaluate_window(rows, query.limit, query.filter.as_ref()))
    }
}

fn decode_item(key: &IndexKey, json: &str) -> Result<Item> {
    serde_json::from_str(json).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("decode_item")
            .with_entity_id(&key.id)
            .with_message(e.to_string())
    })
}

/// Insert or replace a row, copying its index key into the key columns.
///
/// Rows without the `id` attribute are rejected; rows without a partition
/// or sort value are stored but stay out of the index.
pub fn put_item(conn: &Connection, spec: &IndexSpec, item: &Item) -> Result<()> {
    let text = |name: &str| item.get(name).and_then(|v| v.as_str());
    let id = text(portal_core::index::ID_ATTR).ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("put_item")
            .with_message("item has no string 'id' attribute")
    })?;
    let json = serde_json::to_string(item)?;

    conn.execute(
        "INSERT OR REPLACE INTO works (id, partition_value, sort_value, item)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            id,
            text(spec.partition_attr.as_str()),
            text(spec.sort_attr.as_str()),
            json
        ],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

pub fn count_items(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM works", [], |row| row.get(0))
        .map_err(from_rusqlite)
}
