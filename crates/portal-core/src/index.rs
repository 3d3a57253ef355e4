//! Index-query seam to the storage collaborator
//!
//! The read API only ever talks to storage through `IndexStore::query`: one
//! bounded, ordered read of one partition of a secondary index, optionally
//! filtered and optionally resumed after a key.
//!
//! Scan semantics shared by every implementation:
//! - rows are ordered by `(sort value, id)`, descending unless `scan_forward`
//! - the exclusive start key is skipped along with everything before it
//! - at most `limit` rows are *evaluated*; the filter runs on each, so fewer
//!   may be returned
//! - `last_evaluated_key` is set iff rows remain beyond the evaluated window

use crate::errors::{store_validation, ExError, ExErrorKind, Result};
use crate::expression::Expression;
use crate::model::{AttributeValue, Item};
use std::cmp::Ordering;

/// Shape of a secondary index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub partition_attr: String,
    pub sort_attr: String,
}

/// Attribute that uniquely identifies a row within a partition
pub const ID_ATTR: &str = "id";

/// Full position of a row inside an index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub partition_value: String,
    pub sort_value: String,
    pub id: String,
}

impl IndexKey {
    /// Key of a row under `spec`; `None` if the row is not in the index
    pub fn from_item(spec: &IndexSpec, item: &Item) -> Option<Self> {
        let text = |name: &str| item.get(name).and_then(AttributeValue::as_str);
        Some(IndexKey {
            partition_value: text(spec.partition_attr.as_str())?.to_string(),
            sort_value: text(spec.sort_attr.as_str())?.to_string(),
            id: text(ID_ATTR)?.to_string(),
        })
    }

    /// Order within a partition
    pub fn position_cmp(&self, other: &IndexKey) -> Ordering {
        (self.sort_value.as_str(), self.id.as_str())
            .cmp(&(other.sort_value.as_str(), other.id.as_str()))
    }
}

/// One bounded index read
#[derive(Debug, Clone)]
pub struct IndexQuery {
    pub table: String,
    pub index_name: String,
    pub partition_attr: String,
    pub partition_value: String,
    pub filter: Option<Expression>,
    pub limit: u32,
    pub exclusive_start_key: Option<IndexKey>,
    pub scan_forward: bool,
}

/// Rows returned by one read plus where to resume
#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<IndexKey>,
}

/// The storage collaborator
pub trait IndexStore {
    /// Run exactly one bounded read.
    ///
    /// # Errors
    ///
    /// Store failures (validation, throttling, connectivity, persistence).
    fn query(&self, query: &IndexQuery) -> Result<QueryOutput>;
}

/// Reject requests the store would refuse before touching any rows
///
/// # Errors
///
/// `NotFound` for an unknown table, `Validation` for an unknown index,
/// mismatched partition attribute, or zero limit.
pub fn validate_query(table: &str, spec: &IndexSpec, query: &IndexQuery) -> Result<()> {
    if query.table != table {
        return Err(ExError::new(ExErrorKind::NotFound)
            .with_op("index_query")
            .with_entity_id(&query.table)
            .with_message("table not found"));
    }
    if query.index_name != spec.name {
        return Err(store_validation("index_query", "index not found on table")
            .with_entity_id(&query.index_name));
    }
    if query.partition_attr != spec.partition_attr {
        return Err(store_validation(
            "index_query",
            format!(
                "key condition must target '{}', got '{}'",
                spec.partition_attr, query.partition_attr
            ),
        ));
    }
    if query.limit == 0 {
        return Err(store_validation("index_query", "limit must be at least 1"));
    }
    Ok(())
}

/// True if `key` lies strictly after `start` in scan order
pub fn is_after_start(key: &IndexKey, start: &IndexKey, scan_forward: bool) -> bool {
    match key.position_cmp(start) {
        Ordering::Greater => scan_forward,
        Ordering::Less => !scan_forward,
        Ordering::Equal => false,
    }
}

/// Evaluate an ordered, already-resumed stream of rows.
///
/// `rows` only needs to yield `limit + 1` entries: the extra one is never
/// evaluated, it only proves that more rows exist.
pub fn evaluate_window<I>(rows: I, limit: u32, filter: Option<&Expression>) -> QueryOutput
where
    I: IntoIterator<Item = (IndexKey, Item)>,
{
    let window = limit as usize;
    let mut items = Vec::new();
    let mut last_key = None;
    let mut more = false;

    for (evaluated, (key, item)) in rows.into_iter().enumerate() {
        if evaluated == window {
            more = true;
            break;
        }
        if filter.map_or(true, |f| f.matches(&item)) {
            items.push(item);
        }
        last_key = Some(key);
    }

    QueryOutput {
        items,
        last_evaluated_key: if more { last_key } else { None },
    }
}

/// In-memory index over a fixed set of rows
#[derive(Debug, Clone)]
pub struct MemoryIndexStore {
    table: String,
    spec: IndexSpec,
    rows: Vec<Item>,
}

impl MemoryIndexStore {
    pub fn new(table: impl Into<String>, spec: IndexSpec) -> Self {
        Self {
            table: table.into(),
            spec,
            rows: Vec::new(),
        }
    }

    pub fn insert(&mut self, item: Item) {
        self.rows.push(item);
    }

    pub fn with_items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        self.rows.extend(items);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IndexStore for MemoryIndexStore {
    fn query(&self, query: &IndexQuery) -> Result<QueryOutput> {
        validate_query(&self.table, &self.spec, query)?;

        let mut candidates: Vec<(IndexKey, Item)> = self
            .rows
            .iter()
            .filter_map(|item| IndexKey::from_item(&self.spec, item).map(|k| (k, item)))
            .filter(|(key, _)| key.partition_value == query.partition_value)
            .map(|(key, item)| (key, item.clone()))
            .collect();

        candidates.sort_by(|(a, _), (b, _)| a.position_cmp(b));
        if !query.scan_forward {
            candidates.reverse();
        }

        let resumed = candidates.into_iter().filter(|(key, _)| {
            query
                .exclusive_start_key
                .as_ref()
                .map_or(true, |start| is_after_start(key, start, query.scan_forward))
        });

        Ok(evaluate_window(resumed, query.limit, query.filter.as_ref()))
    }
}
