//! Query executor
//!
//! Issues exactly one newest-first read of the configured index partition.
//! Store errors come back untouched; retrying is left to whoever owns the
//! transport.

use portal_core::errors::Result;
use portal_core::index::{IndexQuery, IndexStore};
use portal_core::{CursorKey, Expression, Item, QueryConfig};

/// What the orchestrator asks for
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub filter: Option<Expression>,
    /// Rows the store evaluates, not rows it must return
    pub limit: u32,
    pub resume: Option<CursorKey>,
}

/// Raw rows plus where the store stopped
#[derive(Debug, Clone)]
pub struct RawPage {
    pub items: Vec<Item>,
    pub last_key: Option<CursorKey>,
}

pub fn build_index_query(config: &QueryConfig, request: QueryRequest) -> IndexQuery {
    IndexQuery {
        table: config.table_name.clone(),
        index_name: config.index_name.clone(),
        partition_attr: config.partition_attr.clone(),
        partition_value: config.partition_value.clone(),
        filter: request.filter,
        limit: request.limit,
        exclusive_start_key: request
            .resume
            .map(|key| key.to_index_key(&config.partition_value)),
        scan_forward: false,
    }
}

/// # Errors
///
/// Whatever the store reports.
pub fn execute_index_query(
    store: &dyn IndexStore,
    config: &QueryConfig,
    request: QueryRequest,
) -> Result<RawPage> {
    let query = build_index_query(config, request);

    tracing::debug!(
        component = module_path!(),
        op = "index_query",
        index_name = %query.index_name,
        limit = query.limit,
        filter = %query.filter.as_ref().map(|f| f.filter_string()).unwrap_or_default(),
        resumed = query.exclusive_start_key.is_some(),
    );

    let output = store.query(&query)?;

    Ok(RawPage {
        items: output.items,
        last_key: output
            .last_evaluated_key
            .as_ref()
            .map(CursorKey::from_index_key),
    })
}
