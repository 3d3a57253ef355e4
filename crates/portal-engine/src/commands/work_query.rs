//! Query orchestrator
//!
//! `apply_work_query` is the single entry point for both list operations:
//!
//! ```text
//! request → decode cursor → select facet → build predicate
//!         → one index query → project rows → encode cursor → WorkConnection
//! ```
//!
//! One call makes exactly one store query. A page can hold fewer than `limit`
//! items while more matches exist further along; only a missing
//! `exclusiveStartKey` means the scan is finished.

use portal_core::cursor::{encode_cursor, resume_key};
use portal_core::errors::{invalid_input, Result};
use portal_core::index::IndexStore;
use portal_core::projection::project_items;
use portal_core::{build_predicate, Facet, QueryConfig, WorkItem};
use portal_core::{log_op_end, log_op_error, log_op_start};
use portal_core_types::RequestContext;
use serde::{Deserialize, Serialize};

/// Arguments of `listWork`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWork {
    pub limit: Option<i64>,
    pub exclusive_start_key: Option<String>,
    pub option: Option<WorkQueryOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkQueryOption {
    pub tags: Option<Vec<String>>,
    /// Accepted but not searched on
    pub word: Option<String>,
    /// Accepted but not applied; use `workConnection` to list by author
    pub user_id: Option<String>,
}

/// Arguments of `workConnection` (works by one author)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkConnectionArg {
    pub limit: Option<i64>,
    pub exclusive_start_key: Option<String>,
    #[serde(default)]
    pub user_id: String,
}

/// One page of works
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkConnection {
    pub items: Vec<WorkItem>,
    pub exclusive_start_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkQuery {
    ListWork(ListWork),
    WorkConnection(WorkConnectionArg),
}

impl WorkQuery {
    fn op(&self) -> &'static str {
        match self {
            WorkQuery::ListWork(_) => "list_work",
            WorkQuery::WorkConnection(_) => "work_connection",
        }
    }

    fn limit(&self) -> Option<i64> {
        match self {
            WorkQuery::ListWork(arg) => arg.limit,
            WorkQuery::WorkConnection(arg) => arg.limit,
        }
    }

    fn cursor(&self) -> Option<&str> {
        match self {
            WorkQuery::ListWork(arg) => arg.exclusive_start_key.as_deref(),
            WorkQuery::WorkConnection(arg) => arg.exclusive_start_key.as_deref(),
        }
    }

    /// `listWork` filters by tags only when `option.tags` is given;
    /// `workConnection` always filters by author.
    fn facet(&self) -> Facet {
        match self {
            WorkQuery::ListWork(arg) => {
                let option = arg.option.as_ref();
                if let Some(opt) = option {
                    if opt.word.is_some() || opt.user_id.is_some() {
                        tracing::debug!(
                            component = module_path!(),
                            word = opt.word.is_some(),
                            user_id = opt.user_id.is_some(),
                            "listWork option fields ignored"
                        );
                    }
                }
                match option.and_then(|o| o.tags.clone()) {
                    Some(tags) => Facet::Tags(tags),
                    None => Facet::None,
                }
            }
            WorkQuery::WorkConnection(arg) => Facet::Author(arg.user_id.clone()),
        }
    }
}

fn effective_limit(op: &str, requested: Option<i64>, config: &QueryConfig) -> Result<u32> {
    match requested {
        None => Ok(config.default_limit),
        Some(n) => u32::try_from(n)
            .map_err(|_| invalid_input(op, format!("limit {} is out of range", n))),
    }
}

/// Run one list request end to end.
///
/// # Errors
///
/// `InvalidInput` for an out-of-range limit, `InvalidExpression` if the
/// filter cannot be built, `Serialization` for an unreadable row, and any
/// store error unmodified. No partial page is returned with an error.
pub fn apply_work_query(
    query: WorkQuery,
    store: &dyn IndexStore,
    config: &QueryConfig,
    ctx: &RequestContext,
) -> Result<WorkConnection> {
    let op = query.op();
    let facet = query.facet();
    log_op_start!(
        op,
        request_id = %ctx.request_id,
        trace_id = ctx.trace_id.as_ref().map(|t| t.as_str()).unwrap_or_default(),
        facet = facet.label()
    );
    let start = std::time::Instant::now();

    let result = (|| -> Result<WorkConnection> {
        let limit = effective_limit(op, query.limit(), config)?;
        let resume = resume_key(query.cursor());
        let filter = build_predicate(&facet)?;

        let raw = super::executor::execute_index_query(
            store,
            config,
            super::executor::QueryRequest {
                filter,
                limit,
                resume,
            },
        )?;

        let items = project_items(&raw.items)?;
        let exclusive_start_key = raw.last_key.as_ref().map(encode_cursor).transpose()?;

        Ok(WorkConnection {
            items,
            exclusive_start_key,
        })
    })()
    .map_err(|e| e.with_context(ctx));

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(page) => {
            log_op_end!(
                op,
                duration_ms = elapsed,
                request_id = %ctx.request_id,
                item_count = page.items.len(),
                has_more = page.exclusive_start_key.is_some()
            );
        }
        Err(e) => {
            log_op_error!(
                op,
                e.clone(),
                duration_ms = elapsed,
                request_id = %ctx.request_id
            );
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::errors::ExErrorKind;
    use portal_core::index::{IndexQuery, QueryOutput};
    use portal_core::{MemoryIndexStore, StoredWork};
    use std::cell::RefCell;

    fn work(id: &str, user_id: &str, created_at: &str, tags: &[&str]) -> StoredWork {
        StoredWork {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: format!("title {}", id),
            tags: if tags.is_empty() {
                None
            } else {
                Some(tags.iter().map(|t| t.to_string()).collect())
            },
            image_url: None,
            description: String::new(),
            created_at: created_at.to_string(),
        }
    }

    /// Wraps a memory store and records the limit of every query
    struct CountingStore {
        inner: MemoryIndexStore,
        limits: RefCell<Vec<u32>>,
    }

    impl IndexStore for CountingStore {
        fn query(&self, query: &IndexQuery) -> Result<QueryOutput> {
            self.limits.borrow_mut().push(query.limit);
            self.inner.query(query)
        }
    }

    fn store(works: &[StoredWork]) -> CountingStore {
        let config = QueryConfig::default();
        CountingStore {
            inner: MemoryIndexStore::new(&config.table_name, config.index_spec())
                .with_items(works.iter().map(StoredWork::to_item)),
            limits: RefCell::new(Vec::new()),
        }
    }

    fn list(limit: Option<i64>, cursor: Option<String>) -> WorkQuery {
        WorkQuery::ListWork(ListWork {
            limit,
            exclusive_start_key: cursor,
            option: None,
        })
    }

    fn run(query: WorkQuery, store: &CountingStore) -> Result<WorkConnection> {
        apply_work_query(query, store, &QueryConfig::default(), &RequestContext::new())
    }

    #[test]
    fn test_default_limit_is_ten() {
        let s = store(&[]);
        run(list(None, None), &s).unwrap();
        assert_eq!(*s.limits.borrow(), vec![10]);
    }

    #[test]
    fn test_spec_example_two_pages() {
        let s = store(&[
            work("r1", "u", "1", &[]),
            work("r3", "u", "3", &[]),
            work("r2", "u", "2", &[]),
        ]);

        let first = run(list(Some(2), None), &s).unwrap();
        let created: Vec<_> = first.items.iter().map(|i| i.created_at).collect();
        assert_eq!(created, vec![3, 2]);
        assert_eq!(
            first.exclusive_start_key.as_deref(),
            Some(r#"{"id":"r2","createdAt":"2"}"#)
        );

        let second = run(list(Some(2), first.exclusive_start_key), &s).unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].created_at, 1);
        assert_eq!(second.exclusive_start_key, None);
    }

    #[test]
    fn test_malformed_cursor_restarts_from_beginning() {
        let s = store(&[work("r1", "u", "1", &[]), work("r2", "u", "2", &[])]);
        let page = run(list(Some(5), Some("{broken".to_string())), &s).unwrap();
        let ids: Vec<_> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r1"]);
    }

    #[test]
    fn test_tags_option_selects_tag_facet() {
        let s = store(&[
            work("a", "u", "1", &["x", "y"]),
            work("b", "u", "2", &["x"]),
            work("c", "u", "3", &["y", "x"]),
        ]);
        let query = WorkQuery::ListWork(ListWork {
            limit: None,
            exclusive_start_key: None,
            option: Some(WorkQueryOption {
                tags: Some(vec!["x".to_string(), "y".to_string()]),
                ..Default::default()
            }),
        });
        let page = run(query, &s).unwrap();
        let ids: Vec<_> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_empty_tags_is_unfiltered() {
        let s = store(&[work("a", "u", "1", &[]), work("b", "u", "2", &["x"])]);
        let query = WorkQuery::ListWork(ListWork {
            option: Some(WorkQueryOption {
                tags: Some(vec![]),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(run(query, &s).unwrap().items.len(), 2);
    }

    #[test]
    fn test_list_option_user_id_is_not_applied() {
        let s = store(&[work("a", "u1", "1", &[]), work("b", "u2", "2", &[])]);
        let query = WorkQuery::ListWork(ListWork {
            option: Some(WorkQueryOption {
                user_id: Some("u1".to_string()),
                word: Some("sunset".to_string()),
                tags: None,
            }),
            ..Default::default()
        });
        assert_eq!(run(query, &s).unwrap().items.len(), 2);
    }

    #[test]
    fn test_work_connection_filters_by_author_containment() {
        let s = store(&[
            work("a", "u1", "1", &[]),
            work("b", "u2", "2", &[]),
            work("c", "u10", "3", &[]),
        ]);
        let query = WorkQuery::WorkConnection(WorkConnectionArg {
            limit: None,
            exclusive_start_key: None,
            user_id: "u1".to_string(),
        });
        let page = run(query, &s).unwrap();
        let ids: Vec<_> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_filtered_page_can_be_short_yet_continue() {
        let s = store(&[
            work("a", "u1", "1", &[]),
            work("b", "u2", "2", &[]),
            work("c", "u2", "3", &[]),
        ]);
        let query = WorkQuery::WorkConnection(WorkConnectionArg {
            limit: Some(2),
            exclusive_start_key: None,
            user_id: "u1".to_string(),
        });
        let page = run(query, &s).unwrap();
        assert!(page.items.is_empty());
        assert!(page.exclusive_start_key.is_some());
    }

    #[test]
    fn test_negative_limit_rejected_before_store() {
        let s = store(&[]);
        let err = run(list(Some(-1), None), &s).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(err.request_id().is_some());
        assert!(s.limits.borrow().is_empty());
    }

    #[test]
    fn test_zero_limit_reaches_store_and_fails() {
        let s = store(&[]);
        let err = run(list(Some(0), None), &s).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
        assert_eq!(*s.limits.borrow(), vec![0]);
    }

    #[test]
    fn test_non_numeric_created_at_projects_to_zero() {
        let s = store(&[work("a", "u", "not-a-number", &[])]);
        let page = run(list(None, None), &s).unwrap();
        assert_eq!(page.items[0].created_at, 0);
    }
}
