//! Portal Core - query construction and pagination for the works read API
//!
//! This crate provides:
//! - The record model (typed attribute rows, stored and public work shapes)
//! - The cursor codec for opaque continuation tokens
//! - Filter expressions and the facet-driven predicate builder
//! - The `IndexStore` seam to storage, with an in-memory implementation
//! - The result projector
//! - Error and logging facilities shared by the other crates

pub mod config;
pub mod cursor;
pub mod errors;
pub mod expression;
pub mod index;
pub mod logging_facility;
pub mod model;
pub mod predicate;
pub mod projection;

// Used by the logging macros from other crates
#[doc(hidden)]
pub use portal_core_types as core_types;
#[doc(hidden)]
pub use tracing;

pub use config::QueryConfig;
pub use cursor::{decode_cursor, encode_cursor, CursorKey};
pub use errors::{ExError, ExErrorKind, Result};
pub use expression::{Condition, ExprError, Expression, ExpressionBuilder, FilterNode};
pub use index::{IndexKey, IndexQuery, IndexSpec, IndexStore, MemoryIndexStore, QueryOutput};
pub use model::{AttributeValue, Item, StoredWork, WorkItem};
pub use predicate::{build_predicate, Facet};
