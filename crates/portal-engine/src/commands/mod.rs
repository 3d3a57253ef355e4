//! Read-only work queries
//!
//! - `executor`: one bounded index query against the store
//! - `work_query`: request variants, facet selection and page assembly

pub mod executor;
pub mod work_query;

pub use work_query::{
    apply_work_query, ListWork, WorkConnection, WorkConnectionArg, WorkQuery, WorkQueryOption,
};
