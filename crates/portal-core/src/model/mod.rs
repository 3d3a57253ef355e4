//! Record model
//!
//! `attribute` describes a single wide-column row as the store holds it;
//! `work` describes the work record carried in that row and the public shape
//! it is projected into.

pub mod attribute;
pub mod work;

pub use attribute::{AttributeValue, Item};
pub use work::{StoredWork, WorkItem};
