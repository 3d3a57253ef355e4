//! Repository layer: the works table behind the `IndexStore` seam

pub mod sqlite_index;

pub use sqlite_index::{count_items, put_item, SqliteIndexStore};
