//! Portal Store - SQLite-backed index store
//!
//! Provides:
//! - An `IndexStore` over a SQLite table emulating the wide-column works table
//! - Embedded migrations with checksums
//! - YAML fixture seeding for development and tests

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;

pub use errors::Result;
pub use repo::SqliteIndexStore;
