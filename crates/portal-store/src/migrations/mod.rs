//! Migration framework
//!
//! - Embedded SQL migrations
//! - Idempotent application with recorded checksums

mod checksums;
mod embedded;
mod runner;

pub use runner::apply_migrations;
