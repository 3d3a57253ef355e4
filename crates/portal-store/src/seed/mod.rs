//! Fixture seeding
//!
//! Loads work records from a YAML fixture into the works table. This is
//! development and test tooling; the read API itself never writes.

pub mod format_v0;
pub mod importer;
pub mod parser;

pub use format_v0::{SeedV0, SeedWork};
pub use importer::{import_seed, import_seed_str};
pub use parser::{parse_seed_file, parse_seed_str};
