//! Seed parser with validation
//!
//! Rejects fixtures whose rows could not be paginated correctly: duplicate
//! ids, or `createdAt` values that would not sort the same as text and as
//! numbers.

use crate::errors::{io_error, seed_validation, Result};
use crate::seed::format_v0::SeedV0;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub fn parse_seed_file(path: &Path) -> Result<SeedV0> {
    let content = fs::read_to_string(path).map_err(|e| io_error("seed_read", e))?;
    parse_seed_str(&content)
}

pub fn parse_seed_str(content: &str) -> Result<SeedV0> {
    let seed: SeedV0 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_seed(&seed)?;

    Ok(seed)
}

fn validate_seed(seed: &SeedV0) -> Result<()> {
    if seed.schema_version != 0 {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            seed.schema_version
        )));
    }

    let mut ids = HashSet::new();
    let mut width = None;

    for work in &seed.works {
        if work.id.is_empty() {
            return Err(seed_validation("work with empty id"));
        }
        if !ids.insert(work.id.as_str()) {
            return Err(seed_validation(&format!("Duplicate work id {}", work.id)));
        }

        let created_at = work.created_at.as_text();
        if created_at.is_empty() || !created_at.bytes().all(|b| b.is_ascii_digit()) {
            return Err(seed_validation(&format!(
                "work {}: createdAt '{}' is not an unsigned integer",
                work.id, created_at
            )));
        }
        // equal width keeps text order and numeric order identical
        match width {
            None => width = Some(created_at.len()),
            Some(w) if w != created_at.len() => {
                return Err(seed_validation(&format!(
                    "work {}: createdAt '{}' is not {} digits wide like the other rows",
                    work.id, created_at, w
                )));
            }
            Some(_) => {}
        }
    }

    Ok(())
}
