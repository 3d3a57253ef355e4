//! Seed importer
//!
//! Parses, validates, then writes every row inside one transaction.
//!
//! Each file is checked on its own by the parser; the importer also checks
//! that its `createdAt` width matches the rows already stored, so several
//! imports into one database still page newest first.

use crate::errors::{from_rusqlite, seed_validation, Result};
use crate::repo::put_item;
use crate::seed::format_v0::SeedV0;
use crate::seed::parser::{parse_seed_file, parse_seed_str};
use portal_core::{log_op_end, log_op_error, log_op_start};
use portal_core::errors::ExError;
use portal_core::model::work::WORK_PARTITION;
use portal_core::{IndexSpec, StoredWork};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// Import a seed file; returns the number of rows written
pub fn import_seed(path: &Path, conn: &mut Connection, spec: &IndexSpec) -> Result<usize> {
    let seed = parse_seed_file(path)?;
    write_seed(&seed, conn, spec)
}

pub fn import_seed_str(content: &str, conn: &mut Connection, spec: &IndexSpec) -> Result<usize> {
    let seed = parse_seed_str(content)?;
    write_seed(&seed, conn, spec)
}

fn write_seed(seed: &SeedV0, conn: &mut Connection, spec: &IndexSpec) -> Result<usize> {
    log_op_start!("seed_import", works = seed.works.len());
    let start = std::time::Instant::now();

    let result = (|| -> Result<usize> {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        check_stored_width(&tx, seed)?;
        for work in &seed.works {
            put_item(&tx, spec, &StoredWork::from(work).to_item()).map_err(|e| {
                ExError::new(e.kind())
                    .with_op("seed_import")
                    .with_entity_id(&work.id)
                    .with_message("failed to write seed row")
                    .with_source(e)
            })?;
        }
        tx.commit().map_err(from_rusqlite)?;
        Ok(seed.works.len())
    })();

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(count) => {
            log_op_end!("seed_import", duration_ms = elapsed, written = *count);
        }
        Err(e) => {
            log_op_error!("seed_import", e.clone(), duration_ms = elapsed);
        }
    }
    result
}

/// Width of the `createdAt` values already in the partition, if any
fn stored_sort_width(conn: &Connection) -> Result<Option<usize>> {
    let width: Option<i64> = conn
        .query_row(
            "SELECT length(sort_value) FROM works
             WHERE partition_value = ?1 AND sort_value IS NOT NULL
             LIMIT 1",
            [WORK_PARTITION],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(width.map(|w| w as usize))
}

fn check_stored_width(conn: &Connection, seed: &SeedV0) -> Result<()> {
    let Some(first) = seed.works.first() else {
        return Ok(());
    };
    let incoming = first.created_at.as_text();
    match stored_sort_width(conn)? {
        Some(stored) if stored != incoming.len() => Err(seed_validation(&format!(
            "work {}: createdAt '{}' is not {} digits wide like the stored rows",
            first.id, incoming, stored
        ))),
        _ => Ok(()),
    }
}
