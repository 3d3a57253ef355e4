//! Router invocation command
//!
//! Usage: portal invoke '<PAYLOAD JSON>' | portal invoke --file <PATH>
//!
//! Prints the response envelope exactly as the runtime would receive it.

use super::GlobalOpts;
use clap::Args;
use portal_core_types::RequestContext;
use portal_engine::router::{route, Payload};
use portal_store::SqliteIndexStore;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Payload JSON, e.g. '{"field":"listWork","arguments":{"limit":5}}'
    #[arg(conflicts_with = "file")]
    pub payload: Option<String>,

    /// Read the payload from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn execute(global: &GlobalOpts, args: InvokeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match (args.payload, args.file) {
        (Some(inline), _) => inline,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err("Must specify a payload or --file".into()),
    };
    let payload: Payload = serde_json::from_str(&raw)?;

    let config = global.load_config()?;
    let conn = global.open_db()?;
    let store = SqliteIndexStore::new(&conn, &config.table_name, config.index_spec());

    let response = route(&payload, &store, &config, &RequestContext::new())?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
