pub mod invoke;
pub mod list;
pub mod migrate;
pub mod seed;

use portal_core::QueryConfig;
use std::path::PathBuf;

/// Options shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub db: PathBuf,
    pub config: Option<PathBuf>,
}

impl GlobalOpts {
    /// Open the database, creating its directory and schema if needed
    pub fn open_db(&self) -> Result<rusqlite::Connection, Box<dyn std::error::Error>> {
        if let Some(parent) = self.db.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut conn = portal_store::db::open(&self.db)?;
        portal_store::db::configure(&conn)?;
        portal_store::migrations::apply_migrations(&mut conn)?;
        Ok(conn)
    }

    pub fn load_config(&self) -> Result<QueryConfig, Box<dyn std::error::Error>> {
        match &self.config {
            Some(path) => Ok(QueryConfig::load(path)?),
            None => Ok(QueryConfig::default()),
        }
    }
}
