//! Query configuration
//!
//! Names the table, index and partition the read API queries. Every key is
//! optional in the TOML form; missing keys fall back to the production values.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::index::IndexSpec;
use crate::model::work::{attr, WORK_PARTITION};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_TABLE_NAME: &str = "portal-works";
pub const DEFAULT_INDEX_NAME: &str = "system-createdAt-index";

/// Page size when the caller does not supply one
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub table_name: String,
    pub index_name: String,
    pub partition_attr: String,
    pub partition_value: String,
    pub sort_attr: String,
    pub default_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            partition_attr: attr::SYSTEM.to_string(),
            partition_value: WORK_PARTITION.to_string(),
            sort_attr: attr::CREATED_AT.to_string(),
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryConfig {
    /// # Errors
    ///
    /// `InvalidInput` if the text is not valid TOML for this shape, or if
    /// `default_limit` is zero.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: QueryConfig = toml::from_str(content).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message(e.to_string())
        })?;
        if config.default_limit == 0 {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message("default_limit must be at least 1"));
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as `from_toml_str`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_entity_id(path.display().to_string())
                .with_message(e.to_string())
        })?;
        Self::from_toml_str(&content)
    }

    pub fn index_spec(&self) -> IndexSpec {
        IndexSpec {
            name: self.index_name.clone(),
            partition_attr: self.partition_attr.clone(),
            sort_attr: self.sort_attr.clone(),
        }
    }
}
