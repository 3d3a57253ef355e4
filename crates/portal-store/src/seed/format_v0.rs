//! Seed format v0
//!
//! ```yaml
//! schema_version: 0
//! works:
//!   - id: w1
//!     userId: u1
//!     title: Sunset
//!     tags: [photo, sky]
//!     description: evening over the bay
//!     createdAt: "1700000000"
//! ```

use portal_core::StoredWork;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedV0 {
    pub schema_version: u32,
    #[serde(default)]
    pub works: Vec<SeedWork>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedWork {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: String,
    pub created_at: CreatedAt,
}

/// Unquoted YAML numbers are accepted and stored as text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    Number(u64),
    Text(String),
}

impl CreatedAt {
    pub fn as_text(&self) -> String {
        match self {
            CreatedAt::Number(n) => n.to_string(),
            CreatedAt::Text(s) => s.clone(),
        }
    }
}

impl From<&SeedWork> for StoredWork {
    fn from(seed: &SeedWork) -> Self {
        StoredWork {
            id: seed.id.clone(),
            user_id: seed.user_id.clone(),
            title: seed.title.clone(),
            tags: seed.tags.clone(),
            image_url: seed.image_url.clone(),
            description: seed.description.clone(),
            created_at: seed.created_at.as_text(),
        }
    }
}
