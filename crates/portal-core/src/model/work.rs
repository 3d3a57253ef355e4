//! Work records
//!
//! `StoredWork` is the record as held in the table (timestamp as sortable
//! text). `WorkItem` is the caller-facing shape returned by the read API.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::attribute::{AttributeValue, Item};
use serde::{Deserialize, Serialize};

/// Partition discriminator shared by every work record
pub const WORK_PARTITION: &str = "work";

/// Attribute names of a work row
pub mod attr {
    pub const SYSTEM: &str = "system";
    pub const ID: &str = "id";
    pub const USER_ID: &str = "userId";
    pub const TITLE: &str = "title";
    pub const TAGS: &str = "tags";
    pub const IMAGE_URL: &str = "imageUrl";
    pub const DESCRIPTION: &str = "description";
    pub const CREATED_AT: &str = "createdAt";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWork {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub description: String,
    /// Must sort lexicographically the same way it sorts numerically
    pub created_at: String,
}

impl StoredWork {
    /// Unmarshal a raw row.
    ///
    /// Missing attributes take zero values; an attribute present with the
    /// wrong type is a `Serialization` error.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` naming the offending attribute.
    pub fn from_item(item: &Item) -> Result<Self> {
        Ok(StoredWork {
            id: string_attr(item, attr::ID)?.unwrap_or_default(),
            user_id: string_attr(item, attr::USER_ID)?.unwrap_or_default(),
            title: string_attr(item, attr::TITLE)?.unwrap_or_default(),
            tags: string_list_attr(item, attr::TAGS)?,
            image_url: string_attr(item, attr::IMAGE_URL)?,
            description: string_attr(item, attr::DESCRIPTION)?.unwrap_or_default(),
            created_at: string_attr(item, attr::CREATED_AT)?.unwrap_or_default(),
        })
    }

    /// Marshal into a row under the work partition
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(attr::SYSTEM.to_string(), AttributeValue::s(WORK_PARTITION));
        item.insert(attr::ID.to_string(), AttributeValue::s(&self.id));
        item.insert(attr::USER_ID.to_string(), AttributeValue::s(&self.user_id));
        item.insert(attr::TITLE.to_string(), AttributeValue::s(&self.title));
        if let Some(tags) = &self.tags {
            item.insert(
                attr::TAGS.to_string(),
                AttributeValue::StringSet(tags.clone()),
            );
        }
        if let Some(url) = &self.image_url {
            item.insert(attr::IMAGE_URL.to_string(), AttributeValue::s(url));
        }
        item.insert(
            attr::DESCRIPTION.to_string(),
            AttributeValue::s(&self.description),
        );
        item.insert(
            attr::CREATED_AT.to_string(),
            AttributeValue::s(&self.created_at),
        );
        item
    }
}

/// Caller-facing work item
///
/// Optional fields serialize as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub description: String,
    pub created_at: i64,
}

fn type_mismatch(name: &str, expected: &str, found: &AttributeValue) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("unmarshal_work")
        .with_entity_id(name)
        .with_message(format!(
            "attribute '{}' expected {}, found {}",
            name,
            expected,
            found.type_tag()
        ))
}

fn string_attr(item: &Item, name: &str) -> Result<Option<String>> {
    match item.get(name) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(AttributeValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(type_mismatch(name, "S", other)),
    }
}

fn string_list_attr(item: &Item, name: &str) -> Result<Option<Vec<String>>> {
    match item.get(name) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(AttributeValue::StringSet(set)) => Ok(Some(set.clone())),
        Some(AttributeValue::List(list)) => list
            .iter()
            .map(|v| match v {
                AttributeValue::String(s) => Ok(s.clone()),
                other => Err(type_mismatch(name, "L of S", other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(other) => Err(type_mismatch(name, "SS", other)),
    }
}
