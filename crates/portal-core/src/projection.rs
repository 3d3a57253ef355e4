//! Result projector: stored rows to caller-facing items

use crate::errors::Result;
use crate::model::{Item, StoredWork, WorkItem};

/// Numeric epoch of a stored timestamp; text that is not an integer becomes 0
pub fn parse_created_at(raw: &str) -> i64 {
    raw.parse::<i64>().unwrap_or(0)
}

pub fn project_work(stored: StoredWork) -> WorkItem {
    WorkItem {
        created_at: parse_created_at(&stored.created_at),
        id: stored.id,
        user_id: stored.user_id,
        title: stored.title,
        tags: stored.tags,
        image_url: stored.image_url,
        description: stored.description,
    }
}

/// Unmarshal and project a page of raw rows, keeping scan order.
///
/// # Errors
///
/// The first row that fails to unmarshal fails the whole page.
pub fn project_items(items: &[Item]) -> Result<Vec<WorkItem>> {
    items
        .iter()
        .map(|item| StoredWork::from_item(item).map(project_work))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::model::work::attr;
    use crate::model::AttributeValue;

    fn stored(created_at: &str) -> StoredWork {
        StoredWork {
            id: "w1".to_string(),
            user_id: "u1".to_string(),
            title: "title".to_string(),
            tags: Some(vec!["a".to_string()]),
            image_url: Some("https://img/1.png".to_string()),
            description: "desc".to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_numeric_timestamp() {
        assert_eq!(project_work(stored("1700000000")).created_at, 1_700_000_000);
    }

    #[test]
    fn test_non_numeric_timestamp_is_zero() {
        assert_eq!(project_work(stored("yesterday")).created_at, 0);
        assert_eq!(project_work(stored("")).created_at, 0);
        assert_eq!(project_work(stored("2024-01-01T00:00:00Z")).created_at, 0);
        assert_eq!(project_work(stored("1.5")).created_at, 0);
    }

    #[test]
    fn test_fields_carried_over() {
        let item = project_work(stored("3"));
        assert_eq!(item.id, "w1");
        assert_eq!(item.user_id, "u1");
        assert_eq!(item.tags, Some(vec!["a".to_string()]));
        assert_eq!(item.image_url.as_deref(), Some("https://img/1.png"));
    }

    #[test]
    fn test_partition_attribute_is_dropped() {
        let items = project_items(&[stored("3").to_item()]).unwrap();
        let json = serde_json::to_value(&items[0]).unwrap();
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_bad_row_fails_page() {
        let good = stored("2").to_item();
        let mut bad = stored("1").to_item();
        bad.insert(attr::USER_ID.to_string(), AttributeValue::Bool(true));

        let err = project_items(&[good, bad]).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
