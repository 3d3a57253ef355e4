//! Pagination cursor codec
//!
//! A cursor is the `{id, createdAt}` part of the index key where the previous
//! page stopped, serialized as a plain JSON object. The partition value is not
//! carried; it is reconstructed from configuration when the key is handed back
//! to the store.
//!
//! Decoding never fails. A token that cannot be read yields the zero key,
//! which the query path treats as "start from the beginning".

use crate::errors::Result;
use crate::index::IndexKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorKey {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl CursorKey {
    pub fn new(id: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
        }
    }

    /// True for the key produced by an unreadable or absent token
    pub fn is_zero(&self) -> bool {
        self.id.is_empty() && self.created_at.is_empty()
    }

    /// Rebuild the full index key under the given partition
    pub fn to_index_key(&self, partition_value: &str) -> IndexKey {
        IndexKey {
            partition_value: partition_value.to_string(),
            sort_value: self.created_at.clone(),
            id: self.id.clone(),
        }
    }

    pub fn from_index_key(key: &IndexKey) -> Self {
        Self {
            id: key.id.clone(),
            created_at: key.sort_value.clone(),
        }
    }
}

/// Serialize a key into the opaque token handed to callers.
///
/// # Errors
///
/// Returns `Serialization` if JSON encoding fails.
pub fn encode_cursor(key: &CursorKey) -> Result<String> {
    Ok(serde_json::to_string(key)?)
}

/// Read a token back into a key, falling back to the zero key.
pub fn decode_cursor(token: Option<&str>) -> CursorKey {
    let Some(token) = token else {
        return CursorKey::default();
    };

    match serde_json::from_str::<CursorKey>(token) {
        Ok(key) => key,
        Err(err) => {
            tracing::warn!(
                component = module_path!(),
                op = "decode_cursor",
                error = %err,
                "unreadable cursor, restarting from the beginning"
            );
            CursorKey::default()
        }
    }
}

/// Decode a caller token into a resume position, if it names one
pub fn resume_key(token: Option<&str>) -> Option<CursorKey> {
    let key = decode_cursor(token);
    if key.is_zero() {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_is_plain_json_object() {
        let token = encode_cursor(&CursorKey::new("w2", "2")).unwrap();
        assert_eq!(token, r#"{"id":"w2","createdAt":"2"}"#);
    }

    #[test]
    fn test_decode_malformed_yields_zero_key() {
        for token in [
            "",
            "not json",
            "{",
            "null",
            "[1,2]",
            "42",
            r#"{"id": 5, "createdAt": "1"}"#,
            "eyJpZCI6IncyIn0=",
        ] {
            let key = decode_cursor(Some(token));
            assert!(key.is_zero(), "expected zero key for {:?}", token);
        }
    }

    #[test]
    fn test_decode_absent_yields_zero_key() {
        assert_eq!(decode_cursor(None), CursorKey::default());
        assert_eq!(resume_key(None), None);
    }

    #[test]
    fn test_decode_partial_object_keeps_present_fields() {
        let key = decode_cursor(Some(r#"{"id":"w7"}"#));
        assert_eq!(key, CursorKey::new("w7", ""));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let key = decode_cursor(Some(r#"{"id":"w1","createdAt":"9","system":"work"}"#));
        assert_eq!(key, CursorKey::new("w1", "9"));
    }

    #[test]
    fn test_resume_key_drops_zero_key() {
        assert_eq!(resume_key(Some("garbage")), None);
        assert_eq!(resume_key(Some("{}")), None);
        assert_eq!(
            resume_key(Some(r#"{"id":"w1","createdAt":"1"}"#)),
            Some(CursorKey::new("w1", "1"))
        );
    }

    #[test]
    fn test_index_key_reconstructs_partition() {
        let key = CursorKey::new("w3", "1700000000");
        let index_key = key.to_index_key("work");
        assert_eq!(index_key.partition_value, "work");
        assert_eq!(index_key.sort_value, "1700000000");
        assert_eq!(CursorKey::from_index_key(&index_key), key);
    }

    proptest! {
        #[test]
        fn prop_cursor_round_trip(id in ".*", created_at in ".*") {
            let key = CursorKey::new(id, created_at);
            let token = encode_cursor(&key).unwrap();
            prop_assert_eq!(decode_cursor(Some(&token)), key);
        }
    }
}
