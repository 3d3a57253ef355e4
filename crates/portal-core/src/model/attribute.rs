//! Typed attribute values of a wide-column row
//!
//! Serialized in the store's native tagged form, e.g. `{"S": "work"}` or
//! `{"SS": ["art", "3d"]}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the table: attribute name to typed value
pub type Item = BTreeMap<String, AttributeValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S")]
    String(String),
    /// Numbers travel as their decimal text
    #[serde(rename = "N")]
    Number(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(rename = "SS")]
    StringSet(Vec<String>),
    #[serde(rename = "L")]
    List(Vec<AttributeValue>),
    #[serde(rename = "M")]
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    pub fn s(value: impl Into<String>) -> Self {
        AttributeValue::String(value.into())
    }

    pub fn string_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::StringSet(values.into_iter().map(Into::into).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null(_))
    }

    /// Short type tag used in error messages
    pub fn type_tag(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "S",
            AttributeValue::Number(_) => "N",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Null(_) => "NULL",
            AttributeValue::StringSet(_) => "SS",
            AttributeValue::List(_) => "L",
            AttributeValue::Map(_) => "M",
        }
    }

    /// Store `contains` semantics.
    ///
    /// A string attribute contains a string operand as a substring. A set or
    /// list contains the operand as an element. Anything else never matches.
    pub fn contains(&self, operand: &AttributeValue) -> bool {
        match (self, operand) {
            (AttributeValue::String(haystack), AttributeValue::String(needle)) => {
                haystack.contains(needle.as_str())
            }
            (AttributeValue::StringSet(set), AttributeValue::String(needle)) => {
                set.iter().any(|s| s == needle)
            }
            (AttributeValue::List(list), operand) => list.iter().any(|v| v == operand),
            _ => false,
        }
    }
}
