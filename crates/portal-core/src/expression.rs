//! Filter expressions
//!
//! Callers describe a filter as a `Condition` over real attribute names and
//! literal values. `ExpressionBuilder::build` turns it into an `Expression`:
//! attribute names and values are replaced by placeholders (`#0`, `:0`, ...)
//! and the condition becomes a `FilterNode` tree over those placeholders,
//! which is what the store receives.
//!
//! Name placeholders are shared by every use of the same attribute; each
//! literal value gets its own placeholder. Both are numbered in the order the
//! condition is walked (left to right), so the same input always yields the
//! same expression.

use crate::errors::{ExError, ExErrorKind};
use crate::model::{AttributeValue, Item};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// A builder was asked to build without any condition
    #[error("expression builder has no condition set")]
    EmptyBuilder,

    /// A condition names an empty attribute
    #[error("condition on an empty attribute name")]
    EmptyAttributeName,

    /// A placeholder was about to be bound to two different things
    #[error("placeholder {placeholder} already bound to {existing}, cannot rebind to {requested}")]
    PlaceholderCollision {
        placeholder: String,
        existing: String,
        requested: String,
    },
}

impl From<ExprError> for ExError {
    fn from(err: ExprError) -> Self {
        ExError::new(ExErrorKind::InvalidExpression)
            .with_op("build_expression")
            .with_message(err.to_string())
    }
}

/// Logical condition over real attribute names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals {
        attr: String,
        value: AttributeValue,
    },
    Contains {
        attr: String,
        value: AttributeValue,
    },
    And(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn equals(attr: impl Into<String>, value: AttributeValue) -> Self {
        Condition::Equals {
            attr: attr.into(),
            value,
        }
    }

    pub fn contains(attr: impl Into<String>, value: AttributeValue) -> Self {
        Condition::Contains {
            attr: attr.into(),
            value,
        }
    }

    pub fn and(self, other: Condition) -> Self {
        Condition::And(Box::new(self), Box::new(other))
    }

    /// Left-fold a sequence into `((c1 AND c2) AND c3) ...`; `None` when empty
    pub fn all<I>(conditions: I) -> Option<Condition>
    where
        I: IntoIterator<Item = Condition>,
    {
        conditions
            .into_iter()
            .reduce(|acc, next| acc.and(next))
    }
}

/// Condition tree over placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    Equals { name: String, value: String },
    Contains { name: String, value: String },
    And(Box<FilterNode>, Box<FilterNode>),
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::Equals { name, value } => write!(f, "{} = {}", name, value),
            FilterNode::Contains { name, value } => write!(f, "contains ({}, {})", name, value),
            FilterNode::And(left, right) => write!(f, "({}) AND ({})", left, right),
        }
    }
}

/// A built filter: placeholder maps plus the tree that uses them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    names: BTreeMap<String, String>,
    values: BTreeMap<String, AttributeValue>,
    filter: FilterNode,
}

impl Expression {
    /// Placeholder → attribute name
    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    /// Placeholder → literal value
    pub fn values(&self) -> &BTreeMap<String, AttributeValue> {
        &self.values
    }

    pub fn filter(&self) -> &FilterNode {
        &self.filter
    }

    /// The filter in the store's textual syntax
    pub fn filter_string(&self) -> String {
        self.filter.to_string()
    }

    /// Evaluate the filter against a row
    pub fn matches(&self, item: &Item) -> bool {
        self.eval(&self.filter, item)
    }

    fn eval(&self, node: &FilterNode, item: &Item) -> bool {
        match node {
            FilterNode::Equals { name, value } => {
                match (self.resolve(name, item), self.values.get(value)) {
                    (Some(actual), Some(expected)) => actual == expected,
                    _ => false,
                }
            }
            FilterNode::Contains { name, value } => {
                match (self.resolve(name, item), self.values.get(value)) {
                    (Some(actual), Some(operand)) => actual.contains(operand),
                    _ => false,
                }
            }
            FilterNode::And(left, right) => self.eval(left, item) && self.eval(right, item),
        }
    }

    fn resolve<'a>(&self, placeholder: &str, item: &'a Item) -> Option<&'a AttributeValue> {
        self.names
            .get(placeholder)
            .and_then(|attr| item.get(attr))
    }
}

/// Placeholder bookkeeping for one build.
///
/// Nothing escapes a table until the whole condition has been aliased, so a
/// failed build never hands back a half-filled expression.
#[derive(Debug, Default)]
struct PlaceholderTable {
    names: BTreeMap<String, String>,
    values: BTreeMap<String, AttributeValue>,
    name_by_attr: BTreeMap<String, String>,
    next_name: usize,
    next_value: usize,
}

impl PlaceholderTable {
    fn alias_name(&mut self, attr: &str) -> Result<String, ExprError> {
        if attr.is_empty() {
            return Err(ExprError::EmptyAttributeName);
        }
        if let Some(existing) = self.name_by_attr.get(attr) {
            return Ok(existing.clone());
        }
        let placeholder = format!("#{}", self.next_name);
        self.next_name += 1;
        self.bind_name(&placeholder, attr)?;
        self.name_by_attr
            .insert(attr.to_string(), placeholder.clone());
        Ok(placeholder)
    }

    fn alias_value(&mut self, value: &AttributeValue) -> Result<String, ExprError> {
        let placeholder = format!(":{}", self.next_value);
        self.next_value += 1;
        self.bind_value(&placeholder, value)?;
        Ok(placeholder)
    }

    fn bind_name(&mut self, placeholder: &str, attr: &str) -> Result<(), ExprError> {
        match self.names.get(placeholder) {
            Some(existing) if existing != attr => Err(ExprError::PlaceholderCollision {
                placeholder: placeholder.to_string(),
                existing: existing.clone(),
                requested: attr.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.names
                    .insert(placeholder.to_string(), attr.to_string());
                Ok(())
            }
        }
    }

    fn bind_value(&mut self, placeholder: &str, value: &AttributeValue) -> Result<(), ExprError> {
        match self.values.get(placeholder) {
            Some(existing) if existing != value => Err(ExprError::PlaceholderCollision {
                placeholder: placeholder.to_string(),
                existing: format!("{:?}", existing),
                requested: format!("{:?}", value),
            }),
            Some(_) => Ok(()),
            None => {
                self.values.insert(placeholder.to_string(), value.clone());
                Ok(())
            }
        }
    }

    fn alias(&mut self, condition: &Condition) -> Result<FilterNode, ExprError> {
        match condition {
            Condition::Equals { attr, value } => Ok(FilterNode::Equals {
                name: self.alias_name(attr)?,
                value: self.alias_value(value)?,
            }),
            Condition::Contains { attr, value } => Ok(FilterNode::Contains {
                name: self.alias_name(attr)?,
                value: self.alias_value(value)?,
            }),
            Condition::And(left, right) => {
                let left = self.alias(left)?;
                let right = self.alias(right)?;
                Ok(FilterNode::And(Box::new(left), Box::new(right)))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    filter: Option<Condition>,
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    /// # Errors
    ///
    /// `EmptyBuilder` without a condition, `EmptyAttributeName` or
    /// `PlaceholderCollision` if aliasing fails.
    pub fn build(self) -> Result<Expression, ExprError> {
        let condition = self.filter.ok_or(ExprError::EmptyBuilder)?;
        let mut table = PlaceholderTable::default();
        let filter = table.alias(&condition)?;
        Ok(Expression {
            names: table.names,
            values: table.values,
            filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, AttributeValue)]) -> Item {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_same_attribute_shares_name_placeholder() {
        let cond = Condition::contains("tags", AttributeValue::s("a"))
            .and(Condition::contains("tags", AttributeValue::s("b")));
        let expr = ExpressionBuilder::new().with_filter(cond).build().unwrap();

        assert_eq!(expr.names().len(), 1);
        assert_eq!(expr.names().get("#0").map(String::as_str), Some("tags"));
        assert_eq!(expr.values().get(":0"), Some(&AttributeValue::s("a")));
        assert_eq!(expr.values().get(":1"), Some(&AttributeValue::s("b")));
        assert_eq!(
            expr.filter_string(),
            "(contains (#0, :0)) AND (contains (#0, :1))"
        );
    }

    #[test]
    fn test_distinct_attributes_get_distinct_placeholders() {
        let cond = Condition::equals("system", AttributeValue::s("work"))
            .and(Condition::contains("userId", AttributeValue::s("u1")));
        let expr = ExpressionBuilder::new().with_filter(cond).build().unwrap();

        assert_eq!(expr.names().get("#0").map(String::as_str), Some("system"));
        assert_eq!(expr.names().get("#1").map(String::as_str), Some("userId"));
        assert_eq!(expr.filter_string(), "(#0 = :0) AND (contains (#1, :1))");
    }

    #[test]
    fn test_build_without_condition_fails() {
        assert_eq!(
            ExpressionBuilder::new().build().unwrap_err(),
            ExprError::EmptyBuilder
        );
    }

    #[test]
    fn test_empty_attribute_name_fails() {
        let cond = Condition::contains("", AttributeValue::s("x"));
        let err = ExpressionBuilder::new().with_filter(cond).build().unwrap_err();
        assert_eq!(err, ExprError::EmptyAttributeName);
    }

    #[test]
    fn test_collision_rejected_without_mutation() {
        let mut table = PlaceholderTable::default();
        table.bind_name("#0", "tags").unwrap();

        let err = table.bind_name("#0", "userId").unwrap_err();
        assert!(matches!(err, ExprError::PlaceholderCollision { .. }));
        assert_eq!(table.names.get("#0").map(String::as_str), Some("tags"));
        assert_eq!(table.names.len(), 1);

        table.bind_value(":0", &AttributeValue::s("a")).unwrap();
        assert!(table.bind_value(":0", &AttributeValue::s("b")).is_err());
        assert_eq!(table.values.get(":0"), Some(&AttributeValue::s("a")));
    }

    #[test]
    fn test_rebinding_same_target_is_allowed() {
        let mut table = PlaceholderTable::default();
        table.bind_name("#0", "tags").unwrap();
        table.bind_name("#0", "tags").unwrap();
        assert_eq!(table.names.len(), 1);
    }

    #[test]
    fn test_matches_requires_every_conjunct() {
        let cond = Condition::all([
            Condition::contains("tags", AttributeValue::s("a")),
            Condition::contains("tags", AttributeValue::s("b")),
        ])
        .unwrap();
        let expr = ExpressionBuilder::new().with_filter(cond).build().unwrap();

        let both = row(&[("tags", AttributeValue::string_set(["a", "b", "c"]))]);
        let one = row(&[("tags", AttributeValue::string_set(["a"]))]);
        let none = row(&[("title", AttributeValue::s("a b"))]);

        assert!(expr.matches(&both));
        assert!(!expr.matches(&one));
        assert!(!expr.matches(&none));
    }

    #[test]
    fn test_equals_compares_typed_values() {
        let expr = ExpressionBuilder::new()
            .with_filter(Condition::equals("n", AttributeValue::Number("1".into())))
            .build()
            .unwrap();

        assert!(expr.matches(&row(&[("n", AttributeValue::Number("1".into()))])));
        assert!(!expr.matches(&row(&[("n", AttributeValue::s("1"))])));
    }

    #[test]
    fn test_all_of_nothing_is_none() {
        assert_eq!(Condition::all(Vec::new()), None);
    }

    #[test]
    fn test_expr_error_maps_to_invalid_expression() {
        let err: ExError = ExprError::EmptyBuilder.into();
        assert_eq!(err.kind(), ExErrorKind::InvalidExpression);
    }
}
