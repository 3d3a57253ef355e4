//! Predicate builder
//!
//! Turns the single facet a caller selected into the filter expression the
//! index query carries. No facet (or an empty tag set) means no filter at all.

use crate::expression::{Condition, ExprError, Expression, ExpressionBuilder};
use crate::model::work::attr;
use crate::model::AttributeValue;

/// The one filtering dimension a request may select
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Facet {
    #[default]
    None,
    /// Every listed tag must be present
    Tags(Vec<String>),
    /// `userId` containment; matches substrings of the stored id, not only
    /// the exact id
    Author(String),
}

impl Facet {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Facet::None => "none",
            Facet::Tags(_) => "tags",
            Facet::Author(_) => "author",
        }
    }

    fn condition(&self) -> Option<Condition> {
        match self {
            Facet::None => None,
            Facet::Tags(tags) => Condition::all(
                tags.iter()
                    .map(|t| Condition::contains(attr::TAGS, AttributeValue::s(t))),
            ),
            Facet::Author(user_id) => Some(Condition::contains(
                attr::USER_ID,
                AttributeValue::s(user_id),
            )),
        }
    }
}

/// Build the filter for a facet; `Ok(None)` when nothing needs filtering.
///
/// # Errors
///
/// Propagates `ExprError` from the expression builder.
pub fn build_predicate(facet: &Facet) -> Result<Option<Expression>, ExprError> {
    facet
        .condition()
        .map(|cond| ExpressionBuilder::new().with_filter(cond).build())
        .transpose()
}
