//! Filter conditions.

use serde::Deserialize;
use serde::Serialize;

/// A `(column, operator, value)` condition narrowing the listed rows.
///
/// Operators are the wire names the server advertises in
/// [`ResourceInfo::filters`](crate::model::ResourceInfo::filters), e.g. `sw`
/// (starts with) or `eq` (equal to).
///
/// # Example
///
/// ```
/// use crudtable_lib::api::query::Filter;
///
/// let filter = Filter::new("name", "sw", "Ad");
/// assert_eq!(filter.col, "name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Filter {
    /// Column key.
    pub col: String,
    /// Operator wire name.
    pub opr: String,
    /// Raw value as typed by the user.
    pub value: String,
}

impl Filter {
    /// Creates a filter condition.
    pub fn new(col: impl Into<String>, opr: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            col: col.into(),
            opr: opr.into(),
            value: value.into(),
        }
    }
}
