//! Result set of a list query

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::ItemId;
use super::Row;
use crate::error::ApiError;

/// One page of a resource listing.
///
/// Replaced wholesale on every successful fetch. `ids[i]` is the key of
/// `rows[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Total number of matching records across all pages.
    pub count: usize,
    /// Keys of the rows on this page, in row order.
    pub ids: Vec<ItemId>,
    /// Flattened records on this page.
    pub rows: Vec<Row>,
    /// Column keys to display, in order.
    pub list_columns: Vec<String>,
    /// Column key to display label.
    pub label_columns: HashMap<String, String>,
    /// Title of the listing, if the server sent one.
    pub list_title: Option<String>,
}

impl ResultSet {
    /// Returns the label for a column, falling back to the key itself.
    pub fn label<'a>(&'a self, column: &'a str) -> &'a str {
        self.label_columns
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }

    /// Iterates `(id, row)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Row)> {
        self.ids.iter().zip(self.rows.iter())
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    count: usize,
    #[serde(default)]
    ids: Vec<ItemId>,
    #[serde(default)]
    result: Vec<Value>,
    #[serde(default)]
    list_columns: Vec<String>,
    #[serde(default)]
    label_columns: HashMap<String, String>,
    #[serde(default)]
    list_title: Option<String>,
}

impl TryFrom<ListResponse> for ResultSet {
    type Error = ApiError;

    fn try_from(raw: ListResponse) -> Result<Self, Self::Error> {
        if raw.ids.len() != raw.result.len() {
            return Err(ApiError::parse(format!(
                "list response has {} ids for {} rows",
                raw.ids.len(),
                raw.result.len()
            )));
        }
        Ok(Self {
            count: raw.count,
            ids: raw.ids,
            rows: raw.result.iter().map(Row::flatten).collect(),
            list_columns: raw.list_columns,
            label_columns: raw.label_columns,
            list_title: raw.list_title,
        })
    }
}
