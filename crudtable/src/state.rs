//! Table state.

use std::collections::BTreeMap;

use crudtable_lib::api::query::QueryState;
use crudtable_lib::api::query::last_page;
use crudtable_lib::model::Item;
use crudtable_lib::model::ItemId;
use crudtable_lib::model::ResourceInfo;
use crudtable_lib::model::ResultSet;

use crate::field::FieldDescriptor;
use crate::notice::Notices;

/// Message shown under an empty required field.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message shown under a field whose value cannot be read.
pub const INVALID_MESSAGE: &str = "Not a valid value.";

/// Everything a mounted table knows. Rendering is a pure function of this
/// plus configuration.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub query: QueryState,
    /// Resource metadata, once loaded.
    pub info: Option<ResourceInfo>,
    /// The last successfully fetched page.
    pub result: ResultSet,
    /// Filter value inputs, keyed by column.
    pub filter_fields: BTreeMap<String, FieldDescriptor>,
    /// A list fetch is in flight.
    pub loading: bool,
    pub notices: Notices,
    /// Record open in the show dialog.
    pub shown: Option<Item>,
    pub add_form: Option<AddForm>,
    /// Record awaiting delete confirmation.
    pub pending_delete: Option<ItemId>,
}

impl TableState {
    pub fn new(query: QueryState) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn last_page(&self) -> usize {
        last_page(self.result.count, self.query.page_size())
    }

    /// Display label of a column: add-form label, then list label, then key.
    pub fn column_label<'a>(&'a self, column: &'a str) -> &'a str {
        self.info
            .as_ref()
            .and_then(|info| info.add_column(column))
            .map(|c| c.display_label())
            .unwrap_or_else(|| self.result.label(column))
    }

    /// Filterable columns without an active filter, in name order.
    pub fn available_filters(&self) -> Vec<&str> {
        match &self.info {
            Some(info) => info
                .filters
                .iter()
                .filter(|(column, operators)| !operators.is_empty() && !self.query.has_filter(column))
                .map(|(column, _)| column.as_str())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// An open add form.
#[derive(Debug, Clone)]
pub struct AddForm {
    pub title: String,
    pub fields: Vec<FieldDescriptor>,
    /// Displayed value per field.
    pub values: BTreeMap<String, String>,
    /// Messages per field, from client checks or the server.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl AddForm {
    pub fn new(title: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: title.into(),
            fields,
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Required fields left empty, in form order.
    pub fn missing_required(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required && self.value(&f.name).trim().is_empty())
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn errors_for(&self, name: &str) -> &[String] {
        self.errors.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn add_error(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(name.into()).or_default().push(message.into());
    }
}
