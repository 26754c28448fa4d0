//! Resource metadata returned by `GET /{resource}/_info`

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::ItemId;

/// Metadata describing what a resource offers: forms, filters, permissions.
///
/// Fetched once per mounted table and kept until an explicit reload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceInfo {
    /// Title of the add form.
    #[serde(default)]
    pub add_title: String,
    /// Title of the edit form.
    #[serde(default)]
    pub edit_title: String,
    /// Fields of the add form, in order.
    #[serde(default)]
    pub add_columns: Vec<ColumnInfo>,
    /// Fields of the edit form, in order.
    #[serde(default)]
    pub edit_columns: Vec<ColumnInfo>,
    /// Filterable column to the operators it supports.
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<FilterOperator>>,
    /// What the current user may do with this resource.
    #[serde(default)]
    pub permissions: Permissions,
}

impl ResourceInfo {
    /// Returns the operators available for a column.
    pub fn operators(&self, column: &str) -> &[FilterOperator] {
        self.filters.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if the column can be filtered with the operator.
    pub fn supports(&self, column: &str, operator: &str) -> bool {
        self.operators(column).iter().any(|o| o.operator == operator)
    }

    /// Returns the add-form descriptor of a column.
    pub fn add_column(&self, name: &str) -> Option<&ColumnInfo> {
        self.add_columns.iter().find(|c| c.name == name)
    }
}

/// A form field descriptor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ColumnInfo {
    /// Field key sent back on submit.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Help text.
    #[serde(default)]
    pub description: String,
    /// Whether the field must be filled in.
    #[serde(default)]
    pub required: bool,
    /// Whether values must be unique.
    #[serde(default)]
    pub unique: bool,
    /// Server-side field type, e.g. `String`, `Date`, `Related`.
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// Choices for related fields.
    #[serde(default)]
    pub values: Vec<RelatedValue>,
}

impl ColumnInfo {
    /// Creates a plain field descriptor.
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type: field_type.into(),
            ..Default::default()
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the choices of a related field.
    pub fn with_values(mut self, values: Vec<RelatedValue>) -> Self {
        self.values = values;
        self
    }

    /// Returns `true` for fields that pick from another resource.
    pub fn is_related(&self) -> bool {
        matches!(self.field_type.as_str(), "Related" | "RelatedList")
    }

    /// Returns the label, falling back to the field key.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// One choice of a related field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedValue {
    pub id: ItemId,
    pub value: String,
}

/// A filter operator a column supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOperator {
    /// Human-readable name, e.g. "Starts with".
    pub name: String,
    /// Wire name sent as `opr`, e.g. `sw`.
    pub operator: String,
}

impl FilterOperator {
    pub fn new(name: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: operator.into(),
        }
    }
}

/// Actions the current user may perform.
///
/// Deserialized from the server's permission names:
///
/// | Permission | Flag |
/// |------------|------|
/// | `can_get` | `show` |
/// | `can_post` | `add` |
/// | `can_put` | `edit` |
/// | `can_delete` | `delete` |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct Permissions {
    pub show: bool,
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Permissions {
    /// All actions allowed.
    pub fn all() -> Self {
        Self {
            show: true,
            add: true,
            edit: true,
            delete: true,
        }
    }
}

impl From<Vec<String>> for Permissions {
    fn from(names: Vec<String>) -> Self {
        let mut permissions = Self::default();
        for name in names {
            match name.as_str() {
                "can_get" => permissions.show = true,
                "can_post" => permissions.add = true,
                "can_put" => permissions.edit = true,
                "can_delete" => permissions.delete = true,
                _ => {}
            }
        }
        permissions
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_info() {
        let info: ResourceInfo = serde_json::from_value(json!({
            "add_title": "Add Contact",
            "edit_title": "Edit Contact",
            "add_columns": [
                {"name": "name", "label": "Name", "required": true, "type": "String", "unique": true},
                {"name": "group", "label": "Group", "required": false, "type": "Related",
                 "count": 2, "values": [{"id": 1, "value": "Friends"}, {"id": 2, "value": "Work"}]}
            ],
            "filters": {
                "name": [{"name": "Starts with", "operator": "sw"}, {"name": "Equal to", "operator": "eq"}]
            },
            "permissions": ["can_get", "can_post", "can_info", "can_delete"]
        }))
        .unwrap();

        assert_eq!(info.add_columns.len(), 2);
        assert!(info.add_columns[0].required);
        assert!(info.add_columns[1].is_related());
        assert_eq!(info.add_columns[1].values[1].value, "Work");
        assert!(info.supports("name", "sw"));
        assert!(!info.supports("name", "ct"));
        assert!(info.operators("group").is_empty());
        assert_eq!(
            info.permissions,
            Permissions {
                show: true,
                add: true,
                edit: false,
                delete: true,
            }
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let info: ResourceInfo = serde_json::from_value(json!({})).unwrap();
        assert_eq!(info, ResourceInfo::default());
        assert_eq!(info.permissions, Permissions::default());
    }
}
