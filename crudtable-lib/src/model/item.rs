//! Item identifiers, flattened rows and single-item responses

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Primary key of a record.
///
/// Servers send integer keys for most models but string keys are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A record flattened into dotted field keys.
///
/// Nested objects such as `{"department": {"name": "R&D"}}` become
/// `department.name`, matching the keys servers use in `list_columns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Flattens a JSON value into a row.
    ///
    /// Non-object values produce an empty row.
    pub fn flatten(value: &Value) -> Self {
        let mut fields = BTreeMap::new();
        if let Value::Object(map) = value {
            for (key, val) in map {
                flatten_into(key, val, &mut fields);
            }
        }
        Self { fields }
    }

    /// Returns the raw value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a field formatted for display.
    ///
    /// Strings are shown unquoted, null and missing fields as an empty string.
    pub fn display(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Returns the flattened field keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn flatten_into(prefix: &str, value: &Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, val) in map {
                flatten_into(&format!("{prefix}.{key}"), val, out);
            }
        }
        // Empty objects carry nothing to display.
        Value::Object(_) => {}
        other => {
            out.insert(prefix.to_string(), other.clone());
        }
    }
}

/// A single record as returned by `GET /{resource}/{id}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Primary key, if the server echoed it.
    pub id: Option<ItemId>,
    /// Title for the show form.
    pub show_title: String,
    /// Column key to display label.
    pub label_columns: HashMap<String, String>,
    /// Columns in display order; empty means "all fields, sorted".
    pub show_columns: Vec<String>,
    /// The flattened record.
    pub result: Row,
}

impl Item {
    /// Returns the columns to show, in order.
    pub fn columns(&self) -> Vec<String> {
        if self.show_columns.is_empty() {
            self.result.keys().map(str::to_string).collect()
        } else {
            self.show_columns.clone()
        }
    }

    /// Returns the label for a column, falling back to the key itself.
    pub fn label<'a>(&'a self, column: &'a str) -> &'a str {
        self.label_columns
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemResponse {
    #[serde(default)]
    id: Option<ItemId>,
    #[serde(default)]
    show_title: String,
    #[serde(default)]
    label_columns: HashMap<String, String>,
    #[serde(default)]
    show_columns: Vec<String>,
    #[serde(default)]
    result: Value,
}

impl From<ItemResponse> for Item {
    fn from(raw: ItemResponse) -> Self {
        Self {
            id: raw.id,
            show_title: raw.show_title,
            label_columns: raw.label_columns,
            show_columns: raw.show_columns,
            result: Row::flatten(&raw.result),
        }
    }
}

/// Response to a successful create.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    /// Key of the new record.
    pub id: Option<ItemId>,
    /// The stored record as the server echoed it.
    pub result: Row,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedResponse {
    #[serde(default)]
    id: Option<ItemId>,
    #[serde(default)]
    result: Value,
}

impl From<CreatedResponse> for Created {
    fn from(raw: CreatedResponse) -> Self {
        Self {
            id: raw.id,
            result: Row::flatten(&raw.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_flatten_nested_objects() {
        let row = Row::flatten(&json!({
            "name": "Ada",
            "department": {"name": "R&D", "site": {"city": "Porto"}},
            "tags": ["a", "b"],
            "extra": {},
        }));
        assert_eq!(row.display("name"), "Ada");
        assert_eq!(row.display("department.name"), "R&D");
        assert_eq!(row.display("department.site.city"), "Porto");
        assert_eq!(row.get("tags"), Some(&json!(["a", "b"])));
        assert!(row.get("extra").is_none());
        assert_eq!(row.len(), 4);
    }

    #[test]
    fn test_display_nulls_and_numbers() {
        let row = Row::flatten(&json!({"a": null, "b": 2.5, "c": true}));
        assert_eq!(row.display("a"), "");
        assert_eq!(row.display("missing"), "");
        assert_eq!(row.display("b"), "2.5");
        assert_eq!(row.display("c"), "true");
    }

    #[test]
    fn test_item_id_untagged() {
        let ids: Vec<ItemId> = serde_json::from_value(json!([1, "abc"])).unwrap();
        assert_eq!(ids, vec![ItemId::Int(1), ItemId::Text("abc".into())]);
        assert_eq!(ids[0].to_string(), "1");
    }

    #[test]
    fn test_item_columns_fallback() {
        let raw: ItemResponse = serde_json::from_value(json!({
            "show_title": "Show Contact",
            "label_columns": {"name": "Name"},
            "result": {"name": "Ada", "age": 36},
        }))
        .unwrap();
        let item = Item::from(raw);
        assert_eq!(item.columns(), vec!["age", "name"]);
        assert_eq!(item.label("name"), "Name");
        assert_eq!(item.label("age"), "age");
    }
}
