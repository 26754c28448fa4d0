//! Form and filter field descriptors.
//!
//! A descriptor is built once per column when resource metadata arrives.
//! Its mask strategy is resolved at that point, so rendering and input
//! handling never inspect column types again.

use std::sync::Arc;

use crudtable_lib::model::ColumnInfo;
use crudtable_lib::model::RelatedValue;
use serde_json::Value;

use crate::config::LocaleConfig;
use crate::config::TableConfig;
use crate::mask::FieldKind;
use crate::mask::FieldMask;
use crate::mask::MaskRegistry;
use crate::mask::MaskStrategy;
use crate::mask::PlainMask;

/// Id prefix of add-form inputs.
pub const ADD_PREFIX: &str = "add-";

/// Id prefix of filter value inputs.
pub const FILTER_PREFIX: &str = "filter-";

/// How a field is edited.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text,
    /// Searchable select over related records.
    Select(Vec<RelatedValue>),
}

/// A field of the add form or the filter panel.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub description: String,
    pub required: bool,
    pub input: FieldInput,
    pub mask: Arc<dyn MaskStrategy>,
}

impl FieldDescriptor {
    /// Descriptor of an add-form column.
    pub fn from_column(
        column: &ColumnInfo,
        config: &TableConfig,
        locale: &LocaleConfig,
        registry: &MaskRegistry,
    ) -> Self {
        let (input, mask) = if column.is_related() {
            let mask: Arc<dyn MaskStrategy> = Arc::new(PlainMask);
            (FieldInput::Select(column.values.clone()), mask)
        } else {
            let mask = FieldMask::for_column(config, &column.name, &column.field_type);
            (FieldInput::Text, registry.resolve(locale, &mask))
        };

        Self {
            name: column.name.clone(),
            label: column.display_label().to_string(),
            description: column.description.clone(),
            required: column.required,
            input,
            mask,
        }
    }

    /// Descriptor of a filter value input.
    ///
    /// Filters never carry related choices; the value is typed.
    pub fn filter(
        name: &str,
        label: &str,
        field_type: &str,
        config: &TableConfig,
        locale: &LocaleConfig,
        registry: &MaskRegistry,
    ) -> Self {
        let mask = FieldMask::for_column(config, name, field_type);
        Self {
            name: name.to_string(),
            label: label.to_string(),
            description: String::new(),
            required: false,
            input: FieldInput::Text,
            mask: registry.resolve(locale, &mask),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.mask.kind()
    }

    pub fn input_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.name)
    }

    /// The JSON value submitted for a displayed value.
    ///
    /// Selects submit the chosen record's id; masked inputs their normalized
    /// text. `None` means the value cannot be submitted.
    pub fn wire_value(&self, display: &str) -> Option<Value> {
        match &self.input {
            FieldInput::Select(values) => values
                .iter()
                .find(|v| v.id.to_string() == display)
                .and_then(|v| serde_json::to_value(&v.id).ok()),
            FieldInput::Text => self.mask.normalize(display).map(Value::String),
        }
    }
}

#[cfg(test)]
mod tests {
    use crudtable_lib::model::ItemId;
    use serde_json::json;

    use super::*;

    fn build(column: &ColumnInfo) -> FieldDescriptor {
        FieldDescriptor::from_column(
            column,
            &TableConfig::default(),
            &LocaleConfig::default(),
            &MaskRegistry::default(),
        )
    }

    #[test]
    fn test_related_column_is_select() {
        let column = ColumnInfo::new("contact_group", "Group", "Related").with_values(vec![
            RelatedValue {
                id: ItemId::Int(1),
                value: "Friends".into(),
            },
            RelatedValue {
                id: ItemId::Int(2),
                value: "Work".into(),
            },
        ]);
        let field = build(&column);
        assert!(matches!(field.input, FieldInput::Select(ref v) if v.len() == 2));
        assert_eq!(field.kind(), FieldKind::Plain);
        assert_eq!(field.wire_value("2"), Some(json!(2)));
        assert_eq!(field.wire_value("7"), None);
    }

    #[test]
    fn test_typed_columns_resolve_masks_once() {
        let birthday = build(&ColumnInfo::new("birthday", "Birthday", "Date").required());
        assert_eq!(birthday.kind(), FieldKind::DatePicker);
        assert!(birthday.required);
        assert_eq!(birthday.input_id(ADD_PREFIX), "add-birthday");
        assert_eq!(birthday.wire_value("2024-03-05"), Some(json!("2024-03-05")));
        assert_eq!(birthday.wire_value("tomorrow"), None);

        let salary = build(&ColumnInfo::new("salary", "Salary", "Decimal"));
        assert_eq!(salary.kind(), FieldKind::Decimal);
        assert_eq!(salary.wire_value("1,000.5"), Some(json!("1000.5")));

        let name = build(&ColumnInfo::new("name", "Name", "String"));
        assert_eq!(name.kind(), FieldKind::Plain);
        assert_eq!(name.wire_value("Ada"), Some(json!("Ada")));
    }
}
