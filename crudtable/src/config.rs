//! Locale and table configuration.
//!
//! Both are plain values handed to the controller at construction. Hosts
//! usually build them with the setters below or load them from JSON.

use std::collections::BTreeMap;

use crudtable_lib::api::query::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use serde::Serialize;

use crate::error::TableError;
use crate::mask::FieldMask;

/// Host-supplied locale settings used by masks and the date picker.
///
/// # Example
///
/// ```
/// use crudtable::LocaleConfig;
///
/// let locale = LocaleConfig::from_json(
///     r#"{"locale": "pt_BR", "date_pattern": "d/m/Y", "decimal_separator": ","}"#,
/// ).unwrap();
/// assert_eq!(locale.picker_language(), "pt-BR");
/// assert_eq!(locale.thousands_delimiter, ",");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale name, e.g. `en` or `pt_BR`.
    pub locale: String,
    /// Display format of the date picker, e.g. `DD/MM/YYYY`.
    pub picker_format: String,
    /// Block order of masked date inputs, e.g. `d/m/Y`.
    pub date_pattern: String,
    /// Delimiter placed between masked date blocks.
    pub date_delimiter: String,
    /// Decimal mark of masked numbers.
    pub decimal_separator: String,
    /// Thousands group delimiter of masked numbers.
    pub thousands_delimiter: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            picker_format: "YYYY-MM-DD".to_string(),
            date_pattern: "Y-m-d".to_string(),
            date_delimiter: "-".to_string(),
            decimal_separator: ".".to_string(),
            thousands_delimiter: ",".to_string(),
        }
    }
}

impl LocaleConfig {
    /// Create a config for a locale name with default formats.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Default::default()
        }
    }

    /// Load a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        serde_json::from_str(json).map_err(TableError::Config)
    }

    pub fn picker_format(mut self, format: impl Into<String>) -> Self {
        self.picker_format = format.into();
        self
    }

    /// Set the masked date pattern and its delimiter.
    pub fn date_pattern(mut self, pattern: impl Into<String>, delimiter: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self.date_delimiter = delimiter.into();
        self
    }

    /// Set the decimal mark and thousands delimiter.
    pub fn numbers(mut self, decimal: impl Into<String>, thousands: impl Into<String>) -> Self {
        self.decimal_separator = decimal.into();
        self.thousands_delimiter = thousands.into();
        self
    }

    /// Language code understood by the date picker.
    ///
    /// The picker names a few locales differently from the server.
    pub fn picker_language(&self) -> &str {
        match self.locale.as_str() {
            "pt_BR" => "pt-BR",
            "zh" => "zh-CN",
            other => other,
        }
    }
}

/// Page sizes offered in the page-size menu.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Number of page links shown at once.
pub const DEFAULT_PAGINATION_WINDOW: usize = 10;

/// Table behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Page size a freshly mounted table starts with.
    pub page_size: usize,
    /// Choices offered in the page-size menu.
    pub page_size_options: Vec<usize>,
    /// Maximum number of page links in the pagination control.
    pub pagination_window: usize,
    /// Per-column mask overrides, keyed by column name.
    pub fields: BTreeMap<String, FieldMask>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            pagination_window: DEFAULT_PAGINATION_WINDOW,
            fields: BTreeMap::new(),
        }
    }
}

impl TableConfig {
    /// Load a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        serde_json::from_str(json).map_err(TableError::Config)
    }

    /// Set the initial page size. Zero is ignored.
    pub fn page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    pub fn page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    /// Set the number of page links. Clamped to at least one.
    pub fn pagination_window(mut self, window: usize) -> Self {
        self.pagination_window = window.max(1);
        self
    }

    /// Override the mask of a column.
    pub fn field(mut self, column: impl Into<String>, mask: FieldMask) -> Self {
        self.fields.insert(column.into(), mask);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::FieldKind;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.page_size_options, vec![10, 20, 50, 100]);
        assert_eq!(config.pagination_window, 10);

        let locale = LocaleConfig::default();
        assert_eq!(locale.picker_language(), "en");
        assert_eq!(locale.decimal_separator, ".");
    }

    #[test]
    fn test_picker_language_mapping() {
        assert_eq!(LocaleConfig::new("zh").picker_language(), "zh-CN");
        assert_eq!(LocaleConfig::new("pt_BR").picker_language(), "pt-BR");
        assert_eq!(LocaleConfig::new("de").picker_language(), "de");
    }

    #[test]
    fn test_table_config_from_json() {
        let config = TableConfig::from_json(
            r#"{"page_size": 50, "fields": {"salary": {"kind": "decimal", "scale": 3, "positive_only": true}}}"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.pagination_window, 10);
        let salary = &config.fields["salary"];
        assert_eq!(salary.kind, FieldKind::Decimal);
        assert_eq!(salary.scale, 3);
        assert!(salary.positive_only);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = LocaleConfig::from_json("{\"locale\": 5}").unwrap_err();
        assert!(matches!(err, TableError::Config(_)));
    }

    #[test]
    fn test_setters_ignore_degenerate_values() {
        let config = TableConfig::default().page_size(0).pagination_window(0);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.pagination_window, 1);
    }
}
