//! Masked fields.
//!
//! A [`MaskStrategy`] decorates an input element with client-side
//! formatting behavior and converts between what the user sees and what is
//! sent to the server. Strategies are looked up in a [`MaskRegistry`] keyed
//! by [`FieldKind`] once, when a field descriptor is built; the
//! [`MaskAdapter`] tracks which inputs of a mounted table carry which
//! strategy.
//!
//! # Kinds
//!
//! | Kind | Input | Wire value |
//! |------|-------|------------|
//! | [`FieldKind::DatePicker`] | date picker in the locale's language and format | ISO date |
//! | [`FieldKind::DatePattern`] | text with live `d/m/Y`-style blocks | ISO date |
//! | [`FieldKind::Decimal`] | text with live grouping and decimal mark | plain decimal |
//! | [`FieldKind::Plain`] | unchanged | unchanged |

mod date;
mod decimal;

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crudtable_dom::Element;
use crudtable_dom::visit_mut;
use serde::Deserialize;
use serde::Serialize;

pub use date::DatePattern;
pub use date::DatePicker;
pub use decimal::DecimalMask;

use crate::config::LocaleConfig;
use crate::config::TableConfig;

/// Input behavior of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    DatePicker,
    DatePattern,
    Decimal,
    #[default]
    Plain,
}

impl FieldKind {
    /// Kind used for a server-side column type.
    pub fn for_type(field_type: &str) -> Self {
        match field_type {
            // Date only: the picker does not pick times
            "Date" | "DateTime" => Self::DatePicker,
            "Decimal" | "Float" => Self::Decimal,
            _ => Self::Plain,
        }
    }
}

const DEFAULT_DECIMAL_SCALE: u32 = 2;

fn default_scale() -> u32 {
    DEFAULT_DECIMAL_SCALE
}

/// A field kind plus the options its strategy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMask {
    pub kind: FieldKind,
    /// Decimal places kept by decimal masks.
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Reject negative numbers in decimal masks.
    #[serde(default)]
    pub positive_only: bool,
}

impl Default for FieldMask {
    fn default() -> Self {
        Self::new(FieldKind::Plain)
    }
}

impl FieldMask {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            scale: DEFAULT_DECIMAL_SCALE,
            positive_only: false,
        }
    }

    /// A decimal mask keeping `scale` places.
    pub fn decimal(scale: u32) -> Self {
        Self {
            scale,
            ..Self::new(FieldKind::Decimal)
        }
    }

    pub fn positive_only(mut self) -> Self {
        self.positive_only = true;
        self
    }

    /// Mask of a column: the configured override, else the kind implied by
    /// its server-side type.
    pub fn for_column(config: &TableConfig, column: &str, field_type: &str) -> Self {
        config
            .fields
            .get(column)
            .copied()
            .unwrap_or_else(|| Self::new(FieldKind::for_type(field_type)))
    }
}

/// Formatting behavior attached to an input.
pub trait MaskStrategy: fmt::Debug + Send + Sync {
    /// The kind this strategy implements.
    fn kind(&self) -> FieldKind;

    /// Annotate an input with the behavior's class and data attributes.
    fn attach(&self, input: Element) -> Element;

    /// Remove everything `attach` added.
    fn detach(&self, input: &mut Element);

    /// Reformat raw typed text for display.
    fn format(&self, raw: &str) -> String;

    /// Convert displayed text to the value sent to the server.
    ///
    /// Returns `None` if the text is incomplete or invalid.
    fn normalize(&self, display: &str) -> Option<String>;
}

/// The no-op strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMask;

impl MaskStrategy for PlainMask {
    fn kind(&self) -> FieldKind {
        FieldKind::Plain
    }

    fn attach(&self, input: Element) -> Element {
        input
    }

    fn detach(&self, _input: &mut Element) {}

    fn format(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn normalize(&self, display: &str) -> Option<String> {
        Some(display.to_string())
    }
}

/// Builds a strategy for a locale and mask options.
pub type StrategyFactory = fn(&LocaleConfig, &FieldMask) -> Arc<dyn MaskStrategy>;

/// Strategy table keyed by field kind.
///
/// The default registry knows all built-in kinds; hosts may replace any
/// entry with [`register`](Self::register).
#[derive(Clone)]
pub struct MaskRegistry {
    table: HashMap<FieldKind, StrategyFactory>,
}

impl Default for MaskRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(FieldKind::DatePicker, date_picker);
        registry.register(FieldKind::DatePattern, date_pattern);
        registry.register(FieldKind::Decimal, decimal);
        registry.register(FieldKind::Plain, plain);
        registry
    }
}

fn date_picker(locale: &LocaleConfig, _mask: &FieldMask) -> Arc<dyn MaskStrategy> {
    Arc::new(DatePicker::new(locale))
}

fn date_pattern(locale: &LocaleConfig, _mask: &FieldMask) -> Arc<dyn MaskStrategy> {
    Arc::new(DatePattern::new(locale))
}

fn decimal(locale: &LocaleConfig, mask: &FieldMask) -> Arc<dyn MaskStrategy> {
    Arc::new(DecimalMask::new(locale, mask.scale, mask.positive_only))
}

fn plain(_locale: &LocaleConfig, _mask: &FieldMask) -> Arc<dyn MaskStrategy> {
    Arc::new(PlainMask)
}

impl fmt::Debug for MaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.table.keys().collect();
        kinds.sort_by_key(|k| format!("{k:?}"));
        f.debug_struct("MaskRegistry").field("kinds", &kinds).finish()
    }
}

impl MaskRegistry {
    /// A registry with no entries; everything resolves to [`PlainMask`].
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Set the factory for a kind, replacing any previous one.
    pub fn register(&mut self, kind: FieldKind, factory: StrategyFactory) {
        self.table.insert(kind, factory);
    }

    /// Build the strategy for a mask. Unregistered kinds get [`PlainMask`].
    pub fn resolve(&self, locale: &LocaleConfig, mask: &FieldMask) -> Arc<dyn MaskStrategy> {
        match self.table.get(&mask.kind) {
            Some(factory) => factory(locale, mask),
            None => Arc::new(PlainMask),
        }
    }
}

/// Masks mounted on the inputs of one table, keyed by input id.
#[derive(Debug, Default)]
pub struct MaskAdapter {
    mounted: BTreeMap<String, Arc<dyn MaskStrategy>>,
}

impl MaskAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a strategy to an input id. Plain strategies are not tracked.
    pub fn mount(&mut self, input_id: impl Into<String>, strategy: Arc<dyn MaskStrategy>) {
        if strategy.kind() != FieldKind::Plain {
            self.mounted.insert(input_id.into(), strategy);
        }
    }

    /// Release one input.
    pub fn unmount(&mut self, input_id: &str) -> bool {
        self.mounted.remove(input_id).is_some()
    }

    /// Release every input whose id starts with `prefix`.
    pub fn unmount_prefix(&mut self, prefix: &str) {
        self.mounted.retain(|id, _| !id.starts_with(prefix));
    }

    pub fn is_mounted(&self, input_id: &str) -> bool {
        self.mounted.contains_key(input_id)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Annotate an input with the strategy mounted under its id.
    pub fn attach(&self, input: Element) -> Element {
        let strategy = input.id.as_deref().and_then(|id| self.mounted.get(id));
        match strategy {
            Some(strategy) => strategy.attach(input),
            None => input,
        }
    }

    /// Reformat text typed into a mounted input.
    ///
    /// Returns `None` for inputs without a mask.
    pub fn input(&self, input_id: &str, raw: &str) -> Option<String> {
        self.mounted.get(input_id).map(|s| s.format(raw))
    }

    /// Convert the displayed text of an input to its wire value.
    ///
    /// Inputs without a mask pass through unchanged.
    pub fn normalize(&self, input_id: &str, display: &str) -> Option<String> {
        match self.mounted.get(input_id) {
            Some(strategy) => strategy.normalize(display),
            None => Some(display.to_string()),
        }
    }

    /// Strip mask annotations from every mounted input in a tree.
    pub fn detach_all(&self, root: &mut Element) {
        visit_mut(root, &mut |el| {
            if let Some(strategy) = el.id.as_deref().and_then(|id| self.mounted.get(id)) {
                strategy.detach(el);
            }
        });
    }

    /// Release everything. Called when the table unmounts.
    pub fn clear(&mut self) {
        self.mounted.clear();
    }
}
