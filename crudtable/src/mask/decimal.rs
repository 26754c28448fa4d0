//! Decimal mask.

use std::str::FromStr;

use crudtable_dom::Element;
use rust_decimal::Decimal;

use super::FieldKind;
use super::MaskStrategy;
use crate::config::LocaleConfig;

const DECIMAL_CLASS: &str = "crud-decimal";

/// Live numeric mask: thousands grouping, locale decimal mark, a fixed
/// number of decimal places and optionally no sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalMask {
    decimal_mark: char,
    thousands: String,
    scale: u32,
    positive_only: bool,
}

/// Sign, integer digits and fraction digits of typed text.
struct Parts {
    negative: bool,
    integer: String,
    fraction: Option<String>,
}

impl DecimalMask {
    pub fn new(locale: &LocaleConfig, scale: u32, positive_only: bool) -> Self {
        Self {
            decimal_mark: locale.decimal_separator.chars().next().unwrap_or('.'),
            thousands: locale.thousands_delimiter.clone(),
            scale,
            positive_only,
        }
    }

    fn split(&self, raw: &str) -> Parts {
        let mut parts = Parts {
            negative: false,
            integer: String::new(),
            fraction: None,
        };

        for c in raw.chars() {
            if c.is_ascii_digit() {
                match &mut parts.fraction {
                    Some(fraction) => {
                        if fraction.len() < self.scale as usize {
                            fraction.push(c);
                        }
                    }
                    None => parts.integer.push(c),
                }
            } else if c == self.decimal_mark && parts.fraction.is_none() && self.scale > 0 {
                parts.fraction = Some(String::new());
            } else if c == '-'
                && !self.positive_only
                && parts.integer.is_empty()
                && parts.fraction.is_none()
            {
                parts.negative = true;
            }
        }

        let trimmed = parts.integer.trim_start_matches('0');
        if trimmed.is_empty() {
            if !parts.integer.is_empty() || parts.fraction.is_some() {
                parts.integer = "0".to_string();
            }
        } else {
            parts.integer = trimmed.to_string();
        }
        parts
    }

    fn group(&self, integer: &str) -> String {
        if self.thousands.is_empty() {
            return integer.to_string();
        }
        let mut out = String::new();
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                out.push_str(&self.thousands);
            }
            out.push(c);
        }
        out
    }
}

impl MaskStrategy for DecimalMask {
    fn kind(&self) -> FieldKind {
        FieldKind::Decimal
    }

    fn attach(&self, input: Element) -> Element {
        let input = input
            .class(DECIMAL_CLASS)
            .attr("inputmode", "decimal")
            .data("decimal-scale", self.scale.to_string())
            .data("decimal-mark", self.decimal_mark.to_string())
            .data("thousands", self.thousands.clone());
        if self.positive_only {
            input.data("positive-only", "true")
        } else {
            input
        }
    }

    fn detach(&self, input: &mut Element) {
        input.remove_class(DECIMAL_CLASS);
        input.remove_attr("inputmode");
        for key in ["decimal-scale", "decimal-mark", "thousands", "positive-only"] {
            input.remove_data(key);
        }
    }

    fn format(&self, raw: &str) -> String {
        let parts = self.split(raw);
        let mut out = String::new();
        if parts.negative {
            out.push('-');
        }
        out.push_str(&self.group(&parts.integer));
        if let Some(fraction) = parts.fraction {
            out.push(self.decimal_mark);
            out.push_str(&fraction);
        }
        out
    }

    fn normalize(&self, display: &str) -> Option<String> {
        let parts = self.split(display);
        if parts.integer.is_empty() {
            return None;
        }

        let mut plain = String::new();
        if parts.negative {
            plain.push('-');
        }
        plain.push_str(&parts.integer);
        if let Some(fraction) = parts.fraction.filter(|f| !f.is_empty()) {
            plain.push('.');
            plain.push_str(&fraction);
        }

        let value = Decimal::from_str(&plain).ok()?;
        if self.positive_only && value.is_sign_negative() {
            return None;
        }
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(scale: u32, positive_only: bool) -> DecimalMask {
        DecimalMask::new(&LocaleConfig::default(), scale, positive_only)
    }

    fn european(scale: u32) -> DecimalMask {
        DecimalMask::new(&LocaleConfig::new("de").numbers(",", "."), scale, false)
    }

    #[test]
    fn test_grouping() {
        let m = mask(2, false);
        assert_eq!(m.format("1"), "1");
        assert_eq!(m.format("1234"), "1,234");
        assert_eq!(m.format("1234567"), "1,234,567");
        assert_eq!(m.format("1,234,5678"), "12,345,678");
        assert_eq!(m.format("0012"), "12");
        assert_eq!(m.format(""), "");
    }

    #[test]
    fn test_scale() {
        let m = mask(2, false);
        assert_eq!(m.format("1234.5678"), "1,234.56");
        assert_eq!(m.format(".5"), "0.5");
        assert_eq!(m.format("12."), "12.");
        assert_eq!(m.format("1.2.3"), "1.23");

        let whole = mask(0, false);
        assert_eq!(whole.format("12.34"), "1,234");
    }

    #[test]
    fn test_sign() {
        assert_eq!(mask(2, false).format("-1234"), "-1,234");
        assert_eq!(mask(2, false).format("12-34"), "1,234");
        assert_eq!(mask(2, true).format("-1234"), "1,234");
    }

    #[test]
    fn test_locale_marks() {
        let m = european(2);
        assert_eq!(m.format("1234567,891"), "1.234.567,89");
        assert_eq!(m.normalize("1.234.567,89"), Some("1234567.89".to_string()));
    }

    #[test]
    fn test_normalize() {
        let m = mask(2, false);
        assert_eq!(m.normalize("1,234.50"), Some("1234.50".to_string()));
        assert_eq!(m.normalize("-0.5"), Some("-0.5".to_string()));
        assert_eq!(m.normalize("12."), Some("12".to_string()));
        assert_eq!(m.normalize(""), None);
        assert_eq!(m.normalize("-"), None);
    }

    #[test]
    fn test_attach_positive_only() {
        let input = mask(3, true).attach(Element::text_input(""));
        assert!(input.has_class(DECIMAL_CLASS));
        assert_eq!(input.get_data("decimal-scale"), Some("3"));
        assert_eq!(input.get_data("positive-only"), Some("true"));

        let input = mask(2, false).attach(Element::text_input(""));
        assert_eq!(input.get_data("positive-only"), None);
    }
}
