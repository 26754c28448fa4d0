//! Date masks.

use chrono::NaiveDate;
use crudtable_dom::Element;

use super::FieldKind;
use super::MaskStrategy;
use crate::config::LocaleConfig;

const ISO_DATE: &str = "%Y-%m-%d";

const PICKER_CLASS: &str = "crud-datepicker";
const PATTERN_CLASS: &str = "crud-date-mask";

// =============================================================================
// Date picker
// =============================================================================

/// Date input wired to a date picker in the locale's language and format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    language: String,
    picker_format: String,
    chrono_format: String,
}

impl DatePicker {
    pub fn new(locale: &LocaleConfig) -> Self {
        Self {
            language: locale.picker_language().to_string(),
            picker_format: locale.picker_format.clone(),
            chrono_format: picker_to_chrono(&locale.picker_format),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl MaskStrategy for DatePicker {
    fn kind(&self) -> FieldKind {
        FieldKind::DatePicker
    }

    fn attach(&self, input: Element) -> Element {
        input
            .class(PICKER_CLASS)
            .data("date-language", self.language.clone())
            .data("date-format", self.picker_format.clone())
    }

    fn detach(&self, input: &mut Element) {
        input.remove_class(PICKER_CLASS);
        input.remove_data("date-language");
        input.remove_data("date-format");
    }

    /// ISO dates are shown in the picker format; anything else is left to
    /// the picker.
    fn format(&self, raw: &str) -> String {
        match NaiveDate::parse_from_str(raw.trim(), ISO_DATE) {
            Ok(date) => date.format(&self.chrono_format).to_string(),
            Err(_) => raw.to_string(),
        }
    }

    fn normalize(&self, display: &str) -> Option<String> {
        let display = display.trim();
        NaiveDate::parse_from_str(display, &self.chrono_format)
            .or_else(|_| NaiveDate::parse_from_str(display, ISO_DATE))
            .ok()
            .map(|date| date.format(ISO_DATE).to_string())
    }
}

/// Translate a picker format (`DD/MM/YYYY`) into a chrono format
/// (`%d/%m/%Y`).
fn picker_to_chrono(format: &str) -> String {
    const TOKENS: [(&str, &str); 6] = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("M", "%-m"),
        ("D", "%-d"),
    ];

    let mut out = String::new();
    let mut rest = format;
    'outer: while let Some(c) = rest.chars().next() {
        for (token, replacement) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

// =============================================================================
// Date pattern
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePart {
    Day,
    Month,
    Year,
    ShortYear,
}

impl DatePart {
    fn digits(self) -> usize {
        match self {
            Self::Year => 4,
            _ => 2,
        }
    }

    fn letter(self) -> char {
        match self {
            Self::Day => 'd',
            Self::Month => 'm',
            Self::Year => 'Y',
            Self::ShortYear => 'y',
        }
    }

    /// Largest value a complete block may hold.
    fn max(self) -> Option<u32> {
        match self {
            Self::Day => Some(31),
            Self::Month => Some(12),
            _ => None,
        }
    }

    /// A leading digit above this can only be a single-digit value.
    fn max_lead(self) -> Option<char> {
        match self {
            Self::Day => Some('3'),
            Self::Month => Some('1'),
            _ => None,
        }
    }
}

/// Parse `d/m/Y`-style patterns. Unknown characters are ignored.
fn parse_pattern(pattern: &str) -> Vec<DatePart> {
    let parts: Vec<DatePart> = pattern
        .chars()
        .filter_map(|c| match c {
            'd' => Some(DatePart::Day),
            'm' => Some(DatePart::Month),
            'Y' => Some(DatePart::Year),
            'y' => Some(DatePart::ShortYear),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        vec![DatePart::Day, DatePart::Month, DatePart::Year]
    } else {
        parts
    }
}

/// Plain text input with a live date mask.
///
/// Digits are grouped into the locale's blocks and joined by its delimiter:
/// with `d/m/Y`, typing `31122024` shows `31/12/2024`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    parts: Vec<DatePart>,
    delimiter: String,
}

impl DatePattern {
    pub fn new(locale: &LocaleConfig) -> Self {
        Self {
            parts: parse_pattern(&locale.date_pattern),
            delimiter: locale.date_delimiter.clone(),
        }
    }

    fn max_digits(&self) -> usize {
        self.parts.iter().map(|p| p.digits()).sum()
    }

    /// Split digits into blocks, padding and capping day and month values
    /// the way a user would mean them.
    fn blocks(&self, raw: &str) -> Vec<String> {
        let mut digits = raw.chars().filter(char::is_ascii_digit).peekable();
        let mut blocks = Vec::new();

        for part in &self.parts {
            let Some(&first) = digits.peek() else {
                break;
            };

            let mut block = String::new();
            if part.max_lead().is_some_and(|lead| first > lead) {
                block.push('0');
                block.push(first);
                digits.next();
            } else {
                while block.len() < part.digits() {
                    match digits.next() {
                        Some(d) => block.push(d),
                        None => break,
                    }
                }
            }

            if block.len() == part.digits()
                && let (Some(max), Ok(value)) = (part.max(), block.parse::<u32>())
                && value > max
            {
                block = max.to_string();
            }
            blocks.push(block);
        }
        blocks
    }
}

impl MaskStrategy for DatePattern {
    fn kind(&self) -> FieldKind {
        FieldKind::DatePattern
    }

    fn attach(&self, input: Element) -> Element {
        let pattern: String = self.parts.iter().map(|p| p.letter()).collect();
        let max_len = self.max_digits() + self.delimiter.len() * (self.parts.len() - 1);
        input
            .class(PATTERN_CLASS)
            .attr("maxlength", max_len.to_string())
            .data("date-pattern", pattern)
            .data("date-delimiter", self.delimiter.clone())
    }

    fn detach(&self, input: &mut Element) {
        input.remove_class(PATTERN_CLASS);
        input.remove_attr("maxlength");
        input.remove_data("date-pattern");
        input.remove_data("date-delimiter");
    }

    fn format(&self, raw: &str) -> String {
        self.blocks(raw).join(&self.delimiter)
    }

    fn normalize(&self, display: &str) -> Option<String> {
        let blocks = self.blocks(display);
        if blocks.len() != self.parts.len()
            || blocks.iter().zip(&self.parts).any(|(b, p)| b.len() != p.digits())
        {
            return None;
        }

        let (mut day, mut month, mut year) = (None, None, None);
        for (block, part) in blocks.iter().zip(&self.parts) {
            let value: u32 = block.parse().ok()?;
            match part {
                DatePart::Day => day = Some(value),
                DatePart::Month => month = Some(value),
                DatePart::Year => year = Some(value as i32),
                DatePart::ShortYear => year = Some(2000 + value as i32),
            }
        }

        let date = NaiveDate::from_ymd_opt(year?, month?, day?)?;
        Some(date.format(ISO_DATE).to_string())
    }
}
