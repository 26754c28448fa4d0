//! HTML serialization for element trees.

use crate::element::{Content, Element};

/// Elements that never carry children or a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta"];

/// Serialize an element tree to an HTML string.
///
/// Attributes are written in a fixed order (id, class, attributes, data,
/// handlers, boolean state) so the output is stable for a given tree.
/// Handlers become `data-on-{event}` attributes.
pub fn to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.tag);

    if let Some(id) = &element.id {
        write_attr(out, "id", id);
    }
    if !element.classes.is_empty() {
        write_attr(out, "class", &element.classes.join(" "));
    }
    for (name, value) in &element.attrs {
        write_attr(out, name, value);
    }
    for (key, value) in &element.data {
        write_attr(out, &format!("data-{key}"), value);
    }
    for handler in &element.handlers {
        write_attr(out, &format!("data-on-{}", handler.event), &handler.action);
    }
    if element.disabled {
        out.push_str(" disabled");
    }
    if element.required {
        out.push_str(" required");
    }
    if element.selected {
        out.push_str(" selected");
    }
    out.push('>');

    if VOID_TAGS.contains(&element.tag) {
        return;
    }

    match &element.content {
        Content::None => {}
        Content::Text(text) => out.push_str(&escape(text)),
        Content::Children(children) => {
            for child in children {
                write_element(out, child);
            }
        }
    }

    out.push_str("</");
    out.push_str(element.tag);
    out.push('>');
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
