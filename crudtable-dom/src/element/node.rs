use std::collections::BTreeMap;

use super::Content;

/// An event binding: when `event` fires on the element, the host dispatches
/// `action` back to whoever rendered the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub event: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    // Identity
    pub id: Option<String>,
    pub tag: &'static str,

    // Content
    pub content: Content,

    // Attributes
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,

    // State
    pub disabled: bool,
    pub required: bool,
    pub selected: bool,

    // Interaction
    pub handlers: Vec<Handler>,

    // Custom data storage, serialized as `data-*` attributes
    pub data: BTreeMap<String, String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: None,
            tag: "div",
            content: Content::None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            disabled: false,
            required: false,
            selected: false,
            handlers: Vec::new(),
            data: BTreeMap::new(),
        }
    }
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn span() -> Self {
        Self::new("span")
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new("span").content(Content::Text(content.into()))
    }

    pub fn strong(content: impl Into<String>) -> Self {
        Self::new("strong").content(Content::Text(content.into()))
    }

    pub fn table() -> Self {
        Self::new("table")
    }

    pub fn thead() -> Self {
        Self::new("thead")
    }

    pub fn tbody() -> Self {
        Self::new("tbody")
    }

    pub fn tr() -> Self {
        Self::new("tr")
    }

    pub fn th() -> Self {
        Self::new("th")
    }

    pub fn td() -> Self {
        Self::new("td")
    }

    pub fn ul() -> Self {
        Self::new("ul")
    }

    pub fn li() -> Self {
        Self::new("li")
    }

    pub fn form() -> Self {
        Self::new("form")
    }

    pub fn label(content: impl Into<String>) -> Self {
        Self::new("label").content(Content::Text(content.into()))
    }

    pub fn button(content: impl Into<String>) -> Self {
        Self::new("button")
            .attr("type", "button")
            .content(Content::Text(content.into()))
    }

    /// An anchor that only triggers handlers (`href="#"`).
    pub fn link(content: impl Into<String>) -> Self {
        Self::new("a")
            .attr("href", "#")
            .content(Content::Text(content.into()))
    }

    /// An icon element (`<i class="...">`).
    pub fn icon(class: &str) -> Self {
        Self::new("i").class(class)
    }

    /// Create a text input element.
    pub fn text_input(value: impl Into<String>) -> Self {
        Self::new("input")
            .attr("type", "text")
            .attr("value", value)
    }

    pub fn select() -> Self {
        Self::new("select")
    }

    pub fn option(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new("option")
            .attr("value", value)
            .content(Content::Text(label.into()))
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    // Content
    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        for child in children {
            self = self.child(child);
        }
        self
    }

    /// Append a child only when one is given.
    pub fn maybe_child(self, child: Option<Element>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    // Attributes
    pub fn class(mut self, class: &str) -> Self {
        for name in class.split_whitespace() {
            if !self.has_class(name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    // State
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    // Interaction
    pub fn on(mut self, event: impl Into<String>, action: impl Into<String>) -> Self {
        self.handlers.push(Handler {
            event: event.into(),
            action: action.into(),
        });
        self
    }

    // Queries
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn get_data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// The action bound to `event`, if any.
    pub fn handler(&self, event: &str) -> Option<&str> {
        self.handlers
            .iter()
            .find(|h| h.event == event)
            .map(|h| h.action.as_str())
    }

    pub fn child_elements(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        match &self.content {
            Content::None => String::new(),
            Content::Text(text) => text.clone(),
            Content::Children(children) => children.iter().map(Element::text_content).collect(),
        }
    }

    // Mutation in place, used by adapters that decorate already built trees
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn remove_data(&mut self, key: &str) {
        self.data.remove(key);
    }

    pub fn clear_data(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_appends() {
        let el = Element::div()
            .child(Element::text("a"))
            .child(Element::text("b"))
            .maybe_child(None)
            .maybe_child(Some(Element::text("c")));
        assert_eq!(el.child_elements().len(), 3);
        assert_eq!(el.text_content(), "abc");
    }

    #[test]
    fn test_child_replaces_text_content() {
        let el = Element::label("Name").child(Element::text("*"));
        assert_eq!(el.text_content(), "*");
    }

    #[test]
    fn test_class_dedup_and_split() {
        let el = Element::div().class("btn btn-sm").class("btn");
        assert_eq!(el.classes, vec!["btn", "btn-sm"]);
        assert!(el.has_class("btn-sm"));
    }

    #[test]
    fn test_handler_lookup() {
        let el = Element::link("Next").on("click", "next");
        assert_eq!(el.handler("click"), Some("next"));
        assert_eq!(el.handler("change"), None);
    }
}
