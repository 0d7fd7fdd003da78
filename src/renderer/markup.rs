//! Markup tree - the abstract output of every component.
//!
//! Components build an [`Element`] tree instead of writing strings. The tree
//! can be inspected (tests and hosts query it by class, tag or attribute) and
//! serialized to HTML by [`super::to_html`].

use crate::types::class_list;

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// An element with ordered attributes and children.
///
/// Attribute order is insertion order; setting an attribute twice replaces
/// the value in place. Boolean attributes are stored with an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute only when a value is present.
    pub fn attr_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Boolean attribute (`disabled`, `required`, ...), present when `on`.
    pub fn flag(mut self, name: &str, on: bool) -> Self {
        if on {
            self.set_attr(name, "");
        } else {
            self.attrs.retain(|(k, _)| k != name);
        }
        self
    }

    /// Set the class attribute from fragments. Empty fragments are dropped and
    /// an empty result leaves the attribute off.
    pub fn class(mut self, parts: &[&str]) -> Self {
        let classes = class_list(parts);
        if classes.is_empty() {
            self.attrs.retain(|(k, _)| k != "class");
        } else {
            self.set_attr("class", classes);
        }
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a child only when present.
    pub fn child_opt(mut self, node: Option<impl Into<Node>>) -> Self {
        if let Some(node) = node {
            self.children.push(node.into());
        }
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Child elements, skipping text nodes.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Depth-first pre-order search, including `self`.
    pub fn find_all(&self, predicate: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(predicate, &mut found);
        found
    }

    fn walk<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        if predicate(self) {
            found.push(self);
        }
        for child in self.element_children() {
            child.walk(predicate, found);
        }
    }

    pub fn find(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        self.find_all(predicate).into_iter().next()
    }

    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.find_all(&|e| e.has_class(class))
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<&Element> {
        self.find_all(&|e| e.tag == tag)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.find(&|e| e.get_attr("id") == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .class(&["card", "", "w-full"])
            .child(Element::new("h2").class(&["title"]).text("Hello"))
            .child(
                Element::new("p")
                    .class(&["body"])
                    .text("one ")
                    .child(Element::new("span").class(&["title", "small"]).text("two")),
            )
    }

    #[test]
    fn test_class_normalized() {
        let el = sample();
        assert_eq!(el.get_attr("class"), Some("card w-full"));
        assert!(el.has_class("w-full"));
        assert!(!el.has_class("card w-full"));
    }

    #[test]
    fn test_empty_class_omitted() {
        let el = Element::new("div").class(&["", " "]);
        assert!(!el.has_attr("class"));
    }

    #[test]
    fn test_attr_replaces_in_place() {
        let el = Element::new("input")
            .attr("id", "a")
            .attr("name", "n")
            .attr("id", "b");
        assert_eq!(
            el.attrs,
            vec![("id".to_string(), "b".to_string()), ("name".to_string(), "n".to_string())]
        );
    }

    #[test]
    fn test_flag_toggles() {
        let el = Element::new("button").flag("disabled", true);
        assert_eq!(el.get_attr("disabled"), Some(""));
        let el = el.flag("disabled", false);
        assert!(!el.has_attr("disabled"));
    }

    #[test]
    fn test_text_content_and_queries() {
        let el = sample();
        assert_eq!(el.text_content(), "Helloone two");
        assert_eq!(el.find_by_class("title").len(), 2);
        assert_eq!(el.find_by_tag("span")[0].text_content(), "two");
        assert!(el.find_by_id("missing").is_none());
    }
}
