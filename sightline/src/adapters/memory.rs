// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host.
//!
//! ## Selectors
//!
//! [`MemoryHost`] understands comma-separated lists of compound selectors
//! built from:
//!
//! - a tag name or `*`,
//! - `#id`,
//! - `.class`,
//! - `[attr]`, `[attr=value]`, and `[attr="value"]`.
//!
//! Tag and attribute names are case-insensitive. Combinators (descendant,
//! child, sibling) and pseudo-classes are not supported; a selector using
//! them matches nothing.
//!
//! ```
//! use kurbo::Rect;
//! use sightline::Host;
//! use sightline::adapters::memory::MemoryHost;
//!
//! let mut host = MemoryHost::new();
//! let play = host.element("button").id("play").class("control").rect(Rect::new(0.0, 0.0, 40.0, 40.0)).build();
//! let link = host.element("a").class("control").attr("href", "#").build();
//!
//! assert_eq!(host.query_selector_all(".control"), vec![play, link]);
//! assert!(host.matches(play, "button#play.control"));
//! assert!(host.matches(link, "div, [href]"));
//! assert_eq!(host.bounding_rect(link), None);
//! ```

use std::collections::BTreeMap;

use kurbo::{Rect, Size};

use crate::host::Host;

/// Handle to an element of a [`MemoryHost`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Position of the element in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    rect: Option<Rect>,
}

impl Node {
    fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_whitespace()
    }
}

/// A flat list of elements with bounds, attributes, and a focus slot.
#[derive(Clone, Debug)]
pub struct MemoryHost {
    nodes: Vec<Node>,
    viewport: Size,
    active: Option<ElementId>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::with_viewport(Size::new(1920.0, 1080.0))
    }
}

impl MemoryHost {
    /// An empty scene with a 1920×1080 viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty scene with the given viewport size.
    pub fn with_viewport(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            viewport,
            active: None,
        }
    }

    /// Start building an element with tag `tag`.
    pub fn element(&mut self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder {
            host: self,
            node: Node {
                tag: tag.to_ascii_lowercase(),
                attributes: BTreeMap::new(),
                rect: None,
            },
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        (0..self.nodes.len()).map(ElementId)
    }

    /// Move, resize, or detach (`None`) an element.
    pub fn set_rect(&mut self, element: ElementId, rect: Option<Rect>) {
        if let Some(node) = self.nodes.get_mut(element.index()) {
            node.rect = rect;
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(node) = self.nodes.get_mut(element.index()) {
            node.attributes.remove(&name.to_ascii_lowercase());
        }
    }

    /// Tag name of an element.
    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(element.index()).map(|n| n.tag.as_str())
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }
}

/// Builder returned by [`MemoryHost::element`].
#[derive(Debug)]
pub struct ElementBuilder<'a> {
    host: &'a mut MemoryHost,
    node: Node,
}

impl ElementBuilder<'_> {
    /// Set the `id` attribute.
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class.
    pub fn class(mut self, class: &str) -> Self {
        let classes = self.node.attributes.entry("class".into()).or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.node
            .attributes
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set the element's bounds. Elements without bounds are detached.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.node.rect = Some(rect);
        self
    }

    /// Add the element to the scene.
    pub fn build(self) -> ElementId {
        let id = ElementId(self.host.nodes.len());
        self.host.nodes.push(self.node);
        id
    }
}

/// One compound selector, such as `div#menu.item[data-x="1"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        self.tag.as_ref().is_none_or(|t| *t == node.tag)
            && self
                .ids
                .iter()
                .all(|id| node.attributes.get("id") == Some(id))
            && self
                .classes
                .iter()
                .all(|c| node.classes().any(|nc| nc == c))
            && self.attributes.iter().all(|(name, value)| {
                match (node.attributes.get(name), value) {
                    (Some(_), None) => true,
                    (Some(actual), Some(expected)) => actual == expected,
                    (None, _) => false,
                }
            })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_name(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_name_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn parse_compound(s: &str) -> Option<Compound> {
    let mut out = Compound::default();
    let mut rest = s;
    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let (tag, after) = take_name(rest);
        if !tag.is_empty() {
            out.tag = Some(tag.to_ascii_lowercase());
        }
        rest = after;
    }
    while let Some(c) = rest.chars().next() {
        match c {
            '#' | '.' => {
                let (name, after) = take_name(&rest[1..]);
                if name.is_empty() {
                    return None;
                }
                if c == '#' {
                    out.ids.push(name.into());
                } else {
                    out.classes.push(name.into());
                }
                rest = after;
            }
            '[' => {
                let close = rest.find(']')?;
                let body = rest[1..close].trim();
                rest = &rest[close + 1..];
                let (name, value) = match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim();
                        let value = value
                            .strip_prefix('"')
                            .and_then(|v| v.strip_suffix('"'))
                            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                            .unwrap_or(value);
                        (name.trim(), Some(value.to_owned()))
                    }
                    None => (body, None),
                };
                if name.is_empty() || !name.chars().all(is_name_char) {
                    return None;
                }
                out.attributes.push((name.to_ascii_lowercase(), value));
            }
            _ => return None,
        }
    }
    (out != Compound::default() || s == "*").then_some(out)
}

/// Parse a selector list. Returns `None` if any part is unsupported.
fn parse_list(selector: &str) -> Option<Vec<Compound>> {
    selector
        .split(',')
        .map(|part| parse_compound(part.trim()))
        .collect()
}

impl Host for MemoryHost {
    type Element = ElementId;

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.nodes.get(element.index())?.rect
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(list) = parse_list(selector) else {
            return Vec::new();
        };
        self.elements()
            .filter(|&e| {
                let node = &self.nodes[e.index()];
                list.iter().any(|c| c.matches(node))
            })
            .collect()
    }

    fn matches(&self, element: ElementId, selector: &str) -> bool {
        let (Some(node), Some(list)) = (self.nodes.get(element.index()), parse_list(selector))
        else {
            return false;
        };
        list.iter().any(|c| c.matches(node))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes
            .get(element.index())?
            .attributes
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element.index()) {
            node.attributes
                .insert(name.to_ascii_lowercase(), value.into());
        }
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn focus(&mut self, element: ElementId) {
        if element.index() < self.nodes.len() {
            self.active = Some(element);
        }
    }

    fn blur(&mut self, element: ElementId) {
        if self.active == Some(element) {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_compound_selectors() {
        assert_eq!(
            parse_compound(r#"DIV#a.b[data-x="1"][hidden]"#),
            Some(Compound {
                tag: Some("div".into()),
                ids: vec!["a".into()],
                classes: vec!["b".into()],
                attributes: vec![
                    ("data-x".into(), Some("1".into())),
                    ("hidden".into(), None)
                ],
            })
        );
        assert_eq!(parse_compound("*"), Some(Compound::default()));
        assert_eq!(parse_compound(""), None);
        assert_eq!(parse_compound("div > a"), None);
        assert_eq!(parse_compound("a:hover"), None);
        assert_eq!(parse_compound("[unterminated"), None);
        assert!(parse_list("a, , b").is_none());
    }

    #[test]
    fn default_ignore_list_parses() {
        let list = parse_list(crate::config::DEFAULT_TAB_INDEX_IGNORE_LIST).unwrap();
        assert_eq!(list.len(), 7);
        assert_eq!(
            list[6].attributes,
            vec![("contenteditable".to_owned(), Some("true".to_owned()))]
        );
    }

    #[test]
    fn queries_follow_creation_order() {
        let mut host = MemoryHost::new();
        let a = host.element("li").class("x").build();
        let b = host.element("li").build();
        let c = host.element("p").class("x y").build();
        assert_eq!(host.query_selector_all("li"), vec![a, b]);
        assert_eq!(host.query_selector_all(".x"), vec![a, c]);
        assert_eq!(host.query_selector_all(".y, li.x"), vec![a, c]);
        assert_eq!(host.query_selector_all("*").len(), 3);
        assert!(host.query_selector_all("li:first-child").is_empty());
    }

    #[test]
    fn attributes_are_case_insensitive() {
        let mut host = MemoryHost::new();
        let e = host.element("div").attr("contentEditable", "true").build();
        assert!(host.matches(e, "[contentEditable=true]"));
        assert_eq!(host.attribute(e, "CONTENTEDITABLE").as_deref(), Some("true"));
        host.set_attribute(e, "TabIndex", "-1");
        assert!(host.has_attribute(e, "tabindex"));
        host.remove_attribute(e, "tabindex");
        assert!(!host.has_attribute(e, "tabindex"));
    }

    #[test]
    fn focus_slot() {
        let mut host = MemoryHost::new();
        let a = host.element("div").build();
        let b = host.element("div").build();
        host.focus(a);
        host.blur(b);
        assert_eq!(host.active_element(), Some(a));
        host.focus(b);
        assert_eq!(host.active_element(), Some(b));
        host.blur(b);
        assert_eq!(host.active_element(), None);
        host.focus(ElementId(99));
        assert_eq!(host.active_element(), None);
    }
}
