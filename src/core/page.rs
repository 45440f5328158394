//! In-memory element tree that mirrors the storefront page structure.
//!
//! The [`Element`] is the fundamental unit – it holds the kind, classes,
//! attributes and text of a single page element and links to its children via
//! indices into an arena (the [`Page`] struct).  Using an arena avoids
//! recursive `Box` allocations, is cache-friendly, and makes borrowing trivial.
//!
//! The page is built once from the catalog and handed to the enhancer
//! explicitly — there is no ambient global document.

use std::time::Duration;

// ───────────────────────────────────────── element ───────────

/// What a page element is, structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// The page root.
    Document,
    /// The navigation bar holding fragment anchors.
    Nav,
    /// A titled catalog section (the target of fragment anchors).
    Section,
    /// A section heading line.
    Heading,
    /// One book card.
    Card,
    /// An in-page link (`href` attribute).
    Anchor,
    /// A clickable control.
    Button,
}

/// Index into [`Page::nodes`].
pub type ElementId = usize;

/// A single element in the arena-allocated page tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    /// Fragment identifier — what `#id` links resolve against.
    pub fragment: Option<String>,
    /// CSS-style class list.  Order is insertion order; duplicates are not
    /// stored.
    pub classes: Vec<String>,
    /// Attribute list (`name`, `value`).
    pub attrs: Vec<(String, String)>,
    /// Visible text content.
    pub text: String,
    /// Inline style slot written by the fade-in pass: how long after page
    /// ready this element's entrance animation starts.
    pub animation_delay: Option<Duration>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    /// Depth from the root (0 = root).
    pub depth: usize,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            fragment: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            text: String::new(),
            animation_delay: None,
            parent: None,
            children: Vec::new(),
            depth: 0,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }
}

// ───────────────────────────────────────── arena page ────────

/// Arena-backed page tree.
///
/// Elements are stored in a flat `Vec` and reference each other by index,
/// which avoids recursive ownership and makes traversal cheap.  All selector
/// queries return ids in document order (depth-first, siblings in insertion
/// order).
#[derive(Debug, Clone)]
pub struct Page {
    pub nodes: Vec<Element>,
    pub root: ElementId,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Create a page with a single root document element.
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new(ElementKind::Document)],
            root: 0,
        }
    }

    /// Add a child under `parent_id` and return its [`ElementId`].
    pub fn add_child(&mut self, parent_id: ElementId, mut element: Element) -> ElementId {
        let depth = self.nodes[parent_id].depth + 1;
        let id = self.nodes.len();
        element.parent = Some(parent_id);
        element.depth = depth;
        self.nodes.push(element);
        self.nodes[parent_id].children.push(id);
        id
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.nodes[id]
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.nodes[id]
    }

    /// All element ids in document order, root included.
    pub fn document_order(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.collect(self.root, &mut out);
        out
    }

    fn collect(&self, id: ElementId, out: &mut Vec<ElementId>) {
        out.push(id);
        for &child in &self.nodes[id].children {
            self.collect(child, out);
        }
    }

    // ── selector queries ────────────────────────────────────────

    /// Elements carrying `class`, in document order.
    pub fn select_class(&self, class: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// Anchors whose `href` attribute starts with `prefix`, in document order.
    pub fn select_href_prefix(&self, prefix: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|&id| {
                self.nodes[id].kind == ElementKind::Anchor
                    && self.attr(id, "href").is_some_and(|h| h.starts_with(prefix))
            })
            .collect()
    }

    /// Elements whose attribute `name` equals `value` exactly, in document
    /// order.  Controls are located by marker attribute, never by their
    /// visible label text.
    pub fn select_attr(&self, name: &str, value: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|&id| self.attr(id, name) == Some(value))
            .collect()
    }

    /// Resolve a bare fragment identifier (no leading `#`) to an element.
    pub fn element_by_fragment(&self, fragment: &str) -> Option<ElementId> {
        self.document_order()
            .into_iter()
            .find(|&id| self.nodes[id].fragment.as_deref() == Some(fragment))
    }

    // ── element accessors / mutation ────────────────────────────

    /// First value of attribute `name` on `id`.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes[id]
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.nodes[id].classes.iter().any(|c| c == class)
    }

    /// Add `class` to the element's class list (no-op if already present).
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if !self.has_class(id, class) {
            self.nodes[id].classes.push(class.to_string());
        }
    }

    /// Remove `class` from the element's class list (no-op if absent).
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.nodes[id].classes.retain(|c| c != class);
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.nodes[id].text = text.into();
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Page {
        let mut page = Page::new();
        let nav = page.add_child(page.root, Element::new(ElementKind::Nav));
        page.add_child(
            nav,
            Element::new(ElementKind::Anchor)
                .with_text("Fiction")
                .with_attr("href", "#fiction"),
        );
        let section = page.add_child(
            page.root,
            Element::new(ElementKind::Section).with_fragment("fiction"),
        );
        page.add_child(
            section,
            Element::new(ElementKind::Card).with_class("book-card"),
        );
        page.add_child(
            section,
            Element::new(ElementKind::Card).with_class("book-card"),
        );
        page
    }

    #[test]
    fn selectors_return_document_order() {
        let page = sample_page();
        let cards = page.select_class("book-card");
        assert_eq!(cards.len(), 2);
        assert!(cards[0] < cards[1]);
    }

    #[test]
    fn href_prefix_matches_only_anchors() {
        let mut page = sample_page();
        // A button with an href-looking attribute must not match.
        let section = page.select_class("book-card")[0];
        page.get_mut(section).attrs.push(("href".into(), "#x".into()));
        let anchors = page.select_href_prefix("#");
        assert_eq!(anchors.len(), 1);
        assert_eq!(page.get(anchors[0]).kind, ElementKind::Anchor);
    }

    #[test]
    fn fragment_resolution() {
        let page = sample_page();
        let section = page.element_by_fragment("fiction").expect("resolves");
        assert_eq!(page.get(section).kind, ElementKind::Section);
        assert_eq!(page.element_by_fragment("poetry"), None);
    }

    #[test]
    fn class_mutation_is_idempotent() {
        let mut page = sample_page();
        let card = page.select_class("book-card")[0];
        page.add_class(card, "fade-in");
        page.add_class(card, "fade-in");
        assert_eq!(
            page.get(card).classes.iter().filter(|c| *c == "fade-in").count(),
            1
        );
        page.remove_class(card, "fade-in");
        assert!(!page.has_class(card, "fade-in"));
    }
}
