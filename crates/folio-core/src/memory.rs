#![forbid(unsafe_code)]

//! In-memory [`Document`] with a mutation journal.
//!
//! `MemoryDocument` is both the test double for every controller and the
//! mirror the web runner keeps of the live page: mutations are applied
//! locally (so later reads see them) and appended to a journal the host
//! drains and replays against the real DOM.
//!
//! Only effective mutations are journaled. Adding a class that is already
//! present records nothing.

use ahash::AHashMap;

use crate::dom::{DomCommand, Document, NodeId, ScrollBehavior};
use crate::geometry::Span;
use crate::markup::{MarkupError, PageMarkup};

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    parent: Option<NodeId>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    span: Option<Span>,
}

/// In-memory element tree.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    order: Vec<NodeId>,
    elements: AHashMap<NodeId, Element>,
    body: NodeId,
    next_id: u32,
    focused: Option<NodeId>,
    scroll: Option<(f64, ScrollBehavior)>,
    hash: Option<String>,
    journal: Vec<DomCommand>,
}

impl MemoryDocument {
    /// A document holding only `<body>` (id 0).
    #[must_use]
    pub fn new() -> Self {
        let body = NodeId::new(0);
        let mut elements = AHashMap::new();
        elements.insert(
            body,
            Element {
                tag: "body".into(),
                ..Element::default()
            },
        );
        Self {
            order: vec![body],
            elements,
            body,
            next_id: 1,
            focused: None,
            scroll: None,
            hash: None,
            journal: Vec::new(),
        }
    }

    /// Build a document from a host snapshot.
    pub fn from_markup(markup: &PageMarkup) -> Result<Self, MarkupError> {
        let body = markup
            .nodes
            .iter()
            .find(|n| n.tag.eq_ignore_ascii_case("body"))
            .map(|n| NodeId::new(n.id))
            .ok_or(MarkupError::MissingBody)?;

        let mut elements = AHashMap::with_capacity(markup.nodes.len());
        let mut order = Vec::with_capacity(markup.nodes.len());
        for spec in &markup.nodes {
            let id = NodeId::new(spec.id);
            if elements.contains_key(&id) {
                return Err(MarkupError::DuplicateId(spec.id));
            }
            if let Some(parent) = spec.parent {
                if !elements.contains_key(&NodeId::new(parent)) {
                    return Err(MarkupError::UnknownParent {
                        node: spec.id,
                        parent,
                    });
                }
            }
            let mut classes: Vec<String> = Vec::with_capacity(spec.classes.len());
            for class in &spec.classes {
                if !classes.contains(class) {
                    classes.push(class.clone());
                }
            }
            elements.insert(
                id,
                Element {
                    tag: spec.tag.to_ascii_lowercase(),
                    parent: spec.parent.map(NodeId::new),
                    classes,
                    attributes: spec
                        .attributes
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                    styles: Vec::new(),
                    span: spec.span,
                },
            );
            order.push(id);
        }

        let next_id = markup.nodes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        Ok(Self {
            order,
            elements,
            body,
            next_id,
            focused: None,
            scroll: None,
            hash: None,
            journal: Vec::new(),
        })
    }

    /// Append a new element under `parent` (construction; not journaled).
    pub fn append(&mut self, parent: NodeId, tag: &str) -> ElementMut<'_> {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            Element {
                tag: tag.to_ascii_lowercase(),
                parent: Some(parent),
                ..Element::default()
            },
        );
        // Keep document order: after the parent's last descendant.
        let insert_at = self
            .order
            .iter()
            .rposition(|&n| self.is_inclusive_descendant(n, parent))
            .map_or(self.order.len(), |i| i + 1);
        self.order.insert(insert_at, id);
        ElementMut { doc: self, id }
    }

    fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        Document::contains(self, ancestor, node)
    }

    /// Commands recorded since the last [`take_journal`](Self::take_journal).
    #[must_use]
    pub fn journal(&self) -> &[DomCommand] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_journal(&mut self) -> Vec<DomCommand> {
        std::mem::take(&mut self.journal)
    }

    /// Last programmatic scroll request.
    #[must_use]
    pub fn last_scroll(&self) -> Option<(f64, ScrollBehavior)> {
        self.scroll
    }

    /// Last hash pushed onto history.
    #[must_use]
    pub fn location_hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Classes on `node`, in insertion order.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.elements
            .get(&node)
            .map(|el| el.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn record(&mut self, command: DomCommand) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "folio.dom", op = command.op(), ?command, "journal");
        self.journal.push(command);
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn body(&self) -> NodeId {
        self.body
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.order.clone()
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.elements.get(&node).map(|el| el.tag.as_str())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.elements.get(&node).and_then(|el| el.parent)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.elements
            .get(&node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.elements.get(&node).and_then(|el| {
            el.attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        })
    }

    fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.elements.get(&node).and_then(|el| {
            el.styles
                .iter()
                .find(|(k, _)| k == property)
                .map(|(_, v)| v.as_str())
        })
    }

    fn span(&self, node: NodeId) -> Option<Span> {
        self.elements.get(&node).and_then(|el| el.span)
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn set_span(&mut self, node: NodeId, span: Span) {
        if let Some(el) = self.elements.get_mut(&node) {
            el.span = Some(span);
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let Some(el) = self.elements.get_mut(&node) else {
            return;
        };
        if el.classes.iter().any(|c| c == class) {
            return;
        }
        el.classes.push(class.to_string());
        self.record(DomCommand::AddClass {
            node,
            class: class.to_string(),
        });
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(el) = self.elements.get_mut(&node) else {
            return;
        };
        let before = el.classes.len();
        el.classes.retain(|c| c != class);
        if el.classes.len() != before {
            self.record(DomCommand::RemoveClass {
                node,
                class: class.to_string(),
            });
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(el) = self.elements.get_mut(&node) else {
            return;
        };
        match el.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) if v == value => return,
            Some((_, v)) => *v = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
        self.record(DomCommand::SetAttribute {
            node,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(el) = self.elements.get_mut(&node) else {
            return;
        };
        let before = el.attributes.len();
        el.attributes.retain(|(k, _)| k != name);
        if el.attributes.len() != before {
            self.record(DomCommand::RemoveAttribute {
                node,
                name: name.to_string(),
            });
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(el) = self.elements.get_mut(&node) else {
            return;
        };
        let existing = el.styles.iter().position(|(k, _)| k == property);
        match (existing, value.is_empty()) {
            (None, true) => return,
            (Some(i), true) => {
                el.styles.remove(i);
            }
            (Some(i), false) if el.styles[i].1 == value => return,
            (Some(i), false) => el.styles[i].1 = value.to_string(),
            (None, false) => el.styles.push((property.to_string(), value.to_string())),
        }
        self.record(DomCommand::SetStyle {
            node,
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    fn focus(&mut self, node: NodeId) {
        if !self.elements.contains_key(&node) || self.focused == Some(node) {
            return;
        }
        self.focused = Some(node);
        self.record(DomCommand::Focus { node });
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll = Some((top, behavior));
        self.record(DomCommand::ScrollTo { top, behavior });
    }

    fn push_hash(&mut self, hash: &str) {
        self.hash = Some(hash.to_string());
        self.record(DomCommand::PushHash {
            hash: hash.to_string(),
        });
    }
}

/// Builder handle returned by [`MemoryDocument::append`].
pub struct ElementMut<'a> {
    doc: &'a mut MemoryDocument,
    id: NodeId,
}

impl ElementMut<'_> {
    /// Add a class.
    #[must_use]
    pub fn class(self, class: &str) -> Self {
        if let Some(el) = self.doc.elements.get_mut(&self.id) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(self, name: &str, value: &str) -> Self {
        if let Some(el) = self.doc.elements.get_mut(&self.id) {
            el.attributes.retain(|(k, _)| k != name);
            el.attributes.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Set the layout box.
    #[must_use]
    pub fn span(self, top: f64, height: f64) -> Self {
        self.doc.set_span(self.id, Span::new(top, height));
        self
    }

    /// Finish building and return the new element's id.
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }
}
