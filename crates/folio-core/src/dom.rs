#![forbid(unsafe_code)]

//! The document seam.
//!
//! Controllers never look elements up globally. They receive [`NodeId`]
//! handles at mount time and read or write element state through a
//! [`Document`] implementation injected by the host. Tests use
//! [`crate::memory::MemoryDocument`]; a browser host applies the resulting
//! [`DomCommand`] journal to the live DOM.

use std::fmt;

use crate::geometry::Span;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw host id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw host id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a programmatic scroll should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump immediately.
    #[default]
    Auto,
    /// Animate smoothly.
    Smooth,
}

impl ScrollBehavior {
    /// The CSS `scroll-behavior` keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Smooth => "smooth",
        }
    }
}

/// One applied document mutation, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum DomCommand {
    AddClass { node: NodeId, class: String },
    RemoveClass { node: NodeId, class: String },
    SetAttribute { node: NodeId, name: String, value: String },
    RemoveAttribute { node: NodeId, name: String },
    /// An empty `value` clears the inline property.
    SetStyle { node: NodeId, property: String, value: String },
    Focus { node: NodeId },
    ScrollTo { top: f64, behavior: ScrollBehavior },
    PushHash { hash: String },
}

impl DomCommand {
    /// Short operation name, stable across releases, for host dispatch.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::AddClass { .. } => "add_class",
            Self::RemoveClass { .. } => "remove_class",
            Self::SetAttribute { .. } => "set_attribute",
            Self::RemoveAttribute { .. } => "remove_attribute",
            Self::SetStyle { .. } => "set_style",
            Self::Focus { .. } => "focus",
            Self::ScrollTo { .. } => "scroll_to",
            Self::PushHash { .. } => "push_hash",
        }
    }
}

/// Read/write access to the page's elements.
///
/// Writes must be idempotent: adding a class that is already present or
/// setting an attribute to its current value is a no-op.
pub trait Document {
    /// The `<body>` element.
    fn body(&self) -> NodeId;

    /// Every element, in document order.
    fn node_ids(&self) -> Vec<NodeId>;

    /// Lower-case tag name.
    fn tag(&self, node: NodeId) -> Option<&str>;

    /// Parent element, `None` for the root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Inline style property, `None` when unset.
    fn style(&self, node: NodeId, property: &str) -> Option<&str>;

    /// Layout box in document coordinates, if the host reported one.
    fn span(&self, node: NodeId) -> Option<Span>;

    /// Element holding keyboard focus.
    fn focused(&self) -> Option<NodeId>;

    /// Record a layout box reported by the host. Not a page mutation.
    fn set_span(&mut self, node: NodeId, span: Span);

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// Set an inline style property; an empty value clears it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn focus(&mut self, node: NodeId);

    /// Scroll the window to a document offset.
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Push `hash` (including the leading `#`) onto history without jumping.
    fn push_hash(&mut self, hash: &str);

    /// Add or remove `class` depending on `on`.
    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// `true` if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Nearest inclusive ancestor carrying `class`.
    fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Nearest inclusive ancestor with tag `tag`.
    fn closest_with_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.tag(current) == Some(tag) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// All elements carrying `class`, in document order.
    fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.node_ids()
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    /// First element carrying `class`.
    fn first_with_class(&self, class: &str) -> Option<NodeId> {
        self.node_ids()
            .into_iter()
            .find(|&n| self.has_class(n, class))
    }

    /// Element whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.node_ids()
            .into_iter()
            .find(|&n| self.attribute(n, "id") == Some(id))
    }
}
