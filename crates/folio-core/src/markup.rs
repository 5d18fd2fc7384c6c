#![forbid(unsafe_code)]

//! Host markup snapshots.
//!
//! The host walks its live document once at startup and sends a flat list of
//! elements in document order. Only the parts the controllers consume are
//! captured: tag, classes, attributes, parent, and an optional layout span.
//!
//! ```json
//! { "nodes": [
//!     { "id": 0, "tag": "body" },
//!     { "id": 1, "parent": 0, "tag": "header", "classes": ["header"] },
//!     { "id": 2, "parent": 1, "tag": "button", "classes": ["nav__toggle"],
//!       "attributes": { "aria-expanded": "false" } }
//! ] }
//! ```

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::geometry::Span;

/// Flat element list in document order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct PageMarkup {
    pub nodes: Vec<NodeSpec>,
}

/// One element of a [`PageMarkup`] snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct NodeSpec {
    pub id: u32,
    #[cfg_attr(feature = "config", serde(default))]
    pub parent: Option<u32>,
    pub tag: String,
    #[cfg_attr(feature = "config", serde(default))]
    pub classes: Vec<String>,
    #[cfg_attr(feature = "config", serde(default))]
    pub attributes: BTreeMap<String, String>,
    #[cfg_attr(feature = "config", serde(default))]
    pub span: Option<Span>,
}

impl NodeSpec {
    /// Element with no classes, attributes, or layout.
    #[must_use]
    pub fn new(id: u32, parent: Option<u32>, tag: impl Into<String>) -> Self {
        Self {
            id,
            parent,
            tag: tag.into(),
            ..Self::default()
        }
    }
}

impl PageMarkup {
    /// Parse a snapshot from JSON.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, MarkupError> {
        serde_json::from_str(s).map_err(MarkupError::Json)
    }
}

/// Errors from building a document out of a snapshot.
#[derive(Debug)]
pub enum MarkupError {
    /// No `<body>` element was present.
    MissingBody,
    /// Two nodes share an id.
    DuplicateId(u32),
    /// A node names a parent that does not precede it.
    UnknownParent { node: u32, parent: u32 },
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBody => write!(f, "markup has no <body> element"),
            Self::DuplicateId(id) => write!(f, "duplicate node id {id}"),
            Self::UnknownParent { node, parent } => {
                write!(f, "node {node} names unknown parent {parent}")
            }
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for MarkupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}
