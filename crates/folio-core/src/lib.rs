#![forbid(unsafe_code)]

//! Core: events, geometry, document handles, markup discovery, and config.
//!
//! # Role in folio
//! `folio-core` is the input layer. It owns the canonical page events the
//! host pushes in, the geometry used to decide viewport visibility, and the
//! [`dom::Document`] seam through which every controller reads and writes
//! element state.
//!
//! # Primary responsibilities
//! - **PageEvent**: canonical input events (click, key, scroll, resize, layout).
//! - **Geometry**: document spans, the viewport, and CSS-style root margins.
//! - **Document**: the injected UI-root handle, plus [`memory::MemoryDocument`]
//!   which records every mutation in a journal the host can replay.
//! - **UiRoots**: one-shot discovery of the markup the controllers need.
//! - **PageConfig**: policy-as-data for class names, bands, and thresholds.
//!
//! # How it fits in the system
//! The runtime (`folio-runtime`) consumes `PageEvent` values and drives the
//! page controllers against a `Document`. The web runner (`folio-web`) builds
//! a `MemoryDocument` from a host markup snapshot and ships the journal back
//! to JavaScript.

pub mod config;
pub mod dom;
pub mod event;
pub mod geometry;
pub mod markup;
pub mod memory;
pub mod roots;

pub use config::{PageConfig, PageConfigError};
pub use dom::{DomCommand, Document, NodeId, ScrollBehavior};
pub use event::{KeyCode, KeyEvent, Modifiers, PageEvent};
pub use geometry::{Inset, MarginParseError, RootMargin, Span, Viewport};
pub use markup::{MarkupError, NodeSpec, PageMarkup};
pub use memory::MemoryDocument;
pub use roots::{AnchorLink, Animatable, NavLink, SectionId, SectionRoot, UiRoots};
