#![forbid(unsafe_code)]

//! Active-section highlighting.
//!
//! Every section is observed against a thin reading band near the top of
//! the viewport. When a section enters the band it becomes the active
//! section and its navigation entry gets the active class plus
//! `aria-current="page"`; every other tracked entry loses both.
//!
//! When one batch reports several sections entering at once (fast jumps,
//! resizes), they are applied in order and the last one wins. That is the
//! observed behavior, not a chosen priority.

use folio_core::config::PageConfig;
use folio_core::{Document, NodeId, SectionId, SectionRoot, UiRoots, Viewport};

use crate::error::MountError;
use crate::visibility::{VisibilityEntry, VisibilityObserver};

const ARIA_CURRENT: &str = "aria-current";

/// Owns which navigation entry is marked current.
#[derive(Debug, Clone)]
pub struct ActiveSectionTracker {
    sections: Vec<SectionRoot>,
    links: Vec<(NodeId, SectionId)>,
    observer: VisibilityObserver,
    active_class: String,
    active: Option<SectionId>,
}

impl ActiveSectionTracker {
    /// Register every section with the tracking band.
    pub fn mount(roots: &UiRoots, config: &PageConfig) -> Result<Self, MountError> {
        if roots.sections.is_empty() {
            return Err(MountError::missing(
                "active-section",
                format!("{}[id]", config.selectors.section_tag),
            ));
        }
        let links: Vec<(NodeId, SectionId)> = roots
            .nav_links
            .iter()
            .filter_map(|l| l.section.clone().map(|s| (l.node, s)))
            .collect();
        if links.is_empty() {
            return Err(MountError::missing(
                "active-section",
                format!(".{}[data-section]", config.selectors.nav_link),
            ));
        }

        let mut observer = VisibilityObserver::new(config.tracking.root_margin, 0.0);
        for section in &roots.sections {
            observer.observe(section.node);
        }
        Ok(Self {
            sections: roots.sections.clone(),
            links,
            observer,
            active_class: config.classes.link_active.clone(),
            active: None,
        })
    }

    /// Currently active section, if any section has entered the band yet.
    #[must_use]
    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// Evaluate the band for `viewport` and apply the resulting batch.
    ///
    /// Returns `true` if the active section changed.
    pub fn evaluate<D: Document + ?Sized>(&mut self, doc: &mut D, viewport: &Viewport) -> bool {
        let batch = self.observer.evaluate(viewport, |n| doc.span(n));
        self.apply(doc, &batch)
    }

    /// Apply one batch of visibility entries, in order.
    pub fn apply<D: Document + ?Sized>(&mut self, doc: &mut D, batch: &[VisibilityEntry]) -> bool {
        let before = self.active.clone();
        for entry in batch.iter().filter(|e| e.is_intersecting) {
            let Some(id) = self.section_id(entry.target).cloned() else {
                continue;
            };
            self.mark(doc, &id);
            self.active = Some(id);
        }
        let changed = self.active != before;
        if changed {
            tracing::debug!(
                from = before.as_ref().map(SectionId::as_str),
                to = self.active.as_ref().map(SectionId::as_str),
                "active section"
            );
        }
        changed
    }

    fn section_id(&self, node: NodeId) -> Option<&SectionId> {
        self.sections.iter().find(|s| s.node == node).map(|s| &s.id)
    }

    fn mark<D: Document + ?Sized>(&self, doc: &mut D, id: &SectionId) {
        for (link, _) in &self.links {
            doc.remove_class(*link, &self.active_class);
            doc.remove_attribute(*link, ARIA_CURRENT);
        }
        if let Some((link, _)) = self.links.iter().find(|(_, s)| s == id) {
            doc.add_class(*link, &self.active_class);
            doc.set_attribute(*link, ARIA_CURRENT, "page");
        }
    }
}
