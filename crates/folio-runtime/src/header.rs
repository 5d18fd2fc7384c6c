#![forbid(unsafe_code)]

//! Header scrolled state.
//!
//! The header gets the scrolled class once the page has moved past a small
//! threshold. Two detection strategies produce the same flag:
//!
//! - [`HeaderStrategyKind::Offset`]: compare the scroll offset against the
//!   threshold, sampled once per frame.
//! - [`HeaderStrategyKind::Sentinel`]: observe a zero-height virtual marker
//!   placed at the threshold; the header is scrolled while the marker is out
//!   of view.
//!
//! For thresholds smaller than the viewport height both agree exactly.

use folio_core::config::{HeaderStrategyKind, PageConfig};
use folio_core::{Document, NodeId, RootMargin, Span, UiRoots, Viewport};

use crate::error::MountError;
use crate::visibility::VisibilityObserver;

/// Handle for the virtual sentinel. Never present in the document.
const SENTINEL: NodeId = NodeId::new(u32::MAX);

#[derive(Debug, Clone)]
enum Strategy {
    Offset,
    Sentinel(VisibilityObserver),
}

/// Owns the header's scrolled flag.
#[derive(Debug, Clone)]
pub struct HeaderScrollState {
    header: NodeId,
    class: String,
    threshold: f64,
    strategy: Strategy,
    scrolled: bool,
}

impl HeaderScrollState {
    pub fn mount(roots: &UiRoots, config: &PageConfig) -> Result<Self, MountError> {
        let header = roots.header.ok_or_else(|| {
            MountError::missing("header", format!(".{}", config.selectors.header))
        })?;
        let strategy = match config.header.strategy {
            HeaderStrategyKind::Offset => Strategy::Offset,
            HeaderStrategyKind::Sentinel => {
                let mut observer = VisibilityObserver::new(RootMargin::ZERO, 0.0);
                observer.observe(SENTINEL);
                Strategy::Sentinel(observer)
            }
        };
        Ok(Self {
            header,
            class: config.classes.header_scrolled.clone(),
            threshold: config.header.threshold_px,
            strategy,
            scrolled: false,
        })
    }

    #[must_use]
    pub const fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Recompute the flag for `viewport` and render it.
    ///
    /// Returns `true` if the flag changed.
    pub fn update<D: Document + ?Sized>(&mut self, doc: &mut D, viewport: &Viewport) -> bool {
        let next = match &mut self.strategy {
            Strategy::Offset => viewport.scroll_y > self.threshold,
            Strategy::Sentinel(observer) => {
                let marker = Span::new(self.threshold, 0.0);
                let batch = observer.evaluate(viewport, |n| (n == SENTINEL).then_some(marker));
                match batch.last() {
                    Some(entry) => !entry.is_intersecting,
                    None => self.scrolled,
                }
            }
        };
        doc.toggle_class(self.header, &self.class, next);
        if next == self.scrolled {
            return false;
        }
        tracing::debug!(scrolled = next, scroll_y = viewport.scroll_y, "header state");
        self.scrolled = next;
        true
    }
}
