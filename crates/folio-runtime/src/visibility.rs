#![forbid(unsafe_code)]

//! Viewport visibility subscriptions.
//!
//! A [`VisibilityObserver`] is the host-independent stand-in for the
//! platform intersection watcher. Targets are registered once; each
//! evaluation against a [`Viewport`] yields a batch of [`VisibilityEntry`]
//! values for targets whose intersecting state changed.
//!
//! # How it works
//!
//! 1. `observe()` registers a target with no known state.
//! 2. The first evaluation after registration always reports the target,
//!    intersecting or not (the platform watcher does the same).
//! 3. Later evaluations report only transitions.
//! 4. Entries in a batch follow registration order.
//!
//! Targets without a layout span are skipped until the host reports one.

use folio_core::{NodeId, RootMargin, Span, Viewport};

/// One visibility change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
    /// Fraction of the target inside the band.
    pub ratio: f64,
}

#[derive(Debug, Clone)]
struct Observed {
    node: NodeId,
    last: Option<bool>,
}

/// Tracks which targets intersect a margin-adjusted viewport band.
#[derive(Debug, Clone)]
pub struct VisibilityObserver {
    margin: RootMargin,
    threshold: f64,
    targets: Vec<Observed>,
}

impl VisibilityObserver {
    /// Create an observer.
    ///
    /// `threshold` is the minimum visible fraction that counts as
    /// intersecting; `0.0` means any contact with the band.
    #[must_use]
    pub fn new(margin: RootMargin, threshold: f64) -> Self {
        Self {
            margin,
            threshold: threshold.clamp(0.0, 1.0),
            targets: Vec::new(),
        }
    }

    /// Start observing `node`. Observing twice is a no-op.
    pub fn observe(&mut self, node: NodeId) {
        if !self.is_observing(node) {
            self.targets.push(Observed { node, last: None });
        }
    }

    /// Stop observing `node`.
    pub fn unobserve(&mut self, node: NodeId) {
        self.targets.retain(|t| t.node != node);
    }

    #[must_use]
    pub fn is_observing(&self, node: NodeId) -> bool {
        self.targets.iter().any(|t| t.node == node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub const fn margin(&self) -> RootMargin {
        self.margin
    }

    /// The band targets are tested against for `viewport`.
    #[must_use]
    pub fn band(&self, viewport: &Viewport) -> Span {
        self.margin.band(viewport)
    }

    /// Evaluate every target against `viewport`.
    ///
    /// `span_of` supplies each target's layout box in document coordinates.
    pub fn evaluate(
        &mut self,
        viewport: &Viewport,
        span_of: impl Fn(NodeId) -> Option<Span>,
    ) -> Vec<VisibilityEntry> {
        let band = self.margin.band(viewport);
        let threshold = self.threshold;
        let mut batch = Vec::new();
        for target in &mut self.targets {
            let Some(span) = span_of(target.node) else {
                continue;
            };
            let touching = span.overlap(&band).is_some();
            let ratio = span.visible_ratio(&band);
            let is_intersecting = touching && (threshold <= 0.0 || ratio >= threshold);
            if target.last != Some(is_intersecting) {
                target.last = Some(is_intersecting);
                batch.push(VisibilityEntry {
                    target: target.node,
                    is_intersecting,
                    ratio,
                });
            }
        }
        if !batch.is_empty() {
            tracing::trace!(
                entries = batch.len(),
                band_top = band.top,
                band_height = band.height,
                "visibility batch"
            );
        }
        batch
    }
}
