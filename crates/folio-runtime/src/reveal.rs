#![forbid(unsafe_code)]

//! One-shot scroll reveal.
//!
//! At mount every animatable element is tagged with the pending class, and
//! elements inside a grid container get a stagger class so siblings fade in
//! one after another. The first time an element crosses the reveal band it
//! gets the revealed class and is unobserved; it never reverts.
//!
//! Under reduced motion the page never mounts this component, so nothing is
//! tagged and the content shows unanimated.

use ahash::AHashMap;

use folio_core::config::{PageConfig, RevealConfig};
use folio_core::{Document, NodeId, UiRoots, Viewport};

use crate::error::MountError;
use crate::visibility::VisibilityObserver;

/// Reveal progress of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealed,
}

/// Owns the reveal flags of every animatable element.
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    elements: Vec<(NodeId, RevealState)>,
    observer: VisibilityObserver,
    revealed_class: String,
}

impl RevealAnimator {
    /// Tag every animatable element and start observing it.
    pub fn mount<D: Document + ?Sized>(
        doc: &mut D,
        roots: &UiRoots,
        config: &PageConfig,
    ) -> Result<Self, MountError> {
        let reveal = &config.reveal;
        if roots.animatables.is_empty() {
            let classes: Vec<String> = reveal
                .animatable_classes
                .iter()
                .map(|c| format!(".{c}"))
                .collect();
            return Err(MountError::missing("reveal", classes.join(", ")));
        }

        let mut observer = VisibilityObserver::new(reveal.root_margin, reveal.threshold);
        let mut per_grid: AHashMap<NodeId, usize> = AHashMap::new();
        let mut elements = Vec::with_capacity(roots.animatables.len());
        for item in &roots.animatables {
            doc.add_class(item.node, &reveal.pending_class);
            if let Some(grid) = item.grid {
                let index = per_grid.entry(grid).or_insert(0);
                doc.add_class(item.node, &stagger_class(reveal, *index));
                *index += 1;
            }
            observer.observe(item.node);
            elements.push((item.node, RevealState::Pending));
        }
        tracing::debug!(
            elements = elements.len(),
            grids = per_grid.len(),
            "reveal mounted"
        );

        Ok(Self {
            elements,
            observer,
            revealed_class: reveal.revealed_class.clone(),
        })
    }

    /// Reveal every element that crossed the band. Returns how many were
    /// revealed by this call.
    pub fn evaluate<D: Document + ?Sized>(&mut self, doc: &mut D, viewport: &Viewport) -> usize {
        let batch = self.observer.evaluate(viewport, |n| doc.span(n));
        let mut revealed = 0;
        for entry in batch.iter().filter(|e| e.is_intersecting) {
            let Some(slot) = self.elements.iter_mut().find(|(n, _)| *n == entry.target) else {
                continue;
            };
            if slot.1 == RevealState::Revealed {
                continue;
            }
            slot.1 = RevealState::Revealed;
            doc.add_class(entry.target, &self.revealed_class);
            self.observer.unobserve(entry.target);
            revealed += 1;
        }
        if revealed > 0 {
            tracing::debug!(
                revealed,
                remaining = self.observer.len(),
                "reveal batch"
            );
        }
        revealed
    }

    #[must_use]
    pub fn state(&self, node: NodeId) -> Option<RevealState> {
        self.elements
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, s)| *s)
    }

    #[must_use]
    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.state(node) == Some(RevealState::Revealed)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|(_, s)| *s == RevealState::Revealed)
            .count()
    }

    /// `true` once every element has been revealed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.observer.is_empty()
    }
}

fn stagger_class(reveal: &RevealConfig, index: usize) -> String {
    let steps = reveal.stagger_steps.max(1);
    format!("{}{}", reveal.stagger_class_prefix, index % steps + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::MemoryDocument;

    fn build() -> (MemoryDocument, NodeId, Vec<NodeId>) {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let title = doc
            .append(body, "h2")
            .class("section__title")
            .span(100.0, 40.0)
            .id();
        let grid = doc.append(body, "div").class("grid").id();
        let cards = (0..7)
            .map(|i| {
                doc.append(grid, "article")
                    .class("card")
                    .span(900.0 + f64::from(i) * 300.0, 200.0)
                    .id()
            })
            .collect();
        (doc, title, cards)
    }

    fn mount(doc: &mut MemoryDocument) -> RevealAnimator {
        let config = PageConfig::default();
        let roots = UiRoots::discover(doc, &config);
        RevealAnimator::mount(doc, &roots, &config).unwrap()
    }

    #[test]
    fn mount_tags_pending_and_staggers_within_grid() {
        let (mut doc, title, cards) = build();
        let _anim = mount(&mut doc);
        assert_eq!(doc.classes(title), vec!["section__title", "reveal"]);
        let staggers: Vec<String> = cards
            .iter()
            .map(|&c| doc.classes(c)[2].to_string())
            .collect();
        assert_eq!(
            staggers,
            vec![
                "stagger-1",
                "stagger-2",
                "stagger-3",
                "stagger-4",
                "stagger-5",
                "stagger-1",
                "stagger-2"
            ]
        );
    }

    #[test]
    fn reveals_once_and_never_reverts() {
        let (mut doc, title, cards) = build();
        let mut anim = mount(&mut doc);
        // Band is 0..750: title visible, first card (900..1100) not.
        let vp = Viewport::new(1280.0, 800.0);
        assert_eq!(anim.evaluate(&mut doc, &vp), 1);
        assert!(anim.is_revealed(title));
        assert!(doc.has_class(title, "reveal--visible"));
        assert!(!anim.is_revealed(cards[0]));

        // Scroll away: title stays revealed.
        assert_eq!(anim.evaluate(&mut doc, &vp.scrolled_to(5000.0)), 0);
        assert!(anim.is_revealed(title));
        assert!(doc.has_class(title, "reveal--visible"));
        assert!(doc.has_class(title, "reveal"));
    }

    #[test]
    fn threshold_needs_ten_percent_visible() {
        let (mut doc, _title, cards) = build();
        let mut anim = mount(&mut doc);
        // Band 0..750 at scroll 0; scroll 165 puts the band at 165..915,
        // 15px of the 200px first card (7.5%).
        anim.evaluate(&mut doc, &Viewport::new(1280.0, 800.0).scrolled_to(165.0));
        assert!(!anim.is_revealed(cards[0]));
        // Scroll 200: band 200..950, 50px visible (25%).
        anim.evaluate(&mut doc, &Viewport::new(1280.0, 800.0).scrolled_to(200.0));
        assert!(anim.is_revealed(cards[0]));
    }

    #[test]
    fn everything_revealed_eventually() {
        let (mut doc, _title, _cards) = build();
        let mut anim = mount(&mut doc);
        let mut y = 0.0;
        while y < 4000.0 {
            anim.evaluate(&mut doc, &Viewport::new(1280.0, 800.0).scrolled_to(y));
            y += 100.0;
        }
        assert_eq!(anim.revealed_count(), 8);
        assert!(anim.is_done());
    }

    #[test]
    fn mount_without_animatables_fails() {
        let mut doc = MemoryDocument::new();
        let config = PageConfig::default();
        let roots = UiRoots::discover(&doc, &config);
        let err = RevealAnimator::mount(&mut doc, &roots, &config).unwrap_err();
        assert_eq!(err.component(), "reveal");
    }
}
