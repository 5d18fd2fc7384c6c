#![forbid(unsafe_code)]

//! Navigation helpers: current-page indicator, arrow-key focus movement,
//! and the smooth anchor-scroll fallback.

use folio_core::config::PageConfig;
use folio_core::{AnchorLink, Document, KeyCode, KeyEvent, NodeId, ScrollBehavior, UiRoots};

use crate::error::MountError;

const ARIA_CURRENT: &str = "aria-current";
const DEFAULT_PAGE: &str = "index.html";

// ---------------------------------------------------------------------------
// Current-page indicator
// ---------------------------------------------------------------------------

/// Marks the navigation link that points at the current page.
pub struct PageIndicator;

impl PageIndicator {
    /// Last path segment of `pathname`, or `index.html` for a directory.
    #[must_use]
    pub fn current_page(pathname: &str) -> &str {
        match pathname.rsplit('/').next() {
            Some(last) if !last.is_empty() => last,
            _ => DEFAULT_PAGE,
        }
    }

    /// Clear every link's active marker, then mark the ones whose `href` is
    /// the current page. Returns how many were marked.
    pub fn apply<D: Document + ?Sized>(
        doc: &mut D,
        roots: &UiRoots,
        config: &PageConfig,
        pathname: &str,
    ) -> usize {
        let page = Self::current_page(pathname);
        let class = &config.classes.link_active;
        let mut marked = 0;
        for link in &roots.nav_links {
            doc.remove_class(link.node, class);
            doc.remove_attribute(link.node, ARIA_CURRENT);
            if link.href.as_deref() == Some(page) {
                doc.add_class(link.node, class);
                doc.set_attribute(link.node, ARIA_CURRENT, "page");
                marked += 1;
            }
        }
        tracing::debug!(page, marked, "page indicator");
        marked
    }
}

// ---------------------------------------------------------------------------
// Keyboard navigation
// ---------------------------------------------------------------------------

/// Arrow/Home/End focus movement between navigation links.
#[derive(Debug, Clone)]
pub struct NavKeyboard {
    nav: NodeId,
    links: Vec<NodeId>,
}

impl NavKeyboard {
    pub fn mount(roots: &UiRoots, config: &PageConfig) -> Result<Self, MountError> {
        let sel = &config.selectors;
        let nav = roots
            .nav
            .ok_or_else(|| MountError::missing("nav-keyboard", format!(".{}", sel.nav)))?;
        if roots.nav_links.is_empty() {
            return Err(MountError::missing(
                "nav-keyboard",
                format!(".{}", sel.nav_link),
            ));
        }
        Ok(Self {
            nav,
            links: roots.nav_links.iter().map(|l| l.node).collect(),
        })
    }

    /// Handle a keydown. Returns `true` if focus moved and the browser
    /// default must be prevented.
    ///
    /// When focus is inside the nav but not on a link (the toggle, say),
    /// "next" lands on the first link and "previous" on the last one.
    pub fn on_key<D: Document + ?Sized>(&self, doc: &mut D, key: &KeyEvent) -> bool {
        let Some(origin) = key.target.or_else(|| doc.focused()) else {
            return false;
        };
        if !doc.contains(self.nav, origin) {
            return false;
        }
        let last = self.links.len() - 1;
        let current = doc
            .focused()
            .and_then(|f| self.links.iter().position(|&l| l == f));
        let index = match key.code {
            KeyCode::Right | KeyCode::Down => current.map_or(0, |i| if i == last { 0 } else { i + 1 }),
            KeyCode::Left | KeyCode::Up => current.map_or(last, |i| if i == 0 { last } else { i - 1 }),
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => return false,
        };
        doc.focus(self.links[index]);
        true
    }
}

// ---------------------------------------------------------------------------
// Smooth anchor scrolling
// ---------------------------------------------------------------------------

/// Scripted smooth scrolling for in-page anchors.
///
/// Only mounted when the host lacks native CSS smooth scrolling.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    anchors: Vec<AnchorLink>,
    header_offset: f64,
}

impl SmoothScroll {
    pub fn mount(roots: &UiRoots, config: &PageConfig) -> Result<Self, MountError> {
        if roots.anchors.is_empty() {
            return Err(MountError::missing("smooth-scroll", "a[href^=\"#\"]"));
        }
        Ok(Self {
            anchors: roots.anchors.clone(),
            header_offset: config.scroll.header_offset_px,
        })
    }

    /// Handle a click. Returns `true` if the click was turned into a
    /// scripted scroll and the browser default must be prevented.
    pub fn on_click<D: Document + ?Sized>(&self, doc: &mut D, target: NodeId) -> bool {
        let Some(anchor) = self.anchors.iter().find(|a| doc.contains(a.node, target)) else {
            return false;
        };
        let Some(span) = doc
            .element_by_id(&anchor.target_id)
            .and_then(|el| doc.span(el))
        else {
            return false;
        };
        let top = (span.top - self.header_offset).max(0.0);
        doc.scroll_to(top, ScrollBehavior::Smooth);
        doc.push_hash(&format!("#{}", anchor.target_id));
        tracing::debug!(target = %anchor.target_id, top, "anchor scroll");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::MemoryDocument;

    struct Fixture {
        doc: MemoryDocument,
        links: Vec<NodeId>,
        toggle: NodeId,
        outside: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let nav = doc.append(body, "nav").class("nav").id();
        let toggle = doc.append(nav, "button").class("nav__toggle").id();
        let list = doc.append(nav, "ul").class("nav__list").id();
        let links = [("index.html", None), ("#about", Some("about")), ("#work", Some("work"))]
            .iter()
            .map(|(href, section)| {
                let el = doc.append(list, "a").class("nav__link").attr("href", href);
                match section {
                    Some(s) => el.attr("data-section", s).id(),
                    None => el.id(),
                }
            })
            .collect();
        let _about = doc
            .append(body, "section")
            .attr("id", "about")
            .span(40.0, 500.0)
            .id();
        let _work = doc
            .append(body, "section")
            .attr("id", "work")
            .span(900.0, 500.0)
            .id();
        let outside = doc.append(body, "a").attr("href", "#missing").id();
        Fixture {
            doc,
            links,
            toggle,
            outside,
        }
    }

    fn roots(f: &Fixture) -> UiRoots {
        UiRoots::discover(&f.doc, &PageConfig::default())
    }

    #[test]
    fn current_page_defaults_to_index() {
        assert_eq!(PageIndicator::current_page("/"), "index.html");
        assert_eq!(PageIndicator::current_page(""), "index.html");
        assert_eq!(PageIndicator::current_page("/site/about.html"), "about.html");
        assert_eq!(PageIndicator::current_page("/site/"), "index.html");
    }

    #[test]
    fn page_indicator_marks_matching_link_only() {
        let mut f = fixture();
        let r = roots(&f);
        f.doc.add_class(f.links[2], "nav__link--active");
        let marked = PageIndicator::apply(&mut f.doc, &r, &PageConfig::default(), "/");
        assert_eq!(marked, 1);
        assert_eq!(f.doc.attribute(f.links[0], ARIA_CURRENT), Some("page"));
        assert!(f.doc.has_class(f.links[0], "nav__link--active"));
        assert!(!f.doc.has_class(f.links[2], "nav__link--active"));
    }

    #[test]
    fn arrows_cycle_focus_with_wrap() {
        let mut f = fixture();
        let kb = NavKeyboard::mount(&roots(&f), &PageConfig::default()).unwrap();
        f.doc.focus(f.links[2]);
        let right = KeyEvent::new(KeyCode::Right).with_target(f.links[2]);
        assert!(kb.on_key(&mut f.doc, &right));
        assert_eq!(f.doc.focused(), Some(f.links[0]));
        let up = KeyEvent::new(KeyCode::Up).with_target(f.links[0]);
        assert!(kb.on_key(&mut f.doc, &up));
        assert_eq!(f.doc.focused(), Some(f.links[2]));
        let down = KeyEvent::new(KeyCode::Down).with_target(f.links[2]);
        kb.on_key(&mut f.doc, &down);
        kb.on_key(&mut f.doc, &KeyEvent::new(KeyCode::Down).with_target(f.links[0]));
        assert_eq!(f.doc.focused(), Some(f.links[1]));
    }

    #[test]
    fn home_end_and_unfocused_start() {
        let mut f = fixture();
        let kb = NavKeyboard::mount(&roots(&f), &PageConfig::default()).unwrap();
        // Focus on the toggle: inside nav, not a link.
        f.doc.focus(f.toggle);
        assert!(kb.on_key(&mut f.doc, &KeyEvent::new(KeyCode::Left).with_target(f.toggle)));
        assert_eq!(f.doc.focused(), Some(f.links[2]));
        f.doc.focus(f.toggle);
        assert!(kb.on_key(&mut f.doc, &KeyEvent::new(KeyCode::Right).with_target(f.toggle)));
        assert_eq!(f.doc.focused(), Some(f.links[0]));
        assert!(kb.on_key(&mut f.doc, &KeyEvent::new(KeyCode::End).with_target(f.links[0])));
        assert_eq!(f.doc.focused(), Some(f.links[2]));
        assert!(kb.on_key(&mut f.doc, &KeyEvent::new(KeyCode::Home).with_target(f.links[2])));
        assert_eq!(f.doc.focused(), Some(f.links[0]));
    }

    #[test]
    fn keys_outside_nav_or_unhandled_are_ignored() {
        let mut f = fixture();
        let kb = NavKeyboard::mount(&roots(&f), &PageConfig::default()).unwrap();
        let outside = KeyEvent::new(KeyCode::Down).with_target(f.outside);
        assert!(!kb.on_key(&mut f.doc, &outside));
        let letter = KeyEvent::new(KeyCode::Char('a')).with_target(f.links[0]);
        assert!(!kb.on_key(&mut f.doc, &letter));
        assert_eq!(f.doc.focused(), None);
    }

    #[test]
    fn smooth_scroll_offsets_and_pushes_hash() {
        let mut f = fixture();
        let scroll = SmoothScroll::mount(&roots(&f), &PageConfig::default()).unwrap();
        assert!(scroll.on_click(&mut f.doc, f.links[2]));
        assert_eq!(f.doc.last_scroll(), Some((820.0, ScrollBehavior::Smooth)));
        assert_eq!(f.doc.location_hash(), Some("#work"));

        // Near the top: clamped at zero.
        assert!(scroll.on_click(&mut f.doc, f.links[1]));
        assert_eq!(f.doc.last_scroll(), Some((0.0, ScrollBehavior::Smooth)));
    }

    #[test]
    fn smooth_scroll_ignores_missing_targets_and_plain_links() {
        let mut f = fixture();
        let scroll = SmoothScroll::mount(&roots(&f), &PageConfig::default()).unwrap();
        assert!(!scroll.on_click(&mut f.doc, f.outside));
        assert!(!scroll.on_click(&mut f.doc, f.links[0]));
        assert_eq!(f.doc.last_scroll(), None);
    }
}
