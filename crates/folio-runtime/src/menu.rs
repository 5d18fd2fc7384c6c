#![forbid(unsafe_code)]

//! Mobile navigation menu.
//!
//! [`MenuState`] is the only source of truth. The list's open class, the
//! toggle's `aria-expanded`, and the body scroll lock are all rendered from
//! it in one place, so they cannot disagree after a transition.
//!
//! # Triggers
//!
//! | input | effect |
//! |-------|--------|
//! | click on toggle, Enter/Space on toggle | toggle |
//! | click on a navigation link | close |
//! | click outside toggle and list | close |
//! | Escape while open | focus toggle, then close |

use folio_core::config::PageConfig;
use folio_core::{Document, KeyCode, KeyEvent, NodeId, UiRoots};

use crate::error::MountError;

const ARIA_EXPANDED: &str = "aria-expanded";
const OVERFLOW: &str = "overflow";
const SCROLL_LOCK: &str = "hidden";

/// Open/closed state of the mobile navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    const fn aria_expanded(self) -> &'static str {
        match self {
            Self::Open => "true",
            Self::Closed => "false",
        }
    }
}

/// What caused a menu transition. Logged only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTrigger {
    Toggle,
    NavLink,
    Outside,
    Escape,
    Api,
}

/// Owns the open/closed state of the mobile navigation.
#[derive(Debug, Clone)]
pub struct MenuController {
    toggle: NodeId,
    list: NodeId,
    links: Vec<NodeId>,
    open_class: String,
    state: MenuState,
}

impl MenuController {
    /// Mount against the discovered markup and render the closed state.
    pub fn mount<D: Document + ?Sized>(
        doc: &mut D,
        roots: &UiRoots,
        config: &PageConfig,
    ) -> Result<Self, MountError> {
        let sel = &config.selectors;
        let toggle = roots
            .toggle
            .ok_or_else(|| MountError::missing("menu", format!(".{}", sel.toggle)))?;
        let list = roots
            .nav_list
            .ok_or_else(|| MountError::missing("menu", format!(".{}", sel.nav_list)))?;
        let links = roots
            .nav_links
            .iter()
            .map(|l| l.node)
            .filter(|&l| doc.contains(list, l))
            .collect();

        let menu = Self {
            toggle,
            list,
            links,
            open_class: config.classes.menu_open.clone(),
            state: MenuState::Closed,
        };
        menu.render(doc);
        Ok(menu)
    }

    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open()
    }

    #[must_use]
    pub const fn toggle_button(&self) -> NodeId {
        self.toggle
    }

    /// Open the menu and lock body scrolling. No-op if already open.
    pub fn open<D: Document + ?Sized>(&mut self, doc: &mut D) -> bool {
        self.transition(doc, MenuState::Open, MenuTrigger::Api)
    }

    /// Close the menu and restore body scrolling. No-op if already closed.
    pub fn close<D: Document + ?Sized>(&mut self, doc: &mut D) -> bool {
        self.transition(doc, MenuState::Closed, MenuTrigger::Api)
    }

    /// Flip the menu.
    pub fn toggle<D: Document + ?Sized>(&mut self, doc: &mut D) -> bool {
        self.flip(doc, MenuTrigger::Api)
    }

    fn flip<D: Document + ?Sized>(&mut self, doc: &mut D, trigger: MenuTrigger) -> bool {
        let next = if self.state.is_open() {
            MenuState::Closed
        } else {
            MenuState::Open
        };
        self.transition(doc, next, trigger)
    }

    fn transition<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        next: MenuState,
        trigger: MenuTrigger,
    ) -> bool {
        if self.state == next {
            return false;
        }
        tracing::debug!(from = ?self.state, to = ?next, ?trigger, "menu transition");
        self.state = next;
        self.render(doc);
        true
    }

    fn render<D: Document + ?Sized>(&self, doc: &mut D) {
        let open = self.state.is_open();
        doc.set_attribute(self.toggle, ARIA_EXPANDED, self.state.aria_expanded());
        doc.toggle_class(self.list, &self.open_class, open);
        let body = doc.body();
        doc.set_style(body, OVERFLOW, if open { SCROLL_LOCK } else { "" });
    }

    /// Handle a click anywhere on the page.
    pub fn on_click<D: Document + ?Sized>(&mut self, doc: &mut D, target: NodeId) {
        if doc.contains(self.toggle, target) {
            self.flip(doc, MenuTrigger::Toggle);
        } else if self.links.iter().any(|&l| doc.contains(l, target)) {
            self.transition(doc, MenuState::Closed, MenuTrigger::NavLink);
        } else if !doc.contains(self.list, target) {
            self.transition(doc, MenuState::Closed, MenuTrigger::Outside);
        }
    }

    /// Handle a keydown. Returns `true` if the browser default must be
    /// prevented.
    pub fn on_key<D: Document + ?Sized>(&mut self, doc: &mut D, key: &KeyEvent) -> bool {
        if key.code == KeyCode::Escape && self.state.is_open() {
            doc.focus(self.toggle);
            self.transition(doc, MenuState::Closed, MenuTrigger::Escape);
            return false;
        }
        let on_toggle = key.target.is_some_and(|t| doc.contains(self.toggle, t));
        if on_toggle && key.is_activation() {
            self.flip(doc, MenuTrigger::Toggle);
            return true;
        }
        false
    }

    /// Re-derive the rendered attributes from the state.
    ///
    /// Returns `true` (and logs a warning) if something else had changed
    /// them behind the controller's back.
    pub fn reconcile<D: Document + ?Sized>(&self, doc: &mut D) -> bool {
        let open = self.state.is_open();
        let body = doc.body();
        let in_sync = doc.attribute(self.toggle, ARIA_EXPANDED) == Some(self.state.aria_expanded())
            && doc.has_class(self.list, &self.open_class) == open
            && (doc.style(body, OVERFLOW) == Some(SCROLL_LOCK)) == open;
        if in_sync {
            return false;
        }
        tracing::warn!(state = ?self.state, "menu markup diverged from state; re-rendering");
        self.render(doc);
        true
    }
}
