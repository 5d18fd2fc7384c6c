#![forbid(unsafe_code)]

//! The page runtime.
//!
//! [`Page`] owns the document, the mounted controllers, and the rate
//! limiters. The host drives it with three calls:
//!
//! - [`Page::handle`] for every input event. Clicks and keys are dispatched
//!   immediately; scroll, resize and layout changes only mark work dirty and
//!   ask for a frame.
//! - [`Page::frame`] once per rendering frame. Runs at most one
//!   recomputation, against the latest viewport.
//! - [`Page::poll`] when the deadline from [`Page::next_deadline`] passes.
//!   Fires the resize settle pass, which evaluates the current viewport,
//!   including any scroll that arrived while the resize was settling.
//!
//! Components whose markup is missing are skipped with a warning; the rest
//! of the page keeps working.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use folio_core::{Document, MemoryDocument, PageConfig, PageEvent};
//! use folio_runtime::{Page, PageEnv};
//!
//! let mut doc = MemoryDocument::new();
//! let body = doc.body();
//! let header = doc.append(body, "header").class("header").id();
//!
//! let mut page = Page::mount(doc, PageConfig::default(), PageEnv::default());
//! page.frame(Duration::ZERO);
//!
//! let outcome = page.handle(PageEvent::Scroll { offset_y: 120.0 });
//! assert!(outcome.request_frame);
//! page.frame(Duration::from_millis(16));
//! assert!(page.document().has_class(header, "header--scrolled"));
//! ```

use std::time::Duration;

use bitflags::bitflags;
use folio_core::config::PageConfig;
use folio_core::{Document, PageEvent, SectionId, UiRoots, Viewport};

use crate::active_section::ActiveSectionTracker;
use crate::error::MountError;
use crate::header::HeaderScrollState;
use crate::menu::MenuController;
use crate::nav::{NavKeyboard, PageIndicator, SmoothScroll};
use crate::parallax::ParallaxEffect;
use crate::rate_limit::{Debounce, FrameThrottle};
use crate::reveal::RevealAnimator;

/// Read-only facts about the host environment.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEnv {
    /// The user asked for reduced motion. Disables reveal and parallax.
    pub reduced_motion: bool,
    /// `location.pathname`, used by the current-page indicator.
    pub pathname: String,
    /// The host scrolls smoothly on its own (CSS `scroll-behavior: smooth`).
    /// When `false`, in-page anchors are scrolled by script.
    pub css_smooth_scroll: bool,
    /// Initial viewport.
    pub viewport: Viewport,
}

impl Default for PageEnv {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            pathname: "/".into(),
            css_smooth_scroll: false,
            viewport: Viewport::default(),
        }
    }
}

/// What the host must do after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Call `preventDefault()` on the native event.
    pub prevent_default: bool,
    /// This event scheduled a new frame; call `requestAnimationFrame`.
    pub request_frame: bool,
}

bitflags! {
    /// Work pending for the next frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct Dirty: u8 {
        const VISIBILITY = 0b001;
        const HEADER     = 0b010;
        const PARALLAX   = 0b100;
    }
}

/// A mounted page.
pub struct Page<D: Document> {
    doc: D,
    config: PageConfig,
    env: PageEnv,
    viewport: Viewport,
    now: Duration,
    roots: UiRoots,
    menu: Option<MenuController>,
    active: Option<ActiveSectionTracker>,
    reveal: Option<RevealAnimator>,
    header: Option<HeaderScrollState>,
    parallax: Option<ParallaxEffect>,
    keyboard: Option<NavKeyboard>,
    smooth: Option<SmoothScroll>,
    throttle: FrameThrottle<Viewport>,
    dirty: Dirty,
    settle: Debounce<()>,
}

impl<D: Document> Page<D> {
    /// Discover the markup, mount every component that has it, and schedule
    /// the initial evaluation frame.
    pub fn mount(mut doc: D, config: PageConfig, env: PageEnv) -> Self {
        let roots = UiRoots::discover(&doc, &config);

        let menu = mount_or_warn(MenuController::mount(&mut doc, &roots, &config));
        PageIndicator::apply(&mut doc, &roots, &config, &env.pathname);
        let keyboard = mount_or_warn(NavKeyboard::mount(&roots, &config));
        let active = mount_or_warn(ActiveSectionTracker::mount(&roots, &config));
        let header = mount_or_warn(HeaderScrollState::mount(&roots, &config));

        let (reveal, parallax) = if env.reduced_motion {
            tracing::debug!("reduced motion: reveal and parallax disabled");
            (None, None)
        } else {
            let reveal = mount_or_warn(RevealAnimator::mount(&mut doc, &roots, &config));
            let parallax = if config.parallax.enabled {
                mount_or_warn(ParallaxEffect::mount(&roots, &config))
            } else {
                None
            };
            (reveal, parallax)
        };

        let smooth = if env.css_smooth_scroll {
            None
        } else {
            mount_or_warn(SmoothScroll::mount(&roots, &config))
        };

        let settle = Debounce::new(Duration::from_millis(config.scroll.resize_settle_ms));
        let viewport = env.viewport;
        let mut page = Self {
            doc,
            config,
            env,
            viewport,
            now: Duration::ZERO,
            roots,
            menu,
            active,
            reveal,
            header,
            parallax,
            keyboard,
            smooth,
            throttle: FrameThrottle::new(),
            dirty: Dirty::empty(),
            settle,
        };
        page.schedule(Dirty::all());
        tracing::debug!(
            menu = page.menu.is_some(),
            active_section = page.active.is_some(),
            reveal = page.reveal.is_some(),
            header = page.header.is_some(),
            parallax = page.parallax.is_some(),
            keyboard = page.keyboard.is_some(),
            smooth_scroll = page.smooth.is_some(),
            "page mounted"
        );
        page
    }

    /// Update the host clock without running anything.
    pub fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    /// Dispatch one input event.
    pub fn handle(&mut self, event: PageEvent) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        match event {
            PageEvent::Click { target } => {
                if let Some(menu) = &mut self.menu {
                    menu.on_click(&mut self.doc, target);
                }
                if let Some(smooth) = &self.smooth {
                    outcome.prevent_default |= smooth.on_click(&mut self.doc, target);
                }
            }
            PageEvent::Key(key) => {
                if let Some(menu) = &mut self.menu {
                    outcome.prevent_default |= menu.on_key(&mut self.doc, &key);
                }
                if !outcome.prevent_default {
                    if let Some(keyboard) = &self.keyboard {
                        outcome.prevent_default |= keyboard.on_key(&mut self.doc, &key);
                    }
                }
            }
            PageEvent::Scroll { offset_y } => {
                self.viewport.scroll_y = offset_y;
                outcome.request_frame = self.schedule(Dirty::all());
            }
            PageEvent::Resize { width, height } => {
                self.viewport.width = width;
                self.viewport.height = height;
                self.settle.call(self.now, ());
                outcome.request_frame = self.schedule(Dirty::all());
            }
            PageEvent::Layout { node, span } => {
                self.doc.set_span(node, span);
                outcome.request_frame = self.schedule(Dirty::VISIBILITY | Dirty::PARALLAX);
            }
        }
        if let Some(menu) = &self.menu {
            menu.reconcile(&mut self.doc);
        }
        outcome
    }

    /// Run the pending recomputation, if any. Returns `true` if one ran.
    pub fn frame(&mut self, now: Duration) -> bool {
        self.now = now;
        let Some(viewport) = self.throttle.run_frame() else {
            return false;
        };
        let dirty = std::mem::take(&mut self.dirty);
        self.recompute(viewport, dirty);
        true
    }

    /// Fire due timers. Returns `true` if the resize settle pass ran.
    pub fn poll(&mut self, now: Duration) -> bool {
        self.now = now;
        if self.settle.poll(now).is_none() {
            return false;
        }
        let viewport = self.viewport;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "resize settled"
        );
        self.recompute(viewport, Dirty::all());
        true
    }

    /// When [`poll`](Self::poll) next has work, if ever.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.settle.deadline()
    }

    /// `true` while a frame is scheduled and has not run.
    #[must_use]
    pub const fn frame_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    fn schedule(&mut self, work: Dirty) -> bool {
        self.dirty |= work;
        self.throttle.request(self.viewport)
    }

    fn recompute(&mut self, viewport: Viewport, dirty: Dirty) {
        tracing::trace!(scroll_y = viewport.scroll_y, ?dirty, "recompute");
        if dirty.contains(Dirty::VISIBILITY) {
            if let Some(active) = &mut self.active {
                active.evaluate(&mut self.doc, &viewport);
            }
            if let Some(reveal) = &mut self.reveal {
                reveal.evaluate(&mut self.doc, &viewport);
            }
        }
        if dirty.intersects(Dirty::HEADER | Dirty::VISIBILITY) {
            if let Some(header) = &mut self.header {
                header.update(&mut self.doc, &viewport);
            }
        }
        if dirty.contains(Dirty::PARALLAX) {
            if let Some(parallax) = &self.parallax {
                parallax.update(&mut self.doc, &viewport);
            }
        }
    }

    // ---- accessors ----

    #[must_use]
    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Mutable document access, e.g. to drain a command journal.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    #[must_use]
    pub fn into_document(self) -> D {
        self.doc
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn env(&self) -> &PageEnv {
        &self.env
    }

    #[must_use]
    pub fn roots(&self) -> &UiRoots {
        &self.roots
    }

    #[must_use]
    pub fn menu(&self) -> Option<&MenuController> {
        self.menu.as_ref()
    }

    /// Open or close the menu programmatically.
    pub fn set_menu_open(&mut self, open: bool) -> bool {
        let Some(menu) = &mut self.menu else {
            return false;
        };
        if open {
            menu.open(&mut self.doc)
        } else {
            menu.close(&mut self.doc)
        }
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(MenuController::is_open)
    }

    #[must_use]
    pub fn active_section(&self) -> Option<&SectionId> {
        self.active.as_ref().and_then(ActiveSectionTracker::active)
    }

    #[must_use]
    pub fn reveal(&self) -> Option<&RevealAnimator> {
        self.reveal.as_ref()
    }

    #[must_use]
    pub fn is_header_scrolled(&self) -> bool {
        self.header.as_ref().is_some_and(HeaderScrollState::is_scrolled)
    }

    #[must_use]
    pub fn has_parallax(&self) -> bool {
        self.parallax.is_some()
    }

    #[must_use]
    pub fn has_smooth_scroll(&self) -> bool {
        self.smooth.is_some()
    }
}

fn mount_or_warn<T>(result: Result<T, MountError>) -> Option<T> {
    match result {
        Ok(component) => Some(component),
        Err(err) => {
            tracing::warn!(component = err.component(), error = %err, "component skipped");
            None
        }
    }
}
