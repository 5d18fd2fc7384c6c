#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping `Page<MemoryDocument>`.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and native tests. No JS/WASM types here.
//!
//! The host owns the real DOM. It sends a markup snapshot once, then pushes
//! events, clock updates and layout changes; after each call it drains the
//! command journal and replays it against the live elements.

use core::time::Duration;
use std::fmt;

use folio_core::{
    DomCommand, KeyCode, KeyEvent, MarkupError, MemoryDocument, Modifiers, NodeId, PageConfig,
    PageConfigError, PageEvent, PageMarkup, Span,
};
use folio_runtime::{EventOutcome, Page, PageEnv};
use serde_json::{Value, json};

/// Why a runner could not be created.
#[derive(Debug)]
pub enum RunnerError {
    Markup(MarkupError),
    Config(PageConfigError),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(e) => write!(f, "markup: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Markup(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<MarkupError> for RunnerError {
    fn from(e: MarkupError) -> Self {
        Self::Markup(e)
    }
}

impl From<PageConfigError> for RunnerError {
    fn from(e: PageConfigError) -> Self {
        Self::Config(e)
    }
}

/// Platform-independent page runner.
pub struct RunnerCore {
    page: Page<MemoryDocument>,
    /// Deterministic host clock.
    now: Duration,
}

impl RunnerCore {
    /// Build a runner from a JSON markup snapshot and an optional JSON
    /// config (`None` or an empty string uses the defaults).
    pub fn new(
        markup_json: &str,
        config_json: Option<&str>,
        env: PageEnv,
    ) -> Result<Self, RunnerError> {
        let markup = PageMarkup::from_json_str(markup_json)?;
        let doc = MemoryDocument::from_markup(&markup)?;
        let config = match config_json.map(str::trim) {
            Some(json) if !json.is_empty() => PageConfig::from_json_str(json)?,
            _ => PageConfig::default(),
        };
        Ok(Self {
            page: Page::mount(doc, config, env),
            now: Duration::ZERO,
        })
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Host timestamps can be NaN, infinite, or go backwards.
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        self.now = self.now.saturating_add(duration_from_ms(dt_ms));
        self.page.set_time(self.now);
    }

    /// Set the deterministic clock to absolute milliseconds.
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        self.now = if !ts_ms.is_finite() || ts_ms <= 0.0 {
            Duration::ZERO
        } else {
            duration_from_ms(ts_ms)
        };
        self.page.set_time(self.now);
    }

    pub fn click(&mut self, target: u32) -> EventOutcome {
        self.page.handle(PageEvent::Click {
            target: NodeId::new(target),
        })
    }

    /// `key` is a DOM `KeyboardEvent.key` value. `mods` bitmask:
    /// `1=shift`, `2=alt`, `4=ctrl`, `8=meta`.
    pub fn key_down(&mut self, key: &str, target: Option<u32>, mods: u8) -> EventOutcome {
        let mut event = KeyEvent::new(KeyCode::from_dom_key(key))
            .with_modifiers(Modifiers::from_bits_truncate(mods));
        if let Some(target) = target {
            event = event.with_target(NodeId::new(target));
        }
        self.page.handle(PageEvent::Key(event))
    }

    pub fn scroll(&mut self, offset_y: f64) -> EventOutcome {
        if !offset_y.is_finite() {
            return EventOutcome::default();
        }
        self.page.handle(PageEvent::Scroll { offset_y })
    }

    pub fn resize(&mut self, width: f64, height: f64) -> EventOutcome {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return EventOutcome::default();
        }
        self.page.handle(PageEvent::Resize { width, height })
    }

    /// Report an element's layout box in document coordinates.
    pub fn layout(&mut self, node: u32, top: f64, height: f64) -> EventOutcome {
        if !(top.is_finite() && height.is_finite()) || height < 0.0 {
            return EventOutcome::default();
        }
        self.page.handle(PageEvent::Layout {
            node: NodeId::new(node),
            span: Span::new(top, height),
        })
    }

    /// Run the pending frame at the current clock.
    pub fn frame(&mut self) -> bool {
        self.page.frame(self.now)
    }

    /// Fire due timers at the current clock.
    pub fn poll(&mut self) -> bool {
        self.page.poll(self.now)
    }

    /// Milliseconds until the next timer is due, if one is pending.
    #[must_use]
    pub fn next_timeout_ms(&self) -> Option<f64> {
        self.page
            .next_deadline()
            .map(|d| d.saturating_sub(self.now).as_micros() as f64 / 1000.0)
    }

    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.page.frame_pending()
    }

    /// Drain the DOM commands recorded since the last call.
    pub fn take_commands(&mut self) -> Vec<DomCommand> {
        self.page.document_mut().take_journal()
    }

    /// Drain the DOM commands as a JSON array.
    pub fn take_commands_json(&mut self) -> String {
        let commands: Vec<Value> = self.take_commands().iter().map(command_to_json).collect();
        Value::Array(commands).to_string()
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.page.is_menu_open()
    }

    #[must_use]
    pub fn active_section(&self) -> Option<String> {
        self.page.active_section().map(ToString::to_string)
    }

    #[must_use]
    pub fn is_header_scrolled(&self) -> bool {
        self.page.is_header_scrolled()
    }
}

fn duration_from_ms(ms: f64) -> Duration {
    let secs = (ms / 1000.0).min(Duration::MAX.as_secs_f64());
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// JSON shape of one command, as the host applies it.
#[must_use]
pub fn command_to_json(command: &DomCommand) -> Value {
    let op = command.op();
    match command {
        DomCommand::AddClass { node, class } | DomCommand::RemoveClass { node, class } => {
            json!({ "op": op, "node": node.get(), "class": class })
        }
        DomCommand::SetAttribute { node, name, value } => {
            json!({ "op": op, "node": node.get(), "name": name, "value": value })
        }
        DomCommand::RemoveAttribute { node, name } => {
            json!({ "op": op, "node": node.get(), "name": name })
        }
        DomCommand::SetStyle {
            node,
            property,
            value,
        } => json!({ "op": op, "node": node.get(), "property": property, "value": value }),
        DomCommand::Focus { node } => json!({ "op": op, "node": node.get() }),
        DomCommand::ScrollTo { top, behavior } => {
            json!({ "op": op, "top": top, "behavior": behavior.as_str() })
        }
        DomCommand::PushHash { hash } => json!({ "op": op, "hash": hash }),
    }
}
