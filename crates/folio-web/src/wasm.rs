#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the PageRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use folio_core::{DomCommand, Viewport};
use folio_runtime::{EventOutcome, PageEnv};

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn outcome_to_js(outcome: EventOutcome) -> JsValue {
    let obj = Object::new();
    set_js(
        &obj,
        "preventDefault",
        JsValue::from_bool(outcome.prevent_default),
    );
    set_js(&obj, "requestFrame", JsValue::from_bool(outcome.request_frame));
    obj.into()
}

fn command_to_js(command: &DomCommand) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "op", JsValue::from_str(command.op()));
    match command {
        DomCommand::AddClass { node, class } | DomCommand::RemoveClass { node, class } => {
            set_js(&obj, "node", JsValue::from_f64(f64::from(node.get())));
            set_js(&obj, "class", JsValue::from_str(class));
        }
        DomCommand::SetAttribute { node, name, value } => {
            set_js(&obj, "node", JsValue::from_f64(f64::from(node.get())));
            set_js(&obj, "name", JsValue::from_str(name));
            set_js(&obj, "value", JsValue::from_str(value));
        }
        DomCommand::RemoveAttribute { node, name } => {
            set_js(&obj, "node", JsValue::from_f64(f64::from(node.get())));
            set_js(&obj, "name", JsValue::from_str(name));
        }
        DomCommand::SetStyle {
            node,
            property,
            value,
        } => {
            set_js(&obj, "node", JsValue::from_f64(f64::from(node.get())));
            set_js(&obj, "property", JsValue::from_str(property));
            set_js(&obj, "value", JsValue::from_str(value));
        }
        DomCommand::Focus { node } => {
            set_js(&obj, "node", JsValue::from_f64(f64::from(node.get())));
        }
        DomCommand::ScrollTo { top, behavior } => {
            set_js(&obj, "top", JsValue::from_f64(*top));
            set_js(&obj, "behavior", JsValue::from_str(behavior.as_str()));
        }
        DomCommand::PushHash { hash } => {
            set_js(&obj, "hash", JsValue::from_str(hash));
        }
    }
    obj.into()
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// WASM page runner.
///
/// Construct with a markup snapshot, forward DOM events, then drain
/// `takeCommands()` and apply them to the live document.
#[wasm_bindgen]
pub struct PageRunner {
    inner: RunnerCore,
}

#[wasm_bindgen]
impl PageRunner {
    /// Create a runner. `configJson` may be `undefined` or empty for the
    /// defaults. `width`/`height`/`scrollY` describe the initial viewport.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        markup_json: &str,
        config_json: Option<String>,
        reduced_motion: bool,
        css_smooth_scroll: bool,
        pathname: String,
        width: f64,
        height: f64,
        scroll_y: f64,
    ) -> Result<PageRunner, JsValue> {
        install_panic_hook();
        let mut viewport = Viewport::new(width, height);
        if scroll_y.is_finite() {
            viewport = viewport.scrolled_to(scroll_y);
        }
        let env = PageEnv {
            reduced_motion,
            pathname,
            css_smooth_scroll,
            viewport,
        };
        RunnerCore::new(markup_json, config_json.as_deref(), env)
            .map(|inner| Self { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTimeMs)]
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set the deterministic clock to absolute milliseconds.
    #[wasm_bindgen(js_name = setTimeMs)]
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        self.inner.set_time_ms(ts_ms);
    }

    /// Forward a click. Returns `{ preventDefault, requestFrame }`.
    pub fn click(&mut self, target: u32) -> JsValue {
        outcome_to_js(self.inner.click(target))
    }

    /// Forward a keydown. `key` is `KeyboardEvent.key`; `mods` bitmask:
    /// `1=shift`, `2=alt`, `4=ctrl`, `8=meta`.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, target: Option<u32>, mods: u8) -> JsValue {
        outcome_to_js(self.inner.key_down(key, target, mods))
    }

    pub fn scroll(&mut self, offset_y: f64) -> JsValue {
        outcome_to_js(self.inner.scroll(offset_y))
    }

    pub fn resize(&mut self, width: f64, height: f64) -> JsValue {
        outcome_to_js(self.inner.resize(width, height))
    }

    /// Report an element's layout box in document coordinates.
    pub fn layout(&mut self, node: u32, top: f64, height: f64) -> JsValue {
        outcome_to_js(self.inner.layout(node, top, height))
    }

    /// Run the pending frame. Call from `requestAnimationFrame`.
    pub fn frame(&mut self) -> bool {
        self.inner.frame()
    }

    /// Fire due timers.
    pub fn poll(&mut self) -> bool {
        self.inner.poll()
    }

    /// Milliseconds until `poll()` has work, or `undefined`.
    #[wasm_bindgen(js_name = nextTimeoutMs)]
    pub fn next_timeout_ms(&self) -> Option<f64> {
        self.inner.next_timeout_ms()
    }

    #[wasm_bindgen(js_name = framePending)]
    pub fn frame_pending(&self) -> bool {
        self.inner.frame_pending()
    }

    /// Drain DOM commands as an `Array` of plain objects.
    #[wasm_bindgen(js_name = takeCommands)]
    pub fn take_commands(&mut self) -> Array {
        let arr = Array::new();
        for command in self.inner.take_commands() {
            arr.push(&command_to_js(&command));
        }
        arr
    }

    /// Drain DOM commands as a JSON string.
    #[wasm_bindgen(js_name = takeCommandsJson)]
    pub fn take_commands_json(&mut self) -> String {
        self.inner.take_commands_json()
    }

    #[wasm_bindgen(js_name = isMenuOpen)]
    pub fn is_menu_open(&self) -> bool {
        self.inner.is_menu_open()
    }

    /// Id of the section under the reading line, or `undefined`.
    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.inner.active_section()
    }

    #[wasm_bindgen(js_name = isHeaderScrolled)]
    pub fn is_header_scrolled(&self) -> bool {
        self.inner.is_header_scrolled()
    }
}
