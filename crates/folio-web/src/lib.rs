#![forbid(unsafe_code)]

//! WASM page runner for folio.
//!
//! This crate provides [`PageRunner`], a `wasm-bindgen`-exported struct that
//! wraps `folio_runtime::Page<folio_core::MemoryDocument>` and exposes it to
//! JavaScript for host-driven execution.
//!
//! # Host contract
//!
//! 1. Snapshot the document into [`folio_core::PageMarkup`] JSON and pass it
//!    to the constructor together with an optional config JSON.
//! 2. Forward `click`, `keydown`, `scroll`, `resize` and layout changes.
//!    Call `preventDefault()` when the returned outcome asks for it.
//! 3. When an outcome requests a frame, call `frame()` from
//!    `requestAnimationFrame`. When `nextTimeoutMs()` returns a value, call
//!    `poll()` after that many milliseconds.
//! 4. After each call, drain `takeCommands()` and apply them to the live
//!    elements.
//!
//! The clock is host-driven: advance it with `advanceTimeMs` or `setTimeMs`
//! before `frame()` and `poll()`.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PageRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;
