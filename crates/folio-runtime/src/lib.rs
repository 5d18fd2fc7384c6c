#![forbid(unsafe_code)]

//! Runtime: page controllers, visibility observation, and rate limiting.
//!
//! # Role in folio
//! `folio-runtime` is the behavior layer. It takes the handles discovered by
//! `folio-core`, mounts one controller per page concern, and drives them
//! from host events and frames through [`Page`].
//!
//! # Primary responsibilities
//! - **MenuController**: mobile menu open/closed state, rendered from one
//!   source of truth.
//! - **ActiveSectionTracker**: marks the navigation entry of the section
//!   under the reading line.
//! - **RevealAnimator**: one-shot reveal of animatable elements.
//! - **HeaderScrollState**: header scrolled flag, by offset or sentinel.
//! - **Navigation helpers**: current-page indicator, arrow-key focus, and
//!   scripted smooth anchor scrolling.
//! - **ParallaxEffect**: hero content drift and fade.
//! - **Rate limiting**: frame throttle, throttle, and debounce on a host clock.
//!
//! # How it fits in the system
//! A host (the `folio-web` runner in the browser, or a test) owns a
//! `Document`, builds a [`Page`] from it, forwards every input as a
//! [`folio_core::PageEvent`], and calls [`Page::frame`] on each animation
//! frame. The runtime never touches platform APIs directly.

pub mod active_section;
pub mod error;
pub mod header;
pub mod menu;
pub mod nav;
pub mod page;
pub mod parallax;
pub mod rate_limit;
pub mod reveal;
pub mod visibility;

pub use active_section::ActiveSectionTracker;
pub use error::MountError;
pub use header::HeaderScrollState;
pub use menu::{MenuController, MenuState, MenuTrigger};
pub use nav::{NavKeyboard, PageIndicator, SmoothScroll};
pub use page::{EventOutcome, Page, PageEnv};
pub use parallax::ParallaxEffect;
pub use rate_limit::{Debounce, FrameThrottle, Throttle};
pub use reveal::{RevealAnimator, RevealState};
pub use visibility::{VisibilityEntry, VisibilityObserver};
