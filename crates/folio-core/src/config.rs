#![forbid(unsafe_code)]

//! Policy-as-data configuration for the page controllers.
//!
//! Captures every class name, observation band, and threshold the
//! controllers use as a single [`PageConfig`] that can be loaded from TOML or
//! JSON, so a page with different markup conventions needs no code change.
//!
//! # Loading
//!
//! ```toml
//! # folio.toml
//! [tracking]
//! root_margin = "-20% 0px -80% 0px"
//!
//! [header]
//! strategy = "sentinel"
//! threshold_px = 64.0
//! ```
//!
//! ```rust,ignore
//! let config = PageConfig::from_toml_file("folio.toml")?;
//! let config = PageConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the value the stock portfolio markup expects, so
//! `PageConfig::default()` works against that markup unchanged.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Inset, RootMargin};

// ---------------------------------------------------------------------------
// Top-level PageConfig
// ---------------------------------------------------------------------------

/// Top-level page configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PageConfig {
    /// Class names used to locate the markup at mount.
    pub selectors: SelectorConfig,

    /// State classes written by the controllers.
    pub classes: ClassConfig,

    /// Active-section tracking band.
    pub tracking: TrackingConfig,

    /// Scroll-reveal animation.
    pub reveal: RevealConfig,

    /// Header scrolled-state detection.
    pub header: HeaderConfig,

    /// Anchor scrolling and resize settling.
    pub scroll: ScrollConfig,

    /// Hero parallax.
    pub parallax: ParallaxConfig,
}

impl PageConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PageConfigError> {
        let config: Self = toml::from_str(s).map_err(PageConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PageConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PageConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, PageConfigError> {
        let config: Self = serde_json::from_str(s).map_err(PageConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PageConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PageConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, PageConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(PageConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            errors.push(format!(
                "reveal.threshold must be in [0, 1], got {}",
                self.reveal.threshold
            ));
        }

        if self.reveal.stagger_steps == 0 {
            errors.push("reveal.stagger_steps must be > 0".into());
        }

        if self.reveal.animatable_classes.is_empty() {
            errors.push("reveal.animatable_classes must not be empty".into());
        }

        if !self.header.threshold_px.is_finite() || self.header.threshold_px < 0.0 {
            errors.push(format!(
                "header.threshold_px must be finite and >= 0, got {}",
                self.header.threshold_px
            ));
        }

        if !self.scroll.header_offset_px.is_finite() {
            errors.push("scroll.header_offset_px must be finite".into());
        }

        if !self.parallax.factor.is_finite() || !(0.0..=1.0).contains(&self.parallax.factor) {
            errors.push(format!(
                "parallax.factor must be in [0, 1], got {}",
                self.parallax.factor
            ));
        }

        for (name, class) in self.classes.entries() {
            if class.trim().is_empty() || class.contains(char::is_whitespace) {
                errors.push(format!("classes.{name} must be a single class name"));
            }
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Class names (without the leading dot) that identify the markup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SelectorConfig {
    pub nav: String,
    pub toggle: String,
    pub nav_list: String,
    pub nav_link: String,
    pub header: String,
    pub hero: String,
    pub hero_content: String,
    /// Containers whose animatable children get stagger classes.
    pub grid_classes: Vec<String>,
    /// Tag name of tracked sections (they must also carry an `id`).
    pub section_tag: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            nav: "nav".into(),
            toggle: "nav__toggle".into(),
            nav_list: "nav__list".into(),
            nav_link: "nav__link".into(),
            header: "header".into(),
            hero: "hero".into(),
            hero_content: "hero__content".into(),
            grid_classes: vec!["grid".into()],
            section_tag: "section".into(),
        }
    }
}

/// State classes written by the controllers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ClassConfig {
    pub menu_open: String,
    pub link_active: String,
    pub header_scrolled: String,
}

impl ClassConfig {
    fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("menu_open", &self.menu_open),
            ("link_active", &self.link_active),
            ("header_scrolled", &self.header_scrolled),
        ]
    }
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            menu_open: "nav__list--open".into(),
            link_active: "nav__link--active".into(),
            header_scrolled: "header--scrolled".into(),
        }
    }
}

/// Active-section tracking band.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TrackingConfig {
    /// Default `-20% 0px -80% 0px`: a reading line 20% down the viewport.
    pub root_margin: RootMargin,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::vertical(Inset::Percent(-20.0), Inset::Percent(-80.0)),
        }
    }
}

/// Scroll-reveal animation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RevealConfig {
    /// Elements carrying any of these classes are animated.
    pub animatable_classes: Vec<String>,
    /// Marker added at mount to every animated element.
    pub pending_class: String,
    /// Marker added the first time an element becomes visible.
    pub revealed_class: String,
    /// Stagger classes are `{prefix}1` .. `{prefix}{steps}`.
    pub stagger_class_prefix: String,
    pub stagger_steps: usize,
    /// Default `0px 0px -50px 0px`.
    pub root_margin: RootMargin,
    /// Minimum visible fraction that counts as intersecting.
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            animatable_classes: vec![
                "section__title".into(),
                "card".into(),
                "project-card".into(),
                "timeline__item".into(),
                "skill".into(),
            ],
            pending_class: "reveal".into(),
            revealed_class: "reveal--visible".into(),
            stagger_class_prefix: "stagger-".into(),
            stagger_steps: 5,
            root_margin: RootMargin::vertical(Inset::Px(0.0), Inset::Px(-50.0)),
            threshold: 0.1,
        }
    }
}

/// How the header decides it has been scrolled past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum HeaderStrategyKind {
    /// Compare the scroll offset against the threshold once per frame.
    #[default]
    Offset,
    /// Watch a zero-height sentinel at the threshold leave the viewport.
    Sentinel,
}

/// Header scrolled-state detection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HeaderConfig {
    pub strategy: HeaderStrategyKind,
    pub threshold_px: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            strategy: HeaderStrategyKind::Offset,
            threshold_px: 50.0,
        }
    }
}

/// Anchor scrolling and resize settling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ScrollConfig {
    /// Fixed-header height subtracted from anchor targets.
    pub header_offset_px: f64,
    /// Quiet period after the last resize before observers re-evaluate.
    pub resize_settle_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            header_offset_px: 80.0,
            resize_settle_ms: 150,
        }
    }
}

/// Hero parallax.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ParallaxConfig {
    pub enabled: bool,
    /// Content moves `scroll_y * factor` pixels down.
    pub factor: f64,
    /// Fade the content out as the hero scrolls away.
    pub fade: bool,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: 0.5,
            fade: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a page configuration.
#[derive(Debug)]
pub enum PageConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for PageConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PageConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
