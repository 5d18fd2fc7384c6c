#![forbid(unsafe_code)]

//! Geometric primitives for viewport visibility.
//!
//! All vertical positions are in document coordinates (CSS pixels from the
//! top of the page), so a [`Span`] never changes when the page scrolls; only
//! the [`Viewport`] does.

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Vertical extent of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Span {
    /// Top edge (inclusive).
    pub top: f64,
    /// Height in CSS pixels. Zero-height spans are allowed.
    pub height: f64,
}

impl Span {
    /// Create a new span.
    #[inline]
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Overlap with `other`, in pixels, or `None` if they are disjoint.
    ///
    /// Edge-adjacent spans count as intersecting with zero overlap, matching
    /// how the platform intersection watcher treats zero-area intersections.
    #[must_use]
    pub fn overlap(&self, other: &Span) -> Option<f64> {
        if self.top <= other.bottom() && self.bottom() >= other.top {
            let top = self.top.max(other.top);
            let bottom = self.bottom().min(other.bottom());
            Some((bottom - top).max(0.0))
        } else {
            None
        }
    }

    /// Fraction of this span covered by `band`, in `[0, 1]`.
    ///
    /// A zero-height span that touches the band reports `1.0`.
    #[must_use]
    pub fn visible_ratio(&self, band: &Span) -> f64 {
        match self.overlap(band) {
            None => 0.0,
            Some(_) if self.height <= 0.0 => 1.0,
            Some(px) => (px / self.height).clamp(0.0, 1.0),
        }
    }
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Vertical scroll offset.
    pub scroll_y: f64,
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport at scroll offset zero.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// Same viewport scrolled to `scroll_y`.
    #[must_use]
    pub const fn scrolled_to(mut self, scroll_y: f64) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    /// Visible region in document coordinates.
    #[must_use]
    pub const fn visible(&self) -> Span {
        Span::new(self.scroll_y, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// One side of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inset {
    /// Absolute CSS pixels.
    Px(f64),
    /// Percentage of the viewport extent along the same axis.
    Percent(f64),
}

impl Inset {
    /// Resolve against a viewport extent.
    #[must_use]
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => extent * pct / 100.0,
        }
    }

    fn parse(token: &str) -> Result<Self, MarginParseError> {
        let bad = || MarginParseError::BadValue(token.to_string());
        if let Some(num) = token.strip_suffix('%') {
            return num.parse::<f64>().map(Self::Percent).map_err(|_| bad());
        }
        if let Some(num) = token.strip_suffix("px") {
            return num.parse::<f64>().map(Self::Px).map_err(|_| bad());
        }
        // Only a bare zero may omit its unit.
        match token.parse::<f64>() {
            Ok(v) if v == 0.0 => Ok(Self::Px(0.0)),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Inset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Grows (positive) or shrinks (negative) the viewport before intersection.
///
/// Parsed from CSS margin shorthand, e.g. `"-20% 0px -80% 0px"`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct RootMargin {
    pub top: Inset,
    pub right: Inset,
    pub bottom: Inset,
    pub left: Inset,
}

impl RootMargin {
    /// No margin: the band is the viewport itself.
    pub const ZERO: Self = Self {
        top: Inset::Px(0.0),
        right: Inset::Px(0.0),
        bottom: Inset::Px(0.0),
        left: Inset::Px(0.0),
    };

    /// Vertical-only margin.
    #[must_use]
    pub const fn vertical(top: Inset, bottom: Inset) -> Self {
        Self {
            top,
            right: Inset::Px(0.0),
            bottom,
            left: Inset::Px(0.0),
        }
    }

    /// Parse CSS margin shorthand with one to four values.
    pub fn parse(s: &str) -> Result<Self, MarginParseError> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let insets = tokens
            .iter()
            .map(|t| Inset::parse(t))
            .collect::<Result<Vec<_>, _>>()?;
        match insets.as_slice() {
            [] => Err(MarginParseError::Empty),
            [all] => Ok(Self {
                top: *all,
                right: *all,
                bottom: *all,
                left: *all,
            }),
            [v, h] => Ok(Self {
                top: *v,
                right: *h,
                bottom: *v,
                left: *h,
            }),
            [t, h, b] => Ok(Self {
                top: *t,
                right: *h,
                bottom: *b,
                left: *h,
            }),
            [t, r, b, l] => Ok(Self {
                top: *t,
                right: *r,
                bottom: *b,
                left: *l,
            }),
            more => Err(MarginParseError::TooManyValues(more.len())),
        }
    }

    /// The effective observation band for `viewport`, in document coordinates.
    ///
    /// Negative margins can collapse the band to a line; they never invert it.
    #[must_use]
    pub fn band(&self, viewport: &Viewport) -> Span {
        let top = viewport.scroll_y - self.top.resolve(viewport.height);
        let bottom =
            viewport.scroll_y + viewport.height + self.bottom.resolve(viewport.height);
        if bottom >= top {
            Span::new(top, bottom - top)
        } else {
            Span::new(top, 0.0)
        }
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl TryFrom<String> for RootMargin {
    type Error = MarginParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RootMargin> for String {
    fn from(value: RootMargin) -> Self {
        value.to_string()
    }
}

/// Errors from parsing a root margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarginParseError {
    /// No values were given.
    Empty,
    /// More than four values were given.
    TooManyValues(usize),
    /// A value was neither `Npx`, `N%`, nor `0`.
    BadValue(String),
}

impl fmt::Display for MarginParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "root margin is empty"),
            Self::TooManyValues(n) => write!(f, "root margin takes 1-4 values, got {n}"),
            Self::BadValue(v) => write!(f, "invalid root margin value: {v:?}"),
        }
    }
}

impl std::error::Error for MarginParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_counts_touching_edges() {
        let a = Span::new(0.0, 100.0);
        let b = Span::new(100.0, 50.0);
        assert_eq!(a.overlap(&b), Some(0.0));
        assert_eq!(a.overlap(&Span::new(100.5, 10.0)), None);
    }

    #[test]
    fn overlap_is_clipped_length() {
        let a = Span::new(0.0, 100.0);
        assert_eq!(a.overlap(&Span::new(40.0, 200.0)), Some(60.0));
        assert_eq!(a.overlap(&Span::new(10.0, 20.0)), Some(20.0));
    }

    #[test]
    fn visible_ratio_handles_zero_height() {
        let line = Span::new(50.0, 0.0);
        assert_eq!(line.visible_ratio(&Span::new(0.0, 100.0)), 1.0);
        assert_eq!(line.visible_ratio(&Span::new(60.0, 100.0)), 0.0);
        let block = Span::new(0.0, 200.0);
        assert_eq!(block.visible_ratio(&Span::new(150.0, 100.0)), 0.25);
    }

    #[test]
    fn parse_four_value_shorthand() {
        let m = RootMargin::parse("-20% 0px -80% 0px").unwrap();
        assert_eq!(m.top, Inset::Percent(-20.0));
        assert_eq!(m.right, Inset::Px(0.0));
        assert_eq!(m.bottom, Inset::Percent(-80.0));
        assert_eq!(m.left, Inset::Px(0.0));
    }

    #[test]
    fn parse_short_forms() {
        let one = RootMargin::parse("10px").unwrap();
        assert_eq!(one.left, Inset::Px(10.0));
        let two = RootMargin::parse("5% 0").unwrap();
        assert_eq!(two.bottom, Inset::Percent(5.0));
        assert_eq!(two.right, Inset::Px(0.0));
        let three = RootMargin::parse("1px 2px 3px").unwrap();
        assert_eq!(three.left, Inset::Px(2.0));
        assert_eq!(three.bottom, Inset::Px(3.0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(RootMargin::parse("  "), Err(MarginParseError::Empty));
        assert_eq!(
            RootMargin::parse("1px 1px 1px 1px 1px"),
            Err(MarginParseError::TooManyValues(5))
        );
        assert!(matches!(
            RootMargin::parse("10em"),
            Err(MarginParseError::BadValue(_))
        ));
        assert!(matches!(
            RootMargin::parse("12"),
            Err(MarginParseError::BadValue(_))
        ));
    }

    #[test]
    fn tracking_band_collapses_to_line_at_twenty_percent() {
        let m = RootMargin::parse("-20% 0px -80% 0px").unwrap();
        let band = m.band(&Viewport::new(1000.0, 1000.0).scrolled_to(300.0));
        assert_eq!(band, Span::new(500.0, 0.0));
    }

    #[test]
    fn negative_bottom_margin_trims_band() {
        let m = RootMargin::parse("0px 0px -50px 0px").unwrap();
        let band = m.band(&Viewport::new(800.0, 600.0));
        assert_eq!(band, Span::new(0.0, 550.0));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let m = RootMargin::parse("-20% 0px -80% 0px").unwrap();
        assert_eq!(RootMargin::parse(&m.to_string()).unwrap(), m);
    }
}
