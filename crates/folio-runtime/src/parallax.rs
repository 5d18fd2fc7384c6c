#![forbid(unsafe_code)]

//! Hero parallax.
//!
//! While the hero is on screen its content drifts down at a fraction of the
//! scroll speed and fades out. Outside the hero nothing is written, so the
//! last in-range values stay until the user scrolls back.

use folio_core::config::{ParallaxConfig, PageConfig};
use folio_core::{Document, NodeId, UiRoots, Viewport};

use crate::error::MountError;

const TRANSFORM: &str = "transform";
const OPACITY: &str = "opacity";

#[derive(Debug, Clone)]
pub struct ParallaxEffect {
    hero: NodeId,
    content: NodeId,
    factor: f64,
    fade: bool,
}

impl ParallaxEffect {
    pub fn mount(roots: &UiRoots, config: &PageConfig) -> Result<Self, MountError> {
        let sel = &config.selectors;
        let hero = roots
            .hero
            .ok_or_else(|| MountError::missing("parallax", format!(".{}", sel.hero)))?;
        let content = roots
            .hero_content
            .ok_or_else(|| MountError::missing("parallax", format!(".{}", sel.hero_content)))?;
        let ParallaxConfig { factor, fade, .. } = config.parallax;
        Ok(Self {
            hero,
            content,
            factor,
            fade,
        })
    }

    /// Apply the effect for `viewport`. Returns `true` if anything was
    /// written (the hero is laid out and in range).
    pub fn update<D: Document + ?Sized>(&self, doc: &mut D, viewport: &Viewport) -> bool {
        let Some(span) = doc.span(self.hero) else {
            return false;
        };
        let y = viewport.scroll_y.max(0.0);
        if y >= span.bottom() {
            return false;
        }
        let offset = round_to(y * self.factor, 100.0);
        doc.set_style(
            self.content,
            TRANSFORM,
            &format!("translate3d(0, {offset}px, 0)"),
        );
        if self.fade && span.height > 0.0 {
            let opacity = round_to((1.0 - y / span.height).clamp(0.0, 1.0), 1000.0);
            doc.set_style(self.content, OPACITY, &opacity.to_string());
        }
        tracing::trace!(scroll_y = y, offset, "parallax");
        true
    }
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}
