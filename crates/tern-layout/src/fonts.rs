//! Font description and measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! The layout engine never touches font data itself. It describes the
//! font it wants with a [`FontDescriptor`] and asks an injected
//! [`FontMetrics`] implementation for string widths and line metrics.
//! Descriptors are small hashable values, which makes them usable as
//! cache keys by implementations that memoize resolved fonts.

use serde::Serialize;
use strum_macros::Display;

/// The two font families the engine distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize)]
pub enum FontFamily {
    /// The default proportional text face.
    #[default]
    Proportional,
    /// Fixed-width face, used for preformatted text.
    Monospace,
}

/// Font weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Font slant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize)]
pub enum FontSlant {
    /// Upright.
    #[default]
    Roman,
    /// Italic.
    Italic,
}

/// A resolved font configuration: everything needed to measure or draw
/// a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FontDescriptor {
    /// Which family to use.
    pub family: FontFamily,
    /// Font size in pixels.
    pub size: u32,
    /// Weight.
    pub weight: FontWeight,
    /// Slant.
    pub slant: FontSlant,
}

impl FontDescriptor {
    /// A descriptor with the given size and everything else default.
    #[must_use]
    pub fn with_size(size: u32) -> Self {
        FontDescriptor {
            family: FontFamily::default(),
            size,
            weight: FontWeight::default(),
            slant: FontSlant::default(),
        }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::with_size(16)
    }
}

/// Vertical metrics of a font at a particular size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineMetrics {
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline (positive).
    pub descent: f32,
    /// Total advance height of a line of this font.
    pub linespace: f32,
}

/// Font measurement interface used during layout.
///
/// Implementors provide the measured advance width of a string and the
/// ascent/descent/linespace values needed for baseline placement. The
/// engine treats these as infallible: a configuration that cannot be
/// resolved is a fatal setup error outside the layout pipeline.
pub trait FontMetrics {
    /// Measure the advance width of `text` in the given font, in pixels.
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32;

    /// Vertical line metrics for the given font.
    fn metrics(&self, font: &FontDescriptor) -> LineMetrics;
}

/// Approximate font metrics using fixed ratios.
///
/// Without access to actual font data, widths use 0.6x the font size per
/// character (typical for Latin glyphs in a proportional face) and the
/// vertical split is 0.8x ascent / 0.2x descent with a 1.2x linespace,
/// matching common browser defaults for `line-height: normal`.
///
/// This is used as a fallback when no font is available, and in tests,
/// where its determinism makes layout results exactly reproducible.
pub struct ApproximateMetrics;

impl FontMetrics for ApproximateMetrics {
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32 {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        text.chars().count() as f32 * font.size as f32 * CHAR_WIDTH_RATIO
    }

    fn metrics(&self, font: &FontDescriptor) -> LineMetrics {
        let size = font.size as f32;
        LineMetrics {
            ascent: size * 0.8,
            descent: size * 0.2,
            linespace: size * 1.2,
        }
    }
}
