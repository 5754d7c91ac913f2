//! Font metrics backed by fontdue for accurate text measurement during
//! layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! A [`FontBook`] owns one loaded face per style variant and resolves
//! each [`FontDescriptor`] to the closest loaded face. Line metrics are
//! memoized per descriptor, so repeated layout passes do not recompute
//! them; the cache lives inside the book and dies with it, scoping font
//! state to one browsing session rather than the whole process.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result, anyhow};
use fontdue::{Font, FontSettings};
use tern_layout::{FontDescriptor, FontFamily, FontMetrics, FontSlant, FontWeight, LineMetrics};

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    // Windows
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// System font paths for a monospace face.
const FONT_MONO_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    // Windows
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// A set of loaded font faces with memoized line metrics.
///
/// Missing style variants fall back to the regular face, so a book
/// loaded from a single font file still resolves every descriptor.
pub struct FontBook {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
    monospace: Option<Font>,
    /// Memoized line metrics keyed by descriptor. Interior mutability
    /// keeps the [`FontMetrics`] interface read-only for the layout
    /// engine; the pipeline is single-threaded (see the crate docs).
    line_metrics: RefCell<HashMap<FontDescriptor, LineMetrics>>,
}

impl FontBook {
    /// Build a book from raw font file data. Only the regular face is
    /// required.
    ///
    /// # Errors
    ///
    /// Returns an error if any provided font data fails to parse.
    pub fn from_font_data(
        regular: &[u8],
        bold: Option<&[u8]>,
        italic: Option<&[u8]>,
        bold_italic: Option<&[u8]>,
        monospace: Option<&[u8]>,
    ) -> Result<Self> {
        Ok(FontBook {
            regular: load_face(regular).context("loading regular font")?,
            bold: bold.map(load_face).transpose().context("loading bold font")?,
            italic: italic
                .map(load_face)
                .transpose()
                .context("loading italic font")?,
            bold_italic: bold_italic
                .map(load_face)
                .transpose()
                .context("loading bold italic font")?,
            monospace: monospace
                .map(load_face)
                .transpose()
                .context("loading monospace font")?,
            line_metrics: RefCell::new(HashMap::new()),
        })
    }

    /// Build a book from fonts found on the system.
    ///
    /// The regular face is required; the other variants are loaded when
    /// a known path exists and silently fall back to regular otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if no regular font can be found or parsed.
    pub fn system() -> Result<Self> {
        let regular = load_first(FONT_SEARCH_PATHS)
            .ok_or_else(|| anyhow!("no usable system font found for the regular face"))?;
        Ok(FontBook {
            regular,
            bold: load_first(FONT_BOLD_SEARCH_PATHS),
            italic: load_first(FONT_ITALIC_SEARCH_PATHS),
            bold_italic: load_first(FONT_BOLD_ITALIC_SEARCH_PATHS),
            monospace: load_first(FONT_MONO_SEARCH_PATHS),
            line_metrics: RefCell::new(HashMap::new()),
        })
    }

    /// Resolve a descriptor to the closest loaded face.
    fn face(&self, font: &FontDescriptor) -> &Font {
        let variant = match (font.family, font.weight, font.slant) {
            (FontFamily::Monospace, _, _) => self.monospace.as_ref(),
            (FontFamily::Proportional, FontWeight::Bold, FontSlant::Italic) => {
                self.bold_italic.as_ref().or(self.bold.as_ref())
            }
            (FontFamily::Proportional, FontWeight::Bold, FontSlant::Roman) => self.bold.as_ref(),
            (FontFamily::Proportional, FontWeight::Normal, FontSlant::Italic) => {
                self.italic.as_ref()
            }
            (FontFamily::Proportional, FontWeight::Normal, FontSlant::Roman) => None,
        };
        variant.unwrap_or(&self.regular)
    }
}

impl FontMetrics for FontBook {
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32 {
        // Sum per-character advance widths, matching the cursor
        // advancement a rasterizer would use when drawing the run.
        //
        // Uses Font::metrics() instead of Font::rasterize() to avoid
        // generating bitmaps when only measurements are needed.
        let face = self.face(font);
        let size = font.size as f32;
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, size).advance_width)
            .sum()
    }

    fn metrics(&self, font: &FontDescriptor) -> LineMetrics {
        if let Some(cached) = self.line_metrics.borrow().get(font) {
            return *cached;
        }

        let size = font.size as f32;
        let metrics = self.face(font).horizontal_line_metrics(size).map_or_else(
            // A face without horizontal metrics gets the same ratios as
            // the approximate fallback.
            || LineMetrics {
                ascent: size * 0.8,
                descent: size * 0.2,
                linespace: size * 1.2,
            },
            |line| LineMetrics {
                ascent: line.ascent,
                descent: line.descent.abs(),
                linespace: line.new_line_size,
            },
        );

        let _ = self.line_metrics.borrow_mut().insert(*font, metrics);
        metrics
    }
}

/// Parse one font face from raw data.
fn load_face(data: &[u8]) -> Result<Font> {
    Font::from_bytes(data, FontSettings::default()).map_err(|e| anyhow!("font parse error: {e}"))
}

/// Load the first parseable font from a list of candidate paths.
fn load_first(paths: &[&str]) -> Option<Font> {
    paths
        .iter()
        .filter_map(|path| fs::read(path).ok())
        .find_map(|data| load_face(&data).ok())
}
