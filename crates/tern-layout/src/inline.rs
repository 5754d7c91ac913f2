//! Inline text flow and line placement.
//!
//! An inline-mode box walks its subtree in document order, splitting
//! text into words, breaking lines at the box's right edge, and placing
//! each line relative to a common baseline computed from the fonts on
//! that line.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "The height of a line box is determined by the rules given in the
//! section on line height calculations."

use serde::Serialize;
use tern_dom::{DomTree, NodeId};

use crate::fonts::{FontDescriptor, FontFamily, FontMetrics, FontSlant, FontWeight};
use crate::tree::Viewport;

/// Base font size for body text, in pixels.
const BASE_FONT_SIZE: u32 = 16;

/// A word waiting on the current line, not yet placed vertically.
#[derive(Debug, Clone)]
pub struct LineItem {
    /// Horizontal offset from the box's left edge.
    pub x: f32,
    /// The word itself.
    pub text: String,
    /// The font the word was measured in.
    pub font: FontDescriptor,
    /// Superscripts top-align with the tallest item on the line instead
    /// of sharing its baseline.
    pub superscript: bool,
}

/// A word with its final position, ready for painting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedText {
    /// Absolute x of the word's left edge.
    pub x: f32,
    /// Absolute y of the word's top edge.
    pub y: f32,
    /// The word itself.
    pub text: String,
    /// The font to draw the word in.
    pub font: FontDescriptor,
    /// Line advance height of the font, captured at placement time so
    /// the paint list can expose a vertical extent without re-measuring.
    pub linespace: f32,
}

/// Text styling state carried through the inline walk.
#[derive(Debug, Clone, Copy)]
struct TextStyle {
    weight: FontWeight,
    slant: FontSlant,
    size: u32,
    superscript: bool,
    pre: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            weight: FontWeight::Normal,
            slant: FontSlant::Roman,
            size: BASE_FONT_SIZE,
            superscript: false,
            pre: false,
        }
    }
}

/// State for laying out one inline-mode box.
///
/// Cursor coordinates are relative to the box; placed items come out in
/// absolute coordinates. The `x`/`width` fields start as the box's
/// geometry and may be adjusted by tag effects (`li` indentation), so
/// the caller writes them back after the flow finishes.
pub struct InlineFlow {
    /// Absolute x of the box's left edge.
    pub x: f32,
    /// Absolute y of the box's top edge.
    pub y: f32,
    /// Available width for line breaking.
    pub width: f32,
    /// Horizontal cursor, relative to the box.
    pub cursor_x: f32,
    /// Vertical cursor, relative to the box. After the final flush this
    /// is the box's height.
    pub cursor_y: f32,
    /// Height of the first finished line (used to center list bullets).
    pub first_line_height: f32,
    /// Placed words, in document order.
    pub items: Vec<PlacedText>,
    line: Vec<LineItem>,
    style: TextStyle,
    /// Snapshots pushed by styling open tags and popped by their close
    /// tags, so nested identical tags restore correctly.
    style_stack: Vec<TextStyle>,
    viewport: Viewport,
}

impl InlineFlow {
    /// Start a flow over a box with the given geometry.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, viewport: Viewport) -> Self {
        InlineFlow {
            x,
            y,
            width,
            cursor_x: 0.0,
            cursor_y: 0.0,
            first_line_height: 0.0,
            items: Vec::new(),
            line: Vec::new(),
            style: TextStyle::default(),
            style_stack: Vec::new(),
            viewport,
        }
    }

    /// Walk a subtree in document order, flowing its text into lines.
    pub fn walk(&mut self, dom: &DomTree, node: NodeId, metrics: &dyn FontMetrics) {
        if let Some(text) = dom.as_text(node) {
            self.text(text, metrics);
        } else if let Some(tag) = dom.tag(node) {
            let tag = tag.to_string();
            self.open_tag(&tag, metrics);
            for &child in dom.children(node) {
                self.walk(dom, child, metrics);
            }
            self.close_tag(&tag, metrics);
        }
    }

    /// Flush whatever line is still pending. Call once after the walk.
    pub fn finish(&mut self, metrics: &dyn FontMetrics) {
        self.flush(metrics);
    }

    fn open_tag(&mut self, tag: &str, metrics: &dyn FontMetrics) {
        match tag {
            "i" => {
                self.push_style();
                self.style.slant = FontSlant::Italic;
            }
            "b" => {
                self.push_style();
                self.style.weight = FontWeight::Bold;
            }
            "small" => {
                self.push_style();
                self.style.size = self.style.size.saturating_sub(2);
            }
            "big" => {
                self.push_style();
                self.style.size += 4;
            }
            "sup" => {
                self.push_style();
                self.style.superscript = true;
            }
            "pre" => {
                self.push_style();
                self.style.pre = true;
            }
            "br" => self.flush(metrics),
            "li" => {
                // List items are indented and correspondingly narrowed.
                let indent = 2.0 * self.viewport.hstep;
                self.x += indent;
                self.width -= indent;
            }
            _ => {}
        }
    }

    fn close_tag(&mut self, tag: &str, metrics: &dyn FontMetrics) {
        match tag {
            "i" | "b" | "small" | "big" | "sup" | "pre" => self.pop_style(),
            "p" => {
                // End of a paragraph: finish the line and leave a gap.
                self.flush(metrics);
                self.cursor_y += self.viewport.vstep;
            }
            _ => {}
        }
    }

    fn push_style(&mut self) {
        self.style_stack.push(self.style);
    }

    fn pop_style(&mut self) {
        if let Some(style) = self.style_stack.pop() {
            self.style = style;
        }
    }

    /// The font for the current style state.
    ///
    /// Preformatted text uses the plain monospace face; superscripts use
    /// the current face at half size.
    fn current_font(&self) -> FontDescriptor {
        if self.style.pre {
            return FontDescriptor {
                family: FontFamily::Monospace,
                size: self.style.size,
                weight: FontWeight::Normal,
                slant: FontSlant::Roman,
            };
        }
        let size = if self.style.superscript {
            self.style.size / 2
        } else {
            self.style.size
        };
        FontDescriptor {
            family: FontFamily::Proportional,
            size,
            weight: self.style.weight,
            slant: self.style.slant,
        }
    }

    /// Flow a text run: split into words, breaking lines as needed.
    fn text(&mut self, text: &str, metrics: &dyn FontMetrics) {
        let font = self.current_font();
        for word in text.split_whitespace() {
            self.word(word, &font, metrics);
        }
    }

    /// Append one word to the pending line, flushing first if the word
    /// would pass the right edge.
    fn word(&mut self, word: &str, font: &FontDescriptor, metrics: &dyn FontMetrics) {
        let word_width = metrics.measure(word, font);
        if self.cursor_x + word_width > self.width {
            self.flush(metrics);
        }
        self.line.push(LineItem {
            x: self.cursor_x,
            text: word.to_string(),
            font: *font,
            superscript: self.style.superscript,
        });
        self.cursor_x += word_width + metrics.measure(" ", font);
    }

    /// Place the pending line.
    ///
    /// The baseline sits 1.25x the tallest ascent below the cursor, to
    /// leave leading above the line. Each word's top is its own ascent
    /// above the baseline, except superscripts, which top-align with the
    /// tallest word. The cursor then drops 1.25x the deepest descent
    /// below the baseline for the next line.
    fn flush(&mut self, metrics: &dyn FontMetrics) {
        if self.line.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.line);
        let line_metrics: Vec<_> = line.iter().map(|item| metrics.metrics(&item.font)).collect();

        let max_ascent = line_metrics.iter().map(|m| m.ascent).fold(0.0, f32::max);
        let baseline = self.cursor_y + 1.25 * max_ascent;

        for (item, item_metrics) in line.into_iter().zip(&line_metrics) {
            let item_y = if item.superscript {
                baseline - max_ascent
            } else {
                baseline - item_metrics.ascent
            };
            self.items.push(PlacedText {
                x: self.x + item.x,
                y: self.y + item_y,
                text: item.text,
                font: item.font,
                linespace: item_metrics.linespace,
            });
        }

        self.cursor_x = 0.0;
        let max_descent = line_metrics.iter().map(|m| m.descent).fold(0.0, f32::max);
        self.cursor_y = baseline + 1.25 * max_descent;

        if self.first_line_height == 0.0 {
            self.first_line_height = self.cursor_y;
        }
    }
}
