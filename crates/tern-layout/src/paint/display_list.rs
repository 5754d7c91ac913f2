//! The paint list: a sequence of drawing commands.
//!
//! Commands are appended in painting order (back to front), so a
//! renderer can simply iterate and execute each one. Every command
//! exposes its vertical extent; skipping commands outside the scrolled
//! viewport, and translating y by the scroll offset, are the renderer's
//! job.

use serde::Serialize;

use crate::fonts::FontDescriptor;

/// A solid RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Bullet and text decoration color.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    /// Background for preformatted blocks.
    pub const GRAY: Color = Color {
        r: 0xbe,
        g: 0xbe,
        b: 0xbe,
    };
    /// Background for navigation link bars.
    pub const LIGHT_GRAY: Color = Color {
        r: 0xd3,
        g: 0xd3,
        b: 0xd3,
    };
}

/// A single drawing command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Draw a run of text with its top-left corner at (x, y).
    Text {
        /// X coordinate of the run's left edge.
        x: f32,
        /// Y coordinate of the run's top edge.
        y: f32,
        /// The text to draw.
        text: String,
        /// The font to draw it in.
        font: FontDescriptor,
        /// Bottom of the run's vertical extent (top plus the font's
        /// line advance).
        bottom: f32,
    },
    /// Fill a rectangle with a solid color.
    Rect {
        /// Left edge.
        left: f32,
        /// Top edge.
        top: f32,
        /// Right edge.
        right: f32,
        /// Bottom edge.
        bottom: f32,
        /// Fill color.
        color: Color,
    },
}

impl DrawCommand {
    /// Top of this command's vertical extent.
    #[must_use]
    pub fn top(&self) -> f32 {
        match self {
            DrawCommand::Text { y, .. } => *y,
            DrawCommand::Rect { top, .. } => *top,
        }
    }

    /// Bottom of this command's vertical extent.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        match self {
            DrawCommand::Text { bottom, .. } | DrawCommand::Rect { bottom, .. } => *bottom,
        }
    }
}

/// An ordered list of drawing commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaintList {
    commands: Vec<DrawCommand>,
}

impl PaintList {
    /// Create an empty paint list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append a command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// The commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands whose vertical extent intersects the window
    /// `[scroll, scroll + viewport_height]`.
    ///
    /// This is the clipping contract for the rendering side: everything
    /// this iterator skips is guaranteed invisible at that scroll
    /// position. The renderer still translates each command's y by
    /// the scroll offset when drawing.
    pub fn visible(&self, scroll: f32, viewport_height: f32) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(move |command| {
                command.top() <= scroll + viewport_height && command.bottom() >= scroll
            })
    }
}
