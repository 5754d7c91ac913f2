//! Painting: turning a finished layout tree into draw commands.
//!
//! The paint phase walks the layout tree and produces an ordered list of
//! drawing commands. Commands carry a vertical extent so the rendering
//! side can skip everything outside the scrolled viewport; the builder
//! itself never clips.

pub mod display_list;
pub mod painter;

pub use display_list::{Color, DrawCommand, PaintList};
pub use painter::paint;
