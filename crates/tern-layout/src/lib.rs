//! Layout engine for the Tern engine.
//!
//! Turns a finished document tree into a tree of positioned boxes, then
//! into an ordered list of paint commands.
//!
//! # Module Structure
//!
//! - [`mode`] - block vs. inline classification
//! - [`fonts`] - font descriptors and the measurement interface
//! - [`inline`] - text flow, line breaking, and baseline placement
//! - [`tree`] - the layout box arena and the layout pass
//! - [`paint`] - paint list construction
//!
//! # Model
//!
//! The layout is a simple vertical flow: block-mode boxes stack their
//! children top to bottom at full width; inline-mode boxes flow their
//! subtree's words into lines. There is no cascade, no float, and no
//! flex or grid; the block element list and the handful of inline tag
//! effects (`b`, `i`, `small`, `big`, `sup`, `pre`, `br`, `li`, `p`) are
//! fixed.
//!
//! The whole pass is synchronous and deterministic: laying out the same
//! tree at the same viewport twice yields an identical paint list.

pub mod fonts;
pub mod inline;
pub mod mode;
pub mod paint;
pub mod tree;

pub use fonts::{
    ApproximateMetrics, FontDescriptor, FontFamily, FontMetrics, FontSlant, FontWeight,
    LineMetrics,
};
pub use inline::{InlineFlow, LineItem, PlacedText};
pub use mode::{BLOCK_ELEMENTS, LayoutMode, layout_mode};
pub use paint::{Color, DrawCommand, PaintList, paint};
pub use tree::{BoxId, LayoutBox, LayoutTree, Viewport};
