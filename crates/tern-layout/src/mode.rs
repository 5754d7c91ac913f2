//! Layout mode classification.
//!
//! Each node's children are laid out either as a vertical stack of
//! blocks or as flowed inline content. The choice is a pure function of
//! the node itself, driven by the fixed set of block-level tag names.

use serde::Serialize;
use strum_macros::Display;
use tern_dom::{DomTree, NodeId};

/// Elements laid out as blocks by default.
///
/// [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
/// lists the elements rendered `display: block` (plus list items, which
/// this engine treats the same way).
pub const BLOCK_ELEMENTS: &[&str] = &[
    "html",
    "body",
    "article",
    "section",
    "nav",
    "aside",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hgroup",
    "header",
    "footer",
    "address",
    "p",
    "hr",
    "pre",
    "blockquote",
    "ol",
    "ul",
    "menu",
    "li",
    "dl",
    "dt",
    "dd",
    "figure",
    "figcaption",
    "main",
    "div",
    "table",
    "form",
    "fieldset",
    "legend",
    "details",
    "summary",
];

/// How a node's children are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize)]
pub enum LayoutMode {
    /// Children stack vertically, one box per child.
    #[default]
    Block,
    /// Contents flow into lines of text.
    Inline,
}

/// Classify a node.
///
/// Text is always inline. An element with no children is a block, so
/// that empty containers still occupy block space. An element whose
/// direct children include any block-level element is a block; anything
/// else flows inline.
#[must_use]
pub fn layout_mode(dom: &DomTree, node: NodeId) -> LayoutMode {
    if dom.as_text(node).is_some() {
        return LayoutMode::Inline;
    }
    let children = dom.children(node);
    if children.is_empty() {
        return LayoutMode::Block;
    }
    let has_block_child = children
        .iter()
        .any(|&child| dom.tag(child).is_some_and(|tag| BLOCK_ELEMENTS.contains(&tag)));
    if has_block_child {
        LayoutMode::Block
    } else {
        LayoutMode::Inline
    }
}
