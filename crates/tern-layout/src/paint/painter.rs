//! Paint list construction from a finished layout tree.

use tern_dom::{DomTree, ElementData};

use crate::mode::LayoutMode;
use crate::paint::display_list::{Color, DrawCommand, PaintList};
use crate::tree::{BoxId, LayoutBox, LayoutTree};

/// Walk the layout tree in document order and emit draw commands.
///
/// Each box paints its own decoration first and its children after, so
/// children layer on top of their parent's background:
/// - a `nav` element with `class="links"` gets a light gray background
/// - a `pre` element gets a gray background
/// - a `li` element gets a small square bullet to the left of its
///   content, centered on its first line
/// - an inline-mode box emits one text command per placed word
#[must_use]
pub fn paint(tree: &LayoutTree, dom: &DomTree) -> PaintList {
    let mut list = PaintList::new();
    paint_box(tree, dom, BoxId::DOCUMENT, &mut list);
    list
}

fn paint_box(tree: &LayoutTree, dom: &DomTree, id: BoxId, list: &mut PaintList) {
    let layout_box = tree.get(id);

    if let Some(element) = dom.as_element(layout_box.node) {
        paint_decorations(layout_box, element, tree.viewport().hstep, list);
    }

    if layout_box.mode == LayoutMode::Inline {
        for item in &layout_box.items {
            list.push(DrawCommand::Text {
                x: item.x,
                y: item.y,
                text: item.text.clone(),
                font: item.font,
                bottom: item.y + item.linespace,
            });
        }
    }

    for &child in &layout_box.children {
        paint_box(tree, dom, child, list);
    }
}

/// Background and bullet decorations for one element's box.
fn paint_decorations(
    layout_box: &LayoutBox,
    element: &ElementData,
    hstep: f32,
    list: &mut PaintList,
) {
    if element.tag == "nav" && element.attrs.get("class").map(String::as_str) == Some("links") {
        list.push(DrawCommand::Rect {
            left: layout_box.x,
            top: layout_box.y,
            right: layout_box.x + layout_box.width,
            bottom: layout_box.y + layout_box.height,
            color: Color::LIGHT_GRAY,
        });
    }

    if element.tag == "pre" {
        list.push(DrawCommand::Rect {
            left: layout_box.x,
            top: layout_box.y,
            right: layout_box.x + layout_box.width,
            bottom: layout_box.y + layout_box.height,
            color: Color::GRAY,
        });
    }

    if element.tag == "li" {
        let left = layout_box.x - hstep - 2.0;
        let top = layout_box.y + layout_box.first_line_height / 2.0 - 2.0;
        list.push(DrawCommand::Rect {
            left,
            top,
            right: left + 4.0,
            bottom: top + 4.0,
            color: Color::BLACK,
        });
    }
}
