//! The layout box tree and the block/inline layout pass.
//!
//! Layout mirrors the document tree with a parallel tree of boxes, each
//! carrying resolved geometry. Like the document tree, boxes live in a
//! single arena and refer to their parent, previous sibling, and
//! children by index, so the recursive layout pass needs no shared
//! mutable references.
//!
//! Geometry flows in two directions: width and x are inherited top-down
//! from the parent before a box's children are visited, y comes from the
//! previous sibling's bottom edge (vertical stacking), and height is
//! derived bottom-up once children are done. This is a simple flow
//! layout, not a general flex or grid model.

use serde::Serialize;
use tern_dom::{DomTree, NodeId};

use crate::fonts::FontMetrics;
use crate::inline::{InlineFlow, PlacedText};
use crate::mode::{LayoutMode, layout_mode};

/// Layout configuration supplied by the caller: the viewport size and
/// the fixed horizontal/vertical step used for margins, list indents,
/// and paragraph gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Horizontal step: page margin and indent unit.
    pub hstep: f32,
    /// Vertical step: page margin and paragraph gap unit.
    pub vstep: f32,
}

impl Viewport {
    /// A viewport with the default step sizes and the given dimensions.
    #[must_use]
    pub fn with_size(width: f32, height: f32) -> Self {
        Viewport {
            width,
            height,
            ..Viewport::default()
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 800.0,
            height: 600.0,
            hstep: 13.0,
            vstep: 18.0,
        }
    }
}

/// A type-safe index into the layout box arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoxId(pub usize);

impl BoxId {
    /// The document box is always at index 0.
    pub const DOCUMENT: BoxId = BoxId(0);
}

/// One box in the layout tree.
///
/// Geometry fields are meaningless until the layout pass has run; after
/// it they are fully resolved, in absolute pixel coordinates.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// The document node this box lays out.
    pub node: NodeId,
    /// Owning parent box. `None` only for the document box.
    pub parent: Option<BoxId>,
    /// The sibling box directly above this one, used for stacking.
    pub previous: Option<BoxId>,
    /// Child boxes, in document order.
    pub children: Vec<BoxId>,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width. Inherited from the parent before children lay out.
    pub width: f32,
    /// Box height. Derived bottom-up after children lay out.
    pub height: f32,
    /// How this box's contents were laid out.
    pub mode: LayoutMode,
    /// Words placed by inline flow. Empty for block-mode boxes.
    pub items: Vec<PlacedText>,
    /// Height of the box's first text line (inline mode), used to
    /// vertically center list bullets.
    pub first_line_height: f32,
}

impl LayoutBox {
    fn new(node: NodeId, parent: Option<BoxId>, previous: Option<BoxId>) -> Self {
        LayoutBox {
            node,
            parent,
            previous,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            mode: LayoutMode::default(),
            items: Vec::new(),
            first_line_height: 0.0,
        }
    }
}

/// The finished layout tree: an arena of boxes with resolved geometry.
///
/// Index 0 is the document box, which owns exactly one child wrapping
/// the document root and carries the page margins. Re-running layout
/// builds a fresh tree from scratch; nothing is updated incrementally.
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
    viewport: Viewport,
}

impl LayoutTree {
    /// Lay out a document tree for the given viewport.
    ///
    /// The input tree is not re-validated: it must be a finished tree
    /// from the builder, with a single root and consistent parent links.
    #[must_use]
    pub fn layout(dom: &DomTree, viewport: Viewport, metrics: &dyn FontMetrics) -> Self {
        let mut tree = LayoutTree {
            boxes: Vec::new(),
            viewport,
        };

        // The document box wraps the root in the page margins.
        let document = tree.push_box(dom.root(), None, None);
        let root = tree.push_box(dom.root(), Some(document), None);
        tree.boxes[document.0].children.push(root);

        tree.boxes[document.0].width = viewport.width - 2.0 * viewport.hstep;
        tree.boxes[document.0].x = viewport.hstep;
        tree.boxes[document.0].y = viewport.vstep;
        tree.boxes[document.0].mode = layout_mode(dom, dom.root());

        tree.layout_box(root, dom, metrics);
        tree.boxes[document.0].height = tree.boxes[root.0].height + 2.0 * viewport.vstep;

        tree
    }

    /// Get a box by its ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID does not belong to this tree.
    #[must_use]
    pub fn get(&self, id: BoxId) -> &LayoutBox {
        &self.boxes[id.0]
    }

    /// The document box.
    #[must_use]
    pub fn document(&self) -> &LayoutBox {
        &self.boxes[BoxId::DOCUMENT.0]
    }

    /// Total page height, including the page margins.
    #[must_use]
    pub fn page_height(&self) -> f32 {
        self.document().height
    }

    /// The viewport this tree was laid out for.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of boxes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the tree holds no boxes (never true after layout).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn push_box(&mut self, node: NodeId, parent: Option<BoxId>, previous: Option<BoxId>) -> BoxId {
        let id = BoxId(self.boxes.len());
        self.boxes.push(LayoutBox::new(node, parent, previous));
        id
    }

    /// Lay out one box: inherit geometry, handle children by mode, then
    /// derive the box's height.
    fn layout_box(&mut self, id: BoxId, dom: &DomTree, metrics: &dyn FontMetrics) {
        // Top-down: width and x come from the parent, y stacks below the
        // previous sibling (or starts at the parent's top).
        let parent = self.boxes[id.0].parent.expect("only the document box has no parent");
        let (parent_x, parent_y, parent_width) = {
            let parent_box = &self.boxes[parent.0];
            (parent_box.x, parent_box.y, parent_box.width)
        };
        let y = match self.boxes[id.0].previous {
            Some(previous) => {
                let previous_box = &self.boxes[previous.0];
                previous_box.y + previous_box.height
            }
            None => parent_y,
        };

        {
            let layout_box = &mut self.boxes[id.0];
            layout_box.width = parent_width;
            layout_box.x = parent_x;
            layout_box.y = y;
        }

        let node = self.boxes[id.0].node;
        let mode = layout_mode(dom, node);
        self.boxes[id.0].mode = mode;

        match mode {
            LayoutMode::Block => {
                // One child box per child node, chained through previous
                // links. The head element carries no visual content.
                let mut previous = None;
                for &child_node in dom.children(node) {
                    if dom.tag(child_node) == Some("head") {
                        continue;
                    }
                    let child = self.push_box(child_node, Some(id), previous);
                    self.boxes[id.0].children.push(child);
                    previous = Some(child);
                }

                let children = self.boxes[id.0].children.clone();
                for child in children {
                    self.layout_box(child, dom, metrics);
                }

                let height: f32 = self.boxes[id.0]
                    .children
                    .iter()
                    .map(|&child| self.boxes[child.0].height)
                    .sum();
                self.boxes[id.0].height = height;
            }
            LayoutMode::Inline => {
                let (x, width) = {
                    let layout_box = &self.boxes[id.0];
                    (layout_box.x, layout_box.width)
                };
                let mut flow = InlineFlow::new(x, y, width, self.viewport);
                flow.walk(dom, node, metrics);
                flow.finish(metrics);

                let layout_box = &mut self.boxes[id.0];
                // Tag effects (list indents) may have moved the box.
                layout_box.x = flow.x;
                layout_box.width = flow.width;
                layout_box.items = std::mem::take(&mut flow.items);
                layout_box.first_line_height = flow.first_line_height;
                layout_box.height = flow.cursor_y;
            }
        }
    }
}
