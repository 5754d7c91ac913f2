//! Document tree implementation for the Tern engine.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships: every node lives in one contiguous vector and refers to
//! its parent and children by index. This gives O(1) access and traversal
//! in safe code, without the reference cycles that parent/child pointers
//! would need.
//!
//! Nodes are either text runs or elements. The tree builder allocates
//! nodes incrementally while parsing; once the finished tree is handed to
//! layout it is treated as immutable. The finished root is always an
//! `html` element at [`NodeId::ROOT`], whether the markup spelled it out
//! or the builder inserted it implicitly.

use std::collections::{HashMap, HashSet};

/// Map of attribute names to values for an element.
///
/// Names are lower-cased on insertion by the attribute parser; duplicate
/// names overwrite. Insertion order is not significant.
pub type AttrMap = HashMap<String, String>;

/// A type-safe index into the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root `html` element of a finished tree is always at index 0:
    /// the builder opens it (explicitly or implicitly) before any other
    /// node can be allocated.
    pub const ROOT: NodeId = NodeId(0);
}

/// A single node in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its kind-specific data.
    pub kind: NodeKind,

    /// The node's parent. `None` for the root and for nodes still open
    /// on the builder's unfinished stack.
    pub parent: Option<NodeId>,

    /// Ordered children, in document order. Always empty for text nodes.
    pub children: Vec<NodeId>,
}

/// The two kinds of node the engine distinguishes.
///
/// Comments and doctypes never materialize: the tree builder discards
/// them during scanning.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A run of character data.
    Text(String),
    /// An element with a tag name and attributes.
    Element(ElementData),
}

/// Element-specific data.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// The element's tag name, as written in the markup.
    pub tag: String,
    /// The element's attributes.
    pub attrs: AttrMap,
}

impl ElementData {
    /// Returns the element's id attribute value if present.
    pub fn id(&self) -> Option<&String> {
        self.attrs.get("id")
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// The class attribute holds a set of space-separated tokens.
    pub fn classes(&self) -> HashSet<&str> {
        match self.attrs.get("class") {
            Some(classlist) => classlist.split(' ').collect(),
            None => HashSet::new(),
        }
    }
}

/// Arena-based document tree with O(1) node access.
///
/// All nodes live in a contiguous vector, indexed by [`NodeId`]. The tree
/// starts empty; the tree builder allocates nodes with [`DomTree::alloc`]
/// and wires them up with [`DomTree::append_child`]. Allocation order is
/// document order, so [`NodeId::ROOT`] is the `html` root of a finished
/// tree.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    /// All nodes in the tree, indexed by NodeId.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the root node ID.
    ///
    /// Only meaningful on a finished tree (the builder guarantees at
    /// least the root exists before handing the tree out).
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            NodeKind::Element(_) => None,
        })
    }

    /// Get the tag name if this node is an element.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|data| data.tag.as_str())
    }

    /// The `body` element of a finished tree: the first child of the root
    /// with that tag name, if any.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.tag(id) == Some("body"))
            .copied()
    }

    /// Iterate over `root` and all its descendants, in document order
    /// (pre-order, depth-first).
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![root],
        }
    }

    /// Concatenated text content of a node and its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.as_text(node) {
                out.push_str(text);
            }
        }
        out
    }
}

/// Document-order iterator over a subtree. See [`DomTree::descendants`].
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Children pushed in reverse so the leftmost pops first.
        for &child in self.tree.children(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}
