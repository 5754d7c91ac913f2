//! HTML tree construction.
//!
//! A single forward scan over the markup drives tree building directly:
//! there is no separate token stream. The scanner recognizes comments,
//! script content, quoted attribute values, and tag boundaries; everything
//! else accumulates into a text buffer. Committed tags pass through the
//! attribute parser and the tag-insertion rules below, growing an arena
//! [`DomTree`] incrementally.
//!
//! The builder's only bookkeeping is the stack of *unfinished* nodes:
//! elements that have been opened but not yet closed, root first, most
//! recently opened last. Closing a tag pops the innermost unfinished node
//! and attaches it to its parent.
//!
//! The parser is maximally tolerant and never fails. Stray close tags are
//! ignored, doctypes and comments are discarded, and missing structural
//! elements (`html`, `head`, `body`) are synthesized, so every input
//! produces a tree with a single `html` root.

use tern_common::warning::warn_once;
use tern_dom::{AttrMap, DomTree, ElementData, NodeId, NodeKind};

use crate::attributes::parse_tag;

/// Tags that belong inside the `<head>` element.
///
/// Used by the implicit-tag rules to decide whether a bare document
/// fragment starts the head or the body.
const HEAD_ELEMENTS: &[&str] = &[
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// Void elements never surround content, so they are never pushed onto
/// the unfinished stack.
///
/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
/// "Void elements only have a start tag; end tags must not be specified
/// for void elements."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Builds a [`DomTree`] from raw markup in a single pass.
pub struct TreeBuilder {
    chars: Vec<char>,
    tree: DomTree,
    /// Open elements, root first, innermost last.
    unfinished: Vec<NodeId>,
}

/// Parse markup into a finished document tree.
///
/// Convenience wrapper around [`TreeBuilder`].
#[must_use]
pub fn parse(body: &str) -> DomTree {
    TreeBuilder::new(body).run()
}

impl TreeBuilder {
    /// Create a builder for the given markup.
    #[must_use]
    pub fn new(body: &str) -> Self {
        TreeBuilder {
            chars: body.chars().collect(),
            tree: DomTree::new(),
            unfinished: Vec::new(),
        }
    }

    /// Scan the input and return the finished tree.
    ///
    /// The returned tree always has an `html` element at its root, even
    /// for empty or tagless input.
    #[must_use]
    pub fn run(mut self) -> DomTree {
        let mut text = String::new();
        let mut in_tag = false;
        let mut in_comment = false;
        let mut in_single_quote = false;
        let mut in_double_quote = false;
        let mut in_script = false;
        let mut i = 0;

        while i < self.chars.len() {
            // Comments begin with <!-- and end with -->. They are not
            // tags: they may contain any text, including angle brackets,
            // and produce no node at all.
            if !in_comment && self.lookahead(i, "<!--") {
                i += 4;
                in_comment = true;
                continue;
            }
            if in_comment && self.lookahead(i, "-->") {
                i += 3;
                in_comment = false;
                if !text.is_empty() && !in_tag {
                    self.add_text(&std::mem::take(&mut text));
                }
                continue;
            }
            if in_comment {
                i += 1;
                continue;
            }

            let c = self.chars[i];

            // Quote state only matters between < and >. Quoted attribute
            // values can contain spaces and angle brackets.
            if in_tag {
                if c == '"' && !in_single_quote {
                    in_double_quote = !in_double_quote;
                } else if c == '\'' && !in_double_quote {
                    in_single_quote = !in_single_quote;
                }
            }

            if c == '<' {
                if in_script {
                    // Script content uses < to mean less-than. Only the
                    // literal close tag ends the region.
                    if self.lookahead(i, "</script>") {
                        in_script = false;
                    } else {
                        text.push(c);
                        i += 1;
                        continue;
                    }
                } else if in_tag && (in_single_quote || in_double_quote) {
                    text.push(c);
                    i += 1;
                    continue;
                }

                in_tag = true;
                if !text.is_empty() {
                    self.add_text(&text);
                }
                text.clear();
            } else if c == '>' {
                if in_script {
                    text.push(c);
                    i += 1;
                    continue;
                }
                if in_tag && (in_single_quote || in_double_quote) {
                    text.push(c);
                    i += 1;
                    continue;
                }

                in_tag = false;
                if let Some(name) = self.add_tag(&text) {
                    if name == "script" {
                        in_script = true;
                    }
                }
                text.clear();
            } else {
                text.push(c);
            }

            i += 1;
        }

        if !text.is_empty() && !in_tag {
            self.add_text(&text);
        }

        self.finish()
    }

    /// Compare the input at position `i` against a literal.
    fn lookahead(&self, i: usize, literal: &str) -> bool {
        literal
            .chars()
            .enumerate()
            .all(|(offset, c)| self.chars.get(i + offset) == Some(&c))
    }

    /// Flush a text buffer as a text node under the innermost unfinished
    /// element. Whitespace-only buffers are dropped.
    fn add_text(&mut self, text: &str) {
        if text.chars().all(char::is_whitespace) {
            return;
        }
        self.implicit_tags(None);
        let parent = *self
            .unfinished
            .last()
            .expect("implicit tags opened the root");
        let node = self.tree.alloc(NodeKind::Text(decode_entities(text)));
        self.tree.append_child(parent, node);
    }

    /// Commit a tag, given the raw text between its angle brackets.
    ///
    /// Returns the parsed tag name, or `None` when the tag was discarded.
    fn add_tag(&mut self, tag_text: &str) -> Option<String> {
        let (name, attrs) = parse_tag(tag_text);

        // Doctypes and malformed comment leftovers.
        if name.starts_with('!') {
            warn_once("HTML", &format!("discarding declaration <{name}>"));
            return None;
        }

        self.implicit_tags(Some(&name));

        if name.starts_with('/') {
            // A stray close with only the root open has nothing to close.
            if self.unfinished.len() == 1 {
                warn_once("HTML", &format!("ignoring stray close tag <{name}>"));
                return Some(name);
            }
            // A close tag finishes the innermost unfinished node and
            // attaches it to the next one up.
            let node = self.unfinished.pop().expect("checked above");
            let parent = *self.unfinished.last().expect("checked above");
            self.tree.append_child(parent, node);
        } else if VOID_ELEMENTS.contains(&name.as_str()) {
            let parent = *self
                .unfinished
                .last()
                .expect("implicit tags opened the root");
            let node = self.tree.alloc(element(&name, attrs));
            self.tree.append_child(parent, node);
        } else {
            if name == "p" && self.has_open_paragraph() {
                self.split_paragraph();
                return Some(name);
            }
            let node = self.tree.alloc(element(&name, attrs));
            self.unfinished.push(node);
        }

        Some(name)
    }

    /// Paragraphs do not nest. Opening a `p` while one is already open
    /// closes the old paragraph instead, then opens a fresh one. Any
    /// elements that were open inside the old paragraph are closed along
    /// with it and reopened (without attributes) inside the new one, so
    /// their formatting carries across the split.
    fn split_paragraph(&mut self) {
        let mut reopen = Vec::new();
        for &id in self.unfinished.iter().rev() {
            let tag = self.tree.tag(id).expect("unfinished nodes are elements");
            if tag == "p" {
                break;
            }
            reopen.push(tag.to_string());
        }
        reopen.reverse();

        // A close tag pops the innermost open node, so this closes one
        // level; reopening "p" recurses until the old paragraph itself
        // has been closed.
        let _ = self.add_tag("/p");
        let _ = self.add_tag("p");
        for tag in reopen {
            let _ = self.add_tag(&tag);
        }
    }

    /// Whether a `p` element is open anywhere on the unfinished stack.
    fn has_open_paragraph(&self) -> bool {
        self.unfinished
            .iter()
            .any(|&id| self.tree.tag(id) == Some("p"))
    }

    /// Synthesize structural tags the markup omitted.
    ///
    /// More than one tag can be missing in a row; each loop iteration
    /// inserts at most one. `tag` is the tag about to be inserted, or
    /// `None` for text.
    fn implicit_tags(&mut self, tag: Option<&str>) {
        loop {
            let open: Vec<&str> = self
                .unfinished
                .iter()
                .filter_map(|&id| self.tree.tag(id))
                .collect();

            // An implicit <html> is needed if the first tag in the
            // document is something other than <html>.
            if open.is_empty() && tag != Some("html") {
                let _ = self.add_tag("html");
            } else if open == ["html"] && !matches!(tag, Some("head" | "body" | "/html")) {
                // Both <head> and <body> can be omitted; which one to
                // insert depends on the tag being added.
                if tag.is_some_and(|t| HEAD_ELEMENTS.contains(&t)) {
                    let _ = self.add_tag("head");
                } else {
                    let _ = self.add_tag("body");
                }
            } else if open == ["html", "head"]
                && !tag.is_some_and(|t| t == "/head" || HEAD_ELEMENTS.contains(&t))
            {
                // </head> is implicit when the parser is inside <head>
                // and sees an element that belongs in <body>.
                let _ = self.add_tag("/head");
            } else {
                break;
            }
        }
    }

    /// Turn the incomplete tree into a complete one by closing every
    /// unfinished node, and hand back the arena.
    fn finish(mut self) -> DomTree {
        if self.unfinished.is_empty() {
            let _ = self.add_tag("html");
        }
        while self.unfinished.len() > 1 {
            let node = self.unfinished.pop().expect("len checked");
            let parent = *self.unfinished.last().expect("len checked");
            self.tree.append_child(parent, node);
        }
        let _ = self.unfinished.pop();
        self.tree
    }
}

/// Build an element node kind.
fn element(name: &str, attrs: AttrMap) -> NodeKind {
    NodeKind::Element(ElementData {
        tag: name.to_string(),
        attrs,
    })
}

/// Decode the basic character entities in flushed text.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Render a subtree as an indented outline, one node per line.
///
/// Elements print as `<tag key="value">`, text nodes as quoted strings.
#[must_use]
pub fn tree_to_string(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    format_node(tree, id, 0, &mut out);
    out
}

/// Print a subtree outline to stdout. See [`tree_to_string`].
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", tree_to_string(tree, id));
}

fn format_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    for _ in 0..indent {
        out.push(' ');
    }
    match &node.kind {
        NodeKind::Text(text) => out.push_str(&format!("{text:?}\n")),
        NodeKind::Element(data) => {
            out.push('<');
            out.push_str(&data.tag);
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort();
            for (key, value) in attrs {
                out.push_str(&format!(" {key}=\"{value}\""));
            }
            out.push_str(">\n");
            for &child in &node.children {
                format_node(tree, child, indent + 2, out);
            }
        }
    }
}
