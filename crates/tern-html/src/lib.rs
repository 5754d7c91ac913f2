//! HTML tokenizer and tree builder for the Tern engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tree Builder** - a single-pass character scanner that recognizes
//!   tag boundaries, comments, and script content, and grows an arena
//!   document tree directly, inserting the implicit `html`/`head`/`body`
//!   structure and splitting non-nesting paragraphs
//! - **Attribute Parser** - quote- and escape-aware splitting of start
//!   tag text into a tag name and attribute map
//!
//! # Not Implemented
//!
//! This is deliberately not a conformant WHATWG parser. There is no
//! separate token stream, no insertion-mode machine, no character
//! reference resolution beyond the four basic entities, no foster
//! parenting, and no adoption agency algorithm. Malformed markup is
//! absorbed by best-effort recovery instead of error handling.

/// Start-tag attribute parsing.
pub mod attributes;
/// Tree construction from raw markup.
pub mod parser;

pub use attributes::parse_tag;
pub use parser::{TreeBuilder, parse, print_tree, tree_to_string};
