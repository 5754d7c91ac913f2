//! High-level document pipeline for the Tern engine.
//!
//! # Scope
//!
//! This crate ties the lower layers together:
//! - **Document Loading** - fetch (with response caching) or read a
//!   file, then parse it into a document tree
//! - **Rendering Pipeline** - lay the tree out for a viewport and build
//!   the paint list
//! - **Font Metrics** - a fontdue-backed implementation of the layout
//!   engine's measurement interface
//!
//! The pipeline is synchronous and single-threaded: a document is fully
//! loaded before parsing begins, and layout and paint run to completion
//! over an immutable tree. Re-rendering after a viewport change rebuilds
//! the layout tree and paint list from scratch.
//!
//! Drawing pixels is out of scope. A renderer takes the finished
//! [`PaintList`], asks it for [`PaintList::visible`] commands at the
//! current scroll offset, and rasterizes those, translating each
//! command's y by the scroll offset.

pub mod font_metrics;

pub use tern_common as common;
pub use tern_dom as dom;
pub use tern_html as html;
pub use tern_layout as layout;

pub use font_metrics::FontBook;

use std::fs;

use thiserror::Error;

use tern_common::net::{FetchError, HeaderMap, ResponseCache, fetch_cached};
use tern_common::warning::clear_warnings;
use tern_dom::DomTree;
use tern_layout::{
    ApproximateMetrics, FontMetrics, LayoutTree, PaintList, Viewport, paint,
};

/// A loaded and parsed document.
pub struct LoadedDocument {
    /// Where the document came from (URL or file path).
    pub location: String,
    /// Response headers. Empty for local files.
    pub headers: HeaderMap,
    /// Raw markup.
    pub source: String,
    /// The parsed document tree.
    pub dom: DomTree,
}

/// A document rendered for a particular viewport.
pub struct RenderedPage {
    /// The finished layout tree.
    pub layout: LayoutTree,
    /// Draw commands in painting order.
    pub paint: PaintList,
}

impl RenderedPage {
    /// Total page height, for scroll clamping.
    #[must_use]
    pub fn page_height(&self) -> f32 {
        self.layout.page_height()
    }
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a local file.
    #[error("failed to read '{path}': {source}")]
    File {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to fetch a URL.
    #[error(transparent)]
    Network(#[from] FetchError),
}

/// One browsing session: the response cache and the font metrics
/// collaborator, with lifecycles scoped to the session.
pub struct Session {
    cache: ResponseCache,
    fonts: SessionFonts,
}

/// The session's measurement source.
enum SessionFonts {
    /// Real faces loaded through fontdue.
    Book(FontBook),
    /// Ratio-based approximation, used when no fonts are available.
    Approximate,
}

impl Session {
    /// A session measuring with approximate (ratio-based) metrics.
    #[must_use]
    pub fn new() -> Self {
        Session {
            cache: ResponseCache::new(),
            fonts: SessionFonts::Approximate,
        }
    }

    /// A session measuring with loaded fonts.
    #[must_use]
    pub fn with_fonts(fonts: FontBook) -> Self {
        Session {
            cache: ResponseCache::new(),
            fonts: SessionFonts::Book(fonts),
        }
    }

    /// A session measuring with system fonts when available, falling
    /// back to approximate metrics.
    #[must_use]
    pub fn with_system_fonts() -> Self {
        match FontBook::system() {
            Ok(book) => Self::with_fonts(book),
            Err(_) => Self::new(),
        }
    }

    /// The session's font metrics collaborator.
    #[must_use]
    pub fn metrics(&self) -> &dyn FontMetrics {
        match &self.fonts {
            SessionFonts::Book(book) => book,
            SessionFonts::Approximate => &ApproximateMetrics,
        }
    }

    /// Load a document from a URL (`http://` or `https://`) or a file
    /// path, and parse it.
    ///
    /// URL responses go through the session's response cache.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read or the fetch
    /// fails.
    pub fn load(&mut self, location: &str) -> Result<LoadedDocument, LoadError> {
        clear_warnings();

        let (headers, source) =
            if location.starts_with("http://") || location.starts_with("https://") {
                fetch_cached(&mut self.cache, location)?
            } else {
                let content = fs::read_to_string(location).map_err(|e| LoadError::File {
                    path: location.to_string(),
                    source: e,
                })?;
                (HeaderMap::new(), content)
            };

        let dom = tern_html::parse(&source);
        Ok(LoadedDocument {
            location: location.to_string(),
            headers,
            source,
            dom,
        })
    }

    /// Lay out and paint a document for a viewport.
    ///
    /// Deterministic: the same tree and viewport always produce the
    /// same paint list.
    #[must_use]
    pub fn render(&self, dom: &DomTree, viewport: Viewport) -> RenderedPage {
        let layout = LayoutTree::layout(dom, viewport, self.metrics());
        let paint = paint(&layout, dom);
        RenderedPage { layout, paint }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_deterministic_across_sessions() {
        let dom = tern_html::parse("<h1>t</h1><p>body text</p>");
        let viewport = Viewport::default();

        let first = Session::new().render(&dom, viewport);
        let second = Session::new().render(&dom, viewport);
        assert_eq!(first.paint, second.paint);
    }

    #[test]
    fn page_height_matches_layout() {
        let dom = tern_html::parse("<p>x</p>");
        let page = Session::new().render(&dom, Viewport::default());
        assert!((page.page_height() - page.layout.page_height()).abs() < f32::EPSILON);
        assert!(page.page_height() > 0.0);
    }

    #[test]
    fn loading_a_missing_file_is_an_error() {
        let mut session = Session::new();
        let result = session.load("/definitely/not/a/real/path.html");
        assert!(matches!(result, Err(LoadError::File { .. })));
    }
}
