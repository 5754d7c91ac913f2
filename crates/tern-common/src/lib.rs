//! Shared utilities for the Tern engine.
//!
//! This crate holds the pieces that sit at the boundary of the core
//! pipeline: the blocking HTTP fetch used by the document loader (with a
//! small response cache honoring `Cache-Control`), and deduplicated
//! warning output used by the parser to report tolerated-but-suspect
//! markup.

pub mod net;
pub mod warning;

pub use net::{FetchError, HeaderMap, ResponseCache, fetch, fetch_cached};
pub use warning::{clear_warnings, warn_once};
