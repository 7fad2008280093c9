//! # unbind
//!
//! Convert an EPUB archive into a set of sanitized, standalone, navigable
//! HTML pages.
//!
//! An EPUB is a zip archive with one markup file per chapter. `unbind` pulls
//! those chapter members out, strips their markup down to a fixed tag
//! allow-list (attributes dropped wholesale, disallowed wrappers removed but
//! their content kept), wraps each fragment into a themed standalone page
//! with prev/next navigation, and finishes with a table-of-contents entry
//! page. Chapters are processed concurrently on a fixed worker pool; output
//! order is always the lexicographic order of the archive member names,
//! never worker completion order.
//!
//! ## Quick start
//!
//! ```no_run
//! use unbind::{Config, process_epub};
//!
//! let config = Config::new("clean_output").with_workers(4);
//! let summary = process_epub(&config, "book.epub")?;
//! println!("{} of {} chapters written", summary.chapters.len(), summary.candidates);
//! # Ok::<(), unbind::Error>(())
//! ```
//!
//! A single bad chapter never aborts a run: read or write failures drop that
//! chapter and the index page simply skips it. Malformed markup is never an
//! error either - the parser recovers and the text still reaches the reader.

pub mod config;
pub(crate) mod dom;
pub mod error;
pub mod index;
pub mod page;
pub mod pipeline;
pub mod sanitize;

pub use config::{Config, DEFAULT_ALLOWED_TAGS, DEFAULT_OUTPUT_DIR};
pub use error::{Error, Result};
pub use pipeline::{ChapterResult, RunSummary, process_epub};
pub use sanitize::clean;
