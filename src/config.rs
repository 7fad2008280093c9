//! Run configuration.

use std::collections::HashSet;
use std::path::PathBuf;

/// Output directory used when the caller supplies none.
pub const DEFAULT_OUTPUT_DIR: &str = "clean_output";

/// Tags that survive sanitization by default: body text and the structural
/// elements chapter files actually use.
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "p", "br", "h1", "h2", "h3", "h4", "h5", "h6", "b", "i", "em", "strong", "blockquote", "ul",
    "ol", "li", "pre",
];

/// Immutable settings for a conversion run.
///
/// Built once, then passed by reference into every component; nothing mutates
/// it after construction.
///
/// # Example
///
/// ```
/// use unbind::Config;
///
/// let config = Config::new("out")
///     .with_allowed_tags(["p", "em"])
///     .with_workers(4);
/// assert!(config.allowed_tags.contains("em"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Element names whose tags survive sanitization, lowercase.
    pub allowed_tags: HashSet<String>,
    /// Directory the chapter pages and index page are written to.
    pub output_dir: PathBuf,
    /// Worker pool size; the pipeline clamps this to a minimum of 1.
    pub workers: usize,
}

impl Config {
    /// Create a configuration with the default allow-list and a worker count
    /// equal to the host's logical CPU count.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            output_dir: output_dir.into(),
            workers: default_workers(),
        }
    }

    /// Replace the allow-list.
    ///
    /// Names are normalized to ASCII lowercase so membership checks line up
    /// with the parser's element names.
    pub fn with_allowed_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_tags = tags
            .into_iter()
            .map(|t| t.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

/// Host logical CPU count, falling back to 1 when unavailable.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
