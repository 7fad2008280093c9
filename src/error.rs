//! Error types for unbind operations.

use thiserror::Error;

/// Errors that can abort a conversion run.
///
/// Only run-fatal conditions live here: the archive cannot be opened, the
/// output directory cannot be created, or the index page cannot be written.
/// Per-chapter read/write failures are swallowed inside the pipeline and
/// never surface as an [`Error`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
