use std::path::PathBuf;
use thiserror::Error;

/// The main error type for blackout operations.
///
/// Per-job problems (unreadable image, bad output path) are carried here so
/// the watch loop can contain them; only watcher-infrastructure failures are
/// allowed to take the loop down.
#[derive(Debug, Error)]
pub enum BlackoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse policy file {path}: {source}")]
    PolicyParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Image path has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("Filesystem watch failed: {0}")]
    Watch(#[from] notify::Error),
}
