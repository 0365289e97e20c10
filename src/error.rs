//! Error type shared by the library and the terminal viewer

use std::path::PathBuf;

/// Everything that can go wrong outside the pure grid core.
///
/// Normalization, filtering and layout never fail; only loading input,
/// reading configuration and driving the terminal do.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read a whole file, keeping the path in the error message
pub fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}
