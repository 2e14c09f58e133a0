use std::path::PathBuf;

/// All errors that can occur while loading clips.
///
/// This enum captures every failure mode: manifest IO/parse failures at
/// construction, probe/decode failures at access time, out-of-bounds
/// indexing, and collation precondition violations. Using a single error
/// type across the crate simplifies error propagation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The annotation manifest could not be read.
    #[error("failed to read manifest {path}: {source}")]
    ManifestIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The annotation manifest is not well-formed JSON.
    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// ffprobe failed or reported no usable video stream.
    #[error("failed to probe {path}: {detail}")]
    Probe { path: PathBuf, detail: String },

    /// ffmpeg failed to decode the media file.
    #[error("failed to decode {path}: {detail}")]
    Decode { path: PathBuf, detail: String },

    /// Index-based access outside `[0, len)`.
    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Collation was handed an empty batch.
    #[error("cannot collate an empty batch")]
    EmptyBatch,

    /// A configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A configuration file is not well-formed JSON.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No dataset factory registered under the requested name.
    #[error("unknown dataset {0:?}")]
    UnknownDataset(String),

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
