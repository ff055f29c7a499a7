use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Missing `{field}`")]
    Configuration { field: &'static str },

    #[error("Step record is for action `{action}`, expected `split`")]
    UnexpectedAction { action: String },

    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("Couldn't open {path:?}. Aborting")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't read metadata of {path:?}")]
    SourceMetadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading {path:?}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't create chunk {path:?}, no space available on disk? Aborting")]
    OutputSpace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing chunk {path:?}")]
    ChunkWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source {path:?} ended early: expected {expected} bytes for chunk, read {actual}")]
    SourceTruncated { path: PathBuf, expected: u64, actual: u64 },
}

pub type Result<T> = std::result::Result<T, SplitError>;
