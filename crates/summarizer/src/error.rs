use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SummarizerError>;

#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SummarizerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
