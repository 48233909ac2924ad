use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Dependency analysis failed: {0}")]
    Graph(#[from] context_graph::GraphError),

    #[error("Pattern extraction failed: {0}")]
    Patterns(#[from] context_patterns::PatternError),

    #[error("Summarization failed: {0}")]
    Summarizer(#[from] context_summarizer::SummarizerError),

    #[error("Analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
