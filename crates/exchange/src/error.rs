use crate::validate::ValidationIssue;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Invalid envelope: {}", summarize(.0))]
    InvalidEnvelope(Vec<ValidationIssue>),

    #[error("Cannot merge an empty list of envelopes")]
    EmptyMerge,

    #[error("Unknown merge strategy: {0}")]
    UnknownStrategy(String),

    #[error("Malformed envelope document: {0}")]
    Json(#[from] serde_json::Error),
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{} at {}", issue.code, issue.path))
        .collect::<Vec<_>>()
        .join(", ")
}
