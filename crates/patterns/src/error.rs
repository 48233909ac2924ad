use thiserror::Error;

pub type Result<T> = std::result::Result<T, PatternError>;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
