//! # Context Engine
//!
//! Assembles a complete [`CodebaseContext`](context_protocol::CodebaseContext)
//! for a topic by running the dependency, pattern and summary analyzers side
//! by side and joining their results.
//!
//! ```text
//!                     ┌─> DependencyAnalyzer ─> graph + external effects ─┐
//! files ─> filter ────┼─> PatternExtractor   ─> pattern catalog          ─┼─> rank components
//!                     └─> Summarizer         ─> summaries + insights     ─┘   data-flow map
//!                                                                              key insights
//!                                                                              metadata
//! ```

mod assembler;
mod components;
mod config;
mod error;

pub use assembler::ContextAssembler;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
