//! # Context Summarizer
//!
//! Natural-language summaries at three granularities and insight extraction.
//!
//! ## Features
//!
//! - **File summaries** - purpose, exports, imports, constructs and a 0-100 complexity score
//! - **Module summaries** - dominant purpose, public API, external packages, shared patterns
//! - **Codebase summaries** - executive, detailed and technical tiers, each extending the previous
//! - **Insights** - threshold rules over an assembled context plus per-line content markers
//!
//! ```text
//! FileSummary ──┬──> ModuleSummary        (one directory)
//!               └──> HierarchicalSummary  (executive ⊂ detailed ⊂ technical)
//!
//! CodebaseContext ──> extract_key_insights ──> Insight[] (deduplicated, critical first)
//! file content    ──> extract_insights_from_content
//! ```

mod codebase;
mod config;
mod error;
mod file;
mod insights;
mod module;
mod rules;
mod summarizer;

pub use config::SummarizerConfig;
pub use error::{Result, SummarizerError};
pub use insights::{extract_insights_from_content, extract_key_insights};
pub use summarizer::Summarizer;
