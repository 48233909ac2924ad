//! # Context Patterns
//!
//! Rule-table recognition of design patterns, architecture styles and coding
//! conventions across a set of source files.
//!
//! ## Architecture
//!
//! ```text
//! File paths
//!     │
//!     └──> PatternExtractor (content cache)
//!            │
//!            ├─ Design rules       file-name + content regexes  → DesignPattern[]
//!            ├─ Architecture rules directories + keywords       → architectural patterns
//!            │    └─ composites    constructor injection, emit/subscribe pairs
//!            ├─ Style scoring      +2 per directory, +1 per hit → ArchitectureStyle
//!            └─ Convention rules   share of source files        → Convention[]
//! ```
//!
//! Rule tables are compiled once on first use. A pattern that fails to
//! compile is logged and skipped; the remaining rules still apply.

mod architecture;
mod config;
mod conventions;
mod design;
mod error;
mod extractor;
mod rules;
mod style;

pub use config::PatternConfig;
pub use error::{PatternError, Result};
pub use extractor::PatternExtractor;
