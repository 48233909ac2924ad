//! # Context Exchange
//!
//! Versioned envelopes for handing a [`CodebaseContext`](context_protocol::CodebaseContext)
//! between agents, plus N-way merging of independently produced contexts.
//!
//! ```text
//! CodebaseContext ──export──> ContextEnvelope ──serde──> JSON document
//!                                   │                        │
//!                               validate()              validate_value()
//!                                   │                        │
//!                                import()               import_value()
//!                                   └────────┬───────────────┘
//!                                            ▼
//!                        merge(envelopes, strategy) ──> CodebaseContext
//!                         union | intersection | override | newest | highest-relevance
//! ```
//!
//! Validation never fails: it reports `errors` (which block import) and
//! `warnings` (advisory) with stable codes such as `MISSING_SOURCE_AGENT`.

mod envelope;
mod error;
mod import;
mod merge;
mod validate;

pub use envelope::{
    export, ContextEnvelope, ContextType, ExportOptions, MergeStrategy, DEFAULT_SOURCE_AGENT,
    FORMAT_VERSION,
};
pub use error::{ExchangeError, Result};
pub use import::{envelope_schema, import, import_value, parse_envelope};
pub use merge::{merge, merge_contexts, merge_named};
pub use validate::{validate, validate_value, ValidationIssue, ValidationReport};
