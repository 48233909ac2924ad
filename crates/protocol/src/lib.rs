//! # Context Protocol
//!
//! Shared value types for codebase context analysis and exchange.
//!
//! Every analysis component produces one of the shapes defined here, and the
//! exchange layer wraps the aggregate [`CodebaseContext`] into a versioned
//! envelope. All types serialize with camelCase field names so a persisted
//! context reads the same regardless of which component produced it.
//!
//! ```text
//! CodebaseContext
//!     ├─ summary        HierarchicalSummary
//!     ├─ keyComponents  [ComponentInfo]
//!     ├─ patterns       PatternCatalog
//!     ├─ dependencies   DependencyGraph
//!     ├─ dataFlow       DataFlowMap
//!     ├─ insights       [Insight]
//!     └─ metadata       ContextMetadata
//! ```

mod context;
mod dependency;
mod insight;
mod language;
pub mod path_filters;
mod pattern;
mod source;
mod summary;

pub use context::{
    CodebaseContext, ComponentInfo, ContextMetadata, DataFlow, DataFlowMap, DataSink,
};
pub use dependency::{
    CircularDependency, CycleSeverity, DependencyChain, DependencyEdge, DependencyGraph,
    DependencyKind, DependencyNode, DirectDependency, EdgeKind, EffectCategory, ExternalEffect,
    GraphStats,
};
pub use insight::{sort_by_impact, Impact, Insight, InsightType, INSIGHT_KEY_PREFIX_CHARS};
pub use language::{is_test_path, Language};
pub use path_filters::PathFilter;
pub use pattern::{
    ArchitectureStyle, Convention, ConventionType, DesignPattern, PatternCatalog, PatternExample,
    PatternQuality,
};
pub use source::{display_path, SourceCache, DEFAULT_CACHE_CAPACITY};
pub use summary::{FileSummary, HierarchicalSummary, ModuleSummary};

/// Rough token estimate for a piece of text (four characters per token)
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
