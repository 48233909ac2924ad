//! # Context Graph
//!
//! Import-level dependency analysis for codebase context.
//!
//! ## Features
//!
//! - **Direct dependencies** - static, dynamic, require-style and type-only imports
//! - **Module resolution** - relative specifiers probed against extensions and `index` files
//! - **Transitive chains** - bounded depth-first expansion with per-branch visited sets
//! - **Cycle detection** - DFS with a recursion stack, severity scored by cycle length
//! - **External effects** - file-system, network, database, environment, console
//!
//! ## Architecture
//!
//! ```text
//! File paths
//!     │
//!     ├──> Statement matchers (ordered regex table)
//!     │      └─ DirectDependency[]   (cached per file)
//!     │
//!     ├──> Resolver (extensions, index files)
//!     │      └─ internal edges
//!     │
//!     └──> Graph builder
//!            ├─ Pass 1: fixed-point discovery of reachable files
//!            ├─ Pass 2: nodes + deduplicated edges
//!            ├─ Cycle detection over the discovered set
//!            └─ Stats recomputed from nodes/edges (petgraph)
//! ```

mod analyzer;
mod config;
mod cycles;
mod effects;
mod error;
mod metrics;
mod resolver;
mod statements;

pub use analyzer::{DependencyAnalyzer, ResolvedDependency};
pub use config::{AnalyzerConfig, DEFAULT_EXTENSIONS};
pub use cycles::suggestion_for;
pub use effects::detect_effects;
pub use error::{GraphError, Result};
pub use metrics::recompute_graph;
pub use resolver::{normalize_path, resolve_module};
pub use statements::{is_relative, parse_dependencies};
