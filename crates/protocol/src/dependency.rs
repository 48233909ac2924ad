use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a dependency statement relates the importing file to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// Relative specifier pointing at another file of the codebase
    Internal,
    /// Bare package specifier or runtime builtin
    External,
    /// Import erased at runtime (`import type ...`)
    TypeOnly,
}

impl DependencyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DependencyKind::Internal => "internal",
            DependencyKind::External => "external",
            DependencyKind::TypeOnly => "type-only",
        }
    }
}

/// One import/require statement found in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectDependency {
    /// Specifier exactly as written in the statement
    pub path: String,

    #[serde(rename = "type")]
    pub kind: DependencyKind,

    /// Imported symbol names (`*` for namespace imports, `default` for default imports)
    pub imports: Vec<String>,

    pub is_dynamic: bool,
}

impl DirectDependency {
    pub fn is_internal(&self) -> bool {
        self.kind == DependencyKind::Internal
    }
}

/// One internal edge traversed while expanding dependencies transitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyChain {
    pub from: String,
    pub to: String,
    /// 1 for direct dependencies of the root file
    pub depth: usize,
    pub symbols: Vec<String>,
    /// `to` is already an ancestor on the current branch
    pub is_circular: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub id: String,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub in_degree: usize,
    pub out_degree: usize,
}

impl DependencyNode {
    /// File node with zeroed degrees; degrees are filled in by graph recomputation
    pub fn file(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: path.clone(),
            path,
            node_type: "file".to_string(),
            in_degree: 0,
            out_degree: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    Import,
    Dynamic,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Import => "import",
            EdgeKind::Dynamic => "dynamic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub symbols: Vec<String>,
}

impl DependencyEdge {
    /// Identity used for deduplication: `source:target:type`
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.source, self.target, self.kind.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CycleSeverity {
    Low,
    Medium,
    High,
}

impl CycleSeverity {
    /// Severity of a closed walk with `edge_count` edges (`cycle.len() - 1`)
    pub fn from_cycle_length(edge_count: usize) -> Self {
        if edge_count <= 2 {
            CycleSeverity::High
        } else if edge_count <= 4 {
            CycleSeverity::Medium
        } else {
            CycleSeverity::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CycleSeverity::Low => "low",
            CycleSeverity::Medium => "medium",
            CycleSeverity::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CircularDependency {
    /// Closed walk: first and last entries are the same file
    pub cycle: Vec<String>,
    pub severity: CycleSeverity,
    pub suggestion: String,
}

impl CircularDependency {
    pub fn key(&self) -> String {
        self.cycle.join(" -> ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub circular_count: usize,
    /// Longest BFS distance from an entry file to any reachable file
    pub max_depth: usize,
    /// Mean out-degree across nodes
    pub avg_dependencies: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
    pub circular: Vec<CircularDependency>,
    pub stats: GraphStats,
}

impl DependencyGraph {
    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Category of an external side-effect statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EffectCategory {
    FileSystem,
    Network,
    Database,
    Environment,
    Console,
}

impl EffectCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectCategory::FileSystem => "file-system",
            EffectCategory::Network => "network",
            EffectCategory::Database => "database",
            EffectCategory::Environment => "environment",
            EffectCategory::Console => "console",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalEffect {
    pub category: EffectCategory,
    pub description: String,
    /// 1-indexed line of the first matching statement
    pub line: usize,
    pub is_side_effect: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_cycle_length() {
        assert_eq!(CycleSeverity::from_cycle_length(1), CycleSeverity::High);
        assert_eq!(CycleSeverity::from_cycle_length(2), CycleSeverity::High);
        assert_eq!(CycleSeverity::from_cycle_length(3), CycleSeverity::Medium);
        assert_eq!(CycleSeverity::from_cycle_length(4), CycleSeverity::Medium);
        assert_eq!(CycleSeverity::from_cycle_length(5), CycleSeverity::Low);
    }

    #[test]
    fn direct_dependency_serializes_with_wire_names() {
        let dep = DirectDependency {
            path: "./types".to_string(),
            kind: DependencyKind::TypeOnly,
            imports: vec!["User".to_string()],
            is_dynamic: false,
        };
        let value = serde_json::to_value(&dep).unwrap();
        assert_eq!(value["type"], "type-only");
        assert_eq!(value["isDynamic"], false);
    }

    #[test]
    fn edge_key_includes_kind() {
        let edge = DependencyEdge {
            source: "a.ts".to_string(),
            target: "b.ts".to_string(),
            kind: EdgeKind::Dynamic,
            symbols: vec![],
        };
        assert_eq!(edge.key(), "a.ts:b.ts:dynamic");
    }
}
