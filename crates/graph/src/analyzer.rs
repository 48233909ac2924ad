use crate::config::AnalyzerConfig;
use crate::cycles::{find_cycles, to_circular};
use crate::effects::detect_effects;
use crate::error::{GraphError, Result};
use crate::metrics::recompute_graph;
use crate::resolver::{normalize_path, resolve_module};
use crate::statements::parse_dependencies;
use context_protocol::{
    display_path, CircularDependency, DependencyChain, DependencyEdge, DependencyGraph,
    DependencyNode, DirectDependency, EdgeKind, ExternalEffect, SourceCache,
};
use lru::LruCache;
use std::collections::{HashMap, HashSet, VecDeque};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An internal dependency resolved to an existing file
#[derive(Debug, Clone)]
pub struct ResolvedDependency {
    pub target: PathBuf,
    pub dependency: DirectDependency,
}

/// Import-level dependency analyzer.
///
/// Owns a bounded content cache and a per-file dependency-list cache. Both are
/// populated on first access and only invalidated by [`DependencyAnalyzer::clear_cache`].
pub struct DependencyAnalyzer {
    config: AnalyzerConfig,
    sources: SourceCache,
    direct: LruCache<PathBuf, Arc<Vec<DirectDependency>>>,
}

impl DependencyAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate().map_err(GraphError::invalid_config)?;

        let capacity = NonZeroUsize::new(config.cache_capacity)
            .ok_or_else(|| GraphError::invalid_config("cache_capacity must be > 0"))?;

        Ok(Self {
            sources: SourceCache::new(config.cache_capacity),
            direct: LruCache::new(capacity),
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Drop all cached file contents and dependency lists
    pub fn clear_cache(&mut self) {
        self.sources.clear();
        self.direct.clear();
    }

    /// Import/require statements of `file`. Unreadable files have no dependencies.
    pub fn analyze_direct(&mut self, file: &Path) -> Vec<DirectDependency> {
        self.direct_cached(&normalize_path(file)).as_ref().clone()
    }

    fn direct_cached(&mut self, file: &Path) -> Arc<Vec<DirectDependency>> {
        if let Some(deps) = self.direct.get(file) {
            return Arc::clone(deps);
        }

        let deps = match self.sources.read(file) {
            Some(content) => parse_dependencies(&content),
            None => Vec::new(),
        };
        let deps = Arc::new(deps);
        self.direct.put(file.to_path_buf(), Arc::clone(&deps));
        deps
    }

    /// Internal dependencies of `file` that resolve to existing files
    pub fn resolve_internal(&mut self, file: &Path) -> Vec<ResolvedDependency> {
        let file = normalize_path(file);
        let deps = self.direct_cached(&file);

        deps.iter()
            .filter(|dep| dep.is_internal())
            .filter_map(|dep| {
                resolve_module(&file, &dep.path, &self.config.extensions).map(|target| {
                    ResolvedDependency {
                        target,
                        dependency: dep.clone(),
                    }
                })
            })
            .collect()
    }

    /// Expand internal dependencies depth-first up to `depth` (default: `max_depth`).
    ///
    /// Each branch carries its own copy of the visited set, so a file reached
    /// through two sibling branches is expanded in both. Edges back to an
    /// ancestor are reported with `is_circular` and not expanded.
    pub fn analyze_transitive(&mut self, file: &Path, depth: Option<usize>) -> Vec<DependencyChain> {
        let max_depth = depth.unwrap_or(self.config.max_depth);
        let root = normalize_path(file);

        let mut visited = HashSet::new();
        visited.insert(root.clone());

        let mut chains = Vec::new();
        self.expand(&root, 1, max_depth, visited, &mut chains);
        chains
    }

    fn expand(
        &mut self,
        file: &Path,
        depth: usize,
        max_depth: usize,
        visited: HashSet<PathBuf>,
        chains: &mut Vec<DependencyChain>,
    ) {
        if depth > max_depth {
            return;
        }

        for resolved in self.resolve_internal(file) {
            if chains.len() >= self.config.max_chains {
                log::warn!(
                    "Transitive expansion stopped at {} chains",
                    self.config.max_chains
                );
                return;
            }

            let is_circular = visited.contains(&resolved.target);
            chains.push(DependencyChain {
                from: display_path(file),
                to: display_path(&resolved.target),
                depth,
                symbols: resolved.dependency.imports.clone(),
                is_circular,
            });

            if !is_circular {
                let mut branch = visited.clone();
                branch.insert(resolved.target.clone());
                self.expand(&resolved.target, depth + 1, max_depth, branch, chains);
            }
        }
    }

    /// Circular dependencies among `files`, following resolved internal imports
    pub fn detect_circular(&mut self, files: &[PathBuf]) -> Vec<CircularDependency> {
        let mut order: Vec<String> = Vec::new();
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();

        for file in files {
            let file = normalize_path(file);
            let id = display_path(&file);
            if adjacency.contains_key(&id) {
                continue;
            }

            let mut targets: Vec<String> = Vec::new();
            for resolved in self.resolve_internal(&file) {
                let target = display_path(&resolved.target);
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }

            order.push(id.clone());
            adjacency.insert(id, targets);
        }

        find_cycles(&order, &adjacency)
            .into_iter()
            .map(to_circular)
            .collect()
    }

    /// Side-effecting statements of `file`, at most one per category
    pub fn track_external_effects(&mut self, file: &Path) -> Vec<ExternalEffect> {
        match self.sources.read(&normalize_path(file)) {
            Some(content) => detect_effects(&content),
            None => Vec::new(),
        }
    }

    /// Build the dependency graph reachable from `files`.
    ///
    /// Pass 1 discovers every internally reachable file (bounded by
    /// `max_files`); pass 2 emits nodes and deduplicated edges, detects cycles
    /// over the discovered set and computes stats relative to the entry files.
    pub fn build_dependency_graph(&mut self, files: &[PathBuf]) -> DependencyGraph {
        let entries: Vec<PathBuf> = files.iter().map(|f| normalize_path(f)).collect();
        let discovered = self.discover(&entries);
        let known: HashSet<&PathBuf> = discovered.iter().collect();

        let nodes: Vec<DependencyNode> = discovered
            .iter()
            .map(|file| DependencyNode::file(display_path(file)))
            .collect();

        let mut edges: Vec<DependencyEdge> = Vec::new();
        let mut edge_index: HashMap<String, usize> = HashMap::new();
        for file in &discovered {
            for resolved in self.resolve_internal(file) {
                if !known.contains(&resolved.target) {
                    continue;
                }

                let edge = DependencyEdge {
                    source: display_path(file),
                    target: display_path(&resolved.target),
                    kind: if resolved.dependency.is_dynamic {
                        EdgeKind::Dynamic
                    } else {
                        EdgeKind::Import
                    },
                    symbols: resolved.dependency.imports,
                };

                match edge_index.get(&edge.key()) {
                    Some(&idx) => {
                        let existing = &mut edges[idx].symbols;
                        for symbol in edge.symbols {
                            if !existing.contains(&symbol) {
                                existing.push(symbol);
                            }
                        }
                    }
                    None => {
                        edge_index.insert(edge.key(), edges.len());
                        edges.push(edge);
                    }
                }
            }
        }

        let circular = self.detect_circular(&discovered);

        let mut graph = DependencyGraph {
            nodes,
            edges,
            circular,
            ..Default::default()
        };
        let entry_ids: Vec<String> = entries.iter().map(|f| display_path(f)).collect();
        recompute_graph(&mut graph, Some(&entry_ids));

        log::info!(
            "Built dependency graph: {} nodes, {} edges, {} cycles",
            graph.stats.total_nodes,
            graph.stats.total_edges,
            graph.stats.circular_count
        );

        graph
    }

    /// Fixed-point expansion of `entries` over resolved internal imports
    fn discover(&mut self, entries: &[PathBuf]) -> Vec<PathBuf> {
        let mut discovered = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut queue: VecDeque<PathBuf> = entries.iter().cloned().collect();

        while let Some(file) = queue.pop_front() {
            if !seen.insert(file.clone()) {
                continue;
            }
            if discovered.len() >= self.config.max_files {
                log::warn!(
                    "Dependency discovery stopped at max_files={}",
                    self.config.max_files
                );
                break;
            }

            for resolved in self.resolve_internal(&file) {
                if !seen.contains(&resolved.target) {
                    queue.push_back(resolved.target);
                }
            }
            discovered.push(file);
        }

        discovered
    }
}
