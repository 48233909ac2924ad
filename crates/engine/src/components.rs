//! Key-component ranking and the data-flow map.

use context_protocol::{
    is_test_path, ComponentInfo, DataFlow, DataFlowMap, DataSink, DependencyGraph, ExternalEffect,
    FileSummary,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;

const IN_DEGREE_WEIGHT: usize = 15;
const OUT_DEGREE_WEIGHT: usize = 5;
const EXPORT_WEIGHT: usize = 2;
const ENTRY_BONUS: usize = 10;
const MAX_IMPORTANCE: usize = 100;

/// Incoming and outgoing neighbours of every node, in edge order
struct Adjacency<'g> {
    dependencies: HashMap<&'g str, Vec<&'g str>>,
    dependents: HashMap<&'g str, Vec<&'g str>>,
}

impl<'g> Adjacency<'g> {
    fn of(graph: &'g DependencyGraph) -> Self {
        let mut dependencies: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &graph.edges {
            push_unique(dependencies.entry(edge.source.as_str()).or_default(), &edge.target);
            push_unique(dependents.entry(edge.target.as_str()).or_default(), &edge.source);
        }
        Self {
            dependencies,
            dependents,
        }
    }

    fn owned(map: &HashMap<&str, Vec<&str>>, id: &str) -> Vec<String> {
        map.get(id)
            .map(|ids| ids.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }
}

fn push_unique<'g>(list: &mut Vec<&'g str>, id: &'g str) {
    if !list.contains(&id) {
        list.push(id);
    }
}

/// Input files nothing else in the graph imports
pub(crate) fn entry_points(summaries: &[FileSummary], graph: &DependencyGraph) -> Vec<String> {
    summaries
        .iter()
        .filter(|s| graph.node(&s.path).map_or(true, |n| n.in_degree == 0))
        .map(|s| s.path.clone())
        .collect()
}

pub(crate) fn importance(in_degree: usize, out_degree: usize, exports: usize, is_entry: bool) -> u32 {
    let score = IN_DEGREE_WEIGHT * in_degree
        + OUT_DEGREE_WEIGHT * out_degree
        + EXPORT_WEIGHT * exports
        + if is_entry { ENTRY_BONUS } else { 0 };
    u32::try_from(score.min(MAX_IMPORTANCE)).unwrap_or(100)
}

/// Coarse role of a file from its path and inferred purpose
pub(crate) fn component_type(path: &str, purpose: &str) -> &'static str {
    if is_test_path(path) || purpose == "Test suite" {
        return "test";
    }

    let purpose = purpose.to_ascii_lowercase();
    let roles: &[(&str, &str)] = &[
        ("hook", "hook"),
        ("component", "component"),
        ("route", "route"),
        ("middleware", "middleware"),
        ("controller", "controller"),
        ("service", "service"),
        ("repository", "repository"),
        ("model", "model"),
        ("state", "store"),
        ("configuration", "config"),
        ("type definitions", "types"),
        ("utility", "utility"),
        ("entry point", "entry"),
    ];
    roles
        .iter()
        .find(|(needle, _)| purpose.contains(*needle))
        .map_or("module", |(_, role)| *role)
}

/// One component per summarized file, most important first, truncated to `limit`
pub(crate) fn rank_components(
    summaries: &[FileSummary],
    graph: &DependencyGraph,
    limit: usize,
) -> Vec<ComponentInfo> {
    let adjacency = Adjacency::of(graph);
    let entries: HashSet<String> = entry_points(summaries, graph).into_iter().collect();

    let mut components: Vec<ComponentInfo> = summaries
        .iter()
        .map(|summary| {
            let (in_degree, out_degree) = graph
                .node(&summary.path)
                .map_or((0, 0), |n| (n.in_degree, n.out_degree));
            let name = Path::new(&summary.path)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| summary.path.clone());

            ComponentInfo {
                path: summary.path.clone(),
                name,
                component_type: component_type(&summary.path, &summary.purpose).to_string(),
                purpose: summary.purpose.clone(),
                complexity: summary.complexity,
                importance: importance(
                    in_degree,
                    out_degree,
                    summary.exports.len(),
                    entries.contains(&summary.path),
                ),
                exports: summary.exports.clone(),
                dependencies: Adjacency::owned(&adjacency.dependencies, &summary.path),
                dependents: Adjacency::owned(&adjacency.dependents, &summary.path),
            }
        })
        .collect();

    components.sort_by(|a, b| b.importance.cmp(&a.importance));
    components.truncate(limit);
    components
}

/// Entry points, one flow per graph edge and one sink per side-effecting category of a file
pub(crate) fn data_flow(
    summaries: &[FileSummary],
    graph: &DependencyGraph,
    effects: &[(String, Vec<ExternalEffect>)],
) -> DataFlowMap {
    let flows = graph
        .edges
        .iter()
        .map(|edge| DataFlow {
            from: edge.source.clone(),
            to: edge.target.clone(),
            flow_type: edge.kind.as_str().to_string(),
            symbols: edge.symbols.clone(),
        })
        .collect();

    let sinks = effects
        .iter()
        .flat_map(|(path, effects)| {
            effects
                .iter()
                .filter(|effect| effect.is_side_effect)
                .map(move |effect| DataSink {
                    path: path.clone(),
                    category: effect.category,
                    description: effect.description.clone(),
                })
        })
        .collect();

    DataFlowMap {
        entry_points: entry_points(summaries, graph),
        flows,
        sinks,
    }
}
