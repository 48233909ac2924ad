use context_protocol::{DependencyGraph, GraphStats};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// Restore every derived field of a dependency graph.
///
/// Drops edges whose endpoints are not nodes of the graph, recomputes node
/// degrees from the remaining edges and rebuilds the aggregate stats. The max
/// depth is measured from `entries` when given (ids not in the graph are
/// ignored), otherwise from nodes nobody imports.
pub fn recompute_graph(graph: &mut DependencyGraph, entries: Option<&[String]>) {
    let mut dag: DiGraph<(), ()> = DiGraph::new();
    let mut index: HashMap<String, NodeIndex> = HashMap::new();
    for node in &graph.nodes {
        index
            .entry(node.id.clone())
            .or_insert_with(|| dag.add_node(()));
    }

    let before = graph.edges.len();
    graph
        .edges
        .retain(|edge| index.contains_key(&edge.source) && index.contains_key(&edge.target));
    if graph.edges.len() != before {
        log::debug!(
            "Dropped {} dangling edges while recomputing graph",
            before - graph.edges.len()
        );
    }

    for edge in &graph.edges {
        dag.add_edge(index[&edge.source], index[&edge.target], ());
    }

    for node in &mut graph.nodes {
        let idx = index[&node.id];
        node.in_degree = dag.neighbors_directed(idx, Direction::Incoming).count();
        node.out_degree = dag.neighbors_directed(idx, Direction::Outgoing).count();
    }

    let roots: Vec<NodeIndex> = match entries {
        Some(entries) if !entries.is_empty() => entries
            .iter()
            .filter_map(|id| index.get(id).copied())
            .collect(),
        _ => {
            let sources: Vec<NodeIndex> = graph
                .nodes
                .iter()
                .filter(|node| node.in_degree == 0)
                .map(|node| index[&node.id])
                .collect();
            if sources.is_empty() {
                index.values().copied().collect()
            } else {
                sources
            }
        }
    };

    let total_nodes = graph.nodes.len();
    let total_edges = graph.edges.len();
    let avg_dependencies = if total_nodes == 0 {
        0.0
    } else {
        round2(total_edges as f64 / total_nodes as f64)
    };

    graph.stats = GraphStats {
        total_nodes,
        total_edges,
        circular_count: graph.circular.len(),
        max_depth: max_bfs_depth(&dag, &roots),
        avg_dependencies,
    };
}

/// Largest BFS level reached from any of `roots`
fn max_bfs_depth(dag: &DiGraph<(), ()>, roots: &[NodeIndex]) -> usize {
    let mut seen: HashSet<NodeIndex> = HashSet::new();
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();
    for &root in roots {
        if seen.insert(root) {
            queue.push_back((root, 0));
        }
    }

    let mut max_depth = 0;
    while let Some((node, depth)) = queue.pop_front() {
        max_depth = max_depth.max(depth);
        for next in dag.neighbors_directed(node, Direction::Outgoing) {
            if seen.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }
    max_depth
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
