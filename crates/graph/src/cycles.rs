use context_protocol::{CircularDependency, CycleSeverity};
use std::collections::{HashMap, HashSet};

/// Find closed walks in `adjacency` with a DFS that tracks the recursion stack.
///
/// Nodes are visited in `order`; neighbors missing from `adjacency` have no
/// outgoing edges. Each cycle starts and ends with the re-entered node.
pub fn find_cycles(order: &[String], adjacency: &HashMap<String, Vec<String>>) -> Vec<Vec<String>> {
    let mut search = CycleSearch {
        adjacency,
        visited: HashSet::new(),
        on_stack: HashSet::new(),
        path: Vec::new(),
        cycles: Vec::new(),
    };

    for node in order {
        if !search.visited.contains(node.as_str()) {
            search.visit(node);
        }
    }

    search.cycles
}

struct CycleSearch<'a> {
    adjacency: &'a HashMap<String, Vec<String>>,
    visited: HashSet<&'a str>,
    on_stack: HashSet<&'a str>,
    path: Vec<&'a str>,
    cycles: Vec<Vec<String>>,
}

impl<'a> CycleSearch<'a> {
    fn visit(&mut self, node: &'a str) {
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.path.push(node);

        let adjacency = self.adjacency;
        if let Some(next) = adjacency.get(node) {
            for target in next {
                let target = target.as_str();
                if self.on_stack.contains(target) {
                    if let Some(start) = self.path.iter().position(|p| *p == target) {
                        let mut cycle: Vec<String> =
                            self.path[start..].iter().map(|p| p.to_string()).collect();
                        cycle.push(target.to_string());
                        self.cycles.push(cycle);
                    }
                } else if !self.visited.contains(target) {
                    self.visit(target);
                }
            }
        }

        self.on_stack.remove(node);
        self.path.pop();
    }
}

/// Canned refactoring advice chosen by the number of edges in the cycle
pub fn suggestion_for(edge_count: usize) -> &'static str {
    match edge_count {
        0 | 1 => "Remove the self-import; the module can reference its own bindings directly.",
        2 => "Extract the code both modules share into a new module that each of them imports.",
        3 | 4 => "Move the shared types or contracts into a separate module, or invert one dependency behind an interface.",
        _ => "Restructure the module boundaries of this long chain; apply dependency inversion or decouple through events.",
    }
}

pub fn to_circular(cycle: Vec<String>) -> CircularDependency {
    let edge_count = cycle.len().saturating_sub(1);
    CircularDependency {
        severity: CycleSeverity::from_cycle_length(edge_count),
        suggestion: suggestion_for(edge_count).to_string(),
        cycle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn graph(edges: &[(&str, &str)]) -> (Vec<String>, HashMap<String, Vec<String>>) {
        let mut order = Vec::new();
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        for (from, to) in edges {
            for node in [from, to] {
                if !order.iter().any(|n: &String| n == node) {
                    order.push(node.to_string());
                }
            }
            adjacency
                .entry(from.to_string())
                .or_default()
                .push(to.to_string());
        }
        (order, adjacency)
    }

    #[test]
    fn three_node_cycle() {
        let (order, adjacency) = graph(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let cycles = find_cycles(&order, &adjacency);
        assert_eq!(cycles, vec![vec!["a", "b", "c", "a"]]);

        let circular = to_circular(cycles[0].clone());
        assert_eq!(circular.severity, CycleSeverity::Medium);
    }

    #[test]
    fn disjoint_cycles_are_all_reported() {
        let (order, adjacency) = graph(&[("a", "b"), ("b", "a"), ("x", "y"), ("y", "x"), ("a", "x")]);
        let cycles = find_cycles(&order, &adjacency);
        assert_eq!(cycles.len(), 2);
        for cycle in &cycles {
            assert_eq!(cycle.first(), cycle.last());
            assert_eq!(to_circular(cycle.clone()).severity, CycleSeverity::High);
        }
    }

    #[test]
    fn cycle_slice_starts_at_reentered_node() {
        let (order, adjacency) = graph(&[("entry", "a"), ("a", "b"), ("b", "a")]);
        let cycles = find_cycles(&order, &adjacency);
        assert_eq!(cycles, vec![vec!["a", "b", "a"]]);
    }

    #[test]
    fn self_import() {
        let (order, adjacency) = graph(&[("a", "a")]);
        let cycles = find_cycles(&order, &adjacency);
        assert_eq!(cycles, vec![vec!["a", "a"]]);
        assert!(to_circular(cycles[0].clone()).suggestion.contains("self-import"));
    }

    #[test]
    fn acyclic_graph() {
        let (order, adjacency) = graph(&[("a", "b"), ("b", "c"), ("a", "c")]);
        assert!(find_cycles(&order, &adjacency).is_empty());
    }
}
