use crate::envelope::{ContextEnvelope, MergeStrategy};
use crate::error::{ExchangeError, Result};
use chrono::Utc;
use context_graph::recompute_graph;
use context_protocol::{
    CodebaseContext, ComponentInfo, ContextMetadata, DataFlowMap, DependencyGraph,
    HierarchicalSummary, Insight, PatternCatalog,
};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Merge the payloads of `envelopes` with `strategy`.
///
/// A single envelope yields its payload unchanged. Inputs are never modified.
pub fn merge(envelopes: &[ContextEnvelope], strategy: MergeStrategy) -> Result<CodebaseContext> {
    let contexts: Vec<&CodebaseContext> = envelopes.iter().map(|e| &e.payload).collect();
    merge_contexts(&contexts, strategy)
}

/// [`merge`] with the strategy given by name (`"union"`, `"highest-relevance"`, ...)
pub fn merge_named(envelopes: &[ContextEnvelope], strategy: &str) -> Result<CodebaseContext> {
    merge(envelopes, strategy.parse()?)
}

pub fn merge_contexts(
    contexts: &[&CodebaseContext],
    strategy: MergeStrategy,
) -> Result<CodebaseContext> {
    match contexts {
        [] => Err(ExchangeError::EmptyMerge),
        [single] => Ok((*single).clone()),
        _ => {
            log::debug!("Merging {} contexts with {strategy}", contexts.len());
            Ok(match strategy {
                MergeStrategy::Union => keyed(contexts, Keep::Last),
                MergeStrategy::HighestRelevance => keyed(contexts, Keep::MostRelevant),
                MergeStrategy::Intersection => intersection(contexts),
                MergeStrategy::Override => override_merge(contexts),
                MergeStrategy::Newest => newest(contexts),
            })
        }
    }
}

/// Which entry survives when two inputs share a key
#[derive(Clone, Copy, PartialEq, Eq)]
enum Keep {
    Last,
    MostRelevant,
}

/// Entries of every list deduplicated by `key`, in first-seen order.
/// A later entry replaces an earlier one when `replaces(new, old)` holds.
fn union_by<'a, T, K, I>(
    lists: I,
    key: impl Fn(&T) -> K,
    replaces: impl Fn(&T, &T) -> bool,
) -> Vec<T>
where
    T: Clone + 'a,
    K: Eq + Hash,
    I: IntoIterator<Item = &'a [T]>,
{
    let mut merged: Vec<T> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for item in lists.into_iter().flatten() {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => {
                if replaces(item, &merged[i]) {
                    merged[i] = item.clone();
                }
            }
            None => {
                index.insert(k, merged.len());
                merged.push(item.clone());
            }
        }
    }

    merged
}

fn last_wins<T>(_: &T, _: &T) -> bool {
    true
}

/// Keys present in every list
fn common_keys<'a, T, K, I>(lists: I, key: impl Fn(&T) -> K) -> HashSet<K>
where
    T: 'a,
    K: Eq + Hash,
    I: IntoIterator<Item = &'a [T]>,
{
    let mut common: Option<HashSet<K>> = None;
    for list in lists {
        let keys: HashSet<K> = list.iter().map(&key).collect();
        common = Some(match common {
            None => keys,
            Some(prev) => prev.into_iter().filter(|k| keys.contains(k)).collect(),
        });
    }
    common.unwrap_or_default()
}

fn merge_components(contexts: &[&CodebaseContext], keep: Keep) -> Vec<ComponentInfo> {
    union_by(
        contexts.iter().map(|c| c.key_components.as_slice()),
        |c| c.path.clone(),
        |new, old| keep == Keep::Last || new.importance > old.importance,
    )
}

fn merge_insights(contexts: &[&CodebaseContext], keep: Keep) -> Vec<Insight> {
    union_by(
        contexts.iter().map(|c| c.insights.as_slice()),
        Insight::key,
        |new, old| keep == Keep::Last || new.impact.rank() > old.impact.rank(),
    )
}

fn merge_catalogs(contexts: &[&CodebaseContext]) -> PatternCatalog {
    PatternCatalog {
        design_patterns: union_by(
            contexts.iter().map(|c| c.patterns.design_patterns.as_slice()),
            |p| p.key(),
            last_wins,
        ),
        architectural_patterns: union_by(
            contexts
                .iter()
                .map(|c| c.patterns.architectural_patterns.as_slice()),
            String::clone,
            last_wins,
        ),
        conventions: union_by(
            contexts.iter().map(|c| c.patterns.conventions.as_slice()),
            |c| c.name.clone(),
            last_wins,
        ),
        architecture_style: contexts
            .iter()
            .rev()
            .find_map(|c| c.patterns.architecture_style.clone()),
    }
}

fn merge_graphs(contexts: &[&CodebaseContext]) -> DependencyGraph {
    let mut graph = DependencyGraph {
        nodes: union_by(
            contexts.iter().map(|c| c.dependencies.nodes.as_slice()),
            |n| n.id.clone(),
            last_wins,
        ),
        edges: union_by(
            contexts.iter().map(|c| c.dependencies.edges.as_slice()),
            |e| e.key(),
            last_wins,
        ),
        circular: union_by(
            contexts.iter().map(|c| c.dependencies.circular.as_slice()),
            |c| c.key(),
            last_wins,
        ),
        ..Default::default()
    };
    recompute_graph(&mut graph, None);
    graph
}

fn merge_data_flow(contexts: &[&CodebaseContext]) -> DataFlowMap {
    DataFlowMap {
        entry_points: union_by(
            contexts.iter().map(|c| c.data_flow.entry_points.as_slice()),
            String::clone,
            last_wins,
        ),
        flows: union_by(
            contexts.iter().map(|c| c.data_flow.flows.as_slice()),
            |f| f.key(),
            last_wins,
        ),
        sinks: union_by(
            contexts.iter().map(|c| c.data_flow.sinks.as_slice()),
            |s| s.key(),
            last_wins,
        ),
    }
}

/// Distinct non-empty texts joined by blank lines
fn join_distinct<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for text in texts {
        if !text.is_empty() && !seen.contains(&text) {
            seen.push(text);
        }
    }
    seen.join("\n\n")
}

fn merged_topic<'a>(topics: impl Iterator<Item = &'a str>) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for topic in topics {
        if !topic.is_empty() && !seen.contains(&topic) {
            seen.push(topic);
        }
    }
    seen.join(" + ")
}

fn merge_summaries(contexts: &[&CodebaseContext]) -> HierarchicalSummary {
    let mut languages = std::collections::BTreeMap::new();
    for context in contexts {
        for (language, count) in &context.summary.languages {
            *languages.entry(language.clone()).or_insert(0) += count;
        }
    }

    HierarchicalSummary {
        topic: merged_topic(contexts.iter().map(|c| c.summary.topic.as_str())),
        executive: join_distinct(contexts.iter().map(|c| c.summary.executive.as_str())),
        detailed: join_distinct(contexts.iter().map(|c| c.summary.detailed.as_str())),
        technical: join_distinct(contexts.iter().map(|c| c.summary.technical.as_str())),
        file_count: contexts.iter().map(|c| c.summary.file_count).sum(),
        total_lines: contexts.iter().map(|c| c.summary.total_lines).sum(),
        languages,
    }
}

/// Metadata merge shared by every strategy
fn merge_metadata(contexts: &[&CodebaseContext]) -> ContextMetadata {
    let now = Utc::now();
    let version = contexts
        .last()
        .map(|c| c.metadata.version.clone())
        .unwrap_or_default();

    ContextMetadata {
        topic: merged_topic(contexts.iter().map(|c| c.metadata.topic.as_str())),
        files: union_by(
            contexts.iter().map(|c| c.metadata.files.as_slice()),
            String::clone,
            last_wins,
        ),
        focus_areas: union_by(
            contexts.iter().map(|c| c.metadata.focus_areas.as_slice()),
            String::clone,
            last_wins,
        ),
        token_count: contexts.iter().map(|c| c.metadata.token_count).sum(),
        analysis_time_ms: contexts.iter().map(|c| c.metadata.analysis_time_ms).sum(),
        created_at: now,
        updated_at: now,
        version,
    }
}

fn keyed(contexts: &[&CodebaseContext], keep: Keep) -> CodebaseContext {
    CodebaseContext {
        summary: merge_summaries(contexts),
        key_components: merge_components(contexts, keep),
        patterns: merge_catalogs(contexts),
        dependencies: merge_graphs(contexts),
        data_flow: merge_data_flow(contexts),
        insights: merge_insights(contexts, keep),
        metadata: merge_metadata(contexts),
    }
}

/// Union result restricted to keys every input shares
fn intersection(contexts: &[&CodebaseContext]) -> CodebaseContext {
    let mut merged = keyed(contexts, Keep::Last);

    let paths = common_keys(contexts.iter().map(|c| c.key_components.as_slice()), |c| {
        c.path.clone()
    });
    merged.key_components.retain(|c| paths.contains(&c.path));

    let insight_keys = common_keys(contexts.iter().map(|c| c.insights.as_slice()), Insight::key);
    merged.insights.retain(|i| insight_keys.contains(&i.key()));

    let catalog = &mut merged.patterns;
    let design = common_keys(
        contexts.iter().map(|c| c.patterns.design_patterns.as_slice()),
        |p| p.key(),
    );
    catalog.design_patterns.retain(|p| design.contains(&p.key()));
    let architectural = common_keys(
        contexts
            .iter()
            .map(|c| c.patterns.architectural_patterns.as_slice()),
        String::clone,
    );
    catalog
        .architectural_patterns
        .retain(|p| architectural.contains(p));
    let conventions = common_keys(
        contexts.iter().map(|c| c.patterns.conventions.as_slice()),
        |c| c.name.clone(),
    );
    catalog.conventions.retain(|c| conventions.contains(&c.name));

    let graph = &mut merged.dependencies;
    let nodes = common_keys(
        contexts.iter().map(|c| c.dependencies.nodes.as_slice()),
        |n| n.id.clone(),
    );
    graph.nodes.retain(|n| nodes.contains(&n.id));
    let edges = common_keys(
        contexts.iter().map(|c| c.dependencies.edges.as_slice()),
        |e| e.key(),
    );
    graph.edges.retain(|e| edges.contains(&e.key()));
    let circular = common_keys(
        contexts.iter().map(|c| c.dependencies.circular.as_slice()),
        |c| c.key(),
    );
    graph.circular.retain(|c| circular.contains(&c.key()));
    recompute_graph(graph, None);

    let flow = &mut merged.data_flow;
    let entries = common_keys(
        contexts.iter().map(|c| c.data_flow.entry_points.as_slice()),
        String::clone,
    );
    flow.entry_points.retain(|e| entries.contains(e));
    let flows = common_keys(contexts.iter().map(|c| c.data_flow.flows.as_slice()), |f| {
        f.key()
    });
    flow.flows.retain(|f| flows.contains(&f.key()));
    let sinks = common_keys(contexts.iter().map(|c| c.data_flow.sinks.as_slice()), |s| {
        s.key()
    });
    flow.sinks.retain(|s| sinks.contains(&s.key()));

    merged
}

/// Last context wins per sub-structure; graph stats are still recomputed
fn override_merge(contexts: &[&CodebaseContext]) -> CodebaseContext {
    let metadata = merge_metadata(contexts);
    let Some(last) = contexts.last() else {
        return CodebaseContext::empty("");
    };

    let mut merged = (*last).clone();
    recompute_graph(&mut merged.dependencies, None);
    merged.metadata = metadata;
    merged
}

/// Override applied oldest to newest, so the newest context wins
fn newest(contexts: &[&CodebaseContext]) -> CodebaseContext {
    let mut ordered: Vec<&CodebaseContext> = contexts.to_vec();
    ordered.sort_by(|a, b| b.metadata.created_at.cmp(&a.metadata.created_at));
    ordered.reverse();
    override_merge(&ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use context_protocol::{DependencyEdge, DependencyNode, EdgeKind, Impact, InsightType};
    use pretty_assertions::assert_eq;

    fn component(path: &str, importance: u32) -> ComponentInfo {
        ComponentInfo {
            path: path.to_string(),
            name: path.to_string(),
            component_type: "module".to_string(),
            purpose: "Source file".to_string(),
            complexity: 5,
            importance,
            exports: Vec::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }

    fn context(topic: &str, components: &[(&str, u32)]) -> CodebaseContext {
        let mut ctx = CodebaseContext::empty(topic);
        ctx.key_components = components.iter().map(|(p, i)| component(p, *i)).collect();
        ctx
    }

    fn edge(source: &str, target: &str) -> DependencyEdge {
        DependencyEdge {
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::Import,
            symbols: Vec::new(),
        }
    }

    fn paths(ctx: &CodebaseContext) -> Vec<&str> {
        ctx.key_components.iter().map(|c| c.path.as_str()).collect()
    }

    #[test]
    fn empty_and_singleton() {
        assert!(matches!(
            merge_contexts(&[], MergeStrategy::Union),
            Err(ExchangeError::EmptyMerge)
        ));

        let ctx = context("a", &[("x.ts", 1)]);
        let merged = merge_contexts(&[&ctx], MergeStrategy::Intersection).unwrap();
        assert_eq!(merged, ctx);
    }

    #[test]
    fn union_last_writer_wins() {
        let a = context("a", &[("x.ts", 10), ("y.ts", 20)]);
        let b = context("b", &[("y.ts", 5), ("z.ts", 30)]);

        let merged = merge_contexts(&[&a, &b], MergeStrategy::Union).unwrap();
        assert_eq!(paths(&merged), vec!["x.ts", "y.ts", "z.ts"]);
        assert_eq!(merged.key_components[1].importance, 5);
        assert_eq!(merged.metadata.topic, "a + b");
        assert_eq!(merged.summary.topic, "a + b");
    }

    #[test]
    fn highest_relevance_keeps_stronger_entries() {
        let mut a = context("a", &[("y.ts", 20)]);
        let mut b = context("b", &[("y.ts", 5)]);
        a.insights.push(Insight::new(InsightType::Risk, Impact::Low, "Shared finding"));
        b.insights.push(Insight::new(InsightType::Risk, Impact::High, "Shared finding"));

        let merged = merge_contexts(&[&a, &b], MergeStrategy::HighestRelevance).unwrap();
        assert_eq!(merged.key_components[0].importance, 20);
        assert_eq!(merged.insights.len(), 1);
        assert_eq!(merged.insights[0].impact, Impact::High);
    }

    #[test]
    fn intersection_keeps_shared_keys_only() {
        let a = context("a", &[("x.ts", 1), ("shared.ts", 2)]);
        let b = context("b", &[("shared.ts", 3), ("z.ts", 4)]);
        let merged = merge_contexts(&[&a, &b], MergeStrategy::Intersection).unwrap();
        assert_eq!(paths(&merged), vec!["shared.ts"]);
        assert_eq!(merged.key_components[0].importance, 3);
    }

    #[test]
    fn intersection_drops_orphaned_edges() {
        let mut a = context("a", &[]);
        a.dependencies.nodes = vec![DependencyNode::file("p.ts"), DependencyNode::file("q.ts")];
        a.dependencies.edges = vec![edge("p.ts", "q.ts")];
        let mut b = context("b", &[]);
        b.dependencies.nodes = vec![DependencyNode::file("p.ts")];
        b.dependencies.edges = vec![edge("p.ts", "q.ts")];

        let merged = merge_contexts(&[&a, &b], MergeStrategy::Intersection).unwrap();
        assert_eq!(merged.dependencies.nodes.len(), 1);
        assert!(merged.dependencies.edges.is_empty());
        assert_eq!(merged.dependencies.stats.total_edges, 0);
    }

    #[test]
    fn override_takes_last_payload_but_merges_metadata() {
        let mut a = context("a", &[("x.ts", 1)]);
        a.metadata.token_count = 100;
        let mut b = context("b", &[("y.ts", 2)]);
        b.metadata.token_count = 50;
        b.dependencies.nodes = vec![DependencyNode::file("y.ts")];

        let merged = merge_contexts(&[&a, &b], MergeStrategy::Override).unwrap();
        assert_eq!(paths(&merged), vec!["y.ts"]);
        assert_eq!(merged.metadata.token_count, 150);
        assert_eq!(merged.dependencies.stats.total_nodes, 1);
    }

    #[test]
    fn newest_wins_regardless_of_input_order() {
        let mut old = context("old", &[("old.ts", 1)]);
        old.metadata.created_at = Utc::now() - Duration::hours(2);
        let new = context("new", &[("new.ts", 1)]);

        let merged = merge_contexts(&[&new, &old], MergeStrategy::Newest).unwrap();
        assert_eq!(paths(&merged), vec!["new.ts"]);
        assert_eq!(merged.metadata.topic, "old + new");
    }

    #[test]
    fn metadata_unions_files() {
        let mut a = context("a", &[]);
        a.metadata.files = vec!["x.ts".into(), "y.ts".into()];
        a.metadata.focus_areas = vec!["src".into()];
        a.metadata.analysis_time_ms = 10;
        let mut b = context("b", &[]);
        b.metadata.files = vec!["y.ts".into(), "z.ts".into()];
        b.metadata.focus_areas = vec!["lib".into()];
        b.metadata.analysis_time_ms = 5;

        let merged = merge_contexts(&[&a, &b], MergeStrategy::Union).unwrap();
        assert_eq!(merged.metadata.files, vec!["x.ts", "y.ts", "z.ts"]);
        assert_eq!(merged.metadata.focus_areas, vec!["src", "lib"]);
        assert_eq!(merged.metadata.analysis_time_ms, 15);
        assert!(merged.metadata.created_at >= a.metadata.created_at);
    }
}
