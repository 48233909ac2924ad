use crate::rules::CONTENT_RULES;
use context_protocol::{
    is_test_path, sort_by_impact, CodebaseContext, CycleSeverity, Impact, Insight, InsightType,
};
use std::collections::HashSet;

const LOW_CONSISTENCY: u8 = 50;
const MAX_ARCHITECTURE_STYLES: usize = 3;
const HIGH_COMPLEXITY: u32 = 70;
const HIGH_IMPORTANCE: u32 = 80;
const HIGH_AVG_DEPENDENCIES: f64 = 10.0;
const DEEP_DEPENDENCY_CHAIN: usize = 8;

/// Longest quoted excerpt in a content insight
const MAX_EXCERPT_CHARS: usize = 80;

/// Insights derived from an assembled context, merged with the ones it already
/// carries. Existing insights are kept as they are; a derived insight is dropped
/// only when its key (type and description prefix) matches an existing one.
/// The result is ordered critical to low.
pub fn extract_key_insights(context: &CodebaseContext) -> Vec<Insight> {
    let mut derived = Vec::new();

    for convention in &context.patterns.conventions {
        if convention.consistency < LOW_CONSISTENCY {
            derived.push(
                Insight::new(
                    InsightType::Opportunity,
                    Impact::Low,
                    format!(
                        "Inconsistent convention: {} ({}% consistency)",
                        convention.name, convention.consistency
                    ),
                )
                .recommendation(format!("Standardize on {}", convention.name))
                .confidence(0.8),
            );
        }
    }

    let styles = &context.patterns.architectural_patterns;
    if styles.len() > MAX_ARCHITECTURE_STYLES {
        derived.push(
            Insight::new(
                InsightType::Risk,
                Impact::Medium,
                format!(
                    "Architectural sprawl: {} architectural patterns detected ({})",
                    styles.len(),
                    styles.join(", ")
                ),
            )
            .recommendation("Consolidate on a primary architecture and document the boundaries")
            .confidence(0.7),
        );
    }

    for component in &context.key_components {
        if component.complexity > HIGH_COMPLEXITY {
            derived.push(
                Insight::new(
                    InsightType::Risk,
                    Impact::High,
                    format!(
                        "High complexity in {} (score {})",
                        component.path, component.complexity
                    ),
                )
                .related_paths(vec![component.path.clone()])
                .recommendation("Split the component into smaller units")
                .confidence(0.85),
            );
        }
        if component.importance > HIGH_IMPORTANCE {
            derived.push(
                Insight::new(
                    InsightType::Gotcha,
                    Impact::Medium,
                    format!(
                        "Central component {} (importance {}): changes ripple to {} dependents",
                        component.path,
                        component.importance,
                        component.dependents.len()
                    ),
                )
                .related_paths(vec![component.path.clone()])
                .recommendation("Cover the component with tests before changing it")
                .confidence(0.8),
            );
        }
    }

    let graph = &context.dependencies;
    for circular in &graph.circular {
        let impact = match circular.severity {
            CycleSeverity::High => Impact::High,
            CycleSeverity::Medium => Impact::Medium,
            CycleSeverity::Low => Impact::Low,
        };
        derived.push(
            Insight::new(
                InsightType::Risk,
                impact,
                format!("Circular dependency: {}", circular.key()),
            )
            .related_paths(circular.cycle.clone())
            .recommendation(circular.suggestion.clone())
            .confidence(0.95),
        );
    }

    if graph.stats.avg_dependencies > HIGH_AVG_DEPENDENCIES {
        derived.push(
            Insight::new(
                InsightType::Risk,
                Impact::Medium,
                format!(
                    "High coupling: {:.2} dependencies per file on average",
                    graph.stats.avg_dependencies
                ),
            )
            .recommendation("Introduce module boundaries to reduce fan-out")
            .confidence(0.75),
        );
    }

    if graph.stats.max_depth > DEEP_DEPENDENCY_CHAIN {
        derived.push(
            Insight::new(
                InsightType::Risk,
                Impact::Medium,
                format!(
                    "Deep dependency chains: depth {} from the entry points",
                    graph.stats.max_depth
                ),
            )
            .recommendation("Flatten layering so changes propagate through fewer modules")
            .confidence(0.75),
        );
    }

    let existing: HashSet<String> = context.insights.iter().map(Insight::key).collect();
    let mut insights = context.insights.clone();
    insights.extend(
        derived
            .into_iter()
            .filter(|insight| !existing.contains(&insight.key())),
    );
    sort_by_impact(&mut insights);
    insights
}

/// One insight per marker or risky construct found in `content`
pub fn extract_insights_from_content(content: &str, path: &str) -> Vec<Insight> {
    let is_test = is_test_path(path);
    let mut found: Vec<(usize, Insight)> = Vec::new();

    for (re, rule) in CONTENT_RULES.iter() {
        if rule.skip_tests && is_test {
            continue;
        }

        for caps in re.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let line = content[..whole.start()].matches('\n').count() + 1;

            let excerpt: String = caps
                .get(1)
                .map(|m| m.as_str().trim().trim_end_matches("*/").trim())
                .unwrap_or_default()
                .chars()
                .take(MAX_EXCERPT_CHARS)
                .collect();
            let description = if excerpt.is_empty() {
                format!("{} at {path}:{line}", rule.label)
            } else {
                format!("{} at {path}:{line}: {excerpt}", rule.label)
            };

            found.push((
                whole.start(),
                Insight::new(rule.insight_type, rule.impact, description)
                    .related_paths(vec![path.to_string()])
                    .recommendation(rule.recommendation)
                    .confidence(rule.confidence),
            ));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, insight)| insight).collect()
}
