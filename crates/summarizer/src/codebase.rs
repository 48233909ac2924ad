use crate::config::SummarizerConfig;
use crate::module::{package_name, ranked};
use context_protocol::{is_test_path, FileSummary, HierarchicalSummary};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Purposes listed in the detailed summary
const TOP_PURPOSES: usize = 3;

fn complexity_tier(average: f64) -> &'static str {
    if average < 20.0 {
        "low"
    } else if average < 50.0 {
        "moderate"
    } else {
        "high"
    }
}

pub(crate) fn summarize_codebase(
    topic: &str,
    summaries: &[FileSummary],
    config: &SummarizerConfig,
) -> HierarchicalSummary {
    let file_count = summaries.len();
    let total_lines: usize = summaries.iter().map(|s| s.lines_of_code).sum();

    let mut languages: BTreeMap<String, usize> = BTreeMap::new();
    for summary in summaries {
        *languages.entry(summary.language.clone()).or_default() += 1;
    }

    let dominant = ranked(summaries.iter().map(|s| s.language.as_str()))
        .into_iter()
        .next()
        .map(|(lang, _)| lang)
        .unwrap_or_else(|| "unknown".to_string());
    let uses_react = summaries.iter().any(|s| s.patterns.iter().any(|p| p == "react"));
    let has_tests = summaries.iter().any(|s| is_test_path(&s.path));

    let mut executive = format!(
        "{topic}: {file_count} files with {total_lines} lines of code, primarily {dominant}."
    );
    if uses_react {
        executive.push_str(" Uses React.");
    }
    if has_tests {
        executive.push_str(" Includes tests.");
    }

    let purposes = ranked(summaries.iter().map(|s| s.purpose.as_str()));
    let patterns = ranked(
        summaries
            .iter()
            .flat_map(|s| s.patterns.iter().map(String::as_str)),
    );
    let dependencies = {
        let packages: Vec<String> = summaries
            .iter()
            .flat_map(|s| s.imports.iter().filter_map(|i| package_name(i)))
            .collect();
        ranked(packages.iter().map(String::as_str))
    };
    let average_complexity = if file_count == 0 {
        0.0
    } else {
        summaries.iter().map(|s| s.complexity as f64).sum::<f64>() / file_count as f64
    };

    let mut detailed = executive.clone();
    if !purposes.is_empty() {
        let top: Vec<&str> = purposes
            .iter()
            .take(TOP_PURPOSES)
            .map(|(p, _)| p.as_str())
            .collect();
        let _ = write!(detailed, "\n\nMain purposes: {}.", top.join(", "));
    }
    let _ = write!(
        detailed,
        "\nComplexity: {} (average {average_complexity:.1}).",
        complexity_tier(average_complexity)
    );
    if !patterns.is_empty() {
        let _ = write!(
            detailed,
            "\nCommon patterns: {}.",
            names(&patterns, config.top_items)
        );
    }
    if !dependencies.is_empty() {
        let _ = write!(
            detailed,
            "\nKey dependencies: {}.",
            names(&dependencies, config.top_items)
        );
    }

    let mut technical = detailed.clone();
    technical.push_str("\n\nFiles:");
    for summary in summaries.iter().take(config.technical_file_limit) {
        let _ = write!(
            technical,
            "\n- {} ({}, {} lines, complexity {}): {}",
            summary.path,
            summary.language,
            summary.lines_of_code,
            summary.complexity,
            summary.purpose
        );
    }
    if file_count > config.technical_file_limit {
        let _ = write!(
            technical,
            "\n- ... and {} more",
            file_count - config.technical_file_limit
        );
    }
    if !patterns.is_empty() {
        technical.push_str("\n\nPatterns:");
        for (pattern, count) in &patterns {
            let _ = write!(technical, "\n- {pattern} ({count} files)");
        }
    }
    if !dependencies.is_empty() {
        technical.push_str("\n\nDependencies:");
        for (dependency, count) in &dependencies {
            let _ = write!(technical, "\n- {dependency} ({count} imports)");
        }
    }

    HierarchicalSummary {
        topic: topic.to_string(),
        executive,
        detailed,
        technical,
        file_count,
        total_lines,
        languages,
    }
}

fn names(ranked: &[(String, usize)], limit: usize) -> String {
    ranked
        .iter()
        .take(limit)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
