use crate::config::SummarizerConfig;
use context_protocol::{display_path, FileSummary, Language, ModuleSummary};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source files beneath `dir`, skipping build, VCS and configured directories
pub(crate) fn list_source_files(dir: &Path, config: &SummarizerConfig) -> Vec<PathBuf> {
    let excluded = config.clone();
    let mut builder = WalkBuilder::new(dir);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_exclude(true)
        .sort_by_file_path(|a, b| a.cmp(b));
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        !(is_dir
            && entry.depth() > 0
            && excluded.is_excluded_dir(&entry.file_name().to_string_lossy()))
    });

    let mut files = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                if Language::from_path(entry.path()).is_source() {
                    files.push(entry.into_path());
                }
            }
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }

    log::debug!("Found {} source files in {}", files.len(), dir.display());
    files
}

/// Bare package name of an import specifier, or `None` for relative and absolute paths
pub(crate) fn package_name(specifier: &str) -> Option<String> {
    if specifier.is_empty() || specifier.starts_with('.') || specifier.starts_with('/') {
        return None;
    }
    if specifier.starts_with("@/") || specifier.starts_with("~/") {
        return None;
    }

    let mut parts = specifier.split('/');
    let first = parts.next()?;
    if first.starts_with('@') {
        let name = parts.next()?;
        return Some(format!("{first}/{name}"));
    }
    Some(first.to_string())
}

/// Values ordered by descending count, first-seen order on ties
pub(crate) fn ranked<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub(crate) fn summarize_files(dir: &Path, summaries: &[FileSummary]) -> ModuleSummary {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| display_path(dir));

    // Patterns shared by at least two files
    let patterns: Vec<String> = ranked(
        summaries
            .iter()
            .flat_map(|s| s.patterns.iter().map(String::as_str)),
    )
    .into_iter()
    .filter(|(_, n)| *n >= 2)
    .map(|(p, _)| p)
    .collect();

    let purpose = match ranked(summaries.iter().map(|s| s.purpose.as_str())).first() {
        Some((top, _)) if patterns.is_empty() => top.clone(),
        Some((top, _)) => format!("{top} using {}", patterns.join(", ")),
        None => "Empty module".to_string(),
    };

    let index_file = summaries.iter().find(|s| {
        Path::new(&s.path)
            .file_stem()
            .is_some_and(|stem| stem == "index")
    });
    let public_api: Vec<String> = match index_file {
        Some(index) => index
            .exports
            .iter()
            .filter(|e| *e != "default")
            .cloned()
            .collect(),
        None => {
            let mut api = Vec::new();
            for export in summaries.iter().flat_map(|s| &s.exports) {
                if !api.contains(export) {
                    api.push(export.clone());
                }
            }
            api
        }
    };

    let mut dependencies: Vec<String> = summaries
        .iter()
        .flat_map(|s| s.imports.iter().filter_map(|i| package_name(i)))
        .collect();
    dependencies.sort();
    dependencies.dedup();

    let total_lines = summaries.iter().map(|s| s.lines_of_code).sum();
    let average_complexity = if summaries.is_empty() {
        0.0
    } else {
        let mean = summaries.iter().map(|s| s.complexity as f64).sum::<f64>()
            / summaries.len() as f64;
        (mean * 100.0).round() / 100.0
    };

    ModuleSummary {
        path: display_path(dir),
        name,
        purpose,
        files: summaries.to_vec(),
        public_api,
        dependencies,
        patterns,
        total_lines,
        average_complexity,
    }
}
