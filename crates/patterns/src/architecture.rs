use crate::config::PatternConfig;
use crate::extractor::SourceFile;
use crate::rules::{
    ArchitectureRule, ARCHITECTURE_RULES, CONSTRUCTOR_INJECTION, EVENT_PUBLISH, EVENT_SUBSCRIBE,
};
use regex::Regex;
use std::collections::BTreeSet;

/// Directory-name hits needed before a style counts on layout alone
const MIN_DIRECTORY_HITS: usize = 2;

/// Files with constructor injection needed to report dependency injection
const MIN_INJECTION_FILES: usize = 2;

/// Distinct lowercase directory names across all files
pub(crate) fn directory_set(files: &[SourceFile]) -> BTreeSet<&str> {
    files
        .iter()
        .flat_map(|f| f.dirs.iter().map(String::as_str))
        .collect()
}

pub(crate) fn directory_hits<'a>(
    rule: &ArchitectureRule,
    dirs: &BTreeSet<&'a str>,
) -> Vec<&'a str> {
    dirs.iter()
        .copied()
        .filter(|d| rule.directories.contains(d))
        .collect()
}

fn matches_any(patterns: &[Regex], content: &str) -> bool {
    patterns.iter().any(|re| re.is_match(content))
}

fn has_keyword_hit(rule: &ArchitectureRule, files: &[SourceFile]) -> bool {
    files.iter().any(|file| {
        rule.file_patterns.iter().any(|re| re.is_match(&file.file_name))
            || file
                .content
                .as_deref()
                .is_some_and(|c| rule.content_patterns.iter().any(|re| re.is_match(c)))
    })
}

pub(crate) fn extract_architectural_patterns(
    files: &[SourceFile],
    config: &PatternConfig,
) -> Vec<String> {
    let dirs = directory_set(files);
    let mut found: Vec<String> = Vec::new();

    for rule in ARCHITECTURE_RULES.iter() {
        if directory_hits(rule, &dirs).len() >= MIN_DIRECTORY_HITS || has_keyword_hit(rule, files)
        {
            found.push(rule.name.to_string());
        }
    }

    for composite in composite_signals(files, config) {
        if !found.iter().any(|f| f == composite) {
            found.push(composite.to_string());
        }
    }

    log::debug!("Architectural patterns: {found:?}");
    found
}

/// Signals that need evidence from several files at once
fn composite_signals(files: &[SourceFile], config: &PatternConfig) -> Vec<&'static str> {
    let sample = &files[..files.len().min(config.composite_sample_size)];
    let contents = || sample.iter().filter_map(|f| f.content.as_deref());

    let mut signals = Vec::new();

    let injecting = contents()
        .filter(|c| matches_any(&CONSTRUCTOR_INJECTION, c))
        .count();
    if injecting >= MIN_INJECTION_FILES {
        signals.push("dependency-injection");
    }

    let publishes = contents().any(|c| matches_any(&EVENT_PUBLISH, c));
    let subscribes = contents().any(|c| matches_any(&EVENT_SUBSCRIBE, c));
    if publishes && subscribes {
        signals.push("event-driven");
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    fn source(id: &str, content: &str) -> SourceFile {
        let mut file = SourceFile::in_memory(PathBuf::from(id), Arc::from(content));
        file.dirs = crate::extractor::dirs_of(Path::new(id), Path::new(""));
        file
    }

    #[test]
    fn two_directory_hits_are_enough() {
        let files = vec![
            source("controllers/user.js", "module.exports = {};"),
            source("models/user.js", "module.exports = {};"),
        ];
        let patterns = extract_architectural_patterns(&files, &PatternConfig::default());
        assert!(patterns.contains(&"mvc".to_string()));
    }

    #[test]
    fn single_directory_hit_is_not_enough() {
        let files = vec![source("controllers/user.js", "module.exports = {};")];
        let patterns = extract_architectural_patterns(&files, &PatternConfig::default());
        assert!(!patterns.contains(&"mvc".to_string()));
    }

    #[test]
    fn constructor_injection_needs_two_files() {
        let injected = "class A { constructor(private readonly repo: UserRepo) {} }";
        let one = vec![source("a.ts", injected), source("b.ts", "const x = 1;")];
        let two = vec![source("a.ts", injected), source("b.ts", injected)];

        let config = PatternConfig::default();
        assert!(!extract_architectural_patterns(&one, &config)
            .contains(&"dependency-injection".to_string()));
        assert!(extract_architectural_patterns(&two, &config)
            .contains(&"dependency-injection".to_string()));
    }

    #[test]
    fn emitter_and_subscriber_pair_is_event_driven() {
        let files = vec![
            source("a.ts", "bus.emit('saved', user);"),
            source("b.ts", "bus.on('saved', handle);"),
        ];
        let patterns = extract_architectural_patterns(&files, &PatternConfig::default());
        assert_eq!(
            patterns.iter().filter(|p| *p == "event-driven").count(),
            1
        );
    }
}
