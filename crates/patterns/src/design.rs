use crate::config::PatternConfig;
use crate::extractor::SourceFile;
use crate::rules::{DesignRule, DESIGN_RULES};
use context_protocol::{DesignPattern, PatternExample, PatternQuality};

/// Lines of context captured on each side of a matching line
const EXAMPLE_CONTEXT_LINES: usize = 1;

#[derive(Default)]
struct RuleHits {
    file_name_matches: usize,
    code_matches: usize,
    locations: Vec<String>,
    examples: Vec<PatternExample>,
}

impl RuleHits {
    fn locate(&mut self, id: &str) {
        if !self.locations.iter().any(|l| l == id) {
            self.locations.push(id.to_string());
        }
    }
}

pub(crate) fn extract_design_patterns(
    files: &[SourceFile],
    config: &PatternConfig,
) -> Vec<DesignPattern> {
    let total_files = files.len().max(1) as f64;

    let mut patterns: Vec<DesignPattern> = DESIGN_RULES
        .iter()
        .filter_map(|rule| {
            let hits = scan_rule(rule, files, config);
            if hits.locations.is_empty() {
                return None;
            }

            let signal = 0.3 * hits.code_matches as f64 + 0.5 * hits.file_name_matches as f64;
            let spread = (hits.locations.len() as f64 / total_files).min(1.0);
            let confidence = (0.6 * signal + 0.4 * spread).clamp(0.0, 1.0);

            if confidence < config.min_confidence {
                log::debug!(
                    "Dropping {} at confidence {confidence:.2}",
                    rule.name
                );
                return None;
            }

            Some(DesignPattern {
                pattern_type: rule.pattern_type.to_string(),
                name: rule.name.to_string(),
                locations: hits.locations,
                confidence,
                quality: PatternQuality::from_confidence(confidence),
                description: rule.description.to_string(),
                examples: config.include_examples.then_some(hits.examples),
            })
        })
        .collect();

    // Stable: equal confidence keeps rule order
    patterns.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    patterns.truncate(config.max_patterns);
    patterns
}

fn scan_rule(rule: &DesignRule, files: &[SourceFile], config: &PatternConfig) -> RuleHits {
    let mut hits = RuleHits::default();

    for file in files {
        for re in &rule.file_patterns {
            if re.is_match(&file.file_name) {
                hits.file_name_matches += 1;
                hits.locate(&file.id);
            }
        }

        let Some(content) = file.content.as_deref() else {
            continue;
        };
        for re in &rule.content_patterns {
            let Some(found) = re.find(content) else {
                continue;
            };
            hits.code_matches += 1;
            hits.locate(&file.id);

            if config.include_examples && hits.examples.len() < config.max_examples {
                hits.examples.push(example_at(&file.id, content, found.start()));
            }
        }
    }

    hits
}

fn example_at(file: &str, content: &str, offset: usize) -> PatternExample {
    let line = content[..offset].matches('\n').count();
    let first = line.saturating_sub(EXAMPLE_CONTEXT_LINES);
    let snippet = content
        .lines()
        .skip(first)
        .take(line - first + EXAMPLE_CONTEXT_LINES + 1)
        .collect::<Vec<_>>()
        .join("\n");

    PatternExample {
        file: file.to_string(),
        line: line + 1,
        snippet: snippet.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn source(id: &str, content: &str) -> SourceFile {
        SourceFile::in_memory(PathBuf::from(id), Arc::from(content))
    }

    #[test]
    fn singleton_is_detected_with_examples() {
        let files = vec![source(
            "src/db.ts",
            "export class Db {\n  private static instance: Db;\n  static getInstance() {\n    return Db.instance;\n  }\n}",
        )];

        let patterns = extract_design_patterns(&files, &PatternConfig::default());
        let singleton = patterns.iter().find(|p| p.name == "singleton").unwrap();

        assert!(singleton.confidence >= 0.5);
        assert_eq!(singleton.locations, vec!["src/db.ts".to_string()]);
        let examples = singleton.examples.as_ref().unwrap();
        assert_eq!(examples[0].line, 2);
        assert!(examples[0].snippet.contains("private static instance"));
    }

    #[test]
    fn weak_signals_fall_below_min_confidence() {
        let mut files = vec![source("src/proxy.ts", "export const x = 1;")];
        for i in 0..9 {
            files.push(source(&format!("src/f{i}.ts"), "export const y = 2;"));
        }

        // 0.6 * 0.5 + 0.4 * 0.1 = 0.34
        let patterns = extract_design_patterns(&files, &PatternConfig::default());
        assert!(patterns.iter().all(|p| p.name != "proxy"));

        let patterns = extract_design_patterns(&files, &PatternConfig::exhaustive());
        let proxy = patterns.iter().find(|p| p.name == "proxy").unwrap();
        assert!((proxy.confidence - 0.34).abs() < 1e-9);
        assert_eq!(proxy.quality, PatternQuality::Poor);
    }

    #[test]
    fn results_are_sorted_and_truncated() {
        let files = vec![
            source("src/user.repository.ts", "class UserRepository { findById(id) {} }"),
            source("src/strategy.ts", "export interface PricingStrategy {}"),
        ];
        let config = PatternConfig {
            max_patterns: 1,
            ..PatternConfig::exhaustive()
        };

        let patterns = extract_design_patterns(&files, &config);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].name, "repository");
    }

    #[test]
    fn examples_can_be_disabled() {
        let files = vec![source("a.ts", "const p = new Proxy(target, handler);")];
        let config = PatternConfig {
            include_examples: false,
            ..PatternConfig::exhaustive()
        };
        let patterns = extract_design_patterns(&files, &config);
        assert!(patterns.iter().all(|p| p.examples.is_none()));
    }
}
