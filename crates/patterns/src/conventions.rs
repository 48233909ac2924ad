use crate::config::PatternConfig;
use crate::extractor::SourceFile;
use crate::rules::CONVENTION_RULES;
use context_protocol::{is_test_path, Convention, ConventionType};
use std::collections::BTreeSet;

/// Examples kept per convention
const MAX_EXAMPLES: usize = 3;

pub(crate) fn extract_conventions(files: &[SourceFile], config: &PatternConfig) -> Vec<Convention> {
    let sources: Vec<&SourceFile> = files.iter().filter(|f| f.is_source()).collect();
    if sources.is_empty() {
        return Vec::new();
    }
    let total = sources.len() as f64;

    let mut conventions = Vec::new();
    for rule in CONVENTION_RULES.iter() {
        let mut matched = 0usize;
        let mut examples: Vec<String> = Vec::new();

        for content in sources.iter().filter_map(|f| f.content.as_deref()) {
            let Some(found) = rule.patterns.iter().find_map(|re| re.find(content)) else {
                continue;
            };
            matched += 1;
            let example = found.as_str().trim().to_string();
            if examples.len() < MAX_EXAMPLES && !examples.contains(&example) {
                examples.push(example);
            }
        }

        let frequency = matched as f64 / total;
        if matched == 0 || frequency < config.convention_threshold {
            continue;
        }

        conventions.push(Convention {
            convention_type: rule.convention_type,
            name: rule.name.to_string(),
            pattern: rule.sources.join(" | "),
            examples,
            frequency,
            consistency: Convention::consistency_for(frequency),
            description: rule.description.to_string(),
        });
    }

    conventions.extend(structure_conventions(&sources, config));
    conventions
}

/// Conventions visible from file names alone
fn structure_conventions(sources: &[&SourceFile], config: &PatternConfig) -> Vec<Convention> {
    let mut conventions = Vec::new();

    let tests: Vec<&&SourceFile> = sources.iter().filter(|f| is_test_path(&f.id)).collect();
    let colocated: Vec<&str> = tests
        .iter()
        .filter(|f| !f.dirs.iter().any(|d| d == "tests" || d == "__tests__"))
        .map(|f| f.id.as_str())
        .collect();
    if !colocated.is_empty() {
        let frequency = colocated.len() as f64 / tests.len() as f64;
        if frequency >= config.convention_threshold {
            conventions.push(structure(
                "Co-located tests",
                "*.test.* / *.spec.* beside the code under test",
                &colocated,
                frequency,
                "Test files live next to the modules they cover",
            ));
        }
    }

    let directories: BTreeSet<Option<&std::path::Path>> =
        sources.iter().map(|f| f.path.parent()).collect();
    let barrels: Vec<&str> = sources
        .iter()
        .filter(|f| f.file_name.starts_with("index.") && !is_test_path(&f.id))
        .map(|f| f.id.as_str())
        .collect();
    if !barrels.is_empty() {
        let frequency = (barrels.len() as f64 / directories.len().max(1) as f64).min(1.0);
        if frequency >= config.convention_threshold {
            conventions.push(structure(
                "Barrel index files",
                "index.* re-exporting a directory",
                &barrels,
                frequency,
                "Directories expose their contents through an index file",
            ));
        }
    }

    conventions
}

fn structure(
    name: &str,
    pattern: &str,
    examples: &[&str],
    frequency: f64,
    description: &str,
) -> Convention {
    Convention {
        convention_type: ConventionType::Structure,
        name: name.to_string(),
        pattern: pattern.to_string(),
        examples: examples
            .iter()
            .take(MAX_EXAMPLES)
            .map(|e| e.to_string())
            .collect(),
        frequency,
        consistency: Convention::consistency_for(frequency),
        description: description.to_string(),
    }
}
