use crate::architecture::directory_hits;
use crate::config::PatternConfig;
use crate::extractor::SourceFile;
use crate::rules::{ArchitectureRule, ARCHITECTURE_RULES};
use context_protocol::ArchitectureStyle;
use std::collections::BTreeSet;

/// Secondary styles must reach this share of the primary score
const SECONDARY_SHARE: f64 = 0.5;

/// Lower bound of the confidence denominator
const MIN_CONFIDENCE_BASE: f64 = 10.0;

struct StyleScore<'r> {
    rule: &'r ArchitectureRule,
    score: usize,
    evidence: Vec<String>,
}

pub(crate) fn classify_architecture_style(
    files: &[SourceFile],
    config: &PatternConfig,
) -> ArchitectureStyle {
    let sample: Vec<&SourceFile> = files
        .iter()
        .filter(|f| f.is_source())
        .take(config.style_sample_size)
        .collect();
    let dirs = top_level_directories(files);

    let scores: Vec<StyleScore> = ARCHITECTURE_RULES
        .iter()
        .map(|rule| score_rule(rule, &dirs, &sample))
        .collect();

    // First declared style wins ties
    let Some(top) = scores
        .iter()
        .fold(None::<&StyleScore>, |best, s| match best {
            Some(b) if b.score >= s.score => Some(b),
            _ => Some(s),
        })
        .filter(|s| s.score > 0)
    else {
        return ArchitectureStyle::unknown();
    };

    let threshold = top.score as f64 * SECONDARY_SHARE;
    let secondary = scores
        .iter()
        .filter(|s| !std::ptr::eq(s.rule, top.rule))
        .filter(|s| s.score > 0 && s.score as f64 >= threshold)
        .map(|s| s.rule.name.to_string())
        .collect();

    let base = (files.len() as f64 * 0.5).max(MIN_CONFIDENCE_BASE);
    let confidence = (top.score as f64 / base).clamp(0.0, 1.0);

    log::debug!(
        "Architecture style {} (score {}, confidence {confidence:.2})",
        top.rule.name,
        top.score
    );

    ArchitectureStyle {
        primary: top.rule.name.to_string(),
        secondary,
        confidence,
        evidence: top.evidence.clone(),
        characteristics: top
            .rule
            .characteristics
            .iter()
            .map(|c| c.to_string())
            .collect(),
    }
}

/// First directory component of each file below the common root.
///
/// When every file shares one directory, that directory is the root, so only
/// its subdirectories score; files directly at the root add file and content
/// hits only.
fn top_level_directories(files: &[SourceFile]) -> BTreeSet<&str> {
    files
        .iter()
        .filter_map(|f| f.dirs.first().map(String::as_str))
        .collect()
}

fn score_rule<'r>(
    rule: &'r ArchitectureRule,
    dirs: &BTreeSet<&str>,
    sample: &[&SourceFile],
) -> StyleScore<'r> {
    let mut score = 0;
    let mut evidence = Vec::new();

    for dir in directory_hits(rule, dirs) {
        score += 2;
        evidence.push(format!("directory: {dir}"));
    }

    for file in sample {
        for re in &rule.file_patterns {
            if re.is_match(&file.file_name) {
                score += 1;
                evidence.push(format!("file: {}", file.id));
            }
        }
        let Some(content) = file.content.as_deref() else {
            continue;
        };
        for re in &rule.content_patterns {
            if re.is_match(content) {
                score += 1;
                evidence.push(format!("content: {}", file.id));
            }
        }
    }

    evidence.dedup();
    StyleScore {
        rule,
        score,
        evidence,
    }
}
