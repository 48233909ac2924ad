use crate::rules::{
    COMMONJS_EXPORT, CONDITIONALS, DEFAULT_EXPORT, DEFAULT_PURPOSE, EXPORT_LIST,
    FILENAME_PURPOSES, FILE_PATTERNS, IMPORT_SPECIFIERS, LOOPS, NAMED_EXPORT, PURPOSE_RULES,
    STAR_REEXPORT, TRY_CATCH,
};
use context_protocol::{display_path, FileSummary, Language};
use regex::Regex;
use std::path::Path;

/// Longest purpose taken from a doc comment
const MAX_PURPOSE_CHARS: usize = 120;

/// Summary of one file's content; `path` is only used for naming and language
pub(crate) fn summarize_content(path: &Path, content: &str) -> FileSummary {
    let language = Language::from_path(path);
    let lines_of_code = content.lines().filter(|l| !l.trim().is_empty()).count();

    FileSummary {
        path: display_path(path),
        language: language.as_str().to_string(),
        purpose: purpose_of(path, content, language),
        exports: exports_of(content),
        imports: imports_of(content),
        patterns: FILE_PATTERNS
            .iter()
            .filter(|(re, _)| re.is_match(content))
            .map(|(_, name)| name.to_string())
            .collect(),
        complexity: complexity_of(content, lines_of_code),
        lines_of_code,
    }
}

fn purpose_of(path: &Path, content: &str, language: Language) -> String {
    if let Some(doc) = leading_doc(content, language) {
        return doc;
    }

    if let Some((_, purpose)) = PURPOSE_RULES.iter().find(|(re, _)| re.is_match(content)) {
        return purpose.to_string();
    }

    let stem = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let tokens: Vec<&str> = stem.split(['.', '-', '_']).collect();
    FILENAME_PURPOSES
        .iter()
        .find(|(token, _)| tokens.contains(token))
        .map(|(_, purpose)| purpose.to_string())
        .unwrap_or_else(|| DEFAULT_PURPOSE.to_string())
}

/// First meaningful line of the comment block opening the file
fn leading_doc(content: &str, language: Language) -> Option<String> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .skip_while(|l| l.is_empty() || l.starts_with("#!") || is_directive(l))
        .collect();
    let first = *lines.first()?;

    let text = if first.starts_with("/*") {
        block_comment_text(&lines)?
    } else if first.starts_with("\"\"\"") || first.starts_with("'''") {
        docstring_text(&lines)?
    } else {
        let prefix = language
            .comment_prefixes()
            .iter()
            .find(|p| first.starts_with(**p))?;
        lines
            .iter()
            .take_while(|l| l.starts_with(prefix))
            .map(|l| l.trim_start_matches(prefix).trim_start_matches('/').trim())
            .find(|l| !l.is_empty() && !is_tooling_comment(l))?
    };

    Some(text.chars().take(MAX_PURPOSE_CHARS).collect())
}

fn block_comment_text<'a>(lines: &[&'a str]) -> Option<&'a str> {
    for line in lines {
        let text = line
            .trim_start_matches("/**")
            .trim_start_matches("/*")
            .trim_end_matches("*/")
            .trim_start_matches('*')
            .trim();
        if !text.is_empty() && !text.starts_with('@') && !is_tooling_comment(text) {
            return Some(text);
        }
        if line.contains("*/") {
            break;
        }
    }
    None
}

fn docstring_text<'a>(lines: &[&'a str]) -> Option<&'a str> {
    let quote = &lines[0][..3];
    let opening = lines[0][3..].trim();
    if !opening.is_empty() {
        return Some(opening.split(quote).next().unwrap_or_default().trim());
    }
    lines[1..]
        .iter()
        .take_while(|l| !l.starts_with(quote))
        .map(|l| l.split(quote).next().unwrap_or_default().trim())
        .find(|l| !l.is_empty())
}

fn is_directive(line: &str) -> bool {
    matches!(
        line.trim_end_matches(';'),
        "'use strict'" | "\"use strict\"" | "'use client'" | "\"use client\""
    )
}

fn is_tooling_comment(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    ["eslint", "@ts-", "prettier", "copyright", "spdx-license", "istanbul"]
        .iter()
        .any(|p| lower.starts_with(p))
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}

fn captures<'c>(re: &Option<Regex>, content: &'c str) -> Vec<regex::Captures<'c>> {
    re.as_ref()
        .map(|re| re.captures_iter(content).collect())
        .unwrap_or_default()
}

pub(crate) fn exports_of(content: &str) -> Vec<String> {
    let mut exports = Vec::new();

    for caps in captures(&NAMED_EXPORT, content) {
        push_unique(&mut exports, caps[1].to_string());
    }

    for caps in captures(&EXPORT_LIST, content) {
        for item in caps[1].split(',') {
            let item = item.trim().trim_start_matches("type ").trim();
            let name = item.rsplit(" as ").next().unwrap_or(item).trim();
            push_unique(&mut exports, name.to_string());
        }
    }

    for caps in captures(&STAR_REEXPORT, content) {
        match caps.get(1) {
            Some(alias) => push_unique(&mut exports, alias.as_str().to_string()),
            None => push_unique(&mut exports, format!("* from {}", &caps[2])),
        }
    }

    if DEFAULT_EXPORT.as_ref().is_some_and(|re| re.is_match(content)) {
        push_unique(&mut exports, "default".to_string());
    }

    for caps in captures(&COMMONJS_EXPORT, content) {
        push_unique(&mut exports, caps[1].to_string());
    }

    exports
}

/// Imported module specifiers in source order
pub(crate) fn imports_of(content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = IMPORT_SPECIFIERS
        .iter()
        .flat_map(|re| re.captures_iter(content))
        .filter_map(|caps| caps.get(1).map(|m| (m.start(), m.as_str().to_string())))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);

    let mut imports = Vec::new();
    for (_, spec) in found {
        push_unique(&mut imports, spec);
    }
    imports
}

fn count(re: &Option<Regex>, content: &str) -> u32 {
    re.as_ref()
        .map(|re| re.find_iter(content).count() as u32)
        .unwrap_or(0)
}

fn max_nesting(content: &str) -> u32 {
    let mut depth: u32 = 0;
    let mut max = 0;
    for c in content.chars() {
        match c {
            '{' => {
                depth += 1;
                max = max.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Additive 0-100 score from size, nesting and control flow
pub(crate) fn complexity_of(content: &str, lines_of_code: usize) -> u32 {
    let size = match lines_of_code {
        0..=50 => 0,
        51..=100 => 5,
        101..=200 => 10,
        201..=500 => 20,
        _ => 30,
    };
    let nesting = (max_nesting(content).saturating_sub(1) * 4).min(20);
    let conditionals = count(&CONDITIONALS, content).min(25);
    let loops = (count(&LOOPS, content) * 2).min(15);
    let error_handling = (count(&TRY_CATCH, content) * 2).min(10);

    (size + nesting + conditionals + loops + error_handling).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn purpose_prefers_leading_doc_comment() {
        let content = "/**\n * Formats currency values for display.\n * @module money\n */\nexport function format() {}";
        let summary = summarize_content(Path::new("src/money.ts"), content);
        assert_eq!(summary.purpose, "Formats currency values for display.");
        assert_eq!(summary.language, "typescript");
    }

    #[test]
    fn purpose_from_line_comments_skips_tooling() {
        let content = "// eslint-disable-next-line\n// Session store backed by redis\nconst x = 1;";
        let summary = summarize_content(Path::new("session.js"), content);
        assert_eq!(summary.purpose, "Session store backed by redis");
    }

    #[test]
    fn purpose_from_python_docstring() {
        let content = "\"\"\"Price feed helpers.\"\"\"\nimport os\n";
        let summary = summarize_content(Path::new("feed.py"), content);
        assert_eq!(summary.purpose, "Price feed helpers.");
        assert_eq!(summary.imports, vec!["os".to_string()]);
    }

    #[test]
    fn purpose_falls_back_to_rules_then_file_name() {
        let service = summarize_content(Path::new("a.ts"), "export class UserService {}");
        assert_eq!(service.purpose, "Service layer logic");

        let utils = summarize_content(Path::new("src/string.utils.ts"), "export const x = 1;");
        assert_eq!(utils.purpose, "Utility functions");

        let plain = summarize_content(Path::new("src/thing.ts"), "const x = 1;");
        assert_eq!(plain.purpose, "Source file");
    }

    #[test]
    fn exports_cover_every_form() {
        let content = "\
export const a = 1;
export async function b() {}
export interface C {}
const d = 1, e = 2;
export { d, e as f };
export * from './g';
export * as h from './h';
export default a;
";
        assert_eq!(
            exports_of(content),
            vec!["a", "b", "C", "d", "f", "* from ./g", "h", "default"]
        );

        let cjs = "module.exports = router;\nexports.helper = () => {};";
        assert_eq!(exports_of(cjs), vec!["default", "helper"]);
    }

    #[test]
    fn imports_are_in_source_order_and_unique() {
        let content = "\
import React from 'react';
import './styles.css';
const lodash = require('lodash');
import { a } from './a';
const lazy = import('./lazy');
import React2 from 'react';
";
        assert_eq!(
            imports_of(content),
            vec!["react", "./styles.css", "lodash", "./a", "./lazy"]
        );
    }

    #[test]
    fn complexity_grows_with_control_flow() {
        let flat = "export const a = 1;";
        assert_eq!(complexity_of(flat, 1), 0);

        let nested = "function f(x) {\n  if (x) {\n    for (const y of x) {\n      try { g(y); } catch (e) { h(e); }\n    }\n  }\n}";
        let score = complexity_of(nested, 7);
        // nesting 4 -> 12, if -> 1, for -> 2, try + catch -> 4
        assert_eq!(score, 19);
    }

    #[test]
    fn complexity_is_capped() {
        let content = "if (a) {}\n".repeat(1000);
        assert_eq!(complexity_of(&content, 1000), 30 + 25);
        let deep = format!("{}{}", "{".repeat(50), "}".repeat(50));
        assert!(complexity_of(&deep, 1) <= 100);
    }

    #[test]
    fn patterns_and_loc() {
        let content = "import React from 'react';\n\nexport async function load() {\n  try { await fetch('/x'); } catch (e) {}\n}\n";
        let summary = summarize_content(Path::new("load.tsx"), content);
        assert_eq!(summary.lines_of_code, 4);
        assert!(summary.patterns.contains(&"async-await".to_string()));
        assert!(summary.patterns.contains(&"react".to_string()));
        assert!(summary.patterns.contains(&"error-handling".to_string()));
    }
}
