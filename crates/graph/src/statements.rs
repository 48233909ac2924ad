use context_protocol::{DependencyKind, DirectDependency};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Kind of statement a matcher recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    /// `import x from 'y'`, `export { x } from 'y'`
    Static,
    /// `import 'y'`
    SideEffect,
    /// `import('y')`
    Dynamic,
    /// `const x = require('y')`
    Require,
    /// `import type { X } from 'y'`
    TypeOnly,
}

struct StatementRule {
    kind: StatementKind,
    pattern: Regex,
}

/// Matchers applied top-to-bottom; every match produces one dependency
static STATEMENT_RULES: Lazy<Vec<StatementRule>> = Lazy::new(|| {
    let table: &[(StatementKind, &str)] = &[
        (
            StatementKind::Static,
            r#"(?m)^\s*(?:import|export)\s+([^'";()=]*?)\s+from\s+['"]([^'"\n]+)['"]"#,
        ),
        (
            StatementKind::SideEffect,
            r#"(?m)^\s*import\s+['"]([^'"\n]+)['"]"#,
        ),
        (
            StatementKind::Dynamic,
            r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#,
        ),
        (
            StatementKind::Require,
            r#"(?:(?:const|let|var)\s+(\{[^}]*\}|[\w$]+)\s*=\s*)?\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#,
        ),
        (
            StatementKind::TypeOnly,
            r#"(?m)^\s*(?:import|export)\s+type\s+([^'";()=]*?)\s+from\s+['"]([^'"\n]+)['"]"#,
        ),
    ];

    table
        .iter()
        .filter_map(|(kind, pattern)| match Regex::new(pattern) {
            Ok(pattern) => Some(StatementRule {
                kind: *kind,
                pattern,
            }),
            Err(e) => {
                log::warn!("Invalid statement pattern {pattern:?}: {e}");
                None
            }
        })
        .collect()
});

/// Extract every import/require-style dependency from source text
pub fn parse_dependencies(content: &str) -> Vec<DirectDependency> {
    let mut dependencies = Vec::new();

    for rule in STATEMENT_RULES.iter() {
        for caps in rule.pattern.captures_iter(content) {
            if let Some(dep) = dependency_from(rule.kind, &caps) {
                dependencies.push(dep);
            }
        }
    }

    dependencies
}

fn dependency_from(kind: StatementKind, caps: &Captures<'_>) -> Option<DirectDependency> {
    match kind {
        StatementKind::Static => {
            let clause = caps.get(1)?.as_str().trim();
            // `import type` statements belong to the type-only matcher
            if clause.starts_with("type ") || clause.starts_with("type{") {
                return None;
            }
            let specifier = caps.get(2)?.as_str();
            Some(build(specifier, parse_clause(clause), false, false))
        }
        StatementKind::SideEffect => {
            let specifier = caps.get(1)?.as_str();
            Some(build(specifier, Vec::new(), false, false))
        }
        StatementKind::Dynamic => {
            let specifier = caps.get(1)?.as_str();
            Some(build(specifier, Vec::new(), true, false))
        }
        StatementKind::Require => {
            let specifier = caps.get(2)?.as_str();
            let imports = caps
                .get(1)
                .map(|binding| parse_clause(binding.as_str()))
                .unwrap_or_default();
            Some(build(specifier, imports, false, false))
        }
        StatementKind::TypeOnly => {
            let clause = caps.get(1)?.as_str();
            let specifier = caps.get(2)?.as_str();
            Some(build(specifier, parse_clause(clause), false, true))
        }
    }
}

fn build(specifier: &str, imports: Vec<String>, is_dynamic: bool, type_only: bool) -> DirectDependency {
    let kind = if type_only {
        DependencyKind::TypeOnly
    } else if is_relative(specifier) {
        DependencyKind::Internal
    } else {
        DependencyKind::External
    };

    DirectDependency {
        path: specifier.to_string(),
        kind,
        imports,
        is_dynamic,
    }
}

/// Relative and absolute specifiers point into the codebase; everything else is a package or builtin
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

/// Symbol names bound by an import/export clause.
///
/// `Default, { a, b as c }` yields `default, a, b`; `* as ns` yields `*`.
fn parse_clause(clause: &str) -> Vec<String> {
    let clause = clause.trim();
    let mut symbols = Vec::new();

    let (head, braced) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => {
            (format!("{}{}", &clause[..open], &clause[close + 1..]), Some(&clause[open + 1..close]))
        }
        _ => (clause.to_string(), None),
    };

    for part in head.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if part.starts_with('*') {
            symbols.push("*".to_string());
        } else if part.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            symbols.push("default".to_string());
        }
    }

    if let Some(braced) = braced {
        for item in braced.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let item = item.strip_prefix("type ").unwrap_or(item).trim();
            // `a as b` and `a: b` (destructured require) both import `a`
            let name = item
                .split(|c: char| c.is_whitespace() || c == ':')
                .next()
                .unwrap_or(item);
            if !name.is_empty() {
                symbols.push(name.to_string());
            }
        }
    }

    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(deps: &[DirectDependency]) -> Vec<(String, DependencyKind, bool)> {
        deps.iter()
            .map(|d| (d.path.clone(), d.kind, d.is_dynamic))
            .collect()
    }

    #[test]
    fn parses_every_statement_family() {
        let code = r#"
import React, { useState } from 'react';
import * as path from "node:path";
import './styles.css';
export { helper } from './helpers';
import type { User } from './types';
const { readFile } = require('fs');
const lazy = () => import('./lazy');
"#;
        let deps = parse_dependencies(code);
        assert_eq!(
            summary(&deps),
            vec![
                ("react".to_string(), DependencyKind::External, false),
                ("node:path".to_string(), DependencyKind::External, false),
                ("./helpers".to_string(), DependencyKind::Internal, false),
                ("./styles.css".to_string(), DependencyKind::Internal, false),
                ("./lazy".to_string(), DependencyKind::Internal, true),
                ("fs".to_string(), DependencyKind::External, false),
                ("./types".to_string(), DependencyKind::TypeOnly, false),
            ]
        );
    }

    #[test]
    fn import_symbols() {
        let deps = parse_dependencies("import React, { useState, useMemo as memo } from 'react';");
        assert_eq!(deps[0].imports, vec!["default", "useState", "useMemo"]);

        let deps = parse_dependencies("import * as fs from 'fs';");
        assert_eq!(deps[0].imports, vec!["*"]);

        let deps = parse_dependencies("const { a, b: renamed } = require('./x');");
        assert_eq!(deps[0].imports, vec!["a", "b"]);
    }

    #[test]
    fn multiline_import_clause() {
        let code = "import {\n  one,\n  two,\n} from '../shared';\n";
        let deps = parse_dependencies(code);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].imports, vec!["one", "two"]);
        assert!(deps[0].is_internal());
    }

    #[test]
    fn type_only_import_is_not_internal() {
        let deps = parse_dependencies("import type { Config } from './config';");
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].kind, DependencyKind::TypeOnly);
        assert_eq!(deps[0].imports, vec!["Config"]);
    }

    #[test]
    fn relative_specifiers() {
        assert!(is_relative("./a"));
        assert!(is_relative("../a"));
        assert!(is_relative("/abs/a"));
        assert!(!is_relative("@scope/pkg"));
        assert!(!is_relative("lodash/fp"));
    }
}
