//! Regex tables for summaries and content insights.

use context_protocol::{Impact, InsightType};
use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("Invalid rule pattern {pattern:?}: {e}");
            None
        }
    }
}

fn compile_table<T: Copy>(table: &[(&str, T)]) -> Vec<(Regex, T)> {
    table
        .iter()
        .filter_map(|(pattern, outcome)| compile(pattern).map(|re| (re, *outcome)))
        .collect()
}

/// Content signals mapped to a purpose, first match wins
pub(crate) static PURPOSE_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile_table(&[
        (r#"\b(?:describe|it|test)\s*\(\s*['"`]"#, "Test suite"),
        (r#"from\s+['"]react['"][\s\S]*return\s*\(?\s*<"#, "React component"),
        (r"\bexport\s+(?:default\s+)?function\s+use[A-Z]\w*\s*\(", "Custom React hook"),
        (
            r"\b(?:router|app)\.(?:get|post|put|patch|delete)\s*\(",
            "HTTP route definitions",
        ),
        (r"\(\s*req\s*,\s*res\s*,\s*next\s*\)", "Request middleware"),
        (r"\bclass\s+\w+Controller\b", "Request controller"),
        (r"\bclass\s+\w+Service\b", "Service layer logic"),
        (r"\bclass\s+\w+Repository\b", "Data access repository"),
        (
            r"\b(?:new\s+Schema\s*\(|mongoose\.model\s*\(|@Entity\s*\(|sequelize\.define\s*\()",
            "Data model definition",
        ),
        (
            r"\b(?:createSlice|createStore|configureStore|combineReducers)\s*\(",
            "State management",
        ),
        (r"\bcreateServer\s*\(|\.listen\s*\(\s*\w+", "Server entry point"),
    ])
});

/// File-name tokens mapped to a purpose, checked after content rules
pub(crate) const FILENAME_PURPOSES: &[(&str, &str)] = &[
    ("test", "Test suite"),
    ("spec", "Test suite"),
    ("index", "Module entry point"),
    ("types", "Type definitions"),
    ("utils", "Utility functions"),
    ("helpers", "Utility functions"),
    ("constants", "Constant definitions"),
    ("config", "Configuration"),
];

pub(crate) const DEFAULT_PURPOSE: &str = "Source file";

pub(crate) static NAMED_EXPORT: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(
        r"(?m)^\s*export\s+(?:declare\s+)?(?:async\s+)?(?:const|let|var|function\*?|class|abstract\s+class|interface|type|enum)\s+([A-Za-z_$][\w$]*)",
    )
});

/// `export { a, b as c }` with or without a `from` clause
pub(crate) static EXPORT_LIST: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"(?m)^\s*export\s+(?:type\s+)?\{([^}]*)\}"));

pub(crate) static DEFAULT_EXPORT: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"(?m)^\s*(?:export\s+default\b|module\.exports\s*=)"));

pub(crate) static STAR_REEXPORT: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(r#"(?m)^\s*export\s+\*\s+(?:as\s+([A-Za-z_$][\w$]*)\s+)?from\s+['"]([^'"]+)['"]"#)
});

pub(crate) static COMMONJS_EXPORT: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"(?m)^\s*(?:module\.)?exports\.([A-Za-z_$][\w$]*)\s*="));

/// Module specifiers: static, side-effect, dynamic and require imports
pub(crate) static IMPORT_SPECIFIERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?m)^\s*(?:import|export)\s[^'";]*?\bfrom\s+['"]([^'"\n]+)['"]"#,
        r#"(?m)^\s*import\s+['"]([^'"\n]+)['"]"#,
        r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#,
        r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#,
        r"(?m)^\s*from\s+([A-Za-z_][\w.]*)\s+import\s",
        r"(?m)^\s*import\s+([A-Za-z_][\w.]*)\s*$",
    ]
    .iter()
    .filter_map(|p| compile(p))
    .collect()
});

/// Constructs recorded in `FileSummary::patterns`
pub(crate) static FILE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    compile_table(&[
        (r"\bawait\s", "async-await"),
        (r"\bnew\s+Promise\s*\(|\.then\s*\(", "promises"),
        (r"\bclass\s+[A-Z]\w*", "class-based"),
        (r#"from\s+['"]react['"]"#, "react"),
        (r"\b(?:function|const)\s+use[A-Z]\w*", "custom-hook"),
        (r"\btry\s*\{", "error-handling"),
        (r"\.on\s*\(\s*['\x22]|\bemit\s*\(", "event-emitter"),
        (r"\(\s*req\s*,\s*res\s*(?:,\s*next\s*)?\)", "request-handler"),
        (r"\bexport\s+(?:interface|type)\s", "type-definitions"),
        (r"\b(?:describe|it|test)\s*\(", "tests"),
    ])
});

pub(crate) static CONDITIONALS: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"\bif\s*\(|\belse\b|\bswitch\s*\(|\bcase\s|\?\?|&&|\|\|"));

pub(crate) static LOOPS: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(r"\bfor\s*\(|\bwhile\s*\(|\.(?:forEach|map|filter|reduce)\s*\(")
});

pub(crate) static TRY_CATCH: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"\btry\s*\{|\bcatch\s*[({]"));

#[derive(Clone, Copy)]
pub(crate) struct ContentRule {
    pub label: &'static str,
    pub insight_type: InsightType,
    pub impact: Impact,
    pub confidence: f64,
    pub recommendation: &'static str,
    /// Skipped for test files
    pub skip_tests: bool,
}

fn rule(
    label: &'static str,
    insight_type: InsightType,
    impact: Impact,
    confidence: f64,
    recommendation: &'static str,
) -> ContentRule {
    ContentRule {
        label,
        insight_type,
        impact,
        confidence,
        recommendation,
        skip_tests: false,
    }
}

/// Per-match content insights. Capture group 1, when present, is quoted in the description.
pub(crate) static CONTENT_RULES: Lazy<Vec<(Regex, ContentRule)>> = Lazy::new(|| {
    use Impact::{High, Low, Medium};
    use InsightType::{Gotcha, Opportunity, Risk};

    compile_table(&[
        (
            r"(?m)(?://|#|/\*|\*)\s*TODO\b:?\s*(.*)$",
            rule("TODO", Opportunity, Low, 0.9, "Track the TODO in the issue tracker or resolve it"),
        ),
        (
            r"(?m)(?://|#|/\*|\*)\s*FIXME\b:?\s*(.*)$",
            rule("FIXME", Risk, Medium, 0.9, "Resolve the known defect before relying on this code"),
        ),
        (
            r"(?m)(?://|#|/\*|\*)\s*(?:HACK|XXX)\b:?\s*(.*)$",
            rule("HACK", Gotcha, Medium, 0.85, "Replace the workaround with a proper fix"),
        ),
        (
            r"(?m)(?:@deprecated|\bDEPRECATED\b):?\s*(.*)$",
            rule("Deprecated", Gotcha, Low, 0.8, "Migrate callers away from the deprecated API"),
        ),
        (
            r"(?m)(@ts-ignore|@ts-nocheck|eslint-disable(?:-next-line)?)",
            rule(
                "Suppressed type checking",
                Gotcha,
                Medium,
                0.9,
                "Fix the underlying type error instead of suppressing it",
            ),
        ),
        (
            r"\bcatch\s*(?:\([^)]*\))?\s*\{\s*\}",
            rule(
                "Empty catch block",
                Risk,
                High,
                0.95,
                "Handle or log the error instead of swallowing it",
            ),
        ),
        (
            r"\bconsole\.(?:log|debug|trace)\s*\(",
            ContentRule {
                skip_tests: true,
                ..rule(
                    "Console statement",
                    Opportunity,
                    Low,
                    0.7,
                    "Use the project logger or remove debugging output",
                )
            },
        ),
        (
            r":\s*any\b|\bas\s+any\b|<any>",
            rule(
                "Untyped any",
                Opportunity,
                Low,
                0.75,
                "Replace `any` with a concrete type or `unknown`",
            ),
        ),
    ])
});
