//! Static rule tables.
//!
//! Every table is an ordered list processed top-to-bottom. Order matters for
//! architecture styles: on equal scores the first declared style wins.

use context_protocol::ConventionType;
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("Invalid rule pattern {pattern:?}: {e}");
                None
            }
        })
        .collect()
}

pub(crate) struct DesignRule {
    pub pattern_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Matched against the file name
    pub file_patterns: Vec<Regex>,
    /// Matched against the file content
    pub content_patterns: Vec<Regex>,
}

pub(crate) static DESIGN_RULES: Lazy<Vec<DesignRule>> = Lazy::new(|| {
    let table: &[(&str, &str, &str, &[&str], &[&str])] = &[
        (
            "creational",
            "singleton",
            "Single shared instance exposed through a static accessor",
            &[r"(?i)singleton"],
            &[
                r"private\s+static\s+(?:readonly\s+)?instance\b",
                r"static\s+getInstance\s*\(",
                r"\bgetInstance\s*\(\s*\)",
            ],
        ),
        (
            "creational",
            "factory",
            "Object creation delegated to dedicated factory functions or classes",
            &[r"(?i)factory"],
            &[
                r"\bclass\s+\w*Factory\b",
                r"\bcreate[A-Z]\w*\s*\(",
                r"\w+Factory\s*\.\s*create\s*\(",
            ],
        ),
        (
            "creational",
            "builder",
            "Step-by-step construction through chained setters and a build call",
            &[r"(?i)builder"],
            &[
                r"\bclass\s+\w*Builder\b",
                r"\.build\s*\(\s*\)",
                r"return\s+this\s*;",
            ],
        ),
        (
            "behavioral",
            "observer",
            "Subscribers notified of events published by a subject",
            &[r"(?i)(?:observer|listener|subscriber|emitter)"],
            &[
                r"\b(?:subscribe|unsubscribe)\s*\(",
                r#"\.on\s*\(\s*['"]"#,
                r"\bemit\s*\(",
                r"\bextends\s+EventEmitter\b",
                r"\baddEventListener\s*\(",
            ],
        ),
        (
            "behavioral",
            "strategy",
            "Interchangeable algorithms behind a common interface",
            &[r"(?i)strateg"],
            &[
                r"\binterface\s+\w*Strategy\b",
                r"\bclass\s+\w+Strategy\b",
                r"\bimplements\s+\w*Strategy\b",
            ],
        ),
        (
            "behavioral",
            "custom-hook",
            "Reusable stateful logic extracted into use* hooks",
            &[r"^use[A-Z]\w*\.[jt]sx?$"],
            &[r"\bexport\s+(?:default\s+)?function\s+use[A-Z]\w*\s*\("],
        ),
        (
            "structural",
            "decorator",
            "Behavior added by wrapping classes, methods or functions",
            &[r"(?i)decorator"],
            &[
                r"(?m)^\s*@[A-Z]\w*\s*\(",
                r"\bclass\s+\w+Decorator\b",
                r"\bfunction\s+\w+\s*\(\s*target\s*[:,)]",
            ],
        ),
        (
            "structural",
            "adapter",
            "Incompatible interfaces bridged by an adapter",
            &[r"(?i)adapter"],
            &[r"\bclass\s+\w+Adapter\b", r"\bimplements\s+\w+Adapter\b"],
        ),
        (
            "structural",
            "proxy",
            "Access to an object mediated by a stand-in",
            &[r"(?i)proxy"],
            &[r"\bnew\s+Proxy\s*\(", r"\bclass\s+\w+Proxy\b"],
        ),
        (
            "structural",
            "facade",
            "Simplified entry point over a complex subsystem",
            &[r"(?i)facade"],
            &[r"\bclass\s+\w+Facade\b"],
        ),
        (
            "architectural",
            "repository",
            "Persistence access encapsulated behind repository objects",
            &[r"(?i)repositor"],
            &[
                r"\bclass\s+\w+Repository\b",
                r"\binterface\s+\w*Repository\b",
                r"\b(?:findById|findAll|deleteById)\s*\(",
            ],
        ),
        (
            "architectural",
            "dependency-injection",
            "Collaborators supplied from outside rather than constructed internally",
            &[r"(?i)(?:container|injector)"],
            &[
                r"@Injectable\s*\(",
                r"@Inject\s*\(",
                r"constructor\s*\(\s*(?:private|public|protected)\s+(?:readonly\s+)?\w+\s*:",
            ],
        ),
        (
            "architectural",
            "middleware",
            "Request processing through a chain of middleware functions",
            &[r"(?i)middleware"],
            &[
                r"\(\s*req\s*,\s*res\s*,\s*next\s*\)",
                r"\bapp\.use\s*\(",
            ],
        ),
    ];

    table
        .iter()
        .map(
            |(pattern_type, name, description, file_patterns, content_patterns)| DesignRule {
                pattern_type,
                name,
                description,
                file_patterns: compile(file_patterns),
                content_patterns: compile(content_patterns),
            },
        )
        .collect()
});

pub(crate) struct ArchitectureRule {
    pub name: &'static str,
    /// Lowercase directory names typical for the style
    pub directories: &'static [&'static str],
    pub file_patterns: Vec<Regex>,
    pub content_patterns: Vec<Regex>,
    pub characteristics: &'static [&'static str],
}

pub(crate) static ARCHITECTURE_RULES: Lazy<Vec<ArchitectureRule>> = Lazy::new(|| {
    type Row = (
        &'static str,
        &'static [&'static str],
        &'static [&'static str],
        &'static [&'static str],
        &'static [&'static str],
    );
    let table: &[Row] = &[
        (
            "mvc",
            &["controllers", "models", "views"],
            &[r"(?i)controller\.[jt]sx?$"],
            &[r"\bextends\s+Controller\b", r"\bres\.render\s*\("],
            &[
                "Separation of models, views and controllers",
                "Controllers translate requests into model operations",
            ],
        ),
        (
            "layered",
            &["controllers", "services", "repositories", "dao", "routes"],
            &[r"(?i)\.service\.[jt]s$", r"(?i)\.repository\.[jt]s$"],
            &[r"\bclass\s+\w+Service\b"],
            &[
                "Horizontal layers with downward-only dependencies",
                "Business logic concentrated in a service layer",
            ],
        ),
        (
            "clean-architecture",
            &["domain", "usecases", "use-cases", "entities", "infrastructure", "application"],
            &[r"(?i)use-?case"],
            &[r"\bclass\s+\w+UseCase\b"],
            &[
                "Dependencies point inward toward the domain",
                "Use cases orchestrate entities independent of frameworks",
            ],
        ),
        (
            "hexagonal",
            &["ports", "adapters", "core", "domain"],
            &[r"(?i)\.port\.[jt]s$", r"(?i)\.adapter\.[jt]s$"],
            &[r"\binterface\s+\w+Port\b"],
            &[
                "Core logic isolated behind ports",
                "Adapters connect the core to external systems",
            ],
        ),
        (
            "microservices",
            &["services", "gateway", "api-gateway", "proto"],
            &[r"(?i)docker-compose", r"(?i)\.proto$"],
            &[r"@nestjs/microservices", r"\bgrpc\b"],
            &[
                "Independently deployable services",
                "Communication over network protocols",
            ],
        ),
        (
            "event-driven",
            &["events", "handlers", "listeners", "subscribers", "consumers", "producers"],
            &[r"(?i)(?:event|listener|subscriber)s?\.[jt]s$"],
            &[r"\b(?:publish|dispatch)\s*\(", r"\bEventEmitter\b"],
            &[
                "Components communicate through events",
                "Producers decoupled from consumers",
            ],
        ),
        (
            "component-based",
            &["components", "hooks", "pages", "layouts"],
            &[r"\.(?:jsx|tsx|vue|svelte)$"],
            &[r#"from\s+['"]react['"]"#, r"\bdefineComponent\s*\("],
            &[
                "UI composed from reusable components",
                "State and behavior co-located with views",
            ],
        ),
        (
            "modular",
            &["modules", "features", "packages", "libs"],
            &[r"(?i)\.module\.[jt]s$"],
            &[r"@Module\s*\("],
            &[
                "Code grouped by feature or module",
                "Explicit module boundaries and public surfaces",
            ],
        ),
        (
            "serverless",
            &["functions", "lambdas", "lambda"],
            &[r"(?i)^serverless\.", r"(?i)^handler\.[jt]s$"],
            &[
                r"\bexports\.handler\s*=",
                r"\bexport\s+(?:const|async\s+function)\s+handler\b",
            ],
            &[
                "Stateless functions triggered by events",
                "Infrastructure managed by the platform",
            ],
        ),
    ];

    table
        .iter()
        .map(
            |(name, directories, file_patterns, content_patterns, characteristics)| {
                ArchitectureRule {
                    name,
                    directories,
                    file_patterns: compile(file_patterns),
                    content_patterns: compile(content_patterns),
                    characteristics,
                }
            },
        )
        .collect()
});

/// Constructor parameters declared with a visibility modifier and a class type
pub(crate) static CONSTRUCTOR_INJECTION: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"constructor\s*\(\s*(?:private|public|protected)\s+(?:readonly\s+)?\w+\s*:\s*[A-Z]\w*",
    ])
});

pub(crate) static EVENT_PUBLISH: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"\b(?:emit|publish|dispatch)\s*\("]));

pub(crate) static EVENT_SUBSCRIBE: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[r#"(?:\.on\s*\(\s*['"]|\bsubscribe\s*\(|\baddEventListener\s*\()"#])
});

pub(crate) struct ConventionRule {
    pub convention_type: ConventionType,
    pub name: &'static str,
    pub description: &'static str,
    pub sources: &'static [&'static str],
    pub patterns: Vec<Regex>,
}

pub(crate) static CONVENTION_RULES: Lazy<Vec<ConventionRule>> = Lazy::new(|| {
    use ConventionType::{Import, Naming};

    let table: &[(ConventionType, &str, &str, &[&str])] = &[
        (
            Naming,
            "camelCase functions",
            "Functions and function-valued bindings use camelCase names",
            &[
                r"\bfunction\s+[a-z][a-zA-Z0-9]*\s*\(",
                r"\b(?:const|let)\s+[a-z][a-zA-Z0-9]*\s*=\s*(?:async\s*)?\([^)]*\)\s*=>",
            ],
        ),
        (
            Naming,
            "PascalCase classes",
            "Classes use PascalCase names",
            &[r"\bclass\s+[A-Z][a-zA-Z0-9]*"],
        ),
        (
            Naming,
            "UPPER_SNAKE_CASE constants",
            "Module-level constants use UPPER_SNAKE_CASE names",
            &[r"\bconst\s+[A-Z][A-Z0-9]*_[A-Z0-9_]+\s*="],
        ),
        (
            Naming,
            "snake_case functions",
            "Functions use snake_case names",
            &[
                r"\bdef\s+[a-z_][a-z0-9_]*\s*\(",
                r"\bfn\s+[a-z_][a-z0-9_]*\s*[<(]",
            ],
        ),
        (
            Naming,
            "I-prefixed interfaces",
            "Interfaces carry an I prefix",
            &[r"\binterface\s+I[A-Z]\w*"],
        ),
        (
            Import,
            "ES module imports",
            "Dependencies are imported with ES module syntax",
            &[r#"(?m)^\s*import\s+[^;]+?\s+from\s+['"]"#],
        ),
        (
            Import,
            "CommonJS require",
            "Dependencies are loaded with require()",
            &[r#"\brequire\s*\(\s*['"]"#],
        ),
        (
            Import,
            "Path aliases",
            "Imports use @/ or ~/ path aliases instead of long relative paths",
            &[r#"from\s+['"][@~]/"#],
        ),
        (
            Import,
            "Relative imports",
            "Sibling modules are imported through relative paths",
            &[r#"from\s+['"]\.\.?/"#],
        ),
        (
            Import,
            "Named exports",
            "Modules expose named exports",
            &[r"(?m)^export\s+(?:const|function|class|interface|type|enum|async\s+function)\s"],
        ),
        (
            Import,
            "Default exports",
            "Modules expose a default export",
            &[r"(?m)^export\s+default\b"],
        ),
    ];

    table
        .iter()
        .map(|(convention_type, name, description, sources)| ConventionRule {
            convention_type: *convention_type,
            name,
            description,
            sources,
            patterns: compile(sources),
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        for rule in DESIGN_RULES.iter() {
            assert!(!rule.content_patterns.is_empty(), "{} has no content patterns", rule.name);
            assert!(!rule.file_patterns.is_empty(), "{} has no file patterns", rule.name);
        }
        for rule in ARCHITECTURE_RULES.iter() {
            assert!(!rule.content_patterns.is_empty(), "{} has no content patterns", rule.name);
        }
        for rule in CONVENTION_RULES.iter() {
            assert_eq!(rule.patterns.len(), rule.sources.len(), "{}", rule.name);
        }
    }

    #[test]
    fn composite_signal_patterns_compile() {
        for (name, patterns) in [
            ("constructor injection", &*CONSTRUCTOR_INJECTION),
            ("event publish", &*EVENT_PUBLISH),
            ("event subscribe", &*EVENT_SUBSCRIBE),
        ] {
            assert_eq!(patterns.len(), 1, "{name}");
        }
        assert!(CONSTRUCTOR_INJECTION[0].is_match("constructor(private readonly repo: UserRepo)"));
        assert!(EVENT_PUBLISH[0].is_match("bus.emit('saved', user);"));
        assert!(EVENT_SUBSCRIBE[0].is_match("bus.on('saved', handle);"));
    }
}
