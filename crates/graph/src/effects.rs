use context_protocol::{EffectCategory, ExternalEffect};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

struct EffectRule {
    category: EffectCategory,
    description: &'static str,
    pattern: Regex,
}

/// Whether statements of this category change state outside the process
fn is_side_effect(category: EffectCategory) -> bool {
    !matches!(category, EffectCategory::Environment)
}

static EFFECT_RULES: Lazy<Vec<EffectRule>> = Lazy::new(|| {
    use EffectCategory::*;

    let table: &[(EffectCategory, &str, &str)] = &[
        (
            FileSystem,
            "File system access through fs",
            r"\bfs\.(?:readFile|writeFile|appendFile|unlink|mkdir|rmdir|rm|readdir|stat|createReadStream|createWriteStream|copyFile|rename)(?:Sync)?\s*\(",
        ),
        (
            FileSystem,
            "Imports the fs module",
            r#"(?:from\s+['"](?:node:)?fs(?:/promises)?['"]|require\(\s*['"](?:node:)?fs(?:/promises)?['"]\s*\))"#,
        ),
        (
            FileSystem,
            "Opens files directly",
            r#"\bopen\s*\([^)]*,\s*['"][rwa]b?\+?['"]"#,
        ),
        (Network, "HTTP request through fetch", r"\bfetch\s*\("),
        (Network, "HTTP request through axios", r"\baxios(?:\.\w+)?\s*\("),
        (Network, "HTTP request through the http module", r"\bhttps?\.(?:request|get)\s*\("),
        (Network, "WebSocket connection", r"\bnew\s+WebSocket\s*\("),
        (
            Network,
            "HTTP request through requests",
            r"\brequests\.(?:get|post|put|delete|patch)\s*\(",
        ),
        (
            Database,
            "Raw SQL statement",
            r"(?i)\b(?:SELECT\s+[\w*,\s.]+\s+FROM|INSERT\s+INTO|UPDATE\s+\w+\s+SET|DELETE\s+FROM)\b",
        ),
        (
            Database,
            "ORM or query builder usage",
            r"\b(?:prisma|knex|sequelize|mongoose|typeorm|drizzle)\.\w+",
        ),
        (
            Database,
            "Document store operation",
            r"\.(?:findOne|findMany|insertOne|insertMany|updateOne|updateMany|deleteOne|deleteMany|aggregate)\s*\(",
        ),
        (Environment, "Reads process environment", r"\bprocess\.env\b"),
        (Environment, "Reads build-time environment", r"\bimport\.meta\.env\b"),
        (Environment, "Reads process environment", r"\bos\.(?:environ|getenv)\b"),
        (
            Console,
            "Writes to the console",
            r"\bconsole\.(?:log|info|warn|error|debug|trace)\s*\(",
        ),
    ];

    table
        .iter()
        .filter_map(|(category, description, pattern)| match Regex::new(pattern) {
            Ok(pattern) => Some(EffectRule {
                category: *category,
                description: *description,
                pattern,
            }),
            Err(e) => {
                log::warn!("Invalid effect pattern {pattern:?}: {e}");
                None
            }
        })
        .collect()
});

/// External effects in source text, at most one per category (first match wins)
pub fn detect_effects(content: &str) -> Vec<ExternalEffect> {
    let mut seen = HashSet::new();
    let mut effects = Vec::new();

    for rule in EFFECT_RULES.iter() {
        if seen.contains(&rule.category) {
            continue;
        }
        if let Some(m) = rule.pattern.find(content) {
            seen.insert(rule.category);
            effects.push(ExternalEffect {
                category: rule.category,
                description: rule.description.to_string(),
                line: line_of(content, m.start()),
                is_side_effect: is_side_effect(rule.category),
            });
        }
    }

    effects
}

/// 1-indexed line containing byte offset `offset`
pub(crate) fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(effects: &[ExternalEffect]) -> Vec<EffectCategory> {
        effects.iter().map(|e| e.category).collect()
    }

    #[test]
    fn one_effect_per_category() {
        let code = r#"
import { readFileSync } from 'fs';
const a = fs.readFileSync('a');
const b = fs.writeFileSync('b', a);
const res = await fetch(url);
console.log(res);
console.error('boom');
"#;
        let effects = detect_effects(code);
        assert_eq!(
            categories(&effects),
            vec![
                EffectCategory::FileSystem,
                EffectCategory::Network,
                EffectCategory::Console
            ]
        );
        // First rule of the category wins
        assert_eq!(effects[0].description, "File system access through fs");
        assert_eq!(effects[0].line, 3);
    }

    #[test]
    fn environment_reads_are_not_side_effects() {
        let effects = detect_effects("const port = process.env.PORT;");
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].category, EffectCategory::Environment);
        assert!(!effects[0].is_side_effect);
    }

    #[test]
    fn database_statements() {
        let effects = detect_effects("await db.query('SELECT id FROM users');");
        assert_eq!(categories(&effects), vec![EffectCategory::Database]);
        assert!(effects[0].is_side_effect);
    }

    #[test]
    fn pure_code_has_no_effects() {
        assert!(detect_effects("export const add = (a, b) => a + b;").is_empty());
    }
}
