use context_engine::{ContextAssembler, EngineConfig};
use context_protocol::{CycleSeverity, EffectCategory, InsightType};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn project(root: &Path) -> Vec<PathBuf> {
    vec![
        write(
            root,
            "src/index.ts",
            "import { handle } from './routes/users';\nimport { connect } from './db/client';\n\nexport async function main() {\n  await connect();\n  return handle;\n}\n",
        ),
        write(
            root,
            "src/routes/users.ts",
            "import { query } from '../db/client';\n\nexport async function handle() {\n  return await query('select * from users');\n}\n",
        ),
        write(
            root,
            "src/db/client.ts",
            "import { handle } from '../routes/users';\n\nexport async function connect() {\n  return fetch(process.env.DB_URL);\n}\n\nexport async function query(sql) {\n  // TODO: pool connections\n  return fetch(sql);\n}\n",
        ),
    ]
}

#[tokio::test]
async fn assembles_full_context() {
    let dir = tempdir().unwrap();
    let files = project(dir.path());
    let assembler = ContextAssembler::new(EngineConfig::default()).unwrap();

    let context = assembler.assemble("users", &files).await.unwrap();

    assert_eq!(context.metadata.topic, "users");
    assert_eq!(context.metadata.files.len(), 3);
    assert_eq!(context.metadata.focus_areas, vec!["routes".to_string(), "db".to_string()]);
    assert!(context.metadata.token_count > 0);

    assert_eq!(context.summary.file_count, 3);
    assert_eq!(context.key_components.len(), 3);
    assert!(context
        .key_components
        .windows(2)
        .all(|pair| pair[0].importance >= pair[1].importance));

    assert_eq!(context.dependencies.stats.total_nodes, 3);
    assert_eq!(context.dependencies.circular.len(), 1);
    assert_eq!(context.dependencies.circular[0].severity, CycleSeverity::High);

    let entry = files[0].to_string_lossy().replace('\\', "/");
    assert_eq!(context.data_flow.entry_points, vec![entry]);
    assert_eq!(context.data_flow.flows.len(), context.dependencies.edges.len());
    assert!(context
        .data_flow
        .sinks
        .iter()
        .any(|sink| sink.category == EffectCategory::Network));

    assert!(context
        .insights
        .iter()
        .any(|insight| insight.insight_type == InsightType::Risk
            && insight.description.starts_with("Circular dependency")));
    assert!(context
        .insights
        .windows(2)
        .all(|pair| pair[0].impact.rank() >= pair[1].impact.rank()));
}

#[tokio::test]
async fn filter_and_component_limit_apply() {
    let dir = tempdir().unwrap();
    let files = project(dir.path());
    let config = EngineConfig {
        max_components: 1,
        filter: context_protocol::PathFilter {
            exclude_paths: vec!["routes".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };
    let assembler = ContextAssembler::new(config).unwrap();

    let context = assembler.assemble("db", &files).await.unwrap();

    assert_eq!(context.metadata.files.len(), 2);
    assert_eq!(context.key_components.len(), 1);
}

#[tokio::test]
async fn empty_input_yields_empty_context() {
    let assembler = ContextAssembler::new(EngineConfig::default()).unwrap();
    let context = assembler.assemble("nothing", &[]).await.unwrap();

    assert_eq!(context.metadata.topic, "nothing");
    assert!(context.key_components.is_empty());
    assert!(context.dependencies.nodes.is_empty());
}

#[tokio::test]
async fn keeps_every_content_insight_from_one_file() {
    let dir = tempdir().unwrap();
    let files = vec![
        write(dir.path(), "src/index.ts", "import { dispatch } from './features/notifications/dispatcher';\n\nexport const run = dispatch;\n"),
        write(
            dir.path(),
            "src/features/notifications/dispatcher.ts",
            "export function dispatch() {\n  // TODO: retry failed deliveries\n  return 1;\n}\n\nexport function flush() {\n  // TODO: batch outgoing messages\n  return 2;\n}\n",
        ),
    ];
    let assembler = ContextAssembler::new(EngineConfig::default()).unwrap();

    let context = assembler.assemble("notifications", &files).await.unwrap();

    let todos: Vec<_> = context
        .insights
        .iter()
        .filter(|insight| insight.description.starts_with("TODO at"))
        .collect();
    assert_eq!(todos.len(), 2);
}
