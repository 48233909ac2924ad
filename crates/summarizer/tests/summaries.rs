use context_summarizer::{Summarizer, SummarizerConfig};
use pretty_assertions::assert_eq;
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

fn summarizer() -> Summarizer {
    Summarizer::new(SummarizerConfig::default()).unwrap()
}

#[test]
fn module_summary_over_a_directory() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("auth");
    write(
        &root,
        "index.ts",
        "export { login } from './login';\nexport { sign } from './token';\nexport default login;\n",
    );
    write(
        &root,
        "login.ts",
        "import axios from 'axios';\nexport async function login() {\n  const res = await axios.post('/login');\n  return res.data;\n}\n",
    );
    write(
        &root,
        "token.ts",
        "import jwt from 'jsonwebtoken';\nexport async function sign(payload) {\n  return await jwt.sign(payload);\n}\n",
    );
    write(&root, "node_modules/axios/index.js", "module.exports = {};");
    write(&root, "README.md", "# auth");

    let module = summarizer().summarize_module(&root).unwrap();

    assert_eq!(module.name, "auth");
    assert_eq!(module.files.len(), 3, "build dirs and non-source files are skipped");
    assert_eq!(module.public_api, vec!["login".to_string(), "sign".to_string()]);
    assert_eq!(
        module.dependencies,
        vec!["axios".to_string(), "jsonwebtoken".to_string()]
    );
    assert_eq!(module.patterns, vec!["async-await".to_string()]);
    assert!(module.purpose.ends_with("using async-await"));
}

#[test]
fn file_summary_reads_from_disk() {
    let dir = tempdir().unwrap();
    let file = write(
        dir.path(),
        "src/config.ts",
        "export const PORT = 3000;\nexport const HOST = 'localhost';\n",
    );

    let summary = summarizer().summarize_file(&file).unwrap();
    assert_eq!(summary.purpose, "Configuration");
    assert_eq!(summary.exports, vec!["PORT".to_string(), "HOST".to_string()]);
    assert_eq!(summary.lines_of_code, 2);
    assert_eq!(summary.complexity, 0);
}

#[test]
fn codebase_summary_counts_languages() {
    let dir = tempdir().unwrap();
    let files = vec![
        write(dir.path(), "a.ts", "export const a = 1;"),
        write(dir.path(), "b.ts", "export const b = 2;"),
        write(dir.path(), "tool.py", "import os\n"),
    ];

    let summary = summarizer().summarize_codebase("mixed", &files);
    assert_eq!(summary.file_count, 3);
    assert_eq!(summary.languages.get("typescript"), Some(&2));
    assert_eq!(summary.languages.get("python"), Some(&1));
    assert!(summary.executive.contains("primarily typescript"));
}
