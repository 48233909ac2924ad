use context_patterns::{PatternConfig, PatternExtractor};
use context_protocol::{ConventionType, PatternQuality};
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

fn extractor() -> PatternExtractor {
    PatternExtractor::new(PatternConfig::default()).unwrap()
}

#[test]
fn singleton_file_is_classified() {
    let dir = tempdir().unwrap();
    let file = write(
        dir.path(),
        "src/connection.ts",
        r#"export class Connection {
  private static instance: Connection;

  private constructor() {}

  static getInstance(): Connection {
    if (!Connection.instance) {
      Connection.instance = new Connection();
    }
    return Connection.instance;
  }
}
"#,
    );

    let patterns = extractor().extract_design_patterns(&[file]);
    let singleton = patterns
        .iter()
        .find(|p| p.name == "singleton")
        .expect("singleton detected");

    assert_eq!(singleton.pattern_type, "creational");
    assert!(singleton.confidence >= 0.5);
    assert_ne!(singleton.quality, PatternQuality::Poor);
}

#[test]
fn layered_service_project() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let files = vec![
        write(
            root,
            "src/controllers/user.controller.ts",
            "import { UserService } from '../services/user.service';\n\
             export class UserController {\n  constructor(private readonly users: UserService) {}\n}\n",
        ),
        write(
            root,
            "src/services/user.service.ts",
            "import { UserRepository } from '../repositories/user.repository';\n\
             export class UserService {\n  constructor(private readonly repo: UserRepository) {}\n}\n",
        ),
        write(
            root,
            "src/repositories/user.repository.ts",
            "export class UserRepository {\n  findById(id: string) { return null; }\n}\n",
        ),
    ];

    let catalog = extractor().extract_catalog(&files);

    assert!(catalog.architectural_patterns.contains(&"layered".to_string()));
    assert!(catalog
        .architectural_patterns
        .contains(&"dependency-injection".to_string()));

    let style = catalog.architecture_style.unwrap();
    assert_eq!(style.primary, "layered");
    assert!(style.confidence > 0.0 && style.confidence <= 1.0);
    assert!(style.evidence.iter().any(|e| e == "directory: services"));

    assert!(catalog.design_patterns.iter().any(|p| p.name == "repository"));

    let pascal = catalog
        .conventions
        .iter()
        .find(|c| c.name == "PascalCase classes")
        .unwrap();
    assert_eq!(pascal.consistency, 100);
    assert_eq!(pascal.convention_type, ConventionType::Naming);
}

#[test]
fn empty_input_is_unknown_style() {
    let catalog = extractor().extract_catalog(&[]);
    assert!(catalog.design_patterns.is_empty());
    assert!(catalog.architectural_patterns.is_empty());
    assert!(catalog.conventions.is_empty());
    assert_eq!(catalog.architecture_style.unwrap().primary, "unknown");
}
