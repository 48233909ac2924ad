use std::path::Path;

/// Source language inferred from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Go,
    Java,
    Kotlin,
    CSharp,
    Ruby,
    Php,
    Swift,
    C,
    Cpp,
    Vue,
    Svelte,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "py" | "pyw" => Language::Python,
            "rs" => Language::Rust,
            "go" => Language::Go,
            "java" => Language::Java,
            "kt" | "kts" => Language::Kotlin,
            "cs" => Language::CSharp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "swift" => Language::Swift,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "vue" => Language::Vue,
            "svelte" => Language::Svelte,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Vue => "vue",
            Language::Svelte => "svelte",
            Language::Unknown => "unknown",
        }
    }

    pub fn is_source(self) -> bool {
        self != Language::Unknown
    }

    /// Languages whose import statements the dependency analyzer understands
    pub fn uses_es_modules(self) -> bool {
        matches!(
            self,
            Language::TypeScript | Language::JavaScript | Language::Vue | Language::Svelte
        )
    }

    /// Line comment prefixes, used when reading leading documentation
    pub fn comment_prefixes(self) -> &'static [&'static str] {
        match self {
            Language::Python | Language::Ruby => &["#"],
            Language::Unknown => &[],
            Language::Rust => &["//!", "///", "//"],
            _ => &["//"],
        }
    }
}

/// True when the path looks like a test file (`*.test.*`, `*.spec.*`, `test_*`, `__tests__/`)
pub fn is_test_path(path: &str) -> bool {
    let normalized = path.replace('\\', "/").to_ascii_lowercase();
    if normalized.contains("/__tests__/") || normalized.contains("/tests/") {
        return true;
    }
    let file_name = normalized.rsplit('/').next().unwrap_or(&normalized);
    file_name.contains(".test.")
        || file_name.contains(".spec.")
        || file_name.starts_with("test_")
        || file_name.ends_with("_test.go")
        || file_name.ends_with("_test.py")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("ts"), Language::TypeScript);
        assert_eq!(Language::from_extension("TSX"), Language::TypeScript);
        assert_eq!(Language::from_extension("mjs"), Language::JavaScript);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("md"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/index.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("lib/main.rs"), Language::Rust);
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    }

    #[test]
    fn test_es_module_languages() {
        assert!(Language::TypeScript.uses_es_modules());
        assert!(Language::JavaScript.uses_es_modules());
        assert!(!Language::Python.uses_es_modules());
    }

    #[test]
    fn test_is_test_path() {
        assert!(is_test_path("src/user.test.ts"));
        assert!(is_test_path("src/user.spec.js"));
        assert!(is_test_path("src/__tests__/user.ts"));
        assert!(is_test_path("pkg/test_user.py"));
        assert!(!is_test_path("src/user.ts"));
        assert!(!is_test_path("src/contest.ts"));
    }
}
