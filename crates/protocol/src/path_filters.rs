use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory names that never contain hand-written sources
pub const BUILD_AND_VCS_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".hg",
    ".svn",
    "dist",
    "build",
    "out",
    "target",
    "coverage",
    ".next",
    ".nuxt",
    ".cache",
    "__pycache__",
    ".venv",
    "vendor",
];

pub fn is_build_dir(name: &str) -> bool {
    BUILD_AND_VCS_DIRS.contains(&name)
}

/// Include/exclude prefix filter plus an optional glob/substring file pattern
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathFilter {
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub file_pattern: Option<String>,
}

impl PathFilter {
    pub fn is_active(&self) -> bool {
        self.include_paths
            .iter()
            .any(|p| !normalize_filter_path(p).is_empty())
            || self
                .exclude_paths
                .iter()
                .any(|p| !normalize_filter_path(p).is_empty())
            || self
                .file_pattern
                .as_deref()
                .map(str::trim)
                .is_some_and(|p| !p.is_empty())
    }

    /// Whether a root-relative path passes the filter. Paths inside build/VCS
    /// directories never pass.
    pub fn allows(&self, rel_path: &str) -> bool {
        let rel_path = rel_path.replace('\\', "/");

        if rel_path.split('/').any(is_build_dir) {
            return false;
        }

        let includes: Vec<String> = self
            .include_paths
            .iter()
            .map(|p| normalize_filter_path(p))
            .filter(|p| !p.is_empty())
            .collect();
        if !includes.is_empty()
            && !includes
                .iter()
                .any(|prefix| path_prefix_matches(prefix, &rel_path))
        {
            return false;
        }

        for exclude in &self.exclude_paths {
            let normalized = normalize_filter_path(exclude);
            if !normalized.is_empty() && path_prefix_matches(&normalized, &rel_path) {
                return false;
            }
        }

        matches_file_pattern(
            &rel_path,
            self.file_pattern
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty()),
        )
    }
}

fn normalize_filter_path(raw: &str) -> String {
    let mut value = raw.trim().replace('\\', "/");
    while let Some(rest) = value.strip_prefix("./") {
        value = rest.to_string();
    }
    let value = value.trim_matches('/');
    if value == "." {
        return String::new();
    }
    value.to_string()
}

fn path_prefix_matches(prefix: &str, path: &str) -> bool {
    if path == prefix {
        return true;
    }
    if !path.starts_with(prefix) {
        return false;
    }
    path.as_bytes().get(prefix.len()) == Some(&b'/')
}

fn matches_file_pattern(path: &str, pattern: Option<&str>) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };

    if !pattern.contains('*') && !pattern.contains('?') {
        return path.contains(pattern);
    }

    glob::Pattern::new(pattern)
        .map(|p| p.matches(path))
        .unwrap_or(false)
}

/// Longest directory shared by every path (empty when the list is empty)
pub fn common_root(paths: &[PathBuf]) -> PathBuf {
    let mut iter = paths.iter();
    let Some(first) = iter.next() else {
        return PathBuf::new();
    };
    let mut root: PathBuf = first.parent().map(Path::to_path_buf).unwrap_or_default();
    for path in iter {
        while !path.starts_with(&root) {
            if !root.pop() {
                return PathBuf::new();
            }
        }
    }
    root
}

/// `path` relative to `root` with forward slashes, or the full path when it is not beneath `root`
pub fn relative_to(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Directory names of `path` between `root` and the file name, lowercased
pub fn directory_names(path: &Path, root: &Path) -> Vec<String> {
    let rel = relative_to(path, root);
    let mut parts: Vec<String> = rel.split('/').map(str::to_ascii_lowercase).collect();
    parts.pop();
    parts.retain(|p| !p.is_empty() && p != ".");
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str], pattern: Option<&str>) -> PathFilter {
        PathFilter {
            include_paths: include.iter().map(|s| s.to_string()).collect(),
            exclude_paths: exclude.iter().map(|s| s.to_string()).collect(),
            file_pattern: pattern.map(str::to_string),
        }
    }

    #[test]
    fn include_paths_is_prefix_match() {
        let f = filter(&["src"], &[], None);
        assert!(f.allows("src/lib.ts"));
        assert!(!f.allows("src2/lib.ts"));
        assert!(!f.allows("docs/README.md"));
    }

    #[test]
    fn exclude_paths_wins() {
        let f = filter(&["src"], &["src/gen"], None);
        assert!(f.allows("src/lib.ts"));
        assert!(!f.allows("src/gen/api.ts"));
    }

    #[test]
    fn build_directories_never_pass() {
        let f = PathFilter::default();
        assert!(!f.allows("node_modules/react/index.js"));
        assert!(!f.allows("app/dist/bundle.js"));
        assert!(f.allows("app/src/main.ts"));
    }

    #[test]
    fn file_pattern_supports_substring_and_glob() {
        assert!(filter(&[], &[], Some("user")).allows("src/user.ts"));
        assert!(!filter(&[], &[], Some("user")).allows("src/order.ts"));
        assert!(filter(&[], &[], Some("src/*.ts")).allows("src/user.ts"));
        assert!(!filter(&[], &[], Some("src/*.ts")).allows("src/user.js"));
    }

    #[test]
    fn blank_prefixes_do_not_activate_filters() {
        let f = filter(&["", ".", "./", "/"], &["", "////"], None);
        assert!(!f.is_active());
        assert!(f.allows("src/lib.ts"));
    }

    #[test]
    fn common_root_of_siblings() {
        let paths = vec![
            PathBuf::from("/repo/src/a/x.ts"),
            PathBuf::from("/repo/src/b/y.ts"),
            PathBuf::from("/repo/src/z.ts"),
        ];
        assert_eq!(common_root(&paths), PathBuf::from("/repo/src"));
        assert_eq!(
            directory_names(Path::new("/repo/src/a/Deep/x.ts"), Path::new("/repo/src")),
            vec!["a".to_string(), "deep".to_string()]
        );
    }
}
