use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into the parent
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolve a relative specifier imported by `from_file` to an existing file.
///
/// Probes the literal path, then each extension appended, then `index` files
/// inside the directory. The first existing file wins; `None` means the import
/// contributes no edge.
pub fn resolve_module(from_file: &Path, specifier: &str, extensions: &[String]) -> Option<PathBuf> {
    let base = if specifier.starts_with('/') {
        PathBuf::from(specifier)
    } else {
        from_file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(specifier)
    };
    let base = normalize_path(&base);

    if base.is_file() {
        return Some(base);
    }

    let raw = base.as_os_str().to_string_lossy().into_owned();
    for ext in extensions {
        let candidate = PathBuf::from(format!("{raw}{ext}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    for ext in extensions {
        let candidate = base.join(format!("index{ext}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    log::debug!(
        "Unresolved import {specifier:?} from {}",
        from_file.display()
    );
    None
}
