use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default number of file contents kept per cache
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Bounded read-through cache of file contents, keyed by path.
///
/// Owned by a single analyzer instance. Entries live until evicted or until
/// [`SourceCache::clear`] is called; unreadable files are never cached.
pub struct SourceCache {
    entries: LruCache<PathBuf, Arc<str>>,
}

impl SourceCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Content of `path`, or `None` when the file cannot be read as UTF-8 text
    pub fn read(&mut self, path: &Path) -> Option<Arc<str>> {
        if let Some(content) = self.entries.get(path) {
            return Some(Arc::clone(content));
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let content: Arc<str> = Arc::from(content);
                self.entries.put(path.to_path_buf(), Arc::clone(&content));
                Some(content)
            }
            Err(e) => {
                log::debug!("Skipping unreadable file {}: {e}", path.display());
                None
            }
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Path rendered with forward slashes, the form used for ids throughout a context
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
