use context_protocol::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};

/// Configuration for file, module and codebase summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummarizerConfig {
    /// Files listed individually in the technical summary
    pub technical_file_limit: usize,

    /// Entries in the "top" sections of the detailed summary (patterns, dependencies)
    pub top_items: usize,

    /// Directory names skipped when listing a module, in addition to build and VCS directories
    pub excluded_dirs: Vec<String>,

    /// Capacity of the content cache
    pub cache_capacity: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            technical_file_limit: 20,
            top_items: 5,
            excluded_dirs: Vec::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SummarizerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.technical_file_limit == 0 {
            return Err("technical_file_limit must be > 0".to_string());
        }

        if self.top_items == 0 {
            return Err("top_items must be > 0".to_string());
        }

        if self.cache_capacity == 0 {
            return Err("cache_capacity must be > 0".to_string());
        }

        Ok(())
    }

    /// True when `name` is a directory skipped by module listings
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        context_protocol::path_filters::is_build_dir(name)
            || self
                .excluded_dirs
                .iter()
                .any(|d| d.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(SummarizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = SummarizerConfig {
            technical_file_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn excluded_dirs_extend_build_dirs() {
        let config = SummarizerConfig {
            excluded_dirs: vec!["fixtures".to_string()],
            ..Default::default()
        };
        assert!(config.is_excluded_dir("node_modules"));
        assert!(config.is_excluded_dir("Fixtures"));
        assert!(!config.is_excluded_dir("src"));
    }
}
