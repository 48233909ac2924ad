use context_protocol::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};

/// Extensions probed, in order, when resolving a relative specifier
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json"];

/// Configuration for dependency analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Maximum depth of transitive expansion
    pub max_depth: usize,

    /// Maximum number of files discovered while building a graph
    pub max_files: usize,

    /// Maximum number of chain entries produced by one transitive expansion
    pub max_chains: usize,

    /// Capacity of the content and dependency-list caches
    pub cache_capacity: usize,

    /// Extensions probed during module resolution
    pub extensions: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_files: 1000,
            max_chains: 10_000,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl AnalyzerConfig {
    /// Shallow analysis for quick, interactive passes
    pub fn shallow() -> Self {
        Self {
            max_depth: 3,
            max_files: 200,
            max_chains: 1_000,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be > 0".to_string());
        }

        if self.max_files == 0 {
            return Err("max_files must be > 0".to_string());
        }

        if self.cache_capacity == 0 {
            return Err("cache_capacity must be > 0".to_string());
        }

        if let Some(ext) = self.extensions.iter().find(|ext| !ext.starts_with('.')) {
            return Err(format!("extension {ext:?} must start with '.'"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
        assert!(AnalyzerConfig::shallow().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AnalyzerConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.max_depth = 4;
        config.extensions = vec!["ts".to_string()];
        assert!(config.validate().is_err());

        config.extensions = vec![".ts".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AnalyzerConfig = serde_json::from_str(r#"{"maxDepth": 4}"#).unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_files, 1000);
    }
}
