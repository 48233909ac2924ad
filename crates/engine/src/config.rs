use crate::error::{EngineError, Result};
use context_graph::AnalyzerConfig;
use context_patterns::PatternConfig;
use context_protocol::PathFilter;
use context_summarizer::SummarizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a full context assembly.
///
/// Every section is optional in a TOML file; missing keys take their defaults.
///
/// ```toml
/// maxComponents = 10
///
/// [filter]
/// excludePaths = ["src/generated"]
///
/// [analyzer]
/// maxDepth = 4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub analyzer: AnalyzerConfig,
    pub patterns: PatternConfig,
    pub summarizer: SummarizerConfig,

    /// Include/exclude prefixes relative to the common root of the input files
    pub filter: PathFilter,

    /// Maximum number of key components kept in a context
    pub max_components: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            patterns: PatternConfig::default(),
            summarizer: SummarizerConfig::default(),
            filter: PathFilter::default(),
            max_components: 20,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| EngineError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate().map_err(EngineError::InvalidConfig)?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_components == 0 {
            return Err("max_components must be > 0".to_string());
        }

        self.analyzer
            .validate()
            .map_err(|e| format!("analyzer: {e}"))?;
        self.patterns
            .validate()
            .map_err(|e| format!("patterns: {e}"))?;
        self.summarizer
            .validate()
            .map_err(|e| format!("summarizer: {e}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str(
            "maxComponents = 5\n\n[analyzer]\nmaxDepth = 4\n\n[filter]\nexcludePaths = [\"gen\"]\n",
            Path::new("engine.toml"),
        )
        .unwrap();

        assert_eq!(config.max_components, 5);
        assert_eq!(config.analyzer.max_depth, 4);
        assert_eq!(config.analyzer.max_files, AnalyzerConfig::default().max_files);
        assert_eq!(config.filter.exclude_paths, vec!["gen".to_string()]);
        assert_eq!(config.patterns, PatternConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EngineConfig::from_toml_str("maxComponents = 0", Path::new("engine.toml"))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err = EngineConfig::from_toml_str("[analyzer]\nmaxDepth = 0", Path::new("engine.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("analyzer"));

        let err = EngineConfig::from_toml_str("maxComponents = \"many\"", Path::new("engine.toml"))
            .unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse { .. }));
    }
}
