use context_protocol::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};

/// Configuration for pattern, convention and architecture recognition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternConfig {
    /// Design patterns below this confidence are discarded
    pub min_confidence: f64,

    /// Maximum number of design patterns reported
    pub max_patterns: usize,

    /// Capture short code examples for design patterns
    pub include_examples: bool,

    /// Examples captured per design pattern
    pub max_examples: usize,

    /// Minimum share of source files a convention must appear in
    pub convention_threshold: f64,

    /// Source files sampled for architecture-style scoring
    pub style_sample_size: usize,

    /// Files sampled for composite signals (constructor injection, events)
    pub composite_sample_size: usize,

    /// Capacity of the content cache
    pub cache_capacity: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            max_patterns: 20,
            include_examples: true,
            max_examples: 3,
            convention_threshold: 0.10,
            style_sample_size: 100,
            composite_sample_size: 50,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl PatternConfig {
    /// Report every candidate, including weak ones
    pub fn exhaustive() -> Self {
        Self {
            min_confidence: 0.0,
            max_patterns: usize::MAX,
            convention_threshold: 0.0,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "min_confidence ({}) must be within [0, 1]",
                self.min_confidence
            ));
        }

        if !(0.0..=1.0).contains(&self.convention_threshold) {
            return Err(format!(
                "convention_threshold ({}) must be within [0, 1]",
                self.convention_threshold
            ));
        }

        if self.style_sample_size == 0 || self.composite_sample_size == 0 {
            return Err("sample sizes must be > 0".to_string());
        }

        if self.cache_capacity == 0 {
            return Err("cache_capacity must be > 0".to_string());
        }

        Ok(())
    }
}
