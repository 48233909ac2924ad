use crate::error::ExchangeError;
use context_protocol::CodebaseContext;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Envelope format produced by this crate
pub const FORMAT_VERSION: &str = "1.0.0";

/// Agent name stamped on envelopes when the caller does not provide one
pub const DEFAULT_SOURCE_AGENT: &str = "context-engine";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ContextType {
    Feature,
    Architecture,
    Module,
    Component,
    #[default]
    Full,
}

impl ContextType {
    pub const ALL: [ContextType; 5] = [
        ContextType::Feature,
        ContextType::Architecture,
        ContextType::Module,
        ContextType::Component,
        ContextType::Full,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContextType::Feature => "feature",
            ContextType::Architecture => "architecture",
            ContextType::Module => "module",
            ContextType::Component => "component",
            ContextType::Full => "full",
        }
    }
}

impl FromStr for ContextType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown context type: {s}"))
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    #[default]
    Union,
    Intersection,
    Override,
    Newest,
    HighestRelevance,
}

impl MergeStrategy {
    pub const ALL: [MergeStrategy; 5] = [
        MergeStrategy::Union,
        MergeStrategy::Intersection,
        MergeStrategy::Override,
        MergeStrategy::Newest,
        MergeStrategy::HighestRelevance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MergeStrategy::Union => "union",
            MergeStrategy::Intersection => "intersection",
            MergeStrategy::Override => "override",
            MergeStrategy::Newest => "newest",
            MergeStrategy::HighestRelevance => "highest-relevance",
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ExchangeError::UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versioned, provenance-carrying wrapper around a [`CodebaseContext`].
///
/// Envelopes are values: merging produces a new context and never touches
/// the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContextEnvelope {
    pub format_version: String,
    pub source_agent: String,
    pub context_type: ContextType,
    /// Topics this context was derived from, oldest first
    pub inheritance_chain: Vec<String>,
    pub merge_strategy: MergeStrategy,
    pub payload: CodebaseContext,
}

/// Provenance stamped on an exported envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    pub source_agent: String,
    pub context_type: ContextType,
    pub inheritance_chain: Vec<String>,
    pub merge_strategy: MergeStrategy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            source_agent: DEFAULT_SOURCE_AGENT.to_string(),
            context_type: ContextType::default(),
            inheritance_chain: Vec::new(),
            merge_strategy: MergeStrategy::default(),
        }
    }
}

impl ExportOptions {
    pub fn agent(source_agent: impl Into<String>) -> Self {
        Self {
            source_agent: source_agent.into(),
            ..Default::default()
        }
    }
}

/// Wrap `context` in an envelope at the current format version.
///
/// The context's topic is appended to the inheritance chain unless the chain
/// already names it.
pub fn export(context: &CodebaseContext, options: &ExportOptions) -> ContextEnvelope {
    let mut inheritance_chain = options.inheritance_chain.clone();
    let topic = context.topic();
    if !topic.is_empty() && !inheritance_chain.iter().any(|t| t == topic) {
        inheritance_chain.push(topic.to_string());
    }

    ContextEnvelope {
        format_version: FORMAT_VERSION.to_string(),
        source_agent: options.source_agent.clone(),
        context_type: options.context_type,
        inheritance_chain,
        merge_strategy: options.merge_strategy,
        payload: context.clone(),
    }
}
