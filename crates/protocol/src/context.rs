use crate::dependency::{DependencyGraph, EffectCategory};
use crate::insight::Insight;
use crate::pattern::PatternCatalog;
use crate::summary::HierarchicalSummary;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A file ranked as central to the analyzed topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub path: String,
    pub name: String,
    /// Coarse role derived from the file purpose (service, component, test, ...)
    #[serde(rename = "type")]
    pub component_type: String,
    pub purpose: String,
    pub complexity: u32,
    /// 0..=100, derived from graph centrality and exported surface
    pub importance: u32,
    pub exports: Vec<String>,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataFlow {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub flow_type: String,
    pub symbols: Vec<String>,
}

impl DataFlow {
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.from, self.to, self.flow_type)
    }
}

/// A file whose code reaches outside the process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataSink {
    pub path: String,
    pub category: EffectCategory,
    pub description: String,
}

impl DataSink {
    pub fn key(&self) -> String {
        format!("{}:{}", self.path, self.category.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataFlowMap {
    pub entry_points: Vec<String>,
    pub flows: Vec<DataFlow>,
    pub sinks: Vec<DataSink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContextMetadata {
    pub topic: String,
    pub files: Vec<String>,
    pub focus_areas: Vec<String>,
    pub token_count: usize,
    pub analysis_time_ms: u64,
    #[schemars(with = "String")]
    pub created_at: DateTime<Utc>,
    #[schemars(with = "String")]
    pub updated_at: DateTime<Utc>,
    /// Version of the analysis engine that produced the context
    pub version: String,
}

impl ContextMetadata {
    pub fn new(topic: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            topic: topic.into(),
            files: Vec::new(),
            focus_areas: Vec::new(),
            token_count: 0,
            analysis_time_ms: 0,
            created_at: now,
            updated_at: now,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Aggregate result of one analysis pass over a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodebaseContext {
    pub summary: HierarchicalSummary,
    pub key_components: Vec<ComponentInfo>,
    pub patterns: PatternCatalog,
    pub dependencies: DependencyGraph,
    pub data_flow: DataFlowMap,
    pub insights: Vec<Insight>,
    pub metadata: ContextMetadata,
}

impl CodebaseContext {
    /// Empty context for a topic, stamped with the current time
    pub fn empty(topic: impl Into<String>) -> Self {
        let topic = topic.into();
        Self {
            summary: HierarchicalSummary {
                topic: topic.clone(),
                ..Default::default()
            },
            key_components: Vec::new(),
            patterns: PatternCatalog::default(),
            dependencies: DependencyGraph::default(),
            data_flow: DataFlowMap::default(),
            insights: Vec::new(),
            metadata: ContextMetadata::new(topic),
        }
    }

    pub fn topic(&self) -> &str {
        &self.metadata.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_round_trips_through_json() {
        let ctx = CodebaseContext::empty("auth");
        let raw = serde_json::to_string(&ctx).unwrap();
        let back: CodebaseContext = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn context_uses_camel_case_fields() {
        let value = serde_json::to_value(CodebaseContext::empty("auth")).unwrap();
        assert!(value.get("keyComponents").is_some());
        assert!(value.get("dataFlow").is_some());
        assert!(value["metadata"].get("createdAt").is_some());
        assert!(value["dependencies"]["stats"].get("totalNodes").is_some());
    }
}
