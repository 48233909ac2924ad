use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Quality bucket derived from a pattern's confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PatternQuality {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl PatternQuality {
    /// Thresholds are inclusive lower bounds: 0.85, 0.70, 0.50
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.85 {
            PatternQuality::Excellent
        } else if confidence >= 0.70 {
            PatternQuality::Good
        } else if confidence >= 0.50 {
            PatternQuality::Acceptable
        } else {
            PatternQuality::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatternQuality::Excellent => "excellent",
            PatternQuality::Good => "good",
            PatternQuality::Acceptable => "acceptable",
            PatternQuality::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatternExample {
    pub file: String,
    /// 1-indexed line of the match
    pub line: usize,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesignPattern {
    /// Pattern family (creational, structural, behavioral, architectural)
    #[serde(rename = "type")]
    pub pattern_type: String,
    pub name: String,
    pub locations: Vec<String>,
    pub confidence: f64,
    pub quality: PatternQuality,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<PatternExample>>,
}

impl DesignPattern {
    /// Identity used for deduplication: `type:name`
    pub fn key(&self) -> String {
        format!("{}:{}", self.pattern_type, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ConventionType {
    Naming,
    Import,
    Structure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Convention {
    #[serde(rename = "type")]
    pub convention_type: ConventionType,
    pub name: String,
    pub pattern: String,
    pub examples: Vec<String>,
    /// Share of analyzed files following the convention, in [0, 1]
    pub frequency: f64,
    /// `round(min(frequency, 1) * 100)`
    pub consistency: u8,
    pub description: String,
}

impl Convention {
    pub fn consistency_for(frequency: f64) -> u8 {
        (frequency.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureStyle {
    pub primary: String,
    pub secondary: Vec<String>,
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub characteristics: Vec<String>,
}

impl ArchitectureStyle {
    pub fn unknown() -> Self {
        Self {
            primary: "unknown".to_string(),
            secondary: Vec::new(),
            confidence: 0.0,
            evidence: Vec::new(),
            characteristics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatternCatalog {
    pub design_patterns: Vec<DesignPattern>,
    pub architectural_patterns: Vec<String>,
    pub conventions: Vec<Convention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture_style: Option<ArchitectureStyle>,
}
