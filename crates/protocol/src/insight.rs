use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum InsightType {
    Risk,
    Opportunity,
    Gotcha,
    Pattern,
}

impl InsightType {
    pub fn as_str(self) -> &'static str {
        match self {
            InsightType::Risk => "risk",
            InsightType::Opportunity => "opportunity",
            InsightType::Gotcha => "gotcha",
            InsightType::Pattern => "pattern",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Impact {
    Critical,
    High,
    Medium,
    Low,
}

impl Impact {
    /// Higher is more severe: critical=4 .. low=1
    pub fn rank(self) -> u8 {
        match self {
            Impact::Critical => 4,
            Impact::High => 3,
            Impact::Medium => 2,
            Impact::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Impact::Critical => "critical",
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub description: String,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub confidence: f64,
}

/// Number of leading description characters that identify an insight
pub const INSIGHT_KEY_PREFIX_CHARS: usize = 50;

impl Insight {
    pub fn new(insight_type: InsightType, impact: Impact, description: impl Into<String>) -> Self {
        Self {
            insight_type,
            description: description.into(),
            impact,
            related_paths: None,
            recommendation: None,
            confidence: 1.0,
        }
    }

    #[must_use]
    pub fn related_paths(mut self, paths: Vec<String>) -> Self {
        self.related_paths = Some(paths);
        self
    }

    #[must_use]
    pub fn recommendation(mut self, text: impl Into<String>) -> Self {
        self.recommendation = Some(text.into());
        self
    }

    #[must_use]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Identity used for deduplication: `type:` plus the first 50 description chars
    pub fn key(&self) -> String {
        let prefix: String = self
            .description
            .chars()
            .take(INSIGHT_KEY_PREFIX_CHARS)
            .collect();
        format!("{}:{}", self.insight_type.as_str(), prefix)
    }
}

/// Stable sort, most severe impact first
pub fn sort_by_impact(insights: &mut [Insight]) {
    insights.sort_by(|a, b| b.impact.rank().cmp(&a.impact.rank()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_description_prefix() {
        let long = "x".repeat(80);
        let a = Insight::new(InsightType::Risk, Impact::High, format!("{long}a"));
        let b = Insight::new(InsightType::Risk, Impact::Low, format!("{long}b"));
        assert_eq!(a.key(), b.key());

        let c = Insight::new(InsightType::Gotcha, Impact::High, format!("{long}a"));
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn sort_by_impact_is_stable() {
        let mut insights = vec![
            Insight::new(InsightType::Risk, Impact::Low, "first low"),
            Insight::new(InsightType::Risk, Impact::Critical, "critical"),
            Insight::new(InsightType::Risk, Impact::Low, "second low"),
            Insight::new(InsightType::Risk, Impact::Medium, "medium"),
        ];
        sort_by_impact(&mut insights);
        let order: Vec<_> = insights.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(order, vec!["critical", "medium", "first low", "second low"]);
    }
}
