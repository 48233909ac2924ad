use crate::envelope::{ContextEnvelope, ContextType, MergeStrategy, FORMAT_VERSION};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static SEMVER: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?$")
        .map_err(|e| log::warn!("Invalid semver pattern: {e}"))
        .ok()
});

/// A single validation finding. `code` is stable; `path` points at the field
/// (dot-separated, `payload.metadata.createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub code: String,
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(code: &str, path: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            path: path.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True when there are no errors; warnings never invalidate
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_code(&self, code: &str) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .any(|issue| issue.code == code)
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Collector {
    fn error(&mut self, code: &str, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(code, path, message));
    }

    fn warning(&mut self, code: &str, path: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(code, path, message));
    }

    /// Require an object at `key`; reports `code` and returns `None` when absent
    fn object<'v>(&mut self, parent: &'v Value, key: &str, path: &str, code: &str) -> Option<&'v Value> {
        match parent.get(key) {
            Some(value) if value.is_object() => Some(value),
            Some(_) => {
                self.error(code, path, format!("{path} must be an object"));
                None
            }
            None => {
                self.error(code, path, format!("{path} is required"));
                None
            }
        }
    }

    fn finish(self) -> ValidationReport {
        ValidationReport {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

fn non_empty_str<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Validate a typed envelope
pub fn validate(envelope: &ContextEnvelope) -> ValidationReport {
    match serde_json::to_value(envelope) {
        Ok(value) => validate_value(&value),
        Err(e) => {
            let mut collector = Collector::default();
            collector.error("INVALID_ENVELOPE", "", format!("envelope cannot be serialized: {e}"));
            collector.finish()
        }
    }
}

/// Validate a raw envelope document. Never fails; problems are reported in the result.
pub fn validate_value(document: &Value) -> ValidationReport {
    let mut c = Collector::default();

    if !document.is_object() {
        c.error("INVALID_ENVELOPE", "", "envelope must be a JSON object");
        return c.finish();
    }

    match document.get("formatVersion").and_then(Value::as_str) {
        None => c.error("MISSING_FORMAT_VERSION", "formatVersion", "formatVersion is required"),
        Some(version) if !is_semver(version) => c.error(
            "INVALID_FORMAT_VERSION",
            "formatVersion",
            format!("formatVersion {version:?} is not a semantic version"),
        ),
        Some(version) if version != FORMAT_VERSION => c.warning(
            "VERSION_MISMATCH",
            "formatVersion",
            format!("formatVersion {version} differs from {FORMAT_VERSION}"),
        ),
        Some(_) => {}
    }

    if non_empty_str(document, "sourceAgent").is_none() {
        c.error("MISSING_SOURCE_AGENT", "sourceAgent", "sourceAgent is required");
    }

    let context_type = document.get("contextType").and_then(Value::as_str);
    if !context_type.is_some_and(|t| ContextType::ALL.iter().any(|k| k.as_str() == t)) {
        c.error(
            "INVALID_CONTEXT_TYPE",
            "contextType",
            format!("contextType must be one of {}", names(ContextType::ALL.map(ContextType::as_str))),
        );
    }

    let strategy = document.get("mergeStrategy").and_then(Value::as_str);
    if !strategy.is_some_and(|s| MergeStrategy::ALL.iter().any(|k| k.as_str() == s)) {
        c.error(
            "INVALID_MERGE_STRATEGY",
            "mergeStrategy",
            format!("mergeStrategy must be one of {}", names(MergeStrategy::ALL.map(MergeStrategy::as_str))),
        );
    }

    let chain_ok = document
        .get("inheritanceChain")
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().all(Value::is_string));
    if !chain_ok {
        c.error(
            "INVALID_INHERITANCE_CHAIN",
            "inheritanceChain",
            "inheritanceChain must be an array of strings",
        );
    }

    if let Some(payload) = c.object(document, "payload", "payload", "MISSING_PAYLOAD") {
        validate_payload(payload, &mut c);
    }

    c.finish()
}

fn validate_payload(payload: &Value, c: &mut Collector) {
    if let Some(summary) = c.object(payload, "summary", "payload.summary", "MISSING_SUMMARY") {
        if non_empty_str(summary, "executive").is_none() {
            c.warning(
                "MISSING_EXECUTIVE_SUMMARY",
                "payload.summary.executive",
                "summary has no executive text",
            );
        }
    }

    match payload.get("keyComponents").and_then(Value::as_array) {
        None => c.error(
            "MISSING_KEY_COMPONENTS",
            "payload.keyComponents",
            "keyComponents must be an array",
        ),
        Some(components) if components.is_empty() => c.warning(
            "EMPTY_KEY_COMPONENTS",
            "payload.keyComponents",
            "context has no key components",
        ),
        Some(_) => {}
    }

    c.object(payload, "patterns", "payload.patterns", "MISSING_PATTERNS");
    c.object(payload, "dependencies", "payload.dependencies", "MISSING_DEPENDENCIES");
    c.object(payload, "dataFlow", "payload.dataFlow", "MISSING_DATA_FLOW");

    if !payload.get("insights").is_some_and(Value::is_array) {
        c.error("MISSING_INSIGHTS", "payload.insights", "insights must be an array");
    }

    if let Some(metadata) = c.object(payload, "metadata", "payload.metadata", "MISSING_METADATA") {
        if non_empty_str(metadata, "createdAt").is_none() {
            c.error(
                "MISSING_CREATED_AT",
                "payload.metadata.createdAt",
                "metadata.createdAt is required",
            );
        }
        if non_empty_str(metadata, "topic").is_none() {
            c.warning("MISSING_TOPIC", "payload.metadata.topic", "metadata has no topic");
        }
    }
}

fn is_semver(version: &str) -> bool {
    SEMVER.as_ref().is_some_and(|re| re.is_match(version))
}

fn names<const N: usize>(all: [&str; N]) -> String {
    all.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{export, ExportOptions};
    use context_protocol::{CodebaseContext, ComponentInfo};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> Value {
        let mut context = CodebaseContext::empty("auth");
        context.summary.executive = "Auth flows".to_string();
        context.key_components.push(ComponentInfo {
            path: "src/auth.ts".to_string(),
            name: "auth".to_string(),
            component_type: "module".to_string(),
            purpose: "Source file".to_string(),
            complexity: 1,
            importance: 10,
            exports: Vec::new(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
        });
        serde_json::to_value(export(&context, &ExportOptions::default())).unwrap()
    }

    fn codes(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn complete_envelope_is_clean() {
        let report = validate_value(&document());
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_source_agent_is_an_error() {
        let mut doc = document();
        doc.as_object_mut().unwrap().remove("sourceAgent");
        let report = validate_value(&doc);
        assert!(!report.valid);
        assert_eq!(codes(&report.errors), vec!["MISSING_SOURCE_AGENT"]);
        assert_eq!(report.errors[0].path, "sourceAgent");

        doc["sourceAgent"] = json!("  ");
        assert!(validate_value(&doc).has_code("MISSING_SOURCE_AGENT"));
    }

    #[test]
    fn version_checks() {
        let mut doc = document();
        doc["formatVersion"] = json!("0.9.0");
        let report = validate_value(&doc);
        assert!(report.valid);
        assert_eq!(codes(&report.warnings), vec!["VERSION_MISMATCH"]);

        doc["formatVersion"] = json!("v1");
        assert_eq!(codes(&validate_value(&doc).errors), vec!["INVALID_FORMAT_VERSION"]);

        doc.as_object_mut().unwrap().remove("formatVersion");
        assert_eq!(codes(&validate_value(&doc).errors), vec!["MISSING_FORMAT_VERSION"]);
    }

    #[test]
    fn enum_membership() {
        let mut doc = document();
        doc["contextType"] = json!("everything");
        doc["mergeStrategy"] = json!("fastest");
        assert_eq!(
            codes(&validate_value(&doc).errors),
            vec!["INVALID_CONTEXT_TYPE", "INVALID_MERGE_STRATEGY"]
        );
    }

    #[test]
    fn payload_structure() {
        let mut doc = document();
        let payload = doc["payload"].as_object_mut().unwrap();
        payload.remove("patterns");
        payload.remove("dataFlow");
        payload["keyComponents"] = json!([]);
        payload["summary"]["executive"] = json!("");
        payload["metadata"].as_object_mut().unwrap().remove("createdAt");
        payload["metadata"].as_object_mut().unwrap().remove("topic");

        let report = validate_value(&doc);
        assert_eq!(
            codes(&report.errors),
            vec!["MISSING_PATTERNS", "MISSING_DATA_FLOW", "MISSING_CREATED_AT"]
        );
        assert_eq!(
            codes(&report.warnings),
            vec!["MISSING_EXECUTIVE_SUMMARY", "EMPTY_KEY_COMPONENTS", "MISSING_TOPIC"]
        );
    }

    #[test]
    fn missing_payload_and_non_objects() {
        let mut doc = document();
        doc.as_object_mut().unwrap().remove("payload");
        assert_eq!(codes(&validate_value(&doc).errors), vec!["MISSING_PAYLOAD"]);

        assert_eq!(codes(&validate_value(&json!([1, 2])).errors), vec!["INVALID_ENVELOPE"]);
    }

    #[test]
    fn typed_validation_matches_document_validation() {
        let mut envelope = export(&CodebaseContext::empty("t"), &ExportOptions::default());
        envelope.source_agent.clear();
        let report = validate(&envelope);
        assert!(report.has_code("MISSING_SOURCE_AGENT"));
        assert!(report.has_code("EMPTY_KEY_COMPONENTS"));
        assert!(report.has_code("MISSING_EXECUTIVE_SUMMARY"));
    }
}
