use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a single source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub path: String,
    pub language: String,
    pub purpose: String,
    pub exports: Vec<String>,
    /// Module specifiers as written in import/require statements
    pub imports: Vec<String>,
    pub patterns: Vec<String>,
    /// Additive score bounded to 0..=100
    pub complexity: u32,
    pub lines_of_code: usize,
}

/// Summary of one directory and the source files beneath it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub path: String,
    pub name: String,
    pub purpose: String,
    pub files: Vec<FileSummary>,
    pub public_api: Vec<String>,
    /// External packages (bare specifiers, scope-aware)
    pub dependencies: Vec<String>,
    /// Patterns detected in at least two files
    pub patterns: Vec<String>,
    pub total_lines: usize,
    pub average_complexity: f64,
}

/// Topic summary at three levels of detail
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HierarchicalSummary {
    pub topic: String,
    pub executive: String,
    pub detailed: String,
    pub technical: String,
    pub file_count: usize,
    pub total_lines: usize,
    /// Language name -> file count
    pub languages: BTreeMap<String, usize>,
}
