use crate::components::{data_flow, rank_components};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use context_graph::{normalize_path, DependencyAnalyzer};
use context_patterns::PatternExtractor;
use context_protocol::path_filters::{common_root, relative_to};
use context_protocol::{
    display_path, estimate_tokens, CodebaseContext, ContextMetadata, DependencyGraph,
    ExternalEffect, FileSummary, HierarchicalSummary, Insight, PatternCatalog,
};
use context_summarizer::{extract_insights_from_content, extract_key_insights, Summarizer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;

type Effects = Vec<(String, Vec<ExternalEffect>)>;

/// Output of the summarizer task
struct Summaries {
    codebase: HierarchicalSummary,
    files: Vec<FileSummary>,
    insights: Vec<Insight>,
    tokens: usize,
}

/// Builds a [`CodebaseContext`] for a topic from a set of files.
///
/// The dependency, pattern and summary analyzers run concurrently on blocking
/// tasks. Each task owns a fresh analyzer, so caches are never shared between
/// them or between calls.
pub struct ContextAssembler {
    config: EngineConfig,
}

impl ContextAssembler {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Input files that pass the configured path filter, normalized
    pub fn select_files(&self, files: &[PathBuf]) -> Vec<PathBuf> {
        let files: Vec<PathBuf> = files.iter().map(|f| normalize_path(f)).collect();
        let root = common_root(&files);
        files
            .into_iter()
            .filter(|file| self.config.filter.allows(&relative_to(file, &root)))
            .collect()
    }

    pub async fn assemble(&self, topic: &str, files: &[PathBuf]) -> Result<CodebaseContext> {
        let started = Instant::now();
        let files = Arc::new(self.select_files(files));

        if files.is_empty() {
            log::warn!("No files left to analyze for topic {topic:?}");
            return Ok(CodebaseContext::empty(topic));
        }

        log::info!("Assembling context for {topic:?} from {} files", files.len());

        let graph_task = {
            let config = self.config.analyzer.clone();
            let files = Arc::clone(&files);
            task::spawn_blocking(move || -> Result<(DependencyGraph, Effects)> {
                let mut analyzer = DependencyAnalyzer::new(config)?;
                let graph = analyzer.build_dependency_graph(&files);
                let effects = files
                    .iter()
                    .map(|file| (display_path(file), analyzer.track_external_effects(file)))
                    .filter(|(_, effects)| !effects.is_empty())
                    .collect();
                Ok((graph, effects))
            })
        };

        let pattern_task = {
            let config = self.config.patterns.clone();
            let files = Arc::clone(&files);
            task::spawn_blocking(move || -> Result<PatternCatalog> {
                let mut extractor = PatternExtractor::new(config)?;
                Ok(extractor.extract_catalog(&files))
            })
        };

        let summary_task = {
            let config = self.config.summarizer.clone();
            let files = Arc::clone(&files);
            let topic = topic.to_string();
            task::spawn_blocking(move || -> Result<Summaries> {
                let mut summarizer = Summarizer::new(config)?;
                let summaries = summarizer.summarize_all(&files);
                let codebase = summarizer.summarize_summaries(&topic, &summaries);

                let mut insights = Vec::new();
                let mut tokens = 0;
                for file in files.iter() {
                    let Ok(content) = summarizer.source(file) else {
                        continue;
                    };
                    tokens += estimate_tokens(&content);
                    insights.extend(extract_insights_from_content(&content, &display_path(file)));
                }

                Ok(Summaries {
                    codebase,
                    files: summaries,
                    insights,
                    tokens,
                })
            })
        };

        let (graph, catalog, summaries) = tokio::try_join!(graph_task, pattern_task, summary_task)?;
        let (graph, effects) = graph?;
        let patterns = catalog?;
        let summaries = summaries?;

        let root = common_root(&files);
        let mut metadata = ContextMetadata::new(topic);
        metadata.files = files.iter().map(|f| display_path(f)).collect();
        metadata.focus_areas = focus_areas(&files, &root);
        metadata.token_count = summaries.tokens;

        let mut context = CodebaseContext {
            key_components: rank_components(&summaries.files, &graph, self.config.max_components),
            data_flow: data_flow(&summaries.files, &graph, &effects),
            summary: summaries.codebase,
            patterns,
            dependencies: graph,
            insights: summaries.insights,
            metadata,
        };
        context.insights = extract_key_insights(&context);
        context.metadata.analysis_time_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        log::info!(
            "Assembled context {topic:?}: {} components, {} insights in {}ms",
            context.key_components.len(),
            context.insights.len(),
            context.metadata.analysis_time_ms
        );

        Ok(context)
    }
}

/// Distinct top-level directories beneath `root`, in first-seen order
fn focus_areas(files: &[PathBuf], root: &Path) -> Vec<String> {
    let mut areas: Vec<String> = Vec::new();
    for file in files {
        let rel = relative_to(file, root);
        let Some((top, _)) = rel.split_once('/') else {
            continue;
        };
        if !top.is_empty() && !areas.iter().any(|a| a == top) {
            areas.push(top.to_string());
        }
    }
    areas
}
