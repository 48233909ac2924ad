use crate::codebase;
use crate::config::SummarizerConfig;
use crate::error::{Result, SummarizerError};
use crate::file::summarize_content;
use crate::module::{list_source_files, summarize_files};
use context_protocol::{FileSummary, HierarchicalSummary, ModuleSummary, SourceCache};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File, module and codebase summarizer with its own content cache
pub struct Summarizer {
    config: SummarizerConfig,
    sources: SourceCache,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Result<Self> {
        config.validate().map_err(SummarizerError::InvalidConfig)?;
        Ok(Self {
            sources: SourceCache::new(config.cache_capacity),
            config,
        })
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    pub fn clear_cache(&mut self) {
        self.sources.clear();
    }

    /// File content through the instance cache
    pub fn source(&mut self, path: &Path) -> Result<Arc<str>> {
        if let Some(content) = self.sources.read(path) {
            return Ok(content);
        }
        // Cache misses are not retained; re-read to surface the error
        std::fs::read_to_string(path)
            .map(Arc::from)
            .map_err(|e| SummarizerError::io(path, e))
    }

    /// Source files beneath `dir` in path order, honoring ignore files and excluded directories
    pub fn list_files(&self, dir: &Path) -> Vec<PathBuf> {
        list_source_files(dir, &self.config)
    }

    pub fn summarize_file(&mut self, path: &Path) -> Result<FileSummary> {
        let content = self.source(path)?;
        Ok(summarize_content(path, &content))
    }

    /// Summary of every source file beneath `dir`. Unreadable files are skipped.
    pub fn summarize_module(&mut self, dir: &Path) -> Result<ModuleSummary> {
        if !dir.is_dir() {
            return Err(SummarizerError::NotADirectory(dir.to_path_buf()));
        }

        let files = list_source_files(dir, &self.config);
        let summaries = self.summarize_all(&files);
        let module = summarize_files(dir, &summaries);

        log::debug!(
            "Summarized module {} ({} files, {} lines)",
            module.path,
            module.files.len(),
            module.total_lines
        );
        Ok(module)
    }

    /// Three-tier summary of `files`. Unreadable files are skipped.
    pub fn summarize_codebase(&mut self, topic: &str, files: &[PathBuf]) -> HierarchicalSummary {
        let summaries = self.summarize_all(files);
        self.summarize_summaries(topic, &summaries)
    }

    /// Three-tier summary built from file summaries that are already computed
    pub fn summarize_summaries(&self, topic: &str, summaries: &[FileSummary]) -> HierarchicalSummary {
        let summary = codebase::summarize_codebase(topic, summaries, &self.config);

        log::info!(
            "Summarized {}: {} files, {} lines",
            topic,
            summary.file_count,
            summary.total_lines
        );
        summary
    }

    /// Per-file summaries in input order, skipping unreadable files
    pub fn summarize_all(&mut self, files: &[PathBuf]) -> Vec<FileSummary> {
        files
            .iter()
            .filter_map(|path| match self.summarize_file(path) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    log::debug!("Skipping {}: {e}", path.display());
                    None
                }
            })
            .collect()
    }
}
