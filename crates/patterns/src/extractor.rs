use crate::architecture;
use crate::config::PatternConfig;
use crate::conventions;
use crate::design;
use crate::error::{PatternError, Result};
use crate::style;
use context_protocol::path_filters::{common_root, directory_names};
use context_protocol::{
    display_path, ArchitectureStyle, Convention, DesignPattern, Language, PatternCatalog,
    SourceCache,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file as seen by the rule tables
pub(crate) struct SourceFile {
    pub path: PathBuf,
    /// Forward-slash path used for locations and evidence
    pub id: String,
    pub file_name: String,
    /// Lowercase directory names beneath the common root
    pub dirs: Vec<String>,
    /// `None` when the file could not be read
    pub content: Option<Arc<str>>,
}

impl SourceFile {
    pub fn is_source(&self) -> bool {
        Language::from_path(&self.path).is_source()
    }

    #[cfg(test)]
    pub fn in_memory(path: PathBuf, content: Arc<str>) -> Self {
        Self {
            id: display_path(&path),
            file_name: file_name_of(&path),
            dirs: Vec::new(),
            content: Some(content),
            path,
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn dirs_of(path: &Path, root: &Path) -> Vec<String> {
    directory_names(path, root)
}

/// Rule-based recognizer of design patterns, architecture and conventions.
///
/// Every operation reads files through the extractor's own content cache, so
/// running several operations over the same file list reads each file once.
pub struct PatternExtractor {
    config: PatternConfig,
    sources: SourceCache,
}

impl PatternExtractor {
    pub fn new(config: PatternConfig) -> Result<Self> {
        config.validate().map_err(PatternError::InvalidConfig)?;
        Ok(Self {
            sources: SourceCache::new(config.cache_capacity),
            config,
        })
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn clear_cache(&mut self) {
        self.sources.clear();
    }

    fn load(&mut self, files: &[PathBuf]) -> Vec<SourceFile> {
        let root = common_root(files);
        files
            .iter()
            .map(|path| SourceFile {
                id: display_path(path),
                file_name: file_name_of(path),
                dirs: dirs_of(path, &root),
                content: self.sources.read(path),
                path: path.clone(),
            })
            .collect()
    }

    /// Design patterns with confidence at or above `min_confidence`, strongest first
    pub fn extract_design_patterns(&mut self, files: &[PathBuf]) -> Vec<DesignPattern> {
        let files = self.load(files);
        design::extract_design_patterns(&files, &self.config)
    }

    /// Names of architectural patterns with any supporting signal
    pub fn extract_architectural_patterns(&mut self, files: &[PathBuf]) -> Vec<String> {
        let files = self.load(files);
        architecture::extract_architectural_patterns(&files, &self.config)
    }

    pub fn extract_conventions(&mut self, files: &[PathBuf]) -> Vec<Convention> {
        let files = self.load(files);
        conventions::extract_conventions(&files, &self.config)
    }

    /// Single best-scoring architecture style, or `"unknown"` with no signal
    pub fn classify_architecture_style(&mut self, files: &[PathBuf]) -> ArchitectureStyle {
        let files = self.load(files);
        style::classify_architecture_style(&files, &self.config)
    }

    /// All four analyses over one load of `files`
    pub fn extract_catalog(&mut self, files: &[PathBuf]) -> PatternCatalog {
        let files = self.load(files);

        let catalog = PatternCatalog {
            design_patterns: design::extract_design_patterns(&files, &self.config),
            architectural_patterns: architecture::extract_architectural_patterns(
                &files,
                &self.config,
            ),
            conventions: conventions::extract_conventions(&files, &self.config),
            architecture_style: Some(style::classify_architecture_style(&files, &self.config)),
        };

        log::info!(
            "Extracted {} design patterns, {} architectural patterns, {} conventions from {} files",
            catalog.design_patterns.len(),
            catalog.architectural_patterns.len(),
            catalog.conventions.len(),
            files.len()
        );

        catalog
    }
}
