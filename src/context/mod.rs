//! Project context aggregation.
//!
//! Scans a project root once and distills it into a bounded,
//! prompt-ready [`ProjectContext`]: a prioritized set of key files, the
//! detected frameworks and languages, dependency names, and a rendered
//! directory tree.
//!
//! The scan is read-only. Unreadable entries are logged and skipped; only a
//! missing root fails the whole operation.

mod detector;
mod manifest;
mod patterns;
mod tree;

pub use detector::{detect_frameworks, language_for_path, ProjectType, UNKNOWN_LANGUAGE};
pub use manifest::parse_dependencies;
pub use patterns::{FileKind, IGNORED_DIRS, MANIFEST_FILES};
pub use tree::render_tree;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::ContextConfig;

/// Errors raised while building context.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("No workspace: {} is not a readable directory", .0.display())]
    NoWorkspace(PathBuf),
}

/// A representative file surfaced to the reasoning backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    /// Path relative to the project root
    pub path: String,

    /// Full file content (never larger than the configured size cap)
    pub content: String,

    /// Language label from the extension table
    pub language: String,

    /// Size in bytes
    pub size: u64,

    /// Which priority group selected this file
    pub kind: FileKind,
}

/// Bounded summary of a project, built once per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectContext {
    /// Root that was analyzed
    pub root: PathBuf,

    /// Classification label (e.g. "Next.js application")
    pub project_type: String,

    /// Detected frameworks, de-duplicated, in detection order
    pub frameworks: Vec<String>,

    /// Detected language labels
    pub languages: BTreeSet<String>,

    /// Selected key files, in priority order
    pub key_files: Vec<KeyFile>,

    /// Flat list of dependency names from all manifests
    pub dependencies: Vec<String>,

    /// Rendered directory tree
    pub structure: String,

    /// Whether any manifest was found at the root
    pub has_manifest: bool,
}

impl ProjectContext {
    /// Project directory name.
    pub fn project_name(&self) -> &str {
        self.root.file_name().and_then(|n| n.to_str()).unwrap_or("unknown")
    }

    /// Config-like key files with content cut to `max_chars` characters.
    pub fn config_excerpts(&self, max_chars: usize) -> Vec<(&str, String)> {
        self.key_files
            .iter()
            .filter(|f| f.kind.is_config_like())
            .map(|f| (f.path.as_str(), excerpt(&f.content, max_chars)))
            .collect()
    }

    /// Summarize context as a short human-readable block.
    pub fn summarize(&self) -> String {
        let frameworks = if self.frameworks.is_empty() {
            "none".to_string()
        } else {
            self.frameworks.join(", ")
        };
        let languages = if self.languages.is_empty() {
            "none".to_string()
        } else {
            self.languages.iter().cloned().collect::<Vec<_>>().join(", ")
        };

        format!(
            "Project: {} ({})\nFrameworks: {}\nLanguages: {}\nDependencies: {}\nKey files: {}",
            self.project_name(),
            self.project_type,
            frameworks,
            languages,
            self.dependencies.len(),
            self.key_files.len()
        )
    }
}

/// Cut `content` to at most `max_chars` characters, marking the cut.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let mut cut: String = content.chars().take(max_chars).collect();
    cut.push_str("\n...");
    cut
}

/// Builds [`ProjectContext`] values under fixed limits.
#[derive(Debug, Clone)]
pub struct ContextAggregator {
    limits: ContextConfig,
}

impl ContextAggregator {
    /// Create an aggregator with the given limits.
    pub fn new(limits: ContextConfig) -> Self {
        Self { limits }
    }

    /// The limits this aggregator enforces.
    pub fn limits(&self) -> &ContextConfig {
        &self.limits
    }

    /// Scan `root` and build its context.
    pub fn analyze(&self, root: &Path) -> Result<ProjectContext, ContextError> {
        if !root.is_dir() {
            return Err(ContextError::NoWorkspace(root.to_path_buf()));
        }

        tracing::debug!(root = %root.display(), "Analyzing project");

        let key_files = self.select_key_files(root);
        let (dependencies, has_manifest) = self.collect_dependencies(root);
        let frameworks = detect_frameworks(&dependencies, root);
        let project_type = ProjectType::classify(&frameworks, has_manifest);

        let languages = key_files
            .iter()
            .map(|f| f.language.as_str())
            .filter(|l| *l != UNKNOWN_LANGUAGE)
            .map(str::to_string)
            .collect();

        let structure =
            render_tree(root, self.limits.tree_depth, self.limits.max_tree_entries);

        tracing::info!(
            project_type = project_type.display_name(),
            key_files = key_files.len(),
            dependencies = dependencies.len(),
            "Built project context"
        );

        Ok(ProjectContext {
            root: root.to_path_buf(),
            project_type: project_type.display_name().to_string(),
            frameworks,
            languages,
            key_files,
            dependencies,
            structure,
            has_manifest,
        })
    }

    /// Greedy selection: patterns in priority order until the global cap.
    fn select_key_files(&self, root: &Path) -> Vec<KeyFile> {
        let candidates = patterns::collect_candidates(root);
        let mut selected = Vec::new();

        for (candidate, kind) in patterns::prioritized(&candidates) {
            if selected.len() >= self.limits.max_total_files {
                break;
            }

            if candidate.size > self.limits.max_file_size {
                tracing::debug!(
                    path = %candidate.relative,
                    size = candidate.size,
                    "Skipping oversized file"
                );
                continue;
            }

            let language = language_for_path(&candidate.path);
            if kind == FileKind::Source && language == UNKNOWN_LANGUAGE {
                continue;
            }

            let content = match std::fs::read_to_string(&candidate.path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(
                        path = %candidate.relative,
                        error = %e,
                        "Skipping unreadable file"
                    );
                    continue;
                }
            };

            selected.push(KeyFile {
                path: candidate.relative.clone(),
                content,
                language: language.to_string(),
                size: candidate.size,
                kind,
            });
        }

        selected
    }

    /// Dependency names from every root manifest, de-duplicated.
    fn collect_dependencies(&self, root: &Path) -> (Vec<String>, bool) {
        let mut dependencies: Vec<String> = Vec::new();
        let mut has_manifest = false;

        for name in MANIFEST_FILES {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }
            has_manifest = true;

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(manifest = name, error = %e, "Could not read manifest");
                    continue;
                }
            };

            match parse_dependencies(name, &content) {
                Ok(Some(names)) => {
                    for dep in names {
                        if !dependencies.contains(&dep) {
                            dependencies.push(dep);
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(manifest = name, error = %e, "Could not parse manifest");
                }
            }
        }

        (dependencies, has_manifest)
    }
}

impl Default for ContextAggregator {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_content_unchanged() {
        assert_eq!(excerpt("abc", 10), "abc");
    }

    #[test]
    fn test_excerpt_is_char_safe() {
        let cut = excerpt("héllo wörld", 4);
        assert!(cut.starts_with("héll"));
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_missing_root_is_no_workspace() {
        let aggregator = ContextAggregator::default();
        let err = aggregator.analyze(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, ContextError::NoWorkspace(_)));
        assert!(err.to_string().contains("No workspace"));
    }

    #[test]
    fn test_summarize() {
        let context = ProjectContext {
            root: PathBuf::from("/work/shop"),
            project_type: "React application".to_string(),
            frameworks: vec!["React".to_string()],
            languages: ["TypeScript".to_string()].into_iter().collect(),
            key_files: Vec::new(),
            dependencies: vec!["react".to_string()],
            structure: String::new(),
            has_manifest: true,
        };

        let summary = context.summarize();
        assert!(summary.contains("shop"));
        assert!(summary.contains("React application"));
        assert!(summary.contains("TypeScript"));
    }
}
