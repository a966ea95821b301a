//! Candidate file discovery.
//!
//! Walks the project once, then hands out candidates in pattern-priority
//! order so manifests and configs win over source files when the global cap
//! is reached.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// What role a key file plays in the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Package manifest (package.json, Cargo.toml, ...)
    Manifest,
    /// Tool or framework configuration
    Config,
    /// Source file under a conventional directory
    Source,
    /// README and docs
    Documentation,
    /// Environment templates
    Environment,
}

impl FileKind {
    /// Whether excerpts of this file are worth surfacing in prompts.
    pub fn is_config_like(self) -> bool {
        matches!(self, Self::Manifest | Self::Config | Self::Environment)
    }
}

/// Directories that hold dependencies or build output.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    ".git",
    ".next",
    ".nuxt",
    ".svelte-kit",
    "__pycache__",
    ".venv",
    "venv",
    "vendor",
    "coverage",
    ".turbo",
    ".cache",
];

/// Manifests, all anchored at the project root.
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "pyproject.toml",
    "requirements.txt",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "Gemfile",
    "composer.json",
];

/// Glob patterns in priority order.
const PRIORITY_PATTERNS: &[(&str, FileKind)] = &[
    ("package.json", FileKind::Manifest),
    ("Cargo.toml", FileKind::Manifest),
    ("pyproject.toml", FileKind::Manifest),
    ("requirements.txt", FileKind::Manifest),
    ("go.mod", FileKind::Manifest),
    ("pom.xml", FileKind::Manifest),
    ("build.gradle", FileKind::Manifest),
    ("Gemfile", FileKind::Manifest),
    ("composer.json", FileKind::Manifest),
    ("tsconfig.json", FileKind::Config),
    ("next.config.*", FileKind::Config),
    ("nuxt.config.*", FileKind::Config),
    ("vite.config.*", FileKind::Config),
    ("svelte.config.*", FileKind::Config),
    ("angular.json", FileKind::Config),
    ("webpack.config.*", FileKind::Config),
    ("tailwind.config.*", FileKind::Config),
    ("jest.config.*", FileKind::Config),
    ("vitest.config.*", FileKind::Config),
    ("nest-cli.json", FileKind::Config),
    ("manage.py", FileKind::Config),
    ("prisma/schema.prisma", FileKind::Config),
    ("Dockerfile", FileKind::Config),
    ("docker-compose.yml", FileKind::Config),
    ("docker-compose.yaml", FileKind::Config),
    ("src/**/*", FileKind::Source),
    ("app/**/*", FileKind::Source),
    ("lib/**/*", FileKind::Source),
    ("pages/**/*", FileKind::Source),
    ("components/**/*", FileKind::Source),
    ("api/**/*", FileKind::Source),
    ("server/**/*", FileKind::Source),
    ("README*", FileKind::Documentation),
    ("docs/**/*.md", FileKind::Documentation),
    (".env.example", FileKind::Environment),
    (".env.sample", FileKind::Environment),
    (".env.template", FileKind::Environment),
];

static COMPILED_PATTERNS: Lazy<Vec<(Pattern, FileKind)>> = Lazy::new(|| {
    PRIORITY_PATTERNS
        .iter()
        .filter_map(|(glob, kind)| Pattern::new(glob).ok().map(|p| (p, *kind)))
        .collect()
});

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Walks deeper than this are not considered.
const MAX_WALK_DEPTH: usize = 12;

/// A file discovered under the project root.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Path relative to the root, `/`-separated
    pub relative: String,
    /// Absolute path
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

impl Candidate {
    fn depth(&self) -> usize {
        self.relative.matches('/').count()
    }
}

/// Whether a directory entry name is a dependency cache or build output.
pub fn is_ignored_dir(name: &str) -> bool {
    IGNORED_DIRS.contains(&name)
}

/// Enumerate every file under `root`, skipping ignored directories.
///
/// Unreadable entries are logged and skipped. The result is ordered
/// shallow-first, then by path, so selection is deterministic.
pub fn collect_candidates(root: &Path) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .max_depth(MAX_WALK_DEPTH)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir() && is_ignored_dir(&e.file_name().to_string_lossy()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "Skipping file without metadata"
                );
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };

        candidates.push(Candidate {
            relative: to_slash_path(relative),
            path: entry.path().to_path_buf(),
            size,
        });
    }

    candidates.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.relative.cmp(&b.relative)));
    candidates
}

/// Candidates matching each priority pattern, highest priority first.
///
/// A file is yielded at most once, under the first pattern that matches it.
pub fn prioritized(candidates: &[Candidate]) -> Vec<(&Candidate, FileKind)> {
    let mut seen = vec![false; candidates.len()];
    let mut ordered = Vec::new();

    for (pattern, kind) in COMPILED_PATTERNS.iter() {
        for (idx, candidate) in candidates.iter().enumerate() {
            if !seen[idx] && pattern.matches_with(&candidate.relative, MATCH_OPTIONS) {
                seen[idx] = true;
                ordered.push((candidate, *kind));
            }
        }
    }

    ordered
}

fn to_slash_path(path: &Path) -> String {
    path.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}
