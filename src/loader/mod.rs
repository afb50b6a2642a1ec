//! Content loader
//!
//! Discovers source files under a content root and turns them into
//! [`ContentRecord`]s:
//! - markdown files with YAML frontmatter become one record each
//! - YAML files with a `reading_list` sequence become one book record per entry
//!
//! A file that cannot be read or parsed is logged and skipped; the rest of
//! the corpus still loads.

mod markdown;
mod reading_list;
mod values;

pub use markdown::{derive_id, derive_url, parse_markdown, split_frontmatter, Frontmatter};
pub use reading_list::{book_slug, parse_reading_list, DEFAULT_BOOK_URL};

use crate::config::BuildConfig;
use crate::graph::ContentRecord;
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors loading content
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unterminated frontmatter in {0}")]
    UnterminatedFrontmatter(PathBuf),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Kind of source file, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Markdown,
    Yaml,
}

impl SourceKind {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("md") | Some("markdown") => Some(SourceKind::Markdown),
            Some("yml") | Some("yaml") => Some(SourceKind::Yaml),
            _ => None,
        }
    }
}

/// Finds and parses source files under a content root
#[derive(Debug, Clone)]
pub struct ContentLoader {
    content_path: PathBuf,
    file_patterns: Vec<String>,
    exclude: Vec<Pattern>,
}

impl ContentLoader {
    pub fn new(
        content_path: impl Into<PathBuf>,
        file_patterns: Vec<String>,
        exclude_patterns: &[String],
    ) -> LoadResult<Self> {
        let exclude = exclude_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| LoadError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        let content_path: PathBuf = content_path.into();
        Ok(Self {
            content_path: without_cur_dir(&content_path),
            file_patterns,
            exclude,
        })
    }

    pub fn from_config(config: &BuildConfig) -> LoadResult<Self> {
        Self::new(
            config.content_path.clone(),
            config.file_patterns.clone(),
            &config.exclude_patterns,
        )
    }

    /// All matching files, deduplicated and sorted.
    pub fn discover(&self) -> LoadResult<Vec<PathBuf>> {
        let mut found = BTreeSet::new();

        for pattern in &self.file_patterns {
            let full = self.content_path.join(pattern);
            let full = full.to_string_lossy();
            let entries = glob::glob(&full).map_err(|source| LoadError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;

            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() => {
                        if self.is_excluded(&path) {
                            debug!("Excluded {}", path.display());
                        } else {
                            found.insert(path);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Unreadable path while matching '{}': {}", pattern, e),
                }
            }
        }

        Ok(found.into_iter().collect())
    }

    /// Parse one file into zero or more records.
    pub fn load_file(&self, path: &Path) -> LoadResult<Vec<ContentRecord>> {
        let Some(kind) = SourceKind::of(path) else {
            debug!("Skipping {} (unsupported extension)", path.display());
            return Ok(Vec::new());
        };

        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match kind {
            SourceKind::Markdown => {
                let relative = path.strip_prefix(&self.content_path).unwrap_or(path);
                Ok(parse_markdown(path, relative, &text)?.into_iter().collect())
            }
            SourceKind::Yaml => {
                let records = parse_reading_list(path, &text)?;
                if !records.is_empty() {
                    info!(
                        "Processed {} books from {}",
                        records.len(),
                        path.file_name().unwrap_or_default().to_string_lossy()
                    );
                }
                Ok(records)
            }
        }
    }

    /// Discover and load every file, skipping files that fail.
    ///
    /// Only an invalid file pattern is fatal.
    pub fn load_all(&self) -> LoadResult<Vec<ContentRecord>> {
        let files = self.discover()?;
        info!(
            "Found {} files under {}",
            files.len(),
            self.content_path.display()
        );

        let mut records = Vec::new();
        let mut failed = 0;
        for path in &files {
            match self.load_file(path) {
                Ok(loaded) => records.extend(loaded),
                Err(e) => {
                    warn!("Error processing {}: {}", path.display(), e);
                    failed += 1;
                }
            }
        }

        info!(
            "Loaded {} records ({} files failed)",
            records.len(),
            failed
        );
        Ok(records)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.content_path).ok();
        self.exclude.iter().any(|p| {
            p.matches_path(path) || relative.is_some_and(|r| p.matches_path(r))
        })
    }
}

/// Drop `.` components to line up with the paths glob yields
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
