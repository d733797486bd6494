//! Corpus discovery
//!
//! Walks a content directory for markdown files and assigns each one the slug
//! it will be published under.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File extensions treated as corpus documents
pub const DOCUMENT_EXTENSIONS: &[&str] = &["md", "mdx"];

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("content directory not found: {0}")]
    NotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read content directory {0}: {1}")]
    Unreadable(PathBuf, #[source] walkdir::Error),

    #[error("slug collision: {first} and {second} both map to `{slug}`")]
    SlugCollision {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// A document file discovered in the corpus
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Path on disk
    pub path: PathBuf,
    /// Path relative to the corpus root
    pub relative_path: PathBuf,
    pub slug: String,
}

/// All documents found under a content root, in discovery order
#[derive(Debug, Clone)]
pub struct Corpus {
    pub root: PathBuf,
    pub files: Vec<SourceFile>,
}

impl Corpus {
    /// Discover every markdown document under `root`
    ///
    /// Traversal is sorted by file name so discovery order is stable between
    /// runs. Symlinked files and directories are followed. Unreadable entries
    /// below the root (including symlink loops) are skipped with a warning;
    /// two files that map to the same slug are an error.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(CorpusError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(CorpusError::NotADirectory(root.to_path_buf()));
        }

        let mut files = Vec::new();
        let mut slugs: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(CorpusError::Unreadable(root.to_path_buf(), e));
                }
                Err(e) => {
                    warn!(error = %e, "skipping unreadable corpus entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_document(entry.path()) {
                continue;
            }

            let path = entry.path().to_path_buf();
            let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            let slug = slug_for_path(&relative_path);

            if let Some(first) = slugs.get(&slug) {
                return Err(CorpusError::SlugCollision {
                    slug,
                    first: first.clone(),
                    second: relative_path,
                });
            }
            slugs.insert(slug.clone(), relative_path.clone());

            debug!(path = %relative_path.display(), %slug, "discovered document");
            files.push(SourceFile {
                path,
                relative_path,
                slug,
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Derive a slug from a corpus-relative path
///
/// Segments are joined with `/`, the extension is dropped, and a final
/// `index` segment is dropped when it has a parent. A top-level `index.md`
/// keeps the slug `index`.
pub fn slug_for_path(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = segments.last_mut() {
        let stem = Path::new(last.as_str())
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        if let Some(stem) = stem {
            *last = stem;
        }
    }

    if segments.len() > 1 && segments.last().map(String::as_str) == Some("index") {
        segments.pop();
    }

    segments.join("/")
}
