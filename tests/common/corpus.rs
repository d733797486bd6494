//! Temporary corpus fixtures
//!
//! Builds a content directory and an output directory inside a temp dir so
//! each test runs the pipeline in isolation.

use interlink::PipelineConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A content tree plus output directory, removed on drop
pub struct TempCorpus {
    dir: TempDir,
}

impl TempCorpus {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("content")).expect("create content dir");
        Self { dir }
    }

    /// Write a file relative to the content root, creating parent dirs
    pub fn add(&self, relative: &str, contents: &str) -> &Self {
        let path = self.content_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write corpus file");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn content_dir(&self) -> PathBuf {
        self.dir.path().join("content")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join(".internal-links")
    }

    /// Pipeline config writing into this fixture's output directory
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::default().with_output_dir(self.output_dir())
    }
}

/// Body text about email marketing, long enough to dominate the title
pub const EMAIL_BODY: &str = "Email marketing works best when every campaign starts from a clean \
list segmented by engagement. Welcome sequences introduce new subscribers, nurture flows educate \
prospects over several weeks, and re-engagement campaigns win back dormant readers. Subject lines \
should be short and specific. Measure open rates, click rates and unsubscribes after every send, \
then iterate on copy, timing and audience segments.";

/// Body text with no vocabulary in common with [`EMAIL_BODY`]
pub const BAKING_BODY: &str = "Sourdough bread needs flour water salt plus patience. Feed starter \
nightly; knead dough gently; proof loaves overnight inside chilly fridge. Bake hot, steam oven, \
cool racks.";
