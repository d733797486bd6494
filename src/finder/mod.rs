//! Link opportunity finder
//!
//! Second pipeline stage: load `pages.json`, compare every ordered pair of
//! pages by cosine similarity, and report the pairs at or above the threshold
//! that are not already linked.
//!
//! The scan is exhaustive (O(n²·d)); corpora are expected to stay in the
//! tens to low thousands of pages.

mod anchors;
mod keywords;

pub use anchors::{suggest_anchors, MAX_ANCHORS};
pub use keywords::{reason, Keywords, FALLBACK_REASON, KEYWORD_CONTENT_CHARS};

use crate::config::PipelineConfig;
use crate::dataset::{self, DatasetError};
use crate::document::{EmbeddedDocument, LinkOpportunity};
use crate::embedding::cosine_similarity;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("{0} not found. Run `interlink analyze` first.")]
    MissingDataset(PathBuf),

    #[error(transparent)]
    Dataset(DatasetError),

    #[error("page {slug} has a {actual}-dimensional embedding, expected {expected}")]
    DimensionMismatch {
        slug: String,
        expected: usize,
        actual: usize,
    },

    #[error("page {0} has an empty embedding")]
    EmptyEmbedding(String),

    #[error("page {0} has a non-finite embedding value")]
    NonFiniteEmbedding(String),

    #[error("duplicate slug in dataset: {0}")]
    DuplicateSlug(String),
}

impl From<DatasetError> for FinderError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::Missing(path) => FinderError::MissingDataset(path),
            other => FinderError::Dataset(other),
        }
    }
}

/// Check that a loaded dataset is safe to compare
///
/// Slugs must be unique and every embedding must share one non-zero length
/// and hold only finite values.
pub fn validate_pages(pages: &[EmbeddedDocument]) -> Result<(), FinderError> {
    let mut slugs = HashSet::with_capacity(pages.len());
    let mut expected: Option<usize> = None;

    for page in pages {
        if !slugs.insert(page.slug.as_str()) {
            return Err(FinderError::DuplicateSlug(page.slug.clone()));
        }
        let actual = page.embedding.len();
        if actual == 0 {
            return Err(FinderError::EmptyEmbedding(page.slug.clone()));
        }
        if page.embedding.iter().any(|x| !x.is_finite()) {
            return Err(FinderError::NonFiniteEmbedding(page.slug.clone()));
        }
        match expected {
            Some(expected) if expected != actual => {
                return Err(FinderError::DimensionMismatch {
                    slug: page.slug.clone(),
                    expected,
                    actual,
                });
            }
            Some(_) => {}
            None => expected = Some(actual),
        }
    }
    Ok(())
}

/// Round a similarity to three decimals for reporting
pub fn round_similarity(similarity: f32) -> f32 {
    (similarity * 1000.0).round() / 1000.0
}

/// Find link opportunities between every ordered pair of pages
///
/// A pair (source, target) is admitted when the source does not already
/// link to the target's URL and their cosine similarity is at least
/// `threshold`. Results are sorted by similarity, highest first; ties keep
/// scan order.
pub fn find_opportunities(pages: &[EmbeddedDocument], threshold: f32) -> Vec<LinkOpportunity> {
    info!("finding opportunities with similarity threshold >= {}", threshold);

    let keywords: Vec<Keywords> = pages.iter().map(|p| Keywords::of(p)).collect();
    let mut opportunities = Vec::new();

    for (i, source) in pages.iter().enumerate() {
        for (j, target) in pages.iter().enumerate() {
            if i == j || source.links_to(&target.url) {
                continue;
            }

            let similarity = cosine_similarity(&source.embedding, &target.embedding);
            if similarity < threshold {
                continue;
            }

            let shared = keywords[i].shared_with(&keywords[j]);
            debug!(
                source = %source.url,
                target = %target.url,
                similarity,
                "admitted opportunity"
            );
            opportunities.push(LinkOpportunity {
                source_url: source.url.clone(),
                source_title: source.title.clone(),
                target_url: target.url.clone(),
                target_title: target.title.clone(),
                similarity: round_similarity(similarity),
                reason: reason(&shared),
                suggested_anchors: suggest_anchors(target),
            });
        }
    }

    opportunities.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    opportunities
}

/// Opportunity counts per source URL, most first; ties keep first appearance
pub fn count_by_source(opportunities: &[LinkOpportunity]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for opp in opportunities {
        match index.get(opp.source_url.as_str()) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(opp.source_url.as_str(), counts.len());
                counts.push((opp.source_url.clone(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Runs the finder stage against the configured output directory
pub struct Finder {
    config: PipelineConfig,
}

impl Finder {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Load `pages.json`, scan for opportunities, write `opportunities.json`
    ///
    /// Nothing is written unless the dataset loads and validates.
    pub fn run(&self) -> Result<FinderSummary, FinderError> {
        let input = self.config.pages_path();
        let pages = dataset::read_pages(&input)?;
        validate_pages(&pages)?;
        info!("loaded {} pages", pages.len());

        let opportunities = find_opportunities(&pages, self.config.threshold);

        let output = self.config.opportunities_path();
        dataset::write_json(&output, &opportunities)?;
        info!(path = %output.display(), "saved opportunities");

        Ok(FinderSummary {
            output,
            pages: pages.len(),
            opportunities,
            report_limit: self.config.report_limit,
        })
    }
}

/// Result of a finder run, printable as the console report
#[derive(Debug, Clone, PartialEq)]
pub struct FinderSummary {
    pub output: PathBuf,
    pub pages: usize,
    pub opportunities: Vec<LinkOpportunity>,
    report_limit: usize,
}

impl fmt::Display for FinderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loaded {} pages", self.pages)?;
        writeln!(f, "Found {} link opportunities", self.opportunities.len())?;
        writeln!(f, "  Saved to {}", self.output.display())?;

        if self.opportunities.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Summary by page:")?;
        for (url, count) in count_by_source(&self.opportunities)
            .iter()
            .take(self.report_limit)
        {
            writeln!(f, "  {}: {} opportunities", url, count)?;
        }

        writeln!(f)?;
        writeln!(f, "Top {} link opportunities:", self.report_limit)?;
        for (i, opp) in self.opportunities.iter().take(self.report_limit).enumerate() {
            writeln!(f)?;
            writeln!(f, "  {}. [{}] {}", i + 1, opp.similarity, opp.source_title)?;
            writeln!(f, "     -> {}", opp.target_title)?;
            if let Some(anchor) = opp.suggested_anchors.first() {
                writeln!(f, "     Anchors: \"{}\"", anchor)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn page(slug: &str, embedding: Vec<f32>, links: &[&str]) -> EmbeddedDocument {
        EmbeddedDocument::new(
            Document {
                slug: slug.into(),
                url: format!("/{}", slug),
                title: format!("{} title", slug),
                description: None,
                content: String::new(),
                headings: Vec::new(),
                category: None,
                tags: Vec::new(),
                word_count: 0,
                existing_links: links.iter().map(|s| s.to_string()).collect(),
            },
            embedding,
        )
    }

    #[test]
    fn threshold_is_inclusive() {
        let pages = vec![page("a", vec![1.0, 0.0], &[]), page("b", vec![0.0, 1.0], &[])];
        assert_eq!(find_opportunities(&pages, 0.0).len(), 2);

        let pages = vec![page("a", vec![1.0, 0.0], &[]), page("b", vec![1.0, 0.0], &[])];
        assert_eq!(find_opportunities(&pages, 1.0).len(), 2);
    }

    #[test]
    fn existing_link_suppresses_one_direction_only() {
        let pages = vec![
            page("a", vec![1.0, 0.0], &["/b"]),
            page("b", vec![0.9, 0.1], &[]),
        ];
        let opps = find_opportunities(&pages, 0.5);
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].source_url, "/b");
        assert_eq!(opps[0].target_url, "/a");
    }

    #[test]
    fn sorted_by_similarity_descending_and_rounded() {
        let pages = vec![
            page("a", vec![1.0, 0.0], &[]),
            page("b", vec![0.8, 0.6], &[]),
            page("c", vec![0.99, 0.141_067], &[]),
        ];
        let opps = find_opportunities(&pages, 0.7);
        let sims: Vec<f32> = opps.iter().map(|o| o.similarity).collect();
        assert!(sims.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(opps[0].similarity, 0.99);
        assert!(opps.iter().any(|o| o.similarity == 0.8));
    }

    #[test]
    fn opportunity_carries_reason_and_anchors() {
        let mut a = page("a", vec![1.0, 0.0], &[]);
        a.document.content = "Pricing experiments for startups".into();
        let mut b = page("b", vec![1.0, 0.0], &[]);
        b.document.title = "Startup Pricing".into();
        b.document.category = Some("Sales".into());

        let opps = find_opportunities(&[a, b], 0.7);
        let a_to_b = opps.iter().find(|o| o.source_url == "/a").unwrap();
        assert_eq!(a_to_b.reason, "Shared topics: pricing");
        assert_eq!(a_to_b.suggested_anchors, vec!["Startup Pricing", "Sales guide"]);
        assert_eq!(a_to_b.target_title, "Startup Pricing");
    }

    #[test]
    fn no_shared_keywords_uses_fallback_reason() {
        let mut a = page("a", vec![1.0], &[]);
        a.document.title = "Alpha".into();
        let mut b = page("b", vec![1.0], &[]);
        b.document.title = "Bravo".into();
        let opps = find_opportunities(&[a, b], 0.7);
        assert_eq!(opps.len(), 2);
        assert!(opps.iter().all(|o| o.reason == FALLBACK_REASON));
    }

    #[test]
    fn validate_rejects_bad_datasets() {
        let mixed = vec![page("a", vec![1.0, 0.0], &[]), page("b", vec![1.0], &[])];
        assert!(matches!(
            validate_pages(&mixed),
            Err(FinderError::DimensionMismatch { expected: 2, actual: 1, .. })
        ));

        let dup = vec![page("a", vec![1.0], &[]), page("a", vec![1.0], &[])];
        assert!(matches!(validate_pages(&dup), Err(FinderError::DuplicateSlug(_))));

        let empty = vec![page("a", Vec::new(), &[])];
        assert!(matches!(validate_pages(&empty), Err(FinderError::EmptyEmbedding(_))));

        let nan = vec![page("a", vec![f32::NAN, 1.0], &[])];
        assert!(matches!(validate_pages(&nan), Err(FinderError::NonFiniteEmbedding(_))));

        assert!(validate_pages(&[]).is_ok());
    }

    #[test]
    fn counts_by_source_descending() {
        let pages = vec![
            page("a", vec![1.0, 0.0], &[]),
            page("b", vec![1.0, 0.0], &["/a"]),
            page("c", vec![1.0, 0.0], &["/a", "/b"]),
        ];
        let opps = find_opportunities(&pages, 0.9);
        let counts = count_by_source(&opps);
        assert_eq!(counts, vec![("/a".to_string(), 2), ("/b".to_string(), 1)]);
    }

    #[test]
    fn summary_lists_top_opportunities() {
        let pages = vec![page("a", vec![1.0, 0.0], &[]), page("b", vec![1.0, 0.0], &[])];
        let summary = FinderSummary {
            output: PathBuf::from("out/opportunities.json"),
            pages: 2,
            opportunities: find_opportunities(&pages, 0.7),
            report_limit: 10,
        };
        let text = summary.to_string();
        assert!(text.starts_with("Loaded 2 pages\nFound 2 link opportunities\n"));
        assert!(text.contains("  /a: 1 opportunities"));
        assert!(text.contains("  1. [1] a title\n     -> b title\n     Anchors: \"b title\""));
    }
}
