//! Interlink CLI: internal-link recommendations for a markdown corpus.
//!
//! Usage:
//!   interlink analyze [CONTENT_DIR] [--model name] [--output-dir dir]
//!   interlink find-links [--threshold 0.7] [--limit 10] [--output-dir dir]

use clap::{ArgAction, Parser, Subcommand};
use interlink::config::{self, PipelineConfig};
use interlink::{Embedder, Extractor, Finder};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "interlink",
    version,
    about = "Find internal-link opportunities by semantic similarity"
)]
struct Cli {
    /// Directory holding pages.json and opportunities.json
    #[arg(long, global = true, default_value = config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract content, embed every page and write pages.json
    Analyze {
        /// Root directory of the markdown corpus
        #[arg(default_value = config::DEFAULT_CONTENT_DIR)]
        content_dir: PathBuf,
        /// Sentence-embedding model
        #[arg(long, default_value = interlink::embedding::DEFAULT_MODEL)]
        model: String,
    },
    /// Compare pages in pages.json and write opportunities.json
    FindLinks {
        /// Minimum cosine similarity, inclusive, within [-1, 1]
        #[arg(long, default_value_t = config::DEFAULT_THRESHOLD, value_parser = parse_threshold)]
        threshold: f32,
        /// Rows shown in each console summary section
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn parse_threshold(raw: &str) -> Result<f32, String> {
    config::parse_threshold(raw).map_err(|e| e.to_string())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "interlink=info",
        1 => "interlink=debug",
        _ => "interlink=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "embeddings")]
fn load_embedder(model: &str) -> Result<Box<dyn Embedder>, String> {
    tracing::info!(model, "loading embedding model (first run downloads it)");
    let embedder = interlink::embedding::FastEmbedEmbedder::new(model, config::model_cache_dir())
        .map_err(|e| e.to_string())?;
    tracing::info!("model loaded");
    Ok(Box::new(embedder))
}

#[cfg(not(feature = "embeddings"))]
fn load_embedder(model: &str) -> Result<Box<dyn Embedder>, String> {
    Err(format!(
        "cannot load model '{}': interlink was built without the `embeddings` feature",
        model
    ))
}

fn cmd_analyze(config: PipelineConfig, content_dir: &Path) -> i32 {
    let embedder = match load_embedder(&config.model) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match Extractor::new(embedder, config).run(content_dir) {
        Ok(summary) => {
            println!("{}", summary);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_find_links(config: PipelineConfig) -> i32 {
    match Finder::new(config).run() {
        Ok(summary) => {
            println!("{}", summary);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base = PipelineConfig::default().with_output_dir(cli.output_dir);
    let code = match cli.command {
        Commands::Analyze { content_dir, model } => {
            cmd_analyze(base.with_model(model), &content_dir)
        }
        Commands::FindLinks { threshold, limit } => match base.with_threshold(threshold) {
            Ok(config) => cmd_find_links(config.with_report_limit(limit)),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
