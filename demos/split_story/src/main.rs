//! Split a story file into reading segments and inspect the result.
//!
//! ```bash
//! ANTHROPIC_API_KEY=... cargo run -p split_story -- story.txt --target 5000 --out outputs
//! cargo run -p split_story -- story.txt --deterministic --json
//! ```
//!
//! The advisor is used when `ANTHROPIC_API_KEY` is set, unless
//! `--deterministic` is passed or `USE_AGENT_CHUNKER=false`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serialcut::anthropic::{AnthropicConfig, DEFAULT_MODEL};
use serialcut::{ChunkManifest, Chunker, ChunkingConfig};
use tracing_subscriber::EnvFilter;

const PREVIEW_CHARS: usize = 200;

#[derive(Parser)]
#[command(name = "split_story", version, about)]
struct Cli {
    /// Plain-text story to split
    file: PathBuf,

    /// Target words per segment
    #[arg(short, long, env = "TARGET_WORDS", default_value = "8000")]
    target: usize,

    /// Skip the boundary advisor even when an API key is present
    #[arg(long)]
    deterministic: bool,

    /// Seconds before a boundary-advice request is abandoned
    #[arg(long, default_value = "120")]
    timeout: u64,

    /// Write each segment to `<DIR>/<name>_chunk<i>_target<N>.txt`
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Print the chunk manifest as JSON instead of previews
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn agent_enabled(cli: &Cli) -> bool {
    if cli.deterministic {
        return false;
    }
    std::env::var("USE_AGENT_CHUNKER")
        .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(true)
}

fn preview(text: &str) -> String {
    text.chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let text = tokio::fs::read_to_string(&cli.file)
        .await
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let config = ChunkingConfig::new(cli.target);
    let mut chunker = Chunker::new(config)?;
    if agent_enabled(&cli) {
        match std::env::var("ANTHROPIC_API_KEY") {
            Ok(key) if !key.is_empty() => {
                let model =
                    std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
                let config = AnthropicConfig::new(key, model);
                chunker = chunker
                    .with_anthropic_config(config, Some(Duration::from_secs(cli.timeout)))?;
            }
            _ => tracing::warn!("ANTHROPIC_API_KEY not set, using deterministic chunking"),
        }
    }

    let outcome = chunker.chunk(&text, cli.target).await;
    let base = cli
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "story".to_string());

    if cli.json {
        let manifest = ChunkManifest::from_segments(&base, &outcome.segments, outcome.strategy);
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    } else {
        println!("File: {}", cli.file.display());
        println!("Total words: {}", serialcut::splitters::count_words(&text));
        println!("Target words per chunk: {}", cli.target);
        println!("Strategy: {}", outcome.strategy);
        println!("\nResults: {} chunks created", outcome.segments.len());
        println!("{}", "=".repeat(80));
        for (i, segment) in outcome.segments.iter().enumerate() {
            println!("\nChunk {}: {} words", i + 1, segment.word_count);
            println!("Preview: {}...", preview(&segment.text));
        }
    }

    if let Some(dir) = &cli.out {
        write_segments(dir, &base, cli.target, &outcome.segments).await?;
    }

    Ok(())
}

async fn write_segments(
    dir: &Path,
    base: &str,
    target: usize,
    segments: &[serialcut::Segment],
) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;
    for (i, segment) in segments.iter().enumerate() {
        let path = dir.join(format!("{base}_chunk{}_target{target}.txt", i + 1));
        tokio::fs::write(&path, &segment.text)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("Saved to: {}", path.display());
    }
    Ok(())
}
