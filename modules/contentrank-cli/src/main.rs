//! contentrank — score a document against the rubric, or optimize it with Claude.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use contentrank_common::{Config, ContentDocument, FocusKeyword};
use contentrank_optimizer::{ClaudeReviser, Optimizer, OptimizerConfig, RetentionPolicy};
use contentrank_rubric::analyze;

#[derive(Parser)]
#[command(name = "contentrank")]
#[command(about = "Content rubric scoring and optimization")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a document and print the per-check breakdown
    Score {
        /// Document JSON (camelCase fields)
        #[arg(short, long)]
        input: PathBuf,

        /// Focus keyword
        #[arg(short, long)]
        keyword: String,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Revise a document with Claude until it scores 100 or attempts run out
    Optimize {
        /// Document JSON (camelCase fields)
        #[arg(short, long)]
        input: PathBuf,

        /// Focus keyword
        #[arg(short, long)]
        keyword: String,

        /// Write the final document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Return the highest-scoring pass instead of the last one
        #[arg(long)]
        keep_best: bool,

        /// Override CONTENTRANK_MAX_ATTEMPTS
        #[arg(long)]
        max_attempts: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_logging(cli.json_logs)?;

    match cli.command {
        Commands::Score {
            input,
            keyword,
            json,
        } => cmd_score(&input, &keyword, json),
        Commands::Optimize {
            input,
            keyword,
            output,
            keep_best,
            max_attempts,
        } => cmd_optimize(&input, &keyword, output.as_deref(), keep_best, max_attempts).await,
    }
}

/// Logs go to stderr so stdout stays clean for JSON output.
fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("contentrank=info".parse()?);
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn cmd_score(input: &Path, keyword: &str, json: bool) -> Result<()> {
    let document = read_document(input)?;
    let keyword = FocusKeyword::new(keyword);
    if keyword.is_empty() {
        warn!("Blank focus keyword; the analysis will be empty");
    }

    let analysis = analyze(&document, &keyword);
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{analysis}");
    }
    Ok(())
}

async fn cmd_optimize(
    input: &Path,
    keyword: &str,
    output: Option<&Path>,
    keep_best: bool,
    max_attempts: Option<u32>,
) -> Result<()> {
    let document = read_document(input)?;
    let keyword = FocusKeyword::new(keyword);

    let config = Config::from_env()?;
    config.log_redacted();

    let mut optimizer_config = OptimizerConfig::from(&config);
    if let Some(max) = max_attempts {
        if max == 0 {
            bail!("--max-attempts must be at least 1");
        }
        optimizer_config.max_attempts = max;
    }
    if keep_best {
        optimizer_config.retention = RetentionPolicy::KeepBest;
    }

    let reviser = ClaudeReviser::from_config(&config)?;
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current revision");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let model = reviser.model().to_string();
    let optimizer = Optimizer::new(reviser, optimizer_config).with_cancellation(cancel);
    info!(
        %model,
        max_attempts = optimizer.config().max_attempts,
        retention = ?optimizer.config().retention,
        "Starting optimization"
    );

    match optimizer.run(document, &keyword).await {
        Ok(outcome) => {
            info!(
                stop_reason = ?outcome.stop_reason,
                attempts_used = outcome.attempts_used,
                score = outcome.final_analysis.score,
                "Done"
            );
            eprint!("{}", outcome.final_analysis);
            write_document(&outcome.final_document, output)
        }
        Err(failure) => {
            eprint!("{}", failure.last_analysis);
            write_document(&failure.last_document, output)?;
            Err(failure).context("optimization aborted")
        }
    }
}

fn read_document(path: &Path) -> Result<ContentDocument> {
    ContentDocument::load(path)
        .with_context(|| format!("Failed to load document: {}", path.display()))
}

fn write_document(document: &ContentDocument, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => document
            .save(path)
            .with_context(|| format!("Failed to write document: {}", path.display())),
        None => {
            println!("{}", document.to_json()?);
            Ok(())
        }
    }
}
