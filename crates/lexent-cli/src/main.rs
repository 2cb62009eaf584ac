//! Lexent CLI - Command-line interface
//!
//! Usage:
//!   lexent extract <path> [--format text|json] [--tagger heuristic|http]
//!   lexent rules

mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lexent_core::{AppConfig, LoggingConfig, TaggerKind};
use lexent_extractor::identifiers::IdentifierExtractor;
use lexent_extractor::lexicon::Lexicon;
use lexent_extractor::source::{DirectorySource, DocumentSource};
use lexent_extractor::tagger::create_tagger;
use lexent_extractor::validator::Validator;
use lexent_extractor::HybridExtractor;

use crate::report::DocumentReport;

#[derive(Parser)]
#[command(name = "lexent")]
#[command(about = "Person and organization extraction for legal text")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entities and identifiers from a .txt file or a directory of them
    Extract {
        /// File or directory to process
        path: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Tagger backend (overrides config)
        #[arg(long)]
        tagger: Option<TaggerKind>,

        /// HTTP tagger endpoint (overrides config)
        #[arg(long)]
        endpoint: Option<String>,

        /// Per-chunk tagger timeout in milliseconds (overrides config)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// List the validation rules in precedence order
    Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Extract {
            path,
            format,
            tagger,
            endpoint,
            timeout_ms,
        } => {
            if let Some(kind) = tagger {
                config.tagger.kind = kind;
            }
            if let Some(endpoint) = endpoint {
                config.tagger.endpoint = Some(endpoint);
            }
            if let Some(timeout_ms) = timeout_ms {
                config.tagger.timeout_ms = timeout_ms;
            }
            extract(&config, &path, format).await
        }
        Commands::Rules => {
            print_rules();
            Ok(())
        }
    }
}

/// Initialize tracing; `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn extract(config: &AppConfig, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let source = DirectorySource::new(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    let ids = source.document_ids()?;
    if ids.is_empty() {
        tracing::warn!(path = %path.display(), "No .txt files found");
        return Ok(());
    }

    let tagger = create_tagger(&config.tagger, Arc::new(Lexicon::with_config(&config.lexicon)))?;
    let extractor = HybridExtractor::from_config(config, vec![tagger]);
    let identifiers = IdentifierExtractor::new()?;

    tracing::info!(
        documents = ids.len(),
        tagger = %config.tagger.kind,
        "Starting extraction"
    );

    let mut processed = 0usize;
    for id in &ids {
        let text = match source.read(id) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(document = %id, error = %e, "Skipping unreadable document");
                continue;
            }
        };
        if text.trim().is_empty() {
            tracing::warn!(document = %id, "Skipping empty document");
            continue;
        }

        let entities = extractor.extract(&text).await;
        let report = DocumentReport::new(id.as_str(), entities, identifiers.extract_all(&text));

        match format {
            OutputFormat::Text => println!("{report}"),
            OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        }
        processed += 1;
    }

    tracing::info!(
        processed,
        skipped = ids.len() - processed,
        "Extraction finished"
    );
    Ok(())
}

fn print_rules() {
    let validator = Validator::new();
    for (i, rule) in validator.rules().iter().enumerate() {
        println!("{:>2}. {:<24} [{}]", i + 1, rule.name, rule.scope);
    }
}
