//! # pagesift CLI Application
//!
//! This module implements the command-line interface for the pagesift crawl
//! pipeline, exposing its operations through a set of subcommands.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands for the pipeline operations:
//!   - `crawl`: Render a URL and store the extracted content
//!   - `results`: List stored crawl records, newest first
//!   - `show`: Display one stored record by id
//!   - `ai-config`: Show the resolved AI configuration
//!   - `ai-test`: Smoke-test the configured AI provider
//!
//! ## Features
//!
//! - Prompt-driven extraction with automatic heuristic fallback
//! - Configurable navigation timeout and database path
//! - Both JSON and text output formats

mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use tracing::instrument;

use pagesift::ai::AiExtractor;
use pagesift::config::AiSettings;
use pagesift::extract::ExtractionRouter;
use pagesift::pipeline::Pipeline;
use pagesift::renderer::{RenderEngine, Renderer, RendererConfig};
use pagesift::store::{CrawlRecord, Database};

/// Built-in sample document for the `ai-test` command
const SAMPLE_CONTENT: &str = "Acme Corporation - Contact Us. \
    Email: info@acme.example or support@acme.example. Call (555) 123-4567. \
    Office: 123 Main Street, Springfield. \
    Widgets start at $19.99; premium plans cost $49.99 per month.";

const DEFAULT_TEST_PROMPT: &str =
    "Extract all contact information including emails, phone numbers, and prices";

#[derive(Parser)]
#[command(author, version, about = "Render web pages and extract prompt-driven content", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a URL and store the extracted content
    Crawl(CrawlArgs),

    /// List stored crawl records, newest first
    Results(ResultsArgs),

    /// Show one stored crawl record
    Show(ShowArgs),

    /// Show the resolved AI configuration
    AiConfig(AiConfigArgs),

    /// Run the configured AI provider against built-in sample content
    AiTest(AiTestArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// URL to crawl
    #[arg(required = true)]
    url: String,

    /// Extraction prompt; without one the page text is stored as-is
    #[arg(short, long)]
    prompt: Option<String>,

    /// Navigation timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Database path
    #[arg(long, default_value = "crawls.db")]
    database: PathBuf,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct ResultsArgs {
    /// Maximum number of records to list
    #[arg(short, long, default_value = "50")]
    limit: u32,

    /// Number of records to skip
    #[arg(short, long, default_value = "0")]
    offset: u32,

    /// Database path
    #[arg(long, default_value = "crawls.db")]
    database: PathBuf,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Record id
    #[arg(required = true)]
    id: i64,

    /// Database path
    #[arg(long, default_value = "crawls.db")]
    database: PathBuf,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct AiConfigArgs {
    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct AiTestArgs {
    /// Extraction prompt to test with
    #[arg(short, long, default_value = DEFAULT_TEST_PROMPT)]
    prompt: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing_subscriber();

    match cli.command {
        Some(Commands::Crawl(args)) => {
            crawl_command(args).await?;
        }
        Some(Commands::Results(args)) => {
            results_command(args).await?;
        }
        Some(Commands::Show(args)) => {
            show_command(args).await?;
        }
        Some(Commands::AiConfig(args)) => {
            ai_config_command(args)?;
        }
        Some(Commands::AiTest(args)) => {
            ai_test_command(args).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["--help"]);
        }
    }

    Ok(())
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    println!("Crawling {}...", args.url);

    let mut builder = RendererConfig::builder();
    if let Some(timeout_ms) = args.timeout_ms {
        builder = builder.timeout_ms(timeout_ms);
    }
    let config = builder.build();

    let engine = Arc::new(RenderEngine::new(config.clone()));
    let renderer = Renderer::new(Arc::clone(&engine), config);

    let router = ExtractionRouter::from_settings(&AiSettings::from_env())?;
    let db = Database::new_from_path(&args.database.to_string_lossy()).await?;

    let pipeline = Pipeline::new(Box::new(renderer), router, db);
    let result = pipeline.crawl(&args.url, args.prompt.as_deref()).await;

    engine.shutdown().await;

    let record = result?;
    print_record(&record, &args.format)?;

    Ok(())
}

#[instrument]
async fn results_command(args: ResultsArgs) -> anyhow::Result<()> {
    let db = Database::new_from_path(&args.database.to_string_lossy()).await?;
    let records = db.list_records(args.limit, args.offset).await?;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => {
            println!("Stored crawl records: {}", records.len());
            for record in &records {
                println!(
                    "{}. [{}] {} ({})",
                    record.id,
                    record.status,
                    record.url,
                    record.crawled_at.format("%Y-%m-%d %H:%M:%S"),
                );
                if let Some(title) = &record.title {
                    println!("   Title: {}", title);
                }
            }
        }
    }

    Ok(())
}

#[instrument]
async fn show_command(args: ShowArgs) -> anyhow::Result<()> {
    let db = Database::new_from_path(&args.database.to_string_lossy()).await?;

    let record = db
        .get_record(args.id)
        .await?
        .ok_or_else(|| anyhow!("no crawl record with id {}", args.id))?;

    print_record(&record, &args.format)
}

#[instrument]
fn ai_config_command(args: AiConfigArgs) -> anyhow::Result<()> {
    let summary = AiSettings::from_env().summary();

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            println!("AI extraction: {}", if summary.enabled { "enabled" } else { "disabled" });
            println!("Provider: {}", summary.provider.as_deref().unwrap_or("(none)"));
            println!("Model: {}", summary.model.as_deref().unwrap_or("(none)"));
            println!("API key present: {}", summary.has_api_key);
            println!("Max tokens: {}", summary.max_tokens);
            println!("Temperature: {}", summary.temperature);
        }
    }

    Ok(())
}

#[instrument]
async fn ai_test_command(args: AiTestArgs) -> anyhow::Result<()> {
    let settings = AiSettings::from_env();
    let extractor = AiExtractor::from_settings(&settings)?
        .ok_or_else(|| anyhow!("no AI provider configured; set AI_PROVIDER"))?;

    println!(
        "Testing {} ({}) with prompt: {}",
        extractor.provider(),
        extractor.model(),
        args.prompt
    );

    match extractor.extract(SAMPLE_CONTENT, &args.prompt).await {
        Ok(text) => {
            println!("\nExtraction result:");
            println!("{}", text);
            Ok(())
        }
        Err(err) => Err(anyhow!("AI test failed: {err}")),
    }
}

/// Print a stored record in the requested format.
fn print_record(record: &CrawlRecord, format: &str) -> anyhow::Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        _ => {
            println!("Record #{}", record.id);
            println!("URL: {}", record.url);
            println!("Status: {}", record.status);
            println!("Title: {}", record.title.as_deref().unwrap_or("(none)"));
            println!("Crawled at: {}", record.crawled_at.to_rfc3339());
            println!("Metadata: {}", serde_json::to_string(&record.metadata)?);
            println!("\nContent:\n{}", record.content);
        }
    }

    Ok(())
}
