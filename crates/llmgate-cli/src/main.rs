//! llmgate CLI — entry point.
//!
//! # Commands
//!
//! - `llmgate invoke [PROMPT] [-s SYSTEM]` — send a prompt to the active provider
//! - `llmgate embed TEXT...` — embed one text or a batch
//! - `llmgate extract -s SYSTEM [-u USER]` — request and parse a JSON object
//! - `llmgate status` — show the active provider and missing settings
//! - `llmgate init` — write a default config file

mod helpers;
mod init;
mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use llmgate_core::config::load_config;
use llmgate_core::types::Message;
use llmgate_providers::{extract_json, EmbedInput, Embedder, Llm};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// llmgate — one interface to chat and embedding models across providers
#[derive(Parser)]
#[command(name = "llmgate", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.llmgate/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt and print the reply
    Invoke {
        /// Prompt text. Read from stdin when omitted.
        prompt: Option<String>,

        /// Optional system message sent before the prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Also print the measured latency
        #[arg(long, default_value_t = false)]
        timed: bool,
    },

    /// Embed one or more texts and print the matrix shape
    Embed {
        /// Texts to embed. One text uses the single-text call.
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Ask for a JSON object and print it
    Extract {
        /// System prompt describing the object to produce
        #[arg(short, long)]
        system: String,

        /// User prompt (optional)
        #[arg(short, long, default_value = "")]
        user: String,
    },

    /// Show the active provider and which settings are missing
    Status,

    /// Write a default config file
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Invoke {
            prompt,
            system,
            timed,
        } => run_invoke(config_path, prompt, system, timed).await,
        Commands::Embed { texts } => run_embed(config_path, texts).await,
        Commands::Extract { system, user } => run_extract(config_path, &system, &user).await,
        Commands::Status => status::run(config_path),
        Commands::Init => init::run(config_path),
    }
}

// ─────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────

async fn run_invoke(
    config_path: Option<&std::path::Path>,
    prompt: Option<String>,
    system: Option<String>,
    timed: bool,
) -> Result<()> {
    let config = load_config(config_path);
    let llm = Llm::from_config(&config).context("failed to build chat model")?;
    info!(provider = llm.provider(), model = llm.model_name(), "Chat model ready");

    let prompt = match prompt {
        Some(p) => p,
        None => helpers::read_stdin().context("failed to read prompt from stdin")?,
    };
    let messages = match system {
        Some(system) => vec![Message::system(system), Message::user(prompt)],
        None => vec![Message::user(prompt)],
    };

    let result = llm.invoke_timed(messages).await.context("invocation failed")?;
    helpers::print_response(llm.provider(), &result.content);
    if timed {
        helpers::print_latency(result.latency);
    }
    Ok(())
}

async fn run_embed(config_path: Option<&std::path::Path>, texts: Vec<String>) -> Result<()> {
    let config = load_config(config_path);
    let embedder = Embedder::from_config(&config).context("failed to build embedding model")?;
    info!(model = embedder.model_name(), texts = texts.len(), "Embedding model ready");

    let input = match <[String; 1]>::try_from(texts) {
        Ok([text]) => EmbedInput::Single(text),
        Err(texts) => EmbedInput::Batch(texts),
    };

    let embeddings = embedder.encode(input).await.context("embedding failed")?;
    helpers::print_embeddings(embedder.model_name(), &embeddings);
    Ok(())
}

async fn run_extract(
    config_path: Option<&std::path::Path>,
    system: &str,
    user: &str,
) -> Result<()> {
    let config = load_config(config_path);
    let llm = Llm::from_config(&config).context("failed to build chat model")?;
    info!(provider = llm.provider(), model = llm.model_name(), "Extracting JSON");

    let object = extract_json(system, user, &llm)
        .await
        .context("no JSON object in the model reply (run with --logs for details)")?;

    let pretty = serde_json::to_string_pretty(&object)?;
    println!("{pretty}");
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("llmgate_core=debug,llmgate_providers=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
