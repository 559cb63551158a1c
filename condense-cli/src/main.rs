//! Condense CLI - a small chat host with the compaction filter in its request path

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use condense_core::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "condense")]
#[command(about = "Conversation compaction for chat pipelines", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML or JSON). Without it, condense.toml,
    /// config.json and CONDENSE_* variables are used.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively; type /compact to summarize the thread so far
    Chat {
        /// Thread id (a random one if omitted)
        #[arg(short, long)]
        thread: Option<String>,
    },
    /// Run the compaction filter once over a JSON chat request
    Compact {
        /// Path to a chat request (`{"messages": [...]}`)
        #[arg(short, long)]
        input: PathBuf,

        /// Thread id
        #[arg(short, long)]
        thread: Option<String>,
    },
    /// Print the effective configuration
    Config,
    /// Version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("condense {}", env!("CARGO_PKG_VERSION"));
            println!("condense-core {}", condense_core::VERSION);
        }
        Commands::Config => {
            let config = load_config(cli.config.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
        Commands::Compact { input, thread } => {
            let config = load_config(cli.config.as_ref())?;
            run_compact(config, input, thread).await?;
        }
        Commands::Chat { thread } => {
            let config = load_config(cli.config.as_ref())?;
            run_chat(config, thread).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<CondenseConfig> {
    let config = match path {
        Some(path) => CondenseConfig::from_file(path)?,
        None => CondenseConfig::load()?,
    };
    tracing::debug!(model = %config.compaction.model_id(), "Configuration loaded");
    Ok(config)
}

async fn run_compact(config: CondenseConfig, input: PathBuf, thread: Option<String>) -> Result<()> {
    let raw = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let mut request: ChatRequest = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a chat request", input.display()))?;

    let provider = LLMProviderFactory::create(&config).await?;
    let engine = CompactionEngine::new(provider, BoundaryStore::new(), config.compaction);
    tracing::debug!(model = %engine.config().model_id(), "Compacting {}", input.display());

    let outcome = engine
        .process(&mut request.messages, thread.as_deref())
        .await;
    match &outcome {
        TurnOutcome::Compacted(report) => tracing::info!(
            pre_tokens = report.pre_tokens,
            post_tokens = report.post_tokens,
            "Compacted {} messages (~{:.0}% smaller)",
            report.messages_compacted,
            report.reduction_percent
        ),
        other => tracing::info!(outcome = ?other, "No compaction"),
    }

    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

async fn run_chat(config: CondenseConfig, thread: Option<String>) -> Result<()> {
    let provider = LLMProviderFactory::create(&config).await?;

    let engine = CompactionEngine::new(provider.clone(), BoundaryStore::new(), config.compaction);
    let model = engine.config().model_id();
    let mut filters = FilterRegistry::new();
    filters.register(Arc::new(LoggingFilter));
    filters.register(Arc::new(engine));

    let thread_id = thread.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let context = RequestContext::new().with_thread_id(thread_id.clone());

    println!("thread {} ({}). /compact summarizes, Ctrl-D quits.", thread_id, model);

    // The host keeps the full history; the filter decides what is sent
    let mut history: Vec<Message> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        history.push(Message::user(line));

        let mut request = ChatRequest::new(history.clone()).with_model(model.clone());
        filters.apply(&mut request, &context).await?;

        let llm_request = LLMRequest::new(request.model.unwrap_or_default(), request.messages);
        match provider.chat_completion(&llm_request).await {
            Ok(completion) => match completion.first_content() {
                Some(reply) => {
                    let reply = reply.trim();
                    println!("{}\n", reply);
                    history.push(Message::assistant(reply));
                }
                None => eprintln!("(empty reply)"),
            },
            Err(e) => {
                tracing::error!(error = %e, "Completion failed");
                eprintln!("error: {}", e);
            }
        }
    }

    println!();
    Ok(())
}
