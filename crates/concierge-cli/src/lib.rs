//! # concierge-cli
//!
//! Runs the hotel concierge agent, either as an interactive chat or as a
//! batch simulation that logs one evaluation record per query to JSONL.

pub mod config;
pub mod session;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, Local};
use clap::{Parser, Subcommand};

use agent_core::{
    Agent, AgentBuilder, EmbeddingProvider, InteractionRecorder, JsonlWriter, LlmProvider, ToolCatalog,
    provider::ModelInfo,
};
use agent_runtime::{OllamaConfig, OllamaEmbedder, OllamaProvider};
use hotel_concierge::{CONCIERGE_PROMPT, Clock, DEFAULT_QUERIES, HashingEmbedder, MemoryRoomStore, concierge_tools, seed_rooms};

pub use config::ConciergeConfig;
pub use session::SessionDriver;

/// Days of room inventory seeded from today
const SEED_DAYS: u64 = 30;

#[derive(Debug, Parser)]
#[command(
    name = "concierge",
    about = "Smart hotel concierge",
    long_about = "Chat with the hotel concierge agent or replay simulated guest queries into an evaluation dataset.",
    after_help = "Examples:\n  concierge chat\n  concierge simulate --output evals.jsonl\n  concierge simulate --queries queries.txt --append"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Chat model to use (overrides CONCIERGE_MODEL)")]
    model: Option<String>,

    #[arg(long, global = true, help = "Evaluation dataset path (overrides CONCIERGE_OUTPUT)")]
    output: Option<PathBuf>,

    #[arg(long, global = true, help = "Embed room descriptions locally instead of calling Ollama")]
    offline_embeddings: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Talk to the concierge; type 'exit' or 'quit' to leave")]
    Chat {
        #[arg(long, help = "Append a record for every exchange to the evaluation dataset")]
        record: bool,
    },
    #[command(about = "Replay guest queries and write one evaluation record per query")]
    Simulate {
        #[arg(long, help = "File with one query per line (defaults to the built-in queries)")]
        queries: Option<PathBuf>,

        #[arg(long, help = "Append to the dataset instead of overwriting it")]
        append: bool,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConciergeConfig::from_env().with_overrides(cli.model, cli.output, cli.offline_embeddings);
    tracing::info!(model = %config.model, output = %config.output.display(), "🛎️  starting concierge");

    let (agent, catalog) = build_agent(&config).await?;
    let driver = SessionDriver::new(agent, InteractionRecorder::new(catalog));

    match cli.command {
        Command::Simulate { queries, append } => {
            let queries = match queries {
                Some(path) => load_queries(&path)?,
                None => DEFAULT_QUERIES.iter().map(ToString::to_string).collect(),
            };

            let mut writer = if append {
                JsonlWriter::append(&config.output)
            } else {
                JsonlWriter::create(&config.output)
            }
            .with_context(|| format!("opening {}", config.output.display()))?;

            let written = driver.run_batch(&queries, &mut writer).await?;
            tracing::info!(written, output = %config.output.display(), "📝 simulation completed");
        }
        Command::Chat { record } => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut out = std::io::stdout();

            if record {
                let mut writer = JsonlWriter::append(&config.output)
                    .with_context(|| format!("opening {}", config.output.display()))?;
                driver.run_interactive(input, &mut out, &mut writer).await?;
            } else {
                let mut writer = JsonlWriter::new(std::io::sink());
                driver.run_interactive(input, &mut out, &mut writer).await?;
            }
        }
    }

    Ok(())
}

/// Wire provider, embedder, seeded room store and tools into an agent
async fn build_agent(config: &ConciergeConfig) -> anyhow::Result<(Agent, Arc<ToolCatalog>)> {
    let ollama = OllamaConfig::from_env();
    let provider = Arc::new(OllamaProvider::from_config(&ollama));

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            match provider.list_models().await {
                Ok(models) if !model_installed(&models, &config.model) => {
                    tracing::warn!(model = %config.model, "⚠ model not pulled yet");
                    tracing::warn!("  Pull it first: ollama pull {}", config.model);
                }
                Ok(models) => {
                    for model in models {
                        tracing::debug!("  Model: {}", model.name);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "could not list Ollama models"),
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - queries will be recorded with errors");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    let embedder: Arc<dyn EmbeddingProvider> = if config.offline_embeddings {
        Arc::new(HashingEmbedder::default())
    } else {
        Arc::new(OllamaEmbedder::new(&ollama, &config.embedding_model))
    };
    tracing::info!(embedder = embedder.model(), "using embedding model");

    let store = Arc::new(MemoryRoomStore::new());
    let today = Local::now().date_naive();
    let dates = (0..SEED_DAYS).filter_map(move |offset| today.checked_add_days(Days::new(offset)));
    let seeded = seed_rooms(store.as_ref(), embedder.as_ref(), dates)
        .await
        .context("seeding room inventory")?;
    tracing::info!(records = seeded, "🏨 room inventory seeded");

    let tools = concierge_tools(store, embedder, Clock::System);
    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }
    let catalog = Arc::new(tools.catalog());

    let agent = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .system_prompt(CONCIERGE_PROMPT)
        .model(config.model.clone())
        .max_iterations(config.max_iterations)
        .build()?;

    Ok((agent, catalog))
}

/// `llama3.2` matches an installed `llama3.2:latest`
fn model_installed(models: &[ModelInfo], wanted: &str) -> bool {
    models.iter().any(|m| {
        m.name == wanted || m.name.strip_prefix(wanted).is_some_and(|tag| tag.starts_with(':'))
    })
}

/// One query per non-blank line
fn load_queries(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading queries from {}", path.display()))?;
    let queries: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    anyhow::ensure!(!queries.is_empty(), "no queries in {}", path.display());
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simulate_flags() {
        let cli = Cli::try_parse_from([
            "concierge",
            "simulate",
            "--append",
            "--output",
            "evals.jsonl",
            "--offline-embeddings",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(PathBuf::from("evals.jsonl")));
        assert!(cli.offline_embeddings);
        assert!(matches!(cli.command, Command::Simulate { queries: None, append: true }));
    }

    #[test]
    fn test_parse_chat_with_model() {
        let cli = Cli::try_parse_from(["concierge", "--model", "qwen2.5", "chat"]).unwrap();
        assert_eq!(cli.model.as_deref(), Some("qwen2.5"));
        assert!(matches!(cli.command, Command::Chat { record: false }));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["concierge"]).is_err());
    }

    #[test]
    fn test_model_installed_matches_tags() {
        let models = vec![
            ModelInfo { name: "llama3.2:latest".into() },
            ModelInfo { name: "nomic-embed-text:v1.5".into() },
        ];
        assert!(model_installed(&models, "llama3.2"));
        assert!(model_installed(&models, "llama3.2:latest"));
        assert!(!model_installed(&models, "llama3"));
        assert!(!model_installed(&models, "qwen2.5"));
    }

    #[test]
    fn test_load_queries_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "What's today's date?\n\n  Please book 1 suite for tomorrow.  ").unwrap();

        let queries = load_queries(file.path()).unwrap();
        assert_eq!(queries, ["What's today's date?", "Please book 1 suite for tomorrow."]);
    }

    #[test]
    fn test_load_queries_rejects_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_queries(file.path()).is_err());
    }
}
