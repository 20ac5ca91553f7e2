// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rag_chat::store::library::open_store;
use rag_chat::utils::logging::{
    format_error, format_info, format_speaker, format_success, format_warning,
};
use rag_chat::{
    Chat, ChatEngine, Config, DocumentImporter, DocumentLibrary, DocumentStore,
    EmbeddingProvider, HealthCheck, HealthReport, InMemoryDocumentStore, OpenAiEmbeddingClient,
    OperationTimer, ReplyMode, RetrievalConfig,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "rag_chat")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Retrieval-augmented chat over a local document collection", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat {
        /// Start with retrieval disabled
        #[arg(long)]
        no_rag: bool,
    },

    /// Ask a single question and print the answer
    Ask {
        question: String,

        #[arg(long)]
        no_rag: bool,
    },

    /// Show which documents would be retrieved for a query
    Search {
        query: String,

        #[arg(short, long)]
        threshold: Option<f32>,

        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Manage the document library
    Docs {
        #[command(subcommand)]
        command: DocsCommand,
    },

    /// Check credential, library and embedding service
    Health,
}

#[derive(Subcommand)]
enum DocsCommand {
    List,

    Show {
        id: Uuid,
    },

    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,

        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    Edit {
        id: Uuid,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,

        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    Remove {
        id: Uuid,
    },

    /// Import .md, .markdown and .txt files from a directory
    Import {
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    rag_chat::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Chat { no_rag } => cmd_chat(&config, !no_rag && config.chat.rag_enabled).await?,
        Commands::Ask { question, no_rag } => {
            cmd_ask(&config, &question, !no_rag && config.chat.rag_enabled).await?
        }
        Commands::Search {
            query,
            threshold,
            top_k,
        } => cmd_search(&config, &query, threshold, top_k).await?,
        Commands::Docs { command } => cmd_docs(&config, command)?,
        Commands::Health => cmd_health(&config).await?,
    }

    Ok(())
}

fn credential_notice(engine: &ChatEngine) {
    if !engine.has_credential() {
        eprintln!(
            "{}",
            format_warning(
                "No valid API key configured; replies will be simulated. Set OPENAI_API_KEY to connect."
            )
        );
    }
}

async fn cmd_ask(config: &Config, question: &str, rag_enabled: bool) -> Result<()> {
    let store = open_store(&config.library)?;
    let engine = ChatEngine::from_config(config)?;
    credential_notice(&engine);

    let mut chat = Chat::new();
    let reply = engine
        .respond(&mut chat, question, &store.list(), rag_enabled)
        .await?;

    print_sources(&reply.sources);
    println!("{}", reply.message.content);

    if reply.mode == ReplyMode::Failed {
        anyhow::bail!("completion failed");
    }
    Ok(())
}

async fn cmd_chat(config: &Config, mut rag_enabled: bool) -> Result<()> {
    let store = open_store(&config.library)?;
    let engine = ChatEngine::from_config(config)?;
    credential_notice(&engine);

    println!(
        "{}",
        format_info(&format!(
            "{} documents loaded, RAG {}. Commands: /rag, /new, /quit",
            store.len(),
            if rag_enabled { "on" } else { "off" }
        ))
    );

    let documents = store.list();
    let mut chat = Chat::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("{} ", format_speaker("you"));
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/rag" => {
                rag_enabled = !rag_enabled;
                println!(
                    "{}",
                    format_info(&format!("RAG {}", if rag_enabled { "on" } else { "off" }))
                );
                continue;
            }
            "/new" => {
                chat = Chat::new();
                println!("{}", format_info("Started a new conversation"));
                continue;
            }
            _ => {}
        }

        let reply = engine
            .respond(&mut chat, line, &documents, rag_enabled)
            .await?;

        print_sources(&reply.sources);
        match reply.mode {
            ReplyMode::Failed => println!("{}", format_error(&reply.message.content)),
            _ => println!("{} {}", format_speaker("assistant"), reply.message.content),
        }
    }

    info!("Chat '{}' ended with {} messages", chat.title, chat.messages.len());
    Ok(())
}

fn print_sources(sources: &[rag_chat::ScoredDocument]) {
    if sources.is_empty() {
        return;
    }
    let titles: Vec<String> = sources
        .iter()
        .map(|s| format!("{} ({:.2})", s.title(), s.score))
        .collect();
    println!("{}", format_info(&format!("Sources: {}", titles.join(", "))));
}

async fn cmd_search(
    config: &Config,
    query: &str,
    threshold: Option<f32>,
    top_k: Option<usize>,
) -> Result<()> {
    info!("Searching for: {}", query);

    let policy = RetrievalConfig {
        similarity_threshold: threshold.unwrap_or(config.retrieval.similarity_threshold),
        top_k: top_k.unwrap_or(config.retrieval.top_k),
        ..config.retrieval.clone()
    };
    let mut checked = config.clone();
    checked.retrieval = policy.clone();
    checked.validate().context("Invalid search options")?;

    let store = open_store(&config.library)?;
    let engine = ChatEngine::from_config(config)?;

    let results = engine
        .retriever()
        .retrieve_with(query, &store.list(), &policy)
        .await
        .context("Retrieval failed")?;

    if results.is_empty() {
        println!("\nNo relevant documents for: \"{}\"\n", query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Lowering --threshold (currently {})", policy.similarity_threshold);
        println!("  - Adding documents with `docs add` or `docs import`");
        return Ok(());
    }

    println!("\nSearch Results for: \"{}\"\n", query);
    println!("{}", "=".repeat(80));
    for (idx, result) in results.iter().enumerate() {
        print!("\n{}. {}", idx + 1, result.format_summary(300));
    }
    println!("\n{}", "=".repeat(80));

    Ok(())
}

fn library_for(config: &Config) -> Result<DocumentLibrary> {
    let path = config
        .library
        .path
        .as_ref()
        .context("library.path is not configured; document changes cannot be saved")?;
    Ok(DocumentLibrary::new(path))
}

fn read_content(content: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (content, file) {
        (Some(content), _) => Ok(Some(content)),
        (None, Some(path)) => Ok(Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        )),
        (None, None) => Ok(None),
    }
}

fn save(library: &DocumentLibrary, store: &InMemoryDocumentStore) -> Result<()> {
    library.save(store.documents(), true)?;
    Ok(())
}

fn cmd_docs(config: &Config, command: DocsCommand) -> Result<()> {
    let mut store = open_store(&config.library)?;

    match command {
        DocsCommand::List => {
            if store.is_empty() {
                println!("{}", format_info("The library is empty"));
            }
            for doc in store.list() {
                println!(
                    "{}  {}  ({} chars, {})",
                    doc.id,
                    doc.title,
                    doc.content.chars().count(),
                    doc.created_at.format("%Y-%m-%d")
                );
            }
        }
        DocsCommand::Show { id } => {
            let doc = store
                .get(id)
                .with_context(|| format!("Document not found: {}", id))?;
            println!("# {}\n\n{}", doc.title, doc.content);
        }
        DocsCommand::Add {
            title,
            content,
            file,
        } => {
            let library = library_for(config)?;
            let content = read_content(content, file.as_deref())?
                .context("Either --content or --file is required")?;
            let doc = store.add(&title, &content)?;
            save(&library, &store)?;
            println!("{}", format_success(&format!("Added {} ({})", doc.title, doc.id)));
        }
        DocsCommand::Edit {
            id,
            title,
            content,
            file,
        } => {
            let library = library_for(config)?;
            let current = store
                .get(id)
                .with_context(|| format!("Document not found: {}", id))?;
            let title = title.unwrap_or(current.title);
            let content = read_content(content, file.as_deref())?.unwrap_or(current.content);
            let doc = store.update(id, &title, &content)?;
            save(&library, &store)?;
            println!("{}", format_success(&format!("Updated {} ({})", doc.title, doc.id)));
        }
        DocsCommand::Remove { id } => {
            let library = library_for(config)?;
            let doc = store.remove(id)?;
            save(&library, &store)?;
            println!("{}", format_success(&format!("Removed {}", doc.title)));
        }
        DocsCommand::Import { dir } => {
            let library = library_for(config)?;
            let stats = DocumentImporter::new().import_directory(&dir, &mut store)?;
            save(&library, &store)?;
            println!(
                "{}",
                format_success(&format!(
                    "Imported {} documents ({} duplicates, {} skipped, {} failed)",
                    stats.imported, stats.duplicates, stats.skipped, stats.failed
                ))
            );
        }
    }

    Ok(())
}

async fn cmd_health(config: &Config) -> Result<()> {
    let mut checks = Vec::new();

    checks.push(if config.provider.has_credential() {
        HealthCheck::healthy("credential", Duration::ZERO)
    } else {
        HealthCheck::degraded(
            "credential",
            "no valid API key; chat runs in simulated mode".to_string(),
            Duration::ZERO,
        )
    });

    let timer = OperationTimer::new("library check");
    checks.push(match open_store(&config.library) {
        Ok(store) if store.is_empty() => HealthCheck::degraded(
            "library",
            "no documents; retrieval will never add context".to_string(),
            timer.elapsed(),
        ),
        Ok(store) => {
            info!("Library holds {} documents", store.len());
            HealthCheck::healthy("library", timer.elapsed())
        }
        Err(e) => HealthCheck::unhealthy("library", e.to_string(), timer.elapsed()),
    });

    if config.provider.has_credential() {
        let embedder = OpenAiEmbeddingClient::from_config(&config.provider)?;
        let timer = OperationTimer::new("embedding probe");
        let check = match embedder.embed("health check").await {
            Ok(vector) => {
                info!(
                    "Embedding model {} returned {} dimensions",
                    embedder.model_name(),
                    vector.len()
                );
                HealthCheck::healthy("embeddings", timer.elapsed())
            }
            Err(e) => HealthCheck::unhealthy("embeddings", e.to_string(), timer.elapsed()),
        };
        timer.warn_if_slow(Duration::from_secs(5), "embedding probe");
        checks.push(check);
    }

    let report = HealthReport::new(checks, env!("CARGO_PKG_VERSION").to_string());
    println!("{}", report.format());

    Ok(())
}
