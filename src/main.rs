//! MCP-Agent: recommends MCP servers for product requirements
//!
//! This is the main entry point for the application.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use mcp_agent::{
    analysis::Analyzer,
    cli,
    config::{self, Settings},
    llm::{LlmBackend, OpenAiClient},
    network::HttpClient,
    search::SearchManager,
    sources::{SourceLoader, SourceRegistry},
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line interface for MCP-Agent
#[derive(Parser, Debug)]
#[command(name = "mcp-agent")]
#[command(about = "Turn product requirements into use cases, flowcharts and recommended MCP servers")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read requirements from stdin and print the analysis (default)
    Cli,
    /// Serve the web interface
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Run one search over every enabled source and print JSON
    Search {
        /// Use case description
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let dotenv = config::load_dotenv();
    let settings = config::load(args.config.as_deref())?;
    init_logging(&settings);

    info!("Starting MCP-Agent v{}", mcp_agent::VERSION);
    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
    let settings = config::init(settings)?;

    let client = HttpClient::with_settings(&settings.outgoing)?;
    let openai = OpenAiClient::from_settings(client.clone(), &settings.llm);
    if !openai.has_api_key() {
        warn!("OPENAI_API_KEY is not set; use case generation and matching will fail");
    }
    let llm: Arc<dyn LlmBackend> = Arc::new(openai);

    let registry = SourceLoader::load(settings, &client, llm.clone())?;
    if registry.is_empty() {
        bail!("No sources enabled; check search.sources in the settings");
    }

    match args.command.unwrap_or(Command::Cli) {
        Command::Cli => run_cli(settings, registry, llm).await,
        Command::Serve { port, bind } => {
            let mut settings = settings.clone();
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(bind) = bind {
                settings.server.bind_address = bind;
            }
            serve(settings, registry, llm).await
        }
        Command::Search { query } => run_search(settings, registry, &query).await,
    }
}

fn init_logging(settings: &Settings) {
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_cli(
    settings: &Settings,
    registry: SourceRegistry,
    llm: Arc<dyn LlmBackend>,
) -> Result<()> {
    let search = Arc::new(SearchManager::new(Arc::new(registry)));
    let analyzer = Analyzer::from_settings(settings, llm, search);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    cli::run(&analyzer, stdin, tokio::io::stdout()).await
}

async fn run_search(settings: &Settings, registry: SourceRegistry, query: &str) -> Result<()> {
    let search = SearchManager::new(Arc::new(registry));
    let report = search.search_within(query, settings.search_deadline()).await?;

    let output = serde_json::json!({
        "query": query,
        "number_of_results": report.result_count(),
        "unresponsive_sources": report.unresponsive(),
        "results": report.results(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn serve(settings: Settings, registry: SourceRegistry, llm: Arc<dyn LlmBackend>) -> Result<()> {
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let state = AppState::new(settings, registry, llm)?;
    info!("Application state initialized");

    let app = create_router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
