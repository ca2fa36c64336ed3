//! Case finder MCP Server
//!
//! This binary opens a page in a browser and serves the case list operations
//! (add, delete, search, navigate, summarize) over the Model Context Protocol.

use case_finder::browser::normalize_url;
use case_finder::storage::{JsonFileStore, SharedStore};
use case_finder::{CaseFinderServer, LaunchOptions};
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "case-finder-mcp")]
#[command(version)]
#[command(about = "Case finder MCP server", long_about = None)]
struct Cli {
    /// Page to search (URL, domain or local HTML file)
    #[arg(long)]
    url: String,

    /// JSON file holding the case list
    #[arg(long, value_name = "PATH", default_value = "case_finder_store.json")]
    store: String,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the protocol
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let mut options = LaunchOptions::new().headless(!cli.headed);
    if let Some(path) = &cli.executable_path {
        options = options.chrome_path(path);
    }
    if let Some(dir) = &cli.user_data_dir {
        options = options.user_data_dir(dir);
    }

    eprintln!("Case finder MCP Server v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Browser mode: {}", if options.headless { "headless" } else { "headed" });
    eprintln!("Case store: {}", cli.store);

    let url = normalize_url(&cli.url);
    let store: SharedStore = Arc::new(JsonFileStore::new(&cli.store));
    let service = CaseFinderServer::launch(options, &url, store)
        .map_err(|e| format!("Failed to create case finder server: {}", e))?;

    eprintln!("Page: {}", url);
    eprintln!("Ready to accept MCP connections via stdio");

    let server = service.serve(stdio()).await?;
    let quit_reason = server.waiting().await?;
    eprintln!("Server quit with reason: {:?}", quit_reason);

    Ok(())
}
