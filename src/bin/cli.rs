//! case-finder command line
//!
//! Edits the persisted case list and drives a browser window in which matching
//! table rows are highlighted.

use case_finder::browser::normalize_url;
use case_finder::matcher::HighlightStyle;
use case_finder::storage::{JsonFileStore, SharedStore};
use case_finder::{BrowserSession, CaseFinderError, LaunchOptions, ListManager, MatchStatus, UpdateDispatcher};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "case-finder")]
#[command(version)]
#[command(about = "Find and cycle through case numbers in web page tables", long_about = None)]
struct Cli {
    /// JSON file holding the case list
    #[arg(long, value_name = "PATH", default_value = "case_finder_store.json")]
    store: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the case list, newest first
    List,

    /// Add case numbers to the front of the list
    Add {
        #[arg(required = true)]
        cases: Vec<String>,
    },

    /// Remove a case number from the list
    Delete { case_number: String },

    /// Open a page, highlight matches and follow Enter / button navigation
    Watch {
        #[command(flatten)]
        page: PageArgs,

        /// Restore the last saved match position
        #[arg(long)]
        resume: bool,

        /// How often page input is polled, in milliseconds
        #[arg(long, default_value = "200")]
        poll_ms: u64,
    },

    /// Open a page and show the matching rows as a summary document
    Summary {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(clap::Args)]
struct PageArgs {
    /// Page to search (URL, domain or local HTML file)
    #[arg(long)]
    url: String,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<String>,
}

impl PageArgs {
    fn launch(&self, store: &SharedStore) -> anyhow::Result<(Arc<BrowserSession>, ListManager)> {
        let mut options = LaunchOptions::new().headless(!self.headed);
        if let Some(path) = &self.executable_path {
            options = options.chrome_path(path);
        }

        let url = normalize_url(&self.url);
        log::info!("Opening {}", url);

        let session = Arc::new(BrowserSession::launch(options)?);
        session.navigate(&url)?;

        let (channel, _host) = session.attach_active_page(store.clone(), HighlightStyle::default())?;
        let dispatcher = Arc::new(UpdateDispatcher::new(Some(Arc::new(channel))));

        let mut manager = ListManager::new(store.clone(), dispatcher).with_viewer(session.clone());
        manager.load();
        Ok((session, manager))
    }
}

fn offline_manager(store: &SharedStore) -> ListManager {
    let mut manager = ListManager::new(store.clone(), Arc::new(UpdateDispatcher::detached()));
    manager.load();
    manager
}

fn print_cases(manager: &ListManager) {
    if manager.cases().is_empty() {
        println!("(no cases)");
    }
    for case_number in manager.cases().as_slice() {
        println!("{}", case_number);
    }
}

fn print_status(status: &MatchStatus) {
    match &status.counter {
        Some(counter) => println!("Match {}", counter),
        None => println!("No matches"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let store: SharedStore = Arc::new(JsonFileStore::new(&cli.store));

    match cli.command {
        Command::List => {
            print_cases(&offline_manager(&store));
        }
        Command::Add { cases } => {
            let mut manager = offline_manager(&store);
            for case_number in cases {
                match manager.add(&case_number).await {
                    Ok(()) => {}
                    Err(CaseFinderError::AlreadyExists(existing)) => {
                        eprintln!("'{}' is already in the list", existing);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            print_cases(&manager);
        }
        Command::Delete { case_number } => {
            let mut manager = offline_manager(&store);
            manager.delete(&case_number).await?;
            print_cases(&manager);
        }
        Command::Watch { page, resume, poll_ms } => {
            let (_session, manager) = page.launch(&store)?;

            let status = if resume {
                manager.resume().await
            } else {
                manager.request_search(None).await
            };
            let mut last = status.clone();
            if let Some(status) = &status {
                print_status(status);
            }

            eprintln!("Watching for Enter / Shift+Enter and button clicks, Ctrl+C to quit");
            let mut ticker = tokio::time::interval(Duration::from_millis(poll_ms.max(20)));
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = ticker.tick() => {
                        let polled = manager.poll_input().await;
                        if polled != last {
                            if let Some(status) = &polled {
                                print_status(status);
                            }
                            last = polled;
                        }
                    }
                }
            }
        }
        Command::Summary { page } => {
            let headed = page.headed;
            let (_session, manager) = page.launch(&store)?;

            let rows = manager.summarize().await;
            for row in &rows {
                println!("{}", row.cells.join("\t"));
            }
            eprintln!("{} matching rows", rows.len());

            if headed {
                eprintln!("Summary opened in a new tab, Ctrl+C to quit");
                tokio::signal::ctrl_c().await?;
            }
        }
    }

    Ok(())
}
