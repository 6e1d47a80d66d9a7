use anyhow::{Context, Result};
use clap::Parser;
use gif_search::{
    CoordinatorConfig, FetchConfig, GifFetcher, ResultOrdering, SearchCoordinator, SearchError,
    SearchOutcome, SkipReason, DEFAULT_BASE_URL, DEFAULT_HISTORY_LIMIT, DEFAULT_PAGE_SIZE,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "gif-search")]
#[command(version = "0.1.0")]
#[command(about = "Search GIFs with a session history and result cache", long_about = None)]
struct Cli {
    /// Queries to run in order. Starts an interactive session when empty.
    queries: Vec<String>,

    /// Provider API key
    #[arg(long, env = "GIPHY_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Provider API root
    #[arg(long, env = "GIF_SEARCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Results per search
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    limit: usize,

    #[arg(long, default_value = "g")]
    rating: String,

    #[arg(long, default_value = "en")]
    lang: String,

    /// Give up on a search after this many seconds
    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Number of distinct searches remembered
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_size: usize,

    /// Which finished search may replace the displayed results
    #[arg(long, value_enum, default_value_t = ResultOrdering::LatestIssued)]
    ordering: ResultOrdering,

    /// Forget cached results of searches that drop out of the history
    #[arg(long)]
    evict_with_history: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

/// One line of input in an interactive session.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    History,
    Cache,
    Replay(&'a str),
    /// `:replay` with nothing after it
    ReplayUsage,
    Search(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit" | ":q", _) => Command::Quit,
            (":history" | ":h", _) => Command::History,
            (":cache" | ":c", _) => Command::Cache,
            (":replay" | ":r", target) => match target.trim() {
                "" => Command::ReplayUsage,
                target => Command::Replay(target),
            },
            _ => Command::Search(line),
        }
    }
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            page_size: self.limit,
            rating: self.rating.clone(),
            lang: self.lang.clone(),
            timeout_seconds: self.timeout_seconds,
            ..FetchConfig::default()
        }
    }

    fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            history_limit: self.history_size,
            ordering: self.ordering,
            evict_with_history: self.evict_with_history,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let fetcher = GifFetcher::new(cli.fetch_config()).context("Failed to build HTTP client")?;
    let coordinator = SearchCoordinator::new(fetcher, cli.coordinator_config())?;

    info!("Using {}", coordinator.provider_name());

    if cli.queries.is_empty() {
        run_interactive(&coordinator).await
    } else {
        for query in &cli.queries {
            run_query(&coordinator, query).await;
        }
        Ok(())
    }
}

async fn run_interactive(coordinator: &SearchCoordinator) -> Result<()> {
    println!("Type a search, or :history, :replay <term|#n>, :cache, :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::History => print_history(coordinator).await,
            Command::Cache => {
                println!("{} cached searches", coordinator.cache_len().await);
            }
            Command::Replay(target) => replay(coordinator, target).await,
            Command::ReplayUsage => println!("Usage: :replay <term|#n>"),
            Command::Search(query) => run_query(coordinator, query).await,
        }
    }

    Ok(())
}

async fn run_query(coordinator: &SearchCoordinator, query: &str) {
    match coordinator.submit_query(query).await {
        Ok(outcome) => report(coordinator, outcome).await,
        Err(e) => report_error(e),
    }
}

async fn replay(coordinator: &SearchCoordinator, target: &str) {
    // "#2" picks the second entry shown by :history
    let term = match target.strip_prefix('#').map(str::parse::<usize>) {
        Some(Ok(index)) if index > 0 => match coordinator.history_terms().await.get(index - 1) {
            Some(term) => term.as_str().to_string(),
            None => {
                println!("No history entry #{}", index);
                return;
            }
        },
        Some(_) => {
            println!("History entries are numbered from 1");
            return;
        }
        None => target.to_string(),
    };

    match coordinator.replay_term(&term).await {
        Ok(outcome) => report(coordinator, outcome).await,
        Err(e) => report_error(e),
    }
}

async fn report(coordinator: &SearchCoordinator, outcome: SearchOutcome) {
    match outcome {
        SearchOutcome::Displayed {
            term, from_cache, ..
        } => {
            let source = if from_cache { "cached" } else { "fetched" };
            println!("Results for '{}' ({}):", term, source);
            print_results(coordinator).await;
        }
        SearchOutcome::Skipped(SkipReason::EmptyQuery) => {}
        SearchOutcome::Skipped(SkipReason::AlreadySearched) => {
            println!("Already searched; use :replay to show it again");
        }
        SearchOutcome::Superseded { term, .. } => {
            println!("Results for '{}' arrived after a newer search", term);
        }
        SearchOutcome::Detached => {}
    }
}

fn report_error(e: SearchError) {
    error!("{}", e);
    println!("Search failed: {}", e);
}

async fn print_results(coordinator: &SearchCoordinator) {
    let results = coordinator.current_results().await;
    if results.is_empty() {
        println!("  (no results)");
    }
    for item in results {
        let title = if item.title.is_empty() { "(untitled)" } else { item.title.as_str() };
        println!("  {:>4}x{:<4} {}  {}", item.width, item.height, title, item.url);
    }
}

async fn print_history(coordinator: &SearchCoordinator) {
    let failed = coordinator.failed_terms().await;
    for (index, term) in coordinator.history_terms().await.iter().enumerate() {
        let marker = if failed.contains(term) { " (failed)" } else { "" };
        println!("  #{} {}{}", index + 1, term, marker);
    }
}
