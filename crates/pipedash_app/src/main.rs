mod app;
mod effects;
mod logging;
mod render;

use clap::{Parser, Subcommand};
use pipedash_engine::ClientSettings;

#[derive(Parser)]
#[command(
    name = "pipedash",
    about = "Terminal dashboard for a data pipeline and a ticker watchlist"
)]
struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the pipeline status endpoint and render a live dashboard.
    Watch {
        /// Polling interval in milliseconds.
        #[arg(long, default_value_t = pipedash_core::DEFAULT_INTERVAL_MS)]
        interval_ms: u64,
    },
    /// Manage the ticker watchlist.
    Tickers {
        #[command(subcommand)]
        action: TickerAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum TickerAction {
    /// Print the current watchlist.
    List,
    /// Add a symbol to the watchlist.
    Add { symbol: String },
    /// Remove a symbol from the watchlist.
    Remove { symbol: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(logging::LogDestination::File);

    let settings = ClientSettings {
        base_url: cli.base_url,
        ..ClientSettings::default()
    };

    match cli.command {
        Command::Watch { interval_ms } => app::run_watch(settings, interval_ms),
        Command::Tickers { action } => app::run_tickers(settings, action),
    }
}
