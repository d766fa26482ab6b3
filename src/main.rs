// src/main.rs
mod extractors;
mod report;
mod sources;
mod storage;
mod utils;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use extractors::SelectorConfig;
use report::ReportBuilder;
use sources::{currency, isin, FetchConfig, HttpPageFetcher, SiteLayout, YahooRateProvider};
use storage::StorageManager;
use utils::AppError;

/// Scrapes equity and currency data into normalized JSON reports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Pause before every HTTP request, in milliseconds
    #[arg(long, env = "STOCK_DELAY_MS", default_value_t = 1000, global = true)]
    delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "STOCK_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the full report for a ticker and save it as JSON
    Report {
        /// Ticker symbol of the company
        #[arg(short, long, required_unless_present = "isin", conflicts_with = "isin")]
        ticker: Option<String>,

        /// ISIN to resolve to a ticker instead
        #[arg(long)]
        isin: Option<String>,

        /// Output directory for the JSON report
        #[arg(short, long, env = "STOCK_OUTPUT_DIR", default_value = "./data")]
        output_dir: PathBuf,

        /// JSON file overriding the default CSS selectors
        #[arg(long, env = "STOCK_SELECTORS")]
        selectors: Option<PathBuf>,

        /// Root URL of the data site
        #[arg(long, env = "STOCK_BASE_URL", default_value = SiteLayout::DEFAULT_BASE)]
        base_url: String,
    },

    /// Print how many EUR one USD buys
    Usd {
        /// Currency pair symbol quoting USD per EUR
        #[arg(short, long, default_value = currency::DEFAULT_PAIR)]
        symbol: String,
    },

    /// Resolve an ISIN to its ticker symbol
    Isin {
        isin: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    let fetch_config = FetchConfig {
        delay: Duration::from_millis(args.delay_ms),
        timeout: Duration::from_secs(args.timeout_secs),
        ..FetchConfig::default()
    };

    match args.command {
        Command::Report {
            ticker,
            isin,
            output_dir,
            selectors,
            base_url,
        } => {
            let ticker = match (ticker, isin) {
                (Some(ticker), _) => ticker,
                (None, Some(isin)) => resolve_isin(&isin)?.to_string(),
                (None, None) => return Err(AppError::Config("either --ticker or --isin is required".to_string())),
            };
            run_report(&ticker, &output_dir, selectors.as_deref(), &base_url, &fetch_config).await
        }
        Command::Usd { symbol } => {
            let provider = YahooRateProvider::new(&fetch_config)?;
            let rate = currency::usd_per_eur(&provider, &symbol).await?;
            tracing::info!("USD/EUR from {}: {:.4}", symbol, rate);
            println!("{:.4}", rate);
            Ok(())
        }
        Command::Isin { isin } => {
            println!("{}", resolve_isin(&isin)?);
            Ok(())
        }
    }
}

fn resolve_isin(isin: &str) -> Result<&'static str, AppError> {
    isin::ticker_for_isin(isin)
        .ok_or_else(|| AppError::Config(format!("ISIN {} is not mapped to a ticker", isin)))
}

async fn run_report(
    ticker: &str,
    output_dir: &std::path::Path,
    selectors_file: Option<&std::path::Path>,
    base_url: &str,
    fetch_config: &FetchConfig,
) -> Result<(), AppError> {
    // 3. Selector configuration, validated before any request goes out
    let selector_config = match selectors_file {
        Some(path) => {
            tracing::info!("Loading selectors from {}", path.display());
            SelectorConfig::load(path)?
        }
        None => SelectorConfig::default(),
    };
    let selectors = selector_config.compile()?;

    // 4. Initialize storage and the fetcher
    let storage = StorageManager::new(output_dir)?;
    let fetcher = HttpPageFetcher::new(fetch_config)?;
    let builder = ReportBuilder::new(SiteLayout::new(base_url)?, selectors);

    // 5. Extract and save
    let report = builder.build_report(ticker, &fetcher).await?;
    let path = storage.save_report(&report)?;

    tracing::info!("Report for {} ({}) saved to {}", report.company_name, report.ticker, path.display());
    for (section, count) in report.section_counts() {
        tracing::info!("  {}: {} items", section, count);
    }
    tracing::info!("Last updated: {}", report.last_updated);

    Ok(())
}
