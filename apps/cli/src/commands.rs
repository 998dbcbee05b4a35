//! CLI definition, tracing setup, and the scrape command.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use heritage_core::{ProgressReporter, ScrapeOutcome};
use heritage_shared::{ScrapeConfig, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Scrape Vietnam's special national heritage sites from Wikipedia.
#[derive(Parser)]
#[command(
    name = "heritage-scraper",
    version,
    about = "Scrape Vietnam's special national heritage sites from Wikipedia into JSON and CSV.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// TOML file overriding the built-in run parameters.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "heritage=info",
        1 => "heritage=debug",
        _ => "heritage=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

/// Load configuration, run one scrape, and print the summary.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let app_config = load_config(cli.config.as_deref())?;
    let config = ScrapeConfig::try_from(&app_config)?;

    info!(
        url = %config.listing_url,
        backend = ?config.backend,
        output = %config.output_dir.display(),
        "starting scrape"
    );

    let reporter = CliProgress::new();
    let outcome = heritage_core::run_with_session(&config, &reporter).await;
    if outcome.is_err() {
        reporter.abandon();
    }
    let outcome = outcome?;

    println!();
    println!("  Scrape finished!");
    println!("  Sites:     {}", outcome.total);
    println!("  Filtered:  {}", outcome.filtered);
    println!(
        "  Details:   {} loaded, {} failed",
        outcome.details_loaded, outcome.details_failed
    );
    for file in &outcome.files {
        println!("  Wrote:     {}", file.display());
    }
    println!("  Time:      {:.1}s", outcome.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Spinner while loading the listing, then a bar over the detail pass.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .expect("valid progress template")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn abandon(&self) {
        self.bar.abandon();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn site_started(&self, name: &str, current: usize, total: usize) {
        if current == 1 {
            self.bar.set_length(total as u64);
            self.bar.set_style(
                ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {wide_msg}")
                    .expect("valid progress template"),
            );
        }
        self.bar.set_position((current - 1) as u64);
        self.bar.set_message(name.to_string());
    }

    fn done(&self, _outcome: &ScrapeOutcome) {
        self.bar.finish_and_clear();
    }
}
