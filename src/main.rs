use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use nbpscraper::{
    config::{Config, Overrides},
    driver,
    fetch::TableFetcher,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Mean buying price and selling-price spread of one currency, from the
/// NBP's daily buy/sell tables.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Currency code as it appears in the tables, e.g. EUR
    currency_code: String,
    /// First day of the range (YYYY-MM-DD)
    start_date: NaiveDate,
    /// Last day of the range, inclusive (YYYY-MM-DD)
    end_date: NaiveDate,

    /// YAML file with table-type, base-url, timeouts and charset
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    table_type: Option<String>,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    connect_timeout_ms: Option<u64>,
    #[arg(long)]
    read_timeout_ms: Option<u64>,
    /// Character encoding of the index files
    #[arg(long)]
    charset: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            table_type: self.table_type.clone(),
            base_url: self.base_url.clone(),
            connect_timeout_ms: self.connect_timeout_ms,
            read_timeout_ms: self.read_timeout_ms,
            charset: self.charset.clone(),
        }
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging (stderr; stdout carries the results) ───────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(code = %args.currency_code, start = %args.start_date, end = %args.end_date, "startup");

    // ─── 2) configuration ───────────────────────────────────────────
    let config = Config::load(args.config.as_deref(), args.overrides())
        .inspect_err(|e| error!(error = %e, "bad configuration"))
        .context("loading configuration")?;

    // ─── 3) fetcher ─────────────────────────────────────────────────
    let fetcher = TableFetcher::from_config(&config)
        .inspect_err(|e| error!(error = %e, "initialisation failed"))
        .context("setting up table fetcher")?;

    // ─── 4) walk the range ──────────────────────────────────────────
    let today = Local::now().date_naive();
    let report = driver::run(
        &fetcher,
        &args.currency_code,
        args.start_date,
        args.end_date,
        today,
    )
    .inspect_err(|e| error!(error = %e, "run failed"))
    .with_context(|| {
        format!(
            "collecting {} rates from {} to {}",
            args.currency_code, args.start_date, args.end_date
        )
    })?;

    // ─── 5) results ─────────────────────────────────────────────────
    println!("{}", report.summary.mean_buying);
    println!("{:.4}", report.summary.selling_std_dev);

    info!(days = report.days, skipped = report.skipped, "all done");
    Ok(())
}
