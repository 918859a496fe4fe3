use anyhow::Context;
use clap::Parser;
use farewatch_core::domain::search::{CabinClass, SearchConfig};
use farewatch_core::money::format_price;
use farewatch_core::provider::serpapi::SerpApiClient;
use farewatch_core::time::window::{date_windows, DateWindow};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "farewatch_worker")]
struct Args {
    /// Origin airport or city code (e.g. SAO).
    #[arg(long)]
    origin: Option<String>,

    /// Destination airport or city code (e.g. BOS).
    #[arg(long)]
    destination: Option<String>,

    /// economy | premium_economy | business | first
    #[arg(long)]
    cabin: Option<CabinClass>,

    #[arg(long)]
    currency: Option<String>,

    /// Alert when the lowest fare is at or below this amount.
    #[arg(long)]
    target_price: Option<f64>,

    #[arg(long)]
    trip_days: Option<u32>,

    /// First outbound date (YYYY-MM-DD).
    #[arg(long)]
    start_date: Option<chrono::NaiveDate>,

    /// Scan span; each month counts as 30 days.
    #[arg(long)]
    horizon_months: Option<u32>,

    /// Pause between provider requests, in milliseconds.
    #[arg(long)]
    pause_ms: Option<u64>,

    /// List the date windows without querying the provider.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn apply(&self, mut config: SearchConfig) -> SearchConfig {
        if let Some(v) = &self.origin {
            config.origin = v.trim().to_ascii_uppercase();
        }
        if let Some(v) = &self.destination {
            config.destination = v.trim().to_ascii_uppercase();
        }
        if let Some(v) = self.cabin {
            config.cabin = v;
        }
        if let Some(v) = &self.currency {
            config.currency = v.trim().to_ascii_uppercase();
        }
        if let Some(v) = self.target_price {
            config.target_price = v;
        }
        if let Some(v) = self.trip_days {
            config.trip_days = v;
        }
        if let Some(v) = self.start_date {
            config.start_date = v;
        }
        if let Some(v) = self.horizon_months {
            config.horizon_months = v;
        }
        if let Some(v) = self.pause_ms {
            config.pause = Duration::from_millis(v);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = farewatch_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "invalid search configuration");
            return Err(err);
        }
    };

    if args.dry_run {
        dry_run(&config);
        return Ok(());
    }

    let provider = SerpApiClient::from_settings(&settings)?;
    let summary = farewatch_core::scan::run_scan(&config, &provider).await;

    for (window, alert) in &summary.alerts {
        tracing::info!(
            %window,
            price = %format_price(&config.currency, alert.price),
            airline = alert.airline.as_deref().unwrap_or("unknown"),
            "low fare"
        );
    }
    tracing::info!(alerts = summary.alert_count(), "scan complete; total low-fare alerts");

    Ok(())
}

/// Logs the windows a scan would query. Needs no credential and makes no request.
fn dry_run(config: &SearchConfig) -> Vec<DateWindow> {
    let windows: Vec<_> = date_windows(config).collect();
    for window in &windows {
        tracing::info!(%window, "would query");
    }
    tracing::info!(
        dry_run = true,
        windows = windows.len(),
        target = %format_price(&config.currency, config.target_price),
        "fare scan windows (dry-run)"
    );
    windows
}

fn build_config(args: &Args) -> anyhow::Result<SearchConfig> {
    let config = args.apply(SearchConfig::from_env()?);
    config.validate().context("search configuration rejected")?;
    Ok(config)
}

fn init_sentry(settings: &farewatch_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
