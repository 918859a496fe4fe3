use crate::domain::search::SearchConfig;
use crate::evaluate::{evaluate, Evaluation, FareAlert};
use crate::money::format_price;
use crate::provider::{FareProvider, QueryOutcome};
use crate::time::window::{date_windows, scan_end, DateWindow};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    pub windows: usize,
    pub skipped: usize,
    pub alerts: Vec<(DateWindow, FareAlert)>,
}

impl ScanSummary {
    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }
}

/// Walks every weekly window in the horizon, one query at a time.
///
/// Per-window failures are logged and absorbed; the scan always runs to the
/// end of the horizon.
pub async fn run_scan<P>(config: &SearchConfig, provider: &P) -> ScanSummary
where
    P: FareProvider + ?Sized,
{
    tracing::info!(
        provider = provider.provider_name(),
        origin = %config.origin,
        destination = %config.destination,
        cabin = %config.cabin,
        horizon_months = config.horizon_months,
        start_date = %config.start_date,
        end_date = %scan_end(config),
        target = %format_price(&config.currency, config.target_price),
        "starting fare scan"
    );

    let mut summary = ScanSummary::default();

    for window in date_windows(config) {
        summary.windows += 1;
        tracing::info!(%window, n = summary.windows, "scanning window");

        match provider.search(config, window).await {
            QueryOutcome::Found(result) => {
                if let Evaluation::TargetMet(alert) = evaluate(&result, &window, config) {
                    summary.alerts.push((window, alert));
                }
            }
            QueryOutcome::Skipped(reason) => {
                summary.skipped += 1;
                tracing::debug!(%window, %reason, "window skipped");
            }
        }

        if !config.pause.is_zero() {
            tokio::time::sleep(config.pause).await;
        }
    }

    tracing::info!(
        windows = summary.windows,
        skipped = summary.skipped,
        alerts = summary.alert_count(),
        "fare scan finished"
    );

    summary
}
