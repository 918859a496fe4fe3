use crate::domain::search::SearchConfig;
use chrono::{Duration, NaiveDate};
use std::fmt;

/// Cursor advance between consecutive windows, independent of trip length.
pub const SCAN_STEP_DAYS: i64 = 7;

/// A "month" of scan horizon is a flat 30 days.
pub const DAYS_PER_HORIZON_MONTH: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub outbound: NaiveDate,
    pub return_date: NaiveDate,
}

impl DateWindow {
    pub fn new(outbound: NaiveDate, trip_days: u32) -> Self {
        Self {
            outbound,
            return_date: outbound + Duration::days(i64::from(trip_days)),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.outbound, self.return_date)
    }
}

/// Exclusive upper bound for outbound dates.
///
/// Panics if the horizon runs past chrono's date range; `SearchConfig::validate` rules that out.
pub fn scan_end(config: &SearchConfig) -> NaiveDate {
    config.start_date + horizon_span(config)
}

/// [`scan_end`], or `None` when it is not a representable date.
pub fn checked_scan_end(config: &SearchConfig) -> Option<NaiveDate> {
    config.start_date.checked_add_signed(horizon_span(config))
}

fn horizon_span(config: &SearchConfig) -> Duration {
    Duration::days(DAYS_PER_HORIZON_MONTH * i64::from(config.horizon_months))
}

/// Weekly windows from `config.start_date` while the outbound date is before [`scan_end`].
pub fn date_windows(config: &SearchConfig) -> impl Iterator<Item = DateWindow> {
    let end = scan_end(config);
    let start = config.start_date;
    let trip_days = config.trip_days;

    std::iter::successors(Some(start), |d| {
        d.checked_add_signed(Duration::days(SCAN_STEP_DAYS))
    })
        .take_while(move |d| *d < end)
        .map(move |d| DateWindow::new(d, trip_days))
}
