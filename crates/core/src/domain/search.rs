use crate::time::window::{checked_scan_end, SCAN_STEP_DAYS};
use anyhow::{bail, ensure, Context};
use chrono::{Duration as DateDuration, NaiveDate};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_ORIGIN: &str = "SAO";
const DEFAULT_DESTINATION: &str = "BOS";
const DEFAULT_CURRENCY: &str = "BRL";
const DEFAULT_TARGET_PRICE: f64 = 8000.00;
const DEFAULT_TRIP_DAYS: u32 = 7;
const DEFAULT_HORIZON_MONTHS: u32 = 6;
const DEFAULT_LANGUAGE: &str = "pt";
const DEFAULT_COUNTRY: &str = "br";
const DEFAULT_PAUSE_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Numeric `travel_class` code understood by the Google Flights engine.
    pub fn travel_class_code(self) -> u8 {
        match self {
            CabinClass::Economy => 1,
            CabinClass::PremiumEconomy => 2,
            CabinClass::Business => 3,
            CabinClass::First => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CabinClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Ok(match normalized.as_str() {
            "economy" | "1" => CabinClass::Economy,
            "premium_economy" | "2" => CabinClass::PremiumEconomy,
            "business" | "3" => CabinClass::Business,
            "first" | "4" => CabinClass::First,
            _ => bail!("unknown cabin class: {s:?}"),
        })
    }
}

/// Route, cabin, threshold and horizon for one scan. Built once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub origin: String,
    pub destination: String,
    pub cabin: CabinClass,
    pub currency: String,
    pub target_price: f64,
    pub trip_days: u32,
    pub start_date: NaiveDate,
    pub horizon_months: u32,

    /// Provider locale hints (`hl` / `gl`).
    pub language: String,
    pub country: String,

    /// Fixed pause between consecutive provider requests.
    pub pause: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            cabin: CabinClass::Business,
            currency: DEFAULT_CURRENCY.to_string(),
            target_price: DEFAULT_TARGET_PRICE,
            trip_days: DEFAULT_TRIP_DAYS,
            start_date: NaiveDate::from_ymd_opt(2025, 4, 17).unwrap_or_default(),
            horizon_months: DEFAULT_HORIZON_MONTHS,
            language: DEFAULT_LANGUAGE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            pause: Duration::from_millis(DEFAULT_PAUSE_MS),
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Overlays `FAREWATCH_*` values from `lookup` onto the defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut out = Self::default();

        if let Some(v) = get("FAREWATCH_ORIGIN") {
            out.origin = v.to_ascii_uppercase();
        }
        if let Some(v) = get("FAREWATCH_DESTINATION") {
            out.destination = v.to_ascii_uppercase();
        }
        if let Some(v) = get("FAREWATCH_CABIN") {
            out.cabin = v.parse::<CabinClass>().context("invalid FAREWATCH_CABIN")?;
        }
        if let Some(v) = get("FAREWATCH_CURRENCY") {
            out.currency = v.to_ascii_uppercase();
        }
        if let Some(v) = get("FAREWATCH_TARGET_PRICE") {
            out.target_price = v
                .parse::<f64>()
                .with_context(|| format!("invalid FAREWATCH_TARGET_PRICE: {v}"))?;
        }
        if let Some(v) = get("FAREWATCH_TRIP_DAYS") {
            out.trip_days = v
                .parse::<u32>()
                .with_context(|| format!("invalid FAREWATCH_TRIP_DAYS: {v}"))?;
        }
        if let Some(v) = get("FAREWATCH_START_DATE") {
            out.start_date = NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .with_context(|| format!("invalid FAREWATCH_START_DATE: {v}"))?;
        }
        if let Some(v) = get("FAREWATCH_HORIZON_MONTHS") {
            out.horizon_months = v
                .parse::<u32>()
                .with_context(|| format!("invalid FAREWATCH_HORIZON_MONTHS: {v}"))?;
        }
        if let Some(v) = get("FAREWATCH_LANGUAGE") {
            out.language = v;
        }
        if let Some(v) = get("FAREWATCH_COUNTRY") {
            out.country = v;
        }
        if let Some(v) = get("FAREWATCH_PAUSE_MS") {
            let ms = v
                .parse::<u64>()
                .with_context(|| format!("invalid FAREWATCH_PAUSE_MS: {v}"))?;
            out.pause = Duration::from_millis(ms);
        }

        Ok(out)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.origin.trim().is_empty(), "origin must be non-empty");
        ensure!(
            !self.destination.trim().is_empty(),
            "destination must be non-empty"
        );
        ensure!(
            self.origin != self.destination,
            "origin and destination must differ (both {})",
            self.origin
        );
        ensure!(!self.currency.trim().is_empty(), "currency must be non-empty");
        ensure!(
            self.target_price.is_finite() && self.target_price > 0.0,
            "target price must be a positive number (got {})",
            self.target_price
        );
        ensure!(self.trip_days >= 1, "trip duration must be at least 1 day");
        ensure!(
            self.horizon_months >= 1,
            "scan horizon must be at least 1 month"
        );

        // Every outbound is before the end, so this bounds every return date and cursor step.
        let end = checked_scan_end(self).with_context(|| {
            format!(
                "scan horizon of {} months from {} runs past the supported date range",
                self.horizon_months, self.start_date
            )
        })?;
        let reach = i64::from(self.trip_days).max(SCAN_STEP_DAYS);
        ensure!(
            end.checked_add_signed(DateDuration::days(reach)).is_some(),
            "trip duration of {} days runs past the supported date range",
            self.trip_days
        );
        Ok(())
    }
}
