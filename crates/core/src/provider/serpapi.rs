use crate::config::{Settings, SERPAPI_API_KEY_ENV};
use crate::domain::fare::FareQueryResult;
use crate::domain::search::SearchConfig;
use crate::provider::{FareProvider, QueryOutcome, SkipReason};
use crate::time::window::DateWindow;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const SEARCH_PATH: &str = "/search.json";
const ENGINE: &str = "google_flights";
const ROUND_TRIP: &str = "1";

#[derive(Debug, Clone)]
pub struct SerpApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SerpApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .serpapi_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = settings
            .serpapi_timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(
            base_url,
            settings.serpapi_api_key().map(str::to_string),
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build SerpApi http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEARCH_PATH)
    }

    fn query_params(
        config: &SearchConfig,
        window: DateWindow,
        api_key: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("engine", ENGINE.to_string()),
            ("hl", config.language.clone()),
            ("gl", config.country.clone()),
            ("currency", config.currency.clone()),
            ("departure_id", config.origin.clone()),
            ("arrival_id", config.destination.clone()),
            ("outbound_date", window.outbound.format("%Y-%m-%d").to_string()),
            ("return_date", window.return_date.format("%Y-%m-%d").to_string()),
            ("travel_class", config.cabin.travel_class_code().to_string()),
            ("type", ROUND_TRIP.to_string()),
            ("api_key", api_key.to_string()),
        ]
    }

    async fn fetch_once(
        &self,
        config: &SearchConfig,
        window: DateWindow,
        api_key: &str,
    ) -> Result<(StatusCode, String)> {
        let res = self
            .http
            .get(self.url())
            .query(&Self::query_params(config, window, api_key))
            .send()
            .await
            // The request URL carries the API key.
            .map_err(|e| e.without_url())
            .context("SerpApi request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("failed to read SerpApi response")?;
        Ok((status, text))
    }
}

#[async_trait::async_trait]
impl FareProvider for SerpApiClient {
    fn provider_name(&self) -> &'static str {
        "serpapi_google_flights"
    }

    async fn search(&self, config: &SearchConfig, window: DateWindow) -> QueryOutcome {
        tracing::info!(
            origin = %config.origin,
            destination = %config.destination,
            outbound = %window.outbound,
            return_date = %window.return_date,
            "searching flights"
        );

        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            tracing::error!("{SERPAPI_API_KEY_ENV} is not set; skipping query");
            return QueryOutcome::Skipped(SkipReason::MissingCredential);
        };

        let outcome = match self.fetch_once(config, window, api_key).await {
            Ok((status, body)) => classify_response(status, &body),
            Err(err) => QueryOutcome::Skipped(SkipReason::Transport(format!("{err:#}"))),
        };

        match outcome.skip_reason() {
            Some(SkipReason::ProviderError(msg)) => {
                tracing::warn!(%window, error = %msg, "SerpApi returned an error");
            }
            Some(reason) => {
                tracing::warn!(%window, %reason, "flight search failed; skipping window");
            }
            None => {}
        }

        outcome
    }
}

/// Maps a raw SerpApi response onto a [`QueryOutcome`].
///
/// An `error` field wins over the HTTP status, since SerpApi reports
/// both invalid keys (4xx) and empty searches (200) that way.
pub fn classify_response(status: StatusCode, body: &str) -> QueryOutcome {
    let raw = match serde_json::from_str::<Value>(body) {
        Ok(v) => v,
        Err(err) => {
            if !status.is_success() {
                return QueryOutcome::Skipped(SkipReason::Transport(format!("HTTP {status}")));
            }
            return QueryOutcome::Skipped(SkipReason::MalformedResponse(format!(
                "response is not valid JSON: {err}"
            )));
        }
    };

    if let Some(error) = raw.get("error") {
        let msg = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return QueryOutcome::Skipped(SkipReason::ProviderError(msg));
    }

    if !status.is_success() {
        return QueryOutcome::Skipped(SkipReason::Transport(format!("HTTP {status}")));
    }

    match serde_json::from_value::<FareQueryResult>(raw) {
        Ok(parsed) => QueryOutcome::Found(parsed),
        Err(err) => QueryOutcome::Skipped(SkipReason::MalformedResponse(err.to_string())),
    }
}
