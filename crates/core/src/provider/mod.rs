pub mod serpapi;

use crate::domain::fare::FareQueryResult;
use crate::domain::search::SearchConfig;
use crate::time::window::DateWindow;
use std::fmt;

/// Why a query produced no result. The scan treats every variant the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingCredential,
    ProviderError(String),
    Transport(String),
    MalformedResponse(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCredential => f.write_str("missing API credential"),
            SkipReason::ProviderError(msg) => write!(f, "provider error: {msg}"),
            SkipReason::Transport(msg) => write!(f, "transport failure: {msg}"),
            SkipReason::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Found(FareQueryResult),
    Skipped(SkipReason),
}

impl QueryOutcome {
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            QueryOutcome::Found(_) => None,
            QueryOutcome::Skipped(reason) => Some(reason),
        }
    }
}

/// Round-trip fare search for one date window.
///
/// Implementations never fail the caller: every failure is reported as
/// [`QueryOutcome::Skipped`] so the scan can move on to the next window.
#[async_trait::async_trait]
pub trait FareProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn search(&self, config: &SearchConfig, window: DateWindow) -> QueryOutcome;
}
