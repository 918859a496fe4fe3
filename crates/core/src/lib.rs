pub mod domain;
pub mod evaluate;
pub mod money;
pub mod provider;
pub mod scan;
pub mod time;

pub mod config {
    use anyhow::Context;

    pub const SERPAPI_API_KEY_ENV: &str = "SERPAPI_API_KEY";

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub serpapi_api_key: Option<String>,
        pub serpapi_base_url: Option<String>,
        pub serpapi_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
        where
            F: Fn(&str) -> Option<String>,
        {
            let serpapi_timeout_secs = lookup("SERPAPI_TIMEOUT_SECS")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u64>()
                        .with_context(|| format!("invalid SERPAPI_TIMEOUT_SECS: {s}"))
                })
                .transpose()?;

            Ok(Self {
                serpapi_api_key: lookup(SERPAPI_API_KEY_ENV),
                serpapi_base_url: lookup("SERPAPI_BASE_URL"),
                serpapi_timeout_secs,
                sentry_dsn: lookup("SENTRY_DSN"),
            })
        }

        /// The API key, if one is present and non-blank.
        pub fn serpapi_api_key(&self) -> Option<&str> {
            self.serpapi_api_key
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn blank_api_key_counts_as_missing() {
            let settings = Settings {
                serpapi_api_key: Some("   ".to_string()),
                ..Settings::default()
            };
            assert_eq!(settings.serpapi_api_key(), None);
        }

        #[test]
        fn api_key_is_trimmed() {
            let settings = Settings {
                serpapi_api_key: Some(" abc123\n".to_string()),
                ..Settings::default()
            };
            assert_eq!(settings.serpapi_api_key(), Some("abc123"));
        }

        #[test]
        fn reads_timeout_alongside_other_keys() {
            let settings = Settings::from_lookup(|key| match key {
                "SERPAPI_API_KEY" => Some("k".to_string()),
                "SERPAPI_TIMEOUT_SECS" => Some(" 45 ".to_string()),
                _ => None,
            })
            .unwrap();
            assert_eq!(settings.serpapi_api_key(), Some("k"));
            assert_eq!(settings.serpapi_timeout_secs, Some(45));
            assert_eq!(settings.serpapi_base_url, None);
        }

        #[test]
        fn rejects_unparsable_timeout() {
            let res = Settings::from_lookup(|key| {
                (key == "SERPAPI_TIMEOUT_SECS").then(|| "soon".to_string())
            });
            assert!(res.is_err());
        }
    }
}
