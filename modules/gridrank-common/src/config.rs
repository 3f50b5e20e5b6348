use anyhow::Result;

/// Application configuration loaded from environment variables.
/// Holds the backend endpoint, its API key, and optional overrides for the
/// polling cadences; everything else is carried in code defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Backend API
    pub api_base_url: String,
    pub api_key: String,

    // Polling overrides (seconds)
    pub poll_interval_secs: Option<u64>,
    pub poll_timeout_secs: Option<u64>,
    pub watch_interval_secs: Option<u64>,

    // Inputs for the tracker binary
    pub listing_id: Option<i64>,
    pub keywords: Vec<String>,
    pub language: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_base_url: std::env::var("GRIDRANK_API_URL")?,
            api_key: std::env::var("GRIDRANK_API_KEY")?,
            poll_interval_secs: parse_opt("GRIDRANK_POLL_INTERVAL_SECS")?,
            poll_timeout_secs: parse_opt("GRIDRANK_POLL_TIMEOUT_SECS")?,
            watch_interval_secs: parse_opt("GRIDRANK_WATCH_INTERVAL_SECS")?,
            listing_id: parse_opt("GRIDRANK_LISTING_ID")?,
            keywords: std::env::var("GRIDRANK_KEYWORDS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            language: std::env::var("GRIDRANK_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  GRIDRANK_API_URL: {}", self.api_base_url);
        tracing::info!("  GRIDRANK_API_KEY: {}", preview(&self.api_key));
    }
}

fn parse_opt<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(Some(raw.parse()?)),
        Err(_) => Ok(None),
    }
}
