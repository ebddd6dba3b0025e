use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use funding_data::{
    exchange::registry::AdapterSettings, protocols::http::client::HttpSettings,
    shared::models::Venue,
};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "FUNDING_SCANNER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "funding-scanner.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {error}")]
    Read {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/*----- */
// Scanner config
/*----- */
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub server: ServerConfig,
    pub aggregator: AggregatorConfig,
    pub http: HttpConfig,
    pub hyperliquid: HyperliquidConfig,
    /// Base url overrides keyed by venue, e.g. a local mock in staging.
    #[serde(deserialize_with = "de_venue_map")]
    pub venues: HashMap<Venue, String>,
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default = "default_max_in_flight_per_venue")]
    pub max_in_flight_per_venue: usize,
    #[serde(default = "default_compare_timeout_ms")]
    pub compare_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_backoff_min_ms")]
    pub backoff_min_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HyperliquidConfig {
    #[serde(default = "default_burst")]
    pub burst: u32,
    #[serde(default = "default_refill_interval_ms")]
    pub refill_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default, deserialize_with = "de_venue_map")]
    pub endpoints: HashMap<Venue, String>,
    #[serde(default = "default_size")]
    pub default_size: f64,
}

// Venue keyed tables, keys parse like any other venue name
fn de_venue_map<'de, D>(deserializer: D) -> Result<HashMap<Venue, String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    HashMap::<String, String>::deserialize(deserializer)?
        .into_iter()
        .map(|(venue, url)| {
            venue
                .parse::<Venue>()
                .map(|venue| (venue, url))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}

fn default_host() -> String {
    String::from("127.0.0.1")
}

fn default_port() -> u16 {
    8080
}

fn default_max_in_flight_per_venue() -> usize {
    8
}

fn default_compare_timeout_ms() -> u64 {
    30_000
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_max_retries() -> usize {
    3
}

fn default_backoff_min_ms() -> u64 {
    200
}

fn default_backoff_max_ms() -> u64 {
    2_000
}

fn default_burst() -> u32 {
    1
}

fn default_refill_interval_ms() -> u64 {
    100
}

fn default_size() -> f64 {
    1.0
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_in_flight_per_venue: default_max_in_flight_per_venue(),
            compare_timeout_ms: default_compare_timeout_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_min_ms: default_backoff_min_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            burst: default_burst(),
            refill_interval_ms: default_refill_interval_ms(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            endpoints: HashMap::new(),
            default_size: default_size(),
        }
    }
}

impl ScannerConfig {
    /// Load from `FUNDING_SCANNER_CONFIG`, or `funding-scanner.toml` when unset.
    /// A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let path = Path::new(&path);

        if !path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        Self::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_path_buf(),
            error,
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ScannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aggregator.max_in_flight_per_venue == 0 {
            return Err(ConfigError::Invalid(
                "aggregator.max_in_flight_per_venue must be at least 1".into(),
            ));
        }
        if self.aggregator.compare_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "aggregator.compare_timeout_ms must be positive".into(),
            ));
        }
        if self.http.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "http.request_timeout_ms must be positive".into(),
            ));
        }
        if self.http.backoff_min_ms > self.http.backoff_max_ms {
            return Err(ConfigError::Invalid(
                "http.backoff_min_ms cannot exceed http.backoff_max_ms".into(),
            ));
        }
        if self.hyperliquid.burst == 0 {
            return Err(ConfigError::Invalid(
                "hyperliquid.burst must be at least 1".into(),
            ));
        }
        if !self.execution.default_size.is_finite() || self.execution.default_size <= 0.0 {
            return Err(ConfigError::Invalid(
                "execution.default_size must be positive".into(),
            ));
        }
        if let Some(venue) = self
            .venues
            .iter()
            .chain(self.execution.endpoints.iter())
            .find_map(|(venue, url)| url.trim().is_empty().then_some(venue))
        {
            return Err(ConfigError::Invalid(format!("empty url configured for {venue}")));
        }
        Ok(())
    }

    pub fn compare_timeout(&self) -> Duration {
        Duration::from_millis(self.aggregator.compare_timeout_ms)
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            request_timeout: Duration::from_millis(self.http.request_timeout_ms),
            max_retries: self.http.max_retries,
            backoff_min: Duration::from_millis(self.http.backoff_min_ms),
            backoff_max: Duration::from_millis(self.http.backoff_max_ms),
        }
    }

    pub fn adapter_settings(&self) -> AdapterSettings {
        AdapterSettings {
            http: self.http_settings(),
            base_urls: self.venues.clone(),
            hyperliquid_burst: self.hyperliquid.burst,
            hyperliquid_refill_interval: Duration::from_millis(self.hyperliquid.refill_interval_ms),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ScannerConfig::from_toml("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.aggregator.max_in_flight_per_venue, 8);
        assert_eq!(config.compare_timeout(), Duration::from_secs(30));
        assert_eq!(config.http_settings().max_retries, 3);
        assert_eq!(config.adapter_settings().hyperliquid_burst, 1);
        assert_eq!(config.execution.default_size, 1.0);
        assert!(config.venues.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let config = ScannerConfig::from_toml(
            r#"
            [server]
            port = 9090

            [aggregator]
            max_in_flight_per_venue = 2

            [hyperliquid]
            refill_interval_ms = 250

            [venues]
            bybit = "http://127.0.0.1:9000"

            [execution]
            default_size = 0.25

            [execution.endpoints]
            binance = "http://127.0.0.1:7000/binance/open"
            okx = "http://127.0.0.1:7000/okx/open"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.aggregator.max_in_flight_per_venue, 2);
        assert_eq!(config.aggregator.compare_timeout_ms, 30_000);
        assert_eq!(
            config.adapter_settings().hyperliquid_refill_interval,
            Duration::from_millis(250)
        );
        assert_eq!(
            config.adapter_settings().base_url(Venue::Bybit),
            "http://127.0.0.1:9000"
        );
        assert_eq!(config.execution.default_size, 0.25);
        assert_eq!(config.execution.endpoints.len(), 2);
    }

    #[test]
    fn test_invalid_configs() {
        let cases = vec![
            // TC0: zero ceiling
            "[aggregator]\nmax_in_flight_per_venue = 0",
            // TC1: zero timeout
            "[aggregator]\ncompare_timeout_ms = 0",
            // TC2: inverted backoff
            "[http]\nbackoff_min_ms = 5000\nbackoff_max_ms = 100",
            // TC3: negative size
            "[execution]\ndefault_size = -1.0",
            // TC4: unknown venue
            "[venues]\nkraken = \"http://127.0.0.1\"",
            // TC5: empty endpoint
            "[execution.endpoints]\nokx = \"\"",
        ];

        for (index, content) in cases.into_iter().enumerate() {
            assert!(ScannerConfig::from_toml(content).is_err(), "TC{} failed", index);
        }
    }
}
