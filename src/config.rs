use serde::Deserialize;
use crate::error::{Result, AppError};
use std::time::Duration;
use config::{builder::DefaultState, Config as ConfigLoader, ConfigBuilder, Environment, File};

pub const DEFAULT_REGISTRY_URL: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

// Optional file looked up in the working directory (registry-gate.toml, .json, ...)
const CONFIG_FILE: &str = "registry-gate";
// GATE_REQUEST_LIMIT, GATE_TIME_UNIT, GATE_REGISTRY_URL, ...
const ENV_PREFIX: &str = "GATE";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[serde(alias = "seconds")]
    Second,
    #[serde(alias = "minutes")]
    Minute,
    #[serde(alias = "hours")]
    Hour,
    #[serde(alias = "days")]
    Day,
}

impl TimeUnit {
    pub fn duration(self) -> Duration {
        match self {
            TimeUnit::Second => Duration::from_secs(1),
            TimeUnit::Minute => Duration::from_secs(60),
            TimeUnit::Hour => Duration::from_secs(60 * 60),
            TimeUnit::Day => Duration::from_secs(24 * 60 * 60),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // General
    pub log_level: String,
    pub log_format: LogFormat,

    // Registry
    pub registry_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,

    // Rate limiting. Kept signed so that a negative value from the
    // environment surfaces as InvalidConfiguration instead of a parse error.
    pub request_limit: i64,
    pub time_unit: TimeUnit,
    #[serde(default)]
    pub window_ms: Option<u64>,
    #[serde(default)]
    pub acquire_timeout_ms: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let builder = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Self::environment());

        Self::from_builder(builder)
    }

    /// `GATE_*` variables, e.g. `GATE_REQUEST_LIMIT=5` sets `request_limit`.
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX).try_parsing(true)
    }

    /// Builder pre-populated with every default, ready for more sources.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = ConfigLoader::builder()
            .set_default("log_level", "info")?
            .set_default("log_format", "text")?
            .set_default("registry_url", DEFAULT_REGISTRY_URL)?
            .set_default("connect_timeout_ms", 2_000)?
            .set_default("request_timeout_ms", 10_000)?
            .set_default("request_limit", 10)?
            .set_default("time_unit", "second")?;

        Ok(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Length of the sliding window. `window_ms` wins over `time_unit`.
    pub fn window(&self) -> Duration {
        match self.window_ms {
            Some(ms) => Duration::from_millis(ms),
            None => self.time_unit.duration(),
        }
    }

    pub fn request_limit(&self) -> Result<u32> {
        u32::try_from(self.request_limit).map_err(|_| {
            AppError::InvalidConfiguration(format!(
                "request_limit must be a positive integer, got {}",
                self.request_limit
            ))
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn acquire_timeout(&self) -> Option<Duration> {
        self.acquire_timeout_ms.map(Duration::from_millis)
    }
}
