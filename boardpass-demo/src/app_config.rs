use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_cadence_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_cadence_ms")]
    pub interval_ms: u64,
}

fn default_cadence_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    pub passengers: Vec<PassengerEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PassengerEntry {
    pub first_name: String,
    pub last_name: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("BOARDPASS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
