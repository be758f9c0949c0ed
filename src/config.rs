//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Electricity Maps ===
    /// Bearer token for the Electricity Maps API. Not validated; an absent
    /// token is sent as an empty bearer value.
    #[serde(default)]
    pub electricity_maps_api_token: String,

    /// Carbon intensity history endpoint, zone included.
    #[serde(default = "default_api_url")]
    pub electricity_maps_api_url: String,

    // === Server Configuration ===
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Install the Prometheus recorder and expose `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Log filter directive (`info`, `carbon_dashboard=debug,info`, ...).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub log_json: bool,
}

fn default_api_url() -> String {
    "https://api.electricitymap.org/v3/carbon-intensity/history?zone=GB".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            electricity_maps_api_token: String::new(),
            electricity_maps_api_url: default_api_url(),
            bind_address: default_bind_address(),
            port: default_port(),
            metrics_enabled: default_true(),
            rust_log: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.electricity_maps_api_url.as_str();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err("ELECTRICITY_MAPS_API_URL must be an http(s) URL".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        Ok(())
    }

    /// Log filter to install; `verbose` forces debug output for this crate.
    pub fn log_directive(&self, verbose: bool) -> &str {
        if verbose {
            "carbon_dashboard=debug,tower_http=debug,info"
        } else {
            &self.rust_log
        }
    }

    /// Whether a non-empty API token is configured.
    pub fn has_token(&self) -> bool {
        !self.electricity_maps_api_token.is_empty()
    }

    /// The token with all but its last four characters hidden.
    pub fn masked_token(&self) -> String {
        let token = &self.electricity_maps_api_token;
        let visible = token.chars().count().saturating_sub(4);
        token
            .chars()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { c })
            .collect()
    }
}
