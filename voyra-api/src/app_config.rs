use serde::Deserialize;
use std::env;

use voyra_domain::capability::Capability;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub plugin: PluginSettings,
    pub backend: BackendSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// What this deployment declares to the Inventory Server. The capability set
/// picks the entry path: declaring RESERVATIONS selects the two-step
/// reserve/confirm model, omitting it selects single-step reserveAndConfirm.
#[derive(Debug, Deserialize, Clone)]
pub struct PluginSettings {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<Capability>,
    #[serde(default = "default_hold_ttl")]
    pub hold_ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// "memory" for the demonstration backend, "http" for a real one.
    pub mode: String,
    #[serde(default = "default_backend_timeout")]
    pub timeout_seconds: u64,
}

fn default_hold_ttl() -> u64 {
    1800
}

fn default_backend_timeout() -> u64 {
    30
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("VOYRA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
