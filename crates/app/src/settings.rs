//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and from `CODEX__*` environment variables, e.g.
//! `CODEX__SERVER__PORT=8080`.
//!
//! See `settings.toml` for an example.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Trade fee and catching-up cost, in downtime days.
#[derive(Debug, Deserialize)]
pub struct Economy {
    pub trade_fee: Option<i64>,
    pub catching_up_cost: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub economy: Option<Economy>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .set_default("server.database", "memory")?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("CODEX").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
