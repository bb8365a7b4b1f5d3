use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_DATABASE_URL, APP_PORT, ...
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("database_url", "sqlite://fitness_booking.db")?
            .set_default("max_connections", 5)?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8000)?
            .build()?;

        config.try_deserialize()
    }
}
