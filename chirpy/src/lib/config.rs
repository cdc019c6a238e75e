use std::env;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_seconds: i64,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (CHIRPY_JWT__SECRET, CHIRPY_SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: CHIRPY_DATABASE__PATH=/var/lib/chirpy.json overrides database.path
            .add_source(
                Environment::with_prefix("CHIRPY")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::from_builder(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        ConfigBuilder::builder()
            .set_default("server.http_port", 8080)?
            .set_default("server.static_dir", ".")?
            .set_default("database.path", "database.json")?
            .set_default("jwt.secret", "")?
            .set_default("jwt.expiration_seconds", 3600)
    }

    fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;

        if config.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (CHIRPY_JWT__SECRET)".to_string(),
            ));
        }
        if config.jwt.expiration_seconds < 1 {
            return Err(ConfigError::Message(
                "jwt.expiration_seconds must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}
