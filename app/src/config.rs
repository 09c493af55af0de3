use config::{Config as ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::tmdb::{DEFAULT_LANGUAGE, TMDB_BASE_URL};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_language: String,
    pub tmdb_base_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

impl Config {
    /// Layers defaults, an optional `config.toml`, then the environment (`.env` included).
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = ConfigBuilder::builder()
            .set_default("tmdb_language", DEFAULT_LANGUAGE)?
            .set_default("tmdb_base_url", TMDB_BASE_URL)?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000u16)?
            .set_default("static_dir", "app/static")?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::default())
            .build()?;

        let parsed: Config = config.try_deserialize().map_err(|e| {
            anyhow::anyhow!("invalid configuration ({e}); is TMDB_API_KEY set?")
        })?;

        if parsed.tmdb_api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("TMDB_API_KEY environment variable not set"));
        }

        Ok(parsed)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
