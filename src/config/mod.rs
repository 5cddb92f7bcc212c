use crate::error::AppError;
use config::{Config as Cfg, File};
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Credential for the generative-language API. Must come from the
    /// environment; when absent the prompt endpoint degrades to a
    /// configuration-error response instead of failing startup.
    pub api_key: Option<Secret<String>>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct WikipediaSettings {
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub gemini: GeminiSettings,
    pub wikipedia: WikipediaSettings,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let server = ServerConfig::load()?;

        let api_key = env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Secret::new);

        Ok(RelayConfig {
            server,
            gemini: GeminiSettings {
                api_key,
                model: get_env("GENAI_TEXT_MODEL", "gemini-2.0-flash"),
            },
            wikipedia: WikipediaSettings {
                api_url: get_env("WIKIPEDIA_API_URL", "https://en.wikipedia.org/w/api.php"),
            },
        })
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
