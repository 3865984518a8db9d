use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use kindred_assistant::AssistantConfig;
use kindred_core::directory::DEFAULT_SEARCH_DEBOUNCE;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// `None` serves the catalog bundled into the binary.
    pub catalog_path: Option<PathBuf>,
    pub search_debounce: Duration,
    pub assistant: AssistantConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("KINDRED_HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port: u16 = std::env::var("KINDRED_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("KINDRED_PORT must be a port number")?;
        let db_path = std::env::var("KINDRED_DB_PATH").unwrap_or_else(|_| "kindred.db".into());
        let catalog_path = std::env::var("KINDRED_CATALOG_PATH").ok().map(PathBuf::from);

        let search_debounce = match std::env::var("KINDRED_SEARCH_DEBOUNCE_MS") {
            Ok(ms) => Duration::from_millis(
                ms.parse()
                    .context("KINDRED_SEARCH_DEBOUNCE_MS must be milliseconds")?,
            ),
            Err(_) => DEFAULT_SEARCH_DEBOUNCE,
        };

        let mut assistant = AssistantConfig {
            api_key: std::env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty()),
            ..AssistantConfig::default()
        };
        if let Ok(model) = std::env::var("KINDRED_CHAT_MODEL") {
            assistant.model = model;
        }
        if let Ok(base_url) = std::env::var("KINDRED_CHAT_BASE_URL") {
            assistant.base_url = base_url;
        }

        Ok(Self {
            host,
            port,
            db_path: PathBuf::from(db_path),
            catalog_path,
            search_debounce,
            assistant,
        })
    }
}
