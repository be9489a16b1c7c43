use std::str::FromStr;

use anyhow::{Context, Result};
use ::config::{Config as RawConfig, Environment};
use serde::{Deserialize, Deserializer};

use crate::llm::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_BASE_URL};

/// Which backend answers chat requests in this deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    OpenAI,
    Ollama,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(BackendKind::OpenAI),
            "ollama" => Ok(BackendKind::Ollama),
            other => anyhow::bail!("Unsupported LLM backend: {} (expected openai or ollama)", other),
        }
    }
}

/// Process-wide settings, read once from the environment at startup
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub llm_backend: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub host: String,
    pub port: u16,
    #[serde(deserialize_with = "lenient_bool")]
    pub debug: bool,
    pub static_dir: String,
}

/// Anything other than a recognised "on" value disables the flag
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i == 1,
        Flag::Text(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"),
    })
}

impl Settings {
    /// Load settings from process environment variables
    pub fn load() -> Result<Self> {
        Self::from_environment(Environment::default())
    }

    fn from_environment(environment: Environment) -> Result<Self> {
        let raw = RawConfig::builder()
            .set_default("llm_backend", "openai")?
            .set_default("openai_base_url", DEFAULT_OPENAI_BASE_URL)?
            .set_default("ollama_url", DEFAULT_OLLAMA_URL)?
            .set_default("ollama_model", DEFAULT_OLLAMA_MODEL)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000_i64)?
            .set_default("debug", false)?
            .set_default("static_dir", "static")?
            .add_source(environment)
            .build()
            .context("Failed to read environment configuration")?;

        let settings: Settings = raw
            .try_deserialize()
            .context("Invalid environment configuration")?;
        settings.backend_kind()?;
        Ok(settings)
    }

    pub fn backend_kind(&self) -> Result<BackendKind> {
        self.llm_backend.parse()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Log filter used when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "devops_chatbot=debug,tower_http=debug"
        } else {
            "devops_chatbot=info,tower_http=info"
        }
    }
}
