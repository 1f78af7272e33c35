use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Server configuration, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for websocket connections.
    pub port: u16,
    /// Port for the HTTP status API; the API is disabled when unset.
    pub api_port: Option<u16>,
    /// Enables generated word pairs when set.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub word_timeout: Duration,
    /// Idle sessions are discarded after this long.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = parse_var("PORT")?.context("PORT is unspecified")?;
        let api_port = parse_var("API_PORT")?;
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let word_timeout = Duration::from_secs(parse_var("WORD_TIMEOUT_SECS")?.unwrap_or(20));
        let session_ttl = Duration::from_secs(parse_var("SESSION_TTL_SECS")?.unwrap_or(3600));

        Ok(Self {
            port,
            api_port,
            gemini_api_key,
            gemini_model,
            word_timeout,
            session_ttl,
        })
    }
}

/// Reads and parses an optional environment variable.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("{} is invalid: {:?}", name, value)),
        Err(_) => Ok(None),
    }
}
