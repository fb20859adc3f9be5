use anyhow::{Context, Result};

const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Application configuration loaded from environment variables.
/// Startup fails if `OPENAI_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_url: String,
    /// The single frontend origin allowed by CORS.
    pub allowed_origin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for router tests. Never touches the process environment.
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: "test-key".to_string(),
            openai_api_url: "http://127.0.0.1:9/unused".to_string(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
