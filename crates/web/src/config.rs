use anyhow::{Context, Result};

const DEFAULT_INSTITUTION_API_URL: &str = "https://universities.hipolabs.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Comma-separated `token:user_id:display name` entries from the
    /// identity provider integration.
    pub identity_tokens: String,
    pub institution_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            identity_tokens: std::env::var("IDENTITY_TOKENS").unwrap_or_default(),
            institution_api_url: std::env::var("INSTITUTION_API_URL")
                .unwrap_or_else(|_| DEFAULT_INSTITUTION_API_URL.to_string()),
        })
    }
}
