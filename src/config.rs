use anyhow::Context;

const DEV_SECRET_KEY: &str = "you-will-never-guess";

#[derive(Debug, Clone)]
pub struct Config {
    /// `postgres://...` or `memory://` for the in-process store.
    pub database_url: String,
    pub max_connections: u32,
    pub secret_key: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            secret_key: std::env::var("SECRET_KEY")
                .unwrap_or_else(|_| DEV_SECRET_KEY.to_string()),
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}
