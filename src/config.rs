use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    /// seconds
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// How long a known employee id stays cached, in seconds
    pub employee_cache_ttl: u64,

    pub log_dir: String,
    pub log_level: String,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: env_or("ACCESS_TOKEN_TTL", 900)?, // 15 min

            rate_login_per_min: env_or("RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: env_or("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env_or("API_PREFIX", "/api".to_string())?,
            employee_cache_ttl: env_or("EMPLOYEE_CACHE_TTL", 300)?,

            log_dir: env_or("LOG_DIR", "logs".to_string())?,
            log_level: env_or("LOG_LEVEL", "debug".to_string())?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            jwt_secret: "test-secret".into(),
            server_addr: "127.0.0.1:0".into(),
            access_token_ttl: 900,
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api".into(),
            employee_cache_ttl: 300,
            log_dir: "logs".into(),
            log_level: "debug".into(),
        }
    }
}
