/*
 * Responsibility
 * - Load settings from the environment (.env supported)
 * - Validate them; anything missing or invalid fails startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::id_token::MAX_LEEWAY_SECONDS;
use crate::services::auth::{DEFAULT_PROVIDER_NAME, FIREBASE_JWKS_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Expected `aud`; the issuer is https://securetoken.google.com/<project_id>
    pub firebase_project_id: String,
    pub firebase_jwks_url: String,

    // Provider name; also the challenge realm
    pub auth_provider_name: String,
    pub id_token_leeway_seconds: u64,
    pub id_token_verify_timeout: Duration,

    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let firebase_project_id = lookup("FIREBASE_PROJECT_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))?;

        let firebase_jwks_url =
            lookup("FIREBASE_JWKS_URL").unwrap_or_else(|| FIREBASE_JWKS_URL.to_string());
        url::Url::parse(&firebase_jwks_url)
            .map_err(|_| ConfigError::Invalid("FIREBASE_JWKS_URL"))?;

        let auth_provider_name = lookup("AUTH_PROVIDER_NAME")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PROVIDER_NAME.to_string());
        if auth_provider_name.is_empty() {
            return Err(ConfigError::Invalid("AUTH_PROVIDER_NAME"));
        }

        let id_token_leeway_seconds = parse_or("ID_TOKEN_LEEWAY_SECONDS", &lookup, 60)?;
        if id_token_leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid("ID_TOKEN_LEEWAY_SECONDS"));
        }

        let id_token_verify_timeout = Duration::from_secs(parse_positive(
            "ID_TOKEN_VERIFY_TIMEOUT_SECONDS",
            &lookup,
            10,
        )?);

        let request_timeout =
            Duration::from_secs(parse_positive("REQUEST_TIMEOUT_SECONDS", &lookup, 30)?);

        Ok(Self {
            addr,
            app_env,
            firebase_project_id,
            firebase_jwks_url,
            auth_provider_name,
            id_token_leeway_seconds,
            id_token_verify_timeout,
            request_timeout,
        })
    }
}

fn parse_or<F>(key: &'static str, lookup: &F, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v.trim().parse::<u64>().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_positive<F>(key: &'static str, lookup: &F, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(key, lookup, default)? {
        0 => Err(ConfigError::Invalid(key)),
        secs => Ok(secs),
    }
}
