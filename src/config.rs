/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, JWT_SECRET, TTL, cache backend など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
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

/// Argon2 cost parameters. Defaults follow the argon2 crate's recommended values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

// Production secrets shorter than this are refused (HS256 key should be >= hash output size).
const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

/// Upper bound for every TTL setting (one year).
pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub jwt_secret: String,
    pub access_token_ttl_seconds: u64,

    pub posts_cache_ttl_seconds: u64,
    // None => in-process cache
    pub cache_url: Option<String>,

    pub request_timeout_seconds: u64,
    pub password_hash: PasswordHashConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the signing secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("posts_cache_ttl_seconds", &self.posts_cache_ttl_seconds)
            .field("cache_url", &self.cache_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("password_hash", &self.password_hash)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&var, "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let database_url = var("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections: u32 = parse_or(&var, "DATABASE_MAX_CONNECTIONS", 5)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty()
            || (app_env.is_production() && jwt_secret.len() < MIN_PRODUCTION_SECRET_BYTES)
        {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let access_token_ttl_seconds = parse_ttl(&var, "ACCESS_TOKEN_TTL_SECONDS", 300)?; // 5 min
        let posts_cache_ttl_seconds = parse_ttl(&var, "POSTS_CACHE_TTL_SECONDS", 300)?;

        let cache_url = var("CACHE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let request_timeout_seconds: u64 = parse_or(&var, "REQUEST_TIMEOUT_SECONDS", 30)?;

        let defaults = PasswordHashConfig::default();
        let password_hash = PasswordHashConfig {
            memory_kib: parse_or(&var, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&var, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&var, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_secret,
            access_token_ttl_seconds,
            posts_cache_ttl_seconds,
            cache_url,
            request_timeout_seconds,
            password_hash,
        })
    }
}

// Unset => default; set but unparsable => Invalid (a typo should not silently fall back).
fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

// TTLs feed chrono / Instant arithmetic; keep them in 1..=MAX_TTL_SECONDS.
fn parse_ttl<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let ttl: u64 = parse_or(var, key, default)?;
    if ttl == 0 || ttl > MAX_TTL_SECONDS {
        return Err(ConfigError::Invalid(key));
    }
    Ok(ttl)
}
