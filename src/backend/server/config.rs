/**
 * Server Configuration
 *
 * Configuration is read from environment variables (a `.env` file is
 * loaded by `main` first). Every key has a default; malformed values stop
 * startup with a `ConfigError` rather than being silently replaced.
 *
 * # Keys
 *
 * - `PORT` - listen port (default 5000)
 * - `DATABASE_URL` - PostgreSQL URL; unset selects the in-memory store
 * - `DATABASE_MAX_CONNECTIONS` - pool size (default 10)
 * - `JWT_SECRET` - token signing secret (insecure default, logged)
 * - `JWT_EXPIRES_IN` - token lifetime, `<n>` seconds or `<n>s|m|h|d` (default 7d)
 * - `APP_ENV` - `development`, `production` or `test` (default production)
 * - `RATE_LIMIT_MAX` - requests allowed per client IP and window (default 100)
 * - `RATE_LIMIT_WINDOW` - rate limit window, same format as `JWT_EXPIRES_IN` (default 15m)
 */

use std::time::Duration;

use thiserror::Error;

/// Secret used when `JWT_SECRET` is unset
pub const DEFAULT_JWT_SECRET: &str = "your_jwt_secret_key_here";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
    Test,
}

impl Environment {
    /// Development mode exposes server error details to clients
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Per-client request budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX,
            window: DEFAULT_RATE_LIMIT_WINDOW,
        }
    }
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub environment: Environment,
    pub rate_limit: RateLimit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expires_in: DEFAULT_TOKEN_TTL,
            environment: Environment::default(),
            rate_limit: RateLimit::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for any value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        if let Some(port) = get("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: port.clone(),
                reason: "expected a port number",
            })?;
        }

        config.database_url = get("DATABASE_URL");

        if let Some(max) = get("DATABASE_MAX_CONNECTIONS") {
            config.database_max_connections = max
                .trim()
                .parse()
                .ok()
                .filter(|max: &u32| *max > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: max.clone(),
                    reason: "expected a positive integer",
                })?;
        }

        match get("JWT_SECRET") {
            Some(secret) => config.jwt_secret = secret,
            None => tracing::warn!("JWT_SECRET not set; using the insecure default secret"),
        }

        if let Some(ttl) = get("JWT_EXPIRES_IN") {
            config.jwt_expires_in = parse_duration(&ttl).ok_or_else(|| ConfigError::Invalid {
                key: "JWT_EXPIRES_IN",
                value: ttl.clone(),
                reason: "expected <n> seconds or <n>s, <n>m, <n>h, <n>d",
            })?;
        }

        if let Some(env) = get("APP_ENV") {
            config.environment = match env.trim().to_lowercase().as_str() {
                "development" => Environment::Development,
                "production" => Environment::Production,
                "test" => Environment::Test,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "APP_ENV",
                        value: env,
                        reason: "expected development, production or test",
                    })
                }
            };
        }

        if let Some(max) = get("RATE_LIMIT_MAX") {
            config.rate_limit.max_requests = max
                .trim()
                .parse()
                .ok()
                .filter(|max: &u32| *max > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "RATE_LIMIT_MAX",
                    value: max.clone(),
                    reason: "expected a positive integer",
                })?;
        }

        if let Some(window) = get("RATE_LIMIT_WINDOW") {
            config.rate_limit.window =
                parse_duration(&window).ok_or_else(|| ConfigError::Invalid {
                    key: "RATE_LIMIT_WINDOW",
                    value: window.clone(),
                    reason: "expected <n> seconds or <n>s, <n>m, <n>h, <n>d",
                })?;
        }

        Ok(config)
    }
}

/// Parse `<n>` (seconds) or `<n>` followed by one of `s`, `m`, `h`, `d`
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (digits, unit_secs) = match value.char_indices().last()? {
        (i, 's') => (&value[..i], 1),
        (i, 'm') => (&value[..i], 60),
        (i, 'h') => (&value[..i], 60 * 60),
        (i, 'd') => (&value[..i], 24 * 60 * 60),
        _ => (value, 1),
    };
    let amount: u64 = digits.parse().ok()?;
    if amount == 0 {
        return None;
    }
    amount.checked_mul(unit_secs).map(Duration::from_secs)
}
