//! Company Service configuration.
//!
//! Configuration is loaded from environment variables. The token signing
//! secret and the database URL are redacted in Debug output.

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default maximum number of pooled database connections.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Default maximum lifetime of a pooled connection in seconds.
pub const DEFAULT_DB_CONN_MAX_LIFETIME_SECONDS: u64 = 1800;

/// Default token issuer.
pub const DEFAULT_TOKEN_ISSUER: &str = "company-service";

/// Default token time-to-live in seconds (1 hour).
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Default geo-IP endpoint.
pub const DEFAULT_GEOIP_ENDPOINT: &str = "https://ipapi.co";

/// Default geo-IP request timeout in seconds.
pub const DEFAULT_GEOIP_TIMEOUT_SECONDS: u64 = 5;

/// Company Service configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum number of pooled database connections.
    pub db_max_connections: u32,

    /// Maximum lifetime of a pooled connection.
    pub db_conn_max_lifetime: Duration,

    /// Bearer token settings.
    pub token: TokenConfig,

    /// Geo-IP lookup and country restriction settings.
    pub geoip: GeoIpConfig,
}

/// Bearer token configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// Value of the `iss` claim on issued tokens.
    pub issuer: String,

    /// HMAC secret used to sign and verify tokens.
    pub secret: SecretString,

    /// Lifetime of issued tokens.
    pub ttl: Duration,
}

/// Geo-IP configuration.
#[derive(Debug, Clone)]
pub struct GeoIpConfig {
    /// Base URL of the geolocation service. Lookups go to `{endpoint}/{ip}/json`.
    pub endpoint: String,

    /// Timeout for a single lookup.
    pub timeout: Duration,

    /// Country name a client must resolve to for restricted routes.
    pub allowed_country_name: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_conn_max_lifetime", &self.db_conn_max_lifetime)
            .field("token", &self.token)
            .field("geoip", &self.geoip)
            .finish()
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("issuer", &self.issuer)
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = required(vars, "DATABASE_URL")?;

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let db_max_connections =
            parse_positive(vars, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS as u64)?;
        let db_max_connections =
            u32::try_from(db_max_connections).map_err(|e| ConfigError::InvalidValue {
                name: "DB_MAX_CONNECTIONS".to_string(),
                reason: e.to_string(),
            })?;

        let db_conn_max_lifetime = Duration::from_secs(parse_positive(
            vars,
            "DB_CONN_MAX_LIFETIME_SECONDS",
            DEFAULT_DB_CONN_MAX_LIFETIME_SECONDS,
        )?);

        Ok(Config {
            database_url,
            bind_address,
            db_max_connections,
            db_conn_max_lifetime,
            token: TokenConfig::from_vars(vars)?,
            geoip: GeoIpConfig::from_vars(vars)?,
        })
    }
}

impl TokenConfig {
    /// Load only the token section.
    ///
    /// Used by the `issue-token` binary, which does not need a database.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let issuer = vars
            .get("TOKEN_ISSUER")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOKEN_ISSUER.to_string());

        let secret = required(vars, "TOKEN_SECRET")?;
        if secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "TOKEN_SECRET".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let ttl = Duration::from_secs(parse_positive(
            vars,
            "TOKEN_TTL_SECONDS",
            DEFAULT_TOKEN_TTL_SECONDS,
        )?);

        Ok(TokenConfig {
            issuer,
            secret: SecretString::from(secret),
            ttl,
        })
    }
}

impl GeoIpConfig {
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let endpoint = vars
            .get("GEOIP_ENDPOINT")
            .cloned()
            .unwrap_or_else(|| DEFAULT_GEOIP_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = Duration::from_secs(parse_positive(
            vars,
            "GEOIP_TIMEOUT_SECONDS",
            DEFAULT_GEOIP_TIMEOUT_SECONDS,
        )?);

        let allowed_country_name = required(vars, "GEOIP_ALLOWED_COUNTRY_NAME")?;

        Ok(GeoIpConfig {
            endpoint,
            timeout,
            allowed_country_name,
        })
    }
}

fn required(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    vars.get(name)
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Parse an optional positive integer, falling back to `default` when unset.
fn parse_positive(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    let Some(value_str) = vars.get(name) else {
        return Ok(default);
    };

    let value: u64 = value_str.parse().map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: format!("must be a valid positive integer, got '{}': {}", value_str, e),
    })?;

    if value == 0 {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://localhost/companies_test".to_string(),
            ),
            ("TOKEN_SECRET".to_string(), "super-secret-value".to_string()),
            (
                "GEOIP_ALLOWED_COUNTRY_NAME".to_string(),
                "Cyprus".to_string(),
            ),
        ])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.database_url, "postgresql://localhost/companies_test");
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(
            config.db_conn_max_lifetime,
            Duration::from_secs(DEFAULT_DB_CONN_MAX_LIFETIME_SECONDS)
        );
        assert_eq!(config.token.issuer, DEFAULT_TOKEN_ISSUER);
        assert_eq!(config.token.secret.expose_secret(), "super-secret-value");
        assert_eq!(
            config.token.ttl,
            Duration::from_secs(DEFAULT_TOKEN_TTL_SECONDS)
        );
        assert_eq!(config.geoip.endpoint, DEFAULT_GEOIP_ENDPOINT);
        assert_eq!(
            config.geoip.timeout,
            Duration::from_secs(DEFAULT_GEOIP_TIMEOUT_SECONDS)
        );
        assert_eq!(config.geoip.allowed_country_name, "Cyprus");
    }

    #[test]
    fn test_from_vars_success_with_custom_values() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("DB_MAX_CONNECTIONS".to_string(), "25".to_string());
        vars.insert("DB_CONN_MAX_LIFETIME_SECONDS".to_string(), "60".to_string());
        vars.insert("TOKEN_ISSUER".to_string(), "companies-api".to_string());
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "120".to_string());
        vars.insert(
            "GEOIP_ENDPOINT".to_string(),
            "http://geo.internal/".to_string(),
        );
        vars.insert("GEOIP_TIMEOUT_SECONDS".to_string(), "2".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.db_max_connections, 25);
        assert_eq!(config.db_conn_max_lifetime, Duration::from_secs(60));
        assert_eq!(config.token.issuer, "companies-api");
        assert_eq!(config.token.ttl, Duration::from_secs(120));
        // Trailing slash is trimmed so lookup URLs don't get a double slash
        assert_eq!(config.geoip.endpoint, "http://geo.internal");
        assert_eq!(config.geoip.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_from_vars_missing_database_url() {
        let mut vars = base_vars();
        vars.remove("DATABASE_URL");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "DATABASE_URL"));
    }

    #[test]
    fn test_from_vars_missing_token_secret() {
        let mut vars = base_vars();
        vars.remove("TOKEN_SECRET");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "TOKEN_SECRET"));
    }

    #[test]
    fn test_from_vars_empty_token_secret() {
        let mut vars = base_vars();
        vars.insert("TOKEN_SECRET".to_string(), String::new());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue { name, .. }) if name == "TOKEN_SECRET")
        );
    }

    #[test]
    fn test_from_vars_missing_allowed_country() {
        let mut vars = base_vars();
        vars.remove("GEOIP_ALLOWED_COUNTRY_NAME");

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "GEOIP_ALLOWED_COUNTRY_NAME")
        );
    }

    #[test]
    fn test_token_ttl_rejects_zero() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue { name, reason }) if name == "TOKEN_TTL_SECONDS" && reason.contains("greater than 0"))
        );
    }

    #[test]
    fn test_token_ttl_rejects_non_numeric() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "one-hour".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue { reason, .. }) if reason.contains("must be a valid positive integer"))
        );
    }

    #[test]
    fn test_geoip_timeout_rejects_negative() {
        let mut vars = base_vars();
        vars.insert("GEOIP_TIMEOUT_SECONDS".to_string(), "-5".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue { name, .. }) if name == "GEOIP_TIMEOUT_SECONDS")
        );
    }

    #[test]
    fn test_db_max_connections_rejects_overflow() {
        let mut vars = base_vars();
        vars.insert(
            "DB_MAX_CONNECTIONS".to_string(),
            (u64::from(u32::MAX) + 1).to_string(),
        );

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue { name, .. }) if name == "DB_MAX_CONNECTIONS")
        );
    }

    #[test]
    fn test_token_config_loads_without_database_url() {
        let vars = HashMap::from([("TOKEN_SECRET".to_string(), "s3cret".to_string())]);

        let token = TokenConfig::from_vars(&vars).expect("Token config should load");
        assert_eq!(token.issuer, DEFAULT_TOKEN_ISSUER);
        assert_eq!(token.secret.expose_secret(), "s3cret");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        let debug_output = format!("{:?}", config);

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("postgresql://"));
        assert!(!debug_output.contains("super-secret-value"));
        assert!(debug_output.contains("Cyprus"));
    }
}
