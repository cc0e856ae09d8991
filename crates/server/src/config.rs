//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_PASSWORD` - Shared admin password (min 8 chars)
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `PORTFOLIO_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; without either, messages are kept in memory)
//! - `PORTFOLIO_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTFOLIO_PORT` - Listen port (default: 8001)
//! - `ACCESS_TOKEN_TTL_MINUTES` - Admin token lifetime (default: 480)
//! - `CORS_ORIGINS` - Comma-separated allowed origins (default: `*`)
//! - `STATIC_DIR` - Built frontend to serve at `/`
//! - `SMTP_HOST` - Enables contact notifications when set
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `SMTP_USERNAME` / `SMTP_PASSWORD` - SMTP credentials
//! - `SMTP_FROM` - Sender address (required when `SMTP_HOST` is set)
//! - `ADMIN_EMAIL` - Where notifications go (default: `SMTP_FROM`)
//! - `ADMIN_NAME` - Signature on auto-replies (default: "Portfolio")
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - 0.0 to 1.0 (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_TOKEN_TTL_MINUTES: u32 = 480;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Admin login and token settings
    pub admin: AdminAuthConfig,
    /// Origins allowed to call the API from a browser
    pub cors_origins: CorsOrigins,
    /// Directory with the built frontend, served at `/`
    pub static_dir: Option<PathBuf>,
    /// SMTP settings; `None` disables contact notifications
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Admin authentication settings.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct AdminAuthConfig {
    /// Shared admin password
    pub password: SecretString,
    /// HS256 signing secret for access tokens
    pub jwt_secret: SecretString,
    /// Access token lifetime in minutes
    pub token_ttl_minutes: u32,
}

impl std::fmt::Debug for AdminAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuthConfig")
            .field("password", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

/// Allowed CORS origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (`*`).
    Any,
    /// Only these exact origins.
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list. `*` anywhere in the list means
    /// any origin.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

/// SMTP configuration for contact notifications.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: Option<String>,
    /// SMTP authentication password
    pub smtp_password: Option<SecretString>,
    /// Email sender address (From header)
    pub from_address: String,
    /// Recipient of new-message notifications
    pub admin_email: String,
    /// Name used to sign auto-replies
    pub admin_name: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("admin_email", &self.admin_email)
            .field("admin_name", &self.admin_name)
            .finish()
    }
}

impl PortfolioConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PORTFOLIO_DATABASE_URL");
        let host = get_env_or_default("PORTFOLIO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTFOLIO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORTFOLIO_PORT", "8001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTFOLIO_PORT".to_string(), e.to_string()))?;

        let admin = AdminAuthConfig::from_env()?;
        let cors_origins = CorsOrigins::parse(&get_env_or_default("CORS_ORIGINS", "*"));
        let static_dir = get_optional_env("STATIC_DIR").map(PathBuf::from);
        let email = EmailConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            admin,
            cors_origins,
            static_dir,
            email,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminAuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let password = get_required_secret("ADMIN_PASSWORD")?;
        validate_min_length(&password, "ADMIN_PASSWORD", MIN_ADMIN_PASSWORD_LENGTH)?;

        let jwt_secret = get_validated_secret("JWT_SECRET")?;
        validate_min_length(&jwt_secret, "JWT_SECRET", MIN_JWT_SECRET_LENGTH)?;

        let token_ttl_minutes = get_optional_env("ACCESS_TOKEN_TTL_MINUTES")
            .map(|value| parse_token_ttl(&value))
            .transpose()?
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);

        Ok(Self {
            password,
            jwt_secret,
            token_ttl_minutes,
        })
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let from_address = get_required_env("SMTP_FROM")?;
        let admin_email = get_optional_env("ADMIN_EMAIL").unwrap_or_else(|| from_address.clone());

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username: get_optional_env("SMTP_USERNAME"),
            smtp_password: get_optional_env("SMTP_PASSWORD").map(SecretString::from),
            from_address,
            admin_email,
            admin_name: get_env_or_default("ADMIN_NAME", "Portfolio"),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to the generic `DATABASE_URL`. Empty values count as unset.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_token_ttl(value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            "ACCESS_TOKEN_TTL_MINUTES".to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(minutes) => Ok(minutes),
        Err(e) => Err(ConfigError::InvalidEnvVar(
            "ACCESS_TOKEN_TTL_MINUTES".to_string(),
            e.to_string(),
        )),
    }
}

/// Validate that a secret meets a minimum length requirement.
fn validate_min_length(
    secret: &SecretString,
    var_name: &str,
    min: usize,
) -> Result<(), ConfigError> {
    let len = secret.expose_secret().chars().count();
    if len < min {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {min} characters (got {len})"),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (generated secrets have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use `portfolio-cli generate-secret`."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn admin_config() -> AdminAuthConfig {
        AdminAuthConfig {
            password: SecretString::from("hunter2-but-longer"),
            jwt_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%"),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // 50% a, 50% b
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-jwt-secret-here", "JWT_SECRET").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let err =
            validate_secret_strength("abababababababababababababababab", "JWT_SECRET").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "JWT_SECRET").is_ok());
    }

    #[test]
    fn test_validate_min_length() {
        let short = SecretString::from("short");
        assert!(validate_min_length(&short, "ADMIN_PASSWORD", MIN_ADMIN_PASSWORD_LENGTH).is_err());

        let long = SecretString::from("a".repeat(32));
        assert!(validate_min_length(&long, "JWT_SECRET", MIN_JWT_SECRET_LENGTH).is_ok());
    }

    #[test]
    fn test_parse_token_ttl() {
        assert_eq!(parse_token_ttl("60").unwrap(), 60);
        assert_eq!(parse_token_ttl(" 480 ").unwrap(), 480);
        assert!(parse_token_ttl("0").is_err());
        assert!(parse_token_ttl("-5").is_err());
        assert!(parse_token_ttl("soon").is_err());
    }

    #[test]
    fn test_cors_origins_parse() {
        assert_eq!(CorsOrigins::parse("*"), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(""), CorsOrigins::Any);
        assert_eq!(
            CorsOrigins::parse("https://a.dev, https://b.dev,"),
            CorsOrigins::List(vec!["https://a.dev".to_string(), "https://b.dev".to_string()])
        );
        assert_eq!(CorsOrigins::parse("https://a.dev,*"), CorsOrigins::Any);
    }

    #[test]
    fn test_socket_addr() {
        let config = PortfolioConfig {
            database_url: None,
            host: "127.0.0.1".parse().unwrap(),
            port: 8001,
            admin: admin_config(),
            cors_origins: CorsOrigins::Any,
            static_dir: None,
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8001);
    }

    #[test]
    fn test_admin_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", admin_config());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("480"));
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("aB3$"));
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.mail.dev".to_string(),
            smtp_port: 587,
            smtp_username: Some("mailer".to_string()),
            smtp_password: Some(SecretString::from("super_secret_smtp_password")),
            from_address: "site@mail.dev".to_string(),
            admin_email: "owner@mail.dev".to_string(),
            admin_name: "Owner".to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("smtp.mail.dev"));
        assert!(debug_output.contains("owner@mail.dev"));
        assert!(!debug_output.contains("super_secret_smtp_password"));
    }
}
