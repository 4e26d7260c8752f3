use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;

use crate::intake::{Locale, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};

const DEFAULT_SENDER_NAME: &str = "Linguaskill Institute";
const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the long-running HTTP process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub contact: ContactConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig::from_env()?,
            contact: ContactConfig::from_lookup(lookup_env)?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Line layout for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Timestamped compact lines.
    Compact,
    /// No timestamps or colour codes; the log collector adds its own.
    Plain,
}

impl LogFormat {
    fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "plain" | "cloudwatch" => Some(Self::Plain),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

impl TelemetryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(lookup_env)
    }

    /// `APP_LOG_FORMAT` picks the layout; without it, a Lambda runtime
    /// (`AWS_LAMBDA_FUNCTION_NAME` set) gets plain lines and anything else compact ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let format = match get("APP_LOG_FORMAT") {
            Some(raw) => LogFormat::from_str(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "APP_LOG_FORMAT",
                value: raw,
            })?,
            None if get("AWS_LAMBDA_FUNCTION_NAME").is_some() => LogFormat::Plain,
            None => LogFormat::Compact,
        };

        Ok(Self {
            log_level: get("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format,
        })
    }
}

/// Everything the submission pipeline needs, shared by both deployment shapes.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub allowed_origin: String,
    pub locale: Locale,
    pub rate_limit: RateLimitConfig,
    pub mail: MailSettings,
}

impl ContactConfig {
    /// Reads the pipeline settings from the process environment (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(lookup_env)
    }

    /// Builds the settings from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let allowed_origin = get("CONTACT_ALLOWED_ORIGIN").unwrap_or_else(|| "*".to_string());

        let locale = match get("CONTACT_LOCALE") {
            Some(raw) => Locale::from_code(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "CONTACT_LOCALE",
                value: raw,
            })?,
            None => Locale::default(),
        };

        let rate_limit = RateLimitConfig {
            window: parse_number::<u64>(&get, "CONTACT_RATE_LIMIT_WINDOW_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_WINDOW),
            max_requests: parse_number::<u32>(&get, "CONTACT_RATE_LIMIT_MAX")?
                .unwrap_or(DEFAULT_MAX_REQUESTS),
        };
        if rate_limit.window.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "CONTACT_RATE_LIMIT_WINDOW_SECS",
                value: "0".to_string(),
            });
        }

        let transport = match get("CONTACT_MAIL_TRANSPORT") {
            Some(raw) => MailTransportKind::from_str(&raw).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "CONTACT_MAIL_TRANSPORT",
                    value: raw,
                }
            })?,
            None => MailTransportKind::Resend,
        };

        let timeout = parse_number::<u64>(&get, "CONTACT_MAIL_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_MAIL_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "CONTACT_MAIL_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let smtp = SmtpSettings {
            host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: parse_number::<u16>(&get, "SMTP_PORT")?.unwrap_or(DEFAULT_SMTP_PORT),
            username: get("SMTP_USER"),
            password: get("SMTP_PASS").map(SecretString::from),
        };

        let mail = MailSettings {
            transport,
            sender_name: get("CONTACT_SENDER_NAME")
                .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string()),
            from_address: get("CONTACT_FROM_EMAIL").or_else(|| get("RESEND_FROM_EMAIL")),
            recipient_address: get("CONTACT_RECIPIENT_EMAIL"),
            api_key: get("RESEND_API_KEY").map(SecretString::from),
            api_url: get("RESEND_API_URL").unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            smtp,
            timeout,
        };

        Ok(Self {
            allowed_origin,
            locale,
            rate_limit,
            mail,
        })
    }
}

/// Fixed-window limiter dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

/// Which outbound transport carries the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransportKind {
    Resend,
    Smtp,
}

impl MailTransportKind {
    fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resend" | "api" => Some(Self::Resend),
            "smtp" => Some(Self::Smtp),
            _ => None,
        }
    }
}

/// Mail credentials and addresses. Any of them may be missing at startup; the
/// dispatcher reports the gap per request instead of refusing to boot.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub transport: MailTransportKind,
    pub sender_name: String,
    pub from_address: Option<String>,
    pub recipient_address: Option<String>,
    pub api_key: Option<SecretString>,
    pub api_url: String,
    pub smtp: SmtpSettings,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an unsupported value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
        }
    }
}

fn lookup_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_number<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_LOG_FORMAT");
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn log_format_follows_deployment_shape() {
        let server = TelemetryConfig::from_lookup(lookup(&[])).expect("defaults load");
        assert_eq!(server.format, LogFormat::Compact);
        assert_eq!(server.log_level, "info");

        let function = TelemetryConfig::from_lookup(lookup(&[(
            "AWS_LAMBDA_FUNCTION_NAME",
            "contact-relay",
        )]))
        .expect("lambda defaults load");
        assert_eq!(function.format, LogFormat::Plain);

        let forced = TelemetryConfig::from_lookup(lookup(&[
            ("AWS_LAMBDA_FUNCTION_NAME", "contact-relay"),
            ("APP_LOG_FORMAT", "compact"),
            ("APP_LOG_LEVEL", "debug"),
        ]))
        .expect("explicit format loads");
        assert_eq!(forced.format, LogFormat::Compact);
        assert_eq!(forced.log_level, "debug");
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = TelemetryConfig::from_lookup(lookup(&[("APP_LOG_FORMAT", "xml")]))
            .expect_err("unknown format rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "APP_LOG_FORMAT",
                ..
            }
        ));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3001));
        reset_env();
    }

    #[test]
    fn contact_defaults_match_documented_limits() {
        let config = ContactConfig::from_lookup(lookup(&[])).expect("defaults load");
        assert_eq!(config.allowed_origin, "*");
        assert_eq!(config.locale, Locale::Arabic);
        assert_eq!(config.rate_limit.window, Duration::from_secs(15 * 60));
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.mail.transport, MailTransportKind::Resend);
        assert_eq!(config.mail.api_url, "https://api.resend.com");
        assert_eq!(config.mail.smtp.host, "smtp.gmail.com");
        assert_eq!(config.mail.smtp.port, 587);
        assert!(config.mail.api_key.is_none());
        assert!(config.mail.recipient_address.is_none());
    }

    #[test]
    fn contact_overrides_are_applied() {
        let config = ContactConfig::from_lookup(lookup(&[
            ("CONTACT_ALLOWED_ORIGIN", "https://example.org"),
            ("CONTACT_LOCALE", "en"),
            ("CONTACT_RATE_LIMIT_WINDOW_SECS", "60"),
            ("CONTACT_RATE_LIMIT_MAX", "2"),
            ("CONTACT_MAIL_TRANSPORT", "smtp"),
            ("SMTP_USER", "mailer@example.org"),
            ("SMTP_PASS", "app-password"),
            ("SMTP_PORT", "465"),
            ("RESEND_FROM_EMAIL", "noreply@example.org"),
        ]))
        .expect("overrides load");

        assert_eq!(config.allowed_origin, "https://example.org");
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.rate_limit.max_requests, 2);
        assert_eq!(config.mail.transport, MailTransportKind::Smtp);
        assert_eq!(config.mail.smtp.port, 465);
        assert_eq!(
            config.mail.from_address.as_deref(),
            Some("noreply@example.org")
        );
        let password = config.mail.smtp.password.expect("password present");
        assert_eq!(password.expose_secret(), "app-password");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = ContactConfig::from_lookup(lookup(&[
            ("RESEND_API_KEY", "   "),
            ("CONTACT_RECIPIENT_EMAIL", ""),
        ]))
        .expect("config loads");
        assert!(config.mail.api_key.is_none());
        assert!(config.mail.recipient_address.is_none());
    }

    #[test]
    fn rejects_unparseable_limits() {
        let err = ContactConfig::from_lookup(lookup(&[("CONTACT_RATE_LIMIT_MAX", "five")]))
            .expect_err("non-numeric max rejected");
        assert!(err.to_string().contains("CONTACT_RATE_LIMIT_MAX"));

        let err = ContactConfig::from_lookup(lookup(&[("CONTACT_RATE_LIMIT_WINDOW_SECS", "0")]))
            .expect_err("zero window rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "CONTACT_RATE_LIMIT_WINDOW_SECS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_mail_timeout() {
        let err = ContactConfig::from_lookup(lookup(&[("CONTACT_MAIL_TIMEOUT_SECS", "0")]))
            .expect_err("zero timeout rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "CONTACT_MAIL_TIMEOUT_SECS",
                ..
            }
        ));

        let config = ContactConfig::from_lookup(lookup(&[("CONTACT_MAIL_TIMEOUT_SECS", "3")]))
            .expect("positive timeout accepted");
        assert_eq!(config.mail.timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_unknown_transport_and_locale() {
        assert!(ContactConfig::from_lookup(lookup(&[("CONTACT_MAIL_TRANSPORT", "carrier-pigeon")]))
            .is_err());
        assert!(ContactConfig::from_lookup(lookup(&[("CONTACT_LOCALE", "fr")])).is_err());
    }
}
