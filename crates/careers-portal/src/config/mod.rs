use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_LOGO_PATH: &str = "public/logo.png";

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

/// Top-level configuration for the application.
///
/// SMTP settings are not part of it; each request resolves them through an
/// [`SmtpSettingsSource`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub branding: BrandingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let logo_path = env::var("LOGO_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOGO_PATH));

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            branding: BrandingConfig { logo_path },
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Static assets used when rendering outbound mail.
#[derive(Debug, Clone)]
pub struct BrandingConfig {
    pub logo_path: PathBuf,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
        }
    }
}

/// SMTP relay settings as seen by a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub recipient: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            secure: false,
            user: None,
            pass: None,
            recipient: None,
        }
    }
}

impl SmtpSettings {
    /// Read the `SMTP_*` and `RECIPIENT_EMAIL` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = non_empty_var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let port = match non_empty_var("SMTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidSmtpPort { value: raw })?,
            None => DEFAULT_SMTP_PORT,
        };
        let secure = non_empty_var("SMTP_SECURE")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            secure,
            user: non_empty_var("SMTP_USER"),
            pass: non_empty_var("SMTP_PASS"),
            recipient: non_empty_var("RECIPIENT_EMAIL"),
        })
    }

    pub fn credentials(&self) -> Result<SmtpCredentials, ConfigError> {
        match (self.user.as_deref(), self.pass.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Ok(SmtpCredentials {
                    user: user.to_string(),
                    pass: pass.to_string(),
                })
            }
            _ => Err(ConfigError::MissingSmtpCredentials),
        }
    }

    /// Mailbox receiving applications; falls back to the authenticated sender.
    pub fn recipient(&self) -> Option<&str> {
        self.recipient
            .as_deref()
            .filter(|value| !value.is_empty())
            .or(self.user.as_deref())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub user: String,
    pub pass: String,
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Where a request obtains its SMTP settings.
pub trait SmtpSettingsSource: Send + Sync {
    fn load(&self) -> Result<SmtpSettings, ConfigError>;
}

/// Re-reads the process environment on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSmtpSettings;

impl SmtpSettingsSource for EnvSmtpSettings {
    fn load(&self) -> Result<SmtpSettings, ConfigError> {
        SmtpSettings::from_env()
    }
}

impl SmtpSettingsSource for SmtpSettings {
    fn load(&self) -> Result<SmtpSettings, ConfigError> {
        Ok(self.clone())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSmtpPort { value: String },
    MissingSmtpCredentials,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSmtpPort { value } => {
                write!(f, "SMTP_PORT must be a valid u16 (found '{value}')")
            }
            ConfigError::MissingSmtpCredentials => write!(
                f,
                "Email service not configured. Missing SMTP_USER/SMTP_PASS."
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSmtpPort { .. }
            | ConfigError::MissingSmtpCredentials => None,
        }
    }
}
