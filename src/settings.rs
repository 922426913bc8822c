use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};
use validator::ValidateEmail;
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl AppEnvironment {
    /// Reads `APP_ENV`, defaulting to development when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))
    }

    pub fn is_production(&self) -> bool {
        *self == AppEnvironment::Production
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Smtp,
    MailCommand,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default = "default_submissions_path")]
    pub submissions_path: PathBuf,

    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    #[serde(default)]
    pub landing_page_path: Option<PathBuf>,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: usize,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_rate_limit_sweep_interval_secs")]
    pub rate_limit_sweep_interval_secs: u64,

    #[serde(default)]
    pub notification_enabled: bool,

    #[serde(default = "default_transport")]
    pub notification_transport: TransportKind,

    #[serde(default = "default_notification_timeout_secs")]
    pub notification_timeout_secs: u64,

    #[serde(default)]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "default_smtp_secure")]
    pub smtp_secure: bool,

    #[serde(default)]
    pub smtp_user: String,

    #[serde(default)]
    pub smtp_password: Zeroizing<String>,

    #[serde(default)]
    pub mail_to: String,

    #[serde(default)]
    pub mail_from: String,

    #[serde(default = "default_mail_command")]
    pub mail_command: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_submissions_path() -> PathBuf {
    PathBuf::from("data/submissions.json")
}
fn default_assets_dir() -> PathBuf {
    PathBuf::from("public")
}
fn default_rate_limit_max_requests() -> usize {
    3
}
fn default_rate_limit_window_secs() -> u64 {
    15 * 60
}
fn default_rate_limit_sweep_interval_secs() -> u64 {
    60 * 60
}
fn default_transport() -> TransportKind {
    TransportKind::Smtp
}
fn default_notification_timeout_secs() -> u64 {
    15
}
fn default_smtp_port() -> u16 {
    465
}
fn default_smtp_secure() -> bool {
    true
}
fn default_mail_command() -> String {
    "mail".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            trust_x_forwarded_for: false,
            submissions_path: default_submissions_path(),
            assets_dir: default_assets_dir(),
            landing_page_path: None,
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            rate_limit_sweep_interval_secs: default_rate_limit_sweep_interval_secs(),
            notification_enabled: false,
            notification_transport: default_transport(),
            notification_timeout_secs: default_notification_timeout_secs(),
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_secure: default_smtp_secure(),
            smtp_user: String::new(),
            smtp_password: Zeroizing::default(),
            mail_to: String::new(),
            mail_from: String::new(),
            mail_command: default_mail_command(),
        }
    }
}

impl AppConfig {
    /// Loads `config/default`, `config/<APP_ENV>` and `APP_*` variables, in
    /// that order, and validates the result.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let env_name = AppEnvironment::from_env()?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be greater than 0");
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than 0");
        }
        if self.rate_limit_sweep_interval_secs == 0 {
            errors.push("RATE_LIMIT_SWEEP_INTERVAL_SECS must be greater than 0");
        }

        if self.notification_enabled {
            if !self.mail_to.validate_email() {
                errors.push("MAIL_TO must be a valid email address when notifications are enabled");
            }
            if !self.mail_from.is_empty() && !self.mail_from.validate_email() {
                errors.push("MAIL_FROM must be a valid email address");
            }
            if self.notification_timeout_secs == 0 {
                errors.push("NOTIFICATION_TIMEOUT_SECS must be greater than 0");
            }
            if self.notification_transport == TransportKind::Smtp {
                if self.smtp_host.trim().is_empty() {
                    errors.push("SMTP_HOST must be set when SMTP notifications are enabled");
                }
                if self.smtp_user.trim().is_empty() {
                    errors.push("SMTP_USER must be set when SMTP notifications are enabled");
                }
                if self.smtp_password.is_empty() {
                    errors.push("SMTP_PASSWORD must be set when SMTP notifications are enabled");
                }
                if self.mail_from.is_empty() && !self.smtp_user.validate_email() {
                    errors.push("MAIL_FROM must be set when SMTP_USER is not an email address");
                }
            }
            if self.notification_transport == TransportKind::MailCommand
                && self.mail_command.trim().is_empty()
            {
                errors.push("MAIL_COMMAND cannot be empty");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_interval_secs)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    /// Sender address; the SMTP login is used when no explicit sender is set.
    pub fn sender(&self) -> String {
        if self.mail_from.trim().is_empty() {
            self.smtp_user.clone()
        } else {
            self.mail_from.clone()
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("submissions_path", &self.submissions_path)
            .field("assets_dir", &self.assets_dir)
            .field("landing_page_path", &self.landing_page_path)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_sweep_interval_secs", &self.rate_limit_sweep_interval_secs)
            .field("notification_enabled", &self.notification_enabled)
            .field("notification_transport", &self.notification_transport)
            .field("notification_timeout_secs", &self.notification_timeout_secs)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_secure", &self.smtp_secure)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &self.smtp_password.redact())
            .field("mail_to", &self.mail_to)
            .field("mail_from", &self.mail_from)
            .field("mail_command", &self.mail_command)
            .finish()
    }
}
