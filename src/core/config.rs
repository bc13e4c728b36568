use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::constants::DEFAULT_AWS_ANCHOR_REGION;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    /// `None` selects the volatile in-memory storage backend
    pub database: Option<DatabaseConfig>,
    pub swagger: SwaggerConfig,
    pub scan: ScanConfig,
    pub azure: AzureConfig,
    pub reports: ReportConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// What the scanner does when a single region/kind call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanFailurePolicy {
    /// Log the failure, report it alongside the results and keep scanning
    #[default]
    BestEffort,
    /// Abort the whole scan on the first failure
    FailFast,
}

impl FromStr for ScanFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            "fail_fast" | "fail-fast" => Ok(Self::FailFast),
            other => Err(format!(
                "SCAN_FAILURE_POLICY must be 'best_effort' or 'fail_fast', got '{}'",
                other
            )),
        }
    }
}

/// Resource discovery tuning
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of regions scanned at the same time
    pub concurrency: usize,
    /// Upper bound for every single provider API call
    pub call_timeout: Duration,
    pub failure_policy: ScanFailurePolicy,
    /// Region the AWS credential check is issued against
    pub aws_anchor_region: String,
}

/// Azure Resource Manager endpoints (overridable for sovereign clouds)
#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub login_endpoint: String,
    pub management_endpoint: String,
}

/// External report generator and job queue settings
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub generator_program: String,
    pub generator_script: PathBuf,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub max_concurrent_jobs: usize,
    /// Total attempts per job; 1 means a failed job is never retried
    pub max_attempts: u32,
    pub queue_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            scan: ScanConfig::from_env()?,
            azure: AzureConfig::from_env()?,
            reports: ReportConfig::from_env()?,
        })
    }
}

/// Read an env var and parse it, falling back to `default` when unset
fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}

/// [`parse_env`] for counts and timeouts, where zero would disable the feature
fn parse_positive_env<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr + PartialEq + Default,
{
    let value = parse_env(key, default)?;
    if value == T::default() {
        return Err(format!("{} must be at least 1", key));
    }
    Ok(value)
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size =
            parse_env("MAX_REQUEST_BODY_SIZE", Self::DEFAULT_MAX_REQUEST_BODY_SIZE)?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Option<Self>, String> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => return Ok(None),
        };

        Ok(Some(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        }))
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Cloud Report Wizard API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Cloud resource discovery and report generation".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl ScanConfig {
    const DEFAULT_CONCURRENCY: usize = 4;
    const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let concurrency = parse_positive_env("SCAN_CONCURRENCY", Self::DEFAULT_CONCURRENCY)?;
        let call_timeout_secs =
            parse_positive_env("SCAN_CALL_TIMEOUT_SECS", Self::DEFAULT_CALL_TIMEOUT_SECS)?;

        let failure_policy = match env::var("SCAN_FAILURE_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => ScanFailurePolicy::default(),
        };

        let aws_anchor_region = env::var("AWS_ANCHOR_REGION")
            .unwrap_or_else(|_| DEFAULT_AWS_ANCHOR_REGION.to_string());

        Ok(Self {
            concurrency,
            call_timeout: Duration::from_secs(call_timeout_secs),
            failure_policy,
            aws_anchor_region,
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: Self::DEFAULT_CONCURRENCY,
            call_timeout: Duration::from_secs(Self::DEFAULT_CALL_TIMEOUT_SECS),
            failure_policy: ScanFailurePolicy::default(),
            aws_anchor_region: DEFAULT_AWS_ANCHOR_REGION.to_string(),
        }
    }
}

impl AzureConfig {
    pub fn from_env() -> Result<Self, String> {
        let login_endpoint = env::var("AZURE_LOGIN_ENDPOINT")
            .unwrap_or_else(|_| "https://login.microsoftonline.com".to_string())
            .trim_end_matches('/')
            .to_string();
        let management_endpoint = env::var("AZURE_MANAGEMENT_ENDPOINT")
            .unwrap_or_else(|_| "https://management.azure.com".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            login_endpoint,
            management_endpoint,
        })
    }
}

impl ReportConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;
    const DEFAULT_MAX_ATTEMPTS: u32 = 1;
    const DEFAULT_QUEUE_CAPACITY: usize = 256;

    pub fn from_env() -> Result<Self, String> {
        let generator_program =
            env::var("REPORT_GENERATOR_PROGRAM").unwrap_or_else(|_| "python3".to_string());
        let generator_script = env::var("REPORT_GENERATOR_SCRIPT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("python-backend").join("app.py"));
        let output_dir = env::var("REPORT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("output"));

        let timeout_secs = parse_positive_env("REPORT_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;
        let max_concurrent_jobs =
            parse_positive_env("REPORT_MAX_CONCURRENT_JOBS", Self::DEFAULT_MAX_CONCURRENT_JOBS)?;
        let max_attempts = parse_positive_env("REPORT_MAX_ATTEMPTS", Self::DEFAULT_MAX_ATTEMPTS)?;
        let queue_capacity =
            parse_positive_env("REPORT_QUEUE_CAPACITY", Self::DEFAULT_QUEUE_CAPACITY)?;

        Ok(Self {
            generator_program,
            generator_script,
            output_dir,
            timeout: Duration::from_secs(timeout_secs),
            max_concurrent_jobs,
            max_attempts,
            queue_capacity,
        })
    }
}
