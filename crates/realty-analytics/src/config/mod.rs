use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::analysis::investment::{MarketBenchmarks, ScenarioPolicy};
use crate::analysis::readiness::ReadinessConfig;

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

/// Top-level configuration for the service and the engines it hosts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scenarios: ScenarioPolicy,
    pub market: MarketBenchmarks,
    pub readiness: ReadinessSource,
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
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) if value.trim().eq_ignore_ascii_case("full") => LogFormat::Full,
            _ => LogFormat::Compact,
        };

        let reject_duplicate_names = flag_var("SCENARIO_REJECT_DUPLICATES", true)?;

        let defaults = MarketBenchmarks::default();
        let market = MarketBenchmarks {
            appreciation_rate: rate_var(
                "MARKET_APPRECIATION_RATE",
                defaults.appreciation_rate,
                RateRange::Growth,
            )?,
            vacancy_rate: rate_var(
                "MARKET_VACANCY_RATE",
                defaults.vacancy_rate,
                RateRange::Fraction,
            )?,
        };

        let readiness = match env::var("READINESS_RUBRIC_PATH") {
            Ok(path) if !path.trim().is_empty() => {
                ReadinessSource::File(PathBuf::from(path.trim()))
            }
            _ => ReadinessSource::Standard,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            scenarios: ScenarioPolicy {
                reject_duplicate_names,
            },
            market,
            readiness,
        })
    }
}

fn flag_var(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { name, value }),
        },
        Err(_) => Ok(default),
    }
}

/// Accepted interval for a benchmark rate, matching what the calculator validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateRange {
    /// -1 (exclusive) to 1.
    Growth,
    /// 0 to 1.
    Fraction,
}

impl RateRange {
    fn contains(self, rate: f64) -> bool {
        rate.is_finite()
            && match self {
                RateRange::Growth => rate > -1.0 && rate <= 1.0,
                RateRange::Fraction => (0.0..=1.0).contains(&rate),
            }
    }

    fn describe(self) -> &'static str {
        match self {
            RateRange::Growth => "a decimal rate between -1 and 1",
            RateRange::Fraction => "a decimal rate between 0 and 1",
        }
    }
}

fn rate_var(name: &'static str, default: f64, range: RateRange) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|rate| range.contains(*rate))
            .ok_or(ConfigError::InvalidBenchmark {
                name,
                value,
                expected: range.describe(),
            }),
        Err(_) => Ok(default),
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
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Full,
}

/// Where the readiness rubric comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessSource {
    Standard,
    File(PathBuf),
}

impl ReadinessSource {
    pub fn load(&self) -> Result<ReadinessConfig, ConfigError> {
        match self {
            ReadinessSource::Standard => Ok(ReadinessConfig::standard()),
            ReadinessSource::File(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::RubricRead {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&raw).map_err(|source| ConfigError::RubricParse {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { name: &'static str, value: String },
    InvalidBenchmark {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    RubricRead { path: PathBuf, source: std::io::Error },
    RubricParse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false (got '{value}')")
            }
            ConfigError::InvalidBenchmark {
                name,
                value,
                expected,
            } => write!(f, "{name} must be {expected} (got '{value}')"),
            ConfigError::RubricRead { path, .. } => {
                write!(f, "unable to read readiness rubric {}", path.display())
            }
            ConfigError::RubricParse { path, .. } => {
                write!(f, "readiness rubric {} is not valid JSON", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidBenchmark { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::RubricRead { source, .. } => Some(source),
            ConfigError::RubricParse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "SCENARIO_REJECT_DUPLICATES",
            "MARKET_APPRECIATION_RATE",
            "MARKET_VACANCY_RATE",
            "READINESS_RUBRIC_PATH",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert!(config.scenarios.reject_duplicate_names);
        assert_eq!(config.market, MarketBenchmarks::default());
        assert_eq!(config.readiness, ReadinessSource::Standard);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_scenario_policy_and_benchmarks() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCENARIO_REJECT_DUPLICATES", "off");
        env::set_var("MARKET_APPRECIATION_RATE", "0.045");
        env::set_var("MARKET_VACANCY_RATE", "0.08");
        let config = AppConfig::load().expect("config loads");
        assert!(!config.scenarios.reject_duplicate_names);
        assert_eq!(config.market.appreciation_rate, 0.045);
        assert_eq!(config.market.vacancy_rate, 0.08);
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_benchmark() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MARKET_VACANCY_RATE", "5");
        match AppConfig::load() {
            Err(ConfigError::InvalidBenchmark { name, .. }) => {
                assert_eq!(name, "MARKET_VACANCY_RATE")
            }
            other => panic!("expected benchmark error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn negative_vacancy_benchmark_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MARKET_VACANCY_RATE", "-0.2");
        let err = AppConfig::load().expect_err("negative vacancy is not a fraction");
        assert!(matches!(
            err,
            ConfigError::InvalidBenchmark {
                name: "MARKET_VACANCY_RATE",
                ..
            }
        ));
        assert!(err.to_string().contains("between 0 and 1"));
        reset_env();
    }

    #[test]
    fn negative_appreciation_benchmark_is_allowed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MARKET_APPRECIATION_RATE", "-0.02");
        let config = AppConfig::load().expect("declining markets load");
        assert_eq!(config.market.appreciation_rate, -0.02);
        reset_env();
    }

    #[test]
    fn missing_rubric_file_reports_path() {
        let source = ReadinessSource::File(PathBuf::from("/nonexistent/rubric.json"));
        let err = source.load().expect_err("file is missing");
        assert!(err.to_string().contains("/nonexistent/rubric.json"));
    }
}
