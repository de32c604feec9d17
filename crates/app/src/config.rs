//! Client configuration

use std::{path::PathBuf, time::Duration};

use clap::{Args, ValueEnum};

/// Backend used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Backend and local storage settings.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Base URL of the storefront REST API
    #[arg(long, env = "STOREFRONT_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Directory holding the local copies of cart, orders, payments and session
    #[arg(
        long,
        env = "STOREFRONT_DATA_DIR",
        default_value = ".storefront",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Seconds before a login or registration request is abandoned
    #[arg(
        long,
        env = "STOREFRONT_AUTH_TIMEOUT_SECONDS",
        default_value_t = 10u64,
        global = true
    )]
    pub auth_timeout_seconds: u64,

    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Timeout applied to login and registration.
    #[must_use]
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: AppConfig,
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let cli = TestCli::try_parse_from([
            "storefront",
            "--api-url",
            "http://shop.test/api",
            "--data-dir",
            "/tmp/shop",
            "--auth-timeout-seconds",
            "3",
            "--log-format",
            "json",
        ])?;

        assert_eq!(cli.config.api_url, "http://shop.test/api");
        assert_eq!(cli.config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(cli.config.auth_timeout(), Duration::from_secs(3));
        assert_eq!(cli.config.logging.log_format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn rejects_unknown_log_format() {
        let parsed = TestCli::try_parse_from(["storefront", "--log-format", "xml"]);

        assert!(parsed.is_err());
    }
}
