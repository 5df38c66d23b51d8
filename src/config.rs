//! Medicart configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::cli::Commands;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        global = true,
        env = "MEDICART_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub log_format: LogFormat,
}

/// Medicart command line
#[derive(Debug, Parser)]
#[command(
    name = "medicart",
    about = "Medication cart and dosage reminders",
    long_about = None
)]
pub(crate) struct AppConfig {
    /// Directory holding the shared storage files
    #[arg(long, global = true, env = "MEDICART_DATA_DIR", default_value = ".medicart")]
    pub data_dir: PathBuf,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Commands,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() -> TestResult {
        let config = AppConfig::try_parse_from([
            "medicart",
            "badges",
            "--data-dir",
            "/tmp/rx",
            "--log-format",
            "json",
        ])?;

        assert_eq!(config.data_dir, PathBuf::from("/tmp/rx"));
        assert!(matches!(config.logging.log_format, LogFormat::Json), "json format");

        Ok(())
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;

        AppConfig::command().debug_assert();
    }
}
