//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser};

/// Storefront checkout runner configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront checkout runner", long_about = None)]
pub struct Config {
    /// Directory holding the `products/` and `customers/` fixture files
    #[arg(short, long, env = "STOREFRONT_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Fixture set to load
    #[arg(short, long, env = "STOREFRONT_SET", default_value = "demo")]
    pub set: String,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
