use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

/// The terminal owns stdout, so logs only go to a file and only when asked.
#[derive(Args, Clone, Debug)]
pub struct LogConfig {
    /// Write a log to this file
    #[arg(long, env = "CLIENTDESK_LOG")]
    pub log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }
}

/// Install the global file logger. Returns whether one was installed.
pub fn init(config: &LogConfig) -> Result<bool> {
    let Some(ref path) = config.log_file else {
        return Ok(false);
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;
    WriteLogger::init(config.log_level, Config::default(), file)
        .context("failed to install logger")?;
    info!("clientdesk {} logging at {}", env!("CARGO_PKG_VERSION"), config.log_level);
    Ok(true)
}
