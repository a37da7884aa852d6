use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::loader::fixtures::FixtureProvider;
use crate::loader::json_loader::JsonFileProvider;
use crate::loader::DataProvider;
use crate::logging::LogConfig;
use crate::ui::Tab;

pub const DEFAULT_PAGE_SIZE: usize = 50;

fn parse_page_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Parser)]
#[command(
    name = "clientdesk",
    about = "Terminal list views for a client-work practice: accounts, clients, automations, recurring jobs and reminders"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Clone, Debug)]
pub struct ViewConfig {
    /// Page shown at startup
    #[arg(long, value_enum, default_value_t = Tab::Accounts)]
    pub tab: Tab,

    /// Rows per page
    #[arg(
        long,
        env = "CLIENTDESK_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = parse_page_size
    )]
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tab: Tab::Accounts,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Browse the built-in sample workspace
    Demo {
        #[command(flatten)]
        view: ViewConfig,

        #[command(flatten)]
        log: LogConfig,
    },

    /// Browse a workspace exported as JSON
    Open {
        path: PathBuf,

        #[command(flatten)]
        view: ViewConfig,

        #[command(flatten)]
        log: LogConfig,
    },
}

impl Command {
    pub fn view(&self) -> &ViewConfig {
        match self {
            Command::Demo { view, .. } | Command::Open { view, .. } => view,
        }
    }

    pub fn log(&self) -> &LogConfig {
        match self {
            Command::Demo { log, .. } | Command::Open { log, .. } => log,
        }
    }

    pub fn provider(&self) -> Arc<dyn DataProvider> {
        match self {
            Command::Demo { .. } => Arc::new(FixtureProvider),
            Command::Open { path, .. } => Arc::new(JsonFileProvider::new(path.clone())),
        }
    }
}
