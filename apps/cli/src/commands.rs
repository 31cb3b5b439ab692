//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use postfeed_core::ContentAdapter;
use postfeed_shared::{AppConfig, init_config, load_config, load_config_from, resolve_token};
use serde::Serialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// postfeed — read blog content from Notion as frontend-ready JSON.
#[derive(Parser)]
#[command(
    name = "postfeed",
    version,
    about = "Fetch a Notion-hosted blog's title, posts and page content as JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.postfeed/postfeed.toml).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print single-line JSON instead of pretty-printed.
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the parent page's title.
    Page,

    /// Print a post page's metadata.
    Post {
        /// Post page ID.
        page_id: String,
    },

    /// List published posts, newest first.
    Posts,

    /// Print the flattened content blocks of a page.
    Blocks {
        /// Page ID whose children to list.
        page_id: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays JSON.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "postfeed=info",
        1 => "postfeed=debug",
        _ => "postfeed=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_file.as_deref();
    match cli.command {
        Command::Page => {
            let adapter = adapter(config_path)?;
            emit(&adapter.get_page_data().await?, cli.compact)
        }
        Command::Post { page_id } => {
            let adapter = adapter(config_path)?;
            emit(&adapter.get_child_page_data(&page_id).await?, cli.compact)
        }
        Command::Posts => {
            let adapter = adapter(config_path)?;
            emit(&adapter.get_database_data().await?, cli.compact)
        }
        Command::Blocks { page_id } => {
            let adapter = adapter(config_path)?;
            emit(&adapter.get_blocks_data(&page_id).await?, cli.compact)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load config (file, then env overrides).
fn resolved_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    config.apply_env_overrides();
    Ok(config)
}

/// Build the adapter, failing early when no token is available.
fn adapter(path: Option<&Path>) -> Result<ContentAdapter> {
    let config = resolved_config(path)?;
    let token = resolve_token(&config)?;
    debug!(
        parent_page_id = %config.notion.parent_page_id,
        database_id = %config.notion.database_id,
        "config resolved"
    );
    Ok(ContentAdapter::from_config(&config, token)?)
}

/// Write a record to stdout as JSON.
fn emit<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{json}");
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolved_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
