use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repos_viewer::render::inspector::render_inspector;
use repos_viewer::render::{format_table, OutputFormat};
use repos_viewer::tui;
use repos_viewer::{Config, DisplayMode, Snapshot, SnapshotFetcher, SnapshotSource};

#[derive(Parser)]
#[command(name = "repos-viewer")]
#[command(about = "Status dashboard for repositories tracked by repos-server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of repos-server, overriding the config file
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once and print the summary table
    Show {
        /// Show every repository, clean ones included
        #[arg(short, long)]
        all: bool,

        /// Show remote drift of ignored repositories
        #[arg(short, long)]
        ignored: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ansi)]
        format: OutputFormat,
    },

    /// Fetch once and print the highlighted raw payload as HTML
    Inspect,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init writes the config, it must not create one first
    if let Some(Commands::Init { force }) = cli.command {
        return cmd_init(cli.config, cli.url, force);
    }

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(url) = cli.url {
        config.server.url = url;
    }

    // Only initialize logging for CLI commands, not TUI
    // TUI has its own log viewer and stdout logging breaks raw mode
    if cli.command.is_some() {
        init_logging(cli.verbose, &config.logging.level)?;
        info!("Starting repos-viewer v{}", env!("CARGO_PKG_VERSION"));
    }

    let fetcher = SnapshotFetcher::from_config(&config.server)
        .with_context(|| format!("Invalid server settings for {}", config.server.url))?;

    match cli.command {
        None => cmd_tui(config, Arc::new(fetcher)).await,
        Some(Commands::Show {
            all,
            ignored,
            format,
        }) => {
            let mode = DisplayMode::new(
                all || config.display.show_all,
                ignored || config.display.show_ignored,
            );
            cmd_show(&fetcher, mode, format).await
        }
        Some(Commands::Inspect) => cmd_inspect(&fetcher).await,
        Some(Commands::Init { .. }) => Ok(()),
    }
}

/// Initialize logging based on verbosity level; logs go to stderr
fn init_logging(verbose: bool, level: &str) -> Result<()> {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level: {}", level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<&PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(),
    }
}

async fn fetch_once(source: &dyn SnapshotSource) -> Result<Snapshot> {
    debug!("One-shot refresh from {}", source.describe());
    let snapshot = source
        .fetch()
        .await
        .with_context(|| format!("Failed to refresh from {}", source.describe()))?;
    Ok(snapshot)
}

/// Print the summary table
async fn cmd_show(source: &dyn SnapshotSource, mode: DisplayMode, format: OutputFormat) -> Result<()> {
    let snapshot = fetch_once(source).await?;
    let output = format_table(&snapshot, mode, format)?;
    println!("{}", output);
    Ok(())
}

/// Print the raw inspector dump
async fn cmd_inspect(source: &dyn SnapshotSource) -> Result<()> {
    let snapshot = fetch_once(source).await?;
    println!("{}", render_inspector(&snapshot));
    Ok(())
}

/// Write a default configuration file
fn cmd_init(config_path: Option<PathBuf>, url: Option<String>, force: bool) -> Result<()> {
    let config_path = match config_path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists at {:?} (use --force to overwrite)",
            config_path
        );
    }

    let mut config = Config::default();
    if let Some(url) = url {
        config.server.url = url;
    }
    config.validate()?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }
    config.save(&config_path)?;

    println!("✅ repos-viewer initialized");
    println!("   Config: {:?}", config_path);
    println!("   Server: {}{}", config.server.url, config.server.data_path);
    println!("   Next: run 'repos-viewer show' or just 'repos-viewer'");

    Ok(())
}

/// Launch the Terminal User Interface
async fn cmd_tui(config: Config, source: Arc<dyn SnapshotSource>) -> Result<()> {
    tui::run_tui(config, source).await
}
