//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `config`: API key and configuration inspection
//! - `fetch`: lyrics for a single artist/title
//! - `enrich`: lyrics for every audio file under a path

mod config;
mod enrich;
mod fetch;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::{APIKEY_SETTING, Config, CredentialStore, ServiceConfig, Settings};
use crate::error::ResultExt;
use crate::lyrics::{self, HttpTransport, RequestDispatcher};

pub use config::{cmd_config_path, cmd_config_show, cmd_set_key};
pub use enrich::cmd_enrich;
pub use fetch::cmd_fetch;

/// Lyrics Seeds CLI
#[derive(Parser)]
#[command(name = "lyrics-seeds", author, version, about, long_about = None)]
pub struct Cli {
    /// Apiseeds API key for this run (overrides the stored key)
    #[arg(long, global = true, env = "APISEEDS_API_KEY")]
    pub api_key: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Fetch lyrics for one track and print them
    Fetch {
        /// Artist name
        #[arg(short, long)]
        artist: String,
        /// Track title
        #[arg(short, long)]
        title: String,
    },
    /// Fetch lyrics for every audio file under a path
    Enrich {
        /// Path to file or directory to enrich
        path: PathBuf,
        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,
        /// Write found lyrics into the files' tags
        #[arg(long)]
        write: bool,
        /// Dry run - show what would be written without changing files
        #[arg(long)]
        dry_run: bool,
    },
}

/// `config` subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Store the Apiseeds API key
    SetKey {
        /// API key (get one at https://apiseeds.com)
        key: String,
    },
    /// Show the effective configuration
    Show,
    /// Print the config file location
    Path,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let settings = open_settings(cli.config.as_deref())?;

    match &cli.command {
        Commands::Config { action } => match action {
            ConfigAction::SetKey { key } => cmd_set_key(&settings, key),
            ConfigAction::Show => cmd_config_show(&settings, cli.api_key.is_some()),
            ConfigAction::Path => cmd_config_path(&settings),
        },
        Commands::Fetch { artist, title } => {
            let service = settings.config().service;
            lyrics::register_rate_policy(&service);
            let rt = Runtime::new()?;
            let credentials = credential_store(settings, cli.api_key.as_deref());
            cmd_fetch(&rt, credentials, &service, artist, title)
        }
        Commands::Enrich {
            path,
            recursive,
            write,
            dry_run,
        } => {
            let service = settings.config().service;
            lyrics::register_rate_policy(&service);
            let rt = Runtime::new()?;
            let credentials = credential_store(settings, cli.api_key.as_deref());
            cmd_enrich(&rt, credentials, &service, path, *recursive, *write, *dry_run)
        }
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Open the settings file given on the command line, or the default one.
fn open_settings(path: Option<&Path>) -> anyhow::Result<Arc<Settings>> {
    let settings = match path {
        Some(path) => Settings::open(path)?,
        None => Settings::open_default(),
    };
    Ok(Arc::new(settings))
}

/// The stored settings, or an in-memory copy carrying `api_key` when one was
/// given for this run.
pub(crate) fn credential_store(
    settings: Arc<Settings>,
    api_key: Option<&str>,
) -> Arc<dyn CredentialStore> {
    match api_key {
        Some(key) => {
            let mut config: Config = settings.config();
            config.credentials.apiseeds_apikey = Some(key.to_string());
            Arc::new(Settings::in_memory(config))
        }
        None => settings,
    }
}

/// Build a dispatcher on the current runtime.
pub(crate) fn build_dispatcher(
    credentials: Arc<dyn CredentialStore>,
    service: &ServiceConfig,
) -> anyhow::Result<RequestDispatcher> {
    let transport = Arc::new(HttpTransport::new()?);
    Ok(RequestDispatcher::with_service(credentials, transport, service))
}

/// Print how to provide an API key
pub(crate) fn print_api_key_instructions() {
    eprintln!("Error: Apiseeds API key required.");
    eprintln!("Get one at: https://apiseeds.com");
    eprintln!(
        "Then use: lyrics-seeds config set-key YOUR_KEY, --api-key YOUR_KEY or set APISEEDS_API_KEY"
    );
}

/// Whether a usable API key is available from `credentials`.
pub(crate) fn has_api_key(credentials: &dyn CredentialStore) -> bool {
    credentials.get(APIKEY_SETTING).is_some()
}

/// Collect audio files from a path (file or directory)
pub(crate) fn collect_audio_files(path: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = if recursive {
        walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_audio_file(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect()
    } else {
        std::fs::read_dir(path)
            .with_context(format!("listing {}", path.display()))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|e| is_audio_file(&e.path()))
            .map(|e| e.path())
            .collect()
    };
    files.sort();
    Ok(files)
}

/// Check if a path has an audio file extension
pub(crate) fn is_audio_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    matches!(ext.as_deref(), Some("mp3" | "flac" | "ogg" | "m4a" | "wav"))
}
