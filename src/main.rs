use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc;

use lenta::app::{App, AppEvent};
use lenta::article::load_sections;
use lenta::callbacks::ArticleCallbacks;
use lenta::config::Config;
use lenta::remote::HttpCallbacks;
use lenta::ui;

/// Get the config directory path (~/.config/lenta/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("lenta");
    Ok(config_dir)
}

/// Create the config directory if needed and restrict it to the current user.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    Ok(())
}

/// Send tracing output to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Pick the engagement handlers: the HTTP adapter when an API is configured,
/// otherwise handlers that only log.
fn build_callbacks(config: &Config) -> Result<ArticleCallbacks> {
    match config.api.base_url.as_deref() {
        Some(base_url) => {
            let token = config.api_token().map(SecretString::from);
            let http = HttpCallbacks::new(base_url, token)
                .with_context(|| format!("Invalid [api] base_url '{}'", base_url))?;
            tracing::info!(base_url, "Using HTTP engagement API");
            Ok(http.into_callbacks())
        }
        None => {
            tracing::info!("No engagement API configured, actions are only logged");
            Ok(ArticleCallbacks::logging())
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lenta", about = "Terminal article browser")]
struct Args {
    /// Articles JSON document (defaults to ~/.config/lenta/articles.json)
    #[arg(long, value_name = "FILE")]
    articles: Option<PathBuf>,

    /// Config file (defaults to ~/.config/lenta/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Title for a bare article array (overrides `default_title`)
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// Log file (defaults to ~/.config/lenta/lenta.log)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| config_dir.join("lenta.log"));
    init_logging(&log_path)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;
    tracing::debug!(?config, "Configuration loaded");

    let articles_path = args
        .articles
        .clone()
        .unwrap_or_else(|| config_dir.join("articles.json"));
    if !articles_path.exists() {
        eprintln!("Error: No articles file found at {}", articles_path.display());
        eprintln!();
        eprintln!("Pass one explicitly:");
        eprintln!("  lenta --articles /path/to/articles.json");
        std::process::exit(1);
    }

    let default_title = args.title.as_deref().unwrap_or(&config.default_title);
    let sections = load_sections(&articles_path, default_title).with_context(|| {
        format!("Failed to load articles from '{}'", articles_path.display())
    })?;
    if sections.iter().all(|s| s.articles.is_empty()) {
        eprintln!("Warning: No articles found in {}", articles_path.display());
    }

    let callbacks = build_callbacks(&config)?;

    // Create event channel for callbacks and background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    let mut app = App::new(sections, &config, callbacks, &event_tx);

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
