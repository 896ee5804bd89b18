use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chatbox_core::{ChatBackend, ChatWidget, Completion, Config, HttpBackend, Locale};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod markdown;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

const DEFAULT_LOG_FILTER: &str = "chatbox=info,chatbox_core=info";

#[derive(Parser, Debug)]
#[command(name = "chatbox")]
#[command(version, about = "Terminal chat widget for a JSON /chat endpoint")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chat endpoint URL
    #[arg(long, global = true, env = "CHATBOX_ENDPOINT")]
    endpoint: Option<String>,

    /// Interface language (en, zh)
    #[arg(long, global = true, value_parser = parse_locale)]
    locale: Option<Locale>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the interactive UI writes its log
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive chat (default)
    Tui,
    /// Send one message and print the reply
    Ask {
        /// Message to send
        message: String,
    },
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    Locale::from_str(s).ok_or_else(|| {
        let known: Vec<&str> = Locale::all().iter().map(|l| l.as_str()).collect();
        format!("unknown locale '{}' (expected one of: {})", s, known.join(", "))
    })
}

impl Cli {
    /// Flags over file over defaults.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
        .context("Failed to load config")?;

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        Ok(config)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("chatbox"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chatbox.log")
}

/// The TUI owns the terminal, so logs go to a file.
fn init_file_logging(path: &Path) -> Result<WorkerGuard> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(env_filter())
        .init();

    Ok(guard)
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        None | Some(Commands::Tui) => {
            let log_path = config.log_file.clone().unwrap_or_else(default_log_path);
            let _guard = init_file_logging(&log_path)?;
            run_tui(&config).await
        }
        Some(Commands::Ask { message }) => {
            init_stderr_logging();
            run_ask(&config, &message).await
        }
    }
}

async fn run_tui(config: &Config) -> Result<()> {
    info!(endpoint = %config.endpoint, locale = config.locale.as_str(), "starting chatbox");

    let (widget_tx, widget_rx) = mpsc::unbounded_channel();
    let backend = Arc::new(HttpBackend::new(&config.endpoint));
    let widget = ChatWidget::new(backend, widget_tx, config.locale);
    let mut app = App::new(widget, &config.endpoint);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(widget_rx);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    info!("chatbox exited");
    result
}

async fn run_ask(config: &Config, message: &str) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        bail!("Message is empty");
    }

    let backend = HttpBackend::new(&config.endpoint);
    let completion = Completion::from_result(backend.send(message).await);
    let text = completion.render(config.locale);

    if completion.is_error() {
        bail!("{}", text);
    }
    println!("{}", text);
    Ok(())
}
