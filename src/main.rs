mod action;
mod api;
mod app;
mod auth;
mod config;
mod error;
mod event;
mod feed;
mod http;
mod tui;
mod types;
mod ui;

use std::fs::{File, OpenOptions};
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::{Action, Route};
use crate::api::Api;
use crate::app::App;
use crate::config::Config;
use crate::event::Event;
use crate::http::HttpApi;
use crate::tui::EventHandler;

/// Terminal client for paginated social feeds
#[derive(Parser, Debug)]
#[command(name = "chirp", version, about)]
struct Cli {
    /// API base URL, e.g. https://chirp.example.com/api
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token (overrides env var, stored token and token_command)
    #[arg(long)]
    token: Option<String>,

    /// Open this user's profile on start
    #[arg(long, value_name = "ID")]
    user: Option<u64>,

    /// Config file to use instead of ~/.config/chirp/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Log file under the cache dir. The terminal is taken over by the UI, so
/// logging to stderr is only a fallback.
fn log_file() -> Option<File> {
    let dir = dirs::cache_dir()?.join("chirp");
    std::fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("chirp.log"))
        .ok()
}

fn init_logging() {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    match log_file() {
        Some(file) => registry
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .init(),
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url.trim_end_matches('/').to_string();
    }

    let auth = auth::load_token(cli.token.as_deref(), &config.api)?;
    let api = HttpApi::new(config.api.base_url.clone(), auth)?;
    tracing::info!(?api, "starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(Arc::new(api), config, cli.user).await;

    tui::restore()?;

    result
}

async fn run(
    api: Arc<dyn Api>,
    config: Config,
    start_user: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(api, config, action_tx.clone());
    app.viewport_rows = tui::viewport_rows();
    app.spawn_load_current_user();

    action_tx.send(Action::Navigate(Route::Home))?;
    if let Some(user_id) = start_user {
        action_tx.send(Action::Navigate(Route::Profile(user_id)))?;
    }

    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
