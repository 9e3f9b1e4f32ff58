use std::fs::{self, OpenOptions};
use std::sync::Arc;
use anyhow::Result;
use log::{info, warn};
use vibecanvas_core::{Config, GeminiClient};

mod app;
mod handler;
mod preview;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config: {}", e);
        Config::new()
    });
    let client = GeminiClient::from_config(&config);
    info!(
        "Starting VibeCanvas (text model {}, image model {})",
        client.text_model(),
        client.image_model()
    );
    if config.resolve_api_key().is_empty() {
        warn!("No API key in API_KEY, GEMINI_API_KEY or config; requests will be rejected");
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut app = App::new(Arc::new(client));
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
        app.poll_generation().await;
    }
    Ok(())
}

/// Send logs to a file; stderr belongs to the terminal UI
fn init_logging() {
    let Some(log_dir) = dirs::cache_dir().map(|p| p.join("vibecanvas")) else {
        return;
    };
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("vibecanvas.log"))
    else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}
