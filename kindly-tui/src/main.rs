//! Terminal UI for Kindly that lets visitors browse pages and filter care providers.

mod app;
mod config;
mod input;
mod pages;
mod telemetry;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kindly_core::ViewRouter;
use kindly_gateway_http::HttpProviderGateway;
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::info;

use crate::app::App;
use crate::config::{Cli, Config};
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_cli(Cli::parse());
    telemetry::init(&config)?;
    info!(api_url = %config.api_url, "starting kindly");

    // HTTP + gateway setup
    let client = Client::builder()
        .user_agent("kindly/0.1")
        .timeout(config.http_timeout)
        .build()?;
    let gateway = Arc::new(HttpProviderGateway::new(client, &config.api_url)?);
    let router = ViewRouter::new(gateway).with_initial_category(config.initial_category);

    // App state
    let mut app = App::new(router);
    app.navigate(&config.start_path);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("kindly stopped");
    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Pick up answers that arrived since the last frame
        app.sync_results();

        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout so completions show up quickly)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Cycle(step) => app.navigate_relative(step),
                Action::SelectCategory(category) => app.select_category(category),
            }
        }

        // Let spawned queries make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}
