//! tableport - import a warehouse table into a workspace from the terminal
//!
//! Entry point: settings, logging and the runtime are set up here, then the
//! component loop runs until the table is created or the user quits.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod theme;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::{Cli, Config};
use crate::services::{HttpApi, SessionProvider, StaticSession, TaskRunner, WorkspaceApi};
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config_path() {
        Some(path) => Config::load_from(&path)?,
        None => Config::default(),
    };
    config.apply_cli(&cli);
    config.validate()?;

    if cli.save_config {
        let path = cli
            .config_path()
            .context("no home directory to store the config in")?;
        config.save_to(&path)?;
    }

    if let Some(path) = cli.log_path() {
        logging::init(&path)?;
    }
    tracing::info!(
        workspace_id = %config.workspace_id,
        api = %config.api_base_url,
        selector = config.with_data_source_selector,
        "starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let api: Arc<dyn WorkspaceApi> = Arc::new(HttpApi::new(&config.api_base_url)?);
    let session: Arc<dyn SessionProvider> = Arc::new(StaticSession::new(cli.token.clone()));
    let tasks = TaskRunner::new(
        runtime.handle().clone(),
        api,
        session,
        &config.token_template,
    );

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    let mut app = App::new(&config, tasks);
    app.init();

    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    if let Some(route) = app.navigate_to.as_deref() {
        println!("Table created: {}", config.web_url(route));
    }

    runtime.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::warn!(error = %e, "draw failed");
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
