//! Terminal dashboard for SwachhGrid: watch fill levels, acknowledge alerts, plan pickups.

mod app;
mod config;
mod input;
mod ui;

use std::{
    fs::File,
    io,
    sync::{Arc, Mutex},
    time::Duration as StdDuration,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use swachhgrid_core::{
    model::{BinUpdate, LocationType, NewBin},
    service::SwachhService,
};
use swachhgrid_store_memory::MemoryStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Config;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(&config)?;

    // Store + service setup
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(SwachhService::with_store(store, config.seed));
    if config.demo_data {
        service
            .initialize_demo_data()
            .await
            .context("Failed to load demo data")?;
    }

    // App state
    let mut app = App::new(Arc::clone(&service));
    app.refresh().await?;
    app.drain_notifications();
    info!(seed = config.seed, demo = config.demo_data, "dashboard starting");

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

    res
}

fn init_logging(config: &Config) -> Result<()> {
    // stdout belongs to the terminal UI, so logs only go to a file.
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        if app.drain_notifications() {
            reload(&mut app).await;
        }

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::Refresh => {
                    app.is_loading = true;
                    terminal.draw(|frame| ui::draw(frame, &app))?;
                    app.error_message = None;
                    reload(&mut app).await;
                    app.is_loading = false;
                }
                Action::LoadDemoData => {
                    if let Err(err) = app.service.initialize_demo_data().await {
                        app.error_message = Some(format!("Loading demo data failed: {err}"));
                    }
                }
                Action::SubmitFillLevel => {
                    let text = app.finish_input();
                    let Some(bin_id) = app.selected_bin().map(|bin| bin.id.clone()) else {
                        app.error_message = Some("No bin selected".into());
                        continue;
                    };
                    let Ok(fill_level) = text.trim().trim_end_matches('%').parse::<f64>() else {
                        app.error_message = Some(format!("Not a number: {text:?}"));
                        continue;
                    };

                    let res = app
                        .service
                        .update_bin(&bin_id, BinUpdate::fill_level(fill_level))
                        .await;
                    if let Err(err) = res {
                        app.error_message = Some(format!("Update failed: {err}"));
                    }
                }
                Action::SubmitNewBin => {
                    let text = app.finish_input();
                    let payload = match parse_new_bin(&text) {
                        Ok(payload) => payload,
                        Err(reason) => {
                            app.error_message = Some(reason);
                            continue;
                        }
                    };

                    if let Err(err) = app.service.create_bin(payload).await {
                        app.error_message = Some(format!("Create failed: {err}"));
                    }
                }
                Action::AcknowledgeSelected => {
                    let Some(alert_id) = app.selected_alert().map(|alert| alert.id.clone()) else {
                        app.error_message = Some("No alert selected".into());
                        continue;
                    };
                    if let Err(err) = app.service.acknowledge_alert(&alert_id).await {
                        app.error_message = Some(format!("Acknowledge failed: {err}"));
                    }
                }
            }
        }
    }

    Ok(())
}

async fn reload(app: &mut App) {
    if let Err(err) = app.refresh().await {
        error!(%err, "refresh failed");
        app.error_message = Some(format!("Refresh failed: {err}"));
    }
}

/// Parse `name; lat; lng; capacity; location type[; description]`.
fn parse_new_bin(input: &str) -> Result<NewBin, String> {
    let mut fields = input.split(';').map(str::trim);
    let mut next = |label: &str| {
        fields
            .next()
            .filter(|field| !field.is_empty())
            .ok_or_else(|| format!("Missing {label}"))
    };

    let name = next("name")?.to_owned();
    let latitude = next("latitude")?
        .parse::<f64>()
        .map_err(|err| format!("Bad latitude: {err}"))?;
    let longitude = next("longitude")?
        .parse::<f64>()
        .map_err(|err| format!("Bad longitude: {err}"))?;
    let capacity = next("capacity")?
        .parse::<u32>()
        .map_err(|err| format!("Bad capacity: {err}"))?;
    let location_type = next("location type")?.parse::<LocationType>()?;
    let description = next("description").ok().map(str::to_owned);

    Ok(NewBin {
        name,
        latitude,
        longitude,
        capacity,
        location_type,
        description,
    })
}
