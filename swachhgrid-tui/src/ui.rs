use chrono::{DateTime, Local, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};
use swachhgrid_core::model::{BinStatus, Severity};

use crate::app::{App, InputMode, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, stats, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, stats_area, content_area, status_area] = chunks else {
        return;
    };

    let tabs = [Screen::Bins, Screen::Alerts, Screen::Route]
        .into_iter()
        .map(|screen| {
            let label = screen_label(screen);
            if screen == app.screen {
                Span::styled(format!("[{label}]"), Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(format!(" {label} "))
            }
        })
        .collect::<Vec<Span<'_>>>();
    let header = Paragraph::new(Line::from(tabs)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("SwachhGrid - smart waste bins"),
    );
    frame.render_widget(header, *header_area);

    draw_stats(frame, app, *stats_area);

    match app.screen {
        Screen::Bins => draw_bins(frame, app, *content_area),
        Screen::Alerts => draw_alerts(frame, app, *content_area),
        Screen::Route => draw_route(frame, app, *content_area),
    }

    draw_status(frame, app, *status_area);
}

fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Bins => "Bins",
        Screen::Alerts => "Alerts",
        Screen::Route => "Route",
    }
}

fn draw_stats(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let stats = &app.stats;
    let line = Line::from(vec![
        Span::raw(format!("{} bins · ", stats.total_bins)),
        Span::styled(
            format!("{} critical", stats.critical_bins),
            Style::default().fg(status_color(BinStatus::Critical)),
        ),
        Span::raw(" · "),
        Span::styled(
            format!("{} warning", stats.warning_bins),
            Style::default().fg(status_color(BinStatus::Warning)),
        ),
        Span::raw(" · "),
        Span::styled(
            format!("{} normal", stats.normal_bins),
            Style::default().fg(status_color(BinStatus::Normal)),
        ),
        Span::raw(format!(
            " · avg fill {:.1}% · {} need collection",
            stats.average_fill_level, stats.bins_needing_collection
        )),
    ]);

    let paragraph =
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Dashboard"));
    frame.render_widget(paragraph, area);
}

fn draw_bins(frame: &mut Frame<'_>, app: &App, area: Rect) {
    if app.bins.is_empty() {
        let paragraph = Paragraph::new("No bins yet. Press n to add one or d to load demo data.")
            .block(Block::default().borders(Borders::ALL).title("Bins"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = app.bins.iter().map(|bin| {
        Row::new(vec![
            Cell::from(bin.id.to_string()),
            Cell::from(bin.name.clone()),
            Cell::from(format!("{:.1}%", bin.fill_level)),
            Cell::from(bin.status.to_string()),
            Cell::from(bin.location_type.to_string()),
            Cell::from(bin.capacity.to_string()),
            Cell::from(bin.predicted_full_time.map_or_else(|| "-".to_owned(), short_time)),
            Cell::from(bin.description.clone().unwrap_or_default()),
        ])
        .style(Style::default().fg(status_color(bin.status)))
    });

    let column_widths = [
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Id", "Name", "Fill", "Status", "Location", "Cap", "Full by", "Note"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Bins (↑/↓, e edit fill level, n new bin)"),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(app.bin_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_alerts(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = if app.alerts.is_empty() {
        vec![ListItem::new("No alerts.")]
    } else {
        app.alerts
            .iter()
            .map(|alert| {
                let mark = if alert.acknowledged { "✓" } else { "!" };
                let text = format!(
                    "{mark} {:<9} {:<8} {} · {}",
                    alert.id.to_string(),
                    alert.severity.to_string(),
                    short_time(alert.created_at),
                    alert.message
                );
                let mut style = Style::default().fg(severity_color(alert.severity));
                if alert.acknowledged {
                    style = style.add_modifier(Modifier::DIM);
                }
                ListItem::new(text).style(style)
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Alerts (↑/↓, a/Enter acknowledge)"),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.alerts.is_empty() {
        state.select(Some(app.alert_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_route(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let route = &app.route;
    let title = format!(
        "Collection route · {} stops · {:.2} km · ~{:.1} min (o/Enter recompute)",
        route.stop_count(),
        route.total_distance,
        route.estimated_time
    );

    if route.is_empty() {
        let paragraph = Paragraph::new("No bins at or above 75%, nothing to collect.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = route
        .bin_ids
        .iter()
        .zip(&route.coordinates)
        .zip(1..)
        .map(|((id, [latitude, longitude]), stop)| {
            let name = app
                .bins
                .iter()
                .find(|bin| &bin.id == id)
                .map_or("<unknown>", |bin| bin.name.as_str());
            Row::new(vec![
                Cell::from(format!("{stop}.")),
                Cell::from(id.to_string()),
                Cell::from(name.to_owned()),
                Cell::from(format!("{latitude:.4}, {longitude:.4}")),
            ])
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(vec!["#", "Bin", "Name", "Position"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(title))
    .column_spacing(1);

    frame.render_widget(table, area);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (title, text) = match app.input_mode {
        InputMode::FillLevel => {
            let bin = app.selected_bin().map_or("<bin>", |bin| bin.name.as_str());
            (
                format!("New fill level for {bin} (0-100, Enter save, Esc cancel)"),
                app.input.clone(),
            )
        }
        InputMode::NewBin => (
            "New bin: name; lat; lng; capacity; street|park|commercial|residential[; note]"
                .to_owned(),
            app.input.clone(),
        ),
        InputMode::Browse => {
            let nav_hint = "Tab switch view · r refresh · d demo data · q/Ctrl-C quit";
            let text = if app.is_loading {
                format!("Loading… · {nav_hint}")
            } else if let Some(msg) = &app.error_message {
                format!("{msg} · {nav_hint}")
            } else if let Some(msg) = &app.info_message {
                format!("{msg} · {nav_hint}")
            } else {
                nav_hint.to_owned()
            };
            ("Status".to_owned(), text)
        }
    };

    let style = if app.input_mode != InputMode::Browse {
        Style::default().fg(Color::Cyan)
    } else if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(style)
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn status_color(status: BinStatus) -> Color {
    match status {
        BinStatus::Normal => Color::Green,
        BinStatus::Warning => Color::Yellow,
        BinStatus::Critical => Color::Red,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => Color::Gray,
        Severity::Medium => Color::Blue,
        Severity::High => Color::Yellow,
        Severity::Critical => Color::Red,
    }
}

fn short_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%d.%m %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{Terminal, backend::TestBackend};
    use swachhgrid_core::service::SwachhService;
    use swachhgrid_store_memory::MemoryStore;

    use super::*;

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("test terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn labels_use_plain_hyphens() {
        let service = SwachhService::with_store(Arc::new(MemoryStore::new()), 1);
        let mut app = App::new(Arc::new(service));
        app.screen = Screen::Route;
        app.input_mode = InputMode::FillLevel;

        let screen = rendered(&app);
        assert!(screen.contains("SwachhGrid - smart waste bins"), "{screen}");
        assert!(
            screen.contains("No bins at or above 75%, nothing to collect."),
            "{screen}"
        );
        assert!(screen.contains("(0-100, Enter save, Esc cancel)"), "{screen}");
        assert!(!screen.contains('\u{2013}'), "en dash in {screen}");
    }
}
