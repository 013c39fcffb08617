use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Reload bins, alerts, stats, and route.
    Refresh,
    /// Run `service.update_bin`(...) with the typed fill level
    SubmitFillLevel,
    /// Run `service.create_bin`(...) with the typed record
    SubmitNewBin,
    /// Run `service.acknowledge_alert`(...) for the selected alert
    AcknowledgeSelected,
    /// Run `service.initialize_demo_data`()
    LoadDemoData,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Tab, Up};

    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.input_mode != InputMode::Browse {
        return match key.code {
            Char(character)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                app.input.push(character);
                Action::None
            }
            Backspace => {
                app.input.pop();
                Action::None
            }
            Enter => match app.input_mode {
                InputMode::FillLevel => Action::SubmitFillLevel,
                InputMode::NewBin => Action::SubmitNewBin,
                InputMode::Browse => Action::None,
            },
            Esc => {
                app.finish_input();
                Action::None
            }
            _ => Action::None,
        };
    }

    match key.code {
        Char('q') if key.modifiers.is_empty() => return Action::Quit,
        Tab => {
            app.screen = app.screen.next();
            return Action::None;
        }
        Char('r') => return Action::Refresh,
        Char('d') => return Action::LoadDemoData,
        _ => {}
    }

    let mut action = Action::None;

    match app.screen {
        Screen::Bins => match key.code {
            Up | Char('k') => app.bin_index = app.bin_index.saturating_sub(1),
            Down | Char('j') => {
                if app.bin_index + 1 < app.bins.len() {
                    app.bin_index += 1;
                }
            }
            Char('e') | Enter => {
                if app.selected_bin().is_some() {
                    app.start_input(InputMode::FillLevel);
                }
            }
            Char('n') => app.start_input(InputMode::NewBin),
            _ => {}
        },

        Screen::Alerts => match key.code {
            Up | Char('k') => app.alert_index = app.alert_index.saturating_sub(1),
            Down | Char('j') => {
                if app.alert_index + 1 < app.alerts.len() {
                    app.alert_index += 1;
                }
            }
            Char('a') | Enter => action = Action::AcknowledgeSelected,
            _ => {}
        },

        Screen::Route => {
            if matches!(key.code, Char('o') | Enter) {
                action = Action::Refresh;
            }
        }
    }
    action
}
