//! Input handling — maps key events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Action;
use crate::core::filter::FilterKey;

use super::state::{ActiveView, AppState, Focus};

/// Lines moved per scroll action.
const SCROLL_STEP: u16 = 10;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Form => handle_form_key(state, key),
        ActiveView::Help => handle_help_key(state, key),
    }
}

/// Pasted text is appended to the input regardless of focus.
pub fn handle_paste(state: &mut AppState, text: &str) {
    if state.active_view != ActiveView::Form {
        return;
    }
    for ch in text.chars() {
        state.form.push_char(normalise_newline(ch));
    }
}

// ── Form view ───────────────────────────────────────────────────

fn handle_form_key(state: &mut AppState, key: KeyEvent) {
    let action = state.config.match_key(key);

    match state.focus {
        Focus::Input => match action {
            Some(action) if action.is_global() => run_action(state, action),
            _ => edit_input(state, key),
        },
        Focus::Options => {
            if let Some(action) = action {
                run_action(state, action);
            }
        }
    }
}

fn edit_input(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => state.form.push_char('\n'),
        KeyCode::Backspace => state.form.pop_char(),
        KeyCode::Char(ch) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            state.form.push_char(ch);
        }
        _ => {}
    }
}

fn run_action(state: &mut AppState, action: Action) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::Help => state.active_view = ActiveView::Help,
        Action::Submit => state.request_submit(),
        Action::SwitchFocus => {
            state.focus = match state.focus {
                Focus::Input if state.form.shows_options() => Focus::Options,
                _ => Focus::Input,
            };
        }
        Action::OptionUp => {
            state.option_cursor = state.option_cursor.saturating_sub(1);
        }
        Action::OptionDown => {
            if state.option_cursor + 1 < FilterKey::ALL.len() {
                state.option_cursor += 1;
            }
        }
        Action::ToggleOption => {
            let key = state.highlighted_option();
            state.form.toggle(key);
            state.response_scroll = 0;
        }
        Action::ClearSelection => {
            state.form.update_selection(Vec::new());
            state.response_scroll = 0;
        }
        Action::ScrollUp => {
            state.response_scroll = state.response_scroll.saturating_sub(SCROLL_STEP);
        }
        Action::ScrollDown => {
            let max = state.response_line_count().saturating_sub(1);
            let max = u16::try_from(max).unwrap_or(u16::MAX);
            state.response_scroll = state.response_scroll.saturating_add(SCROLL_STEP).min(max);
        }
    }
}

// ── Help popup ──────────────────────────────────────────────────

fn handle_help_key(state: &mut AppState, key: KeyEvent) {
    let closes = key.code == KeyCode::Esc
        || matches!(state.config.match_key(key), Some(Action::Help | Action::Quit));
    if closes {
        state.active_view = ActiveView::Form;
    }
}

fn normalise_newline(ch: char) -> char {
    if ch == '\r' {
        '\n'
    } else {
        ch
    }
}
