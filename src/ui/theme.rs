//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── form ───────────────────────────────────────────────────
    pub fn input_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn option_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn option_checked_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cursor_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn response_style() -> Style {
        Style::default().fg(Color::Green)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style(focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
