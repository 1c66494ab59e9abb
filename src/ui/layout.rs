//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the input box including its border.
const INPUT_HEIGHT: u16 = 7;
/// Width of the option list including its border.
const OPTIONS_WIDTH: u16 = 34;

/// Primary screen layout: title, input, options + response, status bar.
pub struct AppLayout {
    pub title_area: Rect,
    pub input_area: Rect,
    /// `None` while the option list is hidden.
    pub options_area: Option<Rect>,
    pub response_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect, show_options: bool) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),            // title
                Constraint::Length(INPUT_HEIGHT), // input box
                Constraint::Min(3),               // options + response
                Constraint::Length(1),            // status bar
            ])
            .split(area);

        let (options_area, response_area) = if show_options {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(OPTIONS_WIDTH), Constraint::Min(10)])
                .split(rows[2]);
            (Some(cols[0]), cols[1])
        } else {
            (None, rows[2])
        };

        Self {
            title_area: rows[0],
            input_area: rows[1],
            options_area,
            response_area,
            status_area: rows[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_options_give_response_full_width() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = AppLayout::from_area(area, false);
        assert!(layout.options_area.is_none());
        assert_eq!(layout.response_area.width, 100);

        let layout = AppLayout::from_area(area, true);
        assert_eq!(layout.options_area.map(|r| r.width), Some(OPTIONS_WIDTH));
        assert_eq!(layout.response_area.width, 100 - OPTIONS_WIDTH);
        assert_eq!(layout.status_area.y, 29);
    }
}
