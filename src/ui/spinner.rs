//! In-flight indicator — a small spinner + label rendered in the top-right
//! corner of a given area.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// "sending…" indicator drawn on the response pane's top border while at
/// least one submission is outstanding.
pub struct SendIndicator {
    /// Outstanding submissions; nothing is drawn at zero.
    pub in_flight: usize,
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
}

impl SendIndicator {
    fn label(&self) -> String {
        let frame = SPINNER_FRAMES[(self.tick as usize) % SPINNER_FRAMES.len()];
        if self.in_flight > 1 {
            format!(" {frame} sending ×{} ", self.in_flight)
        } else {
            format!(" {frame} sending ")
        }
    }
}

impl Widget for SendIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.in_flight == 0 || area.width < 16 || area.height == 0 {
            return;
        }

        let label = self.label();
        let label_width = label.chars().count() as u16;
        // Top-right, leaving one column for the border corner.
        let x = area.x + area.width.saturating_sub(label_width + 2);
        let y = area.y;

        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        buf.set_line(x, y, &line, label_width);
    }
}
