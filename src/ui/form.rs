//! Form widgets: the input box, the option list, and the response pane.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::core::filter::FilterKey;

use super::theme::Theme;

// ───────────────────────────────────────── input ─────────────

/// Multi-line input box.  Always shows the tail of the text so the line
/// being typed stays visible.
pub struct InputBox<'a> {
    pub text: &'a str,
    pub focused: bool,
}

impl InputBox<'_> {
    fn block(&self) -> Block<'static> {
        Block::default()
            .title(" Enter data ")
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style(self.focused))
    }

    /// Lines to skip so the last line fits in `height` rows.
    fn skip(&self, height: u16) -> usize {
        let lines = self.text.split('\n').count();
        lines.saturating_sub(height as usize)
    }

    /// Where the terminal cursor belongs: just after the last character
    /// (in display columns, so wide glyphs count twice), clamped to the
    /// inner area.
    pub fn cursor(&self, area: Rect) -> Option<Position> {
        if !self.focused {
            return None;
        }
        let inner = self.block().inner(area);
        if inner.width == 0 || inner.height == 0 {
            return None;
        }
        let lines: Vec<&str> = self.text.split('\n').collect();
        let row = (lines.len() - 1 - self.skip(inner.height)) as u16;
        let col = lines.last().map_or(0, |l| Line::raw(*l).width());
        let col = u16::try_from(col).unwrap_or(u16::MAX).min(inner.width - 1);
        Some(Position::new(inner.x + col, inner.y + row))
    }
}

impl Widget for InputBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        let lines: Vec<Line> = self
            .text
            .split('\n')
            .skip(self.skip(inner.height))
            .map(|l| Line::raw(l.to_string()))
            .collect();
        Paragraph::new(lines)
            .style(Theme::input_style())
            .block(block)
            .render(area, buf);
    }
}

// ───────────────────────────────────────── options ───────────

/// Multi-select list over the three filter keys.
pub struct OptionList<'a> {
    pub selection: &'a [FilterKey],
    pub cursor: usize,
    pub focused: bool,
}

impl Widget for OptionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Select options ")
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style(self.focused));

        let lines: Vec<Line> = FilterKey::ALL
            .iter()
            .enumerate()
            .map(|(i, &key)| {
                let checked = self.selection.contains(&key);
                let mark = if checked { "[x]" } else { "[ ]" };
                let mut style = if checked {
                    Theme::option_checked_style()
                } else {
                    Theme::option_style()
                };
                if self.focused && i == self.cursor {
                    style = style.patch(Theme::cursor_style());
                }
                Line::from(Span::styled(format!(" {mark} {}", key.label()), style))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

// ───────────────────────────────────────── response ──────────

/// Read-only pane showing the rendered response text.
pub struct ResponseView<'a> {
    pub text: &'a str,
    pub scroll: u16,
}

impl Widget for ResponseView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Response ")
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style(false));

        Paragraph::new(self.text)
            .style(Theme::response_style())
            .scroll((self.scroll, 0))
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn option_list_marks_selected_keys() {
        let area = Rect::new(0, 0, 34, 5);
        let mut buf = Buffer::empty(area);
        OptionList {
            selection: &[FilterKey::Numbers],
            cursor: 0,
            focused: true,
        }
        .render(area, &mut buf);
        let rows = rows(&buf);
        assert!(rows[1].contains("[ ] Alphabets"));
        assert!(rows[2].contains("[x] Numbers"));
        assert!(rows[3].contains("[ ] Highest lowercase alphabet"));
    }

    #[test]
    fn input_box_keeps_last_line_visible() {
        let text = "1\n2\n3\n4\n5\n6\n7";
        let area = Rect::new(0, 0, 20, 5); // three inner rows
        let mut buf = Buffer::empty(area);
        let input = InputBox { text, focused: true };
        assert_eq!(input.cursor(area), Some(Position::new(2, 3)));
        input.render(area, &mut buf);
        let rows = rows(&buf);
        assert!(rows[1].starts_with("│5"));
        assert!(rows[3].starts_with("│7"));
    }

    #[test]
    fn cursor_follows_trailing_newline() {
        let area = Rect::new(0, 0, 20, 5);
        let input = InputBox { text: "ab\n", focused: true };
        assert_eq!(input.cursor(area), Some(Position::new(1, 2)));
        let unfocused = InputBox { text: "ab", focused: false };
        assert_eq!(unfocused.cursor(area), None);
    }

    #[test]
    fn cursor_counts_display_width_of_wide_chars() {
        let area = Rect::new(0, 0, 20, 5);
        let input = InputBox { text: "你好a", focused: true };
        assert_eq!(input.cursor(area), Some(Position::new(6, 1)));
    }

    #[test]
    fn response_view_scrolls() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        ResponseView { text: "{\n  \"a\": 1\n}", scroll: 1 }.render(area, &mut buf);
        let rows = rows(&buf);
        assert!(rows[1].contains("\"a\": 1"));
        assert!(rows[2].contains('}'));
    }
}
