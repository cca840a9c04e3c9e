use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

/// State for the gallery search prompt. The gallery is filtered live as
/// the query changes.
pub struct SearchDialog {
    pub query: String,
    /// Cursor position, in characters
    pub cursor: usize,
    /// Query in effect when the dialog opened, restored on cancel
    pub previous: String,
}

impl SearchDialog {
    pub fn new(current: &str) -> Self {
        Self {
            query: current.to_string(),
            cursor: current.chars().count(),
            previous: current.to_string(),
        }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.query
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    pub fn handle_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.query.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.query.remove(idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.query.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }
}

pub fn render(frame: &mut Frame, dialog: &SearchDialog, matches: usize, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 6;

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height.min(area.height));

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Search by date or location ");
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Input
            Constraint::Length(1), // Match count
            Constraint::Min(0),
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(dialog.query.as_str()),
    ]));
    frame.render_widget(input, chunks[0]);
    frame.set_cursor_position(Position::new(
        chunks[0].x + 2 + dialog.cursor as u16,
        chunks[0].y,
    ));

    let count = Paragraph::new(format!("{} matching photos", matches))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(count, chunks[1]);

    let help = Paragraph::new("Enter:keep | Esc:cancel | Ctrl+U:clear")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing() {
        let mut dialog = SearchDialog::new("2024");
        assert_eq!(dialog.cursor, 4);

        dialog.handle_char('-');
        dialog.handle_char('1');
        assert_eq!(dialog.query, "2024-1");

        dialog.move_cursor_left();
        dialog.backspace();
        assert_eq!(dialog.query, "20241");
        assert_eq!(dialog.previous, "2024");

        dialog.clear();
        assert!(dialog.query.is_empty());
        dialog.move_cursor_right();
        assert_eq!(dialog.cursor, 0);
    }

    #[test]
    fn test_multibyte_input() {
        let mut dialog = SearchDialog::new("");
        dialog.handle_char('°');
        dialog.handle_char('N');
        dialog.move_cursor_left();
        dialog.backspace();
        assert_eq!(dialog.query, "N");
    }
}
