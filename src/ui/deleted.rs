use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::db::DeletedImage;

/// State for the Deleted Photos screen
pub struct DeletedView {
    pub entries: Vec<DeletedImage>,
    pub selected_index: usize,
    /// Days before a deleted photo is purged
    pub max_age_days: u32,
    /// Whether new deletes land here
    pub trash_enabled: bool,
}

impl DeletedView {
    pub fn new(max_age_days: u32, trash_enabled: bool) -> Self {
        Self {
            entries: Vec::new(),
            selected_index: 0,
            max_age_days,
            trash_enabled,
        }
    }

    pub fn move_down(&mut self) {
        if !self.entries.is_empty() && self.selected_index < self.entries.len() - 1 {
            self.selected_index += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn selected_entry(&self) -> Option<&DeletedImage> {
        self.entries.get(self.selected_index)
    }

    pub fn refresh(&mut self, entries: Vec<DeletedImage>) {
        self.entries = entries;
        if self.selected_index >= self.entries.len() {
            self.selected_index = self.entries.len().saturating_sub(1);
        }
    }
}

pub fn render(frame: &mut Frame, view: &DeletedView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // List
            Constraint::Length(2), // Help
        ])
        .split(area);

    let mut header_text = format!(
        " {} deleted photos | purged after {} days",
        view.entries.len(),
        view.max_age_days
    );
    if !view.trash_enabled {
        header_text.push_str(" | trash is off, new deletes are permanent");
    }
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Deleted Photos "),
        );
    frame.render_widget(header, chunks[0]);

    if view.entries.is_empty() {
        let empty_msg = Paragraph::new("  No deleted photos")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty_msg, chunks[1]);
    } else {
        let items: Vec<ListItem> = view
            .entries
            .iter()
            .map(|entry| {
                let name = std::path::Path::new(&entry.original_path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| entry.original_path.clone());
                let taken = entry.timestamp.as_deref().unwrap_or("unknown time");
                ListItem::new(Line::from(vec![
                    Span::styled(format!("  {:<32}", name), Style::default().fg(Color::White)),
                    Span::styled(format!(" {:<26}", taken), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!(" deleted {}", entry.deleted_at),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        let mut state = ListState::default();
        state.select(Some(view.selected_index));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    let help = Paragraph::new(" j/k:select | r:restore | D:delete permanently | Tab:menu | ?:help")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64) -> DeletedImage {
        DeletedImage {
            id,
            path: format!("/trash/{}.jpg", id),
            original_path: format!("/photos/{}.jpg", id),
            timestamp: Some("2024-12-01T00:00:00.000Z".to_string()),
            latitude: 0.0,
            longitude: 0.0,
            deleted_at: "2024-12-02 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_refresh_clamps_selection() {
        let mut view = DeletedView::new(30, true);
        view.refresh(vec![entry(1), entry(2), entry(3)]);
        view.move_down();
        view.move_down();
        view.move_down();
        assert_eq!(view.selected_entry().map(|e| e.id), Some(3));

        view.refresh(vec![entry(1)]);
        assert_eq!(view.selected_index, 0);

        view.refresh(Vec::new());
        assert!(view.selected_entry().is_none());
    }
}
