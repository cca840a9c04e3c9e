//! Confirmation dialog for destructive actions.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::db::{DeletedImage, ImageRecord};

/// The action pending confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    DeleteImage(ImageRecord),
    PurgeDeleted(DeletedImage),
}

pub struct ConfirmDialog {
    pub action: PendingAction,
    /// Description shown to user
    pub message: String,
}

impl ConfirmDialog {
    pub fn new(action: PendingAction, trash_enabled: bool) -> Self {
        let message = match &action {
            PendingAction::DeleteImage(record) if trash_enabled => format!(
                "Delete the photo taken {}? It can be restored from Deleted Photos.",
                record.timestamp
            ),
            PendingAction::DeleteImage(record) => format!(
                "Delete the photo taken {}? This cannot be undone.",
                record.timestamp
            ),
            PendingAction::PurgeDeleted(entry) => format!(
                "Permanently delete {}? This cannot be undone.",
                entry.original_path
            ),
        };
        Self { action, message }
    }
}

pub fn render(frame: &mut Frame, dialog: &ConfirmDialog, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 9.min(area.height);

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Message
            Constraint::Length(3), // Buttons
        ])
        .margin(1)
        .split(dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Delete Photo ");
    frame.render_widget(block, dialog_area);

    let message = Paragraph::new(dialog.message.as_str())
        .wrap(ratatui::widgets::Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(message, chunks[0]);

    let buttons = Line::from(vec![
        Span::styled("  [Enter/y] ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("Delete"),
        Span::raw("    "),
        Span::styled("[Esc/n] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw("Cancel"),
    ]);
    frame.render_widget(Paragraph::new(buttons).alignment(Alignment::Center), chunks[1]);
}
