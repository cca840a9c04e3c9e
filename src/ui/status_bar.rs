use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;
use crate::ui::nav::Screen;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // A pending status message takes the whole bar
    if let Some(ref message) = app.status_message {
        let line = Line::from(vec![Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = Vec::new();

    spans.push(Span::styled(
        format!(" {} ", app.screen.title()),
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    let summary = match app.screen {
        Screen::Gallery => {
            let browser = &app.gallery.browser;
            if browser.visible.is_empty() {
                format!(" 0/{} ", browser.total())
            } else {
                format!(" {}/{} ", browser.selected + 1, browser.visible.len())
            }
        }
        Screen::Camera => format!(" camera: {:?} ", app.camera.session.permission()),
        Screen::Import => format!(
            " library: {:?} | {} photos ",
            app.import.session.permission(),
            app.import.assets.len()
        ),
        Screen::Deleted => format!(" {} deleted ", app.deleted.entries.len()),
    };
    spans.push(Span::styled(summary, Style::default().fg(Color::Gray)));

    let content_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let help_text = " Tab:menu ?:help q:quit ";
    let help_len = help_text.len();

    let available = area.width as usize;
    if available > content_len + help_len {
        spans.push(Span::raw(" ".repeat(available - content_len - help_len)));
    }

    spans.push(Span::styled(
        help_text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
