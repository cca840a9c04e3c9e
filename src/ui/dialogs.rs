use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan)))
}

pub fn render_help(frame: &mut Frame, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 34.min(area.height.saturating_sub(2));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let help_text = vec![
        heading("Screens"),
        Line::from(""),
        Line::from("  Tab / m    Open the menu"),
        Line::from("  1-4        Gallery, Camera, Import, Deleted Photos"),
        Line::from(""),
        heading("Gallery"),
        Line::from(""),
        Line::from("  h j k l    Move (arrow keys work too)"),
        Line::from("  g / G      First / last photo"),
        Line::from("  PgUp/PgDn  Page up / down"),
        Line::from("  Enter / v  View full screen"),
        Line::from("  /          Search by date or location"),
        Line::from("  d          Delete the selected photo"),
        Line::from("  R          Reload"),
        Line::from(""),
        heading("Camera and Import"),
        Line::from(""),
        Line::from("  c / Space  Take a photo"),
        Line::from("  Enter      Pick the selected photo / save"),
        Line::from("  s          Save the captured photo"),
        Line::from("  Esc / x    Discard the captured photo"),
        Line::from(""),
        heading("Deleted Photos"),
        Line::from(""),
        Line::from("  r          Restore"),
        Line::from("  D          Delete permanently"),
        Line::from(""),
        heading("General"),
        Line::from(""),
        Line::from("  ?          Toggle this help"),
        Line::from("  q          Quit"),
    ];

    let paragraph = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help "),
        );

    frame.render_widget(paragraph, dialog_area);
}
