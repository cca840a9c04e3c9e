pub mod capture;
pub mod confirm_dialog;
pub mod deleted;
mod dialogs;
pub mod gallery;
pub mod nav;
pub mod search_dialog;
mod status_bar;
pub mod thumbnails;
pub mod viewer;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs},
};

use crate::app::{App, AppMode};
use nav::Screen;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // The viewer takes the whole terminal
    if app.mode == AppMode::Viewer || (app.mode == AppMode::Confirm && app.viewer.is_some()) {
        if let Some(ref mut viewer) = app.viewer {
            viewer::render(frame, viewer, area);
        }
        if let Some(ref dialog) = app.confirm_dialog {
            confirm_dialog::render(frame, dialog, area);
        }
        return;
    }

    // Main layout: tabs + screen + status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(frame, app.screen, main_chunks[0]);

    match app.screen {
        Screen::Gallery => gallery::render(frame, &mut app.gallery, main_chunks[1]),
        Screen::Camera => capture::render(frame, &mut app.camera, main_chunks[1]),
        Screen::Import => capture::render(frame, &mut app.import, main_chunks[1]),
        Screen::Deleted => deleted::render(frame, &app.deleted, main_chunks[1]),
    }

    status_bar::render(frame, app, main_chunks[2]);

    match app.mode {
        AppMode::Menu => nav::render(frame, &app.nav, app.screen, main_chunks[1]),
        AppMode::Search => {
            if let Some(ref dialog) = app.search_dialog {
                search_dialog::render(frame, dialog, app.gallery.browser.visible.len(), area);
            }
        }
        AppMode::Confirm => {
            if let Some(ref dialog) = app.confirm_dialog {
                confirm_dialog::render(frame, dialog, area);
            }
        }
        AppMode::Help => dialogs::render_help(frame, area),
        AppMode::Normal | AppMode::Viewer => {}
    }
}

fn render_tabs(frame: &mut Frame, current: Screen, area: Rect) {
    let titles: Vec<String> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| format!("{} {}", i + 1, screen.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" snapshelf "),
        )
        .select(current.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}
