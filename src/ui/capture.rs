//! Camera and Import screens. Both wrap a [`CaptureSession`]; the Import
//! screen adds a list of library assets to pick from.

use image::imageops::FilterType;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use ratatui_image::{Resize, StatefulImage};
use std::path::{Path, PathBuf};

use crate::capture::{CaptureSession, CaptureSource};
use crate::config::PreviewConfig;
use crate::db::ImageRecord;
use crate::device::{Devices, PermissionStatus};
use crate::ui::thumbnails::ImageCache;

/// Cache key for the in-memory camera capture.
const CAPTURED_KEY: &str = "<captured>";

pub struct CaptureView {
    pub session: CaptureSession,
    /// Library assets, populated on focus for the Import screen
    pub assets: Vec<PathBuf>,
    pub selected: usize,
    /// Most recently stored record, shown as confirmation
    pub last_saved: Option<ImageRecord>,
    preview: ImageCache,
    /// Whether the current capture decoded into a preview
    has_preview: bool,
}

impl CaptureView {
    pub fn new(source: CaptureSource, preview: &PreviewConfig) -> Self {
        Self {
            session: CaptureSession::new(source),
            assets: Vec::new(),
            selected: 0,
            last_saved: None,
            preview: ImageCache::new(preview.protocol, preview.viewer_size, FilterType::Triangle),
            has_preview: false,
        }
    }

    /// Re-ask for permission and, for the Import screen, re-list the assets.
    pub fn focus(&mut self, devices: &Devices) -> crate::error::Result<()> {
        let status = self.session.request_permission(devices);
        if self.session.source() == CaptureSource::Library {
            self.assets = if status.is_granted() {
                devices.library.list_assets()?
            } else {
                Vec::new()
            };
            self.selected = self.selected.min(self.assets.len().saturating_sub(1));
        }
        Ok(())
    }

    pub fn selected_asset(&self) -> Option<&PathBuf> {
        self.assets.get(self.selected)
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.assets.len() {
            self.selected += 1;
        }
    }

    /// Decode the captured photo for display.
    pub fn refresh_preview(&mut self) {
        let key = Path::new(CAPTURED_KEY);
        self.preview.remove(key);
        self.has_preview = match self.session.captured() {
            Some(photo) => self.preview.insert_bytes(key, &photo.bytes),
            None => false,
        };
    }

    pub fn clear_preview(&mut self) {
        self.preview.remove(Path::new(CAPTURED_KEY));
        self.has_preview = false;
    }
}

pub fn render(frame: &mut Frame, view: &mut CaptureView, area: Rect) {
    let source = view.session.source();
    let title = match source {
        CaptureSource::Camera => " Camera ",
        CaptureSource::Library => " Import ",
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    match view.session.permission() {
        PermissionStatus::Unknown => {
            render_message(frame, chunks[0], title, "Requesting permission...", Color::DarkGray);
        }
        PermissionStatus::Denied => {
            let text = format!("No access to {}", source.capability());
            render_message(frame, chunks[0], title, &text, Color::Red);
        }
        PermissionStatus::Granted => {
            if source == CaptureSource::Library && view.session.captured().is_none() {
                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .split(chunks[0]);
                render_asset_list(frame, view, body[0]);
                render_preview(frame, view, body[1], title);
            } else {
                render_preview(frame, view, chunks[0], title);
            }
        }
    }

    render_footer(frame, view, chunks[1]);
}

fn render_message(frame: &mut Frame, area: Rect, title: &str, text: &str, color: Color) {
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title.to_string()),
        );
    frame.render_widget(paragraph, area);
}

fn render_asset_list(frame: &mut Frame, view: &CaptureView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Library ({}) ", view.assets.len()));

    if view.assets.is_empty() {
        let empty = Paragraph::new("  No photos found")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = view
        .assets
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());
            ListItem::new(format!("  {}", name))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(Some(view.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_preview(frame: &mut Frame, view: &mut CaptureView, area: Rect, title: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title.to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = match view.session.captured() {
        Some(photo) => {
            if view.has_preview {
                if let Some(protocol) = view.preview.load(Path::new(CAPTURED_KEY)) {
                    let image = StatefulImage::new(None).resize(Resize::Fit(None));
                    frame.render_stateful_widget(image, inner, protocol);
                    return;
                }
            }
            format!("Photo ready ({} bytes)", photo.bytes.len())
        }
        None => match (&view.last_saved, view.session.source()) {
            (Some(record), _) => format!("Saved photo #{} at {}", record.id, record.timestamp),
            (None, CaptureSource::Camera) => "Press c or Space to take a photo".to_string(),
            (None, CaptureSource::Library) => "Press Enter to pick the selected photo".to_string(),
        },
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    let centered = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, inner.height.min(1));
    frame.render_widget(paragraph, centered);
}

fn render_footer(frame: &mut Frame, view: &CaptureView, area: Rect) {
    let info = match view.session.captured() {
        Some(photo) => match &photo.embedded_location {
            Some(point) => format!("Location from photo: {}, {}", point.latitude, point.longitude),
            None => "Location: current position, or 0, 0 when unknown".to_string(),
        },
        None => match view.selected_asset() {
            Some(path) if view.session.source() == CaptureSource::Library => {
                path.to_string_lossy().to_string()
            }
            _ => String::new(),
        },
    };

    let help = if view.session.captured().is_some() {
        "Enter/s:save | Esc/x:discard | Tab:menu"
    } else {
        match view.session.source() {
            CaptureSource::Camera => "c/Space:capture | Tab:menu | ?:help",
            CaptureSource::Library => "j/k:select | Enter:pick | r:rescan | Tab:menu | ?:help",
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    frame.render_widget(
        Paragraph::new(info).style(Style::default().fg(Color::Yellow)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::tests::devices;
    use crate::config::ImageProtocol;

    fn preview() -> PreviewConfig {
        PreviewConfig {
            protocol: ImageProtocol::None,
            ..PreviewConfig::default()
        }
    }

    #[test]
    fn test_focus_lists_assets_when_granted() {
        let devices = devices(PermissionStatus::Granted, PermissionStatus::Granted);
        let mut view = CaptureView::new(CaptureSource::Library, &preview());

        view.focus(&devices).unwrap();

        assert_eq!(view.session.permission(), PermissionStatus::Granted);
        assert!(!view.assets.is_empty());
        assert!(view.selected_asset().is_some());
    }

    #[test]
    fn test_focus_denied_clears_assets() {
        let devices = devices(PermissionStatus::Granted, PermissionStatus::Denied);
        let mut view = CaptureView::new(CaptureSource::Library, &preview());
        view.assets = vec![PathBuf::from("/stale.jpg")];

        view.focus(&devices).unwrap();

        assert_eq!(view.session.permission(), PermissionStatus::Denied);
        assert!(view.assets.is_empty());
    }

    #[test]
    fn test_asset_selection_bounds() {
        let mut view = CaptureView::new(CaptureSource::Library, &preview());
        view.assets = vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")];

        view.move_up();
        assert_eq!(view.selected, 0);
        view.move_down();
        view.move_down();
        assert_eq!(view.selected_asset(), Some(&PathBuf::from("b.jpg")));
    }
}
