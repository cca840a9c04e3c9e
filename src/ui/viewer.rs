//! Full-screen viewer over the gallery's filtered records.

use image::imageops::FilterType;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use ratatui_image::{Resize, StatefulImage};
use std::path::Path;

use crate::config::PreviewConfig;
use crate::db::ImageRecord;
use crate::ui::thumbnails::ImageCache;

pub struct ViewerView {
    pub records: Vec<ImageRecord>,
    pub current: usize,
    images: ImageCache,
}

impl ViewerView {
    pub fn new(records: Vec<ImageRecord>, start: usize, preview: &PreviewConfig) -> Self {
        let current = start.min(records.len().saturating_sub(1));
        Self {
            records,
            current,
            images: ImageCache::new(preview.protocol, preview.viewer_size, FilterType::Lanczos3),
        }
    }

    pub fn current_record(&self) -> Option<&ImageRecord> {
        self.records.get(self.current)
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.records.len() {
            self.current += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.current > 0 {
            self.current -= 1;
        }
    }

    pub fn first(&mut self) {
        self.current = 0;
    }

    pub fn last(&mut self) {
        self.current = self.records.len().saturating_sub(1);
    }
}

pub fn render(frame: &mut Frame, viewer: &mut ViewerView, area: Rect) {
    viewer.images.poll_async_loads();

    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(block, chunks[0]);

    if let Some(record) = viewer.current_record().cloned() {
        let path = Path::new(&record.path);
        if let Some(protocol) = viewer.images.load(path) {
            let image = StatefulImage::new(None).resize(Resize::Fit(None));
            frame.render_stateful_widget(image, chunks[0], protocol);
        } else {
            let text = if viewer.images.is_loading(path) {
                "Loading..."
            } else if !viewer.images.is_available() {
                "Image preview is not available in this terminal"
            } else {
                "Cannot display this photo"
            };
            let message = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(message, centered_rect(chunks[0], text.len() as u16, 1));
        }
    }

    render_status_bar(frame, viewer, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, viewer: &ViewerView, area: Rect) {
    let status_line = match viewer.current_record() {
        Some(record) => format!(
            " {}/{} | {} | {}, {} | {} ",
            viewer.current + 1,
            viewer.records.len(),
            record.timestamp,
            record.latitude,
            record.longitude,
            record.path
        ),
        None => " No photo ".to_string(),
    };

    let help = "h/l:prev/next | g/G:first/last | d:delete | Esc/q:close";

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    frame.render_widget(
        Paragraph::new(status_line).style(Style::default().fg(Color::Cyan)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageProtocol;

    fn records(count: i64) -> Vec<ImageRecord> {
        (1..=count)
            .map(|id| ImageRecord {
                id,
                path: format!("/photos/{}.jpg", id),
                timestamp: "2024-12-01T00:00:00.000Z".to_string(),
                latitude: 0.0,
                longitude: 0.0,
            })
            .collect()
    }

    fn preview() -> PreviewConfig {
        PreviewConfig {
            protocol: ImageProtocol::None,
            ..PreviewConfig::default()
        }
    }

    #[test]
    fn test_prev_next_stay_in_bounds() {
        let mut viewer = ViewerView::new(records(3), 1, &preview());
        viewer.next();
        viewer.next();
        assert_eq!(viewer.current_record().map(|r| r.id), Some(3));
        viewer.first();
        viewer.prev();
        assert_eq!(viewer.current, 0);
        viewer.last();
        assert_eq!(viewer.current, 2);
    }

    #[test]
    fn test_start_index_is_clamped() {
        let viewer = ViewerView::new(records(2), 10, &preview());
        assert_eq!(viewer.current, 1);

        let empty = ViewerView::new(Vec::new(), 3, &preview());
        assert!(empty.current_record().is_none());
    }
}
