//! Gallery screen: thumbnail grid over the filtered records.

use image::imageops::FilterType;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::StatefulImage;
use std::path::Path;

use crate::config::PreviewConfig;
use crate::db::ImageRecord;
use crate::gallery::GalleryBrowser;
use crate::ui::thumbnails::ImageCache;

/// Gallery view state
pub struct GalleryView {
    pub browser: GalleryBrowser,
    /// First visible row (for scrolling)
    pub scroll_offset: usize,
    thumbnails: ImageCache,
}

impl GalleryView {
    pub fn new(columns: usize, preview: &PreviewConfig) -> Self {
        Self {
            browser: GalleryBrowser::new(columns),
            scroll_offset: 0,
            thumbnails: ImageCache::new(preview.protocol, preview.thumbnail_size, FilterType::Triangle),
        }
    }

    /// Cell height that keeps thumbnails roughly square in a terminal where
    /// a cell is twice as tall as it is wide.
    fn cell_height(&self, area_width: u16) -> u16 {
        let cell_width = area_width / self.browser.columns as u16;
        (cell_width / 2).max(4)
    }

    pub fn visible_rows(&self, area: Rect) -> usize {
        (area.height / self.cell_height(area.width)).max(1) as usize
    }

    pub fn page_up(&mut self, visible_rows: usize) {
        let page_size = self.browser.columns * visible_rows;
        self.browser.selected = self.browser.selected.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, visible_rows: usize) {
        let page_size = self.browser.columns * visible_rows;
        let last = self.browser.visible.len().saturating_sub(1);
        self.browser.selected = (self.browser.selected + page_size).min(last);
    }

    /// Ensure selected item is visible
    pub fn ensure_visible(&mut self, visible_rows: usize) {
        let selected_row = self.browser.selected / self.browser.columns;

        if selected_row < self.scroll_offset {
            self.scroll_offset = selected_row;
        }
        if selected_row >= self.scroll_offset + visible_rows {
            self.scroll_offset = selected_row + 1 - visible_rows;
        }
    }

    /// Drop a cached thumbnail, e.g. after its record was deleted.
    pub fn forget(&mut self, path: &str) {
        self.thumbnails.remove(Path::new(path));
    }
}

/// Short label for a grid cell: the date and time part of the timestamp.
fn cell_title(record: &ImageRecord) -> String {
    record
        .timestamp
        .get(..16)
        .map(|s| s.replace('T', " "))
        .unwrap_or_else(|| record.timestamp.clone())
}

pub fn render(frame: &mut Frame, gallery: &mut GalleryView, area: Rect) {
    gallery.thumbnails.poll_async_loads();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(4),    // Grid
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let visible_rows = gallery.visible_rows(chunks[1]);
    gallery.ensure_visible(visible_rows);

    render_header(frame, gallery, chunks[0]);

    if gallery.browser.visible.is_empty() {
        let text = if gallery.browser.total() == 0 {
            "No photos yet. Take one on the Camera screen or import one."
        } else {
            "No photos match the search."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
    } else {
        render_grid(frame, gallery, chunks[1], visible_rows);
    }

    render_footer(frame, gallery, chunks[2]);
}

fn render_header(frame: &mut Frame, gallery: &GalleryView, area: Rect) {
    let browser = &gallery.browser;
    let mut header = format!(" Gallery | {} photos", browser.total());
    if !browser.query.is_empty() {
        header.push_str(&format!(" | Search: \"{}\" ({} shown)", browser.query, browser.visible.len()));
    }

    let paragraph = Paragraph::new(header)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

fn render_grid(frame: &mut Frame, gallery: &mut GalleryView, area: Rect, visible_rows: usize) {
    let columns = gallery.browser.columns;
    let cell_height = gallery.cell_height(area.width);

    let col_constraints: Vec<Constraint> = (0..columns)
        .map(|_| Constraint::Ratio(1, columns as u32))
        .collect();
    let row_constraints: Vec<Constraint> = (0..visible_rows)
        .map(|_| Constraint::Length(cell_height))
        .collect();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let actual_row = gallery.scroll_offset + row_idx;

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints.clone())
            .split(*row_area);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            let image_idx = actual_row * columns + col_idx;
            if let Some(record) = gallery.browser.visible.get(image_idx).cloned() {
                let is_selected = image_idx == gallery.browser.selected;
                render_thumbnail_cell(frame, gallery, &record, *cell_area, is_selected);
            }
        }
    }
}

fn render_thumbnail_cell(
    frame: &mut Frame,
    gallery: &mut GalleryView,
    record: &ImageRecord,
    area: Rect,
    is_selected: bool,
) {
    let border_color = if is_selected { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(cell_title(record));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 2 || inner.height < 2 {
        return;
    }

    let path = Path::new(&record.path);
    let centered = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
    if let Some(protocol) = gallery.thumbnails.load(path) {
        frame.render_stateful_widget(StatefulImage::new(None), inner, protocol);
    } else if gallery.thumbnails.is_loading(path) {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center);
        frame.render_widget(loading, centered);
    } else {
        let placeholder = if path.is_file() { "[ ]" } else { "[missing]" };
        let placeholder = Paragraph::new(placeholder)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(placeholder, centered);
    }
}

fn render_footer(frame: &mut Frame, gallery: &GalleryView, area: Rect) {
    let browser = &gallery.browser;
    let selected_info = match browser.selected_record() {
        Some(record) => format!(
            "#{} | {} | {}, {} | {}/{}",
            record.id,
            record.timestamp,
            record.latitude,
            record.longitude,
            browser.selected + 1,
            browser.visible.len()
        ),
        None => "No selection".to_string(),
    };

    let help = "Arrows:move | Enter:view | /:search | d:delete | Tab:menu | ?:help";

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    frame.render_widget(
        Paragraph::new(selected_info).style(Style::default().fg(Color::Yellow)),
        footer_chunks[0],
    );
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        footer_chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageProtocol;

    fn view(count: i64) -> GalleryView {
        let preview = PreviewConfig {
            protocol: ImageProtocol::None,
            ..PreviewConfig::default()
        };
        let mut view = GalleryView::new(3, &preview);
        view.browser.set_records(
            (1..=count)
                .map(|id| ImageRecord {
                    id,
                    path: format!("/photos/{}.jpg", id),
                    timestamp: format!("2024-12-01T10:00:{:02}.000Z", id),
                    latitude: 0.0,
                    longitude: 0.0,
                })
                .collect(),
        );
        view
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut view = view(20);
        view.browser.move_to_end();
        view.ensure_visible(2);
        // 20 items in 3 columns: last item is on row 6
        assert_eq!(view.scroll_offset, 5);

        view.browser.move_to_start();
        view.ensure_visible(2);
        assert_eq!(view.scroll_offset, 0);
    }

    #[test]
    fn test_paging_clamps() {
        let mut view = view(10);
        view.page_down(2);
        assert_eq!(view.browser.selected, 6);
        view.page_down(2);
        assert_eq!(view.browser.selected, 9);
        view.page_up(5);
        assert_eq!(view.browser.selected, 0);
    }

    #[test]
    fn test_oversized_column_count_still_lays_out() {
        let preview = PreviewConfig {
            protocol: ImageProtocol::None,
            ..PreviewConfig::default()
        };
        let view = GalleryView::new(65536, &preview);
        assert_eq!(view.visible_rows(Rect::new(0, 0, 80, 24)), 6);
    }

    #[test]
    fn test_cell_title() {
        let record = ImageRecord {
            id: 1,
            path: String::new(),
            timestamp: "2024-12-01T08:15:00.000Z".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };
        assert_eq!(cell_title(&record), "2024-12-01 08:15");

        let short = ImageRecord { timestamp: "today".to_string(), ..record };
        assert_eq!(cell_title(&short), "today");
    }
}
