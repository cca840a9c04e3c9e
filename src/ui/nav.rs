//! Drawer menu for switching screens.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

/// Top-level screens, in drawer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Gallery,
    Camera,
    Import,
    Deleted,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Gallery, Screen::Camera, Screen::Import, Screen::Deleted];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Gallery => "Gallery",
            Screen::Camera => "Camera",
            Screen::Import => "Import",
            Screen::Deleted => "Deleted Photos",
        }
    }

    /// Screen bound to a number key, `'1'` being the first.
    pub fn from_digit(c: char) -> Option<Screen> {
        let index = c.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

pub struct NavMenu {
    pub selected: usize,
}

impl NavMenu {
    pub fn new(current: Screen) -> Self {
        Self { selected: current.index() }
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % Screen::ALL.len();
    }

    pub fn move_up(&mut self) {
        self.selected = (self.selected + Screen::ALL.len() - 1) % Screen::ALL.len();
    }

    pub fn selected_screen(&self) -> Screen {
        Screen::ALL[self.selected.min(Screen::ALL.len() - 1)]
    }
}

pub fn render(frame: &mut Frame, menu: &NavMenu, current: Screen, area: Rect) {
    let width = 28.min(area.width);
    let drawer_area = Rect::new(area.x, area.y, width, area.height);

    frame.render_widget(Clear, drawer_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Menu ");
    let inner = block.inner(drawer_area);
    frame.render_widget(block, drawer_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let items: Vec<ListItem> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let marker = if *screen == current { "*" } else { " " };
            ListItem::new(format!(" {} {} {}", i + 1, marker, screen.title()))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default();
    state.select(Some(menu.selected));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let version = Paragraph::new(format!(" Version {}", env!("CARGO_PKG_VERSION")))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(version, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_digit() {
        assert_eq!(Screen::from_digit('1'), Some(Screen::Gallery));
        assert_eq!(Screen::from_digit('4'), Some(Screen::Deleted));
        assert_eq!(Screen::from_digit('0'), None);
        assert_eq!(Screen::from_digit('5'), None);
        assert_eq!(Screen::from_digit('x'), None);
    }

    #[test]
    fn test_menu_wraps() {
        let mut menu = NavMenu::new(Screen::Gallery);
        menu.move_up();
        assert_eq!(menu.selected_screen(), Screen::Deleted);
        menu.move_down();
        menu.move_down();
        assert_eq!(menu.selected_screen(), Screen::Camera);
    }
}
