use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::time::Duration;

use crate::capture::CaptureSource;
use crate::config::Config;
use crate::db::Database;
use crate::device::Devices;
use crate::gallery;
use crate::storage::PhotoStorage;
use crate::trash::TrashManager;
use crate::ui;
use crate::ui::capture::CaptureView;
use crate::ui::confirm_dialog::{ConfirmDialog, PendingAction};
use crate::ui::deleted::DeletedView;
use crate::ui::gallery::GalleryView;
use crate::ui::nav::{NavMenu, Screen};
use crate::ui::search_dialog::SearchDialog;
use crate::ui::viewer::ViewerView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Menu,
    Search,
    Confirm,
    Viewer,
    Help,
}

pub struct App {
    pub config: Config,
    pub db: Database,
    pub storage: PhotoStorage,
    /// Manages photos already in the trash; new deletes only use it when
    /// the trash is enabled
    pub trash: TrashManager,
    pub devices: Devices,
    pub screen: Screen,
    pub mode: AppMode,
    pub gallery: GalleryView,
    pub camera: CaptureView,
    pub import: CaptureView,
    pub deleted: DeletedView,
    pub viewer: Option<ViewerView>,
    pub nav: NavMenu,
    pub search_dialog: Option<SearchDialog>,
    pub confirm_dialog: Option<ConfirmDialog>,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Grid rows visible at the last draw, used for paging
    visible_rows: usize,
}

impl App {
    pub fn new(config: Config, db: Database, devices: Devices) -> Self {
        let storage = PhotoStorage::new(config.library.path.clone());
        let trash = TrashManager::new(config.trash.clone());
        let gallery = GalleryView::new(config.library.grid_columns, &config.preview);
        let camera = CaptureView::new(CaptureSource::Camera, &config.preview);
        let import = CaptureView::new(CaptureSource::Library, &config.preview);
        let deleted = DeletedView::new(trash.max_age_days(), config.trash.enabled);

        let mut app = Self {
            config,
            db,
            storage,
            trash,
            devices,
            screen: Screen::Gallery,
            mode: AppMode::Normal,
            gallery,
            camera,
            import,
            deleted,
            viewer: None,
            nav: NavMenu::new(Screen::Gallery),
            search_dialog: None,
            confirm_dialog: None,
            should_quit: false,
            status_message: None,
            visible_rows: 1,
        };
        app.focus_screen();
        app
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| {
                // Tabs and status bar take 4 rows, the gallery header and footer 3
                let grid_height = frame.area().height.saturating_sub(7);
                let grid = Rect::new(0, 0, frame.area().width, grid_height);
                self.visible_rows = self.gallery.visible_rows(grid);
                ui::render(frame, self);
            })?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key)?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Log a failure and surface it in the status bar.
    fn report(&mut self, context: &str, err: impl std::fmt::Display) {
        tracing::error!("{}: {}", context, err);
        self.status_message = Some(format!("{}: {}", context, err));
    }

    // ========================================================================
    // Screens
    // ========================================================================

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.nav.selected = screen.index();
        self.mode = AppMode::Normal;
        self.focus_screen();
    }

    /// Re-fetch whatever the current screen shows.
    pub fn focus_screen(&mut self) {
        tracing::debug!("Focus {}", self.screen.title());
        match self.screen {
            Screen::Gallery => {
                if let Err(e) = self.gallery.browser.load(&self.db) {
                    self.report("Failed to load photos", format!("{:#}", e));
                }
            }
            Screen::Camera => {
                if let Err(e) = self.camera.focus(&self.devices) {
                    self.report("Camera unavailable", e);
                }
            }
            Screen::Import => {
                if let Err(e) = self.import.focus(&self.devices) {
                    self.report("Failed to list library", e);
                }
            }
            Screen::Deleted => match self.db.fetch_deleted() {
                Ok(entries) => self.deleted.refresh(entries),
                Err(e) => self.report("Failed to load deleted photos", e),
            },
        }
    }

    // ========================================================================
    // Keys
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        match self.mode {
            AppMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.mode = AppMode::Normal;
                }
                return Ok(());
            }
            AppMode::Menu => return self.handle_menu_key(key),
            AppMode::Search => return self.handle_search_key(key),
            AppMode::Confirm => return self.handle_confirm_key(key),
            AppMode::Viewer => return self.handle_viewer_key(key),
            AppMode::Normal => {}
        }

        self.status_message = None;

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('?') => {
                self.mode = AppMode::Help;
                return Ok(());
            }
            KeyCode::Tab | KeyCode::Char('m') => {
                self.nav.selected = self.screen.index();
                self.mode = AppMode::Menu;
                return Ok(());
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(screen) = Screen::from_digit(c) {
                    self.switch_screen(screen);
                }
                return Ok(());
            }
            _ => {}
        }

        match self.screen {
            Screen::Gallery => self.handle_gallery_key(key),
            Screen::Camera => self.handle_camera_key(key),
            Screen::Import => self.handle_import_key(key),
            Screen::Deleted => self.handle_deleted_key(key),
        }
        Ok(())
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Tab | KeyCode::Char('m') => self.mode = AppMode::Normal,
            KeyCode::Char('j') | KeyCode::Down => self.nav.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.nav.move_up(),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                self.switch_screen(self.nav.selected_screen());
            }
            KeyCode::Char(c) => {
                if let Some(screen) = Screen::from_digit(c) {
                    self.switch_screen(screen);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_gallery_key(&mut self, key: KeyEvent) {
        let browser = &mut self.gallery.browser;
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => browser.move_left(),
            KeyCode::Char('l') | KeyCode::Right => browser.move_right(),
            KeyCode::Char('k') | KeyCode::Up => browser.move_up(),
            KeyCode::Char('j') | KeyCode::Down => browser.move_down(),
            KeyCode::Char('g') | KeyCode::Home => browser.move_to_start(),
            KeyCode::Char('G') | KeyCode::End => browser.move_to_end(),
            KeyCode::PageUp => self.gallery.page_up(self.visible_rows),
            KeyCode::PageDown => self.gallery.page_down(self.visible_rows),
            KeyCode::Enter | KeyCode::Char('v') => self.open_viewer(),
            KeyCode::Char('/') => {
                self.search_dialog = Some(SearchDialog::new(&self.gallery.browser.query));
                self.mode = AppMode::Search;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(record) = self.gallery.browser.selected_record().cloned() {
                    self.ask_confirm(PendingAction::DeleteImage(record));
                }
            }
            KeyCode::Char('R') => self.focus_screen(),
            KeyCode::Esc => {
                if !self.gallery.browser.query.is_empty() {
                    self.gallery.browser.set_query("");
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(dialog) = self.search_dialog.as_mut() else {
            self.mode = AppMode::Normal;
            return Ok(());
        };

        match key.code {
            KeyCode::Esc => {
                let previous = dialog.previous.clone();
                self.gallery.browser.set_query(&previous);
                self.search_dialog = None;
                self.mode = AppMode::Normal;
                return Ok(());
            }
            KeyCode::Enter => {
                self.search_dialog = None;
                self.mode = AppMode::Normal;
                return Ok(());
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => dialog.clear(),
            KeyCode::Char(c) => dialog.handle_char(c),
            KeyCode::Backspace => dialog.backspace(),
            KeyCode::Left => dialog.move_cursor_left(),
            KeyCode::Right => dialog.move_cursor_right(),
            _ => return Ok(()),
        }

        let query = dialog.query.clone();
        self.gallery.browser.set_query(&query);
        Ok(())
    }

    fn open_viewer(&mut self) {
        let browser = &self.gallery.browser;
        if browser.visible.is_empty() {
            return;
        }
        self.viewer = Some(ViewerView::new(
            browser.visible.clone(),
            browser.selected,
            &self.config.preview,
        ));
        self.mode = AppMode::Viewer;
    }

    fn close_viewer(&mut self) {
        if let Some(viewer) = self.viewer.take() {
            if let Some(record) = viewer.current_record() {
                if let Some(idx) = self.gallery.browser.visible.iter().position(|r| r.id == record.id) {
                    self.gallery.browser.select(idx);
                }
            }
        }
        self.mode = AppMode::Normal;
    }

    fn handle_viewer_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(viewer) = self.viewer.as_mut() else {
            self.mode = AppMode::Normal;
            return Ok(());
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.close_viewer(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => viewer.next(),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => viewer.prev(),
            KeyCode::Char('g') | KeyCode::Home => viewer.first(),
            KeyCode::Char('G') | KeyCode::End => viewer.last(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(record) = viewer.current_record().cloned() {
                    self.ask_confirm(PendingAction::DeleteImage(record));
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ========================================================================
    // Delete
    // ========================================================================

    fn ask_confirm(&mut self, action: PendingAction) {
        self.confirm_dialog = Some(ConfirmDialog::new(action, self.trash.for_new_deletes().is_some()));
        self.mode = AppMode::Confirm;
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        let confirmed = match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') => false,
            _ => return Ok(()),
        };

        self.mode = if self.viewer.is_some() { AppMode::Viewer } else { AppMode::Normal };
        let Some(dialog) = self.confirm_dialog.take() else {
            return Ok(());
        };
        if !confirmed {
            return Ok(());
        }

        match dialog.action {
            PendingAction::DeleteImage(record) => self.delete_image(&record),
            PendingAction::PurgeDeleted(entry) => {
                match self.trash.delete_image_permanently(&self.db, &entry) {
                    Ok(()) => self.status_message = Some("Photo permanently deleted".to_string()),
                    Err(e) => self.report("Failed to delete photo", format!("{:#}", e)),
                }
                self.focus_screen();
            }
        }
        Ok(())
    }

    fn delete_image(&mut self, record: &crate::db::ImageRecord) {
        let trash = self.trash.for_new_deletes();
        let kept = trash.is_some();
        match gallery::delete_image(&self.db, trash, record) {
            Ok(()) => {
                self.gallery.forget(&record.path);
                self.status_message = Some(if kept {
                    "Photo moved to Deleted Photos".to_string()
                } else {
                    "Photo deleted".to_string()
                });
            }
            Err(e) => self.report("Failed to delete photo", format!("{:#}", e)),
        }

        if let Err(e) = self.gallery.browser.load(&self.db) {
            self.report("Failed to load photos", format!("{:#}", e));
        }

        if let Some(viewer) = self.viewer.as_mut() {
            viewer.records.retain(|r| r.id != record.id);
            if viewer.records.is_empty() {
                self.close_viewer();
            } else if viewer.current >= viewer.records.len() {
                viewer.last();
            }
        }
    }

    // ========================================================================
    // Camera / Import
    // ========================================================================

    fn handle_camera_key(&mut self, key: KeyEvent) {
        if self.camera.session.captured().is_some() {
            self.handle_captured_key(key, Screen::Camera);
            return;
        }

        match key.code {
            KeyCode::Char('c') | KeyCode::Char(' ') => {
                self.camera.last_saved = None;
                match self.camera.session.capture(&self.devices) {
                    Ok(true) => self.camera.refresh_preview(),
                    Ok(false) => self.status_message = Some("No photo was taken".to_string()),
                    Err(e) => self.report("Capture failed", e),
                }
            }
            KeyCode::Char('r') => self.focus_screen(),
            _ => {}
        }
    }

    fn handle_import_key(&mut self, key: KeyEvent) {
        if self.import.session.captured().is_some() {
            self.handle_captured_key(key, Screen::Import);
            return;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.import.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.import.move_up(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(asset) = self.import.selected_asset().cloned() else {
                    return;
                };
                self.import.last_saved = None;
                match self.import.session.pick(&self.devices, &asset) {
                    Ok(()) => self.import.refresh_preview(),
                    Err(e) => self.report("Cannot import photo", e),
                }
            }
            KeyCode::Char('r') => self.focus_screen(),
            _ => {}
        }
    }

    /// Keys while a photo waits to be saved or discarded.
    fn handle_captured_key(&mut self, key: KeyEvent, screen: Screen) {
        let view = match screen {
            Screen::Import => &mut self.import,
            _ => &mut self.camera,
        };

        match key.code {
            KeyCode::Enter | KeyCode::Char('s') => {
                match view.session.commit(&self.db, &self.storage, self.devices.location.as_ref()) {
                    Ok(record) => {
                        view.clear_preview();
                        self.status_message = Some(format!("Saved photo #{}", record.id));
                        view.last_saved = Some(record);
                    }
                    Err(e) => self.report("Failed to save photo", e),
                }
            }
            KeyCode::Esc | KeyCode::Char('x') => {
                view.session.discard();
                view.clear_preview();
            }
            _ => {}
        }
    }

    // ========================================================================
    // Deleted photos
    // ========================================================================

    fn handle_deleted_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.deleted.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.deleted.move_up(),
            KeyCode::Char('r') => {
                let Some(entry) = self.deleted.selected_entry().cloned() else {
                    return;
                };
                match self.trash.restore_image(&self.db, &entry) {
                    Ok(record) => self.status_message = Some(format!("Restored photo #{}", record.id)),
                    Err(e) => self.report("Failed to restore photo", format!("{:#}", e)),
                }
                self.focus_screen();
            }
            KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(entry) = self.deleted.selected_entry().cloned() {
                    self.ask_confirm(PendingAction::PurgeDeleted(entry));
                }
            }
            KeyCode::Char('R') => self.focus_screen(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::tests::devices;
    use crate::config::ImageProtocol;
    use crate::device::PermissionStatus;
    use tempfile::{tempdir, TempDir};

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn test_app(camera: PermissionStatus, library: PermissionStatus) -> (TempDir, App) {
        test_app_with_trash(camera, library, true)
    }

    fn test_app_with_trash(
        camera: PermissionStatus,
        library: PermissionStatus,
        trash_enabled: bool,
    ) -> (TempDir, App) {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.db_path = dir.path().join("images.db");
        config.library.path = dir.path().join("photos");
        config.trash.path = dir.path().join("trash");
        config.trash.enabled = trash_enabled;
        config.preview.protocol = ImageProtocol::None;

        let mut db = Database::open(&config.db_path).unwrap();
        db.initialize().unwrap();
        let app = App::new(config, db, devices(camera, library));
        (dir, app)
    }

    #[test]
    fn test_capture_then_save_shows_in_gallery() {
        let (_dir, mut app) = test_app(PermissionStatus::Granted, PermissionStatus::Granted);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen, Screen::Camera);
        assert_eq!(app.camera.session.permission(), PermissionStatus::Granted);

        press(&mut app, KeyCode::Char('c'));
        assert!(app.camera.session.captured().is_some());
        press(&mut app, KeyCode::Enter);
        assert!(app.camera.session.captured().is_none());
        assert_eq!(app.db.count().unwrap(), 1);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.gallery.browser.visible.len(), 1);
    }

    #[test]
    fn test_discard_stores_nothing() {
        let (_dir, mut app) = test_app(PermissionStatus::Granted, PermissionStatus::Granted);
        app.switch_screen(Screen::Camera);

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Esc);

        assert!(app.camera.session.captured().is_none());
        assert_eq!(app.db.count().unwrap(), 0);
    }

    #[test]
    fn test_denied_camera_reports_status() {
        let (_dir, mut app) = test_app(PermissionStatus::Denied, PermissionStatus::Granted);
        app.switch_screen(Screen::Camera);

        press(&mut app, KeyCode::Char('c'));

        assert!(app.status_message.as_deref().unwrap().contains("no access to camera"));
        assert_eq!(app.db.count().unwrap(), 0);
    }

    #[test]
    fn test_import_from_library() {
        let (_dir, mut app) = test_app(PermissionStatus::Granted, PermissionStatus::Granted);
        app.switch_screen(Screen::Import);
        assert_eq!(app.import.assets.len(), 1);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));

        let records = app.db.fetch_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(std::fs::read(&records[0].path).unwrap(), b"library-bytes");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (_dir, mut app) = test_app(PermissionStatus::Granted, PermissionStatus::Granted);
        app.switch_screen(Screen::Camera);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);
        app.switch_screen(Screen::Gallery);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, AppMode::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.db.count().unwrap(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.db.count().unwrap(), 0);
        assert!(app.gallery.browser.visible.is_empty());

        app.switch_screen(Screen::Deleted);
        assert_eq!(app.deleted.entries.len(), 1);

        press(&mut app, KeyCode::Char('r'));
        assert!(app.deleted.entries.is_empty());
        assert_eq!(app.db.count().unwrap(), 1);
    }

    /// Put the first stored photo into the trash the way an earlier run with
    /// the trash enabled would have.
    fn trash_first_photo(app: &App) {
        let record = app.db.fetch_all().unwrap().remove(0);
        let trash_path = app.trash.move_to_trash(std::path::Path::new(&record.path)).unwrap();
        app.db.move_to_deleted(&record, &trash_path).unwrap();
    }

    #[test]
    fn test_deleted_photos_managed_with_trash_disabled() {
        let (_dir, mut app) =
            test_app_with_trash(PermissionStatus::Granted, PermissionStatus::Granted, false);
        app.switch_screen(Screen::Camera);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);
        trash_first_photo(&app);

        app.switch_screen(Screen::Deleted);
        assert_eq!(app.deleted.entries.len(), 1);
        press(&mut app, KeyCode::Char('r'));
        assert!(app.deleted.entries.is_empty());
        assert_eq!(app.db.count().unwrap(), 1);
        assert!(app.status_message.as_deref().unwrap().contains("Restored"));

        trash_first_photo(&app);
        app.switch_screen(Screen::Deleted);
        let trashed = app.deleted.entries[0].path.clone();
        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.deleted.entries.is_empty());
        assert!(app.db.fetch_deleted().unwrap().is_empty());
        assert!(!std::path::Path::new(&trashed).exists());
        assert_eq!(app.status_message.as_deref(), Some("Photo permanently deleted"));
    }

    #[test]
    fn test_delete_with_trash_disabled_is_permanent() {
        let (_dir, mut app) =
            test_app_with_trash(PermissionStatus::Granted, PermissionStatus::Granted, false);
        app.switch_screen(Screen::Camera);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);
        let path = app.db.fetch_all().unwrap()[0].path.clone();
        app.switch_screen(Screen::Gallery);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(app.db.count().unwrap(), 0);
        assert!(app.db.fetch_deleted().unwrap().is_empty());
        assert!(!std::path::Path::new(&path).exists());
    }

    #[test]
    fn test_search_filters_and_cancel_restores() {
        let (_dir, mut app) = test_app(PermissionStatus::Granted, PermissionStatus::Granted);
        app.switch_screen(Screen::Camera);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);
        app.switch_screen(Screen::Gallery);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, AppMode::Search);
        type_text(&mut app, "1999-");
        assert!(app.gallery.browser.visible.is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.gallery.browser.query, "");
        assert_eq!(app.gallery.browser.visible.len(), 1);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "0, 0");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.gallery.browser.query, "0, 0");
        assert!(app.gallery.browser.visible.is_empty());
    }

    #[test]
    fn test_viewer_delete_closes_when_empty() {
        let (_dir, mut app) = test_app(PermissionStatus::Granted, PermissionStatus::Granted);
        app.switch_screen(Screen::Camera);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);
        app.switch_screen(Screen::Gallery);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Viewer);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.viewer.is_none());
        assert_eq!(app.db.count().unwrap(), 0);
    }

    #[test]
    fn test_menu_switches_screen() {
        let (_dir, mut app) = test_app(PermissionStatus::Granted, PermissionStatus::Granted);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, AppMode::Menu);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.screen, Screen::Import);
    }
}
