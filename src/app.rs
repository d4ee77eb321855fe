use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::store::{
    CardDraft, CollectionStore, FileSlot, LoadOrigin, ReorderGesture, StoreError,
};
use crate::theme::Theme;
use crate::ui::grid::{screen_chunks, Grid};

/// How long transient status messages stay on screen
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    AddForm,
    Help,
    Confirm, // Clear all
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Url,
    Image,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Url,
        FormField::Image,
        FormField::Description,
    ];

    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Url,
            FormField::Url => FormField::Image,
            FormField::Image => FormField::Description,
            FormField::Description => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Description,
            FormField::Url => FormField::Name,
            FormField::Image => FormField::Url,
            FormField::Description => FormField::Image,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => " Name* ",
            FormField::Url => " URL* ",
            FormField::Image => " Image URL ",
            FormField::Description => " Description ",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Website name (e.g., neal.fun)",
            FormField::Url => "URL (e.g., https://neal.fun)",
            FormField::Image => "Image URL (optional)",
            FormField::Description => "Description (optional)",
        }
    }
}

/// Add-website form state
#[derive(Debug, Clone)]
pub struct AddForm {
    pub draft: CardDraft,
    pub field: FormField,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            draft: CardDraft::default(),
            field: FormField::Name,
        }
    }
}

impl AddForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.draft.name,
            FormField::Url => &self.draft.url,
            FormField::Image => &self.draft.image,
            FormField::Description => &self.draft.description,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.draft.name,
            FormField::Url => &mut self.draft.url,
            FormField::Image => &mut self.draft.image,
            FormField::Description => &mut self.draft.description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Mouse,
    Keyboard,
}

/// A card currently being dragged
#[derive(Debug, Clone, Copy)]
pub struct Drag {
    pub gesture: ReorderGesture,
    pub source: DragSource,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Left,
    Right,
    Up,
    Down,
}

pub struct App {
    pub store: CollectionStore,
    pub theme: Theme,
    pub popup: Popup,
    pub form: AddForm,

    pub selected: usize,
    pub drag: Option<Drag>,

    // Last known terminal size (for grid navigation and mouse hit-testing)
    pub viewport: Rect,

    // Status message (auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    // Sticky notice (e.g. recovered from a corrupted file), cleared on next key
    pub notice: Option<String>,

    browser: Option<String>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let slot = FileSlot::new(config.resolve_data_dir()?);
        let store = CollectionStore::open(Box::new(slot), config.slot_key(), config.save_policy());
        let theme = Theme::load(config.theme_file.as_deref());
        Ok(Self::with_store(store, theme, config.browser.clone()))
    }

    pub fn with_store(store: CollectionStore, theme: Theme, browser: Option<String>) -> Self {
        let notice = match store.origin() {
            LoadOrigin::Recovered { reason, backup } => Some(match backup {
                Some(path) => format!("Saved websites were unreadable ({}); restored defaults. Backup: {}", reason, path),
                None => format!("Saved websites were unreadable ({}); restored defaults", reason),
            }),
            _ => None,
        };

        Self {
            store,
            theme,
            popup: Popup::None,
            form: AddForm::default(),
            selected: 0,
            drag: None,
            viewport: Rect::default(),
            status_message: None,
            status_message_time: None,
            notice,
            browser,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Status for a mutation that already happened in memory
    fn report(&mut self, result: Result<(), StoreError>, done: String) {
        match result {
            Ok(()) => self.set_status(done),
            Err(e) => self.set_status(format!("{} (not saved: {})", done, e)),
        }
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    /// Grid geometry for the current viewport and selection
    pub fn grid(&self) -> Grid {
        let [_, _, cards, _] = screen_chunks(self.viewport);
        Grid::new(cards, self.selected)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether `q` should quit right now
    pub fn can_quit(&self) -> bool {
        self.popup == Popup::None && self.drag.is_none()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        self.notice = None;

        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        if self.drag.is_some() {
            return self.handle_drag_key(key);
        }

        self.handle_normal_key(key)
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(Direction::Right),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(Direction::Down),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.store.len().saturating_sub(1),

            // Open link
            KeyCode::Enter | KeyCode::Char('o') => self.open_selected(),

            // Add website
            KeyCode::Char('a') | KeyCode::Char('+') => self.start_add_form(),

            // Delete
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),

            // Grab for keyboard reorder
            KeyCode::Char('m') | KeyCode::Char(' ') => self.grab_selected(),

            // Clear all (only offered when there is something to clear)
            KeyCode::Char('C') => {
                if !self.store.is_empty() {
                    self.popup = Popup::Confirm;
                }
            }

            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::AddForm => self.handle_form_key(key),
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::Confirm => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => {
                        self.popup = Popup::None;
                        self.confirm_clear();
                    }
                    KeyCode::Char('n') | KeyCode::Esc => self.popup = Popup::None,
                    _ => {}
                }
                Ok(())
            }
            Popup::None => Ok(()),
        }
    }

    /// Arrow keys move the grabbed card; Enter/Space/Esc/m drop it where it is
    fn handle_drag_key(&mut self, key: KeyEvent) -> Result<()> {
        let direction = match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => Some(Direction::Right),
            KeyCode::Up | KeyCode::Char('k') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Direction::Down),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('m') => {
                self.end_drag();
                return Ok(());
            }
            _ => None,
        };

        if let Some(target) = direction.and_then(|d| self.neighbor(d)) {
            self.drag_over(target);
        }
        Ok(())
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.popup != Popup::None {
            return Ok(());
        }

        let hit = self.grid().card_at(self.store.len(), mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // A grab still open here (keyboard, or a mouse release we never saw) settles first
                if self.drag.is_some() {
                    self.end_drag();
                }
                if let Some(index) = hit {
                    self.notice = None;
                    self.selected = index;
                    self.drag = Some(Drag {
                        gesture: ReorderGesture::begin(index),
                        source: DragSource::Mouse,
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let mouse_drag = matches!(self.drag, Some(Drag { source: DragSource::Mouse, .. }));
                if let (true, Some(target)) = (mouse_drag, hit) {
                    self.drag_over(target);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if matches!(self.drag, Some(Drag { source: DragSource::Mouse, .. })) {
                    self.end_drag();
                }
            }
            MouseEventKind::ScrollDown if self.drag.is_none() => self.move_selection(Direction::Down),
            MouseEventKind::ScrollUp if self.drag.is_none() => self.move_selection(Direction::Up),
            _ => {}
        }
        Ok(())
    }

    /// Periodic housekeeping: expire status messages, flush deferred saves
    pub fn tick(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() >= Duration::from_secs(STATUS_SECONDS) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        // Don't write a half-finished drag
        if self.drag.is_none() {
            if let Err(e) = self.store.flush_due(Instant::now()) {
                self.set_status(format!("Not saved: {}", e));
            }
        }
    }

    /// Finish any gesture and write pending changes before exit
    pub fn shutdown(&mut self) -> Result<()> {
        if self.drag.is_some() {
            self.end_drag();
        }
        self.store.flush()?;
        Ok(())
    }

    fn neighbor(&self, direction: Direction) -> Option<usize> {
        let len = self.store.len();
        if len == 0 {
            return None;
        }
        let columns = self.grid().columns;
        let current = self.selected.min(len - 1);

        match direction {
            Direction::Left => current.checked_sub(1),
            Direction::Right => Some(current + 1).filter(|&i| i < len),
            Direction::Up => current.checked_sub(columns),
            Direction::Down => {
                if current + columns < len {
                    Some(current + columns)
                } else if current / columns < (len - 1) / columns {
                    // Short last row: land on its last card
                    Some(len - 1)
                } else {
                    None
                }
            }
        }
    }

    fn move_selection(&mut self, direction: Direction) {
        if let Some(index) = self.neighbor(direction) {
            self.selected = index;
        }
    }

    fn selected_card_name(&self) -> Option<String> {
        self.store.get(self.selected).map(|c| c.name.clone())
    }

    fn start_add_form(&mut self) {
        self.form = AddForm::default();
        self.status_message = None;
        self.popup = Popup::AddForm;
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.popup = Popup::None;
                self.form = AddForm::default();
            }
            KeyCode::Tab | KeyCode::Down => self.form.field = self.form.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.form.field = self.form.field.prev(),
            KeyCode::F(2) => self.submit_form(),
            KeyCode::Enter => {
                if self.form.field == FormField::Description {
                    self.submit_form();
                } else {
                    self.form.field = self.form.field.next();
                }
            }
            KeyCode::Backspace => {
                self.form.value_mut().pop();
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit_form(),
            KeyCode::Char(c) if !c.is_control() => self.form.value_mut().push(c),
            _ => {}
        }
        Ok(())
    }

    /// Validate and insert; a rejected form stays open
    fn submit_form(&mut self) {
        let draft = match self.form.draft.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };

        let name = draft.name.clone();
        let result = self.store.insert(draft);
        if let Err(StoreError::Invalid(e)) = &result {
            self.set_status(e.to_string());
            return;
        }

        self.popup = Popup::None;
        self.form = AddForm::default();
        self.selected = self.store.len().saturating_sub(1);
        self.report(result.map(|_| ()), format!("Added '{}'", name));
    }

    fn delete_selected(&mut self) {
        let Some(card) = self.store.get(self.selected).cloned() else {
            return;
        };

        match self.store.delete(card.id) {
            Ok(false) => {}
            result => self.report(result.map(|_| ()), format!("Deleted '{}'", card.name)),
        }

        if self.selected >= self.store.len() {
            self.selected = self.store.len().saturating_sub(1);
        }
    }

    fn confirm_clear(&mut self) {
        let result = self.store.clear();
        self.selected = 0;
        match result {
            Ok(()) => self.set_status("Cleared all websites"),
            Err(e) => self.set_status(format!("Cleared, but {}", e)),
        }
    }

    fn grab_selected(&mut self) {
        if let Some(name) = self.selected_card_name() {
            self.drag = Some(Drag {
                gesture: ReorderGesture::begin(self.selected),
                source: DragSource::Keyboard,
            });
            self.set_status(format!("Moving '{}': arrows to move, Enter to drop", name));
        }
    }

    fn drag_over(&mut self, target: usize) {
        if let Some(drag) = self.drag.as_mut() {
            if drag.gesture.over(&mut self.store, target) {
                self.selected = drag.gesture.index();
            }
        }
    }

    /// Release: the order from the last step is final
    fn end_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let moved = drag.gesture.has_moved();
        let name = self.selected_card_name().unwrap_or_default();

        match drag.gesture.finish(&mut self.store) {
            Ok(index) if moved => {
                self.selected = index;
                self.set_status(format!("Moved '{}' to position {}", name, index + 1));
            }
            Ok(_) => {
                if drag.source == DragSource::Keyboard {
                    self.status_message = None;
                }
            }
            Err(e) => self.set_status(format!("Moved '{}' (not saved: {})", name, e)),
        }
    }

    fn open_selected(&mut self) {
        let Some(card) = self.store.get(self.selected).cloned() else {
            return;
        };

        match self.open_in_browser(&card.url) {
            Ok(program) => {
                tracing::info!("Opened {} with {}", card.url, program);
                self.set_status(format!("Opened {}", card.url));
            }
            Err(e) => self.set_status(format!("Could not open {}: {}", card.url, e)),
        }
    }

    /// Launch the link in a new browser context without waiting for it
    fn open_in_browser(&self, url: &str) -> Result<String> {
        let configured: Option<Vec<String>> = self
            .browser
            .as_ref()
            .map(|b| b.split_whitespace().map(str::to_string).collect())
            .filter(|parts: &Vec<String>| !parts.is_empty());

        let candidates: Vec<Vec<String>> = match configured {
            Some(parts) => vec![parts],
            None => vec![vec!["xdg-open".to_string()], vec!["open".to_string()]],
        };

        for parts in &candidates {
            let Some((program, args)) = parts.split_first() else {
                continue;
            };
            let spawned = Command::new(program)
                .args(args)
                .arg(url)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if spawned.is_ok() {
                return Ok(program.clone());
            }
        }

        anyhow::bail!("no browser launcher found (tried xdg-open, open)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::slot::MemorySlot;
    use crate::store::SavePolicy;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app(slot: &MemorySlot) -> App {
        let store = CollectionStore::open(Box::new(slot.clone()), "websites", SavePolicy::Immediate);
        let mut app = App::with_store(store, Theme::default(), None);
        // Wide enough for three cards per row
        app.set_viewport(Rect::new(0, 0, 100, 40));
        app
    }

    fn names(app: &App) -> Vec<String> {
        app.store.cards().iter().map(|c| c.name.clone()).collect()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_add_form_submits_valid_card() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);

        app.handle_key(key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.popup, Popup::AddForm);
        type_text(&mut app, "Test");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "https://test.dev");
        app.handle_key(key(KeyCode::F(2))).unwrap();

        assert_eq!(app.popup, Popup::None);
        assert_eq!(names(&app).last().map(String::as_str), Some("Test"));
        assert_eq!(app.selected, 3);
        assert_eq!(slot.writes(), 1);
    }

    #[test]
    fn test_add_form_rejects_missing_url() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);

        app.handle_key(key(KeyCode::Char('a'))).unwrap();
        type_text(&mut app, "No url");
        app.handle_key(key(KeyCode::F(2))).unwrap();

        assert_eq!(app.popup, Popup::AddForm);
        assert_eq!(app.status_message.as_deref(), Some("URL is required"));
        assert_eq!(app.store.len(), 3);
        assert_eq!(slot.writes(), 0);
    }

    #[test]
    fn test_delete_selected_clamps_selection() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);
        app.selected = 2;
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(names(&app), vec!["neal.fun", "The Useless Web"]);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_backspace_does_not_delete() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);
        app.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.store.len(), 3);
        assert_eq!(slot.writes(), 0);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);

        app.handle_key(key(KeyCode::Char('C'))).unwrap();
        assert_eq!(app.popup, Popup::Confirm);
        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.store.len(), 3);

        app.handle_key(key(KeyCode::Char('C'))).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert!(app.store.is_empty());

        // Nothing left to clear: no prompt
        app.handle_key(key(KeyCode::Char('C'))).unwrap();
        assert_eq!(app.popup, Popup::None);
    }

    #[test]
    fn test_keyboard_drag_commits_once() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);

        app.handle_key(key(KeyCode::Char('m'))).unwrap();
        assert!(app.is_dragging());
        app.handle_key(key(KeyCode::Right)).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();
        assert_eq!(names(&app), vec!["The Useless Web", "A Soft Murmur", "neal.fun"]);
        assert_eq!(slot.writes(), 0);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!app.is_dragging());
        assert_eq!(app.selected, 2);
        assert_eq!(slot.writes(), 1);
    }

    #[test]
    fn test_mouse_drag_reorders_cards() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);
        let grid = app.grid();
        let slots = grid.slots(app.store.len());
        let (_, first) = slots[0];
        let (_, third) = slots[2];

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), third.x + 1, third.y + 1)).unwrap();
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), first.x + 1, first.y + 1)).unwrap();
        assert_eq!(names(&app), vec!["A Soft Murmur", "neal.fun", "The Useless Web"]);
        assert_eq!(slot.writes(), 0);

        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0)).unwrap();
        assert_eq!(app.selected, 0);
        assert_eq!(slot.writes(), 1);
    }

    #[test]
    fn test_click_during_keyboard_grab_saves_the_moved_order() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);
        let (_, first) = app.grid().slots(3)[0];

        app.handle_key(key(KeyCode::Char('m'))).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), first.x + 1, first.y + 1)).unwrap();
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), first.x + 1, first.y + 1)).unwrap();
        app.shutdown().unwrap();

        assert_eq!(names(&app), vec!["The Useless Web", "neal.fun", "A Soft Murmur"]);
        assert_eq!(slot.writes(), 1);
        let reopened = CollectionStore::open(Box::new(slot.clone()), "websites", SavePolicy::Immediate);
        let saved: Vec<&str> = reopened.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(saved, vec!["The Useless Web", "neal.fun", "A Soft Murmur"]);
    }

    #[test]
    fn test_press_after_lost_mouse_release_saves_the_moved_order() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);
        let slots = app.grid().slots(3);
        let (_, first) = slots[0];
        let (_, second) = slots[1];

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), first.x + 1, first.y + 1)).unwrap();
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), second.x + 1, second.y + 1)).unwrap();
        // Button released outside the terminal: no Up arrives
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), first.x + 1, first.y + 1)).unwrap();

        assert_eq!(slot.writes(), 1);
        assert_eq!(names(&app), vec!["The Useless Web", "neal.fun", "A Soft Murmur"]);
    }

    #[test]
    fn test_click_without_drag_only_selects() {
        let slot = MemorySlot::default();
        let mut app = app(&slot);
        let (_, second) = app.grid().slots(3)[1];

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), second.x + 2, second.y + 2)).unwrap();
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), second.x + 2, second.y + 2)).unwrap();
        assert_eq!(app.selected, 1);
        assert_eq!(slot.writes(), 0);
    }

    #[test]
    fn test_recovered_store_shows_notice() {
        let slot = MemorySlot::with_value("websites", "{{{");
        let mut app = app(&slot);
        assert!(app.notice.as_deref().unwrap().contains("restored defaults"));
        app.handle_key(key(KeyCode::Right)).unwrap();
        assert!(app.notice.is_none());
    }
}
