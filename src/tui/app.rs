// Key handling and view transitions on top of the triage engine
use super::input::{
    handle_archived_input, handle_confirm_input, handle_key_event, handle_picker_input,
    handle_text_input, KeyAction, TextInput,
};
use crate::domain::{BatchOutcome, FileSystem, ItemId, StdFileSystem, TriageEngine};
use crate::error::NweatError;
use crossterm::event::KeyEvent;

/// What a pending delete confirmation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    One(ItemId),
    All,
}

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main item view
    Browsing,
    /// Help overlay visible
    Help,
    /// Destination folder list, optionally with a new-folder name being typed
    FolderPicker {
        selected: usize,
        input: Option<String>,
    },
    /// List of archived items
    Archived { selected: usize },
    /// Confirmation dialog for permanent deletion
    ConfirmDelete {
        target: DeleteTarget,
        selected: usize,
    },
}

/// One-line feedback shown under the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

pub struct App<F: FileSystem = StdFileSystem> {
    pub engine: TriageEngine<F>,
    pub view: ViewState,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl<F: FileSystem> App<F> {
    pub fn new(engine: TriageEngine<F>) -> Self {
        Self {
            engine,
            view: ViewState::Browsing,
            status: None,
            should_quit: false,
        }
    }

    /// Dispatches a key press according to the current view
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.view.clone() {
            ViewState::Browsing => self.handle_browsing(handle_key_event(key)),
            ViewState::Help => {
                if matches!(
                    handle_key_event(key),
                    KeyAction::Help | KeyAction::Quit | KeyAction::None
                ) {
                    self.view = ViewState::Browsing;
                }
            }
            ViewState::FolderPicker {
                selected,
                input: Some(text),
            } => self.handle_folder_name(selected, text, handle_text_input(key)),
            ViewState::FolderPicker {
                selected,
                input: None,
            } => self.handle_picker(selected, handle_picker_input(key)),
            ViewState::Archived { selected } => {
                self.handle_archived(selected, handle_archived_input(key))
            }
            ViewState::ConfirmDelete { target, selected } => {
                self.handle_confirm(target, selected, handle_confirm_input(key))
            }
        }
    }

    fn handle_browsing(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Archive => {
                let name = self.current_name();
                match self.engine.archive_current() {
                    Ok(_) => self.info(format!("Archived {}", name)),
                    Err(e) => self.error(e),
                }
            }
            KeyAction::Skip => {
                let name = self.current_name();
                match self.engine.skip_current() {
                    Ok(_) => self.info(format!("Kept {}", name)),
                    Err(e) => self.error(e),
                }
            }
            KeyAction::MoveToFolder => match self.engine.current_item() {
                Some(item) if item.is_unprocessed() => {
                    self.view = ViewState::FolderPicker {
                        selected: 0,
                        input: None,
                    };
                }
                Some(item) => {
                    self.status = Some(StatusMessage::Error(format!(
                        "{} is already {}",
                        item.name(),
                        item.status().label()
                    )));
                }
                None => {}
            },
            KeyAction::Next => {
                let next = self.engine.cursor() + 1;
                if next < self.engine.items().len() {
                    self.set_cursor(next);
                }
            }
            KeyAction::Previous => {
                if let Some(previous) = self.engine.cursor().checked_sub(1) {
                    self.set_cursor(previous);
                }
            }
            KeyAction::Reset => {
                if let Some(item) = self.engine.current_item() {
                    let (id, name) = (item.id(), item.name());
                    match self.engine.reset_status(id) {
                        Ok(()) => self.info(format!("Reset {}", name)),
                        Err(e) => self.error(e),
                    }
                }
            }
            KeyAction::ShowArchived => {
                self.view = ViewState::Archived { selected: 0 };
            }
            KeyAction::Help => self.view = ViewState::Help,
            _ => {}
        }
    }

    fn handle_picker(&mut self, selected: usize, action: KeyAction) {
        let count = self.engine.folders().len();
        match action {
            KeyAction::Up => {
                self.view = ViewState::FolderPicker {
                    selected: selected.saturating_sub(1),
                    input: None,
                };
            }
            KeyAction::Down => {
                self.view = ViewState::FolderPicker {
                    selected: (selected + 1).min(count.saturating_sub(1)),
                    input: None,
                };
            }
            KeyAction::Select => {
                let Some(folder) = self.engine.folders().get(selected) else {
                    return;
                };
                let (folder_id, folder_name) = (folder.id(), folder.name().to_string());
                let name = self.current_name();
                match self.engine.move_current_to(&folder_id) {
                    Ok(_) => {
                        self.info(format!("Moved {} to {}", name, folder_name));
                        self.view = ViewState::Browsing;
                    }
                    Err(e) => self.error(e),
                }
            }
            KeyAction::NewFolder => {
                self.view = ViewState::FolderPicker {
                    selected,
                    input: Some(String::new()),
                };
            }
            KeyAction::Cancel => self.view = ViewState::Browsing,
            _ => {}
        }
    }

    fn handle_folder_name(&mut self, selected: usize, mut text: String, input: TextInput) {
        match input {
            TextInput::Insert(c) => text.push(c),
            TextInput::Backspace => {
                text.pop();
            }
            TextInput::Submit => match self.engine.create_folder(&text) {
                Ok(folder) => {
                    let index = self
                        .engine
                        .folders()
                        .iter()
                        .position(|f| f.id() == folder.id())
                        .unwrap_or(selected);
                    self.info(format!("Created folder {}", folder.name()));
                    self.view = ViewState::FolderPicker {
                        selected: index,
                        input: None,
                    };
                    return;
                }
                Err(e) => self.error(e),
            },
            TextInput::Cancel => {
                self.view = ViewState::FolderPicker {
                    selected,
                    input: None,
                };
                return;
            }
            TextInput::None => {}
        }

        self.view = ViewState::FolderPicker {
            selected,
            input: Some(text),
        };
    }

    fn handle_archived(&mut self, selected: usize, action: KeyAction) {
        let archived: Vec<ItemId> = self.engine.archived_items().map(|item| item.id()).collect();
        match action {
            KeyAction::Up => {
                self.view = ViewState::Archived {
                    selected: selected.saturating_sub(1),
                };
            }
            KeyAction::Down => {
                self.view = ViewState::Archived {
                    selected: (selected + 1).min(archived.len().saturating_sub(1)),
                };
            }
            KeyAction::Restore => {
                if let Some(&id) = archived.get(selected) {
                    let name = self.item_name(id);
                    match self.engine.restore_archived(id) {
                        Ok(()) => self.info(format!("Restored {}", name)),
                        Err(e) => self.error(e),
                    }
                    self.clamp_archived_selection(selected);
                }
            }
            KeyAction::Delete => {
                if let Some(&id) = archived.get(selected) {
                    self.view = ViewState::ConfirmDelete {
                        target: DeleteTarget::One(id),
                        selected,
                    };
                }
            }
            KeyAction::RestoreAll => {
                if !archived.is_empty() {
                    match self.engine.restore_all_archived() {
                        Ok(outcome) => self.report_batch("Restored", &outcome),
                        Err(e) => self.error(e),
                    }
                    self.clamp_archived_selection(selected);
                }
            }
            KeyAction::DeleteAll => {
                if !archived.is_empty() {
                    self.view = ViewState::ConfirmDelete {
                        target: DeleteTarget::All,
                        selected,
                    };
                }
            }
            KeyAction::Cancel => self.view = ViewState::Browsing,
            _ => {}
        }
    }

    fn handle_confirm(&mut self, target: DeleteTarget, selected: usize, action: KeyAction) {
        match action {
            KeyAction::Confirm => {
                match target {
                    DeleteTarget::One(id) => {
                        let name = self.item_name(id);
                        match self.engine.delete_archived(id) {
                            Ok(()) => self.info(format!("Deleted {}", name)),
                            Err(e) => self.error(e),
                        }
                    }
                    DeleteTarget::All => match self.engine.delete_all_archived() {
                        Ok(outcome) => self.report_batch("Deleted", &outcome),
                        Err(e) => self.error(e),
                    },
                }
                self.clamp_archived_selection(selected);
            }
            KeyAction::Cancel => self.view = ViewState::Archived { selected },
            _ => {}
        }
    }

    fn set_cursor(&mut self, index: usize) {
        if let Err(e) = self.engine.set_cursor(index) {
            self.error(e);
        }
    }

    fn clamp_archived_selection(&mut self, selected: usize) {
        let count = self.engine.archived_items().count();
        self.view = ViewState::Archived {
            selected: selected.min(count.saturating_sub(1)),
        };
    }

    fn report_batch(&mut self, verb: &str, outcome: &BatchOutcome) {
        match outcome.failed.first() {
            None => self.info(format!("{} {} item(s)", verb, outcome.succeeded.len())),
            Some((_, first)) => {
                self.status = Some(StatusMessage::Error(format!(
                    "{} {} item(s), {} failed: {}",
                    verb,
                    outcome.succeeded.len(),
                    outcome.failed.len(),
                    first
                )));
            }
        }
    }

    fn current_name(&self) -> String {
        self.engine
            .current_item()
            .map(|item| item.name())
            .unwrap_or_default()
    }

    fn item_name(&self, id: ItemId) -> String {
        self.engine
            .item(id)
            .map(|item| item.name())
            .unwrap_or_else(|| id.to_string())
    }

    fn info(&mut self, message: String) {
        self.status = Some(StatusMessage::Info(message));
    }

    fn error(&mut self, error: NweatError) {
        self.status = Some(StatusMessage::Error(error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fs::memory::MemoryFileSystem;
    use crate::domain::{ItemStatus, TriageConfig};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::path::Path;

    const ROOT: &str = "/photos";

    fn app(names: &[&str], folders: &[&str]) -> App<MemoryFileSystem> {
        let fs = MemoryFileSystem::new();
        fs.add_dir(ROOT);
        for folder in folders {
            fs.add_dir(Path::new(ROOT).join(folder));
        }
        for name in names {
            fs.add_file(Path::new(ROOT).join(name));
        }
        let mut engine = TriageEngine::new(fs, TriageConfig::default());
        engine.load_root(Path::new(ROOT)).unwrap();
        App::new(engine)
    }

    fn press(app: &mut App<MemoryFileSystem>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App<MemoryFileSystem>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn statuses(app: &App<MemoryFileSystem>) -> Vec<ItemStatus> {
        app.engine.items().iter().map(|item| item.status()).collect()
    }

    mod browsing_tests {
        use super::*;

        #[test]
        fn test_archive_and_skip_keys() {
            let mut app = app(&["a.jpg", "b.jpg", "c.jpg"], &[]);

            press(&mut app, KeyCode::Left);
            press(&mut app, KeyCode::Char('s'));

            assert_eq!(
                statuses(&app),
                vec![
                    ItemStatus::Archived,
                    ItemStatus::Skipped,
                    ItemStatus::Unprocessed
                ]
            );
            assert_eq!(app.engine.cursor(), 2);
            assert_eq!(
                app.status,
                Some(StatusMessage::Info("Kept b.jpg".to_string()))
            );
        }

        #[test]
        fn test_cursor_keys_stay_in_range() {
            let mut app = app(&["a.jpg", "b.jpg"], &[]);

            press(&mut app, KeyCode::Char('['));
            assert_eq!(app.engine.cursor(), 0);

            press(&mut app, KeyCode::Char(']'));
            press(&mut app, KeyCode::Char(']'));
            assert_eq!(app.engine.cursor(), 1);
        }

        #[test]
        fn test_archive_on_processed_item_reports_error() {
            let mut app = app(&["a.jpg", "b.jpg"], &[]);
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Char('['));

            press(&mut app, KeyCode::Left);

            assert!(matches!(app.status, Some(StatusMessage::Error(_))));
            assert_eq!(statuses(&app)[0], ItemStatus::Skipped);
        }

        #[test]
        fn test_reset_key() {
            let mut app = app(&["a.jpg", "b.jpg"], &[]);
            press(&mut app, KeyCode::Left);
            press(&mut app, KeyCode::Char('['));

            press(&mut app, KeyCode::Char('r'));

            assert_eq!(statuses(&app)[0], ItemStatus::Unprocessed);
            assert!(app.engine.file_system().exists(Path::new("/photos/a.jpg")));
        }

        #[test]
        fn test_help_toggles() {
            let mut app = app(&["a.jpg"], &[]);
            press(&mut app, KeyCode::Char('?'));
            assert_eq!(app.view, ViewState::Help);

            press(&mut app, KeyCode::Char('?'));
            assert_eq!(app.view, ViewState::Browsing);
            assert!(!app.should_quit);
        }

        #[test]
        fn test_quit() {
            let mut app = app(&["a.jpg"], &[]);
            press(&mut app, KeyCode::Char('q'));
            assert!(app.should_quit);
        }
    }

    mod picker_tests {
        use super::*;

        #[test]
        fn test_move_to_selected_folder() {
            let mut app = app(&["a.jpg", "b.jpg"], &["Keep", "Trips"]);

            press(&mut app, KeyCode::Up);
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.view, ViewState::Browsing);
            assert_eq!(statuses(&app)[0], ItemStatus::Moved);
            assert!(app
                .engine
                .file_system()
                .exists(Path::new("/photos/Trips/a.jpg")));
        }

        #[test]
        fn test_picker_not_opened_for_processed_item() {
            let mut app = app(&["a.jpg", "b.jpg"], &["Keep"]);
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Char('['));

            press(&mut app, KeyCode::Char('m'));

            assert_eq!(app.view, ViewState::Browsing);
            assert!(matches!(app.status, Some(StatusMessage::Error(_))));
        }

        #[test]
        fn test_create_folder_selects_it() {
            let mut app = app(&["a.jpg"], &["Keep"]);
            press(&mut app, KeyCode::Up);
            press(&mut app, KeyCode::Char('n'));
            type_text(&mut app, "Zoo");
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.engine.folders().len(), 2);
            let index = app
                .engine
                .folders()
                .iter()
                .position(|f| f.name() == "Zoo")
                .unwrap();
            assert_eq!(
                app.view,
                ViewState::FolderPicker {
                    selected: index,
                    input: None
                }
            );
            assert!(app.engine.file_system().is_dir(Path::new("/photos/Zoo")));
        }

        #[test]
        fn test_invalid_folder_name_keeps_input() {
            let mut app = app(&["a.jpg"], &[]);
            press(&mut app, KeyCode::Up);
            press(&mut app, KeyCode::Char('n'));
            type_text(&mut app, "archived");
            press(&mut app, KeyCode::Enter);

            assert!(matches!(app.status, Some(StatusMessage::Error(_))));
            assert_eq!(
                app.view,
                ViewState::FolderPicker {
                    selected: 0,
                    input: Some("archived".to_string())
                }
            );
        }

        #[test]
        fn test_folder_name_editing() {
            let mut app = app(&["a.jpg"], &[]);
            press(&mut app, KeyCode::Up);
            press(&mut app, KeyCode::Char('n'));
            type_text(&mut app, "Kepp");
            press(&mut app, KeyCode::Backspace);
            press(&mut app, KeyCode::Backspace);
            type_text(&mut app, "ep");

            assert_eq!(
                app.view,
                ViewState::FolderPicker {
                    selected: 0,
                    input: Some("Keep".to_string())
                }
            );

            press(&mut app, KeyCode::Esc);
            assert_eq!(
                app.view,
                ViewState::FolderPicker {
                    selected: 0,
                    input: None
                }
            );
        }
    }

    mod archived_tests {
        use super::*;

        fn archived_app() -> App<MemoryFileSystem> {
            let mut app = app(&["a.jpg", "b.jpg", "c.jpg"], &[]);
            press(&mut app, KeyCode::Left);
            press(&mut app, KeyCode::Left);
            press(&mut app, KeyCode::Char('v'));
            app
        }

        #[test]
        fn test_restore_selected() {
            let mut app = archived_app();
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Char('r'));

            assert_eq!(
                statuses(&app),
                vec![
                    ItemStatus::Archived,
                    ItemStatus::Unprocessed,
                    ItemStatus::Unprocessed
                ]
            );
            assert_eq!(app.view, ViewState::Archived { selected: 0 });
        }

        #[test]
        fn test_delete_requires_confirmation() {
            let mut app = archived_app();
            press(&mut app, KeyCode::Char('d'));
            assert!(matches!(app.view, ViewState::ConfirmDelete { .. }));

            press(&mut app, KeyCode::Char('n'));
            assert_eq!(app.view, ViewState::Archived { selected: 0 });
            assert_eq!(app.engine.items().len(), 3);

            press(&mut app, KeyCode::Char('d'));
            press(&mut app, KeyCode::Char('y'));
            assert_eq!(app.engine.items().len(), 2);
            assert!(!app
                .engine
                .file_system()
                .exists(Path::new("/photos/Archived/a.jpg")));
        }

        #[test]
        fn test_restore_all_and_delete_all() {
            let mut app = archived_app();
            press(&mut app, KeyCode::Char('R'));
            assert_eq!(app.engine.archived_items().count(), 0);
            assert_eq!(
                app.status,
                Some(StatusMessage::Info("Restored 2 item(s)".to_string()))
            );

            press(&mut app, KeyCode::Esc);
            press(&mut app, KeyCode::Left);
            press(&mut app, KeyCode::Char('v'));
            press(&mut app, KeyCode::Char('D'));
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.engine.items().len(), 2);
            assert_eq!(app.view, ViewState::Archived { selected: 0 });
        }

        #[test]
        fn test_partial_batch_reports_failure() {
            let mut app = archived_app();
            app.engine
                .file_system()
                .fail_on("/photos/Archived/b.jpg");

            press(&mut app, KeyCode::Char('D'));
            press(&mut app, KeyCode::Char('y'));

            assert_eq!(app.engine.archived_items().count(), 1);
            match &app.status {
                Some(StatusMessage::Error(message)) => assert!(message.contains("1 failed")),
                other => panic!("unexpected status {:?}", other),
            }
        }
    }
}
