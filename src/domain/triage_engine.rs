use super::fs::{FileSystem, StdFileSystem};
use super::scanner::scan_root;
use super::{
    Folder, FolderId, Item, ItemId, ItemStatus, RootStore, TriageConfig, TriageStatistics,
};
use crate::error::{NweatError, Result};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// State of one opened root directory
#[derive(Debug)]
struct Session {
    root: PathBuf,
    archive_dir: PathBuf,
    items: Vec<Item>,
    cursor: usize,
    completed: bool,
    folders: Vec<Folder>,
}

impl Session {
    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn require_index(&self, id: ItemId) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| NweatError::InvalidTarget(format!("no item {}", id)))
    }

    /// Index of the item at the cursor, which must still be unprocessed
    fn current_unprocessed(&self) -> Result<usize> {
        match self.items.get(self.cursor) {
            Some(item) if item.is_unprocessed() => Ok(self.cursor),
            Some(item) => Err(NweatError::InvalidTarget(format!(
                "current item {} is already {}",
                item.id(),
                item.status().label()
            ))),
            None => Err(NweatError::InvalidTarget(format!(
                "cursor {} is out of range",
                self.cursor
            ))),
        }
    }

    fn has_unprocessed(&self) -> bool {
        self.items.iter().any(Item::is_unprocessed)
    }

    fn refresh_completion(&mut self) {
        self.completed = !self.items.is_empty() && !self.has_unprocessed();
    }

    /// Moves the cursor to the next unprocessed item, wrapping around once.
    ///
    /// Prefers the nearest unprocessed item after the cursor over the first
    /// one in the sequence. Leaves the cursor alone when everything is done.
    fn advance(&mut self) {
        self.refresh_completion();
        if !self.has_unprocessed() {
            return;
        }

        let after = self.cursor.saturating_add(1);
        if let Some(offset) = self
            .items
            .iter()
            .skip(after)
            .position(Item::is_unprocessed)
        {
            self.cursor = after + offset;
            return;
        }

        let before = self.cursor.min(self.items.len());
        if let Some(index) = self.items[..before].iter().position(Item::is_unprocessed) {
            self.cursor = index;
        }
    }

    /// Drops the given items, keeping the cursor on the same logical position
    fn remove_items(&mut self, ids: &HashSet<ItemId>) {
        if ids.is_empty() {
            return;
        }

        let before = self.cursor.min(self.items.len());
        let removed_before = self.items[..before]
            .iter()
            .filter(|item| ids.contains(&item.id()))
            .count();

        self.items.retain(|item| !ids.contains(&item.id()));
        self.cursor = (self.cursor - removed_before).min(self.items.len().saturating_sub(1));
        self.refresh_completion();
    }

    fn root_destination(&self, item: &Item) -> PathBuf {
        self.root.join(item.file_name())
    }
}

/// Result of a command applied to every archived item
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Items the command was applied to
    pub succeeded: Vec<ItemId>,
    /// Items left untouched, with the reason
    pub failed: Vec<(ItemId, NweatError)>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns the triage session and performs the file operations behind each
/// status transition.
///
/// Every command either succeeds completely (file operation done and state
/// updated) or fails without changing state.
pub struct TriageEngine<F: FileSystem = StdFileSystem> {
    fs: F,
    config: TriageConfig,
    store: Option<Box<dyn RootStore>>,
    session: Option<Session>,
    next_id: u64,
}

impl TriageEngine<StdFileSystem> {
    /// Creates an engine working on the local disk with default settings
    pub fn with_defaults() -> Self {
        Self::new(StdFileSystem, TriageConfig::default())
    }
}

impl<F: FileSystem> TriageEngine<F> {
    pub fn new(fs: F, config: TriageConfig) -> Self {
        Self {
            fs,
            config,
            store: None,
            session: None,
            next_id: 0,
        }
    }

    /// Persists every successfully loaded root into `store`
    pub fn with_root_store(mut self, store: Box<dyn RootStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Opens `root` as a new session, replacing the current one.
    ///
    /// A relative `root` is resolved against the working directory first;
    /// the session, its folders and the remembered root only hold absolute
    /// paths. On a scan failure the previous session is left untouched.
    pub fn load_root(&mut self, root: &Path) -> Result<()> {
        let unreadable = |source: std::io::Error| {
            warn!(root = %root.display(), error = %source, "failed to read root directory");
            NweatError::DirectoryUnreadable {
                path: root.to_path_buf(),
                source,
            }
        };

        let root = self.fs.absolutize(root).map_err(unreadable)?;
        let scan = scan_root(&self.fs, &root, &self.config).map_err(unreadable)?;

        let archive_dir = self.config.archive_dir(&root);
        if let Err(e) = self.fs.create_dir(&archive_dir) {
            warn!(dir = %archive_dir.display(), error = %e, "failed to create archive directory");
        }

        let items: Vec<Item> = scan
            .media_files
            .into_iter()
            .map(|path| {
                self.next_id += 1;
                Item::new(ItemId::new(self.next_id), path)
            })
            .collect();
        let folders: Vec<Folder> = scan.folders.into_iter().map(Folder::from_path).collect();

        info!(
            root = %root.display(),
            items = items.len(),
            folders = folders.len(),
            "loaded root"
        );

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.remember_root(&root) {
                warn!(error = %e, "failed to remember root directory");
            }
        }

        self.session = Some(Session {
            root,
            archive_dir,
            items,
            cursor: 0,
            completed: false,
            folders,
        });

        Ok(())
    }

    /// Loads the root remembered by the store, if there is one
    pub fn load_remembered_root(&mut self) -> Result<Option<PathBuf>> {
        let remembered = match self.store.as_ref() {
            Some(store) => store.recall_root()?,
            None => None,
        };

        match remembered {
            Some(root) => {
                self.load_root(&root)?;
                Ok(Some(root))
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    pub fn root(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.root.as_path())
    }

    pub fn archive_dir(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.archive_dir.as_path())
    }

    /// Items in scan order
    pub fn items(&self) -> &[Item] {
        self.session
            .as_ref()
            .map(|s| s.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn cursor(&self) -> usize {
        self.session.as_ref().map(|s| s.cursor).unwrap_or(0)
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.session.as_ref().and_then(|s| s.items.get(s.cursor))
    }

    /// True once every item has a decision.
    ///
    /// An empty session is never completed, including one emptied by
    /// [`delete_all_archived`](Self::delete_all_archived).
    pub fn is_completed(&self) -> bool {
        self.session.as_ref().map(|s| s.completed).unwrap_or(false)
    }

    pub fn folders(&self) -> &[Folder] {
        self.session
            .as_ref()
            .map(|s| s.folders.as_slice())
            .unwrap_or(&[])
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items().iter().find(|item| item.id() == id)
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.index_of(id))
    }

    pub fn archived_items(&self) -> impl Iterator<Item = &Item> {
        self.items()
            .iter()
            .filter(|item| item.status() == ItemStatus::Archived)
    }

    pub fn statistics(&self) -> TriageStatistics {
        TriageStatistics::from_items(self.items())
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Moves the current item into the archive directory
    pub fn archive_current(&mut self) -> Result<ItemId> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let index = session.current_unprocessed()?;
        let destination = session.archive_dir.join(session.items[index].file_name());

        relocate(
            &self.fs,
            &mut session.items[index],
            destination,
            ItemStatus::Archived,
        )?;
        session.advance();
        Ok(session.items[index].id())
    }

    /// Marks the current item as skipped, leaving the file in place
    pub fn skip_current(&mut self) -> Result<ItemId> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let index = session.current_unprocessed()?;

        let item = &mut session.items[index];
        item.set_status(ItemStatus::Skipped);
        let id = item.id();
        debug!(item = %id, "skipped");

        session.advance();
        Ok(id)
    }

    /// Moves the current item into a known folder
    pub fn move_current_to(&mut self, folder: &FolderId) -> Result<ItemId> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let folder_path = session
            .folders
            .iter()
            .find(|f| f.path() == folder.as_path())
            .map(|f| f.path().to_path_buf())
            .ok_or_else(|| {
                NweatError::InvalidTarget(format!(
                    "unknown folder {}",
                    folder.as_path().display()
                ))
            })?;
        let index = session.current_unprocessed()?;
        let destination = folder_path.join(session.items[index].file_name());

        relocate(
            &self.fs,
            &mut session.items[index],
            destination,
            ItemStatus::Moved,
        )?;
        session.advance();
        Ok(session.items[index].id())
    }

    /// Returns an item to `unprocessed`, moving its file back to the root if needed.
    ///
    /// The cursor is not moved.
    pub fn reset_status(&mut self, id: ItemId) -> Result<()> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let index = session.require_index(id)?;

        match session.items[index].status() {
            ItemStatus::Unprocessed => return Ok(()),
            ItemStatus::Archived | ItemStatus::Moved => {
                let destination = session.root_destination(&session.items[index]);
                relocate(
                    &self.fs,
                    &mut session.items[index],
                    destination,
                    ItemStatus::Unprocessed,
                )?;
            }
            ItemStatus::Skipped => {
                session.items[index].set_status(ItemStatus::Unprocessed);
                debug!(item = %id, "reset skipped item");
            }
        }

        session.refresh_completion();
        Ok(())
    }

    /// Moves an archived item back into the root
    pub fn restore_archived(&mut self, id: ItemId) -> Result<()> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let index = require_archived(session, id)?;
        let destination = session.root_destination(&session.items[index]);

        relocate(
            &self.fs,
            &mut session.items[index],
            destination,
            ItemStatus::Unprocessed,
        )?;
        session.refresh_completion();
        Ok(())
    }

    /// Permanently deletes an archived item's file and drops the item
    pub fn delete_archived(&mut self, id: ItemId) -> Result<()> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let index = require_archived(session, id)?;

        delete(&self.fs, &session.items[index])?;
        session.remove_items(&HashSet::from([id]));
        Ok(())
    }

    /// Restores every archived item; failures are reported per item
    pub fn restore_all_archived(&mut self) -> Result<BatchOutcome> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let mut outcome = BatchOutcome::default();

        for index in 0..session.items.len() {
            if session.items[index].status() != ItemStatus::Archived {
                continue;
            }

            let id = session.items[index].id();
            let destination = session.root_destination(&session.items[index]);
            match relocate(
                &self.fs,
                &mut session.items[index],
                destination,
                ItemStatus::Unprocessed,
            ) {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => outcome.failed.push((id, e)),
            }
        }

        session.refresh_completion();
        info!(
            restored = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "restored archived items"
        );
        Ok(outcome)
    }

    /// Deletes every archived item; failed deletions stay archived
    pub fn delete_all_archived(&mut self) -> Result<BatchOutcome> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let mut outcome = BatchOutcome::default();

        for item in session
            .items
            .iter()
            .filter(|item| item.status() == ItemStatus::Archived)
        {
            match delete(&self.fs, item) {
                Ok(()) => outcome.succeeded.push(item.id()),
                Err(e) => outcome.failed.push((item.id(), e)),
            }
        }

        let deleted: HashSet<ItemId> = outcome.succeeded.iter().copied().collect();
        session.remove_items(&deleted);
        info!(
            deleted = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "deleted archived items"
        );
        Ok(outcome)
    }

    /// Creates a folder under the root and registers it as a move destination
    pub fn create_folder(&mut self, name: &str) -> Result<Folder> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        let name = validate_folder_name(name, &self.config)?;
        let path = session.root.join(name);

        if let Some(existing) = session.folders.iter().find(|f| f.path() == path) {
            return Ok(existing.clone());
        }

        self.fs
            .create_dir(&path)
            .map_err(|source| {
                warn!(dir = %path.display(), error = %source, "failed to create folder");
                NweatError::CreateFolderFailed {
                    path: path.clone(),
                    source,
                }
            })?;

        let folder = Folder::from_path(path);
        info!(folder = folder.name(), "created folder");
        session.folders.push(folder.clone());
        Ok(folder)
    }

    /// Points the cursor at `index`
    pub fn set_cursor(&mut self, index: usize) -> Result<()> {
        let session = self.session.as_mut().ok_or_else(no_root)?;
        if index >= session.items.len() {
            return Err(NweatError::InvalidTarget(format!(
                "index {} is out of range ({} items)",
                index,
                session.items.len()
            )));
        }
        session.cursor = index;
        Ok(())
    }
}

fn no_root() -> NweatError {
    NweatError::InvalidTarget("no root directory loaded".to_string())
}

fn require_archived(session: &Session, id: ItemId) -> Result<usize> {
    let index = session.require_index(id)?;
    let status = session.items[index].status();
    if status != ItemStatus::Archived {
        return Err(NweatError::InvalidTarget(format!(
            "item {} is {}, not archived",
            id,
            status.label()
        )));
    }
    Ok(index)
}

/// Moves the item's file and, only once that succeeded, updates the record
fn relocate<F: FileSystem>(
    fs: &F,
    item: &mut Item,
    destination: PathBuf,
    status: ItemStatus,
) -> Result<()> {
    if let Err(source) = fs.move_file(item.path(), &destination) {
        warn!(
            item = %item.id(),
            from = %item.path().display(),
            to = %destination.display(),
            error = %source,
            "move failed"
        );
        return Err(NweatError::MoveFailed {
            from: item.path().to_path_buf(),
            to: destination,
            source,
        });
    }

    debug!(item = %item.id(), to = %destination.display(), status = status.label(), "moved");
    item.relocate(destination, status);
    Ok(())
}

fn delete<F: FileSystem>(fs: &F, item: &Item) -> Result<()> {
    fs.remove_file(item.path()).map_err(|source| {
        warn!(item = %item.id(), path = %item.path().display(), error = %source, "delete failed");
        NweatError::DeleteFailed {
            path: item.path().to_path_buf(),
            source,
        }
    })?;
    debug!(item = %item.id(), "deleted");
    Ok(())
}

/// Accepts a single, non-reserved path component
fn validate_folder_name<'a>(name: &'a str, config: &TriageConfig) -> Result<&'a str> {
    let trimmed = name.trim();
    let invalid = || NweatError::InvalidFolderName(name.to_string());

    if trimmed.is_empty() || config.is_archive_name(trimmed) {
        return Err(invalid());
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(invalid());
    }

    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(trimmed),
        _ => Err(invalid()),
    }
}
