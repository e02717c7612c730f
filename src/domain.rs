pub mod fs;
pub mod scanner;
pub mod triage_engine;

pub use fs::{DirEntry, EntryKind, FileSystem, StdFileSystem};
pub use scanner::{scan_root, ScanResult};
pub use triage_engine::{BatchOutcome, TriageEngine};

use crate::error::Result;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of media a file holds, used to pick a thumbnail strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "mp4" | "mov" => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(extension)
    }
}

/// Triage outcome of a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Unprocessed,
    Archived,
    Skipped,
    Moved,
}

impl ItemStatus {
    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::Unprocessed => "unprocessed",
            ItemStatus::Archived => "archived",
            ItemStatus::Skipped => "skipped",
            ItemStatus::Moved => "moved",
        }
    }
}

/// Stable identity of an item for the lifetime of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One media file under triage.
///
/// Fields are only mutated by [`TriageEngine`] commands, so the location
/// always agrees with the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    path: PathBuf,
    status: ItemStatus,
}

impl Item {
    pub(crate) fn new(id: ItemId, path: PathBuf) -> Self {
        Self {
            id,
            path,
            status: ItemStatus::Unprocessed,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Current location of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn is_unprocessed(&self) -> bool {
        self.status == ItemStatus::Unprocessed
    }

    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }

    /// File name for display, lossily converted
    pub fn name(&self) -> String {
        self.file_name().to_string_lossy().into_owned()
    }

    pub fn media_kind(&self) -> MediaKind {
        MediaKind::from_path(&self.path)
    }

    pub(crate) fn relocate(&mut self, path: PathBuf, status: ItemStatus) {
        self.path = path;
        self.status = status;
    }

    pub(crate) fn set_status(&mut self, status: ItemStatus) {
        self.status = status;
    }
}

/// Identity of a folder, derived from its absolute path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderId(PathBuf);

impl FolderId {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// A move destination below the root, distinct from the archive directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    name: String,
    path: PathBuf,
}

impl Folder {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    pub fn id(&self) -> FolderId {
        FolderId(self.path.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Engine settings that would otherwise be global constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageConfig {
    /// Name of the reserved archive sub-directory
    pub archive_dir_name: String,
    /// Lowercase extensions, without the leading dot
    pub extensions: Vec<String>,
    /// Include files whose name starts with '.'
    pub include_hidden: bool,
}

pub const DEFAULT_ARCHIVE_DIR: &str = "Archived";
pub const DEFAULT_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "heic", "mp4", "mov"];

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            archive_dir_name: DEFAULT_ARCHIVE_DIR.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: false,
        }
    }
}

impl TriageConfig {
    /// Builds a config with a custom extension allow-list, normalising each entry
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Returns true if the path carries one of the allowed extensions
    pub fn is_media_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    /// The archive directory of `root`
    pub fn archive_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.archive_dir_name)
    }

    /// Returns true if `name` could clash with the archive directory name.
    ///
    /// Case-insensitive, so that a new folder never aliases the archive on a
    /// case-insensitive file system.
    pub fn is_archive_name(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.archive_dir_name)
    }
}

pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Counts of items per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriageStatistics {
    pub total: usize,
    pub unprocessed: usize,
    pub archived: usize,
    pub skipped: usize,
    pub moved: usize,
}

impl TriageStatistics {
    pub fn from_items(items: &[Item]) -> Self {
        let mut stats = TriageStatistics {
            total: items.len(),
            ..Default::default()
        };

        for item in items {
            match item.status() {
                ItemStatus::Unprocessed => stats.unprocessed += 1,
                ItemStatus::Archived => stats.archived += 1,
                ItemStatus::Skipped => stats.skipped += 1,
                ItemStatus::Moved => stats.moved += 1,
            }
        }

        stats
    }

    pub fn processed(&self) -> usize {
        self.total - self.unprocessed
    }

    /// Fraction of processed items in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed() as f64 / self.total as f64
        }
    }
}

/// Remembers the last opened root across restarts
pub trait RootStore {
    fn remember_root(&mut self, root: &Path) -> Result<()>;

    fn recall_root(&self) -> Result<Option<PathBuf>>;
}
