//! File-system capability used by the triage engine
//!
//! The engine never touches `std::fs` directly; it goes through [`FileSystem`]
//! so that tests can substitute an in-memory tree with injected failures.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// An immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

pub trait FileSystem {
    /// Lists the immediate children of `dir` in enumeration order
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;

    /// Moves a file; fails if `to` already exists
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Creates a directory; succeeds if it already exists
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Resolves `path` against the working directory without following symlinks
    fn absolutize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// [`FileSystem`] backed by the local disk.
///
/// Entries are returned sorted by file name so that a root always loads in
/// the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();

        for entry_result in fs::read_dir(dir)? {
            // Skip entries that cannot be read (permission errors, etc.)
            let entry = match entry_result {
                Ok(e) => e,
                Err(_) => continue,
            };

            let path = entry.path();
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(_) => continue,
            };

            let kind = if metadata.is_dir() {
                EntryKind::Directory
            } else if metadata.is_file() {
                EntryKind::File
            } else {
                continue;
            };

            entries.push(DirEntry { path, kind });
        }

        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(entries)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        if !from.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {:?}", from),
            ));
        }

        // rename() silently replaces an existing file on Unix
        if fs::symlink_metadata(to).is_ok() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Destination already exists: {:?}", to),
            ));
        }

        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn absolutize(&self, path: &Path) -> io::Result<PathBuf> {
        std::path::absolute(path)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_dir_sorted_with_kinds() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("b.jpg"), b"b").unwrap();
        fs::write(dir.join("a.png"), b"a").unwrap();
        fs::create_dir(dir.join("Keep")).unwrap();

        let entries = StdFileSystem.list_dir(dir).unwrap();
        let names: Vec<_> = entries.iter().filter_map(|e| e.file_name()).collect();

        assert_eq!(names, vec!["Keep", "a.png", "b.jpg"]);
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].kind, EntryKind::File);
    }

    #[test]
    fn test_list_dir_nonexistent() {
        let result = StdFileSystem.list_dir(Path::new("/nonexistent/path/12345"));
        assert!(result.is_err());
    }

    #[test]
    fn test_move_file_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.jpg");
        let to = temp_dir.path().join("b.jpg");
        fs::write(&from, b"from").unwrap();
        fs::write(&to, b"to").unwrap();

        let err = StdFileSystem.move_file(&from, &to).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&to).unwrap(), b"to");
        assert!(from.exists());
    }

    #[test]
    fn test_move_file_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let err = StdFileSystem
            .move_file(&temp_dir.path().join("gone.jpg"), &temp_dir.path().join("x.jpg"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_create_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("Archived");
        StdFileSystem.create_dir(&dir).unwrap();
        StdFileSystem.create_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_absolutize_relative_path() {
        let resolved = StdFileSystem.absolutize(Path::new("./photos")).unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert!(resolved.is_absolute());
        assert_eq!(resolved, cwd.join("photos"));
    }

    mod memory_tests {
        use crate::domain::fs::memory::MemoryFileSystem;
        use super::*;

        #[test]
        fn test_memory_move_and_list() {
            let fs = MemoryFileSystem::new();
            fs.add_dir("/r");
            fs.add_dir("/r/Keep");
            fs.add_file("/r/a.jpg");

            fs.move_file(Path::new("/r/a.jpg"), Path::new("/r/Keep/a.jpg"))
                .unwrap();

            assert!(!fs.exists(Path::new("/r/a.jpg")));
            assert!(fs.exists(Path::new("/r/Keep/a.jpg")));
            let listed = fs.list_dir(Path::new("/r")).unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].kind, EntryKind::Directory);
        }

        #[test]
        fn test_memory_injected_failure() {
            let fs = MemoryFileSystem::new();
            fs.add_dir("/r");
            fs.add_file("/r/a.jpg");
            fs.fail_on("/r/a.jpg");

            assert!(fs.remove_file(Path::new("/r/a.jpg")).is_err());
            assert!(fs.exists(Path::new("/r/a.jpg")));
        }
    }
}
