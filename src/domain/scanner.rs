use super::fs::{EntryKind, FileSystem};
use super::TriageConfig;
use std::io;
use std::path::{Path, PathBuf};

/// What a single pass over a root directory found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Media files, in enumeration order
    pub media_files: Vec<PathBuf>,
    /// Sub-directories usable as move destinations
    pub folders: Vec<PathBuf>,
}

/// Scans the immediate children of `root`.
///
/// # Behavior
/// - Keeps files whose extension is in the allow-list (case-insensitive)
/// - Keeps sub-directories other than `root`'s archive directory, matched by path
/// - Skips hidden entries (names starting with '.') unless configured otherwise
/// - Does not recurse
pub fn scan_root<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    config: &TriageConfig,
) -> io::Result<ScanResult> {
    let mut result = ScanResult::default();
    let archive_dir = config.archive_dir(root);

    for entry in fs.list_dir(root)? {
        let name = match entry.file_name() {
            Some(name) => name,
            None => continue,
        };

        if !config.include_hidden && name.starts_with('.') {
            continue;
        }

        match entry.kind {
            EntryKind::File => {
                if config.is_media_file(&entry.path) {
                    result.media_files.push(entry.path);
                }
            }
            EntryKind::Directory => {
                if entry.path != archive_dir {
                    result.folders.push(entry.path);
                }
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fs::memory::MemoryFileSystem;
    use crate::domain::fs::StdFileSystem;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("a.jpg"), b"a").unwrap();
        fs::write(dir.join("b.MOV"), b"b").unwrap();
        fs::write(dir.join("notes.txt"), b"n").unwrap();
        fs::write(dir.join("README"), b"r").unwrap();

        let result = scan_root(&StdFileSystem, dir, &TriageConfig::default()).unwrap();

        assert_eq!(result.media_files, vec![dir.join("a.jpg"), dir.join("b.MOV")]);
        assert!(result.folders.is_empty());
    }

    #[test]
    fn test_scan_excludes_archive_from_folders() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::create_dir(dir.join("Archived")).unwrap();
        fs::create_dir(dir.join("Keep")).unwrap();
        fs::create_dir(dir.join("Trips")).unwrap();

        let result = scan_root(&StdFileSystem, dir, &TriageConfig::default()).unwrap();

        assert_eq!(result.folders, vec![dir.join("Keep"), dir.join("Trips")]);
    }

    #[test]
    fn test_scan_does_not_recurse() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::create_dir(dir.join("Keep")).unwrap();
        fs::write(dir.join("Keep").join("inner.jpg"), b"i").unwrap();

        let result = scan_root(&StdFileSystem, dir, &TriageConfig::default()).unwrap();

        assert!(result.media_files.is_empty());
    }

    #[test]
    fn test_scan_hidden_entries() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/r");
        fs.add_dir("/r/.thumbs");
        fs.add_file("/r/.secret.jpg");
        fs.add_file("/r/visible.jpg");

        let hidden_off = scan_root(&fs, Path::new("/r"), &TriageConfig::default()).unwrap();
        assert_eq!(hidden_off.media_files, vec![PathBuf::from("/r/visible.jpg")]);
        assert!(hidden_off.folders.is_empty());

        let config = TriageConfig {
            include_hidden: true,
            ..TriageConfig::default()
        };
        let hidden_on = scan_root(&fs, Path::new("/r"), &config).unwrap();
        assert_eq!(hidden_on.media_files.len(), 2);
        assert_eq!(hidden_on.folders, vec![PathBuf::from("/r/.thumbs")]);
    }

    #[test]
    fn test_scan_custom_archive_name() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/r");
        fs.add_dir("/r/Archived");
        fs.add_dir("/r/Trash");

        let config = TriageConfig {
            archive_dir_name: "Trash".to_string(),
            ..TriageConfig::default()
        };
        let result = scan_root(&fs, Path::new("/r"), &config).unwrap();

        assert_eq!(result.folders, vec![PathBuf::from("/r/Archived")]);
    }

    #[test]
    fn test_scan_keeps_folders_differing_from_archive_in_case() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/r");
        fs.add_dir("/r/ARCHIVED");
        fs.add_dir("/r/Archived");
        fs.add_dir("/r/archived");

        let result = scan_root(&fs, Path::new("/r"), &TriageConfig::default()).unwrap();

        assert_eq!(
            result.folders,
            vec![PathBuf::from("/r/ARCHIVED"), PathBuf::from("/r/archived")]
        );
    }

    #[test]
    fn test_scan_unreadable_directory() {
        let result = scan_root(
            &StdFileSystem,
            Path::new("/nonexistent/path/12345"),
            &TriageConfig::default(),
        );
        assert!(result.is_err());
    }
}
